//! tabedit-core: Core library for editing delimited tables with scripts
//!
//! This library provides functionality to:
//! - Read and write delimited text tables with quoting and escaping
//! - Export tables as standard CSV or JSON
//! - Parse `;`-separated edit scripts into selections and commands
//! - Resolve static and content-dependent selections to coordinates
//! - Execute scripts, growing the table as commands address new cells

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod parser;
pub mod script;
pub mod selection;
pub mod table;
pub mod text;
pub mod variables;

pub use config::{Config, DEFAULT_DELIMITER};
pub use engine::{execute, run_script, Engine};
pub use error::{Error, ErrorKind, Result};
pub use parser::{
    escape_cell, parse_table, parse_table_str, write_output, write_output_to_path, write_table,
    write_table_csv, write_table_json, write_table_to_path, OutputFormat,
};
pub use script::{Call, Command, DataOp, StructuralKind, Target, VariableOp};
pub use selection::{Bound, Region, Selection, SelectionId};
pub use table::{Placement, Row, Table};
pub use variables::{Register, VariableStore};
