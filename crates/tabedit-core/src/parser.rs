//! Reader and writer for delimited table files
//!
//! Every line is a row. Inside a cell `\` makes the next character literal
//! and an unescaped `"` switches quoting on or off, so a quoted stretch can
//! hold the delimiter or a line break. Tables can also be exported as
//! standard CSV or JSON.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::table::Table;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// How a table is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The same delimited form the reader takes
    #[default]
    Delimited,
    /// RFC 4180 CSV, for other tools
    Csv,
    /// Pretty-printed JSON of the table
    Json,
}

/// Parse a delimited file into a Table
pub fn parse_table<P: AsRef<Path>>(path: P, config: &Config) -> Result<Table> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_table(&content, config, path)
}

/// Parse delimited text into a Table (useful for testing)
pub fn parse_table_str(content: &str, config: &Config) -> Result<Table> {
    read_table(content, config, Path::new("<string>"))
}

fn read_table(content: &str, config: &Config, path: &Path) -> Result<Table> {
    let rows = split_rows(content, config.delimiter_char())
        .ok_or_else(|| Error::UnbalancedQuotes(path.to_path_buf()))?;

    let widest = rows.iter().map(Vec::len).max().unwrap_or(0);
    let short = rows
        .iter()
        .filter(|r| !r.is_empty() && r.len() < widest)
        .count();
    if short > 0 {
        log::warn!(
            "{} row(s) in {} have fewer than {} cells, padding with empty cells",
            short,
            path.display(),
            widest
        );
    }

    Ok(Table::from_rows(rows))
}

/// Split text into rows of cells, `None` if a quote is left open
///
/// A blank line is a row with no cells; padding later widens it.
fn split_rows(content: &str, delimiter: char) -> Option<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut line_started = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                line_started = true;
                // A backslash at the very end escapes nothing
                if let Some(next) = chars.next() {
                    cell.push(next);
                }
            }
            '"' => {
                line_started = true;
                quoted = !quoted;
            }
            '\r' if !quoted && chars.peek() == Some(&'\n') => {}
            '\n' if !quoted => {
                end_row(&mut rows, &mut row, &mut cell, line_started);
                line_started = false;
            }
            c if c == delimiter && !quoted => {
                line_started = true;
                row.push(std::mem::take(&mut cell));
            }
            c => {
                line_started = true;
                cell.push(c);
            }
        }
    }

    if quoted {
        return None;
    }
    if line_started {
        end_row(&mut rows, &mut row, &mut cell, true);
    }
    Some(rows)
}

fn end_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>, cell: &mut String, started: bool) {
    if started {
        row.push(std::mem::take(cell));
    }
    rows.push(std::mem::take(row));
}

/// Serialize a table, one line per row
pub fn write_table<W: Write>(table: &Table, config: &Config, mut writer: W) -> Result<()> {
    let delimiter = config.delimiter_char();
    let separator = delimiter.to_string();
    for row in table.rows() {
        let escaped: Vec<String> = row.cells.iter().map(|c| escape_cell(c, delimiter)).collect();
        writeln!(writer, "{}", escaped.join(&separator))?;
    }
    writer.flush()?;
    Ok(())
}

/// Serialize a table as standard CSV without a header row
pub fn write_table_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);
    for row in table.rows() {
        csv_writer.write_record(&row.cells)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Serialize a table as pretty-printed JSON
pub fn write_table_json<W: Write>(table: &Table, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, table)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Serialize a table in the given format
pub fn write_output<W: Write>(
    table: &Table,
    config: &Config,
    format: OutputFormat,
    writer: W,
) -> Result<()> {
    match format {
        OutputFormat::Delimited => write_table(table, config, writer),
        OutputFormat::Csv => write_table_csv(table, writer),
        OutputFormat::Json => write_table_json(table, writer),
    }
}

/// Write a table to a file in its delimited form
pub fn write_table_to_path<P: AsRef<Path>>(table: &Table, config: &Config, path: P) -> Result<()> {
    write_output_to_path(table, config, OutputFormat::Delimited, path)
}

/// Write a table to a file in the given format
///
/// The output goes to a sibling temporary file first, which then replaces
/// the target, so a failed write leaves the old file untouched.
pub fn write_output_to_path<P: AsRef<Path>>(
    table: &Table,
    config: &Config,
    format: OutputFormat,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let temp_path = sibling_temp_path(path);
    let written = File::create(&temp_path)
        .map_err(Error::from)
        .and_then(|file| write_output(table, config, format, BufWriter::new(file)))
        .and_then(|()| fs::rename(&temp_path, path).map_err(Error::from));

    written.map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        match e {
            Error::Io(source) => Error::FileWrite {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    })
}

fn sibling_temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    path.with_file_name(format!(".{}.tabedit.tmp", name))
}

/// Escape a cell for output
///
/// Cells holding the delimiter, a quote, a backslash or a line break are
/// quoted, with `\` and `"` escaped inside the quotes.
pub fn escape_cell(content: &str, delimiter: char) -> String {
    let needs_quotes = content
        .chars()
        .any(|c| c == delimiter || matches!(c, '"' | '\\' | '\n' | '\r'));
    if !needs_quotes {
        return content.to_string();
    }

    let mut out = String::with_capacity(content.len() + 2);
    out.push('"');
    for c in content.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
