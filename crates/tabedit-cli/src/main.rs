//! tabedit CLI
//!
//! Command-line tool for applying edit scripts to delimited text tables.

mod logger;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tabedit_core::{execute, parse_table, write_output_to_path, Call, Config, OutputFormat};

#[derive(Parser)]
#[command(name = "tabedit")]
#[command(about = "Apply edit scripts to delimited tables", long_about = None)]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script against a table file
    Apply {
        /// Script, `;`-separated selections and commands
        script: String,

        /// Table file to edit
        file: PathBuf,

        /// Cell delimiter
        #[arg(short, long, default_value_t = tabedit_core::DEFAULT_DELIMITER.to_string())]
        delimiter: String,

        /// Write here instead of over the input file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Delimited)]
        format: Format,
    },

    /// Parse a script and print it in canonical form
    Check {
        /// Script to validate
        script: String,
    },

    /// Print the first rows of a table file
    Show {
        /// Table file to read
        file: PathBuf,

        /// Cell delimiter
        #[arg(short, long, default_value_t = tabedit_core::DEFAULT_DELIMITER.to_string())]
        delimiter: String,

        /// Maximum number of rows to display
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Same form as the input
    Delimited,
    /// Standard CSV
    Csv,
    /// JSON
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Delimited => OutputFormat::Delimited,
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> tabedit_core::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match cli.command {
        Commands::Apply {
            script,
            file,
            delimiter,
            output,
            format,
        } => cmd_apply(&script, &file, &delimiter, output.as_deref(), format),
        Commands::Check { script } => cmd_check(&script),
        Commands::Show {
            file,
            delimiter,
            limit,
        } => cmd_show(&file, &delimiter, limit),
    }
}

fn cmd_apply(
    script: &str,
    file: &Path,
    delimiter: &str,
    output: Option<&Path>,
    format: Format,
) -> tabedit_core::Result<()> {
    let config = Config::from_arg(delimiter)?;

    // A bad script must fail before the file is touched
    let call = Call::parse(script)?;
    log::debug!(
        "parsed {} selection(s) and {} command(s)",
        call.selections().len(),
        call.commands().len()
    );

    let table = parse_table(file, &config)?;
    log::debug!(
        "loaded {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        file.display()
    );

    let table = execute(&call, table)?;
    let target = output.unwrap_or(file);

    write_output_to_path(&table, &config, format.into(), target)?;

    log::info!(
        "wrote {} rows x {} columns to {}",
        table.row_count(),
        table.column_count(),
        target.display()
    );
    Ok(())
}

fn cmd_check(script: &str) -> tabedit_core::Result<()> {
    let call = Call::parse(script)?;

    println!("Selections ({}):", call.selections().len());
    for (id, selection) in call.selections().iter().enumerate() {
        let marker = if id == 0 { " (default)" } else { "" };
        println!("  #{} {}{}", id, selection, marker);
    }
    println!();
    println!("Commands ({}):", call.commands().len());
    for (index, command) in call.commands().iter().enumerate() {
        println!("  {}. {} on #{}", index + 1, command, command.selection());
    }

    Ok(())
}

fn cmd_show(file: &Path, delimiter: &str, limit: usize) -> tabedit_core::Result<()> {
    let config = Config::from_arg(delimiter)?;
    let table = parse_table(file, &config)?;

    println!("File: {}", file.display());
    println!("Rows: {}", table.row_count());
    println!("Columns: {}", table.column_count());
    println!();

    for row in table.rows().iter().take(limit) {
        println!("{}", row.cells.join("\t"));
    }

    if table.row_count() > limit {
        println!("... ({} more rows)", table.row_count() - limit);
    }

    Ok(())
}
