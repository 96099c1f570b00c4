//! Executes a parsed script against a table
//!
//! Commands run strictly in script order. Before each one its selection is
//! resolved against the current table and the table is grown to cover every
//! coordinate the command names; the first error aborts the whole run.

use crate::data;
use crate::error::{Error, Result};
use crate::script::{Call, Command, StructuralKind, Target, VariableOp};
use crate::selection::{Region, Resolver};
use crate::table::{Placement, Table};
use crate::variables::VariableStore;

/// State of one script run
pub struct Engine<'a> {
    call: &'a Call,
    table: Table,
    variables: VariableStore,
}

impl<'a> Engine<'a> {
    pub fn new(call: &'a Call, table: Table) -> Self {
        Self {
            call,
            table,
            variables: VariableStore::new(),
        }
    }

    /// Run every command in order
    pub fn run(&mut self) -> Result<()> {
        let call = self.call;
        for (index, command) in call.commands().iter().enumerate() {
            log::debug!("command {}: {}", index + 1, command);
            self.step(command)?;
        }
        Ok(())
    }

    fn step(&mut self, command: &Command) -> Result<()> {
        // inc touches no cell, so its selection is never resolved
        if let Command::Variable {
            op: VariableOp::Increment(register),
            ..
        } = command
        {
            let value = self.variables.increment(*register);
            log::debug!("{} = {:?}", register, value);
            return Ok(());
        }

        let region = self.resolve(command)?;
        self.expand(&region, command.target())?;

        match command {
            Command::Structural { kind, .. } => apply_structural(&mut self.table, *kind, region),
            Command::Data { op, .. } => data::apply(&mut self.table, op, &region),
            Command::Variable { op, .. } => self.apply_variable(*op, region),
        }
    }

    fn resolve(&self, command: &Command) -> Result<Region> {
        let id = command.selection();
        let resolver = Resolver::new(self.call.selections(), &self.table, &self.variables);
        let region = resolver.resolve(id)?;
        if let Some(selection) = self.call.selection(id).filter(|s| s.is_dynamic()) {
            log::debug!("{} resolved to {}", selection, region);
        }
        Ok(region)
    }

    /// Grow the table to cover the region and the explicit target
    fn expand(&mut self, region: &Region, target: Option<Target>) -> Result<()> {
        let (mut rows, mut cols) = region.extent();
        if let Some(target) = target {
            rows = rows.max(target.row + 1);
            cols = cols.max(target.col + 1);
        }
        if self.table.expand_to(rows, cols)? {
            log::debug!(
                "table expanded to {} rows x {} columns",
                self.table.row_count(),
                self.table.column_count()
            );
        }
        Ok(())
    }

    fn apply_variable(&mut self, op: VariableOp, region: Region) -> Result<()> {
        match op {
            VariableOp::Define(register) => {
                let (row, col) = region.single_cell().ok_or_else(|| Error::NotSingleCell {
                    command: op.to_string(),
                    selection: region.to_string(),
                })?;
                let value = self
                    .table
                    .get(row, col)
                    .ok_or(Error::OutOfRange { row: row + 1, col: col + 1 })?;
                self.variables.set(register, value);
                Ok(())
            }
            VariableOp::Use(register) => {
                data::fill(&mut self.table, &region, self.variables.get(register))
            }
            VariableOp::Increment(register) => {
                self.variables.increment(register);
                Ok(())
            }
            VariableOp::CaptureSelection => {
                self.variables.capture(region);
                Ok(())
            }
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    /// Finish the run, dropping trailing empty columns
    pub fn finish(mut self) -> Table {
        self.table.trim_trailing_columns();
        self.table
    }
}

/// Run a parsed script and return the trimmed table
pub fn execute(call: &Call, table: Table) -> Result<Table> {
    let mut engine = Engine::new(call, table);
    engine.run()?;
    Ok(engine.finish())
}

/// Parse and run a script in one go
pub fn run_script(script: &str, table: Table) -> Result<Table> {
    let call = Call::parse(script)?;
    execute(&call, table)
}

fn apply_structural(table: &mut Table, kind: StructuralKind, region: Region) -> Result<()> {
    match kind {
        StructuralKind::InsertRowBefore | StructuralKind::InsertRowAfter => {
            let placement = kind.placement().unwrap_or(Placement::Before);
            match region {
                Region::Cell { row, .. } | Region::Row(row) => table.insert_row(row, placement),
                Region::Col(_) | Region::Table => {
                    let count = table.row_count();
                    table.insert_rows_interleaved(0, count, placement)
                }
                Region::Box { row1, row2, .. } => match row2.last(table.row_count()) {
                    Some(last) => table.insert_rows_interleaved(row1, last - row1 + 1, placement),
                    None => Ok(()),
                },
            }
        }
        StructuralKind::InsertColBefore | StructuralKind::InsertColAfter => {
            let placement = kind.placement().unwrap_or(Placement::Before);
            match region {
                Region::Cell { col, .. } | Region::Col(col) => table.insert_column(col, placement),
                Region::Row(_) | Region::Table => {
                    let count = table.column_count();
                    table.insert_columns_interleaved(0, count, placement)
                }
                Region::Box { col1, col2, .. } => match col2.last(table.column_count()) {
                    Some(last) => {
                        table.insert_columns_interleaved(col1, last - col1 + 1, placement)
                    }
                    None => Ok(()),
                },
            }
        }
        StructuralKind::DeleteRow => match region {
            Region::Cell { row, .. } | Region::Row(row) => table.delete_row(row),
            Region::Col(_) | Region::Table => {
                table.clear();
                Ok(())
            }
            Region::Box { row1, row2, .. } => match row2.last(table.row_count()) {
                Some(last) => table.delete_rows(row1, last),
                None => Ok(()),
            },
        },
        StructuralKind::DeleteCol => match region {
            Region::Cell { col, .. } | Region::Col(col) => table.delete_column(col),
            Region::Row(_) | Region::Table => {
                table.clear();
                Ok(())
            }
            Region::Box { col1, col2, .. } => match col2.last(table.column_count()) {
                Some(last) => table.delete_columns(col1, last),
                None => Ok(()),
            },
        },
    }
}
