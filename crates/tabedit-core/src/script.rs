//! Script parsing: splitting, classifying and binding commands to selections
//!
//! A script is a `;`-separated list of fragments. Selection fragments do
//! nothing by themselves; each command binds to the selection declared most
//! recently before it (initially `[1,1]`).

use crate::error::{Error, Result};
use crate::selection::{coordinate, Region, Selection, SelectionId};
use crate::table::Placement;
use crate::text::is_single_word;
use crate::variables::Register;
use std::fmt;
use std::str::FromStr;

/// What a script fragment is, decided before it is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Variable,
    Structural,
    Data,
    Selection,
}

/// Classify a trimmed fragment, `None` if it is not valid script
///
/// Kinds are tried in a fixed order, so `[set]` is a variable command and
/// `set [1,2]` sets the literal text `[1,2]`.
pub fn classify(fragment: &str) -> Option<FragmentKind> {
    if is_variable(fragment) {
        Some(FragmentKind::Variable)
    } else if StructuralKind::from_keyword(fragment).is_some() {
        Some(FragmentKind::Structural)
    } else if is_data(fragment) {
        Some(FragmentKind::Data)
    } else if is_selection(fragment) {
        Some(FragmentKind::Selection)
    } else {
        None
    }
}

const VARIABLE_PREFIXES: [&str; 3] = ["def _", "use _", "inc _"];
const TARGETED_DATA: [&str; 5] = ["swap", "sum", "avg", "count", "len"];

fn is_variable(fragment: &str) -> bool {
    if fragment == "[set]" {
        return true;
    }
    fragment.len() == 6
        && VARIABLE_PREFIXES.iter().any(|p| fragment.starts_with(p))
        && fragment.as_bytes()[5].is_ascii_digit()
}

fn is_data(fragment: &str) -> bool {
    if fragment == "clear" {
        return true;
    }
    if let Some(text) = fragment.strip_prefix("set ") {
        return !text.is_empty() && is_single_word(text);
    }
    split_targeted(fragment).is_some() && comma_count(fragment) == 1
}

fn is_selection(fragment: &str) -> bool {
    fragment.len() >= 2
        && fragment.starts_with('[')
        && fragment.ends_with(']')
        && matches!(comma_count(fragment), 0 | 1 | 3)
}

fn comma_count(fragment: &str) -> usize {
    fragment.matches(',').count()
}

/// Split `name [R,C]` into the name and the bracketed argument
fn split_targeted(fragment: &str) -> Option<(&str, &str)> {
    let (name, argument) = fragment.split_once(' ')?;
    let bracketed = argument.len() >= 2 && argument.starts_with('[') && argument.ends_with(']');
    (TARGETED_DATA.contains(&name) && bracketed).then_some((name, argument))
}

/// Row and column insertion and deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralKind {
    InsertRowBefore,
    InsertRowAfter,
    DeleteRow,
    InsertColBefore,
    InsertColAfter,
    DeleteCol,
}

impl StructuralKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "irow" => Some(Self::InsertRowBefore),
            "arow" => Some(Self::InsertRowAfter),
            "drow" => Some(Self::DeleteRow),
            "icol" => Some(Self::InsertColBefore),
            "acol" => Some(Self::InsertColAfter),
            "dcol" => Some(Self::DeleteCol),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::InsertRowBefore => "irow",
            Self::InsertRowAfter => "arow",
            Self::DeleteRow => "drow",
            Self::InsertColBefore => "icol",
            Self::InsertColAfter => "acol",
            Self::DeleteCol => "dcol",
        }
    }

    /// Where an insertion goes, `None` for deletions
    pub fn placement(self) -> Option<Placement> {
        match self {
            Self::InsertRowBefore | Self::InsertColBefore => Some(Placement::Before),
            Self::InsertRowAfter | Self::InsertColAfter => Some(Placement::After),
            Self::DeleteRow | Self::DeleteCol => None,
        }
    }
}

/// Explicit `[R,C]` argument of a data command, 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub row: usize,
    pub col: usize,
}

impl Target {
    fn parse(argument: &str, fragment: &str) -> Result<Self> {
        let not_a_number =
            || Error::invalid_argument(fragment, "expected a [row,column] of integers");
        let (row, col) = argument
            .strip_prefix('[')
            .and_then(|a| a.strip_suffix(']'))
            .and_then(|a| a.split_once(','))
            .ok_or_else(not_a_number)?;
        Ok(Self {
            row: coordinate(row, fragment, not_a_number)?,
            col: coordinate(col, fragment, not_a_number)?,
        })
    }

    pub fn as_region(self) -> Region {
        Region::Cell {
            row: self.row,
            col: self.col,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.row + 1, self.col + 1)
    }
}

/// Operations that read or write cell content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataOp {
    /// Text as written in the script, still quoted and escaped
    Set(String),
    Clear,
    Swap(Target),
    Sum(Target),
    Avg(Target),
    Count(Target),
    Len(Target),
}

impl DataOp {
    fn parse(fragment: &str) -> Result<Self> {
        if fragment == "clear" {
            return Ok(DataOp::Clear);
        }
        if let Some(text) = fragment.strip_prefix("set ") {
            return Ok(DataOp::Set(text.to_string()));
        }
        let (name, argument) =
            split_targeted(fragment).ok_or_else(|| Error::UnknownCommand(fragment.to_string()))?;
        let target = Target::parse(argument, fragment)?;
        Ok(match name {
            "swap" => DataOp::Swap(target),
            "sum" => DataOp::Sum(target),
            "avg" => DataOp::Avg(target),
            "count" => DataOp::Count(target),
            "len" => DataOp::Len(target),
            _ => return Err(Error::UnknownCommand(fragment.to_string())),
        })
    }

    pub fn target(&self) -> Option<Target> {
        match self {
            DataOp::Set(_) | DataOp::Clear => None,
            DataOp::Swap(t)
            | DataOp::Sum(t)
            | DataOp::Avg(t)
            | DataOp::Count(t)
            | DataOp::Len(t) => Some(*t),
        }
    }
}

impl fmt::Display for DataOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataOp::Set(text) => write!(f, "set {}", text),
            DataOp::Clear => write!(f, "clear"),
            DataOp::Swap(t) => write!(f, "swap {}", t),
            DataOp::Sum(t) => write!(f, "sum {}", t),
            DataOp::Avg(t) => write!(f, "avg {}", t),
            DataOp::Count(t) => write!(f, "count {}", t),
            DataOp::Len(t) => write!(f, "len {}", t),
        }
    }
}

/// Operations on the registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableOp {
    Define(Register),
    Use(Register),
    Increment(Register),
    CaptureSelection,
}

impl VariableOp {
    fn parse(fragment: &str) -> Result<Self> {
        if fragment == "[set]" {
            return Ok(VariableOp::CaptureSelection);
        }
        let unknown = || Error::UnknownCommand(fragment.to_string());
        let register = fragment
            .chars()
            .last()
            .and_then(Register::from_digit)
            .ok_or_else(unknown)?;
        match fragment.get(..3) {
            Some("def") => Ok(VariableOp::Define(register)),
            Some("use") => Ok(VariableOp::Use(register)),
            Some("inc") => Ok(VariableOp::Increment(register)),
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for VariableOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableOp::Define(r) => write!(f, "def {}", r),
            VariableOp::Use(r) => write!(f, "use {}", r),
            VariableOp::Increment(r) => write!(f, "inc {}", r),
            VariableOp::CaptureSelection => write!(f, "[set]"),
        }
    }
}

/// A parsed command bound to the selection it operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Structural {
        kind: StructuralKind,
        selection: SelectionId,
    },
    Data {
        op: DataOp,
        selection: SelectionId,
    },
    Variable {
        op: VariableOp,
        selection: SelectionId,
    },
}

impl Command {
    pub fn selection(&self) -> SelectionId {
        match self {
            Command::Structural { selection, .. }
            | Command::Data { selection, .. }
            | Command::Variable { selection, .. } => *selection,
        }
    }

    /// Explicit target coordinate, for commands that take one
    pub fn target(&self) -> Option<Target> {
        match self {
            Command::Data { op, .. } => op.target(),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Structural { kind, .. } => write!(f, "{}", kind.keyword()),
            Command::Data { op, .. } => op.fmt(f),
            Command::Variable { op, .. } => op.fmt(f),
        }
    }
}

/// A fully parsed script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    selections: Vec<Selection>,
    commands: Vec<Command>,
}

impl Call {
    /// Parse a whole script; any invalid fragment rejects it
    pub fn parse(script: &str) -> Result<Self> {
        let mut call = Call {
            selections: vec![Selection::Fixed(Region::Cell { row: 0, col: 0 })],
            commands: Vec::new(),
        };

        let mut fragments = 0;
        for fragment in script.split(';').map(str::trim).filter(|f| !f.is_empty()) {
            fragments += 1;
            call.push_fragment(fragment)?;
        }

        if fragments == 0 {
            return Err(Error::EmptyScript);
        }
        Ok(call)
    }

    fn push_fragment(&mut self, fragment: &str) -> Result<()> {
        let kind = classify(fragment).ok_or_else(|| Error::UnknownCommand(fragment.to_string()))?;
        let current = self.selections.len() - 1;

        match kind {
            FragmentKind::Selection => {
                let selection = Selection::parse(fragment, current)?;
                self.selections.push(selection);
            }
            FragmentKind::Structural => {
                let kind = StructuralKind::from_keyword(fragment)
                    .ok_or_else(|| Error::UnknownCommand(fragment.to_string()))?;
                self.commands.push(Command::Structural {
                    kind,
                    selection: current,
                });
            }
            FragmentKind::Data => self.commands.push(Command::Data {
                op: DataOp::parse(fragment)?,
                selection: current,
            }),
            FragmentKind::Variable => self.commands.push(Command::Variable {
                op: VariableOp::parse(fragment)?,
                selection: current,
            }),
        }
        Ok(())
    }

    /// Declared selections; index 0 is the implicit `[1,1]`
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn selection(&self, id: SelectionId) -> Option<&Selection> {
        self.selections.get(id)
    }
}

impl FromStr for Call {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
