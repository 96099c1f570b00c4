//! Selections: bracketed addressing syntax and its resolution to coordinates
//!
//! Script coordinates are 1-based; everything in this module is 0-based and
//! only converted back when displayed.

use crate::error::{Error, Result};
use crate::table::{numeric_value, Table};
use crate::text::{is_single_word, is_subsequence, unescape};
use crate::variables::VariableStore;
use std::fmt;

/// Position of a selection in the parsed script's selection list
pub type SelectionId = usize;

/// Second corner of a box: a fixed index or the table's current edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    At(usize),
    Open,
}

impl Bound {
    /// The concrete last index for a table dimension of `count`
    pub fn last(self, count: usize) -> Option<usize> {
        match self {
            Bound::At(index) => Some(index),
            Bound::Open => count.checked_sub(1),
        }
    }

    /// One past the last index, `count` for an open bound
    fn end(self, count: usize) -> usize {
        match self {
            Bound::At(index) => index + 1,
            Bound::Open => count,
        }
    }
}

/// A concrete set of coordinates, ready for a command to run on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Cell { row: usize, col: usize },
    Row(usize),
    Col(usize),
    Box {
        row1: usize,
        col1: usize,
        row2: Bound,
        col2: Bound,
    },
    Table,
}

impl Region {
    /// Every covered coordinate, in row-major order
    pub fn cells(&self, table: &Table) -> Vec<(usize, usize)> {
        let rows = table.row_count();
        let cols = table.column_count();
        match *self {
            Region::Cell { row, col } => vec![(row, col)],
            Region::Row(row) => (0..cols).map(|c| (row, c)).collect(),
            Region::Col(col) => (0..rows).map(|r| (r, col)).collect(),
            Region::Box {
                row1,
                col1,
                row2,
                col2,
            } => rectangle(row1..row2.end(rows), col1..col2.end(cols)),
            Region::Table => rectangle(0..rows, 0..cols),
        }
    }

    /// The single coordinate this region names, if it names exactly one
    pub fn single_cell(&self) -> Option<(usize, usize)> {
        match *self {
            Region::Cell { row, col } => Some((row, col)),
            _ => None,
        }
    }

    /// The one cell `len` measures: the far end of the region
    pub fn representative(&self, table: &Table) -> Option<(usize, usize)> {
        let last_row = table.row_count().checked_sub(1);
        let last_col = table.column_count().checked_sub(1);
        match *self {
            Region::Cell { row, col } => Some((row, col)),
            Region::Row(row) => Some((row, last_col?)),
            Region::Col(col) => Some((last_row?, col)),
            Region::Box { row2, col2, .. } => Some((
                row2.last(table.row_count())?,
                col2.last(table.column_count())?,
            )),
            Region::Table => Some((last_row?, last_col?)),
        }
    }

    /// Smallest (rows, columns) a table needs to contain this region
    pub fn extent(&self) -> (usize, usize) {
        match *self {
            Region::Cell { row, col } => (row + 1, col + 1),
            Region::Row(row) => (row + 1, 0),
            Region::Col(col) => (0, col + 1),
            Region::Box {
                row1,
                col1,
                row2,
                col2,
            } => {
                let rows = match row2 {
                    Bound::At(r) => r.max(row1) + 1,
                    Bound::Open => row1 + 1,
                };
                let cols = match col2 {
                    Bound::At(c) => c.max(col1) + 1,
                    Bound::Open => col1 + 1,
                };
                (rows, cols)
            }
            Region::Table => (0, 0),
        }
    }
}

fn rectangle(
    rows: std::ops::Range<usize>,
    cols: std::ops::Range<usize>,
) -> Vec<(usize, usize)> {
    rows.flat_map(|r| cols.clone().map(move |c| (r, c)))
        .collect()
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::At(index) => write!(f, "{}", index + 1),
            Bound::Open => write!(f, "-"),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Cell { row, col } => write!(f, "[{},{}]", row + 1, col + 1),
            Region::Row(row) => write!(f, "[{},_]", row + 1),
            Region::Col(col) => write!(f, "[_,{}]", col + 1),
            Region::Box {
                row1,
                col1,
                row2,
                col2,
            } => write!(f, "[{},{},{},{}]", row1 + 1, col1 + 1, row2, col2),
            Region::Table => write!(f, "[_,_]"),
        }
    }
}

/// A selection as declared in a script
///
/// `Min`, `Max` and `Substring` refer to the selection declared just before
/// them and are only turned into a `Region` when a command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Fixed(Region),
    Min(SelectionId),
    Max(SelectionId),
    Substring {
        pattern: String,
        reference: SelectionId,
    },
    RestoredVariable,
}

impl Selection {
    /// Parse a bracketed selection; `preceding` is the selection declared before it
    pub fn parse(fragment: &str, preceding: SelectionId) -> Result<Self> {
        let invalid = || Error::InvalidSelection(fragment.to_string());
        let inner = fragment
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(invalid)?;

        match inner {
            "_" => return Ok(Selection::RestoredVariable),
            "min" => return Ok(Selection::Min(preceding)),
            "max" => return Ok(Selection::Max(preceding)),
            _ => {}
        }

        if let Some(pattern) = inner.strip_prefix("find ") {
            if pattern.is_empty() || !is_single_word(pattern) {
                return Err(invalid());
            }
            return Ok(Selection::Substring {
                pattern: pattern.to_string(),
                reference: preceding,
            });
        }

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let region = match parts.as_slice() {
            [row, col] => {
                match (axis(row, fragment)?, axis(col, fragment)?) {
                    (Some(row), Some(col)) => Region::Cell { row, col },
                    (Some(row), None) => Region::Row(row),
                    (None, Some(col)) => Region::Col(col),
                    (None, None) => Region::Table,
                }
            }
            [row1, col1, row2, col2] => {
                let row1 = axis(row1, fragment)?.ok_or_else(invalid)?;
                let col1 = axis(col1, fragment)?.ok_or_else(invalid)?;
                let row2 = bound(row2, fragment)?;
                let col2 = bound(col2, fragment)?;
                let backwards = matches!(row2, Bound::At(r) if r < row1)
                    || matches!(col2, Bound::At(c) if c < col1);
                if backwards {
                    return Err(Error::invalid_argument(
                        fragment,
                        "second corner precedes the first",
                    ));
                }
                Region::Box {
                    row1,
                    col1,
                    row2,
                    col2,
                }
            }
            _ => return Err(invalid()),
        };
        Ok(Selection::Fixed(region))
    }

    /// Whether this selection depends on table content or stored state
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Selection::Fixed(_))
    }
}

/// `_` for a whole axis, otherwise a coordinate
fn axis(text: &str, fragment: &str) -> Result<Option<usize>> {
    if text == "_" {
        Ok(None)
    } else {
        coordinate(text, fragment, || Error::InvalidSelection(fragment.to_string())).map(Some)
    }
}

/// `-` for an open box edge, otherwise a coordinate
fn bound(text: &str, fragment: &str) -> Result<Bound> {
    if text == "-" {
        Ok(Bound::Open)
    } else {
        coordinate(text, fragment, || Error::InvalidSelection(fragment.to_string())).map(Bound::At)
    }
}

/// Parse a 1-based coordinate into a 0-based index
///
/// `not_a_number` builds the error for text that is not an integer at all.
pub(crate) fn coordinate(
    text: &str,
    fragment: &str,
    not_a_number: impl FnOnce() -> Error,
) -> Result<usize> {
    let value: i64 = text.trim().parse().map_err(|_| not_a_number())?;
    if value < 0 {
        return Err(Error::invalid_argument(
            fragment,
            format!("negative value {}", value),
        ));
    }
    if value == 0 {
        return Err(Error::invalid_argument(fragment, "coordinates start at 1"));
    }
    usize::try_from(value - 1).map_err(|_| Error::invalid_argument(fragment, "value too large"))
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Fixed(region) => region.fmt(f),
            Selection::Min(_) => write!(f, "[min]"),
            Selection::Max(_) => write!(f, "[max]"),
            Selection::Substring { pattern, .. } => write!(f, "[find {}]", pattern),
            Selection::RestoredVariable => write!(f, "[_]"),
        }
    }
}

/// Turns selections into regions against the current table
pub struct Resolver<'a> {
    selections: &'a [Selection],
    table: &'a Table,
    variables: &'a VariableStore,
}

impl<'a> Resolver<'a> {
    pub fn new(selections: &'a [Selection], table: &'a Table, variables: &'a VariableStore) -> Self {
        Self {
            selections,
            table,
            variables,
        }
    }

    /// Resolve a selection to concrete coordinates
    ///
    /// `Min`, `Max` and `Substring` always resolve to a single cell.
    pub fn resolve(&self, id: SelectionId) -> Result<Region> {
        let selection = self
            .selections
            .get(id)
            .ok_or_else(|| Error::InvalidSelection(format!("#{}", id)))?;

        match selection {
            Selection::Fixed(region) => Ok(*region),
            Selection::Min(reference) => {
                self.extreme(selection, *reference, |candidate, best| candidate < best)
            }
            Selection::Max(reference) => {
                self.extreme(selection, *reference, |candidate, best| candidate > best)
            }
            Selection::Substring { pattern, reference } => {
                self.find(selection, pattern, *reference)
            }
            Selection::RestoredVariable => self
                .variables
                .active_selection()
                .ok_or(Error::NoStoredSelection),
        }
    }

    /// First numeric cell that beats every earlier one under `better`
    fn extreme(
        &self,
        selection: &Selection,
        reference: SelectionId,
        better: impl Fn(f64, f64) -> bool,
    ) -> Result<Region> {
        let scope = self.resolve_reference(reference)?;
        let mut best: Option<(f64, (usize, usize))> = None;
        for (row, col) in scope.cells(self.table) {
            let Some(value) = self.table.get(row, col).and_then(numeric_value) else {
                continue;
            };
            if best.map_or(true, |(current, _)| better(value, current)) {
                best = Some((value, (row, col)));
            }
        }
        let (_, (row, col)) = best.ok_or_else(|| Error::NoMatch(format!("{} over {}", selection, scope)))?;
        Ok(Region::Cell { row, col })
    }

    /// Last cell whose content contains the pattern as a subsequence
    fn find(&self, selection: &Selection, pattern: &str, reference: SelectionId) -> Result<Region> {
        let scope = self.resolve_reference(reference)?;
        let pattern = unescape(pattern);
        scope
            .cells(self.table)
            .into_iter()
            .filter(|&(row, col)| {
                self.table
                    .get(row, col)
                    .is_some_and(|content| is_subsequence(&pattern, content))
            })
            .last()
            .map(|(row, col)| Region::Cell { row, col })
            .ok_or_else(|| Error::NoMatch(format!("{} over {}", selection, scope)))
    }

    fn resolve_reference(&self, reference: SelectionId) -> Result<Region> {
        let region = self.resolve(reference)?;
        log::trace!("reference #{} resolved to {}", reference, region);
        Ok(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Table {
        Table::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn fixed(fragment: &str) -> Region {
        match Selection::parse(fragment, 0).unwrap() {
            Selection::Fixed(region) => region,
            other => panic!("expected a fixed selection, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_static_shapes() {
        assert_eq!(fixed("[2,3]"), Region::Cell { row: 1, col: 2 });
        assert_eq!(fixed("[2,_]"), Region::Row(1));
        assert_eq!(fixed("[_,3]"), Region::Col(2));
        assert_eq!(fixed("[_,_]"), Region::Table);
        assert_eq!(
            fixed("[1,2,3,4]"),
            Region::Box {
                row1: 0,
                col1: 1,
                row2: Bound::At(2),
                col2: Bound::At(3)
            }
        );
        assert_eq!(
            fixed("[2,1,-,-]"),
            Region::Box {
                row1: 1,
                col1: 0,
                row2: Bound::Open,
                col2: Bound::Open
            }
        );
    }

    #[test]
    fn test_parse_dynamic_shapes() {
        assert_eq!(Selection::parse("[_]", 3).unwrap(), Selection::RestoredVariable);
        assert_eq!(Selection::parse("[min]", 3).unwrap(), Selection::Min(3));
        assert_eq!(Selection::parse("[max]", 1).unwrap(), Selection::Max(1));
        assert_eq!(
            Selection::parse("[find ab]", 2).unwrap(),
            Selection::Substring {
                pattern: "ab".to_string(),
                reference: 2
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_selections() {
        assert!(matches!(
            Selection::parse("[a,b]", 0),
            Err(Error::InvalidSelection(_))
        ));
        assert!(matches!(
            Selection::parse("[-1,2]", 0),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            Selection::parse("[0,2]", 0),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            Selection::parse("[3,3,1,4]", 0),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(Selection::parse("[_,1,2,3]", 0).is_err());
        assert!(Selection::parse("[find two words]", 0).is_err());
        assert!(Selection::parse("[1,2,3]", 0).is_err());
    }

    #[test]
    fn test_region_cells_row_major() {
        let t = table(&[&["a", "b", "c"], &["d", "e", "f"], &["g", "h", "i"]]);
        assert_eq!(Region::Row(1).cells(&t), vec![(1, 0), (1, 1), (1, 2)]);
        assert_eq!(Region::Col(2).cells(&t), vec![(0, 2), (1, 2), (2, 2)]);
        let open = Region::Box {
            row1: 1,
            col1: 1,
            row2: Bound::Open,
            col2: Bound::Open,
        };
        assert_eq!(open.cells(&t), vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
        assert_eq!(Region::Table.cells(&t).len(), 9);
    }

    #[test]
    fn test_representative() {
        let t = table(&[&["a", "b", "c"], &["d", "e", "f"]]);
        assert_eq!(Region::Row(0).representative(&t), Some((0, 2)));
        assert_eq!(Region::Col(1).representative(&t), Some((1, 1)));
        assert_eq!(Region::Table.representative(&t), Some((1, 2)));
        assert_eq!(Region::Table.representative(&Table::new()), None);
    }

    #[test]
    fn test_extent() {
        assert_eq!(Region::Cell { row: 4, col: 1 }.extent(), (5, 2));
        assert_eq!(Region::Row(2).extent(), (3, 0));
        let open = Region::Box {
            row1: 1,
            col1: 3,
            row2: Bound::Open,
            col2: Bound::At(5),
        };
        assert_eq!(open.extent(), (2, 6));
    }

    #[test]
    fn test_resolve_min_and_max() {
        let t = table(&[&["5"], &["2"], &["8"], &["2"]]);
        let selections = vec![
            Selection::Fixed(Region::Col(0)),
            Selection::Min(0),
            Selection::Max(0),
        ];
        let vars = VariableStore::new();
        let resolver = Resolver::new(&selections, &t, &vars);
        assert_eq!(resolver.resolve(1).unwrap(), Region::Cell { row: 1, col: 0 });
        assert_eq!(resolver.resolve(2).unwrap(), Region::Cell { row: 2, col: 0 });
    }

    #[test]
    fn test_resolve_min_without_numbers() {
        let t = table(&[&["a"], &["b"], &[""]]);
        let selections = vec![Selection::Fixed(Region::Col(0)), Selection::Min(0)];
        let vars = VariableStore::new();
        let err = Resolver::new(&selections, &t, &vars).resolve(1).unwrap_err();
        assert!(matches!(err, Error::NoMatch(_)));
    }

    #[test]
    fn test_resolve_find_takes_last_match() {
        let t = table(&[&["apple", "grape"], &["pear", "banana"]]);
        let selections = vec![
            Selection::Fixed(Region::Table),
            Selection::Substring {
                pattern: "er".to_string(),
                reference: 0,
            },
            Selection::Substring {
                pattern: "zz".to_string(),
                reference: 0,
            },
        ];
        let vars = VariableStore::new();
        let resolver = Resolver::new(&selections, &t, &vars);
        assert_eq!(resolver.resolve(1).unwrap(), Region::Cell { row: 1, col: 0 });
        assert!(matches!(resolver.resolve(2), Err(Error::NoMatch(_))));
    }

    #[test]
    fn test_resolve_nested_reference() {
        let t = table(&[&["3", "1"], &["9", "x1"]]);
        let selections = vec![
            Selection::Fixed(Region::Table),
            Selection::Max(0),
            Selection::Min(1),
        ];
        let vars = VariableStore::new();
        let resolver = Resolver::new(&selections, &t, &vars);
        assert_eq!(resolver.resolve(2).unwrap(), Region::Cell { row: 1, col: 0 });
    }

    #[test]
    fn test_resolve_restored_variable() {
        let t = table(&[&["a"]]);
        let selections = vec![Selection::RestoredVariable];
        let mut vars = VariableStore::new();
        assert!(matches!(
            Resolver::new(&selections, &t, &vars).resolve(0),
            Err(Error::NoStoredSelection)
        ));
        vars.capture(Region::Row(0));
        assert_eq!(
            Resolver::new(&selections, &t, &vars).resolve(0).unwrap(),
            Region::Row(0)
        );
    }

    #[test]
    fn test_display_round_trips_syntax() {
        for text in ["[2,3]", "[2,_]", "[_,3]", "[_,_]", "[1,2,-,4]"] {
            assert_eq!(Selection::parse(text, 0).unwrap().to_string(), text);
        }
        assert_eq!(Selection::parse("[find x]", 0).unwrap().to_string(), "[find x]");
    }
}
