//! Data operations: set, clear, swap, sum, avg, count and len

use crate::error::Result;
use crate::script::{DataOp, Target};
use crate::selection::Region;
use crate::table::{format_number, numeric_value, Table};
use crate::text::unescape;

/// Run a data operation over a resolved region
pub fn apply(table: &mut Table, op: &DataOp, region: &Region) -> Result<()> {
    match op {
        DataOp::Set(text) => fill(table, region, &unescape(text)),
        DataOp::Clear => fill(table, region, ""),
        DataOp::Swap(target) => swap(table, region, *target),
        DataOp::Sum(target) => {
            let (sum, _) = numeric_sum(table, region);
            store(table, *target, &format_number(sum))
        }
        DataOp::Avg(target) => {
            let (sum, count) = numeric_sum(table, region);
            store(table, *target, &format_number(sum / count as f64))
        }
        DataOp::Count(target) => {
            let non_empty = region
                .cells(table)
                .into_iter()
                .filter(|&(r, c)| table.get(r, c).is_some_and(|s| !s.is_empty()))
                .count();
            store(table, *target, &non_empty.to_string())
        }
        DataOp::Len(target) => {
            // Characters, not bytes
            let length = region
                .representative(table)
                .and_then(|(r, c)| table.get(r, c))
                .map_or(0, |s| s.chars().count());
            store(table, *target, &length.to_string())
        }
    }
}

/// Write the same value into every covered cell
pub fn fill(table: &mut Table, region: &Region, value: &str) -> Result<()> {
    for (row, col) in region.cells(table) {
        table.set(row, col, value)?;
    }
    Ok(())
}

/// Swap each covered cell with the target in turn
///
/// The swaps are sequential, so over several cells the target's original
/// content walks through the region rather than being copied into it.
fn swap(table: &mut Table, region: &Region, target: Target) -> Result<()> {
    for cell in region.cells(table) {
        table.swap_cells(cell, (target.row, target.col))?;
    }
    Ok(())
}

/// Sum of the numeric cells in a region and how many there were
fn numeric_sum(table: &Table, region: &Region) -> (f64, usize) {
    region
        .cells(table)
        .into_iter()
        .filter_map(|(r, c)| table.get(r, c).and_then(numeric_value))
        .fold((0.0, 0), |(sum, count), value| (sum + value, count + 1))
}

fn store(table: &mut Table, target: Target, value: &str) -> Result<()> {
    table.set(target.row, target.col, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Bound;

    fn table(rows: &[&[&str]]) -> Table {
        Table::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn at(row: usize, col: usize) -> Target {
        Target { row, col }
    }

    fn square() -> Region {
        Region::Box {
            row1: 0,
            col1: 0,
            row2: Bound::At(1),
            col2: Bound::At(1),
        }
    }

    #[test]
    fn test_set_and_clear() {
        let mut t = table(&[&["a", "b"], &["c", "d"]]);
        apply(&mut t, &DataOp::Set("\"x y\"".to_string()), &Region::Row(0)).unwrap();
        assert_eq!(t.rows()[0].cells, vec!["x y", "x y"]);

        apply(&mut t, &DataOp::Clear, &Region::Col(1)).unwrap();
        assert_eq!(t.get(0, 1), Some(""));
        assert_eq!(t.get(1, 1), Some(""));
        assert_eq!(t.get(1, 0), Some("c"));
    }

    #[test]
    fn test_sum_and_avg() {
        let mut t = table(&[&["1", "2", ""], &["3", "4", ""]]);
        apply(&mut t, &DataOp::Sum(at(0, 2)), &square()).unwrap();
        assert_eq!(t.get(0, 2), Some("10"));
        apply(&mut t, &DataOp::Avg(at(1, 2)), &square()).unwrap();
        assert_eq!(t.get(1, 2), Some("2.5"));
    }

    #[test]
    fn test_avg_skips_non_numeric() {
        let mut t = table(&[&["4", "n/a", "8", ""]]);
        let region = Region::Box {
            row1: 0,
            col1: 0,
            row2: Bound::At(0),
            col2: Bound::At(2),
        };
        apply(&mut t, &DataOp::Avg(at(0, 3)), &region).unwrap();
        assert_eq!(t.get(0, 3), Some("6"));
    }

    #[test]
    fn test_count() {
        let mut t = table(&[&["a", "", "c"], &["", "", ""]]);
        apply(&mut t, &DataOp::Count(at(1, 0)), &Region::Row(0)).unwrap();
        assert_eq!(t.get(1, 0), Some("2"));
    }

    #[test]
    fn test_len_uses_representative_cell() {
        let mut t = table(&[&["a", "bb", "ccc"], &["dddd", "", ""]]);
        apply(&mut t, &DataOp::Len(at(1, 1)), &Region::Row(0)).unwrap();
        assert_eq!(t.get(1, 1), Some("3"));
        apply(&mut t, &DataOp::Len(at(1, 2)), &Region::Col(0)).unwrap();
        assert_eq!(t.get(1, 2), Some("4"));
    }

    #[test]
    fn test_len_over_box_uses_second_corner() {
        let mut t = table(&[&["a", "bb", ""], &["ccc", "dddd", ""]]);
        apply(&mut t, &DataOp::Len(at(0, 2)), &square()).unwrap();
        assert_eq!(t.get(0, 2), Some("4"));

        let open = Region::Box {
            row1: 0,
            col1: 0,
            row2: Bound::Open,
            col2: Bound::At(0),
        };
        apply(&mut t, &DataOp::Len(at(1, 2)), &open).unwrap();
        assert_eq!(t.get(1, 2), Some("3"));
    }

    #[test]
    fn test_len_counts_characters() {
        let mut t = table(&[&["héllo", ""]]);
        apply(&mut t, &DataOp::Len(at(0, 1)), &Region::Cell { row: 0, col: 0 }).unwrap();
        assert_eq!(t.get(0, 1), Some("5"));
    }

    #[test]
    fn test_avg_and_sum_without_numbers() {
        let mut t = table(&[&["x", "", "y", ""]]);
        let region = Region::Box {
            row1: 0,
            col1: 0,
            row2: Bound::At(0),
            col2: Bound::At(1),
        };
        apply(&mut t, &DataOp::Avg(at(0, 2)), &region).unwrap();
        assert_eq!(t.get(0, 2), Some("nan"));
        apply(&mut t, &DataOp::Sum(at(0, 3)), &region).unwrap();
        assert_eq!(t.get(0, 3), Some("0"));
    }

    #[test]
    fn test_swap_is_sequential() {
        let mut t = table(&[&["a", "b", "c"], &["t", "", ""]]);
        apply(&mut t, &DataOp::Swap(at(1, 0)), &Region::Row(0)).unwrap();
        // a<->t, then b<->a, then c<->b
        assert_eq!(t.rows()[0].cells, vec!["t", "a", "b"]);
        assert_eq!(t.get(1, 0), Some("c"));
    }
}
