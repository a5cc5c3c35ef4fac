//! Cell edits supplied on the command line
//!
//! An edit token has the form `"<column>,<row>,<value>"`. A batch of tokens is
//! applied in order and either succeeds as a whole or is discarded.

use crate::error::{Error, Result};
use crate::table::{CellValue, Table};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Why a single edit token was rejected
///
/// Callers only ever see [`Error::InvalidEdit`]; the detail goes to the debug log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("expected 3 comma-separated components, found {0}")]
    WrongArity(usize),

    #[error("{component} index '{value}' is not a non-negative integer")]
    BadIndex {
        component: &'static str,
        value: String,
    },

    #[error("row {row} out of range (table has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("column {column} out of range (row {row} has {columns} cells)")]
    ColumnOutOfRange {
        column: usize,
        row: usize,
        columns: usize,
    },
}

/// A single edit to a cell
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    /// Column index (0-based)
    pub column: usize,
    /// Row index (0-based)
    pub row: usize,
    /// New value, type-detected like a CSV field
    pub value: CellValue,
}

impl Edit {
    /// Create a new edit
    pub fn new(column: usize, row: usize, value: impl Into<CellValue>) -> Self {
        Self {
            column,
            row,
            value: value.into(),
        }
    }

    /// Write the value into `table`, checking both indices first
    pub fn apply(&self, table: &mut Table) -> std::result::Result<(), EditError> {
        let rows = table.row_count();
        let row = table
            .rows
            .get_mut(self.row)
            .ok_or(EditError::RowOutOfRange {
                row: self.row,
                rows,
            })?;

        let columns = row.len();
        let cell = row
            .cells
            .get_mut(self.column)
            .ok_or(EditError::ColumnOutOfRange {
                column: self.column,
                row: self.row,
                columns,
            })?;

        *cell = self.value.clone();
        Ok(())
    }
}

impl FromStr for Edit {
    type Err = EditError;

    fn from_str(token: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = token.split(',').map(str::trim).collect();
        let [column, row, value] = parts.as_slice() else {
            return Err(EditError::WrongArity(parts.len()));
        };

        Ok(Edit {
            column: parse_index("column", column)?,
            row: parse_index("row", row)?,
            value: CellValue::parse(value),
        })
    }
}

fn parse_index(component: &'static str, value: &str) -> std::result::Result<usize, EditError> {
    value.parse().map_err(|_| EditError::BadIndex {
        component,
        value: value.to_string(),
    })
}

/// Apply a batch of edit tokens to `table`, in order
///
/// The table is taken by value: if any token is malformed or out of range the
/// partially edited table is dropped and [`Error::InvalidEdit`] is returned.
pub fn apply_edits<S: AsRef<str>>(mut table: Table, tokens: &[S]) -> Result<Table> {
    for (i, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        let applied = token
            .parse::<Edit>()
            .and_then(|edit| edit.apply(&mut table));

        if let Err(e) = applied {
            debug!(index = i, token, reason = %e, "rejected edit batch");
            return Err(Error::InvalidEdit);
        }
    }

    debug!(edits = tokens.len(), "applied edit batch");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        vec![vec!["x", "1"], vec!["y", "2"]].into_iter().collect()
    }

    #[test]
    fn test_edit_creation() {
        let edit = Edit::new(1, 2, "NewValue");
        assert_eq!(edit.column, 1);
        assert_eq!(edit.row, 2);
        assert_eq!(edit.value, CellValue::from("NewValue"));
    }

    #[test]
    fn test_parse_trims_components() {
        let edit: Edit = " 1 , 0 ,  hello ".parse().unwrap();
        assert_eq!(edit, Edit::new(1, 0, "hello"));
    }

    #[test]
    fn test_parse_detects_value_type() {
        let edit: Edit = "1,0,99".parse().unwrap();
        assert_eq!(edit.value, CellValue::Integer(99));

        let edit: Edit = "1,0,".parse().unwrap();
        assert_eq!(edit.value, CellValue::Empty);
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert_eq!("0,1".parse::<Edit>(), Err(EditError::WrongArity(2)));
        assert_eq!("0,1,a,b".parse::<Edit>(), Err(EditError::WrongArity(4)));
    }

    #[test]
    fn test_parse_rejects_bad_indices() {
        assert!(matches!(
            "-1,0,x".parse::<Edit>(),
            Err(EditError::BadIndex {
                component: "column",
                ..
            })
        ));
        assert!(matches!(
            "0,one,x".parse::<Edit>(),
            Err(EditError::BadIndex { component: "row", .. })
        ));
    }

    #[test]
    fn test_apply_single_edit() {
        let table = apply_edits(sample(), &["0,1,Z"]).unwrap();
        let expected: Table = vec![
            vec![CellValue::from("x"), CellValue::from("1")],
            vec![CellValue::from("Z"), CellValue::from("2")],
        ]
        .into_iter()
        .collect();
        assert_eq!(table, expected);
    }

    #[test]
    fn test_last_write_wins() {
        let table = apply_edits(sample(), &["1,0,a", "1,0,b", "0,0,c"]).unwrap();
        assert_eq!(table.get(0, 1), Some(&CellValue::from("b")));
        assert_eq!(table.get(0, 0), Some(&CellValue::from("c")));
    }

    #[test]
    fn test_out_of_range_invalidates_batch() {
        assert!(matches!(
            apply_edits(sample(), &["0,0,ok", "0,2,x"]),
            Err(Error::InvalidEdit)
        ));
        assert!(matches!(
            apply_edits(sample(), &["2,0,x"]),
            Err(Error::InvalidEdit)
        ));
    }

    #[test]
    fn test_column_bound_is_per_row() {
        let ragged: Table = vec![vec!["a", "b", "c"], vec!["d"]].into_iter().collect();

        let table = apply_edits(ragged.clone(), &["2,0,z"]).unwrap();
        assert_eq!(table.get(0, 2), Some(&CellValue::from("z")));

        let err = Edit::new(2, 1, "z").apply(&mut ragged.clone()).unwrap_err();
        assert_eq!(
            err,
            EditError::ColumnOutOfRange {
                column: 2,
                row: 1,
                columns: 1
            }
        );
    }

    #[test]
    fn test_empty_batch_is_a_no_op() {
        let tokens: [&str; 0] = [];
        assert_eq!(apply_edits(sample(), &tokens).unwrap(), sample());
    }
}
