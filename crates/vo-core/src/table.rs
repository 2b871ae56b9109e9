//! Row/column result tables.
//!
//! A [`ResultTable`] is the in-memory form of one VOTable `TABLE`: column
//! metadata from its `FIELD`s and string cells from its data block. Cells are
//! `None` when the source had no value.
//!
//! # Examples
//!
//! ```
//! use vo_core::{ColumnInfo, ResultTable};
//!
//! let table = ResultTable::new(
//!     vec![ColumnInfo::named("ID"), ColumnInfo::named("semantics")],
//!     vec![vec![Some("ivo://x?1".to_owned()), Some("#this".to_owned())]],
//! );
//!
//! assert_eq!(table.row_count(), 1);
//! assert_eq!(table.cell(0, 1), Some("#this"));
//! assert_eq!(table.cell(3, 0), None);
//! ```

use serde::{Deserialize, Serialize};

/// Metadata of one table column, taken from a VOTable `FIELD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name (`name` attribute).
    pub name: String,

    /// XML identifier (`ID` attribute), if any.
    pub id: Option<String>,

    /// Unified Content Descriptor.
    pub ucd: Option<String>,

    /// Data-model type.
    pub utype: Option<String>,

    /// VOTable datatype (`char`, `double`, ...).
    pub datatype: Option<String>,

    /// Physical unit.
    pub unit: Option<String>,
}

impl ColumnInfo {
    /// Creates column metadata carrying only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the XML identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A parsed table: columns plus rows of optional string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    /// Table name, when the source declared one.
    pub name: Option<String>,

    /// Column metadata in declaration order.
    pub columns: Vec<ColumnInfo>,

    /// Row data. Rows may be shorter than `columns`; missing cells read as `None`.
    pub rows: Vec<Vec<Option<String>>>,
}

impl ResultTable {
    /// Creates an unnamed table.
    #[must_use]
    pub fn new(columns: Vec<ColumnInfo>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self {
            name: None,
            columns,
            rows,
        }
    }

    /// Builds a table from column names and string rows. Empty strings become
    /// `None`, matching how an empty `<TD/>` is read.
    ///
    /// # Examples
    ///
    /// ```
    /// use vo_core::ResultTable;
    ///
    /// let table = ResultTable::from_strings(&["ID", "error_message"], &[&["x1", ""]]);
    /// assert_eq!(table.cell(0, 0), Some("x1"));
    /// assert_eq!(table.cell(0, 1), None);
    /// ```
    #[must_use]
    pub fn from_strings(columns: &[&str], rows: &[&[&str]]) -> Self {
        let columns = columns.iter().map(|c| ColumnInfo::named(*c)).collect();
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| (!cell.is_empty()).then(|| (*cell).to_owned()))
                    .collect()
            })
            .collect();
        Self::new(columns, rows)
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the cell at (`row`, `column`), or `None` when out of range or
    /// empty.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(Option::as_deref)
    }

    /// Finds the column a `FIELDref`-style reference points at.
    ///
    /// The reference is matched against column `ID`s first and then against
    /// column names, which is how result tables without explicit `ID`s are
    /// addressed in practice.
    #[must_use]
    pub fn find_column_by_ref(&self, reference: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.id.as_deref() == Some(reference))
            .or_else(|| self.columns.iter().position(|c| c.name == reference))
    }
}
