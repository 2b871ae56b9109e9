//! Read-only view over a DataLink links table.
//!
//! [`LinkTableView`] resolves which columns play which [`LinkColumn`] role
//! once, when it is built, and then answers per-row and per-semantics
//! lookups. A row that carries an `error_message` never yields a link: the
//! error is logged and the lookup answers `None`.
//!
//! # Examples
//!
//! ```
//! use vo_core::{LinkTableView, ResultTable};
//!
//! let table = ResultTable::from_strings(
//!     &["ID", "semantics", "access_url", "error_message"],
//!     &[
//!         &["x1", "#this", "http://a", ""],
//!         &["x2", "#preview", "http://b", "failed"],
//!     ],
//! );
//! let links = LinkTableView::new(table);
//!
//! assert_eq!(links.access_url_for("#this"), Some("http://a"));
//! assert_eq!(links.access_url_for("#preview"), None);
//! assert_eq!(links.primary_link(), Ok("http://a"));
//! ```

use serde::Serialize;
use tracing::warn;

use crate::error::LinkError;
use crate::table::ResultTable;
use crate::types::{LinkColumn, Semantics};

/// Column index per role; `None` when the table lacks the column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkColumns {
    /// `ID`
    pub id: Option<usize>,
    /// `semantics`
    pub semantics: Option<usize>,
    /// `access_url`
    pub access_url: Option<usize>,
    /// `content_type`
    pub content_type: Option<usize>,
    /// `content_length`
    pub content_length: Option<usize>,
    /// `service_def`
    pub service_def: Option<usize>,
    /// `error_message`
    pub error_message: Option<usize>,
    /// `description`
    pub description: Option<usize>,
}

impl LinkColumns {
    /// Resolves roles from a table's column names. A later column claiming
    /// the same role replaces an earlier one.
    #[must_use]
    pub fn resolve(table: &ResultTable) -> Self {
        let mut columns = Self::default();
        for (index, info) in table.columns.iter().enumerate() {
            if let Some(role) = LinkColumn::from_column_name(&info.name) {
                *columns.slot_mut(role) = Some(index);
            }
        }
        columns
    }

    /// Index of the column playing `role`.
    #[must_use]
    pub const fn get(&self, role: LinkColumn) -> Option<usize> {
        match role {
            LinkColumn::Id => self.id,
            LinkColumn::Semantics => self.semantics,
            LinkColumn::AccessUrl => self.access_url,
            LinkColumn::ContentType => self.content_type,
            LinkColumn::ContentLength => self.content_length,
            LinkColumn::ServiceDef => self.service_def,
            LinkColumn::ErrorMessage => self.error_message,
            LinkColumn::Description => self.description,
        }
    }

    fn slot_mut(&mut self, role: LinkColumn) -> &mut Option<usize> {
        match role {
            LinkColumn::Id => &mut self.id,
            LinkColumn::Semantics => &mut self.semantics,
            LinkColumn::AccessUrl => &mut self.access_url,
            LinkColumn::ContentType => &mut self.content_type,
            LinkColumn::ContentLength => &mut self.content_length,
            LinkColumn::ServiceDef => &mut self.service_def,
            LinkColumn::ErrorMessage => &mut self.error_message,
            LinkColumn::Description => &mut self.description,
        }
    }
}

/// One row of a links table, borrowed from its view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRow<'a> {
    /// Row index in the table.
    pub row: usize,
    /// Dataset identifier.
    pub id: Option<&'a str>,
    /// Parsed semantics term.
    pub semantics: Option<Semantics>,
    /// Link target.
    pub access_url: Option<&'a str>,
    /// MIME type of the target.
    pub content_type: Option<&'a str>,
    /// Size of the target in bytes.
    pub content_length: Option<u64>,
    /// Reference to a service resource.
    pub service_def: Option<&'a str>,
    /// Error reported by the service for this row.
    pub error_message: Option<&'a str>,
    /// Free-text description.
    pub description: Option<&'a str>,
}

impl LinkRow<'_> {
    /// Returns `true` if the service reported an error for this row.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error_message.is_some()
    }
}

/// Links table with resolved column roles.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LinkTableView {
    table: ResultTable,
    columns: LinkColumns,
}

impl LinkTableView {
    /// Wraps a table, resolving column roles.
    #[must_use]
    pub fn new(table: ResultTable) -> Self {
        let columns = LinkColumns::resolve(&table);
        Self { table, columns }
    }

    /// The underlying table.
    #[must_use]
    pub fn table(&self) -> &ResultTable {
        &self.table
    }

    /// Resolved column indices.
    #[must_use]
    pub const fn columns(&self) -> &LinkColumns {
        &self.columns
    }

    /// Number of link rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    fn cell(&self, row: usize, role: LinkColumn) -> Option<&str> {
        let column = self.columns.get(role)?;
        self.table.cell(row, column).filter(|v| !v.trim().is_empty())
    }

    /// `ID` of `row`.
    #[must_use]
    pub fn id_at(&self, row: usize) -> Option<&str> {
        self.cell(row, LinkColumn::Id)
    }

    /// Raw `semantics` of `row`.
    #[must_use]
    pub fn semantics_at(&self, row: usize) -> Option<&str> {
        self.cell(row, LinkColumn::Semantics)
    }

    /// `access_url` of `row`.
    #[must_use]
    pub fn access_url_at(&self, row: usize) -> Option<&str> {
        self.cell(row, LinkColumn::AccessUrl)
    }

    /// `content_type` of `row`.
    #[must_use]
    pub fn content_type_at(&self, row: usize) -> Option<&str> {
        self.cell(row, LinkColumn::ContentType)
    }

    /// `content_length` of `row`, or `None` if it is not an unsigned integer.
    #[must_use]
    pub fn content_length_at(&self, row: usize) -> Option<u64> {
        self.cell(row, LinkColumn::ContentLength)?.trim().parse().ok()
    }

    /// `service_def` of `row`.
    #[must_use]
    pub fn service_def_at(&self, row: usize) -> Option<&str> {
        self.cell(row, LinkColumn::ServiceDef)
    }

    /// `error_message` of `row`.
    #[must_use]
    pub fn error_message_at(&self, row: usize) -> Option<&str> {
        self.cell(row, LinkColumn::ErrorMessage)
    }

    /// `description` of `row`.
    #[must_use]
    pub fn description_at(&self, row: usize) -> Option<&str> {
        self.cell(row, LinkColumn::Description)
    }

    /// All fields of `row`, or `None` when out of range.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<LinkRow<'_>> {
        (row < self.row_count()).then(|| LinkRow {
            row,
            id: self.id_at(row),
            semantics: self.semantics_at(row).map(Semantics::parse),
            access_url: self.access_url_at(row),
            content_type: self.content_type_at(row),
            content_length: self.content_length_at(row),
            service_def: self.service_def_at(row),
            error_message: self.error_message_at(row),
            description: self.description_at(row),
        })
    }

    /// Iterates over every row.
    pub fn rows(&self) -> impl Iterator<Item = LinkRow<'_>> {
        (0..self.row_count()).filter_map(|r| self.row(r))
    }

    /// Index of the first row whose semantics equal `tag` (case-insensitive),
    /// error rows included.
    #[must_use]
    pub fn find_row(&self, tag: &str) -> Option<usize> {
        let tag = tag.trim();
        (0..self.row_count()).find(|&r| {
            self.semantics_at(r)
                .is_some_and(|s| s.trim().eq_ignore_ascii_case(tag))
        })
    }

    /// Index of the first row matching `tag`, unless that row reports an
    /// error, which is logged.
    fn usable_row(&self, tag: &str) -> Option<usize> {
        let row = self.find_row(tag)?;
        if let Some(error) = self.error_message_at(row) {
            warn!(semantics = tag, row, error, "DataLink row reports an error");
            return None;
        }
        Some(row)
    }

    /// Access URL of the first row with semantics `tag`.
    #[must_use]
    pub fn access_url_for(&self, tag: &str) -> Option<&str> {
        self.access_url_at(self.usable_row(tag)?)
    }

    /// Content type of the first row with semantics `tag`.
    #[must_use]
    pub fn content_type_for(&self, tag: &str) -> Option<&str> {
        self.content_type_at(self.usable_row(tag)?)
    }

    /// Service definition reference of the first row with semantics `tag`.
    #[must_use]
    pub fn service_def_for(&self, tag: &str) -> Option<&str> {
        self.service_def_at(self.usable_row(tag)?)
    }

    /// Access URL of the `#this` row.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::NoPrimaryLink`] when there is no usable `#this` row.
    pub fn primary_link(&self) -> Result<&str, LinkError> {
        self.access_url_for(Semantics::THIS)
            .ok_or(LinkError::NoPrimaryLink)
    }

    /// Content type of the `#this` row.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::NoPrimaryLink`] when there is no usable `#this` row
    /// or it has no content type.
    pub fn primary_content_type(&self) -> Result<&str, LinkError> {
        self.content_type_for(Semantics::THIS)
            .ok_or(LinkError::NoPrimaryLink)
    }

    /// Rows whose semantics equal `semantics`.
    pub fn rows_with<'a>(
        &'a self,
        semantics: &'a Semantics,
    ) -> impl Iterator<Item = LinkRow<'a>> + 'a {
        self.rows()
            .filter(move |r| r.semantics.as_ref() == Some(semantics))
    }
}
