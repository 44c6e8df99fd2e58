// ── Table registry ──
//
// Owns the dashboard's tables keyed by id. Entry points take an id the way
// page handlers do, and report a missing table as an error instead of
// silently doing nothing.

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::{DataType, DirectionMemory, SortDirection, Table, TableId};
use crate::error::CoreError;
use crate::export::{CsvExport, ExportScope, export_to_csv};

/// All tables currently on the page, in insertion order.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: IndexMap<TableId, Table>,
    memory: DirectionMemory,
}

impl TableRegistry {
    /// Create a registry whose inserted tables remember sort direction
    /// according to `memory`.
    pub fn new(memory: DirectionMemory) -> Self {
        Self {
            tables: IndexMap::new(),
            memory,
        }
    }

    /// Add or replace a table. A replaced table's sort memory is discarded.
    pub fn insert(&mut self, table: Table) -> Option<Table> {
        let table = table.with_memory(self.memory);
        let id = table.id().clone();
        let previous = self.tables.insert(id.clone(), table);
        if previous.is_some() {
            debug!(table = %id, "replaced table");
        }
        previous
    }

    pub fn remove(&mut self, id: &TableId) -> Option<Table> {
        self.tables.shift_remove(id)
    }

    pub fn get(&self, id: &TableId) -> Result<&Table, CoreError> {
        self.tables.get(id).ok_or_else(|| not_found(id))
    }

    pub fn get_mut(&mut self, id: &TableId) -> Result<&mut Table, CoreError> {
        self.tables.get_mut(id).ok_or_else(|| not_found(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &TableId> {
        self.tables.keys()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Sort a table by id. See [`Table::sort`].
    pub fn sort_table(
        &mut self,
        id: &TableId,
        column: usize,
        data_type: DataType,
    ) -> Result<SortDirection, CoreError> {
        self.get_mut(id)?.sort(column, data_type)
    }

    /// Filter a table by id. See [`Table::filter`].
    pub fn filter_table(
        &mut self,
        id: &TableId,
        term: &str,
        column: usize,
    ) -> Result<usize, CoreError> {
        self.get_mut(id)?.filter(term, column)
    }

    /// Export a table by id. See [`export_to_csv`].
    pub fn export_table(
        &self,
        id: &TableId,
        filename: Option<&str>,
        scope: ExportScope,
    ) -> Result<CsvExport, CoreError> {
        Ok(export_to_csv(self.get(id)?, filename, scope))
    }
}

fn not_found(id: &TableId) -> CoreError {
    warn!(table = %id, "table not found");
    CoreError::TableNotFound { id: id.to_string() }
}
