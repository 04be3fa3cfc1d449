//! Tables: named, equal-length columns.

use crate::env::Env;
use crate::errors::{duplicate_name, type_mismatch, unequal_columns, EvalError};
use crate::mask::DataMask;
use crate::symbol::Symbol;
use crate::value::Value;

/// A rectangular collection of atomic columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    columns: Vec<(Symbol, Value)>,
    nrow: usize,
}

impl Table {
    /// Build a table, checking that columns are atomic, equally long and
    /// uniquely named.
    pub fn new(columns: impl IntoIterator<Item = (Symbol, Value)>) -> Result<Self, EvalError> {
        let columns: Vec<(Symbol, Value)> = columns.into_iter().collect();
        let nrow = columns.first().map_or(0, |(_, col)| col.len());
        for (i, (name, column)) in columns.iter().enumerate() {
            if !column.is_atomic() {
                return Err(type_mismatch("atomic column", column.type_name()));
            }
            if column.len() != nrow {
                return Err(unequal_columns(name.as_str(), nrow, column.len()));
            }
            if columns[..i].iter().any(|(seen, _)| seen == name) {
                return Err(duplicate_name(name.as_str()));
            }
        }
        Ok(Table { columns, nrow })
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    pub fn ncol(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &Symbol> {
        self.columns.iter().map(|(name, _)| name)
    }

    pub fn column(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, col)| col)
    }

    pub fn columns(&self) -> &[(Symbol, Value)] {
        &self.columns
    }

    /// A fresh scope, child of `parent`, with one binding per column.
    ///
    /// Writes to the returned scope never reach the table.
    pub fn as_scope(&self, parent: &Env) -> Env {
        let scope = parent.child();
        for (name, column) in &self.columns {
            scope.define(name.clone(), column.clone());
        }
        scope
    }

    /// A read-only mask over the columns.
    pub fn to_mask(&self) -> DataMask {
        DataMask::from_table(self)
    }
}
