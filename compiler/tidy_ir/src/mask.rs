//! Data masks and the evaluation layers they take part in.

use rustc_hash::FxHashMap;

use crate::errors::{duplicate_name, type_mismatch, EvalError};
use crate::heap::Heap;
use crate::named::Named;
use crate::symbol::Symbol;
use crate::table::Table;
use crate::value::Value;

#[derive(Debug, PartialEq)]
struct MaskData {
    names: Vec<Symbol>,
    values: FxHashMap<Symbol, Value>,
}

/// A read-only auxiliary scope searched before the lexical scope chain.
///
/// Usually built from a table, in which case each column is a binding.
/// Nothing evaluated under a mask can write to it.
#[derive(Clone, Debug, PartialEq)]
pub struct DataMask(Heap<MaskData>);

impl DataMask {
    /// One binding per column.
    pub fn from_table(table: &Table) -> Self {
        let mut names = Vec::with_capacity(table.ncol());
        let mut values = FxHashMap::default();
        for (name, column) in table.columns() {
            names.push(name.clone());
            values.insert(name.clone(), column.clone());
        }
        DataMask(Heap::new(MaskData { names, values }))
    }

    /// One binding per list entry. Every entry must be named, once.
    pub fn from_list(entries: &[Named<Value>]) -> Result<Self, EvalError> {
        let mut names = Vec::with_capacity(entries.len());
        let mut values = FxHashMap::default();
        for entry in entries {
            let Some(name) = &entry.name else {
                return Err(type_mismatch("named list", "list with unnamed entries"));
            };
            if values.insert(name.clone(), entry.value.clone()).is_some() {
                return Err(duplicate_name(name.as_str()));
            }
            names.push(name.clone());
        }
        Ok(DataMask(Heap::new(MaskData { names, values })))
    }

    /// A mask from a table or a named list; `NULL` means no mask.
    pub fn from_value(value: &Value) -> Result<Option<Self>, EvalError> {
        match value {
            Value::Null => Ok(None),
            Value::Table(table) => Ok(Some(DataMask::from_table(table))),
            Value::List(entries) => DataMask::from_list(entries).map(Some),
            other => Err(type_mismatch("data frame or named list", other.type_name())),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.values.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.values.contains_key(name)
    }

    /// Binding names, in column order.
    pub fn names(&self) -> &[Symbol] {
        &self.0.names
    }

    pub fn len(&self) -> usize {
        self.0.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.names.is_empty()
    }
}

/// Which layers symbol resolution consults.
///
/// `Bare` is plain lexical lookup. `Tidy` is layered lookup: the data mask
/// (if any) first, then the lexical chain, with `.data` and `.env` honoured.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Layers {
    #[default]
    Bare,
    Tidy(Option<DataMask>),
}

impl Layers {
    /// The active data mask, if any.
    pub fn mask(&self) -> Option<&DataMask> {
        match self {
            Layers::Bare | Layers::Tidy(None) => None,
            Layers::Tidy(Some(mask)) => Some(mask),
        }
    }

    /// Whether `.data` and `.env` are recognised.
    pub fn honours_pronouns(&self) -> bool {
        matches!(self, Layers::Tidy(_))
    }
}
