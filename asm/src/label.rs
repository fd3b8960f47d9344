use indexmap::IndexMap;

use crate::error::Error;

// ----------------------------------------------------------------------------
// Label table
//
// Sized up front from the counting pass. The counting pass sees every line the
// layout pass sees, so running out of capacity means the two passes disagree
// about what a label line is.

#[derive(Debug)]
pub struct LabelTable {
    labels: IndexMap<String, u32>,
    capacity: usize,
}

pub const MAX_NAME_LEN: usize = 32;

impl LabelTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { labels: IndexMap::with_capacity(capacity), capacity }
    }

    /// Record a label at its definition address. The first definition of a
    /// name wins; later definitions of the same name are ignored.
    pub fn insert(&mut self, name: &str, address: u32) -> Result<(), Error> {
        if name.len() > MAX_NAME_LEN {
            return Err(Error::LabelTooLong(name.to_string()));
        }
        assert!(
            self.labels.len() < self.capacity || self.labels.contains_key(name),
            "label table capacity exceeded"
        );
        self.labels.entry(name.to_string()).or_insert(address);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.labels.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Assembly context

/// Lookup behavior of the current pass. Layout tolerates names that are not
/// yet recorded, Emit does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Layout,
    Emit,
}

/// State threaded through all parsing calls of one assembly run.
#[derive(Debug)]
pub struct Context {
    pub labels: LabelTable,
    pub stage: Stage,
}

impl Context {
    pub fn new(nlabels: usize) -> Self {
        Self { labels: LabelTable::with_capacity(nlabels), stage: Stage::Layout }
    }

    /// Resolve a label reference. In the layout stage an unknown name stands
    /// in as 0 so line lengths can still be measured.
    pub fn lookup(&self, name: &str) -> Result<u32, Error> {
        match self.labels.get(name) {
            Some(addr) => Ok(addr),
            None => match self.stage {
                Stage::Layout => Ok(0),
                Stage::Emit => Err(Error::UndefinedLabel(name.to_string())),
            },
        }
    }
}
