//! Backend-independent query predicates and pagination.

use serde_json::Value;

use crate::{store::RawDocument, types::DocumentId};

/// Predicate over a document body.
///
/// Backends translate this into their own query language; [`Filter::matches`]
/// is the reference evaluation every backend must agree with.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document.
    All,
    /// `field` equals `value`. A missing field only equals `null`.
    Eq { field: String, value: Value },
    /// `field` is a string containing `needle`, ignoring case.
    Contains { field: String, needle: String },
    /// The storage identifier is one of the given ids.
    IdIn(Vec<DocumentId>),
    /// Conjunction. Empty matches everything.
    And(Vec<Filter>),
    /// Disjunction. Empty matches nothing.
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            needle: needle.into(),
        }
    }

    pub fn id(id: &DocumentId) -> Self {
        Self::IdIn(vec![id.clone()])
    }

    pub fn matches(&self, doc: &RawDocument) -> bool {
        match self {
            Self::All => true,
            Self::Eq { field, value } => doc.body.get(field).unwrap_or(&Value::Null) == value,
            Self::Contains { field, needle } => doc
                .body
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
            Self::IdIn(ids) => ids.contains(&doc.id),
            Self::And(filters) => filters.iter().all(|f| f.matches(doc)),
            Self::Or(filters) => filters.iter().any(|f| f.matches(doc)),
        }
    }
}

/// Offset/limit window applied after filtering, in insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub skip: usize,
    pub limit: Option<usize>,
}

impl Page {
    pub const ALL: Self = Self {
        skip: 0,
        limit: None,
    };

    pub fn new(skip: usize, limit: Option<usize>) -> Self {
        Self { skip, limit }
    }

    pub fn first(limit: usize) -> Self {
        Self {
            skip: 0,
            limit: Some(limit),
        }
    }

    pub fn apply<T>(self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let iter = items.into_iter().skip(self.skip);
        match self.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}
