use crate::id::{EntityId, IdError};
use thiserror::Error;

/// Data integrity failures that abort an index build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("duplicate id {id} in {collection}")]
    DuplicateId {
        collection: &'static str,
        id: EntityId,
    },
}

/// Malformed filter input. Inconsistent-but-valid filters are not errors,
/// they narrow to an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("invalid {field} '{value}': {source}")]
    MalformedId {
        field: &'static str,
        value: String,
        #[source]
        source: IdError,
    },
}
