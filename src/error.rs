use crate::mem::AllocError;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BenchError {
    #[error(transparent)]
    Alloc(#[from] AllocError),
    #[error("index domain is empty, item count must be at least 1")]
    EmptyDomain,
}
