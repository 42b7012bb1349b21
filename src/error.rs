use std::time::Duration;

use thiserror::Error;

/// Broad classification of a [CanonError]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input graph or colouring is malformed
    Validation,
    /// A bug in refinement or search
    Internal,
    /// The search ran past a configured limit
    ResourceExhausted,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CanonError {
    #[error("Edge {edge} references vertex {vertex}, but there are only {n} vertices")]
    VertexOutOfRange { edge: usize, vertex: usize, n: usize },
    #[error("Edge list has {sources} sources but {targets} targets")]
    EdgeListLength { sources: usize, targets: usize },
    #[error("Got {colours} edge colours for {edges} edges")]
    EdgeColourCount { colours: usize, edges: usize },
    #[error("Got {colours} vertex colours for {n} vertices")]
    VertexColourCount { colours: usize, n: usize },
    #[error("Got {labels} labels for {n} vertices")]
    LabelCount { labels: usize, n: usize },
    #[error("Cell {cell} of the partition is empty")]
    EmptyCell { cell: usize },
    #[error("Cell {cell} of the partition contains vertex {vertex}, but there are only {n} vertices")]
    CellVertexOutOfRange { cell: usize, vertex: usize, n: usize },
    #[error("Vertex {vertex} appears more than once in the partition")]
    DuplicateVertex { vertex: usize },
    #[error("Vertex {vertex} is not in any cell of the partition")]
    UncoveredVertex { vertex: usize },
    #[error("Both vertex colours and a partition were given")]
    ConflictingColouring,
    #[error("Search exceeded the limit of {0} nodes")]
    NodeLimit(u64),
    #[error("Search exceeded the time limit of {0:?}")]
    TimeLimit(Duration),
    #[error("Not a permutation of {n} vertices")]
    NotAPermutation { n: usize },
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
}

impl CanonError {
    pub fn kind(&self) -> ErrorKind {
        use CanonError::*;
        match self {
            NodeLimit(_) | TimeLimit(_) => ErrorKind::ResourceExhausted,
            InvariantViolation(_) => ErrorKind::Internal,
            _ => ErrorKind::Validation,
        }
    }
}
