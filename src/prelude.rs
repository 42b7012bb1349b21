pub use crate::autom::{IntoAutomStats, TryIntoAutomStats};
pub use crate::canon::{canonical_form, IntoCanon, TryIntoCanon};
pub use crate::cmp::IsIdentical;
pub use crate::coloured_graph::ColouredGraph;
pub use crate::graph::{CanonDiGraph, CanonGraph, CanonUnGraph};
pub use crate::options::Options;
