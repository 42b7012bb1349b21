use std::time::Duration;

#[cfg(feature = "serde-1")]
use serde::{Deserialize, Serialize};

/// Options for [canonical_form](crate::canonical_form)
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use canon_pet::Options;
///
/// let options = Options {
///     certificate: true,
///     node_limit: Some(100_000),
///     time_limit: Some(Duration::from_secs(10)),
///     ..Default::default()
/// };
/// ```
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Options {
    /// Also return a [Certificate](crate::Certificate)
    pub certificate: bool,
    /// Give up after exploring this many search tree nodes
    pub node_limit: Option<u64>,
    /// Give up after this much time
    pub time_limit: Option<Duration>,
    /// Check that every refined partition is equitable
    ///
    /// This is expensive and enabled by default in debug builds only.
    pub verify_refinement: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            certificate: false,
            node_limit: None,
            time_limit: None,
            verify_refinement: cfg!(debug_assertions),
        }
    }
}
