use std::fmt::Debug;

use ahash::AHashSet;
use log::trace;
use petgraph::{
    graph::{Graph, IndexType},
    EdgeType,
};
#[cfg(feature = "serde-1")]
use serde::{Deserialize, Serialize};

use crate::canon::canonical_form;
use crate::coloured_graph::ColouredGraph;
use crate::error::CanonError;
use crate::options::Options;
use crate::pet_graph::to_coloured;

/// Generating set of a graph's automorphism group
///
/// Only the generators are stored, the group itself can be far too
/// large to enumerate. Generators are appended as they are found and
/// never removed.
#[derive(Clone, Debug, Default)]
pub struct AutomorphismGroup {
    n: usize,
    generators: Vec<Vec<usize>>,
    inverses: Vec<Vec<usize>>,
    known: AHashSet<Vec<usize>>,
}

impl AutomorphismGroup {
    /// Trivial group on `n` vertices
    pub fn new(n: usize) -> Self {
        Self {
            n,
            ..Default::default()
        }
    }

    /// Record a new generator
    ///
    /// The identity and permutations already in the generating set
    /// are skipped, and `Ok(false)` is returned. Anything that is not
    /// an automorphism of `graph` is a bug in the search and is
    /// reported as [CanonError::InvariantViolation].
    pub fn add_generator(
        &mut self,
        graph: &ColouredGraph,
        perm: Vec<usize>,
    ) -> Result<bool, CanonError> {
        if !graph.is_automorphism(&perm) {
            return Err(CanonError::InvariantViolation(format!(
                "{perm:?} is not an automorphism"
            )));
        }
        if perm.iter().enumerate().all(|(v, &w)| v == w)
            || self.known.contains(&perm)
        {
            return Ok(false);
        }
        trace!("New generator: {perm:?}");
        let mut inverse = vec![0; perm.len()];
        for (v, &w) in perm.iter().enumerate() {
            inverse[w] = v;
        }
        self.known.insert(perm.clone());
        self.generators.push(perm);
        self.inverses.push(inverse);
        Ok(true)
    }

    pub fn generators(&self) -> &[Vec<usize>] {
        &self.generators
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    fn fixing<'a>(
        &'a self,
        fixed: &'a [usize],
    ) -> impl Iterator<Item = usize> + 'a {
        (0..self.generators.len()).filter(move |&idx| {
            fixed.iter().all(|&v| self.generators[idx][v] == v)
        })
    }

    /// Orbit of `v` under the generators fixing every vertex in
    /// `fixed`, sorted
    pub fn orbit_of(&self, v: usize, fixed: &[usize]) -> Vec<usize> {
        let gens = Vec::from_iter(self.fixing(fixed));
        let mut seen = vec![false; self.n];
        seen[v] = true;
        let mut orbit = vec![v];
        let mut next = 0;
        while let Some(&u) = orbit.get(next) {
            next += 1;
            for &idx in &gens {
                for w in [self.generators[idx][u], self.inverses[idx][u]] {
                    if !std::mem::replace(&mut seen[w], true) {
                        orbit.push(w);
                    }
                }
            }
        }
        orbit.sort_unstable();
        orbit
    }

    /// All orbits under the generators fixing every vertex in `fixed`
    pub fn orbits(&self, fixed: &[usize]) -> Orbits {
        let mut orbits = Orbits::new(self.n);
        for idx in self.fixing(fixed) {
            for (v, &w) in self.generators[idx].iter().enumerate() {
                orbits.union(v, w);
            }
        }
        orbits.flatten();
        orbits
    }
}

/// Orbit partition, with the smallest vertex of each orbit as its
/// representative
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Orbits {
    parent: Vec<usize>,
}

impl Orbits {
    fn new(n: usize) -> Self {
        Self {
            parent: Vec::from_iter(0..n),
        }
    }

    fn root(&self, mut v: usize) -> usize {
        while self.parent[v] != v {
            v = self.parent[v];
        }
        v
    }

    fn union(&mut self, v: usize, w: usize) {
        let (a, b) = (self.root(v), self.root(w));
        if a < b {
            self.parent[b] = a;
        } else {
            self.parent[a] = b;
        }
    }

    fn flatten(&mut self) {
        for v in 0..self.parent.len() {
            self.parent[v] = self.root(v);
        }
    }

    /// Smallest vertex in the orbit of `v`
    pub fn representative(&self, v: usize) -> usize {
        self.parent[v]
    }

    pub fn same_orbit(&self, v: usize, w: usize) -> bool {
        self.parent[v] == self.parent[w]
    }

    /// Number of orbits
    pub fn count(&self) -> usize {
        self.parent
            .iter()
            .enumerate()
            .filter(|(v, &r)| *v == r)
            .count()
    }
}

/// Information on automorphism group of a graph
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
pub struct AutomStats {
    /// The size of the automorphism group is approximately `grpsize_base` * 10.pow(`grpsize_exp`)
    pub grpsize_base: f64,
    /// The size of the automorphism group is approximately `grpsize_base` * 10.pow(`grpsize_exp`)
    pub grpsize_exp: u32,
    /// Number of orbits of the automorphism group
    pub num_orbits: u32,
    /// Number of generators
    pub num_generators: u32,
}

impl Default for AutomStats {
    fn default() -> Self {
        Self {
            grpsize_base: 1.,
            grpsize_exp: 0,
            num_orbits: 0,
            num_generators: 0,
        }
    }
}

impl AutomStats {
    /// Bound below which `grpsize_base` holds the exact group size
    /// (or its leading digits)
    pub const MAX_EXACT_BASE: f64 = 1e15;

    /// The size of the automorphism group
    pub fn grpsize(&self) -> f64 {
        self.grpsize_base * 10f64.powi(self.grpsize_exp as i32)
    }

    /// Multiply the group size by `factor`
    ///
    /// The base stays an exact integer as long as it is below
    /// [MAX_EXACT_BASE](Self::MAX_EXACT_BASE), only larger group sizes
    /// are shifted into the exponent.
    pub(crate) fn scale(&mut self, factor: usize) {
        self.grpsize_base *= factor as f64;
        while self.grpsize_base >= Self::MAX_EXACT_BASE {
            self.grpsize_base /= 10.;
            self.grpsize_exp += 1;
        }
    }
}

/// Statistics for a graph's automorphism group
pub trait TryIntoAutomStats {
    type Error;

    fn try_into_autom_stats(self) -> Result<AutomStats, Self::Error>;
}

impl<N, E, Ty, Ix> TryIntoAutomStats for Graph<N, E, Ty, Ix>
where
    N: Ord,
    E: Ord,
    Ty: EdgeType,
    Ix: IndexType,
{
    type Error = CanonError;

    fn try_into_autom_stats(self) -> Result<AutomStats, Self::Error> {
        let g = to_coloured(&self)?;
        canonical_form(&g, &Options::default()).map(|c| c.autom_stats)
    }
}

/// Statistics for a graph's automorphism group, panicking on internal
/// errors
pub trait IntoAutomStats {
    fn into_autom_stats(self) -> AutomStats;
}

impl<T> IntoAutomStats for T
where
    T: TryIntoAutomStats,
    <T as TryIntoAutomStats>::Error: Debug,
{
    fn into_autom_stats(self) -> AutomStats {
        self.try_into_autom_stats().unwrap()
    }
}
