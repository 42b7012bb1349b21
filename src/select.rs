use std::cmp::Ordering;

use log::trace;
#[cfg(feature = "serde-1")]
use serde::{Deserialize, Serialize};

use crate::coloured_graph::ColouredGraph;
use crate::pet_graph::inv_perm;

/// Comparable encoding of a canonically labelled graph
///
/// Two coloured graphs are isomorphic exactly if their certificates
/// are equal. Certificates can be hashed and ordered, so they can be
/// used directly for deduplication.
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Certificate {
    pub n: usize,
    pub directed: bool,
    /// Colour of each vertex, in canonical order
    pub vertex_colours: Vec<u32>,
    /// Canonical edges, as in [Canonical](crate::Canonical)
    pub edges: Vec<(usize, usize, u32)>,
}

/// A discrete partition reached by the search
#[derive(Clone, Debug)]
pub(crate) struct Leaf {
    /// node invariants along the path, excluding the root
    pub(crate) invariants: Vec<Vec<usize>>,
    /// edges under the labelling, normalised and sorted
    pub(crate) edges: Vec<(usize, usize, u32)>,
    /// vertex at each position
    pub(crate) order: Vec<usize>,
    /// individualised vertices leading to the leaf
    pub(crate) path: Vec<usize>,
}

impl Leaf {
    pub(crate) fn new(
        graph: &ColouredGraph,
        invariants: Vec<Vec<usize>>,
        order: Vec<usize>,
        path: Vec<usize>,
    ) -> Self {
        let edges = graph.relabelled_edges(&inv_perm(&order));
        Self {
            invariants,
            edges,
            order,
            path,
        }
    }

    // Leaves are ranked by their invariants first so that whole
    // subtrees can be discarded early. The canonical leaf is the
    // smallest one.
    fn rank(&self, other: &Self) -> Ordering {
        self.invariants
            .cmp(&other.invariants)
            .then_with(|| self.edges.cmp(&other.edges))
    }

    /// The automorphism mapping `self` onto `other`
    fn map_onto(&self, other: &Self) -> Vec<usize> {
        let mut perm = vec![0; self.order.len()];
        for (&from, &to) in self.order.iter().zip(&other.order) {
            perm[from] = to;
        }
        perm
    }

    /// Number of individualisations shared with `other`
    fn common_depth(&self, other: &Self) -> usize {
        self.path
            .iter()
            .zip(&other.path)
            .take_while(|(a, b)| a == b)
            .count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// No leaf had been seen before
    First,
    /// Strictly better than the best leaf so far
    Better,
    /// Equal to an earlier leaf
    Automorphic {
        perm: Vec<usize>,
        common_depth: usize,
    },
    Worse,
}

/// Keeps the first and the best leaf of the search
#[derive(Clone, Debug, Default)]
pub(crate) struct Selector {
    first: Option<Leaf>,
    best: Option<Leaf>,
}

impl Selector {
    pub(crate) fn consider(&mut self, leaf: Leaf) -> Verdict {
        let (Some(first), Some(best)) = (&self.first, &self.best) else {
            trace!("First leaf: {:?}", leaf.order);
            self.best = Some(leaf.clone());
            self.first = Some(leaf);
            return Verdict::First;
        };
        if leaf.rank(first) == Ordering::Equal {
            return Verdict::Automorphic {
                perm: first.map_onto(&leaf),
                common_depth: first.common_depth(&leaf),
            };
        }
        match leaf.rank(best) {
            Ordering::Less => {
                trace!("New best leaf: {:?}", leaf.order);
                self.best = Some(leaf);
                Verdict::Better
            }
            Ordering::Equal => Verdict::Automorphic {
                perm: best.map_onto(&leaf),
                common_depth: best.common_depth(&leaf),
            },
            Ordering::Greater => Verdict::Worse,
        }
    }

    pub(crate) fn first(&self) -> Option<&Leaf> {
        self.first.as_ref()
    }

    pub(crate) fn best(&self) -> Option<&Leaf> {
        self.best.as_ref()
    }

    pub(crate) fn into_best(self) -> Option<Leaf> {
        self.best
    }
}
