use std::cmp::Ordering;
use std::time::Instant;

use log::{debug, trace};
#[cfg(feature = "serde-1")]
use serde::{Deserialize, Serialize};

use crate::autom::{AutomStats, AutomorphismGroup, Orbits};
use crate::coloured_graph::ColouredGraph;
use crate::error::CanonError;
use crate::options::Options;
use crate::partition::Partition;
use crate::refine::Refiner;
use crate::select::{Leaf, Selector, Verdict};

/// Counters describing the search tree
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SearchStats {
    /// Number of refined nodes, including the root and the leaves
    pub nodes: u64,
    /// Number of discrete partitions reached
    pub leaves: u64,
    /// Number of children skipped by orbit or invariant pruning
    pub pruned: u64,
    /// Depth of the deepest node
    pub max_depth: usize,
}

// A node of the search tree with children left to explore
#[derive(Clone, Debug)]
struct Frame {
    partition: Partition,
    invariant: Vec<usize>,
    // vertices of the target cell, in increasing order
    candidates: Vec<usize>,
    next: usize,
    tried: Vec<usize>,
    // individualised vertex leading to the child being explored
    chosen: Option<usize>,
    // whether the invariants along the path agree with the first leaf
    eq_first: bool,
    // invariants along the path compared to the best leaf
    vs_best: Ordering,
    // orbits fixing the path, with the number of generators they were
    // computed from
    orbits: Option<(usize, Orbits)>,
}

impl Frame {
    fn new(
        partition: Partition,
        invariant: Vec<usize>,
        eq_first: bool,
        vs_best: Ordering,
    ) -> Self {
        let mut candidates = partition
            .first_non_singleton()
            .map(|start| partition.cell(start).to_vec())
            .unwrap_or_default();
        candidates.sort_unstable();
        Self {
            partition,
            invariant,
            candidates,
            next: 0,
            tried: Vec::new(),
            chosen: None,
            eq_first,
            vs_best,
            orbits: None,
        }
    }
}

/// Result of a completed search
#[derive(Clone, Debug)]
pub(crate) struct Outcome {
    pub(crate) best: Leaf,
    pub(crate) group: AutomorphismGroup,
    pub(crate) autom_stats: AutomStats,
    pub(crate) stats: SearchStats,
}

/// State of one canonical labelling computation
///
/// The search is a depth-first traversal of the tree of
/// individualisations, driven by an explicit stack of frames. Each
/// frame owns the refined partition of its node, so backtracking is
/// just popping the stack.
#[derive(Debug)]
pub(crate) struct Session<'g> {
    graph: &'g ColouredGraph,
    options: &'g Options,
    refiner: Refiner<'g>,
    group: AutomorphismGroup,
    selector: Selector,
    stats: SearchStats,
    start: Instant,
    stack: Vec<Frame>,
}

impl<'g> Session<'g> {
    pub(crate) fn new(graph: &'g ColouredGraph, options: &'g Options) -> Self {
        Self {
            graph,
            options,
            refiner: Refiner::new(graph),
            group: AutomorphismGroup::new(graph.vertex_count()),
            selector: Selector::default(),
            stats: SearchStats::default(),
            start: Instant::now(),
            stack: Vec::new(),
        }
    }

    pub(crate) fn run(mut self) -> Result<Outcome, CanonError> {
        let graph = self.graph;
        let mut root = Partition::new(graph.cells(), graph.vertex_count());
        self.refiner.refine_root(&mut root);
        self.verify(&root)?;
        self.tick(0)?;
        debug!("Root partition has {} cells", root.cell_count());
        if root.is_discrete() {
            self.leaf(root, Vec::new())?;
        } else {
            self.stack
                .push(Frame::new(root, Vec::new(), true, Ordering::Equal));
        }

        while !self.stack.is_empty() {
            let Some(v) = self.next_candidate() else {
                self.stack.pop();
                continue;
            };
            let depth = self.stack.len();
            let Some(parent) = self.stack.last() else {
                break;
            };
            let mut child = parent.partition.clone();
            let cell = child.individualise(v);
            self.refiner.refine(&mut child, &[cell]);
            self.verify(&child)?;
            self.tick(depth)?;

            let invariant = child.cell_sizes();
            let (eq_first, vs_best) = self.compare(depth, &invariant);
            if !eq_first && vs_best == Ordering::Greater {
                trace!("Pruning node at depth {depth} after {v}");
                self.stats.pruned += 1;
                continue;
            }
            if child.is_discrete() {
                self.leaf(child, invariant)?;
            } else {
                self.stack
                    .push(Frame::new(child, invariant, eq_first, vs_best));
            }
        }
        self.finish()
    }

    fn tick(&mut self, depth: usize) -> Result<(), CanonError> {
        self.stats.nodes += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
        if let Some(limit) = self.options.node_limit {
            if self.stats.nodes > limit {
                return Err(CanonError::NodeLimit(limit));
            }
        }
        if let Some(limit) = self.options.time_limit {
            if self.start.elapsed() >= limit {
                return Err(CanonError::TimeLimit(limit));
            }
        }
        Ok(())
    }

    fn verify(&mut self, p: &Partition) -> Result<(), CanonError> {
        if self.options.verify_refinement && !self.refiner.is_equitable(p) {
            return Err(CanonError::InvariantViolation(format!(
                "refined partition {:?} is not equitable",
                p.order()
            )));
        }
        Ok(())
    }

    // Advance the top frame to its next child, skipping vertices in
    // the orbit of a vertex that was already tried
    fn next_candidate(&mut self) -> Option<usize> {
        let depth = self.stack.len().checked_sub(1)?;
        let path = Vec::from_iter(self.stack[..depth].iter().filter_map(|f| f.chosen));
        let group = &self.group;
        let frame = self.stack.last_mut()?;
        if let Some(v) = frame.chosen.take() {
            frame.tried.push(v);
        }
        while let Some(&v) = frame.candidates.get(frame.next) {
            frame.next += 1;
            if !frame.tried.is_empty() && !group.is_empty() {
                let stale = frame
                    .orbits
                    .as_ref()
                    .map_or(true, |(count, _)| *count != group.len());
                if stale {
                    frame.orbits = Some((group.len(), group.orbits(&path)));
                }
                if let Some((_, orbits)) = &frame.orbits {
                    if frame.tried.iter().any(|&u| orbits.same_orbit(u, v)) {
                        self.stats.pruned += 1;
                        continue;
                    }
                }
            }
            frame.chosen = Some(v);
            return Some(v);
        }
        None
    }

    // Compare a new node at `depth` with the first and the best leaf
    fn compare(&self, depth: usize, invariant: &[usize]) -> (bool, Ordering) {
        let Some(parent) = self.stack.last() else {
            return (true, Ordering::Equal);
        };
        let level = depth - 1;
        let eq_first = parent.eq_first
            && self.selector.first().map_or(true, |first| {
                first.invariants.get(level).map(Vec::as_slice) == Some(invariant)
            });
        let vs_best = match parent.vs_best {
            Ordering::Equal => self.selector.best().map_or(Ordering::Equal, |best| {
                best.invariants
                    .get(level)
                    .map_or(Ordering::Greater, |b| invariant.cmp(b.as_slice()))
            }),
            ord => ord,
        };
        (eq_first, vs_best)
    }

    fn leaf(
        &mut self,
        partition: Partition,
        invariant: Vec<usize>,
    ) -> Result<(), CanonError> {
        self.stats.leaves += 1;
        let mut invariants = Vec::from_iter(
            self.stack.iter().skip(1).map(|f| f.invariant.clone()),
        );
        if !self.stack.is_empty() {
            invariants.push(invariant);
        }
        let path = Vec::from_iter(self.stack.iter().filter_map(|f| f.chosen));
        let leaf = Leaf::new(
            self.graph,
            invariants,
            partition.order().to_vec(),
            path,
        );
        match self.selector.consider(leaf) {
            Verdict::First | Verdict::Worse => {}
            Verdict::Better => {
                // every frame on the stack leads to the new best leaf
                for frame in &mut self.stack {
                    frame.vs_best = Ordering::Equal;
                }
            }
            Verdict::Automorphic { perm, common_depth } => {
                self.group.add_generator(self.graph, perm)?;
                trace!("Jumping back to depth {common_depth}");
                self.stack.truncate(common_depth + 1);
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Outcome, CanonError> {
        let Self {
            group,
            selector,
            stats,
            ..
        } = self;
        let first_path = selector
            .first()
            .map(|first| first.path.clone())
            .unwrap_or_default();
        let Some(best) = selector.into_best() else {
            return Err(CanonError::InvariantViolation(
                "search ended without reaching a leaf".to_owned(),
            ));
        };
        let mut autom_stats = AutomStats::default();
        for (level, &v) in first_path.iter().enumerate() {
            autom_stats.scale(group.orbit_of(v, &first_path[..level]).len());
        }
        autom_stats.num_orbits = group.orbits(&[]).count() as u32;
        autom_stats.num_generators = group.len() as u32;
        debug!(
            "Search finished after {} nodes and {} leaves, {} generators, group size {}",
            stats.nodes,
            stats.leaves,
            group.len(),
            autom_stats.grpsize()
        );
        Ok(Outcome {
            best,
            group,
            autom_stats,
            stats,
        })
    }
}
