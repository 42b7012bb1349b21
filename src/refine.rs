use itertools::Itertools;

use crate::coloured_graph::{ColouredGraph, EdgeKey};
use crate::partition::Partition;

const NONE: usize = usize::MAX;

#[derive(Copy, Clone, Debug)]
struct Touched {
    vertex: usize,
    start: usize,
    end: usize,
}

/// Colour refinement towards the coarsest equitable partition
///
/// Splitters are kept on a stack of cell starts. For each splitter
/// every vertex touched by one of its edges gets a signature, the
/// sorted list of edge counts into the splitter by edge kind and
/// colour. Cells are then split by signature, larger signatures
/// first and untouched vertices last. Only the edges incident to the
/// splitter are visited, and the result only depends on the cell
/// structure, never on vertex ids.
#[derive(Debug)]
pub(crate) struct Refiner<'g> {
    graph: &'g ColouredGraph,
    stack: Vec<usize>,
    queued: Vec<bool>,
    hits: Vec<(usize, EdgeKey)>,
    slot: Vec<usize>,
    touched: Vec<Touched>,
    sigs: Vec<(EdgeKey, usize)>,
    scratch: Vec<usize>,
}

fn signature<'a>(
    slot: &[usize],
    touched: &[Touched],
    sigs: &'a [(EdgeKey, usize)],
    v: usize,
) -> &'a [(EdgeKey, usize)] {
    match slot[v] {
        NONE => &[],
        idx => &sigs[touched[idx].start..touched[idx].end],
    }
}

impl<'g> Refiner<'g> {
    pub(crate) fn new(graph: &'g ColouredGraph) -> Self {
        let n = graph.vertex_count();
        Self {
            graph,
            stack: Vec::new(),
            queued: vec![false; n],
            hits: Vec::new(),
            slot: vec![NONE; n],
            touched: Vec::new(),
            sigs: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// Refine the initial colouring
    ///
    /// Cells are first split by vertex signature, then every cell is
    /// used as a splitter.
    pub(crate) fn refine_root(&mut self, p: &mut Partition) {
        let graph = self.graph;
        let starts = Vec::from_iter(p.cell_starts());
        for start in starts {
            if p.cell_len(start) == 1 {
                continue;
            }
            let mut cell =
                Vec::from_iter(p.cell(start).iter().map(|&v| (graph.signature(v), v)));
            cell.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
            let lengths = Vec::from_iter(
                cell.iter().dedup_by_with_count(|a, b| a.0 == b.0).map(|(n, _)| n),
            );
            if lengths.len() > 1 {
                let order = Vec::from_iter(cell.into_iter().map(|(_, v)| v));
                p.split(start, &order, &lengths);
            }
        }
        let starts = Vec::from_iter(p.cell_starts());
        self.refine(p, &starts);
    }

    /// Refine `p` until it is equitable, starting from the given
    /// splitters
    ///
    /// `p` must be equitable with respect to every cell that is not a
    /// splitter.
    pub(crate) fn refine(&mut self, p: &mut Partition, splitters: &[usize]) {
        for &s in splitters {
            self.push(s);
        }
        let mut affected = Vec::new();
        while let Some(s) = self.stack.pop() {
            self.queued[s] = false;
            self.collect(p, s);
            if self.touched.is_empty() {
                continue;
            }
            affected.clear();
            affected.extend(
                self.touched
                    .iter()
                    .map(|t| p.cell_start_of(t.vertex))
                    .filter(|&start| p.cell_len(start) > 1),
            );
            affected.sort_unstable();
            affected.dedup();
            for &start in &affected {
                self.split_cell(p, start);
            }
        }
        self.clear();
    }

    /// Check that every cell is split evenly by every other cell
    pub(crate) fn is_equitable(&mut self, p: &Partition) -> bool {
        let starts = Vec::from_iter(p.cell_starts());
        let equitable = starts.iter().all(|&s| {
            self.collect(p, s);
            starts.iter().all(|&c| {
                let cell = p.cell(c);
                let first = signature(&self.slot, &self.touched, &self.sigs, cell[0]);
                cell[1..].iter().all(|&v| {
                    signature(&self.slot, &self.touched, &self.sigs, v) == first
                })
            })
        });
        self.clear();
        equitable
    }

    fn push(&mut self, start: usize) {
        if !self.queued[start] {
            self.queued[start] = true;
            self.stack.push(start);
        }
    }

    fn clear(&mut self) {
        for t in &self.touched {
            self.slot[t.vertex] = NONE;
        }
        self.touched.clear();
        self.sigs.clear();
    }

    // compute the signatures of all vertices touched by the splitter
    fn collect(&mut self, p: &Partition, splitter: usize) {
        self.clear();
        let graph = self.graph;
        self.hits.clear();
        for &w in p.cell(splitter) {
            self.hits.extend(graph.incident(w));
        }
        self.hits.sort_unstable();
        for (count, &(v, key)) in self.hits.iter().dedup_with_count() {
            if self.slot[v] == NONE {
                self.slot[v] = self.touched.len();
                self.touched.push(Touched {
                    vertex: v,
                    start: self.sigs.len(),
                    end: self.sigs.len(),
                });
            }
            self.sigs.push((key, count));
            if let Some(last) = self.touched.last_mut() {
                last.end = self.sigs.len();
            }
        }
    }

    fn split_cell(&mut self, p: &mut Partition, start: usize) {
        let mut cell = std::mem::take(&mut self.scratch);
        cell.clear();
        cell.extend_from_slice(p.cell(start));
        let (slot, touched, sigs) = (&self.slot, &self.touched, &self.sigs);
        let sig = move |v| signature(slot, touched, sigs, v);
        cell.sort_unstable_by(|&a, &b| sig(b).cmp(sig(a)).then(a.cmp(&b)));
        let lengths = Vec::from_iter(
            cell.iter()
                .dedup_by_with_count(|&&a, &&b| sig(a) == sig(b))
                .map(|(n, _)| n),
        );
        if lengths.len() > 1 {
            let was_queued = self.queued[start];
            let starts = p.split(start, &cell, &lengths);
            if was_queued {
                for &s in &starts[1..] {
                    self.push(s);
                }
            } else {
                // the first largest fragment is implied by the others
                let largest = lengths
                    .iter()
                    .enumerate()
                    .rev()
                    .max_by_key(|(_, &len)| len)
                    .map(|(idx, _)| idx);
                for (idx, &s) in starts.iter().enumerate() {
                    if Some(idx) != largest {
                        self.push(s);
                    }
                }
            }
        }
        self.scratch = cell;
    }
}
