use itertools::Itertools;
#[cfg(feature = "serde-1")]
use serde::{Deserialize, Serialize};

use crate::error::CanonError;

/// How an edge meets a vertex
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeKind {
    /// Outgoing edge of a directed graph
    Out,
    /// Incoming edge of a directed graph
    In,
    /// Edge of an undirected graph
    Both,
}

/// Edge kind and edge colour
pub type EdgeKey = (EdgeKind, u32);

/// Colour of a vertex together with its degrees, split by edge kind
/// and colour
///
/// Two vertices with different signatures can never be mapped onto
/// each other by an automorphism.
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexSignature {
    pub colour: usize,
    pub degrees: Vec<(EdgeKey, usize)>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Adjacency {
    offsets: Vec<usize>,
    // sorted by (colour, vertex) for each source vertex
    entries: Vec<(usize, u32)>,
}

impl Adjacency {
    fn new(n: usize, arcs: impl IntoIterator<Item = (usize, usize, u32)>) -> Self {
        let mut arcs = Vec::from_iter(arcs);
        arcs.sort_unstable_by_key(|&(s, t, c)| (s, c, t));
        let mut offsets = vec![0; n + 1];
        for &(s, _, _) in &arcs {
            offsets[s + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }
        let entries = arcs.into_iter().map(|(_, t, c)| (t, c)).collect();
        Self { offsets, entries }
    }

    fn of(&self, v: usize) -> &[(usize, u32)] {
        &self.entries[self.offsets[v]..self.offsets[v + 1]]
    }
}

/// A graph with coloured vertices and coloured edges
///
/// The vertex colouring is an ordered partition of the vertices into
/// colour classes. Automorphisms and canonical labellings have to map
/// each class onto itself, and the order of the classes is part of
/// the canonical form. Multiple edges and self-loops are allowed.
///
/// # Example
///
/// ```rust
/// use canon_pet::ColouredGraph;
///
/// let g = ColouredGraph::undirected(4)
///     .edges([(0, 1), (1, 2), (2, 3)])
///     .vertex_colours(vec![1, 0, 0, 1])
///     .build()
///     .unwrap();
/// assert_eq!(g.degree(1), 2);
/// assert_eq!(g.colour(0), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColouredGraph {
    n: usize,
    directed: bool,
    edges: Vec<(usize, usize, u32)>,
    out: Adjacency,
    inc: Adjacency,
    colour: Vec<usize>,
    cells: Vec<Vec<usize>>,
    cell_colours: Vec<u32>,
    labels: Option<Vec<i64>>,
    sorted_edges: Vec<(usize, usize, u32)>,
}

impl ColouredGraph {
    /// Start building a directed graph with `n` vertices
    pub fn directed(n: usize) -> GraphBuilder {
        GraphBuilder::new(n, true)
    }

    /// Start building an undirected graph with `n` vertices
    pub fn undirected(n: usize) -> GraphBuilder {
        GraphBuilder::new(n, false)
    }

    fn from_parts(
        n: usize,
        directed: bool,
        edges: Vec<(usize, usize, u32)>,
        cells: Vec<Vec<usize>>,
        cell_colours: Vec<u32>,
        labels: Option<Vec<i64>>,
    ) -> Self {
        let out = if directed {
            Adjacency::new(n, edges.iter().copied())
        } else {
            let arcs = edges.iter().flat_map(|&(s, t, c)| {
                let back = (s != t).then_some((t, s, c));
                std::iter::once((s, t, c)).chain(back)
            });
            Adjacency::new(n, arcs)
        };
        let inc = if directed {
            Adjacency::new(n, edges.iter().map(|&(s, t, c)| (t, s, c)))
        } else {
            Adjacency::default()
        };
        let mut colour = vec![0; n];
        for (idx, cell) in cells.iter().enumerate() {
            for &v in cell {
                colour[v] = idx;
            }
        }
        let mut sorted_edges = Vec::from_iter(
            edges.iter().map(|&(s, t, c)| normalise_edge(directed, s, t, c)),
        );
        sorted_edges.sort_unstable();
        Self {
            n,
            directed,
            edges,
            out,
            inc,
            colour,
            cells,
            cell_colours,
            labels,
            sorted_edges,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.n
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// The edges in the order they were added
    pub fn edges(&self) -> &[(usize, usize, u32)] {
        &self.edges
    }

    /// The colour classes, in order
    pub fn cells(&self) -> &[Vec<usize>] {
        &self.cells
    }

    /// Index of the colour class containing `v`
    pub fn colour(&self, v: usize) -> usize {
        self.colour[v]
    }

    /// The value identifying a colour class
    ///
    /// This is the vertex colour if the graph was built with
    /// [GraphBuilder::vertex_colours] and the cell index otherwise.
    pub fn cell_colour(&self, cell: usize) -> u32 {
        self.cell_colours[cell]
    }

    pub fn labels(&self) -> Option<&[i64]> {
        self.labels.as_deref()
    }

    /// Neighbours reached by outgoing edges, or all neighbours for
    /// undirected graphs, with edge colours
    pub fn neighbours(&self, v: usize) -> &[(usize, u32)] {
        self.out.of(v)
    }

    /// Neighbours reached by incoming edges, or all neighbours for
    /// undirected graphs, with edge colours
    pub fn in_neighbours(&self, v: usize) -> &[(usize, u32)] {
        if self.directed {
            self.inc.of(v)
        } else {
            self.out.of(v)
        }
    }

    /// Neighbours joined to `v` by an outgoing edge of the given colour
    pub fn neighbours_with_colour(
        &self,
        v: usize,
        colour: u32,
    ) -> impl Iterator<Item = usize> + '_ {
        self.neighbours(v)
            .iter()
            .filter(move |(_, c)| *c == colour)
            .map(|(t, _)| *t)
    }

    pub fn degree(&self, v: usize) -> usize {
        self.out.of(v).len()
    }

    pub fn in_degree(&self, v: usize) -> usize {
        self.in_neighbours(v).len()
    }

    pub fn signature(&self, v: usize) -> VertexSignature {
        let own = if self.directed {
            EdgeKind::Out
        } else {
            EdgeKind::Both
        };
        let incoming = if self.directed { self.inc.of(v) } else { &[] };
        let mut keys = Vec::from_iter(
            self.out
                .of(v)
                .iter()
                .map(|&(_, c)| (own, c))
                .chain(incoming.iter().map(|&(_, c)| (EdgeKind::In, c))),
        );
        keys.sort_unstable();
        let degrees = keys
            .into_iter()
            .dedup_with_count()
            .map(|(count, key)| (key, count))
            .collect();
        VertexSignature {
            colour: self.colour[v],
            degrees,
        }
    }

    /// Vertices joined to `v`, each with the key of the edge as seen
    /// from that vertex
    pub(crate) fn incident(
        &self,
        v: usize,
    ) -> impl Iterator<Item = (usize, EdgeKey)> + '_ {
        let (from_out, from_in) = if self.directed {
            // u -> v is an outgoing edge of u and v -> u an incoming one
            (EdgeKind::In, EdgeKind::Out)
        } else {
            (EdgeKind::Both, EdgeKind::Both)
        };
        let incoming = if self.directed { self.inc.of(v) } else { &[] };
        self.out
            .of(v)
            .iter()
            .map(move |&(u, c)| (u, (from_out, c)))
            .chain(incoming.iter().map(move |&(u, c)| (u, (from_in, c))))
    }

    /// Edge list after relabelling, written in normal form and sorted
    pub(crate) fn relabelled_edges(
        &self,
        relabel: &[usize],
    ) -> Vec<(usize, usize, u32)> {
        let mut edges = Vec::from_iter(self.edges.iter().map(|&(s, t, c)| {
            normalise_edge(self.directed, relabel[s], relabel[t], c)
        }));
        edges.sort_unstable();
        edges
    }

    /// Relabel the graph, vertex `v` becomes `perm[v]`
    ///
    /// Colour classes keep their order, so the result is isomorphic
    /// to `self` under a colour-respecting map. Fails if `perm` is not
    /// a permutation of the vertices.
    pub fn permuted(&self, perm: &[usize]) -> Result<Self, CanonError> {
        if !is_permutation(perm, self.n) {
            return Err(CanonError::NotAPermutation { n: self.n });
        }
        let edges = self
            .edges
            .iter()
            .map(|&(s, t, c)| (perm[s], perm[t], c))
            .collect();
        let cells = self
            .cells
            .iter()
            .map(|cell| cell.iter().map(|&v| perm[v]).sorted().collect())
            .collect();
        let labels = self.labels.as_ref().map(|labels| {
            let mut new = vec![0; labels.len()];
            for (v, &l) in labels.iter().enumerate() {
                new[perm[v]] = l;
            }
            new
        });
        Ok(Self::from_parts(
            self.n,
            self.directed,
            edges,
            cells,
            self.cell_colours.clone(),
            labels,
        ))
    }

    /// Check whether `perm` maps the graph onto itself
    pub fn is_automorphism(&self, perm: &[usize]) -> bool {
        is_permutation(perm, self.n)
            && (0..self.n).all(|v| self.colour[perm[v]] == self.colour[v])
            && self.relabelled_edges(perm) == self.sorted_edges
    }
}

/// Undirected edges are written with the larger endpoint first
pub(crate) fn normalise_edge(
    directed: bool,
    s: usize,
    t: usize,
    c: u32,
) -> (usize, usize, u32) {
    if !directed && s < t {
        (t, s, c)
    } else {
        (s, t, c)
    }
}

pub(crate) fn is_permutation(perm: &[usize], n: usize) -> bool {
    if perm.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    perm.iter()
        .all(|&v| v < n && !std::mem::replace(&mut seen[v], true))
}

/// Builder for [ColouredGraph]
///
/// Errors in the arguments are collected and reported by
/// [build](GraphBuilder::build), no work is done before that.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    n: usize,
    directed: bool,
    edges: Vec<(usize, usize, u32)>,
    vertex_colours: Option<Vec<u32>>,
    partition: Option<Vec<Vec<usize>>>,
    labels: Option<Vec<i64>>,
    error: Option<CanonError>,
}

impl GraphBuilder {
    fn new(n: usize, directed: bool) -> Self {
        Self {
            n,
            directed,
            ..Default::default()
        }
    }

    fn fail(&mut self, err: CanonError) {
        self.error.get_or_insert(err);
    }

    /// Add an edge with colour 0
    pub fn edge(mut self, source: usize, target: usize) -> Self {
        self.edges.push((source, target, 0));
        self
    }

    /// Add edges with colour 0
    pub fn edges<I>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        self.edges.extend(edges.into_iter().map(|(s, t)| (s, t, 0)));
        self
    }

    /// Add `(source, target, colour)` edges
    pub fn coloured_edges<I>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, u32)>,
    {
        self.edges.extend(edges);
        self
    }

    /// Add edges given as parallel lists of sources and targets
    pub fn edge_list(mut self, sources: &[usize], targets: &[usize]) -> Self {
        if sources.len() != targets.len() {
            self.fail(CanonError::EdgeListLength {
                sources: sources.len(),
                targets: targets.len(),
            });
            return self;
        }
        self.edges
            .extend(sources.iter().zip(targets).map(|(&s, &t)| (s, t, 0)));
        self
    }

    /// Set the colours of all edges added so far
    pub fn edge_colours(mut self, colours: &[u32]) -> Self {
        if colours.len() != self.edges.len() {
            self.fail(CanonError::EdgeColourCount {
                colours: colours.len(),
                edges: self.edges.len(),
            });
            return self;
        }
        for (edge, &c) in self.edges.iter_mut().zip(colours) {
            edge.2 = c;
        }
        self
    }

    /// Colour the vertices
    ///
    /// Colour classes are ordered by increasing colour.
    pub fn vertex_colours(mut self, colours: Vec<u32>) -> Self {
        self.vertex_colours = Some(colours);
        self
    }

    /// Colour the vertices with an ordered partition
    ///
    /// Every vertex must appear in exactly one cell.
    pub fn partition(mut self, cells: Vec<Vec<usize>>) -> Self {
        self.partition = Some(cells);
        self
    }

    /// Attach labels to the vertices
    ///
    /// Labels are carried along to the canonical form, but do not
    /// influence it.
    pub fn labels(mut self, labels: Vec<i64>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn build(self) -> Result<ColouredGraph, CanonError> {
        use CanonError::*;

        if let Some(err) = self.error {
            return Err(err);
        }
        let n = self.n;
        for (edge, &(s, t, _)) in self.edges.iter().enumerate() {
            if let Some(vertex) = [s, t].into_iter().find(|&v| v >= n) {
                return Err(VertexOutOfRange { edge, vertex, n });
            }
        }
        if let Some(labels) = &self.labels {
            if labels.len() != n {
                return Err(LabelCount {
                    labels: labels.len(),
                    n,
                });
            }
        }
        let (cells, cell_colours) = match (self.vertex_colours, self.partition)
        {
            (Some(_), Some(_)) => return Err(ConflictingColouring),
            (Some(colours), None) => cells_from_colours(colours, n)?,
            (None, Some(cells)) => {
                check_partition(&cells, n)?;
                let colours = (0..cells.len() as u32).collect();
                (cells, colours)
            }
            (None, None) if n == 0 => (vec![], vec![]),
            (None, None) => (vec![Vec::from_iter(0..n)], vec![0]),
        };
        Ok(ColouredGraph::from_parts(
            n,
            self.directed,
            self.edges,
            cells,
            cell_colours,
            self.labels,
        ))
    }
}

fn cells_from_colours(
    colours: Vec<u32>,
    n: usize,
) -> Result<(Vec<Vec<usize>>, Vec<u32>), CanonError> {
    if colours.len() != n {
        return Err(CanonError::VertexColourCount {
            colours: colours.len(),
            n,
        });
    }
    let mut vertices = Vec::from_iter(0..n);
    vertices.sort_by_key(|&v| (colours[v], v));
    let mut cells: Vec<Vec<usize>> = Vec::new();
    let mut cell_colours = Vec::new();
    for v in vertices {
        if cell_colours.last() != Some(&colours[v]) {
            cell_colours.push(colours[v]);
            cells.push(Vec::new());
        }
        if let Some(cell) = cells.last_mut() {
            cell.push(v);
        }
    }
    Ok((cells, cell_colours))
}

fn check_partition(cells: &[Vec<usize>], n: usize) -> Result<(), CanonError> {
    use CanonError::*;

    let mut seen = vec![false; n];
    for (cell, members) in cells.iter().enumerate() {
        if members.is_empty() {
            return Err(EmptyCell { cell });
        }
        for &vertex in members {
            if vertex >= n {
                return Err(CellVertexOutOfRange { cell, vertex, n });
            }
            if std::mem::replace(&mut seen[vertex], true) {
                return Err(DuplicateVertex { vertex });
            }
        }
    }
    match seen.iter().position(|covered| !covered) {
        Some(vertex) => Err(UncoveredVertex { vertex }),
        None => Ok(()),
    }
}
