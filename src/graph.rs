use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use petgraph::{
    graph::{
        DefaultIx, EdgeIndex, EdgeReference, EdgeReferences, Graph, IndexType,
        Neighbors, NodeIndex, NodeIndices,
    },
    visit::{
        Data, EdgeCount, EdgeRef, GraphBase, GraphProp, IntoEdgeReferences,
        IntoNeighbors, IntoNodeIdentifiers, NodeCompactIndexable, NodeCount,
        NodeIndexable,
    },
    Directed, EdgeType, IntoWeightedEdge, Undirected,
};

use crate::canon::{IntoCanon, TryIntoCanon};
use crate::error::CanonError;
use crate::IsIdentical;

pub type CanonDiGraph<N, E, Ix = DefaultIx> = CanonGraph<N, E, Directed, Ix>;
pub type CanonUnGraph<N, E, Ix = DefaultIx> = CanonGraph<N, E, Undirected, Ix>;

/// Canonically labelled graph
///
/// A read-only view of a
/// [petgraph::Graph](https://docs.rs/petgraph/latest/petgraph/graph/struct.Graph.html)
/// in canonical form. Two `CanonGraph`s compare equal exactly if the
/// original graphs are isomorphic, so they can be used as keys in
/// hash sets and ordered maps.
///
/// # Example
///
/// ```rust
/// use std::collections::HashSet;
/// use petgraph::graph::UnGraph;
/// use canon_pet::prelude::*;
///
/// let g1 = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2)]);
/// let g2 = UnGraph::<(), ()>::from_edges([(0, 1), (0, 2)]);
///
/// let mut graphs = HashSet::new();
/// graphs.insert(CanonGraph::from(g1));
/// graphs.insert(CanonGraph::from(g2));
/// assert_eq!(graphs.len(), 1);
/// ```
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct CanonGraph<N, E, Ty: EdgeType = Directed, Ix: IndexType = DefaultIx>(
    Graph<N, E, Ty, Ix>,
);

impl<N, E, Ty, Ix> CanonGraph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    /// Gets a reference to the underlying `petgraph::Graph`
    pub fn get(&self) -> &Graph<N, E, Ty, Ix> {
        &self.0
    }

    pub fn into_inner(self) -> Graph<N, E, Ty, Ix> {
        self.0
    }

    pub fn node_count(&self) -> usize {
        self.0.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.0.edge_count()
    }

    pub fn is_directed(&self) -> bool {
        self.0.is_directed()
    }

    pub fn node_weights(&self) -> impl Iterator<Item = &N> {
        self.0.node_weights()
    }

    pub fn edge_references(&self) -> EdgeReferences<'_, E, Ix> {
        self.0.edge_references()
    }

    // edges as (source, target, weight), in insertion order
    fn edge_tuples(&self) -> impl Iterator<Item = (usize, usize, &E)> {
        self.0
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), e.weight()))
    }
}

impl<N, E, Ty, Ix> CanonGraph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
    Graph<N, E, Ty, Ix>: TryIntoCanon<Error = CanonError>,
{
    /// Canonically label `g`, reporting search failures
    pub fn try_from_graph(g: Graph<N, E, Ty, Ix>) -> Result<Self, CanonError> {
        g.try_into_canon().map(Self)
    }

    pub fn from_edges<I>(iterable: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoWeightedEdge<E>,
        <I::Item as IntoWeightedEdge<E>>::NodeId: Into<NodeIndex<Ix>>,
        N: Default,
    {
        Self(Graph::from_edges(iterable).into_canon())
    }
}

impl<N, E, Ty, Ix> AsRef<Graph<N, E, Ty, Ix>> for CanonGraph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    fn as_ref(&self) -> &Graph<N, E, Ty, Ix> {
        &self.0
    }
}

impl<N, E, Ty, Ix> From<Graph<N, E, Ty, Ix>> for CanonGraph<N, E, Ty, Ix>
where
    Graph<N, E, Ty, Ix>: IntoCanon,
    Ty: EdgeType,
    Ix: IndexType,
{
    fn from(g: Graph<N, E, Ty, Ix>) -> Self {
        Self(g.into_canon())
    }
}

impl<N, E, Ty, Ix> From<CanonGraph<N, E, Ty, Ix>> for Graph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    fn from(g: CanonGraph<N, E, Ty, Ix>) -> Self {
        g.0
    }
}

impl<N, E, Ty, Ix> Index<NodeIndex<Ix>> for CanonGraph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    type Output = N;

    fn index(&self, index: NodeIndex<Ix>) -> &N {
        &self.0[index]
    }
}

impl<N, E, Ty, Ix> GraphBase for CanonGraph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    type NodeId = NodeIndex<Ix>;
    type EdgeId = EdgeIndex<Ix>;
}

impl<N, E, Ty, Ix> Data for CanonGraph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    type NodeWeight = N;
    type EdgeWeight = E;
}

impl<N, E, Ty, Ix> GraphProp for CanonGraph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    type EdgeType = Ty;

    fn is_directed(&self) -> bool {
        self.0.is_directed()
    }
}

impl<N, E, Ty, Ix> NodeCount for CanonGraph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    fn node_count(&self) -> usize {
        self.0.node_count()
    }
}

impl<N, E, Ty, Ix> EdgeCount for CanonGraph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    fn edge_count(&self) -> usize {
        self.0.edge_count()
    }
}

impl<N, E, Ty, Ix> NodeIndexable for CanonGraph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    fn node_bound(&self) -> usize {
        self.0.node_bound()
    }

    fn to_index(&self, ix: NodeIndex<Ix>) -> usize {
        NodeIndexable::to_index(&self.0, ix)
    }

    fn from_index(&self, ix: usize) -> Self::NodeId {
        NodeIndexable::from_index(&self.0, ix)
    }
}

impl<N, E, Ty, Ix> NodeCompactIndexable for CanonGraph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
}

impl<'a, N: 'a, E: 'a, Ty, Ix> IntoEdgeReferences
    for &'a CanonGraph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    type EdgeRef = EdgeReference<'a, E, Ix>;
    type EdgeReferences = EdgeReferences<'a, E, Ix>;

    fn edge_references(self) -> Self::EdgeReferences {
        self.0.edge_references()
    }
}

impl<'a, N, E: 'a, Ty, Ix> IntoNeighbors for &'a CanonGraph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    type Neighbors = Neighbors<'a, E, Ix>;

    fn neighbors(self, n: NodeIndex<Ix>) -> Neighbors<'a, E, Ix> {
        self.0.neighbors(n)
    }
}

impl<'a, N, E: 'a, Ty, Ix> IntoNodeIdentifiers for &'a CanonGraph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    type NodeIdentifiers = NodeIndices<Ix>;

    fn node_identifiers(self) -> NodeIndices<Ix> {
        self.0.node_indices()
    }
}

impl<N, E, Ty, Ix> PartialEq for CanonGraph<N, E, Ty, Ix>
where
    N: Eq,
    E: Eq,
    Ty: EdgeType,
    Ix: IndexType,
{
    fn eq(&self, other: &Self) -> bool {
        self.0.is_identical(&other.0)
    }
}

impl<N: Eq, E: Eq, Ty: EdgeType, Ix: IndexType> Eq
    for CanonGraph<N, E, Ty, Ix>
{
}

impl<N: Hash, E: Hash, Ty: EdgeType, Ix: IndexType> Hash
    for CanonGraph<N, E, Ty, Ix>
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.node_count().hash(state);
        for w in self.0.node_weights() {
            w.hash(state)
        }
        for e in self.edge_tuples() {
            e.hash(state);
        }
    }
}

// Not meaningful beyond being consistent with equality
impl<N: Ord, E: Ord, Ty: EdgeType, Ix: IndexType> Ord
    for CanonGraph<N, E, Ty, Ix>
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .node_weights()
            .cmp(other.0.node_weights())
            .then_with(|| self.edge_tuples().cmp(other.edge_tuples()))
    }
}

impl<N: Ord, E: Ord, Ty: EdgeType, Ix: IndexType> PartialOrd
    for CanonGraph<N, E, Ty, Ix>
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::{BTreeSet, HashSet};

    use log::debug;
    use petgraph::algo::connected_components;
    use rand::prelude::*;
    use rand_xoshiro::Xoshiro256Plus;
    use testing::{randomize_labels, GraphIter};

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn random_canon_graph() {
        log_init();

        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let graphs = GraphIter::<Undirected>::default();

        for g in graphs.take(1000) {
            debug!("Initial graph: {g:#?}");
            let gg = randomize_labels(g.clone(), &mut rng);
            debug!("Randomised graph: {gg:#?}");
            let g = CanonGraph::from(g);
            debug!("Canonical graph (from initial): {g:#?}");
            let gg = CanonGraph::from(gg);
            debug!("Canonical graph (from randomised): {gg:#?}");
            assert_eq!(g, gg);
            assert_eq!(g.cmp(&gg), Ordering::Equal);
        }
    }

    #[test]
    fn dedup() {
        log_init();

        // all three are paths with two edges
        let g1 = CanonUnGraph::<(), ()>::from_edges([(0, 1), (1, 2)]);
        let g2 = CanonUnGraph::<(), ()>::from_edges([(0, 1), (0, 2)]);
        let g3 = CanonUnGraph::<(), ()>::from_edges([(2, 0), (1, 2)]);
        let triangle =
            CanonUnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 0)]);

        let hashed = HashSet::from([g1.clone(), g2.clone(), g3.clone(), triangle.clone()]);
        assert_eq!(hashed.len(), 2);
        let ordered = BTreeSet::from([g1, g2, g3, triangle]);
        assert_eq!(ordered.len(), 2);
    }

    #[test]
    fn ordering() {
        let g1 = CanonDiGraph::<(), ()>::from_edges([(0, 1), (1, 2)]);
        let g2 = CanonDiGraph::<(), ()>::from_edges([(0, 1), (0, 2)]);
        assert_ne!(g1, g2);
        assert_eq!(g1.cmp(&g2), g2.cmp(&g1).reverse());
        assert_ne!(g1.cmp(&g2), Ordering::Equal);
    }

    #[test]
    fn visit() {
        let g = CanonUnGraph::<u8, ()>::from_edges([(0, 1), (2, 3)]);
        assert_eq!(connected_components(&g), 2);
        assert_eq!(g.node_identifiers().count(), 4);
        let n = g.from_index(0);
        assert_eq!(g.neighbors(n).count(), 1);
        assert_eq!(g[n], 0);
    }

    #[test]
    fn fallible() {
        let g = petgraph::graph::DiGraph::<u8, u8>::from_edges([(0, 1, 2), (1, 0, 2)]);
        let c = CanonGraph::try_from_graph(g.clone()).unwrap();
        assert_eq!(c, CanonGraph::from(g));
        assert_eq!(c.edge_count(), 2);
        assert!(c.is_directed());
    }
}
