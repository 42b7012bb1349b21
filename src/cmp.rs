use petgraph::{graph::IndexType, visit::EdgeRef, EdgeType, Graph};

use crate::canon::Canonical;

/// Check if two objects are identical
pub trait IsIdentical {
    fn is_identical(&self, other: &Self) -> bool;
}

impl<N: Eq, E: Eq, Ty: EdgeType, Ix: IndexType> IsIdentical
    for Graph<N, E, Ty, Ix>
{
    fn is_identical(&self, other: &Self) -> bool {
        self.node_count() == other.node_count()
            && self.edge_count() == other.edge_count()
            && self.node_weights().eq(other.node_weights())
            && self.edge_references().zip(other.edge_references()).all(
                |(e1, e2)| {
                    e1.source() == e2.source()
                        && e1.target() == e2.target()
                        && e1.weight() == e2.weight()
                },
            )
    }
}

/// Canonical forms are identical if they describe the same labelled
/// and coloured graph, regardless of the relabelling that produced them
impl IsIdentical for Canonical {
    fn is_identical(&self, other: &Self) -> bool {
        self.canonical_edges == other.canonical_edges
            && self.vertex_colours == other.vertex_colours
            && self.certificate == other.certificate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{canonical_form, ColouredGraph, Options};
    use petgraph::graph::UnGraph;

    #[test]
    fn ident() {
        let g1 = UnGraph::<(), ()>::from_edges([(0, 1), (0, 2)]);
        let g2 = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2)]);
        assert!(g1.is_identical(&g1));
        assert!(g2.is_identical(&g2));
        assert!(!g1.is_identical(&g2));
    }

    #[test]
    fn ident_node_wt() {
        use petgraph::visit::NodeIndexable;

        let g1 = UnGraph::<u8, ()>::from_edges([(0, 1), (0, 1)]);
        let mut g2 = UnGraph::<u8, ()>::from_edges([(0, 1), (0, 1)]);
        assert!(g1.is_identical(&g2));
        *g2.node_weight_mut(g2.from_index(0)).unwrap() = 1;
        assert!(!g1.is_identical(&g2));
    }

    #[test]
    fn ident_edge_wt() {
        let g1 = UnGraph::<(), u8>::from_edges([(0, 1, 0), (0, 1, 0)]);
        let g2 = UnGraph::<(), u8>::from_edges([(0, 1, 0), (0, 1, 1)]);
        assert!(!g1.is_identical(&g2));
    }

    #[test]
    fn ident_edge_count() {
        let g1 = UnGraph::<(), ()>::from_edges([(0, 1)]);
        let g2 = UnGraph::<(), ()>::from_edges([(0, 1), (0, 1)]);
        assert!(!g1.is_identical(&g2));
    }

    #[test]
    fn ident_canonical() {
        let options = Options {
            certificate: true,
            ..Default::default()
        };
        let canon = |edges: [(usize, usize); 2], colours| {
            let g = ColouredGraph::undirected(3)
                .edges(edges)
                .vertex_colours(colours)
                .build()
                .unwrap();
            canonical_form(&g, &options).unwrap()
        };
        let c1 = canon([(0, 1), (1, 2)], vec![0, 1, 0]);
        let c2 = canon([(2, 0), (0, 1)], vec![1, 0, 0]);
        let c3 = canon([(2, 0), (0, 1)], vec![0, 1, 0]);
        assert!(c1.is_identical(&c2));
        assert_ne!(c1.relabelling, c2.relabelling);
        assert!(!c1.is_identical(&c3));
    }

    #[test]
    fn ident_canonical_colours() {
        let canon = |colours| {
            let g = ColouredGraph::undirected(2)
                .vertex_colours(colours)
                .build()
                .unwrap();
            canonical_form(&g, &Options::default()).unwrap()
        };
        let c1 = canon(vec![0, 1]);
        let c2 = canon(vec![0, 0]);
        let c3 = canon(vec![1, 0]);
        assert!(c1.certificate.is_none());
        assert!(!c1.is_identical(&c2));
        assert!(c1.is_identical(&c3));
        assert_ne!(c1.autom_stats.grpsize(), c2.autom_stats.grpsize());
    }
}
