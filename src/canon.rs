use std::fmt::Debug;

use log::debug;
use petgraph::{
    graph::{Graph, IndexType},
    EdgeType,
};
#[cfg(feature = "serde-1")]
use serde::{Deserialize, Serialize};

use crate::autom::AutomStats;
use crate::coloured_graph::{normalise_edge, ColouredGraph};
use crate::error::CanonError;
use crate::options::Options;
use crate::pet_graph::{apply_perm, inv_perm, relabel, to_coloured};
use crate::search::{SearchStats, Session};
use crate::select::Certificate;

/// Canonical form of a coloured graph
///
/// For any two isomorphic graphs, `canonical_edges` and `certificate`
/// are identical. The relabellings differ by the isomorphism.
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Canonical {
    /// All edges under the canonical labelling, sorted
    ///
    /// Undirected edges are written with the larger vertex first.
    pub canonical_edges: Vec<(usize, usize, u32)>,
    /// The input edges in their original order, relabelled and
    /// normalised like `canonical_edges` but not sorted
    pub mapped_edges: Vec<(usize, usize, u32)>,
    /// Colour of each vertex, in canonical order
    pub vertex_colours: Vec<u32>,
    /// Vertex `v` has canonical label `relabelling[v]`
    pub relabelling: Vec<usize>,
    /// Vertex labels in canonical order
    pub labels: Option<Vec<i64>>,
    /// Only present if requested in the [Options]
    pub certificate: Option<Certificate>,
    pub autom_stats: AutomStats,
    /// Generators of the automorphism group found during the search
    pub generators: Vec<Vec<usize>>,
    pub search: SearchStats,
}

impl Canonical {
    /// The original vertices in canonical order
    pub fn order(&self) -> Vec<usize> {
        inv_perm(&self.relabelling)
    }
}

/// Compute the canonical form of a coloured graph
///
/// # Example
///
/// ```rust
/// use canon_pet::{canonical_form, ColouredGraph, Options};
///
/// // the same path, labelled in two different ways
/// let g1 = ColouredGraph::undirected(3).edges([(0, 1), (1, 2)]).build()?;
/// let g2 = ColouredGraph::undirected(3).edges([(2, 0), (0, 1)]).build()?;
///
/// let c1 = canonical_form(&g1, &Options::default())?;
/// let c2 = canonical_form(&g2, &Options::default())?;
/// assert_eq!(c1.canonical_edges, c2.canonical_edges);
/// assert_eq!(c1.autom_stats.grpsize(), 2.);
/// # Ok::<(), canon_pet::error::CanonError>(())
/// ```
pub fn canonical_form(
    graph: &ColouredGraph,
    options: &Options,
) -> Result<Canonical, CanonError> {
    debug!(
        "Canonical form of graph with {} vertices and {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );
    let outcome = Session::new(graph, options).run()?;
    let best = outcome.best;
    let relabelling = inv_perm(&best.order);
    let labels = graph.labels().map(|labels| {
        let mut labels = labels.to_vec();
        apply_perm(&mut labels, relabelling.clone());
        labels
    });
    let mapped_edges = graph
        .edges()
        .iter()
        .map(|&(s, t, c)| {
            normalise_edge(graph.is_directed(), relabelling[s], relabelling[t], c)
        })
        .collect();
    let vertex_colours = Vec::from_iter(
        best.order.iter().map(|&v| graph.cell_colour(graph.colour(v))),
    );
    let certificate = options.certificate.then(|| Certificate {
        n: graph.vertex_count(),
        directed: graph.is_directed(),
        vertex_colours: vertex_colours.clone(),
        edges: best.edges.clone(),
    });
    Ok(Canonical {
        canonical_edges: best.edges,
        mapped_edges,
        vertex_colours,
        relabelling,
        labels,
        certificate,
        autom_stats: outcome.autom_stats,
        generators: outcome.group.generators().to_vec(),
        search: outcome.stats,
    })
}

/// Find the canonical labelling for a graph
pub trait IntoCanon {
    fn into_canon(self) -> Self;
}

/// Try to find the canonical labelling for a graph
pub trait TryIntoCanon {
    type Error;

    fn try_into_canon(self) -> Result<Self, Self::Error>
    where
        Self: Sized;
}

impl<N, E, Ty: EdgeType, Ix: IndexType> IntoCanon for Graph<N, E, Ty, Ix>
where
    Graph<N, E, Ty, Ix>: TryIntoCanon,
    <Graph<N, E, Ty, Ix> as TryIntoCanon>::Error: Debug,
{
    fn into_canon(self) -> Self {
        self.try_into_canon().unwrap()
    }
}

impl<N, E, Ty, Ix> TryIntoCanon for Graph<N, E, Ty, Ix>
where
    N: Ord,
    E: Ord,
    Ty: EdgeType,
    Ix: IndexType,
{
    type Error = CanonError;

    fn try_into_canon(self) -> Result<Self, Self::Error> {
        if self.node_count() == 0 {
            return Ok(self);
        }
        let g = to_coloured(&self)?;
        let canon = canonical_form(&g, &Options::default())?;
        Ok(relabel(self, &canon.relabelling))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmp::IsIdentical;
    use crate::coloured_graph::is_permutation;
    use petgraph::{
        algo::isomorphism::is_isomorphic,
        graph::{Graph, UnGraph},
        Directed, Undirected,
    };
    use rand::prelude::*;
    use rand_xoshiro::Xoshiro256Plus;
    use testing::{
        random_coloured_edges, random_permutation, randomize_labels, GraphIter,
    };

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn options() -> Options {
        Options {
            certificate: true,
            verify_refinement: true,
            ..Default::default()
        }
    }

    fn undirected(n: usize, edges: &[(usize, usize)]) -> ColouredGraph {
        ColouredGraph::undirected(n)
            .edges(edges.iter().copied())
            .build()
            .unwrap()
    }

    fn grpsize(g: &ColouredGraph) -> f64 {
        canonical_form(g, &options()).unwrap().autom_stats.grpsize()
    }

    fn random_graph(rng: &mut impl Rng) -> ColouredGraph {
        let n = rng.gen_range(1..12);
        let edges = random_coloured_edges(n, 0.3, 2, rng);
        let colours = Vec::from_iter((0..n).map(|_| rng.gen_range(0..3)));
        let builder = if rng.gen() {
            ColouredGraph::directed(n)
        } else {
            ColouredGraph::undirected(n)
        };
        builder
            .coloured_edges(edges)
            .vertex_colours(colours)
            .build()
            .unwrap()
    }

    #[test]
    fn coloured_cycle() {
        log_init();

        let g = ColouredGraph::undirected(5)
            .edge_list(&[0, 1, 2, 3, 4], &[1, 2, 3, 4, 0])
            .partition(vec![vec![0, 1, 2], vec![3, 4]])
            .labels(vec![10, 11, 12, 13, 14])
            .build()
            .unwrap();
        let canon = canonical_form(&g, &options()).unwrap();
        assert_eq!(
            canon.canonical_edges,
            [(2, 0, 0), (2, 1, 0), (3, 0, 0), (4, 1, 0), (4, 3, 0)]
        );
        // input edges in input order
        assert_eq!(
            canon.mapped_edges,
            [(2, 0, 0), (2, 1, 0), (4, 1, 0), (4, 3, 0), (3, 0, 0)]
        );
        assert_eq!(canon.vertex_colours, [0, 0, 0, 1, 1]);
        assert_eq!(canon.relabelling, [0, 2, 1, 4, 3]);
        assert_eq!(canon.order(), [0, 2, 1, 4, 3]);
        assert_eq!(canon.labels, Some(vec![10, 12, 11, 14, 13]));
        assert_eq!(canon.autom_stats.grpsize(), 2.);

        let Some(cert) = canon.certificate else {
            panic!("no certificate")
        };
        assert_eq!(cert.n, 5);
        assert!(!cert.directed);
        assert_eq!(cert.vertex_colours, [0, 0, 0, 1, 1]);
        assert_eq!(cert.edges, canon.canonical_edges);
    }

    #[test]
    fn trivial() {
        log_init();

        let canon = canonical_form(&undirected(0, &[]), &options()).unwrap();
        assert!(canon.relabelling.is_empty());
        assert!(canon.canonical_edges.is_empty());

        let canon = canonical_form(&undirected(1, &[]), &options()).unwrap();
        assert_eq!(canon.relabelling, [0]);
        assert!(canon.canonical_edges.is_empty());
        assert!(canon.generators.is_empty());
    }

    #[test]
    fn isolated_vertices() {
        log_init();

        let g = undirected(6, &[(4, 1)]);
        let canon = canonical_form(&g, &options()).unwrap();
        assert!(is_permutation(&canon.relabelling, 6));
        assert_eq!(canon.canonical_edges.len(), 1);
        assert!((canon.autom_stats.grpsize() - 48.).abs() < 1e-9);
    }

    #[test]
    fn known_groups() {
        log_init();

        let petersen = undirected(
            10,
            &[
                (0, 1), (1, 2), (2, 3), (3, 4), (4, 0),
                (0, 5), (1, 6), (2, 7), (3, 8), (4, 9),
                (5, 7), (7, 9), (9, 6), (6, 8), (8, 5),
            ],
        );
        assert!((grpsize(&petersen) - 120.).abs() < 1e-6);

        let cube = Vec::from_iter((0..8usize).flat_map(|v| {
            (0..3).map(move |bit| (v, v ^ (1 << bit))).filter(|(v, w)| v < w)
        }));
        assert!((grpsize(&undirected(8, &cube)) - 48.).abs() < 1e-6);

        let k5 = Vec::from_iter(
            (0..5).flat_map(|i| (i + 1..5).map(move |j| (i, j))),
        );
        assert!((grpsize(&undirected(5, &k5)) - 120.).abs() < 1e-6);

        // two triangles
        let g = undirected(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
        let canon = canonical_form(&g, &options()).unwrap();
        assert!((canon.autom_stats.grpsize() - 72.).abs() < 1e-6);
        assert_eq!(canon.autom_stats.num_orbits, 1);
    }

    #[test]
    fn invariance() {
        log_init();

        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        for _ in 0..500 {
            let g = random_graph(&mut rng);
            let perm = random_permutation(g.vertex_count(), &mut rng);
            let h = g.permuted(&perm).unwrap();
            let cg = canonical_form(&g, &options()).unwrap();
            let ch = canonical_form(&h, &options()).unwrap();
            assert_eq!(cg.canonical_edges, ch.canonical_edges);
            assert_eq!(cg.certificate, ch.certificate);
            assert_eq!(cg.vertex_colours, ch.vertex_colours);
            assert!(cg.is_identical(&ch));
            let (sg, sh) = (cg.autom_stats.grpsize(), ch.autom_stats.grpsize());
            assert!((sg - sh).abs() < 1e-6);
            assert!(is_permutation(&cg.relabelling, g.vertex_count()));
            for gen in &cg.generators {
                assert!(g.is_automorphism(gen));
            }
        }
    }

    #[test]
    fn idempotence() {
        log_init();

        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        for _ in 0..200 {
            let g = random_graph(&mut rng);
            let canon = canonical_form(&g, &options()).unwrap();
            let Some(cert) = canon.certificate else {
                panic!("no certificate")
            };
            let builder = if cert.directed {
                ColouredGraph::directed(cert.n)
            } else {
                ColouredGraph::undirected(cert.n)
            };
            let h = builder
                .coloured_edges(cert.edges.iter().copied())
                .vertex_colours(cert.vertex_colours.clone())
                .build()
                .unwrap();
            let again = canonical_form(&h, &options()).unwrap();
            assert_eq!(again.canonical_edges, cert.edges);
            assert_eq!(again.certificate, Some(cert));
        }
    }

    #[test]
    fn discrimination() {
        log_init();

        let path = undirected(4, &[(0, 1), (1, 2), (2, 3)]);
        let star = undirected(4, &[(0, 1), (0, 2), (0, 3)]);
        let c1 = canonical_form(&path, &options()).unwrap();
        let c2 = canonical_form(&star, &options()).unwrap();
        assert_ne!(c1.canonical_edges, c2.canonical_edges);

        // same structure, different colouring
        let coloured = ColouredGraph::undirected(4)
            .edges([(0, 1), (1, 2), (2, 3)])
            .vertex_colours(vec![0, 1, 0, 0])
            .build()
            .unwrap();
        let c3 = canonical_form(&coloured, &options()).unwrap();
        assert_ne!(c1.certificate, c3.certificate);

        // a directed edge is not an undirected one
        let d = ColouredGraph::directed(2).edge(0, 1).build().unwrap();
        let u = ColouredGraph::undirected(2).edge(0, 1).build().unwrap();
        let cd = canonical_form(&d, &options()).unwrap();
        let cu = canonical_form(&u, &options()).unwrap();
        assert_ne!(cd.certificate, cu.certificate);
    }

    #[test]
    fn limits() {
        log_init();

        let k6 = Vec::from_iter(
            (0..6).flat_map(|i| (i + 1..6).map(move |j| (i, j))),
        );
        let g = undirected(6, &k6);
        let options = Options {
            node_limit: Some(2),
            ..Default::default()
        };
        let err = canonical_form(&g, &options).unwrap_err();
        assert_eq!(err, CanonError::NodeLimit(2));
        assert_eq!(err.kind(), crate::error::ErrorKind::ResourceExhausted);
    }

    #[test]
    fn triangle() {
        log_init();

        use petgraph::visit::NodeIndexable;
        let mut g1 = UnGraph::<u8, ()>::from_edges([
            (0, 0),
            (1, 1),
            (0, 1),
            (0, 2),
            (1, 2),
            (1, 2),
        ]);
        *g1.node_weight_mut(g1.from_index(0)).unwrap() = 2;
        *g1.node_weight_mut(g1.from_index(1)).unwrap() = 2;
        let g1 = g1.into_canon();

        let mut g2 = UnGraph::<u8, ()>::from_edges([
            (0, 0),
            (1, 1),
            (0, 1),
            (0, 2),
            (0, 2),
            (1, 2),
        ]);
        *g2.node_weight_mut(g2.from_index(0)).unwrap() = 2;
        *g2.node_weight_mut(g2.from_index(1)).unwrap() = 2;
        let g2 = g2.into_canon();

        assert!(g1.is_identical(&g2));
    }

    fn tst_random_canon<Ty: Debug + EdgeType>(graphs: GraphIter<Ty>, count: usize) {
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        for g in graphs.take(count) {
            debug!("Initial graph: {g:#?}");
            let gg = randomize_labels(g.clone(), &mut rng);
            debug!("Randomised graph: {gg:#?}");
            assert!(is_isomorphic(&g, &gg));
            let g = g.into_canon();
            debug!("Canonical graph (from initial): {g:#?}");
            assert!(is_isomorphic(&g, &gg));
            let gg = gg.into_canon();
            debug!("Canonical graph (from randomised): {gg:#?}");
            assert!(is_isomorphic(&g, &gg));
            assert!(g.is_identical(&gg));
        }
    }

    #[test]
    fn random_canon_undirected() {
        log_init();
        tst_random_canon(GraphIter::<Undirected>::default(), 1000);
    }

    #[test]
    fn random_canon_directed() {
        log_init();
        tst_random_canon(GraphIter::<Directed>::default(), 700);
    }

    #[test]
    fn empty() {
        log_init();

        let g = Graph::<(), (), _>::new_undirected();
        assert!(g.is_identical(&g.clone().into_canon()));
    }
}
