//! Search engines for the timetabling coloring problem.

use serde_json::Value;

use crate::color::Coloring;

/// greedy largest-degree-first coloring (initial upper bound)
pub mod greedy_degree;

/// memoized greedy clique lower bound
pub mod clique_bound;

/// branch & bound coloring with the clique bound
pub mod branch_bound;

/// clique-seeded backtracking (Brown)
pub mod brown;

/// maximal independent set enumeration and set covering
pub mod independent_sets;


/**
common interface of the coloring engines.
Engines are single-threaded; a solve blocks until the search space is exhausted or the
stopping criterion given at construction fires.
*/
pub trait ColoringEngine {
    /// name of the engine (used for reporting)
    fn name(&self) -> &'static str;

    /// runs the search. returns a complete feasible coloring and its number of colors
    fn solve(&mut self) -> (Coloring, usize);

    /// counters of the last solve (reporting only)
    fn statistics(&self) -> Value;
}

/// seconds rounded to the millisecond
pub(crate) fn round_time(t:f32) -> f64 {
    (f64::from(t) * 1000.).round() / 1000.
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::rc::Rc;

    use crate::color::{check_coloring, CheckerResult, ConflictGraph, VertexId};
    use crate::compact_instance::CompactInstance;
    use crate::search::branch_bound::BranchBoundSolver;
    use crate::search::brown::BrownSolver;
    use crate::search::clique_bound::CliqueBoundOracle;
    use crate::search::independent_sets::IndependentSetSolver;

    fn engines(inst:&Rc<dyn ConflictGraph>) -> Vec<Box<dyn ColoringEngine>> {
        vec![
            Box::new(BranchBoundSolver::new(inst.clone())),
            Box::new(BrownSolver::new(inst.clone())),
            Box::new(IndependentSetSolver::new(inst.clone())),
        ]
    }

    /// (graph, chromatic number when every engine reaches it)
    fn graphs() -> Vec<(Rc<dyn ConflictGraph>, Option<usize>)> {
        vec![
            (Rc::new(CompactInstance::from_edges(3, &[(0,1), (1,2), (0,2)])), Some(3)),
            (Rc::new(CompactInstance::from_edges(5, &[(0,1), (1,2), (2,3), (3,4), (4,0)])), Some(3)),
            (Rc::new(CompactInstance::from_edges(4, &[(0,1), (1,2), (2,3)])), Some(2)),
            (Rc::new(CompactInstance::from_dimacs_file("insts/dimacs/myciel3.col").unwrap()), None),
        ]
    }

    #[test]
    fn test_engine_properties() {
        for (inst, expected) in graphs() {
            let all:Vec<VertexId> = inst.vertices().collect();
            let clique_bound = CliqueBoundOracle::new(inst.clone()).bound(&all);
            let mut results = Vec::new();
            for mut engine in engines(&inst) {
                let (coloring, k) = engine.solve();
                assert_eq!(coloring.len(), inst.nb_vertices());
                assert_eq!(check_coloring(inst.clone(), &coloring), CheckerResult::Ok(k), "{}", engine.name());
                assert!(k <= inst.nb_vertices());
                assert!(k >= clique_bound);
                assert_eq!(engine.solve().1, k, "{} is not deterministic", engine.name());
                if let Some(chi) = expected {
                    assert_eq!(k, chi, "{}", engine.name());
                }
                results.push(k);
            }
            // branch & bound never worse than the clique-seeded engine (its fallback)
            assert!(results[0] <= results[1]);
        }
    }

    #[test]
    fn test_triangle_clique_bound() {
        let inst:Rc<dyn ConflictGraph> = Rc::new(CompactInstance::from_edges(3, &[(0,1), (1,2), (0,2)]));
        assert_eq!(CliqueBoundOracle::new(inst).bound(&[0,1,2]), 3);
    }

    #[test]
    fn test_round_time() {
        assert!((round_time(1.23456) - 1.235).abs() < 1e-9);
        assert_eq!(round_time(0.), 0.);
    }
}
