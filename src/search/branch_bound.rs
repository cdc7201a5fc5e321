use std::rc::Rc;
use std::time::Instant;

use dogs::search_algorithm::{NeverStoppingCriterion, StoppingCriterion};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::color::{Coloring, ConflictGraph, VertexId};
use crate::search::{ColoringEngine, round_time};
use crate::search::clique_bound::CliqueBoundOracle;
use crate::search::greedy_degree::greedy_degree;


/**
Branch & bound coloring.
The incumbent is seeded by the greedy largest-degree-first coloring. A node with k colors
and a clique bound b on its uncolored vertices is cut if k+b reaches the incumbent.
Branching vertex: maximizes 2·degree + nb colored neighbors (first one in index order).
Branches: every existing compatible color, then a new color if it can improve.
*/
#[derive(Debug)]
pub struct BranchBoundSolver<Stop:StoppingCriterion=NeverStoppingCriterion> {
    /// instance
    inst: Rc<dyn ConflictGraph>,
    /// memoized clique bound
    oracle: CliqueBoundOracle,
    /// stopping criterion checked at each node
    stopping_criterion: Stop,
    /// optional maximum number of nodes
    node_limit: Option<usize>,
    /// best coloring found so far
    best: Coloring,
    /// number of colors of the best coloring
    best_k: usize,
    /// nb nodes visited
    nodes: usize,
    /// nb nodes cut by the bound
    cuts: usize,
    /// true if the last solve was interrupted
    stopped: bool,
    /// duration of the last solve (seconds)
    time: f32,
}

impl BranchBoundSolver<NeverStoppingCriterion> {
    /** creates a solver that explores the whole search tree */
    pub fn new(inst:Rc<dyn ConflictGraph>) -> Self {
        Self::with_stopping_criterion(inst, NeverStoppingCriterion::default())
    }
}

impl<Stop:StoppingCriterion> BranchBoundSolver<Stop> {
    /** creates a solver that returns its incumbent once the stopping criterion is met */
    pub fn with_stopping_criterion(inst:Rc<dyn ConflictGraph>, stopping_criterion:Stop) -> Self {
        let n = inst.nb_vertices();
        Self {
            oracle: CliqueBoundOracle::new(inst.clone()),
            inst,
            stopping_criterion,
            node_limit: None,
            best: Vec::new(),
            best_k: n,
            nodes: 0,
            cuts: 0,
            stopped: false,
            time: 0.,
        }
    }

    /// stops the search after visiting nb_nodes nodes
    pub fn with_node_limit(mut self, nb_nodes:usize) -> Self {
        self.node_limit = Some(nb_nodes);
        self
    }

    /// number of nodes visited by the last solve
    pub fn nb_nodes(&self) -> usize { self.nodes }

    /// number of cuts of the last solve
    pub fn nb_cuts(&self) -> usize { self.cuts }

    /// true if the last solve was interrupted
    pub fn was_stopped(&self) -> bool { self.stopped }

    /// gives the stopping criterion back
    pub fn into_stopping_criterion(self) -> Stop { self.stopping_criterion }

    fn is_stopped(&mut self) -> bool {
        if !self.stopped {
            self.stopped = self.stopping_criterion.is_finished()
                || self.node_limit.map_or(false, |l| self.nodes >= l);
        }
        self.stopped
    }

    /// uncolored vertex maximizing 2·degree + nb colored neighbors
    fn select(&self, colors:&[Option<usize>]) -> Option<VertexId> {
        let mut best:Option<(VertexId,usize)> = None;
        for v in self.inst.vertices().filter(|v| colors[*v].is_none()) {
            let nb_colored = self.inst.neighbors(v).iter()
                .filter(|u| colors[**u].is_some())
                .count();
            let score = 2*self.inst.degree(v) + nb_colored;
            if best.map_or(true, |(_,s)| score > s) {
                best = Some((v, score));
            }
        }
        best.map(|(v,_)| v)
    }

    fn search(&mut self, colors:&mut Vec<Option<usize>>, k:usize, bound:usize) {
        if self.is_stopped() { return; }
        self.nodes += 1;
        if k + bound >= self.best_k {
            self.cuts += 1;
            return;
        }
        let v = match self.select(colors) {
            None => { // every vertex is colored
                if k < self.best_k {
                    debug!(colors=k, nodes=self.nodes, "branch and bound: new best");
                    self.best_k = k;
                    self.best = colors.iter().flatten().copied().collect();
                }
                return;
            }
            Some(v) => v,
        };
        let remaining:Vec<VertexId> = self.inst.vertices()
            .filter(|u| colors[*u].is_none() && *u != v)
            .collect();
        // existing colors
        for c in 0..k {
            let safe = self.inst.neighbors(v).iter().all(|u| colors[*u] != Some(c));
            if safe {
                colors[v] = Some(c);
                let nb = self.oracle.bound(&remaining);
                self.search(colors, k, nb);
                colors[v] = None;
                if self.best_k == bound || self.stopped { return; }
            }
        }
        // new color
        if k + 1 < self.best_k {
            colors[v] = Some(k);
            let nb = self.oracle.bound(&remaining);
            self.search(colors, k+1, nb);
            colors[v] = None;
        }
    }
}

impl<Stop:StoppingCriterion> ColoringEngine for BranchBoundSolver<Stop> {
    fn name(&self) -> &'static str { "branch and bound" }

    fn solve(&mut self) -> (Coloring, usize) {
        let start = Instant::now();
        self.nodes = 0;
        self.cuts = 0;
        self.stopped = false;
        self.oracle.clear();
        let (init, init_k) = greedy_degree(self.inst.clone());
        self.best = init;
        self.best_k = init_k;
        if self.inst.nb_vertices() > 0 {
            let all_vertices:Vec<VertexId> = self.inst.vertices().collect();
            let bound = self.oracle.bound(&all_vertices);
            let mut colors = vec![None ; self.inst.nb_vertices()];
            self.search(&mut colors, 0, bound);
        }
        self.time = start.elapsed().as_secs_f32();
        info!(
            colors=self.best_k, nodes=self.nodes, cuts=self.cuts,
            cache_size=self.oracle.cache_size(), stopped=self.stopped,
            "branch and bound finished in {:.3}s", self.time
        );
        (self.best.clone(), self.best_k)
    }

    fn statistics(&self) -> Value {
        json!({
            "nodes": self.nodes,
            "cuts": self.cuts,
            "cache_size": self.oracle.cache_size(),
            "stopped": self.stopped,
            "time": round_time(self.time),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use dogs::search_algorithm::TimeStoppingCriterion;

    use crate::color::{check_coloring, CheckerResult};
    use crate::compact_instance::CompactInstance;

    fn solve(n:usize, edges:&[(VertexId,VertexId)]) -> (Rc<dyn ConflictGraph>, Coloring, usize) {
        let inst:Rc<dyn ConflictGraph> = Rc::new(CompactInstance::from_edges(n, edges));
        let mut solver = BranchBoundSolver::new(inst.clone());
        let (coloring, k) = solver.solve();
        (inst, coloring, k)
    }

    #[test]
    fn test_empty_graph() {
        let (_, coloring, k) = solve(0, &[]);
        assert!(coloring.is_empty());
        assert_eq!(k, 0);
    }

    #[test]
    fn test_small_graphs() {
        assert_eq!(solve(1, &[]).2, 1);
        assert_eq!(solve(2, &[]).2, 1);
        assert_eq!(solve(2, &[(0,1)]).2, 2);
        assert_eq!(solve(3, &[(0,1), (1,2), (0,2)]).2, 3);
    }

    #[test]
    fn test_odd_cycle() {
        let (inst, coloring, k) = solve(5, &[(0,1), (1,2), (2,3), (3,4), (4,0)]);
        assert_eq!(k, 3);
        assert_eq!(check_coloring(inst, &coloring), CheckerResult::Ok(3));
    }

    #[test]
    fn test_lower_bound_and_validity() {
        let inst = CompactInstance::from_dimacs_file("insts/dimacs/myciel3.col").unwrap();
        let inst:Rc<dyn ConflictGraph> = Rc::new(inst);
        let mut solver = BranchBoundSolver::new(inst.clone());
        let (coloring, k) = solver.solve();
        let all:Vec<VertexId> = inst.vertices().collect();
        let mut oracle = CliqueBoundOracle::new(inst.clone());
        assert!(k >= oracle.bound(&all));
        assert!(k <= inst.nb_vertices());
        assert_eq!(check_coloring(inst, &coloring), CheckerResult::Ok(k));
        assert!(solver.nb_nodes() >= 1);
    }

    #[test]
    fn test_deterministic() {
        let inst:Rc<dyn ConflictGraph> = Rc::new(
            CompactInstance::from_dimacs_file("insts/dimacs/myciel3.col").unwrap()
        );
        let mut solver = BranchBoundSolver::new(inst.clone());
        let (_, k1) = solver.solve();
        let nodes1 = solver.nb_nodes();
        let (_, k2) = solver.solve();
        assert_eq!(k1, k2);
        assert_eq!(nodes1, solver.nb_nodes());
        assert_eq!(solver.statistics()["nodes"], json!(nodes1));
    }

    #[test]
    fn test_never_worse_than_greedy() {
        let inst:Rc<dyn ConflictGraph> = Rc::new(
            CompactInstance::from_dimacs_file("insts/dimacs/crown8.col").unwrap()
        );
        let (_, greedy_k) = greedy_degree(inst.clone());
        assert_eq!(greedy_k, 4);
        let mut solver = BranchBoundSolver::with_stopping_criterion(
            inst.clone(), TimeStoppingCriterion::new(10.)
        );
        let (coloring, k) = solver.solve();
        assert!(k <= greedy_k);
        assert_eq!(check_coloring(inst, &coloring), CheckerResult::Ok(k));
    }

    #[test]
    fn test_node_limit_keeps_incumbent() {
        let inst:Rc<dyn ConflictGraph> = Rc::new(
            CompactInstance::from_dimacs_file("insts/dimacs/myciel3.col").unwrap()
        );
        let mut solver = BranchBoundSolver::new(inst.clone()).with_node_limit(1);
        let (coloring, k) = solver.solve();
        assert!(solver.nb_nodes() <= 1);
        assert_eq!(check_coloring(inst, &coloring), CheckerResult::Ok(k));
    }
}
