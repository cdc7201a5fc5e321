use std::rc::Rc;
use std::time::Instant;

use dogs::search_algorithm::{NeverStoppingCriterion, StoppingCriterion};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::color::{Coloring, ConflictGraph, VertexId};
use crate::search::{ColoringEngine, round_time};
use crate::search::branch_bound::BranchBoundSolver;
use crate::search::greedy_degree::{greedy_degree, greedy_degree_clique};


/**
Clique-seeded backtracking (Brown's algorithm).
A greedy clique is colored with distinct slots before the search starts. Nodes are cut with
max(1 + max residual degree, clique size, 1 + nb colored vertices).
Branching vertex: the uncolored vertex with the most colored neighbors (first one in index order).

The combined bound may cut every complete coloring. In this case, the solver runs the
branch & bound engine on the same graph and returns its result.
*/
#[derive(Debug)]
pub struct BrownSolver<Stop:StoppingCriterion=NeverStoppingCriterion> {
    /// instance
    inst: Rc<dyn ConflictGraph>,
    /// stopping criterion checked at each node (lent to the fallback while it runs)
    stopping_criterion: Option<Stop>,
    /// optional maximum number of nodes
    node_limit: Option<usize>,
    /// seeding clique
    clique: Vec<VertexId>,
    /// best coloring found so far (None if no complete coloring reached)
    best: Option<Coloring>,
    /// number of colors of the best coloring
    best_k: usize,
    /// nb nodes visited
    nodes: usize,
    /// nb nodes cut by the bound
    cuts: usize,
    /// true if the result comes from the branch & bound fallback
    fallback: bool,
    /// true if the last solve (or its fallback) was interrupted
    stopped: bool,
    /// duration of the last solve (seconds)
    time: f32,
}

impl BrownSolver<NeverStoppingCriterion> {
    /** creates a solver that explores the whole search tree */
    pub fn new(inst:Rc<dyn ConflictGraph>) -> Self {
        Self::with_stopping_criterion(inst, NeverStoppingCriterion::default())
    }
}

impl<Stop:StoppingCriterion> BrownSolver<Stop> {
    /** creates a solver that stops searching once the stopping criterion is met */
    pub fn with_stopping_criterion(inst:Rc<dyn ConflictGraph>, stopping_criterion:Stop) -> Self {
        let n = inst.nb_vertices();
        Self {
            inst,
            stopping_criterion: Some(stopping_criterion),
            node_limit: None,
            clique: Vec::new(),
            best: None,
            best_k: n,
            nodes: 0,
            cuts: 0,
            fallback: false,
            stopped: false,
            time: 0.,
        }
    }

    /// stops the search after visiting nb_nodes nodes
    pub fn with_node_limit(mut self, nb_nodes:usize) -> Self {
        self.node_limit = Some(nb_nodes);
        self
    }

    /// seeding clique of the last solve
    pub fn clique(&self) -> &[VertexId] { &self.clique }

    /// true if the last solve fell back to branch & bound
    pub fn used_fallback(&self) -> bool { self.fallback }

    fn is_stopped(&mut self) -> bool {
        if !self.stopped {
            self.stopped = self.stopping_criterion.as_ref().map_or(false, |s| s.is_finished())
                || self.node_limit.map_or(false, |l| self.nodes >= l);
        }
        self.stopped
    }

    /// max(1 + max residual degree, clique size, 1 + nb colored vertices). 0 if nothing remains
    fn bound(&self, remaining:&[VertexId], colors:&[Option<usize>]) -> usize {
        if remaining.is_empty() { return 0; }
        let nb_colored = colors.iter().filter(|c| c.is_some()).count();
        let max_degree = remaining.iter().map(|v| {
            remaining.iter().filter(|u| self.inst.are_adjacent(*v, **u)).count()
        }).max().unwrap_or(0);
        (max_degree + 1).max(self.clique.len()).max(nb_colored + 1)
    }

    /// uncolored vertex with the most colored neighbors
    fn select(&self, colors:&[Option<usize>]) -> Option<VertexId> {
        let mut best:Option<(VertexId,usize)> = None;
        for v in self.inst.vertices().filter(|v| colors[*v].is_none()) {
            let nb_colored = self.inst.neighbors(v).iter()
                .filter(|u| colors[**u].is_some())
                .count();
            if best.map_or(true, |(_,s)| nb_colored > s) {
                best = Some((v, nb_colored));
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
            None => {
                if k < self.best_k {
                    debug!(colors=k, nodes=self.nodes, "brown: new best");
                    self.best_k = k;
                    self.best = Some(colors.iter().flatten().copied().collect());
                }
                return;
            }
            Some(v) => v,
        };
        let remaining:Vec<VertexId> = self.inst.vertices()
            .filter(|u| colors[*u].is_none() && *u != v)
            .collect();
        let forbidden:Vec<usize> = self.inst.neighbors(v).iter()
            .filter_map(|u| colors[*u])
            .collect();
        for c in (0..k).filter(|c| !forbidden.contains(c)) {
            colors[v] = Some(c);
            let nb = self.bound(&remaining, colors);
            self.search(colors, k, nb);
            colors[v] = None;
            if self.best_k == bound || self.stopped { return; }
        }
        if k + 1 < self.best_k {
            colors[v] = Some(k);
            let nb = self.bound(&remaining, colors);
            self.search(colors, k+1, nb);
            colors[v] = None;
        }
    }
}

impl<Stop:StoppingCriterion> ColoringEngine for BrownSolver<Stop> {
    fn name(&self) -> &'static str { "brown" }

    fn solve(&mut self) -> (Coloring, usize) {
        let start = Instant::now();
        let n = self.inst.nb_vertices();
        self.nodes = 0;
        self.cuts = 0;
        self.fallback = false;
        self.stopped = false;
        self.best = None;
        self.best_k = n;
        self.clique = greedy_degree_clique(self.inst.clone());
        if n == 0 {
            self.time = start.elapsed().as_secs_f32();
            return (Vec::new(), 0);
        }
        // color the clique
        let mut colors:Vec<Option<usize>> = vec![None ; n];
        for (i,v) in self.clique.iter().enumerate() {
            colors[*v] = Some(i);
        }
        let remaining:Vec<VertexId> = self.inst.vertices()
            .filter(|v| colors[*v].is_none())
            .collect();
        let k = self.clique.len();
        let bound = self.bound(&remaining, &colors);
        self.search(&mut colors, k, bound);
        let (coloring, nb_colors) = match self.best.clone() {
            Some(coloring) => (coloring, self.best_k),
            None => {
                warn!(nodes=self.nodes, "brown: no complete coloring reached, falling back to branch and bound");
                self.fallback = true;
                let (coloring, nb_colors) = match self.stopping_criterion.take() {
                    Some(stopping_criterion) => {
                        let mut fallback = BranchBoundSolver::with_stopping_criterion(
                            self.inst.clone(), stopping_criterion
                        );
                        if let Some(limit) = self.node_limit {
                            fallback = fallback.with_node_limit(limit);
                        }
                        let res = fallback.solve();
                        self.stopped |= fallback.was_stopped();
                        self.stopping_criterion = Some(fallback.into_stopping_criterion());
                        res
                    }
                    None => greedy_degree(self.inst.clone()),
                };
                self.best_k = nb_colors;
                self.best = Some(coloring.clone());
                (coloring, nb_colors)
            }
        };
        self.time = start.elapsed().as_secs_f32();
        info!(
            colors=nb_colors, nodes=self.nodes, cuts=self.cuts, clique_size=self.clique.len(),
            fallback=self.fallback, "brown finished in {:.3}s", self.time
        );
        (coloring, nb_colors)
    }

    fn statistics(&self) -> Value {
        json!({
            "nodes": self.nodes,
            "cuts": self.cuts,
            "clique_size": self.clique.len(),
            "fallback": self.fallback,
            "stopped": self.stopped,
            "time": round_time(self.time),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::color::{check_coloring, CheckerResult};
    use crate::compact_instance::CompactInstance;

    fn solver(n:usize, edges:&[(VertexId,VertexId)]) -> BrownSolver {
        BrownSolver::new(Rc::new(CompactInstance::from_edges(n, edges)))
    }

    #[test]
    fn test_empty_graph() {
        let mut s = solver(0, &[]);
        assert_eq!(s.solve(), (vec![], 0));
        assert!(!s.used_fallback());
    }

    #[test]
    fn test_small_graphs() {
        assert_eq!(solver(1, &[]).solve().1, 1);
        assert_eq!(solver(2, &[]).solve().1, 1);
        assert_eq!(solver(2, &[(0,1)]).solve().1, 2);
    }

    #[test]
    fn test_triangle() {
        let mut s = solver(3, &[(0,1), (1,2), (0,2)]);
        let (coloring, k) = s.solve();
        assert_eq!(k, 3);
        assert_eq!(s.clique(), &[2,1,0]);
        // the whole graph is the seeding clique, the root is cut: result from the fallback
        assert!(s.used_fallback());
        assert_eq!(s.statistics()["clique_size"], json!(3));
        let mut sorted = coloring;
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0,1,2]);
    }

    #[test]
    fn test_bound() {
        let s = solver(4, &[(0,1), (1,2), (0,2), (2,3)]);
        let colors = vec![Some(0), None, None, None];
        // residual degrees in {1,2,3}: 1 -> 1, 2 -> 2, 3 -> 1
        assert_eq!(s.bound(&[1,2,3], &colors), 3);
        assert_eq!(s.bound(&[], &colors), 0);
        let colors = vec![Some(0), Some(1), Some(2), None];
        assert_eq!(s.bound(&[3], &colors), 4);
    }

    #[test]
    fn test_select() {
        let s = solver(4, &[(0,1), (1,2), (0,2), (2,3)]);
        assert_eq!(s.select(&[None, None, None, None]), Some(0));
        assert_eq!(s.select(&[None, Some(0), None, None]), Some(0));
        assert_eq!(s.select(&[Some(0), Some(1), None, None]), Some(2));
        assert_eq!(s.select(&[Some(0), Some(1), Some(2), Some(0)]), None);
    }

    #[test]
    fn test_agrees_with_branch_bound() {
        let inst:Rc<dyn ConflictGraph> = Rc::new(
            CompactInstance::from_dimacs_file("insts/dimacs/myciel3.col").unwrap()
        );
        let (_, k_bnb) = BranchBoundSolver::new(inst.clone()).solve();
        let mut s = BrownSolver::new(inst.clone());
        let (coloring, k) = s.solve();
        assert_eq!(check_coloring(inst, &coloring), CheckerResult::Ok(k));
        assert_eq!(k, k_bnb);
        let (_, k_again) = s.solve();
        assert_eq!(k, k_again);
    }

    #[test]
    fn test_node_limit_falls_back() {
        let inst:Rc<dyn ConflictGraph> = Rc::new(
            CompactInstance::from_dimacs_file("insts/dimacs/myciel3.col").unwrap()
        );
        let mut s = BrownSolver::new(inst.clone()).with_node_limit(1);
        let (coloring, k) = s.solve();
        assert!(s.used_fallback());
        assert_eq!(check_coloring(inst.clone(), &coloring), CheckerResult::Ok(k));
        let stats = s.statistics();
        assert_eq!(stats["fallback"], json!(true));
        assert_eq!(stats["stopped"], json!(true));
        // the stopping criterion comes back from the fallback: a second solve behaves the same
        let (coloring2, k2) = s.solve();
        assert_eq!(k2, k);
        assert!(s.used_fallback());
        assert_eq!(s.statistics()["stopped"], json!(true));
        assert_eq!(check_coloring(inst, &coloring2), CheckerResult::Ok(k2));
    }
}
