use std::rc::Rc;
use std::time::Instant;

use bit_set::BitSet;
use dogs::search_algorithm::{NeverStoppingCriterion, StoppingCriterion};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::color::{Coloring, ConflictGraph, VertexId};
use crate::search::{ColoringEngine, round_time};
use crate::search::greedy_degree::greedy_degree;


/**
Independent set covering.
    1. enumerate the maximal independent sets (Bron–Kerbosch with pivoting, on the complement graph)
    2. sort them by decreasing size
    3. backtrack over the list: each set whose vertices are all uncolored is either used
       (its vertices get a new slot) or skipped.

The incumbent is seeded by the greedy largest-degree-first coloring. Only disjoint
enumerated sets are combined, so the search may not improve on this seed.
*/
#[derive(Debug)]
pub struct IndependentSetSolver<Stop:StoppingCriterion=NeverStoppingCriterion> {
    /// instance
    inst: Rc<dyn ConflictGraph>,
    /// stopping criterion checked at each enumeration/cover step
    stopping_criterion: Stop,
    /// optional maximum number of cover nodes
    node_limit: Option<usize>,
    /// non_adjacent[v]: vertices u≠v not adjacent to v
    non_adjacent: Vec<BitSet>,
    /// maximal independent sets (decreasing size)
    sets: Vec<Vec<VertexId>>,
    /// best coloring found so far
    best: Coloring,
    /// number of colors of the best coloring
    best_k: usize,
    /// nb cover nodes visited
    combinations: usize,
    /// nb cover nodes cut
    pruned: usize,
    /// true if the last solve was interrupted
    stopped: bool,
    /// duration of the last solve (seconds)
    time: f32,
}

impl IndependentSetSolver<NeverStoppingCriterion> {
    /** creates a solver that explores the whole search tree */
    pub fn new(inst:Rc<dyn ConflictGraph>) -> Self {
        Self::with_stopping_criterion(inst, NeverStoppingCriterion::default())
    }
}

impl<Stop:StoppingCriterion> IndependentSetSolver<Stop> {
    /** creates a solver that returns its incumbent once the stopping criterion is met */
    pub fn with_stopping_criterion(inst:Rc<dyn ConflictGraph>, stopping_criterion:Stop) -> Self {
        let n = inst.nb_vertices();
        let non_adjacent:Vec<BitSet> = inst.vertices().map(|v| {
            inst.vertices().filter(|u| *u != v && !inst.are_adjacent(v, *u)).collect()
        }).collect();
        Self {
            inst,
            stopping_criterion,
            node_limit: None,
            non_adjacent,
            sets: Vec::new(),
            best: Vec::new(),
            best_k: n,
            combinations: 0,
            pruned: 0,
            stopped: false,
            time: 0.,
        }
    }

    /// stops the cover search after visiting nb_nodes nodes
    pub fn with_node_limit(mut self, nb_nodes:usize) -> Self {
        self.node_limit = Some(nb_nodes);
        self
    }

    /// maximal independent sets enumerated by the last solve
    pub fn sets(&self) -> &[Vec<VertexId>] { &self.sets }

    fn is_stopped(&mut self) -> bool {
        if !self.stopped {
            self.stopped = self.stopping_criterion.is_finished()
                || self.node_limit.map_or(false, |l| self.combinations >= l);
        }
        self.stopped
    }

    /**
    reports r if it is maximal (p and x empty), otherwise extends it with every candidate of p
    that is adjacent to the pivot (minimum index of p∪x). x contains the vertices already explored.
    */
    fn bron_kerbosch(&mut self, r:&mut Vec<VertexId>, mut p:BitSet, mut x:BitSet) {
        if self.is_stopped() { return; }
        let pivot = match (p.iter().next(), x.iter().next()) {
            (None, None) => {
                let mut set = r.clone();
                set.sort_unstable();
                self.sets.push(set);
                return;
            }
            (None, Some(_)) => return, // r can be extended by an explored vertex
            (Some(a), None) => a,
            (Some(a), Some(b)) => a.min(b),
        };
        let candidates:Vec<VertexId> = p.iter()
            .filter(|v| !self.non_adjacent[pivot].contains(*v))
            .collect();
        for v in candidates {
            let mut new_p = p.clone();
            new_p.intersect_with(&self.non_adjacent[v]);
            let mut new_x = x.clone();
            new_x.intersect_with(&self.non_adjacent[v]);
            r.push(v);
            self.bron_kerbosch(r, new_p, new_x);
            r.pop();
            p.remove(v);
            x.insert(v);
        }
    }

    /// enumerates the maximal independent sets, sorted by decreasing size
    pub fn find_sets(&mut self) -> &[Vec<VertexId>] {
        self.sets.clear();
        let n = self.inst.nb_vertices();
        if n > 0 {
            let all:BitSet = self.inst.vertices().collect();
            self.bron_kerbosch(&mut Vec::new(), all, BitSet::with_capacity(n));
        }
        self.sets.sort_by(|a,b| b.len().cmp(&a.len()));
        &self.sets
    }

    fn cover(&mut self, colors:&mut Vec<Option<usize>>, nb_colored:usize, used:usize, idx:usize) {
        if self.is_stopped() { return; }
        self.combinations += 1;
        if used >= self.best_k {
            self.pruned += 1;
            return;
        }
        if nb_colored == self.inst.nb_vertices() {
            debug!(colors=used, combinations=self.combinations, "independent sets: new best");
            self.best_k = used;
            self.best = colors.iter().flatten().copied().collect();
            return;
        }
        if idx >= self.sets.len() { return; }
        let can_use = self.sets[idx].iter().all(|v| colors[*v].is_none());
        if can_use {
            let set = self.sets[idx].clone();
            for v in &set { colors[*v] = Some(used); }
            self.cover(colors, nb_colored + set.len(), used + 1, idx + 1);
            for v in &set { colors[*v] = None; }
        }
        self.cover(colors, nb_colored, used, idx + 1);
    }
}

impl<Stop:StoppingCriterion> ColoringEngine for IndependentSetSolver<Stop> {
    fn name(&self) -> &'static str { "independent sets" }

    fn solve(&mut self) -> (Coloring, usize) {
        let start = Instant::now();
        self.combinations = 0;
        self.pruned = 0;
        self.stopped = false;
        let (init, init_k) = greedy_degree(self.inst.clone());
        self.best = init;
        self.best_k = init_k;
        self.find_sets();
        debug!(sets=self.sets.len(), "independent sets enumerated");
        if self.inst.nb_vertices() > 0 {
            let mut colors = vec![None ; self.inst.nb_vertices()];
            self.cover(&mut colors, 0, 0, 0);
        }
        self.time = start.elapsed().as_secs_f32();
        info!(
            colors=self.best_k, sets=self.sets.len(), combinations=self.combinations,
            pruned=self.pruned, stopped=self.stopped,
            "independent sets finished in {:.3}s", self.time
        );
        (self.best.clone(), self.best_k)
    }

    fn statistics(&self) -> Value {
        json!({
            "sets_found": self.sets.len(),
            "combinations": self.combinations,
            "pruned": self.pruned,
            "stopped": self.stopped,
            "time": round_time(self.time),
        })
    }
}
