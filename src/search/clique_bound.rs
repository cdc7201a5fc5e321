use std::collections::HashMap;
use std::rc::Rc;

use bit_set::BitSet;

use crate::color::{ConflictGraph, VertexId};

/**
Lower bound on the number of colors needed by a set of vertices.
Greedily extends a clique by scanning the vertices in the order given (a vertex is kept if it is
adjacent to every vertex kept so far). The clique size is admissible but weak.

Results are memoized by vertex set (bitset over the vertex indices). The cache must be cleared
whenever the graph changes; engines clear it at the start of each solve.
*/
#[derive(Debug)]
pub struct CliqueBoundOracle {
    /// instance
    inst: Rc<dyn ConflictGraph>,
    /// cache[set]: clique bound of set
    cache: HashMap<BitSet, usize>,
}

impl CliqueBoundOracle {
    /** creates an oracle with an empty cache */
    pub fn new(inst:Rc<dyn ConflictGraph>) -> Self {
        Self { inst, cache: HashMap::new() }
    }

    /// removes every cached bound
    pub fn clear(&mut self) { self.cache.clear(); }

    /// number of vertex sets cached
    pub fn cache_size(&self) -> usize { self.cache.len() }

    /// bound for the vertices in remaining (0 if empty)
    pub fn bound(&mut self, remaining:&[VertexId]) -> usize {
        if remaining.is_empty() { return 0; }
        let mut key = BitSet::with_capacity(self.inst.nb_vertices());
        for v in remaining { key.insert(*v); }
        if let Some(res) = self.cache.get(&key) {
            return *res;
        }
        let res = self.greedy_clique(remaining).len();
        self.cache.insert(key, res);
        res
    }

    /// clique built by scanning remaining in order
    pub fn greedy_clique(&self, remaining:&[VertexId]) -> Vec<VertexId> {
        let mut clique:Vec<VertexId> = Vec::new();
        for v in remaining {
            if clique.iter().all(|u| self.inst.are_adjacent(*v, *u)) {
                clique.push(*v);
            }
        }
        clique
    }
}
