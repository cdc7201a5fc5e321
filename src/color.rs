use std::ops::Range;
use std::rc::Rc;

use bit_set::BitSet;

/** Vertex Id (one unit-length scheduled occurrence) */
pub type VertexId = usize;

/** Solution of a graph coloring problem
(represented as a partition: res[c] contains the vertices using slot c).
*/
pub type Solution = Vec<Vec<VertexId>>;

/** Coloring of a graph (coloring[v]: slot assigned to vertex v). */
pub type Coloring = Vec<usize>;

/** read-only view over a conflict graph.
Vertices are 0..n-1, adjacency is symmetric and irreflexive and never changes during a search.
*/
pub trait ConflictGraph: std::fmt::Debug {
    /// number of vertices
    fn nb_vertices(&self) -> usize;

    /// number of edges
    fn nb_edges(&self) -> usize;

    /// vertices adjacent to u (ascending)
    fn neighbors(&self, u:VertexId) -> &[VertexId];

    /// number of vertices adjacent to u
    fn degree(&self, u:VertexId) -> usize { self.neighbors(u).len() }

    /// true iff u and v conflict
    fn are_adjacent(&self, u:VertexId, v:VertexId) -> bool;

    /// iterates over the vertices
    fn vertices(&self) -> Range<VertexId> { 0..self.nb_vertices() }

    /// prints some statistics about the graph
    fn display_statistics(&self) {
        println!("\t{} \t vertices", self.nb_vertices());
        println!("\t{} \t edges", self.nb_edges());
        let degrees:Vec<usize> = self.vertices().map(|i| self.degree(i)).collect();
        if let (Some(dmin), Some(dmax)) = (degrees.iter().min(), degrees.iter().max()) {
            println!("\t{} \t min degree", dmin);
            println!("\t{} \t max degree", dmax);
        }
    }
}

/// possible outcomes of the checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerResult {
    /// the solution is feasible (number of colors)
    Ok(usize),
    /// a vertex appears in two color classes
    VertexAddedTwice(VertexId),
    /// a vertex is in no color class
    VertexNotColored(VertexId),
    /// two adjacent vertices share a color
    ConflictingEdge(VertexId, VertexId),
    /// a color class contains a vertex that is not in the graph
    UnknownVertex(VertexId),
}

/**
checks a partition against the graph.
returns CheckerResult::Ok(nb colors) if feasible, the first violation found otherwise.
*/
pub fn checker(inst:Rc<dyn ConflictGraph>, sol:&[Vec<VertexId>]) -> CheckerResult {
    let n = inst.nb_vertices();
    let mut visited = BitSet::with_capacity(n);
    for c in sol {
        for v in c {
            if *v >= n {
                return CheckerResult::UnknownVertex(*v);
            }
            if visited.contains(*v) {
                return CheckerResult::VertexAddedTwice(*v);
            }
            visited.insert(*v);
        }
    }
    if let Some(v) = inst.vertices().find(|v| !visited.contains(*v)) {
        return CheckerResult::VertexNotColored(v);
    }
    for c in sol {
        for (i,v1) in c.iter().enumerate() {
            for v2 in &c[i+1..] {
                if inst.are_adjacent(*v1, *v2) {
                    return CheckerResult::ConflictingEdge(*v1, *v2);
                }
            }
        }
    }
    CheckerResult::Ok(sol.iter().filter(|c| !c.is_empty()).count())
}

/** number of slots used by a coloring (1 + maximum slot, 0 if empty). */
pub fn nb_colors(coloring:&[usize]) -> usize {
    coloring.iter().max().map_or(0, |c| c+1)
}

/** converts a per-vertex coloring into a partition (one class per slot). */
pub fn coloring_to_solution(coloring:&[usize]) -> Solution {
    let mut res = vec![vec![] ; nb_colors(coloring)];
    for (v,c) in coloring.iter().enumerate() {
        res[*c].push(v);
    }
    res
}

/** checks a per-vertex coloring. */
pub fn check_coloring(inst:Rc<dyn ConflictGraph>, coloring:&[usize]) -> CheckerResult {
    checker(inst, &coloring_to_solution(coloring))
}
