use bit_set::BitSet;

use crate::color::{ConflictGraph, VertexId};
use crate::dimacs::read_from_file;
use crate::error::ColorError;

/** conflict graph stored as sorted adjacency lists plus a bitset adjacency matrix. */
#[derive(Debug)]
pub struct CompactInstance {
    /// nb vertices
    n: usize,
    /// nb edges
    m: usize,
    /// adj_list[i]: vertices adjacent to i (ascending, no duplicates, no self-loop)
    adj_list: Vec<Vec<VertexId>>,
    /// adj_matrix[i]: bitset of the neighbors of i
    adj_matrix: Vec<BitSet>,
}

impl ConflictGraph for CompactInstance {
    fn nb_vertices(&self) -> usize { self.n }

    fn nb_edges(&self) -> usize { self.m }

    fn neighbors(&self, u:VertexId) -> &[VertexId] { &self.adj_list[u] }

    fn degree(&self, u:VertexId) -> usize { self.adj_list[u].len() }

    fn are_adjacent(&self, u:VertexId, v:VertexId) -> bool { self.adj_matrix[u].contains(v) }
}


impl CompactInstance {

    /** constructor using an adjacency list.
    The lists are symmetrized, sorted and deduplicated; self-loops are dropped.
    */
    pub fn new(adj_list:Vec<Vec<VertexId>>) -> Self {
        let n = adj_list.len();
        let mut adj_matrix = vec![BitSet::with_capacity(n) ; n];
        for (a,l) in adj_list.iter().enumerate() {
            for b in l.iter().filter(|b| **b != a) {
                adj_matrix[a].insert(*b);
                adj_matrix[*b].insert(a);
            }
        }
        let adj_list:Vec<Vec<VertexId>> = adj_matrix.iter()
            .map(|row| row.iter().collect())
            .collect();
        let m = adj_list.iter().map(|l| l.len()).sum::<usize>() / 2; // ∑ d(v) = 2m
        Self { n, m, adj_list, adj_matrix }
    }

    /** constructor from an edge list over vertices 0..n-1 */
    pub fn from_edges(n:usize, edges:&[(VertexId,VertexId)]) -> Self {
        let mut adj_list = vec![Vec::new() ; n];
        for (a,b) in edges {
            adj_list[*a].push(*b);
        }
        Self::new(adj_list)
    }

    /// creates an instance from a DIMACS file
    pub fn from_dimacs_file(filename:&str) -> Result<Self, ColorError> {
        let (_,_,adj_list) = read_from_file(filename)?;
        Ok(Self::new(adj_list))
    }

    /** writes a string encoding the solution (one line per color, vertices separated by spaces) */
    pub fn solution_to_string(solution:&[Vec<VertexId>]) -> String {
        let mut res = String::default();
        for e in solution {
            for v in e {
                res += format!("{} ", v).as_str();
            }
            res += "\n";
        }
        res
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_instance() {
        let inst = CompactInstance::from_dimacs_file("insts/dimacs/grid2x2.col").unwrap();
        assert_eq!(inst.nb_vertices(), 4);
        assert_eq!(inst.nb_edges(), 4);
        assert_eq!(inst.neighbors(0), &[1,2]);
    }

    #[test]
    fn test_symmetric_irreflexive() {
        // duplicated edge, reversed edge, self-loop
        let inst = CompactInstance::from_edges(3, &[(2,0), (0,2), (1,1), (1,0)]);
        assert_eq!(inst.nb_edges(), 2);
        assert_eq!(inst.neighbors(0), &[1,2]);
        assert_eq!(inst.neighbors(1), &[0]);
        assert!(inst.are_adjacent(2, 0) && inst.are_adjacent(0, 2));
        assert!(!inst.are_adjacent(1, 1));
        assert_eq!(inst.degree(0), 2);
    }

    #[test]
    fn test_solution_to_string() {
        assert_eq!(CompactInstance::solution_to_string(&[vec![0,2], vec![1]]), "0 2 \n1 \n");
    }
}
