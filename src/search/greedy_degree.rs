use std::rc::Rc;

use bit_set::BitSet;

use crate::color::{Coloring, ConflictGraph, VertexId};

/** vertices sorted by (degree, index) descending */
pub fn degree_order(inst:&Rc<dyn ConflictGraph>) -> Vec<VertexId> {
    let mut order:Vec<VertexId> = inst.vertices().collect();
    order.sort_by(|a,b| {
        inst.degree(*b).cmp(&inst.degree(*a)).then_with(|| b.cmp(a))
    });
    order
}

/** implements a greedy largest-degree-first coloring. Used to seed the incumbent of the engines.
    1. sort vertices by decreasing degree (break ties by decreasing index)
    2. give each vertex the smallest slot not used by its already colored neighbors

returns the coloring and its number of colors (0 for an empty graph)
*/
pub fn greedy_degree(inst:Rc<dyn ConflictGraph>) -> (Coloring, usize) {
    let n = inst.nb_vertices();
    let mut colors:Vec<Option<usize>> = vec![None ; n];
    let mut nb_colors = 0;
    for v in degree_order(&inst) {
        let used:BitSet = inst.neighbors(v).iter()
            .filter_map(|u| colors[*u])
            .collect();
        let mut c = 0;
        while used.contains(c) { c += 1; }
        colors[v] = Some(c);
        nb_colors = nb_colors.max(c+1);
    }
    (colors.into_iter().flatten().collect(), nb_colors)
}

/** greedy clique: scans vertices by (degree, index) descending and keeps every vertex
adjacent to all the vertices kept so far.
*/
pub fn greedy_degree_clique(inst:Rc<dyn ConflictGraph>) -> Vec<VertexId> {
    let mut clique:Vec<VertexId> = Vec::new();
    for v in degree_order(&inst) {
        if clique.iter().all(|u| inst.are_adjacent(v, *u)) {
            clique.push(v);
        }
    }
    clique
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::color::{check_coloring, CheckerResult};
    use crate::compact_instance::CompactInstance;

    #[test]
    fn test_empty_graph() {
        let inst:Rc<dyn ConflictGraph> = Rc::new(CompactInstance::new(vec![]));
        assert_eq!(greedy_degree(inst.clone()), (vec![], 0));
        assert!(greedy_degree_clique(inst).is_empty());
    }

    #[test]
    fn test_order() {
        // star centered on 1, isolated vertex 3
        let inst:Rc<dyn ConflictGraph> = Rc::new(CompactInstance::from_edges(4, &[(1,0), (1,2)]));
        assert_eq!(degree_order(&inst), vec![1, 2, 0, 3]);
        let (coloring, k) = greedy_degree(inst.clone());
        assert_eq!(coloring, vec![1, 0, 1, 0]);
        assert_eq!(k, 2);
        assert_eq!(check_coloring(inst, &coloring), CheckerResult::Ok(2));
    }

    #[test]
    fn test_odd_cycle() {
        let inst:Rc<dyn ConflictGraph> = Rc::new(CompactInstance::from_edges(
            5, &[(0,1), (1,2), (2,3), (3,4), (4,0)]
        ));
        let (coloring, k) = greedy_degree(inst.clone());
        assert_eq!(coloring, vec![2, 1, 0, 1, 0]);
        assert_eq!(k, 3);
        assert_eq!(greedy_degree_clique(inst), vec![4, 3]);
    }
}
