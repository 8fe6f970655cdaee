//! Graph coarsening via heavy-edge matching (HEM).
//!
//! Repeatedly contracts the graph by matching vertices along heavy edges
//! until it is small enough to bisect directly. Vertex weights accumulate
//! across levels: a coarse vertex's weight is the sum of the weights of the
//! (at most two) fine vertices it was built from.

use crate::graph::Graph;
use crate::rng::DeterministicRng;

/// One level of the coarsening stack: the coarser graph produced, together
/// with the mapping from the finer graph's vertices to this graph's.
#[derive(Clone, Debug)]
pub struct CoarseLevel {
    pub graph: Graph,
    /// `cmap[u]` is the coarse vertex that finer vertex `u` was folded into.
    pub cmap: Vec<usize>,
}

pub struct CoarsenOptions {
    pub coarse_graph_size: usize,
    pub vweight_max: i64,
}

/// Build the full coarsening stack for `g`, stopping once the coarsest
/// graph falls at or below `opt.coarse_graph_size`, its edge count drops to
/// at most half its vertex count, or a level fails to shrink the graph by at
/// least 9%. `g` itself is never placed in the returned stack; it is the
/// implicit head (finest level), owned by the caller.
pub fn build_coarse_stack(g: &Graph, opt: &CoarsenOptions, regular: bool, rng: &mut DeterministicRng) -> Vec<CoarseLevel> {
    let mut levels: Vec<CoarseLevel> = Vec::new();
    if opt.vweight_max <= 1 {
        return levels;
    }

    loop {
        let finer: &Graph = levels.last().map(|l| &l.graph).unwrap_or(g);
        let level = coarsen_once(finer, opt.vweight_max, regular, rng);
        let shrank_enough = (level.graph.n as f64) < 0.91 * finer.n as f64;
        let sparse_enough = level.graph.adjncy.len() <= level.graph.n / 2;
        let small_enough = level.graph.n <= opt.coarse_graph_size;

        tracing::debug!(
            finer_n = finer.n,
            coarser_n = level.graph.n,
            "coarsened one level"
        );

        levels.push(level);

        if small_enough || sparse_enough || !shrank_enough {
            break;
        }
    }

    levels
}

/// Coarsen `g` by one level. `regular` selects the no-permutation,
/// natural-order traversal used for regular (uniform-degree) graphs instead
/// of the randomized, degree-sorted traversal used by default.
pub fn coarsen_once(g: &Graph, vweight_max: i64, regular: bool, rng: &mut DeterministicRng) -> CoarseLevel {
    let n = g.n;
    let traverse = build_traversal_order(g, regular, rng);

    let mut matched = vec![false; n];
    let mut partner = vec![0usize; n];
    for v in 0..n {
        partner[v] = v;
    }
    let mut cmap = vec![0usize; n];
    let mut coarse_n = 0usize;

    // Pass 1: pair off isolated (degree 0) vertices, which sort first in
    // `traverse`. Stops at the first non-isolated vertex encountered.
    for i in 0..n {
        let v = traverse[i];
        if matched[v] {
            continue;
        }
        if g.degree(v) > 0 {
            break;
        }
        let mut vmax = v;
        for &k in traverse[i + 1..].iter().rev() {
            if !matched[k] && g.degree(k) > 0 {
                vmax = k;
                break;
            }
        }
        cmap[v] = coarse_n;
        cmap[vmax] = coarse_n;
        matched[v] = true;
        matched[vmax] = true;
        partner[v] = vmax;
        partner[vmax] = v;
        coarse_n += 1;
    }

    // Pass 2: heavy-edge matching over whatever remains unmatched.
    for &v in &traverse {
        if matched[v] {
            continue;
        }
        let mut vmax = v;
        let mut wmax = 0i64;
        for k in 0..g.degree(v) {
            let u = g.adjncy[g.xadj[v] + k];
            if matched[u] {
                continue;
            }
            let w = g.edge_weight(v, k);
            if w > wmax && g.vertex_weight(v) + g.vertex_weight(u) <= vweight_max {
                wmax = w;
                vmax = u;
            }
        }
        cmap[v] = coarse_n;
        cmap[vmax] = coarse_n;
        matched[v] = true;
        matched[vmax] = true;
        partner[v] = vmax;
        partner[vmax] = v;
        coarse_n += 1;
    }

    let graph = build_coarse_graph(g, &cmap, &partner, &traverse, coarse_n);
    CoarseLevel { graph, cmap }
}

fn build_traversal_order(g: &Graph, regular: bool, rng: &mut DeterministicRng) -> Vec<usize> {
    let n = g.n;
    if regular {
        return (0..n).collect();
    }

    let vdegavg = if n == 0 { 0 } else { (g.adjncy.len() / n) as i64 };
    let mut deg = vec![0i64; n];
    for v in 0..n {
        deg[v] = (g.degree(v) as i64).min(vdegavg);
    }

    let mut vperm: Vec<usize> = (0..n).collect();
    rng.shuffle(&mut vperm);

    counting_sort(&vperm, &deg, vdegavg)
}

/// Stable counting sort of `src` by `values[src[i]]`, capped at `value_max`.
/// Ties keep their relative order from `src`, so randomizing `src` up front
/// randomizes tie-breaking among same-degree vertices.
fn counting_sort(src: &[usize], values: &[i64], value_max: i64) -> Vec<usize> {
    let n = src.len();
    let nbuckets = (value_max + 1) as usize;
    let mut counts = vec![0usize; nbuckets];
    for &v in src {
        counts[values[v] as usize] += 1;
    }
    let mut start = vec![0usize; nbuckets];
    for d in 1..nbuckets {
        start[d] = start[d - 1] + counts[d - 1];
    }
    let mut cursor = start;
    let mut out = vec![0usize; n];
    for &v in src {
        let d = values[v] as usize;
        out[cursor[d]] = v;
        cursor[d] += 1;
    }
    out
}

/// Build the coarser graph: one coarse vertex per matched pair (or
/// singleton), visited in the order `cmap` assigned ids (i.e. `traverse`
/// order), with parallel edges between the same pair of coarse vertices
/// summed into one.
fn build_coarse_graph(g: &Graph, cmap: &[usize], partner: &[usize], traverse: &[usize], nc: usize) -> Graph {
    let mut cvwgt = vec![0i64; nc];
    let mut xadj = vec![0usize; nc + 1];
    let mut adjncy = Vec::new();
    let mut adjwgt = Vec::new();
    let mut visited: Vec<Option<usize>> = vec![None; nc];
    let mut edges_local: Vec<(usize, i64)> = Vec::new();

    let mut expected = 0usize;
    for &v in traverse {
        if cmap[v] != expected {
            continue;
        }
        let coarse_id = expected;
        edges_local.clear();

        let u = partner[v];
        cvwgt[coarse_id] = g.vertex_weight(v) + if u != v { g.vertex_weight(u) } else { 0 };

        let members: &[usize] = if u != v { &[v, u] } else { &[v] };
        for &member in members {
            for k in 0..g.degree(member) {
                let j = g.adjncy[g.xadj[member] + k];
                let w = g.edge_weight(member, k);
                let z = cmap[j];
                match visited[z] {
                    Some(pos) => edges_local[pos].1 += w,
                    None => {
                        visited[z] = Some(edges_local.len());
                        edges_local.push((z, w));
                    }
                }
            }
        }

        if let Some(pos) = visited[coarse_id] {
            edges_local.swap_remove(pos);
            visited[coarse_id] = None;
        }
        for &(z, _) in &edges_local {
            visited[z] = None;
        }

        for &(z, w) in &edges_local {
            adjncy.push(z);
            adjwgt.push(w);
        }
        xadj[coarse_id + 1] = adjncy.len();

        expected += 1;
    }

    let mut graph = Graph::new(nc, xadj, adjncy);
    graph.adjwgt = adjwgt;
    graph.vwgt = cvwgt;
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph(n: usize) -> Graph {
        let mut xadj = vec![0usize; n + 1];
        let mut adjncy = Vec::new();
        for i in 0..n {
            if i > 0 {
                adjncy.push(i - 1);
            }
            if i + 1 < n {
                adjncy.push(i + 1);
            }
            xadj[i + 1] = adjncy.len();
        }
        Graph::new(n, xadj, adjncy)
    }

    #[test]
    fn coarsen_halves_path_graph_roughly() {
        let g = path_graph(10);
        let mut rng = DeterministicRng::seeded(0);
        let level = coarsen_once(&g, 2, false, &mut rng);
        assert!(level.graph.n < g.n);
        assert!(level.graph.n >= g.n / 2);
        let total_weight: i64 = (0..level.graph.n).map(|v| level.graph.vertex_weight(v)).sum();
        assert_eq!(total_weight, g.n as i64);
    }

    #[test]
    fn coarsen_preserves_total_edge_weight_times_two() {
        let g = path_graph(8);
        let mut rng = DeterministicRng::seeded(0);
        let level = coarsen_once(&g, 2, false, &mut rng);
        let fine_total: i64 = (0..g.n).map(|v| g.weighted_degree(v)).sum();
        // Self-loops from contracted edges are dropped, so the coarse total
        // can only be less than or equal to the fine total.
        let coarse_total: i64 = (0..level.graph.n).map(|v| level.graph.weighted_degree(v)).sum();
        assert!(coarse_total <= fine_total);
    }

    #[test]
    fn isolated_vertices_are_paired_first() {
        // Two isolated vertices (2, 3) plus a connected pair (0, 1).
        let xadj = vec![0, 1, 2, 2, 2];
        let adjncy = vec![1, 0];
        let g = Graph::new(4, xadj, adjncy);
        let mut rng = DeterministicRng::seeded(0);
        let level = coarsen_once(&g, 4, false, &mut rng);
        assert_eq!(level.graph.n, 2);
    }

    #[test]
    fn build_coarse_stack_stops_at_threshold() {
        let g = path_graph(40);
        let opt = CoarsenOptions { coarse_graph_size: 10, vweight_max: 5 };
        let mut rng = DeterministicRng::seeded(0);
        let stack = build_coarse_stack(&g, &opt, false, &mut rng);
        assert!(!stack.is_empty());
        assert!(stack.last().unwrap().graph.n <= 10 || stack.len() < 10);
    }
}
