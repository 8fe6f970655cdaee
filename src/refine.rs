//! Fiduccia-Mattheyses 2-way refinement and balancing of a bisection.

use crate::graph::Graph;
use crate::pqueue::FmQueue;
use crate::rng::DeterministicRng;

const MAX_PASSES: usize = 4;

/// Refine a 2-way `bisection` in place to reduce edge-cut while respecting
/// `partsizes` (target vertex-weight totals for side 0 and side 1). Returns
/// the edge-cut of the refined bisection.
///
/// Each of up to `MAX_PASSES` iterations visits vertices in a random
/// traversal order, greedily moving the highest-gain vertex from whichever
/// side is currently furthest above its target, then undoes every move past
/// the best point seen during the pass. A pass that makes no improving move
/// stops the loop early.
pub fn refine(g: &Graph, bisection: &mut [usize], partsizes: [i64; 2], rng: &mut DeterministicRng) -> u64 {
    let n = g.n;
    if n == 0 {
        return 0;
    }

    let mut extcost = vec![0i64; n];
    let mut intcost = vec![0i64; n];
    let mut edgecut: i64 = 0;
    let mut gain_max: i64 = 0;

    for i in 0..n {
        let mut gain_sum = 0i64;
        for k in 0..g.degree(i) {
            let j = g.adjncy[g.xadj[i] + k];
            let w = g.edge_weight(i, k);
            if bisection[j] != bisection[i] {
                extcost[i] += w;
            } else {
                intcost[i] += w;
            }
            gain_sum += w;
        }
        edgecut += extcost[i];
        if gain_sum > gain_max {
            gain_max = gain_sum;
        }
    }
    edgecut /= 2;

    let mut pw = [0i64; 2];
    for i in 0..n {
        pw[bisection[i]] += g.vertex_weight(i);
    }
    let pwdiff0 = (partsizes[0] - pw[0]).abs();

    let total_weight: i64 = (0..n).map(|i| g.vertex_weight(i)).sum();
    let vwavg = (2 * total_weight / n as i64).min((total_weight as f64 * 0.05) as i64);
    let move_limit = ((n as f64 * 0.15) as i64).clamp(20, 100);

    let mut queues = [FmQueue::new(n, gain_max), FmQueue::new(n, gain_max)];
    let mut moves = vec![0usize; n];
    let mut vertex_move: Vec<Option<usize>> = vec![None; n];
    let mut edgecut_best = edgecut;
    let edgecut_before_pass = edgecut_best;

    for iter in 0..MAX_PASSES {
        let mut edgecut_best_moveno: isize = -1;
        let mut edgecut_cur = edgecut_best;
        let mut pwdiff_min = pwdiff0;

        queues[0].clear();
        queues[1].clear();
        vertex_move.iter_mut().for_each(|m| *m = None);

        let mut perm: Vec<usize> = (0..n).collect();
        rng.shuffle(&mut perm);
        for &j in &perm {
            if extcost[j] > 0 || g.degree(j) == 0 {
                queues[bisection[j]].insert(j, extcost[j] - intcost[j]);
            }
        }

        let mut moveno: usize = 0;
        while moveno < n {
            let srcpart = if partsizes[0] - pw[0] < partsizes[1] - pw[1] { 0 } else { 1 };
            let dstpart = 1 - srcpart;
            let v = match queues[srcpart].extract_max() {
                Some(v) => v,
                None => break,
            };

            edgecut_cur -= extcost[v] - intcost[v];
            pw[dstpart] += g.vertex_weight(v);
            pw[srcpart] -= g.vertex_weight(v);

            let pwdiff_now = (partsizes[0] - pw[0]).abs();
            if (edgecut_cur < edgecut_best && pwdiff_now <= pwdiff0 + vwavg)
                || (edgecut_cur == edgecut_best && pwdiff_now < pwdiff_min)
            {
                edgecut_best = edgecut_cur;
                edgecut_best_moveno = moveno as isize;
                pwdiff_min = pwdiff_now;
            } else if moveno as isize - edgecut_best_moveno > move_limit {
                edgecut_cur += extcost[v] - intcost[v];
                pw[srcpart] += g.vertex_weight(v);
                pw[dstpart] -= g.vertex_weight(v);
                break;
            }

            bisection[v] = dstpart;
            moves[moveno] = v;
            vertex_move[v] = Some(moveno);
            std::mem::swap(&mut extcost[v], &mut intcost[v]);

            for k in 0..g.degree(v) {
                let j = g.adjncy[g.xadj[v] + k];
                let w = g.edge_weight(v, k);
                let gain_old = extcost[j] - intcost[j];
                let extcost_old = extcost[j];
                if dstpart == bisection[j] {
                    intcost[j] += w;
                    extcost[j] -= w;
                } else {
                    intcost[j] -= w;
                    extcost[j] += w;
                }
                if vertex_move[j].is_some() {
                    continue;
                }
                if extcost_old > 0 {
                    if extcost[j] == 0 {
                        queues[bisection[j]].delete(j, gain_old);
                    } else {
                        queues[bisection[j]].update(j, gain_old, extcost[j] - intcost[j]);
                    }
                } else if extcost[j] > 0 {
                    queues[bisection[j]].insert(j, extcost[j] - intcost[j]);
                }
            }

            moveno += 1;
        }

        // Undo every move past the best point seen in this pass.
        for i in 0..moveno {
            vertex_move[moves[i]] = None;
        }
        let mut mv = moveno as isize - 1;
        while mv > edgecut_best_moveno {
            let v = moves[mv as usize];
            let dstpart = 1 - bisection[v];
            bisection[v] = dstpart;
            std::mem::swap(&mut extcost[v], &mut intcost[v]);
            pw[dstpart] += g.vertex_weight(v);
            pw[1 - dstpart] -= g.vertex_weight(v);
            for k in 0..g.degree(v) {
                let j = g.adjncy[g.xadj[v] + k];
                let w = g.edge_weight(v, k);
                if dstpart == bisection[j] {
                    intcost[j] += w;
                    extcost[j] -= w;
                } else {
                    intcost[j] -= w;
                    extcost[j] += w;
                }
            }
            mv -= 1;
        }

        tracing::debug!(iter, edgecut_best, moveno, "FM refine pass");

        if edgecut_best_moveno == -1 || edgecut_best == edgecut_before_pass {
            break;
        }
    }

    edgecut_best as u64
}

/// Force exactly `nmoves` vertices from the side opposite `dstside` onto
/// `dstside`, choosing the highest-gain candidates first. A single greedy
/// pass with no undo step (used to correct residual imbalance after FM
/// refinement settles); if fewer than `nmoves` movable vertices remain the
/// call simply moves as many as it can.
pub fn balance(g: &Graph, bisection: &mut [usize], nmoves: usize, dstside: usize, rng: &mut DeterministicRng) {
    let n = g.n;
    if n == 0 || nmoves == 0 {
        return;
    }

    let mut extcost = vec![0i64; n];
    let mut intcost = vec![0i64; n];
    let mut gain_max = 0i64;
    for i in 0..n {
        let mut gain_sum = 0i64;
        for k in 0..g.degree(i) {
            let j = g.adjncy[g.xadj[i] + k];
            let w = g.edge_weight(i, k);
            if bisection[j] != bisection[i] {
                extcost[i] += w;
            } else {
                intcost[i] += w;
            }
            gain_sum += w;
        }
        if gain_sum > gain_max {
            gain_max = gain_sum;
        }
    }

    let mut queues = [FmQueue::new(n, gain_max), FmQueue::new(n, gain_max)];
    let mut vertex_move: Vec<Option<usize>> = vec![None; n];

    let mut perm: Vec<usize> = (0..n).collect();
    rng.shuffle(&mut perm);
    for &j in &perm {
        if extcost[j] > 0 || g.degree(j) == 0 {
            queues[bisection[j]].insert(j, extcost[j] - intcost[j]);
        }
    }

    let srcpart = 1 - dstside;
    let mut moveno = 0usize;
    while moveno < nmoves {
        let v = match queues[srcpart].extract_max() {
            Some(v) => v,
            None => break,
        };
        bisection[v] = dstside;
        vertex_move[v] = Some(moveno);
        std::mem::swap(&mut extcost[v], &mut intcost[v]);

        for k in 0..g.degree(v) {
            let j = g.adjncy[g.xadj[v] + k];
            let w = g.edge_weight(v, k);
            let gain_old = extcost[j] - intcost[j];
            let extcost_old = extcost[j];
            if dstside == bisection[j] {
                intcost[j] += w;
                extcost[j] -= w;
            } else {
                intcost[j] -= w;
                extcost[j] += w;
            }
            if vertex_move[j].is_some() {
                continue;
            }
            if extcost_old > 0 {
                if extcost[j] == 0 {
                    queues[bisection[j]].delete(j, gain_old);
                } else {
                    queues[bisection[j]].update(j, gain_old, extcost[j] - intcost[j]);
                }
            } else if extcost[j] > 0 {
                queues[bisection[j]].insert(j, extcost[j] - intcost[j]);
            }
        }

        moveno += 1;
    }
}
