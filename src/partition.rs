//! Top-level recursive bisection partitioner: validates input, coarsens,
//! bisects via LND + FM, projects the bisection back up, balances residual
//! imbalance, and recurses on each half until `partweights.len()` partitions
//! have been produced.

use crate::coarsen::{self, CoarsenOptions};
use crate::error::PartitionError;
use crate::graph::Graph;
use crate::initial;
use crate::refine;
use crate::rng::DeterministicRng;

const COARSE_GRAPH_SIZE: usize = 21;

/// Partition `g` into `partweights.len()` subsets by recursive bisection,
/// writing each vertex's partition index into `part`. `g` is treated as an
/// irregular graph: coarsening uses a randomized, degree-sorted traversal.
pub fn partition(g: &Graph, partweights: &[i64], part: &mut [usize]) -> Result<(), PartitionError> {
    partition_impl(g, partweights, part, false)
}

/// Same as [`partition`], but for regular (uniform-degree) graphs: skips the
/// random permutation and degree-capped counting sort during coarsening and
/// the corresponding LND traversal randomization, relying on the graph's
/// inherent regularity to keep heavy-edge matching effective without them.
pub fn partition_regular(g: &Graph, partweights: &[i64], part: &mut [usize]) -> Result<(), PartitionError> {
    partition_impl(g, partweights, part, true)
}

fn partition_impl(g: &Graph, partweights: &[i64], part: &mut [usize], regular: bool) -> Result<(), PartitionError> {
    validate(g, partweights)?;

    let mut rng = DeterministicRng::seeded(0);
    let vweight_max = if g.n > COARSE_GRAPH_SIZE {
        (1.45 * (g.n as f64 / COARSE_GRAPH_SIZE as f64)).ceil() as i64
    } else {
        1
    };
    let opt = CoarsenOptions {
        coarse_graph_size: COARSE_GRAPH_SIZE,
        vweight_max,
    };

    recurse(g, &opt, partweights, part, 0, regular, &mut rng);
    Ok(())
}

fn validate(g: &Graph, partweights: &[i64]) -> Result<(), PartitionError> {
    let mut sum = 0i64;
    for &w in partweights {
        if w <= 0 || w >= g.n as i64 {
            return Err(PartitionError::InvalidInput(format!(
                "partition weight {w} must be in (0, {})",
                g.n
            )));
        }
        sum += w;
    }
    if sum != g.n as i64 {
        return Err(PartitionError::InvalidInput(format!(
            "partition weights sum to {sum}, expected {}",
            g.n
        )));
    }
    Ok(())
}

fn recurse(
    g: &Graph,
    opt: &CoarsenOptions,
    partweights: &[i64],
    part: &mut [usize],
    startpartno: usize,
    regular: bool,
    rng: &mut DeterministicRng,
) {
    let nparts = partweights.len();
    tracing::debug!(nparts, n = g.n, startpartno, "recursion step");

    if nparts <= 1 {
        write_all(g, part, startpartno);
        return;
    }

    let half = nparts / 2;
    let pw0: i64 = partweights[..half].iter().sum();
    let pw1: i64 = g.n as i64 - pw0;

    let mut bisection = bisect_multilevel(g, opt, [pw0, pw1], regular, rng);

    let mut pwresult = [0i64; 2];
    for (v, &b) in bisection.iter().enumerate() {
        pwresult[b] += g.vertex_weight(v);
    }
    let nmoves = (pwresult[0] - pw0).unsigned_abs() as usize;
    if nmoves > 0 {
        let moveto = if pwresult[0] > pw0 { 1 } else { 0 };
        refine::balance(g, &mut bisection, nmoves, moveto, rng);
    }

    write_bisection(g, &bisection, part, startpartno);

    if nparts > 2 {
        let (left, right) = g.bisect(&bisection);
        if nparts > 3 {
            recurse(&left, opt, &partweights[..half], part, startpartno, regular, rng);
            recurse(&right, opt, &partweights[half..], part, startpartno + half, regular, rng);
        } else {
            // nparts == 3: the left half is already a single partition.
            recurse(&right, opt, &partweights[half..], part, startpartno + half, regular, rng);
        }
    }
}

/// Coarsen `g` down to a small graph, bisect it with LND, then project the
/// bisection back up one level at a time, refining with FM at each level.
fn bisect_multilevel(g: &Graph, opt: &CoarsenOptions, partsizes: [i64; 2], regular: bool, rng: &mut DeterministicRng) -> Vec<usize> {
    let stack = coarsen::build_coarse_stack(g, opt, regular, rng);
    let coarsest = stack.last().map(|l| &l.graph).unwrap_or(g);
    let (mut bisection, _cut) = initial::bisect_lnd(coarsest, partsizes, rng);

    for i in (0..stack.len()).rev() {
        let finer: &Graph = if i == 0 { g } else { &stack[i - 1].graph };
        let cmap = &stack[i].cmap;
        let mut fine_bisection = vec![0usize; finer.n];
        for v in 0..finer.n {
            fine_bisection[v] = bisection[cmap[v]];
        }
        refine::refine(finer, &mut fine_bisection, partsizes, rng);
        bisection = fine_bisection;
    }

    bisection
}

fn write_all(g: &Graph, part: &mut [usize], partno: usize) {
    for v in 0..g.n {
        part[g.parent(v)] = partno;
    }
}

fn write_bisection(g: &Graph, bisection: &[usize], part: &mut [usize], startpartno: usize) {
    for v in 0..g.n {
        part[g.parent(v)] = bisection[v] + startpartno;
    }
}

/// Total weight of edges crossing between different partitions.
pub fn edgecut(g: &Graph, part: &[usize]) -> u64 {
    let mut cut = 0i64;
    for u in 0..g.n {
        for k in 0..g.degree(u) {
            let v = g.adjncy[g.xadj[u] + k];
            if part[u] != part[v] {
                cut += g.edge_weight(u, k);
            }
        }
    }
    (cut / 2) as u64
}
