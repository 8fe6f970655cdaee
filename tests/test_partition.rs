use gpart::{edgecut, partition, partition_regular, Graph, PartitionError};

fn assert_exact_balance(part: &[usize], partweights: &[i64]) {
    let nparts = partweights.len();
    let mut counts = vec![0i64; nparts];
    for &p in part {
        assert!(p < nparts, "part {} out of range [0, {})", p, nparts);
        counts[p] += 1;
    }
    assert_eq!(counts, partweights, "partition sizes do not match requested weights");
}

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

fn clique(n: usize) -> Graph {
    let mut xadj = vec![0usize; n + 1];
    let mut adjncy = Vec::new();
    for i in 0..n {
        for j in 0..n {
            if i != j {
                adjncy.push(j);
            }
        }
        xadj[i + 1] = adjncy.len();
    }
    Graph::new(n, xadj, adjncy)
}

/// Two disjoint cliques with no edges between them.
fn two_cliques(k: usize) -> Graph {
    let a = clique(k);
    let b = clique(k);
    let n = 2 * k;
    let mut xadj = vec![0usize; n + 1];
    let mut adjncy = Vec::new();
    for i in 0..k {
        for &j in a.neighbors(i) {
            adjncy.push(j);
        }
        xadj[i + 1] = adjncy.len();
    }
    for i in 0..k {
        for &j in b.neighbors(i) {
            adjncy.push(j + k);
        }
        xadj[k + i + 1] = adjncy.len();
    }
    Graph::new(n, xadj, adjncy)
}

#[test]
fn recdoubling_4_vertices_partitions_into_balanced_halves() {
    // Edges: {0-1 w=2, 2-3 w=2, 0-2 w=4, 1-3 w=4}.
    let g = Graph::generate_recdoubling(4).unwrap();
    let mut part = vec![0usize; 4];
    partition(&g, &[2, 2], &mut part).unwrap();
    assert_exact_balance(&part, &[2, 2]);
    assert!(edgecut(&g, &part) <= 4);
}

#[test]
fn bruck_8_vertices_partitions_into_balanced_halves() {
    let g = Graph::generate_bruck(8).unwrap();
    let mut part = vec![0usize; 8];
    partition(&g, &[4, 4], &mut part).unwrap();
    assert_exact_balance(&part, &[4, 4]);
}

#[test]
fn path_100_vertices_into_4_parts_of_25() {
    let g = path_graph(100);
    let mut part = vec![0usize; 100];
    partition(&g, &[25, 25, 25, 25], &mut part).unwrap();
    assert_exact_balance(&part, &[25, 25, 25, 25]);
    // A path split into 4 contiguous runs of 25 crosses exactly 3 edges.
    assert_eq!(edgecut(&g, &part), 3);
}

#[test]
fn two_cliques_k5_into_2_parts_of_5_has_zero_cut() {
    let g = two_cliques(5);
    let mut part = vec![0usize; 10];
    partition(&g, &[5, 5], &mut part).unwrap();
    assert_exact_balance(&part, &[5, 5]);
    assert_eq!(edgecut(&g, &part), 0);
}

#[test]
fn nparts_equals_v_gives_one_vertex_per_partition() {
    let g = clique(5);
    let partweights = vec![1i64; 5];
    let mut part = vec![0usize; 5];
    partition(&g, &partweights, &mut part).unwrap();
    let mut seen = part.clone();
    seen.sort_unstable();
    assert_eq!(seen, (0..5).collect::<Vec<_>>());
    // Every edge is cut since every vertex is its own partition.
    let total_weight: i64 = (0..g.n).map(|v| g.weighted_degree(v)).sum::<i64>() / 2;
    assert_eq!(edgecut(&g, &part) as i64, total_weight);
}

#[test]
fn malformed_partweights_is_rejected_not_silently_ignored() {
    // Source behavior silently "succeeds" with an untouched part[]; this
    // reimplementation surfaces the mismatch instead (see DESIGN.md).
    let g = path_graph(10);
    let mut part = vec![7usize; 10];
    let err = partition(&g, &[3, 3], &mut part).unwrap_err();
    assert!(matches!(err, PartitionError::InvalidInput(_)));
    // part[] is left untouched on the error path.
    assert!(part.iter().all(|&p| p == 7));
}

#[test]
fn zero_weight_partition_is_rejected() {
    let g = path_graph(10);
    let mut part = vec![0usize; 10];
    let err = partition(&g, &[0, 10], &mut part).unwrap_err();
    assert!(matches!(err, PartitionError::InvalidInput(_)));
}

#[test]
fn single_partition_is_a_no_op_assignment() {
    let g = path_graph(4);
    let mut part = vec![7usize; 4];
    partition(&g, &[4], &mut part).unwrap();
    assert!(part.iter().all(|&p| p == 0));
}

#[test]
fn disconnected_pair_of_edges_splits_with_zero_cut() {
    let xadj = vec![0, 1, 2, 3, 4];
    let adjncy = vec![1, 0, 3, 2];
    let g = Graph::new(4, xadj, adjncy);
    let mut part = vec![0usize; 4];
    partition(&g, &[2, 2], &mut part).unwrap();
    assert_exact_balance(&part, &[2, 2]);
    assert_eq!(edgecut(&g, &part), 0);
}

#[test]
fn three_way_split_uses_every_partition_index() {
    let g = clique(12);
    let mut part = vec![0usize; 12];
    partition(&g, &[4, 4, 4], &mut part).unwrap();
    assert_exact_balance(&part, &[4, 4, 4]);
}

#[test]
fn regular_flavor_matches_balance_contract() {
    let g = Graph::generate_bruck(8).unwrap();
    let mut part = vec![0usize; 8];
    partition_regular(&g, &[4, 4], &mut part).unwrap();
    assert_exact_balance(&part, &[4, 4]);
}

#[test]
fn partition_is_deterministic_given_the_seed() {
    let g = Graph::generate_recdoubling(16).unwrap();
    let mut part1 = vec![0usize; 16];
    let mut part2 = vec![0usize; 16];
    partition(&g, &[8, 8], &mut part1).unwrap();
    partition(&g, &[8, 8], &mut part2).unwrap();
    assert_eq!(part1, part2);
}

#[test]
fn save_then_load_round_trips_the_graph() {
    let g = Graph::generate_bruck(6).unwrap();
    let dir = std::env::temp_dir().join(format!("gpart-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bruck6.graph");
    g.save(&path).unwrap();
    let loaded = Graph::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.n, g.n);
    assert_eq!(loaded.adjncy, g.adjncy);
    assert_eq!(loaded.adjwgt, g.adjwgt);
    assert_eq!(loaded.xadj, g.xadj);
}
