//! CSR graph representation for partitioning.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::PartitionError;

/// A graph stored in Compressed Sparse Row (CSR) format.
///
/// Vertices are numbered `0..n`. For vertex `u`, its neighbors are
/// `adjncy[xadj[u]..xadj[u+1]]` with corresponding edge weights
/// `adjwgt[xadj[u]..xadj[u+1]]`.
#[derive(Clone, Debug)]
pub struct Graph {
    /// Number of vertices.
    pub n: usize,
    /// Row pointers (length `n + 1`).
    pub xadj: Vec<usize>,
    /// Column indices (flattened neighbor lists).
    pub adjncy: Vec<usize>,
    /// Edge weights aligned with `adjncy`. If empty, all edges have weight 1.
    pub adjwgt: Vec<i64>,
    /// Vertex weights. If empty, all vertices have weight 1.
    pub vwgt: Vec<i64>,
    /// Maps a vertex of this graph to its super-vertex in the next coarser
    /// level. Only set on the finer side of a coarsening step.
    pub vmap: Option<Vec<usize>>,
    /// Maps a vertex of this graph back to its vertex id in the original,
    /// uncoarsened graph. Only set on subgraphs produced by `bisect`.
    pub vparents: Option<Vec<usize>>,
}

impl Graph {
    /// Create a graph from CSR arrays.
    pub fn new(n: usize, xadj: Vec<usize>, adjncy: Vec<usize>) -> Self {
        assert_eq!(xadj.len(), n + 1);
        Self {
            n,
            xadj,
            adjncy,
            adjwgt: Vec::new(),
            vwgt: Vec::new(),
            vmap: None,
            vparents: None,
        }
    }

    /// Set edge weights.
    pub fn with_adjwgt(mut self, adjwgt: Vec<i64>) -> Self {
        assert_eq!(adjwgt.len(), self.adjncy.len());
        self.adjwgt = adjwgt;
        self
    }

    /// Set vertex weights.
    pub fn with_vwgt(mut self, vwgt: Vec<i64>) -> Self {
        assert_eq!(vwgt.len(), self.n);
        self.vwgt = vwgt;
        self
    }

    /// Degree of vertex `u`.
    pub fn degree(&self, u: usize) -> usize {
        self.xadj[u + 1] - self.xadj[u]
    }

    /// Neighbors of vertex `u`.
    pub fn neighbors(&self, u: usize) -> &[usize] {
        &self.adjncy[self.xadj[u]..self.xadj[u + 1]]
    }

    /// Edge weight for the `k`-th neighbor of `u` (0-indexed within neighbor list).
    pub fn edge_weight(&self, u: usize, k: usize) -> i64 {
        if self.adjwgt.is_empty() {
            1
        } else {
            self.adjwgt[self.xadj[u] + k]
        }
    }

    /// Vertex weight for `u`.
    pub fn vertex_weight(&self, u: usize) -> i64 {
        if self.vwgt.is_empty() {
            1
        } else {
            self.vwgt[u]
        }
    }

    /// Total weight of all edges incident to `u`.
    pub fn weighted_degree(&self, u: usize) -> i64 {
        let start = self.xadj[u];
        let end = self.xadj[u + 1];
        if self.adjwgt.is_empty() {
            (end - start) as i64
        } else {
            self.adjwgt[start..end].iter().sum()
        }
    }

    /// Total edge cut for a given partition assignment.
    pub fn edge_cut(&self, part: &[usize]) -> i64 {
        let mut cut = 0i64;
        for u in 0..self.n {
            for k in 0..self.degree(u) {
                let v = self.adjncy[self.xadj[u] + k];
                if part[u] != part[v] {
                    cut += self.edge_weight(u, k);
                }
            }
        }
        cut / 2 // each edge counted twice
    }

    /// Parent vertex id in the original, uncoarsened graph.
    pub fn parent(&self, u: usize) -> usize {
        self.vparents.as_ref().map(|vp| vp[u]).unwrap_or(u)
    }

    /// Load a graph from the text format: a header line `V E fmt` followed
    /// by `V` lines of `neighbor weight` pairs. Neighbor ids are 1-based on
    /// disk, 0-based in memory. Both historical format tags (`1` and `11`)
    /// are accepted and treated identically (edge-weighted).
    pub fn load(path: impl AsRef<Path>) -> Result<Graph, PartitionError> {
        let content = std::fs::read_to_string(path)?;
        let mut lines = content.lines();

        let header = lines
            .next()
            .ok_or_else(|| PartitionError::Format("missing header line".into()))?;
        let mut header_fields = header.split_whitespace();
        let n: usize = header_fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| PartitionError::Format("missing vertex count".into()))?;
        let _e: usize = header_fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| PartitionError::Format("missing edge count".into()))?;
        let fmt: i32 = header_fields.next().and_then(|s| s.parse().ok()).unwrap_or(1);
        if fmt != 1 && fmt != 11 {
            return Err(PartitionError::Format(format!("unsupported format tag {fmt}")));
        }

        let mut xadj = vec![0usize; n + 1];
        let mut adjncy = Vec::new();
        let mut adjwgt = Vec::new();

        for i in 0..n {
            let line = lines.next().unwrap_or("");
            let mut fields = line.split_whitespace();
            loop {
                let tok = match fields.next() {
                    Some(tok) => tok,
                    None => break,
                };
                let v: usize = tok
                    .parse()
                    .map_err(|_| PartitionError::Format(format!("bad neighbor id on line {}", i + 2)))?;
                let w: i64 = fields
                    .next()
                    .ok_or_else(|| PartitionError::Format(format!("missing edge weight on line {}", i + 2)))?
                    .parse()
                    .map_err(|_| PartitionError::Format(format!("bad edge weight on line {}", i + 2)))?;
                if v == 0 || v > n {
                    return Err(PartitionError::Format(format!(
                        "neighbor id {v} out of range on line {}",
                        i + 2
                    )));
                }
                adjncy.push(v - 1);
                adjwgt.push(w);
            }
            xadj[i + 1] = adjncy.len();
        }

        Ok(Graph {
            n,
            xadj,
            adjncy,
            adjwgt,
            vwgt: Vec::new(),
            vmap: None,
            vparents: None,
        })
    }

    /// Save a graph in the text format described by `load`. Always writes
    /// format tag `1`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PartitionError> {
        let mut out = String::new();
        writeln!(out, "{} {} 1", self.n, self.adjncy.len() / 2).unwrap();
        for i in 0..self.n {
            for k in 0..self.degree(i) {
                write!(out, "{} {} ", self.adjncy[self.xadj[i] + k] + 1, self.edge_weight(i, k)).unwrap();
            }
            writeln!(out).unwrap();
        }
        std::fs::write(path, out)?;
        Ok(())
    }

    /// Split a graph into two induced subgraphs according to `bisection`
    /// (values 0/1, one per vertex). Each returned subgraph carries
    /// `vparents` mapping its vertices back to `self`'s original ids (or, if
    /// `self` already had `vparents`, all the way back to the top-level
    /// caller's graph).
    pub fn bisect(&self, bisection: &[usize]) -> (Graph, Graph) {
        let n = self.n;
        let mut nvertices = [0usize; 2];
        let mut nedges = [0usize; 2];
        let mut old2new = [vec![0usize; n], vec![0usize; n]];

        for i in 0..n {
            let b = bisection[i];
            old2new[b][i] = nvertices[b];
            nvertices[b] += 1;
            for k in 0..self.degree(i) {
                let j = self.adjncy[self.xadj[i] + k];
                if bisection[j] == b {
                    nedges[b] += 1;
                }
            }
        }

        let mut xadj = [vec![0usize; nvertices[0] + 1], vec![0usize; nvertices[1] + 1]];
        let mut adjncy = [Vec::with_capacity(nedges[0]), Vec::with_capacity(nedges[1])];
        let mut adjwgt = [Vec::with_capacity(nedges[0]), Vec::with_capacity(nedges[1])];
        let mut vparents = [vec![0usize; nvertices[0]], vec![0usize; nvertices[1]]];
        let mut curvertex = [0usize; 2];

        for i in 0..n {
            let b = bisection[i];
            let cur = curvertex[b];
            vparents[b][cur] = self.parent(i);
            xadj[b][cur] = adjncy[b].len();
            for k in 0..self.degree(i) {
                let j = self.adjncy[self.xadj[i] + k];
                if b == bisection[j] {
                    adjncy[b].push(old2new[b][j]);
                    adjwgt[b].push(self.edge_weight(i, k));
                }
            }
            curvertex[b] += 1;
        }
        xadj[0][nvertices[0]] = adjncy[0].len();
        xadj[1][nvertices[1]] = adjncy[1].len();

        let [xadj0, xadj1] = xadj;
        let [adjncy0, adjncy1] = adjncy;
        let [adjwgt0, adjwgt1] = adjwgt;
        let [vp0, vp1] = vparents;

        let mut left = Graph::new(nvertices[0], xadj0, adjncy0);
        left.adjwgt = adjwgt0;
        left.vparents = Some(vp0);

        let mut right = Graph::new(nvertices[1], xadj1, adjncy1);
        right.adjwgt = adjwgt1;
        right.vparents = Some(vp1);

        (left, right)
    }

    /// Task graph of Bruck's collective-communication algorithm on
    /// `nvertices` ranks: a circulant graph with `ceil(log2(nvertices))`
    /// send/receive offsets per step, merged by target rank, edge weights
    /// equal to the accumulated step size.
    pub fn generate_bruck(nvertices: usize) -> Option<Graph> {
        if nvertices < 2 {
            return None;
        }
        let nsteps = (nvertices as f64).log2().ceil() as usize;

        // Degree is identical for every vertex by construction; compute it
        // once from the canonical (rank-independent) offset pattern.
        let mut canon: Vec<i64> = Vec::new();
        let mut pof2: i64 = 1;
        for _ in 0..nsteps {
            canon.push((nvertices as i64 - pof2).rem_euclid(nvertices as i64));
            canon.push(pof2.rem_euclid(nvertices as i64));
            pof2 *= 2;
        }
        canon.sort_unstable();
        canon.dedup();
        let deg = canon.len();

        let mut xadj = vec![0usize; nvertices + 1];
        for i in 0..nvertices {
            xadj[i + 1] = xadj[i] + deg;
        }
        let mut adjncy = vec![0usize; deg * nvertices];
        let mut adjwgt = vec![0i64; deg * nvertices];

        for r in 0..nvertices {
            let mut entries: Vec<(i64, i64)> = Vec::with_capacity(2 * nsteps + 2);
            let mut pof2: i64 = 1;
            while pof2 <= nvertices as i64 / 2 {
                entries.push(((nvertices as i64 + r as i64 - pof2).rem_euclid(nvertices as i64), pof2));
                entries.push(((r as i64 + pof2) % nvertices as i64, pof2));
                pof2 *= 2;
            }
            if nvertices as i64 - pof2 > 0 {
                let m = nvertices as i64 - pof2;
                entries.push(((nvertices as i64 + r as i64 - pof2).rem_euclid(nvertices as i64), m));
                entries.push(((r as i64 + pof2) % nvertices as i64, m));
            }
            entries.sort_unstable_by_key(|&(v, _)| v);
            let mut merged: Vec<(i64, i64)> = Vec::with_capacity(deg);
            for (v, w) in entries {
                if let Some(last) = merged.last_mut() {
                    if last.0 == v {
                        last.1 += w;
                        continue;
                    }
                }
                merged.push((v, w));
            }

            let base = xadj[r];
            for (k, (v, w)) in merged.into_iter().enumerate() {
                adjncy[base + k] = v as usize;
                adjwgt[base + k] = w;
            }
        }

        let mut g = Graph::new(nvertices, xadj, adjncy);
        g.adjwgt = adjwgt;
        Some(g)
    }

    /// Task graph of the recursive-doubling algorithm on `nvertices` ranks:
    /// rank `r` exchanges with `r ^ 2^k` at step `k`, for `k` in
    /// `0..ceil(log2(nvertices))`, with edge weight `2 * 2^k`.
    pub fn generate_recdoubling(nvertices: usize) -> Option<Graph> {
        if nvertices < 2 {
            return None;
        }
        let nsteps = (nvertices as f64).log2().ceil() as usize;

        let mut xadj = vec![0usize; nvertices + 1];
        for i in 0..nvertices {
            xadj[i + 1] = xadj[i] + nsteps;
        }
        let mut adjncy = vec![0usize; nsteps * nvertices];
        let mut adjwgt = vec![0i64; nsteps * nvertices];

        for r in 0..nvertices {
            let base = xadj[r];
            let mut pof2 = 1usize;
            for i in 0..nsteps {
                adjncy[base + i] = r ^ pof2;
                adjwgt[base + i] = 2 * pof2 as i64;
                pof2 *= 2;
            }
        }

        let mut g = Graph::new(nvertices, xadj, adjncy);
        g.adjwgt = adjwgt;
        Some(g)
    }

    /// Dump the adjacency list as `vertex: neighbor/weight ...` lines, one
    /// per vertex. Debug/test aid only.
    pub fn debug_adjacency(&self) -> String {
        let mut out = String::new();
        for i in 0..self.n {
            write!(out, "{i}: ").unwrap();
            for k in 0..self.degree(i) {
                write!(out, "{}/{} ", self.adjncy[self.xadj[i] + k], self.edge_weight(i, k)).unwrap();
            }
            writeln!(out).unwrap();
        }
        out
    }
}
