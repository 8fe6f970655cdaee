//! Multilevel weighted graph partitioner.
//!
//! Maps vertices of a weighted communication graph onto `k` caller-sized
//! subsets by minimizing edge-cut. Implements:
//! - Heavy-edge-matching coarsening (`coarsen`)
//! - Levelized nested dissection initial bisection (`initial`)
//! - Fiduccia-Mattheyses 2-way refinement with a dual-representation
//!   priority queue (`refine`, `pqueue`)
//! - Recursive-bisection k-way partitioning (`partition`)
//!
//! # Example
//!
//! ```
//! use gpart::{Graph, partition, edgecut};
//!
//! // A simple 4-vertex path graph: 0-1-2-3
//! let xadj = vec![0, 1, 3, 5, 6];
//! let adjncy = vec![1, 0, 2, 1, 3, 2];
//! let g = Graph::new(4, xadj, adjncy);
//!
//! let mut part = vec![0usize; 4];
//! partition(&g, &[2, 2], &mut part).unwrap();
//! assert_eq!(edgecut(&g, &part), 1);
//! ```

pub mod coarsen;
pub mod error;
pub mod graph;
pub mod initial;
pub mod partition;
pub mod pqueue;
pub mod refine;
pub mod rng;

pub use error::PartitionError;
pub use graph::Graph;
pub use partition::{edgecut, partition, partition_regular};
