// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! All-pairs distance tables feeding the search heuristic.
//!
//! Two dense `N x N` row-major matrices are computed once per request:
//!
//! - `hop_distance[i][j]`: minimum number of links between `i` and `j`, by a
//!   breadth-first sweep from every source. Unreached pairs hold
//!   `UNREACHABLE`.
//! - `congestion_distance[i][j]`: minimum sum of link congestion costs, by a
//!   Dijkstra sweep from every source. Unreached pairs hold `+inf`.
//!
//! The Dijkstra sweep inserts lazily instead of decreasing keys: a node may
//! sit in the heap several times, and entries whose recorded cost is worse
//! than the current best are skipped on pop. Only strict improvements cause a
//! re-insertion, so the table can never be overwritten with a worse value.
//!
//! Disconnected networks are fine; their cross-component entries simply stay
//! unreachable.

use duplex_core::num::score::Score;
use duplex_model::{index::NodeIndex, network::Network};
use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
};

/// Sentinel hop distance for unreachable pairs.
pub const UNREACHABLE: u32 = u32::MAX;

/// Shortest hop and congestion-cost distances between all node pairs.
#[derive(Clone, PartialEq)]
pub struct DistanceTables {
    num_nodes: usize,
    hops: Vec<u32>,
    congestion: Vec<f64>,
    scale_factor: f64,
}

impl DistanceTables {
    /// Computes both tables for the current loads of `network`.
    pub fn compute(network: &Network) -> Self {
        let start_time = std::time::Instant::now();
        let n = network.num_nodes();
        let mut hops = vec![UNREACHABLE; n * n];
        let mut congestion = vec![f64::INFINITY; n * n];
        let link_costs: Vec<f64> = network
            .links()
            .map(|(_, link)| link.congestion_cost())
            .collect();

        let mut queue = VecDeque::with_capacity(n);
        let mut heap = BinaryHeap::with_capacity(n);
        for source in network.node_indices() {
            let row = source.get() * n..(source.get() + 1) * n;
            hop_sweep(network, source, &mut hops[row.clone()], &mut queue);
            congestion_sweep(
                network,
                &link_costs,
                source,
                &mut congestion[row],
                &mut heap,
            );
        }

        let scale_factor = scale_factor(&hops, &congestion);
        tracing::debug!(
            nodes = n,
            links = network.num_links(),
            scale_factor,
            elapsed = ?start_time.elapsed(),
            "distance tables computed"
        );

        Self {
            num_nodes: n,
            hops,
            congestion,
            scale_factor,
        }
    }

    /// Returns the number of nodes covered.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline(always)]
    fn flatten(&self, from: NodeIndex, to: NodeIndex) -> usize {
        debug_assert!(
            from.get() < self.num_nodes && to.get() < self.num_nodes,
            "called `DistanceTables::flatten` with node index out of bounds: the len is {} but the indices are {} and {}",
            self.num_nodes,
            from.get(),
            to.get()
        );
        from.get() * self.num_nodes + to.get()
    }

    /// Returns the minimum hop count from `from` to `to`, or `None` if `to`
    /// is unreachable.
    #[inline]
    pub fn hop_distance(&self, from: NodeIndex, to: NodeIndex) -> Option<u32> {
        let d = self.hops[self.flatten(from, to)];
        (d != UNREACHABLE).then_some(d)
    }

    /// Returns the minimum hop count as `f64`, `+inf` if unreachable.
    #[inline]
    pub fn hop_distance_f64(&self, from: NodeIndex, to: NodeIndex) -> f64 {
        match self.hop_distance(from, to) {
            Some(d) => d as f64,
            None => f64::INFINITY,
        }
    }

    /// Returns the minimum congestion-cost sum from `from` to `to`, `+inf`
    /// if unreachable.
    #[inline]
    pub fn congestion_distance(&self, from: NodeIndex, to: NodeIndex) -> f64 {
        self.congestion[self.flatten(from, to)]
    }

    /// Returns the ratio of the summed finite hop distances to the summed
    /// finite congestion distances over all ordered pairs.
    ///
    /// This brings congestion distances onto the scale of hop counts. It is
    /// `1.0` when the congestion sum is zero (an idle network) or not finite.
    #[inline(always)]
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
}

impl std::fmt::Debug for DistanceTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistanceTables")
            .field("num_nodes", &self.num_nodes)
            .field("scale_factor", &self.scale_factor)
            .finish()
    }
}

impl std::fmt::Display for DistanceTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DistanceTables(num_nodes: {}, scale_factor: {:.6})",
            self.num_nodes, self.scale_factor
        )
    }
}

fn hop_sweep(
    network: &Network,
    source: NodeIndex,
    row: &mut [u32],
    queue: &mut VecDeque<NodeIndex>,
) {
    queue.clear();
    row[source.get()] = 0;
    queue.push_back(source);

    while let Some(node) = queue.pop_front() {
        let next = row[node.get()] + 1;
        for &link in network.neighbors(node) {
            let Some(other) = network.link(link).opposite(node) else {
                continue;
            };
            if row[other.get()] == UNREACHABLE {
                row[other.get()] = next;
                queue.push_back(other);
            }
        }
    }
}

fn congestion_sweep(
    network: &Network,
    link_costs: &[f64],
    source: NodeIndex,
    row: &mut [f64],
    heap: &mut BinaryHeap<Reverse<(Score, NodeIndex)>>,
) {
    heap.clear();
    row[source.get()] = 0.0;
    heap.push(Reverse((Score::ZERO, source)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        // Stale entry.
        if cost.value() > row[node.get()] {
            continue;
        }
        for &link in network.neighbors(node) {
            let Some(other) = network.link(link).opposite(node) else {
                continue;
            };
            let candidate = cost.value() + link_costs[link.get()];
            if candidate < row[other.get()] {
                row[other.get()] = candidate;
                heap.push(Reverse((Score::new(candidate), other)));
            }
        }
    }
}

fn scale_factor(hops: &[u32], congestion: &[f64]) -> f64 {
    let hop_sum: f64 = hops
        .iter()
        .filter(|&&d| d != UNREACHABLE)
        .map(|&d| d as f64)
        .sum();
    let congestion_sum: f64 = congestion.iter().filter(|c| c.is_finite()).sum();

    if congestion_sum > 0.0 && congestion_sum.is_finite() {
        hop_sum / congestion_sum
    } else {
        1.0
    }
}
