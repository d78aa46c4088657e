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

//! Objective weights and scoring.
//!
//! The minimized goal of a solution vector sums, per link:
//!
//! | usage    | contribution                                   |
//! |----------|------------------------------------------------|
//! | Unused   | 0                                              |
//! | Outbound | `length`                                       |
//! | Inbound  | `cost * congestion_cost`                       |
//! | Shared   | `length + cost * congestion_cost + common`     |
//!
//! so the outbound path is priced by hop count, the inbound path by the
//! congestion it runs through, and every link used by both directions pays
//! `common` on top. A large positive `common` discourages overlap; a negative
//! one rewards it.
//!
//! `rate` is a second, independent score used when comparing solvers: it
//! rewards shared links, penalizes short outbound paths less than long ones,
//! and penalizes inbound paths through the product of their residual
//! fractions. Higher is better there; lower is better for the goal.

use duplex_model::{
    network::Network,
    paths::TwoPaths,
    solution::{LinkUsage, SolutionVector},
};

/// Weights of the three objective terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights {
    /// Per hop of the outbound path.
    pub length: f64,
    /// Per unit of congestion cost on the inbound path.
    pub cost: f64,
    /// Per link used by both directions.
    pub common: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            length: 1.0,
            cost: 1.0,
            common: 1e9,
        }
    }
}

impl Weights {
    #[inline]
    pub const fn new(length: f64, cost: f64, common: f64) -> Self {
        Self {
            length,
            cost,
            common,
        }
    }

    #[inline]
    pub const fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    #[inline]
    pub const fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    #[inline]
    pub const fn with_common(mut self, common: f64) -> Self {
        self.common = common;
        self
    }

    /// Returns `true` if the path weights are non-negative, which the
    /// admissible heuristic relies on.
    #[inline]
    pub fn has_nonnegative_path_weights(&self) -> bool {
        self.length >= 0.0 && self.cost >= 0.0
    }

    /// Returns `true` if every weight is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.length.is_finite() && self.cost.is_finite() && self.common.is_finite()
    }

    /// Returns the goal contribution of one link.
    #[inline]
    pub fn link_contribution(&self, usage: LinkUsage, congestion_cost: f64) -> f64 {
        let mut value = 0.0;
        if usage.has_outbound() {
            value += self.length;
        }
        if usage.has_inbound() {
            value += self.cost * congestion_cost;
        }
        if usage.is_shared() {
            value += self.common;
        }
        value
    }

    /// Returns the change of the goal when one link goes from `before` to
    /// `after`.
    #[inline]
    pub fn link_delta(&self, before: LinkUsage, after: LinkUsage, congestion_cost: f64) -> f64 {
        self.link_contribution(after, congestion_cost)
            - self.link_contribution(before, congestion_cost)
    }
}

impl std::fmt::Display for Weights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Weights(length: {}, cost: {}, common: {})",
            self.length, self.cost, self.common
        )
    }
}

/// Computes the goal of `vector` from scratch.
///
/// # Panics
///
/// In debug builds, panics if the vector length differs from the number of
/// links.
pub fn goal_of(network: &Network, vector: &SolutionVector, weights: &Weights) -> f64 {
    debug_assert_eq!(
        vector.len(),
        network.num_links(),
        "called `goal_of` with a vector of the wrong length"
    );
    vector
        .iter()
        .filter(|(_, usage)| !usage.is_unused())
        .map(|(link, usage)| {
            weights.link_contribution(usage, network.link(link).congestion_cost())
        })
        .sum()
}

/// Rates a path pair for solver comparison. Higher is better.
///
/// `common * shared - length / outbound_hops - cost * prod(residual_fraction)`,
/// where the product runs over the links of the inbound path. The length term
/// is zero for an empty outbound path.
pub fn rate(network: &Network, paths: &TwoPaths, weights: &Weights) -> f64 {
    let shared = paths.shared_links().count() as f64;
    let hops = paths.outbound_links().len();
    let residual_product: f64 = paths
        .inbound_links()
        .iter()
        .map(|&link| network.link(link).residual_fraction())
        .product();

    let mut score = weights.common * shared;
    if hops > 0 {
        score -= weights.length / hops as f64;
    }
    score - weights.cost * residual_product
}

#[cfg(test)]
mod tests {
    use super::*;
    use duplex_model::{
        index::{LinkIndex, NodeIndex},
        network::NetworkBuilder,
    };

    fn loaded_diamond() -> Network {
        let mut b = NetworkBuilder::new();
        for id in ["S", "K", "a", "b", "c", "d"] {
            b.add_node(id);
        }
        b.add_link("L1", "S", "a", 1.0, 1.0)
            .add_link("L2", "S", "c", 1.0, 1.0)
            .add_link("L3", "a", "b", 1.0, 1.0)
            .add_link("L4", "a", "K", 1.0, 1.0)
            .add_link("L5", "b", "K", 1.0, 1.0)
            .add_link("L6", "c", "d", 1.0, 1.0)
            .add_link("L7", "d", "K", 1.0, 1.0);
        let mut net = b.build().unwrap();
        for (i, load) in [(2, 0.1), (3, 0.5), (4, 0.1), (5, 0.9)] {
            net.set_load(LinkIndex::new(i), load).unwrap();
        }
        net
    }

    fn vector(codes: &[u8]) -> SolutionVector {
        SolutionVector::from_codes(codes).unwrap()
    }

    #[test]
    fn test_default_weights() {
        let w = Weights::default();
        assert_eq!(w, Weights::new(1.0, 1.0, 1e9));
        assert!(w.has_nonnegative_path_weights());
        assert!(w.is_finite());
    }

    #[test]
    fn test_link_contribution_table() {
        let w = Weights::new(2.0, 3.0, 100.0);
        assert_eq!(w.link_contribution(LinkUsage::Unused, 0.5), 0.0);
        assert_eq!(w.link_contribution(LinkUsage::Outbound, 0.5), 2.0);
        assert_eq!(w.link_contribution(LinkUsage::Inbound, 0.5), 1.5);
        assert_eq!(w.link_contribution(LinkUsage::Shared, 0.5), 103.5);
        assert_eq!(
            w.link_delta(LinkUsage::Outbound, LinkUsage::Shared, 0.5),
            101.5
        );
    }

    #[test]
    fn test_goal_of_documented_pair() {
        let net = loaded_diamond();
        let w = Weights::default();

        // Outbound S-c-d-K (3 hops), inbound K-b-a-S over loads 0.1, 0.1, 0.
        let g = goal_of(&net, &vector(&[2, 1, 2, 0, 2, 1, 1]), &w);
        let expected = 3.0 + 2.0 * (1.0f64 / 0.9).log10();
        assert!((g - expected).abs() < 1e-9, "goal {g} != {expected}");
    }

    #[test]
    fn test_goal_of_counts_shared_penalty() {
        let net = loaded_diamond();
        let w = Weights::default();
        let g = goal_of(&net, &vector(&[3, 0, 0, 3, 0, 0, 0]), &w);
        let expected = 2.0 + 2e9 + 2.0f64.log10();
        assert!((g - expected).abs() < 1e-3);
    }

    #[test]
    fn test_rate_matches_formula() {
        let net = loaded_diamond();
        let w = Weights::default();
        let paths = TwoPaths::decode(
            &net,
            &vector(&[2, 1, 2, 0, 2, 1, 1]),
            NodeIndex::new(0),
            NodeIndex::new(1),
        )
        .unwrap();

        let expected = -1.0 / 3.0 - 0.9 * 0.9;
        assert!((rate(&net, &paths, &w) - expected).abs() < 1e-12);

        let shared = TwoPaths::decode(
            &net,
            &vector(&[3, 0, 0, 3, 0, 0, 0]),
            NodeIndex::new(0),
            NodeIndex::new(1),
        )
        .unwrap();
        let expected = 2e9 - 0.5 - 0.5;
        assert!((rate(&net, &shared, &w) - expected).abs() < 1e-3);
    }
}
