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

//! Completion estimates for partial solutions.
//!
//! The estimate of a state is a guess at the goal still to be added before
//! both paths are closed. It depends only on the head, the phase, and (for a
//! negative `common` weight) on how many links the vector already uses, and
//! reads its distances from the precomputed tables.
//!
//! If the next terminal cannot be reached from the head, the estimate is
//! `+inf` regardless of the weights, so such states sort behind every state
//! that can still be completed.

use crate::{
    context::{HeuristicModel, SearchContext},
    state::Phase,
};
use duplex_model::{
    index::NodeIndex,
    solution::{LinkUsage, SolutionVector},
};

/// Estimates the goal still to be added to a state standing on `head`.
#[inline]
pub fn estimate(
    ctx: &SearchContext<'_>,
    head: NodeIndex,
    phase: Phase,
    vector: &SolutionVector,
) -> f64 {
    match ctx.config().heuristic {
        HeuristicModel::Admissible => admissible(ctx, head, phase, vector),
        HeuristicModel::Scaled => scaled(ctx, head, phase),
    }
}

fn admissible(
    ctx: &SearchContext<'_>,
    head: NodeIndex,
    phase: Phase,
    vector: &SolutionVector,
) -> f64 {
    let tables = ctx.tables();
    let w = ctx.weights();
    let (start, end) = (ctx.start(), ctx.end());

    let (remaining, shareable) = match phase {
        Phase::Complete => return 0.0,
        Phase::Outbound => {
            let Some(hops) = tables.hop_distance(head, end) else {
                return f64::INFINITY;
            };
            let inbound = tables.congestion_distance(end, start);
            if !inbound.is_finite() {
                return f64::INFINITY;
            }
            (w.length * hops as f64 + w.cost * inbound, vector.len())
        }
        Phase::Inbound => {
            let inbound = tables.congestion_distance(head, start);
            if !inbound.is_finite() {
                return f64::INFINITY;
            }
            (w.cost * inbound, vector.count(LinkUsage::Outbound))
        }
    };

    // Every link that may still turn shared could earn the bonus.
    if w.common < 0.0 {
        remaining + w.common * shareable as f64
    } else {
        remaining
    }
}

fn scaled(ctx: &SearchContext<'_>, head: NodeIndex, phase: Phase) -> f64 {
    let tables = ctx.tables();
    let w = ctx.weights();
    let scale = tables.scale_factor();
    let (start, end) = (ctx.start(), ctx.end());

    let leg = |from: NodeIndex, to: NodeIndex| -> Option<f64> {
        let hops = tables.hop_distance(from, to)?;
        let congestion = tables.congestion_distance(from, to);
        congestion
            .is_finite()
            .then(|| w.length * hops as f64 + w.cost * scale * congestion)
    };

    let remaining = match phase {
        Phase::Complete => Some(0.0),
        Phase::Outbound => leg(head, end).zip(leg(end, start)).map(|(a, b)| a + b),
        Phase::Inbound => leg(head, start),
    };
    remaining.unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::{SearchConfig, prepare},
        distance::DistanceTables,
    };
    use duplex_model::{
        index::LinkIndex,
        network::{Network, NetworkBuilder},
        solution::Direction,
    };
    use duplex_search::objective::Weights;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    // S=0, K=1, a=2, b=3, c=4, d=5
    fn worked_example() -> Network {
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

    fn cheapest_inbound() -> f64 {
        2.0 * (1.0f64 / 0.9).log10()
    }

    #[test]
    fn test_admissible_root_estimate() {
        let net = worked_example();
        let tables = DistanceTables::compute(&net);
        let ctx = prepare(
            &net,
            n(0),
            n(1),
            &tables,
            Weights::default(),
            SearchConfig::default(),
        )
        .unwrap();
        let root = SolutionVector::new(net.num_links());

        let h = estimate(&ctx, n(0), Phase::Outbound, &root);
        assert!((h - (2.0 + cheapest_inbound())).abs() < 1e-12);
        // Never above the optimum of this instance.
        assert!(h <= 3.0);

        let h = estimate(&ctx, n(1), Phase::Inbound, &root);
        assert!((h - cheapest_inbound()).abs() < 1e-12);

        assert_eq!(estimate(&ctx, n(0), Phase::Complete, &root), 0.0);
    }

    #[test]
    fn test_negative_common_subtracts_shareable_links() {
        let net = worked_example();
        let tables = DistanceTables::compute(&net);
        let w = Weights::default().with_common(-10.0);
        let ctx = prepare(&net, n(0), n(1), &tables, w, SearchConfig::default()).unwrap();

        let mut vector = SolutionVector::new(net.num_links());
        let h = estimate(&ctx, n(0), Phase::Outbound, &vector);
        assert!((h - (2.0 + cheapest_inbound() - 70.0)).abs() < 1e-9);

        vector.mark(LinkIndex::new(0), Direction::Outbound);
        vector.mark(LinkIndex::new(3), Direction::Outbound);
        let h = estimate(&ctx, n(1), Phase::Inbound, &vector);
        assert!((h - (cheapest_inbound() - 20.0)).abs() < 1e-9);
    }

    #[test]
    fn test_scaled_counts_both_legs() {
        let net = worked_example();
        let tables = DistanceTables::compute(&net);
        let config = SearchConfig::default().with_heuristic(HeuristicModel::Scaled);
        let ctx = prepare(&net, n(0), n(1), &tables, Weights::default(), config).unwrap();
        let root = SolutionVector::new(net.num_links());
        let s = tables.scale_factor();

        let leg = 2.0 + s * cheapest_inbound();
        let h = estimate(&ctx, n(0), Phase::Outbound, &root);
        assert!((h - 2.0 * leg).abs() < 1e-9);

        let h = estimate(&ctx, n(1), Phase::Inbound, &root);
        assert!((h - leg).abs() < 1e-9);
    }

    #[test]
    fn test_unreachable_terminal_is_infinite() {
        let mut b = NetworkBuilder::new();
        b.add_node("s")
            .add_node("x")
            .add_node("e")
            .add_node("y")
            .add_link("sx", "s", "x", 1.0, 1.0)
            .add_link("ey", "e", "y", 1.0, 1.0);
        let net = b.build().unwrap();
        let tables = DistanceTables::compute(&net);
        let root = SolutionVector::new(net.num_links());

        for model in [HeuristicModel::Admissible, HeuristicModel::Scaled] {
            let config = SearchConfig::default().with_heuristic(model);
            // Zero weights must not turn the unreachable distance into 0 * inf.
            let w = Weights::new(0.0, 0.0, 1.0);
            let ctx = prepare(&net, n(0), n(2), &tables, w, config).unwrap();
            assert_eq!(
                estimate(&ctx, n(0), Phase::Outbound, &root),
                f64::INFINITY,
                "{model}"
            );
            assert_eq!(
                estimate(&ctx, n(2), Phase::Inbound, &root),
                f64::INFINITY,
                "{model}"
            );
        }
    }
}
