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

//! `TwoPathSolver` front end for the best-first engine.
//!
//! Bundles weights, configuration, and optional limits so the engine can be
//! run side by side with other solvers through `duplex_search::comparison`.

use crate::{
    astar::AStarSolver,
    context::SearchConfig,
    monitor::{
        composite::CompositeTreeSearchMonitor, expansion_limit::ExpansionLimitMonitor,
        time_limit::TimeLimitMonitor,
    },
};
use duplex_model::{index::NodeIndex, network::Network, paths::TwoPaths};
use duplex_search::{
    objective::Weights,
    solver::{SolverError, TwoPathSolver},
};
use std::time::Duration;

/// The best-first engine behind the `TwoPathSolver` interface.
#[derive(Clone, Debug, Default)]
pub struct AStarTwoPathSolver {
    weights: Weights,
    config: SearchConfig,
    expansion_limit: Option<u64>,
    time_limit: Option<Duration>,
    solver: AStarSolver,
}

impl AStarTwoPathSolver {
    #[inline]
    pub fn new(weights: Weights, config: SearchConfig) -> Self {
        Self {
            weights,
            config,
            expansion_limit: None,
            time_limit: None,
            solver: AStarSolver::new(),
        }
    }

    /// Stops every search after `limit` expanded states.
    #[inline]
    pub fn with_expansion_limit(mut self, limit: u64) -> Self {
        self.expansion_limit = Some(limit);
        self
    }

    /// Stops every search after `limit` of wall-clock time.
    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    #[inline]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl TwoPathSolver for AStarTwoPathSolver {
    fn name(&self) -> &str {
        "AStarTwoPathSolver"
    }

    fn solve(
        &mut self,
        network: &Network,
        start: NodeIndex,
        end: NodeIndex,
    ) -> Result<TwoPaths, SolverError> {
        let mut monitor = CompositeTreeSearchMonitor::with_capacity(2);
        if let Some(limit) = self.expansion_limit {
            monitor.add_monitor(ExpansionLimitMonitor::new(limit));
        }
        if let Some(limit) = self.time_limit {
            monitor.add_monitor(TimeLimitMonitor::new(limit, 1_000));
        }

        let outcome = self
            .solver
            .solve(network, start, end, self.weights, self.config, monitor)?;
        Ok(outcome.into_solution().paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duplex_model::{index::LinkIndex, network::NetworkBuilder};
    use duplex_search::comparison::compare;

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

    #[test]
    fn test_solves_through_trait() {
        let net = worked_example();
        let mut solver = AStarTwoPathSolver::new(Weights::default(), SearchConfig::default());
        let paths = solver
            .solve(&net, NodeIndex::new(0), NodeIndex::new(1))
            .expect("path pair");
        assert_eq!(paths.outbound_links(), &[LinkIndex::new(0), LinkIndex::new(3)]);
        assert_eq!(paths.shared_links().count(), 0);
    }

    #[test]
    fn test_limit_maps_to_aborted() {
        let net = worked_example();
        let mut solver = AStarTwoPathSolver::new(Weights::default(), SearchConfig::default())
            .with_expansion_limit(1);
        let err = solver
            .solve(&net, NodeIndex::new(0), NodeIndex::new(1))
            .unwrap_err();
        assert_eq!(
            err,
            SolverError::Aborted("Expansion limit of 1 states reached".into())
        );
    }

    #[test]
    fn test_identical_terminals_map_to_construction_error() {
        let net = worked_example();
        let mut solver = AStarTwoPathSolver::default();
        let err = solver
            .solve(&net, NodeIndex::new(3), NodeIndex::new(3))
            .unwrap_err();
        assert!(matches!(err, SolverError::Construction(_)));
    }

    #[test]
    fn test_comparison_scores_engine_answer() {
        let net = worked_example();
        let w = Weights::default();
        let mut solver = AStarTwoPathSolver::new(w, SearchConfig::default())
            .with_time_limit(Duration::from_secs(60));
        let mut solvers: [&mut dyn TwoPathSolver; 1] = [&mut solver];
        let reports = compare(&net, NodeIndex::new(0), NodeIndex::new(1), &w, &mut solvers);

        let scored = reports[0].outcome.as_ref().expect("valid answer");
        assert!((scored.goal - 3.0).abs() < 1e-12);
        assert_eq!(reports[0].solver, "AStarTwoPathSolver");
    }
}
