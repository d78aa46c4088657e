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

use crate::{
    context::SearchContext, monitor::tree_search_monitor::TreeSearchMonitor,
    result::TwoPathSolution, state::PartialSolution, stats::AStarStatistics,
};
use duplex_core::num::score::Score;
use std::time::{Duration, Instant};

/// Emits periodic progress lines through `tracing::info!`.
///
/// The clock is read only when the number of expanded states has all bits of
/// `clock_check_mask` clear, so the mask should be one less than a power of
/// two.
#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    last_score: Score,
    last_depth: u32,
    best_goal: Option<f64>,
}

impl LogTreeSearchMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            last_score: Score::ZERO,
            last_depth: 0,
            best_goal: None,
        }
    }

    #[inline(always)]
    fn log_line(&mut self, stats: &AStarStatistics) {
        let now = Instant::now();
        tracing::info!(
            elapsed = ?now.duration_since(self.start_time),
            explored = stats.states_explored,
            generated = stats.states_generated,
            depth = self.last_depth,
            score = %self.last_score,
            peak_frontier = stats.peak_frontier,
            cycle_rejections = stats.cycle_rejections,
            "search progress"
        );
        self.last_log_time = now;
    }
}

impl Default for LogTreeSearchMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl std::fmt::Display for LogTreeSearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl TreeSearchMonitor for LogTreeSearchMonitor {
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, context: &SearchContext<'_>, _statistics: &AStarStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.last_score = Score::ZERO;
        self.last_depth = 0;
        self.best_goal = None;
        tracing::info!(
            start = context.network().node_id(context.start()),
            end = context.network().node_id(context.end()),
            heuristic = %context.config().heuristic,
            weights = %context.weights(),
            "search started"
        );
    }

    fn on_exit_search(&mut self, statistics: &AStarStatistics) {
        tracing::info!(
            elapsed = ?self.start_time.elapsed(),
            explored = statistics.states_explored,
            generated = statistics.states_generated,
            goal = ?self.best_goal,
            "search finished"
        );
    }

    fn on_step(&mut self, _statistics: &AStarStatistics) {}

    fn on_expand(&mut self, state: &PartialSolution, score: Score, statistics: &AStarStatistics) {
        self.last_score = score;
        self.last_depth = state.depth();
        if (statistics.states_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(statistics);
        }
    }

    fn on_children_enqueued(
        &mut self,
        _state: &PartialSolution,
        _count: usize,
        _statistics: &AStarStatistics,
    ) {
    }

    fn on_solution_found(&mut self, solution: &TwoPathSolution, _statistics: &AStarStatistics) {
        self.best_goal = Some(solution.goal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{astar::AStarSolver, context::SearchConfig};
    use duplex_model::{index::NodeIndex, network::NetworkBuilder};
    use duplex_search::objective::Weights;

    #[test]
    fn test_records_goal_and_resets_on_enter() {
        let mut b = NetworkBuilder::new();
        b.add_node("x")
            .add_node("y")
            .add_node("z")
            .add_link("xy", "x", "y", 1.0, 1.0)
            .add_link("yz", "y", "z", 1.0, 1.0)
            .add_link("zx", "z", "x", 1.0, 1.0);
        let net = b.build().unwrap();

        // Zero mask and interval: every expansion is allowed to log.
        let mut monitor = LogTreeSearchMonitor::new(Duration::ZERO, 0);
        let outcome = AStarSolver::new()
            .solve(
                &net,
                NodeIndex::new(0),
                NodeIndex::new(1),
                Weights::default(),
                SearchConfig::default(),
                &mut monitor,
            )
            .unwrap();

        assert_eq!(monitor.best_goal, Some(outcome.solution().goal));
        assert!(monitor.last_depth > 0);
        assert_eq!(
            format!("{}", LogTreeSearchMonitor::default()),
            "LogTreeSearchMonitor(log_interval: 1s, clock_check_mask: 4095)"
        );
    }
}
