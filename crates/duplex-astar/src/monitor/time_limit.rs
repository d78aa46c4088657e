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
use duplex_search::command::SearchCommand;
use std::time::{Duration, Instant};

/// A monitor that terminates the search after a specified duration.
///
/// Checks the clock only every `check_interval` steps to minimize overhead.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    start_time: Option<Instant>,
    check_interval: u64,
    steps_since_last_check: u64,
}

impl TimeLimitMonitor {
    /// Creates a new `TimeLimitMonitor` with the specified duration and check interval.
    /// `check_interval` specifies how many steps to take between time checks.
    /// A higher value reduces overhead but may lead to slightly exceeding the time limit.
    pub fn new(duration: Duration, check_interval: u64) -> Self {
        Self {
            time_limit: duration,
            start_time: None,
            check_interval: check_interval.max(1),
            steps_since_last_check: 0,
        }
    }

    /// Creates a new `TimeLimitMonitor` with the specified duration and a default check interval of 10,000.
    pub fn with_default_check_interval(duration: Duration) -> Self {
        Self::new(duration, 10_000)
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl std::fmt::Display for TimeLimitMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TimeLimitMonitor(time_limit: {:.2?}, check_interval: {})",
            self.time_limit, self.check_interval
        )
    }
}

impl TreeSearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _context: &SearchContext<'_>, _statistics: &AStarStatistics) {
        self.start_time = Some(Instant::now());
        self.steps_since_last_check = 0;
    }

    fn on_exit_search(&mut self, _statistics: &AStarStatistics) {
        self.start_time = None;
    }

    fn search_command(&mut self, _statistics: &AStarStatistics) -> SearchCommand {
        self.steps_since_last_check = self.steps_since_last_check.saturating_add(1);

        if self.steps_since_last_check >= self.check_interval {
            self.steps_since_last_check = 0;

            if let Some(start) = self.start_time
                && start.elapsed() > self.time_limit
            {
                return SearchCommand::Terminate(format!(
                    "Time limit of {} seconds exceeded",
                    self.time_limit.as_secs()
                ));
            }
        }

        SearchCommand::Continue
    }

    fn on_step(&mut self, _statistics: &AStarStatistics) {}

    fn on_expand(
        &mut self,
        _state: &PartialSolution,
        _score: Score,
        _statistics: &AStarStatistics,
    ) {
    }

    fn on_children_enqueued(
        &mut self,
        _state: &PartialSolution,
        _count: usize,
        _statistics: &AStarStatistics,
    ) {
    }

    fn on_solution_found(&mut self, _solution: &TwoPathSolution, _statistics: &AStarStatistics) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::{SearchConfig, prepare},
        distance::DistanceTables,
    };
    use duplex_model::{index::NodeIndex, network::NetworkBuilder};
    use duplex_search::objective::Weights;

    #[test]
    fn test_continues_before_search_started() {
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO, 1);
        let stats = AStarStatistics::default();
        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
    }

    #[test]
    fn test_terminates_after_limit() {
        let mut b = NetworkBuilder::new();
        b.add_node("x").add_node("y").add_link("xy", "x", "y", 1.0, 1.0);
        let net = b.build().unwrap();
        let tables = DistanceTables::compute(&net);
        let ctx = prepare(
            &net,
            NodeIndex::new(0),
            NodeIndex::new(1),
            &tables,
            Weights::default(),
            SearchConfig::default(),
        )
        .unwrap();

        let stats = AStarStatistics::default();
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO, 2);
        monitor.on_enter_search(&ctx, &stats);
        std::thread::sleep(Duration::from_millis(2));

        // The clock is only read on every second step.
        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
        assert_eq!(
            monitor.search_command(&stats),
            SearchCommand::Terminate("Time limit of 0 seconds exceeded".into())
        );

        monitor.on_exit_search(&stats);
        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
    }
}
