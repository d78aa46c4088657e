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

//! Expansion limit monitor for the best-first search
//!
//! `ExpansionLimitMonitor` stops the search once the number of expanded
//! states reaches a configured ceiling. Unlike a wall-clock limit it is
//! deterministic: the same request with the same limit always stops at the
//! same state.

use crate::{
    context::SearchContext, monitor::tree_search_monitor::TreeSearchMonitor,
    result::TwoPathSolution, state::PartialSolution, stats::AStarStatistics,
};
use duplex_core::num::score::Score;
use duplex_search::command::SearchCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionLimitMonitor {
    expansion_limit: u64,
}

impl ExpansionLimitMonitor {
    /// Creates a new `ExpansionLimitMonitor` that allows at most
    /// `expansion_limit` expanded states.
    pub fn new(expansion_limit: u64) -> Self {
        Self { expansion_limit }
    }

    #[inline]
    pub fn expansion_limit(&self) -> u64 {
        self.expansion_limit
    }
}

impl std::fmt::Display for ExpansionLimitMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ExpansionLimitMonitor(expansion_limit: {})",
            self.expansion_limit
        )
    }
}

impl TreeSearchMonitor for ExpansionLimitMonitor {
    fn name(&self) -> &str {
        "ExpansionLimitMonitor"
    }

    fn on_enter_search(&mut self, _context: &SearchContext<'_>, _statistics: &AStarStatistics) {}

    fn on_exit_search(&mut self, _statistics: &AStarStatistics) {}

    fn search_command(&mut self, statistics: &AStarStatistics) -> SearchCommand {
        if statistics.states_explored >= self.expansion_limit {
            SearchCommand::Terminate(format!(
                "Expansion limit of {} states reached",
                self.expansion_limit
            ))
        } else {
            SearchCommand::Continue
        }
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

    #[test]
    fn test_terminates_at_limit() {
        let mut monitor = ExpansionLimitMonitor::new(3);
        let mut stats = AStarStatistics::default();

        for _ in 0..3 {
            assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
            stats.on_state_explored();
        }
        assert_eq!(
            monitor.search_command(&stats),
            SearchCommand::Terminate("Expansion limit of 3 states reached".into())
        );
    }

    #[test]
    fn test_zero_limit_stops_immediately() {
        let mut monitor = ExpansionLimitMonitor::new(0);
        assert!(
            monitor
                .search_command(&AStarStatistics::default())
                .is_terminate()
        );
    }
}
