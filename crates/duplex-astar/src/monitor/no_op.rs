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

/// A monitor that ignores every event and never stops the search.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct NoOperationMonitor;

impl NoOperationMonitor {
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl TreeSearchMonitor for NoOperationMonitor {
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, _context: &SearchContext<'_>, _statistics: &AStarStatistics) {}

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &AStarStatistics) {}

    #[inline(always)]
    fn search_command(&mut self, _statistics: &AStarStatistics) -> SearchCommand {
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_step(&mut self, _statistics: &AStarStatistics) {}

    #[inline(always)]
    fn on_expand(
        &mut self,
        _state: &PartialSolution,
        _score: Score,
        _statistics: &AStarStatistics,
    ) {
    }

    #[inline(always)]
    fn on_children_enqueued(
        &mut self,
        _state: &PartialSolution,
        _count: usize,
        _statistics: &AStarStatistics,
    ) {
    }

    #[inline(always)]
    fn on_solution_found(&mut self, _solution: &TwoPathSolution, _statistics: &AStarStatistics) {}
}
