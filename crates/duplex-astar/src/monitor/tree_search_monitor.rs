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
    context::SearchContext, result::TwoPathSolution, state::PartialSolution,
    stats::AStarStatistics,
};
use duplex_core::num::score::Score;
use duplex_search::command::SearchCommand;

/// Receives events from a running best-first search.
pub trait TreeSearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called once before the root state is pushed.
    fn on_enter_search(&mut self, context: &SearchContext<'_>, statistics: &AStarStatistics);

    /// Called once when the search ends, whatever the outcome.
    fn on_exit_search(&mut self, statistics: &AStarStatistics);

    /// Asked once per step, before the next state is popped. Any
    /// `Terminate` aborts the search.
    fn search_command(&mut self, _statistics: &AStarStatistics) -> SearchCommand {
        SearchCommand::Continue
    }

    /// Called at the start of every step.
    fn on_step(&mut self, statistics: &AStarStatistics);

    /// Called when a non-terminal state is popped, before its children are
    /// generated.
    fn on_expand(&mut self, state: &PartialSolution, score: Score, statistics: &AStarStatistics);

    /// Called after the children of `state` were pushed onto the frontier.
    fn on_children_enqueued(
        &mut self,
        state: &PartialSolution,
        count: usize,
        statistics: &AStarStatistics,
    );

    /// Called when a complete state has been popped and decoded.
    fn on_solution_found(&mut self, solution: &TwoPathSolution, statistics: &AStarStatistics);
}

impl<M> TreeSearchMonitor for &mut M
where
    M: TreeSearchMonitor + ?Sized,
{
    #[inline(always)]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline(always)]
    fn on_enter_search(&mut self, context: &SearchContext<'_>, statistics: &AStarStatistics) {
        (**self).on_enter_search(context, statistics)
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &AStarStatistics) {
        (**self).on_exit_search(statistics)
    }

    #[inline(always)]
    fn search_command(&mut self, statistics: &AStarStatistics) -> SearchCommand {
        (**self).search_command(statistics)
    }

    #[inline(always)]
    fn on_step(&mut self, statistics: &AStarStatistics) {
        (**self).on_step(statistics)
    }

    #[inline(always)]
    fn on_expand(&mut self, state: &PartialSolution, score: Score, statistics: &AStarStatistics) {
        (**self).on_expand(state, score, statistics)
    }

    #[inline(always)]
    fn on_children_enqueued(
        &mut self,
        state: &PartialSolution,
        count: usize,
        statistics: &AStarStatistics,
    ) {
        (**self).on_children_enqueued(state, count, statistics)
    }

    #[inline(always)]
    fn on_solution_found(&mut self, solution: &TwoPathSolution, statistics: &AStarStatistics) {
        (**self).on_solution_found(solution, statistics)
    }
}

impl std::fmt::Debug for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}
