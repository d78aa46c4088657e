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

//! Monitoring combinators for the best-first search
//!
//! Provides `CompositeTreeSearchMonitor`, a fan-out monitor that forwards every
//! event to its children. This lets you mix logging and early stopping without
//! coupling them to the engine.
//!
//! Behavior
//! - Events are dispatched to child monitors in insertion order.
//! - `search_command` short-circuits on the first non-`Continue` response;
//!   put stricter stop conditions first.
//! - Other callbacks always fan out to all children.

use crate::{
    context::SearchContext, monitor::tree_search_monitor::TreeSearchMonitor,
    result::TwoPathSolution, state::PartialSolution, stats::AStarStatistics,
};
use duplex_core::num::score::Score;
use duplex_search::command::SearchCommand;

/// A tree search monitor that aggregates multiple monitors and forwards events to all of them.
pub struct CompositeTreeSearchMonitor<'a> {
    monitors: Vec<Box<dyn TreeSearchMonitor + 'a>>,
}

impl Default for CompositeTreeSearchMonitor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CompositeTreeSearchMonitor<'a> {
    /// Creates a new empty `CompositeTreeSearchMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn TreeSearchMonitor + 'a>] {
        &self.monitors
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.monitors.clear();
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a> FromIterator<Box<dyn TreeSearchMonitor + 'a>> for CompositeTreeSearchMonitor<'a> {
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn TreeSearchMonitor + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Debug for CompositeTreeSearchMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.monitors.iter()).finish()
    }
}

impl TreeSearchMonitor for CompositeTreeSearchMonitor<'_> {
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, context: &SearchContext<'_>, statistics: &AStarStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(context, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &AStarStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    #[inline(always)]
    fn search_command(&mut self, statistics: &AStarStatistics) -> SearchCommand {
        for monitor in &mut self.monitors {
            let command = monitor.search_command(statistics);
            if command.is_terminate() {
                return command;
            }
        }
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_step(&mut self, statistics: &AStarStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_step(statistics);
        }
    }

    #[inline(always)]
    fn on_expand(&mut self, state: &PartialSolution, score: Score, statistics: &AStarStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_expand(state, score, statistics);
        }
    }

    #[inline(always)]
    fn on_children_enqueued(
        &mut self,
        state: &PartialSolution,
        count: usize,
        statistics: &AStarStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_children_enqueued(state, count, statistics);
        }
    }

    #[inline(always)]
    fn on_solution_found(&mut self, solution: &TwoPathSolution, statistics: &AStarStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(solution, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{expansion_limit::ExpansionLimitMonitor, no_op::NoOperationMonitor};
    use std::{cell::Cell, rc::Rc};

    struct CountingMonitor {
        steps: Rc<Cell<u32>>,
        command: SearchCommand,
    }

    impl TreeSearchMonitor for CountingMonitor {
        fn name(&self) -> &str {
            "CountingMonitor"
        }
        fn on_enter_search(&mut self, _: &SearchContext<'_>, _: &AStarStatistics) {}
        fn on_exit_search(&mut self, _: &AStarStatistics) {}
        fn search_command(&mut self, _: &AStarStatistics) -> SearchCommand {
            self.command.clone()
        }
        fn on_step(&mut self, _: &AStarStatistics) {
            self.steps.set(self.steps.get() + 1);
        }
        fn on_expand(&mut self, _: &PartialSolution, _: Score, _: &AStarStatistics) {}
        fn on_children_enqueued(&mut self, _: &PartialSolution, _: usize, _: &AStarStatistics) {}
        fn on_solution_found(&mut self, _: &TwoPathSolution, _: &AStarStatistics) {}
    }

    #[test]
    fn test_events_fan_out_to_all_children() {
        let a = Rc::new(Cell::new(0));
        let b = Rc::new(Cell::new(0));
        let mut composite = CompositeTreeSearchMonitor::with_capacity(2);
        composite.add_monitor(CountingMonitor {
            steps: a.clone(),
            command: SearchCommand::Continue,
        });
        composite.add_monitor(CountingMonitor {
            steps: b.clone(),
            command: SearchCommand::Continue,
        });

        let stats = AStarStatistics::default();
        composite.on_step(&stats);
        composite.on_step(&stats);

        assert_eq!(composite.len(), 2);
        assert_eq!(a.get(), 2);
        assert_eq!(b.get(), 2);
        assert_eq!(composite.search_command(&stats), SearchCommand::Continue);
    }

    #[test]
    fn test_first_terminate_wins() {
        let mut composite: CompositeTreeSearchMonitor<'_> = vec![
            Box::new(NoOperationMonitor::new()) as Box<dyn TreeSearchMonitor>,
            Box::new(CountingMonitor {
                steps: Rc::new(Cell::new(0)),
                command: SearchCommand::Terminate("first".into()),
            }),
            Box::new(ExpansionLimitMonitor::new(0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            composite.search_command(&AStarStatistics::default()),
            SearchCommand::Terminate("first".into())
        );
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut composite = CompositeTreeSearchMonitor::new();
        assert!(composite.is_empty());
        assert_eq!(
            composite.search_command(&AStarStatistics::default()),
            SearchCommand::Continue
        );
    }
}
