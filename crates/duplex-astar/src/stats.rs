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

use std::time::Duration;

/// Statistics collected during a best-first search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AStarStatistics {
    /// States popped from the frontier and expanded.
    pub states_explored: u64,
    /// Child states pushed onto the frontier.
    pub states_generated: u64,
    /// Candidate extensions rejected because the path would revisit a node.
    pub cycle_rejections: u64,
    /// Children whose estimate is infinite (the next terminal is unreachable).
    pub infeasible_states: u64,
    /// The deepest state generated, in traversed links.
    pub max_depth: u64,
    /// The largest frontier size observed.
    pub peak_frontier: u64,
    /// Total time spent in the search.
    pub time_total: Duration,
}

impl AStarStatistics {
    #[inline]
    pub fn on_state_explored(&mut self) {
        self.states_explored = self.states_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_state_generated(&mut self) {
        self.states_generated = self.states_generated.saturating_add(1);
    }

    #[inline]
    pub fn on_cycle_rejected(&mut self) {
        self.cycle_rejections = self.cycle_rejections.saturating_add(1);
    }

    #[inline]
    pub fn on_infeasible_state(&mut self) {
        self.infeasible_states = self.infeasible_states.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_frontier_size(&mut self, size: usize) {
        self.peak_frontier = self.peak_frontier.max(size as u64);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for AStarStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Duplex A* Search Statistics:")?;
        writeln!(f, "  States explored:      {}", self.states_explored)?;
        writeln!(f, "  States generated:     {}", self.states_generated)?;
        writeln!(f, "  Cycle rejections:     {}", self.cycle_rejections)?;
        writeln!(f, "  Infeasible states:    {}", self.infeasible_states)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Peak frontier size:   {}", self.peak_frontier)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_maxima() {
        let mut stats = AStarStatistics::default();
        stats.on_state_explored();
        stats.on_state_generated();
        stats.on_state_generated();
        stats.on_cycle_rejected();
        stats.on_depth_update(4);
        stats.on_depth_update(2);
        stats.on_frontier_size(10);
        stats.on_frontier_size(3);

        assert_eq!(stats.states_explored, 1);
        assert_eq!(stats.states_generated, 2);
        assert_eq!(stats.cycle_rejections, 1);
        assert_eq!(stats.max_depth, 4);
        assert_eq!(stats.peak_frontier, 10);
    }

    #[test]
    fn test_counters_saturate() {
        let mut stats = AStarStatistics {
            states_explored: u64::MAX,
            ..Default::default()
        };
        stats.on_state_explored();
        assert_eq!(stats.states_explored, u64::MAX);
    }
}
