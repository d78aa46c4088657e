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

use crate::stats::AStarStatistics;
use duplex_core::num::score::Score;
use duplex_model::{index::NodeIndex, paths::TwoPaths, solution::SolutionVector};
use duplex_search::result::{SolverResult, TerminationReason};

/// A complete path pair as found by the search.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoPathSolution {
    /// The terminal solution vector.
    pub vector: SolutionVector,
    /// The decoded outbound and inbound paths.
    pub paths: TwoPaths,
    /// The goal of `vector`.
    pub goal: f64,
    /// The frontier priority of the terminal state. Equal to `goal`, since
    /// complete states have a zero estimate.
    pub score: Score,
    /// Every head from the root to the terminal state: the outbound nodes
    /// followed by the inbound nodes without their first (the end node).
    pub route: Vec<NodeIndex>,
}

impl std::fmt::Display for TwoPathSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TwoPathSolution(goal: {:.6}, {})", self.goal, self.paths)
    }
}

/// Result of a search that popped a complete state.
#[derive(Debug, Clone)]
pub struct AStarOutcome {
    solution: TwoPathSolution,
    termination_reason: TerminationReason,
    statistics: AStarStatistics,
}

impl AStarOutcome {
    /// A solution backed by an admissible heuristic.
    #[inline]
    pub fn optimal(solution: TwoPathSolution, statistics: AStarStatistics) -> Self {
        Self {
            solution,
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    /// A solution without an optimality guarantee.
    #[inline]
    pub fn found(solution: TwoPathSolution, statistics: AStarStatistics) -> Self {
        Self {
            solution,
            termination_reason: TerminationReason::SolutionFound,
            statistics,
        }
    }

    #[inline]
    pub fn solution(&self) -> &TwoPathSolution {
        &self.solution
    }

    #[inline]
    pub fn into_solution(self) -> TwoPathSolution {
        self.solution
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &AStarStatistics {
        &self.statistics
    }

    /// Returns `true` if the solution is guaranteed to minimize the goal.
    #[inline]
    pub fn is_proven_optimal(&self) -> bool {
        self.termination_reason == TerminationReason::OptimalityProven
    }

    /// Converts into the strategy-independent result type.
    pub fn into_solver_result(self) -> SolverResult<TwoPathSolution> {
        if self.is_proven_optimal() {
            SolverResult::Optimal(self.solution)
        } else {
            SolverResult::Feasible(self.solution)
        }
    }
}

impl std::fmt::Display for AStarOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AStarOutcome({}, termination: {}, explored: {})",
            self.solution, self.termination_reason, self.statistics.states_explored
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duplex_model::{index::LinkIndex, network::NetworkBuilder};

    fn shuttle() -> TwoPathSolution {
        let mut b = NetworkBuilder::new();
        b.add_node("x").add_node("y").add_link("xy", "x", "y", 1.0, 1.0);
        let net = b.build().unwrap();
        let (x, y) = (NodeIndex::new(0), NodeIndex::new(1));
        let paths = TwoPaths::from_links(
            &net,
            x,
            y,
            vec![LinkIndex::new(0)],
            vec![LinkIndex::new(0)],
        )
        .unwrap();
        TwoPathSolution {
            vector: paths.encode(1),
            paths,
            goal: 1.0,
            score: Score::new(1.0),
            route: vec![x, y, x],
        }
    }

    #[test]
    fn test_optimal_maps_to_optimal_result() {
        let outcome = AStarOutcome::optimal(shuttle(), AStarStatistics::default());
        assert!(outcome.is_proven_optimal());
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::OptimalityProven
        );
        assert!(outcome.into_solver_result().is_optimal());
    }

    #[test]
    fn test_found_maps_to_feasible_result() {
        let outcome = AStarOutcome::found(shuttle(), AStarStatistics::default());
        assert!(!outcome.is_proven_optimal());
        let result = outcome.into_solver_result();
        assert!(result.has_solution());
        assert!(!result.is_optimal());
    }
}
