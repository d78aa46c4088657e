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

/// What a solver run produced, generic over the solution type.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverResult<S> {
    /// It was proven that no valid path pair exists.
    Infeasible,
    /// A solution was found and proven optimal.
    Optimal(S),
    /// A solution was found, but not proven optimal.
    Feasible(S),
    /// The solver stopped without a solution and without proving
    /// infeasibility.
    Unknown,
}

impl<S> SolverResult<S> {
    /// Returns the solution, if any.
    #[inline]
    pub fn solution(&self) -> Option<&S> {
        match self {
            SolverResult::Optimal(s) | SolverResult::Feasible(s) => Some(s),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }

    /// Consumes the result and returns the solution, if any.
    #[inline]
    pub fn into_solution(self) -> Option<S> {
        match self {
            SolverResult::Optimal(s) | SolverResult::Feasible(s) => Some(s),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolverResult::Optimal(_))
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self, SolverResult::Infeasible)
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        matches!(self, SolverResult::Optimal(_) | SolverResult::Feasible(_))
    }
}

impl<S> std::fmt::Display for SolverResult<S>
where
    S: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Optimal(solution) => write!(f, "Optimal({})", solution),
            SolverResult::Feasible(solution) => write!(f, "Feasible({})", solution),
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Why a solver run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// A solution was found and proven optimal.
    OptimalityProven,
    /// A terminal solution was found, but the search gives no optimality
    /// guarantee for it (e.g. an inadmissible heuristic was used).
    SolutionFound,
    /// The search space was exhausted without a solution.
    InfeasibilityProven,
    /// The run was stopped by a limit or an interrupt. The string says which.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::SolutionFound => write!(f, "Solution Found"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_accessors() {
        let optimal = SolverResult::Optimal(7);
        assert_eq!(optimal.solution(), Some(&7));
        assert!(optimal.is_optimal());
        assert!(optimal.has_solution());

        let feasible = SolverResult::Feasible(3);
        assert!(!feasible.is_optimal());
        assert_eq!(feasible.into_solution(), Some(3));

        let infeasible: SolverResult<i32> = SolverResult::Infeasible;
        assert!(infeasible.is_infeasible());
        assert!(!infeasible.has_solution());
        assert_eq!(SolverResult::<i32>::Unknown.solution(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", SolverResult::Optimal(1.5)), "Optimal(1.5)");
        assert_eq!(format!("{}", SolverResult::<f64>::Unknown), "Unknown");
        assert_eq!(
            format!("{}", TerminationReason::Aborted("time".into())),
            "Aborted: time"
        );
    }
}
