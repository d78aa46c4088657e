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

//! The contract shared by every two-path solver.
//!
//! A solver receives a network and two distinct terminals and returns a
//! validated `TwoPaths`. How it searches, and with which weights, is its own
//! configuration. The best-first engine implements this trait through an
//! adapter; population-based baselines plug in the same way.

use duplex_model::{
    error::{ConstructionError, DecodeError},
    index::NodeIndex,
    network::Network,
    paths::TwoPaths,
};

/// Why a solver returned no path pair.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    /// The solver proved that no valid path pair exists.
    #[error("no path pair exists: {0}")]
    Infeasible(String),
    /// The solver stopped before it found a path pair.
    #[error("solver aborted: {0}")]
    Aborted(String),
    /// The request itself is malformed.
    #[error(transparent)]
    Construction(#[from] ConstructionError),
    /// The solver produced something that is not a valid path pair.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A solver for the overlapping out/back path pair problem.
pub trait TwoPathSolver {
    /// Returns the name of the solver.
    fn name(&self) -> &str;

    /// Finds an outbound path from `start` to `end` and an inbound path from
    /// `end` back to `start`.
    fn solve(
        &mut self,
        network: &Network,
        start: NodeIndex,
        end: NodeIndex,
    ) -> Result<TwoPaths, SolverError>;
}

impl std::fmt::Debug for dyn TwoPathSolver + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TwoPathSolver({})", self.name())
    }
}

impl std::fmt::Display for dyn TwoPathSolver + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TwoPathSolver({})", self.name())
    }
}
