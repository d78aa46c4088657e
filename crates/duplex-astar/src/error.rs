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

//! Errors reported by the best-first engine.

use duplex_model::error::{ConstructionError, DecodeError, InvalidEndpointError};
use duplex_search::{result::TerminationReason, solver::SolverError};

/// Why a search produced no path pair.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// The frontier ran dry, or only held states that cannot be completed.
    #[error("no valid path pair exists (explored {explored} states)")]
    NoPathFound {
        /// Number of states expanded before giving up.
        explored: u64,
    },

    /// A monitor stopped the search before a complete state was popped.
    #[error("search aborted after {explored} states: {reason}")]
    SearchAborted {
        /// The message of the monitor that asked to stop.
        reason: String,
        /// Number of states expanded before stopping.
        explored: u64,
    },

    /// The request was malformed.
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// An adjacency query named a node that is not an end of the link.
    #[error(transparent)]
    InvalidEndpoint(#[from] InvalidEndpointError),

    /// The terminal vector did not decode. This means a broken search
    /// invariant, not a caller error.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl SearchError {
    /// Returns the termination reason this error corresponds to, if the
    /// search actually ran.
    pub fn termination_reason(&self) -> Option<TerminationReason> {
        match self {
            SearchError::NoPathFound { .. } => Some(TerminationReason::InfeasibilityProven),
            SearchError::SearchAborted { reason, .. } => {
                Some(TerminationReason::Aborted(reason.clone()))
            }
            SearchError::Construction(_)
            | SearchError::InvalidEndpoint(_)
            | SearchError::Decode(_) => None,
        }
    }

    /// Returns the number of expanded states, if the search actually ran.
    pub fn explored(&self) -> Option<u64> {
        match self {
            SearchError::NoPathFound { explored } | SearchError::SearchAborted { explored, .. } => {
                Some(*explored)
            }
            _ => None,
        }
    }
}

impl From<SearchError> for SolverError {
    fn from(error: SearchError) -> Self {
        match error {
            SearchError::NoPathFound { .. } => SolverError::Infeasible(error.to_string()),
            SearchError::SearchAborted { reason, .. } => SolverError::Aborted(reason),
            SearchError::Construction(e) => SolverError::Construction(e),
            SearchError::Decode(e) => SolverError::Decode(e),
            SearchError::InvalidEndpoint(e) => SolverError::Aborted(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duplex_model::index::NodeIndex;

    #[test]
    fn test_termination_reason_mapping() {
        assert_eq!(
            SearchError::NoPathFound { explored: 3 }.termination_reason(),
            Some(TerminationReason::InfeasibilityProven)
        );
        assert_eq!(
            SearchError::SearchAborted {
                reason: "limit".into(),
                explored: 9
            }
            .termination_reason(),
            Some(TerminationReason::Aborted("limit".into()))
        );
        let invalid = SearchError::from(ConstructionError::IdenticalTerminals {
            node: NodeIndex::new(0),
        });
        assert_eq!(invalid.termination_reason(), None);
        assert_eq!(invalid.explored(), None);
    }

    #[test]
    fn test_conversion_into_solver_error() {
        let e: SolverError = SearchError::NoPathFound { explored: 2 }.into();
        assert!(matches!(e, SolverError::Infeasible(_)));

        let e: SolverError = SearchError::SearchAborted {
            reason: "Interrupt signal received".into(),
            explored: 0,
        }
        .into();
        assert_eq!(e, SolverError::Aborted("Interrupt signal received".into()));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            SearchError::NoPathFound { explored: 12 }.to_string(),
            "no valid path pair exists (explored 12 states)"
        );
    }
}
