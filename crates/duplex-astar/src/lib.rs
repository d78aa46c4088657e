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

//! # Duplex A*
//!
//! Best-first search for a pair of paths between two nodes of a capacitated
//! network: an outbound path from `start` to `end`, priced by hop count, and
//! an inbound path back, priced by the congestion it runs through. Links used
//! by both paths pay an extra `common` weight, which discourages overlap when
//! positive and rewards it when negative.
//!
//! ## Modules
//!
//! - `distance`: all-pairs hop and congestion distance tables, computed once
//!   per request.
//! - `context`: `SearchConfig`, `HeuristicModel`, and the validated,
//!   immutable `SearchContext`.
//! - `heuristic`: completion estimates for partial solutions.
//! - `state` / `frontier`: the state arena with parent handles and the
//!   min-score priority queue.
//! - `astar`: `AStarSolver`, the engine.
//! - `monitor`: logging, limits, interrupts, and composition.
//! - `stats` / `result` / `error`: what a run reports back.
//! - `adapter`: `AStarTwoPathSolver`, the engine behind the `TwoPathSolver`
//!   trait.
//!
//! ## Usage
//!
//! ```rust
//! use duplex_astar::{
//!     astar::AStarSolver, context::SearchConfig, monitor::no_op::NoOperationMonitor,
//! };
//! use duplex_model::{index::NodeIndex, network::NetworkBuilder};
//! use duplex_search::objective::Weights;
//!
//! let mut builder = NetworkBuilder::new();
//! builder
//!     .add_node("S")
//!     .add_node("K")
//!     .add_node("x")
//!     .add_link("Sx", "S", "x", 1.0, 1.0)
//!     .add_link("xK", "x", "K", 1.0, 1.0)
//!     .add_link("SK", "S", "K", 1.0, 1.0);
//! let network = builder.build().unwrap();
//!
//! let outcome = AStarSolver::new()
//!     .solve(
//!         &network,
//!         NodeIndex::new(0),
//!         NodeIndex::new(1),
//!         Weights::default(),
//!         SearchConfig::default(),
//!         NoOperationMonitor::new(),
//!     )
//!     .unwrap();
//!
//! // One hop out over S-K, back over the idle detour through x.
//! assert_eq!(outcome.solution().goal, 1.0);
//! assert!(outcome.is_proven_optimal());
//! ```

pub mod adapter;
pub mod astar;
pub mod context;
pub mod distance;
pub mod error;
pub mod frontier;
pub mod heuristic;
pub mod monitor;
pub mod result;
pub mod state;
pub mod stats;
