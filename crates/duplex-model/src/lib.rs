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

//! # Duplex Model
//!
//! The immutable topology and the per-request network state consumed by the
//! duplex solvers.
//!
//! ## Modules
//!
//! - `index`: typed `NodeIndex` / `LinkIndex`.
//! - `network`: `Network`, `NetworkBuilder`, `Node`, `Link`, and link loads.
//!   External string identifiers are mapped to dense indices at build time so
//!   every lookup on the search hot path is a plain array access.
//! - `loading`: `NetworkLoader`, a whitespace-token reader for topologies.
//! - `solution`: `LinkUsage` and `SolutionVector`, the per-link annotation of
//!   which direction(s) use a link.
//! - `paths`: `TwoPaths`, decoding a solution vector into its outbound and
//!   inbound link sequences (and back), which doubles as the validator.
//! - `error`: construction, endpoint, and decoding errors.

pub mod error;
pub mod index;
pub mod loading;
pub mod network;
pub mod paths;
pub mod solution;
