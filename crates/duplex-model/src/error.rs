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

//! Error types for topology construction, adjacency queries, and solution
//! decoding.
//!
//! All errors implement `std::error::Error` via `thiserror`.

use crate::{
    index::{LinkIndex, NodeIndex},
    solution::Direction,
};

/// The network description, a load assignment, or a pair of search
/// terminals is malformed.
///
/// These are caller errors: they are reported before any computation that
/// depends on the offending value starts, and nothing is partially applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstructionError {
    /// A link names an endpoint that is not a declared node.
    #[error("link '{link}' references unknown node '{node}'")]
    UnknownNode {
        /// External id of the offending link.
        link: String,
        /// The endpoint id that could not be resolved.
        node: String,
    },

    /// A link id was declared twice with conflicting data.
    #[error("link '{link}' is declared more than once with conflicting data")]
    DuplicateLink {
        /// External id of the repeated link.
        link: String,
    },

    /// Both ends of a link are the same node.
    #[error("link '{link}' connects node '{node}' to itself")]
    SelfLoop {
        /// External id of the offending link.
        link: String,
        /// The node on both ends.
        node: String,
    },

    /// A capacity that is not a positive finite number.
    #[error("link '{link}' has invalid capacity {capacity} (expected a positive finite value)")]
    InvalidCapacity {
        /// External id of the offending link.
        link: String,
        /// The rejected capacity.
        capacity: f64,
    },

    /// A routing cost that is not finite.
    #[error("link '{link}' has non-finite cost {cost}")]
    InvalidCost {
        /// External id of the offending link.
        link: String,
        /// The rejected cost.
        cost: f64,
    },

    /// A load outside `0 <= load < capacity`.
    #[error("load {load} on {link} violates 0 <= load < capacity ({capacity})")]
    InvalidLoad {
        /// The link the load was meant for.
        link: LinkIndex,
        /// The rejected load.
        load: f64,
        /// The capacity of the link.
        capacity: f64,
    },

    /// A load fraction range outside `0 <= min <= max < 1`.
    #[error("load fraction range [{min}, {max}] is invalid (expected 0 <= min <= max < 1)")]
    InvalidLoadRange {
        /// Lower bound of the range.
        min: f64,
        /// Upper bound of the range.
        max: f64,
    },

    /// The start and end of a search are the same node.
    #[error("start and end must differ, both are {node}")]
    IdenticalTerminals {
        /// The node given for both terminals.
        node: NodeIndex,
    },

    /// A search terminal is out of range for the network.
    #[error("terminal {node} is out of bounds for a network with {num_nodes} nodes")]
    UnknownTerminal {
        /// The rejected node index.
        node: NodeIndex,
        /// Number of nodes in the network.
        num_nodes: usize,
    },

    /// A search terminal given by external id is not part of the network.
    #[error("terminal '{id}' is not a node of the network")]
    UnknownTerminalId {
        /// The external id that could not be resolved.
        id: String,
    },

    /// Precomputed tables were built for a network of a different size.
    #[error("distance tables cover {tables} nodes but the network has {nodes}")]
    TableMismatch {
        /// Number of nodes the tables were computed for.
        tables: usize,
        /// Number of nodes in the network.
        nodes: usize,
    },

    /// An objective weight is NaN or infinite.
    #[error("objective weights must be finite, got length {length}, cost {cost}, common {common}")]
    InvalidWeights {
        length: f64,
        cost: f64,
        common: f64,
    },
}

/// A node was passed to an adjacency query on a link it is not an end of.
///
/// Inside the solvers this signals a broken topology invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{node} is not an end of {link}")]
pub struct InvalidEndpointError {
    /// The link that was queried.
    pub link: LinkIndex,
    /// The node that is not one of its ends.
    pub node: NodeIndex,
}

/// A solution vector (or a pair of link sequences) does not describe a
/// valid outbound/inbound path pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The vector length differs from the number of links.
    #[error("solution vector has {actual} entries but the network has {expected} links")]
    LengthMismatch {
        /// Number of links in the network.
        expected: usize,
        /// Number of entries in the vector.
        actual: usize,
    },

    /// The path stops before reaching its destination.
    #[error("{direction} path is broken at {at}")]
    Broken {
        /// The path being followed.
        direction: Direction,
        /// The node where no continuation exists.
        at: NodeIndex,
    },

    /// More than one marked link continues the path.
    #[error("{direction} path branches at {at}")]
    Ambiguous {
        /// The path being followed.
        direction: Direction,
        /// The node with more than one continuation.
        at: NodeIndex,
    },

    /// The path visits a node twice.
    #[error("{direction} path revisits {at}")]
    Cycle {
        /// The path being followed.
        direction: Direction,
        /// The repeated node.
        at: NodeIndex,
    },

    /// A link is marked for a direction but is not on that path.
    #[error("{link} is marked {direction} but not part of the {direction} path")]
    StrayLink {
        /// The path the link is marked for.
        direction: Direction,
        /// The stray link.
        link: LinkIndex,
    },

    /// A link sequence uses a link that does not exist.
    #[error("{link} is out of bounds for a network with {num_links} links")]
    UnknownLink {
        /// The rejected link.
        link: LinkIndex,
        /// Number of links in the network.
        num_links: usize,
    },

    /// A link sequence does not form a walk from its origin.
    #[error("{direction} path leaves {at} over {link}, which is not incident to it")]
    Disconnected {
        /// The path being followed.
        direction: Direction,
        /// The node the walk stands on.
        at: NodeIndex,
        /// The link that does not touch it.
        link: LinkIndex,
    },
}
