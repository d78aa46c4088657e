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

//! Immutable per-request search context.
//!
//! Everything the expansion and scoring of partial solutions needs to read,
//! bundled once: the network, the precomputed distance tables, the terminals,
//! the objective weights, the configuration, and a per-link cache of
//! congestion costs. The context borrows the network and tables shared, so the
//! topology and loads cannot change while a search holds it.

use crate::distance::DistanceTables;
use duplex_model::{
    error::ConstructionError,
    index::{LinkIndex, NodeIndex},
    network::Network,
};
use duplex_search::objective::Weights;

/// Which completion estimate orders the frontier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum HeuristicModel {
    /// Never overestimates for non-negative path weights, so the first
    /// complete state popped is optimal.
    ///
    /// - Outbound: `length * hops(head, end) + cost * congestion(end, start)`
    /// - Inbound: `cost * congestion(head, start)`
    ///
    /// A negative `common` weight adds `common` once per link that could
    /// still become shared.
    #[default]
    Admissible,
    /// Counts both path weights on both remaining legs and multiplies
    /// congestion distances by the table scale factor.
    ///
    /// - Outbound: `length * (hops(head, end) + hops(end, start)) +
    ///   cost * scale * (congestion(head, end) + congestion(end, start))`
    /// - Inbound: `length * hops(head, start) + cost * scale * congestion(head, start)`
    ///
    /// Usually explores fewer states, but may overestimate, and the first
    /// complete state is then not guaranteed to be optimal.
    Scaled,
}

impl std::fmt::Display for HeuristicModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeuristicModel::Admissible => write!(f, "Admissible"),
            HeuristicModel::Scaled => write!(f, "Scaled"),
        }
    }
}

/// Search configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// The completion estimate.
    pub heuristic: HeuristicModel,
    /// Drop the solution vector of a state once it has been expanded. The
    /// arena then keeps only head, parent, phase, and goal for it.
    pub release_expanded: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            heuristic: HeuristicModel::Admissible,
            release_expanded: true,
        }
    }
}

impl SearchConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_heuristic(mut self, heuristic: HeuristicModel) -> Self {
        self.heuristic = heuristic;
        self
    }

    #[inline]
    pub fn with_release_expanded(mut self, release_expanded: bool) -> Self {
        self.release_expanded = release_expanded;
        self
    }
}

impl std::fmt::Display for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchConfig(heuristic: {}, release_expanded: {})",
            self.heuristic, self.release_expanded
        )
    }
}

/// The read-only inputs of one search.
#[derive(Clone)]
pub struct SearchContext<'a> {
    network: &'a Network,
    tables: &'a DistanceTables,
    start: NodeIndex,
    end: NodeIndex,
    weights: Weights,
    config: SearchConfig,
    congestion: Vec<f64>,
}

impl<'a> SearchContext<'a> {
    #[inline(always)]
    pub fn network(&self) -> &'a Network {
        self.network
    }

    #[inline(always)]
    pub fn tables(&self) -> &'a DistanceTables {
        self.tables
    }

    #[inline(always)]
    pub fn start(&self) -> NodeIndex {
        self.start
    }

    #[inline(always)]
    pub fn end(&self) -> NodeIndex {
        self.end
    }

    #[inline(always)]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    #[inline(always)]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Returns the cached congestion cost of `link`.
    #[inline(always)]
    pub fn congestion_cost(&self, link: LinkIndex) -> f64 {
        self.congestion[link.get()]
    }

    /// Returns `true` if the configured heuristic never overestimates, so
    /// the first complete state popped is optimal.
    #[inline]
    pub fn is_admissible(&self) -> bool {
        self.config.heuristic == HeuristicModel::Admissible
            && self.weights.has_nonnegative_path_weights()
    }
}

impl std::fmt::Debug for SearchContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchContext")
            .field("network", &format_args!("{}", self.network))
            .field("tables", &self.tables)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("weights", &self.weights)
            .field("config", &self.config)
            .finish()
    }
}

impl std::fmt::Display for SearchContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchContext(start: {}, end: {}, {}, {})",
            self.start, self.end, self.weights, self.config
        )
    }
}

/// Validates a search request and bundles its inputs.
///
/// # Errors
///
/// - `UnknownTerminal` if `start` or `end` is out of range.
/// - `IdenticalTerminals` if `start == end`.
/// - `TableMismatch` if `tables` were computed for a different node count.
/// - `InvalidWeights` if any weight is NaN or infinite.
pub fn prepare<'a>(
    network: &'a Network,
    start: NodeIndex,
    end: NodeIndex,
    tables: &'a DistanceTables,
    weights: Weights,
    config: SearchConfig,
) -> Result<SearchContext<'a>, ConstructionError> {
    for node in [start, end] {
        if !network.contains_node(node) {
            return Err(ConstructionError::UnknownTerminal {
                node,
                num_nodes: network.num_nodes(),
            });
        }
    }
    if start == end {
        return Err(ConstructionError::IdenticalTerminals { node: start });
    }
    if tables.num_nodes() != network.num_nodes() {
        return Err(ConstructionError::TableMismatch {
            tables: tables.num_nodes(),
            nodes: network.num_nodes(),
        });
    }
    if !weights.is_finite() {
        return Err(ConstructionError::InvalidWeights {
            length: weights.length,
            cost: weights.cost,
            common: weights.common,
        });
    }

    match config.heuristic {
        HeuristicModel::Scaled => tracing::warn!(
            scale_factor = tables.scale_factor(),
            "scaled heuristic is not admissible; the result may be suboptimal"
        ),
        HeuristicModel::Admissible if !weights.has_nonnegative_path_weights() => tracing::warn!(
            %weights,
            "negative path weights make the heuristic inadmissible; the result may be suboptimal"
        ),
        HeuristicModel::Admissible => {}
    }

    let congestion = network
        .links()
        .map(|(_, link)| link.congestion_cost())
        .collect();

    Ok(SearchContext {
        network,
        tables,
        start,
        end,
        weights,
        config,
        congestion,
    })
}

/// Like `prepare`, but resolves the terminals by external id.
pub fn prepare_by_id<'a>(
    network: &'a Network,
    start: &str,
    end: &str,
    tables: &'a DistanceTables,
    weights: Weights,
    config: SearchConfig,
) -> Result<SearchContext<'a>, ConstructionError> {
    let resolve = |id: &str| {
        network
            .node_index(id)
            .ok_or_else(|| ConstructionError::UnknownTerminalId { id: id.to_owned() })
    };
    prepare(network, resolve(start)?, resolve(end)?, tables, weights, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use duplex_model::network::NetworkBuilder;

    fn triangle() -> Network {
        let mut b = NetworkBuilder::new();
        b.add_node("x")
            .add_node("y")
            .add_node("z")
            .add_link("xy", "x", "y", 1.0, 1.0)
            .add_link("yz", "y", "z", 1.0, 1.0)
            .add_link("zx", "z", "x", 1.0, 1.0);
        b.build().unwrap()
    }

    #[test]
    fn test_identical_terminals_rejected() {
        let net = triangle();
        let tables = DistanceTables::compute(&net);
        let n = NodeIndex::new(1);
        let err = prepare(&net, n, n, &tables, Weights::default(), SearchConfig::default())
            .unwrap_err();
        assert_eq!(err, ConstructionError::IdenticalTerminals { node: n });
    }

    #[test]
    fn test_out_of_range_terminal_rejected() {
        let net = triangle();
        let tables = DistanceTables::compute(&net);
        let err = prepare(
            &net,
            NodeIndex::new(0),
            NodeIndex::new(7),
            &tables,
            Weights::default(),
            SearchConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConstructionError::UnknownTerminal {
                node: NodeIndex::new(7),
                num_nodes: 3
            }
        );
    }

    #[test]
    fn test_mismatched_tables_rejected() {
        let net = triangle();
        let mut b = NetworkBuilder::new();
        b.add_node("p").add_node("q").add_link("pq", "p", "q", 1.0, 1.0);
        let other = b.build().unwrap();
        let tables = DistanceTables::compute(&other);

        let err = prepare(
            &net,
            NodeIndex::new(0),
            NodeIndex::new(1),
            &tables,
            Weights::default(),
            SearchConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, ConstructionError::TableMismatch { tables: 2, nodes: 3 });
    }

    #[test]
    fn test_non_finite_weights_rejected() {
        let net = triangle();
        let tables = DistanceTables::compute(&net);
        let err = prepare(
            &net,
            NodeIndex::new(0),
            NodeIndex::new(1),
            &tables,
            Weights::default().with_cost(f64::NAN),
            SearchConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConstructionError::InvalidWeights { .. }));
    }

    #[test]
    fn test_prepare_by_id() {
        let net = triangle();
        let tables = DistanceTables::compute(&net);
        let ctx = prepare_by_id(&net, "x", "z", &tables, Weights::default(), SearchConfig::default())
            .expect("valid request");
        assert_eq!(ctx.start(), NodeIndex::new(0));
        assert_eq!(ctx.end(), NodeIndex::new(2));
        assert!(ctx.is_admissible());

        let err = prepare_by_id(&net, "x", "w", &tables, Weights::default(), SearchConfig::default())
            .unwrap_err();
        assert_eq!(err, ConstructionError::UnknownTerminalId { id: "w".into() });
    }

    #[test]
    fn test_admissibility_depends_on_model_and_weights() {
        let net = triangle();
        let tables = DistanceTables::compute(&net);
        let (s, e) = (NodeIndex::new(0), NodeIndex::new(1));

        let scaled = SearchConfig::default().with_heuristic(HeuristicModel::Scaled);
        let ctx = prepare(&net, s, e, &tables, Weights::default(), scaled).unwrap();
        assert!(!ctx.is_admissible());

        let bonus = Weights::default().with_common(-5.0);
        let ctx = prepare(&net, s, e, &tables, bonus, SearchConfig::default()).unwrap();
        assert!(ctx.is_admissible());

        let negative = Weights::default().with_length(-1.0);
        let ctx = prepare(&net, s, e, &tables, negative, SearchConfig::default()).unwrap();
        assert!(!ctx.is_admissible());
    }
}
