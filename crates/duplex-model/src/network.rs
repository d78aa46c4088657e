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

//! Capacitated network topology.
//!
//! A `Network` is an undirected multigraph of nodes and capacitated links.
//! External string identifiers are resolved to dense `NodeIndex` and
//! `LinkIndex` values once, at build time, so the solvers only ever deal with
//! array offsets. The topology is immutable after `NetworkBuilder::build`;
//! the only mutable state is the load carried by each link, which feeds the
//! congestion cost the searches route around.
//!
//! # Load invariant
//!
//! Every link satisfies `0 <= load < capacity`. All load setters validate
//! before writing, so `Link::congestion_cost` is always finite and
//! non-negative.

use crate::{
    error::{ConstructionError, InvalidEndpointError},
    index::{LinkIndex, NodeIndex},
};
use rand::Rng;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// A capacitated, undirected link between two distinct nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    ends: [NodeIndex; 2],
    capacity: f64,
    cost: f64,
    load: f64,
}

impl Link {
    /// Returns both ends in declaration order (source, target).
    #[inline(always)]
    pub fn ends(&self) -> [NodeIndex; 2] {
        self.ends
    }

    /// Returns the capacity of the link.
    #[inline(always)]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Returns the static routing cost of the link.
    #[inline(always)]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns the current load of the link.
    #[inline(always)]
    pub fn load(&self) -> f64 {
        self.load
    }

    /// Returns the unused capacity `capacity - load`.
    #[inline]
    pub fn residual(&self) -> f64 {
        self.capacity - self.load
    }

    /// Returns the unused share of the capacity, in `(0, 1]`.
    #[inline]
    pub fn residual_fraction(&self) -> f64 {
        self.residual() / self.capacity
    }

    /// Returns the congestion cost `-log10(residual / capacity)`.
    ///
    /// Zero on an idle link, growing without bound as the load approaches the
    /// capacity. Finite whenever the load invariant holds.
    ///
    /// ```rust
    /// # use duplex_model::network::NetworkBuilder;
    /// # use duplex_model::index::LinkIndex;
    /// let mut b = NetworkBuilder::new();
    /// b.add_node("a").add_node("b").add_link("ab", "a", "b", 10.0, 1.0);
    /// let mut net = b.build().unwrap();
    /// net.set_load(LinkIndex::new(0), 9.0).unwrap();
    /// assert!((net.link(LinkIndex::new(0)).congestion_cost() - 1.0).abs() < 1e-12);
    /// ```
    #[inline]
    pub fn congestion_cost(&self) -> f64 {
        (self.capacity / self.residual()).log10()
    }

    /// Returns `true` if `node` is one of the ends.
    #[inline(always)]
    pub fn is_incident(&self, node: NodeIndex) -> bool {
        self.ends[0] == node || self.ends[1] == node
    }

    /// Returns the end opposite to `node`, or `None` if `node` is not an end.
    #[inline]
    pub fn opposite(&self, node: NodeIndex) -> Option<NodeIndex> {
        if self.ends[0] == node {
            Some(self.ends[1])
        } else if self.ends[1] == node {
            Some(self.ends[0])
        } else {
            None
        }
    }

    #[inline]
    fn same_data(&self, other: &Link) -> bool {
        let same_ends = self.ends == other.ends
            || (self.ends[0] == other.ends[1] && self.ends[1] == other.ends[0]);
        same_ends && self.capacity == other.capacity && self.cost == other.cost
    }
}

/// A node and its incident links, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    incident: SmallVec<[LinkIndex; 4]>,
}

impl Node {
    /// Returns the incident links.
    #[inline(always)]
    pub fn incident(&self) -> &[LinkIndex] {
        &self.incident
    }

    /// Returns the number of incident links.
    #[inline(always)]
    pub fn degree(&self) -> usize {
        self.incident.len()
    }
}

/// One link as it appears in a topology description.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkRecord {
    pub id: String,
    pub source: String,
    pub target: String,
    pub capacity: f64,
    pub cost: f64,
}

impl LinkRecord {
    /// Creates a new link record.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        capacity: f64,
        cost: f64,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            capacity,
            cost,
        }
    }
}

/// The network: nodes, links, and the external id mappings.
#[derive(Clone)]
pub struct Network {
    nodes: Vec<Node>,
    links: Vec<Link>,
    node_ids: Vec<String>,
    link_ids: Vec<String>,
    node_lookup: FxHashMap<String, NodeIndex>,
    link_lookup: FxHashMap<String, LinkIndex>,
}

impl Network {
    /// Builds a network from node ids and link records.
    ///
    /// Equivalent to feeding every id and record to a `NetworkBuilder`.
    pub fn from_records<I, S, L>(nodes: I, links: L) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        L: IntoIterator<Item = LinkRecord>,
    {
        let mut builder = NetworkBuilder::new();
        for id in nodes {
            builder.add_node(id);
        }
        for record in links {
            builder.add_record(record);
        }
        builder.build()
    }

    /// Returns the number of nodes.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of links.
    #[inline(always)]
    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if `node` is in range.
    #[inline(always)]
    pub fn contains_node(&self, node: NodeIndex) -> bool {
        node.get() < self.nodes.len()
    }

    /// Returns the node at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    #[inline]
    pub fn node(&self, node: NodeIndex) -> &Node {
        let index = node.get();
        debug_assert!(
            index < self.num_nodes(),
            "called `Network::node` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            index
        );
        &self.nodes[index]
    }

    /// Returns the link at `link`.
    ///
    /// # Panics
    ///
    /// Panics if `link` is out of bounds.
    #[inline]
    pub fn link(&self, link: LinkIndex) -> &Link {
        let index = link.get();
        debug_assert!(
            index < self.num_links(),
            "called `Network::link` with link index out of bounds: the len is {} but the index is {}",
            self.num_links(),
            index
        );
        &self.links[index]
    }

    /// Returns the links incident to `node`, in discovery order.
    #[inline]
    pub fn neighbors(&self, node: NodeIndex) -> &[LinkIndex] {
        self.node(node).incident()
    }

    /// Returns the end of `link` opposite to `node`.
    ///
    /// Fails if `node` is not an end of `link`.
    #[inline]
    pub fn other_end(
        &self,
        link: LinkIndex,
        node: NodeIndex,
    ) -> Result<NodeIndex, InvalidEndpointError> {
        self.link(link)
            .opposite(node)
            .ok_or(InvalidEndpointError { link, node })
    }

    /// Resolves an external node id.
    #[inline]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_lookup.get(id).copied()
    }

    /// Resolves an external link id.
    #[inline]
    pub fn link_index(&self, id: &str) -> Option<LinkIndex> {
        self.link_lookup.get(id).copied()
    }

    /// Returns the external id of `node`.
    #[inline]
    pub fn node_id(&self, node: NodeIndex) -> &str {
        &self.node_ids[node.get()]
    }

    /// Returns the external id of `link`.
    #[inline]
    pub fn link_id(&self, link: LinkIndex) -> &str {
        &self.link_ids[link.get()]
    }

    /// Iterates over all node indices.
    #[inline]
    pub fn node_indices(&self) -> impl DoubleEndedIterator<Item = NodeIndex> + ExactSizeIterator {
        NodeIndex::range(self.num_nodes())
    }

    /// Iterates over all link indices.
    #[inline]
    pub fn link_indices(&self) -> impl DoubleEndedIterator<Item = LinkIndex> + ExactSizeIterator {
        LinkIndex::range(self.num_links())
    }

    /// Iterates over `(index, link)` pairs.
    #[inline]
    pub fn links(&self) -> impl ExactSizeIterator<Item = (LinkIndex, &Link)> {
        self.links
            .iter()
            .enumerate()
            .map(|(i, l)| (LinkIndex::new(i), l))
    }

    /// Sets the load of `link`.
    ///
    /// Fails without modifying the link unless `0 <= load < capacity`.
    pub fn set_load(&mut self, link: LinkIndex, load: f64) -> Result<(), ConstructionError> {
        let index = link.get();
        debug_assert!(
            index < self.num_links(),
            "called `Network::set_load` with link index out of bounds: the len is {} but the index is {}",
            self.num_links(),
            index
        );

        let entry = &mut self.links[index];
        // Also rejects NaN.
        if !(load >= 0.0 && load < entry.capacity) {
            return Err(ConstructionError::InvalidLoad {
                link,
                load,
                capacity: entry.capacity,
            });
        }
        entry.load = load;
        Ok(())
    }

    /// Sets every load to zero.
    pub fn reset_loads(&mut self) {
        for link in &mut self.links {
            link.load = 0.0;
        }
    }

    /// Sets every load to `fraction * capacity`.
    ///
    /// Fails without modifying any link unless `0 <= fraction < 1`.
    pub fn set_load_fraction(&mut self, fraction: f64) -> Result<(), ConstructionError> {
        validate_fraction_range(fraction, fraction)?;
        for link in &mut self.links {
            link.load = fraction * link.capacity;
        }
        Ok(())
    }

    /// Draws a load fraction uniformly from `[min_fraction, max_fraction]`
    /// for every link, in link order.
    ///
    /// Fails without modifying any link unless
    /// `0 <= min_fraction <= max_fraction < 1`.
    pub fn randomize_loads<R>(
        &mut self,
        rng: &mut R,
        min_fraction: f64,
        max_fraction: f64,
    ) -> Result<(), ConstructionError>
    where
        R: Rng + ?Sized,
    {
        validate_fraction_range(min_fraction, max_fraction)?;
        for link in &mut self.links {
            let fraction = rng.random_range(min_fraction..=max_fraction);
            link.load = fraction * link.capacity;
        }
        tracing::debug!(
            links = self.links.len(),
            min_fraction,
            max_fraction,
            "randomized link loads"
        );
        Ok(())
    }
}

#[inline]
fn validate_fraction_range(min: f64, max: f64) -> Result<(), ConstructionError> {
    if min >= 0.0 && min <= max && max < 1.0 {
        Ok(())
    } else {
        Err(ConstructionError::InvalidLoadRange { min, max })
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("node_ids", &self.node_ids)
            .field("link_ids", &self.link_ids)
            .field("nodes", &self.nodes)
            .field("links", &self.links)
            .finish()
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Network(num_nodes: {}, num_links: {})",
            self.num_nodes(),
            self.num_links()
        )
    }
}

/// Collects node ids and link records and validates them into a `Network`.
///
/// Node ids are deduplicated and numbered in first-seen order. Link records
/// are validated only in `build`, so links may be added before their nodes.
///
/// # Examples
///
/// ```rust
/// # use duplex_model::network::NetworkBuilder;
/// let mut builder = NetworkBuilder::new();
/// builder
///     .add_node("S")
///     .add_node("K")
///     .add_link("L1", "S", "K", 1.0, 0.0);
/// let net = builder.build().unwrap();
/// assert_eq!(net.num_nodes(), 2);
/// assert_eq!(net.num_links(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct NetworkBuilder {
    node_ids: Vec<String>,
    node_lookup: FxHashMap<String, NodeIndex>,
    records: Vec<LinkRecord>,
}

impl NetworkBuilder {
    /// Creates an empty builder.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of distinct nodes added so far.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.node_ids.len()
    }

    /// Returns the number of link records added so far, repeats included.
    #[inline]
    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    /// Adds a node. Adding an id twice is a no-op.
    pub fn add_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if !self.node_lookup.contains_key(&id) {
            let index = NodeIndex::new(self.node_ids.len());
            self.node_lookup.insert(id.clone(), index);
            self.node_ids.push(id);
        }
        self
    }

    /// Adds a link between `source` and `target`.
    pub fn add_link(
        &mut self,
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        capacity: f64,
        cost: f64,
    ) -> &mut Self {
        self.add_record(LinkRecord::new(id, source, target, capacity, cost))
    }

    /// Adds a link record.
    pub fn add_record(&mut self, record: LinkRecord) -> &mut Self {
        self.records.push(record);
        self
    }

    /// Validates the collected description and builds the network.
    ///
    /// All loads start at zero.
    ///
    /// # Errors
    ///
    /// - `UnknownNode` if a link end is not a declared node.
    /// - `SelfLoop` if both ends of a link are the same node.
    /// - `InvalidCapacity` / `InvalidCost` for out-of-domain numbers.
    /// - `DuplicateLink` if a link id is repeated with different data. An
    ///   exact repeat is ignored.
    pub fn build(self) -> Result<Network, ConstructionError> {
        let NetworkBuilder {
            node_ids,
            node_lookup,
            records,
        } = self;

        let mut nodes = vec![Node::default(); node_ids.len()];
        let mut links: Vec<Link> = Vec::with_capacity(records.len());
        let mut link_ids: Vec<String> = Vec::with_capacity(records.len());
        let mut link_lookup: FxHashMap<String, LinkIndex> = FxHashMap::default();

        for record in records {
            let resolve = |id: &str| {
                node_lookup
                    .get(id)
                    .copied()
                    .ok_or_else(|| ConstructionError::UnknownNode {
                        link: record.id.clone(),
                        node: id.to_owned(),
                    })
            };
            let source = resolve(&record.source)?;
            let target = resolve(&record.target)?;

            if source == target {
                return Err(ConstructionError::SelfLoop {
                    link: record.id,
                    node: record.source,
                });
            }
            if !(record.capacity.is_finite() && record.capacity > 0.0) {
                return Err(ConstructionError::InvalidCapacity {
                    link: record.id,
                    capacity: record.capacity,
                });
            }
            if !record.cost.is_finite() {
                return Err(ConstructionError::InvalidCost {
                    link: record.id,
                    cost: record.cost,
                });
            }

            let link = Link {
                ends: [source, target],
                capacity: record.capacity,
                cost: record.cost,
                load: 0.0,
            };

            if let Some(&existing) = link_lookup.get(&record.id) {
                if links[existing.get()].same_data(&link) {
                    tracing::trace!(link = %record.id, "ignoring repeated link record");
                    continue;
                }
                return Err(ConstructionError::DuplicateLink { link: record.id });
            }

            let index = LinkIndex::new(links.len());
            nodes[source.get()].incident.push(index);
            nodes[target.get()].incident.push(index);
            links.push(link);
            link_lookup.insert(record.id.clone(), index);
            link_ids.push(record.id);
        }

        tracing::debug!(
            nodes = nodes.len(),
            links = links.len(),
            "network built"
        );

        Ok(Network {
            nodes,
            links,
            node_ids,
            link_ids,
            node_lookup,
            link_lookup,
        })
    }
}

impl std::fmt::Display for NetworkBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NetworkBuilder(num_nodes: {}, num_records: {})",
            self.num_nodes(),
            self.num_records()
        )
    }
}
