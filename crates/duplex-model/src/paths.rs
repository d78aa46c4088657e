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

//! Outbound/inbound path pairs.
//!
//! `TwoPaths` is the readable form of a solution: the ordered links (and
//! nodes) of the outbound path from start to end and of the inbound path from
//! end back to start. It can only be obtained through a validating walk over a
//! concrete network, either by decoding a `SolutionVector` or by checking two
//! explicit link sequences, so holding a `TwoPaths` means holding two simple
//! paths with the right terminals.
//!
//! Decoding follows the head order of the search: from the current node, the
//! walk takes the single incident link that is marked for the direction and not
//! yet on the path. No candidate means the path is broken; more than one means
//! the vector branches. Marked links never reached are reported as strays.

use crate::{
    error::DecodeError,
    index::{LinkIndex, NodeIndex},
    network::Network,
    solution::{Direction, SolutionVector},
};
use fixedbitset::FixedBitSet;

/// A validated pair of simple paths between `start` and `end`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TwoPaths {
    start: NodeIndex,
    end: NodeIndex,
    outbound_links: Vec<LinkIndex>,
    outbound_nodes: Vec<NodeIndex>,
    inbound_links: Vec<LinkIndex>,
    inbound_nodes: Vec<NodeIndex>,
}

impl TwoPaths {
    /// Decodes `vector` into its outbound (start to end) and inbound (end to
    /// start) paths.
    ///
    /// # Errors
    ///
    /// Returns a `DecodeError` if the vector length does not match the
    /// network, if either path is broken, branches or revisits a node, or if a
    /// marked link is not on its path.
    pub fn decode(
        network: &Network,
        vector: &SolutionVector,
        start: NodeIndex,
        end: NodeIndex,
    ) -> Result<Self, DecodeError> {
        if vector.len() != network.num_links() {
            return Err(DecodeError::LengthMismatch {
                expected: network.num_links(),
                actual: vector.len(),
            });
        }

        let (outbound_links, outbound_nodes) =
            follow_marks(network, vector, Direction::Outbound, start, end)?;
        let (inbound_links, inbound_nodes) =
            follow_marks(network, vector, Direction::Inbound, end, start)?;

        Ok(Self {
            start,
            end,
            outbound_links,
            outbound_nodes,
            inbound_links,
            inbound_nodes,
        })
    }

    /// Builds a path pair from explicit link sequences, checking that each
    /// sequence is a simple walk between the right terminals.
    pub fn from_links(
        network: &Network,
        start: NodeIndex,
        end: NodeIndex,
        outbound: Vec<LinkIndex>,
        inbound: Vec<LinkIndex>,
    ) -> Result<Self, DecodeError> {
        let outbound_nodes = walk(network, &outbound, Direction::Outbound, start, end)?;
        let inbound_nodes = walk(network, &inbound, Direction::Inbound, end, start)?;

        Ok(Self {
            start,
            end,
            outbound_links: outbound,
            outbound_nodes,
            inbound_links: inbound,
            inbound_nodes,
        })
    }

    /// Re-checks both paths against `network`.
    ///
    /// Useful when the pair was produced on another instance of the topology.
    pub fn validate(&self, network: &Network) -> Result<(), DecodeError> {
        walk(
            network,
            &self.outbound_links,
            Direction::Outbound,
            self.start,
            self.end,
        )?;
        walk(
            network,
            &self.inbound_links,
            Direction::Inbound,
            self.end,
            self.start,
        )?;
        Ok(())
    }

    /// Encodes the pair back into a solution vector over `num_links` links.
    ///
    /// # Panics
    ///
    /// Panics if a path uses a link index `>= num_links`.
    pub fn encode(&self, num_links: usize) -> SolutionVector {
        let mut vector = SolutionVector::new(num_links);
        for &link in &self.outbound_links {
            vector.mark(link, Direction::Outbound);
        }
        for &link in &self.inbound_links {
            vector.mark(link, Direction::Inbound);
        }
        vector
    }

    #[inline]
    pub fn start(&self) -> NodeIndex {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NodeIndex {
        self.end
    }

    /// Returns the links of the outbound path, from start to end.
    #[inline]
    pub fn outbound_links(&self) -> &[LinkIndex] {
        &self.outbound_links
    }

    /// Returns the links of the inbound path, from end to start.
    #[inline]
    pub fn inbound_links(&self) -> &[LinkIndex] {
        &self.inbound_links
    }

    /// Returns the nodes of the outbound path, both terminals included.
    #[inline]
    pub fn outbound_nodes(&self) -> &[NodeIndex] {
        &self.outbound_nodes
    }

    /// Returns the nodes of the inbound path, both terminals included.
    #[inline]
    pub fn inbound_nodes(&self) -> &[NodeIndex] {
        &self.inbound_nodes
    }

    /// Returns the links of `direction`.
    #[inline]
    pub fn links(&self, direction: Direction) -> &[LinkIndex] {
        match direction {
            Direction::Outbound => &self.outbound_links,
            Direction::Inbound => &self.inbound_links,
        }
    }

    /// Iterates over links used by both paths, in outbound order.
    pub fn shared_links(&self) -> impl Iterator<Item = LinkIndex> + '_ {
        self.outbound_links
            .iter()
            .copied()
            .filter(|link| self.inbound_links.contains(link))
    }
}

impl std::fmt::Display for TwoPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join = |nodes: &[NodeIndex]| {
            nodes
                .iter()
                .map(|n| n.get().to_string())
                .collect::<Vec<_>>()
                .join(" -> ")
        };
        write!(
            f,
            "TwoPaths(outbound: {}, inbound: {})",
            join(&self.outbound_nodes),
            join(&self.inbound_nodes)
        )
    }
}

fn follow_marks(
    network: &Network,
    vector: &SolutionVector,
    direction: Direction,
    origin: NodeIndex,
    destination: NodeIndex,
) -> Result<(Vec<LinkIndex>, Vec<NodeIndex>), DecodeError> {
    let mut visited = FixedBitSet::with_capacity(network.num_nodes());
    let mut on_path = FixedBitSet::with_capacity(network.num_links());
    let mut links = Vec::new();
    let mut nodes = vec![origin];
    visited.insert(origin.get());

    let mut at = origin;
    while at != destination {
        let mut next = None;
        for &link in network.neighbors(at) {
            if vector.uses(link, direction) && !on_path.contains(link.get()) {
                if next.is_some() {
                    return Err(DecodeError::Ambiguous { direction, at });
                }
                next = Some(link);
            }
        }

        let link = next.ok_or(DecodeError::Broken { direction, at })?;
        let target = network
            .link(link)
            .opposite(at)
            .ok_or(DecodeError::Disconnected { direction, at, link })?;

        if visited.contains(target.get()) {
            return Err(DecodeError::Cycle {
                direction,
                at: target,
            });
        }
        visited.insert(target.get());
        on_path.insert(link.get());
        links.push(link);
        nodes.push(target);
        at = target;
    }

    if let Some(link) = vector.links(direction).find(|l| !on_path.contains(l.get())) {
        return Err(DecodeError::StrayLink { direction, link });
    }

    Ok((links, nodes))
}

fn walk(
    network: &Network,
    links: &[LinkIndex],
    direction: Direction,
    origin: NodeIndex,
    destination: NodeIndex,
) -> Result<Vec<NodeIndex>, DecodeError> {
    let mut visited = FixedBitSet::with_capacity(network.num_nodes());
    let mut nodes = Vec::with_capacity(links.len() + 1);
    visited.insert(origin.get());
    nodes.push(origin);

    let mut at = origin;
    for &link in links {
        if link.get() >= network.num_links() {
            return Err(DecodeError::UnknownLink {
                link,
                num_links: network.num_links(),
            });
        }
        let target = network
            .link(link)
            .opposite(at)
            .ok_or(DecodeError::Disconnected { direction, at, link })?;
        if visited.contains(target.get()) {
            return Err(DecodeError::Cycle {
                direction,
                at: target,
            });
        }
        visited.insert(target.get());
        nodes.push(target);
        at = target;
    }

    if at != destination {
        return Err(DecodeError::Broken { direction, at });
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn l(i: usize) -> LinkIndex {
        LinkIndex::new(i)
    }

    // S=0, K=1, a=2, b=3, c=4, d=5
    fn diamond() -> Network {
        let mut b = NetworkBuilder::new();
        for id in ["S", "K", "a", "b", "c", "d"] {
            b.add_node(id);
        }
        b.add_link("L1", "S", "a", 1.0, 0.0)
            .add_link("L2", "S", "c", 1.0, 0.0)
            .add_link("L3", "a", "b", 1.0, 0.0)
            .add_link("L4", "a", "K", 1.0, 0.0)
            .add_link("L5", "b", "K", 1.0, 0.0)
            .add_link("L6", "c", "d", 1.0, 0.0)
            .add_link("L7", "d", "K", 1.0, 0.0);
        b.build().expect("diamond is valid")
    }

    fn decode(codes: &[u8]) -> Result<TwoPaths, DecodeError> {
        let net = diamond();
        let v = SolutionVector::from_codes(codes).unwrap();
        TwoPaths::decode(&net, &v, n(0), n(1))
    }

    #[test]
    fn test_decode_disjoint_pair() {
        let p = decode(&[1, 2, 0, 1, 0, 2, 2]).expect("valid");
        assert_eq!(p.outbound_links(), &[l(0), l(3)]);
        assert_eq!(p.outbound_nodes(), &[n(0), n(2), n(1)]);
        assert_eq!(p.inbound_links(), &[l(6), l(5), l(1)]);
        assert_eq!(p.inbound_nodes(), &[n(1), n(5), n(4), n(0)]);
        assert_eq!(p.shared_links().count(), 0);
    }

    #[test]
    fn test_decode_overlapping_pair() {
        let p = decode(&[3, 0, 0, 3, 0, 0, 0]).expect("valid");
        assert_eq!(p.outbound_links(), &[l(0), l(3)]);
        assert_eq!(p.inbound_links(), &[l(3), l(0)]);
        assert_eq!(p.shared_links().collect::<Vec<_>>(), vec![l(0), l(3)]);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            decode(&[1, 0, 0, 0, 0, 0, 0]),
            Err(DecodeError::Broken {
                direction: Direction::Outbound,
                at: n(2)
            })
        );
        assert_eq!(
            decode(&[3, 1, 0, 3, 0, 0, 0]),
            Err(DecodeError::Ambiguous {
                direction: Direction::Outbound,
                at: n(0)
            })
        );
        assert_eq!(
            decode(&[3, 0, 0, 3, 0, 2, 0]),
            Err(DecodeError::StrayLink {
                direction: Direction::Inbound,
                link: l(5)
            })
        );
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let net = diamond();
        let v = SolutionVector::new(3);
        assert_eq!(
            TwoPaths::decode(&net, &v, n(0), n(1)),
            Err(DecodeError::LengthMismatch {
                expected: 7,
                actual: 3
            })
        );
    }

    #[test]
    fn test_round_trip_decode_encode() {
        let net = diamond();
        for codes in [
            [1u8, 2, 0, 1, 0, 2, 2],
            [3, 0, 2, 1, 2, 0, 0],
            [2, 1, 2, 0, 2, 1, 1],
            [3, 0, 3, 0, 3, 0, 0],
        ] {
            let v = SolutionVector::from_codes(&codes).unwrap();
            let p = TwoPaths::decode(&net, &v, n(0), n(1)).expect("valid");
            assert_eq!(p.encode(net.num_links()), v);
        }
    }

    #[test]
    fn test_from_links_validates_walks() {
        let net = diamond();
        let p = TwoPaths::from_links(&net, n(0), n(1), vec![l(0), l(3)], vec![l(3), l(0)])
            .expect("valid");
        assert!(p.validate(&net).is_ok());
        assert_eq!(p.encode(7).to_codes(), vec![3, 0, 0, 3, 0, 0, 0]);

        assert_eq!(
            TwoPaths::from_links(&net, n(0), n(1), vec![l(0), l(4)], vec![l(3), l(0)]),
            Err(DecodeError::Disconnected {
                direction: Direction::Outbound,
                at: n(2),
                link: l(4)
            })
        );
        assert_eq!(
            TwoPaths::from_links(&net, n(0), n(1), vec![l(0)], vec![l(3), l(0)]),
            Err(DecodeError::Broken {
                direction: Direction::Outbound,
                at: n(2)
            })
        );
        assert_eq!(
            TwoPaths::from_links(&net, n(0), n(1), vec![l(0), l(3)], vec![l(9)]),
            Err(DecodeError::UnknownLink {
                link: l(9),
                num_links: 7
            })
        );
    }

    #[test]
    fn test_from_links_rejects_revisit() {
        let net = diamond();
        // S -> a -> b -> K -> a is not simple.
        let err = TwoPaths::from_links(
            &net,
            n(0),
            n(1),
            vec![l(0), l(2), l(4), l(3)],
            vec![l(3), l(0)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            DecodeError::Cycle {
                direction: Direction::Outbound,
                at: n(2)
            }
        );
    }
}
