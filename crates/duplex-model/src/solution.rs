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

//! Per-link usage annotations.
//!
//! A candidate answer assigns every link one of four states: unused, used by
//! the outbound path, used by the inbound path, or used by both ("shared").
//! The numeric codes 0, 1, 2 and 3 are kept because they compose additively
//! (1 + 2 = 3), but the type is an enum with an explicit `|` so no arithmetic
//! can overflow into a fifth state.
//!
//! `SolutionVector` stores the annotation as two bitsets, one per direction.
//! A shared link simply has both bits set, which makes the "visited in this
//! phase" checks of the search a single bit probe.

use crate::index::LinkIndex;
use fixedbitset::FixedBitSet;

/// One of the two traversal directions.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Direction {
    /// From the start node to the end node.
    Outbound,
    /// From the end node back to the start node.
    Inbound,
}

impl Direction {
    /// Returns the usage a link gets when only this direction traverses it.
    #[inline]
    pub const fn usage(self) -> LinkUsage {
        match self {
            Direction::Outbound => LinkUsage::Outbound,
            Direction::Inbound => LinkUsage::Inbound,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Outbound => write!(f, "outbound"),
            Direction::Inbound => write!(f, "inbound"),
        }
    }
}

/// How a single link is used by a (partial) solution.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum LinkUsage {
    #[default]
    Unused = 0,
    Outbound = 1,
    Inbound = 2,
    Shared = 3,
}

impl LinkUsage {
    /// Decodes the numeric code `0..=3`.
    #[inline]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(LinkUsage::Unused),
            1 => Some(LinkUsage::Outbound),
            2 => Some(LinkUsage::Inbound),
            3 => Some(LinkUsage::Shared),
            _ => None,
        }
    }

    #[inline]
    const fn from_bits(outbound: bool, inbound: bool) -> Self {
        match (outbound, inbound) {
            (false, false) => LinkUsage::Unused,
            (true, false) => LinkUsage::Outbound,
            (false, true) => LinkUsage::Inbound,
            (true, true) => LinkUsage::Shared,
        }
    }

    /// Returns the numeric code `0..=3`.
    #[inline(always)]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns `true` if the outbound path uses the link.
    #[inline(always)]
    pub const fn has_outbound(self) -> bool {
        self.code() & 1 != 0
    }

    /// Returns `true` if the inbound path uses the link.
    #[inline(always)]
    pub const fn has_inbound(self) -> bool {
        self.code() & 2 != 0
    }

    /// Returns `true` if the given direction uses the link.
    #[inline]
    pub const fn has(self, direction: Direction) -> bool {
        match direction {
            Direction::Outbound => self.has_outbound(),
            Direction::Inbound => self.has_inbound(),
        }
    }

    /// Returns `true` if both directions use the link.
    #[inline(always)]
    pub const fn is_shared(self) -> bool {
        matches!(self, LinkUsage::Shared)
    }

    /// Returns `true` if neither direction uses the link.
    #[inline(always)]
    pub const fn is_unused(self) -> bool {
        matches!(self, LinkUsage::Unused)
    }
}

impl std::ops::BitOr for LinkUsage {
    type Output = LinkUsage;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        LinkUsage::from_bits(
            self.has_outbound() || rhs.has_outbound(),
            self.has_inbound() || rhs.has_inbound(),
        )
    }
}

impl std::ops::BitOrAssign for LinkUsage {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl std::fmt::Display for LinkUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The usage of every link in the network.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct SolutionVector {
    outbound: FixedBitSet,
    inbound: FixedBitSet,
}

impl SolutionVector {
    /// Creates an all-unused vector for `num_links` links.
    #[inline]
    pub fn new(num_links: usize) -> Self {
        Self {
            outbound: FixedBitSet::with_capacity(num_links),
            inbound: FixedBitSet::with_capacity(num_links),
        }
    }

    /// Builds a vector from numeric codes. Returns `None` if any code is
    /// outside `0..=3`.
    ///
    /// ```rust
    /// # use duplex_model::solution::{LinkUsage, SolutionVector};
    /// # use duplex_model::index::LinkIndex;
    /// let v = SolutionVector::from_codes(&[2, 1, 3, 0]).unwrap();
    /// assert_eq!(v.get(LinkIndex::new(2)), LinkUsage::Shared);
    /// assert_eq!(v.to_codes(), vec![2, 1, 3, 0]);
    /// ```
    pub fn from_codes(codes: &[u8]) -> Option<Self> {
        let mut vector = Self::new(codes.len());
        for (i, &code) in codes.iter().enumerate() {
            vector.set(LinkIndex::new(i), LinkUsage::from_code(code)?);
        }
        Some(vector)
    }

    /// Returns the numeric code of every link.
    pub fn to_codes(&self) -> Vec<u8> {
        self.iter().map(|(_, usage)| usage.code()).collect()
    }

    /// Returns the number of links covered.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.outbound.len()
    }

    /// Returns `true` if the vector covers no links.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.outbound.len() == 0
    }

    /// Returns the usage of `link`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `link` is out of bounds.
    #[inline]
    pub fn get(&self, link: LinkIndex) -> LinkUsage {
        let index = link.get();
        debug_assert!(
            index < self.len(),
            "called `SolutionVector::get` with link index out of bounds: the len is {} but the index is {}",
            self.len(),
            index
        );
        LinkUsage::from_bits(self.outbound.contains(index), self.inbound.contains(index))
    }

    /// Overwrites the usage of `link`.
    ///
    /// # Panics
    ///
    /// Panics if `link` is out of bounds.
    #[inline]
    pub fn set(&mut self, link: LinkIndex, usage: LinkUsage) {
        let index = link.get();
        self.outbound.set(index, usage.has_outbound());
        self.inbound.set(index, usage.has_inbound());
    }

    /// Adds `direction` to the usage of `link` and returns the new usage.
    #[inline]
    pub fn mark(&mut self, link: LinkIndex, direction: Direction) -> LinkUsage {
        match direction {
            Direction::Outbound => self.outbound.insert(link.get()),
            Direction::Inbound => self.inbound.insert(link.get()),
        }
        self.get(link)
    }

    /// Returns `true` if `direction` uses `link`.
    #[inline(always)]
    pub fn uses(&self, link: LinkIndex, direction: Direction) -> bool {
        match direction {
            Direction::Outbound => self.outbound.contains(link.get()),
            Direction::Inbound => self.inbound.contains(link.get()),
        }
    }

    /// Returns `true` if `link` is used by any direction.
    #[inline(always)]
    pub fn is_used(&self, link: LinkIndex) -> bool {
        self.outbound.contains(link.get()) || self.inbound.contains(link.get())
    }

    /// Counts the links carrying exactly `usage`.
    pub fn count(&self, usage: LinkUsage) -> usize {
        match usage {
            LinkUsage::Unused => self.len() - self.outbound.union(&self.inbound).count(),
            LinkUsage::Outbound => self.outbound.difference(&self.inbound).count(),
            LinkUsage::Inbound => self.inbound.difference(&self.outbound).count(),
            LinkUsage::Shared => self.outbound.intersection(&self.inbound).count(),
        }
    }

    /// Returns the links used by `direction` in ascending index order.
    pub fn links(&self, direction: Direction) -> impl Iterator<Item = LinkIndex> + '_ {
        let bits = match direction {
            Direction::Outbound => &self.outbound,
            Direction::Inbound => &self.inbound,
        };
        bits.ones().map(LinkIndex::new)
    }

    /// Iterates over `(link, usage)` for every link.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (LinkIndex, LinkUsage)> + '_ {
        LinkIndex::range(self.len()).map(move |link| (link, self.get(link)))
    }
}

impl std::fmt::Debug for SolutionVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SolutionVector({:?})", self.to_codes())
    }
}

impl std::fmt::Display for SolutionVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, (_, usage)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", usage)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l(i: usize) -> LinkIndex {
        LinkIndex::new(i)
    }

    #[test]
    fn test_codes_round_trip_all_four_values() {
        for code in 0..=3u8 {
            let usage = LinkUsage::from_code(code).expect("valid code");
            assert_eq!(usage.code(), code);
        }
        assert_eq!(LinkUsage::from_code(4), None);
    }

    #[test]
    fn test_combination_table() {
        use LinkUsage::*;
        assert_eq!(Outbound | Inbound, Shared);
        assert_eq!(Inbound | Outbound, Shared);
        assert_eq!(Outbound | Outbound, Outbound);
        assert_eq!(Inbound | Inbound, Inbound);
        assert_eq!(Shared | Outbound, Shared);
        assert_eq!(Unused | Inbound, Inbound);
        assert_eq!(Unused | Unused, Unused);

        let mut u = Unused;
        u |= Outbound;
        u |= Inbound;
        assert_eq!(u, Shared);
    }

    #[test]
    fn test_direction_predicates() {
        assert!(LinkUsage::Shared.has(Direction::Outbound));
        assert!(LinkUsage::Shared.has(Direction::Inbound));
        assert!(!LinkUsage::Outbound.has_inbound());
        assert!(!LinkUsage::Inbound.has_outbound());
        assert!(LinkUsage::Unused.is_unused());
        assert!(LinkUsage::Shared.is_shared());
    }

    #[test]
    fn test_mark_adds_direction() {
        let mut v = SolutionVector::new(3);
        assert_eq!(v.mark(l(1), Direction::Outbound), LinkUsage::Outbound);
        assert_eq!(v.mark(l(1), Direction::Inbound), LinkUsage::Shared);
        assert_eq!(v.mark(l(2), Direction::Inbound), LinkUsage::Inbound);
        assert_eq!(v.to_codes(), vec![0, 3, 2]);
        assert!(v.is_used(l(2)));
        assert!(!v.is_used(l(0)));
    }

    #[test]
    fn test_count_per_usage() {
        let v = SolutionVector::from_codes(&[2, 1, 2, 0, 2, 1, 1, 3]).unwrap();
        assert_eq!(v.count(LinkUsage::Unused), 1);
        assert_eq!(v.count(LinkUsage::Outbound), 3);
        assert_eq!(v.count(LinkUsage::Inbound), 3);
        assert_eq!(v.count(LinkUsage::Shared), 1);
    }

    #[test]
    fn test_links_by_direction_include_shared() {
        let v = SolutionVector::from_codes(&[1, 3, 2]).unwrap();
        let out: Vec<usize> = v.links(Direction::Outbound).map(|x| x.get()).collect();
        let inb: Vec<usize> = v.links(Direction::Inbound).map(|x| x.get()).collect();
        assert_eq!(out, vec![0, 1]);
        assert_eq!(inb, vec![1, 2]);
    }

    #[test]
    fn test_from_codes_rejects_invalid() {
        assert!(SolutionVector::from_codes(&[0, 5]).is_none());
    }

    #[test]
    fn test_display() {
        let v = SolutionVector::from_codes(&[2, 1, 0]).unwrap();
        assert_eq!(format!("{}", v), "[2, 1, 0]");
        assert_eq!(format!("{:?}", v), "SolutionVector([2, 1, 0])");
    }
}
