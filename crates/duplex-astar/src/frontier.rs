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

//! Priority queue of unexpanded states.
//!
//! `BinaryHeap` is a max-heap, so `FrontierEntry` reverses its ordering: the
//! entry with the lowest score compares greatest. Among equal scores the one
//! pushed first wins, which makes the expansion order, and with it the
//! returned solution, deterministic.

use crate::state::StateIndex;
use duplex_core::num::score::Score;
use std::collections::BinaryHeap;

/// A state waiting in the frontier, keyed by its score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrontierEntry {
    pub score: Score,
    pub sequence: u64,
    pub state: StateIndex,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for FrontierEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FrontierEntry(score: {}, sequence: {}, state: {})",
            self.score, self.sequence, self.state
        )
    }
}

/// Min-score, first-in-first-out-on-ties priority queue.
#[derive(Clone, Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_sequence: u64,
}

impl Frontier {
    #[inline]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    /// Inserts `state` with priority `score`.
    #[inline]
    pub fn push(&mut self, score: Score, state: StateIndex) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(FrontierEntry {
            score,
            sequence,
            state,
        });
    }

    /// Removes and returns the entry with the lowest score.
    #[inline]
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.heap.pop()
    }

    /// Returns the entry with the lowest score without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&FrontierEntry> {
        self.heap.peek()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Removes all entries and restarts the sequence, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_sequence = 0;
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }
}

impl std::fmt::Display for Frontier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frontier(len: {})", self.heap.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(i: usize) -> StateIndex {
        StateIndex::new(i)
    }

    #[test]
    fn test_pops_lowest_score_first() {
        let mut frontier = Frontier::new();
        frontier.push(Score::new(3.0), s(0));
        frontier.push(Score::new(-1.0), s(1));
        frontier.push(Score::INFEASIBLE, s(2));
        frontier.push(Score::new(2.0), s(3));

        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop())
            .map(|e| e.state.get())
            .collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        let mut frontier = Frontier::new();
        for i in 0..5 {
            frontier.push(Score::new(1.0), s(i));
        }
        frontier.push(Score::new(0.5), s(9));

        assert_eq!(frontier.pop().map(|e| e.state), Some(s(9)));
        for i in 0..5 {
            assert_eq!(frontier.pop().map(|e| e.state), Some(s(i)));
        }
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_clear_resets_sequence() {
        let mut frontier = Frontier::with_capacity(8);
        frontier.push(Score::ZERO, s(0));
        frontier.push(Score::ZERO, s(1));
        frontier.clear();
        assert!(frontier.is_empty());
        assert!(frontier.capacity() >= 8);

        frontier.push(Score::ZERO, s(7));
        assert_eq!(frontier.peek().map(|e| e.sequence), Some(0));
    }
}
