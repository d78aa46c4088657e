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

//! Partial solutions and the arena that owns them.
//!
//! A `PartialSolution` is one node of the search tree: a solution vector
//! under construction, the node the current path stands on (the head), the
//! construction phase, and the goal accumulated so far. States never point
//! at each other directly; each stores the `StateIndex` of its parent in the
//! `StateArena`, so the tree is a flat vector and the route a state took can
//! be recovered by walking parent indices back to the root.
//!
//! Once a state has been expanded its vector is no longer needed for
//! anything but tracing, which only uses heads. `StateArena::release` drops
//! the vector and keeps the rest, which bounds memory by the frontier rather
//! than by every state ever generated.

use duplex_core::utils::index::{TypedIndex, TypedIndexTag};
use duplex_model::{
    index::{LinkIndex, NodeIndex},
    solution::SolutionVector,
};

/// A tag type for search state indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateIndexTag;

impl TypedIndexTag for StateIndexTag {
    const NAME: &'static str = "StateIndex";
}

/// A typed index into the `StateArena`.
pub type StateIndex = TypedIndex<StateIndexTag>;

/// Which path a partial solution is building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Extending the path from start towards end.
    Outbound,
    /// Extending the path from end back towards start.
    Inbound,
    /// Both paths are closed.
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Outbound => write!(f, "Outbound"),
            Phase::Inbound => write!(f, "Inbound"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// One node of the search tree.
#[derive(Clone, PartialEq)]
pub struct PartialSolution {
    vector: Option<SolutionVector>,
    parent: Option<StateIndex>,
    via: Option<LinkIndex>,
    head: NodeIndex,
    phase: Phase,
    goal: f64,
    depth: u32,
}

impl PartialSolution {
    /// Creates the root: an all-unused vector, standing on `start`.
    #[inline]
    pub fn root(num_links: usize, start: NodeIndex) -> Self {
        Self {
            vector: Some(SolutionVector::new(num_links)),
            parent: None,
            via: None,
            head: start,
            phase: Phase::Outbound,
            goal: 0.0,
            depth: 0,
        }
    }

    /// Creates a child of `parent`, reached over `via`.
    #[inline]
    pub fn child(
        parent: StateIndex,
        parent_depth: u32,
        via: LinkIndex,
        vector: SolutionVector,
        head: NodeIndex,
        phase: Phase,
        goal: f64,
    ) -> Self {
        Self {
            vector: Some(vector),
            parent: Some(parent),
            via: Some(via),
            head,
            phase,
            goal,
            depth: parent_depth + 1,
        }
    }

    /// Returns the solution vector, or `None` after the state was released.
    #[inline(always)]
    pub fn vector(&self) -> Option<&SolutionVector> {
        self.vector.as_ref()
    }

    /// Takes the solution vector out of the state.
    #[inline]
    pub fn take_vector(&mut self) -> Option<SolutionVector> {
        self.vector.take()
    }

    #[inline(always)]
    pub fn parent(&self) -> Option<StateIndex> {
        self.parent
    }

    /// Returns the link traversed to reach this state from its parent.
    #[inline(always)]
    pub fn via(&self) -> Option<LinkIndex> {
        self.via
    }

    #[inline(always)]
    pub fn head(&self) -> NodeIndex {
        self.head
    }

    #[inline(always)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the goal of the links used so far.
    #[inline(always)]
    pub fn goal(&self) -> f64 {
        self.goal
    }

    /// Returns the number of links traversed since the root.
    #[inline(always)]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline(always)]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }
}

impl std::fmt::Debug for PartialSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartialSolution")
            .field("vector", &self.vector)
            .field("parent", &self.parent)
            .field("via", &self.via)
            .field("head", &self.head)
            .field("phase", &self.phase)
            .field("goal", &self.goal)
            .field("depth", &self.depth)
            .finish()
    }
}

impl std::fmt::Display for PartialSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PartialSolution(head: {}, phase: {}, goal: {:.6}, depth: {})",
            self.head, self.phase, self.goal, self.depth
        )
    }
}

/// Owns every state generated during a search.
#[derive(Clone, Debug, Default)]
pub struct StateArena {
    states: Vec<PartialSolution>,
}

impl StateArena {
    #[inline]
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            states: Vec::with_capacity(capacity),
        }
    }

    /// Stores `state` and returns its index.
    #[inline]
    pub fn push(&mut self, state: PartialSolution) -> StateIndex {
        let index = StateIndex::new(self.states.len());
        self.states.push(state);
        index
    }

    /// Returns the state at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn get(&self, index: StateIndex) -> &PartialSolution {
        debug_assert!(
            index.get() < self.states.len(),
            "called `StateArena::get` with state index out of bounds: the len is {} but the index is {}",
            self.states.len(),
            index.get()
        );
        &self.states[index.get()]
    }

    /// Mutable access to the state at `index`.
    #[inline]
    pub fn get_mut(&mut self, index: StateIndex) -> &mut PartialSolution {
        debug_assert!(
            index.get() < self.states.len(),
            "called `StateArena::get_mut` with state index out of bounds: the len is {} but the index is {}",
            self.states.len(),
            index.get()
        );
        &mut self.states[index.get()]
    }

    /// Drops the solution vector of the state at `index`.
    #[inline]
    pub fn release(&mut self, index: StateIndex) {
        self.get_mut(index).vector = None;
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Removes all states, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.states.clear();
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.states.capacity()
    }

    /// Returns the heads from the root to `index`, in traversal order.
    pub fn trace(&self, index: StateIndex) -> Vec<NodeIndex> {
        let mut route = Vec::with_capacity(self.get(index).depth() as usize + 1);
        let mut cursor = Some(index);
        while let Some(current) = cursor {
            let state = self.get(current);
            route.push(state.head());
            cursor = state.parent();
        }
        route.reverse();
        route
    }
}

impl std::fmt::Display for StateArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StateArena(len: {})", self.states.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duplex_model::solution::Direction;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn l(i: usize) -> LinkIndex {
        LinkIndex::new(i)
    }

    #[test]
    fn test_root_state() {
        let root = PartialSolution::root(4, n(2));
        assert_eq!(root.head(), n(2));
        assert_eq!(root.phase(), Phase::Outbound);
        assert_eq!(root.goal(), 0.0);
        assert_eq!(root.depth(), 0);
        assert_eq!(root.parent(), None);
        assert_eq!(root.vector().map(|v| v.len()), Some(4));
    }

    #[test]
    fn test_trace_follows_parents() {
        let mut arena = StateArena::new();
        let root = arena.push(PartialSolution::root(3, n(0)));

        let mut v1 = SolutionVector::new(3);
        v1.mark(l(0), Direction::Outbound);
        let s1 = arena.push(PartialSolution::child(
            root,
            0,
            l(0),
            v1.clone(),
            n(1),
            Phase::Inbound,
            1.0,
        ));

        let mut v2 = v1;
        v2.mark(l(1), Direction::Inbound);
        let s2 = arena.push(PartialSolution::child(
            s1,
            1,
            l(1),
            v2,
            n(0),
            Phase::Complete,
            1.5,
        ));

        assert_eq!(arena.len(), 3);
        assert_eq!(arena.get(s2).depth(), 2);
        assert_eq!(arena.get(s2).via(), Some(l(1)));
        assert_eq!(arena.trace(s2), vec![n(0), n(1), n(0)]);
        assert_eq!(arena.trace(root), vec![n(0)]);
    }

    #[test]
    fn test_release_keeps_tracing_data() {
        let mut arena = StateArena::with_capacity(4);
        let root = arena.push(PartialSolution::root(2, n(0)));
        let child = arena.push(PartialSolution::child(
            root,
            0,
            l(0),
            SolutionVector::new(2),
            n(1),
            Phase::Outbound,
            1.0,
        ));
        arena.release(root);

        assert!(arena.get(root).vector().is_none());
        assert!(arena.get(child).vector().is_some());
        assert_eq!(arena.trace(child), vec![n(0), n(1)]);

        arena.clear();
        assert!(arena.is_empty());
        assert!(arena.capacity() >= 4);
    }
}
