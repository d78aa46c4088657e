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

//! Best-first search for overlapping out/back path pairs.
//!
//! The engine grows solution vectors one link at a time. A state first
//! extends its outbound path from the start; once the head reaches the end,
//! the state switches to building the inbound path back to the start, which
//! may run over links the outbound path already uses (those become shared).
//! When the head returns to the start the state is complete.
//!
//! States are expanded in order of `goal + estimate`. With the admissible
//! heuristic and non-negative path weights, the first complete state popped
//! has the minimum goal over all pairs of simple paths, because every state
//! still in the frontier has a score that does not exceed the goal of any of
//! its completions. A frontier whose lowest score is infinite holds no
//! completable state, so the search reports `NoPathFound` at that point
//! instead of draining it.
//!
//! The `AStarSolver` owns the arena and the frontier and keeps their
//! allocations between runs; a search session object encapsulates the
//! per-run statistics, timing, and monitor plumbing.

use crate::{
    context::{SearchConfig, SearchContext, prepare},
    distance::DistanceTables,
    error::SearchError,
    frontier::{Frontier, FrontierEntry},
    heuristic,
    monitor::tree_search_monitor::TreeSearchMonitor,
    result::{AStarOutcome, TwoPathSolution},
    state::{PartialSolution, Phase, StateArena, StateIndex},
    stats::AStarStatistics,
};
use duplex_core::num::score::Score;
use duplex_model::{
    index::{LinkIndex, NodeIndex},
    network::Network,
    paths::TwoPaths,
    solution::{Direction, SolutionVector},
};
use duplex_search::{command::SearchCommand, objective::Weights};
use smallvec::SmallVec;

/// A reusable best-first search engine.
#[derive(Clone, Debug, Default)]
pub struct AStarSolver {
    arena: StateArena,
    frontier: Frontier,
}

impl AStarSolver {
    /// Creates a new solver instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            arena: StateArena::new(),
            frontier: Frontier::new(),
        }
    }

    /// Creates a new solver with room for `num_states` states in the arena
    /// and the frontier.
    ///
    /// # Note
    ///
    /// Both grow on demand; preallocating only moves the cost of the first
    /// allocations to construction time.
    #[inline]
    pub fn preallocated(num_states: usize) -> Self {
        Self {
            arena: StateArena::with_capacity(num_states),
            frontier: Frontier::with_capacity(num_states),
        }
    }

    /// Searches for the path pair of minimum goal described by `context`.
    ///
    /// # Errors
    ///
    /// - `NoPathFound` if no pair of simple paths exists.
    /// - `SearchAborted` if `monitor` asked to stop first.
    /// - `InvalidEndpoint` / `Decode` if an internal invariant is broken.
    pub fn run<M>(
        &mut self,
        context: &SearchContext<'_>,
        mut monitor: M,
    ) -> Result<AStarOutcome, SearchError>
    where
        M: TreeSearchMonitor,
    {
        self.reset();
        AStarSearchSession::new(self, context, &mut monitor).run()
    }

    /// Computes the distance tables for `network`, validates the request,
    /// and runs the search.
    pub fn solve<M>(
        &mut self,
        network: &Network,
        start: NodeIndex,
        end: NodeIndex,
        weights: Weights,
        config: SearchConfig,
        monitor: M,
    ) -> Result<AStarOutcome, SearchError>
    where
        M: TreeSearchMonitor,
    {
        let tables = DistanceTables::compute(network);
        let context = prepare(network, start, end, &tables, weights, config)?;
        self.run(&context, monitor)
    }

    /// Returns the number of states held in the arena after the last run.
    #[inline]
    pub fn num_states(&self) -> usize {
        self.arena.len()
    }

    /// Clears the arena and the frontier without releasing their memory.
    #[inline]
    fn reset(&mut self) {
        self.arena.clear();
        self.frontier.clear();
    }
}

impl std::fmt::Display for AStarSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AStarSolver({}, {})", self.arena, self.frontier)
    }
}

/// A search session for the best-first solver.
/// This struct encapsulates the state and logic
/// of a single search run.
struct AStarSearchSession<'s, 'c, M> {
    solver: &'s mut AStarSolver,
    context: &'s SearchContext<'c>,
    monitor: &'s mut M,
    stats: AStarStatistics,
    start_time: std::time::Instant,
}

impl<M> std::fmt::Debug for AStarSearchSession<'_, '_, M>
where
    M: TreeSearchMonitor,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AStarSearchSession")
            .field("context", &self.context)
            .field("monitor", &self.monitor.name())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'s, 'c, M> AStarSearchSession<'s, 'c, M>
where
    M: TreeSearchMonitor,
{
    #[inline]
    fn new(solver: &'s mut AStarSolver, context: &'s SearchContext<'c>, monitor: &'s mut M) -> Self {
        Self {
            solver,
            context,
            monitor,
            stats: AStarStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> Result<AStarOutcome, SearchError> {
        self.monitor.on_enter_search(self.context, &self.stats);
        tracing::debug!(
            start = %self.context.start(),
            end = %self.context.end(),
            heuristic = %self.context.config().heuristic,
            "best-first search started"
        );

        self.push_root();

        let termination: Result<TwoPathSolution, SearchError> = loop {
            self.monitor.on_step(&self.stats);

            if let SearchCommand::Terminate(reason) = self.monitor.search_command(&self.stats) {
                break Err(SearchError::SearchAborted {
                    reason,
                    explored: self.stats.states_explored,
                });
            }

            let Some(entry) = self.solver.frontier.pop() else {
                break Err(SearchError::NoPathFound {
                    explored: self.stats.states_explored,
                });
            };
            // Everything left is at least as bad.
            if !entry.score.is_feasible() {
                break Err(SearchError::NoPathFound {
                    explored: self.stats.states_explored,
                });
            }

            self.stats.on_state_explored();
            if self.solver.arena.get(entry.state).is_complete() {
                break self.build_solution(entry);
            }
            if let Err(e) = self.expand(entry) {
                break Err(e);
            }
        };

        self.stats.set_total_time(self.start_time.elapsed());
        match &termination {
            Ok(solution) => {
                self.monitor.on_solution_found(solution, &self.stats);
                tracing::debug!(
                    goal = solution.goal,
                    explored = self.stats.states_explored,
                    generated = self.stats.states_generated,
                    elapsed = ?self.stats.time_total,
                    "best-first search finished"
                );
            }
            Err(e) => tracing::debug!(
                error = %e,
                explored = self.stats.states_explored,
                elapsed = ?self.stats.time_total,
                "best-first search ended without a solution"
            ),
        }
        self.monitor.on_exit_search(&self.stats);

        self.finalize_result(termination)
    }

    /// Wraps the terminal solution into an outcome, with the optimality
    /// claim the heuristic allows.
    ///
    /// # Note
    ///
    /// This consumes self.
    #[inline]
    fn finalize_result(
        self,
        termination: Result<TwoPathSolution, SearchError>,
    ) -> Result<AStarOutcome, SearchError> {
        let solution = termination?;
        if self.context.is_admissible() {
            Ok(AStarOutcome::optimal(solution, self.stats))
        } else {
            Ok(AStarOutcome::found(solution, self.stats))
        }
    }

    fn push_root(&mut self) {
        let ctx = self.context;
        let root = PartialSolution::root(ctx.network().num_links(), ctx.start());
        let estimate = root
            .vector()
            .map(|v| heuristic::estimate(ctx, ctx.start(), Phase::Outbound, v))
            .unwrap_or(f64::INFINITY);
        let score = Score::new(estimate);
        if !score.is_feasible() {
            self.stats.on_infeasible_state();
        }

        let index = self.solver.arena.push(root);
        self.solver.frontier.push(score, index);
        self.stats.on_frontier_size(self.solver.frontier.len());
    }

    /// Generates every child of the popped state and pushes it.
    fn expand(&mut self, entry: FrontierEntry) -> Result<(), SearchError> {
        let ctx = self.context;
        let network = ctx.network();
        let parent_index = entry.state;

        let (head, phase, goal, depth) = {
            let parent = self.solver.arena.get(parent_index);
            self.monitor.on_expand(parent, entry.score, &self.stats);
            (parent.head(), parent.phase(), parent.goal(), parent.depth())
        };
        let vector = if ctx.config().release_expanded {
            self.solver.arena.get_mut(parent_index).take_vector()
        } else {
            self.solver.arena.get(parent_index).vector().cloned()
        };
        debug_assert!(
            vector.is_some(),
            "called `AStarSearchSession::expand` on {} whose vector was already released",
            parent_index
        );
        let Some(vector) = vector else {
            return Ok(());
        };

        let direction = match phase {
            Phase::Outbound => Direction::Outbound,
            Phase::Inbound => Direction::Inbound,
            Phase::Complete => return Ok(()),
        };

        let mut moves: SmallVec<[(LinkIndex, NodeIndex); 8]> = SmallVec::new();
        for &link in network.neighbors(head) {
            // Outbound only walks unused links; inbound may reuse outbound ones.
            let available = match direction {
                Direction::Outbound => !vector.is_used(link),
                Direction::Inbound => !vector.uses(link, Direction::Inbound),
            };
            if !available {
                continue;
            }

            let target = network.other_end(link, head)?;
            if visited(network, &vector, target, direction) {
                self.stats.on_cycle_rejected();
                tracing::trace!(%head, %target, %link, "rejected move onto visited node");
                continue;
            }
            moves.push((link, target));
        }

        let count = moves.len();
        // The last move can take the parent vector instead of a copy.
        let mut remaining = Some(vector);
        for (i, (link, target)) in moves.into_iter().enumerate() {
            let mut child_vector = if i + 1 == count {
                remaining.take().unwrap_or_default()
            } else {
                remaining.clone().unwrap_or_default()
            };
            self.push_child(
                parent_index,
                depth,
                goal,
                phase,
                link,
                target,
                direction,
                &mut child_vector,
            );
        }

        if count > 0 {
            let parent = self.solver.arena.get(parent_index);
            self.monitor.on_children_enqueued(parent, count, &self.stats);
        }
        tracing::trace!(
            state = %parent_index,
            %head,
            %phase,
            children = count,
            frontier = self.solver.frontier.len(),
            "expanded state"
        );
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    #[inline]
    fn push_child(
        &mut self,
        parent: StateIndex,
        parent_depth: u32,
        parent_goal: f64,
        phase: Phase,
        link: LinkIndex,
        target: NodeIndex,
        direction: Direction,
        vector: &mut SolutionVector,
    ) {
        let ctx = self.context;
        let before = vector.get(link);
        let after = vector.mark(link, direction);
        let goal = parent_goal + ctx.weights().link_delta(before, after, ctx.congestion_cost(link));

        let next_phase = match phase {
            Phase::Outbound if target == ctx.end() => Phase::Inbound,
            Phase::Inbound if target == ctx.start() => Phase::Complete,
            other => other,
        };

        let estimate = heuristic::estimate(ctx, target, next_phase, vector);
        let score = Score::new(goal + estimate);
        if !score.is_feasible() {
            self.stats.on_infeasible_state();
        }

        let child = PartialSolution::child(
            parent,
            parent_depth,
            link,
            std::mem::take(vector),
            target,
            next_phase,
            goal,
        );
        self.stats.on_depth_update(child.depth() as u64);
        let index = self.solver.arena.push(child);
        self.solver.frontier.push(score, index);
        self.stats.on_state_generated();
        self.stats.on_frontier_size(self.solver.frontier.len());
    }

    /// Decodes the popped complete state into a solution.
    fn build_solution(&mut self, entry: FrontierEntry) -> Result<TwoPathSolution, SearchError> {
        let ctx = self.context;
        let route = self.solver.arena.trace(entry.state);
        let state = self.solver.arena.get_mut(entry.state);
        let goal = state.goal();
        // A complete state is never expanded, so its vector is still present.
        let vector = state.take_vector().unwrap_or_default();

        let paths = TwoPaths::decode(ctx.network(), &vector, ctx.start(), ctx.end())?;
        debug_assert!(
            {
                let recomputed = duplex_search::objective::goal_of(ctx.network(), &vector, ctx.weights());
                (recomputed - goal).abs() <= 1e-9 * recomputed.abs().max(1.0)
            },
            "called `AStarSearchSession::build_solution` with an incremental goal of {} that disagrees with the recomputed goal",
            goal
        );

        Ok(TwoPathSolution {
            vector,
            paths,
            goal,
            score: entry.score,
            route,
        })
    }
}

/// Returns `true` if the path being built in `direction` already passes
/// through `node`, i.e. one of its incident links carries that direction.
#[inline]
fn visited(network: &Network, vector: &SolutionVector, node: NodeIndex, direction: Direction) -> bool {
    network
        .neighbors(node)
        .iter()
        .any(|&link| vector.uses(link, direction))
}
