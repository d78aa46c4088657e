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

//! Side-by-side evaluation of two-path solvers.
//!
//! Every solver answers the same request. Its answer is re-validated against
//! the network (a solver may have built its paths on a stale copy), then
//! scored with the shared goal function and the comparison rating, so that
//! solvers with different internal objectives are judged on equal terms.
//! `compare_random_pairs` repeats this over random terminal pairs and
//! aggregates per solver.

use crate::{
    objective::{Weights, goal_of, rate},
    solver::{SolverError, TwoPathSolver},
};
use duplex_model::{index::NodeIndex, network::Network, paths::TwoPaths};
use rand::Rng;
use std::time::{Duration, Instant};

/// A validated answer together with both scores.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredPaths {
    pub paths: TwoPaths,
    /// Minimized goal; lower is better.
    pub goal: f64,
    /// Comparison rating; higher is better.
    pub rating: f64,
}

/// The result of one solver on one request.
#[derive(Clone, Debug)]
pub struct SolverReport {
    pub solver: String,
    pub outcome: Result<ScoredPaths, SolverError>,
    pub elapsed: Duration,
}

impl std::fmt::Display for SolverReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            Ok(scored) => write!(
                f,
                "{}: goal {:.6}, rating {:.6} in {:.2?}",
                self.solver, scored.goal, scored.rating, self.elapsed
            ),
            Err(e) => write!(f, "{}: failed ({}) in {:.2?}", self.solver, e, self.elapsed),
        }
    }
}

/// Aggregate of one solver over many requests.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonSummary {
    pub solver: String,
    /// Requests attempted.
    pub runs: usize,
    /// Requests answered with a valid path pair.
    pub solved: usize,
    /// Mean goal over solved requests, `NaN` if none was solved.
    pub mean_goal: f64,
    /// Mean rating over solved requests, `NaN` if none was solved.
    pub mean_rating: f64,
    pub total_time: Duration,
}

impl std::fmt::Display for ComparisonSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: solved {}/{}, mean goal {:.6}, mean rating {:.6}, total {:.2?}",
            self.solver,
            self.solved,
            self.runs,
            self.mean_goal,
            self.mean_rating,
            self.total_time
        )
    }
}

/// Runs every solver on `(start, end)` and scores the answers.
pub fn compare(
    network: &Network,
    start: NodeIndex,
    end: NodeIndex,
    weights: &Weights,
    solvers: &mut [&mut dyn TwoPathSolver],
) -> Vec<SolverReport> {
    solvers
        .iter_mut()
        .map(|solver| run_one(network, start, end, weights, &mut **solver))
        .collect()
}

fn run_one(
    network: &Network,
    start: NodeIndex,
    end: NodeIndex,
    weights: &Weights,
    solver: &mut dyn TwoPathSolver,
) -> SolverReport {
    let started = Instant::now();
    let answer = solver.solve(network, start, end);
    let elapsed = started.elapsed();

    let outcome = answer.and_then(|paths| {
        paths.validate(network)?;
        if paths.start() != start || paths.end() != end {
            return Err(SolverError::Aborted(format!(
                "answered for terminals {} and {} instead of {} and {}",
                paths.start(),
                paths.end(),
                start,
                end
            )));
        }
        let goal = goal_of(network, &paths.encode(network.num_links()), weights);
        let rating = rate(network, &paths, weights);
        Ok(ScoredPaths {
            paths,
            goal,
            rating,
        })
    });

    if let Err(e) = &outcome {
        tracing::debug!(solver = solver.name(), error = %e, "solver produced no valid answer");
    }

    SolverReport {
        solver: solver.name().to_owned(),
        outcome,
        elapsed,
    }
}

/// Runs every solver on `repeats` random terminal pairs and aggregates.
///
/// Pairs are drawn uniformly from all ordered node pairs; draws with
/// `start == end` are skipped and do not count as runs. All solvers receive
/// the same pairs.
pub fn compare_random_pairs<R>(
    network: &Network,
    weights: &Weights,
    solvers: &mut [&mut dyn TwoPathSolver],
    rng: &mut R,
    repeats: usize,
) -> Vec<ComparisonSummary>
where
    R: Rng + ?Sized,
{
    let mut sums: Vec<(usize, usize, f64, f64, Duration)> =
        vec![(0, 0, 0.0, 0.0, Duration::ZERO); solvers.len()];

    if network.num_nodes() >= 2 {
        for _ in 0..repeats {
            let start = NodeIndex::new(rng.random_range(0..network.num_nodes()));
            let end = NodeIndex::new(rng.random_range(0..network.num_nodes()));
            if start == end {
                continue;
            }

            for (sum, solver) in sums.iter_mut().zip(solvers.iter_mut()) {
                let report = run_one(network, start, end, weights, &mut **solver);
                sum.0 += 1;
                sum.4 += report.elapsed;
                if let Ok(scored) = report.outcome {
                    sum.1 += 1;
                    sum.2 += scored.goal;
                    sum.3 += scored.rating;
                }
            }
        }
    }

    sums.into_iter()
        .zip(solvers.iter())
        .map(|((runs, solved, goal, rating, time), solver)| {
            let mean = |total: f64| {
                if solved > 0 {
                    total / solved as f64
                } else {
                    f64::NAN
                }
            };
            ComparisonSummary {
                solver: solver.name().to_owned(),
                runs,
                solved,
                mean_goal: mean(goal),
                mean_rating: mean(rating),
                total_time: time,
            }
        })
        .collect()
}
