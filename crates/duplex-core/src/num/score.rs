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

//! Totally ordered objective values.
//!
//! Goal values and heuristic estimates are `f64`. Priority queues need `Ord`,
//! which `f64` does not provide, so `Score` wraps the value and orders it with
//! `f64::total_cmp`. Positive infinity is the "infeasible" sentinel: an
//! estimate built from an unreachable distance ends up there and sorts behind
//! every finite score instead of poisoning the comparison.

/// An objective value with a total order.
///
/// `Score` never holds NaN when produced through `Score::new`; the
/// constructor maps NaN to `Score::INFEASIBLE` so a malformed estimate
/// can only ever push a state to the back of the frontier.
#[repr(transparent)]
#[derive(Clone, Copy, Default)]
pub struct Score(f64);

impl Score {
    /// The zero score.
    pub const ZERO: Score = Score(0.0);

    /// The sentinel for completions that cannot be reached.
    pub const INFEASIBLE: Score = Score(f64::INFINITY);

    /// Creates a new `Score`. NaN is treated as infeasible.
    #[inline]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::INFEASIBLE
        } else {
            Self(value)
        }
    }

    /// Returns the raw `f64` value.
    #[inline(always)]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns `true` if the score is finite.
    #[inline(always)]
    pub fn is_feasible(self) -> bool {
        self.0.is_finite()
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for Score {}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::ops::Add for Score {
    type Output = Score;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Score::new(self.0 + rhs.0)
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Score::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl std::fmt::Debug for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Score({})", self.0)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_feasible() {
            write!(f, "{:.6}", self.0)
        } else {
            write!(f, "Inf")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_maps_to_infeasible() {
        let s = Score::new(f64::NAN);
        assert_eq!(s, Score::INFEASIBLE);
        assert!(!s.is_feasible());
    }

    #[test]
    fn test_infeasible_sorts_after_finite() {
        let mut scores = vec![Score::INFEASIBLE, Score::new(3.0), Score::new(-1.0)];
        scores.sort();
        assert_eq!(scores[0].value(), -1.0);
        assert_eq!(scores[1].value(), 3.0);
        assert!(!scores[2].is_feasible());
    }

    #[test]
    fn test_addition_saturates_into_infeasible() {
        let s = Score::new(1.5) + Score::INFEASIBLE;
        assert_eq!(s, Score::INFEASIBLE);

        // inf + -inf is NaN in IEEE arithmetic and must not leak out.
        let t = Score::new(f64::NEG_INFINITY) + Score::INFEASIBLE;
        assert_eq!(t, Score::INFEASIBLE);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Score::new(2.5)), "2.500000");
        assert_eq!(format!("{}", Score::INFEASIBLE), "Inf");
    }
}
