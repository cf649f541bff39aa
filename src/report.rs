//! Quality of a generated round, as counts of repeats and a letter grade.

use std::fmt;

/// Letter grade of a round, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Grade {
    /// No penalty at all.
    #[default]
    APlus,
    /// Good.
    A,
    /// Acceptable.
    B,
    /// Noticeable repeats.
    C,
    /// Many repeats.
    D,
    /// Heavily constrained round.
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(s)
    }
}

/// Upper bounds (exclusive) of each grade band. A score of exactly zero is always `A+`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeBands {
    /// Scores below this are `A`.
    pub a: f64,
    /// Scores below this are `B`.
    pub b: f64,
    /// Scores below this are `C`.
    pub c: f64,
    /// Scores below this are `D`, everything else is `F`.
    pub d: f64,
}

impl Default for GradeBands {
    fn default() -> Self {
        Self {
            a: 10.0,
            b: 25.0,
            c: 50.0,
            d: 100.0,
        }
    }
}

impl GradeBands {
    /// Grade of a penalty score.
    pub fn grade(&self, score: f64) -> Grade {
        if score == 0.0 {
            Grade::APlus
        } else if score < self.a {
            Grade::A
        } else if score < self.b {
            Grade::B
        } else if score < self.c {
            Grade::C
        } else if score < self.d {
            Grade::D
        } else {
            Grade::F
        }
    }

    /// True if the bands are finite and strictly increasing from a positive first bound.
    pub fn is_ordered(&self) -> bool {
        let bounds = [self.a, self.b, self.c, self.d];
        bounds.iter().all(|b| b.is_finite())
            && self.a > 0.0
            && bounds.windows(2).all(|w| w[0] < w[1])
    }
}

/// How many constraints a round breaks against earlier rounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QualityReport {
    /// Teammate pairs that already played together.
    pub repeated_partners: usize,
    /// Opposing pairs that already faced each other.
    pub repeated_opponents: usize,
    /// Players put back on a venue they already played on.
    pub repeated_venues: usize,
    /// Matches played in a non-preferred or hybrid format.
    pub fallback_matches: usize,
    /// Sum of the match penalties. Lower is better.
    pub total_score: f64,
    /// Grade of `total_score`.
    pub grade: Grade,
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grade {} (score {:.1}): {} repeated partners, {} repeated opponents, {} repeated venues, {} fallback matches",
            self.grade,
            self.total_score,
            self.repeated_partners,
            self.repeated_opponents,
            self.repeated_venues,
            self.fallback_matches
        )
    }
}
