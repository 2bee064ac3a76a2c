//! The atomic scored entity.
//!
//! Raw scores are normalized into fractions of `upper` at construction;
//! everything downstream (groups, courses, clobbers) works in fraction
//! units. Curved assignments additionally carry the class mean and standard
//! deviation, and a derived z-score.

use serde::{Deserialize, Serialize};

use crate::error::{GradeError, Result};
use crate::id::Id;
use crate::summary::Summary;

/// Curve discriminant. Curved assignments carry the class distribution in
/// upper-normalized fraction units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "lowercase")]
pub enum Curve {
    Uncurved,
    Curved { mu: f64, sigma: f64 },
}

impl Curve {
    pub fn is_curved(&self) -> bool {
        matches!(self, Curve::Curved { .. })
    }
}

/// Pre-clobber standing, kept for one-level undo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClobberSnapshot {
    pub score: f64,
    pub zscore: f64,
}

/// A scored assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// Fraction of upper. May exceed 1 or be negative.
    score: f64,
    /// Raw maximum score this assignment was graded out of.
    upper: f64,
    #[serde(flatten)]
    curve: Curve,
    /// Derived: (score - mu) / sigma for curved assignments, 0 otherwise.
    zscore: f64,
    /// Set only when the assignment is owned directly by a course.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
    clobbered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    before_clobber: Option<ClobberSnapshot>,
}

impl Assignment {
    /// Build an uncurved assignment from a raw score.
    pub fn uncurved(score: f64, name: Option<String>, upper: f64) -> Result<Self> {
        if upper <= 0.0 {
            return Err(GradeError::InvalidUpper(upper));
        }
        Ok(Self {
            id: Id::fresh(),
            name,
            score: score / upper,
            upper,
            curve: Curve::Uncurved,
            zscore: 0.0,
            weight: None,
            clobbered: false,
            before_clobber: None,
        })
    }

    /// Build a curved assignment from raw score, mean, and deviation.
    ///
    /// `mu` and `sigma` are required; they are normalized by `upper` along
    /// with the score, and the z-score is derived.
    pub fn curved(
        score: f64,
        name: Option<String>,
        upper: f64,
        mu: Option<f64>,
        sigma: Option<f64>,
    ) -> Result<Self> {
        if upper <= 0.0 {
            return Err(GradeError::InvalidUpper(upper));
        }
        let (mu, sigma) = match (mu, sigma) {
            (Some(mu), Some(sigma)) => (mu, sigma),
            _ => return Err(GradeError::MissingCurveStats),
        };
        if sigma == 0.0 {
            return Err(GradeError::ZeroSigma);
        }

        let score = score / upper;
        let mu = mu / upper;
        let sigma = sigma / upper;
        Ok(Self {
            id: Id::fresh(),
            name,
            score,
            upper,
            curve: Curve::Curved { mu, sigma },
            zscore: (score - mu) / sigma,
            weight: None,
            clobbered: false,
            before_clobber: None,
        })
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fractional score.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn zscore(&self) -> f64 {
        self.zscore
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    pub fn is_curved(&self) -> bool {
        self.curve.is_curved()
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub(crate) fn set_weight(&mut self, weight: f64) {
        self.weight = Some(weight);
    }

    pub fn clobbered(&self) -> bool {
        self.clobbered
    }

    /// Ranking key for group-level dropping: z-score for curved
    /// assignments, fractional score otherwise. Curved and uncurved sets
    /// each rank by their own native notion of standing.
    pub fn primary_score(&self) -> f64 {
        match self.curve {
            Curve::Curved { .. } => self.zscore,
            Curve::Uncurved => self.score,
        }
    }

    pub fn summary(&self) -> Summary {
        match self.curve {
            Curve::Curved { mu, sigma } => Summary::curved(self.score, self.zscore, mu, sigma),
            Curve::Uncurved => Summary::uncurved(self.score),
        }
    }

    /// Substitute a stronger standing onto this assignment.
    ///
    /// A repeated clobber replaces the previous one rather than stacking;
    /// the snapshot always holds the true pre-clobber standing. The score
    /// is recomputed from the donated z-score against this assignment's own
    /// distribution. No-op on uncurved assignments, which have no
    /// distribution to recompute against.
    pub fn apply_clobber(&mut self, zscore: f64) {
        let Curve::Curved { mu, sigma } = self.curve else {
            return;
        };
        if self.clobbered {
            self.revert_clobber();
        }
        self.clobbered = true;
        self.before_clobber = Some(ClobberSnapshot {
            score: self.score,
            zscore: self.zscore,
        });
        self.zscore = zscore;
        self.score = zscore * sigma + mu;
    }

    /// Restore the pre-clobber standing. No-op when not clobbered.
    pub fn revert_clobber(&mut self) {
        let Some(snapshot) = self.before_clobber.take() else {
            return;
        };
        self.clobbered = false;
        self.score = snapshot.score;
        self.zscore = snapshot.zscore;
    }
}
