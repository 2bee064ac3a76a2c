//! Fixed-shape scoring summaries.
//!
//! Every scoring operation (assignment, group, course) produces a
//! `Summary`. Scores are fractions of the maximum ("upper") score and are
//! deliberately unclamped: they may exceed 1 or go negative.

use serde::{Deserialize, Serialize};

/// Render a fraction as a percentage display string, e.g. "82.34%".
pub fn percentage(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Distribution statistics attached to summaries of curved entities.
///
/// The whole block is present for curved entities and absent otherwise;
/// there is no partially-populated state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveStats {
    pub zscore: f64,
    /// Class mean as a fraction of upper.
    pub fraction_mu: f64,
    /// Class standard deviation as a fraction of upper.
    pub fraction_sigma: f64,
    pub display_mu: String,
    pub display_sigma: String,
}

impl CurveStats {
    pub fn new(zscore: f64, fraction_mu: f64, fraction_sigma: f64) -> Self {
        Self {
            zscore,
            fraction_mu,
            fraction_sigma,
            display_mu: percentage(fraction_mu),
            display_sigma: percentage(fraction_sigma),
        }
    }
}

/// The result record produced by every scoring operation.
///
/// `drop_applied` is set only by group aggregation; `is_final`,
/// `class_curved`, and `grade` only by course aggregation. `error_message`
/// is set when a caller captures a local aggregation failure instead of
/// propagating it (detail listings do this per entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Score as a fraction of upper. Unclamped.
    pub fraction_score: f64,
    pub display_percentage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<CurveStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_applied: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_final: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_curved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Summary {
    /// Summary of an uncurved score.
    pub fn uncurved(fraction_score: f64) -> Self {
        Self {
            fraction_score,
            display_percentage: percentage(fraction_score),
            stats: None,
            drop_applied: None,
            is_final: None,
            class_curved: None,
            grade: None,
            error_message: None,
        }
    }

    /// Summary of a curved score with its distribution.
    pub fn curved(fraction_score: f64, zscore: f64, fraction_mu: f64, fraction_sigma: f64) -> Self {
        Self {
            stats: Some(CurveStats::new(zscore, fraction_mu, fraction_sigma)),
            ..Self::uncurved(fraction_score)
        }
    }

    /// Summary capturing a local aggregation failure instead of a score.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            ..Self::uncurved(0.0)
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_message.is_some()
    }
}
