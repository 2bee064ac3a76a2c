//! Engine error taxonomy.
//!
//! Construction-time validation errors fail fast with no partial state;
//! operation-time state errors (empty collections, weight overflow) are
//! expected conditions callers may capture and render; clobber precondition
//! errors are each distinct so external layers can name the exact violation.
//! Lookup misses are `Option`s, never errors.

use thiserror::Error;

/// Errors produced by the grade aggregation engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradeError {
    /// Component or assignment weight outside (0, 1].
    #[error("invalid weight: {0}")]
    InvalidWeight(f64),

    /// Correlation coefficient outside [0, 1].
    #[error("invalid correlation coefficient: {0}")]
    InvalidCorrelation(f64),

    /// Maximum score must be positive.
    #[error("invalid upper bound: {0}")]
    InvalidUpper(f64),

    /// A curved entity was constructed without its distribution.
    #[error("curved assignment must have mean and standard deviation")]
    MissingCurveStats,

    /// A curved entity was given a zero standard deviation.
    #[error("standard deviation must be nonzero")]
    ZeroSigma,

    /// Unrecognized course status string.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// Aggregation over a group with no assignments.
    #[error("no assignments in this group")]
    EmptyGroup,

    /// Aggregation over a course with no components.
    #[error("no components in this course")]
    EmptyCourse,

    /// Listing over a profile with no courses.
    #[error("no courses in this profile")]
    EmptyProfile,

    /// Component weights sum past 1.0.
    #[error("total weight exceeds one")]
    WeightOverflow,

    /// The clobber source appears among its own targets.
    #[error("source assignment cannot be in targets")]
    ClobberSourceInTargets,

    /// The clobber source id is unknown to the course.
    #[error("source assignment not found")]
    ClobberSourceNotFound,

    /// The clobber source is not curved.
    #[error("source assignment is not curved")]
    ClobberSourceNotCurved,

    /// The clobber source belongs to a grouped component.
    #[error("source assignment must be single, not grouped")]
    ClobberSourceGrouped,

    /// A clobber target id is unknown to the course.
    #[error("target assignment at index {0} not found")]
    ClobberTargetNotFound(usize),

    /// A clobber target is not curved.
    #[error("target assignment at index {0} is not curved")]
    ClobberTargetNotCurved(usize),

    /// A clobber target belongs to a grouped component.
    #[error("target assignment at index {0} must be single, not grouped")]
    ClobberTargetGrouped(usize),
}

impl GradeError {
    /// Returns `true` for construction-time validation failures, as opposed
    /// to operation-time state or clobber precondition failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GradeError::InvalidWeight(_)
                | GradeError::InvalidCorrelation(_)
                | GradeError::InvalidUpper(_)
                | GradeError::MissingCurveStats
                | GradeError::ZeroSigma
                | GradeError::InvalidStatus(_)
        )
    }

    /// Returns `true` for expected empty-collection conditions that callers
    /// typically render as a placeholder rather than a failure.
    pub fn is_empty_state(&self) -> bool {
        matches!(
            self,
            GradeError::EmptyGroup | GradeError::EmptyCourse | GradeError::EmptyProfile
        )
    }

    /// For clobber target errors, the index of the offending target.
    pub fn target_index(&self) -> Option<usize> {
        match self {
            GradeError::ClobberTargetNotFound(i)
            | GradeError::ClobberTargetNotCurved(i)
            | GradeError::ClobberTargetGrouped(i) => Some(*i),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GradeError>;
