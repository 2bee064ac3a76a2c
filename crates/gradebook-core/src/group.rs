//! Assignment groups: ordered collections of uniformly-curved assignments
//! with a lowest-N drop policy.
//!
//! Every assignment in a group shares the group's curve-ness; the group
//! factory enforces this by constructing members itself. Aggregation drops
//! the lowest-ranked members first, then averages the rest.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::assignment::{Assignment, Curve};
use crate::error::{GradeError, Result};
use crate::id::Id;
use crate::stats::correlated_sigma_sum;
use crate::summary::Summary;

/// Kind discriminant. Curved groups carry the pairwise correlation used
/// when folding member deviations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "lowercase")]
pub enum GroupKind {
    Uncurved,
    Curved { corr: f64 },
}

impl GroupKind {
    pub fn is_curved(&self) -> bool {
        matches!(self, GroupKind::Curved { .. })
    }
}

/// Per-assignment listing entry for UI consumption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentDetail {
    pub id: Id,
    pub name: Option<String>,
    pub summary: Summary,
}

/// An ordered collection of assignments aggregated as one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentGroup {
    id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    weight: f64,
    #[serde(flatten)]
    kind: GroupKind,
    num_drops: usize,
    /// Insertion-ordered; ids resolve through linear lookup.
    assignments: Vec<Assignment>,
}

impl AssignmentGroup {
    /// Build an uncurved group.
    pub fn uncurved(weight: f64, name: Option<String>, num_drops: usize) -> Result<Self> {
        Self::validate_weight(weight)?;
        Ok(Self {
            id: Id::fresh(),
            name,
            weight,
            kind: GroupKind::Uncurved,
            num_drops,
            assignments: Vec::new(),
        })
    }

    /// Build a curved group with a pairwise correlation coefficient.
    pub fn curved(weight: f64, name: Option<String>, corr: f64, num_drops: usize) -> Result<Self> {
        Self::validate_weight(weight)?;
        if !(0.0..=1.0).contains(&corr) {
            return Err(GradeError::InvalidCorrelation(corr));
        }
        Ok(Self {
            id: Id::fresh(),
            name,
            weight,
            kind: GroupKind::Curved { corr },
            num_drops,
            assignments: Vec::new(),
        })
    }

    fn validate_weight(weight: f64) -> Result<()> {
        if weight <= 0.0 || weight > 1.0 {
            return Err(GradeError::InvalidWeight(weight));
        }
        Ok(())
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn is_curved(&self) -> bool {
        self.kind.is_curved()
    }

    pub fn num_drops(&self) -> usize {
        self.num_drops
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn assignment(&self, id: &Id) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id() == id)
    }

    /// Add an assignment scored the way this group is scored.
    ///
    /// `mu`/`sigma` are required for curved groups and ignored for uncurved
    /// ones. Unnamed assignments get "Assignment {n+1}". Returns the new
    /// assignment's id.
    pub fn add_assignment(
        &mut self,
        score: f64,
        name: Option<String>,
        upper: f64,
        mu: Option<f64>,
        sigma: Option<f64>,
    ) -> Result<Id> {
        let name = name.unwrap_or_else(|| format!("Assignment {}", self.assignments.len() + 1));
        let assignment = match self.kind {
            GroupKind::Curved { .. } => Assignment::curved(score, Some(name), upper, mu, sigma)?,
            GroupKind::Uncurved => Assignment::uncurved(score, Some(name), upper)?,
        };
        let id = assignment.id().clone();
        self.assignments.push(assignment);
        Ok(id)
    }

    /// Detach an assignment. No-op if the id is unknown.
    pub fn remove_assignment(&mut self, id: &Id) {
        self.assignments.retain(|a| a.id() != id);
    }

    /// Rank by primary score ascending and drop the lowest `num_drops`
    /// when the group is large enough to afford it. The sort is stable, so
    /// ties break by insertion order.
    fn retained(&self) -> (Vec<&Assignment>, bool) {
        let mut ranked: Vec<&Assignment> = self.assignments.iter().collect();
        ranked.sort_by(|a, b| {
            a.primary_score()
                .partial_cmp(&b.primary_score())
                .unwrap_or(Ordering::Equal)
        });
        if ranked.len() > self.num_drops {
            (ranked.split_off(self.num_drops), true)
        } else {
            (ranked, false)
        }
    }

    /// Aggregate the retained assignments into one summary.
    ///
    /// Uncurved groups average fractional scores. Curved groups average
    /// score and mu, and fold each member sigma (pre-scaled by 1/n) through
    /// the correlated combination rule, so the combined sigma is that of a
    /// mean of n correlated variables.
    pub fn summary(&self) -> Result<Summary> {
        if self.assignments.is_empty() {
            return Err(GradeError::EmptyGroup);
        }

        let (retained, drop_applied) = self.retained();
        let n = retained.len() as f64;

        let mut summary = match self.kind {
            GroupKind::Uncurved => {
                let score = retained.iter().map(|a| a.score()).sum::<f64>() / n;
                Summary::uncurved(score)
            }
            GroupKind::Curved { corr } => {
                let mut score = 0.0;
                let mut mu = 0.0;
                let mut sigma = 0.0;
                for assignment in &retained {
                    score += assignment.score() / n;
                    if let Curve::Curved { mu: a_mu, sigma: a_sigma } = assignment.curve() {
                        mu += a_mu / n;
                        sigma = correlated_sigma_sum(sigma, a_sigma / n, corr);
                    }
                }
                let zscore = (score - mu) / sigma;
                Summary::curved(score, zscore, mu, sigma)
            }
        };
        summary.drop_applied = Some(drop_applied);
        Ok(summary)
    }

    /// Per-assignment listing in insertion order. Fails when empty.
    pub fn detail(&self) -> Result<Vec<AssignmentDetail>> {
        if self.assignments.is_empty() {
            return Err(GradeError::EmptyGroup);
        }
        Ok(self
            .assignments
            .iter()
            .map(|a| AssignmentDetail {
                id: a.id().clone(),
                name: a.name().map(str::to_string),
                summary: a.summary(),
            })
            .collect())
    }
}
