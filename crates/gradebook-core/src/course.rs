//! Courses: weighted collections of curved and uncurved components.
//!
//! A course aggregates its components' summaries into one weighted final
//! score, z-score, and letter grade, and owns the clobber engine that
//! donates a strong single curved result's standing to weaker ones.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::error::{GradeError, Result};
use crate::group::AssignmentGroup;
use crate::id::Id;
use crate::stats::{correlated_sigma_sum, truncnorm_ppf};
use crate::summary::Summary;

/// Tolerance for weight-total comparisons against 1.0.
const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Course lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Other,
}

impl CourseStatus {
    /// Listing order: In Progress < Other < Completed.
    pub(crate) fn sort_rank(self) -> u8 {
        match self {
            CourseStatus::InProgress => 0,
            CourseStatus::Other => 1,
            CourseStatus::Completed => 2,
        }
    }
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CourseStatus::InProgress => "In Progress",
            CourseStatus::Completed => "Completed",
            CourseStatus::Other => "Other",
        };
        f.write_str(s)
    }
}

impl FromStr for CourseStatus {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "In Progress" => Ok(CourseStatus::InProgress),
            "Completed" => Ok(CourseStatus::Completed),
            "Other" => Ok(CourseStatus::Other),
            other => Err(GradeError::InvalidStatus(other.to_string())),
        }
    }
}

/// A scored component: a single assignment or an assignment group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Component {
    Single(Assignment),
    Group(AssignmentGroup),
}

impl Component {
    pub fn id(&self) -> &Id {
        match self {
            Component::Single(a) => a.id(),
            Component::Group(g) => g.id(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Component::Single(a) => a.name(),
            Component::Group(g) => g.name(),
        }
    }

    pub fn summary(&self) -> Result<Summary> {
        match self {
            Component::Single(a) => Ok(a.summary()),
            Component::Group(g) => g.summary(),
        }
    }
}

/// Registry entry wrapping a component with its course-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub curved: bool,
    pub weight: f64,
    pub grouped: bool,
    pub component: Component,
}

/// The active grade-replacement record. At most one per course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClobberInfo {
    pub source: Id,
    /// Targets actually clobbered, in clobber order.
    pub targets: Vec<Id>,
}

/// Per-component listing entry, weight-descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentDetail {
    pub id: Id,
    pub name: Option<String>,
    pub weight: f64,
    pub curved: bool,
    pub grouped: bool,
    pub summary: Summary,
}

fn default_uncurved_boundaries() -> Vec<(String, f64)> {
    [
        ("A+", 0.97),
        ("A", 0.93),
        ("A-", 0.9),
        ("B+", 0.87),
        ("B", 0.83),
        ("B-", 0.8),
        ("C+", 0.77),
        ("C", 0.73),
        ("C-", 0.7),
        ("D+", 0.67),
        ("D", 0.63),
        ("D-", 0.6),
        ("F", 0.0),
    ]
    .into_iter()
    .map(|(letter, bound)| (letter.to_string(), bound))
    .collect()
}

fn default_curved_boundaries() -> Vec<(String, f64)> {
    [
        ("A+", 0.95),
        ("A", 0.77),
        ("A-", 0.65),
        ("B+", 0.45),
        ("B", 0.30),
        ("B-", 0.20),
        ("C+", 0.15),
        ("C", 0.10),
        ("C-", 0.07),
        ("D+", 0.05),
        ("D", 0.04),
        ("D-", 0.03),
        ("F", 0.0),
    ]
    .into_iter()
    .map(|(letter, bound)| (letter.to_string(), bound))
    .collect()
}

/// A course: weighted components aggregated into one grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    id: Id,
    name: String,
    /// Default pairwise correlation for component-level sigma folding and
    /// for newly created curved groups.
    corr: f64,
    status: CourseStatus,
    /// Insertion-ordered; ids resolve through linear lookup.
    components: Vec<ComponentInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clobber_info: Option<ClobberInfo>,
    /// Letter -> fraction threshold, descending.
    uncurved_boundaries: Vec<(String, f64)>,
    /// Letter -> cumulative probability, descending.
    curved_boundaries: Vec<(String, f64)>,
}

impl Course {
    pub fn new(corr: f64, name: Option<String>) -> Result<Self> {
        if !(0.0..=1.0).contains(&corr) {
            return Err(GradeError::InvalidCorrelation(corr));
        }
        Ok(Self {
            id: Id::fresh(),
            name: name.unwrap_or_else(|| "My Course".to_string()),
            corr,
            status: CourseStatus::Other,
            components: Vec::new(),
            clobber_info: None,
            uncurved_boundaries: default_uncurved_boundaries(),
            curved_boundaries: default_curved_boundaries(),
        })
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn corr(&self) -> f64 {
        self.corr
    }

    pub fn status(&self) -> CourseStatus {
        self.status
    }

    pub fn set_status(&mut self, status: CourseStatus) {
        self.status = status;
    }

    pub fn components(&self) -> &[ComponentInfo] {
        &self.components
    }

    pub fn component(&self, id: &Id) -> Option<&ComponentInfo> {
        self.components.iter().find(|info| info.component.id() == id)
    }

    pub fn clobber_info(&self) -> Option<&ClobberInfo> {
        self.clobber_info.as_ref()
    }

    /// The group behind a grouped component, for adding assignments.
    pub fn group_mut(&mut self, id: &Id) -> Option<&mut AssignmentGroup> {
        self.components.iter_mut().find_map(|info| match &mut info.component {
            Component::Group(g) if g.id() == id => Some(g),
            _ => None,
        })
    }

    /// The assignment behind a single component.
    pub fn single(&self, id: &Id) -> Option<&Assignment> {
        self.components.iter().find_map(|info| match &info.component {
            Component::Single(a) if a.id() == id => Some(a),
            _ => None,
        })
    }

    fn single_mut(&mut self, id: &Id) -> Option<&mut Assignment> {
        self.components.iter_mut().find_map(|info| match &mut info.component {
            Component::Single(a) if a.id() == id => Some(a),
            _ => None,
        })
    }

    fn check_weight(weight: f64) -> Result<()> {
        if weight <= 0.0 || weight > 1.0 {
            return Err(GradeError::InvalidWeight(weight));
        }
        Ok(())
    }

    fn default_component_name(&self, grouped: bool) -> String {
        let n = self.components.len() + 1;
        if grouped {
            format!("Grouped Assignments {n}")
        } else {
            format!("Assignment {n}")
        }
    }

    /// Add a single curved assignment counting toward the final grade.
    pub fn add_curved_single(
        &mut self,
        weight: f64,
        score: f64,
        name: Option<String>,
        upper: f64,
        mu: Option<f64>,
        sigma: Option<f64>,
    ) -> Result<Id> {
        Self::check_weight(weight)?;
        let name = name.unwrap_or_else(|| self.default_component_name(false));
        let mut assignment = Assignment::curved(score, Some(name), upper, mu, sigma)?;
        assignment.set_weight(weight);
        let id = assignment.id().clone();
        self.components.push(ComponentInfo {
            curved: true,
            weight,
            grouped: false,
            component: Component::Single(assignment),
        });
        Ok(id)
    }

    /// Add a single uncurved assignment counting toward the final grade.
    pub fn add_uncurved_single(
        &mut self,
        weight: f64,
        score: f64,
        name: Option<String>,
        upper: f64,
    ) -> Result<Id> {
        Self::check_weight(weight)?;
        let name = name.unwrap_or_else(|| self.default_component_name(false));
        let mut assignment = Assignment::uncurved(score, Some(name), upper)?;
        assignment.set_weight(weight);
        let id = assignment.id().clone();
        self.components.push(ComponentInfo {
            curved: false,
            weight,
            grouped: false,
            component: Component::Single(assignment),
        });
        Ok(id)
    }

    /// Add an empty curved group. `corr` defaults to the course's own.
    pub fn add_curved_group(
        &mut self,
        weight: f64,
        name: Option<String>,
        corr: Option<f64>,
        num_drops: usize,
    ) -> Result<Id> {
        let corr = corr.unwrap_or(self.corr);
        let name = name.unwrap_or_else(|| self.default_component_name(true));
        let group = AssignmentGroup::curved(weight, Some(name), corr, num_drops)?;
        let id = group.id().clone();
        self.components.push(ComponentInfo {
            curved: true,
            weight,
            grouped: true,
            component: Component::Group(group),
        });
        Ok(id)
    }

    /// Add an empty uncurved group.
    pub fn add_uncurved_group(
        &mut self,
        weight: f64,
        name: Option<String>,
        num_drops: usize,
    ) -> Result<Id> {
        let name = name.unwrap_or_else(|| self.default_component_name(true));
        let group = AssignmentGroup::uncurved(weight, Some(name), num_drops)?;
        let id = group.id().clone();
        self.components.push(ComponentInfo {
            curved: false,
            weight,
            grouped: true,
            component: Component::Group(group),
        });
        Ok(id)
    }

    /// Detach a component. Any active clobber is reverted first, since its
    /// source or targets may be the component being removed. No-op if the
    /// id is unknown.
    pub fn remove_component(&mut self, id: &Id) {
        if self.clobber_info.is_some() {
            self.revert_clobber();
        }
        self.components.retain(|info| info.component.id() != id);
    }

    /// Aggregate all components into the course summary.
    ///
    /// Components are classified curved/uncurved; weights are totalled
    /// incrementally and overflow past 1.0 fails early. Curved
    /// contributions are weighted into score/mu with a correlated sigma
    /// fold; uncurved contributions feed both the score and, as
    /// already-realized outcomes, the mean. The z-score is computed on the
    /// unscaled curved totals; dividing by total weight cancels out of the
    /// ratio.
    pub fn summary(&self) -> Result<Summary> {
        if self.components.is_empty() {
            return Err(GradeError::EmptyCourse);
        }

        let mut total = 0.0;
        let mut curved = Vec::new();
        let mut uncurved = Vec::new();
        for info in &self.components {
            if info.curved {
                curved.push(info);
            } else {
                uncurved.push(info);
            }
            total += info.weight;
            if total - 1.0 > WEIGHT_TOLERANCE {
                return Err(GradeError::WeightOverflow);
            }
        }
        let is_final = (total - 1.0).abs() <= WEIGHT_TOLERANCE;
        let class_curved = !curved.is_empty();

        let mut curved_score = 0.0;
        let mut curved_mu = 0.0;
        let mut curved_sigma = 0.0;
        for info in &curved {
            let component_summary = info.component.summary()?;
            curved_score += component_summary.fraction_score * info.weight;
            if let Some(stats) = &component_summary.stats {
                curved_mu += stats.fraction_mu * info.weight;
                curved_sigma = correlated_sigma_sum(
                    curved_sigma,
                    stats.fraction_sigma * info.weight,
                    self.corr,
                );
            }
        }

        let mut uncurved_score = 0.0;
        for info in &uncurved {
            let component_summary = info.component.summary()?;
            uncurved_score += component_summary.fraction_score * info.weight;
        }

        let final_score = (curved_score + uncurved_score) / total;
        let mut summary = if class_curved {
            let zscore = (curved_score - curved_mu) / curved_sigma;
            let final_mu = (curved_mu + uncurved_score) / total;
            let final_sigma = curved_sigma / total;
            Summary::curved(final_score, zscore, final_mu, final_sigma)
        } else {
            Summary::uncurved(final_score)
        };
        summary.is_final = Some(is_final);
        summary.class_curved = Some(class_curved);
        Ok(summary)
    }

    /// Letter grade for the course's current summary.
    ///
    /// Curved classes map each cumulative-probability boundary through the
    /// percent-point function of a normal(mu, sigma) truncated to [0, 1];
    /// uncurved classes use the fraction thresholds directly. The first
    /// letter (descending) whose threshold the score meets wins; the table
    /// floor is the catch-all.
    pub fn grade(&self) -> Result<String> {
        let summary = self.summary()?;
        Ok(self.grade_for(&summary))
    }

    /// The letter boundaries as fraction-score thresholds, with curved
    /// cumulative probabilities resolved through the class distribution.
    pub fn resolved_boundaries(&self) -> Result<Vec<(String, f64)>> {
        let summary = self.summary()?;
        Ok(self.boundaries_for(&summary))
    }

    fn boundaries_for(&self, summary: &Summary) -> Vec<(String, f64)> {
        match (&summary.stats, summary.class_curved) {
            (Some(stats), Some(true)) => self
                .curved_boundaries
                .iter()
                .map(|(letter, q)| {
                    (
                        letter.clone(),
                        truncnorm_ppf(*q, stats.fraction_mu, stats.fraction_sigma),
                    )
                })
                .collect(),
            _ => self.uncurved_boundaries.clone(),
        }
    }

    pub(crate) fn grade_for(&self, summary: &Summary) -> String {
        let resolved = self.boundaries_for(summary);
        let mut grade = resolved.last().map(|(letter, _)| letter.as_str()).unwrap_or("F");
        for (letter, bound) in &resolved {
            if summary.fraction_score >= *bound {
                grade = letter;
                break;
            }
        }
        grade.to_string()
    }

    /// Donate `source`'s z-score to the weakest of `targets`, up to
    /// `capacity` of them (-1 means unlimited).
    ///
    /// Source and every target must be single, curved, ungrouped
    /// components; all preconditions are checked before anything mutates.
    /// A previously active clobber is then reverted (replaced, not
    /// stacked). Targets are clobbered weakest-first, ties broken by their
    /// position in `targets`, and only while the donation actually raises
    /// the target's standing.
    pub fn apply_clobber(&mut self, source: &Id, targets: &[Id], capacity: i64) -> Result<()> {
        if targets.contains(source) {
            return Err(GradeError::ClobberSourceInTargets);
        }
        let source_info = self
            .component(source)
            .ok_or(GradeError::ClobberSourceNotFound)?;
        if !source_info.curved {
            return Err(GradeError::ClobberSourceNotCurved);
        }
        if source_info.grouped {
            return Err(GradeError::ClobberSourceGrouped);
        }
        for (index, target) in targets.iter().enumerate() {
            let info = self
                .component(target)
                .ok_or(GradeError::ClobberTargetNotFound(index))?;
            if !info.curved {
                return Err(GradeError::ClobberTargetNotCurved(index));
            }
            if info.grouped {
                return Err(GradeError::ClobberTargetGrouped(index));
            }
        }

        // Fully validated; replace any active clobber.
        if self.clobber_info.is_some() {
            self.revert_clobber();
        }

        let z_source = match self.single(source) {
            Some(a) => a.zscore(),
            None => return Err(GradeError::ClobberSourceNotFound),
        };
        let mut pool: Vec<(Id, f64)> = targets
            .iter()
            .filter_map(|id| self.single(id).map(|a| (id.clone(), a.zscore())))
            .collect();

        let mut capacity = if capacity < 0 { pool.len() } else { capacity as usize };
        let mut clobbered = Vec::new();
        while capacity > 0 && !pool.is_empty() {
            let mut min_index = 0;
            let mut min_z = pool[0].1;
            for (i, (_, z)) in pool.iter().enumerate().skip(1) {
                if *z < min_z {
                    min_index = i;
                    min_z = *z;
                }
            }
            // Donation no longer helps anyone left in the pool
            if min_z >= z_source {
                break;
            }
            let (id, _) = pool.remove(min_index);
            if let Some(assignment) = self.single_mut(&id) {
                assignment.apply_clobber(z_source);
            }
            clobbered.push(id);
            capacity -= 1;
        }

        tracing::debug!(
            source = %source,
            clobbered = clobbered.len(),
            "applied clobber"
        );
        self.clobber_info = Some(ClobberInfo {
            source: source.clone(),
            targets: clobbered,
        });
        Ok(())
    }

    /// Revert every clobbered target and clear the record. No-op when no
    /// clobber is active.
    pub fn revert_clobber(&mut self) {
        let Some(info) = self.clobber_info.take() else {
            return;
        };
        for id in &info.targets {
            if let Some(assignment) = self.single_mut(id) {
                assignment.revert_clobber();
            }
        }
        tracing::debug!(source = %info.source, "reverted clobber");
    }

    /// Per-component listing sorted by weight descending. Failing
    /// components carry their error in the summary slot rather than
    /// aborting the listing.
    pub fn detail(&self) -> Result<Vec<ComponentDetail>> {
        if self.components.is_empty() {
            return Err(GradeError::EmptyCourse);
        }
        let mut detail: Vec<ComponentDetail> = self
            .components
            .iter()
            .map(|info| ComponentDetail {
                id: info.component.id().clone(),
                name: info.component.name().map(str::to_string),
                weight: info.weight,
                curved: info.curved,
                grouped: info.grouped,
                summary: info
                    .component
                    .summary()
                    .unwrap_or_else(|e| Summary::from_error(e.to_string())),
            })
            .collect();
        detail.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn course() -> Course {
        Course::new(0.6, Some("Test Course".into())).unwrap()
    }

    #[test]
    fn status_parse_and_display() {
        assert_eq!("In Progress".parse::<CourseStatus>().unwrap(), CourseStatus::InProgress);
        assert_eq!(CourseStatus::Completed.to_string(), "Completed");
        assert_eq!(
            "in progress".parse::<CourseStatus>().unwrap_err(),
            GradeError::InvalidStatus("in progress".into())
        );
    }

    #[test]
    fn invalid_corr_is_rejected() {
        assert_eq!(
            Course::new(1.5, None).unwrap_err(),
            GradeError::InvalidCorrelation(1.5)
        );
    }

    #[test]
    fn factory_weight_validation_is_eager() {
        let mut c = course();
        assert_eq!(
            c.add_uncurved_single(0.0, 50.0, None, 100.0).unwrap_err(),
            GradeError::InvalidWeight(0.0)
        );
        assert_eq!(
            c.add_curved_group(1.2, None, None, 0).unwrap_err(),
            GradeError::InvalidWeight(1.2)
        );
        assert!(c.components().is_empty());
    }

    #[test]
    fn empty_course_summary_fails() {
        assert_eq!(course().summary().unwrap_err(), GradeError::EmptyCourse);
    }

    #[test]
    fn single_uncurved_component_full_weight() {
        let mut c = course();
        c.add_uncurved_single(1.0, 90.0, None, 100.0).unwrap();
        let summary = c.summary().unwrap();
        assert!(close(summary.fraction_score, 0.9));
        assert_eq!(summary.is_final, Some(true));
        assert_eq!(summary.class_curved, Some(false));
        assert!(summary.stats.is_none());
        assert_eq!(c.grade().unwrap(), "A-");
    }

    #[test]
    fn partial_weights_are_not_final() {
        let mut c = course();
        c.add_uncurved_single(0.4, 80.0, None, 100.0).unwrap();
        let summary = c.summary().unwrap();
        // Score renormalized by total weight
        assert!(close(summary.fraction_score, 0.8));
        assert_eq!(summary.is_final, Some(false));
    }

    #[test]
    fn weight_overflow_fails_deterministically() {
        let mut c = course();
        c.add_uncurved_single(0.6, 80.0, None, 100.0).unwrap();
        c.add_uncurved_single(0.5, 80.0, None, 100.0).unwrap();
        assert_eq!(c.summary().unwrap_err(), GradeError::WeightOverflow);
        // Regardless of insertion order
        let mut c = course();
        c.add_uncurved_single(0.5, 80.0, None, 100.0).unwrap();
        c.add_uncurved_single(0.6, 80.0, None, 100.0).unwrap();
        assert_eq!(c.summary().unwrap_err(), GradeError::WeightOverflow);
    }

    #[test]
    fn float_noise_in_complete_weights_is_tolerated() {
        let mut c = course();
        for _ in 0..10 {
            c.add_uncurved_single(0.1, 70.0, None, 100.0).unwrap();
        }
        let summary = c.summary().unwrap();
        assert_eq!(summary.is_final, Some(true));
    }

    #[test]
    fn mixed_aggregation_folds_uncurved_into_mu() {
        let mut c = course();
        c.add_curved_single(0.5, 80.0, None, 100.0, Some(70.0), Some(10.0))
            .unwrap();
        c.add_uncurved_single(0.5, 90.0, None, 100.0).unwrap();

        let summary = c.summary().unwrap();
        let stats = summary.stats.expect("curved course has stats");
        // score = (0.8*0.5 + 0.9*0.5) / 1.0
        assert!(close(summary.fraction_score, 0.85));
        // mu = (0.7*0.5 + 0.9*0.5) / 1.0: uncurved feeds the mean
        assert!(close(stats.fraction_mu, 0.8));
        // sigma = 0.1*0.5 / 1.0
        assert!(close(stats.fraction_sigma, 0.05));
        // zscore from unscaled curved totals: (0.4 - 0.35) / 0.05
        assert!(close(stats.zscore, 1.0));
        assert_eq!(summary.class_curved, Some(true));
        assert_eq!(summary.is_final, Some(true));
    }

    #[test]
    fn two_curved_components_combine_sigmas_with_course_corr() {
        let mut c = Course::new(1.0, None).unwrap();
        c.add_curved_single(0.5, 80.0, None, 100.0, Some(70.0), Some(10.0))
            .unwrap();
        c.add_curved_single(0.5, 60.0, None, 100.0, Some(50.0), Some(20.0))
            .unwrap();

        let stats = c.summary().unwrap().stats.unwrap();
        // corr = 1: fold is additive over weighted sigmas: 0.05 + 0.10
        assert!(close(stats.fraction_sigma, 0.15));
    }

    #[test]
    fn empty_group_failure_propagates_through_summary() {
        let mut c = course();
        c.add_uncurved_group(0.5, None, 0).unwrap();
        assert_eq!(c.summary().unwrap_err(), GradeError::EmptyGroup);
    }

    #[test]
    fn detail_captures_component_errors_and_sorts_by_weight() {
        let mut c = course();
        c.add_uncurved_single(0.2, 80.0, None, 100.0).unwrap();
        c.add_uncurved_group(0.5, None, 0).unwrap();

        let detail = c.detail().unwrap();
        assert_eq!(detail.len(), 2);
        // Heaviest first
        assert!(close(detail[0].weight, 0.5));
        assert!(detail[0].grouped);
        assert!(detail[0].summary.is_error());
        assert!(!detail[1].summary.is_error());
    }

    #[test]
    fn resolved_boundaries_follow_the_class_distribution() {
        let mut c = course();
        c.add_curved_single(1.0, 70.0, None, 100.0, Some(70.0), Some(10.0))
            .unwrap();
        let boundaries = c.resolved_boundaries().unwrap();

        // Descending thresholds, floor at zero
        for pair in boundaries.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
        let (floor_letter, floor_bound) = boundaries.last().unwrap();
        assert_eq!(floor_letter, "F");
        assert!((floor_bound - 0.0).abs() < 1e-6);
    }

    #[test]
    fn grade_uses_curved_boundaries_through_the_truncated_normal() {
        let mut c = course();
        // Exactly at the mean of the class distribution
        c.add_curved_single(1.0, 70.0, None, 100.0, Some(70.0), Some(10.0))
            .unwrap();
        // Median of a symmetric truncated normal is mu; the A- boundary
        // (q = 0.65) sits above it and B+ (q = 0.45) below.
        let grade = c.grade().unwrap();
        assert_eq!(grade, "B+");
    }

    #[test]
    fn strong_curved_score_earns_a_top_grade() {
        let mut c = course();
        c.add_curved_single(1.0, 98.0, None, 100.0, Some(70.0), Some(10.0))
            .unwrap();
        // z = 2.8; well past the A+ boundary of the class distribution
        assert_eq!(c.grade().unwrap(), "A+");
    }

    #[test]
    fn failing_scores_fall_through_to_f() {
        let mut c = course();
        c.add_uncurved_single(1.0, 10.0, None, 100.0).unwrap();
        assert_eq!(c.grade().unwrap(), "F");
    }

    // ----- clobber -----

    fn clobber_course() -> (Course, Id, Id, Id) {
        let mut c = course();
        let source = c
            .add_curved_single(0.3, 90.0, Some("Final".into()), 100.0, Some(70.0), Some(10.0))
            .unwrap();
        let t1 = c
            .add_curved_single(0.3, 60.0, Some("Midterm 1".into()), 100.0, Some(70.0), Some(10.0))
            .unwrap();
        let t2 = c
            .add_curved_single(0.3, 75.0, Some("Midterm 2".into()), 100.0, Some(70.0), Some(10.0))
            .unwrap();
        (c, source, t1, t2)
    }

    #[test]
    fn clobber_targets_weakest_first_under_capacity() {
        // source z = 2.0, t1 z = -1.0, t2 z = 0.5
        let (mut c, source, t1, t2) = clobber_course();
        c.apply_clobber(&source, &[t1.clone(), t2.clone()], 1).unwrap();

        let info = c.clobber_info().unwrap();
        assert_eq!(info.targets, vec![t1.clone()]);
        assert!(close(c.single(&t1).unwrap().zscore(), 2.0));
        assert!(close(c.single(&t2).unwrap().zscore(), 0.5));
    }

    #[test]
    fn unlimited_capacity_clobbers_all_weaker_targets() {
        let (mut c, source, t1, t2) = clobber_course();
        c.apply_clobber(&source, &[t1.clone(), t2.clone()], -1).unwrap();

        let info = c.clobber_info().unwrap();
        assert_eq!(info.targets, vec![t1.clone(), t2.clone()]);
        assert!(close(c.single(&t2).unwrap().zscore(), 2.0));
        // score recomputed from donated z: 2.0 * 0.1 + 0.7
        assert!(close(c.single(&t2).unwrap().score(), 0.9));
    }

    #[test]
    fn clobber_skips_targets_already_at_or_above_source() {
        let (mut c, _source, t1, t2) = clobber_course();
        let strong = c
            .add_curved_single(0.1, 99.0, None, 100.0, Some(50.0), Some(10.0))
            .unwrap();
        c.apply_clobber(&t2, &[strong.clone(), t1.clone()], -1).unwrap();

        // strong (z = 4.9) is not clobbered by t2 (z = 0.5); t1 is
        assert_eq!(c.clobber_info().unwrap().targets, vec![t1.clone()]);
        assert!(!c.single(&strong).unwrap().clobbered());
    }

    #[test]
    fn clobber_precondition_errors_are_distinct() {
        let (mut c, source, t1, _) = clobber_course();
        let uncurved = c.add_uncurved_single(0.05, 80.0, None, 100.0).unwrap();
        let group = c.add_curved_group(0.05, None, None, 0).unwrap();

        assert_eq!(
            c.apply_clobber(&source, &[source.clone()], -1).unwrap_err(),
            GradeError::ClobberSourceInTargets
        );
        assert_eq!(
            c.apply_clobber(&Id::from("missing"), &[t1.clone()], -1).unwrap_err(),
            GradeError::ClobberSourceNotFound
        );
        assert_eq!(
            c.apply_clobber(&uncurved, &[t1.clone()], -1).unwrap_err(),
            GradeError::ClobberSourceNotCurved
        );
        assert_eq!(
            c.apply_clobber(&group, &[t1.clone()], -1).unwrap_err(),
            GradeError::ClobberSourceGrouped
        );
        assert_eq!(
            c.apply_clobber(&source, &[t1.clone(), Id::from("missing")], -1)
                .unwrap_err(),
            GradeError::ClobberTargetNotFound(1)
        );
        assert_eq!(
            c.apply_clobber(&source, &[uncurved.clone()], -1).unwrap_err(),
            GradeError::ClobberTargetNotCurved(0)
        );
        assert_eq!(
            c.apply_clobber(&source, &[group.clone()], -1).unwrap_err(),
            GradeError::ClobberTargetGrouped(0)
        );
        // Nothing mutated by any of the failures
        assert!(c.clobber_info().is_none());
        assert!(!c.single(&t1).unwrap().clobbered());
    }

    #[test]
    fn new_clobber_replaces_the_previous_one() {
        let (mut c, source, t1, t2) = clobber_course();
        c.apply_clobber(&source, &[t1.clone()], -1).unwrap();
        assert!(close(c.single(&t1).unwrap().zscore(), 2.0));

        // Second clobber over t2 reverts t1 first
        c.apply_clobber(&source, &[t2.clone()], -1).unwrap();
        assert!(close(c.single(&t1).unwrap().zscore(), -1.0));
        assert!(close(c.single(&t2).unwrap().zscore(), 2.0));
        assert_eq!(c.clobber_info().unwrap().targets, vec![t2.clone()]);
    }

    #[test]
    fn revert_clobber_restores_and_is_idempotent() {
        let (mut c, source, t1, t2) = clobber_course();
        c.apply_clobber(&source, &[t1.clone(), t2.clone()], -1).unwrap();
        c.revert_clobber();

        assert!(c.clobber_info().is_none());
        assert!(close(c.single(&t1).unwrap().zscore(), -1.0));
        assert!(close(c.single(&t2).unwrap().zscore(), 0.5));

        // Second revert is a no-op
        c.revert_clobber();
        assert!(c.clobber_info().is_none());
    }

    #[test]
    fn remove_component_reverts_active_clobber() {
        let (mut c, source, t1, t2) = clobber_course();
        c.apply_clobber(&source, &[t1.clone()], -1).unwrap();
        c.remove_component(&source);

        assert!(c.clobber_info().is_none());
        assert!(close(c.single(&t1).unwrap().zscore(), -1.0));
        assert!(c.single(&t2).is_some());
        assert!(c.component(&source).is_none());
    }

    #[test]
    fn serde_round_trip_with_active_clobber() {
        let (mut c, source, t1, t2) = clobber_course();
        c.add_curved_group(0.05, Some("Quizzes".into()), Some(0.3), 1)
            .unwrap();
        let group_id = c.components().last().unwrap().component.id().clone();
        c.group_mut(&group_id)
            .unwrap()
            .add_assignment(8.0, None, 10.0, Some(6.0), Some(1.0))
            .unwrap();
        c.set_status(CourseStatus::InProgress);
        c.apply_clobber(&source, &[t1.clone(), t2.clone()], 1).unwrap();

        let json = serde_json::to_string(&c).unwrap();
        let back: Course = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
        assert_eq!(back.summary().unwrap(), c.summary().unwrap());
        assert_eq!(back.grade().unwrap(), c.grade().unwrap());

        // The restored clobber still reverts cleanly
        let mut back = back;
        back.revert_clobber();
        assert!(close(back.single(&t1).unwrap().zscore(), -1.0));
    }
}
