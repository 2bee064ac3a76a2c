//! Profiles: a user's collection of courses, with JSON persistence.
//!
//! The profile sits at the top of the ownership hierarchy. Persistence is a
//! plain serde round trip; an imported profile is observably identical to
//! the exported one, including ids and active clobber state.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::course::{Course, CourseStatus};
use crate::error::{GradeError, Result};
use crate::id::Id;
use crate::summary::Summary;

/// Default pairwise correlation for new courses.
pub const DEFAULT_CORR: f64 = 0.6;

/// Per-course listing entry, ordered In Progress < Other < Completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDetail {
    pub id: Id,
    pub name: String,
    pub status: CourseStatus,
    pub summary: Summary,
}

/// A user's courses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Insertion-ordered; ids resolve through linear lookup.
    courses: Vec<Course>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Create a new course. Unnamed courses get "Course {n+1}".
    pub fn add_course(&mut self, corr: f64, name: Option<String>) -> Result<Id> {
        let name = name.unwrap_or_else(|| format!("Course {}", self.courses.len() + 1));
        let course = Course::new(corr, Some(name))?;
        let id = course.id().clone();
        self.courses.push(course);
        Ok(id)
    }

    /// Adopt an already-built course (e.g. parsed from a definition file).
    pub fn insert_course(&mut self, course: Course) -> Id {
        let id = course.id().clone();
        self.courses.push(course);
        id
    }

    /// Detach a course. No-op if the id is unknown.
    pub fn remove_course(&mut self, id: &Id) {
        self.courses.retain(|c| c.id() != id);
    }

    pub fn course(&self, id: &Id) -> Option<&Course> {
        self.courses.iter().find(|c| c.id() == id)
    }

    pub fn course_mut(&mut self, id: &Id) -> Option<&mut Course> {
        self.courses.iter_mut().find(|c| c.id() == id)
    }

    /// Resolve a course by id or, failing that, by exact name. External
    /// layers hand over whichever token they have.
    pub fn find_course(&self, key: &str) -> Option<&Course> {
        self.courses
            .iter()
            .find(|c| c.id().as_str() == key)
            .or_else(|| self.courses.iter().find(|c| c.name() == key))
    }

    pub fn find_course_mut(&mut self, key: &str) -> Option<&mut Course> {
        if self.courses.iter().any(|c| c.id().as_str() == key) {
            return self.courses.iter_mut().find(|c| c.id().as_str() == key);
        }
        self.courses.iter_mut().find(|c| c.name() == key)
    }

    /// Per-course listing. Each entry carries the course summary with the
    /// letter grade filled in, or the captured aggregation error. Fails
    /// only when the profile has no courses at all.
    pub fn detail(&self) -> Result<Vec<CourseDetail>> {
        if self.courses.is_empty() {
            return Err(GradeError::EmptyProfile);
        }
        let mut detail: Vec<CourseDetail> = self
            .courses
            .iter()
            .map(|course| {
                let summary = match course.summary() {
                    Ok(mut summary) => {
                        summary.grade = Some(course.grade_for(&summary));
                        summary
                    }
                    Err(e) => Summary::from_error(e.to_string()),
                };
                CourseDetail {
                    id: course.id().clone(),
                    name: course.name().to_string(),
                    status: course.status(),
                    summary,
                }
            })
            .collect();
        detail.sort_by_key(|entry| entry.status.sort_rank());
        Ok(detail)
    }

    /// Save the profile as JSON.
    pub fn save_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize profile")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write profile to {}", path.display()))?;
        Ok(())
    }

    /// Load a profile from a JSON file.
    pub fn load_json(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read profile from {}", path.display()))?;
        let profile: Profile =
            serde_json::from_str(&content).context("failed to parse profile JSON")?;
        Ok(profile)
    }
}
