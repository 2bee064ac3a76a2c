//! TOML course-definition parser.
//!
//! Loads course definitions from TOML files and directories, and validates
//! them. All construction goes through the `Course` factory methods, so
//! every engine validation rule applies to parsed input.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::course::{Course, CourseStatus};
use crate::profile::DEFAULT_CORR;

/// Intermediate TOML structure for parsing course definition files.
#[derive(Debug, Deserialize)]
struct TomlCourseFile {
    course: TomlCourseHeader,
    #[serde(default)]
    components: Vec<TomlComponent>,
}

#[derive(Debug, Deserialize)]
struct TomlCourseHeader {
    name: String,
    #[serde(default = "default_corr")]
    corr: f64,
    #[serde(default)]
    status: Option<String>,
}

fn default_corr() -> f64 {
    DEFAULT_CORR
}

fn default_upper() -> f64 {
    100.0
}

#[derive(Debug, Deserialize)]
struct TomlComponent {
    /// One of "curved_single", "uncurved_single", "curved_group",
    /// "uncurved_group".
    kind: String,
    #[serde(default)]
    name: Option<String>,
    weight: f64,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default = "default_upper")]
    upper: f64,
    #[serde(default)]
    mu: Option<f64>,
    #[serde(default)]
    sigma: Option<f64>,
    #[serde(default)]
    corr: Option<f64>,
    #[serde(default)]
    num_drops: usize,
    #[serde(default)]
    assignments: Vec<TomlAssignment>,
}

#[derive(Debug, Deserialize)]
struct TomlAssignment {
    #[serde(default)]
    name: Option<String>,
    score: f64,
    #[serde(default = "default_upper")]
    upper: f64,
    #[serde(default)]
    mu: Option<f64>,
    #[serde(default)]
    sigma: Option<f64>,
}

/// Parse a single TOML file into a `Course`.
pub fn parse_course(path: &Path) -> Result<Course> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read course file: {}", path.display()))?;
    parse_course_str(&content, path)
}

/// Parse a TOML string into a `Course` (useful for testing).
pub fn parse_course_str(content: &str, source_path: &Path) -> Result<Course> {
    let parsed: TomlCourseFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut course = Course::new(parsed.course.corr, Some(parsed.course.name))?;
    if let Some(status) = parsed.course.status {
        course.set_status(CourseStatus::from_str(&status)?);
    }

    for component in parsed.components {
        let name = component.name.clone();
        match component.kind.as_str() {
            "curved_single" => {
                let score = component
                    .score
                    .with_context(|| missing_field(&component, "score"))?;
                course.add_curved_single(
                    component.weight,
                    score,
                    name,
                    component.upper,
                    component.mu,
                    component.sigma,
                )?;
            }
            "uncurved_single" => {
                let score = component
                    .score
                    .with_context(|| missing_field(&component, "score"))?;
                course.add_uncurved_single(component.weight, score, name, component.upper)?;
            }
            "curved_group" => {
                let id = course.add_curved_group(
                    component.weight,
                    name,
                    component.corr,
                    component.num_drops,
                )?;
                if let Some(group) = course.group_mut(&id) {
                    for a in component.assignments {
                        group.add_assignment(a.score, a.name, a.upper, a.mu, a.sigma)?;
                    }
                }
            }
            "uncurved_group" => {
                let id =
                    course.add_uncurved_group(component.weight, name, component.num_drops)?;
                if let Some(group) = course.group_mut(&id) {
                    for a in component.assignments {
                        group.add_assignment(a.score, a.name, a.upper, a.mu, a.sigma)?;
                    }
                }
            }
            other => anyhow::bail!("unknown component kind: {other}"),
        }
    }

    Ok(course)
}

fn missing_field(component: &TomlComponent, field: &str) -> String {
    match &component.name {
        Some(name) => format!("component '{name}' is missing required field '{field}'"),
        None => format!("{} component is missing required field '{field}'", component.kind),
    }
}

/// Recursively load all `.toml` course files from a directory.
pub fn load_course_directory(dir: &Path) -> Result<Vec<Course>> {
    let mut courses = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            courses.extend(load_course_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_course(&path) {
                Ok(course) => courses.push(course),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(courses)
}

/// A warning from course validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The component name (if applicable).
    pub component: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a course for common issues that parse fine but aggregate badly.
pub fn validate_course(course: &Course) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let total: f64 = course.components().iter().map(|info| info.weight).sum();
    if total > 1.0 + 1e-9 {
        warnings.push(ValidationWarning {
            component: None,
            message: format!("component weights sum to {total:.2}, exceeding 1.0"),
        });
    } else if (total - 1.0).abs() > 1e-9 {
        warnings.push(ValidationWarning {
            component: None,
            message: format!(
                "component weights sum to {total:.2}; the summary will not be final"
            ),
        });
    }

    for info in course.components() {
        if let crate::course::Component::Group(group) = &info.component {
            if group.is_empty() {
                warnings.push(ValidationWarning {
                    component: group.name().map(str::to_string),
                    message: "group has no assignments".into(),
                });
            } else if group.len() <= group.num_drops() {
                warnings.push(ValidationWarning {
                    component: group.name().map(str::to_string),
                    message: format!(
                        "group has {} assignments but {} drops; nothing will be dropped yet",
                        group.len(),
                        group.num_drops()
                    ),
                });
            }
        }
    }

    // Duplicate component names confuse by-name lookups
    let mut seen = std::collections::HashSet::new();
    for info in course.components() {
        if let Some(name) = info.component.name() {
            if !seen.insert(name) {
                warnings.push(ValidationWarning {
                    component: Some(name.to_string()),
                    message: format!("duplicate component name: {name}"),
                });
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[course]
name = "Data Structures"
corr = 0.6
status = "In Progress"

[[components]]
kind = "curved_single"
name = "Midterm 1"
weight = 0.2
score = 82
mu = 65.5
sigma = 14.2

[[components]]
kind = "uncurved_group"
name = "Homework"
weight = 0.3
num_drops = 1

[[components.assignments]]
score = 9
upper = 10

[[components.assignments]]
score = 7
upper = 10

[[components]]
kind = "curved_group"
name = "Quizzes"
weight = 0.5
corr = 0.4

[[components.assignments]]
score = 18
upper = 20
mu = 14
sigma = 3
"#;

    #[test]
    fn parse_valid_toml() {
        let course = parse_course_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(course.name(), "Data Structures");
        assert_eq!(course.status(), CourseStatus::InProgress);
        assert_eq!(course.components().len(), 3);

        let summary = course.summary().unwrap();
        assert_eq!(summary.is_final, Some(true));
        assert_eq!(summary.class_curved, Some(true));
    }

    #[test]
    fn parse_applies_defaults() {
        let toml = r#"
[course]
name = "Minimal"

[[components]]
kind = "uncurved_single"
weight = 0.5
score = 45
upper = 50
"#;
        let course = parse_course_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(course.corr(), DEFAULT_CORR);
        assert_eq!(course.status(), CourseStatus::Other);
        // Unnamed components are auto-named by the factory
        assert_eq!(course.components()[0].component.name(), Some("Assignment 1"));
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        let toml = r#"
[course]
name = "Broken"

[[components]]
kind = "weighted_single"
weight = 0.5
score = 45
"#;
        let err = parse_course_str(toml, &PathBuf::from("test.toml")).unwrap_err();
        assert!(err.to_string().contains("unknown component kind"));
    }

    #[test]
    fn parse_rejects_curved_single_without_stats() {
        let toml = r#"
[course]
name = "Broken"

[[components]]
kind = "curved_single"
name = "Midterm"
weight = 0.5
score = 45
"#;
        let err = parse_course_str(toml, &PathBuf::from("test.toml")).unwrap_err();
        assert!(err
            .to_string()
            .contains("curved assignment must have mean and standard deviation"));
    }

    #[test]
    fn parse_rejects_missing_score() {
        let toml = r#"
[course]
name = "Broken"

[[components]]
kind = "uncurved_single"
name = "Final"
weight = 0.5
"#;
        let err = parse_course_str(toml, &PathBuf::from("test.toml")).unwrap_err();
        assert!(err.to_string().contains("missing required field 'score'"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_course_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("course.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let courses = load_course_directory(dir.path()).unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].name(), "Data Structures");
    }

    #[test]
    fn validate_flags_incomplete_weights() {
        let toml = r#"
[course]
name = "Partial"

[[components]]
kind = "uncurved_single"
weight = 0.4
score = 80
"#;
        let course = parse_course_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_course(&course);
        assert!(warnings.iter().any(|w| w.message.contains("not be final")));
    }

    #[test]
    fn validate_flags_empty_groups_and_duplicates() {
        let toml = r#"
[course]
name = "Sloppy"

[[components]]
kind = "uncurved_group"
name = "Homework"
weight = 0.5

[[components]]
kind = "uncurved_single"
name = "Homework"
weight = 0.5
score = 80
"#;
        let course = parse_course_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_course(&course);
        assert!(warnings.iter().any(|w| w.message.contains("no assignments")));
        assert!(warnings.iter().any(|w| w.message.contains("duplicate component name")));
    }
}
