//! Markdown rendering for course and profile reports.

use chrono::{DateTime, Utc};

use gradebook_core::course::{Component, Course};
use gradebook_core::profile::Profile;
use gradebook_core::summary::Summary;

fn summary_score_cell(summary: &Summary) -> String {
    match &summary.error_message {
        Some(message) => format!("— ({message})"),
        None => summary.display_percentage.clone(),
    }
}

fn zscore_cell(summary: &Summary) -> String {
    summary
        .stats
        .as_ref()
        .map(|stats| format!("{:+.2}", stats.zscore))
        .unwrap_or_else(|| "—".to_string())
}

/// Render a full course report: summary block, grade, component table, and
/// per-group assignment tables. Aggregation failures are rendered inline
/// rather than aborting the report.
pub fn course_report(course: &Course, generated_at: DateTime<Utc>) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", course.name()));
    md.push_str(&format!(
        "Status: {} · Generated: {}\n\n",
        course.status(),
        generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    match course.summary() {
        Ok(summary) => {
            let grade = course.grade().unwrap_or_else(|_| "—".to_string());
            md.push_str(&format!(
                "**Overall:** {} (grade {})\n\n",
                summary.display_percentage, grade
            ));
            if let Some(stats) = &summary.stats {
                md.push_str(&format!(
                    "Class distribution: mu {} · sigma {} · z-score {:+.2}\n\n",
                    stats.display_mu, stats.display_sigma, stats.zscore
                ));
            }
            if summary.is_final == Some(false) {
                md.push_str("_Component weights do not yet sum to 1.0; this is a projection._\n\n");
            }
        }
        Err(e) => {
            md.push_str(&format!("**Overall:** not available ({e})\n\n"));
        }
    }

    if let Ok(detail) = course.detail() {
        md.push_str("| Component | Weight | Score | Z-score | Kind |\n");
        md.push_str("|-----------|--------|-------|---------|------|\n");
        for entry in &detail {
            let kind = match (entry.curved, entry.grouped) {
                (true, true) => "curved group",
                (true, false) => "curved",
                (false, true) => "group",
                (false, false) => "uncurved",
            };
            md.push_str(&format!(
                "| {} | {:.0}% | {} | {} | {} |\n",
                entry.name.as_deref().unwrap_or("(unnamed)"),
                entry.weight * 100.0,
                summary_score_cell(&entry.summary),
                zscore_cell(&entry.summary),
                kind
            ));
        }
        md.push('\n');
    }

    if let Ok(boundaries) = course.resolved_boundaries() {
        md.push_str("## Grade boundaries\n\n");
        let line: Vec<String> = boundaries
            .iter()
            .map(|(letter, bound)| format!("{letter} ≥ {:.1}%", bound * 100.0))
            .collect();
        md.push_str(&line.join(" · "));
        md.push_str("\n\n");
    }

    for info in course.components() {
        if let Component::Group(group) = &info.component {
            let Ok(assignments) = group.detail() else {
                continue;
            };
            md.push_str(&format!(
                "## {}\n\n",
                group.name().unwrap_or("(unnamed group)")
            ));
            md.push_str("| Assignment | Score | Z-score |\n");
            md.push_str("|------------|-------|---------|\n");
            for entry in &assignments {
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    entry.name.as_deref().unwrap_or("(unnamed)"),
                    summary_score_cell(&entry.summary),
                    zscore_cell(&entry.summary)
                ));
            }
            md.push('\n');
        }
    }

    md
}

/// Render a profile overview: one status-ordered row per course.
pub fn profile_report(profile: &Profile, generated_at: DateTime<Utc>) -> String {
    let mut md = String::new();
    md.push_str("# Courses\n\n");
    md.push_str(&format!(
        "Generated: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    match profile.detail() {
        Ok(detail) => {
            md.push_str("| Course | Status | Score | Grade |\n");
            md.push_str("|--------|--------|-------|-------|\n");
            for entry in &detail {
                md.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    entry.name,
                    entry.status,
                    summary_score_cell(&entry.summary),
                    entry.summary.grade.as_deref().unwrap_or("—")
                ));
            }
        }
        Err(e) => {
            md.push_str(&format!("_{e}._\n"));
        }
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gradebook_core::profile::DEFAULT_CORR;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 12, 9, 30, 0).unwrap()
    }

    #[test]
    fn course_report_contains_components_and_grade() {
        let mut course = Course::new(0.6, Some("Algorithms".into())).unwrap();
        course.add_uncurved_single(1.0, 91.0, Some("Final".into()), 100.0).unwrap();

        let md = course_report(&course, fixed_time());
        assert!(md.contains("# Algorithms"));
        assert!(md.contains("91.00%"));
        assert!(md.contains("grade A-"));
        assert!(md.contains("| Final |"));
        assert!(md.contains("2025-05-12"));
        assert!(md.contains("## Grade boundaries"));
        assert!(md.contains("A+ ≥ 97.0%"));
    }

    #[test]
    fn course_report_renders_group_tables_and_errors() {
        let mut course = Course::new(0.6, Some("Systems".into())).unwrap();
        let id = course
            .add_uncurved_group(0.5, Some("Labs".into()), 0)
            .unwrap();
        course
            .group_mut(&id)
            .unwrap()
            .add_assignment(18.0, Some("Lab 1".into()), 20.0, None, None)
            .unwrap();
        course.add_uncurved_group(0.3, Some("Empty".into()), 0).unwrap();

        let md = course_report(&course, fixed_time());
        assert!(md.contains("## Labs"));
        assert!(md.contains("| Lab 1 |"));
        // The empty group's failure shows up inline in the component table
        assert!(md.contains("no assignments in this group"));
    }

    #[test]
    fn profile_report_lists_courses_in_status_order() {
        let mut profile = Profile::new();
        let id = profile.add_course(DEFAULT_CORR, Some("Compilers".into())).unwrap();
        profile
            .course_mut(&id)
            .unwrap()
            .add_uncurved_single(1.0, 85.0, None, 100.0)
            .unwrap();

        let md = profile_report(&profile, fixed_time());
        assert!(md.contains("| Compilers | Other | 85.00% | B |"));
    }

    #[test]
    fn empty_profile_report_degrades_gracefully() {
        let md = profile_report(&Profile::new(), fixed_time());
        assert!(md.contains("no courses in this profile"));
    }
}
