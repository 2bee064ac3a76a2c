//! The `gradebook detail` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use gradebook_core::course::Component;
use gradebook_core::profile::Profile;
use gradebook_core::summary::Summary;

fn score_cell(summary: &Summary) -> String {
    match &summary.error_message {
        Some(message) => message.clone(),
        None => summary.display_percentage.clone(),
    }
}

fn zscore_cell(summary: &Summary) -> String {
    summary
        .stats
        .as_ref()
        .map(|stats| format!("{:+.2}", stats.zscore))
        .unwrap_or_else(|| "—".into())
}

pub fn execute(profile_path: PathBuf, course_key: String, markdown: bool) -> Result<()> {
    let profile = Profile::load_json(&profile_path)?;
    let course = profile
        .find_course(&course_key)
        .with_context(|| format!("course not found: {course_key}"))?;

    if markdown {
        print!(
            "{}",
            gradebook_report::markdown::course_report(course, chrono::Utc::now())
        );
        return Ok(());
    }

    println!("{} ({})", course.name(), course.status());
    match course.summary() {
        Ok(summary) => {
            let grade = course.grade().unwrap_or_else(|_| "—".into());
            println!("Overall: {} (grade {grade})", summary.display_percentage);
        }
        Err(e) => println!("Overall: not available ({e})"),
    }

    let detail = match course.detail() {
        Ok(detail) => detail,
        Err(e) => {
            println!("{e}.");
            return Ok(());
        }
    };

    let mut table = Table::new();
    table.set_header(vec!["Id", "Component", "Weight", "Score", "Z-score", "Kind"]);
    for entry in &detail {
        let kind = match (entry.curved, entry.grouped) {
            (true, true) => "curved group",
            (true, false) => "curved",
            (false, true) => "group",
            (false, false) => "uncurved",
        };
        table.add_row(vec![
            Cell::new(entry.id.as_str()),
            Cell::new(entry.name.as_deref().unwrap_or("(unnamed)")),
            Cell::new(format!("{:.0}%", entry.weight * 100.0)),
            Cell::new(score_cell(&entry.summary)),
            Cell::new(zscore_cell(&entry.summary)),
            Cell::new(kind),
        ]);
    }
    println!("{table}");

    // Drill into each group
    for info in course.components() {
        let Component::Group(group) = &info.component else {
            continue;
        };
        let Ok(assignments) = group.detail() else {
            continue;
        };
        println!("\n{}:", group.name().unwrap_or("(unnamed group)"));
        let mut table = Table::new();
        table.set_header(vec!["Assignment", "Score", "Z-score"]);
        for entry in &assignments {
            table.add_row(vec![
                Cell::new(entry.name.as_deref().unwrap_or("(unnamed)")),
                Cell::new(score_cell(&entry.summary)),
                Cell::new(zscore_cell(&entry.summary)),
            ]);
        }
        println!("{table}");
    }

    Ok(())
}
