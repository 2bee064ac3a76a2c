//! The `gradebook grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use gradebook_core::profile::Profile;

pub fn execute(profile_path: PathBuf, course_key: String) -> Result<()> {
    let profile = Profile::load_json(&profile_path)?;
    let course = profile
        .find_course(&course_key)
        .with_context(|| format!("course not found: {course_key}"))?;

    let summary = course.summary()?;
    let grade = course.grade()?;

    println!("{}: {} ({})", course.name(), grade, summary.display_percentage);
    if summary.is_final == Some(false) {
        println!("Weights are incomplete; this is a projection, not a final grade.");
    }

    Ok(())
}
