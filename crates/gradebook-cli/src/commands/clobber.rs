//! The `gradebook clobber` and `gradebook revert-clobber` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};

use gradebook_core::id::Id;
use gradebook_core::profile::Profile;

pub fn execute(
    profile_path: PathBuf,
    course_key: String,
    source: String,
    targets: String,
    capacity: i64,
) -> Result<()> {
    let mut profile = Profile::load_json(&profile_path)?;
    let course = profile
        .find_course_mut(&course_key)
        .with_context(|| format!("course not found: {course_key}"))?;

    let source = Id::from(source);
    let targets: Vec<Id> = targets
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Id::from)
        .collect();

    course.apply_clobber(&source, &targets, capacity)?;

    let info = course
        .clobber_info()
        .context("clobber applied but no record found")?;
    if info.targets.is_empty() {
        println!("No targets were weaker than the source; nothing clobbered.");
    } else {
        println!("Clobbered {} target(s):", info.targets.len());
        for id in &info.targets {
            println!("  {id}");
        }
    }

    profile.save_json(&profile_path)?;
    Ok(())
}

pub fn execute_revert(profile_path: PathBuf, course_key: String) -> Result<()> {
    let mut profile = Profile::load_json(&profile_path)?;
    let course = profile
        .find_course_mut(&course_key)
        .with_context(|| format!("course not found: {course_key}"))?;

    if course.clobber_info().is_none() {
        println!("No active clobber to revert.");
        return Ok(());
    }

    course.revert_clobber();
    profile.save_json(&profile_path)?;
    println!("Clobber reverted.");
    Ok(())
}
