//! The `gradebook import` command.

use std::path::PathBuf;

use anyhow::Result;

use gradebook_core::profile::Profile;

pub fn execute(course_path: PathBuf, profile_path: PathBuf) -> Result<()> {
    let courses = if course_path.is_dir() {
        gradebook_core::parser::load_course_directory(&course_path)?
    } else {
        vec![gradebook_core::parser::parse_course(&course_path)?]
    };

    let mut profile = if profile_path.exists() {
        Profile::load_json(&profile_path)?
    } else {
        Profile::new()
    };

    for course in courses {
        println!("Imported: {} ({})", course.name(), course.id());
        profile.insert_course(course);
    }

    profile.save_json(&profile_path)?;
    println!("Saved profile to {}", profile_path.display());

    Ok(())
}
