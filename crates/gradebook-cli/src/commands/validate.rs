//! The `gradebook validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(course_path: PathBuf) -> Result<()> {
    let courses = if course_path.is_dir() {
        gradebook_core::parser::load_course_directory(&course_path)?
    } else {
        vec![gradebook_core::parser::parse_course(&course_path)?]
    };

    let mut total_warnings = 0;

    for course in &courses {
        println!(
            "Course: {} ({} components)",
            course.name(),
            course.components().len()
        );

        let warnings = gradebook_core::parser::validate_course(course);
        for w in &warnings {
            let prefix = w
                .component
                .as_ref()
                .map(|name| format!("  [{name}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All course definitions valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
