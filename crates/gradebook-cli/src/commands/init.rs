//! The `gradebook init` command.

use anyhow::Result;

use gradebook_core::profile::Profile;

pub fn execute() -> Result<()> {
    // Create an example course definition
    std::fs::create_dir_all("courses")?;
    let example_path = std::path::Path::new("courses/example.toml");
    if example_path.exists() {
        println!("courses/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_COURSE)?;
        println!("Created courses/example.toml");
    }

    // Create an empty profile store
    let profile_path = std::path::Path::new("profile.json");
    if profile_path.exists() {
        println!("profile.json already exists, skipping.");
    } else {
        Profile::new().save_json(profile_path)?;
        println!("Created profile.json");
    }

    println!("\nNext steps:");
    println!("  1. Edit courses/example.toml with your scores");
    println!("  2. Run: gradebook validate --course courses/example.toml");
    println!("  3. Run: gradebook import --course courses/example.toml");
    println!("  4. Run: gradebook summary");

    Ok(())
}

const EXAMPLE_COURSE: &str = r#"# Example course definition

[course]
name = "Example Course"
corr = 0.6
status = "In Progress"

# A curved exam: scored against the class distribution
[[components]]
kind = "curved_single"
name = "Midterm 1"
weight = 0.2
score = 82
upper = 100
mu = 65.5
sigma = 14.2

# An uncurved homework group: lowest score dropped
[[components]]
kind = "uncurved_group"
name = "Homework"
weight = 0.3
num_drops = 1

[[components.assignments]]
name = "Homework 1"
score = 9
upper = 10

[[components.assignments]]
name = "Homework 2"
score = 7
upper = 10

# A curved final exam
[[components]]
kind = "curved_single"
name = "Final"
weight = 0.5
score = 88
upper = 100
mu = 70
sigma = 12
"#;
