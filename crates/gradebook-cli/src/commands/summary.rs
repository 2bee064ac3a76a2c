//! The `gradebook summary` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use gradebook_core::profile::Profile;

pub fn execute(profile_path: PathBuf) -> Result<()> {
    let profile = Profile::load_json(&profile_path)?;

    let detail = match profile.detail() {
        Ok(detail) => detail,
        Err(e) => {
            println!("{e}.");
            return Ok(());
        }
    };

    let mut table = Table::new();
    table.set_header(vec!["Course", "Status", "Score", "Z-score", "Grade", "Final?"]);

    for entry in &detail {
        let (score, zscore, grade, is_final): (String, String, String, String) = if let Some(message) = &entry.summary.error_message {
            (message.clone(), "—".into(), "—".into(), "—".into())
        } else {
            (
                entry.summary.display_percentage.clone(),
                entry
                    .summary
                    .stats
                    .as_ref()
                    .map(|stats| format!("{:+.2}", stats.zscore))
                    .unwrap_or_else(|| "—".into()),
                entry.summary.grade.clone().unwrap_or_else(|| "—".into()),
                match entry.summary.is_final {
                    Some(true) => "yes".into(),
                    Some(false) => "projection".into(),
                    None => "—".into(),
                },
            )
        };
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(entry.status),
            Cell::new(score),
            Cell::new(zscore),
            Cell::new(grade),
            Cell::new(is_final),
        ]);
    }

    println!("{table}");
    Ok(())
}
