//! gradebook CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gradebook", version, about = "Course grade tracking and projection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter course definition and an empty profile
    Init,

    /// Validate course definition TOML files
    Validate {
        /// Path to a .toml course definition or directory
        #[arg(long)]
        course: PathBuf,
    },

    /// Import course definitions into a profile
    Import {
        /// Path to a .toml course definition or directory
        #[arg(long)]
        course: PathBuf,

        /// Profile JSON to create or extend
        #[arg(long, default_value = "profile.json")]
        profile: PathBuf,
    },

    /// Show the per-course summary table
    Summary {
        /// Profile JSON
        #[arg(long, default_value = "profile.json")]
        profile: PathBuf,
    },

    /// Show a course's components and groups
    Detail {
        /// Profile JSON
        #[arg(long, default_value = "profile.json")]
        profile: PathBuf,

        /// Course id or name
        #[arg(long)]
        course: String,

        /// Render as a markdown report instead of tables
        #[arg(long)]
        markdown: bool,
    },

    /// Show a course's letter grade
    Grade {
        /// Profile JSON
        #[arg(long, default_value = "profile.json")]
        profile: PathBuf,

        /// Course id or name
        #[arg(long)]
        course: String,
    },

    /// Donate a strong component's standing to weaker ones
    Clobber {
        /// Profile JSON
        #[arg(long, default_value = "profile.json")]
        profile: PathBuf,

        /// Course id or name
        #[arg(long)]
        course: String,

        /// Source component id
        #[arg(long)]
        source: String,

        /// Target component ids (comma-separated)
        #[arg(long)]
        targets: String,

        /// Maximum targets to clobber (-1 for unlimited)
        #[arg(long, default_value = "-1")]
        capacity: i64,
    },

    /// Revert a course's active clobber
    RevertClobber {
        /// Profile JSON
        #[arg(long, default_value = "profile.json")]
        profile: PathBuf,

        /// Course id or name
        #[arg(long)]
        course: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradebook=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { course } => commands::validate::execute(course),
        Commands::Import { course, profile } => commands::import::execute(course, profile),
        Commands::Summary { profile } => commands::summary::execute(profile),
        Commands::Detail {
            profile,
            course,
            markdown,
        } => commands::detail::execute(profile, course, markdown),
        Commands::Grade { profile, course } => commands::grade::execute(profile, course),
        Commands::Clobber {
            profile,
            course,
            source,
            targets,
            capacity,
        } => commands::clobber::execute(profile, course, source, targets, capacity),
        Commands::RevertClobber { profile, course } => {
            commands::clobber::execute_revert(profile, course)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
