//! gradebook-report — markdown report generation.
//!
//! Pure string builders over `gradebook-core` summaries and details; the
//! caller decides where the output goes.

pub mod markdown;
