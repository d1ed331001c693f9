//! Report generation for ranked artists
//!
//! This module writes the ranked catalog in several formats:
//!
//! - **HTML**: Static SVG snapshot of the settled overview chart
//! - **JSON**: Machine-readable groups with every album
//! - **CSV**: One line per artist for spreadsheets
//!
//! # Usage
//!
//! ```ignore
//! use reviewscope::report;
//!
//! // Automatically picks format based on extension
//! report::generate("ranking.html", &load_report, &config)?;  // HTML
//! report::generate("ranking.json", &load_report, &config)?;  // JSON
//! report::generate("ranking.csv", &load_report, &config)?;   // CSV
//! ```

pub mod csv;
pub mod html;
pub mod json;

use crate::catalog::{ArtistGroup, LoadReport};
use crate::config::ChartConfig;
use serde::Serialize;
use std::io;
use std::path::Path;

/// Generate a report in the appropriate format based on file extension
pub fn generate<P: AsRef<Path>>(path: P, report: &LoadReport, config: &ChartConfig) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = std::fs::File::create(path)?;

    match ext.as_str() {
        "html" | "htm" => html::write(&mut file, report, config),
        "json" => json::write(&mut file, report),
        _ => csv::write(&mut file, &report.groups),
    }
}

/// Summary statistics for a loaded catalog
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub artists: usize,
    pub albums: usize,
    pub reviews_read: usize,
    pub skipped_rows: usize,
    pub lowest: Option<String>,
    pub highest: Option<String>,
}

impl Summary {
    pub fn from_report(report: &LoadReport) -> Self {
        let groups: &[ArtistGroup] = &report.groups;
        Self {
            artists: groups.len(),
            albums: groups.iter().map(|g| g.albums.len()).sum(),
            reviews_read: report.reviews_read,
            skipped_rows: report.skipped.len(),
            lowest: groups.first().map(|g| g.artist.clone()),
            highest: groups.last().map(|g| g.artist.clone()),
        }
    }
}
