//! JSON report: summary, ranked groups with albums, and skipped rows

use super::Summary;
use crate::catalog::{ArtistGroup, LoadReport};
use crate::error::RowError;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated: String,
    summary: Summary,
    groups: &'a [ArtistGroup],
    skipped: &'a [RowError],
}

pub fn write<W: Write>(writer: &mut W, report: &LoadReport) -> io::Result<()> {
    let doc = JsonReport {
        generated: chrono::Local::now().to_rfc3339(),
        summary: Summary::from_report(report),
        groups: &report.groups,
        skipped: &report.skipped,
    };
    serde_json::to_writer_pretty(&mut *writer, &doc)?;
    writeln!(writer)
}
