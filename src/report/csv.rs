//! CSV ranking: one line per artist, lowest average first

use crate::catalog::ArtistGroup;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, groups: &[ArtistGroup]) -> io::Result<()> {
    writeln!(writer, "rank,artist,albums,average_score")?;
    for (i, g) in groups.iter().enumerate() {
        writeln!(
            writer,
            "{},{},{},{}",
            i + 1,
            escape(&g.artist),
            g.albums.len(),
            g.average_score
        )?;
    }
    Ok(())
}

/// Quote a field if it contains a separator, quote or line break
fn escape(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
