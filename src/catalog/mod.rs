//! Review catalog: parsing, grouping and ranking
//!
//! The catalog is built once at startup and is read-only afterwards:
//!
//! 1. **Parse** each row into a [`Review`]
//! 2. **Group** reviews by artist, in first-seen order
//! 3. **Filter** out artists with fewer than [`MIN_ALBUMS`] reviews
//! 4. **Aggregate** the average score, rounded half-up to one decimal
//! 5. **Rank** ascending by average (stable, so ties keep first-seen order)
//!
//! The result drives the overview chart: lowest average first, highest last.

pub mod table;

use crate::error::{Error, Result, RowError};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Artists need at least this many reviews to appear in the chart
pub const MIN_ALBUMS: usize = 3;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Columns the input must provide, in any order
pub const COLUMNS: [&str; 6] = ["id", "title", "artist", "date", "score", "link"];

/// One reviewed album
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub date: NaiveDate,
    pub score: i64,
    pub link: String,
}

/// Average score held as exact tenths, so ordering and display agree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AverageScore(i128);

impl AverageScore {
    /// Mean of `scores`, rounded half-up to one decimal place.
    /// Returns `None` for an empty slice.
    pub fn from_scores(scores: &[i64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        // Scores are unbounded, so the sum and rounding run in i128
        let sum: i128 = scores.iter().map(|&s| i128::from(s)).sum();
        let count = scores.len() as i128;
        // floor(sum * 10 / count + 1/2), kept in integers
        Some(Self((20 * sum + count).div_euclid(2 * count)))
    }

    pub fn from_tenths(tenths: i128) -> Self {
        Self(tenths)
    }

    pub fn tenths(self) -> i128 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 10.0
    }
}

impl fmt::Display for AverageScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

impl Serialize for AverageScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// An artist with enough reviews to chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistGroup {
    pub artist: String,
    /// Input order, not chronological
    pub albums: Vec<Review>,
    pub average_score: AverageScore,
}

impl ArtistGroup {
    pub fn album(&self, id: i64) -> Option<&Review> {
        self.albums.iter().find(|r| r.id == id)
    }

    /// Label used for overview tooltips and the panel subheading
    pub fn score_label(&self) -> String {
        format!("Average Score: {}/10", self.average_score)
    }
}

/// What to do with a row whose fields fail to convert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Drop the row, record it in [`LoadReport::skipped`] and continue
    #[default]
    Skip,
    /// Fail the whole load on the first bad row
    Strict,
}

/// Outcome of a successful load
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub groups: Vec<ArtistGroup>,
    /// Rows converted into reviews
    pub reviews_read: usize,
    pub skipped: Vec<RowError>,
}

/// Read and rank a data file
pub fn load<P: AsRef<Path>>(path: P, policy: RowPolicy) -> Result<LoadReport> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "loading reviews");
    load_str(&text, policy)
}

/// Parse and rank already-read text
pub fn load_str(text: &str, policy: RowPolicy) -> Result<LoadReport> {
    let (reviews, skipped) = parse_reviews(text, policy)?;
    let reviews_read = reviews.len();
    let groups = build_groups(reviews);

    if groups.is_empty() {
        return Err(Error::EmptyResult { min_albums: MIN_ALBUMS });
    }

    info!(
        reviews = reviews_read,
        skipped = skipped.len(),
        artists = groups.len(),
        "catalog ready"
    );

    Ok(LoadReport { groups, reviews_read, skipped })
}

/// Step 1: convert rows into reviews according to `policy`
pub fn parse_reviews(text: &str, policy: RowPolicy) -> Result<(Vec<Review>, Vec<RowError>)> {
    let mut records = table::read_records(text).into_iter();
    let header = match records.next() {
        Some(h) => h,
        None => return Err(Error::NoHeader),
    };

    let mut index = [0usize; 6];
    for (slot, name) in index.iter_mut().zip(COLUMNS) {
        *slot = header
            .fields
            .iter()
            .position(|f| f.trim().eq_ignore_ascii_case(name))
            .ok_or(Error::MissingColumn(name))?;
    }

    let mut reviews = Vec::new();
    let mut skipped = Vec::new();
    let mut seen = HashSet::new();

    for record in records {
        let parsed = parse_row(&record, &index).and_then(|review| {
            if seen.insert(review.id) {
                Ok(review)
            } else {
                Err(RowError {
                    line: record.line,
                    column: COLUMNS[0],
                    value: review.id.to_string(),
                    reason: "duplicate review id".to_string(),
                })
            }
        });
        match parsed {
            Ok(review) => reviews.push(review),
            Err(err) => match policy {
                RowPolicy::Strict => return Err(Error::Parse(err)),
                RowPolicy::Skip => {
                    warn!("skipping {}", err);
                    skipped.push(err);
                }
            },
        }
    }

    Ok((reviews, skipped))
}

fn parse_row(record: &table::Record, index: &[usize; 6]) -> std::result::Result<Review, RowError> {
    let field = |i: usize| -> &str {
        record.fields.get(index[i]).map(String::as_str).unwrap_or("")
    };
    let error = |i: usize, reason: String| RowError {
        line: record.line,
        column: COLUMNS[i],
        value: field(i).to_string(),
        reason,
    };

    let id = field(0)
        .trim()
        .parse::<i64>()
        .map_err(|e| error(0, e.to_string()))?;
    let date = NaiveDate::parse_from_str(field(3).trim(), DATE_FORMAT)
        .map_err(|e| error(3, e.to_string()))?;
    let score = field(4)
        .trim()
        .parse::<i64>()
        .map_err(|e| error(4, e.to_string()))?;

    Ok(Review {
        id,
        title: field(1).to_string(),
        artist: field(2).to_string(),
        date,
        score,
        link: field(5).to_string(),
    })
}

/// Steps 2-5: group, filter, aggregate and rank
pub fn build_groups(reviews: Vec<Review>) -> Vec<ArtistGroup> {
    let mut order: Vec<(String, Vec<Review>)> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for review in reviews {
        match slots.get(&review.artist) {
            Some(&slot) => order[slot].1.push(review),
            None => {
                slots.insert(review.artist.clone(), order.len());
                order.push((review.artist.clone(), vec![review]));
            }
        }
    }

    let mut groups: Vec<ArtistGroup> = order
        .into_iter()
        .filter(|(artist, albums)| {
            let keep = albums.len() >= MIN_ALBUMS;
            if !keep {
                debug!(artist = %artist, albums = albums.len(), "below album threshold");
            }
            keep
        })
        .filter_map(|(artist, albums)| {
            let scores: Vec<i64> = albums.iter().map(|r| r.score).collect();
            let average_score = AverageScore::from_scores(&scores)?;
            Some(ArtistGroup { artist, albums, average_score })
        })
        .collect();

    // Vec::sort_by_key is stable: equal averages keep first-seen order
    groups.sort_by_key(|g| g.average_score);
    groups
}
