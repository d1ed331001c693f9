//! Reviewscope - Rank artists by their album reviews
//!
//! Reviewscope reads a table of album reviews, groups them by artist, and
//! ranks every artist with at least three reviewed albums by average score.
//! The ranking is drawn as an animated bar chart; selecting a bar drills
//! into that artist's review timeline.
//!
//! # Overview
//!
//! Nothing in this crate draws directly. Navigation and hover produce
//! value-level [`chart::Command`]s, and an executor hands them to a
//! [`chart::Surface`]. The browser UI served by [`serve`] is one surface;
//! the in-memory [`chart::Scene`] with its virtual clock is another, used for
//! static reports and tests.
//!
//! # Quick Start
//!
//! ```no_run
//! use reviewscope::{catalog, ChartConfig, Event, Navigator, RowPolicy};
//! use reviewscope::chart::{apply, Scene};
//!
//! let report = catalog::load("reviews.csv", RowPolicy::Skip)?;
//! let mut nav = Navigator::new(&report.groups, ChartConfig::default())?;
//!
//! let mut scene = Scene::new();
//! apply(&mut scene, &nav.start());
//! apply(&mut scene, &nav.handle(Event::Select { artist: 0 })?);
//! scene.advance(2000.0);
//!
//! println!("{}", scene.panel.heading);
//! # Ok::<(), reviewscope::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`catalog`]: Review table parsing, grouping and ranking
//! - [`chart`]: Scales, layouts, commands, choreography and the scene
//! - [`navigation`]: Overview / detail state machine
//! - [`hover`]: Hover highlighting and tooltips
//! - [`report`]: Output formatters (HTML, JSON, CSV)
//! - [`serve`]: Interactive chart over HTTP

pub mod catalog;
pub mod chart;
pub mod config;
pub mod error;
pub mod hover;
pub mod navigation;
pub mod report;
pub mod serve;

pub use catalog::{ArtistGroup, AverageScore, LoadReport, Review, RowPolicy, MIN_ALBUMS};
pub use config::ChartConfig;
pub use error::{Error, Result, RowError};
pub use navigation::{Event, Navigator, ViewState};
