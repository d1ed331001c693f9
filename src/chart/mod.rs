//! Chart vocabulary: scales, layouts, transitions and their choreography
//!
//! - [`scale`]: linear, band and time scales with tick generation
//! - [`layout`]: bar and timeline geometry for a catalog
//! - [`command`]: value-level drawing commands and transitions
//! - [`choreography`]: which transitions run, when, and for how long
//! - [`surface`]: the drawing surface trait and the command executor
//! - [`scene`]: an in-memory surface with a virtual clock

pub mod choreography;
pub mod command;
pub mod ease;
pub mod layout;
pub mod scale;
pub mod scene;
pub mod surface;

pub use command::{Attr, AxisSpec, Command, ElementId, Panel, Shape, Track, Transition, Value};
pub use ease::Ease;
pub use layout::{DetailLayout, OverviewLayout, PathMeasure, Polyline};
pub use scene::Scene;
pub use surface::{apply, Surface};
