//! Value-level drawing commands
//!
//! Navigation and hover logic never touch a drawing surface directly. They
//! return a list of [`Command`]s which an executor ([`super::apply`]) hands to
//! a [`super::Surface`]. Commands serialize to JSON for the browser UI.

use super::ease::Ease;
use super::scale::Tick;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity of a drawn element
///
/// Detail content carries a `generation` so content from an earlier
/// selection can retract while the next selection's content enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementId {
    Bar { index: usize },
    BarLabel { index: usize },
    OverviewXAxis,
    OverviewYAxis,
    Stroke { generation: u64 },
    Marker { generation: u64, review: i64 },
    DetailXAxis,
    DetailYAxis,
}

/// Named animation channel on an element
///
/// A transition preempts only the one running on the same element and
/// track; other tracks keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    #[default]
    Main,
    Hover,
    Axis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Rect,
    Path,
    Circle,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Attr {
    X,
    Y,
    Width,
    Height,
    Cx,
    Cy,
    R,
    Fill,
    D,
    StrokeDasharray,
    StrokeDashoffset,
    /// Text content of a label
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    /// Value at eased progress `t` between `self` and `to`.
    /// Numbers interpolate and land exactly on `to`; text switches once the
    /// transition completes.
    pub fn interpolate(&self, to: &Value, t: f64) -> Value {
        match (self, to) {
            _ if t >= 1.0 => to.clone(),
            (Value::Number(a), Value::Number(b)) => Value::Number(a + (b - a) * t),
            _ => self.clone(),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

pub type Attrs = BTreeMap<Attr, Value>;

/// Build an [`Attrs`] map from `(attr, value)` pairs
pub fn attrs<V: Into<Value>, I: IntoIterator<Item = (Attr, V)>>(pairs: I) -> Attrs {
    pairs.into_iter().map(|(a, v)| (a, v.into())).collect()
}

/// An animated change of attributes on one element and track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub target: ElementId,
    pub track: Track,
    pub attrs: Attrs,
    pub duration_ms: f64,
    /// Relative to the moment the transition is issued; may be negative
    pub delay_ms: f64,
    pub ease: Ease,
    /// Discard the element when the transition completes
    pub remove_on_end: bool,
}

impl Transition {
    pub fn new(target: ElementId, attrs: Attrs, duration_ms: f64) -> Self {
        Self {
            target,
            track: Track::Main,
            attrs,
            duration_ms,
            delay_ms: 0.0,
            ease: Ease::default(),
            remove_on_end: false,
        }
    }

    pub fn on_track(mut self, track: Track) -> Self {
        self.track = track;
        self
    }

    pub fn delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn then_remove(mut self) -> Self {
        self.remove_on_end = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orient {
    Bottom,
    Left,
}

/// Axis with its ticks, redrawn over `duration_ms` on `track`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub id: ElementId,
    pub orient: Orient,
    /// Translation of the axis line: y for bottom axes, x for left axes
    pub offset: f64,
    pub ticks: Vec<Tick>,
    pub track: Track,
    pub duration_ms: f64,
}

/// Text shown beside the charts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Panel {
    pub heading: String,
    pub subheading: String,
    pub lines: Vec<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Create { id: ElementId, shape: Shape, attrs: Attrs },
    Animate(Transition),
    Axis(AxisSpec),
    ShowTooltip,
    MoveTooltip { x: f64, y: f64, text: String },
    HideTooltip,
    Panel(Panel),
    /// Shown in place of the charts when there is nothing to draw
    Message { text: String },
}
