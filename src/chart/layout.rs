//! Geometry for the overview bars and the detail timeline

use super::command::{AxisSpec, ElementId, Orient, Track};
use super::scale::{BandScale, LinearScale, TimeScale};
use crate::catalog::ArtistGroup;
use crate::config::ChartConfig;

/// Upper end of the detail score axis
pub const SCORE_MAX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Measures the drawn length of a stroke
pub trait PathMeasure {
    fn total_length(&self, points: &[Point]) -> f64;
}

/// Straight segments between consecutive points
#[derive(Debug, Clone, Copy, Default)]
pub struct Polyline;

impl PathMeasure for Polyline {
    fn total_length(&self, points: &[Point]) -> f64 {
        points
            .windows(2)
            .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
            .sum()
    }
}

/// SVG path data for straight segments through `points`
pub fn path_data(points: &[Point]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        d.push(if i == 0 { 'M' } else { 'L' });
        d.push_str(&format!("{},{}", p.x, p.y));
    }
    d
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub index: usize,
    pub artist: String,
    pub y: f64,
    pub height: f64,
    /// Width proportional to the average score
    pub value_width: f64,
    pub label: String,
}

/// One horizontal bar per ranked artist; the first (lowest) at the bottom
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewLayout {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub bars: Vec<Bar>,
    x_scale: LinearScale,
}

impl OverviewLayout {
    pub fn new(groups: &[ArtistGroup], config: &ChartConfig) -> Self {
        let width = config.overview_width;
        let height = config.overview_height;
        let margin = config.margin;

        let max = groups.iter().map(|g| g.average_score.as_f64()).fold(0.0, f64::max);
        let x_scale = LinearScale::new((0.0, max), (margin, width - margin));
        let bands = BandScale::new(
            groups.len(),
            (height - margin, margin),
            config.band_padding,
            config.band_padding,
        );

        let bars = groups
            .iter()
            .enumerate()
            .map(|(index, g)| Bar {
                index,
                artist: g.artist.clone(),
                y: bands.position(index).unwrap_or(margin),
                height: bands.bandwidth(),
                value_width: (x_scale.apply(g.average_score.as_f64()) - margin).max(0.0),
                label: g.score_label(),
            })
            .collect();

        Self { width, height, margin, bars, x_scale }
    }

    /// Width of a bar that is drilled into
    pub fn full_width(&self) -> f64 {
        self.width
    }

    pub fn x_axis(&self) -> AxisSpec {
        AxisSpec {
            id: ElementId::OverviewXAxis,
            orient: Orient::Bottom,
            offset: self.height - self.margin,
            ticks: self.x_scale.ticks(10),
            track: Track::Main,
            duration_ms: 0.0,
        }
    }

    pub fn y_axis(&self) -> AxisSpec {
        AxisSpec {
            id: ElementId::OverviewYAxis,
            orient: Orient::Left,
            offset: self.margin,
            ticks: self
                .bars
                .iter()
                .map(|b| super::scale::Tick { position: b.y + b.height / 2.0, label: b.artist.clone() })
                .collect(),
            track: Track::Main,
            duration_ms: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub review: i64,
    pub center: Point,
    pub title: String,
}

/// Score-over-time line for one artist
#[derive(Debug, Clone, PartialEq)]
pub struct DetailLayout {
    pub generation: u64,
    pub markers: Vec<Marker>,
    pub path: String,
    pub path_length: f64,
    x_scale: Option<TimeScale>,
    y_scale: LinearScale,
    height: f64,
    margin: f64,
}

impl DetailLayout {
    pub fn new<M: PathMeasure + ?Sized>(
        group: &ArtistGroup,
        generation: u64,
        config: &ChartConfig,
        measure: &M,
    ) -> Self {
        let margin = config.margin;
        let width = config.detail_width - margin * 3.0;
        let height = config.detail_height;

        let x_scale = TimeScale::extent(group.albums.iter().map(|r| r.date))
            .map(|extent| TimeScale::new(extent, (margin * 2.0, width - margin)));
        let y_scale = LinearScale::new((0.0, SCORE_MAX), (height - margin, margin));

        let markers: Vec<Marker> = group
            .albums
            .iter()
            .map(|r| Marker {
                review: r.id,
                center: Point {
                    x: x_scale.map(|s| s.apply(r.date)).unwrap_or(margin * 2.0),
                    y: y_scale.apply(r.score as f64),
                },
                title: r.title.clone(),
            })
            .collect();

        let points: Vec<Point> = markers.iter().map(|m| m.center).collect();

        Self {
            generation,
            path: path_data(&points),
            path_length: measure.total_length(&points),
            markers,
            x_scale,
            y_scale,
            height,
            margin,
        }
    }

    pub fn stroke_id(&self) -> ElementId {
        ElementId::Stroke { generation: self.generation }
    }

    pub fn marker_id(&self, review: i64) -> ElementId {
        ElementId::Marker { generation: self.generation, review }
    }

    pub fn marker(&self, review: i64) -> Option<&Marker> {
        self.markers.iter().find(|m| m.review == review)
    }

    pub fn x_axis(&self, duration_ms: f64) -> AxisSpec {
        AxisSpec {
            id: ElementId::DetailXAxis,
            orient: Orient::Bottom,
            offset: self.height - self.margin,
            ticks: self.x_scale.map(|s| s.year_ticks()).unwrap_or_default(),
            track: Track::Axis,
            duration_ms,
        }
    }

    pub fn y_axis(&self, duration_ms: f64) -> AxisSpec {
        AxisSpec {
            id: ElementId::DetailYAxis,
            orient: Orient::Left,
            offset: self.margin,
            ticks: self.y_scale.ticks(10),
            track: Track::Axis,
            duration_ms,
        }
    }
}
