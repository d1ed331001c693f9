//! Overview / detail navigation
//!
//! The chart starts on the overview. Selecting a bar drills into that
//! artist's timeline; selecting another bar (or the same one again) swaps
//! the timeline, retracting the old one first. Selecting a point on the
//! timeline focuses that album. There is no way back to a bare overview.
//!
//! ```text
//!   Overview ──select(g)──▶ Detail(g) ──select(g')──▶ Detail(g')
//!                              │  ▲
//!                              └──┘ focus(album)
//! ```
//!
//! [`Navigator::step`] is a pure function of the current state and an event;
//! [`Navigator::handle`] commits the step and also routes pointer events
//! through the [`HoverController`].

use crate::catalog::{ArtistGroup, Review};
use crate::chart::choreography;
use crate::chart::layout::{DetailLayout, OverviewLayout, PathMeasure, Polyline};
use crate::chart::{Command, ElementId, Panel};
use crate::config::ChartConfig;
use crate::error::{Error, Result};
use crate::hover::{HoverController, PointerEvent};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Overview,
    Detail {
        /// Index into the ranked groups
        group: usize,
        /// Identifies this selection's timeline elements
        generation: u64,
        /// Review currently enlarged and described in the panel
        focused: Option<i64>,
    },
}

/// User input, as sent by the UI
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Select { artist: usize },
    Focus { review: i64 },
    Pointer(PointerEvent),
}

/// Next state plus the drawing commands that get there
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub next: ViewState,
    pub commands: Vec<Command>,
}

pub struct Navigator<'a, M = Polyline> {
    groups: &'a [ArtistGroup],
    config: ChartConfig,
    overview: OverviewLayout,
    view: ViewState,
    /// Last generation handed out
    issued: u64,
    hover: HoverController,
    measure: M,
}

impl<'a> Navigator<'a, Polyline> {
    pub fn new(groups: &'a [ArtistGroup], config: ChartConfig) -> Result<Self> {
        Self::with_measure(groups, config, Polyline)
    }
}

impl<'a, M: PathMeasure> Navigator<'a, M> {
    /// Use `measure` for stroke lengths instead of straight segments
    pub fn with_measure(groups: &'a [ArtistGroup], config: ChartConfig, measure: M) -> Result<Self> {
        if groups.is_empty() {
            return Err(Error::EmptyResult { min_albums: crate::catalog::MIN_ALBUMS });
        }
        let overview = OverviewLayout::new(groups, &config);
        Ok(Self {
            groups,
            config,
            overview,
            view: ViewState::Overview,
            issued: 0,
            hover: HoverController::new(),
            measure,
        })
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn overview_layout(&self) -> &OverviewLayout {
        &self.overview
    }

    pub fn hovered(&self) -> Option<ElementId> {
        self.hover.hovered()
    }

    pub fn selected_group(&self) -> Option<&'a ArtistGroup> {
        match self.view {
            ViewState::Detail { group, .. } => self.groups.get(group),
            ViewState::Overview => None,
        }
    }

    pub fn focused_album(&self) -> Option<&'a Review> {
        match self.view {
            ViewState::Detail { focused: Some(id), .. } => self.selected_group()?.album(id),
            _ => None,
        }
    }

    /// Timeline geometry for the current selection
    pub fn detail_layout(&self) -> Option<DetailLayout> {
        match self.view {
            ViewState::Detail { group, generation, .. } => self.layout_for(group, generation),
            ViewState::Overview => None,
        }
    }

    /// Initial render: empty panel and the bar cascade
    pub fn start(&mut self) -> Vec<Command> {
        self.view = ViewState::Overview;
        let mut commands = self.hover.forget();
        commands.push(Command::Panel(Panel::default()));
        commands.extend(choreography::overview_entrance(&self.overview, &self.config));
        info!(artists = self.groups.len(), "overview rendered");
        commands
    }

    /// Compute the outcome of a select or focus event without committing it
    pub fn step(&self, event: &Event) -> Result<Step> {
        match *event {
            Event::Select { artist } => self.select(artist),
            Event::Focus { review } => self.focus(review),
            Event::Pointer(_) => Ok(Step { next: self.view, commands: Vec::new() }),
        }
    }

    /// Apply `event` and return the commands to draw
    pub fn handle(&mut self, event: Event) -> Result<Vec<Command>> {
        if let Event::Pointer(pointer) = event {
            let detail = self.detail_layout();
            let overview = &self.overview;
            return Ok(self
                .hover
                .handle(pointer, &self.config, |id| label(overview, detail.as_ref(), id)));
        }

        let step = self.step(&event)?;
        let mut commands = Vec::new();

        if let (ViewState::Detail { generation: old, .. }, ViewState::Detail { generation: new, .. }) =
            (self.view, step.next)
        {
            // The hovered marker is about to be discarded with its timeline
            let stale = matches!(self.hover.hovered(),
                Some(ElementId::Marker { generation, .. }) if generation == old && old != new);
            if stale {
                commands.extend(self.hover.forget());
            }
        }
        if let ViewState::Detail { generation, .. } = step.next {
            self.issued = self.issued.max(generation);
        }

        debug!(from = ?self.view, to = ?step.next, "navigation step");
        self.view = step.next;
        commands.extend(step.commands);
        Ok(commands)
    }

    fn select(&self, index: usize) -> Result<Step> {
        let group = self.groups.get(index).ok_or(Error::UnknownArtist(index))?;
        let generation = self.issued + 1;
        info!(artist = %group.artist, average = %group.average_score, "selected artist");

        let mut commands = vec![Command::Panel(Panel {
            heading: group.artist.clone(),
            subheading: group.score_label(),
            lines: Vec::new(),
            link: None,
        })];

        if let Some(previous) = self.detail_layout() {
            commands.extend(choreography::detail_retraction(&previous, &self.config));
        }

        let next = DetailLayout::new(group, generation, &self.config, &self.measure);
        commands.extend(choreography::detail_entrance(&next, &self.config));
        commands.extend(choreography::overview_highlight(&self.overview, index, &self.config));

        Ok(Step {
            next: ViewState::Detail { group: index, generation, focused: None },
            commands,
        })
    }

    fn focus(&self, review: i64) -> Result<Step> {
        let (group, generation) = match self.view {
            ViewState::Detail { group, generation, .. } => (group, generation),
            ViewState::Overview => {
                return Err(Error::InvalidState("no artist selected to focus an album in".to_string()))
            }
        };
        let artist = self.groups.get(group).ok_or(Error::UnknownArtist(group))?;
        let album = artist.album(review).ok_or(Error::UnknownReview(review))?;
        let layout = self.layout_for(group, generation).ok_or(Error::UnknownArtist(group))?;
        debug!(title = %album.title, "focused album");

        let mut commands = vec![Command::Panel(album_panel(artist, album))];
        commands.extend(choreography::point_focus(&layout, review, &self.config));

        Ok(Step {
            next: ViewState::Detail { group, generation, focused: Some(review) },
            commands,
        })
    }

    fn layout_for(&self, group: usize, generation: u64) -> Option<DetailLayout> {
        let g = self.groups.get(group)?;
        Some(DetailLayout::new(g, generation, &self.config, &self.measure))
    }
}

/// Tooltip text for an interactive element in the current view
fn label(overview: &OverviewLayout, detail: Option<&DetailLayout>, id: ElementId) -> Option<String> {
    match id {
        ElementId::Bar { index } => overview.bars.get(index).map(|b| b.label.clone()),
        ElementId::Marker { generation, review } => detail
            .filter(|d| d.generation == generation)?
            .marker(review)
            .map(|m| m.title.clone()),
        _ => None,
    }
}

fn album_panel(artist: &ArtistGroup, album: &Review) -> Panel {
    Panel {
        heading: artist.artist.clone(),
        subheading: album.title.clone(),
        lines: vec![
            format!("Reviewed on {}", album.date.format("%B %-d, %Y")),
            format!("Score: {}/10", album.score),
        ],
        link: Some(album.link.clone()),
    }
}

/// What to draw when there is no chart: an empty panel and the reason
pub fn unavailable(err: &Error) -> Vec<Command> {
    vec![
        Command::HideTooltip,
        Command::Panel(Panel::default()),
        Command::Message { text: err.to_string() },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_groups;
    use crate::chart::{apply, Attr, Scene, Transition};
    use crate::hover::PointerKind;
    use chrono::NaiveDate;

    fn groups() -> Vec<ArtistGroup> {
        let mut reviews = Vec::new();
        let data: [(&str, [i64; 3]); 3] = [("Low", [2, 3, 4]), ("Mid", [5, 6, 7]), ("Nova", [6, 8, 7])];
        for (artist, scores) in data {
            for (i, score) in scores.iter().enumerate() {
                let id = reviews.len() as i64 + 1;
                reviews.push(Review {
                    id,
                    title: format!("{} #{}", artist, i + 1),
                    artist: artist.to_string(),
                    date: NaiveDate::from_ymd_opt(2012 + i as i32, 3, 2).unwrap(),
                    score: *score,
                    link: format!("https://reviews.example/{}", id),
                });
            }
        }
        build_groups(reviews)
    }

    fn started<'a>(groups: &'a [ArtistGroup]) -> (Navigator<'a>, Scene) {
        let mut nav = Navigator::new(groups, ChartConfig::default()).unwrap();
        let mut scene = Scene::new();
        apply(&mut scene, &nav.start());
        scene.advance(1000.0);
        (nav, scene)
    }

    fn select(nav: &mut Navigator<'_>, scene: &mut Scene, artist: usize) {
        let commands = nav.handle(Event::Select { artist }).unwrap();
        apply(scene, &commands);
    }

    fn marker_ids(scene: &Scene, generation: u64) -> Vec<ElementId> {
        scene
            .elements()
            .map(|(id, _)| *id)
            .filter(|id| matches!(id, ElementId::Marker { generation: g, .. } if *g == generation))
            .collect()
    }

    // ==========================================================================
    // OVERVIEW TESTS
    // ==========================================================================

    #[test]
    fn test_empty_groups_rejected() {
        assert!(matches!(
            Navigator::new(&[], ChartConfig::default()),
            Err(Error::EmptyResult { .. })
        ));
    }

    #[test]
    fn test_overview_entrance_settles_to_value_widths() {
        let gs = groups();
        let (nav, scene) = started(&gs);
        assert_eq!(nav.view(), ViewState::Overview);
        for bar in &nav.overview_layout().bars {
            let width = scene.number(ElementId::Bar { index: bar.index }, Attr::Width).unwrap();
            assert!((width - bar.value_width).abs() < 1e-9);
        }
        assert_eq!(scene.panel, Panel::default());
    }

    // ==========================================================================
    // SELECTION TESTS
    // ==========================================================================

    #[test]
    fn test_select_drills_in_and_maxes_only_selected_bar() {
        let gs = groups();
        let (mut nav, mut scene) = started(&gs);

        select(&mut nav, &mut scene, 1);
        assert!(matches!(nav.view(), ViewState::Detail { group: 1, focused: None, .. }));
        assert_eq!(nav.selected_group().unwrap().artist, "Mid");
        assert_eq!(scene.panel.heading, "Mid");
        assert_eq!(scene.panel.subheading, "Average Score: 6.0/10");

        scene.advance(250.0);
        let full = nav.overview_layout().full_width();
        let maxed: Vec<usize> = nav
            .overview_layout()
            .bars
            .iter()
            .filter(|b| scene.number(ElementId::Bar { index: b.index }, Attr::Width) == Some(full))
            .map(|b| b.index)
            .collect();
        assert_eq!(maxed, vec![1]);
        assert_eq!(scene.number(ElementId::Bar { index: 1 }, Attr::X), Some(0.0));

        select(&mut nav, &mut scene, 2);
        scene.advance(250.0);
        for bar in &nav.overview_layout().bars {
            let width = scene.number(ElementId::Bar { index: bar.index }, Attr::Width).unwrap();
            if bar.index == 2 {
                assert_eq!(width, full);
            } else {
                assert!((width - bar.value_width).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_first_detail_entrance_waits_one_duration() {
        let gs = groups();
        let (mut nav, mut scene) = started(&gs);
        select(&mut nav, &mut scene, 2);

        let layout = nav.detail_layout().unwrap();
        let marker = layout.marker_id(layout.markers[0].review);
        scene.advance(999.0);
        assert_eq!(scene.number(marker, Attr::R), Some(0.0));
        assert_eq!(scene.number(layout.stroke_id(), Attr::StrokeDashoffset), Some(layout.path_length));

        scene.advance(1001.0);
        assert_eq!(scene.number(marker, Attr::R), Some(7.0));
        assert_eq!(scene.number(layout.stroke_id(), Attr::StrokeDashoffset), Some(0.0));
        assert!(scene.axis_spec(ElementId::DetailXAxis).is_some());
    }

    #[test]
    fn test_switch_retracts_before_entrance_is_issued() {
        let gs = groups();
        let (mut nav, mut scene) = started(&gs);
        select(&mut nav, &mut scene, 0);
        scene.advance(2000.0);
        let old = nav.detail_layout().unwrap();

        let commands = nav.handle(Event::Select { artist: 2 }).unwrap();
        let new = nav.detail_layout().unwrap();
        assert_ne!(old.generation, new.generation);

        let position = |pred: &dyn Fn(&Command) -> bool| commands.iter().position(|c| pred(c)).unwrap();
        let last_retraction = commands
            .iter()
            .rposition(|c| matches!(c, Command::Animate(Transition { target, .. })
                if *target == old.stroke_id() || matches!(target, ElementId::Marker { generation, .. } if *generation == old.generation)))
            .unwrap();
        let first_entrance = position(&|c| matches!(c, Command::Create { id, .. } if *id == new.stroke_id()));
        assert!(last_retraction < first_entrance);

        apply(&mut scene, &commands);
        scene.advance(999.0);
        // New content still hidden while the old retracts
        assert_eq!(scene.number(new.marker_id(new.markers[0].review), Attr::R), Some(0.0));
        scene.advance(1.0);
        // Old timeline fully retracted and discarded
        assert!(marker_ids(&scene, old.generation).is_empty());
        assert!(!scene.contains(old.stroke_id()));

        scene.advance(1000.0);
        assert_eq!(marker_ids(&scene, new.generation).len(), 3);
        for id in marker_ids(&scene, new.generation) {
            assert_eq!(scene.number(id, Attr::R), Some(7.0));
        }
    }

    #[test]
    fn test_old_stroke_hidden_at_end_of_retraction() {
        let gs = groups();
        let (mut nav, mut scene) = started(&gs);
        select(&mut nav, &mut scene, 0);
        scene.advance(2000.0);
        let old = nav.detail_layout().unwrap();

        select(&mut nav, &mut scene, 1);
        scene.advance(990.0);
        let offset = scene.number(old.stroke_id(), Attr::StrokeDashoffset).unwrap();
        assert!(offset < -old.path_length * 0.99);
    }

    #[test]
    fn test_reselect_same_artist_reenters() {
        let gs = groups();
        let (mut nav, mut scene) = started(&gs);
        select(&mut nav, &mut scene, 1);
        scene.advance(2000.0);
        let first = nav.detail_layout().unwrap();

        let commands = nav.handle(Event::Select { artist: 1 }).unwrap();
        let second = nav.detail_layout().unwrap();
        assert_eq!(second.generation, first.generation + 1);
        assert!(commands.iter().any(|c| matches!(c, Command::Animate(t) if t.target == first.stroke_id())));

        apply(&mut scene, &commands);
        scene.advance(2000.0);
        assert!(marker_ids(&scene, first.generation).is_empty());
        assert_eq!(marker_ids(&scene, second.generation).len(), 3);
    }

    #[test]
    fn test_rapid_switch_cancels_pending_entrance() {
        let gs = groups();
        let (mut nav, mut scene) = started(&gs);
        select(&mut nav, &mut scene, 0);
        let first = nav.detail_layout().unwrap();
        scene.advance(100.0);
        select(&mut nav, &mut scene, 1);
        scene.advance(3000.0);

        // The first timeline never grew: its entrance was preempted
        assert!(marker_ids(&scene, first.generation).is_empty());
        assert!(!scene.contains(first.stroke_id()));
    }

    #[test]
    fn test_unknown_artist() {
        let gs = groups();
        let (mut nav, _) = started(&gs);
        assert!(matches!(nav.handle(Event::Select { artist: 9 }), Err(Error::UnknownArtist(9))));
        assert_eq!(nav.view(), ViewState::Overview);
    }

    // ==========================================================================
    // FOCUS TESTS
    // ==========================================================================

    #[test]
    fn test_focus_updates_panel_and_enlarges_marker() {
        let gs = groups();
        let (mut nav, mut scene) = started(&gs);
        select(&mut nav, &mut scene, 2);
        scene.advance(2000.0);

        let nova = nav.selected_group().unwrap();
        let album = nova.albums[1].clone();
        apply(&mut scene, &nav.handle(Event::Focus { review: album.id }).unwrap());
        scene.advance(250.0);

        assert_eq!(nav.focused_album(), Some(&album));
        assert_eq!(scene.panel.subheading, "Nova #2");
        assert_eq!(scene.panel.lines, vec!["Reviewed on March 2, 2013", "Score: 8/10"]);
        assert_eq!(scene.panel.link.as_deref(), Some(album.link.as_str()));

        let layout = nav.detail_layout().unwrap();
        for m in &layout.markers {
            let r = scene.number(layout.marker_id(m.review), Attr::R).unwrap();
            assert_eq!(r, if m.review == album.id { 15.0 } else { 7.0 });
        }

        // Overview untouched by focus
        assert_eq!(
            scene.number(ElementId::Bar { index: 2 }, Attr::Width),
            Some(nav.overview_layout().full_width())
        );
    }

    #[test]
    fn test_new_selection_clears_focus() {
        let gs = groups();
        let (mut nav, mut scene) = started(&gs);
        select(&mut nav, &mut scene, 2);
        let review = nav.selected_group().unwrap().albums[0].id;
        nav.handle(Event::Focus { review }).unwrap();
        assert!(nav.focused_album().is_some());

        select(&mut nav, &mut scene, 2);
        assert!(nav.focused_album().is_none());
    }

    #[test]
    fn test_focus_errors() {
        let gs = groups();
        let (mut nav, mut scene) = started(&gs);
        assert!(matches!(nav.handle(Event::Focus { review: 1 }), Err(Error::InvalidState(_))));

        select(&mut nav, &mut scene, 0);
        // Review 9 belongs to a different artist
        assert!(matches!(nav.handle(Event::Focus { review: 9 }), Err(Error::UnknownReview(9))));
    }

    #[test]
    fn test_step_is_pure() {
        let gs = groups();
        let (nav, _) = started(&gs);
        let step = nav.step(&Event::Select { artist: 0 }).unwrap();
        assert!(matches!(step.next, ViewState::Detail { group: 0, generation: 1, .. }));
        assert_eq!(nav.view(), ViewState::Overview);
    }

    // ==========================================================================
    // HOVER ROUTING TESTS
    // ==========================================================================

    fn pointer(kind: PointerKind, element: ElementId) -> Event {
        Event::Pointer(PointerEvent { kind, element, x: 10.0, y: 10.0 })
    }

    #[test]
    fn test_bar_tooltip_shows_average() {
        let gs = groups();
        let (mut nav, mut scene) = started(&gs);
        apply(&mut scene, &nav.handle(pointer(PointerKind::Enter, ElementId::Bar { index: 2 })).unwrap());
        apply(&mut scene, &nav.handle(pointer(PointerKind::Move, ElementId::Bar { index: 2 })).unwrap());
        assert_eq!(scene.tooltip.text, "Average Score: 7.0/10");
        apply(&mut scene, &nav.handle(pointer(PointerKind::Leave, ElementId::Bar { index: 2 })).unwrap());
        assert!(!scene.tooltip.visible);
    }

    #[test]
    fn test_marker_tooltip_shows_title_and_clears_on_switch() {
        let gs = groups();
        let (mut nav, mut scene) = started(&gs);
        select(&mut nav, &mut scene, 2);
        scene.advance(2000.0);
        let layout = nav.detail_layout().unwrap();
        let marker = layout.marker_id(layout.markers[0].review);

        apply(&mut scene, &nav.handle(pointer(PointerKind::Enter, marker)).unwrap());
        assert_eq!(scene.tooltip.text, "Nova #1");
        assert!(scene.tooltip.visible);

        select(&mut nav, &mut scene, 0);
        assert!(!scene.tooltip.visible);
        assert_eq!(nav.hovered(), None);

        // The retracting marker no longer reacts
        assert!(nav.handle(pointer(PointerKind::Enter, marker)).unwrap().is_empty());
    }

    #[test]
    fn test_hover_does_not_disturb_selection_track() {
        let gs = groups();
        let (mut nav, mut scene) = started(&gs);
        apply(&mut scene, &nav.handle(pointer(PointerKind::Enter, ElementId::Bar { index: 0 })).unwrap());
        select(&mut nav, &mut scene, 0);
        scene.advance(250.0);

        assert_eq!(scene.text(ElementId::Bar { index: 0 }, Attr::Fill), Some("grey"));
        assert_eq!(
            scene.number(ElementId::Bar { index: 0 }, Attr::Width),
            Some(nav.overview_layout().full_width())
        );
    }

    #[test]
    fn test_event_json() {
        let e: Event = serde_json::from_str(r#"{"type":"select","artist":2}"#).unwrap();
        assert_eq!(e, Event::Select { artist: 2 });
        let e: Event = serde_json::from_str(
            r#"{"type":"pointer","kind":"enter","element":{"kind":"bar","index":0},"x":1,"y":2}"#,
        )
        .unwrap();
        assert!(matches!(e, Event::Pointer(PointerEvent { kind: PointerKind::Enter, .. })));
    }

    #[test]
    fn test_unavailable_shows_message_instead_of_chart() {
        let mut scene = Scene::new();
        apply(&mut scene, &unavailable(&Error::EmptyResult { min_albums: 3 }));
        assert_eq!(scene.message.as_deref(), Some("No artist has at least 3 reviews; nothing to chart"));
        assert_eq!(scene.elements().count(), 0);
        assert!(!scene.tooltip.visible);
    }
}
