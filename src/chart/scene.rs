//! In-memory surface with a virtual clock
//!
//! [`Scene`] keeps every element's current attributes and advances
//! transitions when told how much time has passed. It is used to check
//! choreography without a browser and to render static snapshots.
//!
//! Scheduling rules, per element and [`Track`]:
//! - issuing a transition drops the one already on that track at once
//! - start values are captured when the delay has elapsed, not when issued
//! - tracks never wait on each other

use super::command::{Attr, Attrs, AxisSpec, ElementId, Panel, Shape, Track, Transition, Value};
use super::surface::Surface;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub shape: Shape,
    pub attrs: Attrs,
}

#[derive(Debug, Clone)]
struct Running {
    transition: Transition,
    starts_at: f64,
    from: Option<Attrs>,
}

/// Pending and active transitions keyed by element and track
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    now: f64,
    running: BTreeMap<(ElementId, Track), Running>,
}

impl Timeline {
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Queue `transition` from the current time, returning the one it preempted
    pub fn schedule(&mut self, transition: Transition) -> Option<Transition> {
        let key = (transition.target, transition.track);
        let starts_at = self.now + transition.delay_ms;
        self.running
            .insert(key, Running { transition, starts_at, from: None })
            .map(|r| r.transition)
    }

    pub fn is_running(&self, id: ElementId, track: Track) -> bool {
        self.running.contains_key(&(id, track))
    }

    pub fn pending(&self) -> usize {
        self.running.len()
    }

    /// Drop everything scheduled on `id`
    pub fn cancel_element(&mut self, id: ElementId) {
        self.running.retain(|(target, _), _| *target != id);
    }

    /// Move the clock forward by `dt_ms` and write interpolated values
    pub fn advance(&mut self, dt_ms: f64, elements: &mut BTreeMap<ElementId, Element>) {
        self.now += dt_ms.max(0.0);
        let now = self.now;
        let mut finished = Vec::new();
        let mut discard = Vec::new();

        for (key, run) in self.running.iter_mut() {
            if now < run.starts_at {
                continue;
            }
            let element = match elements.get_mut(&key.0) {
                Some(e) => e,
                None => {
                    finished.push(*key);
                    continue;
                }
            };

            let from = run.from.get_or_insert_with(|| {
                run.transition
                    .attrs
                    .keys()
                    .filter_map(|a| element.attrs.get(a).map(|v| (*a, v.clone())))
                    .collect()
            });

            let t = &run.transition;
            let progress = if t.duration_ms > 0.0 {
                ((now - run.starts_at) / t.duration_ms).min(1.0)
            } else {
                1.0
            };
            let eased = if progress >= 1.0 { 1.0 } else { t.ease.apply(progress) };

            for (attr, target) in &t.attrs {
                let value = match from.get(attr) {
                    Some(start) => start.interpolate(target, eased),
                    None => target.clone(),
                };
                element.attrs.insert(*attr, value);
            }

            if progress >= 1.0 {
                finished.push(*key);
                if t.remove_on_end {
                    discard.push(key.0);
                }
            }
        }

        for key in finished {
            self.running.remove(&key);
        }
        for id in discard {
            debug!(?id, "transition finished; removing element");
            elements.remove(&id);
            self.cancel_element(id);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TooltipState {
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    elements: BTreeMap<ElementId, Element>,
    axes: BTreeMap<ElementId, AxisSpec>,
    timeline: Timeline,
    pub tooltip: TooltipState,
    pub panel: Panel,
    pub message: Option<String>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `dt_ms`
    pub fn advance(&mut self, dt_ms: f64) {
        self.timeline.advance(dt_ms, &mut self.elements);
    }

    pub fn now(&self) -> f64 {
        self.timeline.now()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn elements(&self) -> impl Iterator<Item = (&ElementId, &Element)> {
        self.elements.iter()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn number(&self, id: ElementId, attr: Attr) -> Option<f64> {
        self.elements.get(&id)?.attrs.get(&attr)?.as_number()
    }

    pub fn text(&self, id: ElementId, attr: Attr) -> Option<&str> {
        self.elements.get(&id)?.attrs.get(&attr)?.as_text()
    }

    pub fn axis_spec(&self, id: ElementId) -> Option<&AxisSpec> {
        self.axes.get(&id)
    }
}

impl Surface for Scene {
    fn create(&mut self, id: ElementId, shape: Shape, attrs: &Attrs) {
        self.timeline.cancel_element(id);
        self.elements.insert(id, Element { shape, attrs: attrs.clone() });
    }

    fn animate(&mut self, transition: &Transition) {
        if let Some(old) = self.timeline.schedule(transition.clone()) {
            debug!(target_id = ?old.target, track = ?old.track, "preempted transition");
        }
    }

    fn axis(&mut self, axis: &AxisSpec) {
        self.axes.insert(axis.id, axis.clone());
    }

    fn tooltip_visible(&mut self, visible: bool) {
        self.tooltip.visible = visible;
    }

    fn tooltip_move(&mut self, x: f64, y: f64, text: &str) {
        self.tooltip.x = x;
        self.tooltip.y = y;
        self.tooltip.text = text.to_string();
    }

    fn panel(&mut self, panel: &Panel) {
        self.panel = panel.clone();
    }

    fn message(&mut self, text: &str) {
        self.message = Some(text.to_string());
    }
}

impl Element {
    pub fn get(&self, attr: Attr) -> Option<&Value> {
        self.attrs.get(&attr)
    }
}
