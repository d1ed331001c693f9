//! Drawing surface interface and the command executor

use super::command::{Attrs, AxisSpec, Command, ElementId, Panel, Shape, Transition};

/// Anything that can draw elements and run transitions on them
///
/// The browser UI implements this in JavaScript; [`super::Scene`] is the
/// in-memory implementation.
pub trait Surface {
    fn create(&mut self, id: ElementId, shape: Shape, attrs: &Attrs);

    /// Start `transition`, preempting whatever runs on the same element and track
    fn animate(&mut self, transition: &Transition);

    fn axis(&mut self, axis: &AxisSpec);

    fn tooltip_visible(&mut self, visible: bool);

    fn tooltip_move(&mut self, x: f64, y: f64, text: &str);

    fn panel(&mut self, panel: &Panel);

    fn message(&mut self, text: &str);
}

/// Apply `commands` in order. Returns immediately; animations run on the
/// surface's own clock.
pub fn apply<S: Surface + ?Sized>(surface: &mut S, commands: &[Command]) {
    for command in commands {
        match command {
            Command::Create { id, shape, attrs } => surface.create(*id, *shape, attrs),
            Command::Animate(t) => surface.animate(t),
            Command::Axis(axis) => surface.axis(axis),
            Command::ShowTooltip => surface.tooltip_visible(true),
            Command::MoveTooltip { x, y, text } => surface.tooltip_move(*x, *y, text),
            Command::HideTooltip => surface.tooltip_visible(false),
            Command::Panel(panel) => surface.panel(panel),
            Command::Message { text } => surface.message(text),
        }
    }
}
