//! Hover highlighting and tooltips
//!
//! Works the same over bars and timeline markers; the caller supplies the
//! label for an element. At most one element is hovered at a time and the
//! tooltip text always comes from that element.

use crate::chart::choreography::hover_fill;
use crate::chart::{Command, ElementId};
use crate::config::ChartConfig;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Enter,
    Move,
    Leave,
}

/// A pointer event scoped to one element, with page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub element: ElementId,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Debug, Clone, Default)]
pub struct HoverController {
    hovered: Option<ElementId>,
}

impl HoverController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    /// React to `event`. `label` returns `None` for elements that do not
    /// take part in hovering.
    pub fn handle<F>(&mut self, event: PointerEvent, config: &ChartConfig, label: F) -> Vec<Command>
    where
        F: Fn(ElementId) -> Option<String>,
    {
        match event.kind {
            PointerKind::Enter => {
                let text = match label(event.element) {
                    Some(text) => text,
                    None => {
                        debug!(element = ?event.element, "ignoring hover on inert element");
                        return Vec::new();
                    }
                };
                let mut commands = self.release(config);
                self.hovered = Some(event.element);
                commands.push(hover_fill(event.element, true, config));
                commands.push(Command::ShowTooltip);
                commands.push(self.tooltip_at(event, text, config));
                commands
            }
            PointerKind::Move => {
                if self.hovered != Some(event.element) {
                    return Vec::new();
                }
                match label(event.element) {
                    Some(text) => vec![self.tooltip_at(event, text, config)],
                    None => Vec::new(),
                }
            }
            PointerKind::Leave => {
                if self.hovered != Some(event.element) {
                    return Vec::new();
                }
                self.release(config)
            }
        }
    }

    /// Forget the hovered element without animating it, for elements that
    /// are being discarded. Hides the tooltip if one was shown.
    pub fn forget(&mut self) -> Vec<Command> {
        match self.hovered.take() {
            Some(_) => vec![Command::HideTooltip],
            None => Vec::new(),
        }
    }

    fn release(&mut self, config: &ChartConfig) -> Vec<Command> {
        match self.hovered.take() {
            Some(previous) => vec![hover_fill(previous, false, config), Command::HideTooltip],
            None => Vec::new(),
        }
    }

    fn tooltip_at(&self, event: PointerEvent, text: String, config: &ChartConfig) -> Command {
        Command::MoveTooltip {
            x: event.x + config.tooltip_offset.0,
            y: event.y + config.tooltip_offset.1,
            text,
        }
    }
}
