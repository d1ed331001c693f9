//! Timing and sequencing of every animated change
//!
//! All durations derive from the configured base duration `D`:
//!
//! | Effect                | Duration | Delay        | Track  |
//! |-----------------------|----------|--------------|--------|
//! | Overview entrance     | D        | index × stagger | main |
//! | Overview highlight    | D/4      | 0            | main   |
//! | Detail retraction     | D        | 0            | main   |
//! | Detail entrance       | D        | D            | main   |
//! | Detail axes           | D        | 0            | axis   |
//! | Point focus           | D/4      | 0            | main   |
//! | Hover in / out        | D/4      | 0            | hover  |
//!
//! Each function only describes the commands; nothing here runs them.

use super::command::{attrs, Attr, Command, ElementId, Shape, Track, Transition, Value};
use super::ease::Ease;
use super::layout::{DetailLayout, OverviewLayout};
use crate::config::ChartConfig;

/// Draw the bars at zero width and grow them in a leading cascade
pub fn overview_entrance(layout: &OverviewLayout, config: &ChartConfig) -> Vec<Command> {
    let mut commands = Vec::with_capacity(layout.bars.len() * 3 + 2);

    for bar in &layout.bars {
        let id = ElementId::Bar { index: bar.index };
        commands.push(Command::Create {
            id,
            shape: Shape::Rect,
            attrs: attrs([
                (Attr::X, Value::from(layout.margin)),
                (Attr::Y, Value::from(bar.y)),
                (Attr::Width, Value::from(0.0)),
                (Attr::Height, Value::from(bar.height)),
                (Attr::Fill, Value::from(config.base_fill.as_str())),
            ]),
        });
        commands.push(Command::Animate(
            Transition::new(id, attrs([(Attr::Width, bar.value_width)]), config.duration_ms)
                .delay(bar.index as f64 * config.stagger_ms),
        ));
    }

    for bar in &layout.bars {
        commands.push(Command::Create {
            id: ElementId::BarLabel { index: bar.index },
            shape: Shape::Text,
            attrs: attrs([
                (Attr::X, Value::from(layout.margin + 10.0)),
                (Attr::Y, Value::from(bar.y + bar.height / 2.0)),
                (Attr::Fill, Value::from("white")),
                (Attr::Text, Value::from(bar.artist.as_str())),
            ]),
        });
    }

    commands.push(Command::Axis(layout.x_axis()));
    commands.push(Command::Axis(layout.y_axis()));
    commands
}

/// Settle every bar to its value width, then drive `selected` to full width.
/// Both run concurrently over D/4; the second preempts the first on `selected`.
pub fn overview_highlight(layout: &OverviewLayout, selected: usize, config: &ChartConfig) -> Vec<Command> {
    let quick = config.quick_ms();
    let mut commands: Vec<Command> = layout
        .bars
        .iter()
        .map(|bar| {
            Command::Animate(Transition::new(
                ElementId::Bar { index: bar.index },
                attrs([(Attr::X, layout.margin), (Attr::Width, bar.value_width)]),
                quick,
            ))
        })
        .collect();

    commands.push(Command::Animate(Transition::new(
        ElementId::Bar { index: selected },
        attrs([(Attr::X, 0.0), (Attr::Width, layout.full_width())]),
        quick,
    )));
    commands
}

/// Shrink the old markers away and rewind the old stroke, both over D
pub fn detail_retraction(previous: &DetailLayout, config: &ChartConfig) -> Vec<Command> {
    let mut commands: Vec<Command> = previous
        .markers
        .iter()
        .map(|m| {
            Command::Animate(
                Transition::new(previous.marker_id(m.review), attrs([(Attr::R, 0.0)]), config.duration_ms)
                    .then_remove(),
            )
        })
        .collect();

    commands.push(Command::Animate(
        Transition::new(
            previous.stroke_id(),
            attrs([(Attr::StrokeDashoffset, -previous.path_length)]),
            config.duration_ms,
        )
        .ease(Ease::QuadInOut)
        .then_remove(),
    ));
    commands
}

/// Draw the new stroke hidden and markers at zero radius, then reveal both
/// after a delay of D
pub fn detail_entrance(layout: &DetailLayout, config: &ChartConfig) -> Vec<Command> {
    let d = config.duration_ms;
    let length = layout.path_length;
    let mut commands = Vec::with_capacity(layout.markers.len() * 2 + 4);

    commands.push(Command::Create {
        id: layout.stroke_id(),
        shape: Shape::Path,
        attrs: attrs([
            (Attr::D, Value::from(layout.path.as_str())),
            (Attr::Fill, Value::from("none")),
            (Attr::StrokeDasharray, Value::from(format!("{} {}", length, length))),
            (Attr::StrokeDashoffset, Value::from(length)),
        ]),
    });
    commands.push(Command::Animate(
        Transition::new(layout.stroke_id(), attrs([(Attr::StrokeDashoffset, 0.0)]), d)
            .delay(d)
            .ease(Ease::QuadInOut),
    ));

    for m in &layout.markers {
        let id = layout.marker_id(m.review);
        commands.push(Command::Create {
            id,
            shape: Shape::Circle,
            attrs: attrs([
                (Attr::Cx, Value::from(m.center.x)),
                (Attr::Cy, Value::from(m.center.y)),
                (Attr::R, Value::from(0.0)),
                (Attr::Fill, Value::from(config.base_fill.as_str())),
            ]),
        });
        commands.push(Command::Animate(
            Transition::new(id, attrs([(Attr::R, config.marker_radius)]), d).delay(d),
        ));
    }

    commands.push(Command::Axis(layout.x_axis(d)));
    commands.push(Command::Axis(layout.y_axis(d)));
    commands
}

/// Reset every marker to the base radius and enlarge `focused`, over D/4
pub fn point_focus(layout: &DetailLayout, focused: i64, config: &ChartConfig) -> Vec<Command> {
    let quick = config.quick_ms();
    let mut commands: Vec<Command> = layout
        .markers
        .iter()
        .map(|m| {
            Command::Animate(Transition::new(
                layout.marker_id(m.review),
                attrs([(Attr::R, config.marker_radius)]),
                quick,
            ))
        })
        .collect();

    commands.push(Command::Animate(Transition::new(
        layout.marker_id(focused),
        attrs([(Attr::R, config.focus_radius)]),
        quick,
    )));
    commands
}

/// Hover colour change, isolated on the hover track
pub fn hover_fill(id: ElementId, highlighted: bool, config: &ChartConfig) -> Command {
    let fill = if highlighted { &config.hover_fill } else { &config.base_fill };
    Command::Animate(
        Transition::new(id, attrs([(Attr::Fill, fill.as_str())]), config.quick_ms()).on_track(Track::Hover),
    )
}
