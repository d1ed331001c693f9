//! HTML report with a static SVG snapshot of the overview chart
//!
//! The snapshot is produced by running the overview entrance on an
//! in-memory [`Scene`] until every bar has settled, then serializing the
//! scene. What you see matches the interactive chart's resting state.

use super::Summary;
use crate::catalog::LoadReport;
use crate::chart::{apply, Attr, AxisSpec, ElementId, Scene, Shape};
use crate::chart::command::Orient;
use crate::config::ChartConfig;
use crate::navigation::Navigator;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, report: &LoadReport, config: &ChartConfig) -> io::Result<()> {
    let summary = Summary::from_report(report);
    let svg = render_overview(report, config)?;

    write!(writer, r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Reviewscope Ranking</title>
    <style>
        :root {{
            --bg: #0d1117;
            --card: #161b22;
            --border: #30363d;
            --text: #e6edf3;
            --dim: #7d8590;
            --accent: #58a6ff;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
        }}
        .container {{ max-width: 1200px; margin: 0 auto; padding: 2rem; }}
        .header {{
            margin-bottom: 2rem;
            padding-bottom: 1rem;
            border-bottom: 1px solid var(--border);
        }}
        .logo {{
            font-size: 2.5rem;
            font-weight: 800;
            background: linear-gradient(135deg, var(--accent), #a371f7);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
        }}
        .subtitle {{ color: var(--dim); font-size: 1rem; }}
        .stats {{
            display: grid;
            grid-template-columns: repeat(3, 1fr);
            gap: 1rem;
            margin-bottom: 2rem;
        }}
        .stat {{
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.5rem;
            text-align: center;
        }}
        .stat-value {{ font-size: 3rem; font-weight: 700; line-height: 1; }}
        .stat-label {{ color: var(--dim); font-size: 0.875rem; text-transform: uppercase; letter-spacing: 0.05em; margin-top: 0.5rem; }}
        .chart-card {{
            background: #fff;
            border-radius: 12px;
            padding: 1rem;
            overflow-x: auto;
        }}
        .axis text {{ font-size: 11px; fill: #333; }}
        .axis line, .axis path {{ stroke: #333; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <div class="logo">Reviewscope</div>
            <div class="subtitle">Artists ranked by average review score</div>
        </div>
        <div class="stats">
            <div class="stat">
                <div class="stat-value">{artists}</div>
                <div class="stat-label">Artists</div>
            </div>
            <div class="stat">
                <div class="stat-value">{albums}</div>
                <div class="stat-label">Albums</div>
            </div>
            <div class="stat">
                <div class="stat-value">{skipped}</div>
                <div class="stat-label">Skipped Rows</div>
            </div>
        </div>
        <div class="chart-card">
{svg}
        </div>
    </div>
</body>
</html>
"#,
        artists = summary.artists,
        albums = summary.albums,
        skipped = summary.skipped_rows,
        svg = svg,
    )
}

/// Settled overview chart as an SVG element
pub fn render_overview(report: &LoadReport, config: &ChartConfig) -> io::Result<String> {
    let mut nav = Navigator::new(&report.groups, config.clone())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    let mut scene = Scene::new();
    apply(&mut scene, &nav.start());

    let lag = config.stagger_ms.max(0.0) * report.groups.len() as f64;
    scene.advance(config.duration_ms + lag);

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        config.overview_width, config.overview_height
    );
    svg.push('\n');

    for (id, element) in scene.elements() {
        let num = move |a: Attr| element.get(a).and_then(|v| v.as_number()).unwrap_or(0.0);
        let text = move |a: Attr| element.get(a).and_then(|v| v.as_text()).unwrap_or("");
        match element.shape {
            Shape::Rect => svg.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"><title>{}</title></rect>"#,
                num(Attr::X),
                num(Attr::Y),
                num(Attr::Width),
                num(Attr::Height),
                xml_escape(text(Attr::Fill)),
                xml_escape(&bar_label(&nav, *id)),
            )),
            Shape::Text => svg.push_str(&format!(
                r#"<text x="{}" y="{}" fill="{}" dominant-baseline="middle">{}</text>"#,
                num(Attr::X),
                num(Attr::Y),
                xml_escape(text(Attr::Fill)),
                xml_escape(text(Attr::Text)),
            )),
            Shape::Path | Shape::Circle => continue,
        }
        svg.push('\n');
    }

    for id in [ElementId::OverviewXAxis, ElementId::OverviewYAxis] {
        if let Some(axis) = scene.axis_spec(id) {
            svg.push_str(&render_axis(axis));
        }
    }

    svg.push_str("</svg>");
    Ok(svg)
}

fn bar_label(nav: &Navigator<'_>, id: ElementId) -> String {
    match id {
        ElementId::Bar { index } => nav
            .overview_layout()
            .bars
            .get(index)
            .map(|b| b.label.clone())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn render_axis(axis: &AxisSpec) -> String {
    let mut out = String::new();
    match axis.orient {
        Orient::Bottom => {
            out.push_str(&format!(r#"<g class="axis" transform="translate(0,{})">"#, axis.offset));
            for tick in &axis.ticks {
                out.push_str(&format!(
                    r#"<line x1="{p}" x2="{p}" y2="6"/><text x="{p}" y="18" text-anchor="middle">{}</text>"#,
                    xml_escape(&tick.label),
                    p = tick.position,
                ));
            }
        }
        Orient::Left => {
            out.push_str(&format!(r#"<g class="axis" transform="translate({},0)">"#, axis.offset));
            for tick in &axis.ticks {
                out.push_str(&format!(
                    r#"<line y1="{p}" y2="{p}" x2="-6"/><text x="-9" y="{p}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
                    xml_escape(&tick.label),
                    p = tick.position,
                ));
            }
        }
    }
    out.push_str("</g>\n");
    out
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_report;

    #[test]
    fn test_snapshot_has_settled_bars() {
        let report = sample_report();
        let config = ChartConfig::default();
        let svg = render_overview(&report, &config).unwrap();

        assert_eq!(svg.matches("<rect").count(), 2);
        // Highest average spans the full value range
        let full = config.overview_width - 2.0 * config.margin;
        assert!(svg.contains(&format!(r#"width="{}""#, full)));
        assert!(svg.contains("Average Score: 7.0/10"));
    }

    #[test]
    fn test_snapshot_escapes_names() {
        let svg = render_overview(&sample_report(), &ChartConfig::default()).unwrap();
        assert!(svg.contains("Dim &amp; Co"));
        assert!(!svg.contains("Dim & Co"));
    }

    #[test]
    fn test_page_includes_stats() {
        let mut out = Vec::new();
        write(&mut out, &sample_report(), &ChartConfig::default()).unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains(r#"<div class="stat-value">2</div>"#));
        assert!(html.contains("Skipped Rows"));
    }
}
