//! Plotly-compatible chart payload.
//!
//! The core keeps traces as plain data; the mapping to a concrete chart
//! library's JSON shape lives here at the render edge, alongside the color
//! palette and layout.

use serde_json::{Value, json};
use voluma_types::{PlotTrace, PointDetails, TimePoint, TraceKind};

/// (light, dark) point colors per group, cycled by group index. Points that
/// link to imagery use the dark variant.
const GROUP_COLORS: [(&str, &str); 2] = [
    ("rgba(54,162,235,0.55)", "rgba(25,118,210,1)"),
    ("rgba(255,99,132,0.55)", "rgba(183,28,28,1)"),
];

/// Marker size of the invisible click-target overlay. Oversized on purpose:
/// box/whisker hit-testing is unreliable, the overlay guarantees every
/// rendered value is clickable at pixel precision.
const CLICK_TARGET_SIZE: u32 = 40;

/// Assemble the full `{ data, layout }` payload for the structure's chart.
pub fn to_plotly(traces: &[PlotTrace], structure: &str) -> Value {
    let mut group_order: Vec<&str> = Vec::new();
    for trace in traces {
        if trace.kind == TraceKind::Distribution && !group_order.contains(&trace.name.as_str()) {
            group_order.push(&trace.name);
        }
    }

    let data: Vec<Value> = traces
        .iter()
        .map(|trace| {
            let group_index = group_order
                .iter()
                .position(|g| *g == trace.name)
                .unwrap_or(0);
            trace_payload(trace, group_index)
        })
        .collect();

    let labels: Vec<&str> = TimePoint::ALL.iter().map(|tp| tp.label()).collect();
    json!({
        "data": data,
        "layout": {
            "title": format!("Distribution of {structure} Volume"),
            "xaxis": {
                "title": { "text": "Clinical Time Points" },
                "categoryorder": "array",
                "categoryarray": labels,
                "tickvals": labels,
                "ticktext": labels,
            },
            "yaxis": {
                "title": { "text": "Volume of Structure (mm³)" },
            },
            "boxmode": "group",
            "hovermode": "closest",
            "showlegend": true,
            "legend": { "x": 1, "y": 1, "xanchor": "left", "yanchor": "top" },
            "clickmode": "event+select",
        },
    })
}

/// Per-point payload attached to every marker. Chart consumers read the
/// volume under the `volume` key.
fn customdata(details: &PointDetails) -> Value {
    json!({
        "age": details.age,
        "gender": details.gender,
        "race": details.race,
        "stage": details.stage,
        "volume": details.volume_ml,
        "viewer_url": details.viewer_url,
    })
}

fn trace_payload(trace: &PlotTrace, group_index: usize) -> Value {
    let x: Vec<&str> = trace
        .values
        .iter()
        .map(|_| trace.time_point.label())
        .collect();

    match trace.kind {
        TraceKind::Distribution => {
            let (light, dark) = GROUP_COLORS[group_index % GROUP_COLORS.len()];
            let colors: Vec<&str> = trace
                .ancillary
                .iter()
                .map(|details| if details.has_imagery() { dark } else { light })
                .collect();
            json!({
                "type": "box",
                "x": x,
                "y": trace.values,
                "name": trace.name,
                "hoverinfo": "none",
                "boxpoints": "all",
                "jitter": 0.3,
                "pointpos": -1.8,
                "marker": { "color": colors, "size": 6 },
                "line": { "color": dark },
                "customdata": trace.ancillary.iter().map(customdata).collect::<Vec<_>>(),
                "showlegend": trace.show_legend,
            })
        }
        TraceKind::ClickTarget => json!({
            "x": x,
            "y": trace.values,
            "mode": "markers",
            "marker": { "size": CLICK_TARGET_SIZE, "opacity": 0 },
            "customdata": trace.ancillary.iter().map(customdata).collect::<Vec<_>>(),
            "hoverinfo": "none",
            "showlegend": false,
        }),
    }
}
