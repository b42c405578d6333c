use std::io::Write;
use std::str::FromStr;

use voluma_core::{AgeEdge, ClickEvent, Dimension, PointDetails, ViewerPhase};

use crate::CliContext;
use crate::export;

pub async fn set_structure(name: &str, ctx: &CliContext) {
    ctx.session.set_structure(name).await;
    println!("draft structure: {name} (run `apply` to fetch)");
}

pub async fn toggle(dimension: &str, value: &str, off: bool, ctx: &CliContext) {
    let dimension = match Dimension::from_str(dimension) {
        Ok(dimension) => dimension,
        Err(err) => {
            println!("{err}");
            return;
        }
    };
    ctx.session.toggle_value(dimension, value, !off).await;

    let draft = ctx.session.draft().await;
    let values: Vec<&str> = draft.values(dimension).iter().map(String::as_str).collect();
    println!("draft {}: [{}]", dimension.query_key(), values.join(", "));
}

pub async fn set_age(edge: &str, value: u32, ctx: &CliContext) {
    let edge = match edge {
        "lo" | "min" => AgeEdge::Lo,
        "hi" | "max" => AgeEdge::Hi,
        other => {
            println!("unknown age edge '{other}' (expected lo|hi)");
            return;
        }
    };
    ctx.session.set_age_edge(edge, value).await;
    let (lo, hi) = ctx.session.draft().await.age_range;
    println!("draft age range: [{lo}, {hi}]");
}

pub async fn set_group(dimension: &str, ctx: &CliContext) {
    match Dimension::from_str(dimension) {
        Ok(dimension) => {
            ctx.session.set_grouping(dimension).await;
            println!("grouping traces by {}", dimension.label());
        }
        Err(err) => println!("{err}"),
    }
}

pub async fn apply(ctx: &CliContext) {
    let generation = ctx.session.apply().await;
    let applied = ctx.session.applied().await;
    println!(
        "fetch #{generation} started for '{}' (check `status`)",
        applied.structure
    );
}

pub async fn show_filters(ctx: &CliContext) {
    let draft = ctx.session.draft().await;
    let applied = ctx.session.applied().await;

    println!("structure: {} (applied: {})", draft.structure, applied.structure);
    for dimension in Dimension::ALL {
        let values: Vec<&str> = draft.values(dimension).iter().map(String::as_str).collect();
        println!("{:<16} [{}]", dimension.query_key(), values.join(", "));
    }
    let (lo, hi) = draft.age_range;
    println!("{:<16} [{lo}, {hi}]", "age_range");
    if draft != applied {
        println!("(draft has uncommitted changes; run `apply`)");
    }
}

pub async fn show_options(ctx: &CliContext) {
    let catalog = ctx.session.catalog().await;
    for dimension in Dimension::ALL {
        println!(
            "{:<16} [{}]",
            dimension.query_key(),
            catalog.values(dimension).join(", ")
        );
    }
    let bound = catalog.age_bound();
    println!("{:<16} [{}, {}]", "age_range", bound.min, bound.max);
}

pub async fn show_structures(ctx: &CliContext) {
    let structures = ctx.session.structures().await;
    if structures.is_empty() {
        println!("No structures loaded");
        return;
    }
    for structure in &structures {
        println!("{structure}");
    }
    println!("\nTotal: {} structures", structures.len());
}

pub async fn show_rows(ctx: &CliContext) {
    let snapshot = ctx.session.fetch_snapshot().await;
    if snapshot.loading {
        println!("fetch in progress...");
        return;
    }
    if let Some(error) = &snapshot.error {
        println!("fetch failed: {error}");
        return;
    }
    if snapshot.rows.is_empty() {
        println!("No rows for the applied filters");
        return;
    }

    println!("{:<14} {:<4} {:>12} {:<10} Smoking", "Patient", "TP", "Volume (ml)", "Stage");
    println!("{}", "-".repeat(60));
    for row in snapshot.rows.iter().take(20) {
        println!(
            "{:<14} {:<4} {:>12.2} {:<10} {}",
            row.patient_id,
            row.time_point.label(),
            row.volume_ml,
            row.clinical_stage.as_deref().unwrap_or("N/A"),
            row.smoking_status.as_deref().unwrap_or("N/A"),
        );
    }
    if snapshot.rows.len() > 20 {
        println!("... and {} more", snapshot.rows.len() - 20);
    }
    println!("\nTotal: {} rows", snapshot.rows.len());
}

pub async fn show_stats(ctx: &CliContext) {
    let stats = ctx.session.stats().await;
    let applied = ctx.session.applied().await;

    println!("structure:        {}", applied.structure);
    println!("measurements:     {}", stats.row_count);
    println!("patients:         {}", stats.patient_count);
    println!("unique series:    {}", stats.series_count);
    match (stats.volume_min, stats.volume_mean, stats.volume_max) {
        (Some(min), Some(mean), Some(max)) => {
            println!("volume (ml):      min {min:.2} / mean {mean:.2} / max {max:.2}");
        }
        _ => println!("volume (ml):      n/a"),
    }
}

pub async fn show_traces(ctx: &CliContext) {
    let traces = ctx.session.traces().await;
    if traces.is_empty() {
        println!("No traces (no rows fetched yet?)");
        return;
    }
    for (index, trace) in traces.iter().enumerate() {
        let kind = match trace.kind {
            voluma_types::TraceKind::Distribution => "box",
            voluma_types::TraceKind::ClickTarget => "click-target",
        };
        println!(
            "#{index:<3} {kind:<13} {:<3} {:<16} {} pts",
            trace.time_point.label(),
            trace.name,
            trace.len()
        );
    }
    println!("\nUse `click <trace> <point>` to drill into a value");
}

pub async fn export(path: &str, ctx: &CliContext) {
    let traces = ctx.session.traces().await;
    let structure = ctx.session.applied().await.structure;
    let payload = export::to_plotly(&traces, &structure);

    match serde_json::to_string_pretty(&payload) {
        Ok(body) => match std::fs::write(path, &body) {
            Ok(()) => println!("wrote {} bytes to {path}", body.len()),
            Err(err) => println!("failed to write {path}: {err}"),
        },
        Err(err) => println!("failed to serialize chart payload: {err}"),
    }
}

pub async fn click(trace: usize, point: usize, ctx: &CliContext) {
    let traces = ctx.session.traces().await;
    let resolvable = traces.get(trace).is_some_and(|t| point < t.len());
    if !resolvable {
        println!("no point at trace {trace} index {point} (ignored)");
        return;
    }

    ctx.session.click(ClickEvent { trace, point }).await;

    if let Some(details) = ctx.session.selected().await {
        print_details(&details);
    }
    if let Some(text) = ctx.session.notice().await {
        println!("notice: {text}");
    }
    let status = ctx.session.viewer_status().await;
    if status.phase == ViewerPhase::Loading {
        println!(
            "viewer loading (epoch {}): {}",
            status.epoch,
            status.url.as_deref().unwrap_or("")
        );
        println!("report the frame outcome with `viewer-loaded {0}` or `viewer-failed {0}`", status.epoch);
    }
}

pub async fn show_selected(ctx: &CliContext) {
    match ctx.session.selected().await {
        Some(details) => print_details(&details),
        None => println!("no point selected"),
    }
}

fn print_details(details: &PointDetails) {
    let age = details
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    println!("age:     {age}");
    println!("gender:  {}", details.gender.as_deref().unwrap_or("N/A"));
    println!("race:    {}", details.race.as_deref().unwrap_or("N/A"));
    println!("stage:   {}", details.stage.as_deref().unwrap_or("N/A"));
    println!("volume:  {:.2} ml", details.volume_ml);
    println!(
        "imagery: {}",
        if details.has_imagery() { "yes" } else { "no" }
    );
}

pub async fn show_viewer(ctx: &CliContext) {
    let status = ctx.session.viewer_status().await;
    println!("phase: {}", status.phase.label());
    if let Some(url) = &status.url {
        println!("url:   {url}");
        println!("epoch: {}", status.epoch);
    }
}

pub async fn viewer_loaded(epoch: u64, ctx: &CliContext) {
    ctx.session.viewer_frame_loaded(epoch).await;
    println!("viewer: {}", ctx.session.viewer_status().await.phase.label());
}

pub async fn viewer_failed(epoch: u64, ctx: &CliContext) {
    ctx.session.viewer_frame_failed(epoch).await;
    let status = ctx.session.viewer_status().await;
    println!("viewer: {}", status.phase.label());
    if status.phase == ViewerPhase::Error {
        println!("re-click a data point to retry");
    }
}

pub async fn close_viewer(ctx: &CliContext) {
    ctx.session.close_viewer().await;
    println!("viewer closed");
}

pub async fn show_status(ctx: &CliContext) {
    let snapshot = ctx.session.fetch_snapshot().await;
    println!(
        "fetch:   {}",
        if snapshot.loading {
            "loading".to_string()
        } else if let Some(error) = &snapshot.error {
            format!("error: {error}")
        } else {
            format!("{} rows", snapshot.rows.len())
        }
    );
    println!("viewer:  {}", ctx.session.viewer_status().await.phase.label());
    if let Some(text) = ctx.session.notice().await {
        println!("notice:  {text}");
    }
}

pub fn exit() {
    write!(std::io::stdout(), "quitting...").expect("error exiting");
    std::io::stdout().flush().expect("error flushing stdout");
}
