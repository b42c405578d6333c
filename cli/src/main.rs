use clap::{Parser, Subcommand};
use std::io::Write;
use voluma_cli::CliContext;
use voluma_cli::commands;
use voluma_cli::readline;

#[derive(Parser)]
#[command(version, about = "Interactive volume-distribution dashboard")]
struct Launch {
    /// Backend API base URL
    #[arg(long, default_value = "http://localhost:8000")]
    api: String,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let launch = Launch::parse();
    let ctx = CliContext::new(&launch.api);

    // Load catalog + structures, then fire the initial fetch.
    ctx.session.init().await;

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    ctx.session.shutdown().await;
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "cli")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Select the anatomical structure (draft only; `apply` commits)
    Structure { name: String },
    /// Toggle a categorical filter value on (default) or off
    Toggle {
        dimension: String,
        value: String,
        #[arg(long)]
        off: bool,
    },
    /// Move one age edge (lo|hi) of the draft range
    Age { edge: String, value: u32 },
    /// Choose the dimension traces are grouped by
    Group { dimension: String },
    /// Commit the draft filters and fetch matching rows
    Apply,
    /// Show draft vs applied filters
    Filters,
    /// Show the legal filter values and age bound
    Options,
    /// List selectable structures
    Structures,
    /// Show the fetched rows
    Rows,
    /// Summary statistics for the fetched rows
    Stats,
    /// List the derived plot traces
    Traces,
    /// Write the Plotly chart payload to a file
    Export {
        #[arg(short, long)]
        path: String,
    },
    /// Simulate a plot click at (trace, point)
    Click { trace: usize, point: usize },
    /// Show the currently selected point
    Selected,
    /// Show the embedded viewer state
    Viewer,
    /// Report that the viewer frame for an epoch finished loading
    ViewerLoaded { epoch: u64 },
    /// Report that the viewer frame for an epoch failed to load
    ViewerFailed { epoch: u64 },
    /// Close the embedded viewer
    CloseViewer,
    /// Fetch/viewer/notice status at a glance
    Status,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "voluma".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Structure { name }) => commands::set_structure(name, ctx).await,
        Some(Commands::Toggle {
            dimension,
            value,
            off,
        }) => commands::toggle(dimension, value, *off, ctx).await,
        Some(Commands::Age { edge, value }) => commands::set_age(edge, *value, ctx).await,
        Some(Commands::Group { dimension }) => commands::set_group(dimension, ctx).await,
        Some(Commands::Apply) => commands::apply(ctx).await,
        Some(Commands::Filters) => commands::show_filters(ctx).await,
        Some(Commands::Options) => commands::show_options(ctx).await,
        Some(Commands::Structures) => commands::show_structures(ctx).await,
        Some(Commands::Rows) => commands::show_rows(ctx).await,
        Some(Commands::Stats) => commands::show_stats(ctx).await,
        Some(Commands::Traces) => commands::show_traces(ctx).await,
        Some(Commands::Export { path }) => commands::export(path, ctx).await,
        Some(Commands::Click { trace, point }) => commands::click(*trace, *point, ctx).await,
        Some(Commands::Selected) => commands::show_selected(ctx).await,
        Some(Commands::Viewer) => commands::show_viewer(ctx).await,
        Some(Commands::ViewerLoaded { epoch }) => commands::viewer_loaded(*epoch, ctx).await,
        Some(Commands::ViewerFailed { epoch }) => commands::viewer_failed(*epoch, ctx).await,
        Some(Commands::CloseViewer) => commands::close_viewer(ctx).await,
        Some(Commands::Status) => commands::show_status(ctx).await,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
