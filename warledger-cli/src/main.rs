mod fixture;
mod render;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use fixture::FixtureStore;
use render::{render_console, render_markdown};
use warledger_engine::{EventId, ReportCfg, ReportEngine, format_rate};

#[derive(Debug, Parser)]
#[command(name = "warledger", version)]
#[command(about = "Preview and QA tool for Warledger alliance event reports")]
struct Args {
    /// Path to an event fixture JSON file (deltas or before/after snapshots)
    #[arg(long)]
    fixture: PathBuf,

    /// Event id to report on (defaults to the first event in the fixture)
    #[arg(long)]
    event: Option<String>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "markdown", "json"])]
    report: String,

    /// Rows per ranking list in console/markdown output
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Print the one-line digest for every event in the fixture and exit
    #[arg(long)]
    list: bool,

    /// Optional engine config JSON file (binning policy)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let store = FixtureStore::load(&args.fixture)
        .with_context(|| format!("loading fixture {}", args.fixture.display()))?;
    log::info!("loaded {} event(s) from fixture", store.event_ids().len());

    let cfg = load_cfg(args.config.as_deref())?;
    let engine = ReportEngine::with_cfg(store, cfg);

    let text = if args.list {
        list_digests(&engine)?
    } else {
        let event_id = resolve_event_id(&args, &engine)?;
        render_report(&args, &engine, &event_id)?
    };

    write_output(args.output.as_deref(), &text)
}

fn load_cfg(path: Option<&std::path::Path>) -> Result<ReportCfg> {
    let Some(path) = path else {
        return Ok(ReportCfg::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    ReportCfg::from_json(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn resolve_event_id(args: &Args, engine: &ReportEngine<FixtureStore>) -> Result<EventId> {
    match &args.event {
        Some(raw) => {
            let id = EventId::new(raw);
            if !engine.source().event_ids().contains(&id) {
                bail!("event '{id}' not found in fixture");
            }
            Ok(id)
        }
        None => Ok(engine.source().first_event_id().clone()),
    }
}

fn render_report(
    args: &Args,
    engine: &ReportEngine<FixtureStore>,
    event_id: &EventId,
) -> Result<String> {
    let report = engine.build_report(event_id)?;
    let text = match args.report.as_str() {
        "markdown" => render_markdown(&report, args.top),
        "json" => serde_json::to_string_pretty(&report).context("serializing report")?,
        _ => render_console(&report, args.top),
    };
    Ok(text)
}

fn list_digests(engine: &ReportEngine<FixtureStore>) -> Result<String> {
    let mut out = String::new();
    for event_id in engine.source().event_ids() {
        let digest = engine.build_digest(event_id)?;
        let stats = match (digest.participation_rate, digest.violator_count) {
            (Some(rate), _) => format!("participation {}", format_rate(rate)),
            (None, Some(violators)) => format!("{violators} violator(s)"),
            (None, None) => "no stats yet".to_string(),
        };
        let mvp = digest
            .mvp_name
            .map(|name| format!("  MVP {name}"))
            .unwrap_or_default();
        out.push_str(&format!(
            "{} {:<24} {:<10} {stats}{mvp}\n",
            digest.event_id.to_string().dimmed(),
            digest.name.bold(),
            format!("[{}]", digest.category)
        ));
    }
    Ok(out)
}

fn write_output(path: Option<&std::path::Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            writer.write_all(text.as_bytes())?;
            writer.flush()?;
        }
        None => {
            let mut out = stdout().lock();
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}
