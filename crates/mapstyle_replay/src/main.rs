//! Replays a script of timed style edits through a styling session and
//! prints the resulting undo history. Useful to check how rapid edits
//! collapse for a given merge timeout.

mod script;

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use flexi_logger::Logger;
use mapstyle_edit::{
    Labeling, Layer, LayerId, LayerStyle, Project, StylePage, StylePanel, StyleSnapshot, StyleUndoOp, StyleUndoState, StylingOptions, StylingSession,
};
use semver::Version;

use crate::script::{Action, Script, Step};

lazy_static::lazy_static! {
    pub static ref VERSION: Version = Version::parse(env!("CARGO_PKG_VERSION")).unwrap();
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Replay script (TOML)
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Override the undo merge timeout in milliseconds
    #[clap(long, value_name = "MS")]
    merge_timeout: Option<u64>,

    /// Options file to use instead of the defaults
    #[clap(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Print the final style document
    #[clap(long, default_value_t = false)]
    print_style: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logger = Logger::try_with_env_or_str("info")?.start()?;
    log::info!("mapstyle-replay {}", *VERSION);

    let script = Script::load(&args.script)?;
    let mut options = match &args.options {
        Some(path) => StylingOptions::load_from(path),
        None => StylingOptions::default(),
    };
    if let Some(ms) = args.merge_timeout {
        options.undo_merge_timeout_ms = ms;
    }
    // Steps carry their own timestamps
    options.live_apply = false;

    let style = match script.layer.color {
        Some(color) => LayerStyle::with_color(script.layer.kind, color),
        None => LayerStyle::default_for(script.layer.kind),
    };
    let mut project = Project::new();
    let id = project.add_layer(Layer::with_style(script.layer.name.clone(), script.layer.kind, style));
    let (mut session, _events) = StylingSession::new(project, options);
    session.set_layer(Some(id))?;

    let start = Utc::now();
    for (i, step) in script.steps.iter().enumerate() {
        step_time(start, step.at_ms)
            .and_then(|timestamp| run_step(&mut session, step, timestamp))
            .with_context(|| format!("step {} failed", i + 1))?;
    }

    print_history(&session, id);
    if args.print_style {
        if let Some(layer) = session.project().layer(id) {
            println!();
            println!("{}", StyleSnapshot::capture(layer.style())?);
        }
    }
    Ok(())
}

fn step_time(start: DateTime<Utc>, at_ms: i64) -> anyhow::Result<DateTime<Utc>> {
    Duration::try_milliseconds(at_ms)
        .and_then(|offset| start.checked_add_signed(offset))
        .ok_or_else(|| anyhow::anyhow!("at_ms {} is out of range", at_ms))
}

fn run_step(session: &mut StylingSession, step: &Step, timestamp: DateTime<Utc>) -> anyhow::Result<()> {
    match step.action {
        Some(Action::Undo) => {
            session.undo()?;
            return Ok(());
        }
        Some(Action::Redo) => {
            session.redo()?;
            return Ok(());
        }
        None => {}
    }

    if step.is_symbology_edit() {
        session.set_page(StylePage::Symbology)?;
        if let Some(StylePanel::Symbology(panel)) = session.panel_mut() {
            if let Some(color) = step.color {
                panel.symbology.color = color;
            }
            if let Some(opacity) = step.opacity {
                panel.symbology.opacity = opacity.clamp(0.0, 1.0);
            }
            if let Some(renderer) = step.renderer {
                panel.symbology.renderer = renderer;
            }
        }
        session.apply_at(timestamp)?;
    }

    if let Some(field) = &step.label_field {
        session.set_page(StylePage::Labels)?;
        if let Some(StylePanel::Labeling(panel)) = session.panel_mut() {
            let labeling = panel.labeling.get_or_insert_with(Labeling::default);
            labeling.field.clone_from(field);
        }
        session.apply_at(timestamp)?;
    }
    Ok(())
}

fn print_history(session: &StylingSession, id: LayerId) {
    let Some(stack) = session.undo_stack(id) else {
        println!("no history");
        return;
    };
    println!("undo history ({} entries):", stack.undo_len());
    for (i, op) in stack.undo_ops().iter().enumerate() {
        match op {
            StyleUndoOp::StyleChange(cmd) => {
                let color = |snapshot: &StyleSnapshot| snapshot.restore().map(|s| s.symbology.color.to_string()).unwrap_or_else(|_| "?".to_string());
                println!("  {:>3}. {} ({} -> {})", i + 1, op.get_description(), color(cmd.before()), color(cmd.after()));
            }
            _ => println!("  {:>3}. {}", i + 1, op.get_description()),
        }
    }
    if stack.can_redo() {
        println!("redo history ({} entries):", stack.redo_len());
        for op in stack.redo_ops().iter().rev() {
            println!("       {}", op.get_description());
        }
    }
    if let Some(layer) = session.project().layer(id) {
        println!("current color: {}", layer.style().symbology.color);
    }
}
