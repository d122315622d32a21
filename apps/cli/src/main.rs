// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Massing-Lite viewer CLI - headless front end for massing payloads.
//!
//! Loads a `MassingData` payload, composes the same scene an interactive
//! viewer would show, and exports it:
//!
//! - a JSON scene summary (floors, envelope, camera, labels)
//! - a y-up Wavefront OBJ with one object per floor plus the bulkhead
//!
//! With no export flags the summary is printed to stdout.

use anyhow::{bail, Context};
use clap::Parser;
use massing_lite_core::Floor;
use massing_lite_viewer::{DisplayToggles, FloorEventSink, Viewer};
use std::path::PathBuf;

mod config;
mod export;
mod loader;

use config::{Config, LogFormat};
use loader::{LoadState, Loader, Source};

/// Render massing scenarios from a zoning backend payload
#[derive(Parser, Debug)]
#[command(name = "massing-view")]
#[command(version, about = "Compose massing scenes and export JSON summaries and OBJ models")]
struct Args {
    /// Payload path, `-` for stdin, or an http(s) URL
    source: String,

    /// Treat SOURCE as the JSON payload itself
    #[arg(long)]
    inline: bool,

    /// Active scenario index
    #[arg(long, default_value_t = 0)]
    scenario: usize,

    /// Compare against this scenario side by side
    #[arg(long, value_name = "M")]
    compare: Option<usize>,

    /// Hide the zoning envelope
    #[arg(long)]
    no_envelope: bool,

    /// Hide the lot fill and outline
    #[arg(long)]
    no_lot: bool,

    /// Shade required front and rear yards
    #[arg(long)]
    setbacks: bool,

    /// Show floor labels
    #[arg(long)]
    labels: bool,

    /// Write the scene summary JSON here
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Write a Wavefront OBJ of the massing here
    #[arg(long, value_name = "PATH")]
    obj: Option<PathBuf>,
}

impl Args {
    /// Command-line flags over configured defaults
    fn toggles(&self, defaults: DisplayToggles) -> DisplayToggles {
        DisplayToggles {
            show_envelope: defaults.show_envelope && !self.no_envelope,
            show_lot: defaults.show_lot && !self.no_lot,
            show_setbacks: defaults.show_setbacks || self.setbacks,
            show_labels: defaults.show_labels || self.labels,
        }
    }
}

/// Forwards floor events to the log
struct LogSink;

impl FloorEventSink for LogSink {
    fn floor_hovered(&mut self, floor: Option<&Floor>) {
        tracing::debug!(floor = ?floor.map(|f| f.floor_num), "Hovered floor changed");
    }

    fn floor_selected(&mut self, floor: Option<&Floor>) {
        tracing::debug!(floor = ?floor.map(|f| f.floor_num), "Selected floor changed");
    }
}

fn init_tracing(format: LogFormat) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,massing_lite=debug".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_env();
    init_tracing(config.log_format);

    tracing::info!(
        output_dir = %config.output_dir.display(),
        fetch_timeout_secs = config.fetch_timeout_secs,
        "Starting massing viewer"
    );

    let source = Source::parse(&args.source, args.inline);
    let mut loader = Loader::new(config.fetch_timeout());
    if loader.load(&source).is_ready() {
        tracing::debug!(source = %source.describe(), "Payload ready");
    }
    let data = match loader.take() {
        LoadState::Ready(data) => *data,
        LoadState::Failed(err) => {
            tracing::error!(%err, source = %source.describe(), "Could not load massing payload");
            bail!("could not load {}: {}", source.describe(), err);
        }
        LoadState::Loading => bail!("load of {} did not finish", source.describe()),
    };

    let scenario_count = data.scenario_count();
    let mut viewer = Viewer::new(Box::new(LogSink)).with_toggles(args.toggles(config.toggles));
    viewer.load(data);

    if args.scenario >= scenario_count {
        bail!(
            "scenario {} out of range; payload has {}",
            args.scenario,
            scenario_count
        );
    }
    viewer.set_active_scenario(args.scenario);
    if let Some(compare) = args.compare {
        viewer.set_comparison(true, compare);
        if !viewer.comparison_shown() {
            tracing::warn!(scenario_count, "Comparison needs a second scenario; showing one");
        }
    }

    let scene = viewer.scene().context("No scene for the active scenario")?;
    for panel in &scene.panels {
        tracing::info!(
            scenario = panel.scenario,
            name = %panel.name,
            floors = panel.building.floors.len(),
            bulkhead = panel.building.bulkhead.is_some(),
            envelope = panel.envelope.is_some(),
            "Composed panel"
        );
    }

    if args.json.is_none() && args.obj.is_none() {
        println!("{}", export::summary_json(scene)?);
        return Ok(());
    }
    if let Some(path) = &args.json {
        export::write_file(&config.output_path(path), &export::summary_json(scene)?)?;
    }
    if let Some(path) = &args.obj {
        let obj = export::scene_obj(scene).context("Failed to format OBJ")?;
        export::write_file(&config.output_path(path), &obj)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "massing-view",
            "payload.json",
            "--no-envelope",
            "--labels",
            "--compare",
            "1",
        ]);
        assert_eq!(args.compare, Some(1));
        assert_eq!(args.scenario, 0);

        let toggles = args.toggles(DisplayToggles::default());
        assert!(!toggles.show_envelope);
        assert!(toggles.show_lot);
        assert!(!toggles.show_setbacks);
        assert!(toggles.show_labels);
    }

    #[test]
    fn test_config_defaults_survive_without_flags() {
        let args = Args::parse_from(["massing-view", "-"]);
        let configured = DisplayToggles {
            show_envelope: false,
            show_lot: true,
            show_setbacks: true,
            show_labels: false,
        };
        assert_eq!(args.toggles(configured), configured);
    }
}
