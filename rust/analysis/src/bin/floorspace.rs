// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: run floor plan analyses and print the results as JSON.
//!
//! Usage:
//!   floorspace <command> <plan.json> [options]

use std::env;
use std::path::Path;

use anyhow::{bail, Context, Result};
use floorspace_analysis::{EngineConfig, FloorAnalyzer, FloorPlan, NodeValue};
use floorspace_geometry::Point2D;
use serde::Serialize;

enum Command {
    Movement,
    Privacy,
    Viewpoint(Point2D),
    Graph,
}

#[derive(Serialize)]
struct NodeList {
    nodes: Vec<NodeValue>,
}

#[derive(Serialize)]
struct ViewpointOutput {
    polygon_points: Vec<Point2D>,
    converged: bool,
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    // Initialize logging (stderr, stdout carries the JSON)
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "info,floorspace=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let (command, mut i) = match args[1].as_str() {
        "movement" => (Command::Movement, 2),
        "privacy" => (Command::Privacy, 2),
        "graph" => (Command::Graph, 2),
        "viewpoint" => {
            if args.len() < 5 {
                print_usage();
                bail!("viewpoint needs X and Y");
            }
            let x: f64 = args[2].parse().context("Invalid X coordinate")?;
            let y: f64 = args[3].parse().context("Invalid Y coordinate")?;
            (Command::Viewpoint(Point2D::new(x, y)), 4)
        }
        other => {
            print_usage();
            bail!("Unknown command: {}", other);
        }
    };

    let plan_path = &args[i];
    i += 1;

    // Parse options
    let mut config_path: Option<String> = None;
    let mut compact = false;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    bail!("--config needs a path");
                };
                config_path = Some(path.clone());
            }
            "--compact" => {
                compact = true;
            }
            other => {
                print_usage();
                bail!("Unknown option: {}", other);
            }
        }
        i += 1;
    }

    let config = load_config(config_path.as_deref())?;
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .context("Failed to initialize thread pool")?;

    let plan = FloorPlan::from_json_file(plan_path)
        .with_context(|| format!("Cannot load floor plan '{}'", plan_path))?;
    let analyzer = FloorAnalyzer::new(plan, config)?;

    let output = match command {
        Command::Movement => to_json(
            &NodeList {
                nodes: analyzer.movement().node_values(),
            },
            compact,
        )?,
        Command::Privacy => to_json(
            &NodeList {
                nodes: analyzer.privacy()?.node_values(),
            },
            compact,
        )?,
        Command::Viewpoint(point) => {
            let Some(polygon) = analyzer.viewpoint(point)? else {
                bail!("Point ({}, {}) is not inside any room", point.x, point.y);
            };
            to_json(
                &ViewpointOutput {
                    polygon_points: polygon.vertices,
                    converged: polygon.converged,
                },
                compact,
            )?
        }
        Command::Graph => to_json(&analyzer.floor_graph().graph.to_snapshot(), compact)?,
    };

    println!("{}", output);
    Ok(())
}

/// Defaults, then the config file, then `FLOORSPACE_*` variables.
fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    let base = match path {
        Some(path) => EngineConfig::from_json_file(Path::new(path))
            .with_context(|| format!("Cannot load config '{}'", path))?,
        None => EngineConfig::default(),
    };
    let config = base.with_overrides(|key| env::var(key).ok());
    config.validate()?;
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

fn print_usage() {
    eprintln!("Usage: floorspace <command> <plan.json> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  movement             Movement density per node");
    eprintln!("  privacy              Privacy exposure per mesh sample");
    eprintln!("  viewpoint <X> <Y>    Visibility polygon from a point");
    eprintln!("  graph                Floor navigation graph");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>      JSON engine configuration");
    eprintln!("  --compact            Print JSON on a single line");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FLOORSPACE_*         Override configuration values (see EngineConfig)");
    eprintln!("  RUST_LOG             Log filter (default: info,floorspace=debug)");
}
