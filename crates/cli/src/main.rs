#![deny(unsafe_code)]
//! CLI binary for the instanton lab.
//!
//! Subcommands:
//! - `run`: build a session from flags or a scenario file, step it, print a
//!   summary and optionally write a PNG snapshot
//! - `list`: print potential families, seed shapes, policies and layers

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use instanton_core::Engine;
use instanton_render::Layer;
use instanton_wave::{
    FieldStats, InstantonLab, Placement, PotentialFamily, Scenario, SeedShape, StabilityPolicy,
};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "instanton-lab", about = "Nonlinear wave-field simulator")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a simulation and print a summary.
    Run(RunArgs),
    /// List potential families, seed shapes, stability policies and layers.
    List,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Grid width in cells.
    #[arg(short = 'W', long, default_value_t = 400)]
    width: usize,

    /// Grid height in cells.
    #[arg(short = 'H', long, default_value_t = 300)]
    height: usize,

    /// Number of simulation steps.
    #[arg(short, long, default_value_t = 200)]
    steps: u64,

    /// Noise generator seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Potential family (mexican_hat, harmonic, double_well, sinusoidal, ripple, spiral).
    #[arg(long)]
    field_type: Option<String>,

    /// Time step per step.
    #[arg(long)]
    dt: Option<f64>,

    /// Stochastic forcing amplitude.
    #[arg(long)]
    noise: Option<f64>,

    /// Stability policy (unchecked, report, clamp, halt).
    #[arg(long)]
    stability: Option<String>,

    /// Magnitude bound for the clamp policy.
    #[arg(long)]
    clamp_limit: Option<f64>,

    /// Seed placement as `shape:x:y` or `shape:x:y:at_step`. Repeatable.
    #[arg(long = "place", value_name = "SHAPE:X:Y")]
    placements: Vec<String>,

    /// Scenario JSON file. Replaces every other run flag.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Write a PNG of `--layer` here.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Layer to snapshot: composite (RGB view with instanton markers), or
    /// phi, gradient, potential as grayscale.
    #[arg(long, default_value = "composite")]
    layer: String,
}

impl RunArgs {
    fn params(&self) -> Value {
        let mut params = Map::new();
        if let Some(name) = &self.field_type {
            params.insert("field_type".into(), json!(name));
        }
        if let Some(dt) = self.dt {
            params.insert("dt".into(), json!(dt));
        }
        if let Some(noise) = self.noise {
            params.insert("noise_level".into(), json!(noise));
        }
        if let Some(policy) = &self.stability {
            params.insert("stability".into(), json!(policy));
        }
        if let Some(limit) = self.clamp_limit {
            params.insert("clamp_limit".into(), json!(limit));
        }
        Value::Object(params)
    }

    fn scenario(&self) -> Result<Scenario, CliError> {
        if let Some(path) = &self.scenario {
            return read_scenario(path);
        }
        let placements = self
            .placements
            .iter()
            .map(|text| parse_placement(text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Scenario {
            width: self.width,
            height: self.height,
            seed: self.seed,
            steps: self.steps,
            params: self.params(),
            placements,
        })
    }
}

fn read_scenario(path: &Path) -> Result<Scenario, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    Scenario::from_json_str(&text)
        .map_err(|e| CliError::Input(format!("invalid scenario {}: {e}", path.display())))
}

/// Parses `shape:x:y` with an optional trailing `:at_step`.
fn parse_placement(text: &str) -> Result<Placement, CliError> {
    let bad = |why: String| CliError::Input(format!("invalid --place '{text}': {why}"));
    let parts: Vec<&str> = text.split(':').collect();
    let (shape, x, y, at_step) = match parts.as_slice() {
        [shape, x, y] => (*shape, *x, *y, "0"),
        [shape, x, y, at_step] => (*shape, *x, *y, *at_step),
        _ => return Err(bad("expected shape:x:y[:at_step]".into())),
    };
    Ok(Placement {
        shape: SeedShape::from_name(shape).map_err(|e| bad(e.to_string()))?,
        x: x.parse::<isize>().map_err(|e| bad(format!("x: {e}")))?,
        y: y.parse::<isize>().map_err(|e| bad(format!("y: {e}")))?,
        at_step: at_step.parse::<u64>().map_err(|e| bad(format!("at_step: {e}")))?,
    })
}

fn summary(lab: &InstantonLab, snapshot: Option<&Path>) -> Value {
    let grid = lab.grid();
    json!({
        "width": grid.width(),
        "height": grid.height(),
        "seed": lab.seed(),
        "steps": grid.clock().step(),
        "time": grid.clock().time(),
        "params": lab.params(),
        "diverged": lab.is_diverged(),
        "instantons": grid.instantons(),
        "phi": FieldStats::of(grid.phi()),
        "gradient": FieldStats::of(grid.gradient()),
        "potential": FieldStats::of(grid.potential()),
        "snapshot": snapshot.map(|p| p.display().to_string()),
    })
}

fn print_stats(name: &str, stats: &FieldStats) {
    match (stats.min, stats.max, stats.mean) {
        (Some(min), Some(max), Some(mean)) => println!(
            "  {name:<9} min {min:+.4e}  max {max:+.4e}  mean {mean:+.4e}  non-finite {}",
            stats.non_finite
        ),
        _ => println!("  {name:<9} no finite cells ({} non-finite)", stats.non_finite),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let families: Vec<&str> = PotentialFamily::ALL.iter().map(|f| f.name()).collect();
            let shapes: Vec<&str> = SeedShape::ALL.iter().map(|s| s.name()).collect();
            let policies = StabilityPolicy::NAMES;
            let layers: Vec<&str> = Layer::ALL.iter().map(|l| l.name()).collect();
            if cli.json {
                let info = json!({
                    "potential_families": families,
                    "seed_shapes": shapes,
                    "stability_policies": policies,
                    "layers": layers,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Potential families:");
                println!("  {}", families.join(", "));
                println!("Seed shapes:");
                println!("  {}", shapes.join(", "));
                println!("Stability policies:");
                println!("  {} (default {})", policies.join(", "), StabilityPolicy::default());
                println!("Layers:");
                println!("  {}", layers.join(", "));
            }
        }
        Command::Run(args) => {
            let layer = Layer::from_name(&args.layer).map_err(|e| CliError::Input(e.to_string()))?;
            let scenario = args.scenario()?;
            info!(
                width = scenario.width,
                height = scenario.height,
                steps = scenario.steps,
                placements = scenario.placements.len(),
                "running scenario"
            );
            let lab = scenario.run()?;

            if let Some(path) = &args.snapshot {
                instanton_render::snapshot::write_layer_png(&lab, layer, path)?;
            }

            if cli.json {
                let info = summary(&lab, args.snapshot.as_deref());
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let grid = lab.grid();
                println!(
                    "{}x{} grid, {} steps (t = {:.4}), seed {}, {} instantons",
                    grid.width(),
                    grid.height(),
                    grid.clock().step(),
                    grid.clock().time(),
                    lab.seed(),
                    grid.instantons().len()
                );
                println!("params: {}", lab.params());
                print_stats("phi", &FieldStats::of(grid.phi()));
                print_stats("gradient", &FieldStats::of(grid.gradient()));
                print_stats("potential", &FieldStats::of(grid.potential()));
                if lab.is_diverged() {
                    println!("warning: field diverged");
                }
                if let Some(path) = &args.snapshot {
                    eprintln!("{layer} -> {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
