//! Breadboard - circuit completeness checker
//!
//! Evaluates a diagram snapshot exported by the editor.
//!
//! # Usage
//!
//! ```bash
//! breadboard diagram.json
//! RUST_LOG=debug breadboard diagram.json --json --per-component
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::debug;

use breadboard_core::{
    circuit::Diagram,
    error::Result,
    eval::{Conduction, EvalConfig, Evaluation, Lighting},
    PartKind,
};

/// Check whether a breadboard diagram lights its LEDs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the diagram snapshot (.json)
    #[arg(value_name = "DIAGRAM_FILE")]
    diagram_file: PathBuf,

    /// Print the full evaluation as JSON
    #[arg(long)]
    json: bool,

    /// Light only the LEDs inside a complete circuit
    #[arg(long)]
    per_component: bool,

    /// Only follow wires; parts do not conduct between their terminals
    #[arg(long)]
    wires_only: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let diagram = Diagram::load(&args.diagram_file)?;
    debug!(
        "loaded {} parts and {} connections from {}",
        diagram.parts().len(),
        diagram.connections().len(),
        args.diagram_file.display()
    );

    let mut config = EvalConfig::new();
    if args.per_component {
        config = config.with_lighting(Lighting::PerComponent);
    }
    if args.wires_only {
        config = config.with_conduction(Conduction::WiresOnly);
    }

    let evaluation = diagram.evaluate(&config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        print_summary(&evaluation);
    }

    Ok(())
}

fn print_summary(evaluation: &Evaluation) {
    println!("{}", evaluation.message);
    println!(
        "circuit: {}",
        if evaluation.complete { "complete" } else { "incomplete" }
    );
    for led in evaluation
        .updated_parts
        .iter()
        .filter(|p| p.kind == PartKind::Led)
    {
        if led.glow {
            println!("  led {}: on ({:.0}%)", led.id, led.brightness * 100.0);
        } else {
            println!("  led {}: off", led.id);
        }
    }
}
