//! Offline analysis of recorded study sessions. Feeds every log file
//! through the session parser, joins the tablets into participant pairs,
//! and writes the per-technique tables and confidence-interval charts.
//!
//! Example:
//!
//! ```text
//! cargo run --bin extract -- logs/pair1.json logs/pair2.json --output results
//! ```

use clap::Parser;

use annotscope::{
    args::ExtractArgs,
    config::{ExtractConfig, MalformedPolicy},
    log_event::SessionLog,
    session_parser::SessionParser,
    study_report::{pair_tablets, write_reports},
};

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::{error::Error, fs, process};

fn main() {
    env_logger::init();
    let args = ExtractArgs::parse();

    if let Err(error) = run(args) {
        eprintln!("extract: {}", error);
        process::exit(1);
    }
}

fn run(args: ExtractArgs) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => ExtractConfig::from_path(path)?,
        None => ExtractConfig::default(),
    };
    if let Some(confidence) = args.confidence {
        config.confidence = confidence;
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.strict {
        config.on_malformed = MalformedPolicy::Abort;
    }

    let mut sessions = Vec::new();
    for path in &args.logs {
        info!("opening {}", path.display());

        // An unreadable path kills the whole run; a file that reads but
        // does not parse is subject to the configured policy.
        let text = fs::read_to_string(path)
            .map_err(|e| format!("could not open {}: {}", path.display(), e))?;

        match serde_json::from_str::<SessionLog>(&text) {
            Ok(session) => sessions.push(SessionParser::parse(&session.data)),
            Err(e) => match config.on_malformed {
                MalformedPolicy::Skip => {
                    warn!("could not parse {}: {}; skipping", path.display(), e);
                }
                MalformedPolicy::Abort => {
                    return Err(format!("could not parse {}: {}", path.display(), e).into());
                }
            },
        }
    }

    let pairs = pair_tablets(sessions);
    let annotation_total: usize = pairs
        .iter()
        .flat_map(|p| p.tablets.iter())
        .map(|t| t.annotation_count())
        .sum();
    info!(
        "parsed {} pair(s), {} annotation(s)",
        pairs.len(),
        annotation_total
    );

    fs::create_dir_all(&args.output)?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let summaries = write_reports(&pairs, &config, &args.output, &mut rng)?;

    for summary in &summaries {
        println!(
            "pointing {}: n={}, acc {:.4} ± {:.4}, annot TCT {:.1} ± {:.1} ms, trial TCT {:.1} ± {:.1} ms",
            summary.pointing_id,
            summary.count,
            summary.accuracy.0,
            summary.accuracy.1,
            summary.annot_tct_ms.0,
            summary.annot_tct_ms.1,
            summary.trial_tct_ms.0,
            summary.trial_tct_ms.1,
        );
    }

    Ok(())
}
