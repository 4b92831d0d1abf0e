//! Program for constructing synthetic point-cloud dataset files: a
//! structure shape (spring or ball) buried in a box of uniform noise.
//! Noise points come first in the file with label 0, structure points
//! after with label 1.
//!
//! Example:
//!
//! ```text
//! cargo run --bin gencloud -- --out spring.cp --noise 40000 --structure 100000 spring
//! ```

use clap::Parser;

use annotscope::{
    args::{GenCloudArgs, ShapeCommand},
    cloud_data_format::CloudFile,
    cloud_shapes,
};

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::{error::Error, process};

fn main() {
    env_logger::init();
    let args = GenCloudArgs::parse();

    if let Err(error) = run(args) {
        eprintln!("gencloud: {}", error);
        process::exit(1);
    }
}

fn run(args: GenCloudArgs) -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(args.seed);

    let noise = cloud_shapes::uniform_box(
        &mut rng,
        args.noise_count,
        [0.0, 0.0, 0.0],
        [args.extent, args.extent, args.extent],
    );

    let structure = match &args.shape {
        ShapeCommand::Spring(spring) => cloud_shapes::spring(
            &mut rng,
            args.structure_count,
            spring.small_radius,
            spring.big_radius,
            spring.length,
            spring.nb_round,
        ),
        ShapeCommand::Ball(ball) => cloud_shapes::ball(
            &mut rng,
            args.structure_count,
            [0.0, 0.0, 0.0],
            ball.radius,
        ),
    };
    let cloud = CloudFile::from_noise_and_structure(noise, structure);
    cloud.to_path(&args.outfile)?;

    info!(
        "wrote {} points ({} noise, {} structure) to {}",
        cloud.len(),
        args.noise_count,
        args.structure_count,
        args.outfile.display()
    );
    Ok(())
}
