//! Drives a `KMeansEngine` the way an interactive client does: generate a
//! random point set in the unit square, then request one step at a time
//! until the engine reports convergence.
//!
//! Usage: `kmeans_demo [n_points] [k] [method] [seed] [delay_ms]`

use std::env;
use std::process;
use std::thread;
use std::time::Duration;

use env_logger::Env;
use kmeans_stepper::{KMeansConfig, KMeansEngine, Point};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

struct Args {
    n_points: usize,
    k: usize,
    method: String,
    seed: Option<u64>,
    delay: Duration,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let number = |idx: usize, name: &str, default: u64| -> Result<u64, String> {
        match args.get(idx) {
            Some(raw) => raw
                .parse()
                .map_err(|_| format!("{name} must be a non-negative integer, got '{raw}'")),
            None => Ok(default),
        }
    };

    Ok(Args {
        n_points: number(0, "n_points", 100)? as usize,
        k: number(1, "k", 3)? as usize,
        method: args.get(2).cloned().unwrap_or_else(|| "random".to_string()),
        seed: match args.get(3) {
            Some(_) => Some(number(3, "seed", 0)?),
            None => None,
        },
        delay: Duration::from_millis(number(4, "delay_ms", 0)?),
    })
}

fn main() {
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("usage: kmeans_demo [n_points] [k] [method] [seed] [delay_ms]");
            process::exit(2);
        }
    };

    let mut rng = match args.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    };
    let points: Vec<Point> = (0..args.n_points)
        .map(|_| Point::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();

    let mut config = KMeansConfig::new(args.k);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let mut engine = KMeansEngine::new(config);

    if let Err(e) = engine.set_data(points) {
        eprintln!("set_data failed: {e}");
        process::exit(1);
    }

    loop {
        let result = match engine.step(&args.method) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("step failed: {e}");
                process::exit(1);
            }
        };

        let centroids: Vec<String> = result.centroids.iter().map(Point::to_string).collect();
        let mut sizes = vec![0_usize; result.centroids.len()];
        for &c in &result.clusters {
            sizes[c] += 1;
        }
        println!(
            "step {:>3}: centroids [{}] sizes {:?}",
            result.iteration,
            centroids.join(", "),
            sizes
        );

        if result.converged {
            println!("converged after {} steps", result.iteration);
            break;
        }
        if result.iteration >= engine.config().max_iterations {
            println!("stopped after {} steps without converging", result.iteration);
            break;
        }
        if !args.delay.is_zero() {
            thread::sleep(args.delay);
        }
    }
}
