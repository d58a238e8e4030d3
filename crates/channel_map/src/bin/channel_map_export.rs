use std::env;
use std::path::PathBuf;
use std::process;

use channel_map::{
    load_map_inputs, Lcg, MapController, ProjectionParams, SceneExport, SeedOptions, Viewport,
    DEFAULT_CENTER, DEFAULT_SCALE,
};

#[derive(Debug, Clone, PartialEq)]
struct CliOptions {
    boundary_path: PathBuf,
    channels_path: PathBuf,
    out_path: Option<PathBuf>,
    seed: u64,
    max_ticks: u64,
    width: f64,
    height: f64,
    spaced: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            boundary_path: PathBuf::from("data/boundary.json"),
            channels_path: PathBuf::from("data/channels.json"),
            out_path: None,
            seed: 0x5eed,
            max_ticks: 400,
            width: 960.0,
            height: 640.0,
            spaced: false,
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = match parse_options(args.iter().skip(1).map(|arg| arg.as_str())) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            print_help();
            process::exit(1);
        }
    };

    let inputs = match load_map_inputs(&options.boundary_path, &options.channels_path) {
        Ok(inputs) => inputs,
        Err(err) => {
            eprintln!("failed to load map inputs: {err}");
            process::exit(1);
        }
    };

    let viewport = Viewport::new(options.width, options.height);
    let params = ProjectionParams::for_viewport(DEFAULT_CENTER, DEFAULT_SCALE, viewport);
    let mut controller =
        MapController::with_mercator(inputs.boundary, inputs.records, params, viewport);
    let mut rng = Lcg::new(options.seed);
    let seeded = if options.spaced {
        controller.seed_spaced(&mut rng, SeedOptions::default())
    } else {
        controller.seed(&mut rng, SeedOptions::default())
    };
    if let Err(err) = seeded {
        eprintln!("failed to place markers: {err}");
        process::exit(1);
    }

    let mut ticks = 0u64;
    let mut reverted = 0usize;
    while ticks < options.max_ticks && !controller.is_settled() {
        reverted += controller.step().reverted;
        ticks += 1;
    }

    println!("markers: {}", controller.markers().len());
    println!("seed: {}", options.seed);
    println!("ticks: {ticks}");
    println!("settled: {}", controller.is_settled());
    println!("reverted_moves: {reverted}");

    let scene = SceneExport::capture(&controller, 0.0);
    match &options.out_path {
        Some(path) => {
            if let Err(err) = scene.write_to(path) {
                eprintln!("{err}");
                process::exit(1);
            }
            println!("scene: {}", path.display());
        }
        None => match scene.to_json_pretty() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("serialize scene failed: {err}");
                process::exit(1);
            }
        },
    }
}

fn parse_options<'a>(args: impl Iterator<Item = &'a str>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.peekable();
    while let Some(arg) = iter.next() {
        match arg {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--boundary" => {
                options.boundary_path = PathBuf::from(
                    iter.next()
                        .ok_or_else(|| "--boundary requires a path".to_string())?,
                );
            }
            "--channels" => {
                options.channels_path = PathBuf::from(
                    iter.next()
                        .ok_or_else(|| "--channels requires a path".to_string())?,
                );
            }
            "--out" => {
                options.out_path = Some(PathBuf::from(
                    iter.next().ok_or_else(|| "--out requires a path".to_string())?,
                ));
            }
            "--seed" => {
                let raw = iter
                    .next()
                    .ok_or_else(|| "--seed requires an integer".to_string())?;
                options.seed = parse_seed(raw).ok_or_else(|| "--seed requires an integer".to_string())?;
            }
            "--max-ticks" => {
                let raw = iter
                    .next()
                    .ok_or_else(|| "--max-ticks requires a positive integer".to_string())?;
                options.max_ticks = raw
                    .parse::<u64>()
                    .ok()
                    .filter(|value| *value > 0)
                    .ok_or_else(|| "--max-ticks requires a positive integer".to_string())?;
            }
            "--size" => {
                let raw = iter
                    .next()
                    .ok_or_else(|| "--size requires <width>x<height>".to_string())?;
                let (width, height) =
                    parse_size(raw).ok_or_else(|| "--size requires <width>x<height>".to_string())?;
                options.width = width;
                options.height = height;
            }
            "--spaced" => options.spaced = true,
            _ => return Err(format!("unexpected argument: {arg}")),
        }
    }
    Ok(options)
}

fn parse_seed(raw: &str) -> Option<u64> {
    match raw.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

fn parse_size(raw: &str) -> Option<(f64, f64)> {
    let (width, height) = raw.split_once('x')?;
    let width = width.trim().parse::<f64>().ok()?;
    let height = height.trim().parse::<f64>().ok()?;
    Viewport::new(width, height)
        .is_drawable()
        .then_some((width, height))
}

fn print_help() {
    println!("Usage: channel_map_export [--boundary <path>] [--channels <path>] [--out <path>]");
    println!("Options:");
    println!("  --boundary <path>   Region GeoJSON (default: data/boundary.json)");
    println!("  --channels <path>   Channel records or catalog JSON (default: data/channels.json)");
    println!("  --out <path>        Write the scene JSON here instead of stdout");
    println!("  --seed <n>          Placement seed, decimal or 0x-hex (default: 0x5eed)");
    println!("  --max-ticks <n>     Simulation tick cap (default: 400)");
    println!("  --size <w>x<h>      Surface size in pixels (default: 960x640)");
    println!("  --spaced            Keep seeded markers apart");
}
