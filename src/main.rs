use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;

use probetrace::camera::{Camera, CameraDeclaration};
use probetrace::ppm::PpmImage;
use probetrace::render::{render, RenderSettings};
use probetrace::scene::Scene;
use probetrace::scenefile::{generate_scene, load_lightmap, load_scene};
use probetrace::tracer::{TraceMode, TraceSettings};

/// Log levels selectable from the command line
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "probetrace")]
#[command(about = "Recursive sphere ray tracer with light probe support")]
struct Args {
    /// JSON scene description; a generated scene is used when omitted
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long, default_value = "400")]
    width: usize,

    /// Image height in pixels
    #[arg(long, default_value = "300")]
    height: usize,

    /// Output file (ASCII PPM)
    #[arg(short, long, default_value = "output.ppm")]
    output: PathBuf,

    /// Shade by distance to the nearest hit instead of tracing bounces
    #[arg(long)]
    depth: bool,

    /// PFM light probe, overriding any declared in the scene
    #[arg(short, long)]
    environment: Option<PathBuf>,

    /// Seed for reproducible renders
    #[arg(long)]
    seed: Option<u64>,

    /// Write a generated scene description to this path and exit
    #[arg(long)]
    generate: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logger(args.log_level.clone().into());

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if let Some(ref path) = args.generate {
        generate_scene(&mut rng).write(path)?;
        log::info!("Wrote generated scene to {}", path.display());
        return Ok(());
    }

    let (mut scene, camera): (Scene, CameraDeclaration) = match args.scene {
        Some(ref path) => load_scene(path)?,
        None => {
            let decl = generate_scene(&mut rng);
            (decl.build(std::path::Path::new("."))?, decl.camera)
        },
    };
    if let Some(ref path) = args.environment {
        scene.environment = Some(Box::new(load_lightmap(path)?));
    }

    let mode = if args.depth { TraceMode::Depth } else { TraceMode::Shaded };
    let settings = RenderSettings {
        width: args.width,
        height: args.height,
        trace: TraceSettings { mode, ..TraceSettings::default() },
        seed: args.seed,
    };
    let camera = Camera::new(&camera, args.width as f32 / args.height as f32);

    let output = render(&scene, &camera, &settings)?;
    PpmImage::from_raster(&output.raster).write_to(&args.output)?;
    log::info!("Wrote {} ({} ray casts)", args.output.display(), output.casts);
    Ok(())
}
