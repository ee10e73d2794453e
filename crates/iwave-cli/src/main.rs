use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iwave_core::{DispersionKernel, DisplayMap, Rain, SimConfig, Simulation};
use log::{debug, info};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "iwave", about = "iWave height-field simulation driver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Step a simulation and print a JSON run summary.
    Run(RunArgs),
    /// Print the dispersion kernel as JSON.
    Kernel {
        #[arg(long, default_value_t = 6)]
        radius: usize,
        #[arg(long, default_value_t = 1.0)]
        sigma: f64,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// JSON config; command-line size flags override it.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 500)]
    steps: usize,
    #[arg(long, default_value_t = 50)]
    sample_every: usize,
    /// Chance per step of a random source drop.
    #[arg(long, default_value_t = 0.0)]
    rain: f64,
    #[arg(long, default_value_t = 1.0)]
    rain_strength: f32,
    /// Drop a unit source at the grid centre before the first step.
    #[arg(long)]
    centre_drop: bool,
    /// Directory for PGM frames of the display map.
    #[arg(long)]
    frames: Option<PathBuf>,
    #[arg(long, default_value_t = 10)]
    frame_every: usize,
    /// Write the summary here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct KernelDump {
    radius: usize,
    sigma: f64,
    sum: f64,
    rows: Vec<Vec<f32>>,
}

fn load_config(args: &RunArgs) -> Result<SimConfig> {
    let mut config: SimConfig = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    config = config.with_size(args.width, args.height);
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn kernel_dump(radius: usize, sigma: f64) -> Result<KernelDump> {
    let config = SimConfig {
        kernel_radius: radius,
        sigma,
        ..SimConfig::default()
    };
    config.validate()?;
    let kernel = DispersionKernel::from_config(&config);
    Ok(KernelDump {
        radius,
        sigma,
        sum: kernel.sum(),
        rows: kernel.rows().map(|row| row.to_vec()).collect(),
    })
}

/// Frame `index` shows the field after `index` steps.
fn frame_due(index: usize, frame_every: usize) -> bool {
    index % frame_every == 0
}

fn write_pgm(path: &Path, display: &DisplayMap) -> Result<()> {
    let mut file =
        fs::File::create(path).with_context(|| format!("creating frame {}", path.display()))?;
    write!(file, "P5\n{} {}\n255\n", display.width(), display.height())?;
    file.write_all(&display.to_luminance_bytes())?;
    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    let config = load_config(&args)?;
    let mut sim = Simulation::try_new(config.clone())?;
    let mut rain = Rain::new(config.seed, args.rain, args.rain_strength);
    if args.centre_drop {
        sim.grid_mut()
            .add_source(config.width / 2, config.height / 2, 1.0);
    }

    let mut display = DisplayMap::new(config.width, config.height);
    if let Some(dir) = &args.frames {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let frame_every = args.frame_every.max(1);
    let mut frame_error = None;

    let summary = sim.try_run_experiment_with(args.steps, args.sample_every, |grid, step| {
        if let Some((x, y)) = rain.apply(grid) {
            debug!("rain drop at ({x}, {y}) before step {step}");
        }
        // Frames show the field as it stood before this step.
        if let Some(dir) = &args.frames {
            if frame_due(step - 1, frame_every) && frame_error.is_none() {
                display.refresh(grid);
                let path = dir.join(format!("frame_{:06}.pgm", step - 1));
                frame_error = write_pgm(&path, &display).err();
            }
        }
    })?;
    if let Some(err) = frame_error {
        return Err(err);
    }
    if let Some(dir) = &args.frames {
        if frame_due(args.steps, frame_every) {
            display.refresh(sim.grid());
            write_pgm(&dir.join(format!("frame_{:06}.pgm", args.steps)), &display)?;
        }
    }
    info!(
        "ran {} steps on {}x{} grid, final energy {:.6}",
        summary.steps, summary.width, summary.height, summary.final_energy
    );

    let json = serde_json::to_string_pretty(&summary)?;
    match &args.output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("writing summary {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Kernel { radius, sigma } => {
            let dump = kernel_dump(radius, sigma)?;
            println!("{}", serde_json::to_string_pretty(&dump)?);
            Ok(())
        }
    }
}
