use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rerun::TimeCell;
use rover_perception::coordinates::NavigationSummary;
use rover_perception::data_loader::{
    DEFAULT_CHUNK_SIZE, FrameRecord, load_frame, load_frame_chunks, load_manifest,
};
use rover_perception::io::{object_from_json, object_to_json, save_image, write_polar_report};
use rover_perception::visualization::{log_image, log_navigable_points, render_world_map};
use rover_perception::{MapChannel, Perception, PerceptionConfig};

#[derive(Parser)]
#[command(version, about, author)]
struct RoverPerceptionCli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration as JSON
    DefaultConfig {
        /// Output path
        #[arg(short, long, default_value = "perception.json")]
        output: PathBuf,
    },
    /// Process a single camera image
    Frame {
        /// Camera image
        image: PathBuf,

        /// Configuration JSON, defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Rover x position in map cells
        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        x: f64,

        /// Rover y position in map cells
        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        y: f64,

        /// Heading in degrees, counter-clockwise from world +x
        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        yaw: f64,

        /// Output folder
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },
    /// Process a recorded run listed in a JSON manifest
    Run {
        /// JSON array of {"image", "x", "y", "yaw"} entries
        manifest: PathBuf,

        /// Configuration JSON, defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output folder
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Also record the run to a rerun .rrd file
        #[arg(long)]
        rerun: Option<PathBuf>,

        /// Frames decoded in parallel before they are processed
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PerceptionConfig> {
    match path {
        Some(p) => object_from_json(p).with_context(|| format!("reading config {}", p.display())),
        None => Ok(PerceptionConfig::default()),
    }
}

fn run_frame(
    image: &Path,
    config: &PerceptionConfig,
    record: FrameRecord,
    output: &Path,
) -> anyhow::Result<()> {
    let perception = Perception::from_config(config)?;
    let grid = perception.new_grid();
    let frame = load_frame(&record).with_context(|| format!("loading {}", image.display()))?;
    let out = perception.process(frame, &grid)?;

    std::fs::create_dir_all(output)?;
    save_image(output.join("vision.png"), &out.vision_image)?;
    save_image(output.join("worldmap.png"), &render_world_map(&grid.read()))?;
    write_polar_report(output.join("navigable.json"), 0, &out.nav_polar)?;

    let summary = NavigationSummary::from_polar(&out.nav_polar);
    log::info!(
        "{} navigable px, mean angle {:.2} deg, mean distance {:.2} px",
        summary.count,
        summary.mean_angle_deg,
        summary.mean_distance
    );
    Ok(())
}

fn run_manifest(
    manifest: &Path,
    config: &PerceptionConfig,
    output: &Path,
    rerun_path: Option<&Path>,
    chunk_size: usize,
) -> anyhow::Result<()> {
    let perception = Perception::from_config(config)?;
    let grid = perception.new_grid();
    let records = load_manifest(manifest).with_context(|| format!("reading {}", manifest.display()))?;
    let recording = match rerun_path {
        Some(p) => Some(rerun::RecordingStreamBuilder::new("rover_perception").save(p)?),
        None => None,
    };
    std::fs::create_dir_all(output.join("frames"))?;

    let now = Instant::now();
    let mut processed = 0usize;
    let frames = load_frame_chunks(&records, chunk_size).flatten();
    for (idx, (frame, record)) in frames.zip(&records).enumerate() {
        let frame = match frame {
            Ok(f) => f,
            Err(e) => {
                log::warn!("skipping {}: {}", record.image.display(), e);
                continue;
            }
        };
        let out = match perception.process(frame, &grid) {
            Ok(out) => out,
            Err(e) => {
                log::warn!("skipping {}: {}", record.image.display(), e);
                continue;
            }
        };
        processed += 1;
        write_polar_report(
            output.join("frames").join(format!("{:06}.json", idx)),
            idx,
            &out.nav_polar,
        )?;
        if let Some(recording) = &recording {
            recording.set_time("frame", TimeCell::from_sequence(idx as i64));
            log_image(recording, "vision", &out.vision_image)?;
            log_navigable_points(
                recording,
                "vision",
                &out.nav_rover,
                perception.calibration().image_w_h(),
            )?;
            log_image(recording, "world", &render_world_map(&grid.read()))?;
        }
    }
    let duration_sec = now.elapsed().as_secs_f64();
    log::info!("processing {} frames took {:.6} sec", processed, duration_sec);

    let world = grid.snapshot();
    save_image(output.join("worldmap.png"), &render_world_map(&world))?;
    for channel in MapChannel::ALL {
        log::info!(
            "{:?}: {} cells with evidence",
            channel,
            world.cells_with_evidence(channel)
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = RoverPerceptionCli::parse();

    match cli.command {
        Commands::DefaultConfig { output } => {
            object_to_json(&output, &PerceptionConfig::default())?;
            log::info!("wrote {}", output.display());
        }
        Commands::Frame {
            image,
            config,
            x,
            y,
            yaw,
            output,
        } => {
            let config = load_config(config.as_deref())?;
            let record = FrameRecord {
                image: image.clone(),
                x,
                y,
                yaw,
            };
            run_frame(&image, &config, record, &output)?;
        }
        Commands::Run {
            manifest,
            config,
            output,
            rerun,
            chunk_size,
        } => {
            let config = load_config(config.as_deref())?;
            run_manifest(&manifest, &config, &output, rerun.as_deref(), chunk_size)?;
        }
    }
    Ok(())
}
