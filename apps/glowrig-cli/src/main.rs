use clap::{Parser, Subcommand, ValueEnum};
use glowrig_animate::AnimationLoop;
use glowrig_probe::{
    BlockedLoader, RecordingReporter, StaticLoader, Startup, startup,
};
use glowrig_render::{HeadlessBackend, SurfaceSpec};
use glowrig_scene::{CameraRig, Scene, SceneBuilder};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glowrig-cli", about = "Headless tooling for the glowrig backdrop")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which startup failure to force in the probe demo.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ForcedFailure {
    /// Resource loader fails (network path blocked)
    Network,
    /// 3D library symbol is not resolvable
    Library,
    /// Context creation fails (no hardware acceleration)
    Gpu,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Run the availability pipeline and print every transition
    Probe {
        /// Force a specific failure; omit for the happy path
        #[arg(long, value_enum)]
        fail: Option<ForcedFailure>,
    },
    /// Run the animation loop headlessly and print per-tick summaries
    Run {
        /// Number of ticks to drive
        #[arg(short, long, default_value = "10")]
        ticks: u64,
        /// Seed the starfield for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Dump a freshly built scene graph as JSON
    DumpScene {
        /// Seed the starfield for reproducible output
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn build_scene(seed: Option<u64>) -> Scene {
    match seed {
        Some(seed) => SceneBuilder::build_with_rng(&mut ChaCha8Rng::seed_from_u64(seed)),
        None => SceneBuilder::build(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("glowrig-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common:  {}", glowrig_common::crate_info());
            println!("scene:   {}", glowrig_scene::crate_info());
            println!("render:  {}", glowrig_render::crate_info());
            println!("probe:   {}", glowrig_probe::crate_info());
            println!("animate: {}", glowrig_animate::crate_info());
        }
        Commands::Probe { fail } => {
            let spec = SurfaceSpec::new(1280, 720);
            let mut reporter = RecordingReporter::new();

            let outcome = match fail {
                Some(ForcedFailure::Network) => pollster::block_on(startup(
                    &BlockedLoader,
                    &HeadlessBackend::ready(),
                    &spec,
                    &mut reporter,
                )),
                Some(ForcedFailure::Library) => pollster::block_on(startup(
                    &StaticLoader,
                    &HeadlessBackend::missing_library(),
                    &spec,
                    &mut reporter,
                )),
                Some(ForcedFailure::Gpu) => pollster::block_on(startup(
                    &StaticLoader,
                    &HeadlessBackend::without_gpu(),
                    &spec,
                    &mut reporter,
                )),
                None => pollster::block_on(startup(
                    &StaticLoader,
                    &HeadlessBackend::ready(),
                    &spec,
                    &mut reporter,
                )),
            };

            for state in reporter.states() {
                println!("{state:?}: {state}");
            }
            match &outcome {
                Startup::Ready { .. } => println!("scene may be constructed"),
                Startup::Degraded { error } => println!("terminal: {error}"),
            }
        }
        Commands::Run { ticks, seed } => {
            let spec = SurfaceSpec::new(1280, 720);
            let mut reporter = RecordingReporter::new();
            let outcome = pollster::block_on(startup(
                &StaticLoader,
                &HeadlessBackend::ready(),
                &spec,
                &mut reporter,
            ));
            let Some(mut context) = outcome.into_context() else {
                anyhow::bail!("headless probe unexpectedly degraded");
            };

            let scene = build_scene(seed);
            let mut driver =
                AnimationLoop::new(scene, CameraRig::new(SceneBuilder::initial_camera()));
            driver.resize(&mut context, spec.width, spec.height);

            println!("Headless run: ticks={ticks}, seed={seed:?}");
            for tick in 1..=ticks {
                driver.tick(&mut context);
                if let Some(frame) = context.last_frame() {
                    println!("tick {tick:>4}  t={:.2}  {frame}", driver.time());
                }
            }
        }
        Commands::DumpScene { seed } => {
            let scene = build_scene(Some(seed));
            println!("{}", serde_json::to_string_pretty(&scene)?);
        }
    }

    Ok(())
}
