use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use portal_game::{GameBuilder, GameConfig, ManualClock, Scheduler, SchedulerConfig, StepMode};
use portal_input::HeadlessWindow;
use portal_kernel::World;
use portal_scene::{SceneLoader, YamlSceneLoader};
use portal_tools::WorldInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portal-cli", about = "Headless tools for portal scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default settings
    Info,
    /// Run a scene headless with a simulated clock
    Run {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Simulated milliseconds between frames
        #[arg(long, default_value = "16")]
        step_ms: u64,
        /// YAML game configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Scene to load instead of the configured one
        #[arg(long)]
        map: Option<PathBuf>,
        /// Data directory holding the default scene
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Feed real elapsed time to the simulation instead of fixed steps
        #[arg(long)]
        wall_clock: bool,
    },
    /// Load a scene and describe what it contains
    Inspect {
        /// Scene file
        map: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the scheduler's decision for each wall-clock reading
    Schedule {
        /// Wall-clock readings in milliseconds
        #[arg(required = true)]
        times: Vec<u64>,
        /// Simulation step length in milliseconds
        #[arg(long, default_value = "16")]
        skip_ms: u64,
        /// Most catch-up steps per reading
        #[arg(long, default_value = "5")]
        max_skip: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = GameConfig::default();
            println!("portal-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("default scene: {}", config.scene_path().display());
            println!(
                "scheduler: step={}ms max_skip={} mode={:?}",
                config.scheduler.skip_time_ms, config.scheduler.max_skip, config.step_mode
            );
            println!("startup policy: {:?}", config.startup_policy);
            println!("quit key: {:?}", config.quit_key);
        }
        Commands::Run {
            frames,
            step_ms,
            config,
            map,
            data_dir,
            wall_clock,
        } => {
            let mut game_config = match &config {
                Some(path) => GameConfig::load(path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => GameConfig::default(),
            };
            if let Some(map) = map {
                game_config.map_path = Some(map);
            }
            if let Some(dir) = data_dir {
                game_config.data_dir = dir;
            }
            if wall_clock {
                game_config.step_mode = StepMode::WallClock;
            }
            let (width, height) = (game_config.window.width, game_config.window.height);

            tracing::info!(frames, step_ms, "headless run");
            let clock = ManualClock::new(0);
            let mut game = GameBuilder::new(game_config, HeadlessWindow::new(width, height))
                .clock(clock.clone())
                .build()
                .context("starting game")?;

            for _ in 0..frames {
                clock.advance(step_ms);
                game.frame()?;
                if !game.is_running() {
                    break;
                }
            }
            let summary = WorldInspector::summary(game.world());
            println!(
                "frames={} steps={} next_update={}ms",
                game.frames(),
                game.scheduler().total_steps(),
                game.scheduler().next_update()
            );
            println!("{summary}");
            println!("title: {}", game.window().title());
            game.clean_up();
        }
        Commands::Inspect { map, json } => {
            let mut world = World::new();
            let scene = YamlSceneLoader::new().load(&mut world, &map)?;
            let summary = WorldInspector::summary(&world);
            let entities: Vec<_> = WorldInspector::list_entities(&world)
                .into_iter()
                .filter_map(|id| WorldInspector::inspect_entity(&world, id))
                .collect();
            if json {
                let out = serde_json::json!({
                    "scene": scene.name,
                    "summary": summary,
                    "entities": entities,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("scene: {}", scene.name.as_deref().unwrap_or("<unnamed>"));
                println!("{summary}");
                for info in &entities {
                    println!("  {info}");
                }
            }
        }
        Commands::Schedule {
            times,
            skip_ms,
            max_skip,
        } => {
            anyhow::ensure!(
                skip_ms > 0 && max_skip > 0,
                "step length and max skip must be positive"
            );
            let config = SchedulerConfig {
                skip_time_ms: skip_ms,
                max_skip,
            };
            let start = times.first().copied().unwrap_or_default();
            let mut scheduler = Scheduler::new(config, start);
            println!(
                "{:>8} {:>6} {:>8} {:>8} {:>7} {:>8}",
                "now", "steps", "elapsed", "next", "interp", "backlog"
            );
            for now in times {
                let tick = scheduler.tick(now);
                println!(
                    "{:>8} {:>6} {:>8} {:>8} {:>7.3} {:>8}",
                    now,
                    tick.steps,
                    tick.elapsed_ms,
                    scheduler.next_update(),
                    tick.interpolation,
                    tick.backlog_ms
                );
            }
            println!("total steps: {}", scheduler.total_steps());
        }
    }

    Ok(())
}
