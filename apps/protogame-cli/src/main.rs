use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use protogame_game::{App, GameConfig, GridStats, Subsystem};
use protogame_input::KeyCode;
use protogame_render::RecordingRenderer;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "protogame-cli", about = "Headless protogame runner")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML game config; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, subsystem order and the active config
    Info,
    /// Run frames against a recording renderer and summarize the last one
    Run {
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Real seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f64,
        /// Key hold as KEY@FRAME or KEY@START..END (END exclusive); repeatable
        #[arg(short, long = "key")]
        keys: Vec<KeyHold>,
    },
    /// Print debug grid statistics
    Grid,
}

/// A key held down over a half-open frame range.
#[derive(Debug, Clone, PartialEq)]
struct KeyHold {
    key: KeyCode,
    start: u64,
    end: u64,
}

impl FromStr for KeyHold {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (name, frames) = s
            .split_once('@')
            .context("expected KEY@FRAME or KEY@START..END")?;
        let name = name.trim();
        let mut chars = name.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::from_char(c),
            _ => None,
        };
        let key = match key {
            Some(k) => k,
            None => serde_yaml::from_str(name).with_context(|| format!("unknown key '{name}'"))?,
        };

        let (start, end) = match frames.split_once("..") {
            Some((a, b)) => (a.trim().parse::<u64>()?, b.trim().parse::<u64>()?),
            None => {
                let f = frames.trim().parse::<u64>()?;
                (f, f.checked_add(1).context("frame index out of range")?)
            }
        };
        if end <= start {
            bail!("empty frame range {start}..{end}");
        }
        Ok(Self { key, start, end })
    }
}

fn run(config: GameConfig, frames: u64, dt: f64, keys: &[KeyHold]) {
    let mut app = App::new(RecordingRenderer::new(), config);
    app.startup();

    let mut ran = 0;
    for frame in 0..frames {
        for hold in keys {
            if hold.start == frame {
                app.handle_key_pressed(hold.key);
            }
            if hold.end == frame {
                app.handle_key_released(hold.key);
            }
        }
        app.run_frame(dt);
        ran += 1;
        if app.is_quitting() {
            tracing::info!(frame, "quit requested");
            break;
        }
    }

    println!("Ran {ran} frames at dt={dt:.4}");
    print!("{}", app.engine().renderer.summary());
    if let Some(game) = app.game() {
        let p = game.player();
        let o = p.orientation();
        println!(
            "Mode: {}",
            if game.is_attract_mode() {
                "attract"
            } else {
                "play"
            }
        );
        println!(
            "Player: pos=({:.3}, {:.3}, {:.3}) yaw={:.2} pitch={:.2} roll={:.2}",
            p.position().x,
            p.position().y,
            p.position().z,
            o.yaw_degrees,
            o.pitch_degrees,
            o.roll_degrees
        );
        println!(
            "Game clock: {:.3}s over {} frames (scale {:.2}{})",
            game.clock().total_seconds(),
            game.clock().frame_count(),
            game.clock().time_scale(),
            if game.clock().is_paused() {
                ", paused"
            } else {
                ""
            }
        );
    }
    if app.is_quitting() {
        println!("Quit: yes");
    }
    app.shutdown();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = GameConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("protogame-cli v{}", env!("CARGO_PKG_VERSION"));
            let order: Vec<_> = Subsystem::STARTUP_ORDER
                .iter()
                .map(|s| format!("{s:?}"))
                .collect();
            println!("subsystems: {}", order.join(" -> "));
            println!("config:");
            print!("{}", config.to_yaml_string()?);
        }
        Commands::Run { frames, dt, keys } => {
            if dt.is_nan() || dt <= 0.0 {
                bail!("--dt must be positive, got {dt}");
            }
            run(config, frames, dt, &keys);
        }
        Commands::Grid => {
            print!("{}", GridStats::collect());
        }
    }

    Ok(())
}
