//! Veil CLI
//!
//! Simulate splash overlay runs and validate splash configuration.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use veil_animation::AnimationScheduler;
use veil_splash::{
    AnimationType, ExitPlan, NativeChrome, SplashConfig, SplashController, SplashHost,
    SplashPhase,
};

mod config;
mod device;

use config::VeilConfig;
use device::SimulatedDevice;

#[derive(Parser)]
#[command(name = "veil")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Veil splash overlay CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a splash against a simulated device, frame by frame
    Simulate {
        /// Config file (defaults to ./veil.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the exit animation (fade, scale, slide, bounce, none)
        #[arg(short, long)]
        animation: Option<String>,

        /// Call hide() once this much simulated time has passed
        #[arg(long)]
        hide_at: Option<u64>,

        /// Simulated frame length in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: f32,

        /// Give up after this much simulated time
        #[arg(long, default_value = "10000")]
        max_ms: f32,
    },

    /// Validate a config file and print the resolved options
    Check {
        /// Config file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            config,
            animation,
            hide_at,
            frame_ms,
            max_ms,
        } => cmd_simulate(
            config.as_deref(),
            animation.as_deref(),
            hide_at,
            frame_ms,
            max_ms,
        ),

        Commands::Check { file } => cmd_check(&file),
    }
}

fn cmd_simulate(
    config_path: Option<&Path>,
    animation: Option<&str>,
    hide_at: Option<u64>,
    frame_ms: f32,
    max_ms: f32,
) -> Result<()> {
    if frame_ms <= 0.0 {
        anyhow::bail!("--frame-ms must be positive, got {}", frame_ms);
    }

    let mut config = VeilConfig::load_or_default(config_path)?;
    if let Some(animation) = animation {
        config.splash.animation_type = animation.parse::<AnimationType>()?;
    }
    if hide_at.is_none() && config.splash.auto_hide_delay().is_none() {
        warn!("No --hide-at and no auto-hide configured; the splash will never be dismissed");
    }

    let device = SimulatedDevice::new(&config.device);
    let scheduler = AnimationScheduler::new();
    let host = SplashHost::new(
        Arc::new(scheduler.handle()),
        Arc::new(NativeChrome::new(device.bridge())),
        Arc::new(device.screen()),
    );

    let ended = Arc::new(AtomicBool::new(false));
    let ended_flag = ended.clone();
    let splash = SplashConfig::new("splash", "app")
        .with_options(config.splash.clone())
        .on_animation_end(move || ended_flag.store(true, Ordering::SeqCst));

    let (controller, handle) = SplashController::mount(splash, host);
    info!(
        "Mounted splash: animation={}, background={}",
        config.splash.animation_type, config.splash.background_color
    );

    let mut elapsed = 0.0_f32;
    let mut phase = controller.phase();
    let mut hide_sent = false;

    loop {
        if let Some(at) = hide_at {
            if !hide_sent && elapsed >= at as f32 {
                info!("hide() at {}ms", elapsed);
                handle.hide();
                hide_sent = true;
            }
        }

        let next = controller.update();
        if next != phase {
            info!("{:?} -> {:?} at {}ms", phase, next, elapsed);
            phase = next;
        }
        if phase == SplashPhase::AppReady || elapsed >= max_ms {
            break;
        }

        let progress = controller.progress();
        debug!(
            "t={}ms opacity={:.3} scale={:.3} translate_y={:.1} background={:.3}",
            elapsed,
            progress.opacity,
            progress.scale,
            progress.translate_y,
            progress.background_opacity
        );

        scheduler.tick_by(frame_ms);
        elapsed += frame_ms;
    }

    let bars = device.bars();
    if phase == SplashPhase::AppReady {
        println!("App ready after {}ms", elapsed);
    } else {
        println!("Splash still visible after {}ms ({:?})", elapsed, phase);
    }
    println!(
        "Navigation bar: color={} visibility={}",
        bars.navigation_color, bars.navigation_visibility
    );
    println!(
        "Status bar: color={} translucent={}",
        bars.status_bar_color, bars.status_bar_translucent
    );
    println!(
        "Animation end callback: {}",
        if ended.load(Ordering::SeqCst) {
            "fired"
        } else {
            "not fired"
        }
    );

    Ok(())
}

fn cmd_check(file: &Path) -> Result<()> {
    let config = VeilConfig::load(file)?;
    info!("{} is valid", file.display());

    let splash = &config.splash;
    let exit_ms = ExitPlan::for_animation(splash.animation_type, config.device.height)
        .map_or(0, |plan| plan.duration_ms());

    println!("{}", config.to_toml()?);
    match splash.auto_hide_delay() {
        Some(delay) => println!(
            "Auto-hide after {}ms, app ready at ~{}ms",
            delay,
            delay + u64::from(exit_ms)
        ),
        None => println!("Manual dismissal; exit animation takes {}ms", exit_ms),
    }

    Ok(())
}
