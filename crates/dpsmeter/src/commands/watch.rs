use crate::settings;
use dpsmeter_core::Config;
use dpsmeter_log::{DirectoryDiscovery, FixedFile, LogDiscovery};
use dpsmeter_meter::{Clock, JsonLinesRenderer, Meter, Renderer, SystemClock, TerminalRenderer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

pub fn run(
    dir: Option<PathBuf>,
    file: Option<PathBuf>,
    config_path: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let config = settings::load_config(config_path);

    let discovery: Box<dyn LogDiscovery> = match file {
        Some(file) => {
            tracing::info!("Watching {} only", file.display());
            Box::new(FixedFile(file))
        }
        None => {
            let dir = settings::log_dir(dir)?;
            tracing::info!("Looking for combat logs in {}", dir.display());
            Box::new(DirectoryDiscovery::new(dir, config.log_extension.clone()))
        }
    };

    let mut renderer: Box<dyn Renderer> = if json {
        Box::new(JsonLinesRenderer::new(std::io::stdout()))
    } else {
        Box::new(TerminalRenderer::new(std::io::stdout()))
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(watch_loop(
        &config,
        discovery.as_ref(),
        renderer.as_mut(),
        &SystemClock,
    ))
}

/// Both timers share one task, so a tick and a file switch never overlap
async fn watch_loop(
    config: &Config,
    discovery: &dyn LogDiscovery,
    renderer: &mut dyn Renderer,
    clock: &dyn Clock,
) -> anyhow::Result<()> {
    let mut meter = Meter::new(config);

    let mut update = tokio::time::interval(Duration::from_millis(config.update_interval_ms.max(1)));
    update.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut file_check =
        tokio::time::interval(Duration::from_millis(config.file_check_interval_ms.max(1)));
    file_check.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            result = &mut shutdown => {
                result?;
                tracing::info!("Stopping");
                return Ok(());
            }
            _ = file_check.tick() => {
                meter.check_for_new_file(discovery);
            }
            _ = update.tick() => {
                let snapshot = meter.tick(clock.now());
                renderer.publish(&snapshot)?;
            }
        }
    }
}
