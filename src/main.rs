//! MotionScope - headless entry point
//!
//! Runs the core against the synthetic camera and an in-process display,
//! logging the UI mutations it would apply. Pass a project name to open it
//! (or create it on the first save).

use anyhow::Context;
use motionscope::{
    config::{self, ScopeConfig},
    engine::Engine,
    media::{ChannelSink, PlanarPerspective, TestPatternSource},
    project::{ProjectController, ProjectFiles},
    streaming::Streamer,
    tab::registry,
    types::TabKind,
    ui::{UiBridge, UiMutation},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How long the demo streams before shutting down
const RUN_TIME: Duration = Duration::from_secs(3);

fn main() -> anyhow::Result<()> {
    // Initialize logging; the file guard must live until exit
    let log_dir = config::ensure_app_data_dir()?.join(config::LOG_DIR);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "motionscope.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,motionscope=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    tracing::info!("Starting MotionScope");

    let config = ScopeConfig::load_or_default();
    let files = ProjectFiles::new(config.media_dir()?);

    let source = TestPatternSource::new(320, 240, Duration::from_millis(33));
    let tabs = registry::build_tabs(Box::new(source));
    let engine = Arc::new(Engine::new(tabs, config).context("Failed to build engine")?);
    let perspective = Arc::new(PlanarPerspective::new());

    let (bridge, ui) = UiBridge::new();
    let mut controller = ProjectController::new(engine.clone(), files, perspective.clone(), ui)
        .context("Failed to start project controller")?;

    let (sink, display_rx) = ChannelSink::new();
    let streamer = Streamer::new(engine.clone(), perspective, Box::new(sink))
        .spawn()
        .context("Failed to start streaming loop")?;

    if let Some(name) = std::env::args().nth(1) {
        controller.open(&name)?;
        controller.wait_idle();
        if let Some(report) = controller.last_report() {
            tracing::info!("Open finished: {:?}", report.outcome);
        }
    }

    let started = Instant::now();
    let mut shown = 0usize;
    while started.elapsed() < RUN_TIME {
        for mutation in bridge.drain() {
            apply(&mutation);
        }
        shown += display_rx.drain().len();
        std::thread::sleep(Duration::from_millis(50));

        if started.elapsed() > RUN_TIME / 2 && engine.focused_tab() == TabKind::Camera {
            if let Err(e) = engine.select_tab(TabKind::Capture) {
                tracing::warn!("{}", e);
            }
        }
    }

    tracing::info!("Shutting down...");
    let stats = streamer.stop()?;
    if controller.project().is_some() {
        controller.save()?;
        controller.wait_idle();
    }
    for mutation in bridge.drain() {
        apply(&mutation);
    }
    let dropped = display_rx.dropped();
    tracing::info!(
        "Displayed {} frames ({} dropped), {} ticks",
        shown,
        dropped,
        stats.ticks
    );
    Ok(())
}

/// Stand-in for the widget layer
fn apply(mutation: &UiMutation) {
    match mutation {
        UiMutation::ProgressValue { .. } => tracing::trace!("{:?}", mutation),
        UiMutation::ProgressOpen { dialog, open } => {
            let state = if *open { "shown" } else { "hidden" };
            tracing::debug!("UI: {} {}", dialog.title(), state);
        }
        UiMutation::FileMenu(menu) => {
            let labels: Vec<&str> = menu.enabled_items().map(|item| item.label()).collect();
            tracing::debug!("UI: File menu {:?} enabled {:?}", menu.header, labels);
        }
        _ => tracing::debug!("UI: {:?}", mutation),
    }
}
