use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::args::OutputFormat;
use crate::domain::RunConfig;
use crate::error::AppResult;
use crate::http::{RequestExecutor, RequestSender};
use crate::load::{LoadController, RunEnd, RunReport};
use crate::shutdown_handlers::{ShutdownWatchers, shutdown_channel};
use crate::ui::model::UiData;
use crate::ui::render::setup_render_ui;

use super::banner::print_banner;
use super::progress::setup_progress_line;
use super::report::print_report;

/// Presentation choices that do not affect the load itself.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunOptions {
    /// Full-screen dashboard instead of the stderr progress line.
    pub(crate) dashboard: bool,
    pub(crate) no_color: bool,
    pub(crate) no_banner: bool,
    pub(crate) output_format: OutputFormat,
}

/// Runs one load test end to end and prints its report.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built, a virtual user
/// task fails, or the report cannot be written.
pub(crate) async fn run_load(config: RunConfig, options: RunOptions) -> AppResult<RunReport> {
    if !options.no_banner {
        print_banner(
            &config,
            options.no_color,
            matches!(options.output_format, OutputFormat::Json),
        );
    }

    let executor = RequestExecutor::new(&config)?;
    let sender: Arc<dyn RequestSender> = Arc::new(executor);
    let controller = LoadController::new(config, sender);

    let (shutdown_tx, controller_rx) = shutdown_channel();
    let watchers = ShutdownWatchers::spawn(&shutdown_tx, options.dashboard);

    let (ui_tx, _ui_rx) = watch::channel(initial_ui_data(controller.config(), options.no_color));
    let display = if options.dashboard {
        setup_render_ui(&shutdown_tx, &ui_tx)
    } else {
        setup_progress_line(&shutdown_tx, &ui_tx)
    };

    let result = controller
        .run(controller_rx, |tick| {
            ui_tx.send_modify(|data| data.apply_tick(tick));
        })
        .await;

    drop(shutdown_tx.send(()));
    if let Err(err) = display.await {
        debug!("Display task ended abnormally: {}", err);
    }
    watchers.join().await;

    let report = result?;
    if report.end == RunEnd::Interrupted {
        eprintln!("Test interrupted by user");
    }
    info!(
        "Run ended ({:?}) after {:?} with {} requests",
        report.end, report.elapsed, report.snapshot.counters.total
    );
    print_report(
        &report,
        controller.config(),
        options.output_format,
        options.no_color,
    )?;
    Ok(report)
}

pub(crate) fn initial_ui_data(config: &RunConfig, no_color: bool) -> UiData {
    UiData {
        target: config.url.to_string(),
        method: config.method.as_str(),
        vus: config.vus.get(),
        no_color,
        target_duration: config.duration,
        ..UiData::default()
    }
}
