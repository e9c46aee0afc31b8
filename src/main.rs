use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use tokio::signal;
use tokio::signal::unix::SignalKind;

use shutterbridge::config;
use shutterbridge::error::ApiResult;
use shutterbridge::service::Service;
use shutterbridge::shutter::ShutterPlatform;

#[derive(Debug, Parser)]
#[command(version, about = "Bridge an http shutter device to a cover entity")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: Utf8PathBuf,
}

/*
 * Formatter function to output in syslog format. This makes sense when running
 * as a service (where output might go to a log file, or the system journal)
 */
#[allow(clippy::match_same_arms)]
fn syslog_format(
    buf: &mut pretty_env_logger::env_logger::fmt::Formatter,
    record: &log::Record,
) -> std::io::Result<()> {
    writeln!(
        buf,
        "<{}>{}: {}",
        match record.level() {
            log::Level::Error => 3,
            log::Level::Warn => 4,
            log::Level::Info => 6,
            log::Level::Debug => 7,
            log::Level::Trace => 7,
        },
        record.target(),
        record.args()
    )
}

fn init_logging() -> ApiResult<()> {
    /* Try to provide reasonable default filters, when RUST_LOG is not specified */
    const DEFAULT_LOG_FILTERS: &[&str] = &["debug", "reqwest=info", "hyper_util=info"];

    let log_filters = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTERS.join(","));

    /* Detect if we need syslog or human-readable formatting */
    if std::env::var("SYSTEMD_EXEC_PID").is_ok_and(|pid| pid == std::process::id().to_string()) {
        Ok(pretty_env_logger::env_logger::builder()
            .format(syslog_format)
            .parse_filters(&log_filters)
            .try_init()?)
    } else {
        Ok(pretty_env_logger::formatted_timed_builder()
            .parse_filters(&log_filters)
            .try_init()?)
    }
}

async fn run() -> ApiResult<()> {
    init_logging()?;

    let args = Args::parse();

    let config = config::parse(&args.config)?;
    log::debug!("Configuration loaded successfully");

    let mut platform = ShutterPlatform::new(&config);
    platform.start().await?;

    let mut sigterm = signal::unix::signal(SignalKind::terminate())?;

    tokio::select! {
        res = platform.run() => res?,
        _ = signal::ctrl_c() => {
            log::warn!("Ctrl-C pressed, exiting..");
        }
        _ = sigterm.recv() => {
            log::warn!("SIGTERM received, exiting..");
        }
    }

    platform.stop().await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        log::error!("Shutterbridge error: {err}");
        log::error!("Fatal error encountered, cannot continue.");
    }
}
