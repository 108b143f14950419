use chrono::Utc;
use log::{debug, error, info, warn};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thlog::config::LoggerConfig;
use thlog::errors::LoggerError;
use thlog::logger::SensorLogger;
use thlog::output::write_record;
use thlog::serial::{open_port, read_chunk};
use thlog::utils::format_datetime;

const LICENSE_TEXT: &str = include_str!("../LICENSE");

/// Size of a single serial read
const INPUT_BUFFER_SIZE: usize = 64;

/// Read sensor data and emit one averaged record per interval until `shutdown` is set
fn main_loop(config: &LoggerConfig, shutdown: &AtomicBool) -> Result<(), LoggerError> {
    let device = config
        .device
        .as_deref()
        .ok_or_else(|| LoggerError::Config("Missing device".into()))?;

    info!("Connecting to sensor adapter at {}", device);
    let mut port = open_port(device)?;
    info!(
        "Starting data collection with {} second interval",
        config.interval
    );

    let mut logger = SensorLogger::new(config.interval, Utc::now());
    let mut buf = [0u8; INPUT_BUFFER_SIZE];
    let stdout = io::stdout();

    while !shutdown.load(Ordering::SeqCst) {
        let count = read_chunk(port.as_mut(), &mut buf)?;
        logger.ingest(&buf[..count]);

        if let Some(average) = logger.poll(Utc::now()) {
            debug!(
                "Interval complete at {}: {} samples",
                format_datetime(&average.time),
                average.samples
            );
            let mut out = stdout.lock();
            write_record(&mut out, &config.format, config.utc, &average)?;
        }
    }

    let stats = logger.stats();
    info!(
        "Received {} samples, {} checksum errors, {} remote errors",
        stats.samples, stats.checksum_errors, stats.remote_errors
    );
    Ok(())
}

/// Resolve once SIGINT (Ctrl+C) or SIGTERM arrives
async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
                return;
            }
            Err(e) => warn!("Failed to listen for SIGTERM: {}", e),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LoggerConfig::new();

    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(config.log_level())
        .format_timestamp_secs()
        .init();

    if config.license {
        eprint!("{}", LICENSE_TEXT);
        return Ok(());
    }

    if let Err(e) = config.validate() {
        error!("Failed to load configuration: {}", e);
        return Err(e.into());
    }

    // Handle Ctrl+C and SIGTERM gracefully; the worker polls the flag between reads
    let shutdown = Arc::new(AtomicBool::new(false));
    let signal_flag = Arc::clone(&shutdown);
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Received signal. Finishing current operation.");
        signal_flag.store(true, Ordering::SeqCst);
    });

    let worker = tokio::task::spawn_blocking(move || main_loop(&config, &shutdown));

    match worker.await? {
        Ok(()) => {
            info!("Program terminated by user. Exiting gracefully.");
            Ok(())
        }
        Err(e) => {
            error!("Fatal error: {}", e);
            Err(e.into())
        }
    }
}
