//! Fieldrec: button-driven voice recorder with USB-shared storage.
//!
//! A long press starts and stops recording, a short press toggles pause;
//! audio streams to an always-playable WAV file on the storage medium,
//! which is exposed to the host as mass storage whenever no session is
//! running.

mod button_classifier;
mod config;
mod error;
mod exposure_arbiter;
mod platform;
mod press_event;
mod recorder_state;
mod status_presenter;

pub(crate) use {
    error::{AppError, Result as AppResult},
    press_event::{PressEvent, PressKind},
};

use crate::{
    button_classifier::ButtonClassifier,
    config::Config,
    exposure_arbiter::ExposureArbiter,
    platform::{ConsolePanel, DirectoryMount, LogBuzzer, StdinButton, ToneMicrophone},
    recorder_state::RecorderState,
    status_presenter::{IdleLines, StatusPresenter},
};

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{error, info};

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("fieldrec=debug")
        .init();

    let config = Config::default();

    if let Err(e) = config.storage.ensure_mount_dir() {
        error!(dir = ?config.storage.mount_dir, error = %e, "Failed to prepare storage directory");
        std::process::exit(1);
    }

    let state = Arc::new(RecorderState::new());
    let idle_lines = Arc::new(Mutex::new(IdleLines::default()));

    let classifier = ButtonClassifier::new(
        StdinButton::spawn(),
        LogBuzzer,
        Arc::clone(&state),
        config.button.clone(),
    );
    let presenter = StatusPresenter::new(ConsolePanel, Arc::clone(&state), Arc::clone(&idle_lines));
    let arbiter = ExposureArbiter::new(
        DirectoryMount::new(),
        Box::new(ToneMicrophone),
        Arc::clone(&state),
        Arc::clone(&idle_lines),
        config.capture.clone(),
        config.storage.clone(),
    );

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "Failed to create tokio runtime");
            std::process::exit(1);
        }
    };

    let arbiter_result = rt.block_on(async {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!("fieldrec starting; stdin simulates the button: newline = tap, 'l' = hold");

        let (_, _, arbiter_result, _) = tokio::join!(
            classifier.run(shutdown_rx.clone()),
            presenter.run(shutdown_rx.clone()),
            async {
                let result = arbiter.run(shutdown_rx.clone()).await;
                if result.is_err() {
                    // The arbiter only returns an error from its startup
                    // sequence; without host exposure established the
                    // recorder must not keep running.
                    let _ = shutdown_tx.send(true);
                }
                result
            },
            async {
                let mut signal_rx = shutdown_rx.clone();
                tokio::select! {
                    _ = signal_rx.changed() => {}
                    r = tokio::signal::ctrl_c() => {
                        if r.is_ok() {
                            info!("Shutdown requested");
                            let _ = shutdown_tx.send(true);
                        }
                    }
                }
            }
        );
        arbiter_result
    });

    if let Err(e) = arbiter_result {
        error!(error = ?e, "Exposure arbiter failed to establish host exposure");
        std::process::exit(1);
    }
}
