//! Host-side stand-ins for the device peripherals.
//!
//! On the device these collaborators wrap the button GPIO, the piezo
//! buzzer, the OLED panel, the USB mass-storage driver, and the I2S
//! microphone. The host build substitutes simulations so the whole control
//! path runs end to end off-device: stdin lines press the button, the
//! display and buzzer log, the mount switch is a no-op over a directory,
//! and the microphone synthesizes a tone at real-time pace.

use crate::{
    AppResult,
    button_classifier::{Buzzer, InputPin},
    exposure_arbiter::{MountControl, MountPoint},
    status_presenter::DisplayPanel,
};

use std::{
    io::BufRead,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use fieldrec_core::{AudioSource, BYTES_PER_SAMPLE, CoreResult, Microphone, SAMPLE_RATE_HZ};
use tracing::{debug, info};

/// Simulated hold time for a plain stdin line (a tap).
const SHORT_PRESS_SIM: Duration = Duration::from_millis(150);
/// Simulated hold time for an `l` stdin line (a hold).
const LONG_PRESS_SIM: Duration = Duration::from_millis(700);

/// Button pin driven by stdin lines.
///
/// Each line simulates one press: `l` holds past the long-press threshold,
/// anything else taps. Level follows the pull-up convention.
pub struct StdinButton {
    level: Arc<AtomicBool>,
}

impl StdinButton {
    /// Spawn the stdin reader thread and return the pin.
    pub fn spawn() -> Self {
        let level = Arc::new(AtomicBool::new(true));
        let shared = Arc::clone(&level);

        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let hold = if line.trim() == "l" {
                    LONG_PRESS_SIM
                } else {
                    SHORT_PRESS_SIM
                };
                shared.store(false, Ordering::Release);
                thread::sleep(hold);
                shared.store(true, Ordering::Release);
            }
        });

        Self { level }
    }
}

impl InputPin for StdinButton {
    fn level(&mut self) -> bool {
        self.level.load(Ordering::Acquire)
    }
}

/// Buzzer that logs instead of driving a PWM channel.
pub struct LogBuzzer;

impl Buzzer for LogBuzzer {
    fn pulse(&mut self) {
        info!("Buzzer pulse");
    }
}

/// Display panel that logs the rendered text block.
pub struct ConsolePanel;

impl DisplayPanel for ConsolePanel {
    fn show(&mut self, text: &str) {
        info!(display = %text.replace('\n', " / "), "Display");
    }
}

/// Mount control over a plain directory: switches are logged no-ops, the
/// exposure driver is a boolean with the same start/stop idempotence the
/// real driver guard has.
#[derive(Default)]
pub struct DirectoryMount {
    host_active: bool,
}

impl DirectoryMount {
    /// Create with host exposure stopped.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MountControl for DirectoryMount {
    fn switch_mount(&mut self, target: MountPoint) -> AppResult<()> {
        info!(?target, "Mount point switched");
        Ok(())
    }

    fn start_host_exposure(&mut self) -> AppResult<()> {
        if !self.host_active {
            self.host_active = true;
            info!("Host exposure started");
        }
        Ok(())
    }

    fn stop_host_exposure(&mut self) -> AppResult<()> {
        if self.host_active {
            self.host_active = false;
            info!("Host exposure stopped");
        }
        Ok(())
    }
}

/// Synthetic microphone producing a 440 Hz tone.
pub struct ToneMicrophone;

impl Microphone for ToneMicrophone {
    fn open(&mut self) -> CoreResult<Box<dyn AudioSource>> {
        debug!("Tone source opened");
        Ok(Box::new(ToneSource { phase: 0.0 }))
    }
}

struct ToneSource {
    phase: f64,
}

impl AudioSource for ToneSource {
    fn read(&mut self, buf: &mut [u8], _timeout: Duration) -> CoreResult<usize> {
        const TONE_HZ: f64 = 440.0;
        let step = TONE_HZ * std::f64::consts::TAU / f64::from(SAMPLE_RATE_HZ);

        for sample in buf.chunks_exact_mut(BYTES_PER_SAMPLE) {
            let value = (self.phase.sin() * 0.25 * f64::from(i32::MAX)) as i32;
            sample.copy_from_slice(&value.to_le_bytes());
            self.phase = (self.phase + step) % std::f64::consts::TAU;
        }

        // Pace like a DMA read: one chunk takes its audio duration.
        let samples = (buf.len() / BYTES_PER_SAMPLE) as u64;
        thread::sleep(Duration::from_micros(
            samples * 1_000_000 / u64::from(SAMPLE_RATE_HZ),
        ));

        Ok(buf.len())
    }
}
