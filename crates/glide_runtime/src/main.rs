//! Glide Runtime
//!
//! Headless client: boots the sync session against a simulation host and
//! drives the render tick on the main thread.
//!
//! Usage: `glide [settings.json]`

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use glide_core::time::SystemClock;
use glide_net::SyncSession;
use glide_services::{KeyStates, Settings};

const DEFAULT_SETTINGS_PATH: &str = "glide.json";
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Glide v{}", glide_core::VERSION);

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());
    let settings = Settings::load(&path).with_context(|| format!("loading {path}"))?;

    tracing::info!(
        input = %settings.sync.input_addr,
        state = %settings.sync.state_addr,
        rate_hz = settings.sync.publish_rate_hz,
        "Connecting to simulation host..."
    );

    // Key events would be fed in by a window layer; headless, nothing is pressed.
    let keys = KeyStates::new();
    let mut session = SyncSession::spawn(settings.sync.clone(), keys, SystemClock::new())?;

    let interrupted = watch_interrupt()?;
    if drive(&mut session, settings.frame_period(), &interrupted) {
        tracing::info!("Interrupted, shutting down...");
    }

    session.shutdown().context("sync session ended")?;
    Ok(())
}

/// Flag that flips once Ctrl-C is received.
fn watch_interrupt() -> Result<Arc<AtomicBool>> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);

    std::thread::Builder::new()
        .name("glide-signal".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(error) => {
                    tracing::warn!(%error, "Ctrl-C handler unavailable");
                    return;
                }
            };
            match runtime.block_on(tokio::signal::ctrl_c()) {
                Ok(()) => flag.store(true, Ordering::Release),
                Err(error) => tracing::warn!(%error, "Ctrl-C handler unavailable"),
            }
        })
        .context("spawning signal thread")?;

    Ok(interrupted)
}

/// Tick the view once per `frame` until the session ends or `interrupted`
/// is set. Returns true when stopped by the flag.
fn drive(session: &mut SyncSession, frame: Duration, interrupted: &AtomicBool) -> bool {
    let mut last_frame = Instant::now();
    let mut last_report = last_frame;

    while !session.is_finished() {
        if interrupted.load(Ordering::Acquire) {
            return true;
        }
        std::thread::sleep(frame);

        let now = Instant::now();
        let view = session.view_mut();
        let position = view.tick(now - last_frame);
        last_frame = now;

        if now - last_report >= REPORT_INTERVAL {
            tracing::info!(
                x = position.x,
                y = position.y,
                raw = ?view.raw_position(),
                "predicted position"
            );
            last_report = now;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_net::{InputSnapshot, SyncConfig, SyncError};
    use std::net::UdpSocket;

    const FRAME: Duration = Duration::from_millis(5);

    #[test]
    fn test_interrupt_stops_running_session() {
        let host_state = UdpSocket::bind("127.0.0.1:0").unwrap();
        let host_input = UdpSocket::bind("127.0.0.1:0").unwrap();
        let config = SyncConfig {
            input_addr: host_input.local_addr().unwrap().to_string(),
            state_addr: host_state.local_addr().unwrap().to_string(),
            ..SyncConfig::default()
        };
        let mut session =
            SyncSession::spawn(config, InputSnapshot::default, SystemClock::new()).unwrap();

        let interrupted = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&interrupted);
        let trigger = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            flag.store(true, Ordering::Release);
        });

        assert!(drive(&mut session, FRAME, &interrupted));
        trigger.join().unwrap();

        assert!(!session.is_finished());
        session.shutdown().unwrap();
    }

    #[test]
    fn test_failed_session_ends_without_interrupt() {
        let config = SyncConfig {
            state_addr: "nowhere".to_string(),
            ..SyncConfig::default()
        };
        let mut session =
            SyncSession::spawn(config, InputSnapshot::default, SystemClock::new()).unwrap();

        assert!(!drive(&mut session, FRAME, &AtomicBool::new(false)));
        assert!(matches!(session.shutdown(), Err(SyncError::Connect { .. })));
    }
}
