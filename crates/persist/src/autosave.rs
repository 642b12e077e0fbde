//! Periodic autosave with a guaranteed final flush.
//!
//! A single background thread waits on a stop channel with a timeout. Each
//! timeout is a scheduled flush; a stop signal (or the handle being dropped)
//! ends the loop, and the thread flushes one last time before exiting. The
//! interval flush and the final flush therefore never run concurrently.

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

/// Default time between scheduled flushes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Something that can persist its state on demand.
///
/// Implementations must not panic on failure; errors are theirs to log.
pub trait Flusher: Send + Sync + 'static {
    fn flush(&self);
}

/// Handle to the running autosave thread.
///
/// Dropping the handle stops the timer and performs the final flush.
pub struct Autosave {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Autosave {
    /// Start flushing `flusher` every `interval`.
    pub fn start<F: Flusher>(flusher: Arc<F>, interval: Duration) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = std::thread::Builder::new()
            .name("autosave".into())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            tracing::debug!("autosave tick");
                            flusher.flush();
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::info!("autosave stopping, final flush");
                flusher.flush();
            })?;
        tracing::info!(interval_secs = interval.as_secs_f64(), "autosave started");
        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stop the timer and block until the final flush has completed.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            // A closed channel means the thread is already gone; join reports why.
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("autosave thread panicked before its final flush");
            }
        }
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingFlusher {
        flushes: AtomicUsize,
    }

    impl Flusher for CountingFlusher {
        fn flush(&self) {
            self.flushes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn shutdown_flushes_exactly_once_without_ticks() {
        let flusher = Arc::new(CountingFlusher::default());
        let autosave = Autosave::start(flusher.clone(), Duration::from_secs(3600)).unwrap();
        autosave.shutdown();
        assert_eq!(flusher.flushes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn ticks_flush_periodically() {
        let flusher = Arc::new(CountingFlusher::default());
        let autosave = Autosave::start(flusher.clone(), Duration::from_millis(10)).unwrap();
        std::thread::sleep(Duration::from_millis(100));
        autosave.shutdown();
        // At least one tick plus the final flush.
        assert!(flusher.flushes.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn drop_performs_final_flush() {
        let flusher = Arc::new(CountingFlusher::default());
        {
            let _autosave = Autosave::start(flusher.clone(), Duration::from_secs(3600)).unwrap();
        }
        assert_eq!(flusher.flushes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_flush_after_shutdown() {
        let flusher = Arc::new(CountingFlusher::default());
        let autosave = Autosave::start(flusher.clone(), Duration::from_millis(5)).unwrap();
        std::thread::sleep(Duration::from_millis(30));
        autosave.shutdown();
        let after = flusher.flushes.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(flusher.flushes.load(Ordering::SeqCst), after);
    }

    #[test]
    fn autosaves_a_world_store() {
        use crate::WorldStore;
        use worldforge_common::Position;

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("world.json");
        std::fs::write(&path, "{}").unwrap();
        let store = Arc::new(WorldStore::new(&path));
        let autosave = Autosave::start(store.clone(), Duration::from_secs(3600)).unwrap();

        store.add_structure(Position::new(1, 2, 3), "tower").unwrap();
        autosave.shutdown();

        let cold = WorldStore::new(&path);
        assert_eq!(cold.get_world().unwrap().get(Position::new(1, 2, 3)), Some("tower"));
    }
}
