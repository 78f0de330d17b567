//! Debounced flush scheduler
//!
//! A single worker thread coalesces bursts of mutations into one flush. Every
//! [`FlushScheduler::touch`] restarts the quiescence window; the callback runs
//! once the window elapses without another touch.

use crate::error::{Error, Result};
use crate::sync::MutexExt;

use log::{debug, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default quiescence window
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

enum Signal {
    Touch,
    Stop,
}

/// Restartable single-shot timer driving the flush callback
pub struct FlushScheduler {
    sender: Mutex<Option<Sender<Signal>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    fires: Arc<AtomicU64>,
    window: Duration,
}

impl FlushScheduler {
    /// Start the worker thread.
    ///
    /// # Errors
    ///
    /// Returns `Error::SchedulerSpawn` if the thread cannot be created.
    pub fn spawn<F>(window: Duration, callback: F) -> Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<Signal>();
        let fires = Arc::new(AtomicU64::new(0));
        let worker_fires = Arc::clone(&fires);

        let worker = thread::Builder::new()
            .name("settings-flush".to_string())
            .spawn(move || {
                // Idle: wait for the first touch of a burst
                while let Ok(Signal::Touch) = receiver.recv() {
                    loop {
                        match receiver.recv_timeout(window) {
                            Ok(Signal::Touch) => continue,
                            Ok(Signal::Stop) | Err(RecvTimeoutError::Disconnected) => return,
                            Err(RecvTimeoutError::Timeout) => break,
                        }
                    }
                    worker_fires.fetch_add(1, Ordering::SeqCst);
                    debug!("Debounce window elapsed, flushing settings");
                    callback();
                }
            })
            .map_err(Error::SchedulerSpawn)?;

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            fires,
            window,
        })
    }

    /// Restart the quiescence window
    pub fn touch(&self) {
        if let Some(sender) = self.sender.lock_recovered().as_ref() {
            // The worker only goes away during shutdown
            let _ = sender.send(Signal::Touch);
        }
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// A pending window is abandoned without firing; the caller is expected to
    /// flush afterwards. Calling this more than once is harmless.
    pub fn shutdown(&self) {
        if let Some(sender) = self.sender.lock_recovered().take() {
            let _ = sender.send(Signal::Stop);
        }
        if let Some(worker) = self.worker.lock_recovered().take() {
            if worker.thread().id() == thread::current().id() {
                // Shutdown triggered from inside the callback; the loop exits on Stop
                return;
            }
            if worker.join().is_err() {
                warn!("Flush scheduler thread panicked");
            }
        }
    }

    /// Number of times the callback has been invoked
    #[must_use]
    pub fn fire_count(&self) -> u64 {
        self.fires.load(Ordering::SeqCst)
    }

    /// Quiescence window
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Drop for FlushScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
