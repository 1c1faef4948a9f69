//! Simulated location provider
//!
//! Replays a fixed list of fixes with a delay between them, or reports a permission
//! denial, the way a platform location service would after its permission prompt.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use step4park_lib::runtime;
use step4park_lib::{Coordinate, LocationError, LocationProvider, LocationSink};
use tokio::task::JoinHandle;

pub struct SimulatedLocationProvider {
    fixes: Vec<Coordinate>,
    interval: Duration,
    deny: bool,
    started: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatedLocationProvider {
    pub fn new(fixes: Vec<Coordinate>, interval: Duration) -> Self {
        Self {
            fixes,
            interval,
            deny: false,
            started: AtomicBool::new(false),
            task: Mutex::new(None),
        }
    }

    /// A provider whose permission prompt the user declined
    pub fn denied() -> Self {
        Self {
            deny: true,
            ..Self::new(Vec::new(), Duration::ZERO)
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}

impl LocationProvider for SimulatedLocationProvider {
    fn start(&self, sink: LocationSink) -> Result<(), LocationError> {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::debug!("Simulated location already started");
            return Ok(());
        }

        if self.deny {
            sink.failure(LocationError::PermissionDenied);
            return Ok(());
        }

        if !runtime::in_runtime_context() {
            self.started.store(false, Ordering::SeqCst);
            return Err(LocationError::Unavailable("no async runtime".into()));
        }

        let fixes = self.fixes.clone();
        let interval = self.interval;
        let handle = runtime::spawn(async move {
            for fix in fixes {
                tokio::time::sleep(interval).await;
                if !sink.update(fix) {
                    tracing::debug!("Location listener gone, stopping replay");
                    break;
                }
            }
        });

        if let Ok(mut task) = self.task.lock() {
            *task = Some(handle);
        }
        Ok(())
    }

    fn stop(&self) {
        if let Some(handle) = self.task.lock().ok().and_then(|mut task| task.take()) {
            handle.abort();
        }
        self.started.store(false, Ordering::SeqCst);
    }
}
