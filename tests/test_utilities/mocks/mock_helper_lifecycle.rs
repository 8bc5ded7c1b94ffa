use async_trait::async_trait;
use jmx_collector::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock HelperLifecycle tracking state transitions without a JVM
#[derive(Clone)]
pub struct MockHelperLifecycle {
    state: Arc<Mutex<HelperState>>,
    pub starts: Arc<AtomicUsize>,
    pub stops: Arc<AtomicUsize>,
    fail_start: bool,
}

impl MockHelperLifecycle {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HelperState::Stopped)),
            starts: Arc::new(AtomicUsize::new(0)),
            stops: Arc::new(AtomicUsize::new(0)),
            fail_start: false,
        }
    }

    pub fn with_start_failure() -> Self {
        Self {
            fail_start: true,
            ..Self::new()
        }
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HelperLifecycle for MockHelperLifecycle {
    async fn start(&self) -> std::result::Result<(), CollectorError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err(CollectorError::lifecycle(
                "Nailgun server is not starting correctly",
            ));
        }
        *self.state.lock().unwrap() = HelperState::Running;
        Ok(())
    }

    async fn stop(&self) -> std::result::Result<(), CollectorError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        *self.state.lock().unwrap() = HelperState::Stopped;
        Ok(())
    }

    fn state(&self) -> HelperState {
        *self.state.lock().unwrap()
    }
}
