use crate::prelude::QuakeError;
use log::{error, info, warn};

/// Component-scoped logger; every line is prefixed with the owning component.
pub struct LogManager {
    component: &'static str,
}

impl LogManager {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.component, message);
    }

    pub fn warn(&self, message: &str) {
        warn!("[{}] {}", self.component, message);
    }

    pub fn failure(&self, context: &str, err: &QuakeError) {
        error!("[{}] {}: {}", self.component, context, err);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("quakecore")
    }
}
