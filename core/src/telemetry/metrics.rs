use std::sync::Mutex;

/// Counters for completed loads.
pub struct LoadMetrics {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub loads: usize,
    pub failures: usize,
    pub records: usize,
}

struct Metrics {
    loads: usize,
    failures: usize,
    records: usize,
}

impl LoadMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                loads: 0,
                failures: 0,
                records: 0,
            }),
        }
    }

    pub fn record_load(&self, records: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.loads += 1;
            metrics.records += records;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failures += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                loads: metrics.loads,
                failures: metrics.failures,
                records: metrics.records,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for LoadMetrics {
    fn default() -> Self {
        Self::new()
    }
}
