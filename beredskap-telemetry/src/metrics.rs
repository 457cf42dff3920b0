//! ## beredskap-telemetry::metrics
//! **Prometheus recorder for simulation counters**

use prometheus::{Counter, Histogram, HistogramOpts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: prometheus::Registry,
    pub inputs_applied: prometheus::Counter,
    pub failovers_completed: prometheus::Counter,
    pub failover_delay_ms: prometheus::Histogram,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let inputs_applied =
            Counter::new("beredskap_inputs_total", "Total applied scenario inputs").unwrap();
        let failovers_completed =
            Counter::new("beredskap_failovers_total", "Total completed failovers").unwrap();

        let failover_delay_ms = Histogram::with_opts(
            HistogramOpts::new(
                "beredskap_failover_delay_ms",
                "Configured delay of completed failovers",
            )
            .buckets(vec![2000.0, 4000.0, 7000.0]),
        )
        .unwrap();

        registry.register(Box::new(inputs_applied.clone())).unwrap();
        registry
            .register(Box::new(failovers_completed.clone()))
            .unwrap();
        registry
            .register(Box::new(failover_delay_ms.clone()))
            .unwrap();

        Self {
            registry,
            inputs_applied,
            failovers_completed,
            failover_delay_ms,
        }
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_gathered_output() {
        let metrics = MetricsRecorder::new();
        metrics.inputs_applied.inc();
        metrics.failovers_completed.inc();
        metrics.failover_delay_ms.observe(4000.0);

        let output = metrics.gather_metrics().unwrap();
        assert!(output.contains("beredskap_inputs_total 1"));
        assert!(output.contains("beredskap_failovers_total 1"));
    }
}
