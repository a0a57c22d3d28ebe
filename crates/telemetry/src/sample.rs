use std::time::Duration;

/// One completed request, as seen by the instrumentation layer.
///
/// Endpoint and method labels are `'static` so that the set of label values
/// is fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub endpoint: &'static str,
    pub method: &'static str,
    pub status: u16,
    pub elapsed: Duration,
}

impl Sample {
    pub fn new(endpoint: &'static str, method: &'static str, status: u16, elapsed: Duration) -> Self {
        Self {
            endpoint,
            method,
            status,
            elapsed,
        }
    }

    /// Elapsed wall-clock time in seconds.
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_from_duration() {
        let sample = Sample::new("index", "GET", 200, Duration::from_millis(250));
        assert!((sample.seconds() - 0.25).abs() < f64::EPSILON);
    }
}
