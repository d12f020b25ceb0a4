use std::time::{Duration, Instant};

/// Start/stop timer for measuring a single filtering run.
///
/// Starting a running watch or stopping a stopped one has no effect.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    start: Option<Instant>,
    elapsed: Duration,
    running: bool,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.start = Some(Instant::now());
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        if let Some(start) = self.start {
            self.elapsed = start.elapsed();
        }
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        if self.running {
            self.start = Some(Instant::now());
        }
    }

    /// Time between the last `start` and `stop`, or up to now while running
    pub fn elapsed(&self) -> Duration {
        match (self.running, self.start) {
            (true, Some(start)) => start.elapsed(),
            _ => self.elapsed,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start a watch that reports to the log once it goes out of scope
    pub fn logged(label: impl Into<String>) -> LoggedStopwatch {
        let mut watch = Self::new();
        watch.start();
        LoggedStopwatch {
            label: label.into(),
            watch,
        }
    }
}

/// Running [`Stopwatch`] that logs its label and elapsed time when dropped
pub struct LoggedStopwatch {
    label: String,
    watch: Stopwatch,
}

impl LoggedStopwatch {
    pub fn elapsed(&self) -> Duration {
        self.watch.elapsed()
    }
}

impl Drop for LoggedStopwatch {
    fn drop(&mut self) {
        self.watch.stop();
        log::info!("{} took {:.3} ms", self.label, self.watch.elapsed_secs() * 1000.0);
    }
}
