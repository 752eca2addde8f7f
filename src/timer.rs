use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use tracing::warn;

pub fn format_report(label: &str, elapsed: Duration) -> String {
    let ms = elapsed.as_nanos() as f64 / 1e6;
    format!("[{label}] took {ms} ms.")
}

/// Wall-clock timer for one contiguous region.
///
/// The clock starts on construction. The report line is written exactly once,
/// either by [`ScopedTimer::finish`] or when the timer is dropped, which also
/// covers early returns and unwinding out of the timed region.
#[must_use = "the region is measured until the timer is dropped"]
pub struct ScopedTimer<W: Write = Stdout> {
    label: String,
    start: Instant,
    out: W,
    reported: bool,
}

impl ScopedTimer {
    pub fn start(label: impl Into<String>) -> Self {
        Self::start_with_writer(label, io::stdout())
    }
}

impl<W: Write> ScopedTimer<W> {
    pub fn start_with_writer(label: impl Into<String>, out: W) -> Self {
        ScopedTimer {
            label: label.into(),
            out,
            reported: false,
            // last, so nothing above is measured
            start: Instant::now(),
        }
    }

    /// Stops the clock, writes the report and returns the measured duration.
    pub fn finish(mut self) -> Duration {
        self.report()
    }

    fn report(&mut self) -> Duration {
        let elapsed = self.start.elapsed();
        if !self.reported {
            self.reported = true;
            let line = format_report(&self.label, elapsed);
            if let Err(err) = writeln!(self.out, "{line}").and_then(|_| self.out.flush()) {
                warn!(label = %self.label, %err, "failed to write timing report");
            }
        }
        elapsed
    }
}

impl<W: Write> Drop for ScopedTimer<W> {
    fn drop(&mut self) {
        self.report();
    }
}
