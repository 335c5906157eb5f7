//! Step observer that logs each step and optionally writes it as JSON.
//!
//! Every step is logged at `info` with its time, tag, coherence, and regime.
//! When JSON output is enabled, each [`StepRecord`] is also written as one
//! line of JSON to the configured writer (stdout in the binary), so a
//! downstream consumer can read the trace as JSON Lines while logs go to
//! stderr.

use std::io::Write;

use omega_core::StepObserver;
use omega_types::StepRecord;
use tracing::{info, warn};

use crate::error::EngineError;

/// Observer bridging the step loop to logs and a JSON Lines sink.
pub struct TraceObserver<W: Write> {
    /// Destination for JSON lines, if enabled.
    sink: Option<W>,
    /// First write failure; later records are not written.
    failure: Option<String>,
    /// Lines written so far.
    lines_written: u64,
}

impl<W: Write> TraceObserver<W> {
    /// Create an observer. `sink` of `None` disables JSON output.
    pub const fn new(sink: Option<W>) -> Self {
        Self {
            sink,
            failure: None,
            lines_written: 0,
        }
    }

    /// Number of JSON lines written.
    pub const fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Flush the sink and report the first failure, if any.
    pub fn finish(mut self) -> Result<Option<W>, EngineError> {
        if let Some(message) = self.failure.take() {
            return Err(EngineError::Output { message });
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.flush().map_err(|e| EngineError::Output {
                message: format!("failed to flush step trace: {e}"),
            })?;
        }
        Ok(self.sink)
    }

    fn write_line(&mut self, record: &StepRecord) -> Result<(), String> {
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };
        serde_json::to_writer(&mut *sink, record)
            .map_err(|e| format!("failed to serialize step {}: {e}", record.t))?;
        sink.write_all(b"\n")
            .map_err(|e| format!("failed to write step {}: {e}", record.t))?;
        self.lines_written = self.lines_written.saturating_add(1);
        Ok(())
    }
}

impl<W: Write> StepObserver for TraceObserver<W> {
    fn on_step(&mut self, record: &StepRecord) {
        info!(
            t = record.t,
            tag = record.tag.as_deref(),
            coherence = record.coherence,
            regime = %record.regime,
            "Step"
        );

        if self.failure.is_some() {
            return;
        }
        if let Err(message) = self.write_line(record) {
            warn!(error = %message, "step trace output disabled");
            self.failure = Some(message);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use omega_core::OmegaEngine;
    use omega_core::input::NoInput;
    use omega_core::run_steps;

    use super::*;

    #[test]
    fn writes_one_json_line_per_step() {
        let mut engine = OmegaEngine::with_defaults();
        engine.initialize(&[1.0, 0.0, 1.0, 1.0]).unwrap();
        let mut observer = TraceObserver::new(Some(Vec::new()));

        run_steps(&mut engine, 3, &mut NoInput, "step_", &mut observer).unwrap();
        assert_eq!(observer.lines_written(), 3);

        let bytes = observer.finish().unwrap().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);

        let last: StepRecord = serde_json::from_str(lines.last().copied().unwrap()).unwrap();
        assert_eq!(last.t, 3);
        assert_eq!(last.tag.as_deref(), Some("step_2"));
    }

    #[test]
    fn disabled_sink_writes_nothing() {
        let mut engine = OmegaEngine::with_defaults();
        let mut observer: TraceObserver<Vec<u8>> = TraceObserver::new(None);
        run_steps(&mut engine, 2, &mut NoInput, "s", &mut observer).unwrap();
        assert_eq!(observer.lines_written(), 0);
        assert!(observer.finish().unwrap().is_none());
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_reported_at_finish() {
        let mut engine = OmegaEngine::with_defaults();
        let mut observer = TraceObserver::new(Some(FailingWriter));
        run_steps(&mut engine, 2, &mut NoInput, "s", &mut observer).unwrap();
        assert_eq!(observer.lines_written(), 0);
        assert!(matches!(
            observer.finish(),
            Err(EngineError::Output { .. })
        ));
    }
}
