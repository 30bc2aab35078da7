// bulk_reroute/src/pipeline/control.rs

/// Returned by a step handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt the run. Remaining handlers and steps are not executed; the run
  /// still counts as a success (`PipelineResult::Stopped`).
  Stop,
}

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  Completed,
  Stopped,
}
