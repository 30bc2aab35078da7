// bulk_reroute/src/pipeline/execution.rs

use super::{ContextData, Pipeline, PipelineControl, PipelineResult};
use crate::error::RelayError;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<RelayError> + Send + Sync + 'static,
{
  /// Runs every step in order against `ctx_data`.
  ///
  /// Returns `Stopped` as soon as a handler asks to stop, the first handler
  /// error as-is, and `HandlerMissing` (converted into `Err`) for a
  /// non-optional step that has nothing registered.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      context_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if let Some(skip_if) = &step_def.skip_if {
        if ctx_data.with(|data| skip_if(data)) {
          event!(Level::INFO, step_name, "Step skipped by its skip condition.");
          continue;
        }
      }

      let handlers = match self.on.get(step_name) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ if step_def.optional => {
          event!(Level::DEBUG, step_name, "Optional step has no handlers, skipping.");
          continue;
        }
        _ => {
          event!(Level::ERROR, step_name, "Non-optional step has no handlers.");
          return Err(Err::from(RelayError::HandlerMissing {
            step_name: step_def.name.clone(),
          }));
        }
      };

      let step_span = span!(Level::INFO, "pipeline_step", step_name, step_index = step_idx);
      for handler_fn in handlers {
        match handler_fn(ctx_data.clone()).instrument(step_span.clone()).await {
          Ok(PipelineControl::Continue) => {}
          Ok(PipelineControl::Stop) => {
            event!(Level::INFO, step_name, "Pipeline stopped by handler.");
            return Ok(PipelineResult::Stopped);
          }
          Err(e) => {
            event!(Level::ERROR, step_name, error = %e, "Step handler failed.");
            return Err(e);
          }
        }
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }
}
