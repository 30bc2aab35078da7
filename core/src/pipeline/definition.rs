// bulk_reroute/src/pipeline/definition.rs

//! `Pipeline<TData, Err>` construction and handler registration.

use super::step::{Handler, SkipCondition, StepDef};
use super::{ContextData, PipelineControl};
use crate::error::RelayError;
use std::collections::HashMap;
use std::future::Future;

/// An ordered list of named steps over a root data type `TData`.
///
/// `Err` is what handlers fail with. It must absorb `RelayError` so the
/// engine can report its own failures (e.g. a step with no handler) through
/// the same channel.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<RelayError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<RelayError> + Send + Sync + 'static,
{
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_if)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      steps,
      on: HashMap::new(),
    }
  }

  /// Panics on an unknown step name: that is a wiring mistake, not a runtime condition.
  fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!("Pipeline setup error: step '{}' is not defined.", step_name);
    }
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<TData>>) {
    self.ensure_step_exists(step_name);
    if let Some(step) = self.steps.iter_mut().find(|s| s.name == step_name) {
      step.skip_if = skip_if;
    }
  }

  /// Registers a handler for `step_name`. Handlers of one step run in
  /// registration order. The handler's own error type only needs to convert
  /// into the pipeline's `Err`.
  pub fn on_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler: Handler<TData, Err> = Box::new(move |ctx_data| {
      let fut = handler_fn(ctx_data);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self.on.entry(step_name.to_string()).or_default().push(handler);
  }
}
