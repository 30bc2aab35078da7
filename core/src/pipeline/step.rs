// bulk_reroute/src/pipeline/step.rs
use super::{ContextData, PipelineControl};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed async step handler. It receives a clone of the run's context handle.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// Evaluated before a step; `true` skips it.
pub type SkipCondition<TData> = Arc<dyn Fn(&TData) -> bool + Send + Sync + 'static>;

#[derive(Clone)]
pub struct StepDef<T: 'static + Send + Sync> {
  pub name: String,
  pub optional: bool,
  pub skip_if: Option<SkipCondition<T>>,
}

impl<T: 'static + Send + Sync> std::fmt::Debug for StepDef<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}
