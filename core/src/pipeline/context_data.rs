// bulk_reroute/src/pipeline/context_data.rs
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Per-invocation state shared between the steps of one pipeline run.
///
/// Guards returned by `read`/`write` block, so they must be dropped before
/// the handler reaches its next `.await`.
#[derive(Debug)]
pub struct ContextData<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> ContextData<T> {
  pub fn new(data: T) -> Self {
    ContextData(Arc::new(RwLock::new(data)))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Reads a value out of the context without keeping the guard alive.
  pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
    f(&self.0.read())
  }
}

impl<T: Send + Sync + 'static> Clone for ContextData<T> {
  fn clone(&self) -> Self {
    ContextData(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for ContextData<T> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}
