// bulk_reroute/src/pipeline/mod.rs

//! A small async step pipeline: named steps run in order over a shared,
//! lockable context, each able to continue, stop early, or fail the run.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;
pub mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::Pipeline;
pub use step::{Handler, SkipCondition, StepDef};
