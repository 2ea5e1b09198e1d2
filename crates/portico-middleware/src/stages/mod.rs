//! Built-in middleware stages.

mod trace;

pub use trace::TraceStage;
