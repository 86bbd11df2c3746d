mod probe;
mod reconciler;
mod worker;

pub use probe::{GatewayProbe, ProbeError, StatusProbe};
pub use reconciler::{ReconcileError, Reconciler, Resolution};
pub use worker::{ReconcileHandle, ReconcileStats, ReconcileWorker};
