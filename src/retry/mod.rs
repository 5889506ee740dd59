pub mod controller;
pub mod policy;

pub use controller::{RetryController, RunOutcome, RunState};
pub use policy::RetryPolicy;
