//! Request Flow Module
//!
//! Navigation decisions around a step controller.
//!
//! - [`decision`]: The pure verdict function and its vocabulary
//! - [`control`]: Per-request orchestration around the workflow processor

pub mod control;
pub mod decision;

pub use control::{FlowController, Navigation, StepResult};
pub use decision::{decide, ControllerOutcome, Method, StatusCode, UserAction, Verdict};
