//! Application layer for StoryDoc.
//!
//! The workflow controller owns one session's state machine and drives the
//! gateways; the registry gives every interactive user an isolated
//! controller.

pub mod observer;
pub mod registry;
pub mod workflow_controller;

pub use observer::{ChannelObserver, CompositeObserver, TracingObserver};
pub use registry::{SessionHandle, SessionRegistry};
pub use workflow_controller::{GenerateTrigger, WorkflowController};
