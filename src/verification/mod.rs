pub mod message;
pub mod orchestrator;

pub use message::{format_register_time, verify_command, volume_command, ReplySettings};
pub use orchestrator::{
    FallbackPolicy, Orchestrator, VerificationOutcome, VerificationState, VolumeOutcome,
};
