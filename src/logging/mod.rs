//! Logging infrastructure: a `tracing` console subscriber and a thin logger.

mod logger;
mod subscriber;

pub use logger::Logger;
pub use subscriber::init_subscriber;

/// Target used for stage headers.
pub const STAGE_TARGET: &str = "nh_module::stage";
