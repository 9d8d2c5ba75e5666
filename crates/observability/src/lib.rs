//! Logging setup shared by the service binaries.

pub mod subscriber;

pub use subscriber::{LogFormat, UnknownLogFormat};

/// Initialize process-wide tracing output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    subscriber::init(format);
}
