//! Drugline Core - Shared infrastructure for the drug mention pipeline
//!
//! Logging bootstrap, progress status lines and the retry policy used
//! around file I/O. Nothing here knows about drugs or publications.

pub mod logging;
pub mod progress;
pub mod retry;

// Re-exports for convenience
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, fmt_num};
pub use retry::{RetryPolicy, Retryable, retry};
