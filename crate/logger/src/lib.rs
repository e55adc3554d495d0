pub use log_utils::log_init;
pub use tracing::{debug, error, info, trace, warn};

mod log_utils;
