pub mod debug_logger;
pub mod io;
pub mod probe;

pub use debug_logger::{get_debug_logger, EnhancedDebugLogger};
