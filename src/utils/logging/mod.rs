//! Logging, progress and console output

pub mod console;
pub mod log;
pub mod progress;

pub use console::{DEFAULT_PREVIEW_ROWS, DashboardReport, print_dashboard, render_dashboard, render_detail, render_table};
pub use self::log::{log_operation_complete, log_operation_start, log_warning};
pub use progress::{create_main_progress_bar, finish_progress_bar};
