//! CLI command implementations

mod auto_process;
mod config_gen;
mod report;
mod user_management;

pub use auto_process::run_auto_process;
pub use config_gen::config_generate;
pub use report::export_report;
pub use user_management::{add_user, list_users, remove_user};
