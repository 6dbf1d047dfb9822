mod app_context;
mod config_warnings;

pub use app_context::{AppContext, open_graph};
pub use config_warnings::warn_unconfigured;
