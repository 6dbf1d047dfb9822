pub mod analytics;
pub mod auto_heal;
pub mod demo;
pub mod dispatch;
pub mod history;
pub mod init;
pub mod record;
pub mod schema;
pub mod shared;
pub mod stats;
pub mod strategies;
pub mod suggest_locator;
