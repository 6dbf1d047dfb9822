//! Knowledge graph operations, one file per concern.

mod analytics;
mod healing;
mod locator;
mod record;
