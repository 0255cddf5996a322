pub mod handlers;
pub mod loader;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod reconcile;
pub mod sanitize;
