pub mod checker;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod notifier;
pub mod parsers;
pub mod probe;
pub mod runner;
pub mod scheduler;
pub mod utils;
