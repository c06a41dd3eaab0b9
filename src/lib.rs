//! A single-route greeting service that runs either behind AWS Lambda or as
//! a plain HTTP server.

pub mod adapter;
pub mod app;
pub mod config;
pub mod logging;
pub mod server;

pub use adapter::{run, run_with, Options};
pub use app::{router, Greeting};
pub use config::{Config, ConfigError, ServeMode};

pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
