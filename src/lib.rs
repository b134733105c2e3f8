pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod layout;
pub mod model;
pub mod store;
pub mod trace;
pub mod tracing;
pub mod utils;

pub use engine::*;
pub use error::*;

pub use error::{ConfigError, FetchError, StoreError, TraceError};

pub use error::Result;
