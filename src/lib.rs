pub mod atomic;
pub mod cleanup;
pub mod config;
pub mod corpus;
pub mod error;
pub mod header;
pub mod import;
pub mod logging;
pub mod pipeline;
pub mod sanitize;
pub mod validate;
