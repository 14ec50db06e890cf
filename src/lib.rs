pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod endpoint;
pub mod error;
pub mod output;
pub mod store;
