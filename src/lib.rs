pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logger;
pub mod models;
pub mod service;
