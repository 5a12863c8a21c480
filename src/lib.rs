pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod gemini;
pub mod interactive;
pub mod logging;
pub mod upload;
pub mod workflow;
