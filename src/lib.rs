pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod paginator;
pub mod pipeline;
pub mod ranker;
pub mod resolver;
pub mod stats;
pub mod youtube;
