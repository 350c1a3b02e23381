pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod deck;
pub mod error;
pub mod logging;
pub mod parser;
pub mod render;
pub mod theme;
