pub mod ai;
pub mod collision;
pub mod config;
pub mod engine;
pub mod error;
pub mod food;
pub mod grid;
pub mod input;
pub mod logging;
pub mod progression;
pub mod renderer;
pub mod schedule;
pub mod score;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
