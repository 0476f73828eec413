// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod model;
pub mod progress;
pub mod publish;
pub mod runner;
pub mod select;
pub mod specs;
pub mod store;
