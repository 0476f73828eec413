// src/config/mod.rs
pub mod consts;
pub mod env;
pub mod options;
