//! Command handlers.
//!
//! Each handler takes the resolved configuration, drives the library and
//! formats the result for the terminal.

pub mod check;
pub mod config;
pub mod speak;
pub mod voices;
