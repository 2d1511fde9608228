//! MapTool startup configuration
//!
//! A library resolving every startup setting of MapTool from the command
//! line, a persistent startup properties file, system properties and
//! built-in defaults.

pub mod config;
