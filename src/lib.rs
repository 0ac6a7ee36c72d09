//! CubeMX project patcher.
//!
//! Idempotently patches a CMake project generated by STM32CubeMX: upserts
//! top-level variables, keeps a managed source glob and function argument
//! lists in `CMakeLists.txt`, rebuilds a trailing extra section, points the
//! presets at a shared binary directory, overlays template sources and
//! injects snippets after user-code markers. Everything is driven by one TOML
//! document with optional named profiles.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: load the document and resolve profile overlays
//! - **[`cmake`]**, **[`inject`]**, **[`overlay`]**: pure text and tree transforms
//! - **[`resources`]**: idempotent `check + apply` wrappers around project files
//! - **[`tasks`]**: named phases wired to resources
//! - **[`commands`]**: the `setup` run that executes every phase in order
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod cmake;
pub mod commands;
pub mod config;
pub mod error;
pub mod inject;
pub mod logging;
pub mod overlay;
pub mod resources;
pub mod tasks;
