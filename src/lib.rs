//! Nova is a small terminal chat front-end for language models.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session, presets, the backend clients (a streaming
//!   local client and a non-streaming hosted client), configuration, and
//!   export/snapshot persistence.
//! - [`ui`] runs the line-oriented chat loop.
//! - [`commands`] implements slash-command parsing and execution used by the
//!   chat loop.
//! - [`api`] defines the wire payloads exchanged with both backends.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`core::app`] and
//! [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
