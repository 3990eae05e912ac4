pub mod access;
pub mod app;
pub mod backend;
pub mod builtin_presets;
pub mod chat_stream;
pub mod config;
pub mod conversation;
pub mod export;
pub mod hosted;
pub mod message;
pub mod preset;
pub mod session;
