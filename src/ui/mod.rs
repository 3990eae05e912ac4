//! Terminal front-end for interactive chat sessions.
//!
//! [`chat_loop`] reads lines, dispatches slash commands to [`crate::commands`]
//! and prints assistant replies as they stream in. Domain state and backend
//! calls live in [`crate::core`].

pub mod chat_loop;
