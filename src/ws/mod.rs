//! WebSocket layer: live feed sessions.
//!
//! The WebSocket endpoint at `/ws` gives each client its own
//! [`session::FeedSession`]. Clients steer the view with commands; the
//! server pushes a recomputed feed after every command and every domain
//! event.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod session;
