//! # echo-relay
//!
//! WebSocket relay that accepts JSON messages, appends each one to a
//! `messages` table, and echoes it back to the sender.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket)
//!     │
//!     ├── Listener + router (server, api/)
//!     ├── ConnectionHandler, one per socket (ws/)
//!     │
//!     └── MessageStore (persistence/)
//!             ├── PostgreSQL
//!             ├── in-memory (tests)
//!             └── no-op (persistence disabled)
//! ```
//!
//! ## Wire format
//!
//! Inbound: any JSON value as a text (or UTF-8 binary) frame.
//!
//! Outbound, exactly one frame per inbound frame:
//!
//! ```json
//! {"type":"ECHO","content":{"foo":1},"timestamp":"2026-10-16T09:30:00.123Z"}
//! {"type":"ERROR","message":"Invalid message format"}
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod persistence;
pub mod server;
pub mod ws;
