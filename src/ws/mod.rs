//! WebSocket layer: upgrade, per-connection handling, outbound frames.
//!
//! Every path except `/health` upgrades to the relay; there is no path or
//! subprotocol negotiation.

pub mod connection;
pub mod handler;
pub mod messages;

pub use connection::ConnectionHandler;
pub use messages::OutboundFrame;
