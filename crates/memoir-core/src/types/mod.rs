//! Core types for memoir.

mod candidate;
mod connection;
mod event;
mod filter;
mod message;
mod timeline;

pub use candidate::*;
pub use connection::*;
pub use event::*;
pub use filter::*;
pub use message::*;
pub use timeline::*;
