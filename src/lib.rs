//! A small UDP DNS relay.
//!
//! Datagrams arriving on the listening socket are classified as queries or
//! responses by inspecting raw header bytes. Queries are answered from a
//! hosts-style name table when possible and forwarded untouched to an
//! upstream resolver otherwise; responses are relayed back to the client
//! that opened the transaction, and any addresses they carry are recorded
//! in the table for next time.

pub mod config;
pub mod dns;
pub mod server;
pub mod table;
pub mod tracker;

pub use crate::config::Config;
pub use crate::dns::Error;
pub use crate::server::Server;
pub use crate::table::{HostsFile, NameStore};
pub use crate::tracker::Tracker;
