//! Correlates transaction ids with the clients that opened them.

use std::net::SocketAddr;

use lru_cache::LruCache;

/// Default bound on live bindings. Ids are 16 bits, so this covers a
/// sixteenth of the id space before anything is evicted.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Maps a transaction id to the client address and port that asked, so a
/// later response can be routed back to the right requester.
///
/// Bindings are never removed explicitly -- a response reads its binding
/// and leaves it in place. The table is bounded by an LRU cap instead of
/// growing without limit; within the cap, a new query with an id already
/// present simply replaces the old binding (last write wins, no collision
/// detection).
///
/// Only ever touched from the single relay loop; not synchronized.
pub struct Tracker {
    clients: LruCache<u16, SocketAddr>,
}

impl Tracker {
    pub fn new(capacity: usize) -> Self {
        Tracker {
            clients: LruCache::new(capacity),
        }
    }

    /// Bind `id` to `client`, overwriting any existing binding.
    pub fn remember(&mut self, id: u16, client: SocketAddr) {
        self.clients.insert(id, client);
    }

    /// The client bound to `id`, if one is still tracked. The binding
    /// stays live for any retransmitted responses.
    pub fn lookup(&mut self, id: u16) -> Option<SocketAddr> {
        self.clients.get_mut(&id).map(|client| *client)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }
}
