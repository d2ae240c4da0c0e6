//! The relay loop: receive a datagram, classify it, answer or forward.

use std::net::{SocketAddr, UdpSocket};

use log::{debug, info, warn};

use crate::config::Config;
use crate::dns;
use crate::dns::Error;
use crate::table::NameStore;
use crate::tracker::{self, Tracker};

/// Receive buffer capacity. Plenty for plain UDP queries; answers this
/// relay synthesizes are never larger than the query that caused them
/// plus the address records.
pub const BUF_SIZE: usize = 512;

/// One relay instance: a bound socket, the transaction tracker and the
/// name table, driven by a single sequential loop.
pub struct Server<S: NameStore> {
    socket: UdpSocket,
    buf: [u8; BUF_SIZE],
    upstream: SocketAddr,
    redirect_only: bool,
    tracker: Tracker,
    table: S,
}

impl<S: NameStore> Server<S> {
    /// Bind the relay socket and assemble the engine around `table`.
    pub fn bind(config: &Config, table: S) -> Result<Self, Error> {
        let socket = UdpSocket::bind(config.listen_addr())?;
        info!(
            "listening on {}, upstream resolver {}{}",
            socket.local_addr()?,
            config.upstream,
            if config.redirect_only { " (redirect only)" } else { "" }
        );
        Ok(Server {
            socket,
            buf: [0; BUF_SIZE],
            upstream: config.upstream,
            redirect_only: config.redirect_only,
            tracker: Tracker::new(tracker::DEFAULT_CAPACITY),
            table,
        })
    }

    /// The address the relay ended up bound to. Useful when the
    /// configured port was 0.
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive and relay datagrams until the socket fails. A failure
    /// while handling one datagram is logged and the next datagram is
    /// served; only bind/receive errors take the relay down.
    pub fn serve_forever(&mut self) -> Result<(), Error> {
        loop {
            let (len, sender) = self.socket.recv_from(&mut self.buf)?;
            debug!("{} bytes from {}", len, sender);
            if let Err(err) = self.process_datagram(len, sender) {
                warn!("dropping datagram from {}: {}", sender, err);
            }
        }
    }

    fn process_datagram(&mut self, len: usize, sender: SocketAddr) -> Result<(), Error> {
        if dns::is_query(&self.buf[..len]) {
            self.process_query(len, sender)
        } else {
            self.process_response(len)
        }
    }

    /// A client asked for a name: remember who asked, then either answer
    /// from the table or pass the query upstream untouched.
    fn process_query(&mut self, len: usize, sender: SocketAddr) -> Result<(), Error> {
        let query = dns::decode_query(&self.buf[..len]);
        debug!("query {:#06x} for {} from {}", query.id, query.domain, sender);
        self.tracker.remember(query.id, sender);

        if self.redirect_only {
            self.socket.send_to(&self.buf[..len], self.upstream)?;
            debug!("redirected {:#06x} to {}", query.id, self.upstream);
            return Ok(());
        }

        let known = self.table.lookup(&query.domain)?;
        if known.is_empty() {
            self.socket.send_to(&self.buf[..len], self.upstream)?;
            debug!("forwarded {:#06x} to {}", query.id, self.upstream);
            return Ok(());
        }

        match dns::build_answer(&self.buf[..len], &known)? {
            Some(packet) => match self.tracker.lookup(query.id) {
                Some(client) => {
                    self.socket.send_to(&packet, client)?;
                    debug!("answered {} for {} from the table", client, query.domain);
                }
                None => warn!("no client bound to transaction {:#06x}", query.id),
            },
            None => debug!("no answer built for {}", query.domain),
        }
        Ok(())
    }

    /// An upstream response came back: record any addresses we have not
    /// seen for the name, then relay the answer to whoever asked.
    fn process_response(&mut self, len: usize) -> Result<(), Error> {
        let response = dns::decode_response(&self.buf[..len]);
        debug!(
            "response {:#06x} for {}, {} answers",
            response.id, response.domain, response.answer_count
        );

        // one lookup for the whole batch; record only what is new
        let mut known = self.table.lookup(&response.domain)?;
        for address in &response.addresses {
            if !known.contains(address) {
                self.table.record(&response.domain, address)?;
                info!("recorded {} -> {}", response.domain, address);
                known.push(address.clone());
            }
        }

        let packet = match dns::build_answer(&self.buf[..len], &response.addresses)? {
            Some(packet) => packet,
            None => return Ok(()),
        };
        match self.tracker.lookup(response.id) {
            Some(client) if client.port() != 0 => {
                self.socket.send_to(&packet, client)?;
                debug!("relayed {:#06x} to {}", response.id, client);
            }
            _ => debug!("no requester for transaction {:#06x}, dropped", response.id),
        }
        Ok(())
    }
}
