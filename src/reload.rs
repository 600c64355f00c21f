//! Live-reload notification channel.
//!
//! In watch mode a small TCP server accepts client connections (browser
//! helpers, editor plugins) and each completed build broadcasts one
//! newline-delimited JSON event to every connected client. The broadcast is
//! fire-and-forget: dead clients are dropped, nobody listening is fine, and
//! a failure to notify never fails the build.

use serde::Serialize;
use std::io::Write;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Cap on how long a broadcast may block on one slow client.
const WRITE_TIMEOUT: Duration = Duration::from_millis(250);

/// Event pushed to live-reload clients.
#[derive(Debug, Clone, Serialize)]
pub struct ReloadEvent {
    /// Event kind, currently always "update"
    pub event: String,
    /// Output paths that changed
    pub paths: Vec<String>,
}

impl ReloadEvent {
    /// Create a stylesheet-updated event.
    pub fn update(paths: Vec<String>) -> Self {
        Self { event: "update".to_string(), paths }
    }
}

type ClientList = Arc<Mutex<Vec<TcpStream>>>;

/// Handle for broadcasting reload events.
///
/// Cheap to clone; all clones share the same client list. A disconnected
/// handle broadcasts into the void.
#[derive(Debug, Clone, Default)]
pub struct ReloadHandle {
    clients: Option<ClientList>,
}

impl ReloadHandle {
    /// A handle with no server behind it. Broadcasts are no-ops.
    ///
    /// Used by one-shot builds, where no reload server is running.
    pub fn disconnected() -> Self {
        Self { clients: None }
    }

    /// Broadcast an event to all connected clients, dropping any that are
    /// gone. Returns the number of clients notified.
    pub fn broadcast(&self, event: &ReloadEvent) -> usize {
        let Some(clients) = &self.clients else {
            return 0;
        };

        let line = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("could not serialize reload event: {}", err);
                return 0;
            }
        };

        let Ok(mut clients) = clients.lock() else {
            return 0;
        };

        clients.retain_mut(|stream| {
            stream
                .write_all(line.as_bytes())
                .and_then(|_| stream.write_all(b"\n"))
                .and_then(|_| stream.flush())
                .is_ok()
        });

        clients.len()
    }
}

/// TCP server accepting live-reload clients.
pub struct ReloadServer {
    addr: SocketAddr,
    clients: ClientList,
}

impl ReloadServer {
    /// Bind the server on localhost at the given port and start accepting
    /// clients on a background thread. Port 0 picks an ephemeral port.
    pub fn bind(port: u16) -> std::io::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))?;
        let addr = listener.local_addr()?;
        let clients: ClientList = Arc::default();

        let accept_clients = Arc::clone(&clients);
        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => {
                        if let Err(err) = stream.set_write_timeout(Some(WRITE_TIMEOUT)) {
                            log::warn!("reload client rejected: {}", err);
                            continue;
                        }
                        log::debug!("reload client connected");
                        if let Ok(mut clients) = accept_clients.lock() {
                            clients.push(stream);
                        }
                    }
                    Err(err) => {
                        log::warn!("reload accept error: {}", err);
                    }
                }
            }
        });

        Ok(Self { addr, clients })
    }

    /// Address the server is listening on.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get a broadcast handle for this server.
    pub fn handle(&self) -> ReloadHandle {
        ReloadHandle { clients: Some(Arc::clone(&self.clients)) }
    }

    /// Number of currently connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.lock().map(|c| c.len()).unwrap_or(0)
    }
}
