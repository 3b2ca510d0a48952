use std::io;
use std::time::Duration;
use thiserror::Error;

/// Failure to establish an authenticated session. Terminal for the host.
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("cannot resolve {target}: {message}")]
    Resolve { target: String, message: String },

    #[error("connection to {target} timed out after {}s", timeout.as_secs())]
    Timeout { target: String, timeout: Duration },

    #[error("connection to {target} failed: {source}")]
    Io {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("SSH handshake with {target} failed: {message}")]
    Handshake { target: String, message: String },

    #[error("host key verification failed for {target}: {reason}")]
    HostKey { target: String, reason: String },

    #[error("authentication as {user} on {target} failed: {message}")]
    Auth {
        target: String,
        user: String,
        message: String,
    },
}

/// Failure of an already-open session. Terminal for the remaining rules of the host.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("channel error: {0}")]
    Channel(String),

    #[error("I/O error on channel: {0}")]
    Io(#[source] io::Error),

    #[error("command timed out")]
    Timeout,
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportError::Timeout,
            _ => TransportError::Io(err),
        }
    }
}
