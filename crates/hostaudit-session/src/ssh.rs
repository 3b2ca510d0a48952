//! SSH transport on libssh2.

use crate::credential::{Login, RenderedCommand};
use crate::error::{ConnectError, TransportError};
use crate::target::HostTarget;
use crate::{CommandSession, Connector};
use hostaudit_domain::model::CommandResult;
use hostaudit_domain::policy::HostKeyPolicy;
use sha2::{Digest, Sha256};
use ssh2::{CheckResult, ErrorCode, KnownHostFileKind, Session};
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// `LIBSSH2_ERROR_TIMEOUT`
const SESSION_TIMEOUT_CODE: i32 = -9;

/// Pause between polls when neither output stream has data.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Lowercase hex SHA-256 of a raw host key blob.
pub fn host_key_fingerprint(key: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key);
    hex::encode(hasher.finalize())
}

/// Opens password- or key-authenticated SSH sessions.
#[derive(Clone, Debug)]
pub struct SshConnector {
    login: Login,
    host_keys: HostKeyPolicy,
    connect_timeout: Duration,
}

impl SshConnector {
    pub fn new(login: Login, host_keys: HostKeyPolicy, connect_timeout: Duration) -> Self {
        Self {
            login,
            host_keys,
            connect_timeout,
        }
    }

    fn tcp_connect(&self, target: &HostTarget) -> Result<TcpStream, ConnectError> {
        let addrs: Vec<SocketAddr> = (target.host.as_str(), target.port)
            .to_socket_addrs()
            .map_err(|e| ConnectError::Resolve {
                target: target.label.clone(),
                message: e.to_string(),
            })?
            .collect();

        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    debug!(%addr, error = %e, "tcp connect failed");
                    last_error = Some(e);
                }
            }
        }

        Err(match last_error {
            Some(e) if e.kind() == io::ErrorKind::TimedOut => ConnectError::Timeout {
                target: target.label.clone(),
                timeout: self.connect_timeout,
            },
            Some(source) => ConnectError::Io {
                target: target.label.clone(),
                source,
            },
            None => ConnectError::Resolve {
                target: target.label.clone(),
                message: "no addresses".to_string(),
            },
        })
    }

    fn verify_host_key(&self, session: &Session, target: &HostTarget) -> Result<(), ConnectError> {
        let reject = |reason: String| ConnectError::HostKey {
            target: target.label.clone(),
            reason,
        };
        let (key, _) = session
            .host_key()
            .ok_or_else(|| reject("server presented no host key".to_string()))?;

        match &self.host_keys {
            HostKeyPolicy::Strict { known_hosts } => {
                let mut known = session
                    .known_hosts()
                    .map_err(|e| reject(format!("known_hosts unavailable: {e}")))?;
                known
                    .read_file(known_hosts, KnownHostFileKind::OpenSSH)
                    .map_err(|e| reject(format!("cannot read {}: {e}", known_hosts.display())))?;

                match known.check_port(&target.host, target.port, key) {
                    CheckResult::Match => Ok(()),
                    CheckResult::Mismatch => Err(reject(format!(
                        "host key does not match the entry in {}",
                        known_hosts.display()
                    ))),
                    CheckResult::NotFound => Err(reject(format!(
                        "host is not listed in {}",
                        known_hosts.display()
                    ))),
                    CheckResult::Failure => Err(reject("known_hosts lookup failed".to_string())),
                }
            }
            HostKeyPolicy::Pinned { fingerprints } => {
                let actual = host_key_fingerprint(key);
                let pin = fingerprints
                    .get(&target.label)
                    .or_else(|| fingerprints.get(&target.host))
                    .ok_or_else(|| reject("no pinned fingerprint for host".to_string()))?;
                if pin.eq_ignore_ascii_case(&actual) {
                    Ok(())
                } else {
                    Err(reject(format!("fingerprint {actual} does not match pin")))
                }
            }
            HostKeyPolicy::AcceptAny => {
                warn!(
                    host = %target,
                    fingerprint = %host_key_fingerprint(key),
                    "accepting unverified host key"
                );
                Ok(())
            }
        }
    }

    fn authenticate(&self, session: &Session, target: &HostTarget) -> Result<(), ConnectError> {
        let login = &self.login;
        let failed = |message: String| ConnectError::Auth {
            target: target.label.clone(),
            user: login.username.clone(),
            message,
        };

        let attempt = match (&login.identity_file, &login.password) {
            (Some(key), _) => session.userauth_pubkey_file(&login.username, None, key, None),
            (None, Some(password)) => session.userauth_password(&login.username, password.expose()),
            (None, None) => return Err(failed("no password or identity file".to_string())),
        };
        attempt.map_err(|e| failed(e.message().to_string()))?;

        if session.authenticated() {
            Ok(())
        } else {
            Err(failed("server did not accept the credentials".to_string()))
        }
    }
}

impl Connector for SshConnector {
    type Session = SshSession;

    fn open(&self, target: &HostTarget) -> Result<SshSession, ConnectError> {
        let stream = self.tcp_connect(target)?;

        let handshake_failed = |e: ssh2::Error| ConnectError::Handshake {
            target: target.label.clone(),
            message: e.to_string(),
        };
        let mut session = Session::new().map_err(handshake_failed)?;
        session.set_tcp_stream(stream);
        session.set_timeout(timeout_millis(Some(self.connect_timeout)));
        session.handshake().map_err(|e| {
            if is_timeout(&e) {
                ConnectError::Timeout {
                    target: target.label.clone(),
                    timeout: self.connect_timeout,
                }
            } else {
                handshake_failed(e)
            }
        })?;

        self.verify_host_key(&session, target)?;
        self.authenticate(&session, target)?;
        session.set_timeout(0);

        debug!(host = %target, user = %self.login.username, "session established");
        Ok(SshSession {
            session,
            label: target.label.clone(),
            timeout: None,
            closed: false,
        })
    }
}

/// An authenticated SSH session. Disconnects on `close` or on drop.
pub struct SshSession {
    session: Session,
    label: String,
    timeout: Option<Duration>,
    closed: bool,
}

impl CommandSession for SshSession {
    fn run(&mut self, command: &RenderedCommand) -> Result<CommandResult, TransportError> {
        let mut channel = self.session.channel_session().map_err(channel_error)?;
        channel.exec(&command.command).map_err(channel_error)?;

        if let Some(input) = &command.stdin {
            channel.write_all(input.expose().as_bytes())?;
        }
        channel.send_eof().map_err(channel_error)?;

        // Both streams share the channel window, so they are drained together.
        let deadline = self.timeout.map(|t| Instant::now() + t);
        self.session.set_blocking(false);
        let drained = drain_streams(&mut channel.stream(0), &mut channel.stderr(), deadline);
        self.session.set_blocking(true);
        let (stdout, stderr) = drained?;

        channel.wait_close().map_err(channel_error)?;
        let exit_status = channel.exit_status().ok();

        Ok(CommandResult::new(
            &String::from_utf8_lossy(&stdout),
            &String::from_utf8_lossy(&stderr),
            exit_status,
        ))
    }

    fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
        self.session.set_timeout(timeout_millis(timeout));
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.session.disconnect(None, "audit finished", None) {
            debug!(host = %self.label, error = %e, "disconnect failed");
        }
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Read two non-blocking streams to EOF, interleaved, until `deadline`.
fn drain_streams<O: Read, E: Read>(
    stdout: &mut O,
    stderr: &mut E,
    deadline: Option<Instant>,
) -> Result<(Vec<u8>, Vec<u8>), TransportError> {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut out_done = false;
    let mut err_done = false;
    let mut buf = [0u8; 32 * 1024];

    while !(out_done && err_done) {
        let mut progressed = false;
        if !out_done {
            match read_chunk(stdout, &mut buf, &mut out)? {
                Some(0) => out_done = true,
                Some(_) => progressed = true,
                None => {}
            }
        }
        if !err_done {
            match read_chunk(stderr, &mut buf, &mut err)? {
                Some(0) => err_done = true,
                Some(_) => progressed = true,
                None => {}
            }
        }

        if !progressed && !(out_done && err_done) {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(TransportError::Timeout);
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    Ok((out, err))
}

/// `Some(n)` bytes appended (0 at EOF), `None` when the stream would block.
fn read_chunk<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    sink: &mut Vec<u8>,
) -> Result<Option<usize>, TransportError> {
    match reader.read(buf) {
        Ok(n) => {
            sink.extend_from_slice(&buf[..n]);
            Ok(Some(n))
        }
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// libssh2 takes milliseconds, where 0 means "block forever".
fn timeout_millis(timeout: Option<Duration>) -> u32 {
    match timeout {
        None => 0,
        Some(d) => u32::try_from(d.as_millis()).unwrap_or(u32::MAX).max(1),
    }
}

fn is_timeout(err: &ssh2::Error) -> bool {
    matches!(err.code(), ErrorCode::Session(SESSION_TIMEOUT_CODE))
}

fn channel_error(err: ssh2::Error) -> TransportError {
    if is_timeout(&err) {
        TransportError::Timeout
    } else {
        TransportError::Channel(err.to_string())
    }
}
