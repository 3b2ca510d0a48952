//! Remote command sessions.
//!
//! A [`Connector`] opens one authenticated [`CommandSession`] per host; the session runs one
//! command per exec channel and is closed exactly once. The SSH implementation lives in
//! [`ssh`]; everything above it only sees the two traits, so orchestration is testable with
//! in-memory fakes.

#![forbid(unsafe_code)]

mod credential;
mod error;
mod ssh;
mod target;

pub use credential::{
    Login, PASSWORD_PLACEHOLDER, RenderedCommand, SECRET_VARIABLE, Secret, TemplateError,
    render_command,
};
pub use error::{ConnectError, TransportError};
pub use ssh::{SshConnector, SshSession, host_key_fingerprint};
pub use target::{DEFAULT_SSH_PORT, HostTarget, TargetError};

use hostaudit_domain::model::CommandResult;
use std::time::Duration;

/// Opens sessions. Shared by every worker of a run.
pub trait Connector: Sync {
    type Session: CommandSession;

    fn open(&self, target: &HostTarget) -> Result<Self::Session, ConnectError>;
}

/// One authenticated command channel to a single host.
pub trait CommandSession {
    /// Execute one command on a fresh channel.
    ///
    /// Non-zero exit status and stderr output are data; only channel and protocol failures
    /// are errors.
    fn run(&mut self, command: &RenderedCommand) -> Result<CommandResult, TransportError>;

    /// Bound every blocking call that follows. `None` removes the bound.
    fn set_timeout(&mut self, timeout: Option<Duration>);

    /// Disconnect. Calling it again is a no-op.
    fn close(&mut self);
}
