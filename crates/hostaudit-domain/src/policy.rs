use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// How a host's identity is verified during the SSH handshake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostKeyPolicy {
    /// Host key must match an entry in an OpenSSH `known_hosts` file.
    Strict { known_hosts: PathBuf },
    /// SHA-256 fingerprint (lowercase hex) of the host key must equal the pin for that host.
    Pinned { fingerprints: BTreeMap<String, String> },
    /// Trust-on-first-use. Insecure; only ever selected explicitly.
    AcceptAny,
}

impl HostKeyPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            HostKeyPolicy::Strict { .. } => "strict",
            HostKeyPolicy::Pinned { .. } => "pinned",
            HostKeyPolicy::AcceptAny => "accept-any",
        }
    }
}

/// How the `{password}` placeholder reaches the remote command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialInjection {
    /// Secret is written to the channel's stdin and read into a shell variable.
    Stdin,
    /// Secret is substituted into the command text (visible in the remote process list).
    Inline,
}

impl CredentialInjection {
    pub fn name(self) -> &'static str {
        match self {
            CredentialInjection::Stdin => "stdin",
            CredentialInjection::Inline => "inline",
        }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub port: u16,
    /// Upper bound on hosts audited at the same time.
    pub concurrency: usize,
    pub connect_timeout: Duration,
    /// Budget for connect plus all rule executions of one host.
    pub host_timeout: Option<Duration>,
    pub host_keys: HostKeyPolicy,
    pub credential_injection: CredentialInjection,
}
