use std::fmt;
use thiserror::Error;

pub const DEFAULT_SSH_PORT: u16 = 22;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TargetError {
    #[error("empty host")]
    Empty,

    #[error("invalid port in `{0}`")]
    InvalidPort(String),

    #[error("unterminated `[` in `{0}`")]
    UnterminatedBracket(String),
}

/// A host to audit: the label as written plus the resolved connect address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HostTarget {
    /// Host exactly as given on the command line or in the hosts file.
    pub label: String,
    /// Hostname or IP literal, without brackets.
    pub host: String,
    pub port: u16,
}

impl HostTarget {
    /// Parse `host`, `host:port`, `[v6]`, `[v6]:port`, or a bare IPv6 literal.
    pub fn parse(input: &str, default_port: u16) -> Result<Self, TargetError> {
        let label = input.trim();
        if label.is_empty() {
            return Err(TargetError::Empty);
        }

        let (host, port) = if let Some(rest) = label.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| TargetError::UnterminatedBracket(label.to_string()))?;
            let port = match after {
                "" => default_port,
                _ => {
                    let digits = after
                        .strip_prefix(':')
                        .ok_or_else(|| TargetError::InvalidPort(label.to_string()))?;
                    parse_port(digits, label)?
                }
            };
            (host, port)
        } else {
            match label.split_once(':') {
                // More than one colon without brackets: a bare IPv6 literal.
                Some((_, rest)) if rest.contains(':') => (label, default_port),
                Some((host, port)) => (host, parse_port(port, label)?),
                None => (label, default_port),
            }
        };

        if host.is_empty() {
            return Err(TargetError::Empty);
        }

        Ok(Self {
            label: label.to_string(),
            host: host.to_string(),
            port,
        })
    }
}

fn parse_port(digits: &str, label: &str) -> Result<u16, TargetError> {
    match digits.parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(TargetError::InvalidPort(label.to_string())),
    }
}

impl fmt::Display for HostTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
