//! Where the SSH password comes from: the environment, else an interactive prompt.

use anyhow::Context;
use hostaudit_session::Secret;
use std::io::IsTerminal;

#[derive(Debug, PartialEq, Eq)]
enum PasswordSource {
    Env(String),
    Prompt,
    None,
}

/// An empty variable counts as unset. Key-based logins are never prompted.
fn password_source(
    env_value: Option<String>,
    has_identity: bool,
    interactive: bool,
) -> PasswordSource {
    match env_value.filter(|v| !v.is_empty()) {
        Some(value) => PasswordSource::Env(value),
        None if !has_identity && interactive => PasswordSource::Prompt,
        None => PasswordSource::None,
    }
}

pub fn resolve_password(
    env_var: &str,
    user: &str,
    has_identity: bool,
) -> anyhow::Result<Option<Secret>> {
    let source = password_source(
        std::env::var(env_var).ok(),
        has_identity,
        std::io::stdin().is_terminal(),
    );
    match source {
        PasswordSource::Env(value) => Ok(Some(Secret::new(value))),
        PasswordSource::Prompt => {
            let value = rpassword::prompt_password(format!("Password for {user}: "))
                .context("read password from terminal")?;
            Ok((!value.is_empty()).then(|| Secret::new(value)))
        }
        PasswordSource::None => Ok(None),
    }
}
