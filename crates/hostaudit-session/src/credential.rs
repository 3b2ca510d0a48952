use hostaudit_domain::policy::CredentialInjection;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Placeholder substituted with the session password in rule commands.
pub const PASSWORD_PLACEHOLDER: &str = "{password}";

/// Remote shell variable holding the secret in stdin mode.
pub const SECRET_VARIABLE: &str = "HOSTAUDIT_SECRET";

/// A credential. Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Who to authenticate as, and how.
///
/// An identity file takes precedence for authentication; the password is still used for
/// `{password}` templating.
#[derive(Clone, Debug)]
pub struct Login {
    pub username: String,
    pub password: Option<Secret>,
    pub identity_file: Option<PathBuf>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("command uses {{password}} but no password is configured")]
    MissingPassword,
}

/// A command ready to execute, with the optional stdin payload that carries the secret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedCommand {
    pub command: String,
    pub stdin: Option<Secret>,
}

impl RenderedCommand {
    /// A command without credential material.
    pub fn plain(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            stdin: None,
        }
    }
}

/// Substitute the `{password}` placeholder according to `mode`.
///
/// In stdin mode the placeholder becomes a quoted shell variable that the command reads from
/// its stdin first, so the secret never appears in the remote command line.
pub fn render_command(
    template: &str,
    password: Option<&Secret>,
    mode: CredentialInjection,
) -> Result<RenderedCommand, TemplateError> {
    if !template.contains(PASSWORD_PLACEHOLDER) {
        return Ok(RenderedCommand::plain(template));
    }
    let password = password.ok_or(TemplateError::MissingPassword)?;

    Ok(match mode {
        CredentialInjection::Stdin => {
            let body = template.replace(PASSWORD_PLACEHOLDER, &format!("\"${SECRET_VARIABLE}\""));
            RenderedCommand {
                command: format!("IFS= read -r {SECRET_VARIABLE}; {body}"),
                stdin: Some(Secret::new(format!("{}\n", password.expose()))),
            }
        }
        CredentialInjection::Inline => {
            RenderedCommand::plain(template.replace(PASSWORD_PLACEHOLDER, password.expose()))
        }
    })
}
