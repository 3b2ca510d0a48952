//! CLI entry point for hostaudit.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `hostaudit-app` crate.

mod credentials;
mod logging;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use hostaudit_app::{
    AuditInput, CancelFlag, ExplainOutput, parse_report_json, render_console, render_html,
    render_markdown, run_audit, run_explain, serialize_report, to_renderable,
};
use hostaudit_session::Login;
use hostaudit_settings::{Overrides, parse_host_list, parse_hosts_file};
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Parser, Debug)]
#[command(
    name = "hostaudit",
    version,
    about = "Audit remote hosts against declarative compliance rules over SSH"
)]
struct Cli {
    /// Path to hostaudit config TOML. A missing file means defaults.
    #[arg(long, global = true, default_value = "hostaudit.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|lab).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Log level for diagnostics on stderr (error|warn|info|debug|trace). RUST_LOG wins.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the rule set against every host and write the report.
    Audit(AuditArgs),

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/hostaudit/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render a standalone HTML page from an existing JSON report.
    Html {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/hostaudit/report.json")]
        report: Utf8PathBuf,

        /// Where to write the HTML output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a rule type and how its output is compared.
    Explain {
        /// The rule type (e.g. "numeric_max", "list_versions").
        kind: String,
    },
}

#[derive(Args, Debug)]
struct AuditArgs {
    /// Comma-separated hosts (`host`, `host:port`, `[v6]:port`).
    #[arg(long, conflicts_with = "hosts_file", required_unless_present = "hosts_file")]
    hosts: Option<String>,

    /// File with one host per line; blank lines and `#` comments are ignored.
    #[arg(long)]
    hosts_file: Option<Utf8PathBuf>,

    /// SSH user name.
    #[arg(long, short)]
    user: String,

    /// Private key for public-key authentication.
    #[arg(long)]
    identity_file: Option<PathBuf>,

    /// Environment variable holding the password (authentication and `{password}` commands).
    /// When it is unset, there is no identity file, and stdin is a terminal, the password is
    /// prompted for.
    #[arg(long, default_value = "HOSTAUDIT_PASSWORD")]
    password_env: String,

    /// YAML rule set. Overrides `rules` in the config.
    #[arg(long)]
    rules: Option<String>,

    /// Default SSH port for hosts without one.
    #[arg(long)]
    port: Option<u16>,

    /// Hosts audited at the same time.
    #[arg(long)]
    concurrency: Option<u32>,

    /// Host key policy (strict|pinned|accept-any).
    #[arg(long)]
    host_key_policy: Option<String>,

    /// OpenSSH known_hosts file for the strict policy.
    #[arg(long)]
    known_hosts: Option<String>,

    /// How `{password}` reaches remote commands (stdin|inline).
    #[arg(long)]
    credential_injection: Option<String>,

    /// Where to write the JSON report.
    #[arg(long, default_value = "artifacts/hostaudit/report.json")]
    report_out: Utf8PathBuf,

    /// Write a Markdown report alongside the JSON.
    #[arg(long)]
    write_markdown: bool,

    /// Where to write the Markdown report (if enabled).
    #[arg(long, default_value = "artifacts/hostaudit/report.md")]
    markdown_out: Utf8PathBuf,

    /// Write an HTML report alongside the JSON.
    #[arg(long)]
    write_html: bool,

    /// Where to write the HTML report (if enabled).
    #[arg(long, default_value = "artifacts/hostaudit/report.html")]
    html_out: Utf8PathBuf,

    /// Do not print result tables to stdout.
    #[arg(long, short)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    match &cli.cmd {
        Commands::Audit(args) => cmd_audit(&cli, args),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Html { report, output } => cmd_html(report, output.as_deref()),
        Commands::Explain { kind } => cmd_explain(kind),
    }
}

fn cmd_audit(cli: &Cli, args: &AuditArgs) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        // Missing config file is allowed (defaults apply).
        let cfg_text = match std::fs::read_to_string(&cli.config) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %cli.config, "no config file; using profile defaults");
                String::new()
            }
            Err(err) => {
                return Err(err).with_context(|| format!("read config: {}", cli.config));
            }
        };

        let hosts = match (&args.hosts, &args.hosts_file) {
            (Some(list), _) => parse_host_list(list),
            (None, Some(path)) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("read hosts file: {path}"))?;
                parse_hosts_file(&text)
            }
            (None, None) => Vec::new(),
        };

        let password = credentials::resolve_password(
            &args.password_env,
            &args.user,
            args.identity_file.is_some(),
        )?;
        if password.is_none() && args.identity_file.is_none() {
            anyhow::bail!(
                "no credentials: set {} or pass --identity-file",
                args.password_env
            );
        }

        let input = AuditInput {
            config_text: &cfg_text,
            overrides: Overrides {
                profile: cli.profile.clone(),
                rules: args.rules.clone(),
                port: args.port,
                concurrency: args.concurrency,
                host_key_policy: args.host_key_policy.clone(),
                known_hosts: args.known_hosts.clone(),
                credential_injection: args.credential_injection.clone(),
            },
            hosts,
            login: Login {
                username: args.user.clone(),
                password,
                identity_file: args.identity_file.clone(),
            },
            home: std::env::var_os("HOME").map(PathBuf::from),
            cancel: interrupt_flag()?,
        };

        let output = run_audit(input)?;

        let data = serialize_report(&output.report)?;
        write_file(&args.report_out, &data).context("write report json")?;

        let renderable = to_renderable(&output.report);
        if args.write_markdown {
            let md = render_markdown(&renderable);
            write_file(&args.markdown_out, md.as_bytes()).context("write markdown")?;
        }
        if args.write_html {
            let html = render_html(&renderable);
            write_file(&args.html_out, html.as_bytes()).context("write html")?;
        }
        if !args.quiet {
            print!("{}", render_console(&renderable));
        }

        Ok(output.exit_code)
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("hostaudit error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// First Ctrl-C stops new hosts and rules from starting; a second one exits at once.
fn interrupt_flag() -> anyhow::Result<CancelFlag> {
    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    ctrlc::set_handler(move || {
        if handler_flag.is_cancelled() {
            eprintln!("hostaudit error: interrupted");
            std::process::exit(1);
        }
        warn!("interrupt received; finishing in-flight commands (Ctrl-C again to abort)");
        handler_flag.cancel();
    })
    .context("install Ctrl-C handler")?;
    Ok(cancel)
}

fn write_file(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write file: {path}"))?;
    Ok(())
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_file(out_path, md.as_bytes()).context("write markdown output")?;
    } else {
        print!("{md}");
    }

    Ok(())
}

fn cmd_html(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&report_text)?;
    let html = render_html(&to_renderable(&report));

    if let Some(out_path) = output {
        write_file(out_path, html.as_bytes()).context("write html output")?;
    } else {
        print!("{html}");
    }

    Ok(())
}

fn cmd_explain(kind: &str) -> anyhow::Result<()> {
    match run_explain(kind) {
        ExplainOutput::Found(exp) => {
            print!("{}", hostaudit_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound { kind, available } => {
            eprint!("{}", hostaudit_app::format_not_found(&kind, available));
            std::process::exit(1);
        }
    }
}
