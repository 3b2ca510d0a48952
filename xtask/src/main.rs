//! Developer tasks (schema generation, fixture conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use hostaudit_types::{AuditReport, ConnectionStatus, RunSummary, VerdictStatus, explain};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."));

    match manifest_dir.parent() {
        Some(parent) if manifest_dir.ends_with("xtask") => parent.to_path_buf(),
        _ => manifest_dir,
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("contracts").join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(hostaudit_types::AuditReportV1)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(hostaudit_settings::HostauditConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "hostaudit.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "hostaudit.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create contracts/schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that committed schemas match what the types generate.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to contracts/schemas/");
    eprintln!("  validate-schemas  Check if contracts/schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate report, rule, and config fixtures");
    eprintln!("  conform-full      Conformance plus validation of real hostaudit binary output");
    eprintln!("  explain-coverage  Validate every rule type has a working explanation");
}

fn report_validator() -> anyhow::Result<jsonschema::Validator> {
    let schema = serde_json::to_value(generate_report_schema())
        .context("Failed to convert report schema to JSON")?;
    jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile report schema: {e}"))
}

/// Files directly inside `dir` with the given extension, sorted by name.
fn files_with_extension(dir: &Path, ext: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == ext) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Counts must be derived from verdicts, and the summary from the hosts.
fn report_invariant_errors(name: &str, report: &AuditReport) -> Vec<String> {
    let mut errors = Vec::new();

    for host in &report.hosts {
        let count = |status: VerdictStatus| {
            host.verdicts.iter().filter(|v| v.status == status).count() as u32
        };
        let actual = (
            count(VerdictStatus::Pass),
            count(VerdictStatus::Fail),
            count(VerdictStatus::Error),
        );
        let recorded = (host.pass_count, host.fail_count, host.error_count);
        if actual != recorded {
            errors.push(format!(
                "{name}: host '{}' records counts {recorded:?} but verdicts give {actual:?}",
                host.host
            ));
        }

        if host.connection_status == ConnectionStatus::ConnectionFailed {
            if !host.verdicts.is_empty() {
                errors.push(format!(
                    "{name}: host '{}' failed to connect but has verdicts",
                    host.host
                ));
            }
            if host.error.is_none() {
                errors.push(format!(
                    "{name}: host '{}' failed to connect without an error message",
                    host.host
                ));
            }
        }
    }

    if RunSummary::from_reports(&report.hosts) != report.summary {
        errors.push(format!("{name}: summary does not match host reports"));
    }

    errors
}

/// Validate committed fixtures.
///
/// 1. Reports: schema, typed parse, and count invariants.
/// 2. Rule sets: top-level files load, files under `invalid/` are rejected.
/// 3. Config: `hostaudit.toml` parses and resolves.
fn conform() -> anyhow::Result<()> {
    let validator = report_validator()?;
    println!("✓ hostaudit.report.v1 schema compiles");

    let mut errors = Vec::new();

    let reports = files_with_extension(&fixtures_dir().join("reports"), "json")?;
    if reports.is_empty() {
        bail!("No report fixtures found in tests/fixtures/reports");
    }
    for path in &reports {
        let name = file_name(path);
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {name}"))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {name} as JSON"))?;

        for err in validator.iter_errors(&value) {
            errors.push(format!("{name}: schema validation: {err}"));
        }
        match hostaudit_app::parse_report_json(&content) {
            Ok(report) => errors.extend(report_invariant_errors(&name, &report)),
            Err(err) => errors.push(format!("{name}: {err:#}")),
        }
        println!("  ✓ {name} checked");
    }

    let rules_dir = fixtures_dir().join("rules");
    for path in files_with_extension(&rules_dir, "yaml")? {
        let name = file_name(&path);
        let content = fs::read_to_string(&path)?;
        match hostaudit_settings::parse_rules_yaml(&content) {
            Ok(rules) if rules.is_empty() => errors.push(format!("{name}: no rules")),
            Ok(rules) => println!("  ✓ {name} loads {} rules", rules.len()),
            Err(err) => errors.push(format!("{name}: {err:#}")),
        }
    }
    for path in files_with_extension(&rules_dir.join("invalid"), "yaml")? {
        let name = file_name(&path);
        let content = fs::read_to_string(&path)?;
        match hostaudit_settings::parse_rules_yaml(&content) {
            Ok(_) => errors.push(format!("invalid/{name}: loaded but should be rejected")),
            Err(_) => println!("  ✓ invalid/{name} is rejected"),
        }
    }

    let config_path = fixtures_dir().join("hostaudit.toml");
    let config_text = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    match hostaudit_settings::parse_config_toml(&config_text).and_then(|cfg| {
        hostaudit_settings::resolve_config(cfg, hostaudit_settings::Overrides::default())
    }) {
        Ok(resolved) => println!(
            "  ✓ hostaudit.toml resolves to profile '{}'",
            resolved.effective.profile
        ),
        Err(err) => errors.push(format!("hostaudit.toml: {err:#}")),
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All fixtures pass conformance checks!");
    Ok(())
}

/// Full conformance: fixtures plus a real run of the built binary.
///
/// The binary audits a loopback port with nothing listening, so the run needs no SSH
/// server and must produce a schema-valid report with one `connection_failed` host.
fn conform_full() -> anyhow::Result<()> {
    conform()?;

    println!("\n--- Full conformance: hostaudit binary output ---\n");

    let bin = project_root().join("target").join("debug").join("hostaudit");
    #[cfg(target_os = "windows")]
    let bin = bin.with_extension("exe");

    if !bin.exists() {
        bail!(
            "hostaudit binary not found at {}.\n\
            Run `cargo build -p hostaudit-cli` first.",
            bin.display()
        );
    }

    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")
            .context("Failed to bind a loopback port")?;
        listener.local_addr()?.port()
    };
    let host = format!("127.0.0.1:{port}");

    let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
    let report_out = temp_dir.path().join("report.json");
    let rules = fixtures_dir().join("rules").join("linux.yaml");

    let output = std::process::Command::new(&bin)
        .current_dir(temp_dir.path())
        .env("HOSTAUDIT_PASSWORD", "conformance")
        .args(["audit", "--user", "conformance", "--quiet", "--hosts", &host])
        .arg("--rules")
        .arg(&rules)
        .arg("--report-out")
        .arg(&report_out)
        .output()
        .context("Failed to run hostaudit")?;

    let mut errors = Vec::new();
    if output.status.code() != Some(2) {
        errors.push(format!(
            "expected exit code 2, got {:?}: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    let content = fs::read_to_string(&report_out).context("No report output generated")?;
    let value = hostaudit_test_util::normalize_nondeterministic(
        serde_json::from_str(&content).context("Failed to parse generated report")?,
    );
    for err in report_validator()?.iter_errors(&value) {
        errors.push(format!("generated report: schema validation: {err}"));
    }
    if value["hosts"][0]["connection_status"] != "connection_failed" {
        errors.push(format!(
            "generated report: expected connection_failed, got {}",
            value["hosts"][0]["connection_status"]
        ));
    }
    let report = hostaudit_app::parse_report_json(&content)?;
    errors.extend(report_invariant_errors("generated report", &report));

    if !errors.is_empty() {
        eprintln!("\nFull conformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!(
            "Full conformance validation failed with {} errors",
            errors.len()
        );
    }

    println!("  ✓ unreachable host produces a valid report");
    println!("\n✓ Full conformance checks passed!");
    Ok(())
}

/// Every rule type has an explanation whose example actually behaves as documented.
fn explain_coverage() -> anyhow::Result<()> {
    let kinds = explain::all_rule_kinds();
    let mut errors = Vec::new();

    for kind in kinds {
        match explain::lookup_explanation(kind) {
            Some(exp) => {
                if exp.title.is_empty() {
                    errors.push(format!("Rule type '{kind}' has empty title"));
                }
                if exp.description.is_empty() {
                    errors.push(format!("Rule type '{kind}' has empty description"));
                }
                if let Err(err) = hostaudit_app::verify_example(&exp) {
                    errors.push(format!("Rule type '{kind}': example: {err:#}"));
                }
            }
            None => errors.push(format!("Rule type '{kind}' has no explanation")),
        }
    }

    if errors.is_empty() {
        println!("✓ {} rule types have explanations", kinds.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "conform-full" => conform_full(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
