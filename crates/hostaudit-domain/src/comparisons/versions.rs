use super::Comparison;
use hostaudit_types::VerdictStatus;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Marker a version command prints when the software is absent.
pub const NOT_INSTALLED_MARKER: &str = "NOT_INSTALLED";

static MAJOR_MINOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\.([0-9]+)").expect("static regex compiles"));

/// Check the installed `major.minor` against a list of supported release lines.
///
/// The rendering is always `<stdout> | <message>`.
pub fn list_versions(stdout: &str, expected: &str) -> Comparison {
    let (status, message) = check_versions(stdout, expected);
    Comparison::new(status, format!("{} | {}", stdout.trim(), message))
}

fn check_versions(stdout: &str, expected: &str) -> (VerdictStatus, String) {
    if stdout.contains(NOT_INSTALLED_MARKER) {
        return (VerdictStatus::Fail, "Service is not installed".to_string());
    }

    let Some((major, minor)) = installed_version(stdout) else {
        return (
            VerdictStatus::Error,
            format!("Cannot parse version: {stdout}"),
        );
    };

    let floors = minimum_minors(expected);
    let Some(&required) = floors.get(&major) else {
        let supported = floors
            .iter()
            .map(|(major, minor)| format!("{major}.{minor}"))
            .collect::<Vec<_>>()
            .join(", ");
        return (
            VerdictStatus::Fail,
            format!("Version {major}.{minor} not supported. Supported: {supported}"),
        );
    };

    if minor >= required {
        (
            VerdictStatus::Pass,
            format!("Version {major}.{minor} >= required {major}.{required}"),
        )
    } else {
        (
            VerdictStatus::Fail,
            format!("Version {major}.{minor} < required {major}.{required}"),
        )
    }
}

fn installed_version(stdout: &str) -> Option<(u64, u64)> {
    let caps = MAJOR_MINOR.captures(stdout)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    Some((major, minor))
}

/// Map each listed major to its minimum minor.
///
/// Only tokens made of exactly two all-digit parts count. When a major is listed more than once
/// the smallest minor wins (the loosest floor); kept for compatibility with existing rule files.
fn minimum_minors(expected: &str) -> BTreeMap<u64, u64> {
    let mut floors = BTreeMap::new();
    for token in expected.split(',').map(str::trim) {
        let Some((major, minor)) = token.split_once('.') else {
            continue;
        };
        if !is_digits(major) || !is_digits(minor) {
            continue;
        }
        let (Ok(major), Ok(minor)) = (major.parse::<u64>(), minor.parse::<u64>()) else {
            continue;
        };
        floors
            .entry(major)
            .and_modify(|floor: &mut u64| *floor = (*floor).min(minor))
            .or_insert(minor);
    }
    floors
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
