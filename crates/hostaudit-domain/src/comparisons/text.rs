use super::Comparison;

pub fn text_equals(stdout: &str, expected: &str) -> Comparison {
    Comparison::pass_if(stdout.trim() == expected.trim(), stdout)
}

pub fn contains(stdout: &str, expected: &str) -> Comparison {
    Comparison::pass_if(stdout.contains(expected), stdout)
}

pub fn not_contains(stdout: &str, expected: &str) -> Comparison {
    Comparison::pass_if(!stdout.contains(expected), stdout)
}

/// Every whitespace-separated token of `expected` must occur somewhere in `stdout`.
pub fn contains_all_tokens(stdout: &str, expected: &str) -> Comparison {
    let all_found = expected
        .split_whitespace()
        .all(|token| stdout.contains(token));
    Comparison::pass_if(all_found, stdout)
}

/// Every non-blank line of `expected` (trimmed) must occur somewhere in `stdout`.
pub fn contains_all_lines(stdout: &str, expected: &str) -> Comparison {
    let missing: Vec<&str> = expected
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !stdout.contains(line))
        .collect();

    if missing.is_empty() {
        Comparison::pass_if(true, "All lines found")
    } else {
        Comparison::pass_if(false, format!("Missing lines: {missing:?}"))
    }
}
