/// Split a comma-separated host list. Empty entries are dropped.
pub fn parse_host_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}

/// One host per line; blank lines and `#` comments are skipped.
pub fn parse_hosts_file(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_list_is_trimmed() {
        assert_eq!(
            parse_host_list(" web-1, 10.0.0.5:2222 ,,[::1]"),
            ["web-1", "10.0.0.5:2222", "[::1]"]
        );
        assert!(parse_host_list(" , ").is_empty());
    }

    #[test]
    fn hosts_file_skips_comments_and_blanks() {
        let text = "# production\nweb-1\n\n   # staging\n  db-1  \r\n";
        assert_eq!(parse_hosts_file(text), ["web-1", "db-1"]);
    }
}
