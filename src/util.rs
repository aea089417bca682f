//! Small utilities: preview quoting and CSV env parsing.

/// Quote a single argument for human-readable command previews.
///
/// Plain arguments pass through unchanged; anything containing whitespace or
/// quotes is wrapped in single quotes, with embedded single quotes escaped.
/// Previews are diagnostics only; execution paths pass real argument vectors
/// and never feed these strings to a shell.
pub fn shell_escape(s: &str) -> String {
    if s.is_empty() {
        "''".to_string()
    } else if s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_=./:@".contains(c))
    {
        s.to_string()
    } else {
        let escaped = s.replace('\'', "'\"'\"'");
        format!("'{}'", escaped)
    }
}

pub fn shell_join(args: &[String]) -> String {
    args.iter()
        .map(|a| shell_escape(a))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a CSV environment override or return the defaults.
pub fn parse_csv_env(name: &str, default: &[&str]) -> Vec<String> {
    match std::env::var(name) {
        Ok(v) => {
            let s = v.trim();
            if s.is_empty() {
                default.iter().map(|x| x.to_string()).collect()
            } else {
                s.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            }
        }
        Err(_) => default.iter().map(|x| x.to_string()).collect(),
    }
}
