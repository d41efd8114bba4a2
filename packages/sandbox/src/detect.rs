use once_cell::sync::Lazy;
use regex::Regex;

/// Patterns dev servers print when they start listening. Checked in
/// order; the first match wins.
static URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"Local:\s+http://localhost:(\d+)",        // Vite: "Local:   http://localhost:5173/"
        r"Local server:\s+http://localhost:(\d+)", // Some frameworks
        r"Running at http://localhost:(\d+)",      // Express/other servers
        r"Server ready at http://localhost:(\d+)", // Next.js dev
        r"server running on port (\d+)",           // Express: "server running on port 3000"
        r"ready - started server on.*:(\d+)",      // Next.js: "ready - started server on 0.0.0.0:3000"
        r"http://localhost:(\d+)",                 // Generic http://localhost pattern
        r"listening on port (\d+)",                // Plain node http servers
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern compiles"))
    .collect()
});

/// Scan one output line for a dev-server announcement and return the
/// detected port with a normalized preview URL.
pub fn detect_server_url(line: &str) -> Option<(u16, String)> {
    for pattern in URL_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(line) {
            if let Some(port_match) = captures.get(1) {
                if let Ok(port) = port_match.as_str().parse::<u16>() {
                    return Some((port, format!("http://localhost:{}", port)));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_vite_announcement() {
        let line = "  ➜  Local:   http://localhost:5173/";
        assert_eq!(
            detect_server_url(line),
            Some((5173, "http://localhost:5173".to_string()))
        );
    }

    #[test]
    fn detects_next_announcement() {
        let line = "ready - started server on 0.0.0.0:3000, url: http://localhost:3000";
        assert_eq!(detect_server_url(line).map(|(p, _)| p), Some(3000));
    }

    #[test]
    fn detects_express_port_log() {
        let line = "Express server running on port 8476";
        assert_eq!(detect_server_url(line).map(|(p, _)| p), Some(8476));
    }

    #[test]
    fn ignores_unrelated_lines() {
        assert_eq!(detect_server_url("added 142 packages in 3s"), None);
        assert_eq!(detect_server_url("compiled successfully"), None);
    }

    #[test]
    fn ignores_out_of_range_ports() {
        assert_eq!(detect_server_url("listening on port 99999"), None);
    }
}
