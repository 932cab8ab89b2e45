//! Proxy list parser
//!
//! One proxy per line, `host:port` or `host:port:user:pass`. Any malformed
//! line fails the whole file so a run never starts on partial data.

use crate::error::ParseError;
use crate::proxy::models::ProxyRecord;
use anyhow::Context;
use std::fs;
use std::path::Path;

/// Proxy parser for proxy list strings and files
pub struct ProxyParser;

impl ProxyParser {
    /// Parse a single proxy line.
    ///
    /// Returns `Ok(None)` for blank and `#` comment lines. `line_no` is only
    /// used for error reporting.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Option<ProxyRecord>, ParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() != 2 && parts.len() != 4 {
            return Err(ParseError::FieldCount {
                line: line_no,
                fields: parts.len(),
            });
        }

        let host = parts[0].to_string();
        if host.is_empty() {
            return Err(ParseError::MissingHost { line: line_no });
        }
        let port: u16 = parts[1].parse().map_err(|_| ParseError::InvalidPort {
            line: line_no,
            port: parts[1].to_string(),
        })?;

        let record = if parts.len() == 4 {
            ProxyRecord::with_auth(host, port, parts[2].to_string(), parts[3].to_string())
        } else {
            ProxyRecord::new(host, port)
        };
        Ok(Some(record))
    }

    /// Parse proxies from a string (multiple lines)
    ///
    /// Blank and `#` lines are skipped wherever they appear. The first
    /// malformed line aborts with its 1-based line number.
    pub fn parse_string(content: &str) -> Result<Vec<ProxyRecord>, ParseError> {
        let mut proxies = Vec::new();
        for (i, line) in content.lines().enumerate() {
            if let Some(proxy) = Self::parse_line(line, i + 1)? {
                proxies.push(proxy);
            }
        }
        Ok(proxies)
    }

    /// Parse proxies from a file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> crate::Result<Vec<ProxyRecord>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read proxy list {:?}", path))?;
        let proxies = Self::parse_string(&content)
            .with_context(|| format!("malformed proxy list {:?}", path))?;
        Ok(proxies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_format() {
        let proxy = ProxyParser::parse_line("1.2.3.4:8080", 1).unwrap().unwrap();
        assert_eq!(proxy.host, "1.2.3.4");
        assert_eq!(proxy.port, 8080);
        assert!(proxy.user().is_none());
        assert!(proxy.pass().is_none());
    }

    #[test]
    fn test_parse_with_auth() {
        let proxy = ProxyParser::parse_line("1.2.3.4:8080:u:p", 1).unwrap().unwrap();
        assert_eq!(proxy.host, "1.2.3.4");
        assert_eq!(proxy.port, 8080);
        assert_eq!(proxy.user(), Some("u"));
        assert_eq!(proxy.pass(), Some("p"));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let proxy = ProxyParser::parse_line("  1.2.3.4:8080\r", 1).unwrap().unwrap();
        assert_eq!(proxy.host, "1.2.3.4");
        assert_eq!(proxy.port, 8080);
    }

    #[test]
    fn test_parse_missing_port() {
        assert_eq!(
            ProxyParser::parse_line("1.2.3.4:", 3),
            Err(ParseError::InvalidPort {
                line: 3,
                port: String::new()
            })
        );
    }

    #[test]
    fn test_parse_wrong_field_count() {
        assert_eq!(
            ProxyParser::parse_line("1.2.3.4", 1),
            Err(ParseError::FieldCount { line: 1, fields: 1 })
        );
        assert_eq!(
            ProxyParser::parse_line("1.2.3.4:8080:user", 2),
            Err(ParseError::FieldCount { line: 2, fields: 3 })
        );
    }

    #[test]
    fn test_parse_invalid_port() {
        assert!(matches!(
            ProxyParser::parse_line("1.2.3.4:abc", 1),
            Err(ParseError::InvalidPort { .. })
        ));
        assert!(matches!(
            ProxyParser::parse_line("1.2.3.4:70000", 1),
            Err(ParseError::InvalidPort { .. })
        ));
    }

    #[test]
    fn test_parse_missing_host() {
        assert_eq!(
            ProxyParser::parse_line(":8080", 4),
            Err(ParseError::MissingHost { line: 4 })
        );
    }

    #[test]
    fn test_parse_empty_and_comment_lines() {
        assert_eq!(ProxyParser::parse_line("", 1), Ok(None));
        assert_eq!(ProxyParser::parse_line("   ", 1), Ok(None));
        assert_eq!(ProxyParser::parse_line("# comment", 1), Ok(None));
    }

    #[test]
    fn test_parse_string() {
        let content = "1.2.3.4:8080\n5.6.7.8:3128:user:pass\n# comment\n\n9.9.9.9:80\n\n";
        let proxies = ProxyParser::parse_string(content).unwrap();
        assert_eq!(proxies.len(), 3);
        assert_eq!(proxies[1].user(), Some("user"));
        assert_eq!(proxies[2].port, 80);
    }

    #[test]
    fn test_parse_string_fails_fast() {
        let content = "1.2.3.4:8080\nbroken\n5.6.7.8:3128";
        assert_eq!(
            ProxyParser::parse_string(content),
            Err(ParseError::FieldCount { line: 2, fields: 1 })
        );
    }

    #[test]
    fn test_skipped_lines_keep_line_numbers() {
        let content = "\n# header\n1.2.3.4:8080\n\n   \n5.6.7.8\n";
        assert_eq!(
            ProxyParser::parse_string(content),
            Err(ParseError::FieldCount { line: 6, fields: 1 })
        );
        let content = "\n\n1.2.3.4:8080\n\n# gap\n5.6.7.8:3128\n";
        assert_eq!(ProxyParser::parse_string(content).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_file() {
        let path = std::env::temp_dir().join(format!("proxy-board-{}.txt", std::process::id()));
        fs::write(&path, "1.2.3.4:8080\n1.2.3.5:8080:u:p\n").unwrap();
        let proxies = ProxyParser::parse_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(proxies.len(), 2);
    }

    #[test]
    fn test_parse_missing_file() {
        let err = ProxyParser::parse_file("/nonexistent/proxies.txt").unwrap_err();
        assert!(err.to_string().contains("failed to read proxy list"));
    }
}
