//! INI-style config file parser
//!
//! Same shape as a systemd unit file: `[Section]` headers followed by
//! `Key=Value` lines. Keys are case-insensitive, values are kept verbatim.

use std::collections::HashMap;
use std::path::Path;

/// Values for each key in a section, tagged with the order they appeared
pub type ParsedSection = HashMap<String, Vec<(u32, String)>>;

/// A parsed config file is a map of section names to their contents
pub type ParsedFile = HashMap<String, ParsedSection>;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Section '{0}' appears more than once")]
    DuplicateSection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {0} is not a section header or Key=Value pair: {1}")]
    Malformed(usize, String),
}

/// Parse config file content
pub fn parse_file(content: &str) -> Result<ParsedFile, ParseError> {
    let mut sections: ParsedFile = HashMap::new();
    let mut current: Option<String> = None;
    let mut entry_number = 0u32;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            if sections.contains_key(line) {
                return Err(ParseError::DuplicateSection(line.to_string()));
            }
            sections.insert(line.to_string(), HashMap::new());
            current = Some(line.to_string());
            continue;
        }

        // Lines before the first section are ignored
        let Some(section_name) = current.as_ref() else {
            continue;
        };

        let Some((name, value)) = line.split_once('=') else {
            return Err(ParseError::Malformed(idx + 1, line.to_string()));
        };

        let name = name.trim().to_uppercase();
        if name.is_empty() {
            return Err(ParseError::Malformed(idx + 1, line.to_string()));
        }

        if let Some(section) = sections.get_mut(section_name) {
            section
                .entry(name)
                .or_default()
                .push((entry_number, value.trim().to_string()));
            entry_number += 1;
        }
    }

    Ok(sections)
}

/// Read and parse a config file from disk
pub fn parse_config_file(path: &Path) -> Result<ParsedFile, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_file(&content)
}

/// Last value given for `key` in `section`, if any
pub fn last_value<'a>(section: &'a ParsedSection, key: &str) -> Option<&'a str> {
    section
        .get(key)
        .and_then(|vals| vals.iter().max_by_key(|(order, _)| *order))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_config() {
        let content = r#"
[Reload]
Directory=/home/me/project
Tool=direnv
"#;
        let parsed = parse_file(content).unwrap();
        let reload = &parsed["[Reload]"];

        assert_eq!(last_value(reload, "DIRECTORY"), Some("/home/me/project"));
        assert_eq!(last_value(reload, "TOOL"), Some("direnv"));
    }

    #[test]
    fn test_empty_file() {
        let parsed = parse_file("").unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_comments_only() {
        let content = "# This is a comment\n; Another comment\n";
        let parsed = parse_file(content).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_comments_inside_section() {
        let content = r#"
[Reload]
# which tool
Tool=direnv
; suffix
CacheSuffix=.rc
"#;
        let parsed = parse_file(content).unwrap();
        assert_eq!(parsed["[Reload]"].len(), 2);
    }

    #[test]
    fn test_last_value_wins() {
        let content = r#"
[Reload]
Tool=first
tool=second
TOOL=third
"#;
        let parsed = parse_file(content).unwrap();
        let reload = &parsed["[Reload]"];
        assert_eq!(reload["TOOL"].len(), 3);
        assert_eq!(last_value(reload, "TOOL"), Some("third"));
    }

    #[test]
    fn test_value_with_commas_and_equals() {
        let content = r#"
[Reload]
Directory=/srv/a,b
NoopCommand=env FOO=bar true
"#;
        let parsed = parse_file(content).unwrap();
        let reload = &parsed["[Reload]"];
        assert_eq!(last_value(reload, "DIRECTORY"), Some("/srv/a,b"));
        assert_eq!(last_value(reload, "NOOPCOMMAND"), Some("env FOO=bar true"));
    }

    #[test]
    fn test_whitespace_handling() {
        let content = "[Reload]\n   Tool   =   direnv   \n";
        let parsed = parse_file(content).unwrap();
        assert_eq!(last_value(&parsed["[Reload]"], "TOOL"), Some("direnv"));
    }

    #[test]
    fn test_empty_value_is_kept() {
        let content = "[Reload]\nCacheSuffix=\n";
        let parsed = parse_file(content).unwrap();
        assert_eq!(last_value(&parsed["[Reload]"], "CACHESUFFIX"), Some(""));
    }

    #[test]
    fn test_duplicate_section_error() {
        let content = r#"
[Reload]
Tool=a

[Reload]
Tool=b
"#;
        let result = parse_file(content);
        assert!(matches!(result.unwrap_err(), ParseError::DuplicateSection(_)));
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let content = "[Reload]\nTool=direnv\nnot a pair\n";
        match parse_file(content) {
            Err(ParseError::Malformed(line, text)) => {
                assert_eq!(line, 3);
                assert_eq!(text, "not a pair");
            }
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_lines_before_first_section() {
        let content = "stray line\n[Reload]\nTool=direnv\n";
        let parsed = parse_file(content).unwrap();
        assert!(parsed.contains_key("[Reload]"));
    }
}
