use crate::model::FileRecord;
use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use std::path::Path;

// ── Filter rules ──

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeOp {
    GreaterThan,
    LessThan,
}

#[derive(Debug, Clone)]
pub enum FilterRule {
    Glob { include: bool, pattern: Pattern },
    Size { include: bool, op: SizeOp, threshold: u64 },
}

impl FilterRule {
    fn is_include(&self) -> bool {
        match self {
            FilterRule::Glob { include, .. } => *include,
            FilterRule::Size { include, .. } => *include,
        }
    }
}

/// Parse a comma-separated filter expression into a list of rules.
/// `+pat` includes, `-pat` excludes, a bare pattern includes. `>N` and
/// `<N` match on file size in bytes. Invalid globs are silently skipped.
pub fn parse_filter_expr(expr: &str) -> Vec<FilterRule> {
    let mut rules = Vec::new();
    for segment in expr.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (include, body) = if let Some(rest) = segment.strip_prefix('-') {
            (false, rest.trim())
        } else if let Some(rest) = segment.strip_prefix('+') {
            (true, rest.trim())
        } else {
            (true, segment)
        };

        if body.is_empty() {
            continue;
        }

        if let Some(rule) = try_parse_size(include, body) {
            rules.push(rule);
            continue;
        }

        if let Ok(pattern) = Pattern::new(body) {
            rules.push(FilterRule::Glob { include, pattern });
        }
    }
    rules
}

fn try_parse_size(include: bool, body: &str) -> Option<FilterRule> {
    let (op, num_str) = if let Some(rest) = body.strip_prefix('>') {
        (SizeOp::GreaterThan, rest)
    } else if let Some(rest) = body.strip_prefix('<') {
        (SizeOp::LessThan, rest)
    } else {
        return None;
    };
    let threshold = num_str.trim().parse::<u64>().ok()?;
    Some(FilterRule::Size { include, op, threshold })
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Apply filter rules to a candidate file. Include rules are OR'd;
/// no include rules means everything starts included. Any matching
/// exclude rule removes the file.
pub fn apply_filter(rules: &[FilterRule], path: &str, size: u64) -> bool {
    if rules.is_empty() {
        return true;
    }

    let has_includes = rules.iter().any(|r| r.is_include());
    let included = if has_includes {
        rules.iter().any(|r| r.is_include() && matches_rule(r, path, size))
    } else {
        true
    };
    if !included {
        return false;
    }

    !rules.iter().any(|r| !r.is_include() && matches_rule(r, path, size))
}

fn matches_rule(rule: &FilterRule, path: &str, size: u64) -> bool {
    match rule {
        FilterRule::Glob { pattern, .. } => pattern.matches_with(path, MATCH_OPTIONS),
        FilterRule::Size { op, threshold, .. } => match op {
            SizeOp::GreaterThan => size > *threshold,
            SizeOp::LessThan => size < *threshold,
        },
    }
}

// ── Collection ──

/// Gather `FileRecord`s from CLI path arguments. Directories are walked
/// recursively (hidden entries skipped), the filter is applied to the
/// path as given, and files with identical name and content are kept
/// only once. Non-UTF-8 and oversized files are skipped with a warning.
pub fn collect(
    paths: &[String],
    rules: &[FilterRule],
    max_file_bytes: u64,
) -> Result<Vec<FileRecord>> {
    let mut records = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for arg in paths {
        let path = Path::new(arg);
        if path.is_dir() {
            collect_dir(path, rules, max_file_bytes, &mut records, &mut seen)?;
        } else {
            // Explicit file arguments bypass the filter
            add_file(path, max_file_bytes, &mut records, &mut seen)?;
        }
    }

    Ok(records)
}

fn collect_dir(
    dir: &Path,
    rules: &[FilterRule],
    max_file_bytes: u64,
    records: &mut Vec<FileRecord>,
    seen: &mut HashSet<(String, String)>,
) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("could not read directory {}", dir.display()))?
        .filter_map(|e| e.ok())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        if path.is_dir() {
            collect_dir(&path, rules, max_file_bytes, records, seen)?;
        } else {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if apply_filter(rules, &path.to_string_lossy(), size) {
                add_file(&path, max_file_bytes, records, seen)?;
            }
        }
    }
    Ok(())
}

fn add_file(
    path: &Path,
    max_file_bytes: u64,
    records: &mut Vec<FileRecord>,
    seen: &mut HashSet<(String, String)>,
) -> Result<()> {
    let size = std::fs::metadata(path)
        .with_context(|| format!("could not stat {}", path.display()))?
        .len();
    if size > max_file_bytes {
        log::warn!("Skipping {} ({} bytes, over limit)", path.display(), size);
        return Ok(());
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Skipping {}: {}", path.display(), e);
            return Ok(());
        }
    };

    // The analysis service keys findings on the bare file name
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    let record = FileRecord {
        file_name,
        file_content: content,
    };
    if seen.insert((record.file_name.clone(), record.content_hash())) {
        records.push(record);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn bare_pattern_includes() {
        let rules = parse_filter_expr("*.rs");
        assert!(apply_filter(&rules, "src/main.rs", 10));
        assert!(!apply_filter(&rules, "src/app.ts", 10));
    }

    #[test]
    fn multiple_includes_are_or() {
        let rules = parse_filter_expr("+*.rs, +*.toml");
        assert!(apply_filter(&rules, "src/main.rs", 10));
        assert!(apply_filter(&rules, "Cargo.toml", 10));
        assert!(!apply_filter(&rules, "src/app.ts", 10));
    }

    #[test]
    fn exclude_only_starts_with_all() {
        let rules = parse_filter_expr("-*.lock, -*.json");
        assert!(apply_filter(&rules, "src/main.rs", 10));
        assert!(!apply_filter(&rules, "Cargo.lock", 10));
        assert!(!apply_filter(&rules, "package.json", 10));
    }

    #[test]
    fn glob_matches_at_any_depth() {
        // With require_literal_separator: false, *.rs matches nested paths
        let rules = parse_filter_expr("*.rs");
        assert!(apply_filter(&rules, "src/deeply/nested/file.rs", 10));
    }

    #[test]
    fn size_rules_are_strict() {
        let rules = parse_filter_expr("+>10");
        assert!(apply_filter(&rules, "big.rs", 11));
        assert!(!apply_filter(&rules, "exact.rs", 10));

        let rules = parse_filter_expr("-<3");
        assert!(!apply_filter(&rules, "tiny.rs", 1));
        assert!(apply_filter(&rules, "normal.rs", 8));
    }

    #[test]
    fn empty_expression_includes_everything() {
        let rules = parse_filter_expr("  , ,");
        assert!(rules.is_empty());
        assert!(apply_filter(&rules, "anything", 0));
    }

    #[test]
    fn collect_walks_dirs_and_applies_filter() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.py"), "print('a')").unwrap();
        fs::write(dir.path().join("sub/b.py"), "print('b')").unwrap();
        fs::write(dir.path().join("notes.txt"), "notes").unwrap();
        fs::write(dir.path().join(".hidden.py"), "print('h')").unwrap();

        let rules = parse_filter_expr("*.py");
        let records = collect(
            &[dir.path().to_string_lossy().to_string()],
            &rules,
            1024 * 1024,
        )
        .unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.py", "b.py"]);
    }

    #[test]
    fn collect_dedupes_identical_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.py");
        fs::write(&path, "print('a')").unwrap();
        let arg = path.to_string_lossy().to_string();

        let records = collect(&[arg.clone(), arg], &[], 1024 * 1024).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn collect_skips_non_utf8_and_oversized() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.py"), "print('ok')").unwrap();
        fs::write(dir.path().join("bin.py"), [0xff, 0xfe, 0x00, 0x01]).unwrap();
        fs::write(dir.path().join("big.py"), "x".repeat(100)).unwrap();

        let records = collect(
            &[dir.path().to_string_lossy().to_string()],
            &[],
            50,
        )
        .unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["ok.py"]);
    }

    #[test]
    fn explicit_file_argument_bypasses_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "notes").unwrap();

        let rules = parse_filter_expr("*.py");
        let records = collect(
            &[path.to_string_lossy().to_string()],
            &rules,
            1024,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
    }
}
