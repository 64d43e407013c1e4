//! The tool's own inventory format: CSV with an optional declared root.
//!
//! ```text
//! # preserve inventory
//! # root: /data/books
//! path,bytes
//! /data/books/book-001_intro.txt,10
//! "/data/books/with,comma.txt",3
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{Asset, ManifestFormat, ParsedManifest};
use crate::errors::PreserveError;
use crate::fileset::FileSet;

const MARKER: &str = "# preserve inventory";
const ROOT_PREFIX: &str = "# root:";

pub struct Inventory;

impl ManifestFormat for Inventory {
    fn name(&self) -> &'static str {
        "inventory"
    }

    fn sniff(&self, path: &Path, content: &str) -> bool {
        let csv_ext = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        let first = content.lines().map(str::trim).find(|l| !l.is_empty());
        csv_ext
            || first.is_some_and(|l| l.eq_ignore_ascii_case(MARKER) || is_header(l))
    }

    fn parse(&self, path: &Path, content: &str) -> Result<ParsedManifest, PreserveError> {
        let err = |line: usize, reason: String| PreserveError::ManifestParse {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let mut root = None;
        let mut columns: Option<(usize, usize)> = None;
        let mut assets = Vec::new();

        for record in records(content) {
            let (lineno, line) = record.map_err(|(l, r)| err(l, r))?;
            let line = line.as_str();
            if line.trim().is_empty() {
                continue;
            }
            let trimmed = line.trim_start();
            if trimmed.starts_with('#') {
                if let Some(r) = trimmed.strip_prefix(ROOT_PREFIX) {
                    root = Some(PathBuf::from(r.trim()));
                }
                continue;
            }

            let fields = split_csv_line(line).map_err(|r| err(lineno, r))?;
            let Some((path_col, bytes_col)) = columns else {
                columns = Some(header_columns(&fields).ok_or_else(|| {
                    err(lineno, "expected a header with 'path' and 'bytes' columns".into())
                })?);
                continue;
            };

            let (Some(p), Some(b)) = (fields.get(path_col), fields.get(bytes_col)) else {
                return Err(err(lineno, format!("expected at least {} fields", path_col.max(bytes_col) + 1)));
            };
            let bytes = b
                .trim()
                .parse::<u64>()
                .map_err(|e| err(lineno, format!("invalid byte count '{b}': {e}")))?;
            assets.push(Asset {
                path: PathBuf::from(p),
                bytes,
            });
        }

        Ok(ParsedManifest { root, assets })
    }
}

/// Logical records with the line each starts on. A quoted field may span
/// physical lines, so a record ends only where its quotes balance.
fn records(content: &str) -> impl Iterator<Item = Result<(usize, String), (usize, String)>> + '_ {
    let mut lines = content.split('\n').enumerate();
    std::iter::from_fn(move || {
        let (i, first) = lines.next()?;
        let start = i + 1;
        let mut record = first.to_string();
        // Comments are never quoted.
        if !record.trim_start().starts_with('#') {
            while record.matches('"').count() % 2 == 1 {
                let Some((_, next)) = lines.next() else {
                    return Some(Err((start, "unterminated quoted field".to_string())));
                };
                record.push('\n');
                record.push_str(next);
            }
        }
        if record.ends_with('\r') {
            record.pop();
        }
        Some(Ok((start, record)))
    })
}

fn is_header(line: &str) -> bool {
    split_csv_line(line)
        .ok()
        .and_then(|f| header_columns(&f))
        .is_some()
}

fn header_columns(fields: &[String]) -> Option<(usize, usize)> {
    let find = |names: &[&str]| {
        fields
            .iter()
            .position(|f| names.iter().any(|n| f.trim().eq_ignore_ascii_case(n)))
    };
    Some((find(&["path"])?, find(&["bytes", "size"])?))
}

/// Split one CSV record. Quoted fields may contain commas and `""` escapes.
fn split_csv_line(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;
    let mut quoted = false;

    while let Some(c) = chars.next() {
        match (in_quotes, c) {
            (true, '"') if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            (true, '"') => in_quotes = false,
            (true, c) => field.push(c),
            (false, '"') if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            (false, ',') => {
                fields.push(std::mem::take(&mut field));
                quoted = false;
            }
            (false, '"') => return Err("unexpected quote inside unquoted field".into()),
            (false, c) if quoted => return Err(format!("unexpected '{c}' after closing quote")),
            (false, c) => field.push(c),
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".into());
    }
    fields.push(field);
    Ok(fields)
}

fn quote_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Write `files` in inventory format, declaring the file set root.
pub fn write_inventory<W: Write>(files: &FileSet, mut out: W) -> io::Result<()> {
    writeln!(out, "{MARKER}")?;
    writeln!(out, "{ROOT_PREFIX} {}", files.root().display())?;
    writeln!(out, "path,bytes")?;
    for entry in files {
        writeln!(out, "{},{}", quote_csv(&entry.path.to_string_lossy()), entry.bytes)?;
    }
    out.flush()
}
