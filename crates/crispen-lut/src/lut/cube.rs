//! `.cube` serialization.
//!
//! ```text
//! # comment lines
//! TITLE "<title>"
//! LUT_3D_SIZE <N>
//!
//! R G B        ← N³ rows, 6 decimals, red fastest, blue slowest
//! ```
//!
//! Output is byte-stable for a fixed table so generated files can be
//! compared against earlier artifacts.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{LutError, Result};
use crate::lut::grid::{LutTable, entry_count};

/// Everything that ends up in a `.cube` file.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeArtifact {
    pub title: String,
    pub comments: Vec<String>,
    pub table: LutTable,
}

impl CubeArtifact {
    /// Write the artifact in `.cube` format.
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        write!(out, "{self}")?;
        out.flush()
    }

    /// Render the artifact to a string.
    pub fn to_cube_string(&self) -> String {
        self.to_string()
    }

    /// Write the artifact to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;
        tracing::info!(path = %path.display(), size = self.table.size(), "wrote .cube LUT");
        Ok(())
    }

    /// Read a previously written `.cube` file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse `.cube` text.
    ///
    /// Accepts `DOMAIN_MIN`/`DOMAIN_MAX` only when they describe the unit
    /// cube. A missing `TITLE` parses as an empty title.
    pub fn parse(text: &str) -> Result<Self> {
        let mut title = String::new();
        let mut comments = Vec::new();
        let mut size = None;
        let mut entries = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let err = |message: String| LutError::Parse {
                line: line_no,
                message,
            };
            let line = raw.trim();

            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                comments.push(comment.strip_prefix(' ').unwrap_or(comment).to_string());
                continue;
            }

            let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let rest = rest.trim();
            match keyword {
                "TITLE" => {
                    title = rest
                        .strip_prefix('"')
                        .and_then(|t| t.strip_suffix('"'))
                        .ok_or_else(|| err(format!("unquoted title `{rest}`")))?
                        .to_string();
                }
                "LUT_3D_SIZE" => {
                    let n: u32 = rest
                        .parse()
                        .map_err(|_| err(format!("invalid size `{rest}`")))?;
                    entries.reserve(entry_count(n)?);
                    size = Some(n);
                }
                "DOMAIN_MIN" | "DOMAIN_MAX" => {
                    let expected = if keyword == "DOMAIN_MIN" { 0.0 } else { 1.0 };
                    let values = parse_triplet(rest).map_err(&err)?;
                    if values.iter().any(|v| *v != expected) {
                        return Err(err(format!("unsupported {keyword} {rest}")));
                    }
                }
                "LUT_1D_SIZE" => return Err(err("1D LUTs are not supported".to_string())),
                _ => {
                    if size.is_none() {
                        return Err(err("data row before LUT_3D_SIZE".to_string()));
                    }
                    entries.push(parse_triplet(line).map_err(&err)?);
                }
            }
        }

        let size = size.ok_or_else(|| LutError::Parse {
            line: 0,
            message: "missing LUT_3D_SIZE".to_string(),
        })?;
        Ok(Self {
            title,
            comments,
            table: LutTable::from_entries(size, entries)?,
        })
    }
}

/// `.cube` text. Multi-line comments are split so each line gets its own
/// `#` marker.
impl fmt::Display for CubeArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for comment in &self.comments {
            for line in comment.lines() {
                writeln!(f, "# {line}")?;
            }
        }
        writeln!(f, "TITLE \"{}\"", self.title)?;
        writeln!(f, "LUT_3D_SIZE {}", self.table.size())?;
        writeln!(f)?;
        for [r, g, b] in self.table.entries() {
            writeln!(f, "{r:.6} {g:.6} {b:.6}")?;
        }
        Ok(())
    }
}

/// Parse exactly three whitespace-separated numbers.
fn parse_triplet(fields: &str) -> std::result::Result<[f64; 3], String> {
    let values = fields
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("`{fields}`: {e}"))?;
    <[f64; 3]>::try_from(values)
        .map_err(|v| format!("expected three numbers, found {} in `{fields}`", v.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> CubeArtifact {
        let entries = (0..8)
            .map(|i| {
                let bit = |n: u32| ((i >> n) & 1) as f64;
                [bit(0), bit(1) * 0.5, bit(2) * 0.123_456_789]
            })
            .collect();
        CubeArtifact {
            title: "Test LUT".into(),
            comments: vec!["first".into(), "second".into()],
            table: LutTable::from_entries(2, entries).unwrap(),
        }
    }

    #[test]
    fn test_layout_matches_cube_format() {
        let text = artifact().to_cube_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# first");
        assert_eq!(lines[1], "# second");
        assert_eq!(lines[2], "TITLE \"Test LUT\"");
        assert_eq!(lines[3], "LUT_3D_SIZE 2");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "0.000000 0.000000 0.000000");
        assert_eq!(lines[6], "1.000000 0.000000 0.000000");
        assert_eq!(lines[12], "1.000000 0.500000 0.123457");
        assert_eq!(lines.len(), 5 + 8);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_no_comments_starts_with_title() {
        let mut a = artifact();
        a.comments.clear();
        assert!(a.to_cube_string().starts_with("TITLE \"Test LUT\"\nLUT_3D_SIZE 2\n\n"));
    }

    #[test]
    fn test_multiline_comment_gets_marker_per_line() {
        let mut a = artifact();
        a.comments = vec!["one\ntwo".into()];
        assert!(a.to_cube_string().starts_with("# one\n# two\nTITLE"));
    }

    #[test]
    fn test_parse_reads_back_written_text() {
        let original = artifact();
        let parsed = CubeArtifact::parse(&original.to_cube_string()).unwrap();
        assert_eq!(parsed.title, original.title);
        assert_eq!(parsed.comments, original.comments);
        assert_eq!(parsed.table.size(), 2);
        for (a, b) in parsed.table.entries().iter().zip(original.table.entries()) {
            for c in 0..3 {
                assert!((a[c] - b[c]).abs() < 5e-7);
            }
        }
    }

    #[test]
    fn test_parse_accepts_unit_domain() {
        let text = "TITLE \"x\"\nLUT_3D_SIZE 2\nDOMAIN_MIN 0.0 0.0 0.0\nDOMAIN_MAX 1.0 1.0 1.0\n"
            .to_string()
            + &"0 0 0\n".repeat(8);
        assert!(CubeArtifact::parse(&text).is_ok());
    }

    #[test]
    fn test_write_to_matches_string_rendering() {
        let a = artifact();
        let mut buf = Vec::new();
        a.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), a.to_cube_string());
    }

    #[test]
    fn test_parse_rejects_oversized_grid() {
        for text in ["LUT_3D_SIZE 4000000\n", "LUT_3D_SIZE 257\n0 0 0\n", "LUT_3D_SIZE 1\n"] {
            assert!(
                matches!(CubeArtifact::parse(text), Err(LutError::InvalidGridSize(_))),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_short_table() {
        let text = "LUT_3D_SIZE 2\n0 0 0\n";
        assert!(matches!(
            CubeArtifact::parse(text),
            Err(LutError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_garbage_row() {
        let text = "LUT_3D_SIZE 2\n0 0 zero\n";
        assert!(matches!(
            CubeArtifact::parse(text),
            Err(LutError::Parse { line: 2, .. })
        ));
    }
}
