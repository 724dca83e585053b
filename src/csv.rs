//! Comma separated text in and out.
//!
//! The reader turns an uploaded file into header-keyed rows and collects
//! structural problems instead of stopping at the first one, so the caller
//! can show them all and refuse the load. The writer is used for exports.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;

pub type CsvRow = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvIssueKind {
    UnterminatedQuote,
    TooFewFields { expected: usize, found: usize },
    TooManyFields { expected: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvIssue {
    /// 1-based line where the offending record starts.
    pub line: usize,
    pub kind: CsvIssueKind,
}

impl fmt::Display for CsvIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CsvIssueKind::UnterminatedQuote => {
                write!(f, "Línea {}: campo entre comillas sin cerrar", self.line)
            }
            CsvIssueKind::TooFewFields { expected, found } => write!(
                f,
                "Línea {}: faltan campos (se esperaban {expected}, hay {found})",
                self.line
            ),
            CsvIssueKind::TooManyFields { expected, found } => write!(
                f,
                "Línea {}: sobran campos (se esperaban {expected}, hay {found})",
                self.line
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
    pub errors: Vec<CsvIssue>,
}

impl ParsedCsv {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

struct RawRecord {
    line: usize,
    fields: Vec<String>,
}

fn split_records(text: &str, errors: &mut Vec<CsvIssue>) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1_usize;
    let mut record_line = 1_usize;
    let mut chars = text.chars().peekable();

    let mut finish_record =
        |fields: &mut Vec<String>, field: &mut String, quoted: bool, start: usize| {
            fields.push(std::mem::take(field));
            let blank = !quoted && fields.len() == 1 && fields[0].is_empty();
            let done = std::mem::take(fields);
            if !blank {
                records.push(RawRecord {
                    line: start,
                    fields: done,
                });
            }
        };

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            '"' if field.is_empty() => {
                in_quotes = true;
                quoted = true;
            }
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' | '\n' => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                finish_record(&mut fields, &mut field, quoted, record_line);
                quoted = false;
                line += 1;
                record_line = line;
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        errors.push(CsvIssue {
            line: record_line,
            kind: CsvIssueKind::UnterminatedQuote,
        });
    }
    if quoted || !field.is_empty() || !fields.is_empty() {
        finish_record(&mut fields, &mut field, quoted, record_line);
    }
    records
}

/// Renames repeated header names to `name_1`, `name_2`, ... so every column
/// keeps its own key.
fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut out = Vec::with_capacity(raw.len());
    for name in raw {
        let mut candidate = name.clone();
        let mut suffix = 1_usize;
        while taken.contains(&candidate) {
            candidate = format!("{name}_{suffix}");
            suffix += 1;
        }
        taken.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

/// Parses header-first CSV text into keyed rows. Blank lines are skipped.
/// Rows shorter than the header keep only the columns they have; every
/// length mismatch is also reported in `errors`.
pub fn parse_csv(text: &str) -> ParsedCsv {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut errors = Vec::new();
    let mut records = split_records(text, &mut errors).into_iter();

    let Some(header) = records.next() else {
        return ParsedCsv {
            errors,
            ..ParsedCsv::default()
        };
    };
    let headers = dedupe_headers(header.fields);

    let mut rows = Vec::new();
    for record in records {
        let found = record.fields.len();
        let expected = headers.len();
        if found < expected {
            errors.push(CsvIssue {
                line: record.line,
                kind: CsvIssueKind::TooFewFields { expected, found },
            });
        } else if found > expected {
            errors.push(CsvIssue {
                line: record.line,
                kind: CsvIssueKind::TooManyFields { expected, found },
            });
        }
        let row: CsvRow = headers
            .iter()
            .cloned()
            .zip(record.fields)
            .collect();
        rows.push(row);
    }

    ParsedCsv {
        headers,
        rows,
        errors,
    }
}

fn should_neutralize_csv(value: &str) -> bool {
    let trimmed = value.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('\'') {
        return false;
    }
    matches!(
        trimmed.chars().next(),
        Some('=') | Some('+') | Some('-') | Some('@')
    )
}

fn neutralize_csv_formula(value: &str) -> String {
    if should_neutralize_csv(value) {
        format!("'{value}")
    } else {
        value.to_string()
    }
}

pub fn csv_escape(value: &str) -> String {
    let safe = neutralize_csv_formula(value);
    if safe.contains(',') || safe.contains('"') || safe.contains('\n') || safe.contains('\r') {
        format!("\"{}\"", safe.replace('"', "\"\""))
    } else {
        safe
    }
}

/// Writes `columns` as the header line followed by one line per row. Rows
/// are already projected onto `columns`.
pub fn rows_to_csv(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(rows.len() + 1);
    if !columns.is_empty() {
        lines.push(
            columns
                .iter()
                .map(|col| csv_escape(col.as_str()))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    for row in rows {
        lines.push(
            row.iter()
                .map(|value| csv_escape(value.as_str()))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_rows() {
        let parsed = parse_csv("Nombre,Email\nAna,ana@x.es\nLuis,luis@x.es\n");
        assert!(parsed.is_clean());
        assert_eq!(parsed.headers, vec!["Nombre", "Email"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1]["Email"], "luis@x.es");
    }

    #[test]
    fn handles_quotes_crlf_bom_and_blank_lines() {
        let text = "\u{feff}Nombre,Comentario\r\n\r\n\"Pérez, Ana\",\"Dijo \"\"hola\"\"\ny colgó\"\r\n";
        let parsed = parse_csv(text);
        assert!(parsed.is_clean(), "{:?}", parsed.errors);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0]["Nombre"], "Pérez, Ana");
        assert_eq!(parsed.rows[0]["Comentario"], "Dijo \"hola\"\ny colgó");
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        let parsed = parse_csv("a,b\n1,2");
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0]["b"], "2");
    }

    #[test]
    fn short_and_long_rows_are_reported() {
        let parsed = parse_csv("a,b,c\n1,2\n1,2,3,4\n");
        assert_eq!(
            parsed.errors,
            vec![
                CsvIssue {
                    line: 2,
                    kind: CsvIssueKind::TooFewFields {
                        expected: 3,
                        found: 2
                    },
                },
                CsvIssue {
                    line: 3,
                    kind: CsvIssueKind::TooManyFields {
                        expected: 3,
                        found: 4
                    },
                },
            ]
        );
        assert_eq!(parsed.rows[0].len(), 2);
        assert!(!parsed.rows[0].contains_key("c"));
        assert_eq!(parsed.rows[1].len(), 3);
    }

    #[test]
    fn unterminated_quote_is_reported() {
        let parsed = parse_csv("a,b\n1,\"abierto\n");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].kind, CsvIssueKind::UnterminatedQuote);
        assert_eq!(parsed.errors[0].line, 2);
    }

    #[test]
    fn empty_input_has_no_rows() {
        let parsed = parse_csv("");
        assert!(parsed.headers.is_empty());
        assert!(parsed.rows.is_empty());
        assert!(parsed.is_clean());

        let header_only = parse_csv("a,b\n");
        assert_eq!(header_only.headers, vec!["a", "b"]);
        assert!(header_only.rows.is_empty());
    }

    #[test]
    fn duplicate_headers_get_suffixes() {
        let parsed = parse_csv("Tel,Tel,Tel_1\n1,2,3\n");
        assert_eq!(parsed.headers, vec!["Tel", "Tel_1", "Tel_1_1"]);
        assert_eq!(parsed.rows[0]["Tel_1"], "2");
    }

    #[test]
    fn export_escapes_and_neutralizes() {
        let columns = vec!["Nombre".to_string(), "Nota".to_string()];
        let rows = vec![
            vec!["Ana, S.L.".to_string(), "=SUM(A1)".to_string()],
            vec!["Luis".to_string(), "dijo \"sí\"".to_string()],
        ];
        assert_eq!(
            rows_to_csv(&columns, &rows),
            "Nombre,Nota\n\"Ana, S.L.\",'=SUM(A1)\nLuis,\"dijo \"\"sí\"\"\""
        );
    }
}
