//! Delimited record codec — serializes fixed-schema records to and from a
//! line-oriented, comma-delimited text format.
//!
//! The first line is a header naming the fields in order; each subsequent
//! line is one fully-populated record. Fields containing a comma, a double
//! quote, or a newline are quoted, with embedded quotes doubled. The codec
//! performs no ordering of its own — callers sort before encoding if they
//! care.
//!
//! ## Example
//!
//! ```ignore
//! use tablon::codec::{self, Record};
//!
//! let events: Vec<Event> = codec::decode(&raw)?;
//! let raw = codec::encode(&events);
//! ```

use std::fmt;

/// A fixed-schema record that can round-trip through the delimited format.
///
/// `HEADER` names the fields in on-disk order; `to_row` and `from_row` must
/// produce and consume exactly `HEADER.len()` fields in that order.
pub trait Record: Clone + Send + Sync + 'static {
    /// Field names, in on-disk column order.
    const HEADER: &'static [&'static str];

    /// Serialize this record to one field per header column.
    fn to_row(&self) -> Vec<String>;

    /// Build a record from a row. The codec guarantees
    /// `row.len() == HEADER.len()`; implementations report per-field parse
    /// failures (e.g. a non-integer identity) as an error message.
    fn from_row(row: &[String]) -> Result<Self, String>;
}

/// Error type for decode failures — the persisted store does not match the
/// expected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The header line does not name the expected fields.
    HeaderMismatch { expected: String, found: String },
    /// A data row has the wrong number of fields.
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A field failed to parse (e.g. a non-integer identity).
    Field { line: usize, message: String },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::HeaderMismatch { expected, found } => {
                write!(f, "header mismatch: expected `{}`, found `{}`", expected, found)
            }
            CodecError::FieldCount {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {}: expected {} fields, found {}",
                line, expected, found
            ),
            CodecError::Field { line, message } => write!(f, "line {}: {}", line, message),
        }
    }
}

impl std::error::Error for CodecError {}

/// Decode a full store body into records.
///
/// Empty (or whitespace-only) input decodes to an empty sequence — a store
/// that was never written is indistinguishable from an empty one. Blank
/// lines between records are skipped. Line numbers in errors are 1-based.
pub fn decode<R: Record>(raw: &str) -> Result<Vec<R>, CodecError> {
    let mut records = Vec::new();
    let mut saw_header = false;

    for (idx, line) in raw.lines().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            continue;
        }

        let row = parse_line(line);

        if !saw_header {
            if row != R::HEADER {
                return Err(CodecError::HeaderMismatch {
                    expected: R::HEADER.join(","),
                    found: row.join(","),
                });
            }
            saw_header = true;
            continue;
        }

        if row.len() != R::HEADER.len() {
            return Err(CodecError::FieldCount {
                line: idx + 1,
                expected: R::HEADER.len(),
                found: row.len(),
            });
        }

        let record = R::from_row(&row).map_err(|message| CodecError::Field {
            line: idx + 1,
            message,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Encode records as the fixed header followed by one line per record, in
/// the order given.
pub fn encode<R: Record>(records: &[R]) -> String {
    let mut out = String::new();
    out.push_str(&R::HEADER.join(","));
    out.push('\n');
    for record in records {
        let row = record.to_row();
        let encoded: Vec<String> = row.iter().map(|f| encode_field(f)).collect();
        out.push_str(&encoded.join(","));
        out.push('\n');
    }
    out
}

fn encode_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split one line into fields, honoring double-quoted fields with doubled
/// quote escapes.
fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Pair {
        id: i64,
        name: String,
    }

    impl Record for Pair {
        const HEADER: &'static [&'static str] = &["ID", "Name"];

        fn to_row(&self) -> Vec<String> {
            vec![self.id.to_string(), self.name.clone()]
        }

        fn from_row(row: &[String]) -> Result<Self, String> {
            let id = row[0]
                .parse()
                .map_err(|_| format!("invalid ID `{}`", row[0]))?;
            Ok(Pair {
                id,
                name: row[1].clone(),
            })
        }
    }

    #[test]
    fn empty_input_decodes_to_empty() {
        let records: Vec<Pair> = decode("").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn header_only_decodes_to_empty() {
        let records: Vec<Pair> = decode("ID,Name\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn decode_then_encode_round_trips() {
        let raw = "ID,Name\n1,alpha\n2,beta\n";
        let records: Vec<Pair> = decode(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(encode(&records), raw);
    }

    #[test]
    fn encode_then_decode_round_trips() {
        let records = vec![
            Pair {
                id: 1,
                name: "comma, inside".into(),
            },
            Pair {
                id: 2,
                name: "a \"quoted\" word".into(),
            },
        ];
        let decoded: Vec<Pair> = decode(&encode(&records)).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn quoted_fields_parse() {
        let raw = "ID,Name\n1,\"hello, world\"\n";
        let records: Vec<Pair> = decode(raw).unwrap();
        assert_eq!(records[0].name, "hello, world");
    }

    #[test]
    fn crlf_line_endings_parse() {
        let raw = "ID,Name\r\n1,alpha\r\n";
        let records: Vec<Pair> = decode(raw).unwrap();
        assert_eq!(records[0].name, "alpha");
    }

    #[test]
    fn header_mismatch_is_an_error() {
        let err = decode::<Pair>("ID,Nombre\n1,alpha\n").unwrap_err();
        assert!(matches!(err, CodecError::HeaderMismatch { .. }));
    }

    #[test]
    fn wrong_field_count_is_an_error() {
        let err = decode::<Pair>("ID,Name\n1,alpha,extra\n").unwrap_err();
        assert_eq!(
            err,
            CodecError::FieldCount {
                line: 2,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn unparseable_id_is_an_error() {
        let err = decode::<Pair>("ID,Name\nxyz,alpha\n").unwrap_err();
        assert!(matches!(err, CodecError::Field { line: 2, .. }));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let records: Vec<Pair> = decode("ID,Name\n\n1,alpha\n\n").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn encode_preserves_caller_order() {
        let records = vec![
            Pair {
                id: 9,
                name: "z".into(),
            },
            Pair {
                id: 1,
                name: "a".into(),
            },
        ];
        assert_eq!(encode(&records), "ID,Name\n9,z\n1,a\n");
    }
}
