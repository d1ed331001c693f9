//! Minimal reader for comma-separated text
//!
//! Handles quoted fields (with `""` escapes and embedded newlines), CRLF line
//! endings and a leading byte-order mark. Blank lines are skipped.

/// One parsed record with the line it started on (1-based)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Split `text` into records
pub fn read_records(text: &str) -> Vec<Record> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, record_line, std::mem::take(&mut fields));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_record(&mut records, record_line, fields);
    }

    records
}

fn push_record(records: &mut Vec<Record>, line: usize, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        records.push(Record { line, fields });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_rows() {
        let records = read_records("a,b,c\n1,2,3\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].fields, vec!["1", "2", "3"]);
        assert_eq!(records[1].line, 2);
    }

    #[test]
    fn test_quoted_field_with_comma_and_escape() {
        let records = read_records("title\n\"Hello, \"\"World\"\"\"\n");
        assert_eq!(records[1].fields, vec!["Hello, \"World\""]);
    }

    #[test]
    fn test_embedded_newline_keeps_line_numbers() {
        let records = read_records("t,n\n\"two\nlines\",1\nx,2\n");
        assert_eq!(records[1].fields[0], "two\nlines");
        assert_eq!(records[1].line, 2);
        assert_eq!(records[2].line, 4);
    }

    #[test]
    fn test_crlf_bom_and_blank_lines() {
        let records = read_records("\u{feff}a,b\r\n\r\n1,2\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields, vec!["a", "b"]);
        assert_eq!(records[1].fields, vec!["1", "2"]);
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_missing_trailing_newline() {
        let records = read_records("a\n1");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].fields, vec!["1"]);
    }

    #[test]
    fn test_trailing_empty_field_is_kept() {
        let records = read_records("a,b\n1,\n");
        assert_eq!(records[1].fields, vec!["1", ""]);
    }
}
