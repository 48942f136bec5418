use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::{self, BufRead, Stderr, StdinLock, Write};

use fieldbook_core::types::parse_decimal;
use fieldbook_core::{FieldbookError, FieldbookResult};

/// Line-oriented question/answer adapter. Questions go to `writer`, answers
/// are read one line at a time from `reader`.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl Prompter<StdinLock<'static>, Stderr> {
    /// Prompt on stderr, read from stdin.
    pub fn stdio() -> Self {
        Prompter::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Prompter { reader, writer }
    }

    fn ask(&mut self, field: &str, question: &str) -> FieldbookResult<String> {
        write!(self.writer, "{question}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(FieldbookError::InputParse {
                field: field.to_string(),
                reason: "input ended before a value was entered".into(),
            });
        }
        Ok(line.trim().to_string())
    }

    pub fn decimal(&mut self, field: &str, question: &str) -> FieldbookResult<Decimal> {
        let raw = self.ask(field, question)?;
        parse_decimal(&raw).map_err(|reason| FieldbookError::InputParse {
            field: field.to_string(),
            reason,
        })
    }

    /// Read an ISO `YYYY-MM-DD` date.
    pub fn date(&mut self, field: &str, question: &str) -> FieldbookResult<NaiveDate> {
        let raw = self.ask(field, question)?;
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| FieldbookError::InputParse {
            field: field.to_string(),
            reason: format!("'{raw}' is not a YYYY-MM-DD date ({e})"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    fn prompter(answers: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_reads_answers_in_order() {
        let mut p = prompter("10000\n14.54\n2025-02-01\n");
        assert_eq!(p.decimal("principal", "Principal: ").unwrap(), dec!(10000));
        assert_eq!(p.decimal("apr", "APR: ").unwrap(), dec!(14.54));
        assert_eq!(
            p.date("start_date", "Start: ").unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
        );
        assert_eq!(String::from_utf8(p.writer).unwrap(), "Principal: APR: Start: ");
    }

    #[test]
    fn test_non_numeric_answer_is_parse_error() {
        let mut p = prompter("lots\n");
        let err = p.decimal("payment", "Monthly payment: ").unwrap_err();
        assert!(matches!(err, FieldbookError::InputParse { ref field, .. } if field == "payment"));
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        let mut p = prompter("01/02/2025\n");
        assert!(matches!(
            p.date("start_date", "Start: "),
            Err(FieldbookError::InputParse { .. })
        ));
    }

    #[test]
    fn test_end_of_input_is_parse_error() {
        let mut p = prompter("");
        assert!(p.decimal("principal", "Principal: ").is_err());
    }
}
