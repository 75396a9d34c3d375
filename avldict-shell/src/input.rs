use std::collections::VecDeque;
use std::io::BufRead;

use anyhow::{Context, Result};
use avldict_trees::{BoundedString, Value, ValueKind, MAX_STR_LEN};
use tracing::warn;

/// Whitespace separated tokens read lazily from a line oriented source.
pub struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    pub fn new(reader: R) -> Self {
        Tokens { reader, pending: VecDeque::new() }
    }

    /// The next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            let read = self.reader.read_line(&mut line).context("failed to read input")?;
            if read == 0 {
                return Ok(None);
            }
            self.pending.extend(line.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }
}

/// Parses a literal of the given kind. Strings longer than
/// [`MAX_STR_LEN`] characters are cut down rather than rejected.
pub fn parse_value(kind: ValueKind, literal: &str) -> Result<Value> {
    match kind {
        ValueKind::Integer => {
            let i = literal.parse::<i32>().with_context(|| format!("invalid integer: {}", literal))?;
            Ok(Value::Int(i))
        }
        ValueKind::Float => {
            let f = literal.parse::<f64>().with_context(|| format!("invalid float: {}", literal))?;
            Ok(Value::Float(f))
        }
        ValueKind::Str => match BoundedString::new(literal) {
            Ok(s) => Ok(Value::Str(s)),
            Err(err) => {
                warn!(%err, max = MAX_STR_LEN, "truncating string");
                Ok(Value::Str(BoundedString::truncated(literal)))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use avldict_trees::{Value, ValueKind};

    use crate::input::{parse_value, Tokens};

    #[test]
    fn test_tokens_span_lines() -> anyhow::Result<()> {
        let mut tokens = Tokens::new("2  i\n\n   42\tf 1.5\n".as_bytes());
        let mut seen = Vec::new();
        while let Some(token) = tokens.next_token()? {
            seen.push(token);
        }
        assert_eq!(seen, ["2", "i", "42", "f", "1.5"]);
        assert_eq!(tokens.next_token()?, None);
        Ok(())
    }

    #[test]
    fn test_parse_value() -> anyhow::Result<()> {
        assert_eq!(parse_value(ValueKind::Integer, "-17")?, Value::Int(-17));
        assert_eq!(parse_value(ValueKind::Float, "2.5")?, Value::Float(2.5));
        assert_eq!(parse_value(ValueKind::Str, "hello")?.to_string(), "hello");
        assert!(parse_value(ValueKind::Integer, "abc").is_err());
        assert!(parse_value(ValueKind::Integer, "99999999999").is_err());
        assert!(parse_value(ValueKind::Float, "x1").is_err());
        Ok(())
    }

    #[test]
    fn test_long_string_is_truncated() -> anyhow::Result<()> {
        let value = parse_value(ValueKind::Str, "abcdefghijklmnopqrstuvwxyz")?;
        assert_eq!(value.to_string(), "abcdefghijklmnopqrst");
        Ok(())
    }
}
