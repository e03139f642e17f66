//! Query text parser.
//!
//! Recursive descent over the grammar
//!
//! ```text
//! query := NAME '(' arg (',' arg)* ')'
//! arg   := INTEGER | TAG
//! ```
//!
//! Function names are upper case. Syntax errors carry a character offset
//! (`TickError::QueryParse`); well-formed queries with a bad tag or a
//! non-positive count are `TickError::InvalidArgument`.

use crate::domain::error::{ParseError, TickError};
use crate::domain::query::Query;

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(ParseError {
                message: format!("expected '{}', found '{}'", expected, ch),
                position: self.pos,
            }),
            None => Err(ParseError {
                message: format!("expected '{}', found end of input", expected),
                position: self.pos,
            }),
        }
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if accept(ch) {
                self.advance();
            } else {
                break;
            }
        }
        &self.input[start..self.pos]
    }

    fn parse_name(&mut self) -> Result<&'a str, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let name = self.take_while(|c| c.is_alphanumeric() || c == '_');
        if name.is_empty() {
            return Err(ParseError {
                message: format!("expected query, found '{}'", self.describe_next()),
                position: start,
            });
        }
        Ok(name)
    }

    fn describe_next(&self) -> String {
        self.peek()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "end of input".to_string())
    }

    /// A signed integer literal. Sign handling is left to the caller so a
    /// negative count can be reported as an argument error.
    fn parse_integer(&mut self) -> Result<i64, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            self.pos = start;
            return Err(ParseError {
                message: format!("expected integer, found '{}'", self.describe_next()),
                position: start,
            });
        }
        let num_str = &self.input[start..self.pos];
        num_str.parse::<i64>().map_err(|_| ParseError {
            message: format!("invalid integer: {}", num_str),
            position: start,
        })
    }

    fn parse_count(&mut self) -> Result<usize, TickError> {
        let value = self.parse_integer()?;
        if value <= 0 {
            return Err(TickError::invalid(format!(
                "count must be at least 1, got {value}"
            )));
        }
        usize::try_from(value).map_err(|_| TickError::invalid(format!("count too large: {value}")))
    }

    fn parse_target_digit(&mut self) -> Result<u8, TickError> {
        let value = self.parse_integer()?;
        match u8::try_from(value) {
            Ok(digit) if digit <= 9 => Ok(digit),
            _ => Err(TickError::invalid(format!(
                "target digit must be 0-9, got {value}"
            ))),
        }
    }

    /// A word tag (`all_even`) or an operator symbol (`>=`), parsed with `FromStr`.
    fn parse_tag<T>(&mut self) -> Result<T, TickError>
    where
        T: std::str::FromStr<Err = TickError>,
    {
        self.skip_whitespace();
        let start = self.pos;
        let mut tag = self.take_while(|c| c.is_alphanumeric() || c == '_');
        if tag.is_empty() {
            tag = self.take_while(|c| matches!(c, '<' | '>' | '='));
        }
        if tag.is_empty() {
            return Err(ParseError {
                message: format!("expected tag, found '{}'", self.describe_next()),
                position: start,
            }
            .into());
        }
        tag.parse()
    }

    fn parse_query(&mut self) -> Result<Query, TickError> {
        self.skip_whitespace();
        let start = self.pos;
        let name = self.parse_name()?;
        self.expect_char('(')?;

        let query = match name {
            "DIGITS" => Query::Digits {
                count: self.parse_count()?,
            },
            "PATTERN" => {
                let count = self.parse_count()?;
                self.expect_char(',')?;
                Query::Pattern {
                    count,
                    pattern: self.parse_tag()?,
                }
            }
            "COMPARE" => {
                let count = self.parse_count()?;
                self.expect_char(',')?;
                let operator = self.parse_tag()?;
                self.expect_char(',')?;
                Query::Compare {
                    count,
                    operator,
                    target: self.parse_target_digit()?,
                }
            }
            "RANK" => {
                let count = self.parse_count()?;
                self.expect_char(',')?;
                Query::Rank {
                    count,
                    rank: self.parse_tag()?,
                }
            }
            "PARITY" => {
                let parity = self.parse_tag()?;
                self.expect_char(',')?;
                Query::Parity {
                    parity,
                    count: self.parse_count()?,
                }
            }
            "TREND" => Query::Trend {
                count: self.parse_count()?,
            },
            "DISTRIBUTION" => Query::Distribution {
                count: self.parse_count()?,
            },
            _ => {
                return Err(ParseError {
                    message: format!("unknown query '{}'", name),
                    position: start,
                }
                .into());
            }
        };

        self.expect_char(')')?;
        Ok(query)
    }

    fn parse(&mut self) -> Result<Query, TickError> {
        let query = self.parse_query()?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(ParseError {
                message: format!("unexpected input after query: '{}'", self.remaining()),
                position: self.pos,
            }
            .into());
        }
        Ok(query)
    }
}

pub fn parse(input: &str) -> Result<Query, TickError> {
    let mut parser = Parser::new(input);
    parser.parse()
}
