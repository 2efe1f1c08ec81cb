//! Tokenizer following the syntax of bevy's `ParsedPath`.
//!
//! We need access to individual components, which bevy keeps private.
use std::{iter, mem};

use thiserror::Error;

use crate::Access;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("A path must contain at least one field access")]
    Empty,

    #[error("Expected a field name or index after `{after}` at offset {offset}")]
    MissingIdent { after: char, offset: usize },

    #[error("Unexpected `{found}` at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("`[{0}]` is not a valid array index")]
    BadIndex(Box<str>),

    #[error("Missing closing `]` for the array index at offset {0}")]
    Unclosed(usize),

    #[error("Field index accessors (`#0`) are not supported")]
    FieldIndex,
}

enum Token<'a> {
    Dot,
    OpenBracket,
    CloseBracket,
    Ident(&'a str),
}

impl Token<'_> {
    const DOT: char = '.';
    const CROSSHATCH: char = '#';
    const OPEN_BRACKET: char = '[';
    const CLOSE_BRACKET: char = ']';
}

pub(crate) fn parse_path(path: &str) -> Result<Box<[Access]>, ParseError> {
    if path.contains(Token::CROSSHATCH) {
        return Err(ParseError::FieldIndex);
    }
    let mut parser = PathParser { path, offset: 0, first: true };

    let accesses = iter::from_fn(|| parser.next_access()).collect::<Result<Box<[_]>, _>>()?;
    if accesses.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(accesses)
}

fn ident_access(ident: &str) -> Access {
    ident
        .parse::<usize>()
        .map_or(Access::Field(ident), Access::TupleIndex)
}

struct PathParser<'a> {
    path: &'a str,
    offset: usize,
    first: bool,
}

impl<'a> PathParser<'a> {
    fn advance(&mut self, by: usize) {
        self.path = &self.path[by..];
        self.offset += by;
    }
    fn next_token(&mut self) -> Option<Token<'a>> {
        match self.path.chars().next()? {
            Token::DOT => {
                self.advance(1);
                return Some(Token::Dot);
            }
            Token::OPEN_BRACKET => {
                self.advance(1);
                return Some(Token::OpenBracket);
            }
            Token::CLOSE_BRACKET => {
                self.advance(1);
                return Some(Token::CloseBracket);
            }
            _ => {}
        }
        // we can assume we are parsing an ident now
        let is_terminal = |c: char| matches!(c, Token::DOT | Token::OPEN_BRACKET | Token::CLOSE_BRACKET);
        let end = self.path.find(is_terminal).unwrap_or(self.path.len());
        let ident = &self.path[..end];
        self.advance(end);
        Some(Token::Ident(ident))
    }
    /// Read the identifier following the `after` token, which was just consumed.
    fn expect_ident(&mut self, after: char) -> Result<&'a str, ParseError> {
        let offset = self.offset - after.len_utf8();
        match self.next_token() {
            Some(Token::Ident(ident)) => Ok(ident),
            _ => Err(ParseError::MissingIdent { after, offset }),
        }
    }
    fn next_access(&mut self) -> Option<Result<Access<'a>, ParseError>> {
        let first = mem::replace(&mut self.first, false);
        let offset = self.offset;
        let token = self.next_token()?;
        Some(self.token_to_access(token, first, offset))
    }
    fn token_to_access(
        &mut self,
        token: Token<'a>,
        first: bool,
        offset: usize,
    ) -> Result<Access<'a>, ParseError> {
        match token {
            Token::Dot => self.expect_ident(Token::DOT).map(ident_access),
            Token::OpenBracket => {
                let index = self.expect_ident(Token::OPEN_BRACKET)?;
                let Some(Token::CloseBracket) = self.next_token() else {
                    return Err(ParseError::Unclosed(offset));
                };
                let index = index.parse::<usize>().map_err(|_| ParseError::BadIndex(index.into()))?;
                Ok(Access::ArrayIndex(index))
            }
            // Only the very first field may omit its leading dot.
            Token::Ident(ident) if first => Ok(ident_access(ident)),
            Token::Ident(ident) => {
                let found = ident.chars().next().unwrap_or(Token::DOT);
                Err(ParseError::Unexpected { found, offset })
            }
            Token::CloseBracket => Err(ParseError::Unexpected { found: Token::CLOSE_BRACKET, offset }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use Access::{ArrayIndex as Array, Field, TupleIndex as Tuple};

    fn parse(path: &str) -> Result<Vec<Access>, ParseError> {
        parse_path(path).map(Vec::from)
    }

    #[test]
    fn fields() {
        assert_eq!(Ok(vec![Field("inner"), Field("count")]), parse(".inner.count"));
        assert_eq!(Ok(vec![Field("inner"), Field("count")]), parse("inner.count"));
        assert_eq!(Ok(vec![Field("label")]), parse(".label"));
    }
    #[test]
    fn indices() {
        let expected = vec![Field("y"), Array(0), Field("baz"), Tuple(1)];
        assert_eq!(Ok(expected), parse(".y[0].baz.1"));

        assert_eq!(Ok(vec![Array(3), Array(14)]), parse("[3][14]"));
        assert_eq!(Ok(vec![Tuple(0), Tuple(1)]), parse(".0.1"));
    }
    #[test]
    fn errors() {
        assert_eq!(Err(ParseError::Empty), parse(""));
        assert_eq!(Err(ParseError::FieldIndex), parse(".inner#0"));
        assert_eq!(Err(ParseError::MissingIdent { after: '.', offset: 6 }), parse(".inner."));
        assert_eq!(Err(ParseError::MissingIdent { after: '.', offset: 0 }), parse("..inner"));
        assert_eq!(Err(ParseError::Unclosed(5)), parse(".list[3"));
        assert_eq!(Err(ParseError::MissingIdent { after: '[', offset: 5 }), parse(".list[]"));
        assert_eq!(Err(ParseError::BadIndex("x".into())), parse(".list[x]"));
        assert_eq!(Err(ParseError::Unexpected { found: ']', offset: 5 }), parse(".list]"));
    }
}
