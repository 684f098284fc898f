//! Splitting multi-declarator field tails into per-declarator token slices.
//!
//! After the first declarator's name has been read, the rest of a field
//! declaration (`= 1, b[] = {1, 2}, c`) is consumed here up to, but not
//! including, the terminating `;`. Slices are split at top-level commas;
//! commas inside `()`, `[]`, `{}`, or the type-argument list of an object
//! creation (`new HashMap<K, V>()`) do not split.

use crate::ast::Location;
use crate::parser::error::{ParseError, ParseErrorKind, ParseResult};
use crate::parser::lexer::{SavedToken, Token, TokenStream};

pub struct VariableInitializerParser<'a> {
    stream: &'a mut TokenStream,
    pub token: Token,
    pub location: Location,
}

impl<'a> VariableInitializerParser<'a> {
    pub fn new(stream: &'a mut TokenStream, token: Token, location: Location) -> Self {
        Self { stream, token, location }
    }

    fn advance(&mut self) {
        self.token = self.stream.advance();
        self.location = self.stream.location();
    }

    /// Read up to the terminating `;` (left unconsumed in `token`) and
    /// return one token slice per declarator.
    pub fn parse_initializers(&mut self) -> ParseResult<Vec<Vec<SavedToken>>> {
        let mut slices = Vec::new();
        let mut current = Vec::new();
        let mut parens = 0usize;
        let mut brackets = 0usize;
        let mut braces = 0usize;
        // Angle depth of the creation type after a `new`; a comma inside
        // `new HashMap<K, V>` must not split declarators.
        let mut angles = 0usize;
        let mut creation_type = false;

        loop {
            if creation_type
                && angles == 0
                && !matches!(self.token, Token::Identifier | Token::Dot | Token::Lt)
            {
                creation_type = false;
            }
            match self.token {
                Token::Semicolon if parens == 0 && brackets == 0 && braces == 0 => {
                    slices.push(current);
                    return Ok(slices);
                }
                Token::Comma
                    if parens == 0 && brackets == 0 && braces == 0 && angles == 0 =>
                {
                    slices.push(std::mem::take(&mut current));
                    self.advance();
                    continue;
                }
                Token::Eof => {
                    return Err(ParseError::new(
                        self.stream.source().clone(),
                        self.location,
                        ParseErrorKind::ExpectedToken {
                            expected: Token::Semicolon,
                            found: Token::Eof,
                        },
                    ));
                }
                Token::LParen => parens += 1,
                Token::LBracket => brackets += 1,
                Token::LBrace => braces += 1,
                // A stray closer ends the tail; the caller's `;` check
                // reports it.
                Token::RParen if parens == 0 => break,
                Token::RBracket if brackets == 0 => break,
                Token::RBrace if braces == 0 => break,
                Token::RParen => parens -= 1,
                Token::RBracket => brackets -= 1,
                Token::RBrace => braces -= 1,
                Token::New => creation_type = true,
                Token::Lt if creation_type => angles += 1,
                Token::Gt if angles > 0 => angles -= 1,
                Token::RShift if angles > 0 => angles = angles.saturating_sub(2),
                Token::URShift if angles > 0 => angles = angles.saturating_sub(3),
                _ => {}
            }
            current.push(self.stream.current().clone());
            self.advance();
        }
        slices.push(current);
        Ok(slices)
    }
}
