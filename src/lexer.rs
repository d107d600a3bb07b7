//! A lexer for grammar descriptions.

use std::iter::Peekable;

/// The tokens that may appear in a grammar description.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Ident(String),
    Colon,
    Pipe,
    Semicolon,
}

/// A lexer for BNF grammar descriptions.
///
/// Symbols are whitespace-delimited; `:`, `|`, and `;` terminate a symbol on
/// their own. A symbol wrapped in single quotes may contain any character,
/// which allows the punctuation above to serve as a terminal name.
pub struct Lexer<T: Iterator<Item = (usize, char)>> {
    input: Peekable<T>,
}

impl<T: Iterator<Item = (usize, char)>> Lexer<T> {
    /// Create a new lexer.
    pub fn new(input: T) -> Lexer<T> {
        Lexer {
            input: input.peekable(),
        }
    }
}

/// Return the next non-whitespace input character.
fn next_relevant<I: Iterator<Item = (usize, char)>>(input: &mut I) -> Option<(usize, char)> {
    while let Some((p, c)) = input.next() {
        if !c.is_whitespace() {
            return Some((p, c));
        }
    }
    None
}

/// Checks whether a character is a punctuation symbol of the description
/// format.
fn is_symbol(c: char) -> bool {
    match c {
        ':' | '|' | ';' => true,
        _ => false,
    }
}

impl<T: Iterator<Item = (usize, char)>> Iterator for Lexer<T> {
    type Item = (usize, usize, Token);

    fn next(&mut self) -> Option<(usize, usize, Token)> {
        // Fetch the first character and see what we can do with it.
        let (sp, sc) = match next_relevant(&mut self.input) {
            Some(x) => x,
            None => return None,
        };
        let mut sl = sp + sc.len_utf8();
        let tkn = match sc {
            ':' => Token::Colon,
            '|' => Token::Pipe,
            ';' => Token::Semicolon,
            '\'' => {
                let mut buffer = String::new();
                while let Some((ep, ec)) = self.input.next() {
                    sl = ep + ec.len_utf8();
                    if ec == '\'' {
                        break;
                    }
                    buffer.push(ec);
                }
                Token::Ident(buffer)
            }
            _ => {
                let mut buffer = String::new();
                buffer.push(sc);
                while let Some(&(ep, ec)) = self.input.peek() {
                    if ec.is_whitespace() || is_symbol(ec) {
                        break;
                    }
                    buffer.push(ec);
                    sl = ep + ec.len_utf8();
                    self.input.next();
                }
                Token::Ident(buffer)
            }
        };
        Some((sp, sl, tkn))
    }
}
