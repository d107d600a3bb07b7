//! A parser for grammar descriptions.
//!
//! The text form of a grammar is a sequence of records
//!
//! ```text
//! lhs : alt | alt | ... ;
//! ```
//!
//! where every alternative is a whitespace-delimited symbol sequence and an
//! empty alternative is the epsilon production. Line breaks carry no meaning.
//! Pipe-separated alternatives and separately repeated left-hand sides are
//! semantically identical; production indices count the alternatives in the
//! order written.

use std::mem::replace;

use grammar::{Grammar, MalformedGrammar};
use lexer::{Lexer, Token};

fn record_error(position: usize, reason: String) -> MalformedGrammar {
    MalformedGrammar::MalformedProduction { position, reason }
}

/// Parse a grammar description into its raw production list.
pub fn parse_productions(input: &str) -> Result<Vec<(String, Vec<String>)>, MalformedGrammar> {
    let mut lexer = Lexer::new(input.char_indices());
    let mut productions = Vec::new();
    while let Some((at, _, token)) = lexer.next() {
        let lhs = match token {
            Token::Ident(name) => name,
            other => {
                return Err(record_error(
                    at,
                    format!("expected a left-hand-side symbol, found {:?}", other),
                ))
            }
        };
        match lexer.next() {
            Some((_, _, Token::Colon)) => (),
            Some((at, _, other)) => {
                return Err(record_error(
                    at,
                    format!("expected `:` after `{}`, found {:?}", lhs, other),
                ))
            }
            None => {
                return Err(record_error(
                    at,
                    format!("record for `{}` ends after its left-hand side", lhs),
                ))
            }
        }
        let mut rhs: Vec<String> = Vec::new();
        loop {
            match lexer.next() {
                Some((_, _, Token::Ident(symbol))) => rhs.push(symbol),
                Some((_, _, Token::Pipe)) => {
                    productions.push((lhs.clone(), replace(&mut rhs, Vec::new())));
                }
                Some((_, _, Token::Semicolon)) => {
                    productions.push((lhs, rhs));
                    break;
                }
                Some((at, _, other)) => {
                    return Err(record_error(
                        at,
                        format!("unexpected {:?} in the rules of `{}`", other, lhs),
                    ))
                }
                None => {
                    return Err(record_error(
                        at,
                        format!("record for `{}` is missing its closing `;`", lhs),
                    ))
                }
            }
        }
    }
    Ok(productions)
}

/// Parse a complete grammar description and internalize it.
pub fn parse_grammar<S: Into<String>>(
    name: S,
    start: &str,
    input: &str,
) -> Result<Grammar, MalformedGrammar> {
    Grammar::compile(name, start, &parse_productions(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_record() {
        let productions = parse_productions("S : a S b | ;").unwrap();
        assert_eq!(
            productions,
            vec![
                ("S".to_string(), vec!["a".into(), "S".into(), "b".into()]),
                ("S".to_string(), vec![]),
            ]
        );
    }

    #[test]
    fn pipes_and_repeated_records_are_identical() {
        let piped = parse_productions("T : y | z ;").unwrap();
        let repeated = parse_productions("T : y ; T : z ;").unwrap();
        assert_eq!(piped, repeated);
    }

    #[test]
    fn newlines_are_insignificant() {
        let compact = parse_productions("S : a S b | ;").unwrap();
        let spread = parse_productions("S\n  : a S b\n  |\n  ;\n").unwrap();
        assert_eq!(compact, spread);
    }

    #[test]
    fn quoted_terminals() {
        let productions = parse_productions("E : E '+' T ; E : T ;").unwrap();
        assert_eq!(
            productions[0],
            ("E".to_string(), vec!["E".into(), "+".into(), "T".into()])
        );
    }

    #[test]
    fn parse_into_grammar() {
        let grammar = parse_grammar("anbn", "S", "S : a S b | ;").unwrap();
        assert_eq!(grammar.num_rules(), 2);
        assert_eq!(grammar.nonterminal("S"), Some(grammar.start()));
        assert!(grammar.terminal("a").is_some());
    }

    #[test]
    fn missing_colon_is_malformed() {
        match parse_productions("S a ;") {
            Err(MalformedGrammar::MalformedProduction { position, .. }) => {
                assert_eq!(position, 2)
            }
            other => panic!("expected MalformedProduction, got {:?}", other),
        }
    }

    #[test]
    fn missing_semicolon_is_malformed() {
        match parse_productions("S : a") {
            Err(MalformedGrammar::MalformedProduction { .. }) => (),
            other => panic!("expected MalformedProduction, got {:?}", other),
        }
    }

    #[test]
    fn unknown_start_is_reported_by_internalization() {
        match parse_grammar("g", "Z", "S : a ;") {
            Err(MalformedGrammar::UnknownStart(ref symbol)) => assert_eq!(symbol, "Z"),
            other => panic!("expected UnknownStart, got {:?}", other),
        }
    }
}
