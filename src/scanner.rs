//! Scanner compilation.
//!
//! A scanner specification is a named, ordered set of token patterns. The
//! compiler runs every pattern through the regex front end, merges the
//! resulting Thompson fragments, determinizes, totalizes, and minimizes. The
//! result is a frozen artifact exposing the automaton through read-only
//! accessors; code generators consume nothing else.
//!
//! Declaration order matters twice: accepting states reached by several
//! patterns are labeled with the earliest declaration, and tokens that lose
//! every accepting state this way are reported as shadowed.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::ops::Range;

use indexmap::IndexMap;

use dfa::Dfa;
use hopcroft;
use nfa::Nfa;
use regex::{self, RegexError};

/// An error produced while compiling a scanner specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannerError {
    /// The specification declares no patterns at all.
    NoExpressions,
    /// A token was declared with an empty name.
    UnnamedToken,
    /// A pattern failed to validate or parse.
    Pattern {
        /// The name of the token whose pattern failed.
        token: String,
        /// The failure itself.
        error: RegexError,
    },
}

impl fmt::Display for ScannerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ScannerError::NoExpressions => write!(f, "scanner declares no expressions"),
            ScannerError::UnnamedToken => write!(f, "token declared with an empty name"),
            ScannerError::Pattern {
                ref token,
                ref error,
            } => write!(f, "pattern for token `{}`: {}", token, error),
        }
    }
}

impl Error for ScannerError {}

/// A compiled scanner.
///
/// Immutable after construction; all views into the minimal DFA borrow from
/// the artifact. Safe to share across threads.
#[derive(Debug, Clone)]
pub struct Scanner {
    name: String,
    expressions: IndexMap<String, String>,
    accepting: BTreeMap<usize, String>,
    shadowed: Vec<String>,
    dfa: Dfa,
}

impl Scanner {
    /// Compile a named set of patterns into a minimal DFA.
    ///
    /// Every pattern is attempted even after one fails, so a caller can
    /// report all pattern errors of a specification in a single pass. The
    /// result is either the complete artifact or the full error list; nothing
    /// partially built escapes.
    pub fn compile<S: Into<String>>(
        name: S,
        expressions: IndexMap<String, String>,
    ) -> Result<Scanner, Vec<ScannerError>> {
        let name = name.into();
        if expressions.is_empty() {
            return Err(vec![ScannerError::NoExpressions]);
        }
        let mut errors = Vec::new();
        let mut patterns = Vec::with_capacity(expressions.len());
        for (token, pattern) in &expressions {
            if token.is_empty() {
                errors.push(ScannerError::UnnamedToken);
                continue;
            }
            match regex::parse(pattern) {
                Ok(ast) => patterns.push(ast),
                Err(error) => errors.push(ScannerError::Pattern {
                    token: token.clone(),
                    error,
                }),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        debug!(
            "compiling scanner `{}` with {} patterns",
            name,
            patterns.len()
        );
        let nfa = Nfa::compile(&patterns);
        debug!("thompson construction yielded {} states", nfa.states().len());
        let dfa = hopcroft::minimize(&Dfa::construct(&nfa));
        debug!("minimal automaton has {} states", dfa.num_states());

        let mut accepting = BTreeMap::new();
        for (&state, &token) in dfa.accepting() {
            if let Some((name, _)) = expressions.get_index(token) {
                accepting.insert(state, name.clone());
            }
        }
        let shadowed: Vec<String> = expressions
            .keys()
            .enumerate()
            .filter(|&(index, _)| !dfa.accepting().values().any(|&token| token == index))
            .map(|(_, token)| token.clone())
            .collect();
        for token in &shadowed {
            warn!(
                "scanner `{}`: token `{}` recognizes the same input as an earlier \
                 declaration and is shadowed",
                name, token
            );
        }

        Ok(Scanner {
            name,
            expressions,
            accepting,
            shadowed,
            dfa,
        })
    }

    /// The diagnostic name of the scanner.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The token names and their patterns, in declaration order.
    pub fn expressions(&self) -> &IndexMap<String, String> {
        &self.expressions
    }

    /// The state indices of the minimal DFA.
    pub fn states(&self) -> Range<usize> {
        0..self.dfa.num_states()
    }

    /// The input alphabet, in ascending character order.
    pub fn alphabet(&self) -> &[char] {
        self.dfa.alphabet()
    }

    /// The start state.
    pub fn start(&self) -> usize {
        self.dfa.start()
    }

    /// The sink state absorbing all rejected input.
    pub fn sink(&self) -> usize {
        self.dfa.sink()
    }

    /// The accepting states and the token each recognizes.
    pub fn accepting(&self) -> &BTreeMap<usize, String> {
        &self.accepting
    }

    /// Look up a single transition of the total transition function.
    pub fn transition(&self, state: usize, symbol: char) -> usize {
        self.dfa.transition(state, symbol)
    }

    /// The underlying minimal automaton.
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// Tokens that no accepting state is labeled with because an earlier
    /// declaration claimed all of them.
    pub fn shadowed(&self) -> &[String] {
        &self.shadowed
    }
}

impl fmt::Display for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "scanner {}:", self.name)?;
        write!(f, "  alphabet:")?;
        for &c in self.alphabet() {
            write!(f, " {:?}", c)?;
        }
        writeln!(f, "")?;
        for state in self.states() {
            write!(f, "  state {}", state)?;
            if state == self.start() {
                write!(f, " (start)")?;
            }
            if state == self.sink() {
                write!(f, " (sink)")?;
            }
            if let Some(token) = self.accepting.get(&state) {
                write!(f, " (accepts {})", token)?;
            }
            writeln!(f, ":")?;
            for &c in self.alphabet() {
                writeln!(f, "    {:?} -> {}", c, self.dfa.transition(state, c))?;
            }
        }
        Ok(())
    }
}
