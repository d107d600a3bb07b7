//! A compiler for formal language specifications.
//!
//! Two independent pipelines make up the crate: the scanner compiler, which
//! turns a set of named regular expressions into a unique total minimal DFA,
//! and the parser compiler, which turns a BNF grammar into an LL(1) predictive
//! parse table with explicit conflict reporting. Both produce immutable
//! artifacts that downstream code generators consume through read-only
//! accessors.

#![deny(missing_docs)]

extern crate bit_set;
extern crate indexmap;
#[macro_use]
extern crate log;

pub mod dfa;
pub mod first;
pub mod generator;
pub mod grammar;
mod hopcroft;
pub mod lexer;
pub mod nfa;
pub mod parser;
pub mod regex;
pub mod scanner;
pub mod table;

/// A pretty printer.
pub struct Pretty<C, T> {
    ctx: C,
    item: T,
}

impl<C, T> Pretty<C, T> {
    pub(crate) fn new(ctx: C, item: T) -> Pretty<C, T> {
        Pretty { ctx, item }
    }
}
