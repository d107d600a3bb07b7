//! Data structures representing a grammar.
//!
//! A grammar is internalized from a raw production list. Symbols are
//! classified purely by where they appear: anything that occurs as the
//! left-hand side of some production is a nonterminal, every other symbol on
//! a right-hand side is a terminal. No lexical convention is enforced.

use std::error::Error;
use std::fmt;
use std::slice;

use indexmap::IndexMap;

use Pretty;

/// A context-free grammar in Backus-Naur form.
#[derive(Debug, Clone)]
pub struct Grammar {
    name: String,
    start: NonterminalId,
    rules: Vec<Rule>,
    nonterms: IndexMap<String, NonterminalId>,
    terms: IndexMap<String, TerminalId>,
    nonterm_rules: Vec<Vec<RuleId>>,
}

/// A single production within a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    lhs: NonterminalId,
    symbols: Vec<Symbol>,
}

/// A symbol of a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// A terminal.
    Terminal(TerminalId),
    /// A nonterminal.
    Nonterminal(NonterminalId),
}

/// A unique nonterminal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonterminalId(usize);

/// A unique terminal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TerminalId(usize);

/// A unique production identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(usize);

/// The synthetic end-of-input marker `$`.
pub const END: TerminalId = TerminalId(0);

/// An iterator over the rules of a grammar.
pub type RulesIter<'a> = slice::Iter<'a, Rule>;

/// An iterator over the rule IDs of a grammar.
pub type RuleIdsIter<'a> = slice::Iter<'a, RuleId>;

/// The reasons a grammar cannot be internalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedGrammar {
    /// The grammar declares no productions.
    NoProductions,
    /// The start symbol never appears as a left-hand side.
    UnknownStart(String),
    /// A textual production record did not parse.
    MalformedProduction {
        /// Zero-based offset into the text form.
        position: usize,
        /// A human-readable description of the problem.
        reason: String,
    },
}

impl fmt::Display for MalformedGrammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MalformedGrammar::NoProductions => write!(f, "grammar declares no productions"),
            MalformedGrammar::UnknownStart(ref symbol) => {
                write!(f, "start symbol `{}` has no production", symbol)
            }
            MalformedGrammar::MalformedProduction {
                position,
                ref reason,
            } => write!(f, "malformed production at offset {}: {}", position, reason),
        }
    }
}

impl Error for MalformedGrammar {}

impl Grammar {
    /// Internalize a raw production list.
    ///
    /// Each entry pairs a left-hand-side symbol with one right-hand-side
    /// sequence; an empty sequence is the epsilon production. Production
    /// indices are assigned in declaration order, which later determines the
    /// numbering used in parse table cells and conflict reports.
    pub fn compile<S: Into<String>>(
        name: S,
        start: &str,
        productions: &[(String, Vec<String>)],
    ) -> Result<Grammar, MalformedGrammar> {
        if productions.is_empty() {
            return Err(MalformedGrammar::NoProductions);
        }

        // First pass: the left-hand-side column defines the nonterminals.
        let mut nonterms: IndexMap<String, NonterminalId> = IndexMap::new();
        for &(ref lhs, _) in productions {
            let id = NonterminalId(nonterms.len());
            nonterms.entry(lhs.clone()).or_insert(id);
        }
        let start = match nonterms.get(start) {
            Some(&id) => id,
            None => return Err(MalformedGrammar::UnknownStart(start.into())),
        };

        // Second pass: everything else is a terminal. The end marker always
        // occupies terminal index 0.
        let mut terms: IndexMap<String, TerminalId> = IndexMap::new();
        terms.insert("$".into(), END);
        for &(_, ref rhs) in productions {
            for symbol in rhs {
                if !nonterms.contains_key(symbol) {
                    let id = TerminalId(terms.len());
                    terms.entry(symbol.clone()).or_insert(id);
                }
            }
        }

        let mut rules = Vec::with_capacity(productions.len());
        let mut nonterm_rules = vec![Vec::new(); nonterms.len()];
        for &(ref lhs, ref rhs) in productions {
            let lhs = nonterms[lhs.as_str()];
            let symbols = rhs.iter()
                .map(|symbol| match nonterms.get(symbol) {
                    Some(&id) => Symbol::Nonterminal(id),
                    None => Symbol::Terminal(terms[symbol.as_str()]),
                })
                .collect();
            nonterm_rules[lhs.as_usize()].push(RuleId(rules.len()));
            rules.push(Rule { lhs, symbols });
        }

        Ok(Grammar {
            name: name.into(),
            start,
            rules,
            nonterms,
            terms,
            nonterm_rules,
        })
    }

    /// The name of the grammar.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The start nonterminal.
    pub fn start(&self) -> NonterminalId {
        self.start
    }

    /// The rules in this grammar, in declaration order.
    pub fn rules(&self) -> RulesIter {
        self.rules.iter()
    }

    /// The rules for a specific nonterminal.
    pub fn rules_for_nonterminal(&self, id: NonterminalId) -> RuleIdsIter {
        self.nonterm_rules[id.as_usize()].iter()
    }

    /// Access a single rule.
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.as_usize()]
    }

    /// The number of rules.
    pub fn num_rules(&self) -> usize {
        self.rules.len()
    }

    /// Get the name of a nonterminal.
    pub fn nonterminal_name(&self, id: NonterminalId) -> &str {
        match self.nonterms.get_index(id.as_usize()) {
            Some((name, _)) => name,
            None => "?",
        }
    }

    /// Get the name of a terminal.
    pub fn terminal_name(&self, id: TerminalId) -> &str {
        match self.terms.get_index(id.as_usize()) {
            Some((name, _)) => name,
            None => "?",
        }
    }

    /// Look up a nonterminal by name.
    pub fn nonterminal(&self, name: &str) -> Option<NonterminalId> {
        self.nonterms.get(name).cloned()
    }

    /// Look up a terminal by name.
    pub fn terminal(&self, name: &str) -> Option<TerminalId> {
        self.terms.get(name).cloned()
    }

    /// The nonterminal names, in declaration order.
    pub fn nonterminals(&self) -> indexmap::map::Keys<String, NonterminalId> {
        self.nonterms.keys()
    }

    /// The terminal names, with the end marker first, then in order of first
    /// appearance.
    pub fn terminals(&self) -> indexmap::map::Keys<String, TerminalId> {
        self.terms.keys()
    }

    /// The upper bound on nonterminal IDs. Can be used as capacity for
    /// containers indexed by nonterminal.
    pub fn nonterminal_id_bound(&self) -> usize {
        self.nonterms.len()
    }

    /// The upper bound on terminal IDs. Can be used as capacity for
    /// containers indexed by terminal.
    pub fn terminal_id_bound(&self) -> usize {
        self.terms.len()
    }
}

impl Rule {
    /// The left-hand-side nonterminal of this production.
    pub fn lhs(&self) -> NonterminalId {
        self.lhs
    }

    /// The symbols in this production. Empty for the epsilon production.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Get a pretty printer for this rule.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl Symbol {
    /// Get a pretty printer for this symbol.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl From<TerminalId> for Symbol {
    fn from(id: TerminalId) -> Symbol {
        Symbol::Terminal(id)
    }
}

impl From<NonterminalId> for Symbol {
    fn from(id: NonterminalId) -> Symbol {
        Symbol::Nonterminal(id)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a Symbol> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.item {
            Symbol::Terminal(id) => write!(f, "{}", id.pretty(self.ctx)),
            Symbol::Nonterminal(id) => write!(f, "{}", id.pretty(self.ctx)),
        }
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a Rule> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ->", self.item.lhs().pretty(self.ctx))?;
        for symbol in self.item.symbols() {
            write!(f, " {}", symbol.pretty(self.ctx))?;
        }
        Ok(())
    }
}

impl NonterminalId {
    /// Create a nonterminal id from a usize.
    pub fn from_usize(id: usize) -> NonterminalId {
        NonterminalId(id)
    }

    /// Obtain the id as a usize.
    pub fn as_usize(self) -> usize {
        self.0
    }

    /// Get a pretty printer for this nonterminal.
    pub fn pretty(self, grammar: &Grammar) -> Pretty<&Grammar, Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, NonterminalId> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.ctx.nonterminal_name(self.item))
    }
}

impl TerminalId {
    /// Create a terminal id from a usize.
    pub fn from_usize(id: usize) -> TerminalId {
        TerminalId(id)
    }

    /// Obtain the id as a usize.
    pub fn as_usize(self) -> usize {
        self.0
    }

    /// Get a pretty printer for this terminal.
    pub fn pretty(self, grammar: &Grammar) -> Pretty<&Grammar, Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, TerminalId> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.ctx.terminal_name(self.item))
    }
}

impl RuleId {
    /// Create a rule id from a usize.
    pub fn from_usize(id: usize) -> RuleId {
        RuleId(id)
    }

    /// Obtain the id as a usize.
    pub fn as_usize(self) -> usize {
        self.0
    }
}
