//! First, follow, and predict set computation.
//!
//! This module implements the three set families an LL(1) table is built
//! from. The first set of a nonterminal holds all terminals that can begin
//! one of its derivations; the follow set holds all terminals that can appear
//! immediately after it in some sentential form; the predict set of a
//! production holds the lookahead terminals that select it. Since rules may
//! reference other rules and derive epsilon, all three are computed as least
//! fixpoints: full passes over the productions repeat until nothing changes,
//! which terminates because the sets only ever grow.

use std::iter::repeat;

use bit_set::BitSet;

use grammar::{Grammar, NonterminalId, RuleId, Symbol, END};

/// All first sets of a grammar, one per nonterminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FirstSets(Vec<FirstSet>);

/// The first set of a nonterminal or of a symbol sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FirstSet {
    /// The terminals that can begin a derivation.
    pub symbols: BitSet,
    /// Whether the empty string can be derived.
    pub has_epsilon: bool,
}

impl FirstSets {
    /// Compute the first sets of a grammar.
    pub fn compute(grammar: &Grammar) -> FirstSets {
        let num_term = grammar.terminal_id_bound();
        let num_nonterm = grammar.nonterminal_id_bound();
        let mut sets: Vec<FirstSet> = repeat(FirstSet {
            symbols: BitSet::with_capacity(num_term),
            has_epsilon: false,
        }).take(num_nonterm)
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for rule in grammar.rules() {
                let derived = sequence_first(rule.symbols(), &sets);
                let target = &mut sets[rule.lhs().as_usize()];
                let before = target.symbols.len();
                target.symbols.union_with(&derived.symbols);
                if target.symbols.len() != before {
                    changed = true;
                }
                if derived.has_epsilon && !target.has_epsilon {
                    target.has_epsilon = true;
                    changed = true;
                }
            }
        }

        FirstSets(sets)
    }

    /// Get the first sets of all nonterminals.
    pub fn all(&self) -> &[FirstSet] {
        &self.0
    }

    /// Get the first set of a specific nonterminal.
    pub fn get(&self, id: NonterminalId) -> Option<&FirstSet> {
        self.0.get(id.as_usize())
    }

    /// Derive the first set of a symbol sequence.
    ///
    /// The empty sequence derives epsilon; a sequence is transparent up to
    /// and including its first non-nullable symbol.
    pub fn of_sequence(&self, symbols: &[Symbol]) -> FirstSet {
        sequence_first(symbols, &self.0)
    }
}

/// The meat of the first set computation, shared between the fixpoint loop
/// and sequence queries against finished sets.
fn sequence_first(symbols: &[Symbol], sets: &[FirstSet]) -> FirstSet {
    let mut first = FirstSet {
        symbols: BitSet::new(),
        has_epsilon: true,
    };
    for symbol in symbols {
        match *symbol {
            Symbol::Terminal(id) => {
                first.symbols.insert(id.as_usize());
                first.has_epsilon = false;
                break;
            }
            Symbol::Nonterminal(id) => {
                first.symbols.union_with(&sets[id.as_usize()].symbols);
                if !sets[id.as_usize()].has_epsilon {
                    first.has_epsilon = false;
                    break;
                }
            }
        }
    }
    first
}

/// All follow sets of a grammar, one per nonterminal.
///
/// Terminals are identified by their id; the end-of-input marker is a member
/// of the start symbol's set and of everything that can end the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FollowSets(Vec<BitSet>);

impl FollowSets {
    /// Compute the follow sets of a grammar from its first sets.
    pub fn compute(grammar: &Grammar, first: &FirstSets) -> FollowSets {
        let num_term = grammar.terminal_id_bound();
        let num_nonterm = grammar.nonterminal_id_bound();
        let mut sets: Vec<BitSet> = repeat(BitSet::with_capacity(num_term))
            .take(num_nonterm)
            .collect();
        sets[grammar.start().as_usize()].insert(END.as_usize());

        let mut changed = true;
        while changed {
            changed = false;
            for rule in grammar.rules() {
                let lhs = rule.lhs().as_usize();
                let symbols = rule.symbols();
                for (offset, symbol) in symbols.iter().enumerate() {
                    let id = match *symbol {
                        Symbol::Nonterminal(id) => id.as_usize(),
                        Symbol::Terminal(_) => continue,
                    };
                    let rest = first.of_sequence(&symbols[offset + 1..]);
                    let mut addition = rest.symbols;
                    if rest.has_epsilon {
                        addition.union_with(&sets[lhs]);
                    }
                    let target = &mut sets[id];
                    let before = target.len();
                    target.union_with(&addition);
                    if target.len() != before {
                        changed = true;
                    }
                }
            }
        }

        FollowSets(sets)
    }

    /// Get the follow sets of all nonterminals.
    pub fn all(&self) -> &[BitSet] {
        &self.0
    }

    /// Get the follow set of a specific nonterminal.
    pub fn get(&self, id: NonterminalId) -> Option<&BitSet> {
        self.0.get(id.as_usize())
    }
}

/// All predict sets of a grammar, one per production.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PredictSets(Vec<BitSet>);

impl PredictSets {
    /// Compute the predict set of every production.
    ///
    /// The predict set is the first set of the production body; if the body
    /// can derive epsilon, the follow set of the left-hand side joins in.
    pub fn compute(grammar: &Grammar, first: &FirstSets, follow: &FollowSets) -> PredictSets {
        let mut sets = Vec::with_capacity(grammar.num_rules());
        for rule in grammar.rules() {
            let body = first.of_sequence(rule.symbols());
            let mut predict = body.symbols;
            if body.has_epsilon {
                if let Some(follow) = follow.get(rule.lhs()) {
                    predict.union_with(follow);
                }
            }
            sets.push(predict);
        }
        PredictSets(sets)
    }

    /// Get the predict sets of all productions.
    pub fn all(&self) -> &[BitSet] {
        &self.0
    }

    /// Get the predict set of a specific production.
    pub fn get(&self, id: RuleId) -> Option<&BitSet> {
        self.0.get(id.as_usize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn production(lhs: &str, rhs: &[&str]) -> (String, Vec<String>) {
        (lhs.to_string(), rhs.iter().map(|s| s.to_string()).collect())
    }

    fn bits(ids: &[usize]) -> BitSet {
        ids.iter().cloned().collect()
    }

    fn term(grammar: &Grammar, name: &str) -> usize {
        grammar.terminal(name).expect("unknown terminal").as_usize()
    }

    #[test]
    fn simple_terminal() {
        // A : b
        let g = Grammar::compile("g", "A", &[production("A", &["b"])]).unwrap();
        let fs = FirstSets::compute(&g);
        assert_eq!(
            fs,
            FirstSets(vec![
                FirstSet {
                    symbols: bits(&[term(&g, "b")]),
                    has_epsilon: false,
                },
            ])
        );
    }

    #[test]
    fn simple_indirection() {
        // A : B
        // A : d
        // B : c
        let g = Grammar::compile(
            "g",
            "A",
            &[
                production("A", &["B"]),
                production("A", &["d"]),
                production("B", &["c"]),
            ],
        ).unwrap();
        let fs = FirstSets::compute(&g);
        assert_eq!(
            fs,
            FirstSets(vec![
                // A
                FirstSet {
                    symbols: bits(&[term(&g, "c"), term(&g, "d")]),
                    has_epsilon: false,
                },
                // B
                FirstSet {
                    symbols: bits(&[term(&g, "c")]),
                    has_epsilon: false,
                },
            ])
        );
    }

    #[test]
    fn nullable_chain_is_transparent() {
        // A : B C d
        // B : (epsilon)
        // C : (epsilon)
        let g = Grammar::compile(
            "g",
            "A",
            &[
                production("A", &["B", "C", "d"]),
                production("B", &[]),
                production("C", &[]),
            ],
        ).unwrap();
        let fs = FirstSets::compute(&g);
        let a = fs.get(g.nonterminal("A").unwrap()).unwrap();
        assert_eq!(a.symbols, bits(&[term(&g, "d")]));
        assert!(!a.has_epsilon);
        let b = fs.get(g.nonterminal("B").unwrap()).unwrap();
        assert!(b.has_epsilon);
    }

    #[test]
    fn matched_parentheses() {
        // The classic S : a S b | epsilon example.
        let g = Grammar::compile(
            "g",
            "S",
            &[production("S", &["a", "S", "b"]), production("S", &[])],
        ).unwrap();
        let fs = FirstSets::compute(&g);
        let fos = FollowSets::compute(&g, &fs);
        let ps = PredictSets::compute(&g, &fs, &fos);

        let s = g.nonterminal("S").unwrap();
        let (a, b) = (term(&g, "a"), term(&g, "b"));
        assert_eq!(fs.get(s).unwrap().symbols, bits(&[a]));
        assert!(fs.get(s).unwrap().has_epsilon);
        assert_eq!(*fos.get(s).unwrap(), bits(&[END.as_usize(), b]));
        assert_eq!(*ps.get(RuleId::from_usize(0)).unwrap(), bits(&[a]));
        assert_eq!(
            *ps.get(RuleId::from_usize(1)).unwrap(),
            bits(&[END.as_usize(), b])
        );
    }

    #[test]
    fn left_recursion_terminates() {
        // E : E + T | T
        // T : id
        let g = Grammar::compile(
            "g",
            "E",
            &[
                production("E", &["E", "+", "T"]),
                production("E", &["T"]),
                production("T", &["id"]),
            ],
        ).unwrap();
        let fs = FirstSets::compute(&g);
        let e = fs.get(g.nonterminal("E").unwrap()).unwrap();
        assert_eq!(e.symbols, bits(&[term(&g, "id")]));
        assert!(!e.has_epsilon);
    }

    #[test]
    fn epsilon_only_start() {
        // A : (epsilon), the smallest possible grammar.
        let g = Grammar::compile("g", "A", &[production("A", &[])]).unwrap();
        let fs = FirstSets::compute(&g);
        let fos = FollowSets::compute(&g, &fs);
        let ps = PredictSets::compute(&g, &fs, &fos);
        let a = g.nonterminal("A").unwrap();
        assert!(fs.get(a).unwrap().has_epsilon);
        assert!(fs.get(a).unwrap().symbols.is_empty());
        assert_eq!(*fos.get(a).unwrap(), bits(&[END.as_usize()]));
        assert_eq!(
            *ps.get(RuleId::from_usize(0)).unwrap(),
            bits(&[END.as_usize()])
        );
    }
}
