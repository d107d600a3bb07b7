//! LL(1) parse table construction.
//!
//! The table maps a (nonterminal, lookahead terminal) pair to the productions
//! predicted for it. Construction never fails: a grammar outside LL(1) simply
//! yields cells with more than one entry, and those cells are preserved and
//! additionally surfaced as a conflict list. Whether conflicts are fatal is
//! the caller's decision.

use std::fmt;

use first::{FirstSets, FollowSets, PredictSets};
use grammar::{Grammar, NonterminalId, RuleId, TerminalId};

/// A cell of the parse table claimed by more than one production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The row nonterminal.
    pub nonterminal: NonterminalId,
    /// The column terminal.
    pub terminal: TerminalId,
    /// Every production claiming the cell, in declaration order.
    pub rules: Vec<RuleId>,
}

/// A compiled parse table.
///
/// Immutable after construction. The grammar, the three set families it was
/// derived from, the table cells, and the conflict list are all exposed
/// read-only; code generators consume nothing else.
#[derive(Debug, Clone)]
pub struct ParseTable {
    grammar: Grammar,
    first: FirstSets,
    follow: FollowSets,
    predict: PredictSets,
    table: Vec<Vec<Vec<RuleId>>>,
    conflicts: Vec<Conflict>,
}

impl ParseTable {
    /// Build the predictive parse table of a grammar.
    ///
    /// Every production is inserted into the cell of each terminal in its
    /// predict set. The grammar is LL(1) exactly if every cell ends up with
    /// at most one entry.
    pub fn compute(grammar: Grammar) -> ParseTable {
        let first = FirstSets::compute(&grammar);
        let follow = FollowSets::compute(&grammar, &first);
        let predict = PredictSets::compute(&grammar, &first, &follow);

        let rows = grammar.nonterminal_id_bound();
        let cols = grammar.terminal_id_bound();
        let mut table = vec![vec![Vec::new(); cols]; rows];
        for (index, rule) in grammar.rules().enumerate() {
            let id = RuleId::from_usize(index);
            if let Some(set) = predict.get(id) {
                for terminal in set.iter() {
                    table[rule.lhs().as_usize()][terminal].push(id);
                }
            }
        }

        let mut conflicts = Vec::new();
        for (row, cells) in table.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if cell.len() > 1 {
                    conflicts.push(Conflict {
                        nonterminal: NonterminalId::from_usize(row),
                        terminal: TerminalId::from_usize(col),
                        rules: cell.clone(),
                    });
                }
            }
        }
        if !conflicts.is_empty() {
            debug!(
                "grammar `{}` has {} conflicting table cells",
                grammar.name(),
                conflicts.len()
            );
        }

        ParseTable {
            grammar,
            first,
            follow,
            predict,
            table,
            conflicts,
        }
    }

    /// The grammar this table was built from.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// The name of the grammar.
    pub fn name(&self) -> &str {
        self.grammar.name()
    }

    /// The start nonterminal.
    pub fn start(&self) -> NonterminalId {
        self.grammar.start()
    }

    /// The first sets the table was derived from.
    pub fn first(&self) -> &FirstSets {
        &self.first
    }

    /// The follow sets the table was derived from.
    pub fn follow(&self) -> &FollowSets {
        &self.follow
    }

    /// The predict sets the table was derived from.
    pub fn predict(&self) -> &PredictSets {
        &self.predict
    }

    /// The productions predicted for a (nonterminal, lookahead) pair.
    pub fn cell(&self, nonterminal: NonterminalId, terminal: TerminalId) -> &[RuleId] {
        &self.table[nonterminal.as_usize()][terminal.as_usize()]
    }

    /// The full table, indexed by nonterminal then terminal id.
    pub fn table(&self) -> &[Vec<Vec<RuleId>>] {
        &self.table
    }

    /// The cells claimed by more than one production.
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Whether the grammar is LL(1), i.e. the table is conflict free.
    pub fn is_ll1(&self) -> bool {
        self.conflicts.is_empty()
    }
}

impl fmt::Display for ParseTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "grammar {}:", self.grammar.name())?;
        for (index, rule) in self.grammar.rules().enumerate() {
            writeln!(f, "  {}: {}", index, rule.pretty(&self.grammar))?;
        }
        writeln!(f, "table:")?;
        for (row, cells) in self.table.iter().enumerate() {
            let nonterminal = NonterminalId::from_usize(row);
            for (col, cell) in cells.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                let terminal = TerminalId::from_usize(col);
                write!(
                    f,
                    "  ({}, {}) ->",
                    nonterminal.pretty(&self.grammar),
                    terminal.pretty(&self.grammar)
                )?;
                for rule in cell {
                    write!(f, " {}", rule.as_usize())?;
                }
                writeln!(f, "")?;
            }
        }
        for conflict in &self.conflicts {
            writeln!(
                f,
                "conflict: ({}, {}) predicted by {} productions",
                conflict.nonterminal.pretty(&self.grammar),
                conflict.terminal.pretty(&self.grammar),
                conflict.rules.len()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar::END;

    fn production(lhs: &str, rhs: &[&str]) -> (String, Vec<String>) {
        (lhs.to_string(), rhs.iter().map(|s| s.to_string()).collect())
    }

    fn rules(ids: &[usize]) -> Vec<RuleId> {
        ids.iter().cloned().map(RuleId::from_usize).collect()
    }

    #[test]
    fn matched_parentheses_is_ll1() {
        let grammar = Grammar::compile(
            "anbn",
            "S",
            &[production("S", &["a", "S", "b"]), production("S", &[])],
        ).unwrap();
        let table = ParseTable::compute(grammar);
        assert!(table.is_ll1());
        assert!(table.conflicts().is_empty());

        let s = table.grammar().nonterminal("S").unwrap();
        let a = table.grammar().terminal("a").unwrap();
        let b = table.grammar().terminal("b").unwrap();
        assert_eq!(table.cell(s, a), rules(&[0]).as_slice());
        assert_eq!(table.cell(s, b), rules(&[1]).as_slice());
        assert_eq!(table.cell(s, END), rules(&[1]).as_slice());
    }

    #[test]
    fn left_recursion_conflicts() {
        let grammar = Grammar::compile(
            "expr",
            "E",
            &[
                production("E", &["E", "+", "T"]),
                production("E", &["T"]),
                production("T", &["id"]),
            ],
        ).unwrap();
        let table = ParseTable::compute(grammar);
        assert!(!table.is_ll1());

        let e = table.grammar().nonterminal("E").unwrap();
        let id = table.grammar().terminal("id").unwrap();
        assert_eq!(table.cell(e, id), rules(&[0, 1]).as_slice());
        assert_eq!(
            table.conflicts(),
            &[
                Conflict {
                    nonterminal: e,
                    terminal: id,
                    rules: rules(&[0, 1]),
                },
            ]
        );
    }

    #[test]
    fn conflicting_productions_share_a_predicted_terminal() {
        // Every conflict must be explained by overlapping predict sets.
        let grammar = Grammar::compile(
            "expr",
            "E",
            &[
                production("E", &["E", "+", "T"]),
                production("E", &["T"]),
                production("T", &["id"]),
            ],
        ).unwrap();
        let table = ParseTable::compute(grammar);
        for conflict in table.conflicts() {
            assert!(conflict.rules.len() >= 2);
            for rule in &conflict.rules {
                let predict = table.predict().get(*rule).unwrap();
                assert!(predict.contains(conflict.terminal.as_usize()));
            }
        }
    }

    #[test]
    fn epsilon_only_grammar() {
        let grammar =
            Grammar::compile("empty", "A", &[production("A", &[])]).unwrap();
        let table = ParseTable::compute(grammar);
        assert!(table.is_ll1());
        let a = table.grammar().nonterminal("A").unwrap();
        assert_eq!(table.cell(a, END), rules(&[0]).as_slice());
    }

    #[test]
    fn dangling_else_conflict_is_preserved_in_the_cell() {
        // stmt : if expr stmt else stmt | if expr stmt | other
        let grammar = Grammar::compile(
            "dangling",
            "stmt",
            &[
                production("stmt", &["if", "expr", "stmt", "else", "stmt"]),
                production("stmt", &["if", "expr", "stmt"]),
                production("stmt", &["other"]),
            ],
        ).unwrap();
        let table = ParseTable::compute(grammar);
        let stmt = table.grammar().nonterminal("stmt").unwrap();
        let tif = table.grammar().terminal("if").unwrap();
        // Both `if` productions stay in the cell so diagnostics can name
        // every participant.
        assert_eq!(table.cell(stmt, tif), rules(&[0, 1]).as_slice());
        assert!(!table.is_ll1());
    }
}
