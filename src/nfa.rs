//! Thompson construction of nondeterministic finite automata.
//!
//! Every pattern tree maps to a fragment with a single entry and a single
//! exit state, following Thompson's classical rules. The states of all
//! fragments of a scanner live in one arena and are identified by dense
//! integer indices; cycles introduced by repetition operators stay inside the
//! arena, so dropping the automaton releases everything at once.

use std::collections::BTreeSet;

use regex::Ast;

/// A unique NFA state identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(usize);

impl StateId {
    /// Create a state id from a usize.
    pub fn from_usize(id: usize) -> StateId {
        StateId(id)
    }

    /// Obtain the id as a usize.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// The label on a consuming transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// A single character.
    Symbol(char),
    /// Any character out of an explicit set. Kept as a set here; subset
    /// construction flattens it into per-character moves.
    Class(BTreeSet<char>),
}

/// A single NFA state.
///
/// Each state carries at most one labeled transition and at most two epsilon
/// edges. Accepting states carry the index of the pattern that owns them and
/// have no outgoing edges.
#[derive(Debug, Clone, Default)]
pub struct State {
    consume: Option<(Label, StateId)>,
    epsilon: Vec<StateId>,
    accept: Option<usize>,
}

impl State {
    /// The labeled transition out of this state, if any.
    pub fn consume(&self) -> Option<&(Label, StateId)> {
        self.consume.as_ref()
    }

    /// The epsilon edges out of this state.
    pub fn epsilon(&self) -> &[StateId] {
        &self.epsilon
    }

    /// The index of the pattern this state accepts, if any.
    pub fn accept(&self) -> Option<usize> {
        self.accept
    }
}

/// A nondeterministic finite automaton.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<State>,
    start: StateId,
}

impl Nfa {
    /// Compile a group of patterns into one merged automaton.
    ///
    /// Every pattern contributes a Thompson fragment whose accepting state is
    /// tagged with the pattern's index in `patterns`. A synthetic start state
    /// reaches each fragment entry through epsilon edges; fan-out beyond two
    /// targets is chained through additional epsilon states to preserve the
    /// two-edge bound per state.
    pub fn compile(patterns: &[Ast]) -> Nfa {
        let mut builder = Builder { states: Vec::new() };
        let mut entries = Vec::with_capacity(patterns.len());
        for (index, pattern) in patterns.iter().enumerate() {
            let (entry, exit) = builder.fragment(pattern);
            builder.states[exit.as_usize()].accept = Some(index);
            entries.push(entry);
        }
        let mut start = None;
        for &entry in entries.iter().rev() {
            let junction = builder.node();
            builder.epsilon(junction, entry);
            if let Some(next) = start {
                builder.epsilon(junction, next);
            }
            start = Some(junction);
        }
        let start = match start {
            Some(start) => start,
            // No patterns: a lone non-accepting start recognizing nothing.
            None => builder.node(),
        };
        Nfa {
            states: builder.states,
            start,
        }
    }

    /// The start state.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// All states, indexed by their id.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Access a single state.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.as_usize()]
    }
}

/// The arena the fragments are assembled in.
struct Builder {
    states: Vec<State>,
}

impl Builder {
    /// Allocate a fresh state with no edges.
    fn node(&mut self) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(State::default());
        id
    }

    /// Add an epsilon edge.
    fn epsilon(&mut self, from: StateId, to: StateId) {
        let state = &mut self.states[from.as_usize()];
        debug_assert!(state.epsilon.len() < 2);
        state.epsilon.push(to);
    }

    /// Add a labeled edge.
    fn consume(&mut self, from: StateId, label: Label, to: StateId) {
        let state = &mut self.states[from.as_usize()];
        debug_assert!(state.consume.is_none());
        state.consume = Some((label, to));
    }

    /// Build the fragment for a pattern tree. Returns the entry and exit
    /// state; the exit has no outgoing edges yet.
    fn fragment(&mut self, ast: &Ast) -> (StateId, StateId) {
        match *ast {
            Ast::Atom(c) => {
                let entry = self.node();
                let exit = self.node();
                self.consume(entry, Label::Symbol(c), exit);
                (entry, exit)
            }
            Ast::Class(ref set) => {
                let entry = self.node();
                let exit = self.node();
                self.consume(entry, Label::Class(set.clone()), exit);
                (entry, exit)
            }
            Ast::Concat(ref lhs, ref rhs) => {
                let (lhs_entry, lhs_exit) = self.fragment(lhs);
                let (rhs_entry, rhs_exit) = self.fragment(rhs);
                self.epsilon(lhs_exit, rhs_entry);
                (lhs_entry, rhs_exit)
            }
            Ast::Union(ref lhs, ref rhs) => {
                let (lhs_entry, lhs_exit) = self.fragment(lhs);
                let (rhs_entry, rhs_exit) = self.fragment(rhs);
                let entry = self.node();
                let exit = self.node();
                self.epsilon(entry, lhs_entry);
                self.epsilon(entry, rhs_entry);
                self.epsilon(lhs_exit, exit);
                self.epsilon(rhs_exit, exit);
                (entry, exit)
            }
            Ast::Star(ref inner) => {
                let (inner_entry, inner_exit) = self.fragment(inner);
                let entry = self.node();
                let exit = self.node();
                self.epsilon(entry, inner_entry);
                self.epsilon(entry, exit);
                self.epsilon(inner_exit, inner_entry);
                self.epsilon(inner_exit, exit);
                (entry, exit)
            }
            Ast::Plus(ref inner) => {
                // Star with a required first traversal: no bypass edge.
                let (inner_entry, inner_exit) = self.fragment(inner);
                let entry = self.node();
                let exit = self.node();
                self.epsilon(entry, inner_entry);
                self.epsilon(inner_exit, inner_entry);
                self.epsilon(inner_exit, exit);
                (entry, exit)
            }
            Ast::Question(ref inner) => {
                let (inner_entry, inner_exit) = self.fragment(inner);
                let entry = self.node();
                let exit = self.node();
                self.epsilon(entry, inner_entry);
                self.epsilon(entry, exit);
                self.epsilon(inner_exit, exit);
                (entry, exit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex;

    fn compile(patterns: &[&str]) -> Nfa {
        let asts: Vec<_> = patterns
            .iter()
            .map(|p| regex::parse(p).expect("pattern must parse"))
            .collect();
        Nfa::compile(&asts)
    }

    #[test]
    fn single_atom() {
        let nfa = compile(&["a"]);
        // Entry, exit, and the synthetic start.
        assert_eq!(nfa.states().len(), 3);
        let entry = nfa.state(nfa.start()).epsilon()[0];
        let (ref label, exit) = *nfa.state(entry).consume().expect("consuming edge");
        assert_eq!(*label, Label::Symbol('a'));
        assert_eq!(nfa.state(exit).accept(), Some(0));
    }

    #[test]
    fn accepting_states_are_terminal() {
        let nfa = compile(&["(a|b)*abb", "[0-9]+"]);
        for state in nfa.states() {
            if state.accept().is_some() {
                assert!(state.consume().is_none());
                assert!(state.epsilon().is_empty());
            }
        }
    }

    #[test]
    fn every_other_state_has_an_edge() {
        let nfa = compile(&["a?b+", "c|d"]);
        for state in nfa.states() {
            if state.accept().is_none() {
                assert!(state.consume().is_some() || !state.epsilon().is_empty());
            }
        }
    }

    #[test]
    fn merged_start_reaches_each_pattern() {
        let nfa = compile(&["a", "b", "c"]);
        // Follow epsilon edges from the synthetic start and collect all
        // consuming labels reachable without input.
        let mut labels = Vec::new();
        let mut stack = vec![nfa.start()];
        let mut seen = vec![false; nfa.states().len()];
        while let Some(id) = stack.pop() {
            if seen[id.as_usize()] {
                continue;
            }
            seen[id.as_usize()] = true;
            let state = nfa.state(id);
            if let Some(&(ref label, _)) = state.consume() {
                labels.push(label.clone());
            }
            stack.extend(state.epsilon().iter().cloned());
        }
        labels.sort_by_key(|l| match *l {
            Label::Symbol(c) => c,
            Label::Class(_) => '\0',
        });
        assert_eq!(
            labels,
            vec![
                Label::Symbol('a'),
                Label::Symbol('b'),
                Label::Symbol('c'),
            ]
        );
    }

    #[test]
    fn epsilon_fanout_is_bounded() {
        let nfa = compile(&["a", "b", "c", "d", "e"]);
        for state in nfa.states() {
            assert!(state.epsilon().len() <= 2);
        }
    }
}
