//! Deterministic finite automata.
//!
//! Subset construction turns the merged NFA of a scanner into a reachable
//! DFA: every DFA state is the epsilon closure of a set of NFA states,
//! represented as a canonical bit set and memoized by it. Totalization then
//! completes the transition function with a sink state so that every (state,
//! alphabet letter) pair is defined.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use bit_set::BitSet;

use nfa::{Label, Nfa, StateId};

/// A total deterministic finite automaton.
///
/// States are dense integer indices. The transition table covers every state
/// and every alphabet letter; characters outside the alphabet implicitly lead
/// to the sink, which only loops back to itself. Accepting states carry the
/// index of the pattern they recognize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) alphabet: Vec<char>,
    pub(crate) table: Vec<Vec<usize>>,
    pub(crate) start: usize,
    pub(crate) sink: usize,
    pub(crate) accepting: BTreeMap<usize, usize>,
}

impl Dfa {
    /// Determinize a merged NFA into a total automaton.
    pub fn construct(nfa: &Nfa) -> Dfa {
        let mut cache: Vec<Option<BitSet>> = vec![None; nfa.states().len()];
        let start_set = closure_of(nfa, nfa.start(), &mut cache);

        let mut index: HashMap<BitSet, usize> = HashMap::new();
        let mut sets: Vec<BitSet> = Vec::new();
        let mut moves: Vec<BTreeMap<char, usize>> = Vec::new();
        let mut accepting: BTreeMap<usize, usize> = BTreeMap::new();
        let mut alphabet: BTreeSet<char> = BTreeSet::new();
        let mut queue: VecDeque<usize> = VecDeque::new();

        index.insert(start_set.clone(), 0);
        sets.push(start_set);
        queue.push_back(0);

        while let Some(current) = queue.pop_front() {
            let set = sets[current].clone();

            // The earliest-declared pattern whose accept state is in the
            // closure labels this DFA state.
            let label = set.iter()
                .filter_map(|q| nfa.state(StateId::from_usize(q)).accept())
                .min();
            if let Some(token) = label {
                accepting.insert(current, token);
            }

            // Gather the move sets per character, flattening class edges.
            let mut successors: BTreeMap<char, BitSet> = BTreeMap::new();
            for q in set.iter() {
                if let Some(&(ref label, next)) = nfa.state(StateId::from_usize(q)).consume() {
                    let target = closure_of(nfa, next, &mut cache);
                    match *label {
                        Label::Symbol(c) => {
                            successors
                                .entry(c)
                                .or_insert_with(BitSet::new)
                                .union_with(&target);
                        }
                        Label::Class(ref chars) => for &c in chars {
                            successors
                                .entry(c)
                                .or_insert_with(BitSet::new)
                                .union_with(&target);
                        },
                    }
                }
            }

            let mut row = BTreeMap::new();
            for (c, successor) in successors {
                alphabet.insert(c);
                let next_index = sets.len();
                let target = match index.get(&successor) {
                    Some(&existing) => existing,
                    None => {
                        index.insert(successor.clone(), next_index);
                        sets.push(successor);
                        queue.push_back(next_index);
                        next_index
                    }
                };
                row.insert(c, target);
            }
            if moves.len() <= current {
                moves.resize(current + 1, BTreeMap::new());
            }
            moves[current] = row;
        }

        // Totalize: a dedicated sink absorbs every missing transition.
        let alphabet: Vec<char> = alphabet.into_iter().collect();
        let sink = sets.len();
        let mut table = Vec::with_capacity(sink + 1);
        for row in &moves {
            table.push(
                alphabet
                    .iter()
                    .map(|c| row.get(c).cloned().unwrap_or(sink))
                    .collect(),
            );
        }
        table.push(vec![sink; alphabet.len()]);

        Dfa {
            alphabet,
            table,
            start: 0,
            sink,
            accepting,
        }
    }

    /// The number of states.
    pub fn num_states(&self) -> usize {
        self.table.len()
    }

    /// The input alphabet, in ascending character order.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// The start state.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The sink state.
    pub fn sink(&self) -> usize {
        self.sink
    }

    /// The accepting states and the pattern index each recognizes.
    pub fn accepting(&self) -> &BTreeMap<usize, usize> {
        &self.accepting
    }

    /// Look up a transition. Characters outside the alphabet reject, which
    /// the total transition function expresses as a move into the sink.
    pub fn transition(&self, state: usize, symbol: char) -> usize {
        match self.alphabet.binary_search(&symbol) {
            Ok(offset) => self.table[state][offset],
            Err(_) => self.sink,
        }
    }
}

/// Compute the epsilon closure of a state, memoizing per NFA state.
fn closure_of(nfa: &Nfa, id: StateId, cache: &mut Vec<Option<BitSet>>) -> BitSet {
    if let Some(ref closure) = cache[id.as_usize()] {
        return closure.clone();
    }
    let mut closure = BitSet::with_capacity(nfa.states().len());
    let mut stack = vec![id];
    while let Some(q) = stack.pop() {
        if closure.insert(q.as_usize()) {
            stack.extend(nfa.state(q).epsilon().iter().cloned());
        }
    }
    cache[id.as_usize()] = Some(closure.clone());
    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex;

    fn construct(patterns: &[&str]) -> Dfa {
        let asts: Vec<_> = patterns
            .iter()
            .map(|p| regex::parse(p).expect("pattern must parse"))
            .collect();
        Dfa::construct(&Nfa::compile(&asts))
    }

    fn walk(dfa: &Dfa, input: &str) -> usize {
        input
            .chars()
            .fold(dfa.start(), |state, c| dfa.transition(state, c))
    }

    #[test]
    fn transition_function_is_total() {
        let dfa = construct(&["[0-9]+", "[a-z][a-z0-9]*"]);
        for row in &dfa.table {
            assert_eq!(row.len(), dfa.alphabet().len());
            for &target in row {
                assert!(target < dfa.num_states());
            }
        }
    }

    #[test]
    fn sink_only_loops() {
        let dfa = construct(&["ab"]);
        let sink = dfa.sink();
        assert!(dfa.table[sink].iter().all(|&target| target == sink));
        assert!(!dfa.accepting().contains_key(&sink));
    }

    #[test]
    fn digits_loop_on_accept() {
        let dfa = construct(&["[0-9]+"]);
        let accept = walk(&dfa, "4");
        assert!(dfa.accepting().contains_key(&accept));
        assert_eq!(walk(&dfa, "42"), accept);
        assert_eq!(walk(&dfa, "4a"), dfa.sink());
    }

    #[test]
    fn earlier_pattern_wins_on_overlap() {
        // Both patterns accept exactly "a"; the merged accept closure is
        // labeled with the earlier one.
        let dfa = construct(&["a", "a"]);
        let accept = walk(&dfa, "a");
        assert_eq!(dfa.accepting().get(&accept), Some(&0));
    }

    #[test]
    fn alphabet_is_the_union_of_edge_characters() {
        let dfa = construct(&["a|b", "[x-z]"]);
        assert_eq!(dfa.alphabet(), &['a', 'b', 'x', 'y', 'z']);
    }

    #[test]
    fn unknown_characters_reject() {
        let dfa = construct(&["a"]);
        assert_eq!(dfa.transition(dfa.start(), '!'), dfa.sink());
    }
}
