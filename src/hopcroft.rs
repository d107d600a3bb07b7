//! Hopcroft minimization of total DFAs.
//!
//! Partition refinement computes the coarsest equivalence over the states of
//! a total DFA that is consistent with acceptance labeling. The initial
//! partition separates the sink, the plain states, and one block per accept
//! label; refinement then splits blocks against the preimage of a splitter
//! block under each alphabet letter, keeping the smaller half on the
//! worklist.

use std::collections::{BTreeMap, VecDeque};

use bit_set::BitSet;

use dfa::Dfa;

/// Minimize a total DFA.
///
/// The result is unique up to state renaming; the renaming chosen here orders
/// the equivalence classes by their smallest pre-minimization member, which
/// keeps the outcome deterministic across runs.
pub(crate) fn minimize(dfa: &Dfa) -> Dfa {
    let num_states = dfa.num_states();
    let num_symbols = dfa.alphabet.len();

    // Initial partition.
    let mut sink_block = BitSet::with_capacity(num_states);
    sink_block.insert(dfa.sink);
    let mut plain = BitSet::with_capacity(num_states);
    let mut label_blocks: BTreeMap<usize, BitSet> = BTreeMap::new();
    for state in 0..num_states {
        if state == dfa.sink {
            continue;
        }
        match dfa.accepting.get(&state) {
            Some(&token) => {
                label_blocks
                    .entry(token)
                    .or_insert_with(|| BitSet::with_capacity(num_states))
                    .insert(state);
            }
            None => {
                plain.insert(state);
            }
        }
    }
    let mut blocks: Vec<BitSet> = Vec::new();
    blocks.push(sink_block);
    if !plain.is_empty() {
        blocks.push(plain);
    }
    blocks.extend(label_blocks.into_iter().map(|(_, block)| block));

    // Refinement loop. Splitters are taken by value, so a splitter that is
    // itself split mid-iteration keeps acting as the set it was when popped.
    let mut worklist: VecDeque<usize> = (0..blocks.len()).collect();
    let mut on_list: Vec<bool> = vec![true; blocks.len()];
    while let Some(splitter_id) = worklist.pop_front() {
        on_list[splitter_id] = false;
        let splitter = blocks[splitter_id].clone();
        for symbol in 0..num_symbols {
            let mut preimage = BitSet::with_capacity(num_states);
            for state in 0..num_states {
                if splitter.contains(dfa.table[state][symbol]) {
                    preimage.insert(state);
                }
            }
            if preimage.is_empty() {
                continue;
            }
            let known = blocks.len();
            for block_id in 0..known {
                let mut intersection = blocks[block_id].clone();
                intersection.intersect_with(&preimage);
                if intersection.is_empty() {
                    continue;
                }
                let mut difference = blocks[block_id].clone();
                difference.difference_with(&preimage);
                if difference.is_empty() {
                    continue;
                }
                blocks[block_id] = intersection;
                blocks.push(difference);
                let new_id = blocks.len() - 1;
                on_list.push(false);
                if on_list[block_id] {
                    worklist.push_back(new_id);
                    on_list[new_id] = true;
                } else {
                    let smaller = if blocks[block_id].len() <= blocks[new_id].len() {
                        block_id
                    } else {
                        new_id
                    };
                    worklist.push_back(smaller);
                    on_list[smaller] = true;
                }
            }
        }
    }
    debug!("partitioned {} states into {} blocks", num_states, blocks.len());

    // Deterministic renumbering by smallest member.
    let mut order: Vec<usize> = (0..blocks.len()).collect();
    order.sort_by_key(|&id| blocks[id].iter().next());
    let mut renumber = vec![0; blocks.len()];
    for (new_id, &old_id) in order.iter().enumerate() {
        renumber[old_id] = new_id;
    }
    let mut block_of = vec![0; num_states];
    for (id, block) in blocks.iter().enumerate() {
        for state in block.iter() {
            block_of[state] = renumber[id];
        }
    }

    // Rebuild the automaton from one representative per block.
    let mut table = vec![Vec::new(); blocks.len()];
    for &old_id in &order {
        let block = &blocks[old_id];
        if let Some(representative) = block.iter().next() {
            table[renumber[old_id]] = (0..num_symbols)
                .map(|symbol| block_of[dfa.table[representative][symbol]])
                .collect();
        }
    }
    let mut accepting = BTreeMap::new();
    for (&state, &token) in &dfa.accepting {
        // Blocks never span accept labels, but the earliest declaration wins
        // should that ever be relaxed.
        let entry = accepting.entry(block_of[state]).or_insert(token);
        if *entry > token {
            *entry = token;
        }
    }

    Dfa {
        alphabet: dfa.alphabet.clone(),
        table,
        start: block_of[dfa.start],
        sink: block_of[dfa.sink],
        accepting,
    }
}
