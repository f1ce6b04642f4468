//! Hopcroft partition refinement.

use std::collections::{BTreeSet, VecDeque};

use super::{Automaton, MachineKind, StateId, ROOT};

/// Minimize a DFA. The input's partial transition function is completed
/// with a sink state for the refinement; the sink's class (and any states
/// equivalent to it) is dropped from the rebuilt machine, so the output is
/// partial again. State numbering is breadth-first from the root with
/// bytes ascending.
pub fn minimize(dfa: &Automaton) -> Automaton {
    let n = dfa.num_states();
    if n == 0 {
        return dfa.clone();
    }
    let alphabet = dfa.alphabet();
    let sink = n;
    let total = n + 1;

    let delta = |q: usize, byte: u8| -> usize {
        if q == sink {
            sink
        } else {
            dfa.step(q, byte).unwrap_or(sink)
        }
    };

    // inverse transition lists per alphabet byte
    let mut inverse: Vec<Vec<Vec<usize>>> = vec![vec![Vec::new(); total]; alphabet.len()];
    for (bi, &byte) in alphabet.iter().enumerate() {
        for q in 0..total {
            inverse[bi][delta(q, byte)].push(q);
        }
    }

    let accepting: BTreeSet<usize> = (0..n).filter(|&q| dfa.is_accept(q)).collect();
    let non_accepting: BTreeSet<usize> =
        (0..total).filter(|q| !accepting.contains(q)).collect();

    let mut blocks: Vec<BTreeSet<usize>> = Vec::new();
    for b in [accepting, non_accepting] {
        if !b.is_empty() {
            blocks.push(b);
        }
    }
    let mut worklist: VecDeque<BTreeSet<usize>> = blocks.iter().cloned().collect();

    while let Some(splitter) = worklist.pop_front() {
        for (bi, _) in alphabet.iter().enumerate() {
            let x: BTreeSet<usize> = splitter
                .iter()
                .flat_map(|&q| inverse[bi][q].iter().copied())
                .collect();
            if x.is_empty() {
                continue;
            }
            let mut i = 0;
            while i < blocks.len() {
                let intersection: BTreeSet<usize> =
                    blocks[i].intersection(&x).copied().collect();
                if intersection.is_empty() || intersection.len() == blocks[i].len() {
                    i += 1;
                    continue;
                }
                let difference: BTreeSet<usize> =
                    blocks[i].difference(&x).copied().collect();
                let old = std::mem::replace(&mut blocks[i], intersection.clone());
                blocks.push(difference.clone());

                if let Some(pos) = worklist.iter().position(|w| *w == old) {
                    worklist[pos] = intersection;
                    worklist.push_back(difference);
                } else if intersection.len() <= difference.len() {
                    worklist.push_back(intersection);
                } else {
                    worklist.push_back(difference);
                }
                i += 1;
            }
        }
    }

    let mut block_of = vec![0usize; total];
    for (bi, block) in blocks.iter().enumerate() {
        for &q in block {
            block_of[q] = bi;
        }
    }
    let sink_block = block_of[sink];
    let root_block = block_of[ROOT];

    let mut out = Automaton::new(MachineKind::Dfa);
    if root_block == sink_block {
        // empty language
        out.add_state(false);
        return out;
    }

    // breadth-first renumbering from the root block
    let mut new_id: Vec<Option<StateId>> = vec![None; blocks.len()];
    let mut queue = VecDeque::new();
    let rep = |bi: usize| -> usize { *blocks[bi].iter().next().expect("blocks are non-empty") };

    new_id[root_block] = Some(out.add_state(dfa.is_accept(rep(root_block))));
    queue.push_back(root_block);

    while let Some(bi) = queue.pop_front() {
        let src = new_id[bi].expect("queued blocks are numbered");
        let q = rep(bi);
        for &byte in &alphabet {
            let t = delta(q, byte);
            let tb = block_of[t];
            if tb == sink_block {
                continue;
            }
            let dst = match new_id[tb] {
                Some(d) => d,
                None => {
                    let d = out.add_state(dfa.is_accept(rep(tb)));
                    new_id[tb] = Some(d);
                    queue.push_back(tb);
                    d
                }
            };
            out.add_transition(src, dst, byte);
        }
    }

    out
}
