//! Classical subset construction.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{Automaton, MachineKind, StateId, ROOT};

/// Convert an NFA to an equivalent DFA. State numbering is deterministic
/// (depth-first over byte-ordered transition groups).
pub fn determinize(nfa: &Automaton) -> Automaton {
    let mut dfa = Automaton::new(MachineKind::Dfa);
    let mut index: HashMap<Vec<StateId>, StateId> = HashMap::new();

    let start = vec![ROOT];
    let d0 = dfa.add_state(nfa.is_accept(ROOT));
    index.insert(start.clone(), d0);
    let mut worklist = vec![start];

    while let Some(subset) = worklist.pop() {
        let src = index[&subset];

        let mut targets: BTreeMap<u8, BTreeSet<StateId>> = BTreeMap::new();
        for &q in &subset {
            for &(byte, dst) in nfa.transitions(q) {
                targets.entry(byte).or_default().insert(dst);
            }
        }

        for (byte, target_set) in targets {
            let key: Vec<StateId> = target_set.into_iter().collect();
            let dst = match index.get(&key) {
                Some(&d) => d,
                None => {
                    let accept = key.iter().any(|&q| nfa.is_accept(q));
                    let d = dfa.add_state(accept);
                    index.insert(key.clone(), d);
                    worklist.push(key);
                    d
                }
            };
            dfa.add_transition(src, dst, byte);
        }
    }

    dfa
}

#[cfg(test)]
mod tests {
    use super::*;

    /// NFA for (a|ab): nondeterministic on 'a'.
    fn ambiguous_nfa() -> Automaton {
        let mut m = Automaton::new(MachineKind::Nfa);
        let root = m.add_state(false);
        let a_end = m.add_state(true);
        let a_mid = m.add_state(false);
        let ab_end = m.add_state(true);
        m.add_transition(root, a_end, b'a');
        m.add_transition(root, a_mid, b'a');
        m.add_transition(a_mid, ab_end, b'b');
        m
    }

    #[test]
    fn subset_construction_merges_branches() {
        let nfa = ambiguous_nfa();
        let dfa = determinize(&nfa);
        assert!(dfa.is_deterministic());
        for s in [&b"a"[..], b"ab"] {
            assert!(dfa.accepts(s));
        }
        for s in [&b""[..], b"b", b"aa", b"aba"] {
            assert!(!dfa.accepts(s));
        }
    }

    #[test]
    fn deterministic_numbering() {
        let a = determinize(&ambiguous_nfa());
        let b = determinize(&ambiguous_nfa());
        assert_eq!(a.num_states(), b.num_states());
        for q in 0..a.num_states() {
            assert_eq!(a.transitions(q), b.transitions(q));
            assert_eq!(a.is_accept(q), b.is_accept(q));
        }
    }
}
