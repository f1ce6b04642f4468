//! Finite-state machinery for the WLN grammar: a shared automaton type,
//! the hand-built grammar NFA, subset construction, Hopcroft minimization,
//! greedy matching and dot round-tripping.

mod determinize;
pub mod dot;
mod grammar;
mod matcher;
mod minimize;

pub use determinize::determinize;
pub use grammar::{wln_dfa, wln_nfa};
pub use matcher::{match_line, whole_line_matches, MatchMode};
pub use minimize::minimize;

pub type StateId = usize;

/// Root state of every automaton built here.
pub const ROOT: StateId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineKind {
    Nfa,
    Dfa,
}

#[derive(Debug, Clone, Default)]
pub struct State {
    pub accept: bool,
    /// Sorted by (byte, target); an NFA may hold several targets per byte.
    transitions: Vec<(u8, StateId)>,
}

#[derive(Debug, Clone)]
pub struct Automaton {
    kind: MachineKind,
    states: Vec<State>,
    /// Dense per-state jump table, byte → state + 1 (0 = no transition).
    /// Only built for DFAs.
    jump: Vec<Box<[u32; 256]>>,
}

impl Automaton {
    pub fn new(kind: MachineKind) -> Self {
        Self { kind, states: Vec::new(), jump: Vec::new() }
    }

    pub fn kind(&self) -> MachineKind {
        self.kind
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn add_state(&mut self, accept: bool) -> StateId {
        self.states.push(State { accept, transitions: Vec::new() });
        self.states.len() - 1
    }

    pub fn is_accept(&self, state: StateId) -> bool {
        self.states[state].accept
    }

    pub fn set_accept(&mut self, state: StateId, accept: bool) {
        self.states[state].accept = accept;
    }

    /// Add a transition; exact duplicates are ignored.
    pub fn add_transition(&mut self, src: StateId, dst: StateId, byte: u8) {
        let t = &mut self.states[src].transitions;
        match t.binary_search(&(byte, dst)) {
            Ok(_) => {}
            Err(at) => t.insert(at, (byte, dst)),
        }
        if let Some(row) = self.jump.get_mut(src) {
            row[byte as usize] = dst as u32 + 1;
        }
    }

    pub fn transitions(&self, state: StateId) -> &[(u8, StateId)] {
        &self.states[state].transitions
    }

    /// Distinct bytes used anywhere in the machine, ascending.
    pub fn alphabet(&self) -> Vec<u8> {
        let mut seen = [false; 256];
        for s in &self.states {
            for &(b, _) in &s.transitions {
                seen[b as usize] = true;
            }
        }
        (0u16..256).filter(|&b| seen[b as usize]).map(|b| b as u8).collect()
    }

    pub fn is_deterministic(&self) -> bool {
        self.states.iter().all(|s| {
            s.transitions.windows(2).all(|w| w[0].0 != w[1].0)
        })
    }

    /// Build the dense 256-entry jump table per state. DFA only.
    pub fn init_jump_table(&mut self) {
        debug_assert!(self.is_deterministic());
        self.jump = self
            .states
            .iter()
            .map(|s| {
                let mut row = Box::new([0u32; 256]);
                for &(b, dst) in &s.transitions {
                    row[b as usize] = dst as u32 + 1;
                }
                row
            })
            .collect();
    }

    /// Single deterministic step. Uses the jump table when present.
    pub fn step(&self, state: StateId, byte: u8) -> Option<StateId> {
        if let Some(row) = self.jump.get(state) {
            let v = row[byte as usize];
            return (v != 0).then(|| (v - 1) as usize);
        }
        self.states[state]
            .transitions
            .iter()
            .find(|&&(b, _)| b == byte)
            .map(|&(_, dst)| dst)
    }

    /// All successors on `byte` (NFA view).
    pub fn successors(&self, state: StateId, byte: u8) -> impl Iterator<Item = StateId> + '_ {
        self.states[state]
            .transitions
            .iter()
            .filter(move |&&(b, _)| b == byte)
            .map(|&(_, dst)| dst)
    }

    /// Whether the machine accepts `input` from the root. Works for both
    /// kinds; the NFA walk carries a state set.
    pub fn accepts(&self, input: &[u8]) -> bool {
        match self.kind {
            MachineKind::Dfa => {
                let mut q = ROOT;
                for &b in input {
                    match self.step(q, b) {
                        Some(next) => q = next,
                        None => return false,
                    }
                }
                self.is_accept(q)
            }
            MachineKind::Nfa => {
                let mut current: Vec<StateId> = vec![ROOT];
                for &b in input {
                    let mut next: Vec<StateId> = current
                        .iter()
                        .flat_map(|&q| self.successors(q, b))
                        .collect();
                    next.sort_unstable();
                    next.dedup();
                    if next.is_empty() {
                        return false;
                    }
                    current = next;
                }
                current.iter().any(|&q| self.is_accept(q))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state() -> Automaton {
        let mut a = Automaton::new(MachineKind::Dfa);
        let root = a.add_state(false);
        let end = a.add_state(true);
        a.add_transition(root, end, b'x');
        a.add_transition(end, end, b'y');
        a
    }

    #[test]
    fn step_and_accept() {
        let a = two_state();
        assert!(a.accepts(b"x"));
        assert!(a.accepts(b"xyy"));
        assert!(!a.accepts(b"y"));
        assert!(!a.accepts(b""));
    }

    #[test]
    fn jump_table_agrees_with_lists() {
        let mut a = two_state();
        a.init_jump_table();
        for q in 0..a.num_states() {
            for b in 0..=255u8 {
                let scanned = a
                    .transitions(q)
                    .iter()
                    .find(|&&(tb, _)| tb == b)
                    .map(|&(_, d)| d);
                assert_eq!(a.step(q, b), scanned);
            }
        }
    }

    #[test]
    fn duplicate_transitions_collapse() {
        let mut a = Automaton::new(MachineKind::Nfa);
        let root = a.add_state(false);
        let s = a.add_state(true);
        a.add_transition(root, s, b'a');
        a.add_transition(root, s, b'a');
        assert_eq!(a.transitions(root).len(), 1);
    }

    #[test]
    fn alphabet_is_sorted_and_distinct() {
        let a = two_state();
        assert_eq!(a.alphabet(), vec![b'x', b'y']);
    }
}
