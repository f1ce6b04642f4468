//! The WLN grammar automaton, specified by hand as an NFA.
//!
//! States mirror the notation's shape: open chain symbols and digit runs,
//! branch pops, `-XX-` element escapes, ion and charge suffixes, benzene
//! `R`, ring descriptors (sizes, big-ring `-nnn-`, poly/multicyclic locant
//! lists, fusion pairs, heteroatoms, aromaticity marks) and inline rings.
//! Character-range transitions are spelled as explicit byte loops; the
//! letter exclusion sets differ per state on purpose.

use super::{determinize, minimize, Automaton, MachineKind};

fn letters() -> impl Iterator<Item = u8> {
    b'A'..=b'Z'
}

fn letters_except(excluded: &'static [u8]) -> impl Iterator<Item = u8> {
    letters().filter(move |b| !excluded.contains(b))
}

/// Build the WLN grammar NFA.
pub fn wln_nfa() -> Automaton {
    let mut m = Automaton::new(MachineKind::Nfa);
    let root = m.add_state(false);

    let first_allowed = m.add_state(true);
    let digits = m.add_state(true);

    // digit runs cannot open with zero
    for ch in b'1'..=b'9' {
        m.add_transition(root, digits, ch);
        m.add_transition(first_allowed, digits, ch);
    }
    for ch in b'0'..=b'9' {
        m.add_transition(digits, digits, ch);
    }

    for ch in letters_except(b"LTDJAUR") {
        m.add_transition(root, first_allowed, ch);
        m.add_transition(first_allowed, first_allowed, ch);
        m.add_transition(digits, first_allowed, ch);
    }

    // branch pops; repeated pops allowed
    let branch = m.add_state(true);
    m.add_transition(first_allowed, branch, b'&');
    m.add_transition(branch, branch, b'&');
    m.add_transition(digits, branch, b'&');

    for ch in letters_except(b"LTDJAUHR") {
        m.add_transition(branch, first_allowed, ch);
    }
    for ch in b'1'..=b'9' {
        m.add_transition(branch, digits, ch);
    }

    // unsaturations; not accepting on their own
    let db_only = m.add_state(false);
    m.add_transition(db_only, db_only, b'U');
    m.add_transition(first_allowed, db_only, b'U');
    m.add_transition(digits, db_only, b'U');
    m.add_transition(branch, db_only, b'U');

    for ch in letters_except(b"LTDJAUHCR") {
        m.add_transition(db_only, first_allowed, ch);
    }
    for ch in b'1'..=b'9' {
        m.add_transition(db_only, digits, ch);
    }

    // dash escapes: two-letter elements and hypervalent singles
    let element_dash_start = m.add_state(false);
    let element_dash_end = m.add_state(true);

    m.add_transition(root, element_dash_start, b'-');
    m.add_transition(first_allowed, element_dash_start, b'-');
    m.add_transition(db_only, element_dash_start, b'-');
    m.add_transition(digits, element_dash_start, b'-');
    m.add_transition(branch, element_dash_start, b'-');

    let char_1 = m.add_state(false);
    let char_2 = m.add_state(false);
    for ch in letters() {
        m.add_transition(element_dash_start, char_1, ch);
        m.add_transition(char_1, char_2, ch);
    }
    m.add_transition(char_2, element_dash_end, b'-');

    let hypo_char = m.add_state(false);
    for ch in *b"PSEFGI" {
        m.add_transition(element_dash_start, hypo_char, ch);
    }
    m.add_transition(hypo_char, element_dash_end, b'-');

    for ch in letters_except(b"LTDJAUR") {
        m.add_transition(element_dash_end, first_allowed, ch);
    }
    for ch in b'1'..=b'9' {
        m.add_transition(element_dash_end, digits, ch);
    }
    m.add_transition(element_dash_end, db_only, b'U');
    m.add_transition(element_dash_end, branch, b'&');

    // ions: ` &` opens another component
    let ion_space = m.add_state(false);
    let ion_ampersand = m.add_state(false);
    m.add_transition(ion_space, ion_ampersand, b'&');

    m.add_transition(first_allowed, ion_space, b' ');
    m.add_transition(digits, ion_space, b' ');
    m.add_transition(branch, ion_space, b' ');
    m.add_transition(element_dash_end, ion_space, b' ');

    for ch in letters_except(b"LTDJAUH") {
        m.add_transition(ion_ampersand, first_allowed, ch);
    }
    for ch in b'1'..=b'9' {
        m.add_transition(ion_ampersand, digits, ch);
    }
    m.add_transition(ion_ampersand, element_dash_start, b'-');

    // charge suffix `n/m`
    let charge_start = m.add_state(false);
    let charge_end = m.add_state(true);
    let charge_slash = m.add_state(false);

    for ch in b'1'..=b'9' {
        m.add_transition(ion_ampersand, charge_start, ch);
    }
    for ch in b'0'..=b'9' {
        m.add_transition(charge_start, charge_start, ch);
    }
    m.add_transition(charge_start, charge_slash, b'/');
    for ch in b'1'..=b'9' {
        m.add_transition(charge_slash, charge_end, ch);
    }
    for ch in b'0'..=b'9' {
        m.add_transition(charge_end, charge_end, ch);
    }
    m.add_transition(charge_end, ion_space, b' ');

    // benzene shorthand
    let benzene = m.add_state(true);
    m.add_transition(root, benzene, b'R');
    m.add_transition(benzene, benzene, b'R');
    m.add_transition(first_allowed, benzene, b'R');
    m.add_transition(digits, benzene, b'R');
    m.add_transition(db_only, benzene, b'R');
    m.add_transition(element_dash_end, benzene, b'R');
    m.add_transition(branch, benzene, b'R');

    for ch in letters_except(b"LTDJAUH") {
        m.add_transition(benzene, first_allowed, ch);
    }
    for ch in b'1'..=b'9' {
        m.add_transition(benzene, digits, ch);
    }
    m.add_transition(benzene, branch, b'&');
    m.add_transition(benzene, element_dash_start, b'-');
    m.add_transition(benzene, db_only, b'U');
    m.add_transition(benzene, ion_space, b' ');

    // chain locants
    let locant_space = m.add_state(false);
    let locant_ch = m.add_state(true);

    m.add_transition(benzene, locant_space, b' ');
    for ch in letters() {
        m.add_transition(locant_space, locant_ch, ch);
    }
    m.add_transition(locant_space, locant_ch, b'0'); // metallocene

    for ch in letters_except(b"LTDJAUH") {
        m.add_transition(locant_ch, first_allowed, ch);
    }
    for ch in b'1'..=b'9' {
        m.add_transition(locant_ch, digits, ch);
    }
    m.add_transition(locant_ch, element_dash_start, b'-');
    m.add_transition(locant_ch, branch, b'&');
    m.add_transition(locant_ch, db_only, b'U');

    m.add_transition(first_allowed, locant_space, b' ');
    m.add_transition(digits, locant_space, b' ');
    m.add_transition(branch, locant_space, b' ');
    m.add_transition(element_dash_end, locant_space, b' ');

    // ring descriptors
    let open_ring = m.add_state(false);
    let close_ring = m.add_state(true);

    m.add_transition(root, open_ring, b'L');
    m.add_transition(root, open_ring, b'T');

    m.add_transition(close_ring, locant_space, b' ');
    m.add_transition(close_ring, ion_space, b' ');
    m.add_transition(ion_ampersand, open_ring, b'L');
    m.add_transition(ion_ampersand, open_ring, b'T');
    m.add_transition(close_ring, close_ring, b'&');

    let ring_digits = m.add_state(false);
    for ch in b'0'..=b'9' {
        m.add_transition(ring_digits, ring_digits, ch);
    }
    for ch in b'1'..=b'9' {
        m.add_transition(open_ring, ring_digits, ch);
    }
    m.add_transition(ring_digits, close_ring, b'J');

    // big rings: L-666-J
    let big_ring_dash_open = m.add_state(false);
    let big_ring_dash_close = m.add_state(false);
    let big_ring_digits = m.add_state(false);

    m.add_transition(open_ring, big_ring_dash_open, b'-');
    for ch in b'1'..=b'9' {
        m.add_transition(big_ring_dash_open, big_ring_digits, ch);
    }
    for ch in b'0'..=b'9' {
        m.add_transition(big_ring_digits, big_ring_digits, ch);
    }
    m.add_transition(big_ring_digits, big_ring_dash_close, b'-');
    for ch in b'1'..=b'9' {
        m.add_transition(big_ring_dash_close, ring_digits, ch);
    }
    m.add_transition(ring_digits, big_ring_dash_open, b'-');
    m.add_transition(big_ring_dash_close, big_ring_dash_open, b'-');
    m.add_transition(big_ring_dash_close, close_ring, b'J');

    // polycyclic ring nodes
    let digit_space = m.add_state(false);
    let digit_locant = m.add_state(false);

    m.add_transition(digit_locant, digit_locant, b'&');
    m.add_transition(digit_locant, digit_locant, b'-');
    m.add_transition(digit_locant, digit_space, b' ');
    m.add_transition(open_ring, digit_space, b' ');
    for ch in letters() {
        m.add_transition(digit_space, digit_locant, ch);
    }
    for ch in b'1'..=b'9' {
        m.add_transition(digit_locant, ring_digits, ch);
    }
    m.add_transition(digit_locant, big_ring_dash_open, b'-');
    m.add_transition(ring_digits, digit_space, b' ');
    m.add_transition(big_ring_dash_close, digit_space, b' ');

    // multicyclic locant lists
    let multi_space = m.add_state(false);
    let multi_digit = m.add_state(false);
    let multi_locants = m.add_state(false);

    m.add_transition(digit_locant, multi_space, b' ');
    m.add_transition(ring_digits, multi_space, b' ');
    m.add_transition(big_ring_dash_close, multi_space, b' ');
    for ch in b'1'..=b'9' {
        m.add_transition(multi_space, multi_digit, ch);
    }
    for ch in letters() {
        m.add_transition(multi_digit, multi_locants, ch);
        m.add_transition(multi_locants, multi_locants, ch);
    }

    let multi_size_space = m.add_state(false);
    let multi_size = m.add_state(false);

    m.add_transition(multi_locants, multi_locants, b'&');
    m.add_transition(multi_locants, multi_locants, b'-'); // broken locant
    m.add_transition(multi_locants, multi_size_space, b' ');
    for ch in letters() {
        m.add_transition(multi_size_space, multi_size, ch);
    }
    m.add_transition(multi_size, multi_size, b'&');
    m.add_transition(multi_size, close_ring, b'J');

    // fusion pair notation L6/AB
    let pair_slash = m.add_state(false);
    let pair_loc_a = m.add_state(false);
    let pair_loc_b = m.add_state(false);

    m.add_transition(ring_digits, pair_slash, b'/');
    m.add_transition(big_ring_dash_close, pair_slash, b'/');
    for ch in letters() {
        m.add_transition(pair_slash, pair_loc_a, ch);
    }
    m.add_transition(pair_loc_a, pair_loc_a, b'&');
    m.add_transition(pair_loc_a, pair_loc_a, b'-');
    for ch in letters() {
        m.add_transition(pair_loc_a, pair_loc_b, ch);
    }
    m.add_transition(pair_loc_b, pair_loc_b, b'&');
    m.add_transition(pair_loc_b, pair_loc_b, b'-');
    m.add_transition(pair_loc_b, pair_slash, b'/');
    m.add_transition(pair_loc_b, digit_space, b' ');
    m.add_transition(pair_loc_b, multi_space, b' ');

    // ring heteroatoms
    let hetero_space = m.add_state(false);
    let hetero_locant = m.add_state(false);
    let hetero_atom = m.add_state(false);

    for ch in letters_except(b"LTDJA") {
        m.add_transition(hetero_locant, hetero_atom, ch);
        m.add_transition(hetero_atom, hetero_atom, ch);
        m.add_transition(ring_digits, hetero_atom, ch);
        m.add_transition(big_ring_dash_close, hetero_atom, ch);
    }
    m.add_transition(hetero_atom, close_ring, b'J');
    m.add_transition(hetero_atom, hetero_space, b' ');
    m.add_transition(ring_digits, hetero_space, b' ');
    m.add_transition(big_ring_dash_close, hetero_space, b' ');
    for ch in letters() {
        m.add_transition(hetero_space, hetero_locant, ch);
    }
    m.add_transition(hetero_locant, hetero_locant, b'&');
    m.add_transition(multi_size, hetero_space, b' ');
    m.add_transition(hetero_locant, hetero_space, b' ');

    // aromaticity marks before the closing J
    let aromatics = m.add_state(false);
    m.add_transition(aromatics, aromatics, b'&');
    m.add_transition(aromatics, aromatics, b'T');
    m.add_transition(aromatics, close_ring, b'J');
    m.add_transition(big_ring_dash_close, aromatics, b'&');
    m.add_transition(big_ring_dash_close, aromatics, b'T');
    m.add_transition(ring_digits, aromatics, b'&');
    m.add_transition(ring_digits, aromatics, b'T');
    m.add_transition(hetero_atom, aromatics, b'&');
    m.add_transition(hetero_atom, aromatics, b'T');
    m.add_transition(multi_size, aromatics, b' ');
    m.add_transition(multi_size, aromatics, b'T');
    m.add_transition(multi_size, aromatics, b'&');

    // inline rings off a chain; `&` allows spiro
    let inline_ring = m.add_state(false);
    let inline_space = m.add_state(false);
    let inline_locant = m.add_state(false);

    m.add_transition(inline_ring, inline_ring, b'&');
    m.add_transition(first_allowed, inline_ring, b'-');
    m.add_transition(element_dash_end, inline_ring, b'-');
    m.add_transition(digits, inline_ring, b'-');
    m.add_transition(branch, inline_ring, b'-');
    m.add_transition(db_only, inline_ring, b'-');
    m.add_transition(locant_ch, inline_ring, b'-');
    m.add_transition(inline_ring, inline_space, b' ');
    for ch in letters() {
        m.add_transition(inline_space, inline_locant, ch);
    }
    m.add_transition(inline_space, inline_locant, b'0'); // metallocene
    m.add_transition(inline_locant, inline_locant, b'&');
    m.add_transition(inline_locant, open_ring, b'L');
    m.add_transition(inline_locant, open_ring, b'T');

    m
}

/// Determinized (and by default minimized) grammar DFA with its jump table.
pub fn wln_dfa(minimal: bool) -> Automaton {
    let nfa = wln_nfa();
    let mut dfa = determinize(&nfa);
    if minimal {
        dfa = minimize(&dfa);
    }
    dfa.init_jump_table();
    tracing::debug!(
        nfa_states = nfa.num_states(),
        dfa_states = dfa.num_states(),
        minimal,
        "grammar automaton built"
    );
    dfa
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCEPTED: &[&str] = &[
        "1",
        "Q2",
        "1V1",
        "1Y1&1",
        "1X1&1&1",
        "Z2",
        "G2",
        "1NW",
        "QSWQ",
        "SWO&O",
        "L6J",
        "L6TJ",
        "T6NJ",
        "T5OJ",
        "L66J",
        "1X28P2X1",
        "L6J A1",
        "L6J AQH",
        "T6NJ BQ",
        "-NA- &G",
        "L6J &-NA-",
        "2U2",
        "1UU1",
        "R",
        "RR",
        "R B1",
        "L-666-J",
        "L6 B666J",
        "T6N DNJ",
        "L66&TJ",
        "L6J &1 &Q1",
        "QR",
        "-SI-1",
        "1-SI-1",
        "L5TJ",
        "L6J A",
    ];

    const REJECTED: &[&str] = &[
        "",
        "L6",
        "J",
        "A",
        "0",
        "10A0",
        "L0J",
        " 1",
        "1 ",
        "U",
        "1U",
        "-",
        "-N-",
        "-NAJ",
        "T6NJ ",
        "1//",
        "abc",
        "l6j",
    ];

    #[test]
    fn nfa_accepts_corpus() {
        let nfa = wln_nfa();
        for s in ACCEPTED {
            assert!(nfa.accepts(s.as_bytes()), "NFA rejected {:?}", s);
        }
    }

    #[test]
    fn nfa_rejects_corpus() {
        let nfa = wln_nfa();
        for s in REJECTED {
            assert!(!nfa.accepts(s.as_bytes()), "NFA accepted {:?}", s);
        }
    }

    #[test]
    fn dfa_is_deterministic() {
        assert!(wln_dfa(false).is_deterministic());
        assert!(wln_dfa(true).is_deterministic());
    }

    #[test]
    fn determinization_preserves_language() {
        let nfa = wln_nfa();
        let dfa = wln_dfa(false);
        for s in ACCEPTED.iter().chain(REJECTED) {
            assert_eq!(
                nfa.accepts(s.as_bytes()),
                dfa.accepts(s.as_bytes()),
                "NFA and DFA disagree on {:?}",
                s
            );
        }
    }

    #[test]
    fn minimization_preserves_language() {
        let dfa = wln_dfa(false);
        let min = wln_dfa(true);
        assert!(min.num_states() <= dfa.num_states());
        for s in ACCEPTED.iter().chain(REJECTED) {
            assert_eq!(
                dfa.accepts(s.as_bytes()),
                min.accepts(s.as_bytes()),
                "minimal DFA disagrees on {:?}",
                s
            );
        }
    }
}
