//! Dot serialization of automata, and the reader `smizip` uses to load a
//! grammar machine back from disk.
//!
//! Transition labels are comma-separated byte tokens: a printable
//! character stands for itself, anything awkward is spelled `0xNN`. Accept
//! states render as double circles. State ids are the node names, root
//! first.

use std::fmt;

use super::{Automaton, MachineKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotError {
    BadStateId { line: usize },
    BadLabel { line: usize, token: String },
    NoStates,
}

impl fmt::Display for DotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadStateId { line } => write!(f, "unparsable state id on line {}", line),
            Self::BadLabel { line, token } => {
                write!(f, "unparsable label token '{}' on line {}", token, line)
            }
            Self::NoStates => write!(f, "dot file declares no states"),
        }
    }
}

impl std::error::Error for DotError {}

fn token_for(byte: u8) -> String {
    match byte {
        b',' | b'"' | b'\\' => format!("0x{:02x}", byte),
        33..=126 => (byte as char).to_string(),
        _ => format!("0x{:02x}", byte),
    }
}

fn byte_for(token: &str) -> Option<u8> {
    if let Some(hex) = token.strip_prefix("0x") {
        return u8::from_str_radix(hex, 16).ok();
    }
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Some(c as u8),
        _ => None,
    }
}

/// Render the automaton as graphviz dot.
pub fn to_dot(a: &Automaton) -> String {
    use std::collections::BTreeMap;
    use std::fmt::Write;

    let mut out = String::new();
    out.push_str("digraph FSM {\n");
    out.push_str("  rankdir = LR;\n");
    for q in 0..a.num_states() {
        let shape = if a.is_accept(q) { "doublecircle" } else { "circle" };
        let _ = writeln!(out, "  {} [shape={}];", q, shape);
    }
    for q in 0..a.num_states() {
        let mut grouped: BTreeMap<usize, Vec<u8>> = BTreeMap::new();
        for &(byte, dst) in a.transitions(q) {
            grouped.entry(dst).or_default().push(byte);
        }
        for (dst, bytes) in grouped {
            let label: Vec<String> = bytes.iter().map(|&b| token_for(b)).collect();
            let _ = writeln!(out, "  {} -> {} [label=\"{}\"];", q, dst, label.join(","));
        }
    }
    out.push_str("}\n");
    out
}

/// Parse an automaton back from the dot shape written by [`to_dot`].
pub fn from_dot(text: &str) -> Result<Automaton, DotError> {
    struct Decl {
        id: usize,
        accept: bool,
    }
    let mut decls: Vec<Decl> = Vec::new();
    let mut trans: Vec<(usize, usize, u8)> = Vec::new();

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty()
            || line.starts_with("digraph")
            || line.starts_with("rankdir")
            || line.starts_with('}')
        {
            continue;
        }
        if let Some((ends, rest)) = line.split_once("->") {
            let src: usize = ends
                .trim()
                .parse()
                .map_err(|_| DotError::BadStateId { line: lineno + 1 })?;
            let (dst_str, label) = rest
                .split_once('[')
                .ok_or(DotError::BadStateId { line: lineno + 1 })?;
            let dst: usize = dst_str
                .trim()
                .parse()
                .map_err(|_| DotError::BadStateId { line: lineno + 1 })?;
            let label = label
                .split('"')
                .nth(1)
                .ok_or(DotError::BadStateId { line: lineno + 1 })?;
            for token in label.split(',') {
                let byte = byte_for(token).ok_or_else(|| DotError::BadLabel {
                    line: lineno + 1,
                    token: token.to_string(),
                })?;
                trans.push((src, dst, byte));
            }
        } else if let Some((id_str, attrs)) = line.split_once('[') {
            let id: usize = id_str
                .trim()
                .parse()
                .map_err(|_| DotError::BadStateId { line: lineno + 1 })?;
            decls.push(Decl { id, accept: attrs.contains("doublecircle") });
        }
    }

    if decls.is_empty() {
        return Err(DotError::NoStates);
    }
    let num_states = decls.iter().map(|d| d.id).max().unwrap_or(0) + 1;
    let mut accept = vec![false; num_states];
    for d in &decls {
        accept[d.id] = d.accept;
    }

    let mut a = Automaton::new(MachineKind::Nfa);
    for &acc in &accept {
        a.add_state(acc);
    }
    for (src, dst, byte) in trans {
        if src >= num_states || dst >= num_states {
            return Err(DotError::NoStates);
        }
        a.add_transition(src, dst, byte);
    }

    if a.is_deterministic() {
        let mut d = Automaton::new(MachineKind::Dfa);
        for q in 0..a.num_states() {
            d.add_state(a.is_accept(q));
        }
        for q in 0..a.num_states() {
            for &(byte, dst) in a.transitions(q) {
                d.add_transition(q, dst, byte);
            }
        }
        d.init_jump_table();
        return Ok(d);
    }
    Ok(a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::wln_dfa;

    #[test]
    fn round_trip_preserves_language() {
        let dfa = wln_dfa(true);
        let text = to_dot(&dfa);
        let back = from_dot(&text).unwrap();
        assert_eq!(back.kind(), MachineKind::Dfa);
        assert_eq!(back.num_states(), dfa.num_states());
        for s in ["L6TJ", "T6NJ", "Q2", "1V1", "L66J", "", "L6", "abc"] {
            assert_eq!(
                dfa.accepts(s.as_bytes()),
                back.accepts(s.as_bytes()),
                "disagreement on {:?}",
                s
            );
        }
    }

    #[test]
    fn awkward_bytes_are_escaped() {
        let mut a = Automaton::new(MachineKind::Dfa);
        let root = a.add_state(false);
        let end = a.add_state(true);
        a.add_transition(root, end, b' ');
        a.add_transition(root, end, b'\n');
        a.add_transition(root, end, b',');
        a.add_transition(root, end, b'"');
        let text = to_dot(&a);
        let back = from_dot(&text).unwrap();
        for b in [b' ', b'\n', b',', b'"'] {
            assert!(back.accepts(&[b]), "byte {:#x} lost in round trip", b);
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(from_dot("not dot at all").is_err());
        assert!(from_dot("").is_err());
    }
}
