//! Greedy, non-overlapping longest-match scanning over the grammar DFA.

use super::{Automaton, ROOT};

/// What the grep front-end prints for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Whole line when it contains any match.
    #[default]
    Line,
    /// Only the matched substrings.
    MatchOnly,
    /// Whole line only when all of it matches.
    Exact,
}

/// Greedy longest-match scan: walk the DFA from each start offset, note the
/// last accepting position, and on a dead byte either claim the match and
/// resume one past it, or slide the window by one.
pub fn match_line<'a>(dfa: &Automaton, line: &'a str) -> Vec<&'a str> {
    let bytes = line.as_bytes();
    let mut matches = Vec::new();
    let mut start = 0;

    while start < bytes.len() {
        let mut q = ROOT;
        let mut last_accept: Option<usize> = None;
        let mut i = start;
        while i < bytes.len() {
            match dfa.step(q, bytes[i]) {
                Some(next) => {
                    q = next;
                    i += 1;
                    if dfa.is_accept(q) {
                        last_accept = Some(i);
                    }
                }
                None => break,
            }
        }
        match last_accept {
            Some(end) => {
                matches.push(&line[start..end]);
                start = end;
            }
            None => start += 1,
        }
    }
    matches
}

/// Whether the whole line is a single walk ending in an accept state.
pub fn whole_line_matches(dfa: &Automaton, line: &str) -> bool {
    !line.is_empty() && dfa.accepts(line.as_bytes())
}
