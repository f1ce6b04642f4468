//! Grammar-engine integration: matcher, codec and dot round trips.

use wlncrab::fsm::{self, match_line, whole_line_matches, wln_dfa};
use wlncrab::zip::{self, codec_automaton};
use wlncrab::WlnError;

#[test]
fn grep_counts_three_valid_lines() {
    let dfa = wln_dfa(true);
    let input = "L6TJ\n1X28P2X1\nT6NJ\n";
    let total: usize = input.lines().map(|l| match_line(&dfa, l).len()).sum();
    assert_eq!(total, 3);
    // and each line matches in full
    for line in input.lines() {
        assert_eq!(match_line(&dfa, line), vec![line]);
        assert!(whole_line_matches(&dfa, line));
    }
}

#[test]
fn grep_skips_invalid_lines() {
    let dfa = wln_dfa(true);
    assert!(match_line(&dfa, "@@!!").is_empty());
    assert!(!whole_line_matches(&dfa, "L6TJ extra junk"));
}

#[test]
fn codec_round_trips_the_scenario_string() {
    let machine = codec_automaton(&wln_dfa(true));
    let bits = zip::compress(&machine, b"L6TJ\n").unwrap();
    let back = zip::decompress(&machine, &bits).unwrap();
    assert_eq!(back, b"L6TJ\n");
}

#[test]
fn codec_round_trips_a_corpus() {
    let machine = codec_automaton(&wln_dfa(true));
    let corpus = "1\nQ2\n1V1\nL6J\nT6NJ\nL66J\n1X28P2X1\nL6TJ\nQSWQ\n1Y1&1\n";
    let bits = zip::compress(&machine, corpus.as_bytes()).unwrap();
    let back = zip::decompress(&machine, &bits).unwrap();
    assert_eq!(back, corpus.as_bytes());
}

#[test]
fn codec_is_deterministic_between_sessions() {
    let machine = codec_automaton(&wln_dfa(true));
    let a = zip::compress(&machine, b"T6NJ\nT6NJ\n").unwrap();
    let b = zip::compress(&machine, b"T6NJ\nT6NJ\n").unwrap();
    assert_eq!(a, b);
}

#[test]
fn codec_rejects_non_grammar_input() {
    let machine = codec_automaton(&wln_dfa(true));
    assert_eq!(
        zip::compress(&machine, b"hello\n"),
        Err(WlnError::NotInLanguage { pos: 0, byte: b'h' })
    );
}

#[test]
fn unminimized_and_minimized_machines_agree() {
    let full = wln_dfa(false);
    let min = wln_dfa(true);
    assert!(min.num_states() <= full.num_states());
    let probes = [
        "L6TJ", "T6NJ", "L66J", "1V1", "Q2", "1", "L6J A1", "-NA- &G", "R", "L-666-J", "", "L6",
        "J", "junk",
    ];
    for p in probes {
        assert_eq!(
            full.accepts(p.as_bytes()),
            min.accepts(p.as_bytes()),
            "disagreement on {:?}",
            p
        );
    }
}

#[test]
fn dot_dump_feeds_the_compressor() {
    // the wlngrep --dump → smizip pipeline: serialize the minimized DFA,
    // parse it back, and compress against the parsed copy
    let dfa = wln_dfa(true);
    let text = fsm::dot::to_dot(&dfa);
    let parsed = fsm::dot::from_dot(&text).unwrap();
    let machine = codec_automaton(&parsed);
    let bits = zip::compress(&machine, b"L6TJ\nT6NJ\n").unwrap();
    let back = zip::decompress(&machine, &bits).unwrap();
    assert_eq!(back, b"L6TJ\nT6NJ\n");
}
