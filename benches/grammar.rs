use criterion::{black_box, criterion_group, criterion_main, Criterion};

use wlncrab::fsm::{determinize, match_line, minimize, wln_dfa, wln_nfa};
use wlncrab::zip::{codec_automaton, compress, decompress};

fn bench_construction(c: &mut Criterion) {
    c.bench_function("determinize", |b| {
        let nfa = wln_nfa();
        b.iter(|| black_box(determinize(&nfa)))
    });
    c.bench_function("minimize", |b| {
        let dfa = determinize(&wln_nfa());
        b.iter(|| black_box(minimize(&dfa)))
    });
}

fn bench_matching(c: &mut Criterion) {
    let dfa = wln_dfa(true);
    let line = "1X28P2X1 junk L6TJ more junk T6NJ";
    c.bench_function("greedy_match_line", |b| {
        b.iter(|| black_box(match_line(&dfa, black_box(line))))
    });
}

fn bench_codec(c: &mut Criterion) {
    let machine = codec_automaton(&wln_dfa(true));
    let corpus: String = "L6TJ\nT6NJ\nL66J\n1V1\nQ2\n1X28P2X1\n".repeat(32);
    c.bench_function("ppm_compress", |b| {
        b.iter(|| black_box(compress(&machine, black_box(corpus.as_bytes())).unwrap()))
    });
    let bits = compress(&machine, corpus.as_bytes()).unwrap();
    c.bench_function("ppm_decompress", |b| {
        b.iter(|| black_box(decompress(&machine, black_box(&bits)).unwrap()))
    });
}

criterion_group!(benches, bench_construction, bench_matching, bench_codec);
criterion_main!(benches);
