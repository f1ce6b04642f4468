//! Grammar-aware compression: an adaptive arithmetic coder whose symbol
//! alphabet at every step is the outgoing transition set of the current
//! DFA state.
//!
//! The machine handed to [`compress`]/[`decompress`] must already carry
//! the record separators added by [`codec_automaton`]: every accept state
//! loops back to the root on `\n` and on the end-of-stream byte 127, and
//! the root accepts 127 so an empty stream terminates. Encoder and decoder
//! must use an identical machine and both start from uniform frequencies;
//! the bit stream itself carries no framing.

use crate::error::WlnError;
use crate::fsm::{Automaton, MachineKind, StateId, ROOT};

/// End-of-stream marker encoded after the final byte.
pub const EOS: u8 = 127;

const CODE_BITS: u32 = 32;
const TOP: u64 = 1 << CODE_BITS;
const HALF: u64 = TOP / 2;
const QUARTER: u64 = TOP / 4;
const THREE_QUARTERS: u64 = 3 * QUARTER;
/// Rescale threshold for one state's frequency total.
const MAX_TOTAL: u64 = 1 << 16;

/// Add the synthetic newline/EOS transitions the codec needs.
pub fn codec_automaton(dfa: &Automaton) -> Automaton {
    debug_assert_eq!(dfa.kind(), MachineKind::Dfa);
    let mut m = dfa.clone();
    for q in 0..m.num_states() {
        if m.is_accept(q) {
            m.add_transition(q, ROOT, b'\n');
            m.add_transition(q, ROOT, EOS);
        }
    }
    m.add_transition(ROOT, ROOT, EOS);
    m.init_jump_table();
    m
}

struct BitWriter {
    bytes: Vec<u8>,
    bit: u8,
}

impl BitWriter {
    fn new() -> Self {
        Self { bytes: Vec::new(), bit: 0 }
    }

    fn push(&mut self, one: bool) {
        if self.bit == 0 {
            self.bytes.push(0);
        }
        if one {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 0x80 >> self.bit;
        }
        self.bit = (self.bit + 1) % 8;
    }

    fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

struct BitReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Reads past the end as zeros; the EOS symbol stops the decoder
    /// before the padding can matter.
    fn next(&mut self) -> u64 {
        let byte = self.pos / 8;
        let bit = self.pos % 8;
        self.pos += 1;
        match self.bytes.get(byte) {
            Some(&b) => ((b >> (7 - bit)) & 1) as u64,
            None => 0,
        }
    }
}

/// Per-state adaptive frequency vectors, parallel to each state's sorted
/// transition list. Session state: reset between encodes.
struct PpmModel {
    freqs: Vec<Vec<u64>>,
}

impl PpmModel {
    fn new(dfa: &Automaton) -> Self {
        let freqs = (0..dfa.num_states())
            .map(|q| vec![1u64; dfa.transitions(q).len()])
            .collect();
        Self { freqs }
    }

    fn total(&self, q: StateId) -> u64 {
        self.freqs[q].iter().sum()
    }

    /// Cumulative interval of transition `i` in state `q`.
    fn interval(&self, q: StateId, i: usize) -> (u64, u64) {
        let low: u64 = self.freqs[q][..i].iter().sum();
        (low, low + self.freqs[q][i])
    }

    fn bump(&mut self, q: StateId, i: usize) {
        self.freqs[q][i] += 1;
        if self.total(q) >= MAX_TOTAL {
            for f in &mut self.freqs[q] {
                *f = (*f / 2).max(1);
            }
        }
    }
}

struct Encoder {
    low: u64,
    high: u64,
    pending: u32,
    out: BitWriter,
}

impl Encoder {
    fn new() -> Self {
        Self { low: 0, high: TOP - 1, pending: 0, out: BitWriter::new() }
    }

    fn emit(&mut self, one: bool) {
        self.out.push(one);
        for _ in 0..self.pending {
            self.out.push(!one);
        }
        self.pending = 0;
    }

    fn encode(&mut self, cum_low: u64, cum_high: u64, total: u64) {
        let range = self.high - self.low + 1;
        self.high = self.low + range * cum_high / total - 1;
        self.low += range * cum_low / total;
        loop {
            if self.high < HALF {
                self.emit(false);
            } else if self.low >= HALF {
                self.emit(true);
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= QUARTER && self.high < THREE_QUARTERS {
                self.pending += 1;
                self.low -= QUARTER;
                self.high -= QUARTER;
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
        }
    }

    fn finish(mut self) -> Vec<u8> {
        self.pending += 1;
        if self.low < QUARTER {
            self.emit(false);
        } else {
            self.emit(true);
        }
        self.out.into_bytes()
    }
}

struct Decoder<'a> {
    low: u64,
    high: u64,
    value: u64,
    input: BitReader<'a>,
}

impl<'a> Decoder<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        let mut input = BitReader::new(bytes);
        let mut value = 0u64;
        for _ in 0..CODE_BITS {
            value = (value << 1) | input.next();
        }
        Self { low: 0, high: TOP - 1, value, input }
    }

    fn target(&self, total: u64) -> u64 {
        let range = self.high - self.low + 1;
        ((self.value - self.low + 1) * total - 1) / range
    }

    fn consume(&mut self, cum_low: u64, cum_high: u64, total: u64) {
        let range = self.high - self.low + 1;
        self.high = self.low + range * cum_high / total - 1;
        self.low += range * cum_low / total;
        loop {
            if self.high < HALF {
                // nothing to subtract
            } else if self.low >= HALF {
                self.low -= HALF;
                self.high -= HALF;
                self.value -= HALF;
            } else if self.low >= QUARTER && self.high < THREE_QUARTERS {
                self.low -= QUARTER;
                self.high -= QUARTER;
                self.value -= QUARTER;
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
            self.value = (self.value << 1) | self.input.next();
        }
    }
}

fn transition_index(dfa: &Automaton, q: StateId, byte: u8) -> Option<usize> {
    dfa.transitions(q).iter().position(|&(b, _)| b == byte)
}

/// Encode `input` (newline-separated, grammar-accepted records) into a raw
/// bit stream. The machine must come from [`codec_automaton`].
pub fn compress(dfa: &Automaton, input: &[u8]) -> Result<Vec<u8>, WlnError> {
    let mut model = PpmModel::new(dfa);
    let mut enc = Encoder::new();
    let mut q = ROOT;

    for (pos, &byte) in input.iter().enumerate() {
        let i = transition_index(dfa, q, byte)
            .ok_or(WlnError::NotInLanguage { pos, byte })?;
        let (cum_low, cum_high) = model.interval(q, i);
        enc.encode(cum_low, cum_high, model.total(q));
        let (_, next) = dfa.transitions(q)[i];
        model.bump(q, i);
        q = next;
    }

    // end of stream: only legal at the root or an accept state
    let i = transition_index(dfa, q, EOS).ok_or(WlnError::NotInLanguage {
        pos: input.len(),
        byte: EOS,
    })?;
    let (cum_low, cum_high) = model.interval(q, i);
    enc.encode(cum_low, cum_high, model.total(q));
    Ok(enc.finish())
}

/// Decode a bit stream produced by [`compress`] with the same machine.
pub fn decompress(dfa: &Automaton, bits: &[u8]) -> Result<Vec<u8>, WlnError> {
    let mut model = PpmModel::new(dfa);
    let mut dec = Decoder::new(bits);
    let mut q = ROOT;
    let mut out = Vec::new();

    loop {
        let total = model.total(q);
        if total == 0 {
            return Err(WlnError::NotInLanguage { pos: out.len(), byte: 0 });
        }
        let target = dec.target(total);
        let mut acc = 0u64;
        let mut found = None;
        for (i, &f) in model.freqs[q].iter().enumerate() {
            if target < acc + f {
                found = Some((i, acc, acc + f));
                break;
            }
            acc += f;
        }
        let (i, cum_low, cum_high) =
            found.ok_or(WlnError::NotInLanguage { pos: out.len(), byte: 0 })?;
        dec.consume(cum_low, cum_high, total);
        let (byte, next) = dfa.transitions(q)[i];
        model.bump(q, i);
        q = next;
        if byte == EOS {
            break;
        }
        out.push(byte);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::wln_dfa;

    fn machine() -> Automaton {
        codec_automaton(&wln_dfa(true))
    }

    fn round_trip(m: &Automaton, text: &str) {
        let bits = compress(m, text.as_bytes()).unwrap();
        let back = decompress(m, &bits).unwrap();
        assert_eq!(back, text.as_bytes(), "round trip broke for {:?}", text);
    }

    #[test]
    fn bit_writer_reader_agree() {
        let mut w = BitWriter::new();
        let pattern = [true, false, true, true, false, false, true, false, true, true];
        for &b in &pattern {
            w.push(b);
        }
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        for &b in &pattern {
            assert_eq!(r.next(), b as u64);
        }
        // padding reads as zeros
        assert_eq!(r.next(), 0);
    }

    #[test]
    fn single_line_round_trip() {
        round_trip(&machine(), "L6TJ\n");
    }

    #[test]
    fn multi_line_round_trip() {
        round_trip(&machine(), "L6TJ\nT6NJ\n1V1\nQ2\nL66J\n");
    }

    #[test]
    fn unterminated_final_record_round_trip() {
        // EOS is legal directly from an accept state
        round_trip(&machine(), "L6TJ\nT6NJ");
    }

    #[test]
    fn empty_stream_round_trip() {
        round_trip(&machine(), "");
    }

    #[test]
    fn repeated_records_adapt_frequencies() {
        let m = machine();
        let text = "T6NJ\n".repeat(64);
        round_trip(&m, &text);
        // adaptation should undercut one byte per input byte by a wide margin
        let bits = compress(&m, text.as_bytes()).unwrap();
        assert!(bits.len() * 2 < text.len(), "no compression: {} vs {}", bits.len(), text.len());
    }

    #[test]
    fn encoding_is_deterministic_from_reset_state() {
        let m = machine();
        let a = compress(&m, b"L6TJ\nQ2\n").unwrap();
        let b = compress(&m, b"L6TJ\nQ2\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_bytes_outside_the_language() {
        let m = machine();
        assert_eq!(
            compress(&m, b"L6TJ!\n"),
            Err(WlnError::NotInLanguage { pos: 4, byte: b'!' })
        );
        // mid-record EOF: 'L6' reaches no accept state
        assert!(matches!(
            compress(&m, b"L6"),
            Err(WlnError::NotInLanguage { pos: 2, byte: EOS })
        ));
    }
}
