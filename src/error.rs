use std::fmt;

use crate::smiles::SmilesError;

/// Failure kinds of the core. Every variant is fatal to the operation that
/// raised it; nothing in the crate retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WlnError {
    /// The atom classifier has no WLN spelling for this element.
    UnknownElement { atomic_num: u8 },
    /// A symbol would exceed its allowed connection count.
    ValenceExceeded { tag: char, have: u32, cap: u32 },
    /// The same parent→child edge was added twice.
    DuplicateEdge { parent: char, child: char },
    /// The symbol or edge arena hit its pool cap.
    GraphTooLarge { what: &'static str, cap: usize },
    /// A ring atom sits in four or more SSSR rings.
    UnsupportedRingSystem,
    /// Locant-path invariants broke down while emitting ring notation.
    UnresolvedRing,
    /// The transcriber met a symbol it has no emission rule for.
    UnhandledSymbol { tag: char },
    /// The codec was fed a byte with no transition from the current state.
    NotInLanguage { pos: usize, byte: u8 },
    /// The input molecule (or the string it came from) is unusable.
    MalformedInput { reason: String },
}

impl fmt::Display for WlnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownElement { atomic_num } => {
                write!(f, "no WLN symbol for element {}", atomic_num)
            }
            Self::ValenceExceeded { tag, have, cap } => {
                write!(f, "symbol '{}' exceeds allowed connections {}/{}", tag, have, cap)
            }
            Self::DuplicateEdge { parent, child } => {
                write!(f, "edge '{}'->'{}' already exists", parent, child)
            }
            Self::GraphTooLarge { what, cap } => {
                write!(f, "more than {} WLN {} - is this reasonable?", cap, what)
            }
            Self::UnsupportedRingSystem => {
                write!(f, "branching ring junctions are not supported")
            }
            Self::UnresolvedRing => {
                write!(f, "locant path could not be reduced to ring notation")
            }
            Self::UnhandledSymbol { tag } => write!(f, "unhandled WLN symbol '{}'", tag),
            Self::NotInLanguage { pos, byte } => {
                write!(f, "byte 0x{:02x} at offset {} is not in the WLN language", byte, pos)
            }
            Self::MalformedInput { reason } => write!(f, "malformed input: {}", reason),
        }
    }
}

impl std::error::Error for WlnError {}

impl From<SmilesError> for WlnError {
    fn from(e: SmilesError) -> Self {
        Self::MalformedInput { reason: e.to_string() }
    }
}
