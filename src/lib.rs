//! Wiswesser Line Notation tooling.
//!
//! Three coupled subsystems share this crate:
//!
//! - a **writer** that derives a WLN string from a molecular graph
//!   ([`write_wln`]), including canonical locant-path construction over
//!   fused ring systems;
//! - a **grammar engine**: a hand-built NFA for the WLN language,
//!   determinized and minimized ([`fsm::wln_dfa`]), driving a grep-style
//!   matcher;
//! - a **grammar-aware compressor** that walks the DFA with per-state
//!   adaptive frequencies feeding a range coder ([`zip`]).
//!
//! A small SMILES front-end ([`smiles::parse`]) and SSSR perception
//! ([`rings::RingInfo`]) stand in for an external chemistry toolkit.

pub mod atom;
mod cyclic;
pub mod dot;
pub mod element;
pub mod error;
pub mod fsm;
pub mod mol;
pub mod rings;
pub mod smiles;
pub mod symbol;
mod transcribe;
pub mod writer;
pub mod zip;

pub use atom::{Atom, Bond, BondOrder};
pub use error::WlnError;
pub use mol::Molecule;
pub use rings::RingInfo;
pub use smiles::SmilesError;
pub use writer::{write_wln, write_wln_with_graph};
