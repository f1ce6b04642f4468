//! SMILES → [`Molecule`] front-end.
//!
//! Covers the organic subset, bracket atoms (isotope, explicit H count,
//! charge; chirality marks are skipped), branches, ring-bond digits and
//! `%nn` pairs, and `.`-separated fragments. Aromatic atoms and bonds are
//! flagged, not kekulized — the writer downstream only reads elements,
//! charges and explicit valences.

use std::collections::HashMap;
use std::fmt;

use petgraph::graph::NodeIndex;

use crate::atom::{Atom, Bond, BondOrder};
use crate::element;
use crate::mol::Molecule;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmilesError {
    EmptyInput,
    UnexpectedChar { pos: usize, ch: char },
    InvalidElement { pos: usize, text: String },
    UnclosedBracket { pos: usize },
    UnclosedRing { digit: u16 },
    UnmatchedParen { pos: usize },
    InvalidCharge { pos: usize },
    RingBondConflict { digit: u16 },
    SelfBond { digit: u16 },
    DanglingBond { pos: usize },
}

impl fmt::Display for SmilesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "empty SMILES string"),
            Self::UnexpectedChar { pos, ch } => {
                write!(f, "unexpected character '{}' at position {}", ch, pos)
            }
            Self::InvalidElement { pos, text } => {
                write!(f, "invalid element '{}' at position {}", text, pos)
            }
            Self::UnclosedBracket { pos } => {
                write!(f, "unclosed bracket atom starting at position {}", pos)
            }
            Self::UnclosedRing { digit } => write!(f, "unclosed ring {}", digit),
            Self::UnmatchedParen { pos } => write!(f, "unmatched parenthesis at position {}", pos),
            Self::InvalidCharge { pos } => write!(f, "invalid charge at position {}", pos),
            Self::RingBondConflict { digit } => {
                write!(f, "conflicting bond types on ring closure {}", digit)
            }
            Self::SelfBond { digit } => write!(f, "ring closure {} bonds an atom to itself", digit),
            Self::DanglingBond { pos } => write!(f, "bond with no following atom at position {}", pos),
        }
    }
}

impl std::error::Error for SmilesError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BondTok {
    Single,
    Double,
    Triple,
    Aromatic,
}

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
    mol: Molecule,
    /// Whether each added atom was written aromatic (for implicit-H math).
    bracket: Vec<bool>,
    prev: Option<NodeIndex>,
    pending_bond: Option<(BondTok, usize)>,
    branch_stack: Vec<NodeIndex>,
    open_rings: HashMap<u16, (NodeIndex, Option<BondTok>)>,
}

pub fn parse(input: &str) -> Result<Molecule, SmilesError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let chars: Vec<char> = trimmed.chars().collect();
    let mut parser = Parser {
        chars: &chars,
        pos: 0,
        mol: Molecule::new(),
        bracket: Vec::new(),
        prev: None,
        pending_bond: None,
        branch_stack: Vec::new(),
        open_rings: HashMap::new(),
    };
    parser.run()?;
    Ok(parser.mol)
}

impl<'a> Parser<'a> {
    fn run(&mut self) -> Result<(), SmilesError> {
        while self.pos < self.chars.len() {
            let pos = self.pos;
            match self.chars[pos] {
                '[' => {
                    let (atom, hcount) = self.parse_bracket()?;
                    self.place_atom(atom, Some(hcount))?;
                }
                'B' if self.peek(1) == Some('r') => {
                    self.pos += 2;
                    self.place_bare(35, false)?;
                }
                'C' if self.peek(1) == Some('l') => {
                    self.pos += 2;
                    self.place_bare(17, false)?;
                }
                'B' => self.bare(5, false)?,
                'C' => self.bare(6, false)?,
                'N' => self.bare(7, false)?,
                'O' => self.bare(8, false)?,
                'P' => self.bare(15, false)?,
                'S' => self.bare(16, false)?,
                'F' => self.bare(9, false)?,
                'I' => self.bare(53, false)?,
                'b' => self.bare(5, true)?,
                'c' => self.bare(6, true)?,
                'n' => self.bare(7, true)?,
                'o' => self.bare(8, true)?,
                'p' => self.bare(15, true)?,
                's' => self.bare(16, true)?,
                '-' | '/' | '\\' => self.bond(BondTok::Single)?,
                '=' => self.bond(BondTok::Double)?,
                '#' => self.bond(BondTok::Triple)?,
                ':' => self.bond(BondTok::Aromatic)?,
                '(' => {
                    match self.prev {
                        Some(p) => self.branch_stack.push(p),
                        None => return Err(SmilesError::UnmatchedParen { pos }),
                    }
                    self.pos += 1;
                }
                ')' => {
                    let restored = self
                        .branch_stack
                        .pop()
                        .ok_or(SmilesError::UnmatchedParen { pos })?;
                    self.prev = Some(restored);
                    self.pos += 1;
                }
                '.' => {
                    if self.pending_bond.is_some() {
                        return Err(SmilesError::DanglingBond { pos });
                    }
                    self.prev = None;
                    self.pos += 1;
                }
                '%' => {
                    let d1 = self.peek(1).filter(char::is_ascii_digit);
                    let d2 = self.peek(2).filter(char::is_ascii_digit);
                    match (d1, d2) {
                        (Some(a), Some(b)) => {
                            let digit = (a as u16 - '0' as u16) * 10 + (b as u16 - '0' as u16);
                            self.pos += 3;
                            self.ring_closure(digit)?;
                        }
                        _ => return Err(SmilesError::UnexpectedChar { pos, ch: '%' }),
                    }
                }
                d @ '0'..='9' => {
                    self.pos += 1;
                    self.ring_closure(d as u16 - '0' as u16)?;
                }
                ' ' | '\t' => {
                    self.pos += 1;
                }
                ch => return Err(SmilesError::UnexpectedChar { pos, ch }),
            }
        }

        if let Some((_, pos)) = self.pending_bond {
            return Err(SmilesError::DanglingBond { pos });
        }
        if !self.branch_stack.is_empty() {
            return Err(SmilesError::UnmatchedParen { pos: self.chars.len() });
        }
        if let Some((&digit, _)) = self.open_rings.iter().next() {
            return Err(SmilesError::UnclosedRing { digit });
        }

        self.assign_implicit_hydrogens();
        Ok(())
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn bare(&mut self, atomic_num: u8, aromatic: bool) -> Result<(), SmilesError> {
        self.pos += 1;
        self.place_bare(atomic_num, aromatic)
    }

    fn place_bare(&mut self, atomic_num: u8, aromatic: bool) -> Result<(), SmilesError> {
        let atom = Atom {
            atomic_num,
            formal_charge: 0,
            is_aromatic: aromatic,
            hydrogen_count: 0,
        };
        self.place_atom(atom, None)
    }

    fn bond(&mut self, tok: BondTok) -> Result<(), SmilesError> {
        let pos = self.pos;
        if self.prev.is_none() || self.pending_bond.is_some() {
            return Err(SmilesError::UnexpectedChar { pos, ch: self.chars[pos] });
        }
        self.pending_bond = Some((tok, pos));
        self.pos += 1;
        Ok(())
    }

    fn place_atom(&mut self, atom: Atom, hcount: Option<u8>) -> Result<(), SmilesError> {
        let aromatic = atom.is_aromatic;
        let idx = self.mol.add_atom(atom);
        self.bracket.push(hcount.is_some());
        if let Some(h) = hcount {
            self.mol.atom_mut(idx).hydrogen_count = h;
        }
        if let Some(prev) = self.prev {
            let tok = self.pending_bond.take().map(|(t, _)| t);
            let bond = resolve_bond(tok, self.mol.atom(prev).is_aromatic, aromatic);
            self.mol.add_bond(prev, idx, bond);
        }
        self.pending_bond = None;
        self.prev = Some(idx);
        Ok(())
    }

    fn ring_closure(&mut self, digit: u16) -> Result<(), SmilesError> {
        let here = match self.prev {
            Some(p) => p,
            None => {
                let pos = self.pos.saturating_sub(1);
                return Err(SmilesError::UnexpectedChar { pos, ch: self.chars[pos] });
            }
        };
        let tok = self.pending_bond.take().map(|(t, _)| t);

        match self.open_rings.remove(&digit) {
            Some((other, open_tok)) => {
                if other == here {
                    return Err(SmilesError::SelfBond { digit });
                }
                let bond_tok = match (open_tok, tok) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(SmilesError::RingBondConflict { digit })
                    }
                    (Some(a), _) => Some(a),
                    (None, b) => b,
                };
                let bond = resolve_bond(
                    bond_tok,
                    self.mol.atom(other).is_aromatic,
                    self.mol.atom(here).is_aromatic,
                );
                self.mol.add_bond(other, here, bond);
            }
            None => {
                self.open_rings.insert(digit, (here, tok));
            }
        }
        Ok(())
    }

    fn parse_bracket(&mut self) -> Result<(Atom, u8), SmilesError> {
        let start = self.pos;
        self.pos += 1; // '['

        // isotope digits: parsed, then discarded
        while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }

        let (atomic_num, aromatic) = self.parse_bracket_element(start)?;

        // chirality marks carry no WLN meaning
        while self.peek(0) == Some('@') {
            self.pos += 1;
        }

        let mut hcount = 0u8;
        if self.peek(0) == Some('H') {
            self.pos += 1;
            hcount = 1;
            if let Some(d) = self.peek(0).filter(char::is_ascii_digit) {
                hcount = d as u8 - b'0';
                self.pos += 1;
            }
        }

        let charge = self.parse_charge(start)?;

        // atom class
        if self.peek(0) == Some(':') {
            self.pos += 1;
            while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        if self.peek(0) != Some(']') {
            return Err(SmilesError::UnclosedBracket { pos: start });
        }
        self.pos += 1;

        let atom = Atom {
            atomic_num,
            formal_charge: charge,
            is_aromatic: aromatic,
            hydrogen_count: 0,
        };
        Ok((atom, hcount))
    }

    fn parse_bracket_element(&mut self, bracket_start: usize) -> Result<(u8, bool), SmilesError> {
        let first = self
            .peek(0)
            .ok_or(SmilesError::UnclosedBracket { pos: bracket_start })?;

        if first.is_ascii_lowercase() {
            // aromatic element: b c n o p s plus the two-letter se / te
            if let Some(second) = self.peek(1).filter(char::is_ascii_lowercase) {
                match (first, second) {
                    ('s', 'e') => {
                        self.pos += 2;
                        return Ok((34, true));
                    }
                    ('t', 'e') => {
                        self.pos += 2;
                        return Ok((52, true));
                    }
                    _ => {}
                }
            }
            if matches!(first, 'b' | 'c' | 'n' | 'o' | 'p' | 's') {
                let one = first.to_ascii_uppercase().to_string();
                if let Some(z) = element::from_symbol(&one) {
                    self.pos += 1;
                    return Ok((z, true));
                }
            }
            return Err(SmilesError::InvalidElement {
                pos: self.pos,
                text: first.to_string(),
            });
        }

        if let Some(second) = self.peek(1).filter(char::is_ascii_lowercase) {
            let two: String = [first, second].iter().collect();
            if let Some(z) = element::from_symbol(&two) {
                self.pos += 2;
                return Ok((z, false));
            }
        }
        let one = first.to_string();
        if let Some(z) = element::from_symbol(&one) {
            self.pos += 1;
            return Ok((z, false));
        }
        Err(SmilesError::InvalidElement {
            pos: self.pos,
            text: first.to_string(),
        })
    }

    fn parse_charge(&mut self, bracket_start: usize) -> Result<i8, SmilesError> {
        let sign: i8 = match self.peek(0) {
            Some('+') => 1,
            Some('-') => -1,
            _ => return Ok(0),
        };
        self.pos += 1;

        let mut magnitude: i8 = 1;
        if let Some(d) = self.peek(0).filter(char::is_ascii_digit) {
            magnitude = d as i8 - b'0' as i8;
            self.pos += 1;
            if self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                return Err(SmilesError::InvalidCharge { pos: bracket_start });
            }
        } else {
            // ++ / -- shorthand
            while self.peek(0) == Some(if sign > 0 { '+' } else { '-' }) {
                magnitude = magnitude
                    .checked_add(1)
                    .ok_or(SmilesError::InvalidCharge { pos: bracket_start })?;
                self.pos += 1;
            }
        }
        Ok(sign * magnitude)
    }

    fn assign_implicit_hydrogens(&mut self) {
        for idx in 0..self.mol.atom_count() {
            if self.bracket[idx] {
                continue;
            }
            let node = NodeIndex::new(idx);
            let valences = element::default_valences(self.mol.atom(node).atomic_num);
            if valences.is_empty() {
                continue;
            }
            let sum = self.mol.explicit_valence(node) as u8;
            let target = valences.iter().find(|&&v| v >= sum).copied().unwrap_or(sum);
            let mut h = target - sum;
            if self.mol.atom(node).is_aromatic && h > 0 {
                h -= 1;
            }
            self.mol.atom_mut(node).hydrogen_count = h;
        }
    }
}

fn resolve_bond(tok: Option<BondTok>, from_aromatic: bool, to_aromatic: bool) -> Bond {
    match tok {
        Some(BondTok::Single) => Bond::single(),
        Some(BondTok::Double) => Bond::of_order(BondOrder::Double),
        Some(BondTok::Triple) => Bond::of_order(BondOrder::Triple),
        Some(BondTok::Aromatic) => Bond::aromatic(),
        None => {
            if from_aromatic && to_aromatic {
                Bond::aromatic()
            } else {
                Bond::single()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn atom(mol: &Molecule, i: usize) -> &Atom {
        mol.atom(n(i))
    }

    #[test]
    fn methane() {
        let mol = parse("C").unwrap();
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(mol.bond_count(), 0);
        assert_eq!(atom(&mol, 0).atomic_num, 6);
        assert_eq!(atom(&mol, 0).hydrogen_count, 4);
    }

    #[test]
    fn ethanol() {
        let mol = parse("CCO").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(atom(&mol, 2).atomic_num, 8);
        assert_eq!(mol.explicit_valence(n(2)), 1);
    }

    #[test]
    fn ethene_bond_order() {
        let mol = parse("C=C").unwrap();
        let edge = mol.bond_between(n(0), n(1)).unwrap();
        assert_eq!(mol.bond(edge).order, BondOrder::Double);
        assert_eq!(atom(&mol, 0).hydrogen_count, 2);
    }

    #[test]
    fn ethyne_bond_order() {
        let mol = parse("C#C").unwrap();
        let edge = mol.bond_between(n(0), n(1)).unwrap();
        assert_eq!(mol.bond(edge).order, BondOrder::Triple);
        assert_eq!(atom(&mol, 0).hydrogen_count, 1);
    }

    #[test]
    fn acetone_shape() {
        let mol = parse("CC(=O)C").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.bond_count(), 3);
        assert_eq!(mol.explicit_valence(n(1)), 4);
        assert_eq!(mol.degree(n(1)), 3);
    }

    #[test]
    fn halogen_two_char_symbols() {
        let mol = parse("ClCBr").unwrap();
        assert_eq!(atom(&mol, 0).atomic_num, 17);
        assert_eq!(atom(&mol, 2).atomic_num, 35);
    }

    #[test]
    fn benzene_aromatic_flags() {
        let mol = parse("c1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
        for i in 0..6 {
            assert!(atom(&mol, i).is_aromatic);
            assert_eq!(atom(&mol, i).hydrogen_count, 1);
        }
        for edge in mol.bonds() {
            assert!(mol.bond(edge).is_aromatic);
        }
    }

    #[test]
    fn pyridine_nitrogen() {
        let mol = parse("c1ccncc1").unwrap();
        assert_eq!(atom(&mol, 3).atomic_num, 7);
        assert_eq!(atom(&mol, 3).hydrogen_count, 0);
    }

    #[test]
    fn ammonium_bracket() {
        let mol = parse("[NH4+]").unwrap();
        assert_eq!(atom(&mol, 0).formal_charge, 1);
        assert_eq!(atom(&mol, 0).hydrogen_count, 4);
    }

    #[test]
    fn oxide_anion() {
        let mol = parse("[O-]").unwrap();
        assert_eq!(atom(&mol, 0).formal_charge, -1);
        assert_eq!(atom(&mol, 0).hydrogen_count, 0);
    }

    #[test]
    fn double_minus_charge() {
        let mol = parse("[O--]").unwrap();
        assert_eq!(atom(&mol, 0).formal_charge, -2);
        let mol = parse("[O-2]").unwrap();
        assert_eq!(atom(&mol, 0).formal_charge, -2);
    }

    #[test]
    fn isotope_is_skipped() {
        let mol = parse("[13C]").unwrap();
        assert_eq!(atom(&mol, 0).atomic_num, 6);
    }

    #[test]
    fn iron_bracket() {
        let mol = parse("[Fe]").unwrap();
        assert_eq!(atom(&mol, 0).atomic_num, 26);
    }

    #[test]
    fn disconnected_fragments() {
        let mol = parse("[Na+].[Cl-]").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 0);
        assert_eq!(atom(&mol, 0).formal_charge, 1);
        assert_eq!(atom(&mol, 1).formal_charge, -1);
    }

    #[test]
    fn branches() {
        let mol = parse("CC(C)(C)C").unwrap();
        assert_eq!(mol.atom_count(), 5);
        assert_eq!(mol.degree(n(1)), 4);
    }

    #[test]
    fn ring_closure_digit() {
        let mol = parse("C1CCCCC1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
        assert!(mol.bond_between(n(0), n(5)).is_some());
    }

    #[test]
    fn percent_ring_closure() {
        let mol = parse("C%10CC%10").unwrap();
        assert_eq!(mol.bond_count(), 3);
    }

    #[test]
    fn ring_bond_order_from_either_side() {
        let mol = parse("C=1CCCCC1").unwrap();
        let edge = mol.bond_between(n(0), n(5)).unwrap();
        assert_eq!(mol.bond(edge).order, BondOrder::Double);
    }

    #[test]
    fn nitro_group() {
        let mol = parse("C[N+](=O)[O-]").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(atom(&mol, 1).formal_charge, 1);
        assert_eq!(mol.explicit_valence(n(1)), 4);
    }

    // ---- error cases ----

    #[test]
    fn empty_inputs() {
        assert_eq!(parse("").unwrap_err(), SmilesError::EmptyInput);
        assert_eq!(parse("   ").unwrap_err(), SmilesError::EmptyInput);
    }

    #[test]
    fn mismatched_parens() {
        assert!(parse("C(C").is_err());
        assert!(parse("C)C").is_err());
    }

    #[test]
    fn unclosed_ring() {
        assert_eq!(
            parse("C1CC").unwrap_err(),
            SmilesError::UnclosedRing { digit: 1 }
        );
    }

    #[test]
    fn invalid_atom() {
        assert!(parse("X").is_err());
        assert!(parse("[Xx]").is_err());
    }

    #[test]
    fn unclosed_bracket() {
        assert!(parse("[C").is_err());
    }

    #[test]
    fn conflicting_ring_bonds() {
        assert_eq!(
            parse("C=1CCCCC#1").unwrap_err(),
            SmilesError::RingBondConflict { digit: 1 }
        );
    }

    #[test]
    fn dangling_bond() {
        assert!(parse("CC=").is_err());
        assert!(parse("C=.C").is_err());
    }
}
