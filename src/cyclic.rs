//! Ring systems: analysis, locant paths and ring notation.
//!
//! A locant path is a total order over a ring system's atoms; position `i`
//! is locant letter `A + i`. Paths are grown ring by ring from a seed atom,
//! recording a non-trivial pair for every ring closure that consecutive
//! locants do not imply. One candidate is built per seed and the minimal
//! notation wins.

use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;

use crate::error::WlnError;
use crate::mol::Molecule;
use crate::rings::RingInfo;
use crate::symbol::classify;

pub(crate) fn locant_char(pos: usize) -> char {
    (b'A' + pos as u8) as char
}

/// One connected ring system and its fusion classification.
#[derive(Debug, Clone)]
pub(crate) struct RingSystem {
    /// All ring atoms of the system, ascending.
    pub atoms: Vec<NodeIndex>,
    /// Indices into `RingInfo::rings`, ascending.
    pub rings: Vec<usize>,
    /// Fusion class: 1 isolated, 2 simple fused, 3 multicyclic.
    pub fusion: u32,
}

/// Walk the ring-membership-connected atoms around `seed` and classify the
/// system. Four rings meeting in one atom is a branching junction and is
/// rejected.
pub(crate) fn analyze(
    mol: &Molecule,
    rings: &RingInfo,
    seed: NodeIndex,
) -> Result<RingSystem, WlnError> {
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut stack = vec![seed];
    let mut ring_set: HashSet<usize> = HashSet::new();
    let mut max_share = 0u32;

    while let Some(atom) = stack.pop() {
        if !visited.insert(atom) {
            continue;
        }
        let share = rings.shares(atom);
        max_share = max_share.max(share);
        for (i, _) in rings.rings().iter().enumerate() {
            if rings.ring_contains(i, atom) {
                ring_set.insert(i);
            }
        }
        for nb in mol.neighbors(atom) {
            if rings.is_ring_atom(nb) && !visited.contains(&nb) {
                stack.push(nb);
            }
        }
    }

    if max_share > 3 {
        return Err(WlnError::UnsupportedRingSystem);
    }

    let mut atoms: Vec<NodeIndex> = visited.into_iter().collect();
    atoms.sort();
    let mut ring_ids: Vec<usize> = ring_set.into_iter().collect();
    ring_ids.sort();

    tracing::debug!(
        atoms = atoms.len(),
        rings = ring_ids.len(),
        fusion = max_share,
        "ring system"
    );

    Ok(RingSystem { atoms, rings: ring_ids, fusion: max_share })
}

#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub path: Vec<NodeIndex>,
    /// Non-trivial ring closures, stored as atom pairs.
    pub pairs: Vec<(NodeIndex, NodeIndex)>,
    pub sizes: Vec<usize>,
}

fn rotate_to(cycle: &[NodeIndex], start: NodeIndex) -> Option<Vec<NodeIndex>> {
    let at = cycle.iter().position(|&a| a == start)?;
    let mut seq = Vec::with_capacity(cycle.len());
    for i in 0..cycle.len() {
        seq.push(cycle[(at + i) % cycle.len()]);
    }
    Some(seq)
}

/// Grow the locant path for one seed by shift-and-add insertion.
pub(crate) fn build_locant_path(
    rings: &RingInfo,
    system: &RingSystem,
    seed: NodeIndex,
) -> Result<Candidate, WlnError> {
    let first_ring = *system
        .rings
        .iter()
        .find(|&&r| rings.ring_contains(r, seed))
        .ok_or(WlnError::UnresolvedRing)?;

    let mut path = rotate_to(&rings.rings()[first_ring], seed).ok_or(WlnError::UnresolvedRing)?;
    let mut placed: HashSet<NodeIndex> = path.iter().copied().collect();
    let mut pairs = vec![(path[0], *path.last().expect("ring is never empty"))];
    let mut sizes = vec![path.len()];
    let mut rings_seen: HashSet<usize> = HashSet::new();
    rings_seen.insert(first_ring);

    for _ in 1..system.rings.len() {
        // hinge: lowest path position on a fusion atom of an unplaced ring
        let mut found = None;
        'scan: for (i, &atom) in path.iter().enumerate() {
            if rings.shares(atom) > 1 {
                for &r in &system.rings {
                    if !rings_seen.contains(&r) && rings.ring_contains(r, atom) {
                        found = Some((i, r));
                        break 'scan;
                    }
                }
            }
        }
        let (hinge, r) = found.ok_or(WlnError::UnresolvedRing)?;
        rings_seen.insert(r);

        let cycle = &rings.rings()[r];
        let size = cycle.len();
        let next_on_path = path.get(hinge + 1).copied();
        let attaches_here = next_on_path.is_some_and(|a| cycle.contains(&a));

        if attaches_here {
            let insert_start = path[hinge];
            let insert_end = next_on_path.expect("checked above");
            let mut seq = rotate_to(cycle, insert_start).ok_or(WlnError::UnresolvedRing)?;
            // traversal must leave the hinge away from the shared edge
            if seq.len() > 1 && seq[1] == insert_end {
                seq[1..].reverse();
            }
            pairs.push((insert_start, insert_end));
            sizes.push(size);

            let mut at = hinge + 1;
            for &a in &seq {
                if placed.insert(a) {
                    path.insert(at, a);
                    at += 1;
                }
            }
        } else {
            // ring wraps around the path end; hinge is the last-placed atom
            let insert_start = *path.last().expect("path is never empty");
            let insert_end = path[0];
            let mut seq = rotate_to(cycle, insert_start).ok_or(WlnError::UnresolvedRing)?;
            if seq.len() > 1 && seq[1] == insert_end {
                seq[1..].reverse();
            }
            for &a in &seq {
                if placed.insert(a) {
                    path.push(a);
                }
            }
            pairs.push((path[0], *path.last().expect("path is never empty")));
            sizes.push(size);
        }
    }

    if path.len() != system.atoms.len() {
        return Err(WlnError::UnresolvedRing);
    }

    Ok(Candidate { path, pairs, sizes })
}

/// Emit the ring descriptor for one candidate: `L`/`T`, ring-size tokens
/// with locants where needed, heteroatom locants, closing `J`.
pub(crate) fn ring_notation(
    mol: &Molecule,
    rings: &RingInfo,
    system: &RingSystem,
    cand: &Candidate,
) -> Result<String, WlnError> {
    let path = &cand.path;
    let hetero = path.iter().any(|&a| mol.atom(a).atomic_num != 6);
    let mut out = String::new();
    out.push(if hetero { 'T' } else { 'L' });

    let mut shares: HashMap<NodeIndex, u32> =
        path.iter().map(|&a| (a, rings.shares(a))).collect();
    let mut pairs = cand.pairs.clone();
    let mut sizes = cand.sizes.clone();

    let expected = system.rings.len();
    let mut safety = 0;
    while !pairs.is_empty() && safety < expected {
        let mut popped = false;
        for i in 0..pairs.len() {
            let (first, second) = pairs[i];
            let pos = match path.iter().position(|&a| a == first) {
                Some(p) => p,
                None => return Err(WlnError::UnresolvedRing),
            };
            // emissible iff the walk from pos meets no other fusion atom
            // before reaching `second`
            let mut emit = false;
            for &a in &path[pos + 1..] {
                if shares[&a] > 1 {
                    emit = a == second;
                    break;
                }
            }
            if emit {
                if pos > 0 {
                    out.push(' ');
                    out.push(locant_char(pos));
                }
                out.push_str(&sizes[i].to_string());
                pairs.remove(i);
                sizes.remove(i);
                *shares.get_mut(&first).expect("pair atoms are on the path") -= 1;
                *shares.get_mut(&second).expect("pair atoms are on the path") -= 1;
                popped = true;
                break;
            }
        }
        safety += 1;
        if !popped {
            break;
        }
    }

    match pairs.len() {
        0 => {}
        1 if pairs[0].0 == path[0] && pairs[0].1 == *path.last().expect("non-empty") => {
            // the implicit ring-wrap closure
            out.push_str(&sizes[0].to_string());
        }
        _ => return Err(WlnError::UnresolvedRing),
    }

    // heteroatom locants: skipped when carrying straight on from the
    // previous heteroatom (and at position A)
    let mut last_hetero = 0usize;
    for (i, &a) in path.iter().enumerate() {
        if mol.atom(a).atomic_num == 6 {
            continue;
        }
        if i > 0 && last_hetero != i - 1 {
            out.push(' ');
            out.push(locant_char(i));
        }
        let c = classify(mol, a)?;
        match c.special {
            Some(code) => {
                out.push('-');
                out.push_str(code);
                out.push('-');
            }
            None => out.push(c.tag),
        }
        last_hetero = i;
    }

    out.push('J');
    Ok(out)
}

/// Longest unbroken run of decimal digits; the canonicalizer's primary key.
fn longest_digit_run(s: &str) -> usize {
    let mut best = 0;
    let mut cur = 0;
    for b in s.bytes() {
        if b.is_ascii_digit() {
            cur += 1;
            best = best.max(cur);
        } else {
            cur = 0;
        }
    }
    best
}

/// First locant letter spelled after a space; 0 when the descriptor never
/// needs one (which ranks lowest, i.e. best).
fn first_space_locant(s: &str) -> u8 {
    let bytes = s.as_bytes();
    for i in 0..bytes.len().saturating_sub(1) {
        if bytes[i] == b' ' {
            return bytes[i + 1];
        }
    }
    0
}

pub(crate) struct Selection {
    pub notation: String,
    pub path: Vec<NodeIndex>,
}

/// Build one candidate per seed and keep the minimal notation: longest
/// digit run first, then smallest leading locant, earliest seed on ties.
pub(crate) fn best_ring_notation(
    mol: &Molecule,
    rings: &RingInfo,
    system: &RingSystem,
) -> Result<Selection, WlnError> {
    let seeds: Vec<NodeIndex> = system
        .atoms
        .iter()
        .copied()
        .filter(|&a| rings.shares(a) == system.fusion)
        .collect();
    if seeds.is_empty() {
        return Err(WlnError::UnresolvedRing);
    }

    let mut best: Option<(usize, u8, Selection)> = None;
    for seed in seeds {
        let cand = build_locant_path(rings, system, seed)?;
        let notation = ring_notation(mol, rings, system, &cand)?;
        tracing::debug!(seed = seed.index(), %notation, "ring candidate");

        let run = longest_digit_run(&notation);
        let loc = first_space_locant(&notation);
        let better = match &best {
            None => true,
            Some((best_run, best_loc, _)) => {
                run > *best_run || (run == *best_run && loc < *best_loc)
            }
        };
        if better {
            best = Some((run, loc, Selection { notation, path: cand.path }));
        }
    }

    Ok(best.map(|(_, _, sel)| sel).expect("at least one seed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse;

    fn system_of(smi: &str) -> (Molecule, RingInfo) {
        let mol = parse(smi).unwrap();
        let ri = RingInfo::sssr(&mol);
        (mol, ri)
    }

    fn notation(smi: &str) -> Result<String, WlnError> {
        let (mol, ri) = system_of(smi);
        let seed = mol.atoms().find(|&a| ri.is_ring_atom(a)).unwrap();
        let system = analyze(&mol, &ri, seed)?;
        best_ring_notation(&mol, &ri, &system).map(|s| s.notation)
    }

    #[test]
    fn benzene_descriptor() {
        assert_eq!(notation("c1ccccc1").unwrap(), "L6J");
    }

    #[test]
    fn cyclohexane_descriptor() {
        assert_eq!(notation("C1CCCCC1").unwrap(), "L6J");
    }

    #[test]
    fn pyridine_descriptor() {
        assert_eq!(notation("c1ccncc1").unwrap(), "T6NJ");
    }

    #[test]
    fn furan_descriptor() {
        assert_eq!(notation("o1cccc1").unwrap(), "T5OJ");
    }

    #[test]
    fn thiophene_descriptor() {
        assert_eq!(notation("s1cccc1").unwrap(), "T5SJ");
    }

    #[test]
    fn naphthalene_descriptor() {
        assert_eq!(notation("c1ccc2ccccc2c1").unwrap(), "L66J");
    }

    #[test]
    fn decalin_descriptor() {
        assert_eq!(notation("C1CCC2CCCCC2C1").unwrap(), "L66J");
    }

    #[test]
    fn quinoline_descriptor() {
        // fused six-six with one ring nitrogen
        let s = notation("n1ccc2ccccc2c1").unwrap();
        assert!(s.starts_with('T'), "got {}", s);
        assert!(s.contains("66"), "got {}", s);
        assert!(s.ends_with('J'), "got {}", s);
    }

    #[test]
    fn every_path_atom_appears_once() {
        let (mol, ri) = system_of("c1ccc2ccccc2c1");
        let seed = mol.atoms().find(|&a| ri.shares(a) == 2).unwrap();
        let system = analyze(&mol, &ri, seed).unwrap();
        let cand = build_locant_path(&ri, &system, seed).unwrap();
        assert_eq!(cand.path.len(), 10);
        let mut sorted = cand.path.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 10);
        // one size token per SSSR ring
        assert_eq!(cand.sizes.len(), 2);
    }

    #[test]
    fn anthracene_descriptor_shape() {
        // three linearly fused rings: one ring size carries a locant
        let s = notation("c1ccc2cc3ccccc3cc2c1").unwrap();
        assert!(s.starts_with("L6"), "got {}", s);
        assert!(s.contains(' '), "got {}", s);
        assert!(s.ends_with("66J"), "got {}", s);
    }

    #[test]
    fn spiro_is_unresolved() {
        assert_eq!(
            notation("C1CCC2(CC1)CCC2"),
            Err(WlnError::UnresolvedRing)
        );
    }

    #[test]
    fn norbornane_is_unresolved() {
        assert_eq!(notation("C1CC2CC1CC2"), Err(WlnError::UnresolvedRing));
    }

    #[test]
    fn branched_junction_rejected() {
        // four four-membered rings all passing through the first atom
        let (mol, ri) = system_of("C123C4CC1CC2CC3C4");
        assert_eq!(ri.num_rings(), 4);
        let seed = mol.atoms().find(|&a| ri.is_ring_atom(a)).unwrap();
        assert_eq!(
            analyze(&mol, &ri, seed).err(),
            Some(WlnError::UnsupportedRingSystem)
        );
    }

    #[test]
    fn cubane_is_multicyclic_not_branched() {
        let (mol, ri) = system_of("C12C3C4C1C5C3C4C25");
        let seed = mol.atoms().find(|&a| ri.is_ring_atom(a)).unwrap();
        let system = analyze(&mol, &ri, seed).unwrap();
        assert_eq!(system.fusion, 3);
    }
}
