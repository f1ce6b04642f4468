//! The full molecule → WLN pipeline: ring systems first, their external
//! branches off locant letters, then every remaining component as an ionic
//! tail joined by ` &`.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;

use crate::cyclic;
use crate::error::WlnError;
use crate::mol::Molecule;
use crate::rings::RingInfo;
use crate::symbol::{classify, WlnGraph};
use crate::transcribe::Transcriber;

/// Write the WLN string for a molecule.
pub fn write_wln(mol: &Molecule) -> Result<String, WlnError> {
    write_wln_with_graph(mol).map(|(s, _)| s)
}

/// Same as [`write_wln`], returning the WLN symbol graph alongside the
/// string (the `-w` dot dump wants it).
pub fn write_wln_with_graph(mol: &Molecule) -> Result<(String, WlnGraph), WlnError> {
    if mol.atom_count() == 0 {
        return Err(WlnError::MalformedInput { reason: "empty molecule".into() });
    }

    let rings = RingInfo::sssr(mol);
    let mut graph = WlnGraph::new();
    let mut tr = Transcriber::new();
    let mut ring_handled: HashSet<NodeIndex> = HashSet::new();
    let mut out = String::new();
    let mut started = false;

    tracing::debug!(atoms = mol.atom_count(), rings = rings.num_rings(), "writing molecule");

    // ring systems, in SSSR order
    for r in 0..rings.num_rings() {
        let seed = rings.rings()[r][0];
        if ring_handled.contains(&seed) {
            continue;
        }
        if started {
            out.push_str(" &");
        }
        write_ring_system(mol, &rings, &mut graph, &mut tr, seed, &mut ring_handled, &mut out)?;
        started = true;
    }

    // leftover components carry no ring atoms by construction
    for atom in mol.atoms() {
        if rings.is_ring_atom(atom) || tr.is_transcribed(atom) {
            continue;
        }
        if started {
            out.push_str(" &");
        }
        let component = mol.component_atoms(atom);
        let root = pick_root(mol, &component);
        tr.transcribe_fragment(mol, &rings, &mut graph, root, &mut out)?;
        started = true;
    }

    Ok((out, graph))
}

/// Transcription root for an acyclic component: the first terminal atom
/// that will emit a terminator symbol, else the first terminal, else the
/// first atom.
fn pick_root(mol: &Molecule, component: &[NodeIndex]) -> NodeIndex {
    for &a in component {
        if mol.degree(a) <= 1 && emits_terminator(mol, a) {
            return a;
        }
    }
    for &a in component {
        if mol.degree(a) <= 1 {
            return a;
        }
    }
    component[0]
}

fn emits_terminator(mol: &Molecule, atom: NodeIndex) -> bool {
    match classify(mol, atom) {
        Ok(c) => match c.tag {
            'Q' => true,
            'E' | 'F' | 'G' | 'I' => true,
            'N' => mol.explicit_valence(atom) < 2,
            _ => false,
        },
        Err(_) => false,
    }
}

fn write_ring_system(
    mol: &Molecule,
    rings: &RingInfo,
    graph: &mut WlnGraph,
    tr: &mut Transcriber,
    seed: NodeIndex,
    ring_handled: &mut HashSet<NodeIndex>,
    out: &mut String,
) -> Result<(), WlnError> {
    let system = cyclic::analyze(mol, rings, seed)?;
    let selection = cyclic::best_ring_notation(mol, rings, &system)?;
    out.push_str(&selection.notation);
    ring_handled.extend(selection.path.iter().copied());

    // external branches hang off locant letters
    for (i, &ratom) in selection.path.iter().enumerate() {
        for e in mol.bonds_of(ratom) {
            let nb = mol
                .other_endpoint(e, ratom)
                .expect("incident edge has this atom as an endpoint");
            if rings.is_ring_atom(nb) || tr.is_transcribed(nb) {
                continue;
            }
            out.push(' ');
            out.push(cyclic::locant_char(i));
            let order = mol.bond(e).order.as_u8();
            if order > 1 {
                out.push('U');
            }
            if order > 2 {
                out.push('U');
            }
            tr.transcribe_fragment(mol, rings, graph, nb, out)?;
        }
    }
    Ok(())
}
