//! Debug dot dumps of the molecule graph and the WLN symbol graph.

use std::fmt::Write as _;

use petgraph::visit::EdgeRef;

use crate::element;
use crate::mol::Molecule;
use crate::symbol::WlnGraph;

/// Molecule graph as a digraph of atom indices.
pub fn molecule_dot(mol: &Molecule) -> String {
    let mut out = String::new();
    out.push_str("digraph molecule {\n");
    out.push_str("  rankdir = LR;\n");
    for idx in mol.atoms() {
        let sym = element::symbol(mol.atom(idx).atomic_num).unwrap_or("?");
        let _ = writeln!(
            out,
            "  {} [shape=circle,label=\"{}{}\"];",
            idx.index(),
            sym,
            idx.index()
        );
    }
    for edge in mol.graph().edge_references() {
        let _ = writeln!(
            out,
            "  {} -> {};",
            edge.source().index(),
            edge.target().index()
        );
    }
    out.push_str("}\n");
    out
}

/// WLN symbol graph; multi-order edges render as repeated arrows.
pub fn wln_graph_dot(graph: &WlnGraph) -> String {
    let mut out = String::new();
    out.push_str("digraph wln {\n");
    out.push_str("  rankdir = LR;\n");
    for id in graph.symbols() {
        let sym = graph.symbol(id);
        if sym.special.is_empty() {
            let _ = writeln!(out, "  {} [shape=circle,label=\"{}\"];", id, sym.tag);
        } else {
            let _ = writeln!(out, "  {} [shape=circle,label=\"{}\"];", id, sym.special);
        }
    }
    for id in graph.symbols() {
        for e in graph.child_edges(id) {
            let edge = graph.edge(e);
            for _ in 0..edge.order.max(1) {
                let _ = writeln!(out, "  {} -> {};", edge.parent, edge.child);
            }
        }
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse;
    use crate::writer::write_wln_with_graph;

    #[test]
    fn molecule_dump_lists_every_atom_and_bond() {
        let mol = parse("CC(=O)C").unwrap();
        let dot = molecule_dot(&mol);
        assert!(dot.starts_with("digraph molecule {"));
        assert_eq!(dot.matches("shape=circle").count(), 4);
        assert_eq!(dot.matches("->").count(), 3);
    }

    #[test]
    fn wln_dump_repeats_double_bonds() {
        let (_, graph) = write_wln_with_graph(&parse("CC(=O)C").unwrap()).unwrap();
        let dot = wln_graph_dot(&graph);
        assert!(dot.starts_with("digraph wln {"));
        // the carbonyl edge is drawn twice
        let arrows = dot.matches("->").count();
        assert_eq!(arrows, graph.edge_count() + 1);
    }
}
