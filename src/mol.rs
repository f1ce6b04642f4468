use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::atom::{Atom, Bond};

/// A molecule as delivered by the front-end: an undirected atom/bond graph.
///
/// Immutable once handed to the writer. Atom indices are stable (nothing is
/// ever removed) and double as the toolkit order the writer iterates in.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    graph: UnGraph<Atom, Bond>,
}

impl Molecule {
    pub fn new() -> Self {
        Self { graph: UnGraph::default() }
    }

    pub fn graph(&self) -> &UnGraph<Atom, Bond> {
        &self.graph
    }

    pub fn add_atom(&mut self, atom: Atom) -> NodeIndex {
        self.graph.add_node(atom)
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: Bond) -> EdgeIndex {
        self.graph.add_edge(a, b, bond)
    }

    pub fn atom(&self, idx: NodeIndex) -> &Atom {
        &self.graph[idx]
    }

    pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut Atom {
        &mut self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &Bond {
        &self.graph[idx]
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// The endpoint of `edge` that is not `from`.
    pub fn other_endpoint(&self, edge: EdgeIndex, from: NodeIndex) -> Option<NodeIndex> {
        let (a, b) = self.graph.edge_endpoints(edge)?;
        if a == from {
            Some(b)
        } else if b == from {
            Some(a)
        } else {
            None
        }
    }

    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors(idx).count()
    }

    /// Sum of incident bond orders, the toolkit's notion of explicit
    /// valence. Implied hydrogens do not count.
    pub fn explicit_valence(&self, idx: NodeIndex) -> u32 {
        self.graph
            .edges(idx)
            .map(|e| e.weight().order.as_u8() as u32)
            .sum()
    }

    /// Atoms of the connected component containing `start`, in index order.
    pub fn component_atoms(&self, start: NodeIndex) -> Vec<NodeIndex> {
        let mut seen = vec![false; self.graph.node_count()];
        let mut stack = vec![start];
        seen[start.index()] = true;
        while let Some(cur) = stack.pop() {
            for nb in self.graph.neighbors(cur) {
                if !seen[nb.index()] {
                    seen[nb.index()] = true;
                    stack.push(nb);
                }
            }
        }
        let mut atoms: Vec<NodeIndex> = seen
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s)
            .map(|(i, _)| NodeIndex::new(i))
            .collect();
        atoms.sort();
        atoms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::BondOrder;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn explicit_valence_sums_orders() {
        let mut mol = Molecule::new();
        let c = mol.add_atom(Atom { atomic_num: 6, ..Default::default() });
        let o = mol.add_atom(Atom { atomic_num: 8, ..Default::default() });
        let c2 = mol.add_atom(Atom { atomic_num: 6, ..Default::default() });
        mol.add_bond(c, o, Bond::of_order(BondOrder::Double));
        mol.add_bond(c, c2, Bond::single());
        assert_eq!(mol.explicit_valence(c), 3);
        assert_eq!(mol.explicit_valence(o), 2);
        assert_eq!(mol.degree(c), 2);
    }

    #[test]
    fn component_atoms_are_sorted_and_complete() {
        let mut mol = Molecule::new();
        let a = mol.add_atom(Atom::default());
        let b = mol.add_atom(Atom::default());
        let c = mol.add_atom(Atom::default());
        mol.add_bond(a, b, Bond::single());
        assert_eq!(mol.component_atoms(b), vec![n(0), n(1)]);
        assert_eq!(mol.component_atoms(c), vec![n(2)]);
    }
}
