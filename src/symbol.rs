//! WLN symbol graph: an arena of notation symbols and directed edges.
//!
//! Symbols and edges are index-referenced and owned by [`WlnGraph`]; the
//! whole graph is dropped at end-of-molecule. Per-symbol adjacency is a
//! linked list threaded through the edge arena, preserving insertion order
//! (the transcriber's child order depends on it).

use petgraph::graph::NodeIndex;

use crate::element;
use crate::error::WlnError;
use crate::mol::Molecule;

/// Default pool cap for symbols and edges.
pub const REASONABLE: usize = 1024;

pub type SymbolId = usize;
pub type EdgeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolKind {
    #[default]
    Standard,
    Ring,
    Special,
}

#[derive(Debug, Clone)]
pub struct WlnSymbol {
    /// Single character tag from the WLN alphabet.
    pub tag: char,
    /// Two-letter element code or ring payload for `*` / ring symbols.
    pub special: String,
    pub kind: SymbolKind,
    /// Valence cap: connections this symbol may carry.
    pub allowed_edges: u32,
    /// Current connection count (bond orders included).
    pub num_edges: u32,
    /// Outgoing fan-out in DFS direction.
    pub num_children: u32,
    /// Transcription cursor: which child branch the writer is on.
    pub on_child: u32,
    /// Parent in the DFS tree; at most one.
    pub previous: Option<SymbolId>,
    /// Head of the child-edge list.
    pub bonds: Option<EdgeId>,
}

#[derive(Debug, Clone)]
pub struct WlnEdge {
    pub parent: SymbolId,
    pub child: SymbolId,
    pub order: u8,
    pub aromatic: bool,
    pub next: Option<EdgeId>,
}

/// What the atom classifier decided for one atom, before allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub tag: char,
    pub allowed_edges: u32,
    pub kind: SymbolKind,
    pub special: Option<&'static str>,
}

/// Map an atom to its WLN symbol tag and allowed connection count.
pub fn classify(mol: &Molecule, atom: NodeIndex) -> Result<Classified, WlnError> {
    let a = mol.atom(atom);
    let valence = mol.explicit_valence(atom);

    let standard = |tag: char, allowed: u32| Classified {
        tag,
        allowed_edges: allowed,
        kind: SymbolKind::Standard,
        special: None,
    };

    let classified = match a.atomic_num {
        1 => standard('H', 1),
        5 => standard('B', 3),
        6 => {
            let degree = mol.degree(atom) as u32;
            if degree <= 2 {
                standard('1', 4)
            } else if valence == 3 {
                standard('Y', 3)
            } else {
                standard('X', 4)
            }
        }
        7 => standard('N', valence),
        8 => {
            if valence < 2 && a.formal_charge != -1 {
                standard('Q', 1)
            } else {
                standard('O', 2)
            }
        }
        9 => standard('F', valence),
        15 => standard('P', 6),
        16 => standard('S', 6),
        17 => standard('G', valence),
        35 => standard('E', valence),
        53 => standard('I', valence),
        z => match element::wln_special(z) {
            Some(code) => Classified {
                tag: '*',
                allowed_edges: 8,
                kind: SymbolKind::Special,
                special: Some(code),
            },
            None => return Err(WlnError::UnknownElement { atomic_num: z }),
        },
    };
    Ok(classified)
}

#[derive(Debug)]
pub struct WlnGraph {
    symbols: Vec<WlnSymbol>,
    edges: Vec<WlnEdge>,
    max_symbols: usize,
    max_edges: usize,
}

impl Default for WlnGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl WlnGraph {
    pub fn new() -> Self {
        Self::with_limits(REASONABLE, REASONABLE)
    }

    pub fn with_limits(max_symbols: usize, max_edges: usize) -> Self {
        Self {
            symbols: Vec::new(),
            edges: Vec::new(),
            max_symbols,
            max_edges,
        }
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn symbol(&self, id: SymbolId) -> &WlnSymbol {
        &self.symbols[id]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut WlnSymbol {
        &mut self.symbols[id]
    }

    pub fn edge(&self, id: EdgeId) -> &WlnEdge {
        &self.edges[id]
    }

    pub fn symbols(&self) -> impl Iterator<Item = SymbolId> + '_ {
        0..self.symbols.len()
    }

    /// Child edges of `parent` in insertion order.
    pub fn child_edges(&self, parent: SymbolId) -> Vec<EdgeId> {
        let mut out = Vec::new();
        let mut cur = self.symbols[parent].bonds;
        while let Some(e) = cur {
            out.push(e);
            cur = self.edges[e].next;
        }
        out
    }

    pub fn add_symbol(
        &mut self,
        tag: char,
        allowed_edges: u32,
        kind: SymbolKind,
    ) -> Result<SymbolId, WlnError> {
        if self.symbols.len() >= self.max_symbols {
            return Err(WlnError::GraphTooLarge { what: "symbols", cap: self.max_symbols });
        }
        self.symbols.push(WlnSymbol {
            tag,
            special: String::new(),
            kind,
            allowed_edges,
            num_edges: 0,
            num_children: 0,
            on_child: 0,
            previous: None,
            bonds: None,
        });
        Ok(self.symbols.len() - 1)
    }

    /// Allocate the symbol for one input atom.
    pub fn create_node(&mut self, mol: &Molecule, atom: NodeIndex) -> Result<SymbolId, WlnError> {
        let c = classify(mol, atom)?;
        let id = self.add_symbol(c.tag, c.allowed_edges, c.kind)?;
        if let Some(code) = c.special {
            self.symbols[id].special.push_str(code);
        }
        Ok(id)
    }

    /// Add a single-order edge `parent → child`.
    pub fn add_edge(&mut self, parent: SymbolId, child: SymbolId) -> Result<EdgeId, WlnError> {
        if self.edges.len() >= self.max_edges {
            return Err(WlnError::GraphTooLarge { what: "edges", cap: self.max_edges });
        }
        for &e in &self.child_edges(parent) {
            if self.edges[e].child == child {
                return Err(WlnError::DuplicateEdge {
                    parent: self.symbols[parent].tag,
                    child: self.symbols[child].tag,
                });
            }
        }
        self.check_capacity(child, 1)?;
        self.check_capacity(parent, 1)?;

        let id = self.edges.len();
        self.edges.push(WlnEdge { parent, child, order: 1, aromatic: false, next: None });

        // thread onto the tail so child order tracks insertion order
        match self.symbols[parent].bonds {
            None => self.symbols[parent].bonds = Some(id),
            Some(head) => {
                let mut cur = head;
                while let Some(next) = self.edges[cur].next {
                    cur = next;
                }
                self.edges[cur].next = Some(id);
            }
        }

        self.symbols[child].previous = Some(parent);
        self.symbols[child].num_edges += 1;
        self.symbols[parent].num_edges += 1;
        self.symbols[parent].num_children += 1;
        Ok(id)
    }

    /// Raise the order of an existing edge by `n`, revalidating both caps.
    pub fn unsaturate(&mut self, edge: EdgeId, n: u8) -> Result<(), WlnError> {
        let (parent, child) = {
            let e = &self.edges[edge];
            (e.parent, e.child)
        };
        self.check_capacity(parent, n as u32)?;
        self.check_capacity(child, n as u32)?;
        self.edges[edge].order += n;
        self.symbols[parent].num_edges += n as u32;
        self.symbols[child].num_edges += n as u32;
        Ok(())
    }

    /// Unlink an edge from its parent's adjacency list and release both
    /// degrees. The arena slot stays allocated until the graph drops.
    pub fn remove_edge(&mut self, edge: EdgeId) {
        let (parent, child, order) = {
            let e = &self.edges[edge];
            (e.parent, e.child, e.order)
        };
        self.symbols[parent].num_edges -= order as u32;
        self.symbols[child].num_edges -= order as u32;
        self.symbols[parent].num_children -= 1;
        self.symbols[child].previous = None;

        let next = self.edges[edge].next;
        if self.symbols[parent].bonds == Some(edge) {
            self.symbols[parent].bonds = next;
            return;
        }
        let mut cur = self.symbols[parent].bonds;
        while let Some(e) = cur {
            if self.edges[e].next == Some(edge) {
                self.edges[e].next = next;
                return;
            }
            cur = self.edges[e].next;
        }
    }

    fn check_capacity(&self, id: SymbolId, extra: u32) -> Result<(), WlnError> {
        let s = &self.symbols[id];
        if s.num_edges + extra > s.allowed_edges {
            Err(WlnError::ValenceExceeded {
                tag: s.tag,
                have: s.num_edges + extra,
                cap: s.allowed_edges,
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn tag_of(smi: &str, atom: usize) -> char {
        let mol = parse(smi).unwrap();
        classify(&mol, n(atom)).unwrap().tag
    }

    #[test]
    fn carbon_classification() {
        assert_eq!(tag_of("C", 0), '1');
        assert_eq!(tag_of("CCC", 1), '1');
        // branching sp3 carbon, four single bonds
        assert_eq!(tag_of("CC(C)(C)C", 1), 'X');
        // three neighbors summing to three bonds
        assert_eq!(tag_of("CC(C)C", 1), 'Y');
        // carbonyl carbon: three neighbors, order sum four
        assert_eq!(tag_of("CC(=O)C", 1), 'X');
    }

    #[test]
    fn oxygen_classification() {
        assert_eq!(tag_of("CO", 1), 'Q');
        assert_eq!(tag_of("COC", 1), 'O');
        assert_eq!(tag_of("C[O-]", 1), 'O');
    }

    #[test]
    fn heteroatom_edge_caps() {
        let mol = parse("CP").unwrap();
        let c = classify(&mol, n(1)).unwrap();
        assert_eq!((c.tag, c.allowed_edges), ('P', 6));
        let mol = parse("CS").unwrap();
        let c = classify(&mol, n(1)).unwrap();
        assert_eq!((c.tag, c.allowed_edges), ('S', 6));
        let mol = parse("CN").unwrap();
        let c = classify(&mol, n(1)).unwrap();
        assert_eq!((c.tag, c.allowed_edges), ('N', 1));
    }

    #[test]
    fn halogen_tags() {
        assert_eq!(tag_of("CCl", 1), 'G');
        assert_eq!(tag_of("CBr", 1), 'E');
        assert_eq!(tag_of("CF", 1), 'F');
        assert_eq!(tag_of("CI", 1), 'I');
    }

    #[test]
    fn special_element() {
        let mol = parse("[Fe]").unwrap();
        let c = classify(&mol, n(0)).unwrap();
        assert_eq!(c.tag, '*');
        assert_eq!(c.special, Some("FE"));
        assert_eq!(c.allowed_edges, 8);
        assert_eq!(c.kind, SymbolKind::Special);
    }

    #[test]
    fn unknown_element_fails() {
        let mol = parse("[W]").unwrap();
        assert_eq!(
            classify(&mol, n(0)),
            Err(WlnError::UnknownElement { atomic_num: 74 })
        );
    }

    #[test]
    fn duplicate_edge_rejected() {
        let mut g = WlnGraph::new();
        let a = g.add_symbol('X', 4, SymbolKind::Standard).unwrap();
        let b = g.add_symbol('1', 4, SymbolKind::Standard).unwrap();
        g.add_edge(a, b).unwrap();
        assert!(matches!(g.add_edge(a, b), Err(WlnError::DuplicateEdge { .. })));
    }

    #[test]
    fn valence_cap_enforced() {
        let mut g = WlnGraph::new();
        let q = g.add_symbol('Q', 1, SymbolKind::Standard).unwrap();
        let a = g.add_symbol('1', 4, SymbolKind::Standard).unwrap();
        let b = g.add_symbol('1', 4, SymbolKind::Standard).unwrap();
        g.add_edge(q, a).unwrap();
        assert!(matches!(g.add_edge(q, b), Err(WlnError::ValenceExceeded { .. })));
    }

    #[test]
    fn unsaturate_revalidates() {
        let mut g = WlnGraph::new();
        let y = g.add_symbol('Y', 3, SymbolKind::Standard).unwrap();
        let o = g.add_symbol('O', 2, SymbolKind::Standard).unwrap();
        let e = g.add_edge(y, o).unwrap();
        g.unsaturate(e, 1).unwrap();
        assert_eq!(g.edge(e).order, 2);
        assert!(matches!(g.unsaturate(e, 1), Err(WlnError::ValenceExceeded { .. })));
    }

    #[test]
    fn pool_cap() {
        let mut g = WlnGraph::with_limits(1, 1);
        g.add_symbol('1', 4, SymbolKind::Standard).unwrap();
        assert!(matches!(
            g.add_symbol('1', 4, SymbolKind::Standard),
            Err(WlnError::GraphTooLarge { .. })
        ));
    }

    #[test]
    fn child_order_and_removal() {
        let mut g = WlnGraph::new();
        let p = g.add_symbol('X', 4, SymbolKind::Standard).unwrap();
        let a = g.add_symbol('1', 4, SymbolKind::Standard).unwrap();
        let b = g.add_symbol('1', 4, SymbolKind::Standard).unwrap();
        let c = g.add_symbol('1', 4, SymbolKind::Standard).unwrap();
        let ea = g.add_edge(p, a).unwrap();
        let eb = g.add_edge(p, b).unwrap();
        let ec = g.add_edge(p, c).unwrap();
        assert_eq!(g.child_edges(p), vec![ea, eb, ec]);

        g.remove_edge(eb);
        assert_eq!(g.child_edges(p), vec![ea, ec]);
        assert_eq!(g.symbol(p).num_edges, 2);
        assert_eq!(g.symbol(p).num_children, 2);
        assert_eq!(g.symbol(b).num_edges, 0);
    }
}
