//! Acyclic transcription: build a WLN symbol tree for a non-ring fragment,
//! then emit it depth-first with branch-stack bookkeeping.

use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;

use crate::error::WlnError;
use crate::mol::Molecule;
use crate::rings::RingInfo;
use crate::symbol::{SymbolId, WlnGraph};

/// Shared atom ↔ symbol bookkeeping for one molecule's transcription.
#[derive(Debug, Default)]
pub(crate) struct Transcriber {
    atom_to_symbol: HashMap<NodeIndex, SymbolId>,
    symbol_to_atom: HashMap<SymbolId, NodeIndex>,
}

impl Transcriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_transcribed(&self, atom: NodeIndex) -> bool {
        self.atom_to_symbol.contains_key(&atom)
    }

    fn link(&mut self, atom: NodeIndex, symbol: SymbolId) {
        self.atom_to_symbol.insert(atom, symbol);
        self.symbol_to_atom.insert(symbol, atom);
    }

    fn charge_of(&self, mol: &Molecule, symbol: SymbolId) -> i8 {
        self.symbol_to_atom
            .get(&symbol)
            .map(|&a| mol.atom(a).formal_charge)
            .unwrap_or(0)
    }

    /// Grow the symbol tree for the non-ring fragment reachable from
    /// `start`. Anionic oxygens are never expanded from — they are reached
    /// through their parent so carbonyl and dioxo detection can claim them.
    pub fn build_tree(
        &mut self,
        mol: &Molecule,
        rings: &RingInfo,
        graph: &mut WlnGraph,
        start: NodeIndex,
    ) -> Result<Option<SymbolId>, WlnError> {
        let mut root = None;
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut stack = vec![start];

        while let Some(atom) = stack.pop() {
            if !visited.insert(atom) {
                continue;
            }

            let a = mol.atom(atom);
            if a.formal_charge == -1 && a.atomic_num == 8 {
                for nb in mol.neighbors(atom) {
                    if !visited.contains(&nb) && !rings.is_ring_atom(nb) {
                        stack.push(nb);
                    }
                }
                continue;
            }

            let node = match self.atom_to_symbol.get(&atom) {
                Some(&s) => s,
                None => {
                    let s = graph.create_node(mol, atom)?;
                    self.link(atom, s);
                    s
                }
            };
            if root.is_none() {
                root = Some(node);
            }

            for nb in mol.neighbors(atom) {
                if !self.atom_to_symbol.contains_key(&nb) && !rings.is_ring_atom(nb) {
                    let child = graph.create_node(mol, nb)?;
                    self.link(nb, child);
                    let bond_idx = mol
                        .bond_between(atom, nb)
                        .expect("neighbor iteration implies a bond");
                    let bond = mol.bond(bond_idx);
                    let edge = graph.add_edge(node, child)?;
                    let order = bond.order.as_u8();
                    if order > 1 {
                        graph.unsaturate(edge, order - 1)?;
                    }
                }
                if !visited.contains(&nb) && !rings.is_ring_atom(nb) {
                    stack.push(nb);
                }
            }
        }

        Ok(root)
    }

    /// Oxygen child that closes a carbonyl: double-bonded, or single-bonded
    /// anionic. Marks it visited so the DFS skips it.
    fn check_carbonyl(
        &self,
        mol: &Molecule,
        graph: &WlnGraph,
        sym: SymbolId,
        visited: &mut HashSet<SymbolId>,
    ) -> bool {
        for e in graph.child_edges(sym) {
            let edge = graph.edge(e);
            let child = graph.symbol(edge.child);
            if child.tag == 'O' && (edge.order == 2 || self.charge_of(mol, edge.child) == -1) {
                visited.insert(edge.child);
                return true;
            }
        }
        false
    }

    /// Two oxygen children forming a dioxo pair, preferring =O over −O⁻.
    /// Marks the chosen pair visited.
    fn check_dioxo(
        &self,
        mol: &Molecule,
        graph: &WlnGraph,
        sym: SymbolId,
        visited: &mut HashSet<SymbolId>,
    ) -> bool {
        let mut doubles: Vec<SymbolId> = Vec::new();
        let mut anions: Vec<SymbolId> = Vec::new();
        for e in graph.child_edges(sym) {
            let edge = graph.edge(e);
            let child = graph.symbol(edge.child);
            if child.tag != 'O' {
                continue;
            }
            if edge.order == 2 {
                doubles.push(edge.child);
            } else if self.charge_of(mol, edge.child) == -1 {
                anions.push(edge.child);
            }
        }
        let chosen: Vec<SymbolId> = doubles.into_iter().chain(anions).take(2).collect();
        if chosen.len() < 2 {
            return false;
        }
        visited.extend(chosen);
        true
    }

    /// Absorb a run of single-bonded methylene symbols and emit its length.
    /// Returns the chain's last symbol, which becomes the DFS cursor.
    fn write_carbon_chain(
        &self,
        graph: &WlnGraph,
        start: SymbolId,
        visited: &mut HashSet<SymbolId>,
        out: &mut String,
    ) -> SymbolId {
        let mut carbons = 1u32;
        let mut cursor = start;
        loop {
            let next = graph.symbol(cursor).bonds.and_then(|e| {
                let edge = graph.edge(e);
                (edge.order == 1 && graph.symbol(edge.child).tag == '1').then_some(edge.child)
            });
            match next {
                Some(child) => {
                    carbons += 1;
                    cursor = child;
                    visited.insert(cursor);
                }
                None => break,
            }
        }
        out.push_str(&carbons.to_string());
        cursor
    }

    /// Emit the notation for the tree under `root`.
    pub fn write_node(
        &mut self,
        mol: &Molecule,
        graph: &mut WlnGraph,
        root: SymbolId,
        out: &mut String,
    ) -> Result<(), WlnError> {
        let mut stack: Vec<(SymbolId, u8)> = vec![(root, 0)];
        let mut branch_stack: Vec<SymbolId> = Vec::new();
        let mut visited: HashSet<SymbolId> = HashSet::new();
        let mut prev: Option<SymbolId> = None;
        let mut following_terminator = false;

        while let Some((top, order)) = stack.pop() {
            // branch return: unwind to the symbol that owns this child
            let top_previous = graph.symbol(top).previous;
            match (top_previous, prev) {
                (Some(parent), Some(p)) if parent != p && !branch_stack.is_empty() => {
                    if !following_terminator {
                        out.push('&');
                    }
                    while let Some(&stack_top) = branch_stack.last() {
                        if stack_top == parent {
                            break;
                        }
                        let s = graph.symbol(stack_top);
                        if s.num_children != s.on_child || s.num_edges < s.allowed_edges {
                            out.push('&');
                        }
                        branch_stack.pop();
                    }
                    graph.symbol_mut(parent).on_child += 1;
                }
                (_, Some(p)) => {
                    graph.symbol_mut(p).on_child += 1;
                }
                _ => {}
            }
            following_terminator = false;
            visited.insert(top);
            let mut cursor = top;
            prev = Some(top);

            if order == 2 {
                out.push('U');
            }
            if order == 3 {
                out.push_str("UU");
            }

            match graph.symbol(top).tag {
                'O' => out.push('O'),

                'Q' => {
                    out.push('Q');
                    if graph.symbol(top).num_edges == 0 {
                        out.push('H');
                    }
                    if let Some(&bt) = branch_stack.last() {
                        prev = Some(bt);
                        following_terminator = true;
                    }
                }

                '1' => {
                    cursor = self.write_carbon_chain(graph, top, &mut visited, out);
                    prev = Some(cursor);
                }

                tag @ ('Y' | 'X') => {
                    if self.check_dioxo(mol, graph, top, &mut visited) {
                        out.push(tag);
                        out.push('W');
                    } else if self.check_carbonyl(mol, graph, top, &mut visited) {
                        out.push('V');
                    } else {
                        out.push(tag);
                        branch_stack.push(top);
                    }
                }

                'N' => {
                    let sym = graph.symbol(top);
                    let (num_edges, num_children) = (sym.num_edges, sym.num_children);
                    if num_edges < 2 {
                        out.push('Z');
                        if num_edges == 0 {
                            out.push('H');
                        }
                        if let Some(&bt) = branch_stack.last() {
                            prev = Some(bt);
                            following_terminator = true;
                        }
                    } else if num_children < 2 && num_edges < 3 {
                        out.push('M');
                    } else if num_children < 3 && num_edges < 4 {
                        out.push('N');
                        if self.check_dioxo(mol, graph, top, &mut visited) {
                            out.push('W');
                        }
                        branch_stack.push(top);
                    } else if self.check_dioxo(mol, graph, top, &mut visited) {
                        out.push_str("NW");
                    } else {
                        // quaternary: implied methyls still open a branch
                        out.push('K');
                        branch_stack.push(top);
                    }
                }

                tag @ ('E' | 'F' | 'G' | 'I') => {
                    if graph.symbol(top).num_edges > 1 {
                        out.push('-');
                        out.push(tag);
                        out.push('-');
                        if self.check_dioxo(mol, graph, top, &mut visited) {
                            out.push('W');
                        }
                        branch_stack.push(top);
                    } else {
                        out.push(tag);
                        if graph.symbol(top).num_edges == 0 && self.charge_of(mol, top) == 0 {
                            out.push('H');
                        }
                        if let Some(&bt) = branch_stack.last() {
                            prev = Some(bt);
                            following_terminator = true;
                        }
                    }
                }

                tag @ ('B' | 'S' | 'P') => {
                    out.push(tag);
                    if self.check_dioxo(mol, graph, top, &mut visited) {
                        out.push('W');
                    }
                    if graph.symbol(top).num_children > 0 {
                        branch_stack.push(top);
                    }
                }

                '*' => {
                    out.push('-');
                    out.push_str(&graph.symbol(top).special);
                    out.push('-');
                    if graph.symbol(top).num_edges == 0 && self.charge_of(mol, top) == 0 {
                        out.push('H');
                    } else if graph.symbol(top).num_children > 0 {
                        branch_stack.push(top);
                    }
                }

                tag => return Err(WlnError::UnhandledSymbol { tag }),
            }

            for e in graph.child_edges(cursor) {
                let edge = graph.edge(e);
                if !visited.contains(&edge.child) {
                    stack.push((edge.child, edge.order));
                }
            }
        }
        Ok(())
    }

    /// Build and emit one acyclic fragment. Errors when nothing is rooted
    /// (a lone anionic oxygen cannot head a tree).
    pub fn transcribe_fragment(
        &mut self,
        mol: &Molecule,
        rings: &RingInfo,
        graph: &mut WlnGraph,
        start: NodeIndex,
        out: &mut String,
    ) -> Result<(), WlnError> {
        match self.build_tree(mol, rings, graph, start)? {
            Some(root) => self.write_node(mol, graph, root, out),
            None => Err(WlnError::MalformedInput {
                reason: "fragment has no transcribable root atom".into(),
            }),
        }
    }
}
