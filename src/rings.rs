//! SSSR perception.
//!
//! Candidate cycles come from a Horton-style enumeration (shortest paths
//! from every vertex to both ends of every edge); a greedy pass over the
//! candidates, smallest first, keeps the ones that are linearly independent
//! in the cycle space until the cyclomatic count is reached.

use std::collections::VecDeque;

use petgraph::algo::connected_components;
use petgraph::graph::NodeIndex;

use crate::mol::Molecule;

#[derive(Debug, Clone)]
pub struct RingInfo {
    rings: Vec<Vec<NodeIndex>>,
    /// Per atom: how many SSSR rings contain it. Index = atom index.
    shares: Vec<u32>,
}

impl RingInfo {
    pub fn sssr(mol: &Molecule) -> Self {
        let num_expected = Self::expected_ring_count(mol);
        let mut shares = vec![0u32; mol.atom_count()];
        if num_expected == 0 {
            return Self { rings: vec![], shares };
        }

        let candidates = horton_candidates(mol);
        let rings = select_independent_rings(&candidates, num_expected, mol);

        for ring in &rings {
            for &atom in ring {
                shares[atom.index()] += 1;
            }
        }
        Self { rings, shares }
    }

    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn rings(&self) -> &[Vec<NodeIndex>] {
        &self.rings
    }

    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.shares.get(atom.index()).is_some_and(|&s| s > 0)
    }

    /// Number of SSSR rings containing `atom` (the ring-share count).
    pub fn shares(&self, atom: NodeIndex) -> u32 {
        self.shares.get(atom.index()).copied().unwrap_or(0)
    }

    pub fn ring_contains(&self, ring: usize, atom: NodeIndex) -> bool {
        self.rings[ring].contains(&atom)
    }

    pub fn expected_ring_count(mol: &Molecule) -> usize {
        let v = mol.atom_count();
        let e = mol.bond_count();
        let c = connected_components(mol.graph());
        (e + c).saturating_sub(v)
    }
}

fn horton_candidates(mol: &Molecule) -> Vec<Vec<NodeIndex>> {
    let n = mol.atom_count();
    let dist = all_pairs_bfs(mol, n);
    let pred = all_pairs_predecessors(mol, n, &dist);

    let mut candidates: Vec<Vec<NodeIndex>> = Vec::new();

    for edge in mol.bonds() {
        let (u, v) = match mol.bond_endpoints(edge) {
            Some(pair) => pair,
            None => continue,
        };
        for w_idx in 0..n {
            let w = NodeIndex::new(w_idx);
            let du = dist[w.index()][u.index()];
            let dv = dist[w.index()][v.index()];
            if du == u32::MAX || dv == u32::MAX {
                continue;
            }
            if (du as usize + dv as usize + 1) < 3 {
                continue;
            }
            let path_u = reconstruct_path(&pred, w, u);
            let path_v = reconstruct_path(&pred, w, v);
            if paths_share_internal_node(&path_u, &path_v) {
                continue;
            }
            let mut ring = path_u;
            for &node in path_v[1..].iter().rev() {
                ring.push(node);
            }
            candidates.push(ring);
        }
    }

    candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    candidates.dedup();
    candidates
}

fn all_pairs_bfs(mol: &Molecule, n: usize) -> Vec<Vec<u32>> {
    let mut dist = vec![vec![u32::MAX; n]; n];
    for (src_idx, row) in dist.iter_mut().enumerate() {
        row[src_idx] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(NodeIndex::new(src_idx));
        while let Some(cur) = queue.pop_front() {
            let d = row[cur.index()];
            for nb in mol.neighbors(cur) {
                if row[nb.index()] == u32::MAX {
                    row[nb.index()] = d + 1;
                    queue.push_back(nb);
                }
            }
        }
    }
    dist
}

fn all_pairs_predecessors(
    mol: &Molecule,
    n: usize,
    dist: &[Vec<u32>],
) -> Vec<Vec<Option<NodeIndex>>> {
    let mut pred = vec![vec![None; n]; n];
    for src_idx in 0..n {
        let mut queue = VecDeque::new();
        queue.push_back(NodeIndex::new(src_idx));
        let mut visited = vec![false; n];
        visited[src_idx] = true;
        while let Some(cur) = queue.pop_front() {
            for nb in mol.neighbors(cur) {
                if !visited[nb.index()]
                    && dist[src_idx][nb.index()] == dist[src_idx][cur.index()] + 1
                {
                    visited[nb.index()] = true;
                    pred[src_idx][nb.index()] = Some(cur);
                    queue.push_back(nb);
                }
            }
        }
    }
    pred
}

fn reconstruct_path(
    pred: &[Vec<Option<NodeIndex>>],
    src: NodeIndex,
    dst: NodeIndex,
) -> Vec<NodeIndex> {
    let mut path = vec![dst];
    let mut cur = dst;
    while cur != src {
        match pred[src.index()][cur.index()] {
            Some(p) => {
                path.push(p);
                cur = p;
            }
            None => return vec![],
        }
    }
    path.reverse();
    path
}

fn paths_share_internal_node(path_u: &[NodeIndex], path_v: &[NodeIndex]) -> bool {
    if path_u.len() < 2 || path_v.len() < 2 {
        return false;
    }
    path_u[1..].iter().any(|node| path_v[1..].contains(node))
}

fn ring_to_edge_bitvector(ring: &[NodeIndex], mol: &Molecule) -> Vec<u64> {
    let num_words = mol.bond_count().div_ceil(64);
    let mut bv = vec![0u64; num_words];
    let len = ring.len();
    for i in 0..len {
        if let Some(edge) = mol.bond_between(ring[i], ring[(i + 1) % len]) {
            let idx = edge.index();
            bv[idx / 64] |= 1u64 << (idx % 64);
        }
    }
    bv
}

fn select_independent_rings(
    candidates: &[Vec<NodeIndex>],
    num_needed: usize,
    mol: &Molecule,
) -> Vec<Vec<NodeIndex>> {
    let mut result = Vec::with_capacity(num_needed);
    let mut basis: Vec<Vec<u64>> = Vec::with_capacity(num_needed);

    for ring in candidates {
        if result.len() >= num_needed {
            break;
        }
        let bv = ring_to_edge_bitvector(ring, mol);
        if bv.iter().all(|&w| w == 0) {
            continue;
        }
        if try_add_to_basis(&mut basis, bv) {
            result.push(normalize_ring(ring));
        }
    }

    result.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    result
}

fn try_add_to_basis(basis: &mut Vec<Vec<u64>>, candidate: Vec<u64>) -> bool {
    let mut v = candidate;
    for row in basis.iter() {
        if let Some(p) = leading_bit(row) {
            if v[p / 64] & (1u64 << (p % 64)) != 0 {
                for (vw, rw) in v.iter_mut().zip(row.iter()) {
                    *vw ^= *rw;
                }
            }
        }
    }
    if v.iter().all(|&w| w == 0) {
        return false;
    }
    basis.push(v);
    true
}

fn leading_bit(bv: &[u64]) -> Option<usize> {
    bv.iter()
        .enumerate()
        .find(|(_, &word)| word != 0)
        .map(|(i, &word)| i * 64 + word.trailing_zeros() as usize)
}

/// Rotate the cycle so its smallest index leads, and orient it so the
/// second entry is smaller than the last. Stable output for dedup and for
/// deterministic locant-path seeding.
fn normalize_ring(ring: &[NodeIndex]) -> Vec<NodeIndex> {
    if ring.is_empty() {
        return vec![];
    }
    let min_pos = ring
        .iter()
        .enumerate()
        .min_by_key(|&(_, idx)| idx)
        .map(|(i, _)| i)
        .unwrap_or(0);

    let len = ring.len();
    let mut normalized = Vec::with_capacity(len);
    for i in 0..len {
        normalized.push(ring[(min_pos + i) % len]);
    }
    if len > 2 && normalized[1] > normalized[len - 1] {
        normalized[1..].reverse();
    }
    normalized
}
