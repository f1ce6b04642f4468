/// Input-side atom of a molecular graph.
///
/// Carries exactly what the WLN writer consumes: element, formal charge,
/// the aromatic flag set by the SMILES front-end, and the implied-hydrogen
/// count. Computed properties (valence, degree, ring membership) live on
/// [`Molecule`](crate::Molecule) and [`RingInfo`](crate::rings::RingInfo).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Atom {
    /// Atomic number (1 = H, 6 = C, 7 = N, …).
    pub atomic_num: u8,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Whether the atom was written as an aromatic SMILES atom.
    pub is_aromatic: bool,
    /// Implied hydrogens. Not graph nodes; the writer treats them as
    /// invisible except where a terminator symbol spells one out.
    pub hydrogen_count: u8,
}

/// Concrete bond order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
}

impl BondOrder {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }
}

/// Input-side bond. Aromatic bonds enter the graph as single-order bonds
/// with the flag set; the writer never needs a Kekulé assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bond {
    pub order: BondOrder,
    pub is_aromatic: bool,
}

impl Bond {
    pub fn single() -> Self {
        Self { order: BondOrder::Single, is_aromatic: false }
    }

    pub fn of_order(order: BondOrder) -> Self {
        Self { order, is_aromatic: false }
    }

    pub fn aromatic() -> Self {
        Self { order: BondOrder::Single, is_aromatic: true }
    }
}
