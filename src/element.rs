//! Element numbers, symbols and their WLN spellings.

/// Periodic table symbols, indexed by atomic number − 1.
const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn",
    "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

pub fn symbol(atomic_num: u8) -> Option<&'static str> {
    if atomic_num == 0 {
        return None;
    }
    SYMBOLS.get(atomic_num as usize - 1).copied()
}

pub fn from_symbol(sym: &str) -> Option<u8> {
    SYMBOLS
        .iter()
        .position(|&s| s == sym)
        .map(|i| (i + 1) as u8)
}

/// Elements that WLN spells with a single standard tag rather than a
/// `-XX-` special. These never reach the special table.
fn has_standard_tag(atomic_num: u8) -> bool {
    matches!(atomic_num, 1 | 5 | 6 | 7 | 8 | 9 | 15 | 16 | 17 | 35 | 53)
}

/// Two-letter WLN code for a `-XX-` special element symbol.
///
/// Single-letter element symbols are padded the way historical WLN tables
/// did it (K→KA, U→UR, V→VA, Y→YT); tungsten has no assigned code and is
/// rejected, as are the elements that already own a standard WLN tag.
pub fn wln_special(atomic_num: u8) -> Option<&'static str> {
    if has_standard_tag(atomic_num) {
        return None;
    }
    match atomic_num {
        19 => Some("KA"),
        23 => Some("VA"),
        39 => Some("YT"),
        74 => None,
        92 => Some("UR"),
        89 => Some("AC"),
        47 => Some("AG"),
        13 => Some("AL"),
        95 => Some("AM"),
        18 => Some("AR"),
        33 => Some("AS"),
        85 => Some("AT"),
        79 => Some("AU"),
        56 => Some("BA"),
        4 => Some("BE"),
        107 => Some("BH"),
        83 => Some("BI"),
        97 => Some("BK"),
        20 => Some("CA"),
        48 => Some("CD"),
        58 => Some("CE"),
        98 => Some("CF"),
        96 => Some("CM"),
        112 => Some("CN"),
        27 => Some("CO"),
        24 => Some("CR"),
        55 => Some("CS"),
        29 => Some("CU"),
        105 => Some("DB"),
        110 => Some("DS"),
        66 => Some("DY"),
        68 => Some("ER"),
        99 => Some("ES"),
        63 => Some("EU"),
        26 => Some("FE"),
        114 => Some("FL"),
        100 => Some("FM"),
        87 => Some("FR"),
        31 => Some("GA"),
        64 => Some("GD"),
        32 => Some("GE"),
        2 => Some("HE"),
        72 => Some("HF"),
        80 => Some("HG"),
        67 => Some("HO"),
        108 => Some("HS"),
        49 => Some("IN"),
        77 => Some("IR"),
        36 => Some("KR"),
        57 => Some("LA"),
        3 => Some("LI"),
        103 => Some("LR"),
        71 => Some("LU"),
        116 => Some("LV"),
        115 => Some("MC"),
        101 => Some("MD"),
        12 => Some("MG"),
        25 => Some("MN"),
        42 => Some("MO"),
        109 => Some("MT"),
        11 => Some("NA"),
        41 => Some("NB"),
        60 => Some("ND"),
        10 => Some("NE"),
        113 => Some("NH"),
        28 => Some("NI"),
        102 => Some("NO"),
        93 => Some("NP"),
        118 => Some("OG"),
        76 => Some("OS"),
        91 => Some("PA"),
        82 => Some("PB"),
        46 => Some("PD"),
        61 => Some("PM"),
        84 => Some("PO"),
        59 => Some("PR"),
        78 => Some("PT"),
        94 => Some("PU"),
        88 => Some("RA"),
        37 => Some("RB"),
        75 => Some("RE"),
        104 => Some("RF"),
        111 => Some("RG"),
        45 => Some("RH"),
        86 => Some("RN"),
        44 => Some("RU"),
        51 => Some("SB"),
        21 => Some("SC"),
        34 => Some("SE"),
        106 => Some("SG"),
        14 => Some("SI"),
        62 => Some("SM"),
        50 => Some("SN"),
        38 => Some("SR"),
        73 => Some("TA"),
        65 => Some("TB"),
        43 => Some("TC"),
        52 => Some("TE"),
        90 => Some("TH"),
        22 => Some("TI"),
        81 => Some("TL"),
        69 => Some("TM"),
        117 => Some("TS"),
        54 => Some("XE"),
        70 => Some("YB"),
        30 => Some("ZN"),
        40 => Some("ZR"),
        _ => None,
    }
}

/// Default valences used to place implicit hydrogens on organic-subset
/// SMILES atoms.
pub fn default_valences(atomic_num: u8) -> &'static [u8] {
    match atomic_num {
        1 => &[1],
        5 => &[3],
        6 => &[4],
        7 => &[3, 5],
        8 => &[2],
        9 | 17 | 35 | 53 => &[1],
        15 => &[3, 5],
        16 => &[2, 4, 6],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_round_trip() {
        for z in 1..=118u8 {
            let sym = symbol(z).unwrap();
            assert_eq!(from_symbol(sym), Some(z));
        }
    }

    #[test]
    fn organic_subset_has_no_special() {
        for z in [1u8, 5, 6, 7, 8, 9, 15, 16, 17, 35, 53] {
            assert_eq!(wln_special(z), None);
        }
    }

    #[test]
    fn padded_single_letter_codes() {
        assert_eq!(wln_special(19), Some("KA"));
        assert_eq!(wln_special(92), Some("UR"));
        assert_eq!(wln_special(23), Some("VA"));
        assert_eq!(wln_special(39), Some("YT"));
    }

    #[test]
    fn tungsten_unassigned() {
        assert_eq!(wln_special(74), None);
    }

    #[test]
    fn two_letter_codes_are_uppercased_symbols() {
        assert_eq!(wln_special(26), Some("FE"));
        assert_eq!(wln_special(11), Some("NA"));
        assert_eq!(wln_special(14), Some("SI"));
        assert_eq!(wln_special(96), Some("CM"));
    }
}
