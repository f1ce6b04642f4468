//! End-to-end writer scenarios: SMILES in, WLN out.

use wlncrab::fsm::wln_dfa;
use wlncrab::smiles::parse;
use wlncrab::{write_wln, WlnError};

fn wln(smi: &str) -> String {
    write_wln(&parse(smi).unwrap()).unwrap()
}

#[test]
fn literal_scenarios() {
    assert_eq!(wln("C"), "1");
    assert_eq!(wln("CCO"), "Q2");
    assert_eq!(wln("CC(=O)C"), "1V1");
    assert_eq!(wln("c1ccccc1"), "L6J");
    assert_eq!(wln("c1ccncc1"), "T6NJ");
    assert_eq!(wln("c1ccc2ccccc2c1"), "L66J");
}

#[test]
fn every_emitted_string_is_grammatical() {
    let dfa = wln_dfa(true);
    let corpus = [
        "C",
        "CC",
        "CCO",
        "CCCO",
        "CC(=O)C",
        "CC(C)C",
        "CC(C)(C)C",
        "C=C",
        "C#C",
        "CCN",
        "CCCl",
        "COC",
        "C[N+](=O)[O-]",
        "OS(=O)(=O)O",
        "[O-]S(=O)(=O)[O-]",
        "c1ccccc1",
        "c1ccncc1",
        "o1cccc1",
        "s1cccc1",
        "c1ccc2ccccc2c1",
        "C1CCCCC1",
        "C1CCC2CCCCC2C1",
        "Cc1ccccc1",
        "Oc1ccccc1",
        "CCc1ccccc1",
        "[Na+].[Cl-]",
        "c1ccccc1.[Na+]",
    ];
    for smi in corpus {
        let s = wln(smi);
        assert!(
            dfa.accepts(s.as_bytes()),
            "writer output {:?} for {:?} rejected by grammar",
            s,
            smi
        );
    }
}

#[test]
fn disconnected_components_in_toolkit_order() {
    assert_eq!(wln("[Na+].[Cl-]"), "-NA- &G");
    assert_eq!(wln("[Cl-].[Na+]"), "G &-NA-");
    assert_eq!(wln("c1ccccc1.[Na+]"), "L6J &-NA-");
}

#[test]
fn sulfate_prefers_double_bonded_dioxo_pair() {
    // both =O become W; the anionic oxygens stay ordinary ethers
    assert_eq!(wln("[O-]S(=O)(=O)[O-]"), "SWO&O");
    assert_eq!(wln("OS(=O)(=O)O"), "QSWQ");
}

#[test]
fn ring_substituents_use_locants() {
    assert_eq!(wln("Cc1ccccc1"), "L6J A1");
    assert_eq!(wln("CCc1ccccc1"), "L6J A2");
}

#[test]
fn empty_molecule_is_malformed() {
    let mol = wlncrab::Molecule::new();
    assert!(matches!(
        write_wln(&mol),
        Err(WlnError::MalformedInput { .. })
    ));
}

#[test]
fn branched_ring_junctions_are_rejected() {
    let mol = parse("C123C4CC1CC2CC3C4").unwrap();
    assert_eq!(write_wln(&mol), Err(WlnError::UnsupportedRingSystem));
}

#[test]
fn bridged_systems_are_unresolved() {
    let mol = parse("C1CC2CC1CC2").unwrap();
    assert_eq!(write_wln(&mol), Err(WlnError::UnresolvedRing));
}
