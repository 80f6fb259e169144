mod common;

use common::*;
use opls_forge::{
    Atom, Compound, ROOT, Resolution, RuleCatalog, Typer, TyperConfig, UNKNOWN_TYPE, Warning,
    find_rings,
};

fn typer_with_passes(max_passes: usize) -> Typer {
    Typer::new(&TyperConfig {
        max_passes,
        ..TyperConfig::default()
    })
    .unwrap()
}

/// Every rule depends on the next atom down the chain, so the last atom's
/// seed needs one pass per link to reach atom 0.
const CHAIN_RULES: &str = r#"
[[rule]]
id = "r0"
element = "Y"

[[rule]]
id = "r1"
element = "X"
checks = [{ check = "neighbor_carries", ids = ["r0"] }]

[[rule]]
id = "r2"
element = "X"
checks = [{ check = "neighbor_carries", ids = ["r1"] }]

[[rule]]
id = "r3"
element = "X"
checks = [{ check = "neighbor_carries", ids = ["r2"] }]
"#;

fn chain() -> Compound {
    let atoms = ["X", "X", "X", "Y"]
        .iter()
        .map(|&k| Atom::new(k, [0.0; 3]))
        .collect();
    Compound::from_parts("chain", atoms, [(0, 1), (1, 2), (2, 3)]).unwrap()
}

#[test]
fn candidate_sets_grow_monotonically_with_passes() {
    for molecule in [benzaldehyde(), benzyl_alcohol(), biphenyl(), propene()] {
        let mut previous = typer_with_passes(1).type_graph(&molecule);
        for cap in 2..=6 {
            let next = typer_with_passes(cap).type_graph(&molecule);
            for (before, after) in previous.candidates.iter().zip(&next.candidates) {
                assert!(before.is_subset_of(after));
            }
            previous = next;
        }
    }
}

#[test]
fn rerunning_a_stable_state_changes_nothing() {
    let typer = Typer::new(&TyperConfig::default()).unwrap();
    for molecule in [benzyl_alcohol(), toluene(), ethanol()] {
        let first = typer.type_graph(&molecule);
        assert!(first.converged);

        let again = typer.resume(&molecule, first.candidates.clone());
        assert!(again.converged);
        assert_eq!(again.passes, 1);
        assert_eq!(again.candidates, first.candidates);
        assert_eq!(again.resolutions, first.resolutions);
    }
}

#[test]
fn runs_stop_at_the_pass_cap() {
    let catalog = RuleCatalog::from_toml(CHAIN_RULES).unwrap();
    let c = chain();

    let capped = Typer::with_catalog(
        catalog.clone(),
        &TyperConfig {
            max_passes: 2,
            ..TyperConfig::default()
        },
    )
    .type_graph(&c);
    assert_eq!(capped.passes, 2);
    assert!(!capped.converged);
    assert!(
        capped
            .warnings
            .contains(&Warning::NotConverged { passes: 2 })
    );
    assert_eq!(capped.type_of(0), None);

    let full = Typer::with_catalog(catalog, &TyperConfig::default()).type_graph(&c);
    assert!(full.converged);
    assert!(full.passes <= opls_forge::DEFAULT_MAX_PASSES);
    assert_eq!(full.type_of(0), Some("r3"));
    assert_eq!(full.type_of(3), Some("r0"));
}

#[test]
fn every_ring_is_found_in_both_directions() {
    let b = biphenyl();
    for start in 0..12 {
        let rings = find_rings(&b, start, 6);
        assert_eq!(rings.len(), 2, "atom {start}");
        let mut reversed = rings[1][1..].to_vec();
        reversed.reverse();
        assert_eq!(rings[0][0], start);
        assert_eq!(rings[0][1..], reversed[..]);
        assert!(find_rings(&b, start, 5).is_empty());
    }
    for h in 12..b.atom_count() {
        assert!(find_rings(&b, h, 6).is_empty());
    }
}

#[test]
fn reduction_is_deterministic() {
    let typer = Typer::new(&TyperConfig::default()).unwrap();
    let molecule = benzyl_alcohol();
    let first = typer.type_graph(&molecule);
    for _ in 0..5 {
        let again = typer.type_graph(&molecule);
        assert_eq!(again.resolutions, first.resolutions);
        assert_eq!(again.warnings, first.warnings);
    }

    for sets in &first.candidates {
        let candidates = sets.candidates();
        let mut sorted = candidates.clone();
        sorted.sort();
        assert_eq!(candidates, sorted);
    }
}

#[test]
fn uncovered_element_is_reported_once_and_does_not_block_others() {
    let mut m = methane();
    let argon = m.add_atom(ROOT, Atom::new("Ar", [4.0, 0.0, 0.0]), None).unwrap();

    let report = type_with_defaults(&mut m);

    let gaps: Vec<&Warning> = report.coverage_gaps().collect();
    assert_eq!(gaps.len(), 1);
    assert!(matches!(
        gaps[0],
        Warning::NoRulesForKind { atom, kind } if *atom == argon && kind == "Ar"
    ));
    assert!(report.passes > 1);
    assert_eq!(
        m.atoms[argon].extra(opls_forge::OPLS_TYPE_KEY).and_then(|v| v.as_text()),
        Some(UNKNOWN_TYPE)
    );
    assert_eq!(report.type_of(0), Some("138"));
    assert_eq!(report.typed_count(), 5);
    assert_eq!(report.unresolved_count(), 1);
}

#[test]
fn missing_degree_bucket_is_a_coverage_gap() {
    // Five-coordinate carbon: the C bucket has no degree-5 rules.
    let mut c = molecule("CH5", &["C"], &[], &[5]);
    let report = type_with_defaults(&mut c);

    let gaps: Vec<&Warning> = report.coverage_gaps().collect();
    assert!(matches!(
        gaps[..],
        [Warning::NoRulesForDegree { atom: 0, degree: 5, .. }]
    ));
    assert_eq!(report.resolutions[0], Resolution::Unresolved(Vec::new()));
    assert_eq!(report.type_of(1), Some("140"));
}

#[test]
fn ghost_atoms_are_never_typed() {
    let mut m = methane();
    let port = m.add_port(ROOT, Some(1), Some("tail")).unwrap();
    let report = type_with_defaults(&mut m);

    let ghosts = m.atoms_in(port, false);
    assert_eq!(ghosts.len(), 8);
    for ghost in ghosts {
        assert_eq!(report.resolutions[ghost], Resolution::Skipped);
        assert!(report.candidates[ghost].is_empty());
    }
    assert!(report.warnings.is_empty());
    assert_eq!(report.typed_count(), 5);
}

#[test]
fn mutually_blacklisting_rules_are_flagged_at_build_time() {
    let catalog = RuleCatalog::from_toml(
        r#"
        [[rule]]
        id = "a"
        element = "C"
        degree = 4
        neighbors = [{ op = "exactly", kind = "H", count = 4 }]
        blacklist = ["b"]

        [[rule]]
        id = "b"
        element = "C"
        degree = 4
        neighbors = [{ op = "at_least", kind = "H", count = 3 }]
        blacklist = ["a"]
        "#,
    )
    .unwrap();

    assert!(
        catalog
            .warnings()
            .iter()
            .any(|w| matches!(w, Warning::CyclicPrecedence { .. }))
    );
    assert!(catalog.warnings().iter().all(Warning::is_catalog));

    // Typing still runs; the first rule to fire shuts the other out.
    let report = Typer::with_catalog(catalog, &TyperConfig::default()).type_graph(&methane());
    assert_eq!(report.type_of(0), Some("a"));
    assert!(report.candidates[0].blacklist().contains("b"));
}

#[test]
fn builtin_catalog_is_clean() {
    let catalog = RuleCatalog::builtin();
    assert!(catalog.warnings().is_empty());
    assert!(catalog.get("145B").is_some());
    assert_eq!(catalog.elements().collect::<Vec<_>>(), vec!["C", "H", "O"]);
}
