use super::context::CandidateSets;
use super::graph::AtomGraph;
use super::report::{Diagnostics, Resolution, Warning};

/// Turns final candidate sets into one [`Resolution`] per atom.
///
/// An atom resolves when exactly one identifier survives blacklist
/// subtraction; anything else is reported and left unresolved.
pub(crate) fn reduce<G: AtomGraph + ?Sized>(
    graph: &G,
    states: &[CandidateSets],
    diagnostics: &mut Diagnostics,
) -> Vec<Resolution> {
    states
        .iter()
        .enumerate()
        .map(|(atom, sets)| {
            if graph.is_ghost(atom) {
                return Resolution::Skipped;
            }
            let mut candidates = sets.candidates();
            if candidates.len() == 1 {
                return Resolution::Typed(candidates.swap_remove(0));
            }
            diagnostics.emit(Warning::Unresolved {
                atom,
                kind: graph.kind(atom).to_string(),
                whitelist: sets.whitelist().iter().cloned().collect(),
                blacklist: sets.blacklist().iter().cloned().collect(),
            });
            Resolution::Unresolved(candidates)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::compound::{Compound, ROOT};
    use crate::typer::context::TypingContext;
    use crate::typer::rule::{Rule, RuleId};

    #[test]
    fn exactly_one_survivor_resolves() {
        let atoms = vec![Atom::new("C", [0.0; 3]), Atom::new("C", [0.0; 3]), Atom::new("C", [0.0; 3])];
        let mut c = Compound::from_parts("C3", atoms, [(0, 1), (1, 2)]).unwrap();
        c.add_port(ROOT, Some(0), None).unwrap();

        let mut ctx = TypingContext::new(&c);
        ctx.apply(0, &Rule::new("141"));
        ctx.apply(0, &Rule::new("145").blacklisting(["141"]));
        ctx.apply(1, &Rule::new("141"));
        ctx.apply(1, &Rule::new("142"));
        let states = ctx.into_states();

        let mut diagnostics = Diagnostics::default();
        let resolutions = reduce(&c, &states, &mut diagnostics);

        assert_eq!(resolutions[0], Resolution::Typed(RuleId::from("145")));
        assert_eq!(
            resolutions[1],
            Resolution::Unresolved(vec![RuleId::from("141"), RuleId::from("142")])
        );
        assert_eq!(resolutions[2], Resolution::Unresolved(Vec::new()));
        assert!(resolutions[3..].iter().all(|r| *r == Resolution::Skipped));

        let warnings = diagnostics.into_warnings();
        assert_eq!(warnings.len(), 2);
        assert!(matches!(&warnings[0], Warning::Unresolved { atom: 1, whitelist, .. } if whitelist.len() == 2));
    }

    #[test]
    fn everything_blacklisted_is_unresolved() {
        let atoms = vec![Atom::new("H", [0.0; 3])];
        let c = Compound::from_parts("H", atoms, []).unwrap();
        let mut ctx = TypingContext::new(&c);
        ctx.apply(0, &Rule::new("140").blacklisting(["140"]));
        let states = ctx.into_states();

        let mut diagnostics = Diagnostics::default();
        assert_eq!(
            reduce(&c, &states, &mut diagnostics),
            vec![Resolution::Unresolved(Vec::new())]
        );
    }
}
