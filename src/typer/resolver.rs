use super::catalog::RuleCatalog;
use super::context::TypingContext;
use super::graph::AtomGraph;
use super::report::{Diagnostics, Warning};
use super::rule::RuleId;
use crate::model::compound::AtomId;

/// How a resolution loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPoint {
    /// Passes executed, including the final unchanged one.
    pub passes: usize,
    pub converged: bool,
}

/// Applies a catalog to every atom until the candidate sets stop growing.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'c> {
    catalog: &'c RuleCatalog,
    max_passes: usize,
}

impl<'c> Resolver<'c> {
    pub fn new(catalog: &'c RuleCatalog, max_passes: usize) -> Self {
        Self {
            catalog,
            max_passes,
        }
    }

    pub(crate) fn resolve<G: AtomGraph + ?Sized>(
        &self,
        ctx: &mut TypingContext<'_, G>,
        diagnostics: &mut Diagnostics,
    ) -> FixedPoint {
        for pass in 1..=self.max_passes {
            let before = ctx.total_len();
            for atom in 0..ctx.graph().atom_count() {
                if ctx.graph().is_ghost(atom) {
                    continue;
                }
                self.visit(atom, ctx, diagnostics);
            }
            let after = ctx.total_len();
            log::debug!("pass {pass}: {before} -> {after} candidate entries");

            if before == after {
                return FixedPoint {
                    passes: pass,
                    converged: true,
                };
            }
        }

        diagnostics.emit(Warning::NotConverged {
            passes: self.max_passes,
        });
        FixedPoint {
            passes: self.max_passes,
            converged: false,
        }
    }

    fn visit<G: AtomGraph + ?Sized>(
        &self,
        atom: AtomId,
        ctx: &mut TypingContext<'_, G>,
        diagnostics: &mut Diagnostics,
    ) {
        let graph = ctx.graph();
        let kind = graph.kind(atom);
        let degree = graph.degree(atom);

        for id in self.catalog.wildcard() {
            self.run_rule(atom, id, ctx);
        }

        let Some(bucket) = self.catalog.bucket(kind) else {
            if ctx.note_gap(atom) {
                diagnostics.emit(Warning::NoRulesForKind {
                    atom,
                    kind: kind.to_string(),
                });
            }
            return;
        };

        for id in bucket.any_degree() {
            self.run_rule(atom, id, ctx);
        }

        match bucket.degree(degree) {
            Some(ids) => {
                for id in ids {
                    self.run_rule(atom, id, ctx);
                }
            }
            None => {
                if ctx.note_gap(atom) {
                    diagnostics.emit(Warning::NoRulesForDegree {
                        atom,
                        kind: kind.to_string(),
                        degree,
                    });
                }
            }
        }
    }

    /// Evaluates one rule unless its id is already recorded on the atom.
    fn run_rule<G: AtomGraph + ?Sized>(
        &self,
        atom: AtomId,
        id: &RuleId,
        ctx: &mut TypingContext<'_, G>,
    ) {
        if ctx.state(atom).contains(id) {
            return;
        }
        let Some(rule) = self.catalog.get(id.as_str()) else {
            return;
        };
        if rule.matches(atom, ctx) {
            ctx.apply(atom, rule);
        }
    }
}
