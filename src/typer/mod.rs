//! OPLS-AA atom typing.
//!
//! Typing is a fixed-point computation over per-atom candidate sets. Every
//! applicable [`Rule`] adds its whitelist and blacklist identifiers to the
//! atom it fires on; rules may inspect the candidates already carried by
//! neighbors, so the catalog is re-applied until no set grows. The surviving
//! identifier (whitelist minus blacklist) becomes the atom type.
//!
//! Problems never abort a run. They are logged through the `log` facade and
//! collected as [`Warning`]s on the returned [`TypingReport`]; atoms that do
//! not resolve to exactly one type receive [`UNKNOWN_TYPE`].

mod catalog;
mod config;
mod context;
mod error;
mod graph;
mod precedence;
mod profile;
mod reducer;
mod report;
mod resolver;
mod rings;
mod rule;

pub use catalog::{ElementBucket, RuleCatalog};
pub use config::{DEFAULT_MAX_PASSES, TyperConfig};
pub use context::CandidateSets;
pub use error::Error;
pub use graph::AtomGraph;
pub use precedence::PatternKey;
pub use profile::NeighborProfile;
pub use report::{Resolution, TypingReport, Warning};
pub use rings::{RingSpec, find_rings};
pub use rule::{Check, Constraint, Rule, RuleId};

use crate::model::atom::AttrValue;
use crate::model::compound::Compound;
use context::TypingContext;
use report::Diagnostics;
use resolver::Resolver;

/// Attribute key receiving the resolved type.
pub const OPLS_TYPE_KEY: &str = "opls_type";
/// Attribute key mirroring the final whitelist.
pub const WHITELIST_KEY: &str = "opls_whitelist";
/// Attribute key mirroring the final blacklist.
pub const BLACKLIST_KEY: &str = "opls_blacklist";
/// Type written to atoms that did not resolve.
pub const UNKNOWN_TYPE: &str = "XXX";

#[derive(Debug, Clone)]
enum CatalogSource {
    Builtin,
    Custom(RuleCatalog),
}

/// Reusable typing engine bound to one rule catalog.
#[derive(Debug, Clone)]
pub struct Typer {
    catalog: CatalogSource,
    max_passes: usize,
    debug: bool,
}

impl Typer {
    /// Builds a typer, parsing `config.rules` when a custom table is given.
    pub fn new(config: &TyperConfig) -> Result<Self, Error> {
        let catalog = match config.rules.as_deref() {
            Some(toml) => CatalogSource::Custom(RuleCatalog::from_toml(toml)?),
            None => CatalogSource::Builtin,
        };
        Ok(Self {
            catalog,
            max_passes: config.max_passes,
            debug: config.debug,
        })
    }

    /// Builds a typer over an already constructed catalog.
    pub fn with_catalog(catalog: RuleCatalog, config: &TyperConfig) -> Self {
        Self {
            catalog: CatalogSource::Custom(catalog),
            max_passes: config.max_passes,
            debug: config.debug,
        }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        match &self.catalog {
            CatalogSource::Builtin => RuleCatalog::builtin(),
            CatalogSource::Custom(catalog) => catalog,
        }
    }

    /// Types any graph without writing results anywhere.
    pub fn type_graph<G: AtomGraph + ?Sized>(&self, graph: &G) -> TypingReport {
        self.execute(TypingContext::new(graph))
    }

    /// Continues typing from candidate sets of an earlier run, such as
    /// [`TypingReport::candidates`]. Missing entries start empty.
    pub fn resume<G: AtomGraph + ?Sized>(
        &self,
        graph: &G,
        candidates: Vec<CandidateSets>,
    ) -> TypingReport {
        self.execute(TypingContext::resume(graph, candidates))
    }

    fn execute<G: AtomGraph + ?Sized>(&self, mut ctx: TypingContext<'_, G>) -> TypingReport {
        let mut diagnostics = Diagnostics::default();
        let graph = ctx.graph();

        let fixed = Resolver::new(self.catalog(), self.max_passes).resolve(&mut ctx, &mut diagnostics);
        let candidates = ctx.into_states();
        let resolutions = reducer::reduce(graph, &candidates, &mut diagnostics);

        let report = TypingReport {
            resolutions,
            candidates,
            passes: fixed.passes,
            converged: fixed.converged,
            warnings: diagnostics.into_warnings(),
        };
        log::info!(
            "typed {} of {} atoms in {} passes ({} warnings)",
            report.typed_count(),
            report.typed_count() + report.unresolved_count(),
            report.passes,
            report.warnings.len()
        );
        report
    }

    /// Types a compound and writes the results into its atoms' attributes.
    pub fn run(&self, compound: &mut Compound) -> TypingReport {
        let report = self.type_graph(compound);
        self.write_back(compound, &report);
        report
    }

    fn write_back(&self, compound: &mut Compound, report: &TypingReport) {
        let rows = compound
            .atoms
            .iter_mut()
            .zip(report.resolutions.iter().zip(&report.candidates));
        for (atom, (resolution, sets)) in rows {
            let opls_type = match resolution {
                Resolution::Skipped => continue,
                _ if self.debug => AttrValue::List(
                    sets.candidates().iter().map(ToString::to_string).collect(),
                ),
                Resolution::Typed(id) => AttrValue::Text(id.to_string()),
                Resolution::Unresolved(_) => AttrValue::Text(UNKNOWN_TYPE.to_string()),
            };
            atom.set_extra(OPLS_TYPE_KEY, opls_type);
            atom.set_extra(
                WHITELIST_KEY,
                AttrValue::List(sets.whitelist().iter().map(ToString::to_string).collect()),
            );
            atom.set_extra(
                BLACKLIST_KEY,
                AttrValue::List(sets.blacklist().iter().map(ToString::to_string).collect()),
            );
        }
    }
}

/// Types `compound` in one call.
pub fn assign_types(compound: &mut Compound, config: &TyperConfig) -> Result<TypingReport, Error> {
    Ok(Typer::new(config)?.run(compound))
}
