//! Asset build pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            Class Phase (rayon, 4 branches)               │
//! │  html ‖ css ‖ js ‖ assets                                │
//! │  each: transform (par_iter) → revise → write → manifest  │
//! └──────────────────────────────────────────────────────────┘
//!
//! ┌──────────────────────────────────────────────────────────┐
//! │            Revision Phase (sequential)                   │
//! │  rewrite(css) → rewrite(js) → rewrite(assets)            │
//! │  → remove manifests                                      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! `prepare_output` runs first and decides whether the output root is
//! emptied. The revision phase only runs when `BuildMode::revision` is set.
//! The first error stops the pipeline; there is no rollback.

mod class;
pub mod error;
pub mod manifest;
pub mod revision;
pub mod rewrite;
pub mod transform;


use std::sync::atomic::AtomicBool;

use crate::asset::{AssetRoute, clean_output, scan_class};
use crate::config::SiteConfig;
use crate::core::{AssetClass, BuildMode, is_shutdown};
use crate::freshness::OutputStamp;
use crate::logger::ProgressLine;

pub use class::ClassOutput;
pub use error::BuildError;
pub use rewrite::RewriteStats;

use class::ClassBuild;
use transform::Transformers;

// =============================================================================
// Types
// =============================================================================

/// Scanned sources of every class, in `AssetClass::ALL` order.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    routes: [Vec<AssetRoute>; 4],
}

impl BuildPlan {
    /// Scan all source directories.
    pub fn scan(config: &SiteConfig) -> Result<Self, BuildError> {
        let source = &config.paths.source;
        Ok(Self {
            routes: [
                scan_class(source, AssetClass::Html)?,
                scan_class(source, AssetClass::Css)?,
                scan_class(source, AssetClass::Js)?,
                scan_class(source, AssetClass::Image)?,
            ],
        })
    }

    /// `(class name, file count)` pairs for the progress line.
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        AssetClass::ALL
            .iter()
            .zip(&self.routes)
            .map(|(class, routes)| (class.name(), routes.len()))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }
}

/// Outcome of the revision phase.
#[derive(Debug, Clone, Default)]
pub struct RevisionReport {
    /// One entry per revisioned class, in rewrite order.
    pub rewrites: Vec<(AssetClass, RewriteStats)>,
    pub manifests_removed: usize,
}

/// Outcome of a whole build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub classes: Vec<ClassOutput>,
    pub revision: Option<RevisionReport>,
}

// =============================================================================
// Phases
// =============================================================================

/// Empty the output root unless an incremental build can reuse it, then
/// stamp it with the kind of build about to write it.
///
/// Release builds always start clean. Development builds keep the output
/// only when the previous build was a development build into the same root.
/// Returns the number of removed entries.
pub fn prepare_output(config: &SiteConfig, mode: BuildMode, force_clean: bool) -> Result<usize, BuildError> {
    let root = &config.paths.output.root;
    let stamp = OutputStamp::new(mode, root);
    let previous = OutputStamp::load(&config.root);

    let removed = if force_clean || !stamp.can_reuse(previous.as_ref()) {
        clean_output(root)?
    } else {
        0
    };

    stamp
        .save(&config.root)
        .map_err(|err| BuildError::io(OutputStamp::path(&config.root), err))?;
    Ok(removed)
}

/// Build every class of `plan`, then run the revision phase if enabled.
pub fn run(
    config: &SiteConfig,
    mode: BuildMode,
    plan: BuildPlan,
    progress: Option<&ProgressLine>,
) -> Result<BuildReport, BuildError> {
    let classes = build_classes(config, mode, plan, progress)?;
    let revision = if mode.revision {
        Some(apply_revision(config)?)
    } else {
        None
    };
    Ok(BuildReport { classes, revision })
}

/// Run the four class branches concurrently.
///
/// After the first failure the other branches stop before writing. The
/// reported error is the first real one in `AssetClass::ALL` order, never a
/// sibling's `Aborted`.
pub fn build_classes(
    config: &SiteConfig,
    mode: BuildMode,
    plan: BuildPlan,
    progress: Option<&ProgressLine>,
) -> Result<Vec<ClassOutput>, BuildError> {
    let transformers = Transformers::new(config, mode)?;
    let abort = AtomicBool::new(false);
    let ctx = ClassBuild {
        config,
        mode,
        transformers: &transformers,
        abort: &abort,
        progress,
    };

    let [html, css, js, img] = plan.routes;
    let ((html, css), (js, img)) = rayon::join(
        || {
            rayon::join(
                || ctx.run(AssetClass::Html, html),
                || ctx.run(AssetClass::Css, css),
            )
        },
        || {
            rayon::join(
                || ctx.run(AssetClass::Js, js),
                || ctx.run(AssetClass::Image, img),
            )
        },
    );

    first_error([html, css, js, img])
}

/// Rewrite HTML references class by class, then delete the manifests.
pub fn apply_revision(config: &SiteConfig) -> Result<RevisionReport, BuildError> {
    let mut report = RevisionReport::default();
    for class in AssetClass::REVISIONED {
        if is_shutdown() {
            return Err(BuildError::Aborted);
        }
        let stats = rewrite::rewrite_class(config, class)?;
        report.rewrites.push((class, stats));
    }
    report.manifests_removed = manifest::remove_manifests(config)?;
    Ok(report)
}

fn first_error(
    results: [Result<ClassOutput, BuildError>; 4],
) -> Result<Vec<ClassOutput>, BuildError> {
    let mut outputs = Vec::with_capacity(results.len());
    let mut aborted = None;

    for result in results {
        match result {
            Ok(output) => outputs.push(output),
            Err(err) if err.is_aborted() => {
                aborted.get_or_insert(err);
            }
            Err(err) => return Err(err),
        }
    }

    match aborted {
        Some(err) => Err(err),
        None => Ok(outputs),
    }
}
