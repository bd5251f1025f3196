//! One class branch: transform → (revise) → write → (manifest).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::asset::{AssetRoute, TransformedAsset, newest_partial, write_asset};
use crate::config::SiteConfig;
use crate::core::{AssetClass, BuildMode, is_shutdown};
use crate::debug;
use crate::freshness::is_stale;
use crate::freshness::mtime::get_mtime;
use crate::logger::ProgressLine;

use super::BuildError;
use super::manifest::manifest_path;
use super::revision::revise;
use super::transform::Transformers;

/// What a class branch produced.
#[derive(Debug, Clone)]
pub struct ClassOutput {
    pub class: AssetClass,
    /// Files written.
    pub written: usize,
    /// Up-to-date files left alone (development only).
    pub skipped: usize,
    /// Manifest path when the class was revisioned.
    pub manifest: Option<PathBuf>,
}

/// Shared state of the four concurrent class branches.
pub(super) struct ClassBuild<'a> {
    pub config: &'a SiteConfig,
    pub mode: BuildMode,
    pub transformers: &'a Transformers,
    /// Set by the first failing branch.
    pub abort: &'a AtomicBool,
    pub progress: Option<&'a ProgressLine>,
}

impl ClassBuild<'_> {
    /// Build one class, raising the abort flag on failure.
    pub fn run(&self, class: AssetClass, routes: Vec<AssetRoute>) -> Result<ClassOutput, BuildError> {
        let result = self.build(class, routes);
        if result.is_err() {
            self.abort.store(true, Ordering::SeqCst);
        }
        result
    }

    fn build(&self, class: AssetClass, routes: Vec<AssetRoute>) -> Result<ClassOutput, BuildError> {
        let out_dir = self.config.paths.output.class_dir(class);

        let total = routes.len();
        let routes = if self.mode.incremental {
            self.stale_routes(class, &out_dir, routes)
        } else {
            routes
        };
        let skipped = total - routes.len();
        self.advance(class, skipped);

        let assets = routes
            .par_iter()
            .map(|route| {
                self.check_abort()?;
                let asset = self.transformers.apply(class, route)?;
                self.advance(class, 1);
                Ok(asset)
            })
            .collect::<Result<Vec<TransformedAsset>, BuildError>>()?;

        // Nothing of this class is written once any branch has failed.
        self.check_abort()?;

        if self.mode.revision && class != AssetClass::Html {
            let revision = revise(class, assets, self.config.revision.length)?;
            for record in &revision.records {
                write_asset(&out_dir, &record.hashed, &record.bytes)?;
            }

            let manifest = manifest_path(self.config, class);
            revision.manifest.write(&manifest)?;
            debug!("revision"; "{}: {} entries", class, revision.manifest.len());

            return Ok(ClassOutput {
                class,
                written: revision.records.len(),
                skipped,
                manifest: Some(manifest),
            });
        }

        for asset in &assets {
            write_asset(&out_dir, &asset.route.rel, &asset.bytes)?;
        }
        Ok(ClassOutput {
            class,
            written: assets.len(),
            skipped,
            manifest: None,
        })
    }

    /// Routes whose output is missing or older than its inputs.
    ///
    /// A stylesheet also counts as stale when any Sass partial next to it
    /// changed after its output was written.
    fn stale_routes(&self, class: AssetClass, out_dir: &Path, routes: Vec<AssetRoute>) -> Vec<AssetRoute> {
        let partial = if class == AssetClass::Css {
            newest_partial(self.config.paths.source.class_dir(class))
        } else {
            None
        };

        routes
            .into_iter()
            .filter(|route| {
                let output = route.output_in(out_dir);
                if is_stale(&route.source, &output) {
                    return true;
                }
                match (partial, route.is_plugin()) {
                    (Some(changed), false) => get_mtime(&output).is_none_or(|written| changed > written),
                    _ => false,
                }
            })
            .collect()
    }

    fn check_abort(&self) -> Result<(), BuildError> {
        if self.abort.load(Ordering::Relaxed) || is_shutdown() {
            return Err(BuildError::Aborted);
        }
        Ok(())
    }

    #[inline]
    fn advance(&self, class: AssetClass, n: usize) {
        if let Some(progress) = self.progress
            && n > 0
        {
            progress.add(class.name(), n);
        }
    }
}
