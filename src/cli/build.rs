//! Build orchestration for the `build`, `dev` and `clean` commands.
//!
//! Build phases:
//! - **Prepare** - empty the output root (always for release; for dev with
//!   `--clean` or when the output was not written by a dev build)
//! - **Scan** - collect the sources of every class
//! - **Classes** - the four class branches in parallel, with a progress line
//! - **Revision** - rewrite HTML references, delete manifests (release + hashing)

use anyhow::{Context, Result};

use crate::{
    asset::clean_output,
    config::SiteConfig,
    core::BuildMode,
    debug, log,
    logger::ProgressLine,
    pipeline::{self, BuildPlan, ClassOutput, RevisionReport},
    utils::plural::{plural_count, plural_irregular},
};

/// Release build: clean, minify, then hash and rewrite if enabled.
pub fn build_release(config: &SiteConfig) -> Result<()> {
    build(config, BuildMode::release(config.revision.enable), "build", true)
}

/// Development build: unminified and incremental.
pub fn build_dev(config: &SiteConfig, clean_first: bool) -> Result<()> {
    build(config, BuildMode::DEVELOPMENT, "dev", clean_first)
}

/// Delete everything inside the output root.
pub fn clean(config: &SiteConfig) -> Result<()> {
    let root = &config.paths.output.root;
    let removed = clean_output(root)
        .with_context(|| format!("failed to clean {}", root.display()))?;
    log_clean(config, removed);
    Ok(())
}

fn build(config: &SiteConfig, mode: BuildMode, label: &'static str, clean_first: bool) -> Result<()> {
    let removed = pipeline::prepare_output(config, mode, clean_first)
        .context("failed to prepare output directory")?;
    if removed > 0 {
        log_clean(config, removed);
    }

    let plan = BuildPlan::scan(config).context("failed to scan sources")?;
    debug!(label; "{} to process", plural_count(plan.total(), "source"));

    let progress = ProgressLine::new(label, &plan.counts());
    let report = match pipeline::run(config, mode, plan, Some(&progress)) {
        Ok(report) => {
            progress.finish();
            report
        }
        Err(err) => {
            drop(progress);
            return Err(err.into());
        }
    };

    log_classes(label, &report.classes);
    if let Some(revision) = &report.revision {
        log_revision(revision);
    }

    log!(label; "done, output in {}", config.root_relative(&config.paths.output.root).display());
    Ok(())
}

fn log_clean(config: &SiteConfig, removed: usize) {
    log!("clean"; "removed {} from {}",
        plural_irregular(removed, "entry", "entries"),
        config.root_relative(&config.paths.output.root).display());
}

fn log_classes(label: &str, classes: &[ClassOutput]) {
    for output in classes {
        if output.skipped > 0 {
            debug!(label; "{}: {} written, {} up to date",
                output.class, plural_count(output.written, "file"), output.skipped);
        }
        if let Some(manifest) = &output.manifest {
            debug!("revision"; "{} manifest at {}", output.class, manifest.display());
        }
    }
}

fn log_revision(report: &RevisionReport) {
    for (class, stats) in &report.rewrites {
        debug!("rewrite"; "{}: {} in {}",
            class, plural_count(stats.references, "reference"),
            plural_count(stats.files, "file"));
    }
    let references: usize = report.rewrites.iter().map(|(_, s)| s.references).sum();
    log!("rewrite"; "{} rewritten, {} removed",
        plural_count(references, "reference"),
        plural_count(report.manifests_removed, "manifest"));
}
