//! GitHub Pages publishing.
//!
//! Each module renders into `<root>/<module>/docs/`; publishing mirrors
//! that directory into `<root>/docs/<module>/`.

use crate::models::Module;
use crate::report::SiteContext;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Copy a module's rendered docs into the site-wide `docs/` tree.
///
/// Returns the destination directory.
pub fn copy_module_docs(site: &SiteContext, module: Module) -> Result<PathBuf> {
    let src = site.root.join(module.slug()).join("docs");
    let dst = site.root.join("docs").join(module.slug());
    std::fs::create_dir_all(&dst)
        .with_context(|| format!("Failed to create {}", dst.display()))?;

    if !src.exists() {
        warn!("Nothing to publish: {} does not exist", src.display());
        return Ok(dst);
    }

    let mut copied = 0usize;
    for entry in WalkDir::new(&src).min_depth(1) {
        let entry = entry.with_context(|| format!("Failed to walk {}", src.display()))?;
        let rel = entry.path().strip_prefix(&src).unwrap_or(entry.path());
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else if entry.file_type().is_file() {
            std::fs::copy(entry.path(), &target).with_context(|| {
                format!("Failed to copy {} to {}", entry.path().display(), target.display())
            })?;
            debug!("Copied {}", rel.display());
            copied += 1;
        }
    }

    info!("Published {} ({} files) to {}", module, copied, dst.display());
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_module_docs() {
        let dir = tempfile::tempdir().unwrap();
        let site = SiteContext {
            root: dir.path().to_path_buf(),
            nav_modules: vec![],
        };

        let docs = dir.path().join("trader").join("docs");
        std::fs::create_dir_all(docs.join("assets")).unwrap();
        std::fs::write(docs.join("index.html"), "<p>hi</p>").unwrap();
        std::fs::write(docs.join("assets").join("app.css"), "body{}").unwrap();

        let dst = copy_module_docs(&site, Module::Trader).unwrap();
        assert_eq!(dst, dir.path().join("docs").join("trader"));
        assert_eq!(std::fs::read_to_string(dst.join("index.html")).unwrap(), "<p>hi</p>");
        assert!(dst.join("assets").join("app.css").exists());
    }

    #[test]
    fn test_copy_without_sources_creates_destination() {
        let dir = tempfile::tempdir().unwrap();
        let site = SiteContext {
            root: dir.path().to_path_buf(),
            nav_modules: vec![],
        };

        let dst = copy_module_docs(&site, Module::Analyst).unwrap();
        assert!(dst.is_dir());
        assert_eq!(std::fs::read_dir(dst).unwrap().count(), 0);
    }
}
