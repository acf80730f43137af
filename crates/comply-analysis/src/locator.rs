//! Finds `<ClassName>.<ext>` below a directory.
//!
//! Uses the `ignore` walker, so hidden directories and anything excluded
//! by `.gitignore` or `.ignore` files are skipped.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use comply_core::errors::{ComplianceError, SourceCategory};

pub struct SourceLocator {
    extension: String,
}

impl SourceLocator {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn file_name(&self, class_name: &str) -> String {
        format!("{}.{}", class_name, self.extension)
    }

    /// Every file named after `class_name` below `root`, shallowest first.
    pub fn find_all(&self, root: &Path, class_name: &str) -> Vec<PathBuf> {
        let wanted = self.file_name(class_name);
        let mut found: Vec<(usize, PathBuf)> = WalkBuilder::new(root)
            .require_git(false)
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(root = %root.display(), error = %e, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
            .filter(|entry| entry.file_name().to_str() == Some(wanted.as_str()))
            .map(|entry| (entry.depth(), entry.into_path()))
            .collect();
        found.sort();
        found.into_iter().map(|(_, path)| path).collect()
    }

    /// The shallowest match. Several matches are logged; none is an error.
    pub fn locate(
        &self,
        root: &Path,
        class_name: &str,
        category: SourceCategory,
    ) -> Result<PathBuf, ComplianceError> {
        let mut matches = self.find_all(root, class_name).into_iter();
        let Some(first) = matches.next() else {
            return Err(ComplianceError::SourceNotFound {
                category,
                path: root.join(self.file_name(class_name)),
            });
        };
        let others = matches.count();
        if others > 0 {
            tracing::warn!(
                category = %category,
                chosen = %first.display(),
                ignored = others,
                "several source files match, using the shallowest"
            );
        }
        tracing::debug!(category = %category, path = %first.display(), "located source");
        Ok(first)
    }

    /// Every source file with the configured extension below `root`.
    pub fn all_sources(&self, root: &Path) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = WalkBuilder::new(root)
            .require_git(false)
            .build()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == self.extension.as_str())
            })
            .map(|entry| entry.into_path())
            .collect();
        paths.sort();
        paths
    }
}

impl Default for SourceLocator {
    fn default() -> Self {
        Self::new("java")
    }
}
