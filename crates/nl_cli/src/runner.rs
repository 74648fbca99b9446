//! Batch runner: find files, localize each one, write back what changed.
//!
//! Files are independent. A failure is reported and counted, and the batch
//! moves on to the next file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use nl_ast::LocalizeConfig;
use nl_transform::{localize_source, Outcome};

pub struct RunOptions {
    pub config: LocalizeConfig,
    /// Do not write anything back.
    pub dry: bool,
    /// Print rewritten files to stdout.
    pub print: bool,
    /// File extensions to pick up when walking directories.
    pub extensions: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub ok: usize,
    pub unchanged: usize,
    pub errors: usize,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ok, {} unchanged, {} error(s)",
            self.ok, self.unchanged, self.errors
        )
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|want| want == e))
}

/// Expand `paths` into the sorted list of files to process.
///
/// Directories are walked honouring `.gitignore`, skipping hidden entries
/// and `node_modules`. Files named explicitly are kept whatever their
/// extension.
pub fn discover(paths: &[PathBuf], extensions: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for root in paths {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }

        let walker = WalkBuilder::new(root)
            .filter_entry(|entry| entry.file_name() != "node_modules")
            .build();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping unreadable entry: {e}");
                    continue;
                }
            };
            let is_file = entry.file_type().is_some_and(|t| t.is_file());
            if is_file && has_extension(entry.path(), extensions) {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    files
}

fn process_file(path: &Path, options: &RunOptions) -> Result<Outcome> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path.display().to_string();
    let outcome = localize_source(&source, &filename, &options.config)?;

    if let Outcome::Rewritten(text) = &outcome {
        if options.print {
            print!("{text}");
        }
        if !options.dry {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }

    Ok(outcome)
}

/// Localize every file in `files`.
pub fn run_files(files: &[PathBuf], options: &RunOptions) -> Summary {
    let mut summary = Summary::default();

    for path in files {
        match process_file(path, options) {
            Ok(Outcome::Rewritten(_)) => {
                tracing::info!("rewrote {}", path.display());
                summary.ok += 1;
            }
            Ok(Outcome::Unchanged) => {
                tracing::debug!("unchanged {}", path.display());
                summary.unchanged += 1;
            }
            Err(e) => {
                tracing::error!("{e:#}");
                summary.errors += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(dry: bool) -> RunOptions {
        RunOptions {
            config: LocalizeConfig::default(),
            dry,
            print: false,
            extensions: vec!["js".to_string(), "ts".to_string()],
        }
    }

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn discover_filters_extensions_and_node_modules() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "app/a.js", "");
        let b = write(dir.path(), "app/b.ts", "");
        write(dir.path(), "app/c.hbs", "");
        write(dir.path(), "node_modules/x/index.js", "");
        let explicit = write(dir.path(), "other.hbs", "");

        let files = discover(
            &[dir.path().to_path_buf(), explicit.clone()],
            &options(true).extensions,
        );
        assert_eq!(files, [a, b, explicit]);
    }

    #[test]
    fn run_rewrites_skips_and_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let changed = write(dir.path(), "changed.js", "import Ember from 'ember';\nEmber.run(f);\n");
        let same_src = "import { run } from '@ember/runloop';\nrun(f);\n";
        let same = write(dir.path(), "same.js", same_src);
        let bad_src = "const { get } = Ember, x = 1;\nEmber.set(x);\n";
        let bad = write(dir.path(), "bad.js", bad_src);
        let broken = write(dir.path(), "broken.js", "Ember.run(");

        let files = discover(&[dir.path().to_path_buf()], &options(false).extensions);
        let summary = run_files(&files, &options(false));

        assert_eq!(
            summary,
            Summary {
                ok: 1,
                unchanged: 1,
                errors: 2
            }
        );
        assert!(std::fs::read_to_string(&changed).unwrap().contains("= Ember;"));
        assert_eq!(std::fs::read_to_string(&same).unwrap(), same_src);
        assert_eq!(std::fs::read_to_string(&bad).unwrap(), bad_src);
        assert_eq!(std::fs::read_to_string(&broken).unwrap(), "Ember.run(");
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let src = "Ember.run(f);\n";
        let path = write(dir.path(), "a.js", src);

        let summary = run_files(&[path.clone()], &options(true));
        assert_eq!(summary.ok, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), src);
    }
}
