//! Locating collaborator executables.
//!
//! Lookup order for a tool:
//! 1. An explicit override (`--babel-bin` and friends)
//! 2. `node_modules/.bin/<tool>` in each search root and its ancestors
//! 3. `PATH`

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CollaboratorError;

/// Explicit executables supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOverrides {
    pub babel: Option<PathBuf>,
    pub terser: Option<PathBuf>,
    pub esbuild: Option<PathBuf>,
}

impl ToolOverrides {
    fn get(&self, tool: &str) -> Option<&Path> {
        match tool {
            "babel" => self.babel.as_deref(),
            "terser" => self.terser.as_deref(),
            "esbuild" => self.esbuild.as_deref(),
            _ => None,
        }
    }
}

/// Resolves tool names to absolute executable paths.
#[derive(Debug, Clone)]
pub struct ToolLocator {
    overrides: ToolOverrides,
    /// Absolute directories whose ancestors are searched for `node_modules/.bin`.
    search_roots: Vec<PathBuf>,
    cwd: PathBuf,
}

impl ToolLocator {
    /// Search the given roots (in order) for locally installed tools.
    pub fn new(search_roots: Vec<PathBuf>, overrides: ToolOverrides) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let search_roots = search_roots
            .into_iter()
            .map(|root| absolutize(&root, &cwd))
            .collect();
        Self {
            overrides,
            search_roots,
            cwd,
        }
    }

    /// Search next to the input file first, then the working directory.
    pub fn for_input(input_path: &Path, overrides: ToolOverrides) -> Self {
        let input_dir = match input_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::new(vec![input_dir, PathBuf::from(".")], overrides)
    }

    /// Find the executable for `tool`.
    pub fn locate(&self, tool: &'static str) -> Result<PathBuf, CollaboratorError> {
        if let Some(program) = self.overrides.get(tool) {
            let resolved = self.resolve_override(program);
            debug!("Using {} override: {}", tool, resolved.display());
            return Ok(resolved);
        }

        for root in &self.search_roots {
            for dir in root.ancestors() {
                let bin_dir = dir.join("node_modules").join(".bin");
                for name in executable_names(tool) {
                    let candidate = bin_dir.join(&name);
                    if candidate.is_file() {
                        debug!("Found {} at {}", tool, candidate.display());
                        return Ok(candidate);
                    }
                }
            }
        }

        match which::which(tool) {
            Ok(path) => {
                debug!("Found {} on PATH at {}", tool, path.display());
                Ok(path)
            }
            Err(_) => Err(CollaboratorError::ToolNotFound { tool }),
        }
    }

    /// Bare names go through `PATH`; relative paths are anchored at the working directory.
    fn resolve_override(&self, program: &Path) -> PathBuf {
        if program.components().count() == 1 {
            which::which(program).unwrap_or_else(|_| program.to_path_buf())
        } else {
            absolutize(program, &self.cwd)
        }
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(windows)]
fn executable_names(tool: &str) -> Vec<String> {
    vec![format!("{tool}.cmd"), format!("{tool}.exe"), tool.to_string()]
}

#[cfg(not(windows))]
fn executable_names(tool: &str) -> Vec<String> {
    vec![tool.to_string()]
}
