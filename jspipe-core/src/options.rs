//! Invocation options for a single pipeline run.

use std::path::{Path, PathBuf};

use crate::error::UsageError;

/// Suffix appended to the input basename when no output path is given.
pub const DEFAULT_OUTPUT_SUFFIX: &str = ".bundle.min.js";

/// Immutable record describing what one run should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOptions {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub transpile_enabled: bool,
    pub minify_enabled: bool,
    pub bundle_enabled: bool,
}

impl InvocationOptions {
    /// Options with every stage enabled and the default output path.
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: None,
            transpile_enabled: true,
            minify_enabled: true,
            bundle_enabled: true,
        }
    }

    /// Build options from a possibly missing input path.
    pub fn try_new(input_path: Option<PathBuf>) -> Result<Self, UsageError> {
        input_path.map(Self::new).ok_or(UsageError)
    }

    pub fn with_output(mut self, output_path: Option<PathBuf>) -> Self {
        self.output_path = output_path;
        self
    }

    pub fn with_stages(mut self, transpile: bool, minify: bool, bundle: bool) -> Self {
        self.transpile_enabled = transpile;
        self.minify_enabled = minify;
        self.bundle_enabled = bundle;
        self
    }

    /// The explicit output path, or `<basename>.bundle.min.js` in the working directory.
    pub fn resolved_output_path(&self) -> PathBuf {
        match &self.output_path {
            Some(path) => path.clone(),
            None => default_output_path(&self.input_path),
        }
    }

    /// Directory the bundler resolves the entry's imports against.
    pub fn resolve_dir(&self) -> PathBuf {
        match self.input_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Default output file name for `input`: its basename minus a trailing `.js`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let basename = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = match basename.strip_suffix(".js") {
        Some(stem) if !stem.is_empty() => stem,
        _ => basename.as_str(),
    };

    PathBuf::from(format!("{stem}{DEFAULT_OUTPUT_SUFFIX}"))
}
