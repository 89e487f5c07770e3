//! External collaborators for the transformation stages.
//!
//! Each collaborator is an opaque function from source text to transformed text.
//! The pipeline only talks to the traits below; the default implementations
//! shell out to the Node tools (Babel, Terser, esbuild).

use std::future::Future;
use std::path::Path;

use crate::error::CollaboratorError;

mod locator;
mod node;
mod process;

pub use locator::{ToolLocator, ToolOverrides};
pub use node::{BabelTranspiler, EsbuildBundler, TerserMinifier, BABEL_PRESET};

/// Rewrites source for broader runtime compatibility.
pub trait Transpiler {
    fn transpile(&self, source: &str) -> impl Future<Output = Result<String, CollaboratorError>>;
}

/// Shrinks source while preserving behavior.
pub trait Minifier {
    fn minify(&self, source: &str) -> impl Future<Output = Result<String, CollaboratorError>>;
}

/// Resolves and inlines module dependencies into one artifact.
pub trait Bundler {
    fn bundle(
        &self,
        entry: BundleEntry<'_>,
    ) -> impl Future<Output = Result<String, CollaboratorError>>;
}

/// A virtual entry module handed to the bundler.
#[derive(Debug, Clone, Copy)]
pub struct BundleEntry<'a> {
    /// Entry module text.
    pub contents: &'a str,
    /// Directory relative imports in `contents` resolve against.
    pub resolve_dir: &'a Path,
    /// Run the bundler's own minification pass.
    pub minify: bool,
}
