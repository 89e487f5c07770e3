//! Collaborators backed by the Node toolchain CLIs.

use std::path::PathBuf;

use super::process::ToolInvocation;
use super::{BundleEntry, Bundler, Minifier, ToolLocator, Transpiler};
use crate::error::CollaboratorError;

/// Preset giving broadly compatible output.
pub const BABEL_PRESET: &str = "@babel/preset-env";

/// `babel --presets @babel/preset-env`, source on stdin.
#[derive(Debug, Clone)]
pub struct BabelTranspiler {
    locator: ToolLocator,
    /// Reported to Babel as the stdin file name.
    filename: Option<PathBuf>,
}

impl BabelTranspiler {
    pub fn new(locator: ToolLocator, filename: Option<PathBuf>) -> Self {
        Self { locator, filename }
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec!["--presets".to_string(), BABEL_PRESET.to_string()];
        if let Some(filename) = &self.filename {
            args.push("--filename".to_string());
            args.push(filename.display().to_string());
        }
        args
    }
}

impl Transpiler for BabelTranspiler {
    async fn transpile(&self, source: &str) -> Result<String, CollaboratorError> {
        let program = self.locator.locate("babel")?;
        ToolInvocation {
            tool: "babel",
            program: &program,
            args: self.args(),
            current_dir: None,
        }
        .run(source)
        .await
    }
}

/// `terser --compress --mangle`, source on stdin.
#[derive(Debug, Clone)]
pub struct TerserMinifier {
    locator: ToolLocator,
}

impl TerserMinifier {
    pub fn new(locator: ToolLocator) -> Self {
        Self { locator }
    }

    fn args() -> Vec<String> {
        vec!["--compress".to_string(), "--mangle".to_string()]
    }
}

impl Minifier for TerserMinifier {
    async fn minify(&self, source: &str) -> Result<String, CollaboratorError> {
        let program = self.locator.locate("terser")?;
        ToolInvocation {
            tool: "terser",
            program: &program,
            args: Self::args(),
            current_dir: None,
        }
        .run(source)
        .await
    }
}

/// `esbuild --bundle [--minify]` with the entry on stdin.
///
/// esbuild resolves stdin imports against its working directory, so the child runs
/// in the entry's resolve directory.
#[derive(Debug, Clone)]
pub struct EsbuildBundler {
    locator: ToolLocator,
}

impl EsbuildBundler {
    pub fn new(locator: ToolLocator) -> Self {
        Self { locator }
    }

    fn args(minify: bool) -> Vec<String> {
        let mut args = vec!["--bundle".to_string(), "--log-level=warning".to_string()];
        if minify {
            args.push("--minify".to_string());
        }
        args
    }
}

impl Bundler for EsbuildBundler {
    async fn bundle(&self, entry: BundleEntry<'_>) -> Result<String, CollaboratorError> {
        let program = self.locator.locate("esbuild")?;
        ToolInvocation {
            tool: "esbuild",
            program: &program,
            args: Self::args(entry.minify),
            current_dir: Some(entry.resolve_dir),
        }
        .run(entry.contents)
        .await
    }
}
