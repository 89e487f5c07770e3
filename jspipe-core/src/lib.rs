//! jspipe-core - layered JavaScript optimization pipeline
//!
//! Pipes a source file through an optional transpile, minify and bundle stage,
//! in that order, and writes the result. Each stage is delegated to an external
//! collaborator (Babel, Terser, esbuild by default).
//!
//! ```no_run
//! use jspipe_core::{InvocationOptions, NodePipeline, SilentReporter, ToolOverrides};
//!
//! # async fn demo() -> jspipe_core::Result<()> {
//! let options = InvocationOptions::new("src/app.js");
//! let pipeline = NodePipeline::for_options(&options, ToolOverrides::default());
//! let summary = pipeline.run(&options, &SilentReporter).await?;
//! println!("wrote {}", summary.output_path.display());
//! # Ok(())
//! # }
//! ```

pub mod collaborators;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod stage;

pub use collaborators::{
    BabelTranspiler, BundleEntry, Bundler, EsbuildBundler, Minifier, TerserMinifier,
    ToolLocator, ToolOverrides, Transpiler,
};
pub use error::{CollaboratorError, PipelineError, Result, UsageError};
pub use options::InvocationOptions;
pub use pipeline::{NodePipeline, Pipeline, PipelineEvent, Reporter, RunSummary, SilentReporter};
pub use stage::{PipelinePhase, Stage};
