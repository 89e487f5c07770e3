//! Layered optimization pipeline.
//!
//! Orchestrates, strictly in order:
//! 1. Reading the input file
//! 2. Transpiling (optional)
//! 3. Minifying (optional)
//! 4. Bundling (optional)
//! 5. Writing the output file
//!
//! Every stage finishes before the next begins. The first failure aborts the run and
//! nothing is written.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::collaborators::{
    BabelTranspiler, BundleEntry, Bundler, EsbuildBundler, Minifier, TerserMinifier,
    ToolLocator, ToolOverrides, Transpiler,
};
use crate::error::{PipelineError, Result};
use crate::options::InvocationOptions;
use crate::stage::{PipelinePhase, Stage};

/// Progress notifications emitted around every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent<'a> {
    Started {
        stage: Stage,
        /// File involved, for the read and write stages.
        path: Option<&'a Path>,
    },
    Completed {
        stage: Stage,
        /// Size of the current code after the stage.
        bytes: usize,
        path: Option<&'a Path>,
    },
}

/// Receives pipeline progress.
pub trait Reporter {
    fn report(&self, event: &PipelineEvent<'_>);
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&self, _event: &PipelineEvent<'_>) {}
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: PathBuf,
    /// Transformation stages applied, in order.
    pub stages: Vec<Stage>,
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub duration: Duration,
}

/// Tracks the forward-only phase of one run.
#[derive(Debug)]
struct PhaseTracker {
    phase: PipelinePhase,
}

impl PhaseTracker {
    fn new() -> Self {
        Self {
            phase: PipelinePhase::Idle,
        }
    }

    fn advance(&mut self, stage: Stage) {
        let next = PipelinePhase::after(stage);
        debug!("Phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn abort(&mut self, err: &PipelineError) {
        debug!(
            "Run aborted during {} (last phase {:?}): {}",
            err.stage(),
            self.phase,
            err
        );
        self.phase = PipelinePhase::Aborted;
    }
}

/// The pipeline controller, generic over its three collaborators.
#[derive(Debug, Clone)]
pub struct Pipeline<T, M, B> {
    transpiler: T,
    minifier: M,
    bundler: B,
}

/// Pipeline wired to the Node toolchain (Babel, Terser, esbuild).
pub type NodePipeline = Pipeline<BabelTranspiler, TerserMinifier, EsbuildBundler>;

impl NodePipeline {
    /// Build a pipeline whose tools are looked up relative to the input file.
    pub fn for_options(options: &InvocationOptions, overrides: ToolOverrides) -> Self {
        let locator = ToolLocator::for_input(&options.input_path, overrides);
        Pipeline::new(
            BabelTranspiler::new(locator.clone(), Some(options.input_path.clone())),
            TerserMinifier::new(locator.clone()),
            EsbuildBundler::new(locator),
        )
    }
}

impl<T, M, B> Pipeline<T, M, B>
where
    T: Transpiler,
    M: Minifier,
    B: Bundler,
{
    pub fn new(transpiler: T, minifier: M, bundler: B) -> Self {
        Self {
            transpiler,
            minifier,
            bundler,
        }
    }

    /// Read, transform and write according to `options`.
    pub async fn run(
        &self,
        options: &InvocationOptions,
        reporter: &dyn Reporter,
    ) -> Result<RunSummary> {
        let start = Instant::now();
        let mut tracker = PhaseTracker::new();

        let result = self.run_tracked(options, reporter, &mut tracker).await;
        match result {
            Ok((input_bytes, output_bytes)) => Ok(RunSummary {
                output_path: options.resolved_output_path(),
                stages: enabled_stages(options),
                input_bytes,
                output_bytes,
                duration: start.elapsed(),
            }),
            Err(err) => {
                tracker.abort(&err);
                Err(err)
            }
        }
    }

    async fn run_tracked(
        &self,
        options: &InvocationOptions,
        reporter: &dyn Reporter,
        tracker: &mut PhaseTracker,
    ) -> Result<(usize, usize)> {
        let input_path = options.input_path.as_path();
        info!("Starting run for {}", input_path.display());

        reporter.report(&PipelineEvent::Started {
            stage: Stage::Read,
            path: Some(input_path),
        });
        let source = tokio::fs::read_to_string(input_path)
            .await
            .map_err(|source| PipelineError::FileRead {
                path: input_path.to_path_buf(),
                source,
            })?;
        let input_bytes = source.len();
        tracker.advance(Stage::Read);
        reporter.report(&PipelineEvent::Completed {
            stage: Stage::Read,
            bytes: input_bytes,
            path: Some(input_path),
        });

        let resolve_dir = options.resolve_dir();
        let code = self
            .transform(source, options, &resolve_dir, reporter, tracker)
            .await?;

        let output_path = options.resolved_output_path();
        reporter.report(&PipelineEvent::Started {
            stage: Stage::Write,
            path: Some(output_path.as_path()),
        });
        tokio::fs::write(&output_path, &code)
            .await
            .map_err(|source| PipelineError::FileWrite {
                path: output_path.clone(),
                source,
            })?;
        tracker.advance(Stage::Write);
        info!("Wrote {} bytes to {}", code.len(), output_path.display());
        reporter.report(&PipelineEvent::Completed {
            stage: Stage::Write,
            bytes: code.len(),
            path: Some(output_path.as_path()),
        });

        Ok((input_bytes, code.len()))
    }

    /// Apply the enabled transformation stages to `source` without touching the filesystem.
    ///
    /// `resolve_dir` is where the bundler resolves the entry's imports.
    pub async fn process(
        &self,
        source: String,
        options: &InvocationOptions,
        resolve_dir: &Path,
        reporter: &dyn Reporter,
    ) -> Result<String> {
        let mut tracker = PhaseTracker::new();
        tracker.advance(Stage::Read);
        let result = self
            .transform(source, options, resolve_dir, reporter, &mut tracker)
            .await;
        if let Err(err) = &result {
            tracker.abort(err);
        }
        result
    }

    async fn transform(
        &self,
        source: String,
        options: &InvocationOptions,
        resolve_dir: &Path,
        reporter: &dyn Reporter,
        tracker: &mut PhaseTracker,
    ) -> Result<String> {
        let mut code = source;

        if options.transpile_enabled {
            begin_stage(Stage::Transpile, reporter);
            code = self
                .transpiler
                .transpile(&code)
                .await
                .map_err(PipelineError::Transpile)?;
            finish_stage(Stage::Transpile, &code, reporter, tracker);
        }

        if options.minify_enabled {
            begin_stage(Stage::Minify, reporter);
            code = self
                .minifier
                .minify(&code)
                .await
                .map_err(PipelineError::Minify)?;
            finish_stage(Stage::Minify, &code, reporter, tracker);
        }

        if options.bundle_enabled {
            begin_stage(Stage::Bundle, reporter);
            code = self
                .bundler
                .bundle(BundleEntry {
                    contents: &code,
                    resolve_dir,
                    minify: options.minify_enabled,
                })
                .await
                .map_err(PipelineError::Bundle)?;
            finish_stage(Stage::Bundle, &code, reporter, tracker);
        }

        Ok(code)
    }
}

fn begin_stage(stage: Stage, reporter: &dyn Reporter) {
    reporter.report(&PipelineEvent::Started { stage, path: None });
}

fn finish_stage(stage: Stage, code: &str, reporter: &dyn Reporter, tracker: &mut PhaseTracker) {
    debug!("{}: now {} bytes", stage, code.len());
    tracker.advance(stage);
    reporter.report(&PipelineEvent::Completed {
        stage,
        bytes: code.len(),
        path: None,
    });
}

/// Transformation stages enabled by `options`, in execution order.
pub fn enabled_stages(options: &InvocationOptions) -> Vec<Stage> {
    [
        (Stage::Transpile, options.transpile_enabled),
        (Stage::Minify, options.minify_enabled),
        (Stage::Bundle, options.bundle_enabled),
    ]
    .into_iter()
    .filter_map(|(stage, enabled)| enabled.then_some(stage))
    .collect()
}
