//! Pipeline stages and their display table.

use std::fmt;

use colored::Color;

/// A step of a pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Read,
    Transpile,
    Minify,
    Bundle,
    Write,
}

impl Stage {
    /// Terminal color used for this stage's progress lines.
    pub const fn color(self) -> Color {
        match self {
            Stage::Read => Color::Blue,
            Stage::Transpile => Color::Green,
            Stage::Minify => Color::Yellow,
            Stage::Bundle => Color::Magenta,
            Stage::Write => Color::Cyan,
        }
    }

    /// Progress line printed when the stage starts.
    pub fn started_message(self) -> &'static str {
        match self {
            Stage::Read => "Reading input file",
            Stage::Transpile => "Transpiling with Babel...",
            Stage::Minify => "Minifying with Terser...",
            Stage::Bundle => "Bundling with esbuild...",
            Stage::Write => "Writing output file",
        }
    }

    /// Progress line printed when the stage completes.
    pub fn completed_message(self) -> &'static str {
        match self {
            Stage::Read => "Input file read",
            Stage::Transpile => "Transpiling completed.",
            Stage::Minify => "Minification completed.",
            Stage::Bundle => "Bundling completed.",
            Stage::Write => "File optimized successfully",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read => "read",
            Stage::Transpile => "transpile",
            Stage::Minify => "minify",
            Stage::Bundle => "bundle",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Where a run currently is.
///
/// Phases only move forward; `Written` and `Aborted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Idle,
    Read,
    Transpiled,
    Minified,
    Bundled,
    Written,
    Aborted,
}

impl PipelinePhase {
    /// Phase reached after `stage` completes.
    pub const fn after(stage: Stage) -> Self {
        match stage {
            Stage::Read => PipelinePhase::Read,
            Stage::Transpile => PipelinePhase::Transpiled,
            Stage::Minify => PipelinePhase::Minified,
            Stage::Bundle => PipelinePhase::Bundled,
            Stage::Write => PipelinePhase::Written,
        }
    }
}
