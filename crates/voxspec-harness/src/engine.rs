//! The prompt harness pipeline.
//!
//! `PromptHarness` holds a keyword table and runs the four pure stages in
//! order:
//!
//! 1. classify the use case into `Capabilities`;
//! 2. derive the `Failures` those capabilities expose;
//! 3. bucket the failures into pipeline `Layers`;
//! 4. select topology blocks and compile them into a system prompt.
//!
//! Stages never fail. Only loading a keyword override file can.

use std::path::Path;

use tracing::debug;

use voxspec_contracts::{
    error::{VoxspecError, VoxspecResult},
    harness::{HarnessOutput, PromptTrace},
};

use crate::{
    compose::{build_prompt, compile_prompt},
    extractor::extract_capabilities,
    keywords::{KeywordOverrides, KeywordTable},
    mapping::{map_failures, map_layers},
};

/// Use case → harness prompt plus its decision trace.
///
/// ```rust,ignore
/// use voxspec_harness::PromptHarness;
///
/// let output = PromptHarness::default().run("Dispatch trucks by plate number");
/// println!("{}", output.system_prompt);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptHarness {
    keywords: KeywordTable,
}

impl PromptHarness {
    pub fn new(keywords: KeywordTable) -> Self {
        Self { keywords }
    }

    /// Parse `s` as a TOML keyword override document.
    ///
    /// Returns `VoxspecError::Config` if the TOML is malformed or names a
    /// table that does not exist.
    pub fn from_toml_str(s: &str) -> VoxspecResult<Self> {
        let overrides: KeywordOverrides = toml::from_str(s).map_err(|e| VoxspecError::Config {
            reason: format!("failed to parse keyword TOML: {}", e),
        })?;
        Ok(Self::new(KeywordTable::default().with_overrides(overrides)))
    }

    /// Read the file at `path` and parse it as keyword overrides.
    pub fn from_file(path: &Path) -> VoxspecResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| VoxspecError::Config {
            reason: format!("failed to read keyword file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    /// Run the full pipeline for `use_case`.
    pub fn run(&self, use_case: &str) -> HarnessOutput {
        let capabilities = extract_capabilities(use_case, &self.keywords);
        let failures = map_failures(&capabilities);
        let layers = map_layers(&failures);
        let blocks = build_prompt(&capabilities, &failures);

        debug!(
            capture_mode = ?capabilities.capture_mode,
            noise_tolerance = ?capabilities.noise_tolerance,
            failures = failures.triggered().len(),
            blocks = blocks.len(),
            "harness prompt assembled"
        );

        HarnessOutput {
            system_prompt: compile_prompt(&blocks),
            trace: PromptTrace {
                capabilities,
                failures,
                layers,
                topology_blocks_count: blocks.len(),
            },
        }
    }
}
