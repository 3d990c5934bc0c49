//! # voxspec-harness
//!
//! Turns a one-line use-case description into a voice-agent system prompt
//! built from a fixed catalogue of defensive instruction blocks.
//!
//! ## Overview
//!
//! [`PromptHarness::run`] classifies the text with a substring keyword
//! table, maps the resulting capabilities to the failure kinds they expose,
//! buckets those by pipeline layer, and selects the blocks that defend
//! against them. The returned `HarnessOutput` carries the prompt and the
//! full decision trace.
//!
//! The harness is total: every input, including the empty string, produces
//! a prompt.
//!
//! ## Keyword overrides
//!
//! ```rust,ignore
//! use std::path::Path;
//! use voxspec_harness::PromptHarness;
//!
//! let harness = PromptHarness::from_file(Path::new("keywords/warehouse.toml"))?;
//! ```
//!
//! The returned prompt is not guarded; pass it through
//! `voxspec_compiler::ensure_no_role_acknowledgment` before a live call.

pub mod blocks;
pub mod compose;
pub mod engine;
pub mod extractor;
pub mod keywords;
pub mod mapping;

pub use compose::{build_prompt, compile_prompt, select_blocks, PROMPT_PREFIX, PROMPT_SUFFIX};
pub use engine::PromptHarness;
pub use extractor::extract_capabilities;
pub use keywords::{KeywordOverrides, KeywordTable};
pub use mapping::{map_failures, map_layers};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use voxspec_contracts::{
        error::VoxspecError,
        harness::{
            Capabilities, CaptureMode, FailureKind, Failures, NoiseTolerance, TopologyBlockId,
        },
    };

    use super::*;
    use crate::blocks::block_text;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn caps(text: &str) -> Capabilities {
        extract_capabilities(text, &KeywordTable::default())
    }

    // ── 1. capability extraction ──────────────────────────────────────────────

    #[test]
    fn test_extract_dispatch_with_confirmation_and_noise() {
        let c = caps("Dispatch a vehicle using its ID, confirm before acting, noisy environment");
        assert_eq!(
            c,
            Capabilities {
                capture_mode: CaptureMode::Symbolic,
                noise_tolerance: NoiseTolerance::High,
                execution_dependency: true,
                confirmation_required: true,
                pronunciation_required: true,
                memory_required: false,
            }
        );
    }

    #[test]
    fn test_extract_empty_input_yields_defaults() {
        assert_eq!(caps(""), Capabilities::default());
        assert_eq!(caps("   \n\t"), Capabilities::default());
        assert_eq!(caps("").capture_mode, CaptureMode::Semantic);
        assert_eq!(caps("").noise_tolerance, NoiseTolerance::Low);
    }

    #[test]
    fn test_extract_is_case_insensitive() {
        let c = caps("PLEASE SPELL THE CUSTOMER'S SURNAME AND REMEMBER HISTORY");
        assert_eq!(c.capture_mode, CaptureMode::Semantic);
        assert!(c.pronunciation_required);
        assert!(c.memory_required);
    }

    #[test]
    fn test_extract_substring_matching_fires_inside_words() {
        // "provide" contains "id".
        let c = caps("Provide opening hours");
        assert_eq!(c.capture_mode, CaptureMode::Symbolic);
        assert!(c.pronunciation_required);
    }

    // ── 2. failure and layer mapping ──────────────────────────────────────────

    #[test]
    fn test_map_failures_for_symbolic_noisy_execution() {
        let c = caps("Dispatch a vehicle using its ID, confirm before acting, noisy environment");
        let f = map_failures(&c);
        assert_eq!(
            f,
            Failures {
                asr_drift: true,
                semantic_normalization: true,
                hallucinated_completion: true,
                tool_schema_mismatch: true,
                phonetic_ambiguity: true,
            }
        );
    }

    #[test]
    fn test_map_failures_for_empty_input() {
        let f = map_failures(&Capabilities::default());
        assert_eq!(f.triggered(), vec![FailureKind::SemanticNormalization]);
    }

    #[test]
    fn test_phonetic_ambiguity_lands_in_asr_and_tts() {
        let f = Failures {
            phonetic_ambiguity: true,
            ..Failures::default()
        };
        let layers = map_layers(&f);
        assert_eq!(layers.asr, vec![FailureKind::PhoneticAmbiguity]);
        assert_eq!(layers.tts, vec![FailureKind::PhoneticAmbiguity]);
        assert!(layers.llm.is_empty());
        assert!(layers.router.is_empty());
    }

    #[test]
    fn test_map_layers_buckets_every_kind() {
        let f = Failures {
            asr_drift: true,
            semantic_normalization: true,
            hallucinated_completion: true,
            tool_schema_mismatch: true,
            phonetic_ambiguity: true,
        };
        let layers = map_layers(&f);
        assert_eq!(
            layers.asr,
            vec![FailureKind::AsrDrift, FailureKind::PhoneticAmbiguity]
        );
        assert_eq!(
            layers.llm,
            vec![
                FailureKind::SemanticNormalization,
                FailureKind::HallucinatedCompletion
            ]
        );
        assert_eq!(layers.router, vec![FailureKind::ToolSchemaMismatch]);
        assert_eq!(layers.tts, vec![FailureKind::PhoneticAmbiguity]);
    }

    // ── 3. block selection ────────────────────────────────────────────────────

    #[test]
    fn test_select_blocks_priority_order() {
        let c = caps("Dispatch a vehicle using its ID, confirm before acting, noisy environment");
        let ids = select_blocks(&c, &map_failures(&c));
        assert_eq!(
            ids,
            vec![
                TopologyBlockId::SymbolCapture,
                TopologyBlockId::PhoneticRule,
                TopologyBlockId::ExecutionGate,
                TopologyBlockId::NoiseRecovery,
                TopologyBlockId::ToolAlignment,
                TopologyBlockId::Readback,
            ]
        );
    }

    #[test]
    fn test_select_blocks_never_repeats_an_id() {
        let all_on = Capabilities {
            capture_mode: CaptureMode::Symbolic,
            noise_tolerance: NoiseTolerance::High,
            execution_dependency: true,
            confirmation_required: true,
            pronunciation_required: true,
            memory_required: true,
        };
        let ids = select_blocks(&all_on, &map_failures(&all_on));
        let mut deduped = ids.clone();
        deduped.sort_by_key(|id| id.as_str());
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_build_prompt_returns_trimmed_texts() {
        let c = caps("confirm the order");
        let blocks = build_prompt(&c, &map_failures(&c));
        assert_eq!(
            blocks,
            vec![
                block_text(TopologyBlockId::ExecutionGate).trim().to_string(),
                block_text(TopologyBlockId::Readback).trim().to_string(),
            ]
        );
        assert!(blocks.iter().all(|b| b.trim() == b));
    }

    // ── 4. prompt compilation ─────────────────────────────────────────────────

    #[test]
    fn test_compile_prompt_with_no_blocks() {
        let empty: [&str; 0] = [];
        assert_eq!(
            compile_prompt(&empty),
            format!("{PROMPT_PREFIX}\n\n{PROMPT_SUFFIX}")
        );
    }

    #[test]
    fn test_compile_prompt_skips_blank_blocks() {
        let prompt = compile_prompt(&["  first  ", "   ", "second"]);
        assert_eq!(
            prompt,
            format!("{PROMPT_PREFIX}\n\nfirst\n\nsecond\n\n{PROMPT_SUFFIX}")
        );
    }

    // ── 5. end-to-end ─────────────────────────────────────────────────────────

    #[test]
    fn test_end_to_end_dispatch_over_noisy_radio() {
        let output = PromptHarness::default()
            .run("Dispatch agent that captures vehicle IDs over noisy radio calls");

        let c = output.trace.capabilities;
        assert_eq!(c.capture_mode, CaptureMode::Symbolic);
        assert_eq!(c.noise_tolerance, NoiseTolerance::High);
        assert!(c.execution_dependency);
        assert!(!c.confirmation_required);

        let expected_ids = [
            TopologyBlockId::SymbolCapture,
            TopologyBlockId::PhoneticRule,
            TopologyBlockId::ExecutionGate,
            TopologyBlockId::NoiseRecovery,
            TopologyBlockId::ToolAlignment,
        ];
        let mut parts = vec![PROMPT_PREFIX];
        parts.extend(expected_ids.iter().map(|id| block_text(*id).trim()));
        parts.push(PROMPT_SUFFIX);

        assert_eq!(output.system_prompt, parts.join("\n\n"));
        assert_eq!(output.trace.topology_blocks_count, 5);
        assert!(!output.system_prompt.contains("Is that correct?"));
    }

    #[test]
    fn test_empty_use_case_still_yields_prompt() {
        let output = PromptHarness::default().run("");
        assert!(output.system_prompt.starts_with(PROMPT_PREFIX));
        assert!(output.system_prompt.ends_with(PROMPT_SUFFIX));
        assert_eq!(output.trace.topology_blocks_count, 1);
    }

    #[test]
    fn test_output_serializes_with_wire_names() {
        let output = PromptHarness::default().run("Verify tracking number");
        let json = serde_json::to_value(&output).unwrap();
        assert!(json["systemPrompt"].is_string());
        assert_eq!(json["trace"]["capabilities"]["capture_mode"], "symbolic");
        assert_eq!(json["trace"]["capabilities"]["confirmation_required"], true);
        assert!(json["trace"]["layers"]["asr"].is_array());
        assert!(json["trace"]["topology_blocks_count"].is_u64());
    }

    // ── 6. keyword overrides ──────────────────────────────────────────────────

    #[test]
    fn test_override_replaces_only_named_tables() {
        let harness = PromptHarness::from_toml_str(
            r#"
                noisy = ["Warehouse", "  forklift ", ""]
            "#,
        )
        .unwrap();

        assert_eq!(harness.keywords().noisy, vec!["warehouse", "forklift"]);
        assert_eq!(harness.keywords().symbolic, KeywordTable::default().symbolic);

        let out = harness.run("Forklift drivers in the warehouse");
        assert_eq!(out.trace.capabilities.noise_tolerance, NoiseTolerance::High);

        // "call" is no longer a noise keyword.
        let out = harness.run("phone call");
        assert_eq!(out.trace.capabilities.noise_tolerance, NoiseTolerance::Low);
    }

    #[test]
    fn test_override_unknown_table_is_config_error() {
        let err = PromptHarness::from_toml_str(r#"colours = ["red"]"#).unwrap_err();
        match err {
            VoxspecError::Config { reason } => assert!(reason.contains("keyword TOML")),
            other => panic!("expected Config, got {other:?}"),
        }
    }

    #[test]
    fn test_override_malformed_toml_is_config_error() {
        assert!(matches!(
            PromptHarness::from_toml_str("symbolic = [unterminated"),
            Err(VoxspecError::Config { .. })
        ));
    }

    #[test]
    fn test_from_file_missing_path_is_config_error() {
        let err = PromptHarness::from_file(std::path::Path::new("/nonexistent/keywords.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to read keyword file"));
    }
}
