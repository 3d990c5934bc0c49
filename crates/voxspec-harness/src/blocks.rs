//! The fixed catalogue of topology instruction blocks.

use voxspec_contracts::harness::TopologyBlockId;

const SYMBOL_CAPTURE: &str = "
You must capture exact symbols: alphanumeric codes, IDs, plate numbers, and reference numbers.
Do not paraphrase or substitute; repeat back character-for-character when confirming.
";

const PHONETIC_RULE: &str = "
Use phonetic clarification for ambiguous characters (e.g. \"B as in Bravo\", \"5 as in Five\").
Request spell-back for codes and IDs when the environment is noisy or the user is unsure.
";

const EXECUTION_GATE: &str = "
Before executing any dispatch, route, or external action, normalize the user's intent into a single unambiguous instruction.
Do not execute on partial or ambiguous input; ask one clarifying question if needed, then proceed.
";

const NOISE_RECOVERY: &str = "
In noisy or field environments, ask the user to repeat critical values (IDs, codes, numbers) once before confirming.
If you are unsure after one repetition, confirm the full value using readback before proceeding.
";

const READBACK: &str = "
After capturing key information, read it back to the user for confirmation before taking action.
Use the exact wording: \"I have [X]. Is that correct?\" and wait for explicit yes/no or correction.
";

const TOOL_ALIGNMENT: &str = "
When calling tools or dispatching actions, use only the parameters defined in the tool schema.
Do not invent or assume parameters; if a required field is missing, ask the user for it once.
";

/// Raw text of `id`. Callers trim before use.
pub fn block_text(id: TopologyBlockId) -> &'static str {
    match id {
        TopologyBlockId::SymbolCapture => SYMBOL_CAPTURE,
        TopologyBlockId::PhoneticRule => PHONETIC_RULE,
        TopologyBlockId::ExecutionGate => EXECUTION_GATE,
        TopologyBlockId::NoiseRecovery => NOISE_RECOVERY,
        TopologyBlockId::Readback => READBACK,
        TopologyBlockId::ToolAlignment => TOOL_ALIGNMENT,
    }
}
