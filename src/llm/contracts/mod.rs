//! Prompt contracts: system instructions, task template, section headers
//!
//! Defines the fixed contract between the engine, the model and the UI.
//! The section headers are shared with `ui::sections`; treat them as an
//! interface, not prose.

mod prompts;

pub use prompts::{
    analysis_prompt, chat_system_prompt, greeting, system_prompt, AGE_NOT_PROVIDED,
    GREETING_MARKER, SECTION_CAUTIONS, SECTION_CONTRACT_VERSION, SECTION_HEADERS,
    SECTION_PATTERN_ANALYSIS, SECTION_RECOMMENDATIONS,
};

use crate::llm::adapters::LlmMessage;
use crate::llm::types::{AnalysisRequest, PromptPreset};

/// Build the system + user message pair for a single-shot analysis
pub fn analysis_messages(request: &AnalysisRequest, preset: PromptPreset) -> Vec<LlmMessage> {
    vec![
        LlmMessage::system(system_prompt(preset)),
        LlmMessage::user(analysis_prompt(request, preset)),
    ]
}
