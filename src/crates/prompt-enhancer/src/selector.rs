//! Strategy selection
//!
//! Picks a catalog pattern for a prompt. Long prompts go straight to
//! `ai_rewrite`; shorter ones are classified by the model itself, which is
//! asked to answer with a single identifier.
//!
//! Classification is best effort. When the length heuristic does not apply,
//! `choose` may return different patterns for the same input on different
//! calls, because the answer comes from the model.

use crate::pattern::{PatternCatalog, PatternType};
use llm::ModelClient;
use tracing::{debug, warn};

/// Word count above which a prompt is sent to `ai_rewrite` without asking
pub const DEFAULT_WORD_THRESHOLD: usize = 15;

/// Pattern used when the model's answer names no catalog identifier
pub const DEFAULT_FALLBACK: PatternType = PatternType::XmlStructure;

/// How a selection was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    /// Prompt exceeded the word threshold
    LongPrompt,
    /// Model reply contained a catalog identifier
    ModelChoice,
    /// Reply named nothing usable, or generation failed
    Fallback,
}

/// A chosen pattern and why it was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub pattern: PatternType,
    pub reason: SelectionReason,
}

/// Chooses an enhancement pattern for a prompt
#[derive(Debug, Clone)]
pub struct StrategySelector {
    word_threshold: usize,
    fallback: PatternType,
}

impl StrategySelector {
    pub fn new() -> Self {
        Self {
            word_threshold: DEFAULT_WORD_THRESHOLD,
            fallback: DEFAULT_FALLBACK,
        }
    }

    pub fn with_word_threshold(mut self, word_threshold: usize) -> Self {
        self.word_threshold = word_threshold;
        self
    }

    pub fn with_fallback(mut self, fallback: PatternType) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn word_threshold(&self) -> usize {
        self.word_threshold
    }

    pub fn fallback(&self) -> PatternType {
        self.fallback
    }

    /// Choose the pattern identifier for `prompt`.
    pub async fn choose<C>(&self, client: &C, prompt: &str, model: &str) -> PatternType
    where
        C: ModelClient + ?Sized,
    {
        self.select(client, prompt, model).await.pattern
    }

    /// Like [`choose`](Self::choose), also reporting how the choice was made.
    pub async fn select<C>(&self, client: &C, prompt: &str, model: &str) -> Selection
    where
        C: ModelClient + ?Sized,
    {
        let words = prompt.split_whitespace().count();
        if words > self.word_threshold {
            debug!(words, threshold = self.word_threshold, "Long prompt, using ai_rewrite");
            return Selection {
                pattern: PatternType::AiRewrite,
                reason: SelectionReason::LongPrompt,
            };
        }

        let reply = match client.generate(&classification_prompt(prompt), model).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, fallback = %self.fallback, "Strategy classification failed");
                return Selection {
                    pattern: self.fallback,
                    reason: SelectionReason::Fallback,
                };
            }
        };

        match match_identifier(&reply) {
            Some(pattern) => {
                debug!(%pattern, "Model chose strategy");
                Selection {
                    pattern,
                    reason: SelectionReason::ModelChoice,
                }
            }
            None => {
                debug!(reply = %reply, fallback = %self.fallback, "No strategy in model reply");
                Selection {
                    pattern: self.fallback,
                    reason: SelectionReason::Fallback,
                }
            }
        }
    }
}

impl Default for StrategySelector {
    fn default() -> Self {
        Self::new()
    }
}

/// First catalog identifier (in catalog order) contained in `reply`.
///
/// Matching is by substring on the trimmed, lower-cased reply, so extra
/// words around the identifier are tolerated.
pub fn match_identifier(reply: &str) -> Option<PatternType> {
    let normalized = reply.trim().to_lowercase();
    PatternType::ALL
        .into_iter()
        .find(|pattern| normalized.contains(pattern.as_str()))
}

/// One line per catalog entry: `- **id**: name - description`
pub fn strategy_descriptions() -> String {
    PatternCatalog::iter()
        .map(|p| format!("- **{}**: {} - {}", p.id, p.name, p.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Meta-instruction asking the model to pick one identifier for `prompt`
pub fn classification_prompt(prompt: &str) -> String {
    format!(
        r#"<task>
You are an expert in prompt engineering. Your task is to analyze the following user prompt and choose the single best enhancement strategy from the list provided.

**User Prompt:**
"{prompt}"

**Available Enhancement Strategies:**
{strategies}

**Instructions:**
1. Read the user prompt carefully.
2. For simple, short prompts, a template-based approach is fine.
3. For more complex or vague prompts, `ai_rewrite` is usually the best choice.
4. Respond with ONLY the identifier of your chosen strategy (e.g., xml_structure, ai_rewrite). Do not add any other text or explanation.
</task>

Chosen strategy identifier:"#,
        prompt = prompt,
        strategies = strategy_descriptions(),
    )
}
