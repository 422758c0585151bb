//! Prompt enhancement
//!
//! Applies a catalog pattern to a prompt. Template patterns are a pure
//! substitution; `ai_rewrite` asks the model to critique the prompt and then
//! to rewrite it with that critique in hand.
//!
//! All state lives in the caller's [`Session`]: template enhancements are
//! appended to its history and the last critique is stored on it.

use crate::error::{EnhancerError, Result};
use crate::pattern::{PatternCatalog, PatternType};
use crate::selector::{Selection, StrategySelector};
use crate::session::{EnhancementRecord, Session};
use crate::template::{self, TemplateError};
use llm::ModelClient;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Outcome of one enhancement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enhancement {
    /// Pattern applied, or `None` when the identifier was not in the catalog
    pub pattern: Option<PatternType>,
    /// The enhanced prompt
    pub prompt: String,
    /// Critique produced by `ai_rewrite`, for display only
    pub critique: Option<String>,
}

/// Result of a full choose → enhance → generate pass
#[derive(Debug)]
pub struct EnhancementRun {
    pub selection: Selection,
    pub enhancement: Enhancement,
    /// Final generation for the enhanced prompt, if one was requested
    pub response: Option<llm::Result<String>>,
}

/// Enhances prompts against one model client
pub struct PromptEnhancer<C> {
    client: C,
    selector: StrategySelector,
}

impl<C: ModelClient> PromptEnhancer<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            selector: StrategySelector::new(),
        }
    }

    pub fn with_selector(mut self, selector: StrategySelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn selector(&self) -> &StrategySelector {
        &self.selector
    }

    /// Apply the pattern named `pattern_id` to `prompt`.
    ///
    /// An identifier outside the catalog returns the prompt unchanged. For
    /// template patterns, `params` supplies every placeholder other than
    /// `original_prompt`; a missing one is a usage error. `model` is only
    /// used by `ai_rewrite`. Any critique left on the session by an earlier
    /// enhancement is cleared first.
    pub async fn enhance(
        &self,
        session: &mut Session,
        prompt: &str,
        pattern_id: &str,
        params: &BTreeMap<String, String>,
        model: &str,
    ) -> Result<Enhancement> {
        session.set_critique(None);

        let Some(pattern) = PatternCatalog::lookup(pattern_id) else {
            debug!(pattern_id, "Unknown pattern, leaving prompt unchanged");
            return Ok(Enhancement {
                pattern: None,
                prompt: prompt.to_string(),
                critique: None,
            });
        };

        let Some(template_text) = pattern.template else {
            let (critique, rewritten) = self.rewrite_with_ai(prompt, model).await?;
            session.set_critique(Some(critique.clone()));
            return Ok(Enhancement {
                pattern: Some(pattern.kind),
                prompt: rewritten,
                critique: Some(critique),
            });
        };

        let mut values = params.clone();
        values.insert(template::ORIGINAL_PROMPT.to_string(), prompt.to_string());

        let enhanced = template::render(template_text, &values).map_err(|e| match e {
            TemplateError::Missing(placeholder) => EnhancerError::MissingParameter {
                pattern: pattern.id.to_string(),
                placeholder,
            },
            TemplateError::Malformed(offset) => EnhancerError::InvalidInput(format!(
                "template for '{}' is malformed at byte {}",
                pattern.id, offset
            )),
        })?;

        session.record(EnhancementRecord::new(
            prompt,
            enhanced.clone(),
            pattern.kind,
            params.clone(),
        ));
        info!(pattern = pattern.id, session = session.id(), "Prompt enhanced");

        Ok(Enhancement {
            pattern: Some(pattern.kind),
            prompt: enhanced,
            critique: None,
        })
    }

    /// Critique `prompt`, then rewrite it using that critique.
    ///
    /// Returns `(critique, rewritten_prompt)` with wrapping tags removed.
    pub async fn rewrite_with_ai(&self, prompt: &str, model: &str) -> Result<(String, String)> {
        let critique = self.client.generate(&critique_prompt(prompt), model).await?;
        let rewritten = self
            .client
            .generate(&rewrite_prompt(prompt, &critique), model)
            .await?;

        Ok((
            strip_tags(&critique, "critique"),
            strip_tags(&rewritten, "rewritten_prompt"),
        ))
    }

    /// Choose a pattern for `prompt`, apply it, and optionally generate the
    /// final response from the enhanced prompt.
    pub async fn run(
        &self,
        session: &mut Session,
        prompt: &str,
        params: &BTreeMap<String, String>,
        model: &str,
        generate: bool,
    ) -> Result<EnhancementRun> {
        let selection = self.selector.select(&self.client, prompt, model).await;
        let enhancement = self
            .enhance(session, prompt, selection.pattern.as_str(), params, model)
            .await?;

        let response = if generate {
            Some(self.client.generate(&enhancement.prompt, model).await)
        } else {
            None
        };

        Ok(EnhancementRun {
            selection,
            enhancement,
            response,
        })
    }
}

/// Remove every `<tag>` and `</tag>` from `text`, then trim.
fn strip_tags(text: &str, tag: &str) -> String {
    text.replace(&format!("<{}>", tag), "")
        .replace(&format!("</{}>", tag), "")
        .trim()
        .to_string()
}

/// Instruction asking the model to critique `prompt`
pub fn critique_prompt(prompt: &str) -> String {
    format!(
        r#"<task>
You are a world-class prompt engineering expert. Your task is to analyze and critique the following user-provided prompt.
Identify its weaknesses based on criteria like clarity, specificity, context, constraints, and desired output format.

**User Prompt:**
`{prompt}`

Provide your critique in a <critique> XML tag. Be specific and constructive.
</task>"#
    )
}

/// Instruction asking the model to rewrite `prompt` given `critique`
pub fn rewrite_prompt(prompt: &str, critique: &str) -> String {
    format!(
        r#"<task>
You are a world-class prompt engineering expert. You will be given an original prompt and a critique of that prompt.
Your task is to rewrite the original prompt to be a much more effective, "best-in-class" prompt, addressing all the points in the critique.
The new prompt should be significantly more detailed and structured, incorporating principles like XML tagging, clear instructions, context, and examples where appropriate.

**Original Prompt:**
`{prompt}`

**Critique:**
{critique}

Now, provide the new, rewritten prompt inside a <rewritten_prompt> XML tag. Output only the content for the new prompt, without the XML tag itself.
</task>"#
    )
}
