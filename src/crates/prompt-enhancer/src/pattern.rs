//! Prompt enhancement patterns
//!
//! The catalog is a fixed, ordered set of recipes for transforming a prompt.
//! Four of them are plain templates; `ai_rewrite` has no template and is
//! carried out by asking the model to critique and rewrite the prompt.
//!
//! # Pattern Selection Guide
//!
//! ## AI-Driven Rewrite
//!
//! Best for long or vague prompts. Costs two extra model calls.
//!
//! ## XML Structure
//!
//! Wraps the prompt in `<instructions>` and adds context, example and
//! formatting sections. The fallback when no better choice is known.
//!
//! ## Chain of Thought
//!
//! Asks for step-by-step reasoning inside `<thinking>` tags.
//!
//! ## Role Prompting / Multishot Examples
//!
//! Need extra parameters (persona details, worked examples) supplied by the
//! caller.
//!
//! # Usage
//!
//! ```rust
//! use prompt_enhancer::pattern::{PatternCatalog, PatternType};
//!
//! let pattern = PatternCatalog::lookup("chain_of_thought").unwrap();
//! assert_eq!(pattern.kind, PatternType::ChainOfThought);
//!
//! let ids: Vec<_> = PatternCatalog::iter().map(|p| p.id).collect();
//! assert_eq!(ids[0], "ai_rewrite");
//! ```

use crate::template;

/// Identifier of a catalog pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Critique then rewrite, delegated to the model
    AiRewrite,

    /// XML tag structure around the prompt
    XmlStructure,

    /// Step-by-step reasoning scaffold
    ChainOfThought,

    /// Expert persona framing
    RolePrompting,

    /// Prompt followed by two worked examples
    MultishotExamples,
}

impl PatternType {
    /// All patterns, in catalog order
    pub const ALL: [PatternType; 5] = [
        Self::AiRewrite,
        Self::XmlStructure,
        Self::ChainOfThought,
        Self::RolePrompting,
        Self::MultishotExamples,
    ];

    /// Parse an exact catalog identifier
    pub fn from_id(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiRewrite => "ai_rewrite",
            Self::XmlStructure => "xml_structure",
            Self::ChainOfThought => "chain_of_thought",
            Self::RolePrompting => "role_prompting",
            Self::MultishotExamples => "multishot_examples",
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::AiRewrite => "AI-Driven Rewrite",
            Self::XmlStructure => "XML Structure Enhancement",
            Self::ChainOfThought => "Chain of Thought with XML",
            Self::RolePrompting => "Role-Based Prompting",
            Self::MultishotExamples => "Multishot Example Enhancement",
        }
    }

    /// Get pattern description
    pub fn description(&self) -> &'static str {
        match self {
            Self::AiRewrite => {
                "Uses an AI to critique and rewrite the prompt from scratch for maximum effectiveness."
            }
            Self::XmlStructure => {
                "Uses XML tags for clear prompt organization (Anthropic's signature technique)"
            }
            Self::ChainOfThought => {
                "Encourages step-by-step reasoning with structured thinking"
            }
            Self::RolePrompting => "Assigns specific expert roles for domain expertise",
            Self::MultishotExamples => {
                "Provides multiple high-quality examples with consistent formatting"
            }
        }
    }

    /// Template text, if this pattern is template based
    pub fn template(&self) -> Option<&'static str> {
        match self {
            Self::AiRewrite => None,
            Self::XmlStructure => Some(XML_STRUCTURE_TEMPLATE),
            Self::ChainOfThought => Some(CHAIN_OF_THOUGHT_TEMPLATE),
            Self::RolePrompting => Some(ROLE_PROMPTING_TEMPLATE),
            Self::MultishotExamples => Some(MULTISHOT_EXAMPLES_TEMPLATE),
        }
    }

    /// Full catalog entry for this pattern
    pub fn pattern(&self) -> Pattern {
        Pattern {
            kind: *self,
            id: self.as_str(),
            name: self.name(),
            description: self.description(),
            template: self.template(),
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Catalog entry: identifier, display data and optional template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub kind: PatternType,
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub template: Option<&'static str>,
}

impl Pattern {
    /// Placeholders the caller must supply, excluding `original_prompt`.
    ///
    /// Names are deduplicated and kept in first-appearance order.
    pub fn required_parameters(&self) -> Vec<&'static str> {
        self.template
            .map(template::placeholders)
            .unwrap_or_default()
            .into_iter()
            .filter(|name| *name != template::ORIGINAL_PROMPT)
            .collect()
    }
}

/// Read-only view over the built-in patterns
pub struct PatternCatalog;

impl PatternCatalog {
    /// Look a pattern up by its exact identifier
    pub fn lookup(id: &str) -> Option<Pattern> {
        PatternType::from_id(id).map(|p| p.pattern())
    }

    /// All patterns in catalog order
    pub fn iter() -> impl Iterator<Item = Pattern> {
        PatternType::ALL.into_iter().map(|p| p.pattern())
    }

    /// Catalog identifiers in catalog order
    pub fn ids() -> impl Iterator<Item = &'static str> {
        PatternType::ALL.into_iter().map(|p| p.as_str())
    }
}

const XML_STRUCTURE_TEMPLATE: &str = "<instructions>
{original_prompt}
</instructions>

<context>
Provide any relevant background information that helps with understanding the task.
</context>

<examples>
<example>
<input>Sample input here</input>
<output>Expected output format</output>
</example>
</examples>

<formatting>
Please structure your response clearly and follow the examples provided.
</formatting>";

const CHAIN_OF_THOUGHT_TEMPLATE: &str = "<task>
{original_prompt}
</task>

<instructions>
Before providing your final answer, please think through this step-by-step inside <thinking> tags:
1. Break down the problem
2. Consider different approaches
3. Work through the solution
4. Verify your reasoning
</instructions>

<thinking>
[Your step-by-step reasoning will go here]
</thinking>

Please provide your response after showing your thinking process.";

const ROLE_PROMPTING_TEMPLATE: &str = "<role>
You are a world-class {persona} with {years_experience} years of experience in {domain}. You are known for your {key_strengths} and have a reputation for {reputation_traits}.
</role>

<task>
{original_prompt}
</task>

<approach>
As an expert {persona}, please:
1. Apply your specialized knowledge and experience
2. Consider industry best practices and standards
3. Provide insights that only an expert would know
4. Structure your response professionally
</approach>";

const MULTISHOT_EXAMPLES_TEMPLATE: &str = "<task>
{original_prompt}
</task>

<examples>
<example_1>
<input>{example_input_1}</input>
<output>{example_output_1}</output>
</example_1>

<example_2>
<input>{example_input_2}</input>
<output>{example_output_2}</output>
</example_2>
</examples>

<instructions>
Following the pattern shown in the examples above, please process the actual task.
</instructions>";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_type_conversion() {
        assert_eq!(PatternType::from_id("ai_rewrite"), Some(PatternType::AiRewrite));
        assert_eq!(
            PatternType::from_id("xml_structure"),
            Some(PatternType::XmlStructure)
        );
        assert_eq!(
            PatternType::from_id("multishot_examples"),
            Some(PatternType::MultishotExamples)
        );
        assert_eq!(PatternType::from_id("XML_STRUCTURE"), None);
        assert_eq!(PatternType::from_id("invalid"), None);
    }

    #[test]
    fn test_pattern_type_as_str_round_trips() {
        for pattern in PatternType::ALL {
            assert_eq!(PatternType::from_id(pattern.as_str()), Some(pattern));
        }
    }

    #[test]
    fn test_catalog_order_is_stable() {
        let ids: Vec<_> = PatternCatalog::ids().collect();
        assert_eq!(
            ids,
            vec![
                "ai_rewrite",
                "xml_structure",
                "chain_of_thought",
                "role_prompting",
                "multishot_examples"
            ]
        );
        let again: Vec<_> = PatternCatalog::iter().map(|p| p.id).collect();
        assert_eq!(ids, again);
    }

    #[test]
    fn test_lookup() {
        let pattern = PatternCatalog::lookup("role_prompting").unwrap();
        assert_eq!(pattern.name, "Role-Based Prompting");
        assert!(pattern.template.is_some());

        assert!(PatternCatalog::lookup("ai_rewrite").unwrap().template.is_none());
        assert!(PatternCatalog::lookup("nope").is_none());
    }

    #[test]
    fn test_required_parameters() {
        assert!(PatternType::XmlStructure.pattern().required_parameters().is_empty());
        assert!(PatternType::AiRewrite.pattern().required_parameters().is_empty());
        assert_eq!(
            PatternType::RolePrompting.pattern().required_parameters(),
            vec![
                "persona",
                "years_experience",
                "domain",
                "key_strengths",
                "reputation_traits"
            ]
        );
        assert_eq!(
            PatternType::MultishotExamples.pattern().required_parameters(),
            vec![
                "example_input_1",
                "example_output_1",
                "example_input_2",
                "example_output_2"
            ]
        );
    }

    #[test]
    fn test_pattern_type_display() {
        assert_eq!(format!("{}", PatternType::ChainOfThought), "chain_of_thought");
    }

    #[test]
    fn test_pattern_type_description() {
        assert!(PatternType::AiRewrite.description().contains("critique"));
        assert!(PatternType::XmlStructure.description().contains("XML"));
    }
}
