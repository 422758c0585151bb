//! `choose`, `enhance` and `generate` command handlers

use crate::cli::{heading, spinner, CliContext};
use crate::enhancer::Enhancement;
use crate::error::{EnhancerError, Result};
use crate::pattern::PatternType;
use crate::selector::{Selection, SelectionReason};
use crate::session::Session;
use colored::Colorize;
use llm::ModelClient;
use std::collections::BTreeMap;

/// Options for the enhance command
#[derive(Debug, Clone, Default)]
pub struct EnhanceOptions {
    /// Pattern to apply instead of asking the selector
    pub pattern: Option<String>,
    /// Template parameters
    pub params: BTreeMap<String, String>,
    /// Also generate a response from the enhanced prompt
    pub generate: bool,
}

/// Handle choose command
pub async fn handle_choose(context: &CliContext, prompt: &str) -> Result<()> {
    let prompt = require_prompt(prompt)?;
    let model = context.resolve_model().await;

    let bar = spinner(format!("Choosing a strategy with {}...", model));
    let selection = context
        .enhancer
        .selector()
        .select(context.client(), prompt, &model)
        .await;
    bar.finish_and_clear();

    println!("{}", selection.pattern);
    eprintln!(
        "{}",
        strategy_label(selection.pattern, Some(describe_selection(&selection))).cyan()
    );
    eprintln!("{}", selection.pattern.description().dimmed());
    Ok(())
}

/// Handle enhance command
pub async fn handle_enhance(context: &CliContext, prompt: &str, options: EnhanceOptions) -> Result<()> {
    let prompt = require_prompt(prompt)?;
    let model = context.resolve_model().await;
    let enhancer = &context.enhancer;
    let mut session = Session::new();

    let bar = spinner(format!("Enhancing with {}...", model));
    let outcome = match options.pattern {
        Some(ref pattern_id) => enhancer
            .enhance(&mut session, prompt, pattern_id, &options.params, &model)
            .await
            .map(|enhancement| (None, enhancement)),
        None => enhancer
            .run(&mut session, prompt, &options.params, &model, false)
            .await
            .map(|run| (Some(run.selection), run.enhancement)),
    };
    bar.finish_and_clear();
    let (selection, enhancement) = outcome?;

    if let Some(pattern) = enhancement.pattern {
        let detail = selection.as_ref().map(describe_selection);
        eprintln!("{} {}", "Strategy:".bold(), strategy_label(pattern, detail).cyan());
        eprintln!("{}\n", pattern.description().dimmed());
    }
    print_enhancement(&enhancement, options.pattern.as_deref());

    if options.generate {
        let bar = spinner(format!("Generating with {}...", model));
        let response = context.client().generate(&enhancement.prompt, &model).await;
        bar.finish_and_clear();

        eprintln!();
        heading("Response");
        println!("{}", response?);
    }

    Ok(())
}

/// Handle generate command
pub async fn handle_generate(context: &CliContext, prompt: &str) -> Result<()> {
    let prompt = require_prompt(prompt)?;
    let model = context.resolve_model().await;

    let bar = spinner(format!("Generating with {}...", model));
    let response = context.client().generate(prompt, &model).await;
    bar.finish_and_clear();

    println!("{}", response?);
    Ok(())
}

fn print_enhancement(enhancement: &Enhancement, requested: Option<&str>) {
    if enhancement.pattern.is_none() {
        eprintln!(
            "{}",
            format!(
                "⚠ Unknown pattern '{}'; prompt left unchanged (see 'prompt-enhancer patterns')",
                requested.unwrap_or_default()
            )
            .yellow()
        );
    }

    if let Some(ref critique) = enhancement.critique {
        heading("Critique");
        eprintln!("{}\n", critique);
    }

    heading("Enhanced prompt");
    println!("{}", enhancement.prompt);
}

/// Display name and identifier of a strategy, with how it was reached
pub fn strategy_label(pattern: PatternType, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!("{} ({}, {})", pattern.name(), pattern, detail),
        None => format!("{} ({})", pattern.name(), pattern),
    }
}

/// Short explanation of how a selection was reached
pub fn describe_selection(selection: &Selection) -> &'static str {
    match selection.reason {
        SelectionReason::LongPrompt => "long prompt",
        SelectionReason::ModelChoice => "chosen by the model",
        SelectionReason::Fallback => "fallback",
    }
}

fn require_prompt(prompt: &str) -> Result<&str> {
    if prompt.trim().is_empty() {
        return Err(EnhancerError::InvalidInput("prompt must not be empty".to_string()));
    }
    Ok(prompt)
}
