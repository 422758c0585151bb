//! CLI command implementations
//!
//! Provides command handlers for the prompt-enhancer binary. Prompts, enhanced
//! prompts and model output go to stdout; headings, progress and warnings go to
//! stderr.

pub mod catalog;
pub mod config;
pub mod context;
pub mod enhance;
pub mod interactive;

pub use context::{parse_param, resolve_model, CliContext, Overrides};

use crate::error::EnhancerError;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::Duration;

/// Spinner shown on stderr while waiting for the model
pub fn spinner(message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Collect `key=value` pairs into a parameter map; later keys win
pub fn collect_params(pairs: Vec<(String, String)>) -> BTreeMap<String, String> {
    pairs.into_iter().collect()
}

/// User-facing text for an error
///
/// Model-server failures use the bracketed form shown in place of a response.
pub fn render_error(err: &EnhancerError) -> String {
    match err {
        EnhancerError::Llm(e) => e.display_text(),
        other => other.to_string(),
    }
}

/// Process exit code for an error
pub fn exit_code(err: &EnhancerError) -> i32 {
    if err.is_usage_error() {
        2
    } else {
        1
    }
}

pub(crate) fn heading(text: &str) {
    eprintln!("{}", text.bold().underline());
}
