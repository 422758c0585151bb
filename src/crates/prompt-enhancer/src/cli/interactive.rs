//! Line-oriented interactive session
//!
//! Each line is either a prompt to enhance or a `:command`. The session keeps
//! its own history and last critique for as long as the loop runs.

use crate::cli::enhance::{describe_selection, strategy_label};
use crate::cli::{parse_param, render_error, spinner, CliContext};
use crate::enhancer::PromptEnhancer;
use crate::error::{EnhancerError, Result};
use crate::pattern::PatternCatalog;
use crate::session::Session;
use colored::Colorize;
use llm::ModelClient;
use std::collections::BTreeMap;
use std::io::Write;
use tabled::{Table, Tabled};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Type a prompt to enhance it. Commands:
  :generate            generate a response from the last enhanced prompt
  :critique            show the critique from the last AI rewrite
  :history [json]      show template enhancements made in this session
  :pattern <id|auto>   force a pattern, or let the selector choose
  :param key=value     set a template parameter
  :params              show template parameters
  :help                show this help
  :quit                leave";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Prompt(String),
    Generate,
    Critique,
    History { json: bool },
    Pattern(Option<String>),
    Param(String),
    Params,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }

        let Some(command) = line.strip_prefix(':') else {
            return ReplCommand::Prompt(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "generate" | "g" => ReplCommand::Generate,
            "critique" | "c" => ReplCommand::Critique,
            "history" | "h" => ReplCommand::History { json: arg == "json" },
            "pattern" | "p" if arg.is_empty() || arg == "auto" => ReplCommand::Pattern(None),
            "pattern" | "p" => ReplCommand::Pattern(Some(arg.to_string())),
            "param" => ReplCommand::Param(arg.to_string()),
            "params" => ReplCommand::Params,
            "help" | "?" => ReplCommand::Help,
            "quit" | "q" | "exit" => ReplCommand::Quit,
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}

/// Whether the loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// History display row for table output
#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Type")]
    pattern: String,
    #[tabled(rename = "Original")]
    original: String,
}

/// State of one interactive user
pub struct InteractiveSession<'a, C> {
    enhancer: &'a PromptEnhancer<C>,
    session: Session,
    model: String,
    pattern: Option<String>,
    params: BTreeMap<String, String>,
    last_enhanced: Option<String>,
}

impl<'a, C: ModelClient> InteractiveSession<'a, C> {
    pub fn new(enhancer: &'a PromptEnhancer<C>, model: impl Into<String>) -> Self {
        Self {
            enhancer,
            session: Session::new(),
            model: model.into(),
            pattern: None,
            params: BTreeMap::new(),
            last_enhanced: None,
        }
    }

    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn last_enhanced(&self) -> Option<&str> {
        self.last_enhanced.as_deref()
    }

    /// Handle one input line, writing results to `out`
    ///
    /// Usage mistakes and model failures are reported on `out` and the
    /// session continues; only write failures are returned as errors.
    pub async fn handle<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        match ReplCommand::parse(line) {
            ReplCommand::Empty => {}
            ReplCommand::Quit => return Ok(Flow::Quit),
            ReplCommand::Help => writeln!(out, "{}", HELP)?,
            ReplCommand::Prompt(prompt) => self.enhance(&prompt, out).await?,
            ReplCommand::Generate => self.generate(out).await?,
            ReplCommand::Critique => match self.session.last_critique() {
                Some(critique) => writeln!(out, "{}", critique)?,
                None => writeln!(out, "{}", "No critique yet; critiques come from ai_rewrite.".yellow())?,
            },
            ReplCommand::History { json } => self.history(json, out)?,
            ReplCommand::Pattern(None) => {
                self.pattern = None;
                writeln!(out, "Pattern: auto")?;
            }
            ReplCommand::Pattern(Some(id)) => {
                if PatternCatalog::lookup(&id).is_some() {
                    writeln!(out, "Pattern: {}", id)?;
                    self.pattern = Some(id);
                } else {
                    let known: Vec<_> = PatternCatalog::ids().collect();
                    writeln!(out, "{}", format!("Unknown pattern '{}'. Known: {}", id, known.join(", ")).yellow())?;
                }
            }
            ReplCommand::Param(raw) => match parse_param(&raw) {
                Ok((key, value)) => {
                    writeln!(out, "{} = {}", key, value)?;
                    self.params.insert(key, value);
                }
                Err(e) => writeln!(out, "{}", render_error(&e).red())?,
            },
            ReplCommand::Params => {
                if self.params.is_empty() {
                    writeln!(out, "No parameters set")?;
                }
                for (key, value) in &self.params {
                    writeln!(out, "{} = {}", key, value)?;
                }
            }
            ReplCommand::Unknown(name) => {
                writeln!(out, "{}", format!("Unknown command ':{}' (try :help)", name).yellow())?
            }
        }
        Ok(Flow::Continue)
    }

    async fn enhance<W: Write>(&mut self, prompt: &str, out: &mut W) -> Result<()> {
        let outcome = match self.pattern {
            Some(ref pattern_id) => self
                .enhancer
                .enhance(&mut self.session, prompt, pattern_id, &self.params, &self.model)
                .await
                .map(|e| (None, e)),
            None => self
                .enhancer
                .run(&mut self.session, prompt, &self.params, &self.model, false)
                .await
                .map(|run| (Some(describe_selection(&run.selection)), run.enhancement)),
        };

        match outcome {
            Ok((detail, enhancement)) => {
                if let Some(pattern) = enhancement.pattern {
                    writeln!(out, "{} {}", "Strategy:".bold(), strategy_label(pattern, detail).cyan())?;
                    writeln!(out, "{}", pattern.description().dimmed())?;
                }
                if enhancement.critique.is_some() {
                    writeln!(out, "{}", "(critique available: :critique)".dimmed())?;
                }
                writeln!(out, "{}", enhancement.prompt)?;
                self.last_enhanced = Some(enhancement.prompt);
            }
            Err(e) => report(out, &e)?,
        }
        Ok(())
    }

    async fn generate<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let Some(ref prompt) = self.last_enhanced else {
            writeln!(out, "{}", "Nothing to generate yet; enter a prompt first.".yellow())?;
            return Ok(());
        };

        match self.enhancer.client().generate(prompt, &self.model).await {
            Ok(response) => writeln!(out, "{}", response)?,
            Err(e) => report(out, &EnhancerError::Llm(e))?,
        }
        Ok(())
    }

    fn history<W: Write>(&self, json: bool, out: &mut W) -> Result<()> {
        let history = self.session.history();
        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(history)?)?;
            return Ok(());
        }
        if history.is_empty() {
            writeln!(out, "No enhancements yet")?;
            return Ok(());
        }

        let rows: Vec<HistoryRow> = history
            .iter()
            .enumerate()
            .map(|(i, record)| HistoryRow {
                index: i + 1,
                time: record.timestamp.format("%H:%M:%S").to_string(),
                pattern: record.pattern.to_string(),
                original: truncate(&record.original, 48),
            })
            .collect();
        writeln!(out, "{}", Table::new(rows))?;
        Ok(())
    }
}

fn report<W: Write>(out: &mut W, err: &EnhancerError) -> Result<()> {
    writeln!(out, "{}", render_error(err).red())?;
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Handle interactive command
pub async fn handle_interactive(context: &CliContext, params: BTreeMap<String, String>) -> Result<()> {
    let model = context.resolve_model().await;
    let mut repl = InteractiveSession::new(&context.enhancer, model.clone()).with_params(params);

    eprintln!(
        "{} model {} at {} (session {})",
        "prompt-enhancer".bold(),
        model.cyan(),
        context.config.server.base_url,
        repl.session().id()
    );
    eprintln!("{}", ":help for commands, :quit to leave".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = std::io::stdout();

    loop {
        eprint!("{} ", ">".green().bold());
        std::io::stderr().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let busy = matches!(
            ReplCommand::parse(&line),
            ReplCommand::Prompt(_) | ReplCommand::Generate
        );
        let bar = busy.then(|| spinner("Thinking..."));
        let flow = repl.handle(&line, &mut out).await;
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        if flow? == Flow::Quit {
            break;
        }
    }

    Ok(())
}
