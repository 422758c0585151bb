//! `models` and `patterns` command handlers

use crate::cli::CliContext;
use crate::error::Result;
use crate::pattern::PatternCatalog;
use colored::Colorize;
use llm::ModelInfo;
use tabled::{Table, Tabled};

/// Model display row for table output
#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Model")]
    name: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Modified")]
    modified: String,
}

/// Pattern display row for table output
#[derive(Tabled)]
struct PatternRow {
    #[tabled(rename = "ID")]
    id: &'static str,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Parameters")]
    parameters: String,
    #[tabled(rename = "Description")]
    description: &'static str,
}

/// Handle models command
pub async fn handle_models(context: &CliContext) -> Result<()> {
    let base_url = &context.config.server.base_url;

    let models = match context.client().fetch_models().await {
        Ok(models) => models,
        Err(e) => {
            eprintln!(
                "{}",
                format!("⚠ Could not reach Ollama at {}: {}", base_url, e).yellow()
            );
            eprintln!(
                "  Start the server with 'ollama serve', or name a model with --model (default: {})",
                context.config.model.manual_fallback
            );
            return Ok(());
        }
    };

    if models.is_empty() {
        println!("{}", context.client().config().default_model);
        eprintln!(
            "{}",
            format!("No models installed at {}; pull one with 'ollama pull'", base_url).yellow()
        );
        return Ok(());
    }

    println!("{}", models_table(&models));
    eprintln!("\n{} model(s) at {}", models.len(), base_url);
    Ok(())
}

/// Handle patterns command
pub fn handle_patterns() -> Result<()> {
    println!("{}", patterns_table());
    Ok(())
}

fn models_table(models: &[ModelInfo]) -> String {
    let rows: Vec<ModelRow> = models
        .iter()
        .map(|m| ModelRow {
            name: m.name.clone(),
            size: m
                .size_gb()
                .map(|gb| format!("{:.1} GB", gb))
                .unwrap_or_else(|| "-".to_string()),
            modified: m
                .modified_at
                .as_deref()
                .and_then(|ts| ts.get(..10))
                .unwrap_or("-")
                .to_string(),
        })
        .collect();

    Table::new(rows).to_string()
}

/// Catalog as a table, with each template pattern's required parameters
pub fn patterns_table() -> String {
    let rows: Vec<PatternRow> = PatternCatalog::iter()
        .map(|p| {
            let required = p.required_parameters();
            PatternRow {
                id: p.id,
                name: p.name,
                parameters: if p.template.is_none() {
                    "(model rewrite)".to_string()
                } else if required.is_empty() {
                    "-".to_string()
                } else {
                    required.join(", ")
                },
                description: p.description,
            }
        })
        .collect();

    Table::new(rows).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_table_lists_catalog() {
        let table = patterns_table();
        for id in PatternCatalog::ids() {
            assert!(table.contains(id), "missing {}", id);
        }
        assert!(table.contains("persona"));
        assert!(table.contains("example_output_2"));
        assert!(table.contains("(model rewrite)"));
    }

    #[test]
    fn test_models_table() {
        let mut model = ModelInfo::new("llama3:latest");
        model.size = Some(4_661_224_676);
        model.modified_at = Some("2024-05-01T10:00:00Z".to_string());

        let table = models_table(&[model, ModelInfo::new("phi3")]);

        assert!(table.contains("llama3:latest"));
        assert!(table.contains("2024-05-01"));
        assert!(table.contains("GB"));
        assert!(table.contains("phi3"));
    }
}
