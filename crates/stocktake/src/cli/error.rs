//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// Lines file does not exist
    pub fn file_not_found(path: &Path) -> Self {
        Self::new(format!("File not found: {}", path.display()))
            .with_context("The lines file exported from the record store does not exist")
            .with_suggestions([
                format!("TRY: Check if the file exists: ls -la {}", path.display()),
                format!("TRY: Look for similar files: ls {}",
                    path.parent().map(|p| p.display().to_string()).unwrap_or_else(|| ".".to_string())),
            ])
    }

    /// Lines file exists but does not parse
    pub fn invalid_lines_file(path: &Path, details: &str) -> Self {
        Self::new(format!("Cannot read scan lines: {}", details))
            .with_context(format!("Failed to parse lines file: {}", path.display()))
            .with_suggestions([
                "TRY: The file must be a JSON array of line documents or one document per line".to_string(),
                "TRY: Every document needs an \"id\" field".to_string(),
            ])
    }

    /// Session key not present in the current collection
    pub fn session_not_found<'a>(key: &str, available: impl IntoIterator<Item = &'a str>) -> Self {
        let mut err = Self::new(format!("Session not found: {}", key))
            .with_context("Session keys are device|warehouse|zone|bin")
            .with_suggestion("TRY: List sessions: stocktake sessions FILE");
        let known: Vec<&str> = available.into_iter().take(5).collect();
        if !known.is_empty() {
            err = err.with_suggestion(format!("TRY: Known sessions: {}", known.join(", ")));
        }
        err
    }

    /// Line id not present in the current collection
    pub fn line_not_found(id: &str) -> Self {
        Self::new(format!("Line not found: {}", id))
            .with_context("The line may have been deleted since the file was exported")
            .with_suggestion("TRY: Show the session to see line ids: stocktake show FILE KEY")
    }

    /// Edit rejected by validation
    pub fn invalid_edit(batch: &str, qty: &str) -> Self {
        Self::new(format!("Invalid edit: batch '{}', qty '{}'", batch, qty))
            .with_context("Batch must not be blank and quantity must be a positive number")
            .with_suggestion("TRY: stocktake edit FILE ID --batch L2291 --qty 4")
    }

    /// Nothing to export
    pub fn no_data(path: &Path) -> Self {
        Self::new("No data to export")
            .with_context(format!("{} contains no scan lines", path.display()))
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// Print an error as a JSON object on stdout, for `--json` callers.
pub fn print_json_error(err: &anyhow::Error) {
    let payload = match err.downcast_ref::<HelpfulError>() {
        Some(helpful) => serde_json::json!({
            "error": {
                "message": helpful.message,
                "context": helpful.context,
                "suggestions": helpful.suggestions,
            }
        }),
        None => serde_json::json!({
            "error": {
                "message": format!("{:#}", err),
            }
        }),
    };
    println!("{}", payload);
}
