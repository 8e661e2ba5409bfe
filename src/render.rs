//! Human-readable and JSON output for pipeline results.

use std::fmt::Write as _;

use crate::pipeline::PipelineResult;

/// Output flavour for a rendered result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented report for terminals
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Renders `result` in the requested format.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn render(result: &PipelineResult, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(result)),
        OutputFormat::Json => render_json(result),
    }
}

/// Pretty JSON with a trailing newline.
///
/// # Errors
/// Returns error if serialization fails.
pub fn render_json(result: &PipelineResult) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(result)?;
    json.push('\n');
    Ok(json)
}

/// Text report: a summary line, then one block per cluster.
#[must_use]
pub fn render_text(result: &PipelineResult) -> String {
    let mut out = String::new();

    if let Some(reason) = result.degenerate {
        let _ = writeln!(out, "No clusters: {reason}");
        return out;
    }

    let _ = write!(
        out,
        "{} questions, {} clusters",
        result.total_input_count, result.cluster_count
    );
    if let Some(threshold) = result.threshold {
        let _ = write!(out, " (cut height {threshold:.2})");
    }
    out.push('\n');

    for (index, cluster) in result.clusters.iter().enumerate() {
        let noun = if cluster.size() == 1 { "question" } else { "questions" };
        let _ = writeln!(out, "\n#{} ({} {noun})", index + 1, cluster.size());
        for member in &cluster.members {
            let _ = writeln!(out, "  [{}] {}", member.label.badge(), member.text.trim());
        }
        let _ = writeln!(out, "  {}", "-".repeat(40));
        if !cluster.keywords.is_empty() {
            let _ = writeln!(out, "  Keyphrases: {}", cluster.keywords.join(", "));
        }
        let _ = writeln!(
            out,
            "  Dates: {} … {}",
            cluster.date_range.start, cluster.date_range.end
        );
    }
    out
}
