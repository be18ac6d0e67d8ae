// crates/retag/src/flow.rs
// Update flow: read -> value -> patch -> confirm -> write -> report

use crate::diff::{changes, render_report};
use crate::error::Result;
use crate::mcp_client::FileAccess;
use crate::patch::{Document, MatchPattern, Patched, Replacement, patch};
use crate::prompt::Operator;
use tracing::{debug, info};

const RULE_WIDTH: usize = 50;

const VALUE_PROMPT: &str = "Enter new image name:tag (e.g., demo_serve:02 or my_model:v1)";

/// Where the replacement value comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Given on the command line
    Flag(String),
    /// First line of piped stdin
    Stdin,
    /// Chosen from a catalog of `repo:tag` names
    Pick(Vec<String>),
    /// Typed at a free-text prompt
    Prompt,
}

impl ValueSource {
    /// Operator is answering prompts for this value
    pub fn is_interactive(&self) -> bool {
        matches!(self, ValueSource::Pick(_) | ValueSource::Prompt)
    }
}

/// Whether writing needs an explicit yes from the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmPolicy {
    #[default]
    Ask,
    AssumeYes,
}

/// Everything one run needs besides its collaborators
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub path: String,
    pub pattern: MatchPattern,
    pub source: ValueSource,
    pub policy: ConfirmPolicy,
}

/// Decision point where the operator said no
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// "continue anyway?" after the pattern produced no change
    NoMatch,
    /// "write these changes?" after the preview
    Write,
}

/// How a run that did not fail ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written {
        document: Document,
        /// 1-based line numbers reported as changed
        changed_lines: Vec<usize>,
        /// Server acknowledgement text
        ack: String,
    },
    Declined(Checkpoint),
}

/// Run one update against `access`, talking to the operator through `operator`.
///
/// Read, value and write failures come back as `Err`; nothing is retried.
pub async fn run_update<A, O>(access: &A, operator: &mut O, request: &UpdateRequest) -> Result<Outcome>
where
    A: FileAccess + ?Sized,
    O: Operator + ?Sized,
{
    let original = Document::new(access.read_file(&request.path).await?);
    operator.show(&banner(&format!("Original File: {}", request.path)));
    operator.show(original.as_str());

    let replacement = resolve_value(operator, &request.source)?;
    info!(path = %request.path, value = %replacement, "Replacement value resolved");

    let Patched {
        document: updated,
        matches,
        changed,
    } = patch(&original, &request.pattern, &replacement);
    debug!(matches, changed, "Patch computed");

    if !changed {
        if matches == 0 {
            operator.show(
                "\nWarning: No changes detected. Image might not match the expected pattern.",
            );
        } else {
            operator.show(&format!(
                "\nWarning: No changes detected. Image is already {}{}.",
                request.pattern.prefix(),
                replacement
            ));
        }

        if request.source.is_interactive()
            && request.policy == ConfirmPolicy::Ask
            && !operator.confirm("Do you want to continue anyway?")?
        {
            return Ok(Outcome::Declined(Checkpoint::NoMatch));
        }
    }

    if request.policy == ConfirmPolicy::Ask {
        operator.show(&banner("Updated Content Preview:"));
        operator.show(updated.as_str());

        if !operator.confirm("Do you want to write these changes?")? {
            operator.show("Changes discarded.");
            return Ok(Outcome::Declined(Checkpoint::Write));
        }
    }

    let ack = access.write_file(&request.path, updated.as_str()).await?;
    operator.show("\nFile updated successfully!");
    if !ack.is_empty() {
        operator.show(&format!("Write result: {}", ack));
    }

    let report = changes(&original, &updated);
    let changed_lines: Vec<usize> = report.clone().map(|c| c.line).collect();
    operator.show(&render_report(report));
    info!(path = %request.path, lines = changed_lines.len(), "Manifest written");

    Ok(Outcome::Written {
        document: updated,
        changed_lines,
        ack,
    })
}

/// Obtain the replacement from exactly one source
fn resolve_value<O: Operator + ?Sized>(operator: &mut O, source: &ValueSource) -> Result<Replacement> {
    let raw = match source {
        ValueSource::Flag(value) => value.clone(),
        ValueSource::Stdin => {
            let line = operator.read_piped_line()?;
            operator.show(&format!("Received image name from stdin: {}", line.trim()));
            line
        }
        ValueSource::Pick(items) => match operator.pick("Choose an image", items)? {
            Some(idx) => items.get(idx).cloned().unwrap_or_default(),
            None => String::new(),
        },
        ValueSource::Prompt => operator.ask(VALUE_PROMPT)?,
    };
    Replacement::parse(&raw)
}

fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{rule}\n{title}\n{rule}")
}
