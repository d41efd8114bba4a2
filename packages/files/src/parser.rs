//! Artifact markup parser.
//!
//! The generation model answers with an artifact block containing file
//! and shell actions:
//!
//! ```text
//! <forgeArtifact id="todo-app" title="Todo App">
//!   <forgeAction type="file" filePath="package.json">{ ... }</forgeAction>
//!   <forgeAction type="shell">npm install</forgeAction>
//! </forgeArtifact>
//! ```
//!
//! Parsing is deliberately tolerant: attribute order is free, unknown
//! action types are skipped with a warning, and text outside the
//! artifact block is ignored. Only a truncated (unterminated) action is
//! an error, since silently dropping file content would corrupt a plan.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::plan::{Step, StepKind, StepStatus};
use crate::{FilesError, FilesResult};

static ACTION_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<forgeAction\b([^>]*)>").unwrap());
static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([a-zA-Z][a-zA-Z0-9_-]*)\s*=\s*"([^"]*)""#).unwrap());

const ACTION_CLOSE: &str = "</forgeAction>";

/// Parse artifact markup into an ordered step plan.
///
/// Returns [`FilesError::EmptyArtifact`] when the text contains no
/// actions at all, and [`FilesError::UnterminatedAction`] when an action
/// block is never closed.
pub fn parse_artifact(markup: &str) -> FilesResult<Vec<Step>> {
    let mut steps = Vec::new();
    let mut next_id: u32 = 1;

    for open in ACTION_OPEN.captures_iter(markup) {
        let tag = open.get(0).expect("capture 0 always present");
        let attrs = parse_attributes(open.get(1).map(|m| m.as_str()).unwrap_or(""));

        let body_start = tag.end();
        let body_end = markup[body_start..]
            .find(ACTION_CLOSE)
            .map(|rel| body_start + rel)
            .ok_or(FilesError::UnterminatedAction(tag.start()))?;
        let content = trim_block(&markup[body_start..body_end]);

        let action_type = attrs
            .iter()
            .find(|(k, _)| k == "type")
            .map(|(_, v)| v.as_str())
            .unwrap_or("");

        match action_type {
            "file" => {
                let Some((_, path)) = attrs.iter().find(|(k, _)| k == "filePath") else {
                    warn!("file action without filePath attribute, skipping");
                    continue;
                };
                steps.push(Step {
                    id: next_id,
                    title: format!("Create {}", path),
                    description: String::new(),
                    kind: StepKind::CreateFile,
                    path: Some(path.clone()),
                    content: Some(content),
                    status: StepStatus::Pending,
                });
                next_id += 1;
            }
            "folder" => {
                let Some((_, path)) = attrs.iter().find(|(k, _)| k == "filePath") else {
                    warn!("folder action without filePath attribute, skipping");
                    continue;
                };
                steps.push(Step {
                    id: next_id,
                    title: format!("Create {}", path),
                    description: String::new(),
                    kind: StepKind::CreateFolder,
                    path: Some(path.clone()),
                    content: None,
                    status: StepStatus::Pending,
                });
                next_id += 1;
            }
            "shell" => {
                steps.push(Step {
                    id: next_id,
                    title: "Run command".to_string(),
                    description: content.clone(),
                    kind: StepKind::RunScript,
                    path: None,
                    content: Some(content),
                    status: StepStatus::Pending,
                });
                next_id += 1;
            }
            other => {
                warn!("Unknown action type '{}', skipping", other);
            }
        }
    }

    if steps.is_empty() {
        return Err(FilesError::EmptyArtifact);
    }

    debug!("Parsed {} steps from artifact markup", steps.len());
    Ok(steps)
}

fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    ATTRIBUTE
        .captures_iter(raw)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

/// Strip the single newline that follows the opening tag and trailing
/// indentation before the closing tag, leaving inner content untouched.
fn trim_block(raw: &str) -> String {
    let without_lead = raw.strip_prefix('\n').unwrap_or(raw);
    let trimmed_end = without_lead.trim_end_matches([' ', '\t']);
    trimmed_end
        .strip_suffix('\n')
        .unwrap_or(trimmed_end)
        .to_string()
}
