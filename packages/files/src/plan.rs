use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::tree::FileSet;

/// What a build step does when applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    CreateFile,
    CreateFolder,
    RunScript,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::CreateFile => "create-file",
            StepKind::CreateFolder => "create-folder",
            StepKind::RunScript => "run-script",
        }
    }
}

/// Lifecycle of a single step in the plan view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
}

/// One step of a generated build plan.
///
/// Steps come out of the artifact parser in response order and are
/// applied to a [`FileSet`] before a build cycle starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: StepKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub status: StepStatus,
}

/// Apply all pending file and folder steps to `files`, marking each
/// applied step completed. Script steps are left for the build cycle.
///
/// Steps with unusable paths are skipped with a warning rather than
/// failing the whole plan; model output is not trusted to be well formed.
pub fn apply_steps(files: &mut FileSet, steps: &mut [Step]) -> usize {
    let mut applied = 0;
    for step in steps.iter_mut() {
        if step.status != StepStatus::Pending {
            continue;
        }
        let outcome = match (step.kind, step.path.as_deref()) {
            (StepKind::CreateFile, Some(path)) => {
                files.insert_file(path, step.content.as_deref().unwrap_or_default())
            }
            (StepKind::CreateFolder, Some(path)) => files.insert_folder(path),
            (StepKind::RunScript, _) => continue,
            (_, None) => {
                warn!("Step {} ({}) has no path, skipping", step.id, step.title);
                continue;
            }
        };
        match outcome {
            Ok(()) => {
                step.status = StepStatus::Completed;
                applied += 1;
            }
            Err(e) => warn!("Skipping step {} ({}): {}", step.id, step.title, e),
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_step(id: u32, path: &str, content: &str) -> Step {
        Step {
            id,
            title: format!("Create {}", path),
            description: String::new(),
            kind: StepKind::CreateFile,
            path: Some(path.to_string()),
            content: Some(content.to_string()),
            status: StepStatus::Pending,
        }
    }

    #[test]
    fn apply_marks_steps_completed() {
        let mut files = FileSet::new();
        let mut steps = vec![
            file_step(1, "package.json", "{}"),
            file_step(2, "src/index.ts", "console.log(1)"),
        ];

        let applied = apply_steps(&mut files, &mut steps);

        assert_eq!(applied, 2);
        assert!(steps.iter().all(|s| s.status == StepStatus::Completed));
        assert_eq!(files.file_count(), 2);
    }

    #[test]
    fn apply_skips_completed_and_script_steps() {
        let mut files = FileSet::new();
        let mut steps = vec![
            Step {
                status: StepStatus::Completed,
                ..file_step(1, "a.txt", "old")
            },
            Step {
                id: 2,
                title: "Run command".to_string(),
                description: String::new(),
                kind: StepKind::RunScript,
                path: None,
                content: Some("npm install".to_string()),
                status: StepStatus::Pending,
            },
        ];

        let applied = apply_steps(&mut files, &mut steps);

        assert_eq!(applied, 0);
        assert!(files.is_empty());
        assert_eq!(steps[1].status, StepStatus::Pending);
    }

    #[test]
    fn apply_tolerates_bad_paths() {
        let mut files = FileSet::new();
        let mut steps = vec![
            file_step(1, "../escape.txt", "x"),
            file_step(2, "ok.txt", "y"),
        ];

        let applied = apply_steps(&mut files, &mut steps);

        assert_eq!(applied, 1);
        assert_eq!(steps[0].status, StepStatus::Pending);
        assert_eq!(steps[1].status, StepStatus::Completed);
        assert_eq!(files.file_content("ok.txt"), Some("y"));
    }
}
