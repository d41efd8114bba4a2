// ABOUTME: Plan acquisition for the CLI
// ABOUTME: Resolves a file set from a plan file or from the generation API

use anyhow::{bail, Context, Result};
use tracing::info;

use webforge_ai::{prompts, ChatMessage, GenerationService, TemplateKind};
use webforge_files::{apply_steps, parse_artifact, FileSet, Step};

use crate::Args;

fn template_override(args: &Args) -> Result<Option<TemplateKind>> {
    match args.template.as_deref() {
        None => Ok(None),
        Some("react") => Ok(Some(TemplateKind::React)),
        Some("node") => Ok(Some(TemplateKind::Node)),
        Some(other) => bail!("unknown template '{}', expected react or node", other),
    }
}

/// Turn the CLI arguments into a mounted-ready file set plus the step
/// plan that produced it.
///
/// With `--plan` the artifact markup is read from disk and no API call
/// is made; otherwise the prompt goes through template selection and
/// plan generation.
pub async fn resolve_plan(args: &Args) -> Result<(FileSet, Vec<Step>)> {
    let template = template_override(args)?;

    if let Some(path) = &args.plan {
        let markup = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read plan file {}", path.display()))?;
        let mut steps = parse_artifact(&markup)?;
        let mut files = template.map(|t| t.base_file_set()).unwrap_or_default();
        let applied = apply_steps(&mut files, &mut steps);
        info!("Applied {} steps from {}", applied, path.display());
        return Ok((files, steps));
    }

    let prompt = args
        .prompt
        .clone()
        .context("a prompt is required unless --plan is given")?;

    let service = GenerationService::from_env()?;
    let template = match template {
        Some(kind) => kind,
        None => service.pick_template(&prompt).await?,
    };
    info!("Selected {} template", template.as_str());

    let messages = vec![
        ChatMessage::user(prompts::BASE_PROMPT),
        ChatMessage::user(prompts::project_context_prompt(template.markup())),
        ChatMessage::user(prompt),
    ];
    let plan = service.generate_plan(&messages).await?;

    let mut steps = parse_artifact(&plan.markup)?;
    let mut files = template.base_file_set();
    let applied = apply_steps(&mut files, &mut steps);
    info!(
        "Applied {} generated steps on top of the {} template",
        applied,
        template.as_str()
    );

    Ok((files, steps))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with_template(template: Option<&str>) -> Args {
        use clap::Parser;
        let mut argv = vec!["webforge".to_string(), "a site".to_string()];
        if let Some(t) = template {
            argv.push("--template".to_string());
            argv.push(t.to_string());
        }
        Args::parse_from(argv)
    }

    #[test]
    fn template_override_accepts_known_kinds() {
        assert_eq!(
            template_override(&args_with_template(Some("react"))).unwrap(),
            Some(TemplateKind::React)
        );
        assert_eq!(
            template_override(&args_with_template(Some("node"))).unwrap(),
            Some(TemplateKind::Node)
        );
        assert_eq!(template_override(&args_with_template(None)).unwrap(), None);
    }

    #[test]
    fn template_override_rejects_unknown_kinds() {
        assert!(template_override(&args_with_template(Some("svelte"))).is_err());
    }
}
