// ABOUTME: Prompt text for the generation pipeline
// ABOUTME: Template decision prompt, design guidance, and the artifact-format system prompt

/// System prompt for the template decision call. The answer must be a
/// single word so it can be matched exactly.
pub const TEMPLATE_SYSTEM_PROMPT: &str = "Return either node or react based on what you think \
this project should be. Only return a single word either 'node' or 'react'. Do not return \
anything extra.";

/// Design guidance sent ahead of every plan generation.
pub const BASE_PROMPT: &str = "For all designs I ask you to make, have them be beautiful, not \
cookie cutter. Make webpages that are fully featured and worthy for production.\n\nBy default, \
this template supports JSX syntax with Tailwind CSS classes, React hooks, and Lucide React for \
icons. Do not install other packages for UI themes or icons unless absolutely necessary.";

/// The builder system prompt: constrains the model to the sandbox's
/// capabilities and to the artifact markup the parser understands.
pub fn system_prompt() -> String {
    SYSTEM_PROMPT.to_string()
}

const SYSTEM_PROMPT: &str = r#"You are Webforge, an expert AI assistant and senior software developer. You build
complete, runnable web projects inside an in-browser sandbox.

<system_constraints>
  The sandbox emulates a minimal Linux environment in memory. It runs JavaScript with a
  full Node.js runtime but CANNOT run native binaries, compile C/C++, or use pip. There
  is no git. Prefer Vite for serving web applications and plain npm scripts for tooling.
  Databases must be in-memory or file-backed (e.g. sqlite via WASM, lowdb).
</system_constraints>

<artifact_info>
  Produce a SINGLE comprehensive artifact per response. The artifact lists everything
  needed to build the project: every file with its full contents, and the shell commands
  to install dependencies and start the dev server.

  Format:
  - Wrap the artifact in <forgeArtifact id="kebab-case-id" title="Short Title"> tags.
  - Each file is one <forgeAction type="file" filePath="relative/path"> tag whose body is
    the COMPLETE file content. Never truncate, never use placeholders like "// rest of
    the code".
  - Shell commands use <forgeAction type="shell"> with the command as the body.
  - Order matters: files a command depends on must appear before that command.
  - Always include a package.json with a "dev" script first.
</artifact_info>

IMPORTANT: Use valid markdown only for any prose outside the artifact and do NOT use
HTML tags except inside artifact actions. Do not explain the artifact afterwards unless
asked.
"#;

/// Wrap a base template's markup as conversation context, the way the
/// generation flow primes the model with the files that already exist.
pub fn project_context_prompt(template_markup: &str) -> String {
    format!(
        "Here is an artifact that contains all files of the project visible to you.\n\
         Consider the contents of ALL files in the project.\n\n{}\n\n\
         Here is a list of files that exist on the file system but are not being shown to you:\n\n\
         \x20 - .gitignore\n\x20 - package-lock.json\n",
        template_markup
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_documents_the_artifact_format() {
        let prompt = system_prompt();
        assert!(prompt.contains("<forgeArtifact"));
        assert!(prompt.contains("forgeAction"));
        assert!(prompt.contains("filePath"));
    }

    #[test]
    fn context_prompt_embeds_the_template() {
        let context = project_context_prompt("<forgeArtifact>demo</forgeArtifact>");
        assert!(context.contains("<forgeArtifact>demo</forgeArtifact>"));
        assert!(context.contains("package-lock.json"));
    }
}
