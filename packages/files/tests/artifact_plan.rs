// ABOUTME: Integration tests for the artifact markup -> step plan -> file tree flow
// ABOUTME: Exercises the same path the CLI takes when materializing a model response

use pretty_assertions::assert_eq;
use webforge_files::{apply_steps, parse_artifact, FileSet, StepKind, StepStatus};

const RESPONSE: &str = r#"I'll create a small Vite project for you.

<forgeArtifact id="vite-starter" title="Vite Starter">
<forgeAction type="file" filePath="package.json">
{
  "name": "vite-starter",
  "scripts": { "dev": "vite" },
  "devDependencies": { "vite": "^5.0.0" }
}
</forgeAction>
<forgeAction type="file" filePath="index.html">
<!doctype html>
<html><body><div id="app"></div><script type="module" src="/src/main.js"></script></body></html>
</forgeAction>
<forgeAction type="file" filePath="src/main.js">
document.querySelector('#app').textContent = 'hello';
</forgeAction>
<forgeAction type="shell">
npm install && npm run dev
</forgeAction>
</forgeArtifact>

Run the dev server to preview it."#;

#[test]
fn full_response_becomes_a_mounted_file_tree() {
    let mut steps = parse_artifact(RESPONSE).unwrap();
    assert_eq!(steps.len(), 4);

    let mut files = FileSet::new();
    let applied = apply_steps(&mut files, &mut steps);

    // Three file steps applied; the shell step stays for the build cycle.
    assert_eq!(applied, 3);
    assert_eq!(files.file_count(), 3);
    assert_eq!(steps[3].kind, StepKind::RunScript);
    assert_eq!(steps[3].status, StepStatus::Pending);

    let package = files.file_content("package.json").unwrap();
    assert!(package.contains(r#""dev": "vite""#));

    // Nested path created its folder.
    assert!(files
        .file_content("src/main.js")
        .unwrap()
        .contains("hello"));
}

#[test]
fn reapplying_a_new_plan_overwrites_files_in_place() {
    let mut steps = parse_artifact(RESPONSE).unwrap();
    let mut files = FileSet::new();
    apply_steps(&mut files, &mut steps);

    let update = r#"<forgeAction type="file" filePath="src/main.js">
document.querySelector('#app').textContent = 'updated';
</forgeAction>"#;
    let mut update_steps = parse_artifact(update).unwrap();
    let applied = apply_steps(&mut files, &mut update_steps);

    assert_eq!(applied, 1);
    assert_eq!(files.file_count(), 3);
    assert!(files
        .file_content("src/main.js")
        .unwrap()
        .contains("updated"));
}
