// ABOUTME: Base project templates seeded before plan generation
// ABOUTME: Shipped as artifact markup so they flow through the same parser as model output

use serde::{Deserialize, Serialize};

use webforge_files::{apply_steps, parse_artifact, FileSet};

/// Which starter project the template decision selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    React,
    Node,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::React => "react",
            TemplateKind::Node => "node",
        }
    }

    /// The template's artifact markup, in the same format as model
    /// output.
    pub fn markup(&self) -> &'static str {
        match self {
            TemplateKind::React => REACT_TEMPLATE,
            TemplateKind::Node => NODE_TEMPLATE,
        }
    }

    /// The template materialized into a file set.
    pub fn base_file_set(&self) -> FileSet {
        let mut steps = parse_artifact(self.markup()).expect("template markup is valid");
        let mut files = FileSet::new();
        apply_steps(&mut files, &mut steps);
        files
    }
}

const REACT_TEMPLATE: &str = r#"<forgeArtifact id="react-starter" title="React + Vite Starter">
<forgeAction type="file" filePath="package.json">
{
  "name": "webforge-react-app",
  "private": true,
  "version": "0.0.0",
  "type": "module",
  "scripts": {
    "dev": "vite",
    "build": "vite build",
    "preview": "vite preview"
  },
  "dependencies": {
    "react": "^18.3.1",
    "react-dom": "^18.3.1"
  },
  "devDependencies": {
    "@vitejs/plugin-react": "^4.3.1",
    "vite": "^5.4.2"
  }
}
</forgeAction>
<forgeAction type="file" filePath="vite.config.js">
import { defineConfig } from 'vite';
import react from '@vitejs/plugin-react';

export default defineConfig({
  plugins: [react()],
});
</forgeAction>
<forgeAction type="file" filePath="index.html">
<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Webforge App</title>
  </head>
  <body>
    <div id="root"></div>
    <script type="module" src="/src/main.jsx"></script>
  </body>
</html>
</forgeAction>
<forgeAction type="file" filePath="src/main.jsx">
import React from 'react';
import { createRoot } from 'react-dom/client';
import App from './App.jsx';
import './index.css';

createRoot(document.getElementById('root')).render(
  <React.StrictMode>
    <App />
  </React.StrictMode>
);
</forgeAction>
<forgeAction type="file" filePath="src/App.jsx">
function App() {
  return (
    <main>
      <h1>Webforge starter</h1>
      <p>Describe your site and watch it take shape.</p>
    </main>
  );
}

export default App;
</forgeAction>
<forgeAction type="file" filePath="src/index.css">
:root {
  font-family: system-ui, sans-serif;
  color-scheme: light dark;
}

body {
  margin: 0;
  display: grid;
  place-items: center;
  min-height: 100vh;
}
</forgeAction>
<forgeAction type="shell">
npm install && npm run dev
</forgeAction>
</forgeArtifact>"#;

const NODE_TEMPLATE: &str = r#"<forgeArtifact id="node-starter" title="Node Starter">
<forgeAction type="file" filePath="package.json">
{
  "name": "webforge-node-app",
  "private": true,
  "version": "0.0.0",
  "type": "module",
  "scripts": {
    "dev": "node index.js"
  }
}
</forgeAction>
<forgeAction type="file" filePath="index.js">
import { createServer } from 'node:http';

const port = process.env.PORT || 3000;

const server = createServer((req, res) => {
  res.writeHead(200, { 'Content-Type': 'text/html' });
  res.end('<h1>Webforge node starter</h1>');
});

server.listen(port, () => {
  console.log(`Running at http://localhost:${port}`);
});
</forgeAction>
<forgeAction type="shell">
npm install && npm run dev
</forgeAction>
</forgeArtifact>"#;
