use serde::{Deserialize, Serialize};

use crate::{FilesError, FilesResult};

/// Kind of a node in the generated project tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Folder,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::File => "file",
            FileKind::Folder => "folder",
        }
    }
}

/// One node of the generated project tree.
///
/// `path` is the full slash-separated path from the project root; `name`
/// is the final component. Folders carry `children`, files carry
/// `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    pub kind: FileKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileNode>,
}

impl FileNode {
    fn file(name: &str, path: &str, content: String) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: FileKind::File,
            content: Some(content),
            children: Vec::new(),
        }
    }

    fn folder(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: FileKind::Folder,
            content: None,
            children: Vec::new(),
        }
    }
}

/// Ordered collection of generated project files.
///
/// Supplied by the generation pipeline and owned by it; the build
/// orchestrator only reads the set. Insertion order of top-level entries
/// is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSet {
    pub roots: Vec<FileNode>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the set contains no files at all. An empty set never
    /// starts a build cycle.
    pub fn is_empty(&self) -> bool {
        self.file_count() == 0
    }

    /// Number of files (not folders) in the whole tree.
    pub fn file_count(&self) -> usize {
        fn count(nodes: &[FileNode]) -> usize {
            nodes
                .iter()
                .map(|n| match n.kind {
                    FileKind::File => 1,
                    FileKind::Folder => count(&n.children),
                })
                .sum()
        }
        count(&self.roots)
    }

    /// Insert or replace a file at `path`, creating intermediate folders
    /// as needed. Paths are normalized to be relative (leading `/` and
    /// `./` stripped); `..` segments are rejected.
    pub fn insert_file(&mut self, path: &str, content: &str) -> FilesResult<()> {
        let normalized = normalize_path(path)?;
        let segments: Vec<&str> = normalized.split('/').collect();

        let mut nodes = &mut self.roots;
        let mut prefix = String::new();
        for (i, segment) in segments.iter().enumerate() {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            let last = i == segments.len() - 1;

            let position = nodes.iter().position(|n| n.name == *segment);
            if last {
                match position {
                    Some(idx) => {
                        let node = &mut nodes[idx];
                        if node.kind == FileKind::Folder {
                            return Err(FilesError::InvalidPath(format!(
                                "{} is a folder, cannot write file",
                                normalized
                            )));
                        }
                        node.content = Some(content.to_string());
                    }
                    None => nodes.push(FileNode::file(segment, &prefix, content.to_string())),
                }
            } else {
                let idx = match position {
                    Some(idx) if nodes[idx].kind == FileKind::Folder => idx,
                    Some(_) => {
                        return Err(FilesError::InvalidPath(format!(
                            "{} is a file, cannot descend into it",
                            prefix
                        )))
                    }
                    None => {
                        nodes.push(FileNode::folder(segment, &prefix));
                        nodes.len() - 1
                    }
                };
                nodes = &mut nodes[idx].children;
            }
        }
        Ok(())
    }

    /// Insert an (empty) folder at `path`, creating parents as needed.
    pub fn insert_folder(&mut self, path: &str) -> FilesResult<()> {
        let normalized = normalize_path(path)?;
        let segments: Vec<&str> = normalized.split('/').collect();

        let mut nodes = &mut self.roots;
        let mut prefix = String::new();
        for segment in segments {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);

            let idx = match nodes.iter().position(|n| n.name == segment) {
                Some(idx) if nodes[idx].kind == FileKind::Folder => idx,
                Some(_) => {
                    return Err(FilesError::InvalidPath(format!(
                        "{} is a file, cannot create folder",
                        prefix
                    )))
                }
                None => {
                    nodes.push(FileNode::folder(segment, &prefix));
                    nodes.len() - 1
                }
            };
            nodes = &mut nodes[idx].children;
        }
        Ok(())
    }

    /// Look up a file's content by path.
    pub fn file_content(&self, path: &str) -> Option<&str> {
        let normalized = normalize_path(path).ok()?;
        let mut nodes = &self.roots;
        let segments: Vec<&str> = normalized.split('/').collect();
        for (i, segment) in segments.iter().enumerate() {
            let node = nodes.iter().find(|n| n.name == *segment)?;
            if i == segments.len() - 1 {
                return node.content.as_deref();
            }
            nodes = &node.children;
        }
        None
    }

    /// Depth-first iteration over all files as `(path, content)` pairs,
    /// in tree order.
    pub fn files(&self) -> Vec<(&str, &str)> {
        fn walk<'a>(nodes: &'a [FileNode], out: &mut Vec<(&'a str, &'a str)>) {
            for node in nodes {
                match node.kind {
                    FileKind::File => {
                        if let Some(content) = &node.content {
                            out.push((node.path.as_str(), content.as_str()));
                        }
                    }
                    FileKind::Folder => walk(&node.children, out),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.roots, &mut out);
        out
    }
}

fn normalize_path(path: &str) -> FilesResult<String> {
    let trimmed = path
        .trim()
        .trim_start_matches("./")
        .trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(FilesError::InvalidPath(path.to_string()));
    }
    if trimmed.split('/').any(|seg| seg.is_empty() || seg == "..") {
        return Err(FilesError::InvalidPath(path.to_string()));
    }
    Ok(trimmed.to_string())
}
