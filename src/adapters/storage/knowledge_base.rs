//! Knowledge base loader.
//!
//! Concatenates the markdown files of a directory tree into extra guidance
//! for the script prompt. Files named `README.md` are skipped. A file's
//! category is the name of the directory that directly contains it;
//! top-level files are "general".

use std::path::{Path, PathBuf};

use tokio::fs;

const HEADER: &str = "## EXPERT KNOWLEDGE BASE\n\n\
Guidance from experienced meditation teachers. Use it as the main source of techniques and inspiration:";

#[derive(Debug, Clone, PartialEq, Eq)]
struct KnowledgeFile {
    category: String,
    name: String,
    content: String,
}

/// Loads the knowledge directory into one guidance block.
///
/// A missing directory yields an empty string.
pub async fn load_knowledge_base(dir: &Path) -> std::io::Result<String> {
    if fs::metadata(dir).await.is_err() {
        tracing::info!(dir = %dir.display(), "No knowledge directory; using built-in guidance only");
        return Ok(String::new());
    }

    let mut files = Vec::new();
    collect(dir.to_path_buf(), None, &mut files).await?;
    files.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));

    if files.is_empty() {
        return Ok(String::new());
    }

    tracing::info!(files = files.len(), "Loaded knowledge base");
    let sections: Vec<String> = files
        .iter()
        .map(|f| format!("### {}: {}\n\n{}", f.category.to_uppercase(), f.name, f.content.trim()))
        .collect();
    Ok(format!("{}\n\n{}", HEADER, sections.join("\n\n---\n\n")))
}

async fn collect(
    dir: PathBuf,
    category: Option<String>,
    files: &mut Vec<KnowledgeFile>,
) -> std::io::Result<()> {
    let mut pending = vec![(dir, category)];

    while let Some((dir, category)) = pending.pop() {
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            if entry.file_type().await?.is_dir() {
                pending.push((path, Some(name)));
            } else if name.ends_with(".md") && name != "README.md" {
                files.push(KnowledgeFile {
                    category: category.clone().unwrap_or_else(|| "general".to_string()),
                    name: name.trim_end_matches(".md").to_string(),
                    content: fs::read_to_string(&path).await?,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let text = load_knowledge_base(&dir.path().join("nope")).await.unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn collects_markdown_by_category_and_skips_readme() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("README.md"), "ignored").unwrap();
        std::fs::write(dir.path().join("breathing.md"), "Box breathing.").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir_all(dir.path().join("sleep/deep")).unwrap();
        std::fs::write(dir.path().join("sleep/body-scan.md"), "Scan slowly.").unwrap();
        std::fs::write(dir.path().join("sleep/deep/yoga-nidra.md"), "Rest.").unwrap();

        let text = load_knowledge_base(dir.path()).await.unwrap();

        assert!(text.starts_with("## EXPERT KNOWLEDGE BASE"));
        assert!(text.contains("### GENERAL: breathing\n\nBox breathing."));
        assert!(text.contains("### SLEEP: body-scan"));
        assert!(text.contains("### DEEP: yoga-nidra"));
        assert!(!text.contains("### SLEEP: yoga-nidra"));
        assert!(!text.contains("ignored"));
    }

    #[tokio::test]
    async fn empty_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(load_knowledge_base(dir.path()).await.unwrap().is_empty());
    }
}
