use anyhow::{Context, Result};
use marginalia_engine::{Annotation, AnnotationStore};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Default, Serialize, Deserialize)]
struct AnnotationsFile {
    #[serde(default, rename = "annotation")]
    annotations: Vec<Annotation>,
}

/// Read annotations from a TOML file. A missing file is an empty store.
pub fn load(path: &Path) -> Result<AnnotationStore> {
    if !path.exists() {
        return Ok(AnnotationStore::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read annotations from {}", path.display()))?;
    let file: AnnotationsFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse annotations in {}", path.display()))?;
    AnnotationStore::from_annotations(file.annotations)
        .with_context(|| format!("Invalid annotations in {}", path.display()))
}

pub fn save(path: &Path, store: &AnnotationStore) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = AnnotationsFile {
        annotations: store.as_slice().to_vec(),
    };
    let content = toml::to_string_pretty(&file)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write annotations to {}", path.display()))
}
