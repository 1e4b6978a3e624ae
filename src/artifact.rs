use std::path::PathBuf;
use std::fs;
use std::io::Write;
use std::sync::Arc;
use std::collections::HashMap;

use anyhow::{Result, Context};
use log::info;
use serde::{Serialize, Deserialize};
use tokio::sync::RwLock;

use crate::params::Language;

/// A generated program written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub name: String,
    pub language: Language,
    pub path: PathBuf,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: String,
    pub artifacts: Vec<Artifact>,
}

/// Writes generated programs into the artifact directory and keeps a manifest
pub struct ArtifactManager {
    artifact_dir: PathBuf,
    write_manifest: bool,
    artifacts: Arc<RwLock<Vec<Artifact>>>,
}

impl ArtifactManager {
    pub fn new(artifact_dir: PathBuf, write_manifest: bool) -> Result<Self> {
        fs::create_dir_all(&artifact_dir)
            .with_context(|| format!("Failed to create artifact directory: {}", artifact_dir.display()))?;

        Ok(Self {
            artifact_dir,
            write_manifest,
            artifacts: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Initialize the artifact manager by loading existing artifacts
    pub async fn init(&self) -> Result<()> {
        let manifest = self.load_manifest()?;
        let mut artifacts = self.artifacts.write().await;
        *artifacts = manifest.artifacts;
        Ok(())
    }

    /// Write `content` as `<name>.<ext>` and record it. A file with the same
    /// name is replaced, along with its manifest entry.
    pub async fn create_artifact(
        &self,
        name: &str,
        language: Language,
        content: &str,
        metadata: HashMap<String, String>,
    ) -> Result<Artifact> {
        let filename = format!("{}.{}", name, language.extension());
        let path = self.artifact_dir.join(&filename);

        let mut file = fs::File::create(&path)
            .with_context(|| format!("Failed to create artifact file: {}", path.display()))?;
        file.write_all(content.as_bytes())
            .context("Failed to write artifact content")?;

        let artifact = Artifact {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            language,
            path: path.clone(),
            created_at: chrono::Utc::now(),
            metadata,
        };

        {
            let mut artifacts = self.artifacts.write().await;
            artifacts.retain(|a| a.path != path);
            artifacts.push(artifact.clone());
        }

        if self.write_manifest {
            self.save_manifest().await?;
        }

        info!("Wrote {}", path.display());
        Ok(artifact)
    }

    /// List all artifacts
    pub async fn list_artifacts(&self) -> Vec<Artifact> {
        let artifacts = self.artifacts.read().await;
        artifacts.clone()
    }

    fn manifest_path(&self) -> PathBuf {
        self.artifact_dir.join("manifest.json")
    }

    /// Save manifest to disk
    async fn save_manifest(&self) -> Result<()> {
        let artifacts = self.artifacts.read().await;
        let manifest = ArtifactManifest {
            version: "1.0".to_string(),
            artifacts: artifacts.clone(),
        };

        let json = serde_json::to_string_pretty(&manifest)
            .context("Failed to serialize manifest")?;

        fs::write(self.manifest_path(), json)
            .context("Failed to write manifest")?;

        Ok(())
    }

    /// Load manifest from disk
    fn load_manifest(&self) -> Result<ArtifactManifest> {
        let manifest_path = self.manifest_path();

        if !manifest_path.exists() {
            return Ok(ArtifactManifest {
                version: "1.0".to_string(),
                artifacts: Vec::new(),
            });
        }

        let json = fs::read_to_string(manifest_path)
            .context("Failed to read manifest")?;

        serde_json::from_str(&json).context("Failed to parse manifest")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_artifact_uses_language_extension() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ArtifactManager::new(dir.path().to_path_buf(), true).unwrap();

        let artifact = manager
            .create_artifact("openai_assistant", Language::Php, "<?php\n", HashMap::new())
            .await
            .unwrap();

        assert_eq!(artifact.path, dir.path().join("openai_assistant.php"));
        assert_eq!(fs::read_to_string(&artifact.path).unwrap(), "<?php\n");
        assert!(dir.path().join("manifest.json").exists());
    }

    #[tokio::test]
    async fn test_same_name_replaces_entry() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ArtifactManager::new(dir.path().to_path_buf(), true).unwrap();

        manager.create_artifact("bot", Language::Python, "print(1)\n", HashMap::new()).await.unwrap();
        manager.create_artifact("bot", Language::Python, "print(2)\n", HashMap::new()).await.unwrap();
        manager.create_artifact("bot", Language::JavaScript, "1;\n", HashMap::new()).await.unwrap();

        let artifacts = manager.list_artifacts().await;
        assert_eq!(artifacts.len(), 2);
        assert_eq!(fs::read_to_string(dir.path().join("bot.py")).unwrap(), "print(2)\n");
    }

    #[tokio::test]
    async fn test_init_reloads_manifest() {
        let dir = tempfile::tempdir().unwrap();
        {
            let manager = ArtifactManager::new(dir.path().to_path_buf(), true).unwrap();
            let metadata = HashMap::from([("api".to_string(), "gemini".to_string())]);
            manager.create_artifact("bot", Language::Python, "pass\n", metadata).await.unwrap();
        }

        let manager = ArtifactManager::new(dir.path().to_path_buf(), true).unwrap();
        manager.init().await.unwrap();
        let artifacts = manager.list_artifacts().await;
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].metadata.get("api").map(String::as_str), Some("gemini"));
        assert_eq!(artifacts[0].language, Language::Python);
    }

    #[tokio::test]
    async fn test_manifest_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ArtifactManager::new(dir.path().to_path_buf(), false).unwrap();
        manager.create_artifact("bot", Language::Python, "pass\n", HashMap::new()).await.unwrap();
        assert!(!dir.path().join("manifest.json").exists());
    }
}
