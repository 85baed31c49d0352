use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;

use crate::scoring::{Bid, CalculationResult, ScoringConfig};

pub const PROJECT_VERSION: u32 = 1;

/// A saved evaluation: the policy, the bids and what they scored.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProjectFile {
    pub version: u32,
    pub config: ScoringConfig,
    pub bidders: Vec<Bid>,
    pub result: CalculationResult,
}

impl ProjectFile {
    pub fn new(config: ScoringConfig, bidders: Vec<Bid>, result: CalculationResult) -> Self {
        Self {
            version: PROJECT_VERSION,
            config,
            bidders,
            result,
        }
    }
}

/// Load a project from a JSON file
///
/// If the file has an unsupported version, returns an error.
pub fn load_project(path: &Path) -> Result<ProjectFile> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open project file at {}", path.display()))?;

    let project: ProjectFile =
        serde_json::from_reader(file).context("Failed to load project file")?;

    if project.version != PROJECT_VERSION {
        anyhow::bail!("Unsupported project file version: {}", project.version);
    }

    Ok(project)
}

/// Save a project to a JSON file atomically
///
/// Uses atomic-write-file so the file is never left half written.
/// Creates the parent directory if it doesn't exist.
pub fn save_project(path: &Path, project: &ProjectFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory at {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, project).context("Failed to serialize project")?;

    file.commit().context("Failed to save project file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{evaluate, find_template};
    use std::env;

    fn sample_project() -> ProjectFile {
        let config = find_template("standard").unwrap().config();
        let bidders = vec![
            Bid::new("A", 100.0),
            Bid::new("B", 104.0),
            Bid::new("C", 97.0),
        ];
        let result = evaluate(&config, &bidders).unwrap();
        ProjectFile::new(config, bidders, result)
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("bid_scorer_test_project.json");
        let _ = fs::remove_file(&temp_path);

        let project = sample_project();
        save_project(&temp_path, &project).unwrap();
        let loaded = load_project(&temp_path).unwrap();
        assert_eq!(loaded, project);

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let temp_path = env::temp_dir().join("bid_scorer_test_project_version.json");
        let mut project = sample_project();
        project.version = 99;
        save_project(&temp_path, &project).unwrap();

        let err = load_project(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported project file version"));

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_path = env::temp_dir().join("bid_scorer_test_project_missing.json");
        let _ = fs::remove_file(&temp_path);
        assert!(load_project(&temp_path).is_err());
    }
}
