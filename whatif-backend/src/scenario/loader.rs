//! Scenario Loader - extra scenario definitions from `.json5` files.
//!
//! Directories are scanned in priority order. A scenario defined in a later
//! directory replaces one with the same name from an earlier directory, and the
//! merged set is layered over the wired model's built-in catalog.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use whatif_shared::ScenarioDefinition;
use whatif_shared::scenario_file::parse_scenario_file;

/// System scenario directory (installed via package)
pub const SYSTEM_SCENARIO_DIR: &str = "/usr/share/whatif/scenarios";

/// User scenario directory, relative to the home directory
pub const USER_SCENARIO_DIR: &str = ".config/whatif/scenarios";

/// Scans directories for `.json5` scenario files
#[derive(Debug, Clone)]
pub struct ScenarioLoader {
    /// Directories to scan, later entries win
    directories: Vec<PathBuf>,
}

impl Default for ScenarioLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioLoader {
    /// Loader over the default directories, lowest priority first:
    /// `/usr/share/whatif/scenarios`, `~/.config/whatif/scenarios`, `./scenarios`.
    pub fn new() -> Self {
        let mut directories = vec![PathBuf::from(SYSTEM_SCENARIO_DIR)];

        if let Some(home) = dirs::home_dir() {
            directories.push(home.join(USER_SCENARIO_DIR));
        }

        directories.push(PathBuf::from("./scenarios"));

        Self { directories }
    }

    pub fn with_directories(directories: Vec<PathBuf>) -> Self {
        Self { directories }
    }

    /// Append directories with the highest priority
    pub fn add_directories(&mut self, dirs: impl IntoIterator<Item = PathBuf>) {
        self.directories.extend(dirs);
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Load every scenario from the configured directories, sorted by name.
    ///
    /// Unreadable directories and invalid files are logged and skipped.
    pub fn load_all(&self) -> Vec<ScenarioDefinition> {
        let mut scenarios: BTreeMap<String, ScenarioDefinition> = BTreeMap::new();

        for dir in &self.directories {
            if !dir.exists() {
                debug!("Scenario directory does not exist, skipping: {:?}", dir);
                continue;
            }

            match self.load_from_directory(dir) {
                Ok(loaded) => {
                    let count = loaded.len();
                    for scenario in loaded {
                        if scenarios.contains_key(&scenario.name) {
                            debug!(
                                "Scenario '{}' from {:?} overrides previous definition",
                                scenario.name, dir
                            );
                        }
                        scenarios.insert(scenario.name.clone(), scenario);
                    }
                    if count > 0 {
                        info!("Loaded {} scenario(s) from {:?}", count, dir);
                    }
                }
                Err(e) => warn!("Failed to load scenarios from {:?}: {}", dir, e),
            }
        }

        scenarios.into_values().collect()
    }

    fn load_from_directory(&self, dir: &Path) -> Result<Vec<ScenarioDefinition>> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {:?}", dir))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry =
                entry.with_context(|| format!("Failed to read directory entry in {:?}", dir))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json5") {
                paths.push(path);
            }
        }
        // Within one directory, the last file by name wins a duplicate
        paths.sort();

        let mut scenarios = Vec::new();
        for path in paths {
            match load_scenario_file(&path) {
                Ok(scenario) => scenarios.push(scenario),
                Err(e) => warn!("Failed to load scenario from {:?}: {:#}", path, e),
            }
        }

        Ok(scenarios)
    }
}

fn load_scenario_file(path: &Path) -> Result<ScenarioDefinition> {
    debug!("Loading scenario from {:?}", path);
    parse_scenario_file(path).with_context(|| format!("Failed to parse scenario file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scenario_source(name: &str, description: &str) -> String {
        format!(
            r#"{{
    // test scenario
    name: "{}",
    description: "{}",
    overrides: {{ rate: 6.0, }},
}}"#,
            name, description
        )
    }

    #[test]
    fn test_default_directories() {
        let loader = ScenarioLoader::new();
        assert_eq!(loader.directories()[0], PathBuf::from(SYSTEM_SCENARIO_DIR));
        assert_eq!(
            loader.directories().last(),
            Some(&PathBuf::from("./scenarios"))
        );
    }

    #[test]
    fn test_load_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("stress.json5"),
            scenario_source("stress", "Rates up"),
        )
        .unwrap();

        let loader = ScenarioLoader::with_directories(vec![temp_dir.path().to_path_buf()]);
        let scenarios = loader.load_all();

        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].name, "stress");
        assert_eq!(scenarios[0].overrides["rate"], 6.0);
        assert_eq!(scenarios[0].stress_rationale, "");
    }

    #[test]
    fn test_results_sorted_by_name() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.json5"), scenario_source("zeta", "")).unwrap();
        fs::write(temp_dir.path().join("b.json5"), scenario_source("alpha", "")).unwrap();

        let loader = ScenarioLoader::with_directories(vec![temp_dir.path().to_path_buf()]);
        let names: Vec<String> = loader.load_all().into_iter().map(|s| s.name).collect();

        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_later_directory_wins() {
        let dir1 = TempDir::new().unwrap();
        let dir2 = TempDir::new().unwrap();
        fs::write(
            dir1.path().join("s.json5"),
            scenario_source("same", "From dir 1"),
        )
        .unwrap();
        fs::write(
            dir2.path().join("s.json5"),
            scenario_source("same", "From dir 2"),
        )
        .unwrap();

        let loader = ScenarioLoader::with_directories(vec![
            dir1.path().to_path_buf(),
            dir2.path().to_path_buf(),
        ]);
        let scenarios = loader.load_all();

        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].description, "From dir 2");
    }

    #[test]
    fn test_skips_other_extensions_and_invalid_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("valid.json5"),
            scenario_source("valid", ""),
        )
        .unwrap();
        fs::write(temp_dir.path().join("readme.txt"), "not a scenario").unwrap();
        fs::write(temp_dir.path().join("broken.json5"), "{ name: }}}").unwrap();
        fs::write(temp_dir.path().join("blank.json5"), r#"{ name: "  " }"#).unwrap();

        let loader = ScenarioLoader::with_directories(vec![temp_dir.path().to_path_buf()]);
        let scenarios = loader.load_all();

        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].name, "valid");
    }

    #[test]
    fn test_nonexistent_directory() {
        let loader =
            ScenarioLoader::with_directories(vec![PathBuf::from("/nonexistent/whatif/dir")]);
        assert!(loader.load_all().is_empty());
    }

    #[test]
    fn test_add_directories() {
        let mut loader = ScenarioLoader::with_directories(vec![PathBuf::from("/dir1")]);
        loader.add_directories(vec![PathBuf::from("/dir2"), PathBuf::from("/dir3")]);

        assert_eq!(loader.directories().len(), 3);
        assert_eq!(loader.directories()[2], PathBuf::from("/dir3"));
    }
}
