use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::{CovsanConfig, CONFIG_FILE_NAME};
use crate::errors::{Result, SanitizeError};

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

pub fn parse_config(contents: &str) -> Result<CovsanConfig> {
    toml::from_str::<CovsanConfig>(contents)
        .map_err(|e| SanitizeError::Configuration(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e)))
}

/// Load an explicitly named config file; unlike the search, failures are errors.
pub fn load_config_from(path: &Path) -> Result<CovsanConfig> {
    let contents = read_config_file(path)
        .map_err(|e| SanitizeError::file_system("Unable to read config file", path, e))?;
    parse_config(&contents)
}

fn try_load_config_from_path(config_path: &Path) -> Option<CovsanConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to read config file {}: {}", config_path.display(), e);
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!("{}. Using defaults.", e);
            None
        }
    }
}

pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for the first readable config file.
pub fn find_config(start: PathBuf) -> CovsanConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            CovsanConfig::default()
        })
}

pub fn load_config() -> CovsanConfig {
    match std::env::current_dir() {
        Ok(dir) => find_config(dir),
        Err(e) => {
            tracing::warn!("Failed to get current directory: {}. Using default config.", e);
            CovsanConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_ancestors_stops_at_depth() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b")
            ]
        );
    }

    #[test]
    fn test_find_config_in_parent_directory() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join(CONFIG_FILE_NAME), "filters = [\"MIXIN\"]\n").unwrap();
        let nested = root.path().join("module").join("target");
        fs::create_dir_all(&nested).unwrap();

        let config = find_config(nested);
        assert_eq!(config.filters, vec!["MIXIN".to_string()]);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join(CONFIG_FILE_NAME), "filters = 3\n").unwrap();

        assert_eq!(find_config(root.path().to_path_buf()), CovsanConfig::default());
    }

    #[test]
    fn test_explicit_config_errors_are_reported() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("absent.toml");
        assert!(matches!(
            load_config_from(&missing),
            Err(SanitizeError::FileSystem { .. })
        ));

        let broken = root.path().join("broken.toml");
        fs::write(&broken, "skip = \"maybe\"\n").unwrap();
        assert!(matches!(
            load_config_from(&broken),
            Err(SanitizeError::Configuration(_))
        ));
    }
}
