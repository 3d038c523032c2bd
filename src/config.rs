use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub github: GitHubConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    pub owner: String,
    pub repo: String,
    pub token: Option<String>,
    /// Base URL of the REST API, for GitHub Enterprise. Defaults to api.github.com.
    pub api_url: Option<String>,
}

fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tickets")
}

pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path(), std::env::var(TOKEN_ENV).ok())
}

/// Reads `path` and applies the token from the environment, which wins over
/// the one in the file.
pub fn load_config_from(path: &Path, env_token: Option<String>) -> Result<AppConfig> {
    if !path.exists() {
        bail!(
            "No config found at {}. Create it with a [github] section (owner, repo, token)",
            path.display()
        );
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let mut config: AppConfig =
        toml::from_str(&contents).with_context(|| "Failed to parse config.toml")?;

    if let Some(token) = env_token.filter(|t| !t.trim().is_empty()) {
        config.github.token = Some(token);
    }
    if config.github.owner.is_empty() || config.github.repo.is_empty() {
        bail!("github.owner and github.repo must not be empty");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_github_section() {
        let file = write_config(
            r#"
            [github]
            owner = "acme"
            repo = "support"
            token = "from-file"
            "#,
        );
        let config = load_config_from(file.path(), None).unwrap();
        assert_eq!(config.github.owner, "acme");
        assert_eq!(config.github.repo, "support");
        assert_eq!(config.github.token.as_deref(), Some("from-file"));
        assert_eq!(config.github.api_url, None);
    }

    #[test]
    fn env_token_overrides_file() {
        let file = write_config(
            r#"
            [github]
            owner = "acme"
            repo = "support"
            token = "from-file"
            "#,
        );
        let config = load_config_from(file.path(), Some("from-env".into())).unwrap();
        assert_eq!(config.github.token.as_deref(), Some("from-env"));
    }

    #[test]
    fn blank_env_token_is_ignored() {
        let file = write_config(
            r#"
            [github]
            owner = "acme"
            repo = "support"
            "#,
        );
        let config = load_config_from(file.path(), Some(" ".into())).unwrap();
        assert_eq!(config.github.token, None);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(&dir.path().join("config.toml"), None).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }

    #[test]
    fn missing_repo_is_an_error() {
        let file = write_config("[github]\nowner = \"acme\"\n");
        assert!(load_config_from(file.path(), None).is_err());
    }

    #[test]
    fn empty_owner_is_an_error() {
        let file = write_config("[github]\nowner = \"\"\nrepo = \"r\"\n");
        let err = load_config_from(file.path(), None).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }
}
