// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use cartable_app::Role;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

const CONFIG_VERSION: i64 = 1;
const APP_NAME: &str = "cartable";
const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            session: SessionConfig::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub base_url: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SessionConfig {
    pub token: Option<String>,
    pub role: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub page_size: Option<i64>,
    pub show_dashboard: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            page_size: Some(DEFAULT_PAGE_SIZE),
            show_dashboard: Some(true),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("CARTABLE_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set CARTABLE_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and move values under [api], [session], and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.version != CONFIG_VERSION {
            bail!(
                "config {} has version {}; expected 1",
                path.display(),
                self.version
            );
        }

        if let Some(base_url) = &self.api.base_url {
            let parsed = Url::parse(base_url).with_context(|| {
                format!("api.base_url in {} is not a valid URL", path.display())
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!(
                    "api.base_url in {} must use http or https, got {}",
                    path.display(),
                    parsed.scheme()
                );
            }
        }

        if let Some(role) = &self.session.role
            && Role::parse(role).is_none()
        {
            bail!(
                "session.role in {} must be one of administrator, teacher, parent; got {role:?}",
                path.display()
            );
        }

        if let Some(page_size) = self.ui.page_size
            && page_size <= 0
        {
            bail!(
                "ui.page_size in {} must be positive, got {}",
                path.display(),
                page_size
            );
        }

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.api
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn token(&self) -> &str {
        self.session.token.as_deref().unwrap_or("")
    }

    pub fn role(&self) -> Role {
        self.session
            .role
            .as_deref()
            .and_then(Role::parse)
            .unwrap_or(Role::Administrator)
    }

    pub fn display_name(&self) -> &str {
        self.session.display_name.as_deref().unwrap_or("")
    }

    pub fn page_size(&self) -> usize {
        self.ui
            .page_size
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE) as usize
    }

    pub fn show_dashboard(&self) -> bool {
        self.ui.show_dashboard.unwrap_or(true)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# cartable config\n# Place this file at: {}\n\nversion = 1\n\n[api]\nbase_url = \"{}\"\n\n[session]\ntoken = \"paste-your-api-token-here\"\nrole = \"administrator\"\ndisplay_name = \"\"\n\n[ui]\npage_size = {}\nshow_dashboard = true\n",
            path.display(),
            DEFAULT_BASE_URL,
            DEFAULT_PAGE_SIZE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use anyhow::Result;
    use cartable_app::Role;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.role(), Role::Administrator);
        assert!(config.show_dashboard());
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[session]\ntoken = \"tok\"\n")?;
        let error = Config::load(&path).expect_err("unversioned schema should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[api], [session], and [ui]"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 3\n")?;
        let error = Config::load(&path).expect_err("v3 config should fail");
        assert!(error.to_string().contains("unsupported config version 3"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn full_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[api]\nbase_url = \"https://school.example/api/\"\n[session]\ntoken = \"tok-1\"\nrole = \"teacher\"\ndisplay_name = \"Paul Mercier\"\n[ui]\npage_size = 25\nshow_dashboard = false\n",
        )?;
        let config = Config::load(&path)?;
        assert_eq!(config.base_url(), "https://school.example/api");
        assert_eq!(config.token(), "tok-1");
        assert_eq!(config.role(), Role::Teacher);
        assert_eq!(config.display_name(), "Paul Mercier");
        assert_eq!(config.page_size(), 25);
        assert!(!config.show_dashboard());
        Ok(())
    }

    #[test]
    fn invalid_base_url_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api]\nbase_url = \"not a url\"\n")?;
        let error = Config::load(&path).expect_err("bad URL should fail");
        assert!(error.to_string().contains("api.base_url"));
        Ok(())
    }

    #[test]
    fn non_http_base_url_is_rejected() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[api]\nbase_url = \"ftp://school.example/api\"\n")?;
        let error = Config::load(&path).expect_err("ftp URL should fail");
        assert!(error.to_string().contains("http or https"));
        Ok(())
    }

    #[test]
    fn unknown_role_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[session]\nrole = \"principal\"\n")?;
        let error = Config::load(&path).expect_err("unknown role should fail");
        assert!(error.to_string().contains("session.role"));
        Ok(())
    }

    #[test]
    fn non_positive_page_size_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\npage_size = 0\n")?;
        let error = Config::load(&path).expect_err("zero page size should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("CARTABLE_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("CARTABLE_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("CARTABLE_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("config.toml"));
        Ok(())
    }

    #[test]
    fn example_config_includes_required_sections() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[api]"));
        assert!(example.contains("[session]"));
        assert!(example.contains("[ui]"));
        Ok(())
    }
}
