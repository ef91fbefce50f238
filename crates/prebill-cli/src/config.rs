// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use prebill_app::{DEFAULT_PER_PAGE, FilterValues, SortColumn, SortDirection, SortSpec};
use prebill_tui::LandingOptions;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;
pub const CONFIG_PATH_ENV: &str = "PREBILL_CONFIG_PATH";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_FILE: &str = "prebill.log";
const NO_SORT: &str = "none";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            storage: Storage::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ui {
    pub page_size: Option<i64>,
    pub group_by_client: Option<bool>,
    pub default_sort: Option<String>,
    pub default_sort_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Storage {
    pub state_dir: Option<String>,
    pub data_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(prebill_store::APP_NAME);
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
                    "config file {} has no version. Add `version = 1` at the top and keep values under [ui], [storage], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Run `prebill --print-example-config` for the current layout",
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
        if let Some(page_size) = self.ui.page_size
            && page_size < 1
        {
            bail!(
                "ui.page_size in {} must be at least 1, got {}",
                path.display(),
                page_size
            );
        }

        if let Some(sort) = &self.ui.default_sort
            && sort != NO_SORT
            && SortColumn::parse(sort).is_none()
        {
            let known = SortColumn::ALL
                .iter()
                .map(|column| column.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            bail!(
                "ui.default_sort {sort:?} in {} is not a sortable column; use one of: {known}, {NO_SORT}",
                path.display()
            );
        }

        if let Some(direction) = &self.ui.default_sort_dir
            && SortDirection::parse(direction).is_none()
        {
            bail!(
                "ui.default_sort_dir {direction:?} in {} must be \"asc\" or \"desc\"",
                path.display()
            );
        }

        if let Some(level) = &self.log.level
            && level.trim().is_empty()
        {
            bail!(
                "log.level in {} is empty; remove it or use a filter like \"info\" or \"prebill=debug\"",
                path.display()
            );
        }

        Ok(())
    }

    pub fn page_size(&self) -> usize {
        self.ui
            .page_size
            .and_then(|size| usize::try_from(size).ok())
            .unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn group_by_client(&self) -> bool {
        self.ui.group_by_client.unwrap_or(true)
    }

    /// `None` keeps the loaded order.
    pub fn default_sort(&self) -> Option<SortSpec> {
        let column = match self.ui.default_sort.as_deref() {
            Some(NO_SORT) => return None,
            Some(raw) => SortColumn::parse(raw)?,
            None => SortColumn::CreatedAt,
        };
        let direction = self
            .ui
            .default_sort_dir
            .as_deref()
            .and_then(SortDirection::parse)
            .unwrap_or(SortDirection::Desc);
        Some(SortSpec { column, direction })
    }

    pub fn landing_options(&self) -> LandingOptions {
        let group_by_client = if self.group_by_client() {
            None
        } else {
            Some(false)
        };
        LandingOptions {
            per_page: self.page_size(),
            filters: FilterValues {
                group_by_client,
                ..FilterValues::default()
            },
            sort: self.default_sort(),
        }
    }

    pub fn state_dir(&self) -> Result<PathBuf> {
        match &self.storage.state_dir {
            Some(path) => Ok(PathBuf::from(path)),
            None => prebill_store::default_state_dir(),
        }
    }

    /// Invoice JSON to load instead of the bundled demo collection.
    pub fn data_path(&self) -> Option<PathBuf> {
        self.storage.data_path.as_ref().map(PathBuf::from)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Relative log paths land in the state dir.
    pub fn log_file(&self, state_dir: &Path) -> PathBuf {
        let file = self.log.file.as_deref().unwrap_or(DEFAULT_LOG_FILE);
        state_dir.join(file)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# prebill config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\npage_size = {}\ngroup_by_client = true\n# One of: client, billNum, createdAt, billDate, responsible, total, status, none\ndefault_sort = \"createdAt\"\ndefault_sort_dir = \"desc\"\n\n[storage]\n# Optional. Default is the platform data dir (for example ~/.local/share/prebill)\n# state_dir = \"/absolute/path/to/state\"\n# Optional. Default is the bundled demo invoices\n# data_path = \"/absolute/path/to/invoices.json\"\n\n[log]\n# Overridden by PREBILL_LOG\nlevel = \"{}\"\nfile = \"{}\"\n",
            path.display(),
            DEFAULT_PER_PAGE,
            DEFAULT_LOG_LEVEL,
            DEFAULT_LOG_FILE,
        )
    }
}
