// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static CONFIG: OnceLock<NovaSetConfig> = OnceLock::new();

fn default_log_level() -> String {
    "info".to_string()
}

pub fn init_from_path(path: impl AsRef<Path>) -> Result<&'static NovaSetConfig> {
    if let Some(cfg) = CONFIG.get() {
        return Ok(cfg);
    }
    let path = path.as_ref().to_path_buf();
    let cfg = NovaSetConfig::load_from_file(&path)?;
    Ok(CONFIG.get_or_init(|| cfg))
}

/// Loads `$NOVASET_CONFIG` or `./novaset.toml`. When neither is present the
/// built-in defaults are installed, so kernels never fail on a missing file.
pub fn init_from_env_or_default() -> Result<&'static NovaSetConfig> {
    if let Some(cfg) = CONFIG.get() {
        return Ok(cfg);
    }
    let cfg = match config_path_from_env_or_default() {
        Some(path) => NovaSetConfig::load_from_file(&path)?,
        None => NovaSetConfig::default(),
    };
    Ok(CONFIG.get_or_init(|| cfg))
}

pub fn config() -> Result<&'static NovaSetConfig> {
    init_from_env_or_default()
}

fn config_path_from_env_or_default() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("NOVASET_CONFIG")
        && !p.trim().is_empty()
    {
        return Some(PathBuf::from(p.trim()));
    }

    let candidates = [PathBuf::from("novaset.toml")];
    candidates.into_iter().find(|p| p.exists())
}

#[derive(Clone, Debug, Deserialize)]
pub struct NovaSetConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional full tracing EnvFilter expression.
    /// If set, this takes precedence over `log_level`.
    /// Example: "novaset=debug"
    #[serde(default)]
    pub log_filter: Option<String>,

    #[serde(default)]
    pub set_ops: SetOpsConfig,
}

impl NovaSetConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config file: {}", path.display()))?;
        Self::parse(&s).with_context(|| format!("parse toml: {}", path.display()))
    }

    pub fn parse(s: &str) -> Result<Self> {
        let cfg: NovaSetConfig = toml::from_str(s)?;
        Ok(cfg)
    }

    pub fn effective_log_filter(&self) -> &str {
        self.log_filter
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(&self.log_level)
    }
}

impl Default for NovaSetConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_filter: None,
            set_ops: SetOpsConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SetOpsConfig {
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default = "default_parallel_min_rows")]
    pub parallel_min_rows: usize,
}

fn default_parallel() -> bool {
    true
}
fn default_parallel_min_rows() -> usize {
    4096
}

impl Default for SetOpsConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            parallel_min_rows: default_parallel_min_rows(),
        }
    }
}
