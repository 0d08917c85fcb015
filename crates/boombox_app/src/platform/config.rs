use std::fs;
use std::path::{Path, PathBuf};

use boombox_engine::EngineConfig;
use engine_logging::engine_info;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Deployment settings as written in the RON config file. Absent keys keep defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
struct PersistedConfig {
    output_dir: Option<PathBuf>,
    manifest: Option<PathBuf>,
    temp_root: Option<PathBuf>,
    account: Option<String>,
    repo: Option<String>,
    branch: Option<String>,
    cdn_segment: Option<String>,
    fetch_tool: Option<String>,
    transcode_tool: Option<String>,
    probe_tool: Option<String>,
}

/// Engine configuration from defaults, overridden by the RON file at `path` if given.
pub(crate) fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let persisted = parse(&content).map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })?;
    engine_info!("Loaded config from {:?}", path);
    Ok(apply(persisted, EngineConfig::default()))
}

fn parse(content: &str) -> Result<PersistedConfig, String> {
    ron::from_str(content).map_err(|err| err.to_string())
}

fn apply(persisted: PersistedConfig, mut config: EngineConfig) -> EngineConfig {
    if let Some(dir) = persisted.output_dir {
        config.output_dir = dir;
    }
    if let Some(manifest) = persisted.manifest {
        config.manifest_path = manifest;
    }
    if persisted.temp_root.is_some() {
        config.temp_root = persisted.temp_root;
    }
    let delivery = &mut config.delivery;
    if let Some(account) = persisted.account {
        delivery.account = account;
    }
    if let Some(repo) = persisted.repo {
        delivery.repo = repo;
    }
    if let Some(branch) = persisted.branch {
        delivery.branch = branch;
    }
    if let Some(segment) = persisted.cdn_segment {
        delivery.segment = segment;
    }
    let tools = &mut config.tools;
    if let Some(fetch) = persisted.fetch_tool {
        tools.fetch = fetch;
    }
    if let Some(transcode) = persisted.transcode_tool {
        tools.transcode = transcode;
    }
    if let Some(probe) = persisted.probe_tool {
        tools.probe = probe;
    }
    config
}
