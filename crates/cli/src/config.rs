//! YAML file-config loading and CLI/config precedence resolution.
//!
//! Each configurable field is described by one [`FieldSpec`] entry in the
//! static [`FIELDS`] table and resolved uniformly from the two sources:
//! the CLI flag map and the optional `.notification.yaml` inside the
//! input directory.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

/// Name of the optional config file inside the input directory.
pub const CFG_FILENAME: &str = ".notification.yaml";

/// Errors that can occur during config loading and resolution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Filesystem I/O error while reading the config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A required field is absent from both the CLI and the config file.
    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Result alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Which source wins when both the flag and the config file are non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    /// Non-empty CLI value wins; otherwise the config-file value.
    ArgPreferred,
    /// Non-empty config-file value wins; otherwise the CLI value.
    ConfigPreferred,
}

/// One resolvable field: the key shared by flag and config file, its
/// precedence policy, and the error message when a required field
/// resolves to empty.
#[derive(Debug)]
pub struct FieldSpec {
    pub key: &'static str,
    pub precedence: Precedence,
    pub required_msg: Option<&'static str>,
}

/// Every configurable field, processed uniformly by the resolver.
///
/// Config-preferred fields are those whose input-directory config should
/// override the defaults baked into the CLI flags.
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "content",
        precedence: Precedence::ConfigPreferred,
        required_msg: Some("content: not in [inputdir]/.notification.yaml and no --content"),
    },
    FieldSpec {
        key: "title",
        precedence: Precedence::ArgPreferred,
        required_msg: None,
    },
    FieldSpec {
        key: "slack-url",
        precedence: Precedence::ArgPreferred,
        required_msg: None,
    },
    FieldSpec {
        key: "element-room",
        precedence: Precedence::ArgPreferred,
        required_msg: None,
    },
    FieldSpec {
        key: "element-token",
        precedence: Precedence::ArgPreferred,
        required_msg: None,
    },
    FieldSpec {
        key: "element-host",
        precedence: Precedence::ConfigPreferred,
        required_msg: None,
    },
    FieldSpec {
        key: "rcpt",
        precedence: Precedence::ArgPreferred,
        required_msg: None,
    },
    FieldSpec {
        key: "sender",
        precedence: Precedence::ConfigPreferred,
        required_msg: None,
    },
    FieldSpec {
        key: "mail-server",
        precedence: Precedence::ConfigPreferred,
        required_msg: None,
    },
];

/// Load the optional YAML config from the input directory.
///
/// An absent file is an empty map, not an error.
pub fn load_file_config(inputdir: &Path) -> Result<HashMap<String, String>> {
    let path = inputdir.join(CFG_FILENAME);
    if !path.exists() {
        debug!(path = %path.display(), "No config file, resolving from flags only");
        return Ok(HashMap::new());
    }

    let content = std::fs::read_to_string(&path)?;
    let cfg = parse_config_str(&content)?;
    debug!(path = %path.display(), keys = cfg.len(), "Loaded config file");
    Ok(cfg)
}

/// Parse YAML config content into a flat string map.
///
/// Scalar values (strings, numbers, booleans) coerce to their string
/// form; null entries count as absent; nested mappings and sequences are
/// skipped with a warning.
fn parse_config_str(content: &str) -> Result<HashMap<String, String>> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;

    let mut map = HashMap::new();
    if let serde_yaml::Value::Mapping(mapping) = value {
        for (key, val) in mapping {
            let Some(key) = key.as_str() else {
                continue;
            };
            match val {
                serde_yaml::Value::String(s) => {
                    map.insert(key.to_string(), s);
                }
                serde_yaml::Value::Number(n) => {
                    map.insert(key.to_string(), n.to_string());
                }
                serde_yaml::Value::Bool(b) => {
                    map.insert(key.to_string(), b.to_string());
                }
                serde_yaml::Value::Null => {}
                _ => warn!(key, "Ignoring non-scalar config value"),
            }
        }
    }

    Ok(map)
}

/// Resolve a single field from its CLI value and the config-file map.
///
/// Pure over its inputs. Empty strings count as absent on both sides.
pub fn resolve_field(
    spec: &FieldSpec,
    arg_val: &str,
    cfg: &HashMap<String, String>,
) -> Result<String> {
    let cfg_val = cfg.get(spec.key).map(String::as_str).unwrap_or("");

    let resolved = match spec.precedence {
        Precedence::ArgPreferred => {
            if !arg_val.is_empty() {
                arg_val
            } else {
                cfg_val
            }
        }
        Precedence::ConfigPreferred => {
            if !cfg_val.is_empty() {
                cfg_val
            } else {
                arg_val
            }
        }
    };

    if resolved.is_empty() {
        if let Some(msg) = spec.required_msg {
            return Err(ConfigError::MissingField(msg.to_string()));
        }
    }

    Ok(resolved.to_string())
}

/// Final flattened parameter set after the CLI/config merge.
///
/// Constructed once, read-only afterward. Optional fields hold `None`
/// when they resolved to empty; fields with baked-in CLI defaults are
/// always present.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub content: String,
    pub title: Option<String>,
    pub slack_url: Option<String>,
    pub element_room: Option<String>,
    pub element_token: Option<String>,
    pub element_host: String,
    pub rcpt: Option<String>,
    pub sender: String,
    pub mail_server: String,
}

impl ResolvedConfig {
    /// Run every entry of [`FIELDS`] through [`resolve_field`].
    pub fn resolve(
        args: &HashMap<&'static str, String>,
        cfg: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut resolved: HashMap<&'static str, String> = HashMap::with_capacity(FIELDS.len());
        for spec in FIELDS {
            let arg_val = args.get(spec.key).map(String::as_str).unwrap_or("");
            resolved.insert(spec.key, resolve_field(spec, arg_val, cfg)?);
        }

        let take = |key: &'static str| resolved.get(key).cloned().unwrap_or_default();
        let opt = |key: &'static str| {
            let val = take(key);
            if val.is_empty() {
                None
            } else {
                Some(val)
            }
        };

        Ok(Self {
            content: take("content"),
            title: opt("title"),
            slack_url: opt("slack-url"),
            element_room: opt("element-room"),
            element_token: opt("element-token"),
            element_host: take("element-host"),
            rcpt: opt("rcpt"),
            sender: take("sender"),
            mail_server: take("mail-server"),
        })
    }
}
