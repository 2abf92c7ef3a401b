use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::search::FuzzyOptions;
use crate::table::{ColumnSpec, FieldDescriptor};

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub data: Option<String>,
    pub headers: Option<Vec<FieldDescriptor>>,
    #[serde(alias = "fields")]
    pub columns: Option<Vec<ColumnSpec>>,
    #[serde(alias = "itemsPerPage")]
    pub items_per_page: Option<usize>,
    pub pagination: Option<bool>,
    pub search: Option<bool>,
    pub sort: Option<bool>,
    pub title: Option<String>,
    #[serde(alias = "exportCSV")]
    pub export_csv: Option<bool>,
    #[serde(alias = "searchByFields")]
    pub search_by_fields: Option<bool>,
    pub search_keys: Option<Vec<String>>,
    pub fuzzy: Option<FuzzyOptions>,
    pub export: Option<String>,
    pub export_format: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".tableview").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# tableview config
#
# Location (default):
#   ~/.tableview/config.yml

# Data (JSON array of objects, YAML list of maps, or CSV with a header row).
# Without it the built-in branch sample is shown.
# data: ./branches.json

title: Data Branches

# Columns: header label + the field it sorts/filters/exports by
headers:
  - display_name: Branch
    sorting_field_name: branch

# Cells: a field name, or a template with {field} placeholders
columns:
  - branch
#  - template: "{branch} ({author})"

# Features
pagination: true
items_per_page: 5
search: true
sort: true
search_by_fields: true
export_csv: true

# Global search
# search_keys: [branch]
fuzzy:
  threshold: 0.2
  location: 0
  distance: 100
  min_token_len: 4
  max_pattern_len: 32

# Export (optional)
# export: ./branches.csv
# export_format: csv

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}
