use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Path of a dataset JSON file. When unset, the release embedded in
    /// the crate is used.
    pub data_path: Option<PathBuf>,
}
