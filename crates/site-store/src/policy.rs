use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map; contents vanish with the process.
    Memory,
    #[default]
    Fs,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreBackend::Memory),
            "fs" | "file" | "filesystem" => Ok(StoreBackend::Fs),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StorePolicyView {
    pub backend: StoreBackend,
    pub io: IoCfg,
    /// Upper bound for a single store primitive; `0` disables the deadline.
    pub op_timeout_ms: u64,
}

impl Default for StorePolicyView {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            io: IoCfg::default(),
            op_timeout_ms: 10_000,
        }
    }
}

impl StorePolicyView {
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IoCfg {
    pub root: PathBuf,
}

impl Default for IoCfg {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./sites"),
        }
    }
}
