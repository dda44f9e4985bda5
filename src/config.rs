use super::types::DexConfig;
use crate::core::constants::{DEFAULT_SLIPPAGE_BPS, FEE_BPS};
use anyhow::Result;
use std::path::PathBuf;

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            working_dir: "working_dir".to_string(),
            snapshot_file: "pairs.csv".to_string(),
            catalog_file: "tokens.json".to_string(),
            backend_url: "http://localhost:3001".to_string(),
            wrapped_native: "0x0000000000000000000000000000000000000000".to_string(),
            native_symbol: "PHRS".to_string(),
            wrapped_symbol: "WPHRS".to_string(),
            fee_bps: FEE_BPS,
            default_slippage_bps: DEFAULT_SLIPPAGE_BPS,
            refresh_secs: 30,
            chain_id: "1".to_string(),
            listen_port: 3000,
        }
    }
}

impl DexConfig {
    // Helper method to load from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let config: Self = confy::load_path(path)?;
        Ok(config)
    }
}
