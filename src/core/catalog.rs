use super::constants::NATIVE_KEY;
use super::types::TokenMeta;
use super::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Shortened-address display fallback used until an authoritative
/// symbol is known. Counted in characters, not bytes: the feed is not
/// trusted to send ASCII-only addresses.
pub fn short_address(address: &str) -> String {
    let count = address.chars().count();
    if count <= 10 {
        return address.to_string();
    }
    let head: String = address.chars().take(6).collect();
    let tail: String = address.chars().skip(count - 4).collect();
    format!("{}…{}", head, tail)
}

/// Session-long token metadata cache, keyed by lower-cased address.
///
/// Entries are created lazily on first encounter, refined when
/// authoritative data arrives, and never deleted. The merge policy is
/// one-way: authoritative metadata overwrites placeholders, a
/// placeholder never overwrites authoritative metadata.
#[derive(Debug, Default, Clone)]
pub struct TokenCatalog {
    entries: HashMap<String, TokenMeta>,
}

impl TokenCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the catalog with the two special tokens: the native coin
    /// (keyed by its sentinel, it has no address) and its wrapped
    /// counterpart.
    pub fn seeded(wrapped_native: &str, native_symbol: &str, wrapped_symbol: &str) -> Self {
        let mut catalog = Self::new();
        catalog.entries.insert(
            NATIVE_KEY.to_string(),
            TokenMeta {
                symbol: native_symbol.to_string(),
                decimals: 18,
                authoritative: true,
            },
        );
        catalog.entries.insert(
            wrapped_native.to_lowercase(),
            TokenMeta {
                symbol: wrapped_symbol.to_string(),
                decimals: 18,
                authoritative: true,
            },
        );
        catalog
    }

    pub fn get(&self, key: &str) -> Option<&TokenMeta> {
        self.entries.get(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a token, creating a placeholder entry on first sight.
    pub fn ensure(&mut self, address: &str) -> &TokenMeta {
        let key = address.to_lowercase();
        self.entries.entry(key.clone()).or_insert_with(|| TokenMeta {
            symbol: short_address(&key),
            decimals: 18,
            authoritative: false,
        })
    }

    /// Merge freshly observed metadata. Authoritative data replaces
    /// placeholders; placeholders never displace authoritative data.
    pub fn merge(&mut self, address: &str, incoming: TokenMeta) {
        let key = address.to_lowercase();
        match self.entries.get(&key) {
            Some(existing) if existing.authoritative && !incoming.authoritative => {}
            _ => {
                self.entries.insert(key, incoming);
            }
        }
    }

    /// Display symbol for a token key, falling back to the shortened
    /// address for unknown tokens.
    pub fn symbol_for(&self, key: &str) -> String {
        let key = key.to_lowercase();
        match self.entries.get(&key) {
            Some(meta) => meta.symbol.clone(),
            None => short_address(&key),
        }
    }

    /// Merge every entry of a previously persisted catalog into this
    /// one, keeping whatever authoritative data is already present.
    pub fn absorb(&mut self, other: TokenCatalog) {
        for (key, meta) in other.entries {
            self.merge(&key, meta);
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<TokenCatalog> {
        let json = fs::read_to_string(&path).context("Couldn't read token catalog file")?;
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(&json).context("Couldn't parse token catalog file")?;
        let entries = entries
            .into_iter()
            .map(|entry| (entry.address.to_lowercase(), entry.meta))
            .collect();
        Ok(TokenCatalog { entries })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let entries: Vec<CatalogEntry> = self
            .entries
            .iter()
            .map(|(address, meta)| CatalogEntry {
                address: address.clone(),
                meta: meta.clone(),
            })
            .collect();
        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(path, json).context("Couldn't write token catalog file")?;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct CatalogEntry {
    address: String,
    #[serde(flatten)]
    meta: TokenMeta,
}
