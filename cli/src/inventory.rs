//! Inventory JSON files:
//!
//! ```json
//! { "assets": [ { "id": "a1", "hostname": "dc01.corp.local",
//!                 "ips": ["10.0.0.5"], "agents": [], "groups": ["g1"] } ] }
//! ```
//!
//! The file stands in for the inventory service: it supplies assets for the
//! `assets` selector and serves pages for `asset-groups`.

use std::path::Path;

use anyhow::Context;
use nxpipe_common::inventory::{Asset, AssetPage, PageRequest};
use nxpipe_core::AssetPager;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryEntry {
    #[serde(flatten)]
    pub asset: Asset,
    #[serde(default)]
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryFile {
    #[serde(default)]
    pub assets: Vec<InventoryEntry>,
}

impl InventoryFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read inventory {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid inventory file {}", path.display()))
    }

    /// Assets with the given ids, in file order. `None` selects all of them.
    pub fn select(&self, ids: Option<&[String]>) -> Vec<Asset> {
        self.assets
            .iter()
            .filter(|entry| ids.is_none_or(|ids| ids.contains(&entry.asset.id)))
            .map(|entry| entry.asset.clone())
            .collect()
    }

    pub fn pager(&self) -> FilePager<'_> {
        FilePager { file: self }
    }
}

/// Serves group members page by page, like the inventory service does.
pub struct FilePager<'a> {
    file: &'a InventoryFile,
}

impl AssetPager for FilePager<'_> {
    fn fetch(&mut self, request: PageRequest<'_>) -> anyhow::Result<AssetPage> {
        let members: Vec<&Asset> = self
            .file
            .assets
            .iter()
            .filter(|entry| entry.groups.iter().any(|g| request.group_ids.contains(g)))
            .map(|entry| &entry.asset)
            .collect();

        let start = request.page.saturating_mul(request.size).min(members.len());
        let end = start.saturating_add(request.size).min(members.len());

        Ok(AssetPage {
            content: members[start..end].iter().map(|asset| (*asset).clone()).collect(),
            last: end >= members.len(),
        })
    }
}
