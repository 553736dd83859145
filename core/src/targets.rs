//! # Target Resolution
//!
//! Turns a selector, an address policy and the selector's source data into
//! the ordered list of addresses handed to the tool, plus the map used to
//! correlate findings back to inventory ids.
//!
//! * `manual`: the comma-separated list, in input order, without ids.
//! * `assets`: the supplied assets, in order.
//! * `asset-groups`: every page returned by the pager for the group ids.
//!
//! Per-asset failures are logged and skipped. The only exception is an asset
//! without IPs under `local-ip`, which is governed by [`EmptyLocalIp`].

use std::collections::HashMap;

use nxpipe_common::config::EmptyLocalIp;
use nxpipe_common::inventory::{self, AddressPolicy, Asset, AssetPage, PageRequest, Selector};
use nxpipe_common::utils::ip;
use nxpipe_common::{PipelineError, PipelineResult, debug, info, warn};

/// Page size requested from the pagination collaborator.
pub const ASSET_PAGE_SIZE: usize = 100;

/// Fetches one page of the assets belonging to a set of groups.
pub trait AssetPager {
    fn fetch(&mut self, request: PageRequest<'_>) -> anyhow::Result<AssetPage>;
}

impl<F> AssetPager for F
where
    F: FnMut(PageRequest<'_>) -> anyhow::Result<AssetPage>,
{
    fn fetch(&mut self, request: PageRequest<'_>) -> anyhow::Result<AssetPage> {
        self(request)
    }
}

/// Where the targets come from. Only the field matching the selector is read.
#[derive(Debug, Clone, Copy)]
pub struct TargetSource<'a> {
    pub selector: Selector,
    pub policy: AddressPolicy,
    pub assets: Option<&'a [Asset]>,
    pub group_ids: Option<&'a [String]>,
    pub manual: Option<&'a str>,
}

impl<'a> TargetSource<'a> {
    pub fn manual(text: &'a str) -> Self {
        Self {
            selector: Selector::Manual,
            policy: AddressPolicy::default(),
            assets: None,
            group_ids: None,
            manual: Some(text),
        }
    }

    pub fn assets(assets: &'a [Asset], policy: AddressPolicy) -> Self {
        Self {
            selector: Selector::Assets,
            policy,
            assets: Some(assets),
            group_ids: None,
            manual: None,
        }
    }

    pub fn asset_groups(group_ids: &'a [String], policy: AddressPolicy) -> Self {
        Self {
            selector: Selector::AssetGroups,
            policy,
            assets: None,
            group_ids: Some(group_ids),
            manual: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetExtraction {
    /// Addresses in asset (or token) order. Duplicates are kept.
    pub targets: Vec<String>,
    /// Address to inventory id. Empty for manual targets.
    pub asset_ids: HashMap<String, String>,
}

impl TargetExtraction {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }
}

/// Why an asset produced no address.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Skip {
    NoHostname,
    NoUsableIp,
    NoSeenIp,
    UnusableSeenIp(String),
    /// `local-ip` policy and the asset has no IPs at all.
    NoIps,
}

impl std::fmt::Display for Skip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHostname => write!(f, "no hostname"),
            Self::NoUsableIp => write!(f, "no usable IP address"),
            Self::NoSeenIp => write!(f, "no last observed IP"),
            Self::UnusableSeenIp(raw) => write!(f, "last observed IP '{raw}' is not usable"),
            Self::NoIps => write!(f, "no IP addresses"),
        }
    }
}

/// Resolves `source` into targets.
///
/// `pager` is only consulted for `asset-groups`; passing `None` with that
/// selector is a configuration error.
pub fn resolve(
    source: &TargetSource<'_>,
    pager: Option<&mut dyn AssetPager>,
    empty_local_ip: EmptyLocalIp,
) -> PipelineResult<TargetExtraction> {
    let extraction = match source.selector {
        Selector::Manual => {
            let text = source.manual.ok_or_else(|| missing(source.selector, "manual target list"))?;
            TargetExtraction {
                targets: inventory::parse_commas(text),
                asset_ids: HashMap::new(),
            }
        }
        Selector::Assets => {
            let assets = source.assets.ok_or_else(|| missing(source.selector, "asset list"))?;
            from_assets(assets, source.policy, empty_local_ip)?
        }
        Selector::AssetGroups => {
            let group_ids = source.group_ids.ok_or_else(|| missing(source.selector, "asset group ids"))?;
            let pager = pager.ok_or_else(|| missing(source.selector, "asset pager"))?;
            let assets = fetch_group_assets(group_ids, pager)?;
            from_assets(&assets, source.policy, empty_local_ip)?
        }
    };

    let len = extraction.len();
    let unit: &str = if len == 1 { "target has been" } else { "targets have been" };
    info!("{len} {unit} resolved from {} selector", source.selector);

    Ok(extraction)
}

fn missing(selector: Selector, what: &str) -> PipelineError {
    PipelineError::Configuration(format!("selector '{selector}' requires a {what}"))
}

/// Requests pages until one is flagged as last, concatenating their content.
fn fetch_group_assets(
    group_ids: &[String],
    pager: &mut dyn AssetPager,
) -> PipelineResult<Vec<Asset>> {
    let mut assets = Vec::new();
    let mut page = 0;

    loop {
        let request = PageRequest {
            page,
            size: ASSET_PAGE_SIZE,
            group_ids,
        };
        let AssetPage { content, last } = pager.fetch(request).map_err(PipelineError::Inventory)?;
        debug!("asset page {page}: {} assets (last: {last})", content.len());

        let empty = content.is_empty();
        assets.extend(content);

        if last {
            break;
        }
        if empty {
            warn!("asset page {page} is empty but not flagged as last, stopping pagination");
            break;
        }
        page += 1;
    }

    Ok(assets)
}

fn from_assets(
    assets: &[Asset],
    policy: AddressPolicy,
    empty_local_ip: EmptyLocalIp,
) -> PipelineResult<TargetExtraction> {
    let mut extraction = TargetExtraction::default();

    for asset in assets {
        match address_for(asset, policy) {
            Ok(address) => {
                debug!("asset {} -> {address}", asset.id);
                extraction.asset_ids.insert(address.clone(), asset.id.clone());
                extraction.targets.push(address);
            }
            Err(Skip::NoIps) if empty_local_ip == EmptyLocalIp::Abort => {
                return Err(PipelineError::Validation(format!(
                    "asset {} has no IP addresses, required by the {policy} policy",
                    asset.id
                )));
            }
            Err(reason) => {
                warn!("skipping asset {} ({policy}): {reason}", asset.id);
            }
        }
    }

    Ok(extraction)
}

fn address_for(asset: &Asset, policy: AddressPolicy) -> Result<String, Skip> {
    match policy {
        AddressPolicy::Automatic => {
            if asset.is_agentless()
                && let Some(hostname) = asset.hostname()
            {
                return Ok(hostname.to_string());
            }
            first_usable_ip(asset).ok_or(Skip::NoUsableIp)
        }
        AddressPolicy::Hostname => asset
            .hostname()
            .map(String::from)
            .ok_or(Skip::NoHostname),
        AddressPolicy::SeenIp => {
            let raw = asset.last_observed_ip.as_deref().ok_or(Skip::NoSeenIp)?;
            ip::parse_usable(raw)
                .map(|addr| addr.to_string())
                .ok_or_else(|| Skip::UnusableSeenIp(raw.to_string()))
        }
        AddressPolicy::LocalIp => {
            if asset.ip_addresses.is_empty() {
                return Err(Skip::NoIps);
            }
            first_usable_ip(asset).ok_or(Skip::NoUsableIp)
        }
    }
}

fn first_usable_ip(asset: &Asset) -> Option<String> {
    asset
        .ip_addresses
        .iter()
        .find_map(|raw| ip::parse_usable(raw))
        .map(|addr| addr.to_string())
}
