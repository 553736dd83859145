use serde::Deserialize;

/// An inventory entry. Supplied by the inventory collaborator, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, alias = "ips")]
    pub ip_addresses: Vec<String>,
    #[serde(default, alias = "last_seen_ip")]
    pub last_observed_ip: Option<String>,
    /// Agents installed on the asset. Empty means agentless.
    #[serde(default)]
    pub agents: Vec<String>,
}

impl Asset {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hostname: None,
            ip_addresses: Vec::new(),
            last_observed_ip: None,
            agents: Vec::new(),
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_ips<I, S>(mut self, ips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ip_addresses = ips.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_last_observed_ip(mut self, ip: impl Into<String>) -> Self {
        self.last_observed_ip = Some(ip.into());
        self
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agents.push(agent.into());
        self
    }

    pub fn is_agentless(&self) -> bool {
        self.agents.is_empty()
    }

    /// Hostname, if present and not blank.
    pub fn hostname(&self) -> Option<&str> {
        self.hostname
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }
}

/// One page returned by the pagination collaborator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetPage {
    pub content: Vec<Asset>,
    /// Set on the final page.
    pub last: bool,
}

/// A request for one page of the assets belonging to a set of groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub page: usize,
    pub size: usize,
    pub group_ids: &'a [String],
}
