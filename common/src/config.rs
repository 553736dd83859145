use std::path::PathBuf;
use std::str::FromStr;

/// What to do with an asset that has no IPs when the `local-ip` policy is selected.
///
/// `Abort` fails the whole resolution, `Skip` treats it like every other per-asset
/// failure. Which one is right is a product decision, so it stays configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyLocalIp {
    #[default]
    Abort,
    Skip,
}

impl FromStr for EmptyLocalIp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(format!("invalid empty local-ip policy: {other}")),
        }
    }
}

pub struct Config {
    /// Hides the banner.
    pub no_banner: bool,
    /// 0 = everything, 1 = no decoration, 2 = results only.
    pub quiet: u8,
    /// Binary of the enumeration tool, first token of every command.
    pub tool: String,
    /// Directory where file-producing options write their results.
    pub temp_dir: PathBuf,
    pub empty_local_ip: EmptyLocalIp,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            no_banner: false,
            quiet: 0,
            tool: String::from("nxc"),
            temp_dir: PathBuf::from("/tmp"),
            empty_local_ip: EmptyLocalIp::default(),
        }
    }
}
