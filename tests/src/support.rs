use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use nxpipe_common::inventory::{Asset, AssetPage, PageRequest};
use nxpipe_core::{ToolOutput, ToolRunner};

pub const SAM_STDOUT: &str = "\
SMB         10.0.0.5        445    DC01             [*] Windows Server 2019 Build 17763 x64 (name:DC01) (domain:corp.local) (signing:True) (SMBv1:False)
SMB         10.0.0.5        445    DC01             [+] corp.local\\Administrator:Passw0rd! (Pwn3d!)
SMB         10.0.0.5        445    DC01             [*] Dumping SAM hashes
SMB         10.0.0.5        445    DC01             Administrator:500:aad3b435b51404eeaad3b435b51404ee:dbd13e1c4e338284ac4e9874f7de6ef4:::
SMB         10.0.0.5        445    DC01             Guest:501:aad3b435b51404eeaad3b435b51404ee:31d6cfe0d16ae931b73c59d7e0c089c0:::
SMB         10.0.0.5        445    DC01             [+] Added 2 SAM hashes to the database
SMB         10.0.0.6        445    WS01             [*] Windows 10 Build 19041 x64 (name:WS01) (domain:corp.local) (signing:False) (SMBv1:False)
SMB         10.0.0.6        445    WS01             [-] corp.local\\Administrator:Passw0rd! STATUS_LOGON_FAILURE
";

pub const ASREP_STDOUT: &str = "\
LDAP        10.0.0.5        389    DC01             [*] Windows Server 2019 Build 17763 (name:DC01) (domain:corp.local)
LDAP        10.0.0.5        389    DC01             [+] corp.local\\jdoe:Summer2024!
LDAP        10.0.0.5        389    DC01             [*] Total of records returned 1
LDAP        10.0.0.5        389    DC01             $krb5asrep$23$svc_legacy@CORP.LOCAL:4f1e2d3c$9a8b7c6d5e
";

pub const ASREP_FILE: &str = "$krb5asrep$23$svc_legacy@CORP.LOCAL:4f1e2d3c$9a8b7c6d5e\n";

/// Answers every run with canned stdout, remembers what it was asked to run
/// and optionally writes a results file where the command says to.
pub struct ScriptedRunner {
    stdout: String,
    exit_code: Option<i32>,
    file_contents: Option<String>,
    file_flag: Option<String>,
    pub calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            exit_code: Some(0),
            file_contents: None,
            file_flag: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// Writes `contents` to the path following `flag` in the argument vector.
    pub fn writing_file(mut self, flag: &str, contents: &str) -> Self {
        self.file_flag = Some(flag.to_string());
        self.file_contents = Some(contents.to_string());
        self
    }

    pub fn last_call(&self) -> Vec<String> {
        self.calls.borrow().last().cloned().unwrap_or_default()
    }

    fn file_path(&self, argv: &[String]) -> Option<PathBuf> {
        let flag = self.file_flag.as_deref()?;
        let at = argv.iter().position(|arg| arg == flag)?;
        argv.get(at + 1).map(PathBuf::from)
    }
}

impl ToolRunner for ScriptedRunner {
    fn run(&self, argv: &[String]) -> anyhow::Result<ToolOutput> {
        self.calls.borrow_mut().push(argv.to_vec());

        if let (Some(path), Some(contents)) = (self.file_path(argv), &self.file_contents) {
            fs::write(&path, contents)?;
        }

        Ok(ToolOutput {
            stdout: self.stdout.clone(),
            exit_code: self.exit_code,
        })
    }
}

/// A per-test scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("nxpipe-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("scratch dir");
    dir
}

pub fn domain_assets() -> Vec<Asset> {
    vec![
        Asset::new("asset-dc01")
            .with_hostname("dc01.corp.local")
            .with_ips(["10.0.0.5"])
            .with_agent("edr"),
        Asset::new("asset-ws01")
            .with_hostname("ws01.corp.local")
            .with_ips(["127.0.0.1", "10.0.0.6"])
            .with_agent("edr"),
    ]
}

/// Serves `assets` in pages of the requested size.
pub fn paged(assets: Vec<Asset>) -> impl FnMut(PageRequest<'_>) -> anyhow::Result<AssetPage> {
    move |request: PageRequest<'_>| {
        let start = (request.page * request.size).min(assets.len());
        let end = (start + request.size).min(assets.len());
        Ok(AssetPage {
            content: assets[start..end].to_vec(),
            last: end == assets.len(),
        })
    }
}
