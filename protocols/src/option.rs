//! # Option Catalogue
//!
//! Built-in flags per protocol. A few options only deliver their results
//! through a file; those get an output path appended to the command.

use nxpipe_common::{PipelineError, PipelineResult};

#[derive(Debug, PartialEq, Eq)]
pub struct OptionSpec {
    pub id: &'static str,
    pub flag: &'static str,
    pub description: &'static str,
    /// The tool writes the results to a file given after the flag.
    pub output_file: bool,
}

const fn flag(id: &'static str, flag: &'static str, description: &'static str) -> OptionSpec {
    OptionSpec {
        id,
        flag,
        description,
        output_file: false,
    }
}

const fn file(id: &'static str, flag: &'static str, description: &'static str) -> OptionSpec {
    OptionSpec {
        id,
        flag,
        description,
        output_file: true,
    }
}

const LOCAL_AUTH: OptionSpec = flag("local_auth", "--local-auth", "Authenticate against the local account database");
const SAM: OptionSpec = flag("sam", "--sam", "Dump SAM hashes");
const LSA: OptionSpec = flag("lsa", "--lsa", "Dump LSA secrets");

static SMB: &[OptionSpec] = &[
    flag("shares", "--shares", "Enumerate shares and access"),
    flag("users", "--users", "Enumerate domain users"),
    flag("groups", "--groups", "Enumerate domain groups"),
    flag("local_groups", "--local-groups", "Enumerate local groups"),
    flag("computers", "--computers", "Enumerate computer accounts"),
    flag("pass_pol", "--pass-pol", "Dump the password policy"),
    flag("rid_brute", "--rid-brute", "Enumerate accounts by RID brute force"),
    SAM,
    LSA,
    flag("ntds", "--ntds", "Dump the NTDS.dit of a domain controller"),
    flag("sessions", "--sessions", "Enumerate active sessions"),
    flag("disks", "--disks", "Enumerate disks"),
    flag("loggedon_users", "--loggedon-users", "Enumerate logged on users"),
    LOCAL_AUTH,
];

static LDAP: &[OptionSpec] = &[
    flag("users", "--users", "Enumerate domain users"),
    flag("groups", "--groups", "Enumerate domain groups"),
    flag("dc_list", "--dc-list", "Enumerate domain controllers"),
    flag("get_sid", "--get-sid", "Get the domain SID"),
    flag("admin_count", "--admin-count", "Accounts with adminCount=1"),
    flag("trusted_for_delegation", "--trusted-for-delegation", "Accounts trusted for delegation"),
    flag("password_not_required", "--password-not-required", "Accounts with PASSWD_NOTREQD"),
    file("asreproast", "--asreproast", "AS-REP roastable accounts"),
    file("kerberoasting", "--kerberoasting", "Kerberoastable accounts"),
];

static WINRM: &[OptionSpec] = &[SAM, LSA, LOCAL_AUTH];

static MSSQL: &[OptionSpec] = &[LOCAL_AUTH];

static RDP: &[OptionSpec] = &[flag("screenshot", "--screenshot", "Screenshot the session")];

static FTP: &[OptionSpec] = &[flag("ls", "--ls", "List the FTP root")];

/// Options available for `protocol`. Unknown protocols have none.
pub fn options_for(protocol: &str) -> &'static [OptionSpec] {
    match protocol {
        "smb" => SMB,
        "ldap" => LDAP,
        "winrm" => WINRM,
        "mssql" => MSSQL,
        "rdp" => RDP,
        "ftp" => FTP,
        _ => &[],
    }
}

pub fn lookup(protocol: &str, id: &str) -> PipelineResult<&'static OptionSpec> {
    options_for(protocol)
        .iter()
        .find(|spec| spec.id == id)
        .ok_or_else(|| PipelineError::lookup("option", format!("{protocol}/{id}")))
}
