use std::collections::{BTreeMap, HashMap};

use nxpipe_common::config::Config;
use nxpipe_common::credential::Credential;
use nxpipe_common::inventory::AddressPolicy;
use nxpipe_core::pipeline::{self, InvocationRequest};
use nxpipe_core::{AddressBook, AssetPager, Record, TargetSource};
use nxpipe_protocols::ContractIdentity;

use crate::support::{self, ASREP_FILE, ASREP_STDOUT, SAM_STDOUT, ScriptedRunner};

fn admin() -> Credential {
    Credential {
        username: Some("Administrator".to_string()),
        password: Some("Passw0rd!".to_string()),
        domain: Some("corp.local".to_string()),
        ..Credential::default()
    }
}

#[test]
fn sam_dump_against_inventory_assets() {
    let config = Config::default();
    let assets = support::domain_assets();
    let credential = admin();
    let fields = BTreeMap::new();
    let runner = ScriptedRunner::new(SAM_STDOUT);

    let result = pipeline::execute(
        &config,
        InvocationRequest {
            contract_id: "netexec_smb_opt_sam",
            source: TargetSource::assets(&assets, AddressPolicy::LocalIp),
            credential: &credential,
            fields: &fields,
        },
        None,
        &runner,
    )
    .unwrap();

    assert_eq!(
        runner.last_call(),
        vec![
            "nxc", "smb", "10.0.0.5", "10.0.0.6", "-u", "Administrator", "-p", "Passw0rd!", "-d",
            "corp.local", "--sam"
        ]
    );

    let creds = result.get("credentials");
    assert_eq!(creds.len(), 2);
    assert!(creds.iter().all(|c| c.inventory_id.as_deref() == Some("asset-dc01")));
    assert!(matches!(
        &creds[0].record,
        Record::Credential { username, hash: Some(_), .. } if username == "Administrator"
    ));
    assert_eq!(result.message, "Extracted 2 credentials");
}

#[test]
fn auth_confirmations_never_become_findings() {
    let book = AddressBook::default();
    let spaced = "\
SMB         10.0.0.5        445    DC01             [+] CORP\\admin:Summer 2024!
SMB         10.0.0.6        445    WS01             [+] CORP\\admin:Summer 2024! (Pwn3d!)
";
    for contract in ["netexec_smb", "netexec_smb_opt_lsa", "netexec_smb_mod_lsassy"] {
        let contract = ContractIdentity::decode(contract).unwrap();
        for (stdout, secret) in [(SAM_STDOUT, "Passw0rd!"), (spaced, "Summer")] {
            let result = pipeline::interpret(Some(&contract), stdout, &book);
            let json = serde_json::to_string(&result).unwrap();
            assert!(!json.contains(secret), "{contract}: {json}");
        }
    }
}

#[test]
fn asreproast_reads_back_the_output_file_and_deduplicates() {
    let dir = support::scratch_dir("asrep");
    let config = Config {
        temp_dir: dir.clone(),
        ..Config::default()
    };
    let credential = admin();
    let fields = BTreeMap::new();
    let runner = ScriptedRunner::new(ASREP_STDOUT).writing_file("--asreproast", ASREP_FILE);

    let result = pipeline::execute(
        &config,
        InvocationRequest {
            contract_id: "netexec_ldap_opt_asreproast",
            source: TargetSource::manual("10.0.0.5"),
            credential: &credential,
            fields: &fields,
        },
        None,
        &runner,
    )
    .unwrap();

    let argv = runner.last_call();
    let flag = argv.iter().position(|a| a == "--asreproast").unwrap();
    assert!(argv[flag + 1].starts_with(dir.to_str().unwrap()));
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

    let roastable = result.get("asrep_roastable");
    assert_eq!(roastable.len(), 1);
    assert_eq!(roastable[0].address.as_deref(), Some("10.0.0.5"));
    assert_eq!(roastable[0].inventory_id, None);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn module_run_with_options_and_failing_exit_code() {
    let config = Config::default();
    let credential = admin();
    let fields = BTreeMap::from([
        ("mo_coerce_plus_LISTENER".to_string(), "10.0.0.99".to_string()),
        ("module_options".to_string(), "METHOD=PetitPotam".to_string()),
    ]);
    let stdout = "\
COERCE_PLUS 10.0.0.5        445    DC01             VULNERABLE, PetitPotam
COERCE_PLUS 10.0.0.5        445    DC01             Next step: https://github.com/topotam/PetitPotam
";
    let runner = ScriptedRunner::new(stdout).with_exit_code(1);

    let result = pipeline::execute(
        &config,
        InvocationRequest {
            contract_id: "netexec_smb_mod_coerce_plus",
            source: TargetSource::manual("dc01.corp.local"),
            credential: &credential,
            fields: &fields,
        },
        None,
        &runner,
    )
    .unwrap();

    let argv = runner.last_call();
    assert_eq!(
        argv[argv.len() - 5..],
        ["-M", "coerce_plus", "-o", "LISTENER=10.0.0.99", "METHOD=PetitPotam"]
    );
    let vulns = result.get("vulnerabilities");
    assert_eq!(vulns.len(), 1);
    assert_eq!(vulns[0].hostname.as_deref(), Some("DC01"));
}

#[test]
fn asset_groups_are_paged_through() {
    let config = Config::default();
    let assets: Vec<_> = (0..250)
        .map(|i| {
            nxpipe_common::inventory::Asset::new(format!("asset-{i}"))
                .with_ips([format!("10.1.{}.{}", i / 200, i % 200 + 1)])
                .with_agent("edr")
        })
        .collect();
    let mut pages = 0;
    let mut inner = support::paged(assets);
    let mut pager = |request: nxpipe_common::inventory::PageRequest<'_>| {
        pages += 1;
        inner(request)
    };
    let groups = vec!["servers".to_string()];
    let credential = Credential::default();
    let fields = BTreeMap::new();

    let prepared = pipeline::prepare(
        &config,
        InvocationRequest {
            contract_id: "netexec_smb",
            source: TargetSource::asset_groups(&groups, AddressPolicy::Automatic),
            credential: &credential,
            fields: &fields,
        },
        Some(&mut pager as &mut dyn AssetPager),
    )
    .unwrap();

    assert_eq!(pages, 3);
    assert_eq!(prepared.targets.len(), 250);
    assert_eq!(prepared.targets[0], "10.1.0.1");
    assert_eq!(prepared.command.argv.len(), 2 + 250);
}

#[test]
fn result_json_shape() {
    let contract = ContractIdentity::option("smb", "shares");
    let book = AddressBook::new(HashMap::from([("10.0.0.5".to_string(), "asset-dc01".to_string())]));
    let stdout = "\
SMB  10.0.0.5  445  DC01  Share           Permissions     Remark
SMB  10.0.0.5  445  DC01  -----           -----------     ------
SMB  10.0.0.5  445  DC01  ADMIN$                          Remote Admin
SMB  10.0.0.5  445  DC01  NETLOGON        READ            Logon server share
";
    let result = pipeline::interpret(Some(&contract), stdout, &book);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["message"], "Extracted 2 shares");
    let shares = json["outputs"]["shares"].as_array().unwrap();
    assert_eq!(shares[1]["name"], "NETLOGON");
    assert_eq!(shares[1]["permissions"], serde_json::json!(["READ"]));
    assert_eq!(shares[1]["inventory_id"], "asset-dc01");
    assert_eq!(shares[1]["hostname"], "DC01");
}
