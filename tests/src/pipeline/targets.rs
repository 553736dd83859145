use nxpipe_common::PipelineError;
use nxpipe_common::config::EmptyLocalIp;
use nxpipe_common::inventory::{AddressPolicy, Asset};
use nxpipe_core::TargetSource;
use nxpipe_core::targets::resolve;

use crate::support;

#[test]
fn manual_targets_keep_token_order() {
    let extraction = resolve(
        &TargetSource::manual("titi.com, toto.com , ,foo.com"),
        None,
        EmptyLocalIp::Abort,
    )
    .unwrap();
    assert_eq!(extraction.targets, vec!["titi.com", "toto.com", "foo.com"]);
    assert!(extraction.asset_ids.is_empty());
}

#[test]
fn policies_over_the_same_assets() {
    let assets = support::domain_assets();

    let by_name = resolve(
        &TargetSource::assets(&assets, AddressPolicy::Hostname),
        None,
        EmptyLocalIp::Abort,
    )
    .unwrap();
    assert_eq!(by_name.targets, vec!["dc01.corp.local", "ws01.corp.local"]);

    let by_ip = resolve(
        &TargetSource::assets(&assets, AddressPolicy::Automatic),
        None,
        EmptyLocalIp::Abort,
    )
    .unwrap();
    assert_eq!(by_ip.targets, vec!["10.0.0.5", "10.0.0.6"]);
    assert_eq!(by_ip.asset_ids["10.0.0.6"], "asset-ws01");
}

#[test]
fn empty_local_ip_policy_is_configurable() {
    let assets = vec![
        Asset::new("with-ip").with_ips(["10.0.0.5"]),
        Asset::new("no-ip").with_hostname("ghost.corp.local"),
    ];
    let source = TargetSource::assets(&assets, AddressPolicy::LocalIp);

    let err = resolve(&source, None, EmptyLocalIp::Abort).unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));

    let skipped = resolve(&source, None, EmptyLocalIp::Skip).unwrap();
    assert_eq!(skipped.targets, vec!["10.0.0.5"]);
}
