//! Enumerates every valid contract: one base contract per protocol, one per
//! protocol option, one per module the protocol supports.

use crate::contract::ContractIdentity;
use crate::output::{self, OutputType};
use crate::protocol::PROTOCOLS;

#[derive(Debug, Clone)]
pub struct ContractEntry {
    pub contract: ContractIdentity,
    pub description: &'static str,
    pub outputs: &'static [OutputType],
}

pub fn contracts() -> Vec<ContractEntry> {
    let mut entries = Vec::new();

    for protocol in PROTOCOLS {
        entries.push(entry(ContractIdentity::base(protocol.name), "Authenticate and fingerprint"));

        for option in protocol.options() {
            entries.push(entry(
                ContractIdentity::option(protocol.name, option.id),
                option.description,
            ));
        }

        for module in protocol.modules() {
            entries.push(entry(
                ContractIdentity::module(protocol.name, module.name),
                module.description,
            ));
        }
    }

    entries
}

fn entry(contract: ContractIdentity, description: &'static str) -> ContractEntry {
    let outputs = output::outputs_for(contract.family, contract.identifier());
    ContractEntry {
        contract,
        description,
        outputs,
    }
}
