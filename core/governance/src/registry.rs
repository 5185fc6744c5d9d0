// gem/core/governance/src/registry.rs

//! The governance contract's interface, parsed once per process.

use crate::abi::{AbiError, Interface, ParamType};
use crate::error::GovernanceError;
use once_cell::sync::OnceCell;
use tracing::info;

/// Contract method names
pub mod methods {
    pub const IS_WHITE: &str = "isWhite";
    pub const GET_COINBASE: &str = "getCoinbase";
    pub const OWNER: &str = "owner";
    pub const NEW_OWNER: &str = "newOwner";
    pub const WHITE_LIST: &str = "whiteList";

    pub const UPDATE_COINBASE: &str = "updateCoinbase";
    pub const ADD_NODE_ID: &str = "addNodeId";
    pub const REMOVE_NODE_ID: &str = "removeNodeId";
    pub const TRANSFER_OWNERSHIP: &str = "transferOwnership";
    pub const ACCEPT_OWNERSHIP: &str = "acceptOwnership";
}

/// Interface JSON of the governance contract
pub const GOVERNANCE_ABI: &str = r#"[{"constant":false,"inputs":[{"name":"_coinbase","type":"address"}],"name":"updateCoinbase","outputs":[],"payable":false,"type":"function","stateMutability":"nonpayable"},{"constant":false,"inputs":[{"name":"_nodeId","type":"string"}],"name":"addNodeId","outputs":[],"payable":false,"type":"function","stateMutability":"nonpayable"},{"constant":true,"inputs":[{"name":"","type":"uint256"}],"name":"whiteList","outputs":[{"name":"nodeId","type":"string"},{"name":"state","type":"uint256"}],"payable":false,"type":"function","stateMutability":"view"},{"constant":false,"inputs":[{"name":"_nodeId","type":"string"}],"name":"removeNodeId","outputs":[],"payable":false,"type":"function","stateMutability":"nonpayable"},{"constant":false,"inputs":[],"name":"acceptOwnership","outputs":[],"payable":false,"type":"function","stateMutability":"nonpayable"},{"constant":true,"inputs":[],"name":"owner","outputs":[{"name":"","type":"address"}],"payable":false,"type":"function","stateMutability":"view"},{"constant":true,"inputs":[{"name":"nodeId","type":"string"}],"name":"isWhite","outputs":[{"name":"_exists","type":"uint256"}],"payable":false,"type":"function","stateMutability":"view"},{"constant":true,"inputs":[],"name":"getCoinbase","outputs":[{"name":"_coinbase","type":"address"}],"payable":false,"type":"function","stateMutability":"view"},{"constant":true,"inputs":[],"name":"newOwner","outputs":[{"name":"","type":"address"}],"payable":false,"type":"function","stateMutability":"view"},{"constant":false,"inputs":[{"name":"_newOwner","type":"address"}],"name":"transferOwnership","outputs":[],"payable":false,"type":"function","stateMutability":"nonpayable"},{"inputs":[],"payable":false,"type":"constructor","stateMutability":"nonpayable"},{"anonymous":false,"inputs":[{"indexed":true,"name":"from","type":"address"},{"indexed":false,"name":"errno","type":"uint256"},{"indexed":true,"name":"errmsg","type":"string"}],"name":"Response","type":"event"},{"anonymous":false,"inputs":[{"indexed":false,"name":"_prevOwner","type":"address"},{"indexed":false,"name":"_newOwner","type":"address"}],"name":"OwnerUpdate","type":"event"}]"#;

/// Expected method surface: (name, inputs, outputs, read-only)
const METHODS: &[(&str, &[ParamType], &[ParamType], bool)] = &[
    (
        methods::WHITE_LIST,
        &[ParamType::Uint(256)],
        &[ParamType::String, ParamType::Uint(256)],
        true,
    ),
    (methods::OWNER, &[], &[ParamType::Address], true),
    (methods::IS_WHITE, &[ParamType::String], &[ParamType::Uint(256)], true),
    (methods::GET_COINBASE, &[], &[ParamType::Address], true),
    (methods::NEW_OWNER, &[], &[ParamType::Address], true),
    (methods::UPDATE_COINBASE, &[ParamType::Address], &[], false),
    (methods::ADD_NODE_ID, &[ParamType::String], &[], false),
    (methods::REMOVE_NODE_ID, &[ParamType::String], &[], false),
    (methods::ACCEPT_OWNERSHIP, &[], &[], false),
    (methods::TRANSFER_OWNERSHIP, &[ParamType::Address], &[], false),
];

/// Expected events: (name, inputs as (type, indexed))
const EVENTS: &[(&str, &[(ParamType, bool)])] = &[
    (
        "Response",
        &[
            (ParamType::Address, true),
            (ParamType::Uint(256), false),
            (ParamType::String, true),
        ],
    ),
    (
        "OwnerUpdate",
        &[(ParamType::Address, false), (ParamType::Address, false)],
    ),
];

static INTERFACE: OnceCell<Interface> = OnceCell::new();

/// Check a parsed interface against the governance contract's surface
pub fn validate_surface(interface: &Interface) -> Result<(), AbiError> {
    for (name, inputs, outputs, constant) in METHODS {
        let function = interface
            .function(name)
            .ok_or_else(|| AbiError::UnknownMethod(name.to_string()))?;

        if function.input_types() != *inputs || function.output_types() != *outputs {
            return Err(AbiError::Mismatch(format!(
                "{} has signature {} returning ({})",
                name,
                function.signature(),
                function
                    .output_types()
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            )));
        }
        if function.constant != *constant {
            return Err(AbiError::Mismatch(format!(
                "{} read-only flag is {}, expected {}",
                name, function.constant, constant
            )));
        }
    }

    let extra = interface.functions().count().saturating_sub(METHODS.len());
    if extra > 0 {
        return Err(AbiError::Mismatch(format!(
            "{} unexpected functions",
            extra
        )));
    }

    for (name, inputs) in EVENTS {
        let event = interface
            .event(name)
            .ok_or_else(|| AbiError::Mismatch(format!("missing event {}", name)))?;
        let actual: Vec<(ParamType, bool)> = event
            .inputs
            .iter()
            .map(|p| (p.kind.clone(), p.indexed))
            .collect();
        if actual != *inputs || event.anonymous {
            return Err(AbiError::Mismatch(format!(
                "event {} has signature {}",
                name,
                event.signature()
            )));
        }
    }

    if interface.constructor().is_none() {
        return Err(AbiError::Mismatch("missing constructor".to_string()));
    }

    Ok(())
}

/// Parse and validate governance interface JSON
pub fn load_interface(text: &str) -> Result<Interface, GovernanceError> {
    let interface = Interface::parse(text).map_err(GovernanceError::Configuration)?;
    validate_surface(&interface).map_err(GovernanceError::Configuration)?;
    Ok(interface)
}

/// The process-wide governance interface.
///
/// Parsed on first use; a failure is returned to every caller and the
/// parse is attempted again on the next call.
pub fn governance_interface() -> Result<&'static Interface, GovernanceError> {
    INTERFACE.get_or_try_init(|| {
        let interface = load_interface(GOVERNANCE_ABI)?;
        info!(
            "Governance interface loaded: {} functions, {} events",
            interface.functions().count(),
            interface.events().count()
        );
        Ok(interface)
    })
}

/// Resolve the governance interface at process start
pub fn init() -> Result<(), GovernanceError> {
    governance_interface().map(|_| ())
}
