// gem/core/governance/src/contract.rs

//! Query façade over the governance contract.

use crate::abi::{AbiError, Interface, Token};
use crate::config::GovernanceConfig;
use crate::context::{build_evm, CallContext};
use crate::error::GovernanceError;
use crate::invoker::invoke;
use crate::metrics::GOVERNANCE_QUERIES_TOTAL;
use crate::registry::{governance_interface, methods};
use crate::types::{WhiteListEntry, WhitelistStatus};
use gem_consensus::{Address, ChainConfig, ChainReader, Header};
use gem_execution::StateDB;
use primitive_types::U256;
use tracing::{debug, warn};

/// Answers governance questions for one block against one state snapshot.
///
/// Every query builds its own VM, so an `InnerContract` can be shared
/// between threads and queried repeatedly; the snapshot is never written.
pub struct InnerContract<'a> {
    header: &'a Header,
    chain: &'a dyn ChainReader,
    state: &'a StateDB,
    chain_config: &'a ChainConfig,
    config: GovernanceConfig,
    interface: &'static Interface,
}

impl<'a> InnerContract<'a> {
    pub fn new(
        header: &'a Header,
        chain: &'a dyn ChainReader,
        state: &'a StateDB,
        chain_config: &'a ChainConfig,
    ) -> Result<Self, GovernanceError> {
        Ok(Self {
            header,
            chain,
            state,
            chain_config,
            config: GovernanceConfig::default(),
            interface: governance_interface()?,
        })
    }

    pub fn with_config(mut self, config: GovernanceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    pub fn header(&self) -> &Header {
        self.header
    }

    /// Whether `node_id` may produce blocks, together with its raw status
    pub fn is_valid(&self, node_id: &str) -> Result<(bool, WhitelistStatus), GovernanceError> {
        let tokens = self.query(methods::IS_WHITE, &[Token::String(node_id.to_string())])?;
        let code = single(tokens, Token::into_uint, methods::IS_WHITE)?;
        let status = WhitelistStatus::from_code(code);
        debug!("Node {} whitelist status: {}", node_id, status);
        Ok((status.is_eligible(), status))
    }

    /// Reward address configured on-chain; zero when none has been set
    pub fn coinbase(&self) -> Result<Address, GovernanceError> {
        self.address_getter(methods::GET_COINBASE)
    }

    /// Fail-closed variant of [`is_valid`](Self::is_valid): any error denies
    pub fn is_authorized(&self, node_id: &str) -> bool {
        match self.is_valid(node_id) {
            Ok((eligible, _)) => eligible,
            Err(e) => {
                warn!("Denying node {}: {}", node_id, e);
                false
            }
        }
    }

    /// On-chain coinbase, or the header's coinbase when none is configured
    pub fn reward_address(&self) -> Result<Address, GovernanceError> {
        let configured = self.coinbase()?;
        if configured.is_zero() {
            Ok(self.header.coinbase)
        } else {
            Ok(configured)
        }
    }

    pub fn owner(&self) -> Result<Address, GovernanceError> {
        self.address_getter(methods::OWNER)
    }

    /// Pending owner of an ownership transfer; zero when none is pending
    pub fn new_owner(&self) -> Result<Address, GovernanceError> {
        self.address_getter(methods::NEW_OWNER)
    }

    /// Entry `index` of the contract's node list
    pub fn white_list(&self, index: U256) -> Result<WhiteListEntry, GovernanceError> {
        let tokens = self.query(methods::WHITE_LIST, &[Token::Uint(index)])?;
        let mut tokens = tokens.into_iter();
        let node_id = tokens
            .next()
            .and_then(Token::into_string)
            .ok_or_else(|| unexpected_output(methods::WHITE_LIST))?;
        let code = tokens
            .next()
            .and_then(Token::into_uint)
            .ok_or_else(|| unexpected_output(methods::WHITE_LIST))?;

        Ok(WhiteListEntry {
            node_id,
            state: WhitelistStatus::from_code(code),
        })
    }

    fn address_getter(&self, method: &'static str) -> Result<Address, GovernanceError> {
        let tokens = self.query(method, &[])?;
        single(tokens, Token::into_address, method)
    }

    /// Pack, execute and unpack one call, recording its outcome
    fn query(&self, method: &'static str, args: &[Token]) -> Result<Vec<Token>, GovernanceError> {
        let result = self.run(method, args);
        let status = match &result {
            Ok(_) => "ok",
            Err(e) => {
                warn!("Governance query {} failed: {}", method, e);
                e.kind()
            }
        };
        GOVERNANCE_QUERIES_TOTAL
            .with_label_values(&[method, status])
            .inc();
        result
    }

    fn run(&self, method: &'static str, args: &[Token]) -> Result<Vec<Token>, GovernanceError> {
        let input = self
            .interface
            .pack(method, args)
            .map_err(|source| GovernanceError::Encoding { method, source })?;

        let ctx = CallContext::for_header(self.header, &self.config).with_data(input);
        let mut evm = build_evm(
            &ctx,
            self.header,
            self.chain,
            self.state,
            self.chain_config,
        );

        let out = invoke(&mut evm, &ctx)
            .map_err(|source| GovernanceError::Execution { method, source })?;

        self.interface
            .unpack(method, &out.output)
            .map_err(|source| GovernanceError::Decoding { method, source })
    }
}

fn unexpected_output(method: &'static str) -> GovernanceError {
    GovernanceError::Decoding {
        method,
        source: AbiError::Mismatch(format!("unexpected output tokens for {}", method)),
    }
}

/// Extract the only output of a single-return method
fn single<T>(
    tokens: Vec<Token>,
    extract: fn(Token) -> Option<T>,
    method: &'static str,
) -> Result<T, GovernanceError> {
    tokens
        .into_iter()
        .next()
        .and_then(extract)
        .ok_or_else(|| unexpected_output(method))
}
