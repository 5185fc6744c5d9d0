// gem/core/governance/src/context.rs

use crate::config::GovernanceConfig;
use gem_consensus::{Address, ChainConfig, ChainReader, Header};
use gem_execution::{EvmContext, Message, ReadOnlyEvm, StateDB};
use primitive_types::U256;

/// Synthetic message describing one governance query.
///
/// The block producer named in the header is always the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: U256,
    pub data: Vec<u8>,
}

impl CallContext {
    pub fn for_header(header: &Header, config: &GovernanceConfig) -> Self {
        Self {
            from: header.coinbase,
            to: config.contract_address,
            value: U256::zero(),
            gas_limit: config.gas_limit,
            gas_price: config.gas_price,
            data: Vec::new(),
        }
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    pub fn message(&self) -> Message {
        Message {
            from: self.from,
            to: Some(self.to),
            value: self.value,
            gas_limit: self.gas_limit,
            gas_price: self.gas_price,
            data: self.data.clone(),
        }
    }
}

/// Fresh VM over `state` with block metadata taken from `header`
pub fn build_evm<'a>(
    ctx: &CallContext,
    header: &Header,
    chain: &'a dyn ChainReader,
    state: &'a StateDB,
    chain_config: &ChainConfig,
) -> ReadOnlyEvm<'a> {
    let env = EvmContext::new(&ctx.message(), header, chain_config, None);
    ReadOnlyEvm::new(env, state, chain)
}
