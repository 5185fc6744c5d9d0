// gem/core/execution/src/revm_adapter.rs

use crate::metrics::{VM_CALLS_TOTAL, VM_GAS_USED};
use crate::state::StateDB;
use crate::types::{Address, CallOutput, ExecutionError};
use gem_consensus::{ChainConfig, ChainReader, Fork, Hash, Header};
use primitive_types::U256;
use revm::{
    primitives::{
        AccountInfo, Address as RevmAddress, Bytecode, Bytes, ExecutionResult, Output, SpecId,
        TransactTo, B256, KECCAK_EMPTY, U256 as RevmU256,
    },
    Database, Evm,
};
use tracing::debug;

fn to_revm_address(address: &Address) -> RevmAddress {
    RevmAddress::from_slice(&address.0)
}

fn from_revm_address(address: RevmAddress) -> Address {
    Address(address.0 .0)
}

fn to_revm_u256(value: U256) -> RevmU256 {
    RevmU256::from_limbs(value.0)
}

fn from_revm_u256(value: RevmU256) -> U256 {
    U256(*value.as_limbs())
}

fn spec_id(fork: Fork) -> SpecId {
    match fork {
        Fork::London => SpecId::LONDON,
        Fork::Shanghai => SpecId::SHANGHAI,
    }
}

/// Read-only view of a StateDB for revm.
///
/// There is deliberately no `DatabaseCommit` impl: whatever the VM writes
/// stays in its journal and is dropped with the `Evm`.
pub struct StateDBAdapter<'a> {
    state_db: &'a StateDB,
    chain: &'a dyn ChainReader,
}

impl<'a> StateDBAdapter<'a> {
    pub fn new(state_db: &'a StateDB, chain: &'a dyn ChainReader) -> Self {
        Self { state_db, chain }
    }
}

impl Database for StateDBAdapter<'_> {
    type Error = ExecutionError;

    fn basic(&mut self, address: RevmAddress) -> Result<Option<AccountInfo>, Self::Error> {
        let addr = from_revm_address(address);
        if !self.state_db.exists(&addr) {
            return Ok(None);
        }

        let account = self.state_db.get_account(&addr);

        // Zero code hash means no code; revm expects KECCAK_EMPTY there or it
        // rejects the account as a transaction sender (EIP-3607)
        let (code_hash, code) = if account.has_code() {
            let code = self
                .state_db
                .get_code(&account.code_hash)
                .map(|c| Bytecode::new_raw(Bytes::from(c)));
            (B256::from(*account.code_hash.as_bytes()), code)
        } else {
            (KECCAK_EMPTY, None)
        };

        Ok(Some(AccountInfo {
            balance: to_revm_u256(account.balance),
            nonce: account.nonce,
            code_hash,
            code,
        }))
    }

    fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytecode, Self::Error> {
        let code = self
            .state_db
            .get_code(&Hash::new(code_hash.0))
            .unwrap_or_default();

        Ok(Bytecode::new_raw(Bytes::from(code)))
    }

    fn storage(&mut self, address: RevmAddress, index: RevmU256) -> Result<RevmU256, Self::Error> {
        let value = self
            .state_db
            .get_storage(&from_revm_address(address), &from_revm_u256(index));
        Ok(to_revm_u256(value))
    }

    fn block_hash(&mut self, number: RevmU256) -> Result<B256, Self::Error> {
        let number: u64 = number.saturating_to();
        Ok(self
            .chain
            .block_hash(number)
            .map(|h| B256::from(*h.as_bytes()))
            .unwrap_or(B256::ZERO))
    }
}

/// Transaction-shaped input to an execution environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: U256,
    pub data: Vec<u8>,
}

/// Block and origin environment for a VM instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmContext {
    pub origin: Address,
    pub gas_price: U256,
    pub coinbase: Address,
    pub number: u64,
    pub timestamp: u64,
    pub difficulty: U256,
    pub gas_limit: u64,
    pub prevrandao: Hash,
    pub chain_id: u64,
    pub fork: Fork,
}

impl EvmContext {
    /// Derive the environment for `msg` executing in the block described by `header`.
    ///
    /// `author` overrides the block beneficiary; by default it is the header's coinbase.
    pub fn new(msg: &Message, header: &Header, config: &ChainConfig, author: Option<Address>) -> Self {
        Self {
            origin: msg.from,
            gas_price: msg.gas_price,
            coinbase: author.unwrap_or(header.coinbase),
            number: header.number,
            timestamp: header.timestamp,
            difficulty: header.difficulty,
            gas_limit: header.gas_limit,
            prevrandao: header.mix_digest,
            chain_id: config.chain_id,
            fork: config.fork,
        }
    }
}

/// A VM bound to one environment and one state snapshot.
///
/// Calls run as transactions whose resulting state is discarded, so the
/// snapshot is never written. Sender balance and block gas limit are not
/// enforced because these calls are never charged to a real account, and the
/// caller may hold code (EIP-3607 is off) since it is a block producer's
/// address rather than a signed transaction sender.
pub struct ReadOnlyEvm<'a> {
    db: StateDBAdapter<'a>,
    context: EvmContext,
}

impl<'a> ReadOnlyEvm<'a> {
    pub fn new(context: EvmContext, state_db: &'a StateDB, chain: &'a dyn ChainReader) -> Self {
        Self {
            db: StateDBAdapter::new(state_db, chain),
            context,
        }
    }

    pub fn context(&self) -> &EvmContext {
        &self.context
    }

    /// Message call from `caller` into `callee`
    pub fn call(
        &mut self,
        caller: Address,
        callee: Address,
        input: Vec<u8>,
        gas_limit: u64,
        value: U256,
    ) -> Result<CallOutput, ExecutionError> {
        debug!("Executing read-only call with revm");
        debug!("  Caller: {}", caller);
        debug!("  Callee: {}", callee);
        debug!("  Calldata size: {} bytes", input.len());

        let ctx = &self.context;
        let mut evm = Evm::builder()
            .with_db(&mut self.db)
            .modify_cfg_env(|cfg| {
                cfg.chain_id = ctx.chain_id;
                cfg.disable_balance_check = true;
                cfg.disable_block_gas_limit = true;
                cfg.disable_eip3607 = true;
            })
            .with_spec_id(spec_id(ctx.fork))
            .modify_tx_env(|tx| {
                tx.caller = to_revm_address(&caller);
                tx.transact_to = TransactTo::Call(to_revm_address(&callee));
                tx.data = Bytes::from(input);
                tx.value = to_revm_u256(value);
                tx.gas_limit = gas_limit;
                tx.gas_price = to_revm_u256(ctx.gas_price);
                tx.chain_id = Some(ctx.chain_id);
            })
            .modify_block_env(|block| {
                block.number = RevmU256::from(ctx.number);
                block.timestamp = RevmU256::from(ctx.timestamp);
                block.coinbase = to_revm_address(&ctx.coinbase);
                block.difficulty = to_revm_u256(ctx.difficulty);
                block.prevrandao = Some(B256::from(*ctx.prevrandao.as_bytes()));
                block.gas_limit = RevmU256::from(ctx.gas_limit);
                block.basefee = RevmU256::ZERO;
            })
            .build();

        // transact() leaves the state diff with us; dropping it discards every write
        let outcome = evm.transact().map_err(|e| {
            VM_CALLS_TOTAL.with_label_values(&["error"]).inc();
            ExecutionError::Vm(format!("{:?}", e))
        })?;

        match outcome.result {
            ExecutionResult::Success {
                output, gas_used, ..
            } => {
                VM_CALLS_TOTAL.with_label_values(&["success"]).inc();
                VM_GAS_USED.observe(gas_used as f64);
                match output {
                    Output::Call(return_data) => Ok(CallOutput {
                        output: return_data.to_vec(),
                        gas_used,
                    }),
                    _ => Err(ExecutionError::Vm(
                        "Unexpected output type for contract call".to_string(),
                    )),
                }
            }
            ExecutionResult::Revert { gas_used, output } => {
                VM_CALLS_TOTAL.with_label_values(&["revert"]).inc();
                Err(ExecutionError::Reverted {
                    output: output.to_vec(),
                    gas_used,
                })
            }
            ExecutionResult::Halt { reason, gas_used } => {
                VM_CALLS_TOTAL.with_label_values(&["halt"]).inc();
                Err(ExecutionError::Halted {
                    reason: format!("{:?}", reason),
                    gas_used,
                })
            }
        }
    }
}
