// gem/core/governance/src/invoker.rs

use crate::context::CallContext;
use gem_execution::{CallOutput, ExecutionError, ReadOnlyEvm};
use tracing::debug;

/// Run the call described by `ctx`; the VM's state changes are discarded
pub fn invoke(evm: &mut ReadOnlyEvm<'_>, ctx: &CallContext) -> Result<CallOutput, ExecutionError> {
    debug!(
        "Calling {} from {} with input 0x{}",
        ctx.to,
        ctx.from,
        hex::encode(&ctx.data)
    );

    match evm.call(ctx.from, ctx.to, ctx.data.clone(), ctx.gas_limit, ctx.value) {
        Ok(out) => {
            debug!(
                "Call to {} returned 0x{} (gas used: {})",
                ctx.to,
                hex::encode(&out.output),
                out.gas_used
            );
            Ok(out)
        }
        Err(e) => {
            debug!("Call to {} failed: {}", ctx.to, e);
            Err(e)
        }
    }
}
