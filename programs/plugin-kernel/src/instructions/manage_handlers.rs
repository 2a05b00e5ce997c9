// Function handler assignment and fallback dispatch
//
// Calls the kernel has no instruction for are routed through dispatch_fallback:
// the first eight bytes of the data select a handler from the account's table
// and the call is forwarded with the true originator appended as trailing
// metadata, so handlers can authenticate the caller without trusting the
// payload.
use crate::errors::ManagerError;
use crate::events::FunctionHandlerUpdatedEvent;
use crate::interface;
use crate::state::{
    HandlerTableAccount, IntegrationRegistryAccount, SmartAccount,
    INTEGRATION_KIND_FUNCTION_HANDLER,
};
use crate::validation;
use crate::{HANDLER_TABLE_SEED, INTEGRATION_REGISTRY_SEED};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::invoke;

// ================================
// Instruction Handlers
// ================================

/// Assign or clear the handler for a selector
pub fn set_function_handler(
    ctx: Context<SetFunctionHandler>,
    selector: [u8; 8],
    handler: Pubkey,
) -> Result<()> {
    if handler != Pubkey::default() {
        ctx.accounts
            .integration_registry
            .require_permitted(&handler, INTEGRATION_KIND_FUNCTION_HANDLER)?;
    }

    ctx.accounts.handler_table.set_handler(selector, handler)?;

    emit!(FunctionHandlerUpdatedEvent {
        account: ctx.accounts.smart_account.key(),
        selector,
        handler,
        timestamp: ctx.accounts.clock.unix_timestamp,
    });
    Ok(())
}

/// Forward an unrecognized call to the handler registered for its selector
pub fn dispatch_fallback(ctx: Context<DispatchFallback>, data: Vec<u8>) -> Result<()> {
    ctx.accounts.smart_account.require_active()?;
    validation::validate_fallback_data(&data)?;
    let (selector, payload) = interface::split_fallback_data(&data)?;

    let caller = ctx.accounts.caller.key();
    let handler = ctx
        .accounts
        .handler_table
        .handler_for(selector)
        .ok_or_else(|| {
            msg!(
                "No handler for selector {:?}, caller {}, {} data bytes",
                selector,
                caller,
                data.len()
            );
            error!(ManagerError::HandlerNotSet)
        })?;
    let instruction = interface::handler_instruction(&handler, selector, payload, &caller);
    let handler_info = interface::find_account_info(&handler, ctx.remaining_accounts)?;
    invoke(&instruction, &[handler_info.clone()])?;

    msg!("Dispatched selector {:?} to handler {}", selector, handler);
    Ok(())
}

// ================================
// Account Contexts
// ================================

#[derive(Accounts)]
pub struct SetFunctionHandler<'info> {
    #[account(has_one = owner)]
    pub smart_account: Account<'info, SmartAccount>,

    #[account(
        mut,
        seeds = [HANDLER_TABLE_SEED, smart_account.key().as_ref()],
        bump = handler_table.bump
    )]
    pub handler_table: Account<'info, HandlerTableAccount>,

    #[account(
        seeds = [INTEGRATION_REGISTRY_SEED],
        bump = integration_registry.bump
    )]
    pub integration_registry: Account<'info, IntegrationRegistryAccount>,

    pub owner: Signer<'info>,

    pub clock: Sysvar<'info, Clock>,
}

#[derive(Accounts)]
pub struct DispatchFallback<'info> {
    pub smart_account: Account<'info, SmartAccount>,

    #[account(
        seeds = [HANDLER_TABLE_SEED, smart_account.key().as_ref()],
        bump = handler_table.bump
    )]
    pub handler_table: Account<'info, HandlerTableAccount>,

    /// Originator forwarded to the handler as trailing metadata
    pub caller: Signer<'info>,
}
