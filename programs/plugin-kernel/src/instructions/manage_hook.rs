// Hook assignment and the two-call interception bridge
//
// An account's hook normally runs inline: execute_transaction wraps the batch
// between pre_check and post_check within one instruction. Integrations built
// around a split protocol instead issue pre_transaction_check and
// post_transaction_check as independent instructions; the bridge persists the
// pre-check result (hook snapshot plus opaque context) in the hook
// configuration PDA so the later post-check can consume it.
//
// SECURITY MODEL: the post-check always goes to the hook that was active when
// its pre-check ran, never the current assignment, so reassigning the hook
// mid-flight cannot redirect a confirmation to a program that never saw the
// pre-check.
use crate::events::HookUpdatedEvent;
use crate::interface::{self, HookCheckData};
use crate::state::{
    HookConfigAccount, IntegrationRegistryAccount, SmartAccount, INTEGRATION_KIND_HOOK,
};
use crate::{HOOK_CONFIG_SEED, INTEGRATION_REGISTRY_SEED};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::invoke;

// ================================
// Instruction Handlers
// ================================

/// Assign or clear the account's hook program
pub fn set_hook(ctx: Context<SetHook>, hook: Pubkey) -> Result<()> {
    if hook != Pubkey::default() {
        ctx.accounts
            .integration_registry
            .require_permitted(&hook, INTEGRATION_KIND_HOOK)?;
    }

    ctx.accounts.hook_config.hook = hook;

    emit!(HookUpdatedEvent {
        account: ctx.accounts.smart_account.key(),
        hook,
        timestamp: ctx.accounts.clock.unix_timestamp,
    });
    Ok(())
}

/// First half of the split interception protocol: run the hook's pre-check
/// and persist its context for the matching post-check.
/// A second pre-check before the first is consumed overwrites the entry.
pub fn pre_transaction_check(ctx: Context<HookBridge>, correlation: [u8; 32]) -> Result<()> {
    ctx.accounts.smart_account.require_active()?;

    let hook_config = &mut ctx.accounts.hook_config;
    if !hook_config.has_hook() {
        msg!("No hook configured, pre-check is a no-op");
        return Ok(());
    }
    let hook = hook_config.hook;

    let check = HookCheckData::for_account(ctx.accounts.smart_account.key(), correlation);
    let instruction = interface::pre_check_instruction(&hook, &check)?;
    let hook_info = interface::find_account_info(&hook, ctx.remaining_accounts)?;
    invoke(&instruction, &[hook_info.clone()])?;

    let context = interface::read_hook_context(&hook)?;
    hook_config.store_pending(hook, &context)?;

    msg!("Pre-check stored for hook {} ({} context bytes)", hook, context.len());
    Ok(())
}

/// Second half of the split protocol: consume the persisted pre-check and
/// confirm the outcome with the snapshotted hook. A no-op when nothing is
/// pending.
pub fn post_transaction_check(ctx: Context<HookBridge>, success: bool) -> Result<()> {
    let hook_config = &mut ctx.accounts.hook_config;
    let Some((hook, context)) = hook_config.take_pending() else {
        msg!("No pre-check pending, post-check is a no-op");
        return Ok(());
    };

    let account = ctx.accounts.smart_account.key();
    let instruction = interface::post_check_instruction(&hook, &account, success, &context)?;
    let hook_info = interface::find_account_info(&hook, ctx.remaining_accounts)?;
    invoke(&instruction, &[hook_info.clone()])?;
    Ok(())
}

// ================================
// Account Contexts
// ================================

#[derive(Accounts)]
pub struct SetHook<'info> {
    #[account(has_one = owner)]
    pub smart_account: Account<'info, SmartAccount>,

    #[account(
        mut,
        seeds = [HOOK_CONFIG_SEED, smart_account.key().as_ref()],
        bump = hook_config.bump
    )]
    pub hook_config: Account<'info, HookConfigAccount>,

    #[account(
        seeds = [INTEGRATION_REGISTRY_SEED],
        bump = integration_registry.bump
    )]
    pub integration_registry: Account<'info, IntegrationRegistryAccount>,

    pub owner: Signer<'info>,

    pub clock: Sysvar<'info, Clock>,
}

#[derive(Accounts)]
pub struct HookBridge<'info> {
    #[account(has_one = owner)]
    pub smart_account: Account<'info, SmartAccount>,

    #[account(
        mut,
        seeds = [HOOK_CONFIG_SEED, smart_account.key().as_ref()],
        bump = hook_config.bump
    )]
    pub hook_config: Account<'info, HookConfigAccount>,

    pub owner: Signer<'info>,
}
