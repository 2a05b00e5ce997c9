// Smart account creation and lifecycle
//
// Creates the account's root state together with its companion PDAs (plugin
// registry, hook configuration, handler table) in one instruction, so every
// execution path can assume the full per-account state exists.
use crate::events::AccountCreatedEvent;
use crate::state::{
    HandlerTableAccount, HookConfigAccount, PluginRegistryAccount, SmartAccount,
};
use crate::{
    HANDLER_TABLE_SEED, HOOK_CONFIG_SEED, PLUGIN_REGISTRY_SEED, SMART_ACCOUNT_SEED,
};
use anchor_lang::prelude::*;

// ================================
// Instruction Handlers
// ================================

/// Create a smart account and its companion state
pub fn create_account(ctx: Context<CreateAccount>, executor_program: Pubkey) -> Result<()> {
    let clock = &ctx.accounts.clock;
    let owner = ctx.accounts.owner.key();

    let account = &mut ctx.accounts.smart_account;
    **account = SmartAccount::new(owner, executor_program, ctx.bumps.smart_account, clock);
    let account_key = account.key();

    let registry = &mut ctx.accounts.plugin_registry;
    **registry = PluginRegistryAccount::new(account_key, ctx.bumps.plugin_registry);

    let hook_config = &mut ctx.accounts.hook_config;
    **hook_config = HookConfigAccount::new(account_key, ctx.bumps.hook_config);

    let handler_table = &mut ctx.accounts.handler_table;
    **handler_table = HandlerTableAccount::new(account_key, ctx.bumps.handler_table);

    emit!(AccountCreatedEvent {
        account: account_key,
        owner,
        executor_program,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

/// Deactivate a smart account; execution paths reject it from then on
pub fn deactivate_account(ctx: Context<DeactivateAccount>) -> Result<()> {
    let clock = &ctx.accounts.clock;
    ctx.accounts.smart_account.deactivate(clock);
    msg!("Smart account {} deactivated", ctx.accounts.smart_account.key());
    Ok(())
}

// ================================
// Account Contexts
// ================================

#[derive(Accounts)]
pub struct CreateAccount<'info> {
    #[account(
        init,
        payer = owner,
        space = SmartAccount::space(),
        seeds = [SMART_ACCOUNT_SEED, owner.key().as_ref()],
        bump
    )]
    pub smart_account: Account<'info, SmartAccount>,

    #[account(
        init,
        payer = owner,
        space = PluginRegistryAccount::space(),
        seeds = [PLUGIN_REGISTRY_SEED, smart_account.key().as_ref()],
        bump
    )]
    pub plugin_registry: Account<'info, PluginRegistryAccount>,

    #[account(
        init,
        payer = owner,
        space = HookConfigAccount::space(),
        seeds = [HOOK_CONFIG_SEED, smart_account.key().as_ref()],
        bump
    )]
    pub hook_config: Account<'info, HookConfigAccount>,

    #[account(
        init,
        payer = owner,
        space = HandlerTableAccount::space(),
        seeds = [HANDLER_TABLE_SEED, smart_account.key().as_ref()],
        bump
    )]
    pub handler_table: Account<'info, HandlerTableAccount>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub clock: Sysvar<'info, Clock>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct DeactivateAccount<'info> {
    #[account(mut, has_one = owner)]
    pub smart_account: Account<'info, SmartAccount>,

    pub owner: Signer<'info>,

    pub clock: Sysvar<'info, Clock>,
}
