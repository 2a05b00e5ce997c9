// Delegate-class (root access) execution
//
// Root access is the privileged single-action path: the executor performs the
// call in delegate mode, giving the target code the account's full standing.
// Because the blast radius is total, the gate is stricter than the batch
// path: the plugin's declared requirement is re-read from the integration
// registry at call time and must still agree with the frozen grant on the
// delegate bit. A plugin that downgraded its declaration after being enabled,
// or whose grant predates an upgraded declaration, is rejected.
use crate::errors::ManagerError;
use crate::events::RootAccessExecutedEvent;
use crate::interface::{self, ExecutorCall, HookCheckData, EXECUTION_KIND_DELEGATECALL};
use crate::permissions;
use crate::state::{
    HookConfigAccount, IntegrationRegistryAccount, PluginRegistryAccount, SmartAccount,
};
use crate::validation;
use crate::{HOOK_CONFIG_SEED, INTEGRATION_REGISTRY_SEED, PLUGIN_REGISTRY_SEED};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::AccountMeta;
use anchor_lang::solana_program::program::invoke;

// ================================
// Instruction Handler
// ================================

/// Execute one delegate-class action initiated by an enabled plugin
pub fn execute_root_access(
    ctx: Context<ExecuteRootAccess>,
    target: Pubkey,
    payload: Vec<u8>,
    account_keys: Vec<Pubkey>,
    correlation: [u8; 32],
) -> Result<()> {
    let smart_account = &ctx.accounts.smart_account;
    smart_account.require_active()?;
    validation::validate_action_payload(&payload)?;
    validation::validate_account_count(account_keys.len())?;
    require!(target != crate::ID, ManagerError::ManagerCallForbidden);

    let plugin = ctx.accounts.plugin.key();
    let account_key = smart_account.key();

    // Live re-read of the declared mask; both sides must hold the delegate bit
    let declared = ctx
        .accounts
        .integration_registry
        .declared_permissions(&plugin)?;
    let granted = ctx.accounts.plugin_registry.granted_permissions(&plugin)?;
    permissions::check_root_access(&plugin, declared, granted)?;

    let hook_config = &ctx.accounts.hook_config;
    let hook = hook_config.has_hook().then_some(hook_config.hook);
    let mut hook_context = Vec::new();
    if let Some(hook) = hook {
        let check = HookCheckData::for_plugin(
            account_key,
            plugin,
            EXECUTION_KIND_DELEGATECALL,
            correlation,
        );
        let instruction = interface::pre_check_instruction(&hook, &check)?;
        let hook_info = interface::find_account_info(&hook, ctx.remaining_accounts)?;
        invoke(&instruction, &[hook_info.clone()])?;
        hook_context = interface::read_hook_context(&hook)?;
    }

    let executor_program = smart_account.executor_program;
    let executor_info = interface::find_account_info(&executor_program, ctx.remaining_accounts)?;

    let mut metas = Vec::with_capacity(account_keys.len());
    let mut infos = Vec::with_capacity(account_keys.len() + 1);
    infos.push(executor_info.clone());
    for key in &account_keys {
        let info = interface::find_account_info(key, ctx.remaining_accounts)?;
        metas.push(AccountMeta {
            pubkey: *key,
            is_signer: info.is_signer,
            is_writable: info.is_writable,
        });
        infos.push(info.clone());
    }

    let call = ExecutorCall {
        target,
        value: 0,
        payload,
        is_delegate: true,
    };
    let instruction =
        interface::executor_instruction(&executor_program, &account_key, metas, &call)?;
    invoke(&instruction, &infos).map_err(|_| {
        msg!("Root action targeting {} failed", target);
        error!(ManagerError::RootActionFailed)
    })?;

    if let Some(hook) = hook {
        let instruction =
            interface::post_check_instruction(&hook, &account_key, true, &hook_context)?;
        let hook_info = interface::find_account_info(&hook, ctx.remaining_accounts)?;
        invoke(&instruction, &[hook_info.clone()])?;
    }

    let clock = &ctx.accounts.clock;
    ctx.accounts.smart_account.increment_usage(clock)?;

    emit!(RootAccessExecutedEvent {
        account: account_key,
        plugin,
        correlation,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}

// ================================
// Account Context
// ================================

#[derive(Accounts)]
pub struct ExecuteRootAccess<'info> {
    #[account(mut)]
    pub smart_account: Account<'info, SmartAccount>,

    #[account(
        seeds = [PLUGIN_REGISTRY_SEED, smart_account.key().as_ref()],
        bump = plugin_registry.bump
    )]
    pub plugin_registry: Account<'info, PluginRegistryAccount>,

    #[account(
        seeds = [HOOK_CONFIG_SEED, smart_account.key().as_ref()],
        bump = hook_config.bump
    )]
    pub hook_config: Account<'info, HookConfigAccount>,

    #[account(
        seeds = [INTEGRATION_REGISTRY_SEED],
        bump = integration_registry.bump
    )]
    pub integration_registry: Account<'info, IntegrationRegistryAccount>,

    /// The initiating plugin authenticates by signing
    pub plugin: Signer<'info>,

    pub clock: Sysvar<'info, Clock>,
}
