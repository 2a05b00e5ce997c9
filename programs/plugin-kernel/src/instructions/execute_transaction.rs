// Gated batch execution on behalf of a smart account
//
// The central operation of the kernel: an enabled plugin submits a batch of
// actions, every action passes the permission double gate, the configured hook
// brackets the batch, and the account's executor program performs the actual
// calls. The batch is atomic: any failing action aborts the whole instruction,
// leaving no partial effects.
//
// SECURITY MODEL: authorization requires the initiating plugin to be (1)
// present and unflagged in the integration registry, (2) enabled in the
// account's plugin registry, and (3) to pass, per action, the double gate of
// currently-declared and enable-time-granted masks. The kernel itself is never
// a valid target; calls back into the manager cannot be smuggled through a
// batch.
use crate::errors::ManagerError;
use crate::events::TransactionExecutedEvent;
use crate::interface::{self, ExecutorCall, HookCheckData, EXECUTION_KIND_CALL};
use crate::permissions::{self, PERMISSION_CALL_TO_SELF, PERMISSION_EXECUTE_CALL};
use crate::state::{
    HookConfigAccount, IntegrationRegistryAccount, PluginRegistryAccount, SmartAccount,
};
use crate::validation;
use crate::{
    HOOK_CONFIG_SEED, INTEGRATION_REGISTRY_SEED, MAX_BATCH_ACTIONS, PLUGIN_REGISTRY_SEED,
};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::AccountMeta;
use anchor_lang::solana_program::program::invoke;

// ================================
// Batch Types
// ================================

/// One action inside a batch: a call the executor performs for the account
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct PluginAction {
    /// Address the account is calling
    pub target: Pubkey,
    /// Value forwarded with the call, opaque to the kernel
    pub value: u64,
    /// Call payload forwarded verbatim
    pub payload: Vec<u8>,
    /// Indices into the batch account list naming the accounts this action
    /// touches
    pub account_indices: Vec<u8>,
}

impl PluginAction {
    /// Bounds-check the action against the batch account list
    pub fn validate(&self, accounts_len: usize) -> Result<()> {
        validation::validate_action_payload(&self.payload)?;
        validation::validate_account_indices(&self.account_indices, accounts_len)?;
        Ok(())
    }
}

/// An atomic batch of actions sharing one account list and correlation hash
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct ActionBatch {
    /// Deduplicated account list actions index into
    pub accounts: Vec<Pubkey>,
    /// Actions executed in order
    pub actions: Vec<PluginAction>,
    /// Caller-supplied correlation hash threaded through hook checks and events
    pub correlation: [u8; 32],
}

impl ActionBatch {
    /// Structural validation before any permission check or CPI
    pub fn validate(&self) -> Result<()> {
        require!(!self.actions.is_empty(), ManagerError::EmptyBatch);
        require!(
            self.actions.len() <= MAX_BATCH_ACTIONS,
            ManagerError::BatchTooLarge
        );
        validation::validate_account_count(self.accounts.len())?;
        for action in &self.actions {
            action.validate(self.accounts.len())?;
        }
        Ok(())
    }
}

// ================================
// Instruction Handler
// ================================

/// Execute a validated action batch initiated by an enabled plugin
pub fn execute_transaction(ctx: Context<ExecuteTransaction>, batch: ActionBatch) -> Result<()> {
    let smart_account = &ctx.accounts.smart_account;
    smart_account.require_active()?;
    batch.validate()?;

    let plugin = ctx.accounts.plugin.key();
    let account_key = smart_account.key();

    // Gate 1: registry vetting, with the plugin's live declared mask
    let declared = ctx
        .accounts
        .integration_registry
        .declared_permissions(&plugin)?;

    // Gate 2: the frozen mask granted when the account enabled the plugin
    let granted = ctx.accounts.plugin_registry.granted_permissions(&plugin)?;

    // Gate 3: per-action class check against both masks
    for action in &batch.actions {
        let required = classify_action(&action.target, &account_key)?;
        permissions::check_permission(&plugin, declared, granted, required)?;
    }

    // Pre-check brackets the whole batch; its context is echoed to post-check.
    // Inline checks never touch the pending entry, which belongs to the split
    // protocol in manage_hook.
    let hook_config = &ctx.accounts.hook_config;
    let hook = hook_config.has_hook().then_some(hook_config.hook);
    let mut hook_context = Vec::new();
    if let Some(hook) = hook {
        let check =
            HookCheckData::for_plugin(account_key, plugin, EXECUTION_KIND_CALL, batch.correlation);
        let instruction = interface::pre_check_instruction(&hook, &check)?;
        let hook_info = interface::find_account_info(&hook, ctx.remaining_accounts)?;
        invoke(&instruction, &[hook_info.clone()])?;
        hook_context = interface::read_hook_context(&hook)?;
    }

    let executor_program = smart_account.executor_program;
    let executor_info = interface::find_account_info(&executor_program, ctx.remaining_accounts)?;

    for (index, action) in batch.actions.iter().enumerate() {
        let mut metas = Vec::with_capacity(action.account_indices.len());
        let mut infos = Vec::with_capacity(action.account_indices.len() + 1);
        infos.push(executor_info.clone());

        for &account_index in &action.account_indices {
            let key = batch.accounts[account_index as usize];
            let info = interface::find_account_info(&key, ctx.remaining_accounts)?;
            metas.push(AccountMeta {
                pubkey: key,
                is_signer: info.is_signer,
                is_writable: info.is_writable,
            });
            infos.push(info.clone());
        }

        let call = ExecutorCall {
            target: action.target,
            value: action.value,
            payload: action.payload.clone(),
            is_delegate: false,
        };
        let instruction =
            interface::executor_instruction(&executor_program, &account_key, metas, &call)?;
        invoke(&instruction, &infos).map_err(|_| {
            msg!("Action {} targeting {} failed", index, action.target);
            error!(ManagerError::ActionFailed)
        })?;
    }

    if let Some(hook) = hook {
        let instruction =
            interface::post_check_instruction(&hook, &account_key, true, &hook_context)?;
        let hook_info = interface::find_account_info(&hook, ctx.remaining_accounts)?;
        invoke(&instruction, &[hook_info.clone()])?;
    }

    let clock = &ctx.accounts.clock;
    ctx.accounts.smart_account.increment_usage(clock)?;

    emit!(TransactionExecutedEvent {
        account: account_key,
        plugin,
        correlation: batch.correlation,
        action_count: batch.actions.len() as u8,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}

/// Map an action target to the permission bit it requires
pub fn classify_action(target: &Pubkey, smart_account: &Pubkey) -> Result<u8> {
    if *target == crate::ID {
        return Err(ManagerError::ManagerCallForbidden.into());
    }
    if target == smart_account {
        return Ok(PERMISSION_CALL_TO_SELF);
    }
    Ok(PERMISSION_EXECUTE_CALL)
}

// ================================
// Account Context
// ================================

#[derive(Accounts)]
pub struct ExecuteTransaction<'info> {
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
