// Plugin enable/disable and registry enumeration
//
// Registry mutations originate from the account owner only. Enable runs the
// full gate sequence: real-address check, integration-registry vetting (the
// capability probe), exact-match of requested against declared permissions,
// then the O(1) head insertion. Disable requires the caller to supply the
// plugin's current predecessor, the cost of O(1) removal in a singly linked
// chain.
use crate::errors::ManagerError;
use crate::events::{PluginDisabledEvent, PluginEnabledEvent};
use crate::permissions;
use crate::state::{
    IntegrationRegistryAccount, PluginRegistryAccount, SmartAccount,
};
use crate::{INTEGRATION_REGISTRY_SEED, PLUGIN_REGISTRY_SEED};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::set_return_data;
use anchor_lang::solana_program::program_error::ProgramError;

// ================================
// Instruction Handlers
// ================================

/// Enable a plugin with the requested permission mask
pub fn enable_plugin(ctx: Context<ManagePlugins>, plugin: Pubkey, permissions_mask: u8) -> Result<()> {
    PluginRegistryAccount::require_real_plugin(&plugin)?;
    require!(
        permissions::is_valid_mask(permissions_mask),
        ManagerError::PermissionMismatch
    );

    // Vet the plugin and probe its self-declared requirement
    let declared = ctx
        .accounts
        .integration_registry
        .declared_permissions(&plugin)?;
    permissions::check_requested_matches_declared(permissions_mask, declared)?;

    ctx.accounts
        .plugin_registry
        .enable(plugin, permissions_mask)?;

    emit!(PluginEnabledEvent {
        account: ctx.accounts.smart_account.key(),
        plugin,
        permissions: permissions_mask,
        timestamp: ctx.accounts.clock.unix_timestamp,
    });
    Ok(())
}

/// Disable a plugin given its current predecessor in the chain
pub fn disable_plugin(
    ctx: Context<ManagePlugins>,
    prev_plugin: Pubkey,
    plugin: Pubkey,
) -> Result<()> {
    ctx.accounts.plugin_registry.disable(&prev_plugin, &plugin)?;

    emit!(PluginDisabledEvent {
        account: ctx.accounts.smart_account.key(),
        plugin,
        timestamp: ctx.accounts.clock.unix_timestamp,
    });
    Ok(())
}

/// A plugin's granted mask and chain pointer, returned via return data
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PluginInfo {
    pub enabled: bool,
    pub permissions: u8,
    pub next: Pubkey,
}

/// Read a plugin's registry record
pub fn get_plugin_info(ctx: Context<ViewPlugins>, plugin: Pubkey) -> Result<()> {
    let registry = &ctx.accounts.plugin_registry;
    let (permissions_mask, next) = registry.plugin_info(&plugin);
    let info = PluginInfo {
        enabled: registry.is_enabled(&plugin),
        permissions: permissions_mask,
        next,
    };

    let encoded = info
        .try_to_vec()
        .map_err(|e| ProgramError::BorshIoError(e.to_string()))?;
    set_return_data(&encoded);
    Ok(())
}

/// Enumerate enabled plugins one bounded page at a time
pub fn list_plugins(ctx: Context<ViewPlugins>, start: Pubkey, page_size: u32) -> Result<()> {
    let page = ctx
        .accounts
        .plugin_registry
        .list_paginated(&start, page_size as usize)?;

    msg!("Listed {} plugins, next cursor {}", page.plugins.len(), page.next);

    let encoded = page
        .try_to_vec()
        .map_err(|e| ProgramError::BorshIoError(e.to_string()))?;
    set_return_data(&encoded);
    Ok(())
}

// ================================
// Account Contexts
// ================================

#[derive(Accounts)]
pub struct ManagePlugins<'info> {
    #[account(has_one = owner)]
    pub smart_account: Account<'info, SmartAccount>,

    #[account(
        mut,
        seeds = [PLUGIN_REGISTRY_SEED, smart_account.key().as_ref()],
        bump = plugin_registry.bump
    )]
    pub plugin_registry: Account<'info, PluginRegistryAccount>,

    #[account(
        seeds = [INTEGRATION_REGISTRY_SEED],
        bump = integration_registry.bump
    )]
    pub integration_registry: Account<'info, IntegrationRegistryAccount>,

    pub owner: Signer<'info>,

    pub clock: Sysvar<'info, Clock>,
}

#[derive(Accounts)]
pub struct ViewPlugins<'info> {
    pub smart_account: Account<'info, SmartAccount>,

    #[account(
        seeds = [PLUGIN_REGISTRY_SEED, smart_account.key().as_ref()],
        bump = plugin_registry.bump
    )]
    pub plugin_registry: Account<'info, PluginRegistryAccount>,
}
