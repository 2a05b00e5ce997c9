// Manage the global integration registry
//
// Authority-gated curation of the allowlist the kernel consults before any
// external code unit gains influence over an account. Plugins additionally
// maintain their self-declared permission requirement here; the declaration
// is read at enable time and re-read for root access at call time.
use crate::errors::ManagerError;
use crate::events::{IntegrationFlaggedEvent, IntegrationRegisteredEvent};
use crate::permissions;
use crate::state::IntegrationRegistryAccount;
use crate::INTEGRATION_REGISTRY_SEED;
use anchor_lang::prelude::*;

// ================================
// Instruction Handlers
// ================================

/// Register an integration of a given kind
pub fn register_integration(
    ctx: Context<ManageRegistry>,
    address: Pubkey,
    kind: u8,
    declared_permissions: u8,
) -> Result<()> {
    require!(
        permissions::is_valid_mask(declared_permissions),
        ManagerError::PermissionMismatch
    );

    let clock = &ctx.accounts.clock;
    let registry = &mut ctx.accounts.integration_registry;
    registry.register(address, kind, declared_permissions, clock)?;

    emit!(IntegrationRegisteredEvent {
        address,
        kind,
        declared_permissions,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}

/// Remove an integration entirely
pub fn remove_integration(ctx: Context<ManageRegistry>, address: Pubkey) -> Result<()> {
    ctx.accounts.integration_registry.remove(&address)
}

/// Flag an integration as compromised
pub fn flag_integration(ctx: Context<ManageRegistry>, address: Pubkey) -> Result<()> {
    let clock = &ctx.accounts.clock;
    ctx.accounts.integration_registry.flag(&address, clock)?;

    emit!(IntegrationFlaggedEvent {
        address,
        flagged_at: clock.unix_timestamp,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}

/// Clear an integration's flag
pub fn unflag_integration(ctx: Context<ManageRegistry>, address: Pubkey) -> Result<()> {
    let clock = &ctx.accounts.clock;
    ctx.accounts.integration_registry.unflag(&address)?;

    emit!(IntegrationFlaggedEvent {
        address,
        flagged_at: 0,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}

/// Update a plugin's self-declared permission requirement.
/// The declaration changes what future enables may grant and what root access
/// accepts; already-granted masks stay frozen.
pub fn set_declared_permissions(
    ctx: Context<ManageRegistry>,
    address: Pubkey,
    declared_permissions: u8,
) -> Result<()> {
    require!(
        permissions::is_valid_mask(declared_permissions),
        ManagerError::PermissionMismatch
    );
    ctx.accounts
        .integration_registry
        .set_declared_permissions(&address, declared_permissions)
}

// ================================
// Account Context
// ================================

#[derive(Accounts)]
pub struct ManageRegistry<'info> {
    #[account(
        mut,
        seeds = [INTEGRATION_REGISTRY_SEED],
        bump = integration_registry.bump,
        has_one = authority
    )]
    pub integration_registry: Account<'info, IntegrationRegistryAccount>,

    pub authority: Signer<'info>,

    pub clock: Sysvar<'info, Clock>,
}
