//! # Plugin Kernel
//!
//! Minimal on-chain kernel for smart account plugin management. Accounts
//! delegate authorization power to external plugin programs under a strict
//! permission model; the kernel decides, collaborators act:
//!
//! - **Plugin registry**: per-account chain of enabled plugins with frozen
//!   permission grants, O(1) insertion and removal, paginated enumeration
//! - **Permission double gate**: every action needs its bit in both the
//!   plugin's live declared mask and the enable-time granted mask
//! - **Hooks**: optional per-account interception bracketing every execution,
//!   inline or via a persisted two-call bridge
//! - **Integration registry**: singleton allowlist vetting every plugin,
//!   hook, and function handler before it gains influence
//! - **Executor boundary**: the kernel never causes effects itself; all calls
//!   go through the account's configured executor program
//!
//! ## Architecture
//!
//! State lives in PDAs: one root account per owner plus companion PDAs for
//! the plugin registry, hook configuration, and function handler table, and
//! one global integration registry. Instruction handlers stay thin; the
//! authorization logic lives in pure state methods that unit tests exercise
//! directly.

#![allow(clippy::result_large_err)]

use anchor_lang::prelude::*;

pub mod errors;
pub mod events;
pub mod instructions;
pub mod interface;
pub mod permissions;
pub mod state;
pub mod validation;

#[cfg(test)]
mod tests;

use instructions::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

// ================================
// Capacity Limits
// ================================

/// Maximum plugins enabled per account
pub const MAX_ENABLED_PLUGINS: usize = 16;

/// Maximum integrations in the global registry
pub const MAX_REGISTERED_INTEGRATIONS: usize = 32;

/// Maximum function handlers per account
pub const MAX_FUNCTION_HANDLERS: usize = 16;

/// Maximum actions in one batch
pub const MAX_BATCH_ACTIONS: usize = 8;

/// Maximum accounts in one batch account list
pub const MAX_BATCH_ACCOUNTS: usize = 16;

// ================================
// PDA Seeds
// ================================

pub const INTEGRATION_REGISTRY_SEED: &[u8] = b"integration_registry";
pub const SMART_ACCOUNT_SEED: &[u8] = b"smart_account";
pub const PLUGIN_REGISTRY_SEED: &[u8] = b"plugin_registry";
pub const HOOK_CONFIG_SEED: &[u8] = b"hook_config";
pub const HANDLER_TABLE_SEED: &[u8] = b"handler_table";

#[program]
pub mod plugin_kernel {
    use super::*;

    // ================================
    // Bootstrap
    // ================================

    pub fn initialize_registry(ctx: Context<InitializeRegistry>) -> Result<()> {
        instructions::initialize_registry(ctx)
    }

    // ================================
    // Account Lifecycle
    // ================================

    pub fn create_account(ctx: Context<CreateAccount>, executor_program: Pubkey) -> Result<()> {
        instructions::create_account(ctx, executor_program)
    }

    pub fn deactivate_account(ctx: Context<DeactivateAccount>) -> Result<()> {
        instructions::deactivate_account(ctx)
    }

    // ================================
    // Integration Registry
    // ================================

    pub fn register_integration(
        ctx: Context<ManageRegistry>,
        address: Pubkey,
        kind: u8,
        declared_permissions: u8,
    ) -> Result<()> {
        instructions::register_integration(ctx, address, kind, declared_permissions)
    }

    pub fn remove_integration(ctx: Context<ManageRegistry>, address: Pubkey) -> Result<()> {
        instructions::remove_integration(ctx, address)
    }

    pub fn flag_integration(ctx: Context<ManageRegistry>, address: Pubkey) -> Result<()> {
        instructions::flag_integration(ctx, address)
    }

    pub fn unflag_integration(ctx: Context<ManageRegistry>, address: Pubkey) -> Result<()> {
        instructions::unflag_integration(ctx, address)
    }

    pub fn set_declared_permissions(
        ctx: Context<ManageRegistry>,
        address: Pubkey,
        declared_permissions: u8,
    ) -> Result<()> {
        instructions::set_declared_permissions(ctx, address, declared_permissions)
    }

    // ================================
    // Plugin Management
    // ================================

    pub fn enable_plugin(
        ctx: Context<ManagePlugins>,
        plugin: Pubkey,
        permissions_mask: u8,
    ) -> Result<()> {
        instructions::enable_plugin(ctx, plugin, permissions_mask)
    }

    pub fn disable_plugin(
        ctx: Context<ManagePlugins>,
        prev_plugin: Pubkey,
        plugin: Pubkey,
    ) -> Result<()> {
        instructions::disable_plugin(ctx, prev_plugin, plugin)
    }

    pub fn get_plugin_info(ctx: Context<ViewPlugins>, plugin: Pubkey) -> Result<()> {
        instructions::get_plugin_info(ctx, plugin)
    }

    pub fn list_plugins(ctx: Context<ViewPlugins>, start: Pubkey, page_size: u32) -> Result<()> {
        instructions::list_plugins(ctx, start, page_size)
    }

    // ================================
    // Hooks
    // ================================

    pub fn set_hook(ctx: Context<SetHook>, hook: Pubkey) -> Result<()> {
        instructions::set_hook(ctx, hook)
    }

    pub fn pre_transaction_check(ctx: Context<HookBridge>, correlation: [u8; 32]) -> Result<()> {
        instructions::pre_transaction_check(ctx, correlation)
    }

    pub fn post_transaction_check(ctx: Context<HookBridge>, success: bool) -> Result<()> {
        instructions::post_transaction_check(ctx, success)
    }

    // ================================
    // Function Handlers
    // ================================

    pub fn set_function_handler(
        ctx: Context<SetFunctionHandler>,
        selector: [u8; 8],
        handler: Pubkey,
    ) -> Result<()> {
        instructions::set_function_handler(ctx, selector, handler)
    }

    pub fn dispatch_fallback(ctx: Context<DispatchFallback>, data: Vec<u8>) -> Result<()> {
        instructions::dispatch_fallback(ctx, data)
    }

    // ================================
    // Execution
    // ================================

    pub fn execute_transaction(ctx: Context<ExecuteTransaction>, batch: ActionBatch) -> Result<()> {
        instructions::execute_transaction(ctx, batch)
    }

    pub fn execute_root_access(
        ctx: Context<ExecuteRootAccess>,
        target: Pubkey,
        payload: Vec<u8>,
        account_keys: Vec<Pubkey>,
        correlation: [u8; 32],
    ) -> Result<()> {
        instructions::execute_root_access(ctx, target, payload, account_keys, correlation)
    }
}
