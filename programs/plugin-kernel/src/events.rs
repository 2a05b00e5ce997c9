use anchor_lang::prelude::*;

// ================================
// Kernel Events
// ================================

/// Emitted when a smart account and its companion state PDAs are created
#[event]
pub struct AccountCreatedEvent {
    pub account: Pubkey,                   // The newly created smart account
    pub owner: Pubkey,                     // Authority controlling configuration
    pub executor_program: Pubkey,          // Executor collaborator for this account
    pub timestamp: i64,
}

/// Emitted when a plugin is enabled for an account
/// Provides audit trail for the granted permission mask
#[event]
pub struct PluginEnabledEvent {
    pub account: Pubkey,
    pub plugin: Pubkey,
    pub permissions: u8,                   // Granted mask, frozen until disable
    pub timestamp: i64,
}

/// Emitted when a plugin is disabled for an account
#[event]
pub struct PluginDisabledEvent {
    pub account: Pubkey,
    pub plugin: Pubkey,
    pub timestamp: i64,
}

/// Emitted when an account's hook assignment changes
#[event]
pub struct HookUpdatedEvent {
    pub account: Pubkey,
    pub hook: Pubkey,                      // Pubkey::default() means cleared
    pub timestamp: i64,
}

/// Emitted after a fully successful non-privileged action batch
#[event]
pub struct TransactionExecutedEvent {
    pub account: Pubkey,
    pub plugin: Pubkey,                    // Initiating plugin
    pub correlation: [u8; 32],             // Caller-supplied correlation hash
    pub action_count: u8,
    pub timestamp: i64,
}

/// Emitted after a successful delegate-class (root access) action
#[event]
pub struct RootAccessExecutedEvent {
    pub account: Pubkey,
    pub plugin: Pubkey,
    pub correlation: [u8; 32],
    pub timestamp: i64,
}

/// Emitted when a function handler assignment changes
#[event]
pub struct FunctionHandlerUpdatedEvent {
    pub account: Pubkey,
    pub selector: [u8; 8],
    pub handler: Pubkey,                   // Pubkey::default() means cleared
    pub timestamp: i64,
}

/// Emitted when an integration is added to the global registry
#[event]
pub struct IntegrationRegisteredEvent {
    pub address: Pubkey,
    pub kind: u8,
    pub declared_permissions: u8,
    pub timestamp: i64,
}

/// Emitted when an integration is flagged or unflagged
#[event]
pub struct IntegrationFlaggedEvent {
    pub address: Pubkey,
    pub flagged_at: i64,                   // 0 means the flag was cleared
    pub timestamp: i64,
}
