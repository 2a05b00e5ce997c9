// Smart account state for plugin-kernel execution contexts
//
// A smart account is the entity whose authorization power is being delegated.
// The kernel owns its state PDA and the companion registry/hook/handler PDAs;
// the account's owner controls configuration, and enabled plugins act on the
// account's behalf through the kernel's execution instructions.
//
// KERNEL INTEGRATION: every execution path loads the smart account first,
// checks the active flag, and bumps the usage counter on success. The
// executor_program field names the account/executor collaborator that is the
// sole component allowed to cause effects for this account.
use crate::errors::ManagerError;
use anchor_lang::prelude::*;

// ================================
// Smart Account
// ================================

/// Per-account root state; companion PDAs hold the plugin registry, hook
/// configuration, and function handler table
#[account]
#[derive(Debug)]
pub struct SmartAccount {
    /// Authority controlling configuration (enable/disable, hooks, handlers)
    pub owner: Pubkey,

    /// Executor collaborator program performing calls on the account's behalf
    pub executor_program: Pubkey,

    /// Successful executions, for rate limiting and auditing
    pub usage_count: u64,

    /// Whether this account accepts executions
    pub active: bool,

    /// Creation timestamp
    pub created_at: i64,

    /// Last update timestamp
    pub updated_at: i64,

    /// Version for future upgrades
    pub version: u8,

    /// PDA bump
    pub bump: u8,
}

impl SmartAccount {
    /// Calculate space needed for account allocation
    pub const fn space() -> usize {
        8 +  // discriminator
        32 + // owner
        32 + // executor_program
        8 +  // usage_count
        1 +  // active
        8 +  // created_at
        8 +  // updated_at
        1 +  // version
        1    // bump
    }

    /// Create a new smart account
    #[must_use]
    pub fn new(owner: Pubkey, executor_program: Pubkey, bump: u8, clock: &Clock) -> Self {
        Self {
            owner,
            executor_program,
            usage_count: 0,
            active: true,
            created_at: clock.unix_timestamp,
            updated_at: clock.unix_timestamp,
            version: 1,
            bump,
        }
    }

    /// Reject executions against deactivated accounts
    pub fn require_active(&self) -> Result<()> {
        require!(self.active, ManagerError::AccountInactive);
        Ok(())
    }

    /// Increment usage counter after a successful execution
    pub fn increment_usage(&mut self, clock: &Clock) -> Result<()> {
        self.usage_count = self
            .usage_count
            .checked_add(1)
            .ok_or(ManagerError::UsageLimitExceeded)?;
        self.updated_at = clock.unix_timestamp;
        Ok(())
    }

    /// Deactivate the account; configuration stays readable
    pub fn deactivate(&mut self, clock: &Clock) {
        self.active = false;
        self.updated_at = clock.unix_timestamp;
    }
}
