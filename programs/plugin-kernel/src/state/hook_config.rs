// Per-account hook configuration and the guard-compatibility bridge state
//
// Each smart account may configure one hook program that intercepts every
// authorized execution between a pre-check and a post-check. In the
// single-call shape both checks happen inside one instruction and the opaque
// pre-check context lives on the stack; this account additionally carries the
// only persisted hook state in the system: the pending entry bridging the
// two-call guard-compatibility protocol, where pre-check and post-check
// arrive as independent instructions.
//
// The pending entry snapshots which hook was active at pre-check time, because
// the assignment could change between the two calls; the matching post-check
// consumes the snapshot, not the current assignment. A second pre-check before
// the first is consumed overwrites the entry: last pre-check wins, there is no
// queue.
use crate::errors::ManagerError;
use crate::validation::MAX_HOOK_CONTEXT_SIZE;
use anchor_lang::prelude::*;

// ================================
// Hook Configuration Account
// ================================

/// Per-account hook assignment plus the single in-flight pending entry
#[account]
#[derive(Debug)]
pub struct HookConfigAccount {
    /// The smart account this configuration belongs to
    pub account: Pubkey,

    /// Currently configured hook program; `Pubkey::default()` means none
    pub hook: Pubkey,

    /// Whether a pre-check is awaiting its matching post-check
    pub pending: bool,

    /// Hook that was active when the pending pre-check ran
    pub pending_hook: Pubkey,

    /// Opaque context returned by the pending pre-check
    pub pending_context: [u8; MAX_HOOK_CONTEXT_SIZE],

    /// Length of the stored context
    pub pending_context_len: u16,

    /// Version for future upgrades
    pub version: u8,

    /// PDA bump
    pub bump: u8,
}

impl HookConfigAccount {
    /// Calculate space needed for account allocation
    pub const fn space() -> usize {
        8 +  // discriminator
        32 + // account
        32 + // hook
        1 +  // pending
        32 + // pending_hook
        MAX_HOOK_CONTEXT_SIZE + // pending_context
        2 +  // pending_context_len
        1 +  // version
        1    // bump
    }

    /// Create a new configuration with no hook assigned
    #[must_use]
    pub fn new(account: Pubkey, bump: u8) -> Self {
        Self {
            account,
            hook: Pubkey::default(),
            pending: false,
            pending_hook: Pubkey::default(),
            pending_context: [0u8; MAX_HOOK_CONTEXT_SIZE],
            pending_context_len: 0,
            version: 1,
            bump,
        }
    }

    /// Whether a hook is currently configured
    #[must_use]
    pub fn has_hook(&self) -> bool {
        self.hook != Pubkey::default()
    }

    /// Store the pending pre-check result, overwriting any in-flight entry
    pub fn store_pending(&mut self, hook: Pubkey, context: &[u8]) -> Result<()> {
        require!(
            context.len() <= MAX_HOOK_CONTEXT_SIZE,
            ManagerError::HookContextTooLarge
        );
        self.pending = true;
        self.pending_hook = hook;
        self.pending_context = [0u8; MAX_HOOK_CONTEXT_SIZE];
        self.pending_context[..context.len()].copy_from_slice(context);
        self.pending_context_len = context.len() as u16;
        Ok(())
    }

    /// Consume the pending entry, returning the hook snapshot and context.
    /// Returns None when no pre-check is in flight.
    pub fn take_pending(&mut self) -> Option<(Pubkey, Vec<u8>)> {
        if !self.pending {
            return None;
        }
        let hook = self.pending_hook;
        let context = self.pending_context[..self.pending_context_len as usize].to_vec();
        self.pending = false;
        self.pending_hook = Pubkey::default();
        self.pending_context = [0u8; MAX_HOOK_CONTEXT_SIZE];
        self.pending_context_len = 0;
        Some((hook, context))
    }
}
