// Per-account function handler table for unrecognized-call dispatch
//
// Calls the kernel does not recognize are forwarded to a handler program the
// account has registered for the call's selector. The table is a fixed slot
// array keyed by the 8-byte method discriminator, the platform equivalent of
// the 4-byte function selector.
use crate::errors::ManagerError;
use crate::MAX_FUNCTION_HANDLERS;
use anchor_lang::prelude::*;

// ================================
// Handler Entries
// ================================

/// One selector-to-handler assignment
#[derive(Debug, Clone, Copy, AnchorSerialize, AnchorDeserialize, Default, PartialEq, Eq)]
pub struct HandlerEntry {
    /// Method discriminator this handler serves
    pub selector: [u8; 8],
    /// Handler program; `Pubkey::default()` marks a free slot
    pub handler: Pubkey,
}

impl HandlerEntry {
    pub const EMPTY: Self = Self {
        selector: [0u8; 8],
        handler: Pubkey::new_from_array([0u8; 32]),
    };

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handler == Pubkey::default()
    }
}

// ================================
// Handler Table Account
// ================================

/// Per-account selector→handler table PDA
#[account]
#[derive(Debug)]
pub struct HandlerTableAccount {
    /// The smart account this table belongs to
    pub account: Pubkey,

    /// Fixed slot array of assignments
    pub entries: [HandlerEntry; MAX_FUNCTION_HANDLERS],

    /// Version for future upgrades
    pub version: u8,

    /// PDA bump
    pub bump: u8,
}

impl HandlerTableAccount {
    /// Calculate space needed for account allocation
    pub const fn space() -> usize {
        8 +  // discriminator
        32 + // account
        (8 + 32) * MAX_FUNCTION_HANDLERS + // entries
        1 +  // version
        1    // bump
    }

    /// Create a new, empty table
    #[must_use]
    pub fn new(account: Pubkey, bump: u8) -> Self {
        Self {
            account,
            entries: [HandlerEntry::EMPTY; MAX_FUNCTION_HANDLERS],
            version: 1,
            bump,
        }
    }

    fn slot_of(&self, selector: [u8; 8]) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| !e.is_empty() && e.selector == selector)
    }

    /// Handler registered for a selector, if any
    #[must_use]
    pub fn handler_for(&self, selector: [u8; 8]) -> Option<Pubkey> {
        self.slot_of(selector).map(|i| self.entries[i].handler)
    }

    /// Assign a handler for a selector, replacing any previous assignment.
    /// A default handler address clears the entry.
    pub fn set_handler(&mut self, selector: [u8; 8], handler: Pubkey) -> Result<()> {
        if let Some(slot) = self.slot_of(selector) {
            if handler == Pubkey::default() {
                self.entries[slot] = HandlerEntry::EMPTY;
            } else {
                self.entries[slot].handler = handler;
            }
            return Ok(());
        }

        if handler == Pubkey::default() {
            // Clearing an unset selector is a no-op
            return Ok(());
        }

        let slot = self
            .entries
            .iter()
            .position(HandlerEntry::is_empty)
            .ok_or(ManagerError::HandlerTableFull)?;
        self.entries[slot] = HandlerEntry { selector, handler };
        Ok(())
    }
}
