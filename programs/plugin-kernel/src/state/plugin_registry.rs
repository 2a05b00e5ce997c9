// Per-account plugin registry for plugin-kernel authorization
//
// Each smart account owns one registry PDA tracking which plugins are enabled
// and with what granted permission mask. Enabled plugins form a
// sentinel-headed singly linked list materialized over a fixed slot array:
// the list gives O(1) head insertion, O(1) caller-supplied-predecessor
// removal, and cursor-based pagination bounded to one page per call.
//
// KERNEL INTEGRATION: execution instructions consult is_enabled and the
// granted mask on entry; only enable/disable instructions originating from the
// account owner mutate the registry.
//
// Every single store leaves the chain valid: a newly inserted record becomes
// reachable only when the sentinel pointer is updated, and removal rewires the
// predecessor before the removed record is zeroed, so a reentrant call never
// observes a partially linked entry.
use crate::errors::ManagerError;
use crate::MAX_ENABLED_PLUGINS;
use anchor_lang::prelude::*;

/// Reserved address heading and terminating each account's plugin list.
/// Never a real plugin; never enabled.
pub const SENTINEL_PLUGIN: Pubkey = Pubkey::new_from_array([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
]);

// ================================
// Access Records
// ================================

/// One enabled plugin's registry entry. `next == Pubkey::default()` means the
/// plugin is not enabled; the chain terminates at `SENTINEL_PLUGIN`.
#[derive(Debug, Clone, Copy, AnchorSerialize, AnchorDeserialize, Default, PartialEq, Eq)]
pub struct AccessRecord {
    /// The plugin this record belongs to; `Pubkey::default()` marks a free slot
    pub plugin: Pubkey,
    /// Granted permission mask, frozen at enable time
    pub permissions: u8,
    /// Next plugin in the chain, or the sentinel at the tail
    pub next: Pubkey,
}

impl AccessRecord {
    pub const EMPTY: Self = Self {
        plugin: Pubkey::new_from_array([0u8; 32]),
        permissions: 0,
        next: Pubkey::new_from_array([0u8; 32]),
    };

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugin == Pubkey::default()
    }
}

/// One page of enabled plugins plus the resume cursor. `next` is the sentinel
/// when enumeration is complete, otherwise the last address in `plugins`.
#[derive(Debug, Clone, AnchorSerialize, AnchorDeserialize, PartialEq, Eq)]
pub struct PluginPage {
    pub plugins: Vec<Pubkey>,
    pub next: Pubkey,
}

// ================================
// Registry Account
// ================================

/// Per-account plugin registry PDA
#[account]
#[derive(Debug)]
pub struct PluginRegistryAccount {
    /// The smart account this registry belongs to
    pub account: Pubkey,

    /// The sentinel's own record: head pointer of the chain.
    /// `Pubkey::default()` means the list was never initialized.
    pub sentinel_next: Pubkey,

    /// Fixed slot array backing the chain
    pub records: [AccessRecord; MAX_ENABLED_PLUGINS],

    /// Version for future upgrades
    pub version: u8,

    /// PDA bump
    pub bump: u8,
}

impl PluginRegistryAccount {
    /// Calculate space needed for account allocation
    pub const fn space() -> usize {
        8 +  // discriminator
        32 + // account
        32 + // sentinel_next
        (32 + 1 + 32) * MAX_ENABLED_PLUGINS + // records
        1 +  // version
        1    // bump
    }

    /// Create a new, empty registry
    #[must_use]
    pub fn new(account: Pubkey, bump: u8) -> Self {
        Self {
            account,
            sentinel_next: Pubkey::default(),
            records: [AccessRecord::EMPTY; MAX_ENABLED_PLUGINS],
            version: 1,
            bump,
        }
    }

    fn slot_of(&self, plugin: &Pubkey) -> Option<usize> {
        self.records
            .iter()
            .position(|r| !r.is_empty() && r.plugin == *plugin)
    }

    /// Reject the null address and the sentinel where a real plugin is required
    pub fn require_real_plugin(plugin: &Pubkey) -> Result<()> {
        require!(
            *plugin != Pubkey::default() && *plugin != SENTINEL_PLUGIN,
            ManagerError::InvalidPluginAddress
        );
        Ok(())
    }

    /// True iff the plugin's record is linked into the chain
    #[must_use]
    pub fn is_enabled(&self, plugin: &Pubkey) -> bool {
        if *plugin == SENTINEL_PLUGIN || *plugin == Pubkey::default() {
            return false;
        }
        self.slot_of(plugin)
            .is_some_and(|i| self.records[i].next != Pubkey::default())
    }

    /// The record a chain address points at; `None` for unknown addresses
    #[must_use]
    pub fn next_of(&self, addr: &Pubkey) -> Option<Pubkey> {
        if *addr == SENTINEL_PLUGIN {
            return Some(self.sentinel_next);
        }
        self.slot_of(addr).map(|i| self.records[i].next)
    }

    /// Granted permissions and next pointer for a plugin; unknown plugins read
    /// as the zeroed record
    #[must_use]
    pub fn plugin_info(&self, plugin: &Pubkey) -> (u8, Pubkey) {
        match self.slot_of(plugin) {
            Some(i) => (self.records[i].permissions, self.records[i].next),
            None => (0, Pubkey::default()),
        }
    }

    /// Granted permission mask for an enabled plugin
    pub fn granted_permissions(&self, plugin: &Pubkey) -> Result<u8> {
        require!(self.is_enabled(plugin), ManagerError::PluginNotEnabled);
        let slot = self
            .slot_of(plugin)
            .ok_or(ManagerError::PluginNotEnabled)?;
        Ok(self.records[slot].permissions)
    }

    /// Head-insert a plugin with its granted mask
    pub fn enable(&mut self, plugin: Pubkey, permissions: u8) -> Result<()> {
        Self::require_real_plugin(&plugin)?;
        require!(!self.is_enabled(&plugin), ManagerError::PluginAlreadyEnabled);

        let slot = self
            .records
            .iter()
            .position(AccessRecord::is_empty)
            .ok_or(ManagerError::RegistryFull)?;

        // Empty-list bootstrap: the sentinel initially points at itself
        if self.sentinel_next == Pubkey::default() {
            self.sentinel_next = SENTINEL_PLUGIN;
        }

        // The record is unreachable until the sentinel pointer moves
        self.records[slot] = AccessRecord {
            plugin,
            permissions,
            next: self.sentinel_next,
        };
        self.sentinel_next = plugin;
        Ok(())
    }

    /// Splice a plugin out given its current predecessor in the chain.
    /// The removed record's pointer and permissions move onto the predecessor
    /// (the sentinel takes only the pointer), then the record is zeroed so the
    /// plugin is eligible for re-enable.
    pub fn disable(&mut self, prev_plugin: &Pubkey, plugin: &Pubkey) -> Result<()> {
        Self::require_real_plugin(plugin)?;

        let points_at_plugin = self.next_of(prev_plugin) == Some(*plugin);
        require!(points_at_plugin, ManagerError::InvalidPrevPluginAddress);

        let slot = self
            .slot_of(plugin)
            .ok_or(ManagerError::InvalidPrevPluginAddress)?;
        let removed = self.records[slot];

        if *prev_plugin == SENTINEL_PLUGIN {
            self.sentinel_next = removed.next;
        } else {
            let prev_slot = self
                .slot_of(prev_plugin)
                .ok_or(ManagerError::InvalidPrevPluginAddress)?;
            self.records[prev_slot].next = removed.next;
            self.records[prev_slot].permissions = removed.permissions;
        }

        self.records[slot] = AccessRecord::EMPTY;
        Ok(())
    }

    /// Walk the chain after `start`, collecting up to `page_size` plugins.
    /// Memory and iteration are bounded per call; feeding `next` back as
    /// `start` resumes enumeration.
    pub fn list_paginated(&self, start: &Pubkey, page_size: usize) -> Result<PluginPage> {
        require!(page_size > 0, ManagerError::ZeroPageSize);
        require!(
            *start == SENTINEL_PLUGIN || self.is_enabled(start),
            ManagerError::InvalidPluginAddress
        );

        let mut plugins = Vec::with_capacity(page_size.min(MAX_ENABLED_PLUGINS));
        // An uninitialized list reads as the null pointer and yields no page
        let mut cursor = self.next_of(start).unwrap_or_default();

        while plugins.len() < page_size
            && cursor != SENTINEL_PLUGIN
            && cursor != Pubkey::default()
        {
            plugins.push(cursor);
            cursor = self.next_of(&cursor).unwrap_or_default();
        }

        let next = if cursor == SENTINEL_PLUGIN || cursor == Pubkey::default() {
            SENTINEL_PLUGIN
        } else {
            // Page filled mid-chain: resume from the last address returned
            *plugins.last().ok_or(ManagerError::InvalidPluginAddress)?
        };

        Ok(PluginPage { plugins, next })
    }
}
