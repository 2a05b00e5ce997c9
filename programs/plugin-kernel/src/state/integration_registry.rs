// Global integration registry for plugin-kernel collaborator vetting
//
// The kernel consults this singleton before any external code unit gains
// influence over an account: plugins at enable time and on every gated
// execution, hooks at assignment time, function handlers at registration.
// A strict allowlist: unknown, flagged, or wrong-kind addresses fail the
// calling operation.
//
// The registry also carries each plugin's self-declared permission
// requirement. This is the capability probe of the plugin collaborator
// interface: enable reads it to enforce the exact-match grant rule, and root
// access re-reads it at call time to reject stale elevated grants.
use crate::errors::ManagerError;
use crate::MAX_REGISTERED_INTEGRATIONS;
use anchor_lang::prelude::*;

// ================================
// Integration Kinds
// ================================

pub const INTEGRATION_KIND_PLUGIN: u8 = 1;
pub const INTEGRATION_KIND_HOOK: u8 = 2;
pub const INTEGRATION_KIND_FUNCTION_HANDLER: u8 = 3;

// ================================
// Registry Entries
// ================================

/// One vetted external code unit
#[derive(Debug, Clone, Copy, AnchorSerialize, AnchorDeserialize, Default, PartialEq, Eq)]
pub struct IntegrationEntry {
    /// The integration's address; `Pubkey::default()` marks a free slot
    pub address: Pubkey,
    /// Integration class (plugin, hook, function handler)
    pub kind: u8,
    /// Self-declared permission requirement; meaningful for plugins only
    pub declared_permissions: u8,
    /// When the integration was registered
    pub registered_at: i64,
    /// Non-zero when the integration has been flagged as compromised
    pub flagged_at: i64,
}

impl IntegrationEntry {
    pub const EMPTY: Self = Self {
        address: Pubkey::new_from_array([0u8; 32]),
        kind: 0,
        declared_permissions: 0,
        registered_at: 0,
        flagged_at: 0,
    };

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.address == Pubkey::default()
    }
}

// ================================
// Registry Account
// ================================

/// Singleton registry of permitted integrations
#[account]
#[derive(Debug)]
pub struct IntegrationRegistryAccount {
    /// Authority that can modify the registry
    pub authority: Pubkey,

    /// Fixed slot array of vetted integrations
    pub entries: [IntegrationEntry; MAX_REGISTERED_INTEGRATIONS],

    /// Version for future upgrades
    pub version: u8,

    /// PDA bump
    pub bump: u8,
}

impl IntegrationRegistryAccount {
    /// Calculate space needed for account allocation
    pub const fn space() -> usize {
        8 +  // discriminator
        32 + // authority
        (32 + 1 + 1 + 8 + 8) * MAX_REGISTERED_INTEGRATIONS + // entries
        1 +  // version
        1    // bump
    }

    /// Initialize a new, empty registry
    #[must_use]
    pub fn new(authority: Pubkey, bump: u8) -> Self {
        Self {
            authority,
            entries: [IntegrationEntry::EMPTY; MAX_REGISTERED_INTEGRATIONS],
            version: 1,
            bump,
        }
    }

    fn slot_of(&self, address: &Pubkey) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| !e.is_empty() && e.address == *address)
    }

    /// Look up an entry by address
    #[must_use]
    pub fn entry(&self, address: &Pubkey) -> Option<&IntegrationEntry> {
        self.slot_of(address).map(|i| &self.entries[i])
    }

    /// Registry collaborator query: `(allowed, flagged_at)` for an address of
    /// the expected kind. Unknown addresses read as `(false, 0)`.
    #[must_use]
    pub fn is_permitted(&self, address: &Pubkey, kind: u8) -> (bool, i64) {
        match self.entry(address) {
            Some(e) => (e.kind == kind && e.flagged_at == 0, e.flagged_at),
            None => (false, 0),
        }
    }

    /// Fail the calling operation unless the address is a permitted
    /// integration of the expected kind
    pub fn require_permitted(&self, address: &Pubkey, kind: u8) -> Result<&IntegrationEntry> {
        let (allowed, flagged_at) = self.is_permitted(address, kind);
        if !allowed {
            msg!(
                "Integration {} not permitted for kind {} (flagged_at {})",
                address,
                kind,
                flagged_at
            );
            return Err(ManagerError::NotPermitted.into());
        }
        self.entry(address).ok_or(ManagerError::NotPermitted.into())
    }

    /// The plugin collaborator's self-declared permission requirement
    pub fn declared_permissions(&self, plugin: &Pubkey) -> Result<u8> {
        let entry = self.require_permitted(plugin, INTEGRATION_KIND_PLUGIN)?;
        Ok(entry.declared_permissions)
    }

    /// Register a new integration
    pub fn register(
        &mut self,
        address: Pubkey,
        kind: u8,
        declared_permissions: u8,
        clock: &Clock,
    ) -> Result<()> {
        require!(address != Pubkey::default(), ManagerError::NotPermitted);
        require!(
            self.slot_of(&address).is_none(),
            ManagerError::RegistryEntryExists
        );

        let slot = self
            .entries
            .iter()
            .position(IntegrationEntry::is_empty)
            .ok_or(ManagerError::RegistryCapacityExceeded)?;

        self.entries[slot] = IntegrationEntry {
            address,
            kind,
            declared_permissions,
            registered_at: clock.unix_timestamp,
            flagged_at: 0,
        };
        Ok(())
    }

    /// Remove an integration entirely
    pub fn remove(&mut self, address: &Pubkey) -> Result<()> {
        let slot = self
            .slot_of(address)
            .ok_or(ManagerError::UnknownIntegration)?;
        self.entries[slot] = IntegrationEntry::EMPTY;
        Ok(())
    }

    /// Flag an integration as compromised; it stays registered but is no
    /// longer permitted
    pub fn flag(&mut self, address: &Pubkey, clock: &Clock) -> Result<()> {
        let slot = self
            .slot_of(address)
            .ok_or(ManagerError::UnknownIntegration)?;
        self.entries[slot].flagged_at = clock.unix_timestamp;
        Ok(())
    }

    /// Clear an integration's flag
    pub fn unflag(&mut self, address: &Pubkey) -> Result<()> {
        let slot = self
            .slot_of(address)
            .ok_or(ManagerError::UnknownIntegration)?;
        self.entries[slot].flagged_at = 0;
        Ok(())
    }

    /// Update a plugin's self-declared permission requirement
    pub fn set_declared_permissions(&mut self, address: &Pubkey, declared: u8) -> Result<()> {
        let slot = self
            .slot_of(address)
            .ok_or(ManagerError::UnknownIntegration)?;
        self.entries[slot].declared_permissions = declared;
        Ok(())
    }
}
