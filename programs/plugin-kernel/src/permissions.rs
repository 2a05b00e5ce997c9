// Permission bitmask model for plugin authorization
//
// Plugins self-declare a required permission mask in the integration registry
// and accounts grant a mask at enable time. Authorization for an action needs
// both masks to carry the required bit: the granted mask is frozen when the
// plugin is enabled, so a plugin cannot escalate by changing its declared
// requirement afterwards. The only way to change a grant is disable + enable.
use crate::errors::ManagerError;
use anchor_lang::prelude::*;

// ================================
// Permission Bits
// ================================

/// Plugin may execute calls to arbitrary external addresses
pub const PERMISSION_EXECUTE_CALL: u8 = 1;

/// Plugin may execute calls targeting the smart account itself
pub const PERMISSION_CALL_TO_SELF: u8 = 1 << 1;

/// Plugin may execute delegate-class (root access) actions
pub const PERMISSION_EXECUTE_DELEGATECALL: u8 = 1 << 2;

/// Union of all defined permission bits
pub const PERMISSION_ALL: u8 =
    PERMISSION_EXECUTE_CALL | PERMISSION_CALL_TO_SELF | PERMISSION_EXECUTE_DELEGATECALL;

// ================================
// Permission Checks
// ================================

/// Check that a mask only uses defined permission bits
#[must_use]
pub const fn is_valid_mask(mask: u8) -> bool {
    mask & !PERMISSION_ALL == 0
}

/// Enable-time gate: the requested mask must exactly equal the plugin's
/// self-declared requirement, preventing both over- and under-granting
pub fn check_requested_matches_declared(requested: u8, declared: u8) -> Result<()> {
    if requested != declared {
        msg!(
            "Permission mismatch: requested {:#010b}, plugin declares {:#010b}",
            requested,
            declared
        );
        return Err(ManagerError::PermissionMismatch.into());
    }
    Ok(())
}

/// Execution-time double gate: the required bit must be present in both the
/// plugin's currently declared requirement and the frozen granted mask
pub fn check_permission(plugin: &Pubkey, declared: u8, granted: u8, required: u8) -> Result<()> {
    if declared & granted & required != required {
        msg!(
            "Permission denied for plugin {}: required {:#010b}, declared {:#010b}, granted {:#010b}",
            plugin,
            required,
            declared,
            granted
        );
        return Err(ManagerError::PermissionDenied.into());
    }
    Ok(())
}

/// Root access gate: declared and granted must agree on the delegatecall bit
/// at call time. A plugin that downgrades its declared requirement while still
/// holding a stale elevated grant is rejected, and so is the inverse.
pub fn check_root_access(plugin: &Pubkey, declared: u8, granted: u8) -> Result<()> {
    let declared_root = declared & PERMISSION_EXECUTE_DELEGATECALL != 0;
    let granted_root = granted & PERMISSION_EXECUTE_DELEGATECALL != 0;
    if !declared_root || !granted_root {
        msg!(
            "Root access rejected for plugin {}: declared {:#010b}, granted {:#010b}",
            plugin,
            declared,
            granted
        );
        return Err(ManagerError::RootAccessRequiredButNotGranted.into());
    }
    Ok(())
}
