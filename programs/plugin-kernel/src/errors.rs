// Error system for plugin-kernel operation processing
//
// The plugin-kernel processes untrusted plugin-submitted action batches and
// mutates per-account registry state, so every rejected precondition must be a
// distinguishable, inspectable error. Errors are organized by functional
// domain (authorization, registry, permissions, hooks, execution, handlers)
// with numeric ranges for easy identification during debugging.
//
// Every error aborts the entire enclosing instruction; the runtime discards
// all account mutations performed earlier in the same instruction, so there is
// no local recovery or retry inside the kernel. Context the caller needs for
// diagnosis (the offending address, the required vs granted masks, the failing
// batch index) is logged with msg! at the failure site.

use anchor_lang::prelude::*;

// ================================
// Error Taxonomy
// ================================

#[error_code]
pub enum ManagerError {
    // ===== Authorization Errors (6000-6099) =====
    #[msg("Unauthorized")]
    Unauthorized, // 6000

    #[msg("Smart account is not active")]
    AccountInactive, // 6001

    #[msg("Usage counter overflow")]
    UsageLimitExceeded, // 6002

    // ===== Plugin Registry Errors (6100-6199) =====
    #[msg("Invalid plugin address")]
    InvalidPluginAddress, // 6100

    #[msg("Plugin already enabled")]
    PluginAlreadyEnabled, // 6101

    #[msg("Plugin not enabled")]
    PluginNotEnabled, // 6102

    #[msg("Previous plugin record does not point at plugin")]
    InvalidPrevPluginAddress, // 6103

    #[msg("Plugin registry is full")]
    RegistryFull, // 6104

    #[msg("Page size must be non-zero")]
    ZeroPageSize, // 6105

    // ===== Permission Errors (6200-6299) =====
    #[msg("Requested permissions do not match plugin's declared requirement")]
    PermissionMismatch, // 6200

    #[msg("Permission not granted for this action")]
    PermissionDenied, // 6201

    #[msg("Root access declared and granted permissions disagree")]
    RootAccessRequiredButNotGranted, // 6202

    // ===== Integration Registry Errors (6300-6399) =====
    #[msg("Address is not permitted by the integration registry")]
    NotPermitted, // 6300

    #[msg("Integration already registered")]
    RegistryEntryExists, // 6301

    #[msg("Integration registry is full")]
    RegistryCapacityExceeded, // 6302

    #[msg("Integration not registered")]
    UnknownIntegration, // 6303

    // ===== Hook Errors (6400-6499) =====
    #[msg("Hook context exceeds maximum size")]
    HookContextTooLarge, // 6400

    #[msg("Hook did not return data")]
    HookNoReturnData, // 6401

    #[msg("Hook returned invalid data")]
    HookInvalidReturn, // 6402

    // ===== Execution Errors (6500-6599) =====
    #[msg("Action batch is empty")]
    EmptyBatch, // 6500

    #[msg("Action batch exceeds maximum size")]
    BatchTooLarge, // 6501

    #[msg("Action payload exceeds maximum size")]
    PayloadTooLarge, // 6502

    #[msg("Account index out of bounds")]
    InvalidAccountIndex, // 6503

    #[msg("Missing required account")]
    MissingRequiredAccount, // 6504

    #[msg("Actions must not target the kernel itself")]
    ManagerCallForbidden, // 6505

    #[msg("Action execution failed")]
    ActionFailed, // 6506

    #[msg("Root access action execution failed")]
    RootActionFailed, // 6507

    // ===== Function Handler Errors (6600-6699) =====
    #[msg("No handler set for selector")]
    HandlerNotSet, // 6600

    #[msg("Function handler table is full")]
    HandlerTableFull, // 6601

    #[msg("Fallback data too short to contain a selector")]
    FallbackDataTooShort, // 6602
}
