// Security validation layer for plugin-kernel input processing
//
// The kernel processes untrusted plugin-submitted data: action payloads,
// account indices, hook contexts, and fallback call data. This module is the
// gatekeeper that rejects oversized or out-of-bounds input before any state is
// touched or any CPI is built, preventing resource exhaustion and
// out-of-bounds access through malformed batches.
//
// Validation uses simple bounds checks and size limits so it stays cheap on
// the instruction budget while covering every externally supplied buffer.
use crate::errors::ManagerError;
use crate::MAX_BATCH_ACCOUNTS;
use anchor_lang::prelude::*;

/// Maximum size of a single action payload forwarded to the executor
pub const MAX_ACTION_PAYLOAD_SIZE: usize = 1024;

/// Maximum size of the opaque context a hook may return from pre_check
pub const MAX_HOOK_CONTEXT_SIZE: usize = 128;

/// Maximum size of fallback call data forwarded to a function handler
pub const MAX_FALLBACK_DATA_SIZE: usize = 1024;

/// Generic data size validation
pub fn validate_data_size(data: &[u8], max_size: usize, error: ManagerError) -> Result<()> {
    if data.len() > max_size {
        return Err(error.into());
    }
    Ok(())
}

/// Validate an action payload
pub fn validate_action_payload(data: &[u8]) -> Result<()> {
    validate_data_size(data, MAX_ACTION_PAYLOAD_SIZE, ManagerError::PayloadTooLarge)
}

/// Validate an opaque hook context
pub fn validate_hook_context(data: &[u8]) -> Result<()> {
    validate_data_size(data, MAX_HOOK_CONTEXT_SIZE, ManagerError::HookContextTooLarge)
}

/// Validate fallback call data
pub fn validate_fallback_data(data: &[u8]) -> Result<()> {
    validate_data_size(data, MAX_FALLBACK_DATA_SIZE, ManagerError::PayloadTooLarge)
}

/// Validate an execution account list stays within the batch bound
pub fn validate_account_count(count: usize) -> Result<()> {
    if count > MAX_BATCH_ACCOUNTS {
        return Err(ManagerError::BatchTooLarge.into());
    }
    Ok(())
}

/// Validate account indices are within bounds of the batch account list
pub fn validate_account_indices(indices: &[u8], accounts_len: usize) -> Result<()> {
    for &index in indices {
        if index as usize >= accounts_len {
            return Err(ManagerError::InvalidAccountIndex.into());
        }
    }
    Ok(())
}
