// CPI wire formats for the kernel's external collaborators
//
// The kernel never performs effects directly: actions go through the
// account's executor program, interception goes through the account's hook
// program, and unrecognized calls go through registered function handlers.
// This module owns the instruction encoding for those boundaries and the
// return-data handling for hooks, keeping the collaborator protocol in one
// place.
//
// Instruction data uses the standard 8-byte method discriminator
// (sha256("global:<name>")[..8]) followed by Borsh-encoded arguments, so
// collaborators can be ordinary Anchor programs.
use crate::errors::ManagerError;
use crate::validation;
use anchor_lang::prelude::*;
use anchor_lang::solana_program;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use sha2::{Digest, Sha256};

/// Append a Borsh-encoded value to an instruction data buffer
fn serialize_into<T: AnchorSerialize>(buf: &mut Vec<u8>, value: &T) -> Result<()> {
    value
        .serialize(buf)
        .map_err(|e| solana_program::program_error::ProgramError::BorshIoError(e.to_string()).into())
}

// ================================
// Method Discriminators
// ================================

/// Compute the 8-byte discriminator for a collaborator method
#[must_use]
pub fn method_discriminator(name: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(b"global:");
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&digest[..8]);
    discriminator
}

// ================================
// Executor Collaborator
// ================================

/// A single call the executor performs on the account's behalf.
/// The executor is the sole component that causes effects; the kernel only
/// decides whether to ask for them.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct ExecutorCall {
    /// Address the account is calling
    pub target: Pubkey,
    /// Value forwarded with the call; lamport movement is the executor's concern
    pub value: u64,
    /// Opaque call payload
    pub payload: Vec<u8>,
    /// Delegate-class execution (root access)
    pub is_delegate: bool,
}

/// Build the executor CPI instruction for one call
pub fn executor_instruction(
    executor_program: &Pubkey,
    account: &Pubkey,
    metas: Vec<AccountMeta>,
    call: &ExecutorCall,
) -> Result<Instruction> {
    let mut data = method_discriminator("execute_call").to_vec();
    serialize_into(&mut data, account)?;
    serialize_into(&mut data, call)?;
    Ok(Instruction {
        program_id: *executor_program,
        accounts: metas,
        data,
    })
}

// ================================
// Hook Collaborator
// ================================

pub const EXECUTION_KIND_CALL: u8 = 0;
pub const EXECUTION_KIND_DELEGATECALL: u8 = 1;

pub const INITIATOR_KIND_ACCOUNT: u8 = 0;
pub const INITIATOR_KIND_PLUGIN: u8 = 1;

/// Metadata handed to a hook's pre_check so it can apply different policies
/// to plugin-triggered and account-native operations
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct HookCheckData {
    pub account: Pubkey,
    pub execution_kind: u8,
    pub initiator_kind: u8,
    pub initiator: Pubkey,
    pub correlation: [u8; 32],
}

impl HookCheckData {
    #[must_use]
    pub fn for_plugin(account: Pubkey, plugin: Pubkey, kind: u8, correlation: [u8; 32]) -> Self {
        Self {
            account,
            execution_kind: kind,
            initiator_kind: INITIATOR_KIND_PLUGIN,
            initiator: plugin,
            correlation,
        }
    }

    #[must_use]
    pub fn for_account(account: Pubkey, correlation: [u8; 32]) -> Self {
        Self {
            account,
            execution_kind: EXECUTION_KIND_CALL,
            initiator_kind: INITIATOR_KIND_ACCOUNT,
            initiator: account,
            correlation,
        }
    }
}

/// Build the pre_check CPI instruction
pub fn pre_check_instruction(hook: &Pubkey, check: &HookCheckData) -> Result<Instruction> {
    let name = if check.execution_kind == EXECUTION_KIND_DELEGATECALL {
        "pre_check_root_access"
    } else {
        "pre_check"
    };
    let mut data = method_discriminator(name).to_vec();
    serialize_into(&mut data, check)?;
    Ok(Instruction {
        program_id: *hook,
        accounts: vec![],
        data,
    })
}

/// Build the post_check CPI instruction
pub fn post_check_instruction(
    hook: &Pubkey,
    account: &Pubkey,
    success: bool,
    context: &[u8],
) -> Result<Instruction> {
    let mut data = method_discriminator("post_check").to_vec();
    serialize_into(&mut data, account)?;
    serialize_into(&mut data, &success)?;
    serialize_into(&mut data, &context.to_vec())?;
    Ok(Instruction {
        program_id: *hook,
        accounts: vec![],
        data,
    })
}

/// Read the opaque context a hook returned from pre_check.
/// Present-but-empty return data is a valid empty context; absent return data
/// or data returned by another program is an error.
pub fn read_hook_context(hook: &Pubkey) -> Result<Vec<u8>> {
    let (returning_program, context) = solana_program::program::get_return_data()
        .ok_or(ManagerError::HookNoReturnData)?;
    require!(returning_program == *hook, ManagerError::HookInvalidReturn);
    validation::validate_hook_context(&context)?;
    Ok(context)
}

// ================================
// Function Handler Collaborator
// ================================

/// Split fallback call data into its selector and payload
pub fn split_fallback_data(data: &[u8]) -> Result<([u8; 8], &[u8])> {
    require!(data.len() >= 8, ManagerError::FallbackDataTooShort);
    let mut selector = [0u8; 8];
    selector.copy_from_slice(&data[..8]);
    Ok((selector, &data[8..]))
}

/// Build the fallback dispatch instruction: the original call data forwarded
/// to the handler with the true originator appended as trailing metadata
#[must_use]
pub fn handler_instruction(
    handler: &Pubkey,
    selector: [u8; 8],
    payload: &[u8],
    caller: &Pubkey,
) -> Instruction {
    let mut data = Vec::with_capacity(8 + payload.len() + 32);
    data.extend_from_slice(&selector);
    data.extend_from_slice(payload);
    data.extend_from_slice(caller.as_ref());
    Instruction {
        program_id: *handler,
        accounts: vec![],
        data,
    }
}

// ================================
// Account Lookup
// ================================

/// Find a required account in the instruction's remaining accounts
pub fn find_account_info<'a, 'info>(
    key: &Pubkey,
    accounts: &'a [AccountInfo<'info>],
) -> Result<&'a AccountInfo<'info>> {
    accounts
        .iter()
        .find(|info| info.key == key)
        .ok_or_else(|| {
            msg!("Missing required account {}", key);
            ManagerError::MissingRequiredAccount.into()
        })
}
