// Comprehensive unit tests for plugin-kernel
//
// Instruction handlers stay thin, so the authorization and registry logic is
// exercised here directly against the pure state methods.
use crate::errors::ManagerError;
use crate::instructions::execute_transaction::{classify_action, ActionBatch, PluginAction};
use crate::interface::{
    method_discriminator, pre_check_instruction, HookCheckData, EXECUTION_KIND_CALL,
    EXECUTION_KIND_DELEGATECALL, INITIATOR_KIND_ACCOUNT, INITIATOR_KIND_PLUGIN,
};
use crate::permissions::*;
use crate::state::*;
use crate::validation::{
    validate_account_count, MAX_ACTION_PAYLOAD_SIZE, MAX_HOOK_CONTEXT_SIZE,
};
use crate::{
    MAX_BATCH_ACCOUNTS, MAX_BATCH_ACTIONS, MAX_ENABLED_PLUGINS, MAX_REGISTERED_INTEGRATIONS,
};
use anchor_lang::prelude::*;

fn test_clock() -> Clock {
    Clock {
        slot: 42,
        epoch_start_timestamp: 1_700_000_000,
        epoch: 1,
        leader_schedule_epoch: 1,
        unix_timestamp: 1_700_000_100,
    }
}

fn registry() -> PluginRegistryAccount {
    PluginRegistryAccount::new(Pubkey::new_unique(), 255)
}

fn expect_err<T>(result: Result<T>, expected: ManagerError) {
    match result {
        Err(e) => assert_eq!(e, anchor_lang::error::Error::from(expected)),
        Ok(_) => panic!("expected error"),
    }
}

// ================================
// Plugin Registry Tests
// ================================

#[test]
fn test_enable_links_plugin_at_head() {
    let mut reg = registry();
    let a = Pubkey::new_unique();
    let b = Pubkey::new_unique();
    let c = Pubkey::new_unique();

    reg.enable(a, PERMISSION_EXECUTE_CALL).unwrap();
    reg.enable(b, PERMISSION_EXECUTE_CALL).unwrap();
    reg.enable(c, PERMISSION_ALL).unwrap();

    // Most recently enabled sits at the head
    assert_eq!(reg.sentinel_next, c);
    assert_eq!(reg.next_of(&c), Some(b));
    assert_eq!(reg.next_of(&b), Some(a));
    assert_eq!(reg.next_of(&a), Some(SENTINEL_PLUGIN));

    assert!(reg.is_enabled(&a));
    assert!(reg.is_enabled(&b));
    assert!(reg.is_enabled(&c));
    assert_eq!(reg.granted_permissions(&c).unwrap(), PERMISSION_ALL);
}

#[test]
fn test_enable_rejects_sentinel_and_null() {
    let mut reg = registry();
    expect_err(
        reg.enable(SENTINEL_PLUGIN, PERMISSION_EXECUTE_CALL),
        ManagerError::InvalidPluginAddress,
    );
    expect_err(
        reg.enable(Pubkey::default(), PERMISSION_EXECUTE_CALL),
        ManagerError::InvalidPluginAddress,
    );
}

#[test]
fn test_enable_twice_fails_without_mutation() {
    let mut reg = registry();
    let a = Pubkey::new_unique();
    reg.enable(a, PERMISSION_EXECUTE_CALL).unwrap();

    let before = (reg.sentinel_next, reg.records);
    expect_err(reg.enable(a, PERMISSION_ALL), ManagerError::PluginAlreadyEnabled);
    assert_eq!(before, (reg.sentinel_next, reg.records));
    // Original grant survives the failed re-enable
    assert_eq!(reg.granted_permissions(&a).unwrap(), PERMISSION_EXECUTE_CALL);
}

#[test]
fn test_enable_fails_when_full() {
    let mut reg = registry();
    for _ in 0..MAX_ENABLED_PLUGINS {
        reg.enable(Pubkey::new_unique(), PERMISSION_EXECUTE_CALL)
            .unwrap();
    }
    expect_err(
        reg.enable(Pubkey::new_unique(), PERMISSION_EXECUTE_CALL),
        ManagerError::RegistryFull,
    );
}

#[test]
fn test_disable_head_via_sentinel_predecessor() {
    let mut reg = registry();
    let a = Pubkey::new_unique();
    let b = Pubkey::new_unique();
    reg.enable(a, PERMISSION_EXECUTE_CALL).unwrap();
    reg.enable(b, PERMISSION_EXECUTE_CALL).unwrap();

    // b is at the head, so its predecessor is the sentinel
    reg.disable(&SENTINEL_PLUGIN, &b).unwrap();

    assert!(!reg.is_enabled(&b));
    assert!(reg.is_enabled(&a));
    assert_eq!(reg.sentinel_next, a);
    // The slot is free again
    assert_eq!(reg.plugin_info(&b), (0, Pubkey::default()));
}

#[test]
fn test_disable_middle_rewires_predecessor() {
    let mut reg = registry();
    let a = Pubkey::new_unique();
    let b = Pubkey::new_unique();
    let c = Pubkey::new_unique();
    reg.enable(a, PERMISSION_EXECUTE_CALL).unwrap();
    reg.enable(b, PERMISSION_CALL_TO_SELF).unwrap();
    reg.enable(c, PERMISSION_ALL).unwrap();

    // Chain is c -> b -> a; remove b with predecessor c
    reg.disable(&c, &b).unwrap();

    assert!(!reg.is_enabled(&b));
    assert_eq!(reg.next_of(&c), Some(a));
    // The removed record's mask moves onto the predecessor with the pointer
    assert_eq!(reg.granted_permissions(&c).unwrap(), PERMISSION_CALL_TO_SELF);
}

#[test]
fn test_disable_with_wrong_predecessor_leaves_chain_intact() {
    let mut reg = registry();
    let a = Pubkey::new_unique();
    let b = Pubkey::new_unique();
    reg.enable(a, PERMISSION_EXECUTE_CALL).unwrap();
    reg.enable(b, PERMISSION_EXECUTE_CALL).unwrap();

    let before = (reg.sentinel_next, reg.records);
    // a is not b's predecessor (the sentinel is)
    expect_err(reg.disable(&a, &b), ManagerError::InvalidPrevPluginAddress);
    // A stranger is no better
    expect_err(
        reg.disable(&Pubkey::new_unique(), &b),
        ManagerError::InvalidPrevPluginAddress,
    );
    assert_eq!(before, (reg.sentinel_next, reg.records));
}

#[test]
fn test_disable_then_reenable() {
    let mut reg = registry();
    let a = Pubkey::new_unique();
    reg.enable(a, PERMISSION_EXECUTE_CALL).unwrap();
    reg.disable(&SENTINEL_PLUGIN, &a).unwrap();
    assert!(!reg.is_enabled(&a));

    reg.enable(a, PERMISSION_ALL).unwrap();
    assert!(reg.is_enabled(&a));
    assert_eq!(reg.granted_permissions(&a).unwrap(), PERMISSION_ALL);
}

#[test]
fn test_disable_last_plugin_empties_list() {
    let mut reg = registry();
    let a = Pubkey::new_unique();
    reg.enable(a, PERMISSION_EXECUTE_CALL).unwrap();
    reg.disable(&SENTINEL_PLUGIN, &a).unwrap();

    assert_eq!(reg.sentinel_next, SENTINEL_PLUGIN);
    let page = reg.list_paginated(&SENTINEL_PLUGIN, 10).unwrap();
    assert!(page.plugins.is_empty());
    assert_eq!(page.next, SENTINEL_PLUGIN);
}

#[test]
fn test_granted_permissions_requires_enabled() {
    let reg = registry();
    expect_err(
        reg.granted_permissions(&Pubkey::new_unique()),
        ManagerError::PluginNotEnabled,
    );
}

// ================================
// Pagination Tests
// ================================

#[test]
fn test_list_empty_registry() {
    let reg = registry();
    let page = reg.list_paginated(&SENTINEL_PLUGIN, 5).unwrap();
    assert!(page.plugins.is_empty());
    assert_eq!(page.next, SENTINEL_PLUGIN);
}

#[test]
fn test_list_rejects_zero_page_size() {
    let reg = registry();
    expect_err(
        reg.list_paginated(&SENTINEL_PLUGIN, 0),
        ManagerError::ZeroPageSize,
    );
}

#[test]
fn test_list_rejects_unknown_start() {
    let mut reg = registry();
    reg.enable(Pubkey::new_unique(), PERMISSION_EXECUTE_CALL)
        .unwrap();
    expect_err(
        reg.list_paginated(&Pubkey::new_unique(), 5),
        ManagerError::InvalidPluginAddress,
    );
    expect_err(
        reg.list_paginated(&Pubkey::default(), 5),
        ManagerError::InvalidPluginAddress,
    );
}

#[test]
fn test_list_single_page_complete() {
    let mut reg = registry();
    let a = Pubkey::new_unique();
    let b = Pubkey::new_unique();
    let c = Pubkey::new_unique();
    reg.enable(a, 1).unwrap();
    reg.enable(b, 1).unwrap();
    reg.enable(c, 1).unwrap();

    let page = reg.list_paginated(&SENTINEL_PLUGIN, 10).unwrap();
    assert_eq!(page.plugins, vec![c, b, a]);
    assert_eq!(page.next, SENTINEL_PLUGIN);
}

#[test]
fn test_list_partial_page_reports_resume_cursor() {
    let mut reg = registry();
    let a = Pubkey::new_unique();
    let b = Pubkey::new_unique();
    let c = Pubkey::new_unique();
    reg.enable(a, 1).unwrap();
    reg.enable(b, 1).unwrap();
    reg.enable(c, 1).unwrap();

    let page = reg.list_paginated(&SENTINEL_PLUGIN, 2).unwrap();
    assert_eq!(page.plugins, vec![c, b]);
    // Cursor is the last address returned, not the sentinel
    assert_eq!(page.next, b);
}

#[test]
fn test_list_pages_concatenate_to_full_walk() {
    let mut reg = registry();
    let mut enabled = Vec::new();
    for _ in 0..7 {
        let p = Pubkey::new_unique();
        reg.enable(p, 1).unwrap();
        enabled.push(p);
    }
    enabled.reverse(); // head insertion yields reverse enable order

    let mut collected = Vec::new();
    let mut cursor = SENTINEL_PLUGIN;
    loop {
        let page = reg.list_paginated(&cursor, 3).unwrap();
        collected.extend_from_slice(&page.plugins);
        if page.next == SENTINEL_PLUGIN {
            break;
        }
        cursor = page.next;
    }
    assert_eq!(collected, enabled);
}

#[test]
fn test_list_exact_boundary_page() {
    let mut reg = registry();
    let a = Pubkey::new_unique();
    let b = Pubkey::new_unique();
    reg.enable(a, 1).unwrap();
    reg.enable(b, 1).unwrap();

    // Page size equals the remaining chain length: the walk advances past the
    // last plugin, reaches the sentinel, and signals completion
    let page = reg.list_paginated(&SENTINEL_PLUGIN, 2).unwrap();
    assert_eq!(page.plugins, vec![b, a]);
    assert_eq!(page.next, SENTINEL_PLUGIN);

    // An enabled plugin is still a valid start; resuming from the tail yields
    // the empty terminal page
    let tail = reg.list_paginated(&a, 2).unwrap();
    assert!(tail.plugins.is_empty());
    assert_eq!(tail.next, SENTINEL_PLUGIN);
}

// ================================
// Permission Tests
// ================================

#[test]
fn test_mask_validity() {
    assert!(is_valid_mask(0));
    assert!(is_valid_mask(PERMISSION_EXECUTE_CALL));
    assert!(is_valid_mask(PERMISSION_ALL));
    assert!(!is_valid_mask(1 << 3));
    assert!(!is_valid_mask(0xFF));
}

#[test]
fn test_enable_gate_requires_exact_match() {
    assert!(check_requested_matches_declared(
        PERMISSION_EXECUTE_CALL,
        PERMISSION_EXECUTE_CALL
    )
    .is_ok());
    // Under-granting is as invalid as over-granting
    expect_err(
        check_requested_matches_declared(PERMISSION_EXECUTE_CALL, PERMISSION_ALL),
        ManagerError::PermissionMismatch,
    );
    expect_err(
        check_requested_matches_declared(PERMISSION_ALL, PERMISSION_EXECUTE_CALL),
        ManagerError::PermissionMismatch,
    );
}

#[test]
fn test_double_gate_needs_both_masks() {
    let plugin = Pubkey::new_unique();
    let bit = PERMISSION_EXECUTE_CALL;

    assert!(check_permission(&plugin, bit, bit, bit).is_ok());
    // Declared but not granted
    expect_err(
        check_permission(&plugin, bit, 0, bit),
        ManagerError::PermissionDenied,
    );
    // Granted but no longer declared
    expect_err(
        check_permission(&plugin, 0, bit, bit),
        ManagerError::PermissionDenied,
    );
}

#[test]
fn test_double_gate_per_bit() {
    let plugin = Pubkey::new_unique();
    let declared = PERMISSION_EXECUTE_CALL | PERMISSION_CALL_TO_SELF;
    let granted = PERMISSION_EXECUTE_CALL;

    // One action class passes while another is denied under the same masks
    assert!(check_permission(&plugin, declared, granted, PERMISSION_EXECUTE_CALL).is_ok());
    expect_err(
        check_permission(&plugin, declared, granted, PERMISSION_CALL_TO_SELF),
        ManagerError::PermissionDenied,
    );
}

#[test]
fn test_root_access_needs_bit_on_both_sides() {
    let plugin = Pubkey::new_unique();
    let root = PERMISSION_EXECUTE_DELEGATECALL;

    assert!(check_root_access(&plugin, root, root).is_ok());
    assert!(check_root_access(&plugin, PERMISSION_ALL, root).is_ok());
    // Stale grant after a declaration downgrade
    expect_err(
        check_root_access(&plugin, PERMISSION_EXECUTE_CALL, root),
        ManagerError::RootAccessRequiredButNotGranted,
    );
    // Upgraded declaration without a matching grant
    expect_err(
        check_root_access(&plugin, root, PERMISSION_EXECUTE_CALL),
        ManagerError::RootAccessRequiredButNotGranted,
    );
    expect_err(
        check_root_access(&plugin, 0, 0),
        ManagerError::RootAccessRequiredButNotGranted,
    );
}

// ================================
// Action Classification Tests
// ================================

#[test]
fn test_classify_action_targets() {
    let account = Pubkey::new_unique();

    assert_eq!(
        classify_action(&Pubkey::new_unique(), &account).unwrap(),
        PERMISSION_EXECUTE_CALL
    );
    assert_eq!(
        classify_action(&account, &account).unwrap(),
        PERMISSION_CALL_TO_SELF
    );
    expect_err(
        classify_action(&crate::ID, &account),
        ManagerError::ManagerCallForbidden,
    );
}

// ================================
// Batch Validation Tests
// ================================

fn action(target: Pubkey, indices: Vec<u8>) -> PluginAction {
    PluginAction {
        target,
        value: 0,
        payload: vec![1, 2, 3],
        account_indices: indices,
    }
}

#[test]
fn test_batch_rejects_empty() {
    let batch = ActionBatch {
        accounts: vec![],
        actions: vec![],
        correlation: [0u8; 32],
    };
    expect_err(batch.validate(), ManagerError::EmptyBatch);
}

#[test]
fn test_batch_rejects_too_many_actions() {
    let batch = ActionBatch {
        accounts: vec![],
        actions: (0..=MAX_BATCH_ACTIONS)
            .map(|_| action(Pubkey::new_unique(), vec![]))
            .collect(),
        correlation: [0u8; 32],
    };
    expect_err(batch.validate(), ManagerError::BatchTooLarge);
}

#[test]
fn test_batch_rejects_oversized_payload() {
    let mut a = action(Pubkey::new_unique(), vec![]);
    a.payload = vec![0u8; MAX_ACTION_PAYLOAD_SIZE + 1];
    let batch = ActionBatch {
        accounts: vec![],
        actions: vec![a],
        correlation: [0u8; 32],
    };
    expect_err(batch.validate(), ManagerError::PayloadTooLarge);
}

#[test]
fn test_batch_rejects_out_of_bounds_index() {
    let batch = ActionBatch {
        accounts: vec![Pubkey::new_unique()],
        actions: vec![action(Pubkey::new_unique(), vec![0, 1])],
        correlation: [0u8; 32],
    };
    expect_err(batch.validate(), ManagerError::InvalidAccountIndex);
}

#[test]
fn test_account_list_bounded_on_both_execution_paths() {
    // The shared cap backs both the batch path and the root-access path
    assert!(validate_account_count(MAX_BATCH_ACCOUNTS).is_ok());
    expect_err(
        validate_account_count(MAX_BATCH_ACCOUNTS + 1),
        ManagerError::BatchTooLarge,
    );

    let batch = ActionBatch {
        accounts: (0..=MAX_BATCH_ACCOUNTS).map(|_| Pubkey::new_unique()).collect(),
        actions: vec![action(Pubkey::new_unique(), vec![])],
        correlation: [0u8; 32],
    };
    expect_err(batch.validate(), ManagerError::BatchTooLarge);
}

#[test]
fn test_batch_accepts_valid() {
    let batch = ActionBatch {
        accounts: vec![Pubkey::new_unique(), Pubkey::new_unique()],
        actions: vec![
            action(Pubkey::new_unique(), vec![0]),
            action(Pubkey::new_unique(), vec![0, 1]),
        ],
        correlation: [7u8; 32],
    };
    assert!(batch.validate().is_ok());
}

// ================================
// Hook Bridge Tests
// ================================

#[test]
fn test_pending_store_and_take() {
    let mut config = HookConfigAccount::new(Pubkey::new_unique(), 255);
    let hook = Pubkey::new_unique();
    config.hook = hook;

    config.store_pending(hook, b"ctx-bytes").unwrap();
    assert!(config.pending);

    let (taken_hook, context) = config.take_pending().unwrap();
    assert_eq!(taken_hook, hook);
    assert_eq!(context, b"ctx-bytes");

    // Consumed: a second take finds nothing
    assert!(config.take_pending().is_none());
    assert!(!config.pending);
}

#[test]
fn test_pending_last_writer_wins() {
    let mut config = HookConfigAccount::new(Pubkey::new_unique(), 255);
    let first = Pubkey::new_unique();
    let second = Pubkey::new_unique();

    config.store_pending(first, b"first").unwrap();
    config.store_pending(second, b"second").unwrap();

    let (hook, context) = config.take_pending().unwrap();
    assert_eq!(hook, second);
    assert_eq!(context, b"second");
    assert!(config.take_pending().is_none());
}

#[test]
fn test_pending_survives_hook_reassignment() {
    let mut config = HookConfigAccount::new(Pubkey::new_unique(), 255);
    let original = Pubkey::new_unique();
    config.hook = original;
    config.store_pending(original, b"snapshot").unwrap();

    // Reassigning the hook must not redirect the in-flight post-check
    config.hook = Pubkey::new_unique();
    let (hook, _) = config.take_pending().unwrap();
    assert_eq!(hook, original);
}

#[test]
fn test_pending_empty_context_is_valid() {
    let mut config = HookConfigAccount::new(Pubkey::new_unique(), 255);
    let hook = Pubkey::new_unique();
    config.store_pending(hook, &[]).unwrap();

    let (_, context) = config.take_pending().unwrap();
    assert!(context.is_empty());
}

#[test]
fn test_pending_rejects_oversized_context() {
    let mut config = HookConfigAccount::new(Pubkey::new_unique(), 255);
    let too_big = vec![0u8; MAX_HOOK_CONTEXT_SIZE + 1];
    expect_err(
        config.store_pending(Pubkey::new_unique(), &too_big),
        ManagerError::HookContextTooLarge,
    );
    assert!(!config.pending);
}

// ================================
// Handler Table Tests
// ================================

#[test]
fn test_handler_set_get_replace_clear() {
    let mut table = HandlerTableAccount::new(Pubkey::new_unique(), 255);
    let selector = [1, 2, 3, 4, 5, 6, 7, 8];
    let first = Pubkey::new_unique();
    let second = Pubkey::new_unique();

    assert!(table.handler_for(selector).is_none());

    table.set_handler(selector, first).unwrap();
    assert_eq!(table.handler_for(selector), Some(first));

    table.set_handler(selector, second).unwrap();
    assert_eq!(table.handler_for(selector), Some(second));

    table.set_handler(selector, Pubkey::default()).unwrap();
    assert!(table.handler_for(selector).is_none());

    // Clearing an unset selector is a no-op, not an error
    table.set_handler([9u8; 8], Pubkey::default()).unwrap();
}

#[test]
fn test_handler_table_capacity() {
    let mut table = HandlerTableAccount::new(Pubkey::new_unique(), 255);
    for i in 0..crate::MAX_FUNCTION_HANDLERS {
        let selector = [i as u8; 8];
        table.set_handler(selector, Pubkey::new_unique()).unwrap();
    }
    expect_err(
        table.set_handler([0xAA; 8], Pubkey::new_unique()),
        ManagerError::HandlerTableFull,
    );

    // Replacing an occupied selector still works at capacity
    table.set_handler([0u8; 8], Pubkey::new_unique()).unwrap();
}

// ================================
// Integration Registry Tests
// ================================

#[test]
fn test_integration_register_and_permit() {
    let mut reg = IntegrationRegistryAccount::new(Pubkey::new_unique(), 255);
    let plugin = Pubkey::new_unique();
    let clock = test_clock();

    reg.register(plugin, INTEGRATION_KIND_PLUGIN, PERMISSION_EXECUTE_CALL, &clock)
        .unwrap();

    assert_eq!(reg.is_permitted(&plugin, INTEGRATION_KIND_PLUGIN), (true, 0));
    // Kind mismatch fails the check
    assert_eq!(reg.is_permitted(&plugin, INTEGRATION_KIND_HOOK), (false, 0));
    // Unknown address reads as not permitted
    assert_eq!(
        reg.is_permitted(&Pubkey::new_unique(), INTEGRATION_KIND_PLUGIN),
        (false, 0)
    );
    assert_eq!(
        reg.declared_permissions(&plugin).unwrap(),
        PERMISSION_EXECUTE_CALL
    );
}

#[test]
fn test_integration_duplicate_and_capacity() {
    let mut reg = IntegrationRegistryAccount::new(Pubkey::new_unique(), 255);
    let clock = test_clock();
    let plugin = Pubkey::new_unique();

    reg.register(plugin, INTEGRATION_KIND_PLUGIN, 0, &clock).unwrap();
    expect_err(
        reg.register(plugin, INTEGRATION_KIND_HOOK, 0, &clock),
        ManagerError::RegistryEntryExists,
    );

    for _ in 1..MAX_REGISTERED_INTEGRATIONS {
        reg.register(Pubkey::new_unique(), INTEGRATION_KIND_PLUGIN, 0, &clock)
            .unwrap();
    }
    expect_err(
        reg.register(Pubkey::new_unique(), INTEGRATION_KIND_PLUGIN, 0, &clock),
        ManagerError::RegistryCapacityExceeded,
    );
}

#[test]
fn test_integration_flag_unflag() {
    let mut reg = IntegrationRegistryAccount::new(Pubkey::new_unique(), 255);
    let clock = test_clock();
    let hook = Pubkey::new_unique();
    reg.register(hook, INTEGRATION_KIND_HOOK, 0, &clock).unwrap();

    reg.flag(&hook, &clock).unwrap();
    let (allowed, flagged_at) = reg.is_permitted(&hook, INTEGRATION_KIND_HOOK);
    assert!(!allowed);
    assert_eq!(flagged_at, clock.unix_timestamp);
    expect_err(
        reg.require_permitted(&hook, INTEGRATION_KIND_HOOK).map(|_| ()),
        ManagerError::NotPermitted,
    );

    reg.unflag(&hook).unwrap();
    assert_eq!(reg.is_permitted(&hook, INTEGRATION_KIND_HOOK), (true, 0));

    expect_err(
        reg.flag(&Pubkey::new_unique(), &clock),
        ManagerError::UnknownIntegration,
    );
}

#[test]
fn test_integration_remove_frees_slot() {
    let mut reg = IntegrationRegistryAccount::new(Pubkey::new_unique(), 255);
    let clock = test_clock();
    let handler = Pubkey::new_unique();

    reg.register(handler, INTEGRATION_KIND_FUNCTION_HANDLER, 0, &clock)
        .unwrap();
    reg.remove(&handler).unwrap();
    assert_eq!(
        reg.is_permitted(&handler, INTEGRATION_KIND_FUNCTION_HANDLER),
        (false, 0)
    );
    expect_err(reg.remove(&handler), ManagerError::UnknownIntegration);
}

#[test]
fn test_integration_declared_permission_update() {
    let mut reg = IntegrationRegistryAccount::new(Pubkey::new_unique(), 255);
    let clock = test_clock();
    let plugin = Pubkey::new_unique();

    reg.register(plugin, INTEGRATION_KIND_PLUGIN, PERMISSION_EXECUTE_CALL, &clock)
        .unwrap();
    reg.set_declared_permissions(&plugin, PERMISSION_ALL).unwrap();
    assert_eq!(reg.declared_permissions(&plugin).unwrap(), PERMISSION_ALL);

    expect_err(
        reg.set_declared_permissions(&Pubkey::new_unique(), 0),
        ManagerError::UnknownIntegration,
    );
}

// ================================
// Smart Account Tests
// ================================

#[test]
fn test_smart_account_lifecycle() {
    let clock = test_clock();
    let owner = Pubkey::new_unique();
    let executor = Pubkey::new_unique();
    let mut account = SmartAccount::new(owner, executor, 254, &clock);

    assert!(account.require_active().is_ok());
    assert_eq!(account.usage_count, 0);

    account.increment_usage(&clock).unwrap();
    assert_eq!(account.usage_count, 1);

    account.deactivate(&clock);
    expect_err(account.require_active(), ManagerError::AccountInactive);
}

#[test]
fn test_smart_account_usage_overflow() {
    let clock = test_clock();
    let mut account = SmartAccount::new(Pubkey::new_unique(), Pubkey::new_unique(), 254, &clock);
    account.usage_count = u64::MAX;
    expect_err(account.increment_usage(&clock), ManagerError::UsageLimitExceeded);
}

// ================================
// Collaborator Interface Tests
// ================================

#[test]
fn test_method_discriminators_are_stable_and_distinct() {
    assert_eq!(method_discriminator("pre_check"), method_discriminator("pre_check"));
    assert_ne!(
        method_discriminator("pre_check"),
        method_discriminator("pre_check_root_access")
    );
    assert_ne!(method_discriminator("pre_check"), method_discriminator("post_check"));
}

#[test]
fn test_pre_check_method_depends_on_execution_kind() {
    let hook = Pubkey::new_unique();
    let account = Pubkey::new_unique();
    let plugin = Pubkey::new_unique();

    let call = HookCheckData::for_plugin(account, plugin, EXECUTION_KIND_CALL, [0u8; 32]);
    let delegate =
        HookCheckData::for_plugin(account, plugin, EXECUTION_KIND_DELEGATECALL, [0u8; 32]);

    let call_ix = pre_check_instruction(&hook, &call).unwrap();
    let delegate_ix = pre_check_instruction(&hook, &delegate).unwrap();

    assert_eq!(call_ix.program_id, hook);
    assert_eq!(&call_ix.data[..8], method_discriminator("pre_check"));
    assert_eq!(
        &delegate_ix.data[..8],
        method_discriminator("pre_check_root_access")
    );
}

#[test]
fn test_hook_check_data_constructors() {
    let account = Pubkey::new_unique();
    let plugin = Pubkey::new_unique();
    let correlation = [9u8; 32];

    let from_plugin =
        HookCheckData::for_plugin(account, plugin, EXECUTION_KIND_CALL, correlation);
    assert_eq!(from_plugin.initiator_kind, INITIATOR_KIND_PLUGIN);
    assert_eq!(from_plugin.initiator, plugin);

    let from_account = HookCheckData::for_account(account, correlation);
    assert_eq!(from_account.initiator_kind, INITIATOR_KIND_ACCOUNT);
    assert_eq!(from_account.initiator, account);
    assert_eq!(from_account.execution_kind, EXECUTION_KIND_CALL);
}

#[test]
fn test_fallback_data_selector_split() {
    expect_err(
        crate::interface::split_fallback_data(&[1, 2, 3]),
        ManagerError::FallbackDataTooShort,
    );

    // Exactly a selector is valid with an empty payload
    let (selector, payload) = crate::interface::split_fallback_data(&[7u8; 8]).unwrap();
    assert_eq!(selector, [7u8; 8]);
    assert!(payload.is_empty());

    let data = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    let (selector, payload) = crate::interface::split_fallback_data(&data).unwrap();
    assert_eq!(selector, [1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(payload, &[9, 10]);
}

#[test]
fn test_handler_instruction_layout() {
    let handler = Pubkey::new_unique();
    let caller = Pubkey::new_unique();
    let selector = [5u8; 8];
    let payload = [10u8, 11, 12];

    let ix = crate::interface::handler_instruction(&handler, selector, &payload, &caller);
    assert_eq!(ix.program_id, handler);
    assert_eq!(&ix.data[..8], &selector);
    assert_eq!(&ix.data[8..11], &payload);
    // Originator rides as the trailing 32 bytes
    assert_eq!(&ix.data[11..], caller.as_ref());
}
