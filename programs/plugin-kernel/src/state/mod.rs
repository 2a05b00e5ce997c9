// State management modules for plugin-kernel program

// Account types (on-chain state)
pub mod smart_account;
pub mod plugin_registry;
pub mod hook_config;
pub mod integration_registry;
pub mod handler_table;

// Re-exports
pub use smart_account::SmartAccount;
pub use plugin_registry::{AccessRecord, PluginPage, PluginRegistryAccount, SENTINEL_PLUGIN};
pub use hook_config::HookConfigAccount;
pub use integration_registry::{
    IntegrationEntry, IntegrationRegistryAccount, INTEGRATION_KIND_FUNCTION_HANDLER,
    INTEGRATION_KIND_HOOK, INTEGRATION_KIND_PLUGIN,
};
pub use handler_table::{HandlerEntry, HandlerTableAccount};
