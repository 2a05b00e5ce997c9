// Instruction handlers for the plugin-kernel program

pub mod create_account;
pub mod execute_root_access;
pub mod execute_transaction;
pub mod initialize;
pub mod manage_handlers;
pub mod manage_hook;
pub mod manage_plugins;
pub mod manage_registry;

pub use create_account::*;
pub use execute_root_access::*;
pub use execute_transaction::*;
pub use initialize::*;
pub use manage_handlers::*;
pub use manage_hook::*;
pub use manage_plugins::*;
pub use manage_registry::*;
