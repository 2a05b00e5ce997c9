// One-time bootstrap of the global integration registry
use crate::state::IntegrationRegistryAccount;
use crate::INTEGRATION_REGISTRY_SEED;
use anchor_lang::prelude::*;

// ================================
// Instruction Handler
// ================================

/// Create the singleton integration registry with its managing authority
pub fn initialize_registry(ctx: Context<InitializeRegistry>) -> Result<()> {
    let registry = &mut ctx.accounts.integration_registry;
    **registry = IntegrationRegistryAccount::new(
        ctx.accounts.authority.key(),
        ctx.bumps.integration_registry,
    );

    msg!(
        "Integration registry initialized by authority {}",
        ctx.accounts.authority.key()
    );
    Ok(())
}

// ================================
// Account Context
// ================================

#[derive(Accounts)]
pub struct InitializeRegistry<'info> {
    #[account(
        init,
        payer = authority,
        space = IntegrationRegistryAccount::space(),
        seeds = [INTEGRATION_REGISTRY_SEED],
        bump
    )]
    pub integration_registry: Account<'info, IntegrationRegistryAccount>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}
