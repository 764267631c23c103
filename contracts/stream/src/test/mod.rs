#![cfg(test)]
extern crate std;

mod accrual;
mod delegation;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

use crate::{RivuletStream, RivuletStreamClient};

/// Default protocol fee used by the test deployments: 0.3%.
pub const FEE_BPS: u32 = 30;

/// Tokens minted to the sender in every context.
pub const SENDER_FUNDS: i128 = 1_000_000_000;

// ---------------------------------------------------------------------------
// Test harness
// ---------------------------------------------------------------------------

pub struct TestContext<'a> {
    pub env: Env,
    pub contract_id: Address,
    pub token_id: Address,
    pub admin: Address,
    pub treasury: Address,
    pub sender: Address,
    pub recipient: Address,
    #[allow(dead_code)]
    pub sac: StellarAssetClient<'a>,
}

impl<'a> TestContext<'a> {
    pub fn setup() -> Self {
        Self::setup_with_fee(FEE_BPS)
    }

    pub fn setup_with_fee(fee_bps: u32) -> Self {
        let env = Env::default();
        env.mock_all_auths();

        // Deploy the streaming contract
        let contract_id = env.register_contract(None, RivuletStream);

        // Create a mock SAC token (Stellar Asset Contract)
        let token_admin = Address::generate(&env);
        let token_id = env
            .register_stellar_asset_contract_v2(token_admin.clone())
            .address();

        let admin = Address::generate(&env);
        let treasury = Address::generate(&env);
        let sender = Address::generate(&env);
        let recipient = Address::generate(&env);

        // Initialise the streaming contract
        let client = RivuletStreamClient::new(&env, &contract_id);
        client.init(&token_id, &admin, &treasury, &fee_bps);

        // Fund the sender
        let sac = StellarAssetClient::new(&env, &token_id);
        sac.mint(&sender, &SENDER_FUNDS);

        TestContext {
            env,
            contract_id,
            token_id,
            admin,
            treasury,
            sender,
            recipient,
            sac,
        }
    }

    pub fn client(&self) -> RivuletStreamClient<'_> {
        RivuletStreamClient::new(&self.env, &self.contract_id)
    }

    pub fn token(&self) -> TokenClient<'_> {
        TokenClient::new(&self.env, &self.token_id)
    }

    pub fn set_time(&self, timestamp: u64) {
        self.env.ledger().set_timestamp(timestamp);
    }

    /// Create a 10_000-unit deposit streaming over [100, 1_100].
    ///
    /// With the default 0.3% fee the net deposit is 9_970 and the rate
    /// floors to 9 tokens per second.
    pub fn create_default_stream(&self) -> u64 {
        self.set_time(0);
        self.client().create_stream(
            &self.sender,
            &self.recipient,
            &10_000_i128,
            &100_u64,
            &1_100_u64,
        )
    }
}

/// Net deposit of the default stream after the 0.3% fee.
pub const DEFAULT_NET: i128 = 9_970;
/// Floored per-second rate of the default stream.
pub const DEFAULT_RATE: i128 = 9;
