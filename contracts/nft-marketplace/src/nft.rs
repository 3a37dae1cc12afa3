//! Interface the marketplace expects from the NFT collection contract.

use soroban_sdk::{contractclient, Address, Env};

#[contractclient(name = "NftClient")]
pub trait NftInterface {
    /// Current owner of `token_id`. Panics if the token does not exist.
    fn owner_of(env: Env, token_id: u64) -> Address;

    /// Moves `token_id` from `from` to `to`. Requires `from` to authorize.
    fn transfer(env: Env, from: Address, to: Address, token_id: u64);
}
