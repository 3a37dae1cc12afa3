//! Storage access for the marketplace.
//!
//! Admin and fee configuration live in persistent storage so they survive
//! contract upgrades. The pause flag and the accepted NFT collection live in
//! instance storage. Listings and whitelist flags are persistent entries
//! keyed by `DataKey`.

use soroban_sdk::{panic_with_error, symbol_short, Address, Env, IntoVal, Symbol, Val};

use crate::types::{DataKey, Error, FeeConfig, Listing};

pub(crate) const ADMIN_KEY: Symbol = symbol_short!("ADMIN"); // Admin address (persistent)
pub(crate) const FEES_KEY: Symbol = symbol_short!("FEES"); // FeeConfig (persistent)
const NFT_CONTRACT_KEY: Symbol = symbol_short!("NFT_CTR"); // Accepted collection, set by initialize (instance)
const PAUSED_KEY: Symbol = symbol_short!("PAUSED"); // Pause flag (instance)

/// Number of ledgers in a day (assuming ~5 second close time)
pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_TTL_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const INSTANCE_TTL_THRESHOLD: u32 = INSTANCE_TTL_AMOUNT - DAY_IN_LEDGERS;

pub(crate) const ENTRY_TTL_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const ENTRY_TTL_THRESHOLD: u32 = ENTRY_TTL_AMOUNT - DAY_IN_LEDGERS;

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_AMOUNT);
}

/// Keeps a persistent entry alive for another `ENTRY_TTL_AMOUNT` ledgers
/// once it drops below the threshold. The entry must exist.
fn extend_entry_ttl<K: IntoVal<Env, Val>>(env: &Env, key: &K) {
    env.storage()
        .persistent()
        .extend_ttl(key, ENTRY_TTL_THRESHOLD, ENTRY_TTL_AMOUNT);
}

// ---------------------------------------------------------------------------
// Admin & fees
// ---------------------------------------------------------------------------

pub fn read_admin(env: &Env) -> Option<Address> {
    let admin = env.storage().persistent().get(&ADMIN_KEY);
    if admin.is_some() {
        extend_entry_ttl(env, &ADMIN_KEY);
    }
    admin
}

pub fn write_admin(env: &Env, admin: &Address) {
    env.storage().persistent().set(&ADMIN_KEY, admin);
    extend_entry_ttl(env, &ADMIN_KEY);
}

/// The constructor always writes a fee config, so a missing entry means the
/// contract was deployed without one.
pub fn read_fee_config(env: &Env) -> FeeConfig {
    let config = env
        .storage()
        .persistent()
        .get(&FEES_KEY)
        .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));
    extend_entry_ttl(env, &FEES_KEY);
    config
}

pub fn write_fee_config(env: &Env, config: &FeeConfig) {
    env.storage().persistent().set(&FEES_KEY, config);
    extend_entry_ttl(env, &FEES_KEY);
}

// ---------------------------------------------------------------------------
// Initialization & pause
// ---------------------------------------------------------------------------

pub fn read_nft_contract(env: &Env) -> Option<Address> {
    env.storage().instance().get(&NFT_CONTRACT_KEY)
}

pub fn write_nft_contract(env: &Env, nft_contract: &Address) {
    env.storage().instance().set(&NFT_CONTRACT_KEY, nft_contract);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage().instance().get(&PAUSED_KEY).unwrap_or(false)
}

pub fn write_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&PAUSED_KEY, &paused);
}

// ---------------------------------------------------------------------------
// Whitelist
// ---------------------------------------------------------------------------

pub fn is_whitelisted(env: &Env, ft_contract: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Whitelist(ft_contract.clone()))
        .unwrap_or(false)
}

pub fn write_whitelisted(env: &Env, ft_contract: &Address, enabled: bool) {
    let key = DataKey::Whitelist(ft_contract.clone());
    env.storage().persistent().set(&key, &enabled);
    extend_entry_ttl(env, &key);
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// Reading a listing also renews its TTL, so a listing that is only ever
/// quoted or looked up does not get archived.
pub fn read_listing(env: &Env, token_id: u64) -> Option<Listing> {
    let key = DataKey::Listing(token_id);
    let listing = env.storage().persistent().get(&key);
    if listing.is_some() {
        extend_entry_ttl(env, &key);
    }
    listing
}

pub fn has_listing(env: &Env, token_id: u64) -> bool {
    env.storage().persistent().has(&DataKey::Listing(token_id))
}

pub fn write_listing(env: &Env, listing: &Listing) {
    let key = DataKey::Listing(listing.token_id);
    env.storage().persistent().set(&key, listing);
    extend_entry_ttl(env, &key);
}

pub fn remove_listing(env: &Env, token_id: u64) {
    env.storage().persistent().remove(&DataKey::Listing(token_id));
}
