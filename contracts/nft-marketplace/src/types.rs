/*!
 * Type Definitions for the NFT Listing Marketplace
 *
 * Data structures stored by the contract, the storage key layout, the error
 * taxonomy surfaced to callers and the event topics published on every
 * successful state change.
 */

use soroban_sdk::{contracterror, contracttype, symbol_short, Address, Symbol};

// ================================================================================================
// CORE DATA STRUCTURES
// ================================================================================================

/// An NFT offered for sale.
///
/// While a listing exists the NFT is held in escrow by the marketplace contract.
/// The listing is removed when the NFT is sold, unlisted by its owner or
/// returned by the admin.
///
/// # Business Logic
/// - At most one listing per `token_id`
/// - `price` is expressed in the smallest unit of `ft_contract` and is always positive
/// - `ft_contract` was whitelisted when the listing was created or last updated
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Listing {
    /// Token id inside the accepted NFT collection
    pub token_id: u64,

    /// Address that listed the NFT and receives it back on unlist or emergency return
    pub owner: Address,

    /// NFT collection the token belongs to (always the initialized collection)
    pub nft_contract: Address,

    /// Fungible token the buyer must pay with
    pub ft_contract: Address,

    /// Asking price in the smallest unit of `ft_contract`
    pub price: i128,
}

/// Royalty and platform fee configuration.
///
/// Both percentages are basis points (1 = 0.01%) taken out of the sale price.
/// The seller receives whatever remains.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeConfig {
    /// Royalty cut in basis points, at most 1000 (10%)
    pub royalty_bps: u32,

    /// Receives the royalty cut of every sale
    pub royalty_recipient: Address,

    /// Platform cut in basis points, at most 500 (5%)
    pub platform_bps: u32,

    /// Receives the platform cut of every sale
    pub platform_recipient: Address,
}

/// How a sale price is divided between the parties.
///
/// `royalty + platform + seller == price` for every breakdown produced by
/// the contract.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleBreakdown {
    pub price: i128,
    pub royalty: i128,
    pub platform: i128,
    pub seller: i128,
}

/// Storage keys for entries that are addressed by a value.
///
/// Singletons (admin, fee config, pause flag, accepted collection) use the
/// short symbol keys declared in `storage.rs`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Active listing for a token id
    Listing(u64),

    /// Whitelist flag for a payment token contract
    Whitelist(Address),
}

// ================================================================================================
// ERROR DEFINITIONS
// ================================================================================================

/// Failures surfaced by the marketplace entry points.
///
/// The numeric codes are part of the public interface: off-chain clients and
/// the simulation scripts match on them. Any error aborts the whole call, so
/// no state is changed when one is returned.
///
/// # Error Code Ranges
/// - 100-104: Access control and listing existence
/// - 105-109: Validation and trading rules
/// - 110-114: Contract configuration and payment
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Caller is not the admin, or an admin setting exceeded its cap
    NotAuthorized = 100,

    /// Token id already has an active listing
    AlreadyListed = 102,

    /// Token id has no active listing
    NotListed = 103,

    /// Caller does not own the listing or the NFT
    NotOwner = 104,

    /// Payment token is not on the whitelist
    FtNotWhitelisted = 105,

    /// NFT or payment token contract refused a transfer
    TokenTransferFailed = 106,

    /// Price is zero or negative
    InvalidPrice = 107,

    /// Listing owner tried to purchase their own NFT
    CannotBuyOwn = 108,

    /// Marketplace is paused
    Paused = 109,

    /// NFT contract differs from the initialized collection or from the listing
    WrongNft = 110,

    /// `initialize` was already called
    AlreadyInitialized = 111,

    /// `initialize` has not been called yet
    NotInitialized = 112,

    /// Payment token differs from the one the listing requires
    WrongFt = 113,

    /// Buyer balance is below the listing price
    InsufficientFunds = 114,
}

// ================================================================================================
// EVENT CONSTANTS
// ================================================================================================
// Topics are published as (TOPIC, actor) with the event data described below.

/// Marketplace bound to its NFT collection. Data: nft_contract
pub const INITIALIZED: Symbol = symbol_short!("init");

/// Payment token whitelist changed. Data: (ft_contract, enabled)
pub const FT_WHITELISTED: Symbol = symbol_short!("wl_ft");

/// NFT listed. Data: (token_id, ft_contract, price)
pub const NFT_LISTED: Symbol = symbol_short!("listed");

/// NFT unlisted by its owner. Data: token_id
pub const NFT_UNLISTED: Symbol = symbol_short!("unlisted");

/// NFT sold. Data: (token_id, price, royalty, platform)
pub const NFT_SOLD: Symbol = symbol_short!("sold");

/// Listing price changed. Data: (token_id, price)
pub const PRICE_UPDATED: Symbol = symbol_short!("price_upd");

/// Listing payment token and price changed. Data: (token_id, ft_contract, price)
pub const LISTING_FT_UPDATED: Symbol = symbol_short!("ft_upd");

/// Royalty percentage changed. Data: royalty_bps
pub const ROYALTY_UPDATED: Symbol = symbol_short!("roy_pct");

/// Royalty recipient changed. Data: recipient
pub const ROYALTY_RECIPIENT_UPDATED: Symbol = symbol_short!("roy_rcpt");

/// Platform fee changed. Data: platform_bps
pub const PLATFORM_FEE_UPDATED: Symbol = symbol_short!("plat_fee");

/// Platform fee recipient changed. Data: recipient
pub const PLATFORM_RECIPIENT_UPDATED: Symbol = symbol_short!("plat_rcpt");

/// Pause flag changed. Data: paused
pub const PAUSE_CHANGED: Symbol = symbol_short!("paused");

/// NFT force-returned to its owner by the admin. Data: (token_id, owner)
pub const EMERGENCY_RETURNED: Symbol = symbol_short!("emrg_ret");

/// Admin changed. Data: new_admin
pub const ADMIN_UPDATED: Symbol = symbol_short!("adm_upd");
