/*!
 * NFT Listing Marketplace Smart Contract
 *
 * Sellers list NFTs from a single accepted collection for a price in a
 * whitelisted fungible token. The NFT is held in escrow by the contract until
 * it is bought, unlisted, or returned by the admin.
 *
 * Key features:
 * - Payment token whitelist managed by the admin
 * - Royalty and platform fees (basis points, capped) split out of every sale
 * - Global pause that never prevents owners from reclaiming their NFTs
 * - Admin emergency return of any escrowed NFT
 *
 * Every entry point is atomic: any returned error rolls back the whole
 * invocation, including transfers already made to other contracts.
 */

#![no_std]

mod fees;
pub mod nft;
mod storage;
mod types;

#[cfg(any(test, feature = "testutils"))]
pub mod sim;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;


use soroban_sdk::{contract, contractimpl, log, token, Address, Env};

pub use fees::{
    fee_amount, split_price, BASIS_POINTS_DIVISOR, DEFAULT_PLATFORM_BPS, DEFAULT_ROYALTY_BPS,
    MAX_PLATFORM_BPS, MAX_ROYALTY_BPS,
};
pub use types::{Error, FeeConfig, Listing, SaleBreakdown};

use nft::NftClient;
use types::{
    ADMIN_UPDATED, EMERGENCY_RETURNED, FT_WHITELISTED, INITIALIZED, LISTING_FT_UPDATED,
    NFT_LISTED, NFT_SOLD, NFT_UNLISTED, PAUSE_CHANGED, PLATFORM_FEE_UPDATED,
    PLATFORM_RECIPIENT_UPDATED, PRICE_UPDATED, ROYALTY_RECIPIENT_UPDATED, ROYALTY_UPDATED,
};

#[contract]
pub struct NftMarketplaceContract;

#[contractimpl]
impl NftMarketplaceContract {
    /// Runs once at deployment.
    ///
    /// Records the admin and the default fee configuration (2.5% royalty and
    /// 2.5% platform fee, both paid to the admin). The marketplace starts
    /// unpaused and uninitialized: listing is rejected until `initialize`
    /// binds it to an NFT collection.
    pub fn __constructor(env: Env, admin: Address) {
        storage::write_admin(&env, &admin);
        storage::write_fee_config(
            &env,
            &FeeConfig {
                royalty_bps: DEFAULT_ROYALTY_BPS,
                royalty_recipient: admin.clone(),
                platform_bps: DEFAULT_PLATFORM_BPS,
                platform_recipient: admin,
            },
        );
        storage::write_paused(&env, false);
        storage::extend_instance_ttl(&env);
    }

    /// Binds the marketplace to the NFT collection it will trade.
    ///
    /// # Arguments
    /// * `caller` - Must be the admin
    /// * `nft_contract` - The only collection accepted by `list_nft`
    ///
    /// # Errors
    /// - NotAuthorized: If caller is not the admin
    /// - AlreadyInitialized: If a collection was already set
    pub fn initialize(env: Env, caller: Address, nft_contract: Address) -> Result<(), Error> {
        Self::_require_admin(&env, &caller)?;

        if storage::read_nft_contract(&env).is_some() {
            return Err(Error::AlreadyInitialized);
        }

        storage::write_nft_contract(&env, &nft_contract);
        storage::extend_instance_ttl(&env);

        env.events().publish((INITIALIZED, caller), nft_contract);

        Ok(())
    }

    /// Verifies `caller` signed the transaction and is the stored admin.
    fn _require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();

        match storage::read_admin(env) {
            Some(admin) if admin == *caller => Ok(()),
            _ => Err(Error::NotAuthorized),
        }
    }

    fn _require_not_paused(env: &Env) -> Result<(), Error> {
        if storage::is_paused(env) {
            return Err(Error::Paused);
        }
        Ok(())
    }

    /// Moves `token_id` between two parties through the collection contract.
    fn _transfer_nft(
        env: &Env,
        nft_contract: &Address,
        from: &Address,
        to: &Address,
        token_id: u64,
    ) -> Result<(), Error> {
        let nft_client = NftClient::new(env, nft_contract);
        match nft_client.try_transfer(from, to, &token_id) {
            Ok(Ok(())) => Ok(()),
            _ => {
                log!(env, "NFT transfer failed for token {}", token_id);
                Err(Error::TokenTransferFailed)
            }
        }
    }

    /// Pays one part of a sale. Zero parts are skipped.
    fn _pay(
        env: &Env,
        ft_client: &token::Client,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), Error> {
        if amount <= 0 {
            return Ok(());
        }
        match ft_client.try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => {
                log!(env, "Payment transfer of {} failed", amount);
                Err(Error::TokenTransferFailed)
            }
        }
    }

    // ================================================================================================
    // LISTING LIFECYCLE
    // ================================================================================================

    /// Lists an NFT for sale and moves it into escrow.
    ///
    /// # Business Flow
    /// 1. Validates pause state, initialization and the collection address
    /// 2. Validates price and payment token whitelist
    /// 3. Ensures the token is not already listed and belongs to the seller
    /// 4. Transfers the NFT from the seller to the contract
    /// 5. Stores the listing and emits an event
    ///
    /// # Arguments
    /// * `seller` - Current NFT owner (must sign transaction)
    /// * `token_id` - Token to list
    /// * `nft_contract` - Must equal the collection set by `initialize`
    /// * `ft_contract` - Whitelisted token the buyer will pay with
    /// * `price` - Asking price in the smallest unit of `ft_contract`
    ///
    /// # Errors
    /// - Paused: If the marketplace is paused
    /// - NotInitialized: If no collection was set yet
    /// - WrongNft: If `nft_contract` is not the accepted collection
    /// - InvalidPrice: If price is not positive
    /// - FtNotWhitelisted: If `ft_contract` is not whitelisted
    /// - AlreadyListed: If the token already has a listing
    /// - NotOwner: If the seller does not own the token
    /// - TokenTransferFailed: If the collection refuses the escrow transfer
    pub fn list_nft(
        env: Env,
        seller: Address,
        token_id: u64,
        nft_contract: Address,
        ft_contract: Address,
        price: i128,
    ) -> Result<(), Error> {
        seller.require_auth();
        Self::_require_not_paused(&env)?;

        let accepted = storage::read_nft_contract(&env).ok_or(Error::NotInitialized)?;
        if nft_contract != accepted {
            return Err(Error::WrongNft);
        }

        if price <= 0 {
            return Err(Error::InvalidPrice);
        }

        if !storage::is_whitelisted(&env, &ft_contract) {
            return Err(Error::FtNotWhitelisted);
        }

        // An escrowed token is owned by the contract, so this must be checked
        // before ownership to report the right error.
        if storage::has_listing(&env, token_id) {
            return Err(Error::AlreadyListed);
        }

        let nft_client = NftClient::new(&env, &nft_contract);
        match nft_client.try_owner_of(&token_id) {
            Ok(Ok(owner)) if owner == seller => {}
            _ => {
                log!(&env, "Seller does not own token {}", token_id);
                return Err(Error::NotOwner);
            }
        }

        Self::_transfer_nft(
            &env,
            &nft_contract,
            &seller,
            &env.current_contract_address(),
            token_id,
        )?;

        let listing = Listing {
            token_id,
            owner: seller.clone(),
            nft_contract,
            ft_contract: ft_contract.clone(),
            price,
        };
        storage::write_listing(&env, &listing);
        storage::extend_instance_ttl(&env);

        env.events()
            .publish((NFT_LISTED, seller), (token_id, ft_contract, price));

        Ok(())
    }

    /// Buys a listed NFT at its current price.
    ///
    /// The price is split into royalty, platform fee and seller proceeds using
    /// the fee configuration at the time of purchase. The buyer pays each part
    /// directly to its recipient, then receives the NFT from escrow.
    ///
    /// # Arguments
    /// * `buyer` - Paying address (must sign transaction)
    /// * `token_id` - Listed token
    /// * `nft_contract` - Must match the listing's collection
    /// * `ft_contract` - Must match the listing's payment token
    ///
    /// # Errors
    /// - Paused: If the marketplace is paused
    /// - NotListed: If the token has no listing
    /// - WrongNft: If `nft_contract` differs from the listing
    /// - WrongFt: If `ft_contract` differs from the listing
    /// - FtNotWhitelisted: If the payment token was removed from the whitelist
    /// - CannotBuyOwn: If the buyer is the listing owner
    /// - InsufficientFunds: If the buyer balance is below the price
    /// - TokenTransferFailed: If a payment or the NFT transfer fails
    pub fn buy_nft(
        env: Env,
        buyer: Address,
        token_id: u64,
        nft_contract: Address,
        ft_contract: Address,
    ) -> Result<(), Error> {
        buyer.require_auth();
        Self::_require_not_paused(&env)?;

        let listing = storage::read_listing(&env, token_id).ok_or(Error::NotListed)?;

        if nft_contract != listing.nft_contract {
            return Err(Error::WrongNft);
        }
        if ft_contract != listing.ft_contract {
            return Err(Error::WrongFt);
        }
        if !storage::is_whitelisted(&env, &ft_contract) {
            return Err(Error::FtNotWhitelisted);
        }
        if buyer == listing.owner {
            return Err(Error::CannotBuyOwn);
        }

        let ft_client = token::Client::new(&env, &ft_contract);
        let balance = ft_client.balance(&buyer);
        if balance < listing.price {
            log!(
                &env,
                "Insufficient balance. Required: {}, Available: {}",
                listing.price,
                balance
            );
            return Err(Error::InsufficientFunds);
        }

        let config = storage::read_fee_config(&env);
        let split = fees::split_price(listing.price, config.royalty_bps, config.platform_bps);

        // Checks-effects-interactions: drop the listing before any transfer
        storage::remove_listing(&env, token_id);

        Self::_pay(&env, &ft_client, &buyer, &listing.owner, split.seller)?;
        Self::_pay(&env, &ft_client, &buyer, &config.royalty_recipient, split.royalty)?;
        Self::_pay(&env, &ft_client, &buyer, &config.platform_recipient, split.platform)?;

        Self::_transfer_nft(
            &env,
            &listing.nft_contract,
            &env.current_contract_address(),
            &buyer,
            token_id,
        )?;

        env.events().publish(
            (NFT_SOLD, buyer),
            (token_id, split.price, split.royalty, split.platform),
        );

        Ok(())
    }

    /// Removes a listing and returns the NFT to its owner.
    ///
    /// Allowed while the marketplace is paused and regardless of the payment
    /// token's whitelist status, so an owner can always reclaim their NFT.
    ///
    /// # Errors
    /// - NotListed: If the token has no listing
    /// - WrongNft: If `nft_contract` differs from the listing
    /// - NotOwner: If caller is not the listing owner
    /// - TokenTransferFailed: If the NFT cannot be returned
    pub fn unlist_nft(
        env: Env,
        caller: Address,
        token_id: u64,
        nft_contract: Address,
    ) -> Result<(), Error> {
        caller.require_auth();

        let listing = storage::read_listing(&env, token_id).ok_or(Error::NotListed)?;

        if nft_contract != listing.nft_contract {
            return Err(Error::WrongNft);
        }
        if caller != listing.owner {
            return Err(Error::NotOwner);
        }

        storage::remove_listing(&env, token_id);

        Self::_transfer_nft(
            &env,
            &listing.nft_contract,
            &env.current_contract_address(),
            &listing.owner,
            token_id,
        )?;

        env.events().publish((NFT_UNLISTED, caller), token_id);

        Ok(())
    }

    /// Changes the asking price of a listing.
    ///
    /// # Errors
    /// - Paused: If the marketplace is paused
    /// - NotListed: If the token has no listing
    /// - NotOwner: If caller is not the listing owner
    /// - InvalidPrice: If price is not positive
    pub fn update_price(env: Env, caller: Address, token_id: u64, price: i128) -> Result<(), Error> {
        caller.require_auth();
        Self::_require_not_paused(&env)?;

        let mut listing = storage::read_listing(&env, token_id).ok_or(Error::NotListed)?;

        if caller != listing.owner {
            return Err(Error::NotOwner);
        }
        if price <= 0 {
            return Err(Error::InvalidPrice);
        }

        listing.price = price;
        storage::write_listing(&env, &listing);

        env.events().publish((PRICE_UPDATED, caller), (token_id, price));

        Ok(())
    }

    /// Changes the payment token and price of a listing together.
    ///
    /// # Errors
    /// - Paused: If the marketplace is paused
    /// - NotListed: If the token has no listing
    /// - NotOwner: If caller is not the listing owner
    /// - InvalidPrice: If price is not positive
    /// - FtNotWhitelisted: If the new payment token is not whitelisted
    pub fn update_listing_ft(
        env: Env,
        caller: Address,
        token_id: u64,
        ft_contract: Address,
        price: i128,
    ) -> Result<(), Error> {
        caller.require_auth();
        Self::_require_not_paused(&env)?;

        let mut listing = storage::read_listing(&env, token_id).ok_or(Error::NotListed)?;

        if caller != listing.owner {
            return Err(Error::NotOwner);
        }
        if price <= 0 {
            return Err(Error::InvalidPrice);
        }
        if !storage::is_whitelisted(&env, &ft_contract) {
            return Err(Error::FtNotWhitelisted);
        }

        listing.ft_contract = ft_contract.clone();
        listing.price = price;
        storage::write_listing(&env, &listing);

        env.events()
            .publish((LISTING_FT_UPDATED, caller), (token_id, ft_contract, price));

        Ok(())
    }

    /// Force-returns an escrowed NFT to the address that listed it.
    ///
    /// Admin only. Works while paused.
    ///
    /// # Errors
    /// - NotAuthorized: If caller is not the admin
    /// - NotListed: If the token has no listing
    /// - WrongNft: If `nft_contract` differs from the listing
    /// - TokenTransferFailed: If the NFT cannot be returned
    pub fn admin_emergency_return(
        env: Env,
        caller: Address,
        token_id: u64,
        nft_contract: Address,
    ) -> Result<(), Error> {
        Self::_require_admin(&env, &caller)?;

        let listing = storage::read_listing(&env, token_id).ok_or(Error::NotListed)?;

        if nft_contract != listing.nft_contract {
            return Err(Error::WrongNft);
        }

        storage::remove_listing(&env, token_id);

        Self::_transfer_nft(
            &env,
            &listing.nft_contract,
            &env.current_contract_address(),
            &listing.owner,
            token_id,
        )?;

        env.events()
            .publish((EMERGENCY_RETURNED, caller), (token_id, listing.owner));

        Ok(())
    }

    // ================================================================================================
    // ADMINISTRATIVE FUNCTIONS
    // ================================================================================================

    /// Adds or removes a payment token from the whitelist.
    ///
    /// Removing a token blocks new listings and purchases in it; existing
    /// listings can still be unlisted.
    pub fn whitelist_ft(
        env: Env,
        caller: Address,
        ft_contract: Address,
        enabled: bool,
    ) -> Result<(), Error> {
        Self::_require_admin(&env, &caller)?;

        storage::write_whitelisted(&env, &ft_contract, enabled);

        env.events()
            .publish((FT_WHITELISTED, caller), (ft_contract, enabled));

        Ok(())
    }

    /// Sets the royalty cut in basis points.
    ///
    /// # Errors
    /// - NotAuthorized: If caller is not the admin, or `royalty_bps` exceeds 1000
    pub fn set_royalty_percent(env: Env, caller: Address, royalty_bps: u32) -> Result<(), Error> {
        Self::_require_admin(&env, &caller)?;

        // Cap violations share the authorization error code.
        if royalty_bps > MAX_ROYALTY_BPS {
            return Err(Error::NotAuthorized);
        }

        let mut config = storage::read_fee_config(&env);
        config.royalty_bps = royalty_bps;
        storage::write_fee_config(&env, &config);

        env.events().publish((ROYALTY_UPDATED, caller), royalty_bps);

        Ok(())
    }

    /// Sets the address that receives the royalty cut of future sales.
    ///
    /// # Errors
    /// - NotAuthorized: If caller is not the admin
    pub fn set_royalty_recipient(env: Env, caller: Address, recipient: Address) -> Result<(), Error> {
        Self::_require_admin(&env, &caller)?;

        let mut config = storage::read_fee_config(&env);
        config.royalty_recipient = recipient.clone();
        storage::write_fee_config(&env, &config);

        env.events()
            .publish((ROYALTY_RECIPIENT_UPDATED, caller), recipient);

        Ok(())
    }

    /// Sets the platform cut in basis points.
    ///
    /// # Errors
    /// - NotAuthorized: If caller is not the admin, or `platform_bps` exceeds 500
    pub fn set_platform_fee(env: Env, caller: Address, platform_bps: u32) -> Result<(), Error> {
        Self::_require_admin(&env, &caller)?;

        if platform_bps > MAX_PLATFORM_BPS {
            return Err(Error::NotAuthorized);
        }

        let mut config = storage::read_fee_config(&env);
        config.platform_bps = platform_bps;
        storage::write_fee_config(&env, &config);

        env.events().publish((PLATFORM_FEE_UPDATED, caller), platform_bps);

        Ok(())
    }

    /// Sets the address that receives the platform cut of future sales.
    ///
    /// # Errors
    /// - NotAuthorized: If caller is not the admin
    pub fn set_platform_recipient(env: Env, caller: Address, recipient: Address) -> Result<(), Error> {
        Self::_require_admin(&env, &caller)?;

        let mut config = storage::read_fee_config(&env);
        config.platform_recipient = recipient.clone();
        storage::write_fee_config(&env, &config);

        env.events()
            .publish((PLATFORM_RECIPIENT_UPDATED, caller), recipient);

        Ok(())
    }

    /// Pauses or resumes the marketplace.
    ///
    /// While paused, `list_nft`, `buy_nft`, `update_price` and
    /// `update_listing_ft` fail with `Paused`. Unlisting and all admin
    /// functions keep working.
    pub fn set_paused(env: Env, caller: Address, paused: bool) -> Result<(), Error> {
        Self::_require_admin(&env, &caller)?;

        storage::write_paused(&env, paused);
        storage::extend_instance_ttl(&env);

        env.events().publish((PAUSE_CHANGED, caller), paused);

        Ok(())
    }

    /// Transfers administrative control. Both the current and the new admin
    /// must sign.
    pub fn update_admin(env: Env, caller: Address, new_admin: Address) -> Result<(), Error> {
        Self::_require_admin(&env, &caller)?;
        new_admin.require_auth();

        storage::write_admin(&env, &new_admin);

        env.events().publish((ADMIN_UPDATED, caller), new_admin);

        Ok(())
    }

    // ================================================================================================
    // QUERY FUNCTIONS (GETTERS)
    // ================================================================================================

    /// Current admin address.
    pub fn get_admin(env: Env) -> Option<Address> {
        storage::read_admin(&env)
    }

    /// The accepted NFT collection, or `None` before `initialize`.
    pub fn get_nft_contract(env: Env) -> Option<Address> {
        storage::read_nft_contract(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::read_nft_contract(&env).is_some()
    }

    /// The active listing for `token_id`, or `None` if it is not listed.
    pub fn get_listing(env: Env, token_id: u64) -> Option<Listing> {
        storage::read_listing(&env, token_id)
    }

    pub fn is_whitelisted(env: Env, ft_contract: Address) -> bool {
        storage::is_whitelisted(&env, &ft_contract)
    }

    /// Current fee percentages and recipients.
    pub fn get_fee_config(env: Env) -> FeeConfig {
        storage::read_fee_config(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    /// How the current price of a listing would be split if bought now.
    ///
    /// # Errors
    /// - NotListed: If the token has no listing
    pub fn quote(env: Env, token_id: u64) -> Result<SaleBreakdown, Error> {
        let listing = storage::read_listing(&env, token_id).ok_or(Error::NotListed)?;
        let config = storage::read_fee_config(&env);

        Ok(fees::split_price(
            listing.price,
            config.royalty_bps,
            config.platform_bps,
        ))
    }
}
