//! Test fixtures: a minimal NFT collection and a deployed marketplace with
//! funded payment tokens.

#![cfg(any(test, feature = "testutils"))]

use soroban_sdk::{
    contract, contractimpl, contracttype,
    testutils::{Address as _, IssuerFlags},
    token, Address, Env,
};

use crate::nft::NftInterface;
use crate::{NftMarketplaceContract, NftMarketplaceContractClient};

#[contracttype]
#[derive(Clone)]
enum NftDataKey {
    Owner(u64),
}

/// Bare-bones NFT collection: one owner per token id, owner-authorized transfers.
#[contract]
pub struct TestNft;

#[contractimpl]
impl TestNft {
    pub fn mint(env: Env, to: Address, token_id: u64) {
        let key = NftDataKey::Owner(token_id);
        if env.storage().persistent().has(&key) {
            panic!("token already minted");
        }
        env.storage().persistent().set(&key, &to);
    }
}

#[contractimpl]
impl NftInterface for TestNft {
    fn owner_of(env: Env, token_id: u64) -> Address {
        env.storage()
            .persistent()
            .get(&NftDataKey::Owner(token_id))
            .unwrap_or_else(|| panic!("token does not exist"))
    }

    fn transfer(env: Env, from: Address, to: Address, token_id: u64) {
        from.require_auth();

        let key = NftDataKey::Owner(token_id);
        let owner: Address = env
            .storage()
            .persistent()
            .get(&key)
            .unwrap_or_else(|| panic!("token does not exist"));
        if owner != from {
            panic!("not token owner");
        }
        env.storage().persistent().set(&key, &to);
    }
}

/// A freshly deployed marketplace plus the contracts and accounts around it.
///
/// The marketplace is deployed but not initialized. `ft` and `alt_ft` are
/// Stellar asset contracts that can be minted freely; `other_nft` is a second
/// collection that is never accepted by the marketplace.
pub struct Marketplace {
    pub env: Env,
    pub client: NftMarketplaceContractClient<'static>,
    pub admin: Address,
    pub nft: TestNftClient<'static>,
    pub other_nft: TestNftClient<'static>,
    pub ft: Address,
    pub alt_ft: Address,
}

impl Marketplace {
    pub fn setup() -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let admin = Address::generate(&env);
        let contract_id = env.register(NftMarketplaceContract, (admin.clone(),));
        let client = NftMarketplaceContractClient::new(&env, &contract_id);

        let nft = TestNftClient::new(&env, &env.register(TestNft, ()));
        let other_nft = TestNftClient::new(&env, &env.register(TestNft, ()));

        let issuer = Address::generate(&env);
        let ft = env.register_stellar_asset_contract_v2(issuer.clone()).address();
        let alt_ft = env.register_stellar_asset_contract_v2(issuer).address();

        Marketplace {
            env,
            client,
            admin,
            nft,
            other_nft,
            ft,
            alt_ft,
        }
    }

    /// Deploys, binds the marketplace to `nft` and whitelists `ft`.
    pub fn initialized() -> Self {
        let market = Self::setup();
        market.client.initialize(&market.admin, &market.nft.address);
        market.client.whitelist_ft(&market.admin, &market.ft, &true);
        market
    }

    pub fn account(&self) -> Address {
        Address::generate(&self.env)
    }

    pub fn mint_nfts(&self, owner: &Address, token_ids: &[u64]) {
        for token_id in token_ids {
            self.nft.mint(owner, token_id);
        }
    }

    pub fn fund(&self, ft: &Address, account: &Address, amount: i128) {
        token::StellarAssetClient::new(&self.env, ft).mint(account, &amount);
    }

    /// Registers a Stellar asset whose issuer may revoke authorization.
    pub fn revocable_token(&self) -> Address {
        let sac = self.env.register_stellar_asset_contract_v2(self.account());
        sac.issuer().set_flag(IssuerFlags::RevocableFlag);
        sac.address()
    }

    /// Freezes `account` in `ft`: it can neither send nor receive it.
    /// `ft` must come from `revocable_token`.
    pub fn deauthorize(&self, ft: &Address, account: &Address) {
        token::StellarAssetClient::new(&self.env, ft).set_authorized(account, &false);
    }

    pub fn balance(&self, ft: &Address, account: &Address) -> i128 {
        token::Client::new(&self.env, ft).balance(account)
    }

    pub fn nft_owner(&self, token_id: u64) -> Address {
        self.nft.owner_of(&token_id)
    }

    /// Lists `token_id` from `seller` for `price` in the default payment token.
    pub fn list(&self, seller: &Address, token_id: u64, price: i128) {
        self.client
            .list_nft(seller, &token_id, &self.nft.address, &self.ft, &price);
    }

    pub fn buy(&self, buyer: &Address, token_id: u64) {
        self.client
            .buy_nft(buyer, &token_id, &self.nft.address, &self.ft);
    }
}
