//! Transaction-sequence simulation.
//!
//! A [`Simulation`] is a queue of `(sender, call, expected outcome)` steps
//! applied one by one to a deployed marketplace. Each step is a separate
//! contract invocation, so a failing step leaves no trace in the ledger and
//! later steps see exactly the state the successful ones produced. Running
//! the queue yields a [`Report`] pairing every expectation with what
//! actually happened.

#![cfg(any(test, feature = "testutils"))]

extern crate std;

use core::fmt;
use std::string::String;
use std::vec::Vec;

use soroban_sdk::Address;

use crate::{Error, NftMarketplaceContractClient};

/// One marketplace entry point with its arguments. The caller is supplied by
/// the enclosing [`Step`].
#[derive(Clone, Debug)]
pub enum Call {
    Initialize {
        nft_contract: Address,
    },
    WhitelistFt {
        ft_contract: Address,
        enabled: bool,
    },
    ListNft {
        token_id: u64,
        nft_contract: Address,
        ft_contract: Address,
        price: i128,
    },
    BuyNft {
        token_id: u64,
        nft_contract: Address,
        ft_contract: Address,
    },
    UnlistNft {
        token_id: u64,
        nft_contract: Address,
    },
    UpdatePrice {
        token_id: u64,
        price: i128,
    },
    UpdateListingFt {
        token_id: u64,
        ft_contract: Address,
        price: i128,
    },
    SetRoyaltyPercent(u32),
    SetRoyaltyRecipient(Address),
    SetPlatformFee(u32),
    SetPlatformRecipient(Address),
    SetPaused(bool),
    AdminEmergencyReturn {
        token_id: u64,
        nft_contract: Address,
    },
}

impl Call {
    /// Contract function name invoked by this call.
    pub fn function_name(&self) -> &'static str {
        match self {
            Call::Initialize { .. } => "initialize",
            Call::WhitelistFt { .. } => "whitelist_ft",
            Call::ListNft { .. } => "list_nft",
            Call::BuyNft { .. } => "buy_nft",
            Call::UnlistNft { .. } => "unlist_nft",
            Call::UpdatePrice { .. } => "update_price",
            Call::UpdateListingFt { .. } => "update_listing_ft",
            Call::SetRoyaltyPercent(_) => "set_royalty_percent",
            Call::SetRoyaltyRecipient(_) => "set_royalty_recipient",
            Call::SetPlatformFee(_) => "set_platform_fee",
            Call::SetPlatformRecipient(_) => "set_platform_recipient",
            Call::SetPaused(_) => "set_paused",
            Call::AdminEmergencyReturn { .. } => "admin_emergency_return",
        }
    }
}

/// Result of applying one step.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The call returned `Ok`.
    Ok,
    /// The call returned a marketplace error.
    Err(Error),
    /// The invocation trapped in the host or in another contract.
    Aborted,
}

impl Outcome {
    /// Collapses the nested result returned by a generated `try_*` client method.
    pub fn from_try<T, C, I>(result: Result<Result<T, C>, Result<Error, I>>) -> Self {
        match result {
            Ok(Ok(_)) => Outcome::Ok,
            Err(Ok(error)) => Outcome::Err(error),
            Ok(Err(_)) | Err(Err(_)) => Outcome::Aborted,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok => write!(f, "ok"),
            Outcome::Err(error) => write!(f, "err u{} ({:?})", *error as u32, error),
            Outcome::Aborted => write!(f, "aborted"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Step {
    pub label: String,
    pub sender: Address,
    pub call: Call,
    pub expected: Outcome,
}

#[derive(Clone, Debug)]
pub struct StepRecord {
    pub index: usize,
    pub label: String,
    pub function: &'static str,
    pub expected: Outcome,
    pub actual: Outcome,
}

impl StepRecord {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

/// Ordered command queue over a marketplace client.
pub struct Simulation {
    client: NftMarketplaceContractClient<'static>,
    queue: Vec<Step>,
}

impl Simulation {
    pub fn new(client: &NftMarketplaceContractClient<'static>) -> Self {
        Simulation {
            client: NftMarketplaceContractClient::new(&client.env, &client.address),
            queue: Vec::new(),
        }
    }

    pub fn push(&mut self, label: &str, sender: &Address, call: Call, expected: Outcome) {
        self.queue.push(Step {
            label: label.into(),
            sender: sender.clone(),
            call,
            expected,
        });
    }

    pub fn expect_ok(&mut self, label: &str, sender: &Address, call: Call) {
        self.push(label, sender, call, Outcome::Ok);
    }

    pub fn expect_err(&mut self, label: &str, sender: &Address, call: Call, error: Error) {
        self.push(label, sender, call, Outcome::Err(error));
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Applies every queued step in order and records its outcome.
    ///
    /// Steps are never skipped: a failed step is recorded and the run moves on.
    pub fn run(self) -> Report {
        let records = self
            .queue
            .iter()
            .enumerate()
            .map(|(index, step)| StepRecord {
                index,
                label: step.label.clone(),
                function: step.call.function_name(),
                expected: step.expected,
                actual: self.apply(&step.sender, &step.call),
            })
            .collect();

        Report { records }
    }

    fn apply(&self, sender: &Address, call: &Call) -> Outcome {
        let client = &self.client;
        match call {
            Call::Initialize { nft_contract } => {
                Outcome::from_try(client.try_initialize(sender, nft_contract))
            }
            Call::WhitelistFt {
                ft_contract,
                enabled,
            } => Outcome::from_try(client.try_whitelist_ft(sender, ft_contract, enabled)),
            Call::ListNft {
                token_id,
                nft_contract,
                ft_contract,
                price,
            } => Outcome::from_try(client.try_list_nft(
                sender,
                token_id,
                nft_contract,
                ft_contract,
                price,
            )),
            Call::BuyNft {
                token_id,
                nft_contract,
                ft_contract,
            } => Outcome::from_try(client.try_buy_nft(sender, token_id, nft_contract, ft_contract)),
            Call::UnlistNft {
                token_id,
                nft_contract,
            } => Outcome::from_try(client.try_unlist_nft(sender, token_id, nft_contract)),
            Call::UpdatePrice { token_id, price } => {
                Outcome::from_try(client.try_update_price(sender, token_id, price))
            }
            Call::UpdateListingFt {
                token_id,
                ft_contract,
                price,
            } => Outcome::from_try(client.try_update_listing_ft(
                sender,
                token_id,
                ft_contract,
                price,
            )),
            Call::SetRoyaltyPercent(bps) => {
                Outcome::from_try(client.try_set_royalty_percent(sender, bps))
            }
            Call::SetRoyaltyRecipient(recipient) => {
                Outcome::from_try(client.try_set_royalty_recipient(sender, recipient))
            }
            Call::SetPlatformFee(bps) => Outcome::from_try(client.try_set_platform_fee(sender, bps)),
            Call::SetPlatformRecipient(recipient) => {
                Outcome::from_try(client.try_set_platform_recipient(sender, recipient))
            }
            Call::SetPaused(paused) => Outcome::from_try(client.try_set_paused(sender, paused)),
            Call::AdminEmergencyReturn {
                token_id,
                nft_contract,
            } => Outcome::from_try(client.try_admin_emergency_return(
                sender,
                token_id,
                nft_contract,
            )),
        }
    }
}

/// Recorded outcomes of a simulation run, in submission order.
#[derive(Clone, Debug)]
pub struct Report {
    pub records: Vec<StepRecord>,
}

impl Report {
    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> {
        self.records.iter().filter(|record| !record.passed())
    }

    /// Actual outcome of the first step with this label.
    pub fn outcome(&self, label: &str) -> Option<Outcome> {
        self.records
            .iter()
            .find(|record| record.label == label)
            .map(|record| record.actual)
    }

    pub fn all_passed(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Panics with the full step table if any step did not match its expectation.
    pub fn assert_all_passed(&self) {
        if !self.all_passed() {
            panic!("simulation diverged from expectations\n{}", self);
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            let marker = if record.passed() { "pass" } else { "FAIL" };
            writeln!(
                f,
                "[{}] #{:02} {:<40} {:<24} expected {}, got {}",
                marker, record.index, record.label, record.function, record.expected, record.actual
            )?;
        }
        Ok(())
    }
}
