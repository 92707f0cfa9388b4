use std::sync::Arc;

use proptest::prelude::*;

use tokenfarm_farm::{accrued_reward, FarmConfig, FarmError, TokenFarm};
use tokenfarm_nullables::NullAsset;
use tokenfarm_token::AssetLedger;
use tokenfarm_types::{AccountId, BlockNumber};

const USERS: u64 = 4;

#[derive(Clone, Debug)]
enum Op {
    Deposit { user: u64, amount: u128 },
    Withdraw { user: u64 },
    Claim { user: u64 },
    Distribute,
    Mine { blocks: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..USERS, 1u128..10_000).prop_map(|(user, amount)| Op::Deposit { user, amount }),
        (0..USERS).prop_map(|user| Op::Withdraw { user }),
        (0..USERS).prop_map(|user| Op::Claim { user }),
        Just(Op::Distribute),
        (0u64..20).prop_map(|blocks| Op::Mine { blocks }),
    ]
}

fn user(n: u64) -> AccountId {
    AccountId::from_seed(n + 1)
}

fn farm_with_rate(rate: u64) -> (TokenFarm, Arc<NullAsset>, Arc<NullAsset>) {
    let farm_id = AccountId::from_seed(0xfa);
    let staking = Arc::new(NullAsset::new());
    let reward = Arc::new(NullAsset::new());
    for n in 0..USERS {
        staking.set_balance(&user(n), 1_000_000_000);
    }
    reward.set_balance(&farm_id, u128::MAX / 2);
    let config = FarmConfig {
        reward_rate_per_block: rate,
        ..FarmConfig::default()
    };
    let farm = TokenFarm::new(farm_id, &config, staking.clone(), reward.clone());
    (farm, staking, reward)
}

proptest! {
    /// Ledger identities hold after every operation, pending rewards only fall
    /// through claims (to exactly zero), and claimed value lands in the
    /// claimer's reward balance.
    #[test]
    fn random_operation_sequences_preserve_invariants(
        rate in 0u64..1_000,
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let (mut farm, staking, reward) = farm_with_rate(rate);
        let mut now = BlockNumber::new(0);
        let mut claimed_total: u128 = 0;

        for op in ops {
            let before: Vec<u128> = (0..USERS)
                .map(|n| farm.get_account(&user(n)).map(|a| a.pending_rewards).unwrap_or(0))
                .collect();
            let mut claimed_by = None;

            match op {
                Op::Deposit { user: u, amount } => {
                    let result = farm.deposit(&user(u), amount, now);
                    prop_assert!(result.is_ok(), "deposit failed: {:?}", result);
                }
                Op::Withdraw { user: u } => {
                    let staked = farm.get_account(&user(u)).map(|a| a.staking_balance).unwrap_or(0);
                    let result = farm.withdraw(&user(u), now);
                    if staked == 0 {
                        prop_assert!(matches!(result, Err(FarmError::NothingStaked)));
                    } else {
                        prop_assert_eq!(result.unwrap(), staked);
                        prop_assert_eq!(farm.get_account(&user(u)).unwrap().staking_balance, 0);
                    }
                }
                Op::Claim { user: u } => {
                    let preview = farm.pending_rewards_at(&user(u), now).unwrap();
                    let balance_before = reward.balance_of(&user(u));
                    match farm.claim_rewards(&user(u), now) {
                        Ok(paid) => {
                            prop_assert_eq!(paid, preview);
                            prop_assert_eq!(reward.balance_of(&user(u)) - balance_before, paid);
                            prop_assert_eq!(farm.get_account(&user(u)).unwrap().pending_rewards, 0);
                            claimed_total += paid;
                            claimed_by = Some(u);
                        }
                        Err(FarmError::NothingToClaim) => prop_assert_eq!(preview, 0),
                        Err(e) => prop_assert!(false, "unexpected claim error: {}", e),
                    }
                }
                Op::Distribute => {
                    farm.distribute_rewards_all(now).unwrap();
                }
                Op::Mine { blocks } => now = now.advanced_by(blocks),
            }

            farm.verify_invariants().unwrap();
            for n in 0..USERS {
                if claimed_by == Some(n) {
                    continue;
                }
                let after = farm.get_account(&user(n)).map(|a| a.pending_rewards).unwrap_or(0);
                prop_assert!(after >= before[n as usize], "pending rewards decreased without a claim");
            }
        }

        let staked_sum: u128 = (0..USERS)
            .map(|n| farm.get_account(&user(n)).map(|a| a.staking_balance).unwrap_or(0))
            .sum();
        prop_assert_eq!(farm.total_staked(), staked_sum);
        prop_assert_eq!(staking.balance_of(farm.address()), staked_sum);
        prop_assert_eq!(farm.pool().rewards_claimed(), claimed_total);
        prop_assert_eq!(
            farm.pool().rewards_settled(),
            claimed_total + farm.pool().total_pending()
        );
    }

    /// Larger stake over the same window never earns less, and with enough
    /// blocks both stakes earn something.
    #[test]
    fn larger_stake_earns_more(
        a in 1u128..1_000_000,
        extra in 1u128..1_000_000,
        rate in 1u64..1_000_000,
        blocks in 1u64..10_000,
    ) {
        let b = a + extra;
        let (mut farm, _, _) = farm_with_rate(rate);
        farm.deposit(&user(0), a, BlockNumber::new(0)).unwrap();
        farm.deposit(&user(1), b, BlockNumber::new(0)).unwrap();
        farm.distribute_rewards_all(BlockNumber::new(blocks)).unwrap();

        let pa = farm.get_account(&user(0)).unwrap().pending_rewards;
        let pb = farm.get_account(&user(1)).unwrap().pending_rewards;
        prop_assert!(pb >= pa);
        let emitted = u128::from(rate) * u128::from(blocks);
        if emitted >= a + b {
            prop_assert!(pa > 0);
            prop_assert!(pb > pa);
        }
        // Truncation loses at most one unit per account.
        prop_assert!(pa + pb <= emitted);
        prop_assert!(pa + pb + 2 > emitted);
    }

    /// Back-to-back distributions in one block credit nothing the second time.
    #[test]
    fn distribution_is_idempotent_within_a_block(
        stakes in prop::collection::vec(1u128..100_000, 1..4),
        rate in 1u64..10_000,
        blocks in 0u64..1_000,
    ) {
        let (mut farm, _, _) = farm_with_rate(rate);
        for (n, stake) in stakes.iter().enumerate() {
            farm.deposit(&user(n as u64), *stake, BlockNumber::new(0)).unwrap();
        }
        let now = BlockNumber::new(blocks);
        farm.distribute_rewards_all(now).unwrap();
        let snapshot: Vec<_> = farm
            .known_stakers()
            .iter()
            .map(|id| farm.get_account(id).cloned())
            .collect();
        let report = farm.distribute_rewards_all(now).unwrap();
        let again: Vec<_> = farm
            .known_stakers()
            .iter()
            .map(|id| farm.get_account(id).cloned())
            .collect();
        prop_assert_eq!(report.rewards_credited, 0);
        prop_assert_eq!(snapshot, again);
    }

    /// The accrual formula agrees with exact rational arithmetic, floored.
    #[test]
    fn accrual_matches_floor_of_exact_share(
        rate in 0u128..1_000_000_000,
        elapsed in 0u64..1_000_000,
        stake in 0u128..1_000_000_000,
        extra in 0u128..1_000_000_000,
    ) {
        let total = stake + extra;
        let reward = accrued_reward(rate, elapsed, stake, total).unwrap();
        let expected = if total == 0 {
            0
        } else {
            rate * u128::from(elapsed) * stake / total
        };
        prop_assert_eq!(reward, expected);
    }
}
