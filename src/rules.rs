use std::collections::HashMap;

use crate::models::{AvatarCategory, AvatarPart, AvatarPartType, Award, DifficultyLevel};

const LOW_LEVEL_COINS: i64 = 5;
const BASIC_LEVEL_COINS: i64 = 30;
const SILVER_LEVEL_COINS: i64 = 100;
const GOLD_LEVEL_COINS: i64 = 200;
const PLATINUM_LEVEL_COINS: i64 = 500;
const EXTREMELY_HIGH_LEVEL_COINS: i64 = 10_000;

/// Preset game rules, built once at startup and read-only afterwards.
///
/// Two tables: how many coins an avatar part costs, and how many coins a
/// todo is worth per difficulty level. Lookups on a key outside the tables
/// fall back to an extremely high price so the item reads as unaffordable
/// instead of failing.
pub struct Rules {
    part_prices: HashMap<AvatarPart, Award>,
    task_rewards: HashMap<DifficultyLevel, Award>,
}

impl Rules {
    pub fn new() -> Rules {
        let mut part_prices = HashMap::new();
        for part in AvatarPartType::all() {
            for index in 1..=12u8 {
                // basic: cheap for the first half of the row, pricier after
                let basic = if index < 7 {
                    LOW_LEVEL_COINS
                } else {
                    BASIC_LEVEL_COINS
                };
                part_prices.insert(
                    AvatarPart::new(part, AvatarCategory::Basic, index),
                    Award::new(basic),
                );
                part_prices.insert(
                    AvatarPart::new(part, AvatarCategory::Animal, index),
                    Award::new(SILVER_LEVEL_COINS),
                );
                let castle = if index < 7 {
                    GOLD_LEVEL_COINS
                } else {
                    PLATINUM_LEVEL_COINS
                };
                part_prices.insert(
                    AvatarPart::new(part, AvatarCategory::Castle, index),
                    Award::new(castle),
                );
            }
        }

        let mut task_rewards = HashMap::new();
        task_rewards.insert(DifficultyLevel::Easy, Award::new(1));
        task_rewards.insert(DifficultyLevel::Medium, Award::new(3));
        task_rewards.insert(DifficultyLevel::Hard, Award::new(5));

        Rules {
            part_prices,
            task_rewards,
        }
    }

    /// Price of an avatar part. Unknown parts price out at the sentinel.
    pub fn price_of(&self, part: &AvatarPart) -> Award {
        self.part_prices
            .get(part)
            .copied()
            .unwrap_or(Award::new(EXTREMELY_HIGH_LEVEL_COINS))
    }

    /// Coins earned for completing a todo of the given difficulty.
    pub fn reward_of(&self, difficulty: DifficultyLevel) -> Award {
        self.task_rewards
            .get(&difficulty)
            .copied()
            .unwrap_or(Award::new(EXTREMELY_HIGH_LEVEL_COINS))
    }
}

impl Default for Rules {
    fn default() -> Rules {
        Rules::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_rewards_per_difficulty() {
        let rules = Rules::new();
        assert_eq!(rules.reward_of(DifficultyLevel::Easy).coin, 1);
        assert_eq!(rules.reward_of(DifficultyLevel::Medium).coin, 3);
        assert_eq!(rules.reward_of(DifficultyLevel::Hard).coin, 5);
    }

    #[test]
    fn test_part_prices_at_every_band_boundary() {
        let rules = Rules::new();
        for part in AvatarPartType::all() {
            for index in [1u8, 6] {
                let expected = [
                    (AvatarCategory::Basic, 5),
                    (AvatarCategory::Animal, 100),
                    (AvatarCategory::Castle, 200),
                ];
                for (category, coins) in expected {
                    let result = rules.price_of(&AvatarPart::new(part, category, index));
                    assert_eq!(result.coin, coins, "{:?} {:?} {}", part, category, index);
                }
            }
            for index in [7u8, 12] {
                let expected = [
                    (AvatarCategory::Basic, 30),
                    (AvatarCategory::Animal, 100),
                    (AvatarCategory::Castle, 500),
                ];
                for (category, coins) in expected {
                    let result = rules.price_of(&AvatarPart::new(part, category, index));
                    assert_eq!(result.coin, coins, "{:?} {:?} {}", part, category, index);
                }
            }
        }
    }

    #[test]
    fn test_unknown_part_prices_out_at_sentinel() {
        let rules = Rules::new();
        let out_of_range = AvatarPart::new(AvatarPartType::Head, AvatarCategory::Basic, 13);
        assert_eq!(rules.price_of(&out_of_range).coin, 10_000);
    }
}
