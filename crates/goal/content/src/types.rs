//! Category keys of the builtin goal types.
//!
//! Each constant names an entry of the builtin catalog
//! (see [`builtin_catalog`](crate::builtin_catalog)).

use goal_core::GoalCategory;

pub const ATTACK_AFTER_OWNER: GoalCategory = GoalCategory::from_static("attack_after_owner");
pub const ATTACK_LIVING: GoalCategory = GoalCategory::from_static("attack_living");
pub const ATTACK_NEAREST_NON_CREEPER_TARGET: GoalCategory =
    GoalCategory::from_static("attack_nearest_non_creeper_target");
pub const AVOID_ENTITY: GoalCategory = GoalCategory::from_static("avoid_entity");
pub const AVOID_OPEN_DOOR: GoalCategory = GoalCategory::from_static("avoid_open_door");
pub const AVOID_SUN: GoalCategory = GoalCategory::from_static("avoid_sun");
pub const BEG: GoalCategory = GoalCategory::from_static("beg");
pub const CONTROLLED_BY_PLAYER: GoalCategory = GoalCategory::from_static("controlled_by_player");
pub const DEFEND_VILLAGE: GoalCategory = GoalCategory::from_static("defend_village");
pub const DOOR_INTERACT: GoalCategory = GoalCategory::from_static("door_interact");
pub const EAT_GRASS: GoalCategory = GoalCategory::from_static("eat_grass");
pub const FIND_NEAREST_ATTACKABLE_TARGET: GoalCategory =
    GoalCategory::from_static("find_nearest_attackable_target");
pub const FIND_NEAREST_ENTITY: GoalCategory = GoalCategory::from_static("find_nearest_entity");
pub const FIND_NEAREST_PLAYER: GoalCategory = GoalCategory::from_static("find_nearest_player");
pub const FOLLOW_GOLEM: GoalCategory = GoalCategory::from_static("follow_golem");
pub const FOLLOW_OWNER: GoalCategory = GoalCategory::from_static("follow_owner");
pub const FOLLOW_PARENT: GoalCategory = GoalCategory::from_static("follow_parent");
pub const HARVEST_FARMLAND: GoalCategory = GoalCategory::from_static("harvest_farmland");
pub const LEAP_AT_TARGET: GoalCategory = GoalCategory::from_static("leap_at_target");
pub const LOOK_AT_TRADER: GoalCategory = GoalCategory::from_static("look_at_trader");
pub const LOOK_AT_VILLAGER: GoalCategory = GoalCategory::from_static("look_at_villager");
pub const LOOK_IDLE: GoalCategory = GoalCategory::from_static("look_idle");
pub const MATE: GoalCategory = GoalCategory::from_static("mate");
pub const MOVE_IN_DOORS: GoalCategory = GoalCategory::from_static("move_in_doors");
pub const MOVE_THROUGH_VILLAGE: GoalCategory = GoalCategory::from_static("move_through_village");
pub const MOVE_TO_BLOCK: GoalCategory = GoalCategory::from_static("move_to_block");
pub const MOVE_TO_LIVING: GoalCategory = GoalCategory::from_static("move_to_living");
pub const MOVE_TO_LOCATION: GoalCategory = GoalCategory::from_static("move_to_location");
pub const OCELOT_SIT: GoalCategory = GoalCategory::from_static("ocelot_sit");
pub const OCELOT_STYLE_ATTACK: GoalCategory = GoalCategory::from_static("ocelot_style_attack");
pub const OPEN_DOOR: GoalCategory = GoalCategory::from_static("open_door");
pub const PANIC: GoalCategory = GoalCategory::from_static("panic");
pub const PLAY_WITH_OTHER_VILLAGER: GoalCategory =
    GoalCategory::from_static("play_with_other_villager");
pub const PROTECT_OWNER: GoalCategory = GoalCategory::from_static("protect_owner");
pub const RANGED_ATTACK: GoalCategory = GoalCategory::from_static("ranged_attack");
pub const REVENGE: GoalCategory = GoalCategory::from_static("revenge");
pub const RUN_AROUND_LIKE_CRAZY: GoalCategory = GoalCategory::from_static("run_around_like_crazy");
pub const SIT: GoalCategory = GoalCategory::from_static("sit");
pub const SWELL: GoalCategory = GoalCategory::from_static("swell");
pub const SWIMMING: GoalCategory = GoalCategory::from_static("swimming");
pub const TARGET: GoalCategory = GoalCategory::from_static("target");
pub const TEMPT: GoalCategory = GoalCategory::from_static("tempt");
pub const TRADE_PLAYER: GoalCategory = GoalCategory::from_static("trade_player");
pub const UNTAMED_FIND_NEAREST_ATTACKABLE: GoalCategory =
    GoalCategory::from_static("untamed_find_nearest_attackable");
pub const VILLAGER_EXCHANGE_ITEM: GoalCategory =
    GoalCategory::from_static("villager_exchange_item");
pub const VILLAGER_MATE: GoalCategory = GoalCategory::from_static("villager_mate");
pub const WANDER: GoalCategory = GoalCategory::from_static("wander");
pub const WATCH_CLOSEST: GoalCategory = GoalCategory::from_static("watch_closest");
pub const WATCH_CLOSEST_AS_INTERACTING: GoalCategory =
    GoalCategory::from_static("watch_closest_as_interacting");

/// Every builtin category, in declaration order.
pub const ALL: &[GoalCategory] = &[
    ATTACK_AFTER_OWNER,
    ATTACK_LIVING,
    ATTACK_NEAREST_NON_CREEPER_TARGET,
    AVOID_ENTITY,
    AVOID_OPEN_DOOR,
    AVOID_SUN,
    BEG,
    CONTROLLED_BY_PLAYER,
    DEFEND_VILLAGE,
    DOOR_INTERACT,
    EAT_GRASS,
    FIND_NEAREST_ATTACKABLE_TARGET,
    FIND_NEAREST_ENTITY,
    FIND_NEAREST_PLAYER,
    FOLLOW_GOLEM,
    FOLLOW_OWNER,
    FOLLOW_PARENT,
    HARVEST_FARMLAND,
    LEAP_AT_TARGET,
    LOOK_AT_TRADER,
    LOOK_AT_VILLAGER,
    LOOK_IDLE,
    MATE,
    MOVE_IN_DOORS,
    MOVE_THROUGH_VILLAGE,
    MOVE_TO_BLOCK,
    MOVE_TO_LIVING,
    MOVE_TO_LOCATION,
    OCELOT_SIT,
    OCELOT_STYLE_ATTACK,
    OPEN_DOOR,
    PANIC,
    PLAY_WITH_OTHER_VILLAGER,
    PROTECT_OWNER,
    RANGED_ATTACK,
    REVENGE,
    RUN_AROUND_LIKE_CRAZY,
    SIT,
    SWELL,
    SWIMMING,
    TARGET,
    TEMPT,
    TRADE_PLAYER,
    UNTAMED_FIND_NEAREST_ATTACKABLE,
    VILLAGER_EXCHANGE_ITEM,
    VILLAGER_MATE,
    WANDER,
    WATCH_CLOSEST,
    WATCH_CLOSEST_AS_INTERACTING,
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn keys_are_unique_snake_case() {
        let keys: HashSet<_> = ALL.iter().map(GoalCategory::as_str).collect();
        assert_eq!(keys.len(), ALL.len());
        assert!(
            keys.iter()
                .all(|k| k.chars().all(|c| c.is_ascii_lowercase() || c == '_'))
        );
    }
}
