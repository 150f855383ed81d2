//! Integration test: turn-based battles from start to finish.

use proptest::prelude::*;
use quest_chronicles::character::{Archetype, Character};
use quest_chronicles::combat::{
    calculate_damage, create_enemy, enemy_for_level, Battle, BattleState, CombatEvent,
    CombatOutcome, CombatResult, Enemy, EnemyKind, PlayerAction,
};
use quest_chronicles::core::{GameError, GameSession};
use quest_chronicles::items::ItemTable;
use quest_chronicles::quests::QuestTable;
use rand::rngs::mock::StepRng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Rolls 0.0 on every draw: escapes and critical strikes always land.
fn lucky() -> StepRng {
    StepRng::new(0, 0)
}

/// Rolls just under 1.0 on every draw: escapes and critical strikes always miss.
fn unlucky() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

fn hero(archetype: Archetype) -> Character {
    Character::new("Hero".to_string(), archetype)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_warrior_versus_goblin_basic_attacks() {
    let mut warrior = hero(Archetype::Warrior);
    let mut battle = Battle::new(&mut warrior, create_enemy("goblin").unwrap());
    battle.start().unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut rounds = Vec::new();
    while battle.state() == BattleState::InProgress {
        rounds.push(battle.take_turn(PlayerAction::Attack, &mut rng).unwrap());
    }

    assert_eq!(rounds.len(), 4);
    for round in &rounds[..3] {
        assert_eq!(
            round,
            &vec![
                CombatEvent::PlayerAttack { damage: 13 },
                CombatEvent::EnemyAttack { damage: 5 }
            ]
        );
    }
    assert_eq!(
        rounds[3],
        vec![
            CombatEvent::PlayerAttack { damage: 13 },
            CombatEvent::EnemyDied {
                xp_gained: 25,
                gold_gained: 10
            }
        ]
    );
    assert_eq!(
        battle.result(),
        Some(CombatResult {
            outcome: CombatOutcome::PlayerVictory,
            xp_gained: 25,
            gold_gained: 10
        })
    );
    assert_eq!(battle.character().health, 105);
}

#[test]
fn test_warrior_power_strike_halves_the_fight() {
    let mut warrior = hero(Archetype::Warrior);
    let mut battle = Battle::new(&mut warrior, Enemy::new(EnemyKind::Goblin));
    let mut special = |_: u32, _: &Character, _: &Enemy| PlayerAction::Special;

    let result = battle.run(&mut special, &mut lucky()).unwrap();

    assert_eq!(result.outcome, CombatOutcome::PlayerVictory);
    assert_eq!(battle.turn(), 2);
    assert_eq!(battle.character().health, 115);
}

#[test]
fn test_rogue_critical_strike_depends_on_the_roll() {
    for (mut rng, damage) in [(lucky(), 36), (unlucky(), 12)] {
        let mut rogue = hero(Archetype::Rogue);
        let mut battle = Battle::new(&mut rogue, Enemy::new(EnemyKind::Orc));
        battle.start().unwrap();

        let events = battle.take_turn(PlayerAction::Special, &mut rng).unwrap();
        match &events[0] {
            CombatEvent::SpecialAbility {
                damage: dealt,
                critical,
                ..
            } => {
                assert_eq!(*dealt, damage);
                assert_eq!(*critical, damage == 36);
            }
            other => panic!("expected a special ability, got {:?}", other),
        }
        assert_eq!(battle.enemy().health, 80 - damage);
    }
}

#[test]
fn test_cleric_heal_then_attack() {
    let mut cleric = hero(Archetype::Cleric);
    cleric.health = 40;
    let mut battle = Battle::new(&mut cleric, Enemy::new(EnemyKind::Goblin));
    battle.start().unwrap();

    battle.take_turn(PlayerAction::Special, &mut lucky()).unwrap();
    // Healed 30, then hit for 8 - 10/4 = 6.
    assert_eq!(battle.character().health, 64);
    assert_eq!(battle.enemy().health, 50);
}

// =============================================================================
// Escape
// =============================================================================

#[test]
fn test_escape_rolls() {
    let mut rogue = hero(Archetype::Rogue);
    let mut battle = Battle::new(&mut rogue, Enemy::new(EnemyKind::Orc));
    battle.start().unwrap();

    let events = battle.take_turn(PlayerAction::Escape, &mut unlucky()).unwrap();
    assert_eq!(
        events,
        vec![
            CombatEvent::EscapeFailed,
            CombatEvent::EnemyAttack { damage: 9 }
        ]
    );
    assert_eq!(battle.state(), BattleState::InProgress);

    let events = battle.take_turn(PlayerAction::Escape, &mut lucky()).unwrap();
    assert_eq!(events, vec![CombatEvent::EscapeSucceeded]);
    assert_eq!(battle.state(), BattleState::Finished(CombatOutcome::Escaped));
    assert_eq!(battle.character().health, 81);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_dead_character_cannot_start() {
    let mut fallen = hero(Archetype::Mage);
    fallen.health = 0;
    let mut battle = Battle::new(&mut fallen, Enemy::new(EnemyKind::Goblin));
    assert_eq!(battle.start(), Err(GameError::CharacterDead));
    assert_eq!(battle.state(), BattleState::Idle);
}

#[test]
fn test_defeat_through_session_grants_nothing() {
    let mut session = GameSession::new(hero(Archetype::Mage), QuestTable::new(), ItemTable::new());
    let mut attack = |_: u32, _: &Character, _: &Enemy| PlayerAction::Attack;

    let result = session
        .fight(Enemy::new(EnemyKind::Dragon), &mut attack, &mut lucky())
        .unwrap();

    assert_eq!(result, CombatResult::without_reward(CombatOutcome::EnemyVictory));
    assert!(session.is_dead());
    assert_eq!(session.character.experience, 0);
    assert_eq!(session.character.gold, 100);

    assert_eq!(
        session.explore(&mut attack, &mut lucky()),
        Err(GameError::CharacterDead)
    );
    assert!(session.revive());
    assert_eq!(session.character.health, 40);
}

#[test]
fn test_enemy_for_level_matches_bands() {
    assert_eq!(enemy_for_level(1).name, "Goblin");
    assert_eq!(enemy_for_level(2).name, "Goblin");
    assert_eq!(enemy_for_level(3).name, "Orc");
    assert_eq!(enemy_for_level(5).name, "Orc");
    assert_eq!(enemy_for_level(6).name, "Dragon");
    assert_eq!(enemy_for_level(60).name, "Dragon");
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_damage_is_at_least_one(attack in 0u32..10_000, defense in 0u32..10_000) {
        let damage = calculate_damage(attack, defense);
        prop_assert!(damage >= 1);
        prop_assert!(damage <= attack.max(1));
    }

    #[test]
    fn prop_battles_always_end(seed in any::<u64>(), archetype in 0usize..4, kind in 0usize..3) {
        let mut character = hero(Archetype::ALL[archetype]);
        let enemy = Enemy::new(EnemyKind::ALL[kind]);
        let mut battle = Battle::new(&mut character, enemy);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut pick = |turn: u32, _: &Character, _: &Enemy| {
            PlayerAction::ALL[(turn as usize + kind) % PlayerAction::ALL.len()]
        };

        let result = battle.run(&mut pick, &mut rng).unwrap();
        prop_assert_eq!(battle.state(), BattleState::Finished(result.outcome));
        match result.outcome {
            CombatOutcome::PlayerVictory => prop_assert_eq!(battle.enemy().health, 0),
            CombatOutcome::EnemyVictory => prop_assert_eq!(battle.character().health, 0),
            CombatOutcome::Escaped => prop_assert_eq!(result.xp_gained, 0),
        }
    }
}
