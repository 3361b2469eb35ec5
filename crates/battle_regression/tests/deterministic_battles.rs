use battle_regression::{simulate_battle, DEFAULT_SEED};
use skirmish_core::Team;

#[test]
fn seeded_battles_are_deterministic() {
    let baseline = simulate_battle(DEFAULT_SEED, 15).unwrap();
    let repeat = simulate_battle(DEFAULT_SEED, 15).unwrap();
    assert_eq!(baseline, repeat, "same seed should match");

    let different = simulate_battle(7, 15).unwrap();
    assert_ne!(baseline, different, "different seeds should diverge");
}

#[test]
fn only_the_last_round_can_end_the_battle() {
    let rounds = simulate_battle(DEFAULT_SEED, 40).unwrap();
    assert!(!rounds.is_empty());
    let (last, earlier) = rounds.split_last().unwrap();
    assert!(earlier.iter().all(|round| !round.game_over && round.winner.is_none()));
    for (idx, round) in rounds.iter().enumerate() {
        assert_eq!(idx as u32 + 1, round.round);
    }
    if last.game_over {
        assert!(matches!(last.winner, Some(Team::Player | Team::Enemy)));
    }
}
