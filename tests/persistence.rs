//! Save/restore of whole worlds

use std::sync::mpsc::{self, Receiver};

use balls_2050::persistence::{self, SaveData};
use balls_2050::sim::{GameEvent, TickInput};
use balls_2050::{GamePhase, Palette, SimConfig, World};
use glam::Vec2;

fn world(seed: u64) -> (World, Receiver<GameEvent>) {
    let (tx, rx) = mpsc::channel();
    (
        World::new(SimConfig::default(), Palette::default(), seed, Box::new(tx)),
        rx,
    )
}

/// A world that has played for a while: merges, gravity, compression history
fn played_world() -> World {
    let (mut w, _rx) = world(42);
    for (x, y) in [(0.0, 1.0), (1.0, 1.0), (-1.0, 0.0), (0.0, 1.0)] {
        w.fling(x, y);
    }
    w.insert_ball(3, Vec2::new(300.0, 300.0), Vec2::ZERO);
    w.insert_ball(3, Vec2::new(310.0, 300.0), Vec2::ZERO);
    for _ in 0..90 {
        w.physics_step(1.0 / 60.0, &TickInput::default());
    }
    w
}

#[test]
fn test_roundtrip_reproduces_world() {
    let original = played_world();

    let json = original.to_save().to_json_string().unwrap();
    let (mut restored, rx) = world(7);
    restored.restore(&SaveData::from_json_str(&json).unwrap(), false);

    assert_eq!(restored.to_save(), original.to_save());
    assert_eq!(restored.snapshot(), original.snapshot());
    assert_eq!(
        restored.compressions().values().collect::<Vec<_>>(),
        original.compressions().values().collect::<Vec<_>>()
    );
    assert!(rx.try_iter().next().is_none());
}

#[test]
fn test_restored_world_continues_identically() {
    let mut original = played_world();
    let (mut restored, _rx) = world(99);
    restored.restore(&original.to_save(), false);

    for _ in 0..30 {
        original.physics_step(1.0 / 60.0, &TickInput::default());
        restored.physics_step(1.0 / 60.0, &TickInput::default());
    }
    assert_eq!(restored.snapshot(), original.snapshot());
}

#[test]
fn test_missing_fields_keep_current_values() {
    let (mut w, _rx) = world(5);
    let before = w.to_save();
    w.restore(&SaveData::from_json_str(r#"{"score": 64}"#).unwrap(), false);

    let after = w.to_save();
    assert_eq!(after.score, Some(64));
    assert_eq!(after.balls, before.balls);
    assert_eq!(after.state, before.state);
    assert_eq!(after.grav_vec, before.grav_vec);
}

#[test]
fn test_ball_records_fill_defaults() {
    let (mut w, _rx) = world(5);
    w.restore(
        &SaveData::from_json_str(r#"{"balls": [{"pos": [40.0, 50.0]}, {"size": 4}]}"#).unwrap(),
        false,
    );
    let balls = w.balls();
    assert_eq!(balls.len(), 2);
    assert_eq!(balls[0].size(), 1);
    assert_eq!(balls[0].pos, Vec2::new(40.0, 50.0));
    assert_eq!(balls[0].vel, Vec2::ZERO);
    assert_eq!(balls[1].size(), 4);
    assert_eq!(balls[1].radius(), 40.0);
}

#[test]
fn test_oversized_balls_merge_without_overflow() {
    let (mut w, _rx) = world(5);
    w.restore(
        &SaveData::from_json_str(
            r#"{"balls": [{"size": 4294967295, "pos": [256.0, 256.0]},
                          {"size": 4294967295, "pos": [256.0, 256.0]}]}"#,
        )
        .unwrap(),
        false,
    );
    w.physics_step(1.0 / 60.0, &TickInput::default());

    assert_eq!(w.balls().len(), 1);
    assert_eq!(w.balls()[0].size(), 63);
    assert_eq!(w.balls()[0].value(), 1u64 << 63);
}

#[test]
fn test_restored_win_is_announced() {
    let (mut w, rx) = world(5);
    w.restore(
        &SaveData::from_json_str(r#"{"state": "WIN", "score": 10, "high_score": 10}"#).unwrap(),
        false,
    );
    assert_eq!(w.phase(), GamePhase::Win);
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![GameEvent::Win {
            score: 10,
            new_high_score: true
        }]
    );

    // resuming a restored game leaves the banner for the player to dismiss
    w.resume();
    assert_eq!(w.phase(), GamePhase::Win);
}

#[test]
fn test_restored_loss_is_announced() {
    let (mut w, rx) = world(5);
    w.restore(
        &SaveData::from_json_str(r#"{"state": "LOSE", "score": 10, "high_score": 30}"#).unwrap(),
        false,
    );
    assert_eq!(w.phase(), GamePhase::Lose);
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![GameEvent::GameOver {
            score: 10,
            new_high_score: false
        }]
    );
}

#[test]
fn test_first_run_discards_lost_game() {
    let (mut w, rx) = world(5);
    w.restore(
        &SaveData::from_json_str(r#"{"state": "LOSE", "score": 10, "high_score": 30}"#).unwrap(),
        true,
    );
    assert_eq!(w.phase(), GamePhase::Ongoing);
    assert_eq!(w.score(), 0);
    assert_eq!(w.high_score(), 30);
    assert_eq!(w.balls().len(), 2);
    assert!(rx.try_iter().next().is_none());
}

#[test]
fn test_short_compression_history_is_padded() {
    let (mut w, _rx) = world(5);
    w.restore(
        &SaveData::from_json_str(r#"{"last_compressions": [3.0, 4.0]}"#).unwrap(),
        false,
    );
    let values: Vec<f32> = w.compressions().values().collect();
    assert_eq!(values.len(), 100);
    assert_eq!(&values[98..], &[3.0, 4.0]);
    assert!(values[..98].iter().all(|v| *v == 0.0));
}

#[test]
fn test_save_file_roundtrip() {
    let original = played_world();
    let path = std::env::temp_dir()
        .join(format!("balls-2050-it-{}", std::process::id()))
        .join("save.json");
    persistence::save_to_file(&path, &original.to_save()).unwrap();

    let data = persistence::load_from_file(&path).unwrap().unwrap();
    let (mut restored, _rx) = world(1);
    restored.restore(&data, false);
    assert_eq!(restored.to_save(), original.to_save());

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
