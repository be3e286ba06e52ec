mod common;

use common::{assets, config, player_at, seeded_rng};
use space_shooter::assets::SilentAudio;
use space_shooter::entities::Faction;
use space_shooter::geometry::{Arena, Vector2};
use space_shooter::input::FrameInput;
use space_shooter::player::Player;

fn arena() -> Arena {
    Arena::new(1280.0, 720.0)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn spawns_at_arena_centre_with_defaults() {
    let (mut assets, _) = assets();
    let p = Player::new(&config(), &mut assets).unwrap();

    assert_eq!(p.character.placement.position, Vector2::new(640.0, 360.0));
    assert_eq!(p.character.placement.scale, 0.6);
    assert_eq!(p.character.health.max, 100.0);
    assert_eq!(p.character.health.current, 100.0);
    assert_eq!(p.attack.damage, 5.0);
    assert_eq!(p.attack.critical_chance, 5.0);
    assert_eq!(p.attack.critical_modifier, 2.0);
    assert!(!p.character.collision.is_empty());
    assert!(!p.disabled);
}

#[test]
fn overrides_apply() {
    let (mut assets, audio) = assets();
    let mut cfg = config();
    cfg.player.hp = Some(250.0);
    cfg.player.fire_rate = Some(1.0);
    cfg.player.projectile_damage = Some(12.0);
    cfg.player.scale = Some(1.0);
    cfg.player.attack_volume = Some(0.3);

    let p = Player::new(&cfg, &mut assets).unwrap();
    assert_eq!(p.character.health.max, 250.0);
    assert_eq!(p.attack.cooldown.target_ticks, 60);
    assert_eq!(p.attack.damage, 12.0);
    assert_eq!(p.character.placement.scale, 1.0);

    let fire = p.attack.fire_sound.expect("player has a fire sound");
    assert_eq!(audio.clip(fire).unwrap().volume, 0.3);
}

#[test]
fn non_positive_overrides_are_ignored() {
    let (mut assets, _) = assets();
    let mut cfg = config();
    cfg.player.hp = Some(0.0);
    cfg.player.fire_rate = Some(-3.0);

    let p = Player::new(&cfg, &mut assets).unwrap();
    assert_eq!(p.character.health.max, 100.0);
    assert_eq!(p.attack.fire_rate, 6.0);
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn moves_by_speed_in_each_direction() {
    let mut p = player_at(640.0, 360.0);
    let mut input = FrameInput::idle_at(Vector2::new(640.0, 0.0));

    input.right = true;
    p.update_movement(&input, arena());
    assert_eq!(p.character.placement.position, Vector2::new(650.0, 360.0));
    assert_eq!(p.turning, 1);

    input.right = false;
    input.up = true;
    input.left = true;
    p.update_movement(&input, arena());
    assert_eq!(p.character.placement.position, Vector2::new(640.0, 350.0));
    assert_eq!(p.turning, -1);
}

#[test]
fn opposite_keys_cancel_and_right_wins_turning() {
    let mut p = player_at(640.0, 360.0);
    let mut input = FrameInput::idle_at(Vector2::new(640.0, 0.0));
    input.left = true;
    input.right = true;
    input.up = true;
    input.down = true;

    p.update_movement(&input, arena());
    assert_eq!(p.character.placement.position, Vector2::new(640.0, 360.0));
    assert_eq!(p.turning, 1);
}

#[test]
fn clamped_inside_arena_margin() {
    let mut p = player_at(0.0, 0.0);
    let input = FrameInput::idle_at(Vector2::new(640.0, 360.0));
    p.update_movement(&input, arena());

    // half of 99*0.6 plus the 40 margin, half of 75*0.6 plus the margin
    let pos = p.character.placement.position;
    assert!(approx(pos.x, 69.7));
    assert!(approx(pos.y, 62.5));

    let mut p = player_at(5000.0, 5000.0);
    p.update_movement(&input, arena());
    let pos = p.character.placement.position;
    assert!(approx(pos.x, 1280.0 - 69.7));
    assert!(approx(pos.y, 720.0 - 62.5));
}

#[test]
fn faces_the_cursor() {
    let mut p = player_at(640.0, 360.0);

    p.update_movement(&FrameInput::idle_at(Vector2::new(640.0, 0.0)), arena());
    assert!(approx(p.character.placement.angle, 0.0));

    p.update_movement(&FrameInput::idle_at(Vector2::new(1000.0, 360.0)), arena());
    assert!(approx(p.character.placement.angle, 90.0));
}

#[test]
fn collision_follows_position() {
    let mut p = player_at(640.0, 360.0);
    let before = p.character.collision;
    let mut input = FrameInput::idle_at(Vector2::ZERO);
    input.down = true;
    p.update_movement(&input, arena());
    assert_eq!(p.character.collision.y0, before.y0 + 10);
    assert_eq!(p.character.collision.x0, before.x0);
}

// ── Attack ────────────────────────────────────────────────────────────────────

#[test]
fn fires_when_cooldown_elapses_and_fire_held() {
    let mut backend = SilentAudio::new();
    let mut rng = seeded_rng();
    let mut p = player_at(640.0, 360.0);

    let mut input = FrameInput::idle_at(Vector2::new(640.0, 0.0));
    input.fire = true;

    // 6 shots per second -> 9 tick cooldown
    for _ in 0..8 {
        assert!(p.update_attack(&input, &mut rng, &mut backend).is_none());
    }
    let shot = p.update_attack(&input, &mut rng, &mut backend).expect("shot on ninth tick");
    assert_eq!(shot.owner, Faction::Player);
    assert_eq!(shot.target, Vector2::new(640.0, 0.0));
    assert_eq!(shot.placement.position, Vector2::new(640.0, 360.0 - 75.0 / 2.0));
    assert!(shot.damage == 5.0 || (shot.critical && shot.damage == 10.0));
    assert_eq!(p.attack.cooldown.current_ticks, 0);
}

#[test]
fn fire_sound_plays_on_shot() {
    let (mut assets, audio) = assets();
    let mut rng = seeded_rng();
    let mut p = Player::new(&config(), &mut assets).unwrap();
    p.attack.cooldown.trigger_now();

    let mut input = FrameInput::idle_at(Vector2::new(640.0, 0.0));
    input.fire = true;
    assert!(p.update(&input, arena(), &mut rng, assets.audio.as_mut()).is_some());
    assert_eq!(audio.plays_of("laser.wav"), 1);
}

#[test]
fn no_shot_without_fire_input() {
    let (mut assets, _) = assets();
    let mut rng = seeded_rng();
    let mut p = Player::new(&config(), &mut assets).unwrap();
    p.attack.cooldown.trigger_now();

    let input = FrameInput::idle_at(Vector2::ZERO);
    assert!(p.update_attack(&input, &mut rng, assets.audio.as_mut()).is_none());
    // The cooldown stays ready for the next frame with fire held
    assert!(p.attack.cooldown.is_ready());
}

// ── Health ────────────────────────────────────────────────────────────────────

#[test]
fn depleting_health_disables_for_good() {
    let (mut assets, _) = assets();
    let mut rng = seeded_rng();
    let mut p = Player::new(&config(), &mut assets).unwrap();

    p.offset_hp(-40.0);
    assert_eq!(p.character.health.current, 60.0);
    assert!(!p.disabled);

    p.offset_hp(-60.0);
    assert!(p.disabled);
    assert_eq!(p.character.health.current, 0.0);

    p.offset_hp(50.0);
    assert_eq!(p.character.health.current, 0.0);
    assert!(p.disabled);

    let mut input = FrameInput::idle_at(Vector2::ZERO);
    input.right = true;
    input.fire = true;
    let before = p.character.placement.position;
    assert!(p.update(&input, arena(), &mut rng, assets.audio.as_mut()).is_none());
    assert_eq!(p.character.placement.position, before);
}

#[test]
fn healing_is_capped_at_max() {
    let mut p = player_at(640.0, 360.0);
    p.offset_hp(-10.0);
    p.offset_hp(500.0);
    assert_eq!(p.character.health.current, 100.0);
}
