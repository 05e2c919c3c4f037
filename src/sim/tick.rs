//! Per-tick simulation body and command application
//!
//! The tick function advances one fixed step: player movement, firing,
//! bullet flight and hits, enemy movement with separation, player contact,
//! periodic regen, and wave spawning. Discrete events (start, upgrade
//! choice, countdown) arrive as commands so the tick thread stays the only
//! writer of game state.

use glam::Vec2;

use super::bullet::Bullet;
use super::enemy::Enemy;
use super::state::{GamePhase, GameState};
use crate::consts::{GAME_OVER_COUNTDOWN_SECS, MAP_SIZE, REGEN_AMOUNT, REGEN_INTERVAL_TICKS};

/// Held-input state sampled once per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Aim point in world coordinates
    pub aim: Vec2,
}

/// Discrete events from outside the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the start screen and begin a run
    Start,
    /// Pick one of the offered level-up upgrades by index
    ChooseUpgrade(usize),
    /// One second of game-over countdown has elapsed
    CountdownTick,
}

/// Apply one queued command. Commands from stale UI states (an upgrade pick
/// with no pending offer, a countdown tick while playing) are ignored.
pub fn apply_command(state: &mut GameState, command: Command) {
    match command {
        Command::Start => {
            if state.phase == GamePhase::StartScreen {
                state.phase = GamePhase::Playing;
                log::info!("run started");
            }
        }
        Command::ChooseUpgrade(index) => {
            if state.phase == GamePhase::Playing && index < state.offered_upgrades.len() {
                let upgrade = state.offered_upgrades[index];
                state.player.apply_upgrade(upgrade, &mut state.achievements);
                state.offered_upgrades.clear();
                state.paused = false;
                log::info!("level-up upgrade applied: {upgrade:?}");
            }
        }
        Command::CountdownTick => {
            if state.phase == GamePhase::GameOver && state.countdown > 0 {
                state.countdown -= 1;
                if state.countdown == 0 {
                    state.reset_run();
                }
            }
        }
    }
}

/// Advance the simulation by one fixed tick
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    if state.phase != GamePhase::Playing || state.paused {
        return;
    }

    move_player(state, input);

    if let Some(bullet) = state.player.shoot(input.aim, now_ms) {
        state.bullets.push(bullet);
    }

    update_bullets(state, now_ms);
    move_enemies(state);
    check_player_collisions(state);

    state.regen_counter += 1;
    if state.regen_counter >= REGEN_INTERVAL_TICKS {
        state.player.regenerate_health(REGEN_AMOUNT);
        state.regen_counter = 0;
    }

    if state.phase == GamePhase::Playing && state.waves.should_spawn_wave(now_ms) {
        state.waves.start_next_wave(now_ms);
        let new_enemies = state.waves.spawn_enemies(
            state.player.center(),
            MAP_SIZE,
            &state.enemies,
            &mut state.rng,
        );
        log::debug!("spawned {} enemies", new_enemies.len());
        state.enemies.extend(new_enemies);
    }
}

fn move_player(state: &mut GameState, input: &TickInput) {
    let speed = state.player.stats().speed;
    let dx = (input.right as i32 - input.left as i32) as f32 * speed;
    let dy = (input.down as i32 - input.up as i32) as f32 * speed;
    if dx != 0.0 || dy != 0.0 {
        state.player.move_by(dx, dy, MAP_SIZE);
    }
}

/// Advance bullets, expire them at map bounds, and resolve hits. A bullet
/// spends itself on the first enemy it sweeps over; kills grant XP, coins
/// and a kill-counter bump. A level-up mid-tick pauses the loop and
/// surfaces upgrade choices.
fn update_bullets(state: &mut GameState, now_ms: u64) {
    let level_before = state.player.level();

    for bullet in &mut state.bullets {
        bullet.update(now_ms);

        let pos = bullet.pos();
        if pos.x < 0.0 || pos.x > MAP_SIZE || pos.y < 0.0 || pos.y > MAP_SIZE {
            bullet.deactivate();
        }
        if !bullet.is_active() {
            continue;
        }

        for enemy in &mut state.enemies {
            // Corpses stay in the list until the retain below; a second
            // bullet sweeping one this tick must not re-trigger the kill
            if !enemy.is_alive() || !bullet.hits(enemy) {
                continue;
            }
            bullet.deactivate();
            enemy.take_damage(bullet.damage());
            if !enemy.is_alive() {
                state.player.add_xp(enemy.xp_reward());
                state.player.add_coins(enemy.coin_reward());
                state.player.add_enemy_kill(&mut state.achievements);
                state.waves.enemy_died();
            }
            break;
        }
    }

    state.enemies.retain(Enemy::is_alive);
    state.bullets.retain(Bullet::is_active);

    if state.player.level() > level_before {
        state.paused = true;
        state.offered_upgrades = state.player.upgrade_options(&mut state.rng);
        log::info!(
            "level {} reached, offering {:?}",
            state.player.level(),
            state.offered_upgrades
        );
    }
}

/// Move every enemy toward the player, each one separating against the
/// rest of the field. O(n²) per tick; fine at wave-sized enemy counts.
fn move_enemies(state: &mut GameState) {
    let target = state.player.center();
    for i in 0..state.enemies.len() {
        let (before, rest) = state.enemies.split_at_mut(i);
        if let Some((enemy, after)) = rest.split_first_mut() {
            enemy.advance(target, before.iter().chain(after.iter()));
        }
    }
}

/// Enemies touching the player explode on contact: the player takes the
/// variant's damage, the enemy is removed and still counts as a kill.
/// Reaching zero health flips the state machine to game over.
fn check_player_collisions(state: &mut GameState) {
    let player_bounds = state.player.bounds();
    let mut i = 0;
    while i < state.enemies.len() {
        if !state.enemies[i].bounds().intersects(&player_bounds) {
            i += 1;
            continue;
        }
        let enemy = state.enemies.remove(i);
        state.player.take_damage(enemy.contact_damage());
        state.waves.enemy_died();
        state.player.add_enemy_kill(&mut state.achievements);

        if !state.player.is_alive() && state.phase == GamePhase::Playing {
            state.phase = GamePhase::GameOver;
            state.paused = true;
            state.countdown = GAME_OVER_COUNTDOWN_SECS;
            log::info!(
                "game over on wave {} with {} kills",
                state.waves.current_wave(),
                state.player.enemies_killed()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PLAYER_MAX_HEALTH, WAVE_COOLDOWN_MS};
    use crate::sim::enemy::EnemyKind;
    use crate::store::MemoryStore;

    fn playing_state() -> GameState {
        let mut state = GameState::new(1234, Box::new(MemoryStore::new()));
        apply_command(&mut state, Command::Start);
        state
    }

    fn far_aim(state: &GameState) -> TickInput {
        TickInput {
            aim: state.player.center() + Vec2::new(1000.0, 0.0),
            ..TickInput::default()
        }
    }

    /// A nearly dead enemy parked on the firing line, close enough that
    /// the very first bullet's sweep covers it
    fn plant_weak_enemy(state: &mut GameState, kind: EnemyKind) {
        let pos = state.player.center() + Vec2::new(20.0, 0.0);
        let mut enemy = Enemy::new(kind, pos);
        enemy.take_damage(kind.spec().max_health - 1);
        state.enemies.push(enemy);
    }

    #[test]
    fn test_start_command_begins_run() {
        let mut state = GameState::new(1, Box::new(MemoryStore::new()));
        assert_eq!(state.phase, GamePhase::StartScreen);
        apply_command(&mut state, Command::Start);
        assert_eq!(state.phase, GamePhase::Playing);
        // Start is ignored unless on the start screen
        apply_command(&mut state, Command::Start);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_tick_is_inert_on_start_screen() {
        let mut state = GameState::new(1, Box::new(MemoryStore::new()));
        tick(&mut state, &TickInput::default(), 0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.waves.current_wave(), 0);
    }

    #[test]
    fn test_first_tick_spawns_a_wave() {
        let mut state = playing_state();
        let input = far_aim(&state);
        tick(&mut state, &input, 0);
        assert_eq!(state.waves.current_wave(), 1);
        assert!(!state.enemies.is_empty());
    }

    #[test]
    fn test_no_second_wave_before_cooldown() {
        let mut state = playing_state();
        let input = far_aim(&state);
        tick(&mut state, &input, 0);
        let first_wave_count = state.enemies.len();
        tick(&mut state, &input, 20);
        assert_eq!(state.waves.current_wave(), 1);
        assert_eq!(state.enemies.len(), first_wave_count);
    }

    #[test]
    fn test_overlapping_wave_after_cooldown() {
        let mut state = playing_state();
        let input = far_aim(&state);
        tick(&mut state, &input, 0);
        assert_eq!(state.waves.current_wave(), 1);
        tick(&mut state, &input, WAVE_COOLDOWN_MS + 1);
        assert_eq!(state.waves.current_wave(), 2);
    }

    #[test]
    fn test_held_key_moves_player() {
        let mut state = playing_state();
        let start = state.player.pos();
        let input = TickInput {
            right: true,
            ..far_aim(&state)
        };
        tick(&mut state, &input, 0);
        assert!(state.player.pos().x > start.x);
        assert_eq!(state.player.pos().y, start.y);
    }

    #[test]
    fn test_tick_fires_rate_limited_bullets() {
        let mut state = playing_state();
        let input = far_aim(&state);
        tick(&mut state, &input, 1000);
        assert_eq!(state.bullets.len(), 1);
        // 20ms later: still inside the 150ms fire window
        tick(&mut state, &input, 1020);
        assert_eq!(state.bullets.len(), 1);
        tick(&mut state, &input, 1150);
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_bullet_kill_grants_rewards() {
        let mut state = playing_state();
        let input = far_aim(&state);
        plant_weak_enemy(&mut state, EnemyKind::Fast);

        tick(&mut state, &input, 1000);

        assert_eq!(state.player.enemies_killed(), 1);
        assert_eq!(state.player.xp(), EnemyKind::Fast.spec().xp_reward);
        assert_eq!(state.player.coins(), EnemyKind::Fast.spec().coin_reward);
        assert!(state.bullets.is_empty(), "bullet spent on the hit");
    }

    #[test]
    fn test_converging_bullets_count_one_kill() {
        let mut state = playing_state();
        plant_weak_enemy(&mut state, EnemyKind::Tank);
        let target = state.player.center() + Vec2::new(20.0, 0.0);
        // Two in-flight bullets whose sweeps both cover the enemy this tick
        state.bullets.push(Bullet::new(
            target - Vec2::new(5.0, 0.0),
            target + Vec2::new(100.0, 0.0),
            10,
            0,
        ));
        state.bullets.push(Bullet::new(
            target + Vec2::new(5.0, 0.0),
            target - Vec2::new(100.0, 0.0),
            10,
            0,
        ));

        let input = far_aim(&state);
        tick(&mut state, &input, 20);

        // The first hit kills; the second bullet passes the corpse
        assert_eq!(state.player.enemies_killed(), 1);
        assert_eq!(state.player.xp(), EnemyKind::Tank.spec().xp_reward);
        assert_eq!(state.player.coins(), EnemyKind::Tank.spec().coin_reward);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_level_up_pauses_and_offers_upgrades() {
        let mut state = playing_state();
        let input = far_aim(&state);
        // Two Tank kills (50 xp each): the second crosses the 100 xp line
        plant_weak_enemy(&mut state, EnemyKind::Tank);
        tick(&mut state, &input, 1000);
        assert_eq!(state.player.level(), 1);

        plant_weak_enemy(&mut state, EnemyKind::Tank);
        tick(&mut state, &input, 1150);

        assert_eq!(state.player.level(), 2);
        assert!(state.paused);
        assert_eq!(state.offered_upgrades.len(), 3);

        // Tick body is gated while the choice is pending
        let wave = state.waves.current_wave();
        tick(&mut state, &input, WAVE_COOLDOWN_MS * 2);
        assert_eq!(state.waves.current_wave(), wave);

        apply_command(&mut state, Command::ChooseUpgrade(0));
        assert!(!state.paused);
        assert!(state.offered_upgrades.is_empty());
    }

    #[test]
    fn test_choose_upgrade_ignored_without_offer() {
        let mut state = playing_state();
        apply_command(&mut state, Command::ChooseUpgrade(0));
        assert!(!state.paused);
    }

    #[test]
    fn test_player_contact_damages_and_removes_enemy() {
        let mut state = playing_state();
        state
            .enemies
            .push(Enemy::new(EnemyKind::Basic, state.player.center()));

        check_player_collisions(&mut state);

        assert!(state.enemies.is_empty());
        assert_eq!(
            state.player.health(),
            PLAYER_MAX_HEALTH - EnemyKind::Basic.spec().contact_damage
        );
        assert_eq!(state.player.enemies_killed(), 1);
    }

    #[test]
    fn test_lethal_contact_triggers_game_over() {
        let mut state = playing_state();
        state.player.take_damage(PLAYER_MAX_HEALTH - 1);
        state
            .enemies
            .push(Enemy::new(EnemyKind::Basic, state.player.center()));

        check_player_collisions(&mut state);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.paused);
        assert_eq!(state.countdown, GAME_OVER_COUNTDOWN_SECS);
    }

    #[test]
    fn test_countdown_ticks_then_resets() {
        let mut state = playing_state();
        state.phase = GamePhase::GameOver;
        state.paused = true;
        state.countdown = 2;

        apply_command(&mut state, Command::CountdownTick);
        assert_eq!(state.countdown, 1);
        assert_eq!(state.phase, GamePhase::GameOver);

        apply_command(&mut state, Command::CountdownTick);
        assert_eq!(state.phase, GamePhase::StartScreen);
        assert_eq!(state.countdown, GAME_OVER_COUNTDOWN_SECS);

        // Further ticks on the start screen are ignored
        apply_command(&mut state, Command::CountdownTick);
        assert_eq!(state.countdown, GAME_OVER_COUNTDOWN_SECS);
    }

    #[test]
    fn test_regen_every_fifth_tick() {
        let mut state = playing_state();
        state.player.take_damage(10);
        let hurt = state.player.health();
        let input = far_aim(&state);
        // Clear the field each tick so no enemy reaches the player
        for _ in 0..REGEN_INTERVAL_TICKS {
            state.enemies.clear();
            tick(&mut state, &input, 0);
        }
        assert_eq!(state.player.health(), hurt + REGEN_AMOUNT);
    }

    #[test]
    fn test_out_of_bounds_bullet_is_removed() {
        let mut state = playing_state();
        let edge = Vec2::new(MAP_SIZE - 2.0, MAP_SIZE / 2.0);
        state
            .bullets
            .push(Bullet::new(edge, edge + Vec2::new(100.0, 0.0), 10, 0));

        let input = far_aim(&state);
        tick(&mut state, &input, 20);

        // Only the freshly fired bullet survives; the escapee is culled
        assert_eq!(state.bullets.len(), 1);
        assert!(state.bullets[0].pos().x < MAP_SIZE);
    }
}
