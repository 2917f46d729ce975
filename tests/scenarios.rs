//! End-to-end scenarios through the game driver

use dig_deep::Game;
use dig_deep::consts::*;
use dig_deep::sim::{GridCell, Ray};
use glam::{IVec3, Vec3};

fn from_above(x: f32, z: f32) -> Ray {
    Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y)
}

/// Game with one isolated cell at the origin
fn lone_cell_game(has_gold: bool) -> Game {
    let mut game = Game::new(11);
    game.scene.cells = vec![GridCell::new(IVec3::new(0, -1, 0), has_gold)];
    game
}

fn excavate(game: &mut Game) {
    for _ in 0..MAX_DIG_LEVEL {
        game.click(from_above(0.0, 0.0));
        game.step();
    }
}

fn wait_secs(game: &mut Game, secs: f32) {
    let ticks = (secs / SIM_DT).round() as u32;
    for _ in 0..ticks {
        game.step();
    }
}

/// Click the first uncollected nugget and let its fly-away finish
fn collect_one(game: &mut Game) {
    let pos = game
        .scene
        .nuggets
        .iter()
        .find(|n| !n.collected)
        .map(|n| n.render_pos())
        .expect("no nugget to collect");
    game.click(from_above(pos.x, pos.z));
    game.step();
    for _ in 0..NUGGET_COLLECT_DELAY_TICKS {
        game.step();
    }
}

#[test]
fn excavating_plain_cell_counts_dig_and_throws_dirt() {
    let mut game = lone_cell_game(false);
    excavate(&mut game);

    assert_eq!(game.score.digs, 1);
    assert_eq!(game.score.gold, 0);
    assert_eq!(game.scene.particles.len(), PARTICLES_PER_DIG);
    assert!(game.scene.nuggets.is_empty());
    assert!(game.scene.cells.is_empty());
}

#[test]
fn excavating_gold_cell_spawns_one_nugget_above_it() {
    let mut game = lone_cell_game(true);
    excavate(&mut game);

    assert_eq!(game.score.digs, 1);
    assert_eq!(game.scene.particles.len(), PARTICLES_PER_DIG);
    assert_eq!(game.scene.nuggets.len(), 1);
    assert_eq!(game.scene.nuggets[0].pos, Vec3::new(0.0, -0.5, 0.0));
}

#[test]
fn clicks_after_excavation_do_nothing() {
    let mut game = lone_cell_game(false);
    excavate(&mut game);
    excavate(&mut game);
    assert_eq!(game.score.digs, 1);
}

#[test]
fn gold_is_credited_only_after_fly_away() {
    let mut game = lone_cell_game(true);
    excavate(&mut game);
    wait_secs(&mut game, 0.5);

    let pos = game.scene.nuggets[0].render_pos();
    game.click(from_above(pos.x, pos.z));
    game.step();
    assert_eq!(game.score.gold, 0);
    assert_eq!(game.scene.nuggets.len(), 1);

    for _ in 0..NUGGET_COLLECT_DELAY_TICKS {
        game.step();
    }
    assert_eq!(game.score.gold, 1);
    assert!(game.scene.nuggets.is_empty());
}

#[test]
fn combo_builds_then_resets_after_idle_gap() {
    let mut game = Game::new(11);
    game.scene.cells.clear();
    for i in 0..3 {
        game.scene.on_cell_excavated(IVec3::new(i * 2 - 2, -1, 0), true);
    }
    wait_secs(&mut game, 0.5);

    // Two collections well inside the 2 s window
    collect_one(&mut game);
    assert_eq!((game.score.gold, game.score.combo), (1, 1));
    collect_one(&mut game);
    assert_eq!((game.score.gold, game.score.combo), (2, 2));

    // 3 s idle: the combo timer fires
    wait_secs(&mut game, 3.0);
    assert_eq!(game.score.combo, 0);

    collect_one(&mut game);
    assert_eq!((game.score.gold, game.score.combo), (3, 1));
}

#[test]
fn streak_reaches_bonus_two_on_fourth_collection() {
    let mut game = Game::new(11);
    game.scene.cells.clear();
    for i in 0..4 {
        game.scene.on_cell_excavated(IVec3::new(i * 2 - 4, -1, 0), true);
    }
    wait_secs(&mut game, 0.5);

    for _ in 0..4 {
        collect_one(&mut game);
    }
    // 1 + 1 + 1 + 2
    assert_eq!(game.score.gold, 5);
    assert_eq!(game.score.combo, 4);
}

#[test]
fn digging_a_full_column_counts_every_excavation() {
    let mut game = Game::new(3);
    for cell in game.scene.cells.iter_mut() {
        cell.has_gold = false;
    }
    let rows = (GRID_Y_MAX - GRID_Y_MIN + 1) as u64;
    for _ in 0..rows {
        excavate(&mut game);
    }
    assert_eq!(game.score.digs, rows);
    assert_eq!(game.blocks_remaining(), 486 - rows as usize);
    assert!(game.scene.cell("0--5-0").is_none());
}

#[test]
fn column_dig_waits_out_each_fly_away() {
    let mut game = Game::new(2024);
    for cell in game.scene.cells.iter_mut() {
        if cell.pos.x == 0 && cell.pos.z == 0 {
            cell.has_gold = true;
        }
    }
    game.dig_column(0.0, 0.0);

    let rows = (GRID_Y_MAX - GRID_Y_MIN + 1) as u64;
    assert_eq!(game.score.digs, rows);
    assert_eq!(game.blocks_remaining(), 486 - rows as usize);
    assert!(game.scene.nuggets.is_empty());
    // Six nuggets, each inside the previous one's combo window
    assert_eq!(game.score.combo, rows as u32);
    assert_eq!(game.score.gold, 1 + 1 + 1 + 2 + 2 + 2);
}

#[test]
fn column_dig_reaches_the_bottom_for_default_seed() {
    let mut game = Game::new(2024);
    game.dig_column(0.0, 0.0);
    assert_eq!(game.score.digs, 6);
    assert!(game.scene.cell("0--5-0").is_none());
}
