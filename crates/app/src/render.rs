//! Draws the maze, its occupants and the HUD for one frame.

use labyrinth_app::app_loop::AppState;
use labyrinth_app::{format_seed, format_snapshot_hash, status_banner};
use labyrinth_core::{Cell, GameSession, LeaderboardEntry, MonsterKind, Pos};
use macroquad::prelude::{
    BLACK, Color, DARKGRAY, GOLD, GRAY, GREEN, LIGHTGRAY, ORANGE, PURPLE, RED, SKYBLUE, WHITE,
    clear_background, draw_circle, draw_rectangle, draw_text, measure_text, screen_height,
    screen_width,
};

const HUD_HEIGHT: f32 = 80.0;
const WALL: Color = Color::new(0.12, 0.12, 0.16, 1.0);
const PATH: Color = Color::new(0.85, 0.85, 0.8, 1.0);
const HOUSE_COOLING: Color = Color::new(0.45, 0.3, 0.2, 1.0);

struct Layout {
    cell: f32,
    origin_x: f32,
    origin_y: f32,
}

impl Layout {
    fn fit(width: usize, height: usize) -> Self {
        let available_h = screen_height() - HUD_HEIGHT;
        let cell = (screen_width() / width as f32).min(available_h / height as f32).floor();
        Self {
            cell,
            origin_x: (screen_width() - cell * width as f32) * 0.5,
            origin_y: HUD_HEIGHT,
        }
    }

    fn corner(&self, pos: Pos) -> (f32, f32) {
        (self.origin_x + pos.x as f32 * self.cell, self.origin_y + pos.y as f32 * self.cell)
    }

    fn center(&self, pos: Pos) -> (f32, f32) {
        let (x, y) = self.corner(pos);
        (x + self.cell * 0.5, y + self.cell * 0.5)
    }
}

pub fn draw_frame(
    session: &GameSession,
    leaderboard: Option<&[LeaderboardEntry]>,
    previous_session: Option<&str>,
) {
    clear_background(BLACK);
    let grid = session.grid();
    let state = session.state();
    let layout = Layout::fit(grid.width(), grid.height());

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let pos = Pos::new(x as i32, y as i32);
            let color = match grid.cell_at(pos) {
                Cell::Wall => WALL,
                Cell::Path => PATH,
            };
            let (px, py) = layout.corner(pos);
            draw_rectangle(px, py, layout.cell, layout.cell, color);
        }
    }

    let (gx, gy) = layout.corner(state.goal);
    draw_rectangle(gx, gy, layout.cell, layout.cell, GREEN);

    for house in &state.houses {
        let (hx, hy) = layout.corner(house.pos);
        let color = if house.is_free() { ORANGE } else { HOUSE_COOLING };
        draw_rectangle(hx, hy, layout.cell, layout.cell, color);
        if !house.is_free() {
            let label = house.cooldown_remaining.to_string();
            draw_text(&label, hx + 1.0, hy + layout.cell * 0.8, layout.cell * 0.8, WHITE);
        }
    }

    let radius = layout.cell * 0.4;
    for monster in &state.monsters {
        let (mx, my) = layout.center(monster.pos);
        let color = match monster.kind {
            MonsterKind::Wanderer => RED,
            MonsterKind::Pursuer => PURPLE,
        };
        draw_circle(mx, my, radius, color);
    }

    if state.player.alive {
        let (px, py) = layout.center(state.player.pos);
        let radius = if state.player.in_house.is_some() { radius * 0.6 } else { radius };
        draw_circle(px, py, radius, SKYBLUE);
    }

    draw_hud(session, previous_session);

    if let Some(text) = status_banner(state.status, AppState::last_award(session)) {
        draw_centered(&text, screen_height() * 0.5, 36.0, GOLD);
    }
    if let Some(entries) = leaderboard {
        draw_leaderboard(entries);
    }
}

fn draw_hud(session: &GameSession, previous_session: Option<&str>) {
    let state = session.state();
    let mut line = format!("Level {}   Coins {}", state.level, state.coins);
    if state.player.in_house.is_some() {
        line.push_str(&format!("   House {}s", state.house_stay_remaining));
    }
    draw_text(&line, 12.0, 30.0, 28.0, WHITE);

    let footer = format!(
        "seed {}   hash {}   arrows/WASD move  P pause  R restart  N new run  L leaderboard",
        format_seed(session.seed()),
        format_snapshot_hash(session.snapshot_hash()),
    );
    draw_text(&footer, 12.0, 60.0, 16.0, LIGHTGRAY);
    if let Some(previous) = previous_session {
        draw_text(previous, 12.0, 76.0, 14.0, GRAY);
    }
}

fn draw_leaderboard(entries: &[LeaderboardEntry]) {
    let width = 320.0;
    let height = 40.0 + 24.0 * entries.len().max(1) as f32;
    let x = (screen_width() - width) * 0.5;
    let y = HUD_HEIGHT + 20.0;
    draw_rectangle(x, y, width, height, Color::new(0.0, 0.0, 0.0, 0.85));
    draw_text("Leaderboard", x + 12.0, y + 28.0, 26.0, GOLD);
    if entries.is_empty() {
        draw_text("no wins yet", x + 12.0, y + 56.0, 20.0, DARKGRAY);
    }
    for (rank, entry) in entries.iter().enumerate() {
        let row = format!(
            "{:>2}. {:<12} L{:<3} {} coins",
            rank + 1,
            entry.player,
            entry.highest_level,
            entry.coins
        );
        draw_text(&row, x + 12.0, y + 56.0 + 24.0 * rank as f32, 20.0, WHITE);
    }
}

fn draw_centered(text: &str, y: f32, size: f32, color: Color) {
    let dims = measure_text(text, None, size as u16, 1.0);
    let x = (screen_width() - dims.width) * 0.5;
    draw_rectangle(x - 12.0, y - size, dims.width + 24.0, size * 1.4, Color::new(0.0, 0.0, 0.0, 0.7));
    draw_text(text, x, y, size, color);
}
