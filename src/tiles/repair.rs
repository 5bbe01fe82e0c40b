// src/tiles/repair.rs
//! Исправление диагональных касаний стен
//!
//! Рендерер ломается на "шахматных" блоках 2×2:
//! ```text
//! #_    _#
//! _# ИЛИ #_
//! ```
//! Такой блок целиком превращается в пол, бывшие стены опускаются на высоту
//! стены. Выравнивание одного блока может создать новый узор по соседству,
//! поэтому проходов минимум два, а дальше — пока очередной проход что-то
//! выравнивает. Каждый проход убирает стены, так что цикл конечен.

use crate::tiles::{TileClaim, TileGrid, TileType};
use log::debug;

/// Минимальное количество проходов исправления
pub const REPAIR_PASSES: usize = 2;

/// Выполняет проходы исправления, возвращает число выровненных блоков
pub fn repair_diagonal_touches(grid: &mut TileGrid, wall_height: i32) -> usize {
    let mut total = 0;
    let mut passes = 0;
    loop {
        let flattened = repair_pass(grid, wall_height);
        total += flattened;
        passes += 1;
        if passes >= REPAIR_PASSES && flattened == 0 {
            break;
        }
    }
    if passes > REPAIR_PASSES {
        debug!("Исправление диагоналей сошлось за {passes} проходов");
    }
    total
}

/// Один проход по всем блокам 2×2 в порядке чтения
pub fn repair_pass(grid: &mut TileGrid, wall_height: i32) -> usize {
    let mut flattened = 0;
    for y in 0..grid.height.saturating_sub(1) {
        for x in 0..grid.width.saturating_sub(1) {
            if is_checkerboard(grid, x, y) {
                for (bx, by) in [(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)] {
                    flatten(grid, bx, by, wall_height);
                }
                flattened += 1;
            }
        }
    }
    flattened
}

/// Совпадают только диагональные клетки, а внедиагональные им противоположны
#[must_use]
pub fn is_checkerboard(grid: &TileGrid, x: usize, y: usize) -> bool {
    let wall = grid.get(x, y).is_wall();
    let wall_r = grid.get(x + 1, y).is_wall();
    let wall_d = grid.get(x, y + 1).is_wall();
    let wall_rd = grid.get(x + 1, y + 1).is_wall();
    (wall && wall_rd && !wall_r && !wall_d) || (!wall && !wall_rd && wall_r && wall_d)
}

fn flatten(grid: &mut TileGrid, x: usize, y: usize, wall_height: i32) {
    let tile = grid.get_mut(x, y);
    if tile.is_wall() {
        if let TileClaim::Claimed { style, height } = tile.claim {
            tile.claim = TileClaim::Claimed {
                style,
                height: height - wall_height,
            };
        }
    }
    tile.tile_type = TileType::Floor;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::MapTile;

    /// `#` — стена высоты 4, `_` — пол высоты 0, `.` — дверь
    fn grid(rows: &[&str]) -> TileGrid {
        TileGrid::from_rows(
            rows.iter()
                .map(|row| {
                    row.chars()
                        .map(|c| {
                            let (tile_type, height) = match c {
                                '#' => (TileType::Wall, 4),
                                '.' => (TileType::Door, 0),
                                _ => (TileType::Floor, 0),
                            };
                            MapTile {
                                tile_type,
                                claim: TileClaim::Claimed { style: 0, height },
                                carcass: false,
                                disabled: false,
                            }
                        })
                        .collect()
                })
                .collect(),
        )
    }

    fn any_checkerboard(grid: &TileGrid) -> bool {
        (0..grid.height - 1).any(|y| (0..grid.width - 1).any(|x| is_checkerboard(grid, x, y)))
    }

    #[test]
    fn main_diagonal_pattern_is_flattened() {
        let mut g = grid(&["#_", "_#"]);
        assert_eq!(repair_diagonal_touches(&mut g, 4), 1);
        assert!(g.tiles.iter().all(|t| t.tile_type == TileType::Floor));
        assert!(g.tiles.iter().all(|t| t.height() == Some(0)));
    }

    #[test]
    fn anti_diagonal_pattern_is_flattened() {
        let mut g = grid(&["_#", "#_"]);
        assert_eq!(repair_diagonal_touches(&mut g, 4), 1);
        assert!(!any_checkerboard(&g));
        assert_eq!(g.get(1, 0).height(), Some(0));
    }

    #[test]
    fn straight_walls_are_untouched() {
        let original = grid(&["###", "___", "###"]);
        let mut g = original.clone();
        assert_eq!(repair_diagonal_touches(&mut g, 4), 0);
        assert_eq!(g, original);
    }

    #[test]
    fn door_counts_as_non_wall() {
        let mut g = grid(&["#.", "_#"]);
        assert_eq!(repair_pass(&mut g, 4), 1);
        assert_eq!(g.get(1, 0).tile_type, TileType::Floor);
    }

    #[test]
    fn cascade_is_resolved_by_second_pass() {
        // Выравнивание нижнего блока открывает узор в уже пройденном блоке выше
        let mut g = grid(&["__#_", "__##", "_#__"]);
        assert_eq!(repair_pass(&mut g, 4), 1);
        assert!(any_checkerboard(&g));
        assert_eq!(repair_pass(&mut g, 4), 1);
        assert!(!any_checkerboard(&g));
    }

    #[test]
    fn repair_runs_until_nothing_is_left() {
        let mut g = grid(&["__#_", "__##", "_#__"]);
        assert_eq!(repair_diagonal_touches(&mut g, 4), 2);
        assert!(!any_checkerboard(&g));
        assert_eq!(repair_pass(&mut g, 4), 0);
    }
}
