// src/shadow.rs
//! Тени и контурные линии
//!
//! Для каждого тайла смотрим на 8 соседей (за краем сетки — виртуальный тайл):
//! - по каждой стороне: линия тени, повторённая `max(0, hDif)` раз, где
//!   `hDif` — насколько сосед выше; и одна чёрная контурная линия, если
//!   высота или стиль соседа отличаются;
//! - по каждой диагонали: угол тени, повторённый
//!   `max(0, diag.hDif − max(orth1.hDif, orth2.hDif))` раз — только та часть
//!   перепада, которую не объясняют две прилежащие стороны.
//!
//! Расчёт — чистая функция от готовой сетки, ошибок не бывает.

use crate::geometry::Point;
use crate::tiles::{MapTile, TileClaim, TileGrid};
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// Диагонали в порядке вывода вместе с прилежащими сторонами
    pub const CORNERS: [(Direction, Direction, Direction); 4] = [
        (Direction::DownLeft, Direction::Down, Direction::Left),
        (Direction::UpLeft, Direction::Up, Direction::Left),
        (Direction::UpRight, Direction::Up, Direction::Right),
        (Direction::DownRight, Direction::Down, Direction::Right),
    ];

    #[must_use]
    pub fn offset(self) -> Point {
        match self {
            Direction::Left => Point::LEFT,
            Direction::Up => Point::UP,
            Direction::Right => Point::RIGHT,
            Direction::Down => Point::DOWN,
            Direction::UpLeft => Point::UP_LEFT,
            Direction::UpRight => Point::UP_RIGHT,
            Direction::DownLeft => Point::DOWN_LEFT,
            Direction::DownRight => Point::DOWN_RIGHT,
        }
    }

    /// Поворот декали в градусах редактора
    #[must_use]
    pub fn rotation(self) -> i32 {
        match self {
            Direction::Left | Direction::DownLeft => 0,
            Direction::Up | Direction::UpLeft => 90,
            Direction::Right | Direction::UpRight => 180,
            Direction::Down | Direction::DownRight => -90,
        }
    }
}

/// Сравнение тайла с одним соседом
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowEntry {
    /// Высота соседа минус высота тайла
    pub h_dif: i32,
    pub is_wall: bool,
    pub same_style: bool,
    pub need_line: bool,
    pub higher: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowTileInfo {
    pub left: ShadowEntry,
    pub up: ShadowEntry,
    pub right: ShadowEntry,
    pub down: ShadowEntry,
    pub up_left: ShadowEntry,
    pub up_right: ShadowEntry,
    pub down_left: ShadowEntry,
    pub down_right: ShadowEntry,
}

/// Тайл без стиля читается как пол высоты 0 без стиля
fn effective(tile: &MapTile) -> (i32, Option<usize>) {
    match tile.claim {
        TileClaim::Claimed { style, height } => (height, Some(style)),
        TileClaim::Unclaimed => (0, None),
    }
}

impl ShadowTileInfo {
    #[must_use]
    pub fn compute(grid: &TileGrid, x: usize, y: usize) -> Self {
        let (height, style) = effective(grid.get(x, y));
        let entry = |dir: Direction| {
            let d = dir.offset();
            let other = grid.neighbor(x as i32 + d.x, y as i32 + d.y);
            let (other_height, other_style) = effective(other);
            let h_dif = other_height - height;
            let same_style = other_style == style;
            ShadowEntry {
                h_dif,
                is_wall: other.is_wall(),
                same_style,
                need_line: h_dif != 0 || !same_style,
                higher: h_dif > 0,
            }
        };
        Self {
            left: entry(Direction::Left),
            up: entry(Direction::Up),
            right: entry(Direction::Right),
            down: entry(Direction::Down),
            up_left: entry(Direction::UpLeft),
            up_right: entry(Direction::UpRight),
            down_left: entry(Direction::DownLeft),
            down_right: entry(Direction::DownRight),
        }
    }

    #[must_use]
    pub fn entry(&self, dir: Direction) -> &ShadowEntry {
        match dir {
            Direction::Left => &self.left,
            Direction::Up => &self.up,
            Direction::Right => &self.right,
            Direction::Down => &self.down,
            Direction::UpLeft => &self.up_left,
            Direction::UpRight => &self.up_right,
            Direction::DownLeft => &self.down_left,
            Direction::DownRight => &self.down_right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DecalKind {
    ShadowLine,
    ShadowCorner,
    BlackLine,
}

/// Набор текстур декали: для стен или для пола
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DecalFamily {
    Wall,
    Floor,
}

impl DecalFamily {
    fn of(is_wall: bool) -> Self {
        if is_wall {
            DecalFamily::Wall
        } else {
            DecalFamily::Floor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Decal {
    pub direction: Direction,
    pub kind: DecalKind,
    pub family: DecalFamily,
    /// Сколько раз декаль накладывается на тайл
    pub count: u32,
}

impl Decal {
    /// Имя ресурса редактора для декали
    #[must_use]
    pub fn asset_name(&self) -> &'static str {
        match (self.kind, self.family) {
            (DecalKind::ShadowLine, DecalFamily::Wall) => "shadow_wall_line",
            (DecalKind::ShadowLine, DecalFamily::Floor) => "shadow_floor_line",
            (DecalKind::ShadowCorner, DecalFamily::Wall) => "shadow_wall_corner",
            (DecalKind::ShadowCorner, DecalFamily::Floor) => "shadow_floor_corner",
            (DecalKind::BlackLine, DecalFamily::Wall) => "line_wall",
            (DecalKind::BlackLine, DecalFamily::Floor) => "line_floor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileDecals {
    pub x: usize,
    pub y: usize,
    pub decals: Vec<Decal>,
}

/// Декали одного тайла в порядке вывода: линии тени (L, U, R, D),
/// углы (DL, UL, UR, DR), контурные линии (L, U, R, D). Нулевые повторы опускаются.
#[must_use]
pub fn tile_decals(grid: &TileGrid, x: usize, y: usize) -> Vec<Decal> {
    let info = ShadowTileInfo::compute(grid, x, y);
    let this_is_wall = grid.get(x, y).is_wall();
    let mut decals = Vec::new();

    for dir in Direction::ORTHOGONAL {
        push_decal(
            &mut decals,
            dir,
            DecalKind::ShadowLine,
            DecalFamily::of(this_is_wall),
            info.entry(dir).h_dif,
        );
    }

    for (diag, side_a, side_b) in Direction::CORNERS {
        let corner = info.entry(diag);
        let explained = info.entry(side_a).h_dif.max(info.entry(side_b).h_dif);
        push_decal(
            &mut decals,
            diag,
            DecalKind::ShadowCorner,
            DecalFamily::of(this_is_wall || corner.is_wall),
            corner.h_dif - explained,
        );
    }

    for dir in Direction::ORTHOGONAL {
        if info.entry(dir).need_line {
            push_decal(
                &mut decals,
                dir,
                DecalKind::BlackLine,
                DecalFamily::of(this_is_wall),
                1,
            );
        }
    }
    decals
}

fn push_decal(decals: &mut Vec<Decal>, direction: Direction, kind: DecalKind, family: DecalFamily, count: i32) {
    if count > 0 {
        decals.push(Decal {
            direction,
            kind,
            family,
            count: count as u32,
        });
    }
}

/// Декали для всех тайлов сетки в порядке чтения
#[must_use]
pub fn derive_decals(grid: &TileGrid) -> Vec<TileDecals> {
    if grid.width == 0 {
        return Vec::new();
    }
    let width = grid.width;
    let build = |i: usize| {
        let (x, y) = (i % width, i / width);
        TileDecals {
            x,
            y,
            decals: tile_decals(grid, x, y),
        }
    };

    #[cfg(feature = "parallel")]
    let decals = (0..grid.tiles.len()).into_par_iter().map(build).collect();
    #[cfg(not(feature = "parallel"))]
    let decals = (0..grid.tiles.len()).map(build).collect();

    decals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::TileType;

    fn tile(tile_type: TileType, style: usize, height: i32) -> MapTile {
        MapTile {
            tile_type,
            claim: TileClaim::Claimed { style, height },
            carcass: false,
            disabled: false,
        }
    }

    /// Сетка 3×3 пола одного стиля с заданными высотами
    fn heights(rows: [[i32; 3]; 3]) -> TileGrid {
        TileGrid::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|&h| tile(TileType::Floor, 0, h)).collect())
                .collect(),
        )
    }

    fn count(decals: &[Decal], kind: DecalKind, direction: Direction) -> u32 {
        decals
            .iter()
            .filter(|d| d.kind == kind && d.direction == direction)
            .map(|d| d.count)
            .sum()
    }

    #[test]
    fn shadow_line_count_equals_height_step() {
        let grid = heights([[0, 0, 0], [0, 0, 2], [0, 0, 0]]);
        let decals = tile_decals(&grid, 1, 1);
        assert_eq!(count(&decals, DecalKind::ShadowLine, Direction::Right), 2);
        assert_eq!(count(&decals, DecalKind::BlackLine, Direction::Right), 1);
        assert_eq!(count(&decals, DecalKind::ShadowLine, Direction::Left), 0);
        assert_eq!(count(&decals, DecalKind::BlackLine, Direction::Left), 0);
        // Перепад полностью объяснён правой стороной
        assert_eq!(count(&decals, DecalKind::ShadowCorner, Direction::UpRight), 0);
    }

    #[test]
    fn higher_tile_gets_no_shadow() {
        let grid = heights([[0, 0, 0], [0, 0, 2], [0, 0, 0]]);
        let decals = tile_decals(&grid, 2, 1);
        assert_eq!(count(&decals, DecalKind::ShadowLine, Direction::Left), 0);
        assert_eq!(count(&decals, DecalKind::BlackLine, Direction::Left), 1);
    }

    #[test]
    fn corner_counts_only_unexplained_drop() {
        let grid = heights([[0, 0, 0], [0, 0, 0], [0, 0, 3]]);
        let decals = tile_decals(&grid, 1, 1);
        assert_eq!(count(&decals, DecalKind::ShadowCorner, Direction::DownRight), 3);

        let grid = heights([[0, 0, 0], [0, 0, 1], [0, 0, 3]]);
        let decals = tile_decals(&grid, 1, 1);
        assert_eq!(count(&decals, DecalKind::ShadowCorner, Direction::DownRight), 2);
        assert_eq!(count(&decals, DecalKind::ShadowLine, Direction::Right), 1);
    }

    #[test]
    fn style_change_draws_outline_without_shadow() {
        let mut grid = heights([[0, 0, 0], [0, 0, 0], [0, 0, 0]]);
        *grid.get_mut(1, 0) = tile(TileType::Floor, 1, 0);
        let decals = tile_decals(&grid, 1, 1);
        assert_eq!(count(&decals, DecalKind::BlackLine, Direction::Up), 1);
        assert_eq!(count(&decals, DecalKind::ShadowLine, Direction::Up), 0);
    }

    #[test]
    fn edge_tiles_see_virtual_wall() {
        let grid = heights([[1, 1, 1], [1, 1, 1], [1, 1, 1]]);
        let info = ShadowTileInfo::compute(&grid, 0, 0);
        assert!(info.left.is_wall);
        assert_eq!(info.left.h_dif, -1);
        assert!(info.left.same_style);
        assert!(info.left.need_line);
        assert!(!info.left.higher);
        assert!(!info.right.need_line);
    }

    #[test]
    fn families_follow_wall_status() {
        let mut grid = heights([[0, 0, 0], [0, 0, 0], [0, 0, 0]]);
        *grid.get_mut(2, 2) = tile(TileType::Wall, 0, 4);
        let decals = tile_decals(&grid, 1, 1);
        let corner = decals
            .iter()
            .find(|d| d.kind == DecalKind::ShadowCorner)
            .unwrap();
        assert_eq!(corner.family, DecalFamily::Wall);
        assert_eq!(corner.asset_name(), "shadow_wall_corner");
        assert_eq!(corner.direction.rotation(), -90);

        let mut grid = heights([[0, 0, 0], [0, 0, 0], [0, 0, 0]]);
        *grid.get_mut(1, 2) = tile(TileType::Wall, 0, 4);
        let line = tile_decals(&grid, 1, 1)
            .into_iter()
            .find(|d| d.kind == DecalKind::ShadowLine)
            .unwrap();
        assert_eq!(line.family, DecalFamily::Floor);
        assert_eq!(line.asset_name(), "shadow_floor_line");
    }

    #[test]
    fn derive_covers_every_tile_in_order() {
        let grid = heights([[0, 1, 0], [0, 0, 0], [2, 0, 0]]);
        let all = derive_decals(&grid);
        assert_eq!(all.len(), 9);
        assert_eq!((all[4].x, all[4].y), (1, 1));
        assert_eq!(all[4].decals, tile_decals(&grid, 1, 1));
    }
}
