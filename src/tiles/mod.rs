// src/tiles/mod.rs
//! Тайловая сетка уровня
//!
//! Один буфер `TileGrid` проходит через этапы строго по порядку:
//! растеризация → обрезка → исправление диагоналей → расчёт теней.
//! Каждый этап получает сетку по `&mut` (или `&` для теней), параллельного
//! доступа нет.

pub mod dump;
pub mod png;
pub mod raster;
pub mod repair;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TileType {
    Floor,
    Wall,
    Door,
}

/// Принадлежность тайла стилю.
///
/// Тайл получает стиль и высоту только когда его накрывает стилевой отпечаток
/// какой-либо комнаты. До этого он `Unclaimed`, и каждый потребитель обязан
/// обработать этот случай явно.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TileClaim {
    Unclaimed,
    Claimed { style: usize, height: i32 },
}

impl TileClaim {
    #[must_use]
    pub fn style(self) -> Option<usize> {
        match self {
            TileClaim::Unclaimed => None,
            TileClaim::Claimed { style, .. } => Some(style),
        }
    }

    #[must_use]
    pub fn height(self) -> Option<i32> {
        match self {
            TileClaim::Unclaimed => None,
            TileClaim::Claimed { height, .. } => Some(height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MapTile {
    pub tile_type: TileType,
    pub claim: TileClaim,
    /// Структурная граница комнаты (южная/восточная линия шириной 1)
    pub carcass: bool,
    /// Тайл стены, залитый растеризатором (не дверь)
    pub disabled: bool,
}

impl MapTile {
    /// Тайл для любых запросов за пределами сетки
    pub const VIRTUAL: MapTile = MapTile {
        tile_type: TileType::Wall,
        claim: TileClaim::Claimed {
            style: 0,
            height: 0,
        },
        carcass: false,
        disabled: false,
    };

    #[must_use]
    pub const fn floor() -> Self {
        Self {
            tile_type: TileType::Floor,
            claim: TileClaim::Unclaimed,
            carcass: false,
            disabled: false,
        }
    }

    #[must_use]
    pub fn is_wall(&self) -> bool {
        self.tile_type == TileType::Wall
    }

    #[must_use]
    pub fn style(&self) -> Option<usize> {
        self.claim.style()
    }

    #[must_use]
    pub fn height(&self) -> Option<i32> {
        self.claim.height()
    }
}

/// Прямоугольная сетка тайлов, хранится построчно
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileGrid {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<MapTile>,
}

impl TileGrid {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![MapTile::floor(); width * height],
        }
    }

    /// Строит сетку из строк; все строки обязаны быть одной длины
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<MapTile>>) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|row| row.len() == width),
            "tile grid rows must have equal length"
        );
        Self {
            width,
            height,
            tiles: rows.into_iter().flatten().collect(),
        }
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> &MapTile {
        &self.tiles[y * self.width + x]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut MapTile {
        &mut self.tiles[y * self.width + x]
    }

    /// Доступ по знаковым координатам; `None` за пределами сетки
    #[must_use]
    pub fn at(&self, x: i32, y: i32) -> Option<&MapTile> {
        let (x, y) = self.index_of(x, y)?;
        Some(self.get(x, y))
    }

    pub fn at_mut(&mut self, x: i32, y: i32) -> Option<&mut MapTile> {
        let (x, y) = self.index_of(x, y)?;
        Some(self.get_mut(x, y))
    }

    /// Соседний тайл; за пределами сетки — виртуальный тайл
    #[must_use]
    pub fn neighbor(&self, x: i32, y: i32) -> &MapTile {
        match self.index_of(x, y) {
            Some((x, y)) => self.get(x, y),
            None => &MapTile::VIRTUAL,
        }
    }

    fn index_of(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then_some((x, y))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[MapTile]> {
        self.tiles.chunks(self.width.max(1))
    }

    /// Вырезает прямоугольник `[x0, x0 + width) × [y0, y0 + height)`
    #[must_use]
    pub fn crop(&self, x0: usize, y0: usize, width: usize, height: usize) -> TileGrid {
        let tiles = (y0..y0 + height)
            .flat_map(|y| self.tiles[y * self.width + x0..y * self.width + x0 + width].iter().copied())
            .collect();
        TileGrid {
            width,
            height,
            tiles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_neighbor_is_virtual() {
        let grid = TileGrid::new(2, 2);
        assert_eq!(*grid.neighbor(-1, 0), MapTile::VIRTUAL);
        assert_eq!(*grid.neighbor(0, 2), MapTile::VIRTUAL);
        assert_eq!(*grid.neighbor(1, 1), MapTile::floor());
        assert!(grid.neighbor(5, 5).is_wall());
        assert_eq!(grid.neighbor(5, 5).height(), Some(0));
    }

    #[test]
    fn crop_copies_sub_rectangle() {
        let mut grid = TileGrid::new(4, 3);
        grid.get_mut(2, 1).tile_type = TileType::Wall;
        let cropped = grid.crop(1, 1, 2, 2);
        assert_eq!((cropped.width, cropped.height), (2, 2));
        assert!(cropped.get(1, 0).is_wall());
        assert!(!cropped.get(0, 0).is_wall());
    }

    #[test]
    fn signed_access_rejects_negative() {
        let mut grid = TileGrid::new(3, 3);
        assert!(grid.at_mut(-1, 0).is_none());
        assert!(grid.at_mut(3, 0).is_none());
        assert!(grid.at_mut(2, 2).is_some());
    }
}
