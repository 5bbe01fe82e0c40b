// src/tiles/raster.rs
//! Растеризация раскладки комнат в тайлы
//!
//! Рабочая сетка берётся с запасом на худшее смещение стен и растекание стиля,
//! по умолчанию заполнена полом. Комнаты рисуются в порядке чтения:
//! 1. Южная и восточная полосы стен (двери внутри полос остаются дверями)
//! 2. Заливка стеной отключённой комнаты
//! 3. Линии каркаса по южному и восточному краю
//! 4. Стилевой отпечаток: стиль и высота тайлов
//!
//! Тайл, ставший дверью, никогда не превращается обратно в стену.

use crate::config::{GenerationParams, StyleOverlap};
use crate::geometry::{Point, Size, points_rect};
use crate::layout::{Room, RoomLayout};
use crate::style::RoomStyle;
use crate::tiles::{TileClaim, TileGrid, TileType};
use log::debug;

/// Рисует все комнаты в необрезанную рабочую сетку
#[must_use]
pub fn rasterize(layout: &RoomLayout, styles: &[RoomStyle], params: &GenerationParams) -> TileGrid {
    let margin = Size::new(
        params.style_size.max.w.max(params.wall_max_offset.x),
        params.style_size.max.h.max(params.wall_max_offset.y),
    );
    let width: i32 = layout.diagonal_sizes.iter().map(|s| s.w + margin.w).sum::<i32>() + 1;
    let height: i32 = layout.diagonal_sizes.iter().map(|s| s.h + margin.h).sum::<i32>() + 1;
    let mut grid = TileGrid::new(width.max(0) as usize, height.max(0) as usize);
    debug!("Рабочая сетка {width}×{height}");

    for room in layout.iter() {
        paint_room(&mut grid, room, styles, params);
    }
    grid
}

fn paint_room(grid: &mut TileGrid, room: &Room, styles: &[RoomStyle], params: &GenerationParams) {
    let pos = room.pos_abs;
    let size = room.size;

    // Южная стена
    paint_wall(
        grid,
        Point::new(pos.x, pos.y + size.h + room.wall_horiz.offset),
        Size::new(size.w, room.wall_horiz.width),
        |p| room.door_horiz.contains(pos.x, p.x),
    );

    // Восточная стена
    paint_wall(
        grid,
        Point::new(pos.x + size.w + room.wall_vert.offset, pos.y),
        Size::new(room.wall_vert.width, size.h),
        |p| room.door_vert.contains(pos.y, p.y),
    );

    if room.disabled {
        paint_wall(
            grid,
            pos,
            Size::new(
                size.w + room.wall_vert.offset,
                size.h + room.wall_horiz.offset,
            ),
            |_| false,
        );
    }

    // Каркас
    let carcass_lines = [
        (Point::new(pos.x, pos.y + size.h), Size::new(size.w, 1)),
        (Point::new(pos.x + size.w, pos.y), Size::new(1, size.h)),
    ];
    for (start, line) in carcass_lines {
        for p in points_rect(start, line) {
            if let Some(tile) = grid.at_mut(p.x, p.y) {
                tile.carcass = true;
            }
        }
    }

    // Стилевой отпечаток. Высота пересчитывается при каждом накрытии:
    // от стиля владельца и от того, стена ли тайл сейчас.
    let footprint = Size::new(size.w + room.style_size.w, size.h + room.style_size.h);
    for p in points_rect(pos, footprint) {
        let Some(tile) = grid.at_mut(p.x, p.y) else {
            continue;
        };
        let owner = match (params.style_overlap, tile.claim) {
            (StyleOverlap::FirstWriter, TileClaim::Claimed { style, .. }) => style,
            _ => room.style_index,
        };
        let wall_bonus = if tile.is_wall() { params.wall_height } else { 0 };
        tile.claim = TileClaim::Claimed {
            style: owner,
            height: styles[owner].height + wall_bonus,
        };
    }
}

/// Заливает прямоугольник стеной. Тайл становится дверью, если он уже был
/// дверью или попадает в полосу двери `in_door`.
fn paint_wall(grid: &mut TileGrid, start: Point, size: Size, in_door: impl Fn(Point) -> bool) {
    for p in points_rect(start, size) {
        let Some(tile) = grid.at_mut(p.x, p.y) else {
            continue;
        };
        let is_door = tile.tile_type == TileType::Door || in_door(p);
        tile.disabled = !is_door;
        tile.tile_type = if is_door { TileType::Door } else { TileType::Wall };
    }
}

/// Левый верхний угол обрезки в рабочей сетке
#[must_use]
pub fn crop_origin(layout: &RoomLayout) -> Point {
    layout
        .diagonal_sizes
        .first()
        .map_or(Point::default(), |first| first.to_point())
}

/// Обрезает сетку до занятого комнатами прямоугольника.
///
/// Первый столбец и первая строка комнат остаются за кадром: видимая карта
/// начинается с их южной/восточной стены.
#[must_use]
pub fn crop_to_rooms(grid: &TileGrid, layout: &RoomLayout) -> TileGrid {
    let origin = crop_origin(layout);
    let width = (layout.total_width() - origin.x + 1).max(0) as usize;
    let height = (layout.total_height() - origin.y + 1).max(0) as usize;
    let x0 = origin.x.max(0) as usize;
    let y0 = origin.y.max(0) as usize;
    grid.crop(
        x0,
        y0,
        width.min(grid.width.saturating_sub(x0)),
        height.min(grid.height.saturating_sub(y0)),
    )
}

/// Дальний правый нижний тайл не достаётся ни одной полосе стены:
/// копируем в него левого соседа.
pub fn fix_far_corner(grid: &mut TileGrid) {
    if grid.width < 2 || grid.height == 0 {
        return;
    }
    let (x, y) = (grid.width - 1, grid.height - 1);
    let left = *grid.get(x - 1, y);
    *grid.get_mut(x, y) = left;
}
