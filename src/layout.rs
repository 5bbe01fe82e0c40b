// src/layout.rs
//! Планировщик раскладки комнат
//!
//! Сетка `cols × rows` комнат упакована без зазоров в порядке чтения.
//! Ширины столбцов и высоты строк берутся из одного массива "диагональных"
//! размеров: все комнаты столбца `x` имеют ширину `diagonal_sizes[x].w`,
//! все комнаты строки `y` — высоту `diagonal_sizes[y].h`. Так стены соседних
//! комнат всегда стыкуются.
//!
//! Каждая комната владеет своей южной и восточной стеной. Отрицательное
//! смещение стены позволяет ей "въедать" пол комнаты со стороны соседа.

use crate::config::GenerationParams;
use crate::error::{FieldContext, Result};
use crate::geometry::{Point, Size};
use crate::rng::RngService;
use log::debug;
use serde::Serialize;

/// Полоса стены или двери: смещение от края пола комнаты и толщина
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Band {
    pub offset: i32,
    pub width: i32,
}

impl Band {
    #[must_use]
    pub const fn new(offset: i32, width: i32) -> Self {
        Self { offset, width }
    }

    /// Лежит ли координата `v` в полосе, отсчитанной от `origin`
    #[must_use]
    pub fn contains(&self, origin: i32, v: i32) -> bool {
        v >= origin + self.offset && v < origin + self.offset + self.width
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    /// Позиция в сетке комнат
    pub index: Point,
    /// Левый верхний тайл пола в рабочей (необрезанной) сетке
    pub pos_abs: Point,
    pub size: Size,
    /// Южная стена (смещение по `y` от нижнего края пола)
    pub wall_horiz: Band,
    /// Восточная стена (смещение по `x` от правого края пола)
    pub wall_vert: Band,
    /// Дверь в южной стене (смещение по `x` от левого края комнаты)
    pub door_horiz: Band,
    /// Дверь в восточной стене (смещение по `y` от верхнего края комнаты)
    pub door_vert: Band,
    pub style_index: usize,
    /// Насколько стиль выходит за пол комнаты вправо и вниз
    pub style_size: Size,
    pub disabled: bool,
}

impl Room {
    #[must_use]
    pub fn has_door_horiz(&self) -> bool {
        self.door_horiz.width > 0
    }

    #[must_use]
    pub fn has_door_vert(&self) -> bool {
        self.door_vert.width > 0
    }

    /// Центр комнаты в тайлах рабочей сетки
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.pos_abs.x + self.size.w / 2,
            self.pos_abs.y + self.size.h / 2,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomLayout {
    pub diagonal_sizes: Vec<Size>,
    /// Комнаты по строкам: `rooms[y][x]`
    pub rooms: Vec<Vec<Room>>,
}

impl RoomLayout {
    #[must_use]
    pub fn cols(&self) -> usize {
        self.rooms.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rooms.len()
    }

    #[must_use]
    pub fn room(&self, x: usize, y: usize) -> &Room {
        &self.rooms[y][x]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().flatten()
    }

    /// Суммарная ширина первых `cols` столбцов
    #[must_use]
    pub fn total_width(&self) -> i32 {
        self.diagonal_sizes.iter().take(self.cols()).map(|s| s.w).sum()
    }

    #[must_use]
    pub fn total_height(&self) -> i32 {
        self.diagonal_sizes.iter().take(self.rows()).map(|s| s.h).sum()
    }
}

/// Строит раскладку комнат. Порядок розыгрышей фиксирован:
/// сначала диагональные размеры, затем комнаты в порядке чтения.
pub fn plan_rooms(params: &GenerationParams, rng: &mut RngService) -> Result<RoomLayout> {
    let diagonal_sizes = draw_diagonal_sizes(params, rng)?;
    place_rooms(params, diagonal_sizes, rng)
}

/// Один размер на каждый диагональный индекс `0..max(cols, rows)`
pub fn draw_diagonal_sizes(params: &GenerationParams, rng: &mut RngService) -> Result<Vec<Size>> {
    (0..params.cols().max(params.rows()))
        .map(|_| params.room_size.randomize(rng).field("room_size"))
        .collect()
}

/// Разыгрывает комнаты в порядке чтения по готовым диагональным размерам
pub fn place_rooms(
    params: &GenerationParams,
    diagonal_sizes: Vec<Size>,
    rng: &mut RngService,
) -> Result<RoomLayout> {
    let cols = params.cols();
    let rows = params.rows();

    let mut rooms = Vec::with_capacity(rows);
    for y in 0..rows {
        let mut row = Vec::with_capacity(cols);
        for x in 0..cols {
            let room = plan_room(params, &diagonal_sizes, x, y, rng)?;
            debug!(
                "Комната ({x}, {y}): позиция {:?}, размер {:?}, стиль {}",
                room.pos_abs, room.size, room.style_index
            );
            row.push(room);
        }
        rooms.push(row);
    }

    Ok(RoomLayout {
        diagonal_sizes,
        rooms,
    })
}

fn plan_room(
    params: &GenerationParams,
    diagonal_sizes: &[Size],
    x: usize,
    y: usize,
    rng: &mut RngService,
) -> Result<Room> {
    let cols = params.cols();
    let rows = params.rows();
    let index = Point::new(x as i32, y as i32);

    let disabled = params.rooms_disabled.contains(&index);
    let door_right_disabled = params.rooms_door_right_disabled.contains(&index)
        || (disabled && params.rooms_disabled.contains(&(index + Point::RIGHT)));
    let door_down_disabled = params.rooms_door_down_disabled.contains(&index)
        || (disabled && params.rooms_disabled.contains(&(index + Point::DOWN)));

    let pos_abs = Point::new(
        diagonal_sizes[..x].iter().map(|s| s.w).sum(),
        diagonal_sizes[..y].iter().map(|s| s.h).sum(),
    );
    let size = Size::new(diagonal_sizes[x].w, diagonal_sizes[y].h);

    // Стены
    let wall_size = params.wall_size.randomize(rng).field("wall_size")?;
    let wall_horiz_offset = -rng
        .next_int(0, wall_size.w.min(params.wall_max_offset.x))
        .field("wall_max_offset")?;
    let wall_vert_offset = -rng
        .next_int(0, wall_size.h.min(params.wall_max_offset.y))
        .field("wall_max_offset")?;

    // Двери: только между внутренними комнатами
    let floor_space = Size::new(size.w + wall_vert_offset, size.h + wall_horiz_offset);
    let need_door_horiz = !door_down_disabled && y > 0 && y < rows - 1;
    let need_door_vert = !door_right_disabled && x > 0 && x < cols - 1;

    let door_horiz_width = if need_door_horiz {
        params
            .door_width
            .randomize_width(rng)
            .field("door_width")?
            .min(floor_space.w - 1)
    } else {
        0
    };
    let door_vert_width = if need_door_vert {
        params
            .door_width
            .randomize_height(rng)
            .field("door_width")?
            .min(floor_space.h - 1)
    } else {
        0
    };
    let door_horiz_offset = if need_door_horiz {
        rng.next_int(1, floor_space.w - door_horiz_width + 1)
            .field("door_width")?
    } else {
        0
    };
    let door_vert_offset = if need_door_vert {
        rng.next_int(1, floor_space.h - door_vert_width + 1)
            .field("door_width")?
    } else {
        0
    };

    // Стиль: на внешнем краю сетки не выходит за границу карты
    let style_index = rng
        .next_int(0, params.style_count as i32)
        .field("style_count")? as usize;
    let style_w = if x == cols - 1 {
        1
    } else {
        params.style_size.randomize_width(rng).field("style_size")?
    };
    let style_h = if y == rows - 1 {
        1
    } else {
        params.style_size.randomize_height(rng).field("style_size")?
    };

    Ok(Room {
        index,
        pos_abs,
        size,
        wall_horiz: Band::new(wall_horiz_offset, wall_size.w),
        wall_vert: Band::new(wall_vert_offset, wall_size.h),
        door_horiz: Band::new(door_horiz_offset, door_horiz_width),
        door_vert: Band::new(door_vert_offset, door_vert_width),
        style_index,
        style_size: Size::new(style_w, style_h),
        disabled,
    })
}
