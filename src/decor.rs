// src/decor.rs
//! Декор уровня: виды ящиков, ящики в комнатах и световые эффекты
//!
//! Все функции только строят описания; превращение их в узлы сцены
//! выполняется снаружи. Позиции ящиков и эффектов — в пикселях видимой
//! (обрезанной) карты.

use crate::config::DecorSettings;
use crate::error::{FieldContext, Result};
use crate::geometry::{CRATE_SIZE, Color, Point, TILE_SIZE};
use crate::layout::{Room, RoomLayout};
use crate::rng::RngService;
use crate::tiles::TileGrid;
use log::debug;
use serde::Serialize;

/// Сколько раз ищем для эффекта тайл без стены
pub const MAX_EFFECT_ATTEMPTS: usize = 20;

/// Частиц в облаке пикселей эффекта
pub const EFFECT_PARTICLES: u32 = 100;

/// Прозрачность точечного света эффекта
const LIGHT_ALPHA: i32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CratePhysics {
    pub density: f32,
    pub friction: f32,
    pub bounciness: f32,
    pub penetrability: f32,
    pub angular_damping: f32,
}

/// Вид ящика: для каждого стиля свой набор
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrateKind {
    pub style_index: usize,
    pub crate_index: u32,
    /// Непроходимый ящик: не простреливается и не просматривается
    pub blocking: bool,
    pub size_multiplier: f32,
    /// Размер в пикселях
    pub size: [f32; 2],
    pub color: Color,
    pub physics: CratePhysics,
}

impl CrateKind {
    #[must_use]
    pub fn resource_name(&self) -> String {
        crate_resource_name(self.style_index, self.crate_index, self.blocking)
    }
}

/// Имя ресурса ящика: `style{s}_crate{c}_blocking` / `..._nonblocking`
#[must_use]
pub fn crate_resource_name(style_index: usize, crate_index: u32, blocking: bool) -> String {
    let prefix = if blocking { "" } else { "non" };
    format!("style{style_index}_crate{crate_index}_{prefix}blocking")
}

/// Разыгрывает виды ящиков: для каждого стиля сначала непроходимые, затем проходимые
pub fn generate_crate_kinds(
    style_count: usize,
    decor: &DecorSettings,
    rng: &mut RngService,
) -> Result<Vec<CrateKind>> {
    let mut kinds = Vec::new();
    for style_index in 0..style_count {
        for crate_index in 0..decor.crates_blocking_per_style {
            kinds.push(crate_kind(style_index, crate_index, true, decor, rng)?);
        }
        for crate_index in 0..decor.crates_non_blocking_per_style {
            kinds.push(crate_kind(style_index, crate_index, false, decor, rng)?);
        }
    }
    Ok(kinds)
}

fn crate_kind(
    style_index: usize,
    crate_index: u32,
    blocking: bool,
    decor: &DecorSettings,
    rng: &mut RngService,
) -> Result<CrateKind> {
    let size_multiplier = decor
        .crate_size_multiplier
        .randomize(rng)
        .field("decor.crate_size_multiplier")?;
    let color = if blocking {
        decor
            .crate_blocking_tint
            .randomize(rng)
            .field("decor.crate_blocking_tint")?
    } else {
        decor
            .crate_non_blocking_tint
            .randomize(rng)
            .field("decor.crate_non_blocking_tint")?
    };
    let physics = CratePhysics {
        density: rng.next_float(0.6, 1.3)?,
        friction: rng.next_float(0.0, 0.5)?,
        bounciness: rng.next_float(0.1, 0.6)?,
        penetrability: rng.next_float(0.0, 1.0)?,
        angular_damping: rng.next_float(10.0, 100.0)?,
    };
    Ok(CrateKind {
        style_index,
        crate_index,
        blocking,
        size_multiplier,
        size: [
            CRATE_SIZE.w as f32 * size_multiplier,
            CRATE_SIZE.h as f32 * size_multiplier,
        ],
        color,
        physics,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomLight {
    pub color: Color,
    pub vibration: f32,
    pub radius: f32,
    pub strength: i32,
}

/// Эффект комнаты: круг шума и облако пикселей в одной точке, иногда со светом
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomEffect {
    pub room: Point,
    pub pos: [f32; 2],
    pub size: [f32; 2],
    pub rotation: f32,
    pub color: Color,
    pub particles: u32,
    pub light: Option<RoomLight>,
}

/// Ставит по одному эффекту в каждую включённую комнату, кроме первой строки и столбца.
///
/// `origin` — левый верхний угол видимой карты в рабочей сетке.
/// Свет добавляется только если нашёлся тайл без стены.
pub fn place_room_effects(
    layout: &RoomLayout,
    grid: &TileGrid,
    origin: Point,
    decor: &DecorSettings,
    rng: &mut RngService,
) -> Result<Vec<RoomEffect>> {
    let mut effects = Vec::new();
    for room in layout.iter().filter(|r| decorated(r)) {
        let mut tile = room.pos_abs - origin;
        let mut found = false;
        for _ in 0..MAX_EFFECT_ATTEMPTS {
            tile = Point::new(
                room.pos_abs.x + rng.next_int(0, room.size.w)? - origin.x,
                room.pos_abs.y + rng.next_int(0, room.size.h)? - origin.y,
            );
            if grid.at(tile.x, tile.y).is_some_and(|t| !t.is_wall()) {
                found = true;
                break;
            }
        }

        let color = decor
            .room_light_tint
            .randomize(rng)
            .field("decor.room_light_tint")?;
        let size_multiplier = decor
            .room_effect_size_multiplier
            .randomize(rng)
            .field("decor.room_effect_size_multiplier")?;
        let rotation = rng.next_int(1, 359)? as f32;
        let light = if found {
            Some(RoomLight {
                color: color.with_alpha(LIGHT_ALPHA),
                vibration: decor
                    .room_light_vibration
                    .randomize(rng)
                    .field("decor.room_light_vibration")?,
                radius: decor
                    .room_light_radius
                    .randomize(rng)
                    .field("decor.room_light_radius")?,
                strength: rng.next_int(10, 20)?,
            })
        } else {
            debug!(
                "Комната ({}, {}): место для света не найдено",
                room.index.x, room.index.y
            );
            None
        };

        effects.push(RoomEffect {
            room: room.index,
            pos: (tile * TILE_SIZE.to_point()).to_pixels(),
            size: [
                (room.size.w * TILE_SIZE.w) as f32 * size_multiplier,
                (room.size.h * TILE_SIZE.h) as f32 * size_multiplier,
            ],
            rotation,
            color,
            particles: EFFECT_PARTICLES,
            light,
        });
    }
    Ok(effects)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CratePlacement {
    pub room: Point,
    pub style_index: usize,
    pub crate_index: u32,
    pub blocking: bool,
    pub rotation: f32,
    pub pos: [f32; 2],
}

impl CratePlacement {
    #[must_use]
    pub fn resource_name(&self) -> String {
        crate_resource_name(self.style_index, self.crate_index, self.blocking)
    }
}

/// Раскидывает ящики по свободному полу комнат.
///
/// Свободное место — пол комнаты без её собственных смещений стен и без стен
/// левого и верхнего соседа, заходящих внутрь. Каждый ящик уменьшает место
/// на 1 по обеим осям, пока оно не меньше разыгранного минимума.
pub fn place_crates(
    layout: &RoomLayout,
    origin: Point,
    decor: &DecorSettings,
    rng: &mut RngService,
) -> Result<Vec<CratePlacement>> {
    let half_tile = TILE_SIZE.w / 2;
    let mut placements = Vec::new();

    for room in layout.iter().filter(|r| decorated(r)) {
        let (x, y) = (room.index.x as usize, room.index.y as usize);
        let left = layout.room(x - 1, y);
        let up = layout.room(x, y - 1);
        let left_offset = left.wall_vert.offset + left.wall_vert.width;
        let up_offset = up.wall_horiz.offset + up.wall_horiz.width;
        let start_space = Point::new(
            room.size.w + room.wall_vert.offset - left_offset,
            room.size.h + room.wall_horiz.offset - up_offset,
        );
        let min_space = decor
            .crates_space_left
            .randomize(rng)
            .field("decor.crates_space_left")?;

        let mut space = start_space;
        let first = placements.len();
        while space.x >= min_space.w && space.y >= min_space.h {
            let blocking = rng.next_int(0, 100)? < decor.crate_blocking_chance;
            space = space + Point::new(-1, -1);
            let kinds = if blocking {
                decor.crates_blocking_per_style
            } else {
                decor.crates_non_blocking_per_style
            };
            let crate_index = rng.next_int(0, kinds as i32).field(if blocking {
                "decor.crates_blocking_per_style"
            } else {
                "decor.crates_non_blocking_per_style"
            })? as u32;
            let rotation = rng.next_int(1, 359)? as f32;
            let px = (left_offset - origin.x + room.pos_abs.x + rng.next_int(0, start_space.x)?)
                * TILE_SIZE.w
                + rng.next_int(-half_tile, half_tile)?;
            let py = (up_offset - origin.y + room.pos_abs.y + rng.next_int(0, start_space.y)?)
                * TILE_SIZE.h
                + rng.next_int(-half_tile, half_tile)?;

            placements.push(CratePlacement {
                room: room.index,
                style_index: room.style_index,
                crate_index,
                blocking,
                rotation,
                pos: Point::new(px, py).to_pixels(),
            });
        }
        debug!(
            "Комната ({x}, {y}): {} ящиков",
            placements.len() - first
        );
    }
    Ok(placements)
}

/// Декор ставится только во включённые комнаты вне первой строки и столбца
fn decorated(room: &Room) -> bool {
    !room.disabled && room.index.x > 0 && room.index.y > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationParams;
    use crate::layout::plan_rooms;
    use crate::style::generate_styles;
    use crate::tiles::raster::{crop_origin, crop_to_rooms, rasterize};

    fn scene(params: &GenerationParams) -> (RoomLayout, TileGrid, Point, RngService) {
        let mut rng = RngService::new(params.seed, params.random_enabled);
        let styles = generate_styles(params, &mut rng).unwrap();
        let layout = plan_rooms(params, &mut rng).unwrap();
        let grid = crop_to_rooms(&rasterize(&layout, &styles, params), &layout);
        let origin = crop_origin(&layout);
        (layout, grid, origin, rng)
    }

    #[test]
    fn crate_kinds_follow_style_order() {
        let decor = DecorSettings {
            crates_blocking_per_style: 2,
            crates_non_blocking_per_style: 1,
            ..Default::default()
        };
        let kinds = generate_crate_kinds(3, &decor, &mut RngService::new(8, true)).unwrap();
        assert_eq!(kinds.len(), 9);
        let order: Vec<(usize, u32, bool)> = kinds
            .iter()
            .map(|k| (k.style_index, k.crate_index, k.blocking))
            .take(4)
            .collect();
        assert_eq!(order, vec![(0, 0, true), (0, 1, true), (0, 0, false), (1, 0, true)]);
        assert_eq!(kinds[2].resource_name(), "style0_crate0_nonblocking");
        assert_eq!(kinds[3].resource_name(), "style1_crate0_blocking");
    }

    #[test]
    fn crate_physics_stay_in_ranges() {
        let kinds = generate_crate_kinds(4, &DecorSettings::default(), &mut RngService::new(2, true))
            .unwrap();
        for kind in &kinds {
            let p = kind.physics;
            assert!((0.6..1.3).contains(&p.density));
            assert!((0.0..0.5).contains(&p.friction));
            assert!((0.1..0.6).contains(&p.bounciness));
            assert!((0.0..1.0).contains(&p.penetrability));
            assert!((10.0..100.0).contains(&p.angular_damping));
            assert!((kind.size[0] - 104.0 * kind.size_multiplier).abs() < 1e-3);
        }
    }

    #[test]
    fn effects_skip_edge_and_disabled_rooms() {
        let params = GenerationParams {
            seed: 12,
            rooms_disabled: vec![Point::new(2, 2)],
            ..Default::default()
        };
        let (layout, grid, origin, mut rng) = scene(&params);
        let effects = place_room_effects(&layout, &grid, origin, &params.decor, &mut rng).unwrap();
        // 6×5 комнат без первой строки и столбца и без одной отключённой
        assert_eq!(effects.len(), 5 * 4 - 1);
        assert!(effects.iter().all(|e| e.room.x > 0 && e.room.y > 0));
        assert!(!effects.iter().any(|e| e.room == Point::new(2, 2)));
    }

    #[test]
    fn lit_effects_stand_on_open_floor() {
        let params = GenerationParams {
            seed: 31,
            ..Default::default()
        };
        let (layout, grid, origin, mut rng) = scene(&params);
        let effects = place_room_effects(&layout, &grid, origin, &params.decor, &mut rng).unwrap();
        for effect in effects.iter().filter(|e| e.light.is_some()) {
            let tile_x = effect.pos[0] as i32 / TILE_SIZE.w;
            let tile_y = effect.pos[1] as i32 / TILE_SIZE.h;
            let tile = grid.at(tile_x, tile_y).unwrap();
            assert!(!tile.is_wall());
            let light = effect.light.as_ref().unwrap();
            assert_eq!(light.color.a, 15);
            assert!((10..20).contains(&light.strength));
            assert!((1.0..359.0).contains(&effect.rotation));
        }
    }

    #[test]
    fn blocking_chance_decides_crate_kind() {
        let mut params = GenerationParams {
            seed: 4,
            ..Default::default()
        };
        params.decor.crate_blocking_chance = 100;
        let (layout, _, origin, mut rng) = scene(&params);
        let crates = place_crates(&layout, origin, &params.decor, &mut rng).unwrap();
        assert!(!crates.is_empty());
        assert!(crates.iter().all(|c| c.blocking));

        params.decor.crate_blocking_chance = 0;
        let (layout, _, origin, mut rng) = scene(&params);
        let crates = place_crates(&layout, origin, &params.decor, &mut rng).unwrap();
        assert!(crates.iter().all(|c| !c.blocking));
    }

    #[test]
    fn crates_land_near_their_room() {
        let params = GenerationParams {
            seed: 77,
            ..Default::default()
        };
        let (layout, _, origin, mut rng) = scene(&params);
        let crates = place_crates(&layout, origin, &params.decor, &mut rng).unwrap();
        let tile = TILE_SIZE.w as f32;
        for c in &crates {
            let room = layout.room(c.room.x as usize, c.room.y as usize);
            assert_eq!(c.style_index, room.style_index);
            let left = ((room.pos_abs.x - origin.x) as f32 - 0.5) * tile;
            let right = ((room.pos_abs.x - origin.x + room.size.w) as f32 + 0.5) * tile;
            assert!(c.pos[0] >= left && c.pos[0] < right, "{c:?}");
            let top = ((room.pos_abs.y - origin.y) as f32 - 0.5) * tile;
            let bottom = ((room.pos_abs.y - origin.y + room.size.h) as f32 + 0.5) * tile;
            assert!(c.pos[1] >= top && c.pos[1] < bottom, "{c:?}");
        }
    }

    #[test]
    fn crate_count_follows_free_space() {
        let mut params = GenerationParams {
            random_enabled: false,
            ..Default::default()
        };
        params.decor.crates_space_left = crate::geometry::MinMax::inclusive(
            crate::geometry::Size::new(3, 3),
            crate::geometry::Size::new(3, 3),
        );
        let (layout, _, origin, mut rng) = scene(&params);
        let crates = place_crates(&layout, origin, &params.decor, &mut rng).unwrap();
        let room = layout.room(1, 1);
        let left = layout.room(0, 1);
        let up = layout.room(1, 0);
        let space_x = room.size.w + room.wall_vert.offset - (left.wall_vert.offset + left.wall_vert.width);
        let space_y = room.size.h + room.wall_horiz.offset - (up.wall_horiz.offset + up.wall_horiz.width);
        let expected = (space_x.min(space_y) - 3 + 1).max(0) as usize;
        let in_room = crates.iter().filter(|c| c.room == Point::new(1, 1)).count();
        assert_eq!(in_room, expected);
    }
}
