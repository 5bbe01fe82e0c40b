// src/generator.rs
//! Полный прогон генерации уровня
//!
//! Этапы идут строго по порядку и тянут случайные числа из одного генератора:
//! диагональные размеры → стили → комнаты → растеризация, обрезка, угол,
//! исправление диагоналей → виды ящиков → тени → эффекты → ящики → зоны.

use crate::config::GenerationParams;
use crate::decor::{
    CrateKind, CratePlacement, RoomEffect, generate_crate_kinds, place_crates, place_room_effects,
};
use crate::error::Result;
use crate::geometry::Point;
use crate::layout::{RoomLayout, draw_diagonal_sizes, place_rooms};
use crate::rng::RngService;
use crate::shadow::{TileDecals, derive_decals};
use crate::style::{RoomStyle, generate_styles};
use crate::tiles::TileGrid;
use crate::tiles::raster::{crop_origin, crop_to_rooms, fix_far_corner, rasterize};
use crate::tiles::repair::repair_diagonal_touches;
use crate::zones::{Zone, place_zones};
use log::info;
use serde::Serialize;

/// Результат одного прогона
#[derive(Debug, Clone, Serialize)]
pub struct Level {
    pub map_name: String,
    pub seed: u64,
    pub layout: RoomLayout,
    pub styles: Vec<RoomStyle>,
    /// Видимая карта (обрезанная, если включена обрезка)
    pub grid: TileGrid,
    /// Левый верхний угол видимой карты в рабочей сетке
    pub origin: Point,
    pub decals: Vec<TileDecals>,
    pub crate_kinds: Vec<CrateKind>,
    pub crates: Vec<CratePlacement>,
    pub effects: Vec<RoomEffect>,
    pub zones: Vec<Zone>,
}

impl Level {
    /// Общее число наложений декалей теней и контуров
    #[must_use]
    pub fn decal_count(&self) -> u32 {
        self.decals
            .iter()
            .flat_map(|t| t.decals.iter())
            .map(|d| d.count)
            .sum()
    }
}

/// Генерирует уровень по параметрам.
///
/// # Ошибки
/// Любое нарушенное предусловие конфигурации; частичного результата нет.
pub fn generate_level(params: &GenerationParams) -> Result<Level> {
    params.validate()?;
    let mut rng = RngService::new(params.seed, params.random_enabled);
    info!(
        "Генерация '{}': сид {}, комнат {}×{}",
        params.map_name,
        params.seed,
        params.cols(),
        params.rows()
    );

    let diagonal_sizes = draw_diagonal_sizes(params, &mut rng)?;
    let styles = generate_styles(params, &mut rng)?;
    let layout = place_rooms(params, diagonal_sizes, &mut rng)?;
    info!("Раскладка готова: {} стилей", styles.len());

    let full = rasterize(&layout, &styles, params);
    let (mut grid, origin) = if params.crop_map {
        (crop_to_rooms(&full, &layout), crop_origin(&layout))
    } else {
        (full, Point::default())
    };
    fix_far_corner(&mut grid);
    let flattened = repair_diagonal_touches(&mut grid, params.wall_height);
    info!(
        "Сетка {}×{}, выровнено диагональных блоков: {flattened}",
        grid.width, grid.height
    );

    let crate_kinds = generate_crate_kinds(styles.len(), &params.decor, &mut rng)?;

    let decals = derive_decals(&grid);
    info!("Тени рассчитаны для {} тайлов", decals.len());

    let effects = place_room_effects(&layout, &grid, origin, &params.decor, &mut rng)?;
    let crates = place_crates(&layout, origin, &params.decor, &mut rng)?;
    info!(
        "Декор: {} видов ящиков, {} ящиков, {} эффектов",
        crate_kinds.len(),
        crates.len(),
        effects.len()
    );

    let zones = place_zones(&layout);

    Ok(Level {
        map_name: params.map_name.clone(),
        seed: params.seed,
        layout,
        styles,
        grid,
        origin,
        decals,
        crate_kinds,
        crates,
        effects,
        zones,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenError;

    #[test]
    fn invalid_params_produce_no_level() {
        let params = GenerationParams {
            style_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            generate_level(&params),
            Err(GenError::Config {
                field: "style_count",
                ..
            })
        ));
    }

    #[test]
    fn uncropped_level_keeps_work_grid() {
        let params = GenerationParams {
            seed: 3,
            crop_map: false,
            ..Default::default()
        };
        let level = generate_level(&params).unwrap();
        assert_eq!(level.origin, Point::default());
        assert!(level.grid.width as i32 > level.layout.total_width());
        assert_eq!(level.decals.len(), level.grid.width * level.grid.height);
    }

    #[test]
    fn cropped_level_matches_room_extent() {
        let params = GenerationParams {
            seed: 3,
            ..Default::default()
        };
        let level = generate_level(&params).unwrap();
        let d0 = level.layout.diagonal_sizes[0];
        assert_eq!(level.origin, d0.to_point());
        assert_eq!(level.grid.width as i32, level.layout.total_width() - d0.w + 1);
        assert_eq!(level.grid.height as i32, level.layout.total_height() - d0.h + 1);
        assert!(level.decal_count() > 0);
    }
}
