// src/style.rs
//! Стили комнат: высота, цвета пола и стен, узоры
//!
//! Таблица стилей строится один раз за прогон, до раскладки комнат,
//! и дальше не меняется.

use crate::config::GenerationParams;
use crate::error::{FieldContext, Result};
use crate::geometry::Color;
use crate::rng::RngService;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomStyle {
    pub height: i32,
    pub floor_color: Color,
    pub wall_color: Color,
    pub pattern_id_floor: i32,
    pub pattern_id_wall: i32,
    pub pattern_color_floor: Color,
    pub pattern_color_wall: Color,
}

/// Разыгрывает `style_count` стилей.
///
/// Высота стиля `i` — `style_height_override[i]`, если переопределения заданы,
/// иначе сам индекс. К базовым оттенкам добавляется надбавка, умноженная на индекс.
pub fn generate_styles(params: &GenerationParams, rng: &mut RngService) -> Result<Vec<RoomStyle>> {
    (0..params.style_count as usize)
        .map(|index| {
            let height = params
                .style_height_override
                .get(index)
                .copied()
                .unwrap_or(index as i32);
            let floor_color = params.floor_tint_base.randomize(rng).field("floor_tint_base")?
                + params.floor_tint_per_height.scale(index as f32);
            let wall_color = params.wall_tint_base.randomize(rng).field("wall_tint_base")?
                + params.wall_tint_per_height.scale(index as f32);
            let pattern_id_floor = rng
                .next_int(1, params.pattern_resource_count)
                .field("pattern_resource_count")?;
            let pattern_id_wall = rng
                .next_int(1, params.pattern_resource_count)
                .field("pattern_resource_count")?;
            let pattern_color_floor = params
                .pattern_tint_floor
                .randomize(rng)
                .field("pattern_tint_floor")?;
            let pattern_color_wall = params
                .pattern_tint_wall
                .randomize(rng)
                .field("pattern_tint_wall")?;

            Ok(RoomStyle {
                height,
                floor_color,
                wall_color,
                pattern_id_floor,
                pattern_id_wall,
                pattern_color_floor,
                pattern_color_wall,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MinMax;

    #[test]
    fn heights_default_to_index() {
        let params = GenerationParams {
            style_count: 4,
            ..Default::default()
        };
        let styles = generate_styles(&params, &mut RngService::new(3, true)).unwrap();
        let heights: Vec<i32> = styles.iter().map(|s| s.height).collect();
        assert_eq!(heights, vec![0, 1, 2, 3]);
    }

    #[test]
    fn height_overrides_are_applied() {
        let params = GenerationParams {
            style_count: 3,
            style_height_override: vec![5, 0, 2],
            ..Default::default()
        };
        let styles = generate_styles(&params, &mut RngService::new(3, true)).unwrap();
        let heights: Vec<i32> = styles.iter().map(|s| s.height).collect();
        assert_eq!(heights, vec![5, 0, 2]);
    }

    #[test]
    fn tint_grows_with_style_index() {
        let params = GenerationParams {
            style_count: 3,
            floor_tint_base: MinMax::inclusive(Color::new(50, 50, 50, 255), Color::new(50, 50, 50, 255)),
            floor_tint_per_height: Color::new(10, 20, 0, 0),
            ..Default::default()
        };
        let styles = generate_styles(&params, &mut RngService::midpoint()).unwrap();
        assert_eq!(styles[0].floor_color, Color::new(50, 50, 50, 255));
        assert_eq!(styles[2].floor_color, Color::new(70, 90, 50, 255));
    }

    #[test]
    fn pattern_ids_skip_zero() {
        let params = GenerationParams::default();
        let styles = generate_styles(&params, &mut RngService::new(11, true)).unwrap();
        for style in &styles {
            assert!((1..params.pattern_resource_count).contains(&style.pattern_id_floor));
            assert!((1..params.pattern_resource_count).contains(&style.pattern_id_wall));
        }
    }
}
