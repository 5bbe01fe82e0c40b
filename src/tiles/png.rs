// src/tiles/png.rs
//! Превью уровня в PNG
//!
//! Каждый тайл рисуется квадратом `tile_px × tile_px` в цвете своего стиля:
//! пол — `floor_color`, стена — `wall_color`. Двери выделяются отдельным
//! цветом, тайлы без стиля — чёрным, чтобы дыры в разметке были видны сразу.

use crate::error::Result;
use crate::style::RoomStyle;
use crate::tiles::{MapTile, TileGrid, TileType};
use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::path::Path;

/// Размер тайла в превью по умолчанию
pub const DEFAULT_TILE_PX: u32 = 8;

const DOOR_COLOR: Rgba<u8> = Rgba([170, 140, 60, 255]);
const UNCLAIMED_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[must_use]
pub fn render_preview(grid: &TileGrid, styles: &[RoomStyle], tile_px: u32) -> RgbaImage {
    let tile_px = tile_px.max(1);
    let mut img: RgbaImage = ImageBuffer::from_pixel(
        (grid.width as u32 * tile_px).max(1),
        (grid.height as u32 * tile_px).max(1),
        UNCLAIMED_COLOR,
    );

    for (y, row) in grid.rows().enumerate() {
        for (x, tile) in row.iter().enumerate() {
            let rect = Rect::at((x as u32 * tile_px) as i32, (y as u32 * tile_px) as i32)
                .of_size(tile_px, tile_px);
            draw_filled_rect_mut(&mut img, rect, tile_color(tile, styles));
        }
    }
    img
}

fn tile_color(tile: &MapTile, styles: &[RoomStyle]) -> Rgba<u8> {
    if tile.tile_type == TileType::Door {
        return DOOR_COLOR;
    }
    match tile.style().and_then(|s| styles.get(s)) {
        Some(style) if tile.is_wall() => Rgba(style.wall_color.to_rgba8()),
        Some(style) => Rgba(style.floor_color.to_rgba8()),
        None => UNCLAIMED_COLOR,
    }
}

pub fn save_preview(grid: &TileGrid, styles: &[RoomStyle], path: &Path) -> Result<()> {
    render_preview(grid, styles, DEFAULT_TILE_PX).save(path)?;
    Ok(())
}
