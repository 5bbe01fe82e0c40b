// src/tiles/dump.rs
//! Текстовый дамп сетки для диагностики
//!
//! Четыре сетки подряд, разделённые пустой строкой: `Carcass:`, `Walls:`,
//! `Heights:`, `Styles:`. Глифы совместимы с существующими инструментами:
//! `#` — стена, `.` — дверь, `_` — пол; в каркасе строка и столбец 0 всегда `#`,
//! залитые стеной тайлы вне каркаса — `X`.

use crate::tiles::{MapTile, TileGrid, TileType};
use std::fmt::Write as _;

/// Значение для тайла, не накрытого ни одним стилем
const UNCLAIMED: &str = "-";

#[must_use]
pub fn render_text_dump(grid: &TileGrid) -> String {
    let sections: [(&str, fn(&MapTile, usize, usize) -> String); 4] = [
        ("Carcass:", |t, x, y| carcass_glyph(t, x, y).to_string()),
        ("Walls:", |t, _, _| wall_glyph(t).to_string()),
        ("Heights:", |t, _, _| {
            t.height().map_or_else(|| UNCLAIMED.to_string(), |h| h.to_string())
        }),
        ("Styles:", |t, _, _| {
            t.style().map_or_else(|| UNCLAIMED.to_string(), |s| s.to_string())
        }),
    ];

    sections
        .iter()
        .map(|(title, glyph)| {
            let mut section = (*title).to_string();
            for (y, row) in grid.rows().enumerate() {
                section.push('\n');
                for (x, tile) in row.iter().enumerate() {
                    let _ = write!(section, "{}", glyph(tile, x, y));
                }
            }
            section
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[must_use]
pub fn wall_glyph(tile: &MapTile) -> char {
    match tile.tile_type {
        TileType::Wall => '#',
        TileType::Door => '.',
        TileType::Floor => '_',
    }
}

fn carcass_glyph(tile: &MapTile, x: usize, y: usize) -> char {
    if tile.disabled && !tile.carcass {
        'X'
    } else if tile.carcass || x == 0 || y == 0 {
        '#'
    } else {
        '_'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::TileClaim;

    #[test]
    fn dump_has_four_sections_in_order() {
        let mut grid = TileGrid::new(3, 2);
        {
            let wall = grid.get_mut(1, 1);
            wall.tile_type = TileType::Wall;
            wall.disabled = true;
            wall.claim = TileClaim::Claimed { style: 2, height: 5 };
        }
        grid.get_mut(2, 1).tile_type = TileType::Door;
        grid.get_mut(2, 1).carcass = true;

        let text = render_text_dump(&grid);
        assert_eq!(
            text,
            "Carcass:\n###\n#X#\n\n\
             Walls:\n___\n_#.\n\n\
             Heights:\n---\n-5-\n\n\
             Styles:\n---\n-2-"
        );
    }
}
