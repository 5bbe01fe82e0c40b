// src/zones.rs
//! Игровые зоны: точки появления команд и места закладки бомбы
//!
//! Зоны привязаны к фиксированным комнатам сетки:
//! - спавн T (resistance) — `[rows/2 − 1][0]`
//! - спавн CT (metropolis) — `[rows/2 − 1][cols − 2]`
//! - точка A — `[0][cols − 3]`
//! - точка B — `[rows − 2][cols − 3]`
//!
//! Каждый спавн порождает ещё и зону закупки той же площади.
//! Центр и размер зоны — в тайлах рабочей (необрезанной) сетки.

use crate::geometry::{Point, Size};
use crate::layout::{Room, RoomLayout};
use log::warn;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Resistance,
    Metropolis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BombSite {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    BombSite(BombSite),
    TeamSpawn(Faction),
    BuyZone(Faction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Zone {
    pub kind: ZoneKind,
    pub center: Point,
    pub size: Size,
}

impl Zone {
    fn over(kind: ZoneKind, room: &Room) -> Self {
        Self {
            kind,
            center: room.center(),
            size: room.size,
        }
    }
}

/// Размещает зоны в порядке: A, B, спавн T, спавн CT.
/// На сетке уже трёх столбцов зон нет.
#[must_use]
pub fn place_zones(layout: &RoomLayout) -> Vec<Zone> {
    let (cols, rows) = (layout.cols(), layout.rows());
    if cols < 3 || rows < 2 {
        warn!("Сетка {cols}×{rows} слишком мала для игровых зон, зоны не размещены");
        return Vec::new();
    }

    let spawn_row = rows / 2 - 1;
    let site_a = layout.room(cols - 3, 0);
    let site_b = layout.room(cols - 3, rows - 2);
    let spawn_t = layout.room(0, spawn_row);
    let spawn_ct = layout.room(cols - 2, spawn_row);

    vec![
        Zone::over(ZoneKind::BombSite(BombSite::A), site_a),
        Zone::over(ZoneKind::BombSite(BombSite::B), site_b),
        Zone::over(ZoneKind::TeamSpawn(Faction::Resistance), spawn_t),
        Zone::over(ZoneKind::BuyZone(Faction::Resistance), spawn_t),
        Zone::over(ZoneKind::TeamSpawn(Faction::Metropolis), spawn_ct),
        Zone::over(ZoneKind::BuyZone(Faction::Metropolis), spawn_ct),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationParams;
    use crate::layout::plan_rooms;
    use crate::rng::RngService;

    fn layout(cols: i32, rows: i32) -> RoomLayout {
        let params = GenerationParams {
            rooms_count: Point::new(cols, rows),
            ..Default::default()
        };
        plan_rooms(&params, &mut RngService::new(6, true)).unwrap()
    }

    #[test]
    fn zones_sit_in_designated_rooms() {
        let layout = layout(6, 5);
        let zones = place_zones(&layout);
        assert_eq!(zones.len(), 6);

        let spawn_t = layout.room(0, 1);
        assert_eq!(zones[2].kind, ZoneKind::TeamSpawn(Faction::Resistance));
        assert_eq!(zones[2].center, spawn_t.center());
        assert_eq!(zones[2].size, spawn_t.size);
        assert_eq!(zones[3].kind, ZoneKind::BuyZone(Faction::Resistance));
        assert_eq!(zones[3].center, zones[2].center);

        assert_eq!(zones[0].center, layout.room(3, 0).center());
        assert_eq!(zones[1].center, layout.room(3, 3).center());
        assert_eq!(zones[4].center, layout.room(4, 1).center());
    }

    #[test]
    fn narrow_grid_has_no_zones() {
        assert!(place_zones(&layout(2, 4)).is_empty());
    }

    #[test]
    fn two_rows_put_spawns_on_first_row() {
        let layout = layout(3, 2);
        let zones = place_zones(&layout);
        assert_eq!(zones[2].center, layout.room(0, 0).center());
        assert_eq!(zones[4].center, layout.room(1, 0).center());
        assert_eq!(zones[1].center, layout.room(0, 0).center());
    }
}
