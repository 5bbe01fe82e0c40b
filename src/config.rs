// src/config.rs
//! Конфигурация генерации уровня
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Размер сетки комнат и диапазоны размеров комнат, стен и дверей
//! - Количество стилей, их высоты и оттенки
//! - Политику наложения стилей на общих границах комнат
//! - Настройки декора (ящики, световые эффекты)
//!
//! Все структуры поддерживают сериализацию в TOML/JSON. Диапазоны записываются
//! с включительным максимумом: `room_size = { min = [8, 8], max = [12, 12] }`.
//!
//! Перед генерацией параметры проверяются [`GenerationParams::validate`]:
//! любая ошибка — фатальная и называет проблемное поле.

use crate::error::{GenError, Result};
use crate::geometry::{Color, MinMax, Point, Size};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Кто владеет тайлом на общей границе, если его накрывают стилевые
/// отпечатки нескольких комнат.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StyleOverlap {
    /// Первая комната, накрывшая тайл, остаётся его владельцем
    #[default]
    FirstWriter,
    /// Каждая следующая комната перезаписывает стиль тайла
    LastWriter,
}

/// Настройки декора: ящики и световые эффекты комнат
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecorSettings {
    /// Шанс (в процентах) того, что очередной ящик будет непроходимым
    #[serde(default = "default_crate_blocking_chance")]
    pub crate_blocking_chance: i32,

    /// Минимальное свободное место в комнате, при котором ещё ставятся ящики
    #[serde(default = "default_crates_space_left")]
    pub crates_space_left: MinMax<Size>,

    #[serde(default = "default_crate_blocking_tint")]
    pub crate_blocking_tint: MinMax<Color>,

    #[serde(default = "default_crate_non_blocking_tint")]
    pub crate_non_blocking_tint: MinMax<Color>,

    /// Множитель размера ящика относительно базовых 104 px
    #[serde(default = "default_crate_size_multiplier")]
    pub crate_size_multiplier: MinMax<f32>,

    /// Видов непроходимых ящиков на стиль
    #[serde(default = "default_crates_per_style")]
    pub crates_blocking_per_style: u32,

    /// Видов проходимых ящиков на стиль
    #[serde(default = "default_crates_per_style")]
    pub crates_non_blocking_per_style: u32,

    #[serde(default = "default_room_light_tint")]
    pub room_light_tint: MinMax<Color>,

    #[serde(default = "default_room_light_radius")]
    pub room_light_radius: MinMax<f32>,

    #[serde(default = "default_room_light_vibration")]
    pub room_light_vibration: MinMax<f32>,

    /// Размер эффекта относительно размера комнаты
    #[serde(default = "default_room_effect_size_multiplier")]
    pub room_effect_size_multiplier: MinMax<f32>,
}

fn default_crate_blocking_chance() -> i32 {
    50
}
fn default_crates_space_left() -> MinMax<Size> {
    MinMax::inclusive(Size::new(3, 3), Size::new(5, 5))
}
fn default_crate_blocking_tint() -> MinMax<Color> {
    MinMax::inclusive(Color::new(90, 70, 50, 255), Color::new(140, 110, 80, 255))
}
fn default_crate_non_blocking_tint() -> MinMax<Color> {
    MinMax::inclusive(Color::new(60, 90, 60, 255), Color::new(100, 140, 100, 255))
}
fn default_crate_size_multiplier() -> MinMax<f32> {
    MinMax::inclusive(0.6, 1.2)
}
fn default_crates_per_style() -> u32 {
    2
}
fn default_room_light_tint() -> MinMax<Color> {
    MinMax::inclusive(Color::new(100, 100, 100, 40), Color::new(255, 255, 255, 80))
}
fn default_room_light_radius() -> MinMax<f32> {
    MinMax::inclusive(300.0, 700.0)
}
fn default_room_light_vibration() -> MinMax<f32> {
    MinMax::inclusive(0.0, 2.0)
}
fn default_room_effect_size_multiplier() -> MinMax<f32> {
    MinMax::inclusive(0.5, 1.0)
}

impl Default for DecorSettings {
    fn default() -> Self {
        Self {
            crate_blocking_chance: default_crate_blocking_chance(),
            crates_space_left: default_crates_space_left(),
            crate_blocking_tint: default_crate_blocking_tint(),
            crate_non_blocking_tint: default_crate_non_blocking_tint(),
            crate_size_multiplier: default_crate_size_multiplier(),
            crates_blocking_per_style: default_crates_per_style(),
            crates_non_blocking_per_style: default_crates_per_style(),
            room_light_tint: default_room_light_tint(),
            room_light_radius: default_room_light_radius(),
            room_light_vibration: default_room_light_vibration(),
            room_effect_size_multiplier: default_room_effect_size_multiplier(),
        }
    }
}

/// Основные параметры генерации уровня
///
/// Полная конфигурация одного прогона. Поддерживает загрузку из TOML и JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Сид генератора случайных чисел (детерминированная генерация)
    pub seed: u64,

    /// `false` — все розыгрыши возвращают середину диапазона
    #[serde(default = "default_true")]
    pub random_enabled: bool,

    /// Имя карты, используется для имён выходных файлов
    #[serde(default = "default_map_name")]
    pub map_name: String,

    /// Обрезать рабочую сетку до занятого прямоугольника
    #[serde(default = "default_true")]
    pub crop_map: bool,

    /// Число комнат: `x` — столбцы, `y` — строки
    #[serde(default = "default_rooms_count")]
    pub rooms_count: Point,

    #[serde(default = "default_room_size")]
    pub room_size: MinMax<Size>,

    /// Толщина стен: `w` — южная (горизонтальная) стена, `h` — восточная
    #[serde(default = "default_wall_size")]
    pub wall_size: MinMax<Size>,

    /// Верхняя граница (исключительная) смещения стены внутрь комнаты:
    /// `x` — для южной стены, `y` — для восточной
    #[serde(default = "default_wall_max_offset")]
    pub wall_max_offset: Point,

    /// Ширина двери: `w` — в южной стене, `h` — в восточной
    #[serde(default = "default_door_width")]
    pub door_width: MinMax<Size>,

    #[serde(default = "default_style_count")]
    pub style_count: u32,

    /// Явные высоты стилей; если пусто — высота стиля равна его индексу
    #[serde(default)]
    pub style_height_override: Vec<i32>,

    /// Насколько стиль комнаты "затекает" за её пол на общие границы
    #[serde(default = "default_style_size")]
    pub style_size: MinMax<Size>,

    #[serde(default)]
    pub style_overlap: StyleOverlap,

    /// Надбавка высоты для тайлов стен
    #[serde(default = "default_wall_height")]
    pub wall_height: i32,

    #[serde(default = "default_floor_tint_base")]
    pub floor_tint_base: MinMax<Color>,

    #[serde(default = "default_wall_tint_base")]
    pub wall_tint_base: MinMax<Color>,

    /// Надбавка к оттенку пола за каждый индекс стиля
    #[serde(default = "default_tint_per_height")]
    pub floor_tint_per_height: Color,

    #[serde(default = "default_tint_per_height")]
    pub wall_tint_per_height: Color,

    /// Количество текстур узоров; идентификаторы разыгрываются в `[1, count)`
    #[serde(default = "default_pattern_resource_count")]
    pub pattern_resource_count: i32,

    #[serde(default = "default_pattern_tint")]
    pub pattern_tint_floor: MinMax<Color>,

    #[serde(default = "default_pattern_tint")]
    pub pattern_tint_wall: MinMax<Color>,

    /// Комнаты, целиком залитые стеной
    #[serde(default)]
    pub rooms_disabled: Vec<Point>,

    /// Комнаты без двери в южной стене
    #[serde(default)]
    pub rooms_door_down_disabled: Vec<Point>,

    /// Комнаты без двери в восточной стене
    #[serde(default)]
    pub rooms_door_right_disabled: Vec<Point>,

    #[serde(default)]
    pub decor: DecorSettings,
}

fn default_true() -> bool {
    true
}
fn default_map_name() -> String {
    "generated".to_string()
}
fn default_rooms_count() -> Point {
    Point::new(6, 5)
}
fn default_room_size() -> MinMax<Size> {
    MinMax::inclusive(Size::new(8, 8), Size::new(12, 12))
}
fn default_wall_size() -> MinMax<Size> {
    MinMax::inclusive(Size::new(1, 1), Size::new(3, 3))
}
fn default_wall_max_offset() -> Point {
    Point::new(2, 2)
}
fn default_door_width() -> MinMax<Size> {
    MinMax::inclusive(Size::new(2, 2), Size::new(4, 4))
}
fn default_style_count() -> u32 {
    3
}
fn default_style_size() -> MinMax<Size> {
    MinMax::inclusive(Size::new(1, 1), Size::new(3, 3))
}
fn default_wall_height() -> i32 {
    4
}
fn default_floor_tint_base() -> MinMax<Color> {
    MinMax::inclusive(Color::new(70, 70, 70, 255), Color::new(110, 110, 110, 255))
}
fn default_wall_tint_base() -> MinMax<Color> {
    MinMax::inclusive(Color::new(30, 30, 30, 255), Color::new(50, 50, 50, 255))
}
fn default_tint_per_height() -> Color {
    Color::new(10, 10, 10, 0)
}
fn default_pattern_resource_count() -> i32 {
    5
}
fn default_pattern_tint() -> MinMax<Color> {
    MinMax::inclusive(Color::new(200, 200, 200, 20), Color::new(255, 255, 255, 60))
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: 0,
            random_enabled: true,
            map_name: default_map_name(),
            crop_map: true,
            rooms_count: default_rooms_count(),
            room_size: default_room_size(),
            wall_size: default_wall_size(),
            wall_max_offset: default_wall_max_offset(),
            door_width: default_door_width(),
            style_count: default_style_count(),
            style_height_override: Vec::new(),
            style_size: default_style_size(),
            style_overlap: StyleOverlap::FirstWriter,
            wall_height: default_wall_height(),
            floor_tint_base: default_floor_tint_base(),
            wall_tint_base: default_wall_tint_base(),
            floor_tint_per_height: default_tint_per_height(),
            wall_tint_per_height: default_tint_per_height(),
            pattern_resource_count: default_pattern_resource_count(),
            pattern_tint_floor: default_pattern_tint(),
            pattern_tint_wall: default_pattern_tint(),
            rooms_disabled: Vec::new(),
            rooms_door_down_disabled: Vec::new(),
            rooms_door_right_disabled: Vec::new(),
            decor: DecorSettings::default(),
        }
    }
}

impl GenerationParams {
    /// Загружает параметры из файла: `.json` читается как JSON, всё остальное — как TOML
    ///
    /// # Пример
    /// ```toml
    /// # arena.toml
    /// seed = 42
    /// rooms_count = [6, 5]
    /// room_size = { min = [8, 8], max = [12, 12] }
    /// style_overlap = "last_writer"
    /// ```
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&contents)?)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.rooms_count.x.max(0) as usize
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rooms_count.y.max(0) as usize
    }

    /// Проверяет все предусловия генерации.
    ///
    /// # Ошибки
    /// `GenError::Config` с именем первого некорректного поля.
    pub fn validate(&self) -> Result<()> {
        if self.rooms_count.x < 2 || self.rooms_count.y < 2 {
            return Err(GenError::config(
                "rooms_count",
                format!(
                    "grid must be at least 2x2, got {}x{}",
                    self.rooms_count.x, self.rooms_count.y
                ),
            ));
        }

        check_range("room_size", self.room_size.is_valid())?;
        check_range("wall_size", self.wall_size.is_valid())?;
        check_range("door_width", self.door_width.is_valid())?;
        check_range("style_size", self.style_size.is_valid())?;
        check_range("floor_tint_base", self.floor_tint_base.is_valid())?;
        check_range("wall_tint_base", self.wall_tint_base.is_valid())?;
        check_range("pattern_tint_floor", self.pattern_tint_floor.is_valid())?;
        check_range("pattern_tint_wall", self.pattern_tint_wall.is_valid())?;

        if self.wall_max_offset.x < 1 || self.wall_max_offset.y < 1 {
            return Err(GenError::config(
                "wall_max_offset",
                "both components must be at least 1",
            ));
        }
        if self.wall_size.min.w < 1 || self.wall_size.min.h < 1 {
            return Err(GenError::config("wall_size", "walls must be at least 1 tile thick"));
        }
        // Смещение стены не должно съедать комнату целиком: на полу должно
        // оставаться место хотя бы для двери с отступами.
        let min_room = self.wall_max_offset.x.max(self.wall_max_offset.y) + 2;
        if self.room_size.min.w < min_room || self.room_size.min.h < min_room {
            return Err(GenError::config(
                "room_size",
                format!("rooms must be at least {min_room} tiles on each side"),
            ));
        }
        if self.door_width.min.w < 1 || self.door_width.min.h < 1 {
            return Err(GenError::config("door_width", "doors must be at least 1 tile wide"));
        }
        if self.style_size.min.w < 0 || self.style_size.min.h < 0 {
            return Err(GenError::config("style_size", "must not be negative"));
        }
        if self.style_count < 1 {
            return Err(GenError::config("style_count", "at least one style is required"));
        }
        if !self.style_height_override.is_empty()
            && self.style_height_override.len() < self.style_count as usize
        {
            return Err(GenError::config(
                "style_height_override",
                format!(
                    "{} entries given for {} styles",
                    self.style_height_override.len(),
                    self.style_count
                ),
            ));
        }
        if self.wall_height < 0 {
            return Err(GenError::config("wall_height", "must not be negative"));
        }
        if self.pattern_resource_count < 2 {
            return Err(GenError::config(
                "pattern_resource_count",
                "pattern ids are drawn from [1, count), count must be at least 2",
            ));
        }

        self.check_room_list("rooms_disabled", &self.rooms_disabled)?;
        self.check_room_list("rooms_door_down_disabled", &self.rooms_door_down_disabled)?;
        self.check_room_list("rooms_door_right_disabled", &self.rooms_door_right_disabled)?;

        self.decor.validate()
    }

    fn check_room_list(&self, field: &'static str, rooms: &[Point]) -> Result<()> {
        match rooms.iter().find(|p| {
            p.x < 0 || p.y < 0 || p.x >= self.rooms_count.x || p.y >= self.rooms_count.y
        }) {
            Some(p) => Err(GenError::config(
                field,
                format!("room ({}, {}) is outside the grid", p.x, p.y),
            )),
            None => Ok(()),
        }
    }
}

impl DecorSettings {
    pub fn validate(&self) -> Result<()> {
        if !(0..=100).contains(&self.crate_blocking_chance) {
            return Err(GenError::config(
                "decor.crate_blocking_chance",
                "must be a percentage in 0..=100",
            ));
        }
        if self.crate_blocking_chance > 0 && self.crates_blocking_per_style == 0 {
            return Err(GenError::config(
                "decor.crates_blocking_per_style",
                "blocking crates can be rolled but no kinds are configured",
            ));
        }
        if self.crate_blocking_chance < 100 && self.crates_non_blocking_per_style == 0 {
            return Err(GenError::config(
                "decor.crates_non_blocking_per_style",
                "non-blocking crates can be rolled but no kinds are configured",
            ));
        }
        check_range("decor.crates_space_left", self.crates_space_left.is_valid())?;
        if self.crates_space_left.min.w < 1 || self.crates_space_left.min.h < 1 {
            return Err(GenError::config("decor.crates_space_left", "must be at least 1"));
        }
        check_range("decor.crate_blocking_tint", self.crate_blocking_tint.is_valid())?;
        check_range(
            "decor.crate_non_blocking_tint",
            self.crate_non_blocking_tint.is_valid(),
        )?;
        check_range("decor.room_light_tint", self.room_light_tint.is_valid())?;
        // Вещественные диапазоны записываются как есть; вырожденный `min == max`
        // для них недопустим так же, как и для генератора.
        check_range(
            "decor.crate_size_multiplier",
            self.crate_size_multiplier.is_valid(),
        )?;
        check_range("decor.room_light_radius", self.room_light_radius.is_valid())?;
        check_range(
            "decor.room_light_vibration",
            self.room_light_vibration.is_valid(),
        )?;
        check_range(
            "decor.room_effect_size_multiplier",
            self.room_effect_size_multiplier.is_valid(),
        )
    }
}

fn check_range(field: &'static str, valid: bool) -> Result<()> {
    if valid {
        Ok(())
    } else {
        Err(GenError::config(field, "range is empty or inverted"))
    }
}
