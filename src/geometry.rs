// src/geometry.rs
//! Базовые значения: точки, размеры, цвета и случайные диапазоны
//!
//! В конфигурационных файлах точки и размеры записываются массивами `[a, b]`,
//! цвета — `[r, g, b, a]`, диапазоны — таблицами `{ min = ..., max = ... }`
//! с включительным максимумом.

use crate::error::Result;
use crate::rng::RngService;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Размер одного тайла в пикселях редактора
pub const TILE_SIZE: Size = Size { w: 128, h: 128 };

/// Базовый размер ящика в пикселях
pub const CRATE_SIZE: Size = Size { w: 104, h: 104 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const LEFT: Point = Point::new(-1, 0);
    pub const RIGHT: Point = Point::new(1, 0);
    pub const UP: Point = Point::new(0, -1);
    pub const DOWN: Point = Point::new(0, 1);
    pub const UP_LEFT: Point = Point::new(-1, -1);
    pub const UP_RIGHT: Point = Point::new(1, -1);
    pub const DOWN_LEFT: Point = Point::new(-1, 1);
    pub const DOWN_RIGHT: Point = Point::new(1, 1);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Координаты в пикселях как `[x, y]`
    #[must_use]
    pub fn to_pixels(self) -> [f32; 2] {
        [self.x as f32, self.y as f32]
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Покомпонентное умножение
impl Mul for Point {
    type Output = Point;

    fn mul(self, other: Point) -> Point {
        Point::new(self.x * other.x, self.y * other.y)
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for [i32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    #[must_use]
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// Масштабирование с отбрасыванием дробной части
    #[must_use]
    pub fn scale(self, factor: f32) -> Size {
        Size::new((self.w as f32 * factor) as i32, (self.h as f32 * factor) as i32)
    }

    #[must_use]
    pub fn to_point(self) -> Point {
        Point::new(self.w, self.h)
    }
}

impl From<[i32; 2]> for Size {
    fn from([w, h]: [i32; 2]) -> Self {
        Size::new(w, h)
    }
}

impl From<Size> for [i32; 2] {
    fn from(s: Size) -> Self {
        [s.w, s.h]
    }
}

/// Цвет RGBA. Каналы хранятся без ограничения: сумма базового оттенка и
/// надбавки за стиль может выйти за 255, обрезка делается только при выводе.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct Color {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub a: i32,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    #[must_use]
    pub const fn new(r: i32, g: i32, b: i32, a: i32) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub fn scale(self, factor: f32) -> Color {
        Color::new(
            (self.r as f32 * factor) as i32,
            (self.g as f32 * factor) as i32,
            (self.b as f32 * factor) as i32,
            (self.a as f32 * factor) as i32,
        )
    }

    #[must_use]
    pub fn with_alpha(self, a: i32) -> Color {
        Color { a, ..self }
    }

    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(|c| c.clamp(0, 255) as u8)
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, other: Color) -> Color {
        Color::new(
            self.r + other.r,
            self.g + other.g,
            self.b + other.b,
            self.a + other.a,
        )
    }
}

impl From<[i32; 4]> for Color {
    fn from([r, g, b, a]: [i32; 4]) -> Self {
        Color::new(r, g, b, a)
    }
}

impl From<Color> for [i32; 4] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

/// Значение, которое можно разыграть в диапазоне.
///
/// Целочисленные типы хранят верхнюю границу уже увеличенной на единицу,
/// чтобы полуинтервальный розыгрыш включал настроенный максимум.
pub trait Bounded: Copy {
    /// Включительный максимум из конфигурации → хранимая граница
    fn to_stored_max(self) -> Self;
    /// Хранимая граница → включительный максимум для сериализации
    fn to_inclusive_max(self) -> Self;
    fn draw(min: Self, max: Self, rng: &mut RngService) -> Result<Self>;
    /// Не пуст ли хранимый диапазон
    fn is_valid_range(min: Self, max: Self) -> bool;
}

impl Bounded for i32 {
    fn to_stored_max(self) -> Self {
        self + 1
    }
    fn to_inclusive_max(self) -> Self {
        self - 1
    }
    fn draw(min: Self, max: Self, rng: &mut RngService) -> Result<Self> {
        rng.next_int(min, max)
    }
    fn is_valid_range(min: Self, max: Self) -> bool {
        min < max
    }
}

impl Bounded for f32 {
    fn to_stored_max(self) -> Self {
        self
    }
    fn to_inclusive_max(self) -> Self {
        self
    }
    fn draw(min: Self, max: Self, rng: &mut RngService) -> Result<Self> {
        rng.next_float(min, max)
    }
    fn is_valid_range(min: Self, max: Self) -> bool {
        min < max
    }
}

impl Bounded for Size {
    fn to_stored_max(self) -> Self {
        Size::new(self.w + 1, self.h + 1)
    }
    fn to_inclusive_max(self) -> Self {
        Size::new(self.w - 1, self.h - 1)
    }
    fn draw(min: Self, max: Self, rng: &mut RngService) -> Result<Self> {
        let w = rng.next_int(min.w, max.w)?;
        let h = rng.next_int(min.h, max.h)?;
        Ok(Size::new(w, h))
    }
    fn is_valid_range(min: Self, max: Self) -> bool {
        min.w < max.w && min.h < max.h
    }
}

impl Bounded for Color {
    fn to_stored_max(self) -> Self {
        self + Color::new(1, 1, 1, 1)
    }
    fn to_inclusive_max(self) -> Self {
        self + Color::new(-1, -1, -1, -1)
    }
    fn draw(min: Self, max: Self, rng: &mut RngService) -> Result<Self> {
        let r = rng.next_int(min.r, max.r)?;
        let g = rng.next_int(min.g, max.g)?;
        let b = rng.next_int(min.b, max.b)?;
        let a = rng.next_int(min.a, max.a)?;
        Ok(Color::new(r, g, b, a))
    }
    fn is_valid_range(min: Self, max: Self) -> bool {
        min.r < max.r && min.g < max.g && min.b < max.b && min.a < max.a
    }
}

/// Диапазон для розыгрыша. `max` хранится в полуинтервальной форме.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "InclusiveRange<T>",
    into = "InclusiveRange<T>",
    bound(
        serialize = "T: Bounded + Serialize",
        deserialize = "T: Bounded + Deserialize<'de>"
    )
)]
pub struct MinMax<T> {
    pub min: T,
    pub max: T,
}

impl<T: Bounded> MinMax<T> {
    /// Строит диапазон из включительных границ, как они записаны в конфигурации
    #[must_use]
    pub fn inclusive(min: T, max: T) -> Self {
        Self {
            min,
            max: max.to_stored_max(),
        }
    }

    pub fn randomize(&self, rng: &mut RngService) -> Result<T> {
        T::draw(self.min, self.max, rng)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        T::is_valid_range(self.min, self.max)
    }
}

impl MinMax<Size> {
    pub fn randomize_width(&self, rng: &mut RngService) -> Result<i32> {
        rng.next_int(self.min.w, self.max.w)
    }

    pub fn randomize_height(&self, rng: &mut RngService) -> Result<i32> {
        rng.next_int(self.min.h, self.max.h)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct InclusiveRange<T> {
    min: T,
    max: T,
}

impl<T: Bounded> From<InclusiveRange<T>> for MinMax<T> {
    fn from(raw: InclusiveRange<T>) -> Self {
        MinMax::inclusive(raw.min, raw.max)
    }
}

impl<T: Bounded> From<MinMax<T>> for InclusiveRange<T> {
    fn from(range: MinMax<T>) -> Self {
        InclusiveRange {
            min: range.min,
            max: range.max.to_inclusive_max(),
        }
    }
}

/// Все точки прямоугольника построчно (сначала `y`, затем `x`)
pub fn points_rect(start: Point, size: Size) -> impl Iterator<Item = Point> {
    (start.y..start.y + size.h)
        .flat_map(move |y| (start.x..start.x + size.w).map(move |x| Point::new(x, y)))
}
