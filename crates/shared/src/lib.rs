//! Persisted data model for desk layouts.
//!
//! Everything in this crate is plain data: the shapes written to and read from
//! layout files, plus the codec that converts between them and the editor's
//! live state.

pub mod codec;

use serde::{Deserialize, Serialize};

pub use codec::{decode, decode_str, encode, MalformedRecord};

/// Default edge length of a placed object when a record omits its size (meters)
pub const DEFAULT_OBJECT_EDGE: f64 = 0.05;

/// Longest desk edge a layout may describe (meters)
pub const MAX_DESK_EDGE: f64 = 50.0;

/// Largest colour value; colours are 24-bit RGB
pub const MAX_COLOR: u32 = 0xFF_FFFF;

/// Default object color (blue) used by the stock cube and by records without a color
pub const DEFAULT_OBJECT_COLOR: Rgb = Rgb(0x4a86e8);

/// A point or vector as written in layout files: `{"x", "y", "z"}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<glam::DVec3> for Point3 {
    fn from(v: glam::DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Point3> for glam::DVec3 {
    fn from(p: Point3) -> Self {
        glam::DVec3::new(p.x, p.y, p.z)
    }
}

/// Box dimensions in meters: width (x), height (y), depth (z)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size3 {
    pub w: f64,
    pub h: f64,
    pub d: f64,
}

impl Size3 {
    pub const fn new(w: f64, h: f64, d: f64) -> Self {
        Self { w, h, d }
    }

    /// The stock 5 cm cube
    pub const fn default_cube() -> Self {
        Self::new(DEFAULT_OBJECT_EDGE, DEFAULT_OBJECT_EDGE, DEFAULT_OBJECT_EDGE)
    }

    /// True when every component is finite and strictly positive
    pub fn is_valid(&self) -> bool {
        [self.w, self.h, self.d]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    pub fn as_dvec3(&self) -> glam::DVec3 {
        glam::DVec3::new(self.w, self.h, self.d)
    }
}

impl Default for Size3 {
    fn default() -> Self {
        Self::default_cube()
    }
}

/// 24-bit RGB color, serialized as a plain number (e.g. `4884200` for `0x4a86e8`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub u32);

impl Rgb {
    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub fn b(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r(), self.g(), self.b()]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        DEFAULT_OBJECT_COLOR
    }
}

/// Shape of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Box,
}

/// Desk dimensions as stored in a layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeskParams {
    pub width: f64,
    pub depth: f64,
}

/// Value snapshot of one placed object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub position: Point3,
    #[serde(rename = "rotationY")]
    pub rotation_y: f64,
    pub scale: Point3,
    #[serde(rename = "baseSize")]
    pub base_size: Size3,
    pub color: Rgb,
}

impl ObjectSpec {
    /// Unrotated, unscaled object of `size` at `position`
    pub fn new(position: Point3, size: Size3, color: Rgb) -> Self {
        Self {
            position,
            rotation_y: 0.0,
            scale: Point3::ONE,
            base_size: size,
            color,
        }
    }
}

/// Flat, versionless layout snapshot: the desk plus every placed object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRecord {
    pub desk: DeskParams,
    pub objects: Vec<ObjectSpec>,
}

impl LayoutRecord {
    /// Pretty-printed JSON, the form written to storage
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
