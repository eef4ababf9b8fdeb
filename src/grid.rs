//! Grid data model: sizes, colors and the pixel buffer
//!
//! A pixel buffer is a row-major sequence of `size²` cells. Each cell is
//! either empty or holds an opaque [`Color`]. Stored designs use the plain
//! JSON encoding of the first web release: an array of strings where `""`
//! marks an empty cell.

use std::fmt;
use std::slice::ChunksExact;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Color selected when nothing else has been picked
pub const DEFAULT_COLOR: &str = "#000000";

/// Supported grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "usize", into = "usize")]
pub enum GridSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl GridSize {
    pub const ALL: [GridSize; 3] = [GridSize::Small, GridSize::Medium, GridSize::Large];

    /// Cells per row (and rows per grid)
    pub fn dim(&self) -> usize {
        match self {
            GridSize::Small => 8,
            GridSize::Medium => 16,
            GridSize::Large => 32,
        }
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.dim() * self.dim()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GridSize::Small => "8x8",
            GridSize::Medium => "16x16",
            GridSize::Large => "32x32",
        }
    }

    /// Parse a `<select>` value such as `"16"` or `"16x16"`
    pub fn from_str(s: &str) -> Option<Self> {
        let dim = s.trim().split(['x', 'X']).next()?.trim();
        dim.parse::<usize>().ok().and_then(|n| Self::try_from(n).ok())
    }

    /// Size whose cell count is `len`, if any
    pub fn from_cell_count(len: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.cell_count() == len)
    }
}

impl TryFrom<usize> for GridSize {
    type Error = GridError;

    fn try_from(dim: usize) -> Result<Self, Self::Error> {
        match dim {
            8 => Ok(GridSize::Small),
            16 => Ok(GridSize::Medium),
            32 => Ok(GridSize::Large),
            other => Err(GridError::UnsupportedSize(other)),
        }
    }
}

impl From<GridSize> for usize {
    fn from(size: GridSize) -> usize {
        size.dim()
    }
}

/// An opaque paint color, usually a `#rrggbb` hex string.
///
/// Never blank: an empty cell is `None`, not an empty color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Wrap any non-blank color string
    pub fn new(value: impl Into<String>) -> Result<Self, GridError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(GridError::EmptyColor);
        }
        Ok(Self(value))
    }

    /// Parse `#rgb` or `#rrggbb`, normalizing to lowercase `#rrggbb`
    pub fn parse_hex(s: &str) -> Result<Self, GridError> {
        let invalid = || GridError::InvalidColor(s.to_string());
        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let expanded = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => digits.to_string(),
            _ => return Err(invalid()),
        };
        Ok(Self(format!("#{}", expanded.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// RGB channels if this is a hex color
    pub fn to_rgb(&self) -> Option<[u8; 3]> {
        let hex = Self::parse_hex(&self.0).ok()?;
        let digits = &hex.0[1..];
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some([channel(0)?, channel(2)?, channel(4)?])
    }
}

impl TryFrom<String> for Color {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> String {
        color.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self(DEFAULT_COLOR.to_string())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Row-major grid of optional colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct PixelBuffer {
    size: GridSize,
    cells: Vec<Option<Color>>,
}

impl PixelBuffer {
    /// A fully cleared buffer
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![None; size.cell_count()],
        }
    }

    /// Build from cells; the length must match one of the supported sizes
    pub fn from_cells(cells: Vec<Option<Color>>) -> Result<Self, GridError> {
        let size = GridSize::from_cell_count(cells.len()).ok_or(GridError::BadLength(cells.len()))?;
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if no cell holds a color
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn cells(&self) -> &[Option<Color>] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<&Color> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// Overwrite one cell. Panics if `index` is out of range.
    pub fn set(&mut self, index: usize, color: Option<Color>) {
        self.cells[index] = color;
    }

    /// Paint `color`, or clear the cell if it already holds that color
    pub fn toggle(&mut self, index: usize, color: &Color) {
        let cell = &mut self.cells[index];
        *cell = if cell.as_ref() == Some(color) {
            None
        } else {
            Some(color.clone())
        };
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Reverse every row in place (column `j` becomes `dim - 1 - j`)
    pub fn mirror_horizontal(&mut self) {
        let dim = self.size.dim();
        for row in self.cells.chunks_exact_mut(dim) {
            row.reverse();
        }
    }

    pub fn rows(&self) -> ChunksExact<'_, Option<Color>> {
        self.cells.chunks_exact(self.size.dim())
    }

    /// Flat index of `(row, col)`
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.size.dim() + col
    }
}

impl TryFrom<Vec<String>> for PixelBuffer {
    type Error = GridError;

    fn try_from(raw: Vec<String>) -> Result<Self, Self::Error> {
        let cells = raw
            .into_iter()
            .map(|s| if s.trim().is_empty() { None } else { Some(Color(s)) })
            .collect();
        Self::from_cells(cells)
    }
}

impl From<PixelBuffer> for Vec<String> {
    fn from(buffer: PixelBuffer) -> Vec<String> {
        buffer
            .cells
            .into_iter()
            .map(|c| c.map(|c| c.0).unwrap_or_default())
            .collect()
    }
}
