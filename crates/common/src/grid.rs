/// Row-major cost grid consumed by the pathfinder.
///
/// Cell value 0 is impassable. Nonzero values are passable; in weighted
/// search the value is the traversal cost of entering that cell. Built fresh
/// per query by the world facade, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavGrid {
    width: i32,
    height: i32,
    cells: Vec<u8>,
}

impl NavGrid {
    /// Create a grid filled with the given value.
    pub fn filled(width: i32, height: i32, value: u8) -> Self {
        assert!(width >= 0 && height >= 0, "grid extents must be non-negative");
        Self {
            width,
            height,
            cells: vec![value; (width as usize) * (height as usize)],
        }
    }

    /// Build a grid from row-major rows. All rows must share one length.
    pub fn from_rows(rows: &[Vec<u8>]) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.len() as i32);
        let mut cells = Vec::with_capacity((width * height) as usize);
        for row in rows {
            assert_eq!(row.len() as i32, width, "ragged rows");
            cells.extend_from_slice(row);
        }
        Self { width, height, cells }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Cell value at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[(y * self.width + x) as usize])
    }

    pub fn set(&mut self, x: i32, y: i32, value: u8) {
        assert!(
            x >= 0 && y >= 0 && x < self.width && y < self.height,
            "set out of bounds: ({x}, {y})"
        );
        self.cells[(y * self.width + x) as usize] = value;
    }

    /// Whether `(x, y)` is inside the grid and has a nonzero value.
    pub fn passable(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(v) if v != 0)
    }
}
