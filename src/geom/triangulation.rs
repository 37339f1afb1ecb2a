/// How the rows of a sampled parameter grid are stitched into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridStitch {
    /// Join the last column of every row back to column 0.
    pub wrap_columns: bool,
    /// After stitching consecutive rows, also stitch the last row to row 0.
    pub close_rows: bool,
}

impl GridStitch {
    /// Periodic columns, open rows: the angular `Open` topology.
    pub const OPEN: Self = Self {
        wrap_columns: true,
        close_rows: false,
    };

    /// Periodic columns and rows: the angular `Closed` topology.
    pub const CLOSED: Self = Self {
        wrap_columns: true,
        close_rows: true,
    };

    /// Plain rectangular patch grid, nothing wraps.
    pub const PLANAR: Self = Self {
        wrap_columns: false,
        close_rows: false,
    };
}

/// Triangulate a row-major grid of `row_count` rows of `row_len` vertices.
///
/// Every quad between rows `a` and `b` (first vertex indices) and columns
/// `j`, `next` yields `(a+j, a+next, b+j)` and `(a+next, b+next, b+j)`.
#[must_use]
pub fn triangulate_rows(row_count: usize, row_len: usize, stitch: GridStitch) -> Vec<[u32; 3]> {
    if row_count == 0 || row_len == 0 {
        return Vec::new();
    }

    let quad_cols = if stitch.wrap_columns {
        row_len
    } else {
        row_len.saturating_sub(1)
    };
    let row_pairs = row_count - 1 + usize::from(stitch.close_rows);
    let mut faces = Vec::with_capacity(row_pairs * quad_cols * 2);

    let mut stitch_pair = |a: usize, b: usize| {
        for j in 0..quad_cols {
            let next = (j + 1) % row_len;
            let (aj, an) = ((a + j) as u32, (a + next) as u32);
            let (bj, bn) = ((b + j) as u32, (b + next) as u32);
            faces.push([aj, an, bj]);
            faces.push([an, bn, bj]);
        }
    };

    for i in 0..row_count - 1 {
        stitch_pair(i * row_len, (i + 1) * row_len);
    }
    if stitch.close_rows {
        stitch_pair((row_count - 1) * row_len, 0);
    }

    faces
}
