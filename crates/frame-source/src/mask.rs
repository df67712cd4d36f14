//! Boolean segmentation masks

use ndarray::{Array2, Axis};

/// Integer pixel centroid of a mask (truncated mean of set pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Centroid {
    pub x: i32,
    pub y: i32,
}

/// Binary region over the frame, indexed `[row, col]` = `[y, x]`
#[derive(Debug, Clone, PartialEq)]
pub struct EyeMask {
    pixels: Array2<bool>,
}

impl EyeMask {
    /// Wrap a boolean pixel grid
    pub fn new(pixels: Array2<bool>) -> Self {
        Self { pixels }
    }

    /// All-false mask of the given frame size
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            pixels: Array2::from_elem((height, width), false),
        }
    }

    /// Rasterize axis-aligned rectangles `(x, y, w, h)`, clipped to the frame
    pub fn from_rects(width: usize, height: usize, rects: &[[usize; 4]]) -> Self {
        let mut pixels = Array2::from_elem((height, width), false);
        for &[x, y, w, h] in rects {
            let x_end = x.saturating_add(w).min(width);
            let y_end = y.saturating_add(h).min(height);
            for row in y.min(height)..y_end {
                for col in x.min(width)..x_end {
                    pixels[[row, col]] = true;
                }
            }
        }
        Self { pixels }
    }

    /// Underlying pixel grid
    pub fn into_pixels(self) -> Array2<bool> {
        self.pixels
    }

    /// Frame width in pixels
    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    /// Frame height in pixels
    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    /// Number of set pixels
    pub fn area(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.pixels.iter().any(|&p| p)
    }

    /// Truncated mean of set pixel coordinates, `None` for an empty mask
    pub fn centroid(&self) -> Option<Centroid> {
        let mut sum_x: u64 = 0;
        let mut sum_y: u64 = 0;
        let mut count: u64 = 0;

        for ((row, col), &set) in self.pixels.indexed_iter() {
            if set {
                sum_x += col as u64;
                sum_y += row as u64;
                count += 1;
            }
        }

        if count == 0 {
            return None;
        }

        Some(Centroid {
            x: (sum_x / count) as i32,
            y: (sum_y / count) as i32,
        })
    }

    /// Flip left-right (selfie view)
    pub fn mirrored(&self) -> Self {
        let mut pixels = self.pixels.clone();
        pixels.invert_axis(Axis(1));
        Self { pixels }
    }
}
