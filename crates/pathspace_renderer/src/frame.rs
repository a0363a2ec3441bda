//! Progressive frame accumulation buffer.
//!
//! Each pixel keeps a running weighted mean of every sample splatted into
//! it, updated in place:
//!
//! ```text
//! avg' = avg + w * (x - avg) / (W + w)
//! W'   = W + w
//! ```
//!
//! This never stores a raw sum, so it stays well conditioned after many
//! millions of samples. Cells are atomics so worker threads and the display
//! stage can share the frame without `&mut`. See [`AccumulationMode`] for
//! what is guaranteed when several writers touch the same pixel.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use parking_lot::Mutex;
use pathspace_core::AccumulationMode;
use pathspace_math::{Color, Float, Vec2f};

use crate::error::{SceneError, SceneResult};

/// `f64` stored as bits in an `AtomicU64`.
#[derive(Debug, Default)]
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    #[inline]
    fn load(&self) -> Float {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    fn store(&self, v: Float) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }
}

/// `f32` stored as bits in an `AtomicU32`.
#[derive(Debug, Default)]
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    #[inline]
    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    fn store(&self, v: f32) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }
}

/// One pixel: cumulative weight, running average, display copy.
#[derive(Debug, Default)]
struct Cell {
    weight: AtomicF64,
    average: [AtomicF64; 3],
    display: [AtomicF32; 3],
}

impl Cell {
    fn average(&self) -> Color {
        Color::new(
            self.average[0].load(),
            self.average[1].load(),
            self.average[2].load(),
        )
    }

    fn display(&self) -> [f32; 3] {
        [
            self.display[0].load(),
            self.display[1].load(),
            self.display[2].load(),
        ]
    }

    /// Fold one weighted sample into the running mean.
    fn accumulate(&self, value: Color, weight: Float) {
        let total = self.weight.load();

        // An unseeded cell (never written, or reset) takes the sample as is
        let average = if total > 0.0 {
            let old = self.average();
            old + weight * (value - old) / (total + weight)
        } else {
            value
        };

        for c in 0..3 {
            self.average[c].store(average[c]);
            self.display[c].store(average[c] as f32);
        }
        self.weight.store(total + weight);
    }
}

/// A W×H grid of running weighted averages shared by render threads.
#[derive(Debug)]
pub struct Frame {
    width: u32,
    height: u32,
    mode: AccumulationMode,
    cells: Vec<Cell>,
    // One lock per pixel in strict mode, empty in relaxed mode
    locks: Vec<Mutex<()>>,
}

impl Frame {
    /// Allocate a black frame with all weights at zero.
    pub fn new(width: u32, height: u32, mode: AccumulationMode) -> SceneResult<Self> {
        if width == 0 || height == 0 {
            return Err(SceneError::EmptyFrame { width, height });
        }

        let count = width as usize * height as usize;
        let cells = (0..count).map(|_| Cell::default()).collect();
        let locks = match mode {
            AccumulationMode::Strict => (0..count).map(|_| Mutex::new(())).collect(),
            AccumulationMode::Relaxed => Vec::new(),
        };

        Ok(Self {
            width,
            height,
            mode,
            cells,
            locks,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mode(&self) -> AccumulationMode {
        self.mode
    }

    #[inline]
    fn index(&self, i: i64, j: i64) -> Option<usize> {
        if (0..self.width as i64).contains(&i) && (0..self.height as i64).contains(&j) {
            Some(i as usize + self.width as usize * j as usize)
        } else {
            None
        }
    }

    /// Add a weighted sample to pixel `(i, j)`.
    ///
    /// Out-of-bounds pixels and non-positive weights are ignored.
    pub fn add_sample(&self, i: i64, j: i64, value: Color, weight: Float) {
        if !(weight > 0.0) {
            return;
        }
        let Some(index) = self.index(i, j) else {
            return;
        };

        let cell = &self.cells[index];
        match self.mode {
            AccumulationMode::Relaxed => cell.accumulate(value, weight),
            AccumulationMode::Strict => {
                let _guard = self.locks[index].lock();
                cell.accumulate(value, weight);
            }
        }
    }

    /// Splat a sample at image-space `uv` into the four surrounding pixels.
    ///
    /// `uv` in [0, 1]^2 covers the whole frame. Each pixel's weight is the
    /// area of the rectangle between the sample and the opposite corner.
    pub fn add_bilinear(&self, uv: Vec2f, value: Color) {
        let x = uv.x * self.width as Float;
        let y = uv.y * self.height as Float;

        // Only samples within one pixel of the frame touch it
        let in_range = |v: Float, size: u32| v >= -1.0 && v < size as Float;
        if !in_range(x, self.width) || !in_range(y, self.height) {
            return;
        }

        let (px, py) = (x.floor(), y.floor());
        let (dx, dy) = (x - px, y - py);
        let (i, j) = (px as i64, py as i64);

        let wx = [1.0 - dx, dx];
        let wy = [1.0 - dy, dy];

        for (oj, wy) in wy.iter().enumerate() {
            for (oi, wx) in wx.iter().enumerate() {
                self.add_sample(i + oi as i64, j + oj as i64, value, wx * wy);
            }
        }
    }

    /// Zero every weight. Averages stay stale until the next sample.
    pub fn reset(&self) {
        for (index, cell) in self.cells.iter().enumerate() {
            match self.mode {
                AccumulationMode::Relaxed => cell.weight.store(0.0),
                AccumulationMode::Strict => {
                    let _guard = self.locks[index].lock();
                    cell.weight.store(0.0);
                }
            }
        }
    }

    /// Accumulated weight of pixel `(i, j)`, or `None` outside the frame.
    pub fn weight(&self, i: i64, j: i64) -> Option<Float> {
        self.index(i, j).map(|index| self.cells[index].weight.load())
    }

    /// Current average of pixel `(i, j)`, or `None` while it is unseeded.
    pub fn average(&self, i: i64, j: i64) -> Option<Color> {
        let index = self.index(i, j)?;
        let cell = &self.cells[index];
        let _guard = self.locks.get(index).map(|lock| lock.lock());
        (cell.weight.load() > 0.0).then(|| cell.average())
    }

    /// Sum of all pixel weights.
    pub fn total_weight(&self) -> Float {
        self.cells.iter().map(|cell| cell.weight.load()).sum()
    }

    /// Copy of the display-ready pixels in row-major order.
    ///
    /// In relaxed mode a pixel being written concurrently may mix channels
    /// from two updates.
    pub fn display_pixels(&self) -> Vec<[f32; 3]> {
        match self.mode {
            AccumulationMode::Relaxed => self.cells.iter().map(Cell::display).collect(),
            AccumulationMode::Strict => self
                .cells
                .iter()
                .zip(&self.locks)
                .map(|(cell, lock)| {
                    let _guard = lock.lock();
                    cell.display()
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sampler;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn approx(a: Color, b: Color, rel: Float) -> bool {
        (0..3).all(|c| (a[c] - b[c]).abs() <= rel * a[c].abs().max(b[c].abs()).max(1e-12))
    }

    #[test]
    fn test_new_frame_is_unseeded() {
        let frame = Frame::new(4, 3, AccumulationMode::Relaxed).unwrap();
        assert_eq!(frame.display_pixels().len(), 12);
        assert_eq!(frame.weight(0, 0), Some(0.0));
        assert_eq!(frame.average(0, 0), None);
        assert_eq!(frame.total_weight(), 0.0);
    }

    #[test]
    fn test_empty_frame_rejected() {
        assert_eq!(
            Frame::new(0, 10, AccumulationMode::Strict).unwrap_err(),
            SceneError::EmptyFrame {
                width: 0,
                height: 10
            }
        );
    }

    #[test]
    fn test_weighted_mean() {
        let frame = Frame::new(2, 2, AccumulationMode::Strict).unwrap();
        frame.add_sample(1, 0, Color::splat(1.0), 1.0);
        frame.add_sample(1, 0, Color::splat(4.0), 3.0);

        // (1*1 + 4*3) / 4
        let avg = frame.average(1, 0).unwrap();
        assert!(approx(avg, Color::splat(3.25), 1e-12));
        assert_eq!(frame.weight(1, 0), Some(4.0));
        assert_eq!(frame.display_pixels()[1], [3.25, 3.25, 3.25]);
    }

    #[test]
    fn test_out_of_bounds_and_zero_weight_ignored() {
        let frame = Frame::new(2, 2, AccumulationMode::Relaxed).unwrap();
        frame.add_sample(-1, 0, Color::ONE, 1.0);
        frame.add_sample(0, 2, Color::ONE, 1.0);
        frame.add_sample(2, 0, Color::ONE, 1.0);
        frame.add_sample(0, 0, Color::ONE, 0.0);
        frame.add_sample(0, 0, Color::ONE, -1.0);

        assert_eq!(frame.total_weight(), 0.0);
        assert_eq!(frame.weight(5, 5), None);
    }

    #[test]
    fn test_order_independence() {
        let mut sampler = Sampler::new(77);
        let mut samples: Vec<(Color, Float)> = (0..500)
            .map(|_| {
                let value = Color::new(
                    sampler.range(0.0, 10.0),
                    sampler.range(0.0, 1.0),
                    sampler.range(0.0, 100.0),
                );
                (value, sampler.range(0.01, 1.0))
            })
            .collect();

        let first = Frame::new(1, 1, AccumulationMode::Strict).unwrap();
        for &(value, weight) in &samples {
            first.add_sample(0, 0, value, weight);
        }

        let mut rng = StdRng::seed_from_u64(5);
        samples.shuffle(&mut rng);
        let second = Frame::new(1, 1, AccumulationMode::Strict).unwrap();
        for &(value, weight) in &samples {
            second.add_sample(0, 0, value, weight);
        }

        let a = first.average(0, 0).unwrap();
        let b = second.average(0, 0).unwrap();
        assert!(approx(a, b, 1e-6), "{:?} vs {:?}", a, b);
    }

    #[test]
    fn test_reset_discards_old_contributions() {
        let frame = Frame::new(3, 3, AccumulationMode::Relaxed).unwrap();
        for k in 0..10 {
            frame.add_sample(1, 1, Color::splat(k as Float), 1.0);
        }

        frame.reset();
        assert_eq!(frame.weight(1, 1), Some(0.0));
        assert_eq!(frame.average(1, 1), None);

        let value = Color::new(0.3, 0.1, 0.7);
        frame.add_sample(1, 1, value, 0.25);
        assert_eq!(frame.average(1, 1), Some(value));
        assert_eq!(frame.weight(1, 1), Some(0.25));
    }

    #[test]
    fn test_bilinear_weights() {
        let frame = Frame::new(64, 64, AccumulationMode::Strict).unwrap();
        // x = 10.25, y = 20.75
        let uv = Vec2f::new(10.25 / 64.0, 20.75 / 64.0);
        frame.add_bilinear(uv, Color::ONE);

        let w = |i, j| frame.weight(i, j).unwrap();
        assert!((w(10, 20) - 0.75 * 0.25).abs() < 1e-12);
        assert!((w(11, 20) - 0.25 * 0.25).abs() < 1e-12);
        assert!((w(10, 21) - 0.75 * 0.75).abs() < 1e-12);
        assert!((w(11, 21) - 0.25 * 0.75).abs() < 1e-12);
        assert!((frame.total_weight() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bilinear_on_pixel_corner() {
        let frame = Frame::new(8, 8, AccumulationMode::Relaxed).unwrap();
        frame.add_bilinear(Vec2f::new(0.5, 0.25), Color::splat(2.0));

        // Exactly on (4, 2): all weight lands there
        assert_eq!(frame.weight(4, 2), Some(1.0));
        assert_eq!(frame.average(4, 2), Some(Color::splat(2.0)));
        assert_eq!(frame.total_weight(), 1.0);
    }

    #[test]
    fn test_bilinear_clips_at_border() {
        let frame = Frame::new(4, 4, AccumulationMode::Relaxed).unwrap();
        // Past the right/bottom edge: only the in-frame corner remains
        frame.add_bilinear(Vec2f::new(3.5 / 4.0, 3.5 / 4.0), Color::ONE);
        assert!((frame.total_weight() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_bilinear_far_outside_is_dropped() {
        let frame = Frame::new(4, 4, AccumulationMode::Strict).unwrap();
        let far = [
            Vec2f::new(1e30, 0.5),
            Vec2f::new(0.5, -1e30),
            Vec2f::new(Float::INFINITY, 0.5),
            Vec2f::new(0.5, Float::NEG_INFINITY),
            Vec2f::new(Float::NAN, 0.5),
            Vec2f::new(-2.0, -2.0),
            Vec2f::new(1.0, 0.5),
        ];
        for uv in far {
            frame.add_bilinear(uv, Color::ONE);
        }
        assert_eq!(frame.total_weight(), 0.0);
    }

    #[test]
    fn test_bilinear_just_left_of_frame() {
        let frame = Frame::new(4, 4, AccumulationMode::Strict).unwrap();
        // x = -0.25, y = 2.0: only column 0 is inside
        frame.add_bilinear(Vec2f::new(-0.25 / 4.0, 0.5), Color::ONE);

        assert_eq!(frame.weight(0, 2), Some(0.75));
        assert!((frame.total_weight() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_strict_concurrent_writers() {
        let frame = Frame::new(2, 1, AccumulationMode::Strict).unwrap();
        let threads = 8;
        let per_thread = 2000;

        std::thread::scope(|scope| {
            for t in 0..threads {
                let frame = &frame;
                scope.spawn(move || {
                    for _ in 0..per_thread {
                        frame.add_sample(0, 0, Color::splat(t as Float), 1.0);
                        frame.add_sample(1, 0, Color::ONE, 0.5);
                    }
                });
            }
        });

        // No update is lost under strict accumulation
        assert_eq!(frame.weight(0, 0), Some((threads * per_thread) as Float));
        assert_eq!(frame.weight(1, 0), Some((threads * per_thread) as Float * 0.5));

        let mean = (0..threads).sum::<i32>() as Float / threads as Float;
        assert!(approx(frame.average(0, 0).unwrap(), Color::splat(mean), 1e-9));
        assert!(approx(frame.average(1, 0).unwrap(), Color::ONE, 1e-12));
    }

    #[test]
    fn test_relaxed_concurrent_writers_stay_finite() {
        let frame = Frame::new(4, 4, AccumulationMode::Relaxed).unwrap();

        std::thread::scope(|scope| {
            for t in 0..4u64 {
                let frame = &frame;
                scope.spawn(move || {
                    let mut sampler = Sampler::new(t);
                    for _ in 0..5000 {
                        frame.add_bilinear(sampler.unit2d(), Color::splat(0.5));
                    }
                });
                scope.spawn(move || {
                    for _ in 0..50 {
                        let pixels = frame.display_pixels();
                        assert_eq!(pixels.len(), 16);
                    }
                });
            }
        });

        // Lost updates are allowed, but every seeded pixel holds the constant value
        for j in 0..4 {
            for i in 0..4 {
                if let Some(avg) = frame.average(i, j) {
                    assert!(approx(avg, Color::splat(0.5), 1e-9));
                }
            }
        }
        assert!(frame.total_weight() > 0.0);
    }
}
