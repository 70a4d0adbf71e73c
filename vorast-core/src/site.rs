//! Seed points for Voronoi cells.

use rand::Rng;

/// Integer pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared distance to another point, widened so it cannot overflow
    pub fn dist_sq(&self, other: &Point) -> i64 {
        let dx = self.x as i64 - other.x as i64;
        let dy = self.y as i64 - other.y as i64;
        dx * dx + dy * dy
    }
}

/// Place `count` seeds uniformly at random in [0, width) × [0, height).
///
/// Coincident seeds are allowed; the later one simply owns no pixels.
/// Both dimensions must be non-zero and fit in an `i32`.
pub fn generate_seeds<R: Rng + ?Sized>(
    count: usize,
    width: u32,
    height: u32,
    rng: &mut R,
) -> Vec<Point> {
    (0..count)
        .map(|_| {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            Point::new(x as i32, y as i32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_dist_sq() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert_eq!(a.dist_sq(&b), 25);
        assert_eq!(b.dist_sq(&a), 25);
        assert_eq!(a.dist_sq(&a), 0);

        let far = Point::new(i32::MAX, i32::MAX);
        assert_eq!(far.dist_sq(&a), 2 * (i32::MAX as i64).pow(2));
    }

    #[test]
    fn test_seeds_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let seeds = generate_seeds(1000, 37, 11, &mut rng);
        assert_eq!(seeds.len(), 1000);
        for s in &seeds {
            assert!((0..37).contains(&s.x), "x out of range: {:?}", s);
            assert!((0..11).contains(&s.y), "y out of range: {:?}", s);
        }
    }

    #[test]
    fn test_single_pixel_image_stacks_seeds() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let seeds = generate_seeds(5, 1, 1, &mut rng);
        assert!(seeds.iter().all(|&s| s == Point::new(0, 0)));
    }

    #[test]
    fn test_seeds_reproducible() {
        let a = generate_seeds(50, 640, 480, &mut ChaCha8Rng::seed_from_u64(42));
        let b = generate_seeds(50, 640, 480, &mut ChaCha8Rng::seed_from_u64(42));
        let c = generate_seeds(50, 640, 480, &mut ChaCha8Rng::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
