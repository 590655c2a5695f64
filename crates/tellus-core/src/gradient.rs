//! Lattice gradient field feeding the noise-synthesis pass.

use glam::Vec3;
use rand::Rng;

/// The 12 cube-edge midpoint directions (unnormalized).
pub const GRADIENT_DIRECTIONS: [[f32; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// `size × size` RGBA texels, row-major, each a unit gradient with w = 0.
pub fn generate_gradient_field<R: Rng>(size: u32, rng: &mut R) -> Vec<[f32; 4]> {
    let count = size as usize * size as usize;
    (0..count)
        .map(|_| {
            let [x, y, z] = GRADIENT_DIRECTIONS[rng.random_range(0..GRADIENT_DIRECTIONS.len())];
            let g = Vec3::new(x, y, z).normalize();
            [g.x, g.y, g.z, 0.0]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_field_size() {
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(generate_gradient_field(16, &mut rng).len(), 256);
        assert!(generate_gradient_field(0, &mut rng).is_empty());
    }

    #[test]
    fn test_texels_are_unit_edge_directions() {
        let mut rng = SmallRng::seed_from_u64(42);
        let inv_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
        for texel in generate_gradient_field(32, &mut rng) {
            assert_eq!(texel[3], 0.0);
            let v = Vec3::new(texel[0], texel[1], texel[2]);
            assert!((v.length() - 1.0).abs() < 1e-5, "not unit: {v:?}");
            let zeros = texel[..3].iter().filter(|c| c.abs() < 1e-6).count();
            assert_eq!(zeros, 1, "exactly one zero component: {v:?}");
            for c in &texel[..3] {
                assert!(c.abs() < 1e-6 || (c.abs() - inv_sqrt2).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let a = generate_gradient_field(8, &mut SmallRng::seed_from_u64(3));
        let b = generate_gradient_field(8, &mut SmallRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_uses_many_directions() {
        let field = generate_gradient_field(64, &mut SmallRng::seed_from_u64(11));
        let mut seen = std::collections::HashSet::new();
        for t in &field {
            seen.insert([
                (t[0] * 10.0) as i32,
                (t[1] * 10.0) as i32,
                (t[2] * 10.0) as i32,
            ]);
        }
        assert_eq!(seen.len(), 12);
    }
}
