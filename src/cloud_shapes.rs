//! Point generators for the synthetic test datasets: a noise cloud filling
//! a box, and the structure shapes the viewer's selection tasks look for
//! (a coiled spring, a solid ball). Every generator draws from a
//! caller-supplied random source so dataset files can be regenerated
//! byte-for-byte from a seed.

use crate::cloud_data_format::Point3;
use rand::Rng;
use std::f32::consts::PI;

/// `count` points uniformly distributed in the axis-aligned box spanning
/// `center ± semiaxes`.
pub fn uniform_box(
    rng: &mut impl Rng,
    count: usize,
    center: Point3,
    semiaxes: Point3,
) -> Vec<Point3> {
    (0..count)
        .map(|_| {
            [
                rng.gen_range(center[0] - semiaxes[0]..center[0] + semiaxes[0]),
                rng.gen_range(center[1] - semiaxes[1]..center[1] + semiaxes[1]),
                rng.gen_range(center[2] - semiaxes[2]..center[2] + semiaxes[2]),
            ]
        })
        .collect()
}

/// `count` points on the surface of a spring: a tube of radius
/// `small_radius` coiled `nb_round` times around the z axis at distance
/// `big_radius`, stretched so the whole coil spans `length` along z.
///
/// Formula: <https://en.wikipedia.org/wiki/Spring_(mathematics)>
pub fn spring(
    rng: &mut impl Rng,
    count: usize,
    small_radius: f32,
    big_radius: f32,
    length: f32,
    nb_round: u32,
) -> Vec<Point3> {
    // Pitch chosen so the coil ends at the requested length.
    let pitch = (length - small_radius) / (2.0 * nb_round as f32);

    (0..count)
        .map(|_| {
            let v = rng.gen_range(0.0..PI);
            let u = rng.gen_range(0.0..2.0 * nb_round as f32 * PI);

            [
                (big_radius + small_radius * v.cos()) * u.cos(),
                (big_radius + small_radius * v.cos()) * u.sin(),
                small_radius * v.sin() + pitch * u / PI,
            ]
        })
        .collect()
}

/// `count` points uniformly distributed inside a ball of radius `radius`
/// around `center`, by rejection from the surrounding box.
pub fn ball(rng: &mut impl Rng, count: usize, center: Point3, radius: f32) -> Vec<Point3> {
    let mut points = Vec::with_capacity(count);
    while points.len() < count {
        let x = rng.gen_range(-radius..radius);
        let y = rng.gen_range(-radius..radius);
        let z = rng.gen_range(-radius..radius);
        if x * x + y * y + z * z <= radius * radius {
            points.push([center[0] + x, center[1] + y, center[2] + z]);
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn uniform_box_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let points = uniform_box(&mut rng, 1000, [0.0, 0.0, 0.0], [0.5, 0.5, 0.5]);
        assert_eq!(points.len(), 1000);
        for p in points {
            assert!(p.iter().all(|c| c.abs() <= 0.5));
        }
    }

    #[test]
    fn spring_stays_within_its_radii_and_length() {
        let mut rng = StdRng::seed_from_u64(2);
        let (small, big, length, rounds) = (0.10, 0.25, 1.0, 3);
        let points = spring(&mut rng, 1000, small, big, length, rounds);
        assert_eq!(points.len(), 1000);
        for p in points {
            let radial = (p[0] * p[0] + p[1] * p[1]).sqrt();
            assert!(radial >= big - small - 1e-5);
            assert!(radial <= big + small + 1e-5);
            assert!(p[2] >= -small - 1e-5);
            assert!(p[2] <= length + 1e-5);
        }
    }

    #[test]
    fn ball_stays_within_its_radius() {
        let mut rng = StdRng::seed_from_u64(3);
        let points = ball(&mut rng, 500, [1.0, 0.0, 0.0], 0.25);
        assert_eq!(points.len(), 500);
        for p in points {
            let dx = p[0] - 1.0;
            let d = (dx * dx + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!(d <= 0.25 + 1e-5);
        }
    }

    #[test]
    fn same_seed_same_points() {
        let a = uniform_box(&mut StdRng::seed_from_u64(9), 10, [0.0; 3], [0.5; 3]);
        let b = uniform_box(&mut StdRng::seed_from_u64(9), 10, [0.0; 3], [0.5; 3]);
        assert_eq!(a, b);
    }
}
