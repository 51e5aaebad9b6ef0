//! Self-localization from bearing/range landmark sightings.
//!
//! Every usable flag contributes candidate positions on the circle of the
//! observed radius around its surveyed coordinate. The candidates are pooled
//! and clustered with k-means. The densest cluster, trimmed of stray circle
//! points, is taken as our position.

use crate::math::{angle_between_points, mean_angle, normalize_absolute, Vec2};
use crate::world::landmarks::{self, FIELD_MAX_X, FIELD_MAX_Y, FIELD_MIN_X, FIELD_MIN_Y};
use crate::world::percept::Flag;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

pub const DEFAULT_ANGLE_STEP: u32 = 36;
pub const CLUSTER_ITERATIONS: usize = 15;

/// The winning cluster is trimmed until every candidate lies this close to
/// its centroid, keeping at least `TRIM_MIN_POINTS`.
const TRIM_RADIUS: f32 = 1.0;
const TRIM_MIN_POINTS: usize = 3;

/// Flags closer than this to our estimate give no usable bearing.
const MIN_BEARING_DISTANCE: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub center: Vec2,
    pub points: Vec<Vec2>,
}

/// Projects every usable flag's distance around its true coordinate every
/// `angle_step` degrees, keeping only points on the field.
pub fn candidate_points(flags: &[Flag], angle_step: u32) -> Vec<Vec2> {
    let step = angle_step.clamp(1, 360) as usize;
    let mut points = Vec::new();

    for flag in flags {
        let (distance, coords) = match (flag.polar.distance, landmarks::flag_coords(&flag.flag_id)) {
            (Some(distance), Some(coords)) => (distance, coords),
            _ => continue,
        };

        for angle in (0..360).step_by(step) {
            let candidate = coords.project(distance, angle as f32);
            if landmarks::in_field(candidate) {
                points.push(candidate);
            }
        }
    }

    points
}

fn initial_center_count(points: usize) -> usize {
    let count = ((points / 2) as f64).sqrt() as usize;
    count.max(1)
}

fn random_centers<R: Rng + ?Sized>(rng: &mut R, count: usize, lo: Vec2, hi: Vec2) -> Vec<Vec2> {
    let xs = Uniform::new_inclusive(lo.x, hi.x);
    let ys = Uniform::new_inclusive(lo.y, hi.y);
    (0..count)
        .map(|_| Vec2::new(xs.sample(rng), ys.sample(rng)))
        .collect()
}

fn centroid(points: &[Vec2]) -> Vec2 {
    let sum = points.iter().fold(Vec2::default(), |acc, p| acc + *p);
    sum / points.len() as f32
}

fn nearest(centers: &[Vec2], point: Vec2) -> usize {
    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for (index, center) in centers.iter().enumerate() {
        let distance = center.distance(&point);
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

fn kmeans(points: &[Vec2], mut centers: Vec<Vec2>, iterations: usize) -> Vec<Cluster> {
    let mut latest = Vec::new();

    for _ in 0..iterations {
        if centers.is_empty() {
            break;
        }

        let mut assigned: Vec<Vec<Vec2>> = vec![Vec::new(); centers.len()];
        for point in points {
            assigned[nearest(&centers, *point)].push(*point);
        }

        // empty clusters are dropped, not re-seeded
        latest = assigned
            .into_iter()
            .filter(|cluster| !cluster.is_empty())
            .map(|cluster| Cluster {
                center: centroid(&cluster),
                points: cluster,
            })
            .collect();

        centers = latest.iter().map(|cluster| cluster.center).collect();
    }

    latest
}

/// Clusters `points` with k-means: floor(sqrt(n/2)) random initial centers
/// inside the field, a fixed number of iterations, empty clusters dropped.
pub fn cluster_points<R: Rng + ?Sized>(points: &[Vec2], rng: &mut R, iterations: usize) -> Vec<Cluster> {
    if points.is_empty() {
        return Vec::new();
    }

    let centers = random_centers(
        rng,
        initial_center_count(points.len()),
        Vec2::new(FIELD_MIN_X, FIELD_MIN_Y),
        Vec2::new(FIELD_MAX_X, FIELD_MAX_Y),
    );
    kmeans(points, centers, iterations)
}

/// The cluster with the most points; the first one wins ties.
pub fn largest(clusters: Vec<Cluster>) -> Option<Cluster> {
    let mut best: Option<Cluster> = None;
    for cluster in clusters {
        let better = match &best {
            Some(current) => cluster.points.len() > current.points.len(),
            None => true,
        };
        if better {
            best = Some(cluster);
        }
    }
    best
}

fn farthest(points: &[Vec2], from: Vec2) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, point) in points.iter().enumerate() {
        let distance = point.distance(&from);
        if best.map(|(_, d)| distance > d).unwrap_or(true) {
            best = Some((index, distance));
        }
    }
    best
}

/// Drops the candidate farthest from the centroid one at a time, so that
/// circle points merely sharing the cluster stop pulling the estimate.
fn trim(mut best: Cluster) -> Cluster {
    while best.points.len() > TRIM_MIN_POINTS {
        match farthest(&best.points, best.center) {
            Some((index, distance)) if distance > TRIM_RADIUS => {
                best.points.remove(index);
                best.center = centroid(&best.points);
            }
            _ => break,
        }
    }
    best
}

/// Best guess of our absolute position, or None when no flag yields an
/// on-field candidate.
pub fn triangulate_position<R: Rng + ?Sized>(flags: &[Flag], angle_step: u32, rng: &mut R) -> Option<Vec2> {
    let points = candidate_points(flags, angle_step);
    let best = largest(cluster_points(&points, rng, CLUSTER_ITERATIONS))?;
    Some(trim(best).center)
}

/// Absolute neck direction implied by the flags, averaged over all of them.
pub fn triangulate_direction(flags: &[Flag], position: Vec2) -> Option<f32> {
    let estimates: Vec<f32> = flags
        .iter()
        .filter(|flag| flag.polar.distance.is_some())
        .filter_map(|flag| {
            let coords = landmarks::flag_coords(&flag.flag_id)?;
            if position.distance(&coords) < MIN_BEARING_DISTANCE {
                return None;
            }
            let bearing = flag.polar.direction?;
            Some(normalize_absolute(angle_between_points(position, coords) - bearing))
        })
        .collect();

    mean_angle(&estimates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::normalize_relative;
    use crate::world::percept::Polar;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bounding_box(points: &[Vec2]) -> (Vec2, Vec2) {
        points.iter().fold(
            (Vec2::new(f32::INFINITY, f32::INFINITY), Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY)),
            |(lo, hi), p| {
                (
                    Vec2::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Vec2::new(hi.x.max(p.x), hi.y.max(p.y)),
                )
            },
        )
    }

    /// A noiseless sighting of `flag_id` from `position` looking along `neck`.
    fn sight(flag_id: &str, position: Vec2, neck: f32) -> Flag {
        let coords = landmarks::flag_coords(flag_id).unwrap();
        Flag {
            polar: Polar::new(
                position.distance(&coords),
                normalize_relative(angle_between_points(position, coords) - neck),
            ),
            flag_id: flag_id.to_owned(),
        }
    }

    #[test]
    fn candidates_are_bounded_and_on_field() {
        let flags = vec![sight("c", Vec2::new(10.0, 5.0), 0.0), sight("tl50", Vec2::new(10.0, 5.0), 0.0)];
        let points = candidate_points(&flags, DEFAULT_ANGLE_STEP);
        assert!(points.len() <= flags.len() * 10);
        assert!(points.iter().all(|p| landmarks::in_field(*p)));
    }

    #[test]
    fn unusable_flags_contribute_nothing() {
        let flags = vec![
            Flag {
                polar: Polar::direction_only(12.0),
                flag_id: "c".to_owned(),
            },
            Flag {
                polar: Polar::new(5.0, 0.0),
                flag_id: "nowhere".to_owned(),
            },
        ];
        assert!(candidate_points(&flags, DEFAULT_ANGLE_STEP).is_empty());

        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(triangulate_position(&flags, DEFAULT_ANGLE_STEP, &mut rng), None);
        assert_eq!(triangulate_direction(&flags, Vec2::new(0.0, 0.0)), None);
    }

    #[test]
    fn clustering_is_deterministic_for_a_seed() {
        let position = Vec2::new(-12.0, 8.0);
        let flags: Vec<Flag> = ["c", "plt", "tl20", "ct", "glt"]
            .iter()
            .map(|id| sight(id, position, 30.0))
            .collect();
        let points = candidate_points(&flags, DEFAULT_ANGLE_STEP);

        let first = cluster_points(&points, &mut StdRng::seed_from_u64(42), CLUSTER_ITERATIONS);
        let second = cluster_points(&points, &mut StdRng::seed_from_u64(42), CLUSTER_ITERATIONS);
        assert!(!first.is_empty());
        assert_eq!(first, second);

        let total: usize = first.iter().map(|c| c.points.len()).sum();
        assert_eq!(total, points.len());
    }

    #[test]
    fn cluster_centers_are_the_mean_of_their_points() {
        let flags: Vec<Flag> = ["c", "plt", "tl20", "ct"]
            .iter()
            .map(|id| sight(id, Vec2::new(-12.0, 8.0), 0.0))
            .collect();
        let points = candidate_points(&flags, DEFAULT_ANGLE_STEP);

        let clusters = cluster_points(&points, &mut StdRng::seed_from_u64(5), CLUSTER_ITERATIONS);
        for cluster in &clusters {
            let mean = centroid(&cluster.points);
            assert!(cluster.center.distance(&mean) < 1e-4, "{:?} vs {:?}", cluster.center, mean);
        }

        let best = largest(clusters.clone()).unwrap();
        assert!(clusters.iter().all(|c| c.points.len() <= best.points.len()));
    }

    #[test]
    fn estimate_stays_inside_the_largest_cluster() {
        let position = Vec2::new(0.0, 0.0);
        let flags: Vec<Flag> = ["c", "plc", "prc"].iter().map(|id| sight(id, position, 0.0)).collect();
        let points = candidate_points(&flags, DEFAULT_ANGLE_STEP);

        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let best = largest(cluster_points(&points, &mut rng, CLUSTER_ITERATIONS)).unwrap();
            let (lo, hi) = bounding_box(&best.points);
            let trimmed = trim(best).center;

            let estimate = triangulate_position(&flags, DEFAULT_ANGLE_STEP, &mut StdRng::seed_from_u64(seed)).unwrap();
            assert_eq!(estimate, trimmed);
            assert!(estimate.x >= lo.x - 1e-4 && estimate.x <= hi.x + 1e-4, "seed {}: {:?}", seed, estimate);
            assert!(estimate.y >= lo.y - 1e-4 && estimate.y <= hi.y + 1e-4, "seed {}: {:?}", seed, estimate);
        }
    }

    #[test]
    fn empty_input_yields_no_clusters() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(cluster_points(&[], &mut rng, CLUSTER_ITERATIONS).is_empty());
    }

    #[test]
    fn largest_prefers_first_on_ties() {
        let a = Cluster {
            center: Vec2::new(1.0, 1.0),
            points: vec![Vec2::new(1.0, 1.0)],
        };
        let b = Cluster {
            center: Vec2::new(2.0, 2.0),
            points: vec![Vec2::new(2.0, 2.0)],
        };
        assert_eq!(largest(vec![a.clone(), b]), Some(a));
    }

    #[test]
    fn trimming_discards_far_candidates() {
        let mut points = vec![Vec2::new(-54.5, 0.0); 3];
        points.extend([Vec2::new(-55.55, 3.23), Vec2::new(-58.3, 5.23), Vec2::new(-60.0, 5.5)]);
        let cluster = Cluster {
            center: centroid(&points),
            points,
        };

        let trimmed = trim(cluster);
        assert_eq!(trimmed.points.len(), 3);
        assert!(trimmed.center.distance(&Vec2::new(-54.5, 0.0)) < 1e-4);

        let tight = Cluster {
            center: Vec2::new(0.25, 0.0),
            points: vec![Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.0), Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.0)],
        };
        assert_eq!(trim(tight.clone()), tight);
    }

        fn assert_converges(position: Vec2, flag_ids: &[&str]) {
        let flags: Vec<Flag> = flag_ids.iter().map(|id| sight(id, position, 0.0)).collect();
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let estimate = triangulate_position(&flags, DEFAULT_ANGLE_STEP, &mut rng).unwrap();
            assert!(
                estimate.distance(&position) < 1.0,
                "seed {} estimated {:?} for {:?}",
                seed,
                estimate,
                position
            );
        }
    }

    #[test]
    fn triangulation_converges_on_center_spot() {
        assert_converges(Vec2::new(0.0, 0.0), &["c", "plc", "prc"]);
    }

    #[test]
    fn triangulation_converges_in_front_of_goal() {
        assert_converges(Vec2::new(-54.5, 0.0), &["r0", "l0", "gr"]);
    }

    #[test]
    fn direction_recovers_neck_heading() {
        let position = Vec2::new(20.0, -10.0);
        let flags: Vec<Flag> = ["c", "prb", "br20", "rb10"]
            .iter()
            .map(|id| sight(id, position, 75.0))
            .collect();
        let neck = triangulate_direction(&flags, position).unwrap();
        assert!((neck - 75.0).abs() < 0.01, "neck was {}", neck);
    }

    #[test]
    fn heading_survives_bearing_noise() {
        use rand_distr::Normal;

        let position = Vec2::new(-15.0, 12.0);
        let noise = Normal::new(0.0, 1.0).unwrap();
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let flags: Vec<Flag> = ["c", "ct", "plt", "tl30"]
                .iter()
                .map(|id| {
                    let mut flag = sight(id, position, 200.0);
                    flag.polar.direction = flag.polar.direction.map(|d| d + noise.sample(&mut rng));
                    flag
                })
                .collect();

            let neck = triangulate_direction(&flags, position).unwrap();
            assert!(normalize_relative(neck - 200.0).abs() < 3.0, "seed {} gave neck {}", seed, neck);
        }
    }

    #[test]
    fn flag_under_our_feet_is_ignored_for_heading() {
        let position = Vec2::new(0.0, 0.0);
        let mut flags: Vec<Flag> = ["plc", "prc", "ct"].iter().map(|id| sight(id, position, 30.0)).collect();
        flags.push(Flag {
            polar: Polar::new(0.0, 123.0),
            flag_id: "c".to_owned(),
        });
        let neck = triangulate_direction(&flags, Vec2::new(0.0, 1e-6)).unwrap();
        assert!((neck - 30.0).abs() < 0.01, "neck was {}", neck);
    }
}
