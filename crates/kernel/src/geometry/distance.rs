//! Minimum distance between convex shapes (Gilbert-Johnson-Keerthi).
//!
//! Works on the Minkowski difference `A - B`: the distance between the
//! shapes is the distance from the origin to that set. Each iteration adds
//! a support point and reduces the simplex to the sub-simplex nearest the
//! origin.

use super::shapes::ConvexShape;
use super::vector::Vec3;
use crate::Tolerance;

const MAX_ITERATIONS: usize = 64;

/// Distance between two convex shapes; `0.0` when they touch or overlap.
pub fn convex_distance<A, B>(a: &A, b: &B) -> f64
where
    A: ConvexShape + ?Sized,
    B: ConvexShape + ?Sized,
{
    convex_distance_with(a, b, &Tolerance::default())
}

/// `true` when the shapes are within `contact` of each other.
pub fn convex_intersects<A, B>(a: &A, b: &B, contact: f64) -> bool
where
    A: ConvexShape + ?Sized,
    B: ConvexShape + ?Sized,
{
    convex_distance(a, b) <= contact
}

pub fn convex_distance_with<A, B>(a: &A, b: &B, tol: &Tolerance) -> f64
where
    A: ConvexShape + ?Sized,
    B: ConvexShape + ?Sized,
{
    let support = |d: &Vec3| a.support(d) - b.support(&-*d);
    let zero_sq = tol.coincidence * tol.coincidence;

    // Interior points are members of A - B, so they can seed the simplex.
    let mut v = a.interior_point() - b.interior_point();
    let mut simplex = Simplex::single(v);
    // Best certified lower bound: v·w / |v| for every support point w.
    let mut lower = 0.0_f64;

    for _ in 0..MAX_ITERATIONS {
        let v_sq = v.length_squared();
        if v_sq <= zero_sq {
            return 0.0;
        }

        let w = support(&-v);
        let vw = v.dot(&w);
        lower = lower.max(vw / v_sq.sqrt());
        if v_sq - vw <= tol.convergence * v_sq {
            return v.length();
        }
        if !simplex.push(w) {
            break;
        }

        let closest = simplex.reduce();
        if simplex.len == 4 {
            return 0.0;
        }
        if closest.length_squared() >= v_sq {
            break;
        }
        v = closest;
    }

    // Stalled without converging: report the lower bound so an overlap is
    // never mistaken for a gap.
    lower
}

/// Up to four points of the Minkowski difference; newest last.
#[derive(Debug, Clone, Copy)]
struct Simplex {
    pts: [Vec3; 4],
    len: usize,
}

impl Simplex {
    fn single(p: Vec3) -> Self {
        Self {
            pts: [p, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO],
            len: 1,
        }
    }

    fn from_slice(pts: &[Vec3]) -> Self {
        let mut s = Self::single(pts[0]);
        for p in &pts[1..] {
            s.pts[s.len] = *p;
            s.len += 1;
        }
        s
    }

    /// Add `w` unless it repeats a vertex.
    fn push(&mut self, w: Vec3) -> bool {
        let scale = w.length_squared().max(1.0);
        let repeated = self.pts[..self.len]
            .iter()
            .any(|p| (*p - w).length_squared() <= 1e-20 * scale);
        if repeated || self.len == 4 {
            return false;
        }
        self.pts[self.len] = w;
        self.len += 1;
        true
    }

    /// Replace the simplex with its sub-simplex nearest the origin and
    /// return the nearest point. A full tetrahedron is kept only when it
    /// encloses the origin.
    fn reduce(&mut self) -> Vec3 {
        let p = self.pts;
        let (closest, reduced) = match self.len {
            1 => (p[0], *self),
            2 => closest_on_segment(p[0], p[1]),
            3 => closest_on_triangle(p[0], p[1], p[2]),
            _ => closest_on_tetrahedron(p[0], p[1], p[2], p[3]),
        };
        *self = reduced;
        closest
    }
}

fn closest_on_segment(a: Vec3, b: Vec3) -> (Vec3, Simplex) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON * a.length_squared().max(1.0) {
        return (a, Simplex::single(a));
    }
    let t = -a.dot(&ab) / len_sq;
    if t <= 0.0 {
        (a, Simplex::single(a))
    } else if t >= 1.0 {
        (b, Simplex::single(b))
    } else {
        (a + ab * t, Simplex::from_slice(&[a, b]))
    }
}

/// Voronoi-region walk (Ericson, Real-Time Collision Detection §5.1.5)
/// with the query point at the origin.
fn closest_on_triangle(a: Vec3, b: Vec3, c: Vec3) -> (Vec3, Simplex) {
    let ab = b - a;
    let ac = c - a;

    let d1 = ab.dot(&-a);
    let d2 = ac.dot(&-a);
    if d1 <= 0.0 && d2 <= 0.0 {
        return (a, Simplex::single(a));
    }

    let d3 = ab.dot(&-b);
    let d4 = ac.dot(&-b);
    if d3 >= 0.0 && d4 <= d3 {
        return (b, Simplex::single(b));
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return closest_on_segment(a, b);
    }

    let d5 = ab.dot(&-c);
    let d6 = ac.dot(&-c);
    if d6 >= 0.0 && d5 <= d6 {
        return (c, Simplex::single(c));
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return closest_on_segment(a, c);
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        return closest_on_segment(b, c);
    }

    let sum = va + vb + vc;
    if sum.abs() <= f64::EPSILON * (ab.length_squared() * ac.length_squared()).max(1.0) {
        // Collinear vertices: fall back to the best edge.
        return [closest_on_segment(a, b), closest_on_segment(a, c), closest_on_segment(b, c)]
            .into_iter()
            .min_by(|x, y| x.0.length_squared().total_cmp(&y.0.length_squared()))
            .unwrap_or((a, Simplex::single(a)));
    }

    let v = vb / sum;
    let w = vc / sum;
    (a + ab * v + ac * w, Simplex::from_slice(&[a, b, c]))
}

fn closest_on_tetrahedron(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> (Vec3, Simplex) {
    // Each face with the vertex opposite to it.
    let faces = [(a, b, c, d), (a, c, d, b), (a, d, b, c), (b, d, c, a)];

    let mut best: Option<(Vec3, Simplex)> = None;
    for (p, q, r, opposite) in faces {
        let n = (q - p).cross(&(r - p));
        let origin_side = n.dot(&-p);
        let opposite_side = n.dot(&(opposite - p));
        let degenerate = opposite_side.abs() <= f64::EPSILON * n.length() * (opposite - p).length();
        if degenerate || origin_side * opposite_side < 0.0 {
            let candidate = closest_on_triangle(p, q, r);
            let better = best
                .as_ref()
                .map_or(true, |(pt, _)| candidate.0.length_squared() < pt.length_squared());
            if better {
                best = Some(candidate);
            }
        }
    }

    // No face separates the origin from the interior: it is enclosed.
    best.unwrap_or((Vec3::ZERO, Simplex::from_slice(&[a, b, c, d])))
}
