use std::f64::consts::PI;

use fit_kernel::{BoundingBox, Point3d, Transform, Vec3};
use fitment_ops::{FitmentError, SuspensionGeometryModel, TireEnvelope};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A triangle mesh for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Vertex normals [nx, ny, nz, ...]
    pub normals: Vec<f32>,
    /// Triangle indices [i0, i1, i2, ...]
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn add_vertex(&mut self, pos: Point3d, normal: Vec3) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions.extend([pos.x as f32, pos.y as f32, pos.z as f32]);
        self.normals.extend([normal.x as f32, normal.y as f32, normal.z as f32]);
        idx
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend([i0, i1, i2]);
    }

    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|&idx| idx + offset));
    }

    pub fn vertex(&self, index: usize) -> Point3d {
        let p = &self.positions[3 * index..3 * index + 3];
        Point3d::new(p[0] as f64, p[1] as f64, p[2] as f64)
    }

    pub fn normal(&self, index: usize) -> Vec3 {
        let n = &self.normals[3 * index..3 * index + 3];
        Vec3::new(n[0] as f64, n[1] as f64, n[2] as f64)
    }

    /// Rigidly move every vertex and normal.
    pub fn transformed(&self, t: &Transform) -> TriangleMesh {
        let mut mesh = TriangleMesh {
            indices: self.indices.clone(),
            ..TriangleMesh::default()
        };
        for i in 0..self.vertex_count() {
            mesh.add_vertex(t.transform_point(&self.vertex(i)), t.transform_vector(&self.normal(i)));
        }
        mesh
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let points: Vec<Point3d> = (0..self.vertex_count()).map(|i| self.vertex(i)).collect();
        BoundingBox::from_points(&points)
    }
}

/// Every profile point swept around the spin axis, ring by ring, in the
/// tire frame.
pub fn envelope_point_cloud(envelope: &TireEnvelope, segments: usize) -> Result<Vec<Point3d>, FitmentError> {
    Ok(envelope.revolve(segments)?.into_iter().flatten().collect())
}

/// Tessellate the revolved envelope in the tire frame.
///
/// Rings follow the profile from the outboard bead round to the inboard
/// bead; neighbouring rings are stitched with two triangles per segment,
/// wound so the normals face away from the tire. The bead opening is left
/// open where the wheel sits.
pub fn tessellate_envelope(envelope: &TireEnvelope, segments: usize) -> Result<TriangleMesh, FitmentError> {
    let rings = envelope.revolve(segments)?;
    let profile = envelope.points();
    let mut mesh = TriangleMesh::new();

    for (i, ring) in rings.iter().enumerate() {
        let prev = profile[i.saturating_sub(1)];
        let next = profile[(i + 1).min(profile.len() - 1)];
        // Rotate the profile tangent a quarter turn to point out of the tire.
        let (dr, da) = (next.radius - prev.radius, next.axial - prev.axial);
        let len = (dr * dr + da * da).sqrt().max(f64::EPSILON);
        let (nr, na) = (-da / len, dr / len);

        for (j, point) in ring.iter().enumerate() {
            let theta = 2.0 * PI * j as f64 / segments as f64;
            let normal = Vec3::new(nr * theta.cos(), na, nr * theta.sin());
            mesh.add_vertex(*point, normal);
        }
    }

    let seg = segments as u32;
    for i in 0..rings.len().saturating_sub(1) as u32 {
        for j in 0..seg {
            let j1 = (j + 1) % seg;
            let a = i * seg + j;
            let b = i * seg + j1;
            let c = (i + 1) * seg + j1;
            let d = (i + 1) * seg + j;
            mesh.add_triangle(a, b, c);
            mesh.add_triangle(a, c, d);
        }
    }

    debug!(vertices = mesh.vertex_count(), triangles = mesh.triangle_count(), "envelope tessellated");
    Ok(mesh)
}

/// Tessellate the envelope and place it with `tire_to_corner`, the
/// transform from the tire frame into the corner frame.
pub fn tessellate_envelope_posed(
    envelope: &TireEnvelope,
    segments: usize,
    tire_to_corner: &Transform,
) -> Result<TriangleMesh, FitmentError> {
    Ok(tessellate_envelope(envelope, segments)?.transformed(tire_to_corner))
}

/// Tessellate the envelope where the suspension puts it at `travel_mm`
/// with the wheel steered by `steering_deg`.
pub fn tessellate_envelope_at(
    envelope: &TireEnvelope,
    model: &SuspensionGeometryModel,
    travel_mm: f64,
    steering_deg: f64,
    segments: usize,
) -> Result<TriangleMesh, FitmentError> {
    model.check_steering(steering_deg)?;
    let pose = model.sample_at(travel_mm)?;
    let hub = model.hub_transform(&pose, steering_deg);
    let tire = Transform::translation(0.0, envelope.wheel_offset_mm(), 0.0).then(&hub);
    tessellate_envelope_posed(envelope, segments, &tire)
}
