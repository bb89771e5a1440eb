//! Parametric solids.
//!
//! Parameter records are validated when they are built, so `mesh()` never
//! produces degenerate geometry. Every generator is a pure function of its
//! parameters: same input, bit-identical output.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::math::mesh::{Mesh, MeshError, Vertex};

fn require_count(shape: &'static str, name: &'static str, got: u32, min: u32) -> Result<(), MeshError> {
    if got < min {
        return Err(MeshError::CountTooSmall {
            shape,
            name,
            min,
            got,
        });
    }
    Ok(())
}

fn require_positive(shape: &'static str, name: &'static str, got: f32) -> Result<(), MeshError> {
    if !(got.is_finite() && got > 0.0) {
        return Err(MeshError::InvalidDimension {
            shape,
            name,
            bound: "> 0",
            got,
        });
    }
    Ok(())
}

fn require_non_negative(shape: &'static str, name: &'static str, got: f32) -> Result<(), MeshError> {
    if !(got.is_finite() && got >= 0.0) {
        return Err(MeshError::InvalidDimension {
            shape,
            name,
            bound: ">= 0",
            got,
        });
    }
    Ok(())
}

/// Rejects parameter sets whose vertex or index totals do not fit the `u32`
/// index buffer.
fn require_fits(shape: &'static str, vertices: u128, indices: u128) -> Result<(), MeshError> {
    let limit = u128::from(u32::MAX);
    if vertices > limit || indices > limit {
        return Err(MeshError::TooLarge {
            shape,
            vertices,
            indices,
        });
    }
    Ok(())
}

/// UV sphere sampled by latitude (stacks) and longitude (sectors). The poles
/// lie on the Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    radius: f32,
    sectors: u32,
    stacks: u32,
}

impl Sphere {
    pub const MIN_SECTORS: u32 = 3;
    /// A single stack spans pole to pole and every quad collapses.
    pub const MIN_STACKS: u32 = 2;

    pub fn new(radius: f32, sectors: u32, stacks: u32) -> Result<Self, MeshError> {
        require_positive("sphere", "radius", radius)?;
        require_count("sphere", "sectors", sectors, Self::MIN_SECTORS)?;
        require_count("sphere", "stacks", stacks, Self::MIN_STACKS)?;
        let (se, st) = (u128::from(sectors), u128::from(stacks));
        require_fits("sphere", (st + 1) * (se + 1), 6 * se * (st - 1))?;
        Ok(Self {
            radius,
            sectors,
            stacks,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn sectors(&self) -> u32 {
        self.sectors
    }

    pub fn stacks(&self) -> u32 {
        self.stacks
    }

    pub fn vertex_count(&self) -> usize {
        ((self.stacks + 1) * (self.sectors + 1)) as usize
    }

    pub fn index_count(&self) -> usize {
        (6 * self.sectors * (self.stacks - 1)) as usize
    }

    pub fn mesh(&self) -> Mesh {
        let Self {
            radius,
            sectors,
            stacks,
        } = *self;
        let mut mesh = Mesh::with_capacity(self.vertex_count(), self.index_count());

        let sector_step = TAU / sectors as f32;
        let stack_step = PI / stacks as f32;
        let inv_radius = 1.0 / radius;

        for i in 0..=stacks {
            let stack_angle = FRAC_PI_2 - i as f32 * stack_step;
            let xy = radius * stack_angle.cos();
            let z = radius * stack_angle.sin();

            for j in 0..=sectors {
                let sector_angle = j as f32 * sector_step;
                let x = xy * sector_angle.cos();
                let y = xy * sector_angle.sin();

                mesh.add_vertex(Vertex::new(
                    [x, y, z],
                    [x * inv_radius, y * inv_radius, z * inv_radius],
                    [j as f32 / sectors as f32, i as f32 / stacks as f32],
                ));
            }
        }

        // The first stack only gets the lower triangle of each quad and the
        // last stack only the upper one; the other halves have zero area.
        for i in 0..stacks {
            let mut k1 = i * (sectors + 1);
            let mut k2 = k1 + sectors + 1;

            for _ in 0..sectors {
                if i != 0 {
                    mesh.add_triangle(k1, k2, k1 + 1);
                }
                if i != stacks - 1 {
                    mesh.add_triangle(k1 + 1, k2, k2 + 1);
                }
                k1 += 1;
                k2 += 1;
            }
        }

        mesh
    }
}

/// Capped cylinder or truncated cone along the Y axis, centred on the origin.
///
/// Side normals are purely radial, which is exact for a right cylinder and
/// an approximation when the radii differ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    base_radius: f32,
    top_radius: f32,
    height: f32,
    sectors: u32,
    stacks: u32,
}

impl Cylinder {
    pub const MIN_SECTORS: u32 = 3;
    pub const MIN_STACKS: u32 = 1;

    pub fn new(
        base_radius: f32,
        top_radius: f32,
        height: f32,
        sectors: u32,
        stacks: u32,
    ) -> Result<Self, MeshError> {
        require_non_negative("cylinder", "base radius", base_radius)?;
        require_non_negative("cylinder", "top radius", top_radius)?;
        if base_radius == 0.0 && top_radius == 0.0 {
            return Err(MeshError::DegenerateCylinder { shape: "cylinder" });
        }
        require_positive("cylinder", "height", height)?;
        require_count("cylinder", "sectors", sectors, Self::MIN_SECTORS)?;
        require_count("cylinder", "stacks", stacks, Self::MIN_STACKS)?;
        let (se, st) = (u128::from(sectors), u128::from(stacks));
        require_fits(
            "cylinder",
            (st + 1) * (se + 1) + 2 * (se + 2),
            6 * se * st + 6 * se,
        )?;
        Ok(Self {
            base_radius,
            top_radius,
            height,
            sectors,
            stacks,
        })
    }

    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    pub fn top_radius(&self) -> f32 {
        self.top_radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn sectors(&self) -> u32 {
        self.sectors
    }

    pub fn stacks(&self) -> u32 {
        self.stacks
    }

    pub fn side_vertex_count(&self) -> usize {
        ((self.stacks + 1) * (self.sectors + 1)) as usize
    }

    pub fn vertex_count(&self) -> usize {
        self.side_vertex_count() + 2 * (self.sectors + 2) as usize
    }

    pub fn index_count(&self) -> usize {
        (6 * self.sectors * self.stacks + 6 * self.sectors) as usize
    }

    pub fn mesh(&self) -> Mesh {
        let Self {
            base_radius,
            top_radius,
            height,
            sectors,
            stacks,
        } = *self;
        let mut mesh = Mesh::with_capacity(self.vertex_count(), self.index_count());

        let sector_step = TAU / sectors as f32;
        let stack_height = height / stacks as f32;
        let radius_step = (top_radius - base_radius) / stacks as f32;

        // Sectors sweep counter-clockwise seen from +Y.
        let rim = |j: u32| {
            let angle = j as f32 * sector_step;
            (angle.cos(), -angle.sin())
        };

        for i in 0..=stacks {
            let radius = base_radius + i as f32 * radius_step;
            let y = -0.5 * height + i as f32 * stack_height;

            for j in 0..=sectors {
                let (cos, sin) = rim(j);
                mesh.add_vertex(Vertex::new(
                    [radius * cos, y, radius * sin],
                    [cos, 0.0, sin],
                    [j as f32 / sectors as f32, i as f32 / stacks as f32],
                ));
            }
        }

        for i in 0..stacks {
            let mut k1 = i * (sectors + 1);
            let mut k2 = k1 + sectors + 1;

            for _ in 0..sectors {
                mesh.add_triangle(k1, k1 + 1, k2);
                mesh.add_triangle(k1 + 1, k2 + 1, k2);
                k1 += 1;
                k2 += 1;
            }
        }

        let top_center = Self::add_cap(&mut mesh, top_radius, 0.5 * height, 1.0, sectors, &rim);
        for j in 0..sectors {
            let edge = top_center + 1 + j;
            mesh.add_triangle(top_center, edge, edge + 1);
        }

        let bottom_center =
            Self::add_cap(&mut mesh, base_radius, -0.5 * height, -1.0, sectors, &rim);
        for j in 0..sectors {
            let edge = bottom_center + 1 + j;
            mesh.add_triangle(bottom_center, edge + 1, edge);
        }

        mesh
    }

    /// Appends a centre vertex followed by `sectors + 1` rim vertices and
    /// returns the centre index.
    fn add_cap(
        mesh: &mut Mesh,
        radius: f32,
        y: f32,
        facing: f32,
        sectors: u32,
        rim: &impl Fn(u32) -> (f32, f32),
    ) -> u32 {
        let normal = [0.0, facing, 0.0];
        let v = if facing > 0.0 { 1.0 } else { 0.0 };

        let center = mesh.add_vertex(Vertex::new([0.0, y, 0.0], normal, [0.5, 0.5]));
        for j in 0..=sectors {
            let (cos, sin) = rim(j);
            mesh.add_vertex(Vertex::new(
                [radius * cos, y, radius * sin],
                normal,
                [j as f32 / sectors as f32, v],
            ));
        }
        center
    }
}

/// Torus around the Z axis. `outer_radius` is the distance from the centre
/// to the middle of the tube, `inner_radius` the radius of the tube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    outer_radius: f32,
    inner_radius: f32,
    rings: u32,
    sides: u32,
}

impl Torus {
    pub const MIN_RINGS: u32 = 3;
    pub const MIN_SIDES: u32 = 3;

    pub fn new(outer_radius: f32, inner_radius: f32, rings: u32, sides: u32) -> Result<Self, MeshError> {
        require_positive("torus", "outer radius", outer_radius)?;
        require_positive("torus", "inner radius", inner_radius)?;
        require_count("torus", "rings", rings, Self::MIN_RINGS)?;
        require_count("torus", "sides", sides, Self::MIN_SIDES)?;
        let (r, s) = (u128::from(rings), u128::from(sides));
        require_fits("torus", (r + 1) * (s + 1), 6 * r * s)?;
        Ok(Self {
            outer_radius,
            inner_radius,
            rings,
            sides,
        })
    }

    pub fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    pub fn rings(&self) -> u32 {
        self.rings
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn vertex_count(&self) -> usize {
        ((self.rings + 1) * (self.sides + 1)) as usize
    }

    pub fn index_count(&self) -> usize {
        (6 * self.rings * self.sides) as usize
    }

    pub fn mesh(&self) -> Mesh {
        let Self {
            outer_radius,
            inner_radius,
            rings,
            sides,
        } = *self;
        let mut mesh = Mesh::with_capacity(self.vertex_count(), self.index_count());

        for i in 0..=rings {
            let ring_angle = i as f32 / rings as f32 * TAU;
            let (sin_ring, cos_ring) = ring_angle.sin_cos();

            for j in 0..=sides {
                let side_angle = j as f32 / sides as f32 * TAU;
                let (sin_side, cos_side) = side_angle.sin_cos();

                let reach = outer_radius + inner_radius * cos_side;
                mesh.add_vertex(Vertex::new(
                    [reach * cos_ring, reach * sin_ring, inner_radius * sin_side],
                    [cos_ring * cos_side, sin_ring * cos_side, sin_side],
                    [i as f32 / rings as f32, j as f32 / sides as f32],
                ));
            }
        }

        for i in 0..rings {
            for j in 0..sides {
                let first = i * (sides + 1) + j;
                let second = first + sides + 1;

                mesh.add_triangle(first, second, first + 1);
                mesh.add_triangle(second, second + 1, first + 1);
            }
        }

        mesh
    }
}

/// Unit cube centred on the origin, four vertices per face so each face
/// keeps its own normal and texture coordinates.
pub fn cube() -> Mesh {
    const H: f32 = 0.5;
    const UV: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    // Corners listed counter-clockwise as seen from outside the face.
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0], [[-H, -H, H], [H, -H, H], [H, H, H], [-H, H, H]]),
        ([0.0, 0.0, -1.0], [[H, -H, -H], [-H, -H, -H], [-H, H, -H], [H, H, -H]]),
        ([-1.0, 0.0, 0.0], [[-H, -H, -H], [-H, -H, H], [-H, H, H], [-H, H, -H]]),
        ([1.0, 0.0, 0.0], [[H, -H, H], [H, -H, -H], [H, H, -H], [H, H, H]]),
        ([0.0, 1.0, 0.0], [[-H, H, H], [H, H, H], [H, H, -H], [-H, H, -H]]),
        ([0.0, -1.0, 0.0], [[-H, -H, -H], [H, -H, -H], [H, -H, H], [-H, -H, H]]),
    ];

    let mut mesh = Mesh::with_capacity(24, 36);
    for (normal, corners) in faces {
        let base = mesh.vertex_count() as u32;
        for (corner, uv) in corners.into_iter().zip(UV) {
            mesh.add_vertex(Vertex::new(corner, normal, uv));
        }
        mesh.add_triangle(base, base + 1, base + 2);
        mesh.add_triangle(base, base + 2, base + 3);
    }
    mesh
}

/// Unit square on the XZ plane facing +Y.
pub fn plane() -> Mesh {
    const UP: [f32; 3] = [0.0, 1.0, 0.0];

    Mesh::from_parts(
        vec![
            Vertex::new([-0.5, 0.0, -0.5], UP, [0.0, 0.0]),
            Vertex::new([0.5, 0.0, -0.5], UP, [1.0, 0.0]),
            Vertex::new([0.5, 0.0, 0.5], UP, [1.0, 1.0]),
            Vertex::new([-0.5, 0.0, 0.5], UP, [0.0, 1.0]),
        ],
        vec![0, 2, 1, 0, 3, 2],
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Cube,
    Plane,
    Sphere(Sphere),
    Cylinder(Cylinder),
    Torus(Torus),
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Cube => "cube",
            Shape::Plane => "plane",
            Shape::Sphere(_) => "sphere",
            Shape::Cylinder(_) => "cylinder",
            Shape::Torus(_) => "torus",
        }
    }

    pub fn mesh(&self) -> Mesh {
        let mesh = match self {
            Shape::Cube => cube(),
            Shape::Plane => plane(),
            Shape::Sphere(sphere) => sphere.mesh(),
            Shape::Cylinder(cylinder) => cylinder.mesh(),
            Shape::Torus(torus) => torus.mesh(),
        };
        log::trace!(
            "generated {}: {} vertices, {} triangles",
            self.name(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        mesh
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Cylinder> for Shape {
    fn from(cylinder: Cylinder) -> Self {
        Shape::Cylinder(cylinder)
    }
}

impl From<Torus> for Shape {
    fn from(torus: Torus) -> Self {
        Shape::Torus(torus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const EPS: f32 = 1e-5;

    fn position(mesh: &Mesh, index: u32) -> Vec3 {
        Vec3::from(mesh.vertices[index as usize].position)
    }

    fn normal(mesh: &Mesh, index: u32) -> Vec3 {
        Vec3::from(mesh.vertices[index as usize].normal)
    }

    fn face_normal(mesh: &Mesh, [a, b, c]: [u32; 3]) -> Vec3 {
        let (a, b, c) = (position(mesh, a), position(mesh, b), position(mesh, c));
        (b - a).cross(c - a)
    }

    /// Every non-degenerate triangle must face the same way as its vertex normals.
    fn assert_outward(mesh: &Mesh) {
        for tri in mesh.triangles() {
            let face = face_normal(mesh, tri);
            if face.length() < 1e-9 {
                continue;
            }
            let avg = normal(mesh, tri[0]) + normal(mesh, tri[1]) + normal(mesh, tri[2]);
            assert!(face.dot(avg) > 0.0, "triangle {tri:?} faces inward");
        }
    }

    fn assert_unit_normals(mesh: &Mesh) {
        for v in &mesh.vertices {
            let len = Vec3::from(v.normal).length();
            assert!((len - 1.0).abs() < EPS, "normal length {len}");
        }
    }

    #[test]
    fn test_sphere_example_counts() {
        let mesh = Sphere::new(1.0, 4, 2).unwrap().mesh();
        assert_eq!(mesh.vertex_count(), 15);
        assert_eq!(mesh.triangle_count(), 8);
        assert_unit_normals(&mesh);
    }

    #[test]
    fn test_sphere_counts_follow_formula() {
        for sectors in 3..12 {
            for stacks in 2..10 {
                let sphere = Sphere::new(0.5, sectors, stacks).unwrap();
                let mesh = sphere.mesh();
                assert_eq!(mesh.vertex_count(), ((stacks + 1) * (sectors + 1)) as usize);
                // Two triangles per interior quad, one per polar quad.
                let expected = 2 * sectors * (stacks - 2) + 2 * sectors;
                assert_eq!(mesh.triangle_count(), expected as usize);
                assert_eq!(mesh.index_count(), sphere.index_count());
                assert!(mesh.validate().is_ok());
            }
        }
    }

    #[test]
    fn test_sphere_positions_on_surface() {
        let mesh = Sphere::new(2.5, 36, 18).unwrap().mesh();
        for v in &mesh.vertices {
            assert!((Vec3::from(v.position).length() - 2.5).abs() < 1e-4);
        }
        assert_unit_normals(&mesh);
        assert_outward(&mesh);
    }

    #[test]
    fn test_sphere_poles_and_tex_coords() {
        let mesh = Sphere::new(1.0, 8, 4).unwrap().mesh();
        let north = mesh.vertices[0];
        let south = mesh.vertices[mesh.vertex_count() - 1];
        assert!((north.position[2] - 1.0).abs() < EPS);
        assert!((south.position[2] + 1.0).abs() < EPS);
        assert_eq!(north.tex_coord, [0.0, 0.0]);
        assert_eq!(south.tex_coord, [1.0, 1.0]);
    }

    #[test]
    fn test_sphere_rejects_bad_parameters() {
        assert!(matches!(
            Sphere::new(1.0, 2, 4),
            Err(MeshError::CountTooSmall { name: "sectors", .. })
        ));
        assert!(matches!(
            Sphere::new(1.0, 8, 1),
            Err(MeshError::CountTooSmall { name: "stacks", .. })
        ));
        assert!(matches!(
            Sphere::new(-1.0, 8, 4),
            Err(MeshError::InvalidDimension { name: "radius", .. })
        ));
        assert!(Sphere::new(f32::NAN, 8, 4).is_err());
        assert!(Sphere::new(0.0, 8, 4).is_err());
    }

    #[test]
    fn test_oversized_counts_are_rejected() {
        assert!(matches!(
            Sphere::new(1.0, 3, u32::MAX),
            Err(MeshError::TooLarge { shape: "sphere", .. })
        ));
        assert!(matches!(
            Sphere::new(1.0, 70_000, 70_000),
            Err(MeshError::TooLarge { .. })
        ));
        assert!(matches!(
            Cylinder::new(0.5, 0.5, 1.0, u32::MAX, 1),
            Err(MeshError::TooLarge { shape: "cylinder", .. })
        ));
        assert!(matches!(
            Torus::new(0.7, 0.3, 65_536, 65_536),
            Err(MeshError::TooLarge { shape: "torus", .. })
        ));
    }

    #[test]
    fn test_largest_accepted_counts_do_not_overflow() {
        // 6 * 26_754 * 26_754 is just below u32::MAX.
        let torus = Torus::new(0.7, 0.3, 26_754, 26_754).unwrap();
        assert_eq!(torus.index_count(), 6 * 26_754 * 26_754);
        assert_eq!(torus.vertex_count(), 26_755 * 26_755);
        assert!(Torus::new(0.7, 0.3, 26_755, 26_755).is_err());
    }

    #[test]
    fn test_cylinder_counts() {
        let cylinder = Cylinder::new(0.5, 0.5, 2.0, 36, 18).unwrap();
        let mesh = cylinder.mesh();
        assert_eq!(mesh.vertex_count(), 37 * 19 + 2 * 38);
        assert_eq!(mesh.vertex_count(), cylinder.vertex_count());
        assert_eq!(mesh.index_count(), cylinder.index_count());
        assert_eq!(mesh.triangle_count(), 2 * 36 * 18 + 2 * 36);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_cylinder_caps_wind_oppositely() {
        let cylinder = Cylinder::new(0.5, 0.5, 2.0, 12, 3).unwrap();
        let mesh = cylinder.mesh();
        let side_tris = 2 * 12 * 3;
        let caps: Vec<[u32; 3]> = mesh.triangles().skip(side_tris).collect();
        let (top, bottom) = caps.split_at(12);

        for &tri in top {
            assert!(face_normal(&mesh, tri).y > 0.0);
        }
        for &tri in bottom {
            assert!(face_normal(&mesh, tri).y < 0.0);
        }
    }

    #[test]
    fn test_cylinder_faces_outward() {
        assert_outward(&Cylinder::new(0.5, 0.5, 2.0, 36, 18).unwrap().mesh());
        assert_outward(&Cylinder::new(1.0, 0.25, 1.0, 24, 4).unwrap().mesh());
    }

    #[test]
    fn test_cylinder_side_normals_are_radial() {
        let cylinder = Cylinder::new(1.0, 0.5, 2.0, 16, 2).unwrap();
        let mesh = cylinder.mesh();
        for v in &mesh.vertices[..cylinder.side_vertex_count()] {
            assert_eq!(v.normal[1], 0.0);
            assert!((Vec3::from(v.normal).length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_cylinder_interpolates_radius_and_height() {
        let cylinder = Cylinder::new(1.0, 0.0, 2.0, 8, 4).unwrap();
        let mesh = cylinder.mesh();
        let first = mesh.vertices[0];
        let last_ring = mesh.vertices[4 * 9];
        assert!((first.position[0] - 1.0).abs() < EPS);
        assert!((first.position[1] + 1.0).abs() < EPS);
        assert!(last_ring.position[0].abs() < EPS);
        assert!((last_ring.position[1] - 1.0).abs() < EPS);
    }

    #[test]
    fn test_cylinder_rejects_bad_parameters() {
        assert!(matches!(
            Cylinder::new(0.0, 0.0, 1.0, 8, 1),
            Err(MeshError::DegenerateCylinder { .. })
        ));
        assert!(Cylinder::new(-0.5, 0.5, 1.0, 8, 1).is_err());
        assert!(Cylinder::new(0.5, 0.5, 0.0, 8, 1).is_err());
        assert!(Cylinder::new(0.5, 0.5, 1.0, 2, 1).is_err());
        assert!(Cylinder::new(0.5, 0.5, 1.0, 8, 0).is_err());
        assert!(Cylinder::new(0.5, 0.0, 1.0, 8, 1).is_ok());
    }

    #[test]
    fn test_torus_counts_and_normals() {
        let torus = Torus::new(0.7, 0.3, 18, 36).unwrap();
        let mesh = torus.mesh();
        assert_eq!(mesh.vertex_count(), 19 * 37);
        assert_eq!(mesh.index_count(), 6 * 18 * 36);
        assert!(mesh.validate().is_ok());
        assert_unit_normals(&mesh);
        assert_outward(&mesh);
    }

    #[test]
    fn test_torus_points_lie_on_tube() {
        let mesh = Torus::new(2.0, 0.5, 12, 8).unwrap().mesh();
        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            let ring = Vec3::new(p.x, p.y, 0.0).normalize() * 2.0;
            assert!(((p - ring).length() - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_torus_rejects_bad_parameters() {
        assert!(Torus::new(0.7, 0.3, 2, 36).is_err());
        assert!(Torus::new(0.7, 0.3, 18, 2).is_err());
        assert!(Torus::new(0.7, -0.3, 18, 36).is_err());
        assert!(Torus::new(f32::INFINITY, 0.3, 18, 36).is_err());
    }

    #[test]
    fn test_cube_table() {
        let mesh = cube();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert!(mesh.validate().is_ok());
        assert_unit_normals(&mesh);
        assert_outward(&mesh);
        for v in &mesh.vertices {
            // Each vertex sits on the face its normal points through.
            let along = Vec3::from(v.position).dot(Vec3::from(v.normal));
            assert!((along - 0.5).abs() < EPS);
        }
    }

    #[test]
    fn test_plane_table() {
        let mesh = plane();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);
        assert!(mesh.validate().is_ok());
        assert_outward(&mesh);
        for tri in mesh.triangles() {
            assert!(face_normal(&mesh, tri).y > 0.0);
        }
    }

    #[test]
    fn test_generators_are_deterministic() {
        let shapes = [
            Shape::Cube,
            Shape::Plane,
            Sphere::new(0.5, 36, 18).unwrap().into(),
            Cylinder::new(0.5, 0.3, 2.0, 36, 18).unwrap().into(),
            Torus::new(0.7, 0.3, 18, 36).unwrap().into(),
        ];
        for shape in shapes {
            let a = shape.mesh();
            let b = shape.mesh();
            assert_eq!(a.vertex_bytes(), b.vertex_bytes(), "{}", shape.name());
            assert_eq!(a.indices, b.indices, "{}", shape.name());
        }
    }
}
