//! Scene descriptions for the two demos.
//!
//! A scene is plain data: which solids to draw, where, with which texture
//! and material. Geometry is generated from it once at startup.

use glam::{Mat4, Vec3};

use crate::math::{Cylinder, MeshError, Shape, Sphere, Torus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScenePreset {
    /// Lit, textured desk: plane, cube, sphere, cylinder and torus.
    Desk,
    /// Unlit, flat-coloured plane, cube and sphere.
    Sketch,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub specular_strength: f32,
    pub shininess: f32,
    pub lit: bool,
}

impl Material {
    pub const MATTE: Self = Self {
        specular_strength: 0.1,
        shininess: 8.0,
        lit: true,
    };

    pub const GLOSSY: Self = Self {
        specular_strength: 0.5,
        shininess: 32.0,
        lit: true,
    };

    pub const UNLIT: Self = Self {
        specular_strength: 0.0,
        shininess: 1.0,
        lit: false,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
}

#[derive(Clone, Debug)]
pub struct SceneObject {
    pub label: &'static str,
    pub shape: Shape,
    pub transform: Mat4,
    pub texture: Option<&'static str>,
    pub color: [f32; 4],
    pub material: Material,
}

#[derive(Clone, Debug)]
pub struct SceneDesc {
    pub title: &'static str,
    pub objects: Vec<SceneObject>,
    pub lights: Vec<PointLight>,
    pub ambient_strength: f32,
}

impl SceneDesc {
    pub const MAX_LIGHTS: usize = 2;

    pub fn build(preset: ScenePreset) -> Result<Self, MeshError> {
        match preset {
            ScenePreset::Desk => desk(),
            ScenePreset::Sketch => sketch(),
        }
    }

    /// Distinct texture files referenced by the scene, in first-use order.
    pub fn texture_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for name in self.objects.iter().filter_map(|o| o.texture) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

fn translate_scale(translation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_translation(translation) * Mat4::from_scale(scale)
}

const WARM_WHITE: Vec3 = Vec3::new(1.0, 0.9, 0.8);
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

fn desk() -> Result<SceneDesc, MeshError> {
    let objects = vec![
        SceneObject {
            label: "plane",
            shape: Shape::Plane,
            transform: translate_scale(Vec3::new(0.0, -0.5, 0.0), Vec3::new(5.0, 1.0, 5.0)),
            texture: Some("Granite.jpg"),
            color: WHITE,
            material: Material::MATTE,
        },
        SceneObject {
            label: "cube",
            shape: Shape::Cube,
            transform: Mat4::IDENTITY,
            texture: Some("Cube2.png"),
            color: WHITE,
            material: Material::GLOSSY,
        },
        SceneObject {
            label: "sphere",
            shape: Sphere::new(0.5, 36, 18)?.into(),
            transform: Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)),
            texture: Some("Styrofoam.jpg"),
            color: WHITE,
            material: Material::MATTE,
        },
        SceneObject {
            label: "cylinder",
            shape: Cylinder::new(0.5, 0.5, 2.0, 36, 18)?.into(),
            transform: translate_scale(Vec3::new(-2.0, 0.1, 0.0), Vec3::new(1.0, 0.6, 1.0)),
            texture: Some("Leopard.jpg"),
            color: WHITE,
            material: Material::GLOSSY,
        },
        SceneObject {
            label: "torus",
            shape: Torus::new(0.7, 0.3, 18, 36)?.into(),
            transform: translate_scale(Vec3::new(-0.7, -0.3, 1.5), Vec3::new(0.2, 0.2, 0.5)),
            texture: Some("Wood.jpg"),
            color: WHITE,
            material: Material::GLOSSY,
        },
    ];

    Ok(SceneDesc {
        title: "Solids Desk",
        objects,
        lights: vec![
            PointLight {
                position: Vec3::new(1.5, 5.0, 3.0),
                color: WARM_WHITE,
            },
            PointLight {
                position: Vec3::new(-1.5, 5.0, -3.0),
                color: WARM_WHITE,
            },
        ],
        ambient_strength: 0.1,
    })
}

fn sketch() -> Result<SceneDesc, MeshError> {
    let objects = vec![
        SceneObject {
            label: "plane",
            shape: Shape::Plane,
            transform: translate_scale(Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 1.0, 10.0)),
            texture: None,
            color: [0.8, 0.8, 0.8, 1.0],
            material: Material::UNLIT,
        },
        SceneObject {
            label: "cube",
            shape: Shape::Cube,
            transform: Mat4::IDENTITY,
            texture: None,
            color: [0.6, 0.2, 0.8, 1.0],
            material: Material::UNLIT,
        },
        SceneObject {
            label: "sphere",
            shape: Sphere::new(0.5, 36, 18)?.into(),
            transform: Mat4::from_translation(Vec3::new(0.0, 1.0, -0.5)),
            texture: None,
            color: [0.5, 0.5, 1.0, 1.0],
            material: Material::UNLIT,
        },
    ];

    Ok(SceneDesc {
        title: "Solids Sketch",
        objects,
        lights: Vec::new(),
        ambient_strength: 1.0,
    })
}
