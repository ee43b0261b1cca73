pub mod geometry;
pub mod material;

pub use geometry::{Geometry, LineSegments};
pub use material::{BasicMaterial, Color, Material, StandardMaterial};

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::texture::{TextureHandle, TextureId};

/// Position plus XYZ-ordered Euler rotation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    pub fn quaternion(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn set_quaternion(&mut self, q: Quat) {
        let (x, y, z) = q.normalize().to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }

    /// Rotate around an axis expressed in the object's own frame
    pub fn rotate_on_axis(&mut self, axis: Vec3, angle: f32) {
        let q = self.quaternion() * Quat::from_axis_angle(axis, angle);
        self.set_quaternion(q);
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.rotate_on_axis(Vec3::X, angle);
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.rotate_on_axis(Vec3::Y, angle);
    }

    pub fn rotate_z(&mut self, angle: f32) {
        self.rotate_on_axis(Vec3::Z, angle);
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.quaternion(), self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(usize);

impl MeshId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Geometry paired with a surface description and a transform
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: GeometryId,
    pub material: Material,
    pub transform: Transform,
}

impl Mesh {
    pub fn new(geometry: GeometryId, material: Material) -> Self {
        Self {
            geometry,
            material,
            transform: Transform::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Omnidirectional light, no distance falloff
    Point {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
    /// Uniform light hitting every surface equally
    Ambient { color: Color, intensity: f32 },
}

/// Owner of everything that gets drawn.
///
/// Objects are append-only: ids handed out by [`Scene::add`] and friends stay
/// valid for the life of the scene.
#[derive(Debug, Default)]
pub struct Scene {
    geometries: Vec<Geometry>,
    meshes: Vec<Mesh>,
    lines: Vec<LineSegments>,
    lights: Vec<Light>,
    textures: Vec<TextureHandle>,
    background: Option<TextureId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() - 1)
    }

    pub fn add(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn add_lines(&mut self, lines: LineSegments) {
        self.lines.push(lines);
    }

    pub fn add_texture(&mut self, texture: TextureHandle) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    pub fn set_background(&mut self, texture: Option<TextureId>) {
        self.background = texture;
    }

    pub fn background(&self) -> Option<TextureId> {
        self.background
    }

    pub fn geometry(&self, id: GeometryId) -> &Geometry {
        &self.geometries[id.0]
    }

    pub fn geometries(&self) -> impl Iterator<Item = (GeometryId, &Geometry)> {
        self.geometries
            .iter()
            .enumerate()
            .map(|(i, g)| (GeometryId(i), g))
    }

    pub fn mesh(&self, id: MeshId) -> &Mesh {
        &self.meshes[id.0]
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> &mut Mesh {
        &mut self.meshes[id.0]
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn lines(&self) -> &[LineSegments] {
        &self.lines
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn texture(&self, id: TextureId) -> &TextureHandle {
        &self.textures[id.0]
    }

    pub fn textures(&self) -> impl Iterator<Item = (TextureId, &TextureHandle)> {
        self.textures
            .iter()
            .enumerate()
            .map(|(i, t)| (TextureId(i), t))
    }

    /// Advance pending texture loads; returns the ids that resolved
    pub fn poll_textures(&mut self) -> Vec<TextureId> {
        self.textures
            .iter_mut()
            .enumerate()
            .filter_map(|(i, texture)| texture.poll().then_some(TextureId(i)))
            .collect()
    }
}
