use glam::Vec3;
use rand::Rng;

use crate::camera::Camera;
use crate::config::AssetConfig;
use crate::core::{Controller, OrbitControls, Viewport};
use crate::scene::{
    BasicMaterial, Color, Geometry, Light, LineSegments, Material, Mesh, MeshId, Scene, StandardMaterial,
    Transform,
};
use crate::texture::{ColorSpace, TextureHandle, TextureId, TextureLoader};

pub const STAR_COUNT: usize = 200;
/// Stars are spread over a cube of this edge length centred on the origin
pub const STAR_SPREAD: f32 = 200.0;
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 0.0, 30.0);
pub const MOON_POSITION: Vec3 = Vec3::new(-10.0, 0.0, 30.0);
pub const LIGHT_POSITION: Vec3 = Vec3::new(15.0, 5.0, 5.0);

/// Euler increment applied to the torus every frame
pub const TORUS_SPIN: Vec3 = Vec3::new(0.01, 0.005, 0.001);
/// Local-axis turns applied to the moon on every scroll event (x, then y, then z)
pub const MOON_SCROLL_SPIN: Vec3 = Vec3::new(0.05, 0.075, 0.05);
/// Local-axis turns applied to the avatar on every scroll event (y, then z)
pub const AVATAR_SCROLL_SPIN: (f32, f32) = (0.01, 0.01);

const SCROLL_DOLLY: f32 = -0.01;
const SCROLL_LIFT: f32 = -0.0002;
const SCROLL_TILT: f32 = -0.0002;

const TORUS_COLOR: u32 = 0xff6347;
const GRID_CENTER_COLOR: u32 = 0x444444;
const GRID_COLOR: u32 = 0x888888;

/// The four images the scene is dressed with
pub struct SceneTextures {
    pub background: TextureHandle,
    pub avatar: TextureHandle,
    pub moon: TextureHandle,
    pub moon_normal: TextureHandle,
}

impl SceneTextures {
    /// Kick off every load; none of them blocks
    pub fn load(loader: &TextureLoader, assets: &AssetConfig) -> Self {
        Self {
            background: loader.load(&assets.background, ColorSpace::Srgb),
            avatar: loader.load(&assets.avatar, ColorSpace::Srgb),
            moon: loader.load(&assets.moon, ColorSpace::Srgb),
            moon_normal: loader.load(&assets.moon_normal, ColorSpace::Linear),
        }
    }
}

/// Owns the scene, the camera and the orbit controls, and the two paths that
/// move them: [`on_scroll`](Self::on_scroll) for page scroll events and
/// [`animate`](Self::animate) once per display refresh.
pub struct SceneDirector {
    scene: Scene,
    camera: Camera,
    controls: OrbitControls,
    torus: MeshId,
    avatar: MeshId,
    moon: MeshId,
    stars: Vec<MeshId>,
}

impl SceneDirector {
    pub fn build(viewport: Viewport, textures: SceneTextures, show_helpers: bool, rng: &mut impl Rng) -> Self {
        let mut scene = Scene::new();

        let mut camera = Camera::new(viewport.aspect());
        camera.position = CAMERA_START;
        let controls = OrbitControls::new(viewport.height as f32);

        let torus_geometry = scene.add_geometry(Geometry::torus(10.0, 3.0, 16, 100));
        let torus = scene.add(Mesh::new(torus_geometry, Material::standard(Color::from_hex(TORUS_COLOR))));

        let white = Color::from_hex(0xffffff);
        scene.add_light(Light::Point {
            color: white,
            intensity: 1.0,
            position: LIGHT_POSITION,
        });
        scene.add_light(Light::Ambient {
            color: white,
            intensity: 1.0,
        });

        if show_helpers {
            scene.add_lines(LineSegments::wireframe(
                &Geometry::sphere(1.0, 4, 2),
                LIGHT_POSITION,
                white.to_vec3(),
            ));
            scene.add_lines(LineSegments::grid(
                200.0,
                10,
                Color::from_hex(GRID_CENTER_COLOR).to_vec3(),
                Color::from_hex(GRID_COLOR).to_vec3(),
            ));
        }

        let star_geometry = scene.add_geometry(Geometry::sphere(0.25, 24, 24));
        let half = STAR_SPREAD / 2.0;
        let stars = (0..STAR_COUNT)
            .map(|_| {
                let position = Vec3::new(
                    rng.random_range(-half..=half),
                    rng.random_range(-half..=half),
                    rng.random_range(-half..=half),
                );
                let mut star = Mesh::new(star_geometry, Material::standard(Color::WHITE));
                star.transform = Transform::at(position);
                scene.add(star)
            })
            .collect();

        let SceneTextures {
            background,
            avatar: avatar_texture,
            moon: moon_texture,
            moon_normal,
        } = textures;

        let background = scene.add_texture(background);
        scene.set_background(Some(background));

        let avatar_map = scene.add_texture(avatar_texture);
        let avatar_geometry = scene.add_geometry(Geometry::cuboid(3.0, 3.0, 3.0));
        let avatar = scene.add(Mesh::new(
            avatar_geometry,
            Material::Basic(BasicMaterial {
                color: Color::WHITE,
                map: Some(avatar_map),
            }),
        ));

        let moon_map = scene.add_texture(moon_texture);
        let moon_normal = scene.add_texture(moon_normal);
        let moon_geometry = scene.add_geometry(Geometry::sphere(5.0, 24, 24));
        let moon = scene.add(Mesh::new(
            moon_geometry,
            Material::Standard(StandardMaterial {
                color: Color::WHITE,
                map: Some(moon_map),
                normal_map: Some(moon_normal),
            }),
        ));
        scene.mesh_mut(moon).transform.position = MOON_POSITION;

        log::info!(
            "Scene built: {} meshes, {} lights, {} helper line sets",
            scene.meshes().len(),
            scene.lights().len(),
            scene.lines().len()
        );

        Self {
            scene,
            camera,
            controls,
            torus,
            avatar,
            moon,
            stars,
        }
    }

    /// React to a page scroll; `top` is the page's top edge relative to the
    /// viewport, 0 at rest and negative once scrolled down.
    pub fn on_scroll(&mut self, top: f32) {
        let moon = &mut self.scene.mesh_mut(self.moon).transform;
        moon.rotate_x(MOON_SCROLL_SPIN.x);
        moon.rotate_y(MOON_SCROLL_SPIN.y);
        moon.rotate_z(MOON_SCROLL_SPIN.z);

        let avatar = &mut self.scene.mesh_mut(self.avatar).transform;
        avatar.rotate_y(AVATAR_SCROLL_SPIN.0);
        avatar.rotate_z(AVATAR_SCROLL_SPIN.1);

        self.camera.position.z = top * SCROLL_DOLLY;
        self.camera.position.y = top * SCROLL_LIFT;
        self.camera.rotation.x = top * SCROLL_TILT;
    }

    /// One animation step: spin the torus, then let the orbit controls apply
    /// any drag seen since the previous frame and aim the camera at their target
    pub fn animate(&mut self, input: &dyn Controller) {
        self.scene.mesh_mut(self.torus).transform.rotation += TORUS_SPIN;

        self.controls.accumulate(input);
        self.controls.update(&mut self.camera);
    }

    /// Move finished texture loads into the scene; returns the ones that resolved
    pub fn poll_textures(&mut self) -> Vec<TextureId> {
        self.scene.poll_textures()
    }

    /// Track the window height for drag scaling. The camera keeps its
    /// start-up aspect ratio.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.controls.set_viewport_height(viewport.height as f32);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn torus(&self) -> &Mesh {
        self.scene.mesh(self.torus)
    }

    pub fn avatar(&self) -> &Mesh {
        self.scene.mesh(self.avatar)
    }

    pub fn moon(&self) -> &Mesh {
        self.scene.mesh(self.moon)
    }

    pub fn stars(&self) -> impl Iterator<Item = &Mesh> {
        self.stars.iter().map(|&id| self.scene.mesh(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Idle;
    use image::RgbaImage;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ready(name: &str, color_space: ColorSpace) -> TextureHandle {
        TextureHandle::ready(name, color_space, RgbaImage::new(1, 1))
    }

    fn textures() -> SceneTextures {
        SceneTextures {
            background: ready("space.png", ColorSpace::Srgb),
            avatar: ready("avatar.png", ColorSpace::Srgb),
            moon: ready("moon.png", ColorSpace::Srgb),
            moon_normal: ready("normal.png", ColorSpace::Linear),
        }
    }

    fn director(show_helpers: bool) -> SceneDirector {
        let mut rng = StdRng::seed_from_u64(7);
        SceneDirector::build(Viewport::new(1280, 720), textures(), show_helpers, &mut rng)
    }

    #[test]
    fn camera_starts_behind_the_torus() {
        let director = director(true);
        assert_eq!(director.camera().position, CAMERA_START);
        assert!((director.camera().aspect - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn helpers_are_optional() {
        assert_eq!(director(true).scene().lines().len(), 2);
        assert!(director(false).scene().lines().is_empty());
    }

    #[test]
    fn stars_share_one_geometry() {
        let director = director(false);
        let mut geometries = director.stars().map(|star| star.geometry);
        let first = geometries.next().unwrap();
        assert!(geometries.all(|g| g == first));
    }

    #[test]
    fn avatar_is_unlit_and_mapped() {
        let director = director(false);
        let material = &director.avatar().material;
        assert!(!material.is_lit());
        assert!(material.map().is_some());
        assert_eq!(director.avatar().transform.position, Vec3::ZERO);
    }

    #[test]
    fn moon_carries_both_maps() {
        let director = director(false);
        let material = &director.moon().material;
        assert!(material.is_lit());
        let (map, normal) = (material.map().unwrap(), material.normal_map().unwrap());
        assert_eq!(director.scene().texture(map).color_space(), ColorSpace::Srgb);
        assert_eq!(director.scene().texture(normal).color_space(), ColorSpace::Linear);
    }

    #[test]
    fn scroll_turns_avatar_about_its_own_axes() {
        let mut director = director(false);
        director.on_scroll(-40.0);

        let expected = glam::Quat::from_rotation_y(0.01) * glam::Quat::from_rotation_z(0.01);
        assert!(director.avatar().transform.quaternion().dot(expected).abs() > 1.0 - 1e-6);
    }

    #[test]
    fn scrolling_back_to_top_resets_camera_but_not_the_moon() {
        let mut director = director(false);
        director.on_scroll(-800.0);
        director.on_scroll(0.0);

        assert_eq!(director.camera().position, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(director.camera().rotation.x, 0.0);
        assert_ne!(director.moon().transform.rotation, Vec3::ZERO);
    }

    #[test]
    fn idle_frames_leave_moon_and_avatar_alone() {
        let mut director = director(false);
        for _ in 0..10 {
            director.animate(&Idle);
        }
        assert_eq!(director.moon().transform.rotation, Vec3::ZERO);
        assert_eq!(director.avatar().transform.rotation, Vec3::ZERO);
    }
}
