use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use bytemuck::Zeroable;
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, RenderPipeline, TextureView};
use winit::window::Window;

use super::pipelines::{self, Layouts};
use super::resources::{self, GpuGeometry, GpuLines};
use super::SceneRenderer;
use crate::camera::Camera;
use crate::core::{GpuContext, Viewport};
use crate::scene::{GeometryId, Light, Scene};
use crate::texture::{self, ColorSpace, TextureId};
use crate::types::{CameraUniform, LightsUniform, MeshUniform};

/// Textures a draw binds: (colour map, normal map), `None` where the placeholder stands in
type TextureKey = (Option<TextureId>, Option<TextureId>);

/// Forward renderer drawing a [`Scene`] straight to the window surface.
///
/// GPU copies of geometries, helper lines and textures are created lazily the
/// first time a frame needs them; the scene is append-only so nothing is ever
/// evicted.
pub struct GpuRenderer {
    gpu: GpuContext,
    layouts: Layouts,
    mesh_pipeline: RenderPipeline,
    line_pipeline: RenderPipeline,
    background_pipeline: RenderPipeline,
    depth_view: TextureView,

    camera_buffer: Buffer,
    lights_buffer: Buffer,
    frame_bind_group: BindGroup,

    mesh_buffer: Buffer,
    mesh_bind_group: BindGroup,
    mesh_stride: u64,
    mesh_capacity: usize,
    mesh_staging: Vec<u8>,

    sampler: wgpu::Sampler,
    white: TextureView,
    flat_normal: TextureView,
    textures: HashMap<TextureId, TextureView>,
    texture_groups: HashMap<TextureKey, BindGroup>,
    geometries: HashMap<GeometryId, GpuGeometry>,
    lines: Vec<GpuLines>,
}

impl GpuRenderer {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let gpu = GpuContext::new(window).await?;
        let device = gpu.device();
        let format = gpu.format();

        let layouts = Layouts::new(device);
        let mesh_pipeline = pipelines::mesh_pipeline(device, &layouts, format);
        let line_pipeline = pipelines::line_pipeline(device, &layouts, format);
        let background_pipeline = pipelines::background_pipeline(device, &layouts, format);
        let depth_view = resources::depth_view(device, gpu.viewport());

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[LightsUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &layouts.frame,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        let mesh_stride = resources::align_to(
            std::mem::size_of::<MeshUniform>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let mesh_capacity = 64;
        let (mesh_buffer, mesh_bind_group) = Self::create_mesh_buffer(device, &layouts, mesh_stride, mesh_capacity);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Texture Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let white = resources::solid_texture(device, gpu.queue(), [255; 4], ColorSpace::Srgb);
        let flat_normal = resources::solid_texture(device, gpu.queue(), [128, 128, 255, 255], ColorSpace::Linear);

        Ok(Self {
            gpu,
            layouts,
            mesh_pipeline,
            line_pipeline,
            background_pipeline,
            depth_view,
            camera_buffer,
            lights_buffer,
            frame_bind_group,
            mesh_buffer,
            mesh_bind_group,
            mesh_stride,
            mesh_capacity,
            mesh_staging: Vec::new(),
            sampler,
            white,
            flat_normal,
            textures: HashMap::new(),
            texture_groups: HashMap::new(),
            geometries: HashMap::new(),
            lines: Vec::new(),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.gpu.viewport()
    }

    /// Reconfigure the swapchain and depth buffer; the camera is left as is
    pub fn resize(&mut self, viewport: Viewport) {
        if self.gpu.resize(viewport) {
            self.depth_view = resources::depth_view(self.gpu.device(), viewport);
            log::debug!("Surface resized to {}x{}", viewport.width, viewport.height);
        }
    }

    fn create_mesh_buffer(
        device: &wgpu::Device,
        layouts: &Layouts,
        stride: u64,
        capacity: usize,
    ) -> (Buffer, BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mesh Uniform Buffer"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Bind Group"),
            layout: &layouts.mesh,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<MeshUniform>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn ensure_mesh_capacity(&mut self, count: usize) {
        if count <= self.mesh_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        let (buffer, bind_group) =
            Self::create_mesh_buffer(self.gpu.device(), &self.layouts, self.mesh_stride, capacity);
        self.mesh_buffer = buffer;
        self.mesh_bind_group = bind_group;
        self.mesh_capacity = capacity;
        log::debug!("Mesh uniform buffer grown to {capacity} slots");
    }

    /// Upload whatever the scene gained since the last frame
    fn sync(&mut self, scene: &Scene) {
        let device = self.gpu.device();

        for (id, geometry) in scene.geometries() {
            self.geometries
                .entry(id)
                .or_insert_with(|| GpuGeometry::upload(device, geometry));
        }

        for lines in scene.lines().iter().skip(self.lines.len()) {
            self.lines.push(GpuLines::upload(device, lines));
        }

        for (id, handle) in scene.textures() {
            if self.textures.contains_key(&id) {
                continue;
            }
            if let Some(image) = handle.image() {
                let label = handle.path().display().to_string();
                let fitted = texture::fit_within(image, device.limits().max_texture_dimension_2d);
                if fitted.is_some() {
                    log::warn!("Texture {label} exceeds the device limit, uploading a downscaled copy");
                }
                let image = fitted.as_ref().unwrap_or(image);
                let view = resources::upload_texture(device, self.gpu.queue(), &label, image, handle.color_space());
                self.textures.insert(id, view);
                log::info!("Uploaded texture {label}");
            }
        }
    }

    fn uploaded(&self, id: Option<TextureId>) -> Option<TextureId> {
        id.filter(|id| self.textures.contains_key(id))
    }

    fn ensure_texture_group(&mut self, key: TextureKey) {
        if self.texture_groups.contains_key(&key) {
            return;
        }

        let map = key.0.and_then(|id| self.textures.get(&id)).unwrap_or(&self.white);
        let normal = key.1.and_then(|id| self.textures.get(&id)).unwrap_or(&self.flat_normal);
        let bind_group = self.gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Texture Bind Group"),
            layout: &self.layouts.textures,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(map),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(normal),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.texture_groups.insert(key, bind_group);
    }

    fn write_uniforms(&mut self, scene: &Scene, camera: &Camera) -> Vec<TextureKey> {
        self.gpu
            .queue()
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera.to_uniform()]));

        let mut lights = LightsUniform::default();
        for light in scene.lights() {
            match *light {
                Light::Point {
                    color,
                    intensity,
                    position,
                } => {
                    if !lights.push_point(position, color.scaled(intensity)) {
                        log::warn!("Point light at {position} dropped, limit reached");
                    }
                }
                Light::Ambient { color, intensity } => lights.add_ambient(color.scaled(intensity)),
            }
        }
        self.gpu
            .queue()
            .write_buffer(&self.lights_buffer, 0, bytemuck::cast_slice(&[lights]));

        let meshes = scene.meshes();
        self.ensure_mesh_capacity(meshes.len());

        let stride = self.mesh_stride as usize;
        self.mesh_staging.clear();
        self.mesh_staging.resize(stride * meshes.len(), 0);

        let mut keys = Vec::with_capacity(meshes.len());
        for (slot, mesh) in meshes.iter().enumerate() {
            let material = &mesh.material;
            let key = (self.uploaded(material.map()), self.uploaded(material.normal_map()));
            let uniform = MeshUniform::new(
                mesh.transform.matrix(),
                material.color().to_vec3(),
                material.is_lit(),
                key.0.is_some(),
                key.1.is_some(),
            );
            let bytes = bytemuck::bytes_of(&uniform);
            self.mesh_staging[slot * stride..slot * stride + bytes.len()].copy_from_slice(bytes);
            keys.push(key);
        }
        if !self.mesh_staging.is_empty() {
            self.gpu.queue().write_buffer(&self.mesh_buffer, 0, &self.mesh_staging);
        }

        keys
    }

    fn acquire(&self) -> Result<Option<wgpu::SurfaceTexture>> {
        match self.gpu.surface().get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring frame, skipping");
                Ok(None)
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to acquire surface texture")),
        }
    }
}

impl SceneRenderer for GpuRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        self.sync(scene);
        let keys = self.write_uniforms(scene, camera);

        let background = self.uploaded(scene.background());
        if let Some(id) = background {
            self.ensure_texture_group((Some(id), None));
        }
        for key in &keys {
            self.ensure_texture_group(*key);
        }

        let Some(frame) = self.acquire()? else {
            return Ok(());
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(group) = background.and_then(|id| self.texture_groups.get(&(Some(id), None))) {
                pass.set_pipeline(&self.background_pipeline);
                pass.set_bind_group(0, group, &[]);
                pass.draw(0..3, 0..1);
            }

            pass.set_pipeline(&self.mesh_pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (slot, (mesh, key)) in scene.meshes().iter().zip(&keys).enumerate() {
                let (Some(geometry), Some(textures)) =
                    (self.geometries.get(&mesh.geometry), self.texture_groups.get(key))
                else {
                    continue;
                };
                let offset = (slot as u64 * self.mesh_stride) as u32;
                pass.set_bind_group(1, &self.mesh_bind_group, &[offset]);
                pass.set_bind_group(2, textures, &[]);
                pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..geometry.index_count, 0, 0..1);
            }

            if !self.lines.is_empty() {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_bind_group(0, &self.frame_bind_group, &[]);
                for lines in &self.lines {
                    pass.set_vertex_buffer(0, lines.buffer.slice(..));
                    pass.draw(0..lines.vertex_count, 0..1);
                }
            }
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
