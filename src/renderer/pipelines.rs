use std::num::NonZeroU64;

use wgpu::{BindGroupLayout, Device, RenderPipeline};

use super::resources::DEPTH_FORMAT;
use crate::types::{CameraUniform, LightsUniform, LineVertex, MeshUniform, Vertex};

/// Bind group layouts shared by every pipeline
pub struct Layouts {
    /// Group 0: camera and lights
    pub frame: BindGroupLayout,
    /// Group 1: per-mesh uniform at a dynamic offset
    pub mesh: BindGroupLayout,
    /// Group 2: colour map, normal map, sampler
    pub textures: BindGroupLayout,
}

fn uniform_entry(binding: u32, size: u64, dynamic: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: dynamic,
            min_binding_size: NonZeroU64::new(size),
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

impl Layouts {
    pub fn new(device: &Device) -> Self {
        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[
                uniform_entry(0, std::mem::size_of::<CameraUniform>() as u64, false),
                uniform_entry(1, std::mem::size_of::<LightsUniform>() as u64, false),
            ],
        });

        let mesh = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Mesh Bind Group Layout"),
            entries: &[uniform_entry(0, std::mem::size_of::<MeshUniform>() as u64, true)],
        });

        let textures = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Self { frame, mesh, textures }
    }
}

fn depth_state(write: bool, compare: wgpu::CompareFunction) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

struct PipelineDesc<'a> {
    label: &'a str,
    source: &'a str,
    bind_group_layouts: &'a [&'a BindGroupLayout],
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    primitive: wgpu::PrimitiveState,
    depth: wgpu::DepthStencilState,
}

fn build(device: &Device, format: wgpu::TextureFormat, desc: PipelineDesc) -> RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(desc.label),
        source: wgpu::ShaderSource::Wgsl(desc.source.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: desc.bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: desc.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: desc.primitive,
        depth_stencil: Some(desc.depth),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

pub fn mesh_pipeline(device: &Device, layouts: &Layouts, format: wgpu::TextureFormat) -> RenderPipeline {
    build(
        device,
        format,
        PipelineDesc {
            label: "Mesh Pipeline",
            source: include_str!("../shaders/mesh.wgsl"),
            bind_group_layouts: &[&layouts.frame, &layouts.mesh, &layouts.textures],
            buffers: &[Vertex::layout()],
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth: depth_state(true, wgpu::CompareFunction::Less),
        },
    )
}

pub fn line_pipeline(device: &Device, layouts: &Layouts, format: wgpu::TextureFormat) -> RenderPipeline {
    build(
        device,
        format,
        PipelineDesc {
            label: "Line Pipeline",
            source: include_str!("../shaders/line.wgsl"),
            bind_group_layouts: &[&layouts.frame],
            buffers: &[LineVertex::layout()],
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth: depth_state(true, wgpu::CompareFunction::Less),
        },
    )
}

/// Fullscreen background, drawn first and never occluding anything
pub fn background_pipeline(device: &Device, layouts: &Layouts, format: wgpu::TextureFormat) -> RenderPipeline {
    build(
        device,
        format,
        PipelineDesc {
            label: "Background Pipeline",
            source: include_str!("../shaders/background.wgsl"),
            bind_group_layouts: &[&layouts.textures],
            buffers: &[],
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth: depth_state(false, wgpu::CompareFunction::Always),
        },
    )
}
