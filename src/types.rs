use glam::{Mat4, Vec3};

/// Upper bound on point lights uploaded per frame
pub const MAX_POINT_LIGHTS: usize = 4;

/// Mesh vertex: position, normal, texture coordinate
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }

    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Helper line vertex, already in world space
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }

    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _pad: f32,
}

/// Scene lighting for GPU: summed ambient plus a fixed array of point lights
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    pub ambient: [f32; 4],
    pub point_positions: [[f32; 4]; MAX_POINT_LIGHTS],
    pub point_colors: [[f32; 4]; MAX_POINT_LIGHTS],
    pub point_count: [u32; 4],
}

impl Default for LightsUniform {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

impl LightsUniform {
    /// Append a point light, returns false once the array is full
    pub fn push_point(&mut self, position: Vec3, color: Vec3) -> bool {
        let index = self.point_count[0] as usize;
        if index >= MAX_POINT_LIGHTS {
            return false;
        }
        self.point_positions[index] = position.extend(1.0).to_array();
        self.point_colors[index] = color.extend(1.0).to_array();
        self.point_count[0] += 1;
        true
    }

    pub fn add_ambient(&mut self, color: Vec3) {
        for (channel, value) in self.ambient.iter_mut().zip(color.to_array()) {
            *channel += value;
        }
    }
}

/// Per-mesh uniform; bound with a dynamic offset
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x: lit, y: colour map bound, z: normal map bound
    pub flags: [u32; 4],
}

impl MeshUniform {
    pub fn new(model: Mat4, color: Vec3, lit: bool, has_map: bool, has_normal_map: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            color: color.extend(1.0).to_array(),
            flags: [lit as u32, has_map as u32, has_normal_map as u32, 0],
        }
    }
}
