//! Device-side mesh resources.
//!
//! [`SphereMesh::upload`] copies the tessellated vertex stream into a static
//! vertex buffer once at startup; afterwards the buffer is never rewritten.
//! Drawing goes through [`DrawGlobe`] so every draw binds the same layout.

use wgpu::util::DeviceExt;

use crate::sphere::Vertex;

/// The uploaded sphere strip: one static vertex buffer plus its length.
#[derive(Debug)]
pub struct SphereMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub num_vertices: u32,
}

impl SphereMesh {
    /// Copy `vertices` into device memory, marked static (`VERTEX` only).
    pub fn upload(device: &wgpu::Device, vertices: &[Vertex]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            vertex_buffer,
            num_vertices: vertices.len() as u32,
        }
    }
}

/// Issue a full non-indexed strip draw of the sphere.
pub trait DrawGlobe {
    fn draw_globe(
        &mut self,
        mesh: &SphereMesh,
        texture_bind_group: &wgpu::BindGroup,
        transform_bind_group: &wgpu::BindGroup,
    );
}

impl DrawGlobe for wgpu::RenderPass<'_> {
    fn draw_globe(
        &mut self,
        mesh: &SphereMesh,
        texture_bind_group: &wgpu::BindGroup,
        transform_bind_group: &wgpu::BindGroup,
    ) {
        self.set_bind_group(0, texture_bind_group, &[]);
        self.set_bind_group(1, transform_bind_group, &[]);
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.draw(0..mesh.num_vertices, 0..1);
    }
}
