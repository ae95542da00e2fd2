//! Procedural sphere tessellation.
//!
//! [`generate`] turns (radius, slices, stacks) into an ordered vertex stream
//! that renders as a single non-indexed triangle strip: for every stack the
//! inner loop emits vertex pairs on the current and the next latitude ring,
//! and the last slice repeats the first azimuth so the seam closes exactly.

use std::f32::consts::PI;

/// A single vertex as laid out in GPU memory.
///
/// The `color` channel is reserved in the layout but never populated with
/// meaningful data; the fragment stage only samples the texture.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// The attribute layout matching this record byte for byte.
    ///
    /// Offsets here must equal the field offsets of [`Vertex`]; a mismatch is
    /// not a checked error, the device would silently read garbage.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 7]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 10]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Number of vertices [`generate`] produces for the given subdivision.
pub const fn vertex_count(slices: u32, stacks: u32) -> usize {
    2 * stacks as usize * (slices as usize + 1)
}

/// Tessellate a sphere of `radius` into a triangle-strip vertex stream.
///
/// Pure and deterministic: identical inputs yield identical output. The
/// result has exactly `2 * stacks * (slices + 1)` vertices. Each pair sits on
/// the rings `rho` and `rho + drho`, so the strip stays continuous within a
/// stack; no degenerate triangles are inserted between stacks, which leaves a
/// thin stitch artifact at stack boundaries (accepted).
///
/// Texture coordinates run `s` from 1.0 down to 0.0 across a stack's slices
/// and `t` from 0.0 up to 1.0 across stacks. Normals are the unscaled unit
/// direction of each position.
pub fn generate(radius: f32, slices: u32, stacks: u32) -> Vec<Vertex> {
    debug_assert!(radius > 0.0 && slices > 0 && stacks > 0);

    let drho = PI / stacks as f32;
    let dtheta = 2.0 * PI / slices as f32;
    let ds = 1.0 / slices as f32;
    let dt = 1.0 / stacks as f32;

    let mut vertices = Vec::with_capacity(vertex_count(slices, stacks));
    let mut t = 0.0f32;

    for i in 0..stacks {
        let rho = i as f32 * drho;
        let srho = rho.sin();
        let crho = rho.cos();
        let srhodrho = (rho + drho).sin();
        let crhodrho = (rho + drho).cos();

        let mut s = 1.0f32;
        for j in 0..=slices {
            // The closing slice repeats azimuth zero so the seam has no gap.
            let theta = if j == slices { 0.0 } else { j as f32 * dtheta };
            let stheta = -theta.sin();
            let ctheta = theta.cos();

            let dir = [stheta * srho, ctheta * srho, crho];
            vertices.push(Vertex {
                position: [dir[0] * radius, dir[1] * radius, dir[2] * radius],
                color: [0.0; 4],
                normal: dir,
                tex_coords: [s, t],
            });

            let dir = [stheta * srhodrho, ctheta * srhodrho, crhodrho];
            vertices.push(Vertex {
                position: [dir[0] * radius, dir[1] * radius, dir[2] * radius],
                color: [0.0; 4],
                normal: dir,
                tex_coords: [s, t + dt],
            });
            s -= ds;
        }
        t += dt;
    }

    vertices
}
