//! View and projection matrices plus the per-draw transform uniform.

use cgmath::{Matrix4, Point3, Rad, SquareMatrix, Vector3, perspective};

/// Maps OpenGL clip space (z in -1..1) to WGPU clip space (z in 0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// A fixed eye looking at a target point.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<E: Into<Point3<f32>>, T: Into<Point3<f32>>>(
        eye: E,
        target: T,
        up: Vector3<f32>,
    ) -> Self {
        Self {
            eye: eye.into(),
            target: target.into(),
            up,
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Perspective projection tracking the surface aspect ratio.
#[derive(Clone, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Track the viewport so the globe doesn't stretch on resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Model, view and projection matrices as uploaded to the shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn new() -> Self {
        Self {
            model: Matrix4::identity().into(),
            view: Matrix4::identity().into(),
            proj: Matrix4::identity().into(),
        }
    }

    /// Refresh all three matrices. Runs every frame before the uniform
    /// buffer write, which in turn precedes the draw.
    pub fn update(&mut self, model: Matrix4<f32>, camera: &Camera, projection: &Projection) {
        self.model = model.into();
        self.view = camera.calc_matrix().into();
        self.proj = projection.calc_matrix().into();
    }

    /// Bind group layout for the uniform, consumed by the vertex stage.
    pub fn layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("transform_bind_group_layout"),
        })
    }
}

impl Default for TransformUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Deg;

    #[test]
    fn projection_tracks_resize() {
        let mut projection = Projection::new(640, 580, Deg(45.0), 0.1, 100.0);
        assert!((projection.aspect() - 640.0 / 580.0).abs() < 1e-6);
        projection.resize(100, 50);
        assert!((projection.aspect() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_update_stores_all_three_matrices() {
        let camera = Camera::new((0.0, 0.0, 2.0), (0.0, 0.0, 0.0), Vector3::unit_y());
        let projection = Projection::new(640, 580, Deg(45.0), 0.1, 100.0);
        let model = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));

        let mut uniform = TransformUniform::new();
        uniform.update(model, &camera, &projection);

        let expected_model: [[f32; 4]; 4] = model.into();
        let expected_view: [[f32; 4]; 4] = camera.calc_matrix().into();
        let expected_proj: [[f32; 4]; 4] = projection.calc_matrix().into();
        assert_eq!(uniform.model, expected_model);
        assert_eq!(uniform.view, expected_view);
        assert_eq!(uniform.proj, expected_proj);
    }

    #[test]
    fn view_matrix_moves_the_eye_to_the_origin() {
        let camera = Camera::new((0.0, 0.0, 2.0), (0.0, 0.0, 0.0), Vector3::unit_y());
        let view = camera.calc_matrix();
        let eye = view * cgmath::Vector4::new(0.0, 0.0, 2.0, 1.0);
        assert!(eye.x.abs() < 1e-6 && eye.y.abs() < 1e-6 && eye.z.abs() < 1e-6);
    }
}
