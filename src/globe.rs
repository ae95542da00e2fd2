//! The spinning textured globe.
//!
//! [`GlobeApp`] wires the tessellated sphere, its texture and the fill-mode
//! pipelines into a [`GraphicsApp`]: every frame it advances the spin clock,
//! recomposes the model/view/projection matrices, writes them to the uniform
//! buffer and issues one strip draw. Key input switches the polygon fill
//! mode, mouse input is tracked but otherwise unused.

use std::f32::consts::PI;

use anyhow::Result;
use cgmath::{InnerSpace, Matrix4, Rad, Vector3};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use crate::app::GraphicsApp;
use crate::bitmap::Bitmap;
use crate::camera::{Camera, TransformUniform};
use crate::context::{Context, InitContext};
use crate::mesh::{DrawGlobe, SphereMesh};
use crate::pipelines::{FillMode, FillPipelines};
use crate::sphere;
use crate::texture::{GlobeTexture, WrapMode};

pub const SPHERE_RADIUS: f32 = 0.8;
pub const SPHERE_SLICES: u32 = 40;
pub const SPHERE_STACKS: u32 = 40;

/// Animation advance per frame. Tunable; one full revolution takes
/// `1 / SPIN_STEP` frames.
pub const SPIN_STEP: f32 = 0.005;

/// Fixed tilt applied before the spin; its axis sets the precession axis.
const TILT_ANGLE: f32 = PI * 35.0;
const TILT_AXIS: Vector3<f32> = Vector3::new(1.0, 0.235, 0.0);

const EYE: (f32, f32, f32) = (0.0, 0.0, 2.0);

const EARTH_BITMAP: &str = "assets/earth.bmp";

impl FillMode {
    /// Key mapping for the polygon mode: `1` points, `2` wireframe,
    /// anything else solid fill.
    pub fn from_key(key: KeyCode) -> Self {
        match key {
            KeyCode::Digit1 => FillMode::Point,
            KeyCode::Digit2 => FillMode::Line,
            _ => FillMode::Fill,
        }
    }
}

/// Monotonically advancing animation scalar, stepped once per frame.
#[derive(Clone, Debug)]
pub struct SpinClock {
    time: f32,
    step: f32,
}

impl SpinClock {
    pub fn new(step: f32) -> Self {
        Self { time: 0.0, step }
    }

    pub fn advance(&mut self) -> f32 {
        self.time += self.step;
        self.time
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

/// Model transform at animation time `time`.
///
/// Composed as `translate * (tilt * spin) * scale`, in that order: the tilt
/// wraps the running spin, so the globe precesses around the tilted axis
/// rather than spinning first and tilting after.
pub fn model_matrix(time: f32) -> Matrix4<f32> {
    let translate = Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.0));
    let tilt = Matrix4::from_axis_angle(TILT_AXIS.normalize(), Rad(TILT_ANGLE));
    let spin = Matrix4::from_axis_angle(Vector3::unit_z(), Rad(2.0 * PI * time));
    let scale = Matrix4::from_scale(1.0);
    translate * (tilt * spin) * scale
}

pub struct GlobeApp {
    mesh: SphereMesh,
    texture: GlobeTexture,
    pipelines: FillPipelines,
    camera: Camera,
    uniform: TransformUniform,
    uniform_buffer: wgpu::Buffer,
    transform_bind_group: wgpu::BindGroup,
    clock: SpinClock,
    fill_mode: FillMode,
    cursor: PhysicalPosition<f64>,
}

impl GlobeApp {
    /// Load the texture, tessellate and upload the sphere, and build the
    /// pipelines. All uploads complete here, strictly before the first
    /// [`on_draw`](GraphicsApp::on_draw).
    pub async fn new(ctx: &InitContext) -> Result<Self> {
        let bitmap = Bitmap::load(EARTH_BITMAP)?;
        log::info!(
            "loaded {}x{} {}-bit globe bitmap",
            bitmap.width,
            bitmap.height,
            bitmap.bits_per_pixel
        );
        let texture_layout = GlobeTexture::layout(&ctx.device);
        let texture = GlobeTexture::upload(
            &ctx.device,
            &ctx.queue,
            &texture_layout,
            &bitmap.pixels,
            bitmap.width,
            bitmap.height,
            bitmap.order(),
        );

        let vertices = sphere::generate(SPHERE_RADIUS, SPHERE_SLICES, SPHERE_STACKS);
        let mesh = SphereMesh::upload(&ctx.device, &vertices);
        log::debug!("uploaded {} strip vertices", mesh.num_vertices);

        let camera = Camera::new(EYE, (0.0, 0.0, 0.0), Vector3::unit_y());
        let uniform = TransformUniform::new();
        let uniform_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Transform Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let transform_layout = TransformUniform::layout(&ctx.device);
        let transform_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &transform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("transform_bind_group"),
        });

        let pipelines = FillPipelines::new(
            &ctx.device,
            &ctx.config,
            &texture_layout,
            &transform_layout,
        );

        Ok(Self {
            mesh,
            texture,
            pipelines,
            camera,
            uniform,
            uniform_buffer,
            transform_bind_group,
            clock: SpinClock::new(SPIN_STEP),
            fill_mode: FillMode::Fill,
            cursor: PhysicalPosition::new(0.0, 0.0),
        })
    }
}

impl GraphicsApp for GlobeApp {
    fn on_draw(&mut self, ctx: &Context, render_pass: &mut wgpu::RenderPass<'_>) {
        let time = self.clock.advance();

        self.uniform
            .update(model_matrix(time), &self.camera, &ctx.projection);
        ctx.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[self.uniform]),
        );

        // The texture is set up clamped; drawing always happens wrapped.
        self.texture.set_wrap(WrapMode::Repeat);

        render_pass.set_pipeline(self.pipelines.get(self.fill_mode));
        render_pass.draw_globe(
            &self.mesh,
            self.texture.bind_group(),
            &self.transform_bind_group,
        );
    }

    fn on_key_down(&mut self, _ctx: &Context, key: KeyCode, state: ElementState) {
        if state.is_pressed() {
            self.fill_mode = FillMode::from_key(key);
        }
    }

    fn on_mouse_move(&mut self, _ctx: &Context, position: PhysicalPosition<f64>) {
        self.cursor = position;
    }

    fn on_mouse_down(&mut self, _ctx: &Context, button: MouseButton, state: ElementState) {
        log::trace!("mouse {button:?} {state:?} at {:?}", self.cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    fn assert_matrix_eq(a: Matrix4<f32>, b: Matrix4<f32>) {
        let a: [[f32; 4]; 4] = a.into();
        let b: [[f32; 4]; 4] = b.into();
        for (col_a, col_b) in a.iter().zip(b.iter()) {
            for (x, y) in col_a.iter().zip(col_b.iter()) {
                assert!((x - y).abs() < 1e-5, "{a:?} != {b:?}");
            }
        }
    }

    #[test]
    fn clock_advances_by_a_fixed_step() {
        let mut clock = SpinClock::new(SPIN_STEP);
        assert_eq!(clock.time(), 0.0);
        for _ in 0..5 {
            clock.advance();
        }
        assert!((clock.time() - 5.0 * SPIN_STEP).abs() < 1e-6);
    }

    #[test]
    fn digit_keys_select_the_fill_mode() {
        assert_eq!(FillMode::from_key(KeyCode::Digit1), FillMode::Point);
        assert_eq!(FillMode::from_key(KeyCode::Digit2), FillMode::Line);
        assert_eq!(FillMode::from_key(KeyCode::Digit3), FillMode::Fill);
        assert_eq!(FillMode::from_key(KeyCode::Space), FillMode::Fill);
        assert_eq!(FillMode::from_key(KeyCode::KeyW), FillMode::Fill);
    }

    #[test]
    fn spin_is_identity_at_time_zero() {
        let tilt = Matrix4::from_axis_angle(TILT_AXIS.normalize(), Rad(TILT_ANGLE));
        assert_matrix_eq(model_matrix(0.0), tilt);
    }

    #[test]
    fn model_composes_tilt_then_spin() {
        let time = 0.3;
        let tilt = Matrix4::from_axis_angle(TILT_AXIS.normalize(), Rad(TILT_ANGLE));
        let spin = Matrix4::from_axis_angle(Vector3::unit_z(), Rad(2.0 * PI * time));
        assert_matrix_eq(model_matrix(time), tilt * spin);

        // The reverse order is a different transform with a different
        // precession axis.
        let swapped: [[f32; 4]; 4] = (spin * tilt).into();
        let actual: [[f32; 4]; 4] = model_matrix(time).into();
        assert_ne!(swapped, actual);
    }

    #[test]
    fn translate_and_scale_are_identity() {
        // The translate and scale factors exist in the composition but are
        // identity; the model matrix carries no offset.
        let model = model_matrix(1.234);
        let m: [[f32; 4]; 4] = model.into();
        assert_eq!(m[3][0], 0.0);
        assert_eq!(m[3][1], 0.0);
        assert_eq!(m[3][2], 0.0);
        assert!((model.determinant().abs() - 1.0).abs() < 1e-4);
    }
}
