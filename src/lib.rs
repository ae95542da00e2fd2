//! orb-ngin
//!
//! A minimal real-time renderer: it opens a window, procedurally tessellates
//! a textured sphere, uploads it to the GPU once and redraws it every frame
//! with a rotating model transform while dispatching keyboard and mouse
//! input to the application.
//!
//! High-level modules
//! - `app`: windowing shell, event loop and the `GraphicsApp` capability trait
//! - `bitmap`: fixed-offset BMP loading for the globe texture
//! - `camera`: view/projection matrices and the transform uniform
//! - `context`: central GPU and window context that owns device/queue/surface
//! - `globe`: the concrete application (spin clock, frame rendering, input)
//! - `mesh`: device-side vertex buffer and the strip draw helper
//! - `pipelines`: render pipelines, one per polygon fill mode
//! - `sphere`: pure triangle-strip sphere tessellation
//! - `texture`: globe color texture and depth attachment
//!

pub mod app;
pub mod bitmap;
pub mod camera;
pub mod context;
pub mod globe;
pub mod mesh;
pub mod pipelines;
pub mod sphere;
pub mod texture;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use wgpu::*;
pub use winit::dpi::PhysicalPosition;
pub use winit::event::WindowEvent;
