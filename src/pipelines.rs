//! Render pipeline construction.
//!
//! One pipeline per polygon fill mode, all sharing the same shader, layouts
//! and triangle-strip state. Non-solid fill is an optional device feature;
//! where the adapter lacks it the corresponding pipeline is skipped and
//! drawing falls back to solid fill.

use crate::sphere::Vertex;
use crate::texture::DepthTexture;

/// Polygon rasterization mode, switched at runtime from key input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FillMode {
    Fill,
    Line,
    Point,
}

/// The globe pipeline in each supported fill mode.
#[derive(Debug)]
pub struct FillPipelines {
    fill: wgpu::RenderPipeline,
    line: Option<wgpu::RenderPipeline>,
    point: Option<wgpu::RenderPipeline>,
}

impl FillPipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        texture_layout: &wgpu::BindGroupLayout,
        transform_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Globe Pipeline Layout"),
            bind_group_layouts: &[texture_layout, transform_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Globe Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("globe_shader.wgsl").into()),
        });

        let features = device.features();
        let mode_pipeline = |mode: wgpu::PolygonMode, feature: wgpu::Features| {
            if features.contains(feature) {
                Some(mk_render_pipeline(
                    device,
                    &layout,
                    config.format,
                    mode,
                    &shader,
                ))
            } else {
                log::warn!("adapter lacks {feature:?}, {mode:?} rendering falls back to fill");
                None
            }
        };

        Self {
            fill: mk_render_pipeline(
                device,
                &layout,
                config.format,
                wgpu::PolygonMode::Fill,
                &shader,
            ),
            line: mode_pipeline(wgpu::PolygonMode::Line, wgpu::Features::POLYGON_MODE_LINE),
            point: mode_pipeline(wgpu::PolygonMode::Point, wgpu::Features::POLYGON_MODE_POINT),
        }
    }

    pub fn get(&self, mode: FillMode) -> &wgpu::RenderPipeline {
        match mode {
            FillMode::Fill => &self.fill,
            FillMode::Line => self.line.as_ref().unwrap_or(&self.fill),
            FillMode::Point => self.point.as_ref().unwrap_or(&self.fill),
        }
    }
}

fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    polygon_mode: wgpu::PolygonMode,
    shader: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Globe Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // The strip alternates winding per triangle; both faces stay visible.
            cull_mode: None,
            polygon_mode,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthTexture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
