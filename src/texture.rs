//! GPU textures: the globe's color map and the depth attachment.
//!
//! The color texture is populated exactly once from decoded bitmap bytes and
//! sampled with linear filtering. Wrapping starts clamped to the edge; the
//! renderer flips it to repeat once per frame before binding. WGPU samplers
//! are immutable, so the toggle selects between two prebuilt bind groups
//! rather than mutating device state.

/// Channel order of source pixel bytes, forwarded to the device as the
/// texture format so colors are not swapped on upload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PixelOrder {
    Rgba,
    Bgra,
}

impl PixelOrder {
    fn format(self) -> wgpu::TextureFormat {
        match self {
            PixelOrder::Rgba => wgpu::TextureFormat::Rgba8UnormSrgb,
            PixelOrder::Bgra => wgpu::TextureFormat::Bgra8UnormSrgb,
        }
    }
}

/// Texture coordinate wrapping outside [0, 1].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WrapMode {
    ClampToEdge,
    Repeat,
}

impl WrapMode {
    fn address_mode(self) -> wgpu::AddressMode {
        match self {
            WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            WrapMode::Repeat => wgpu::AddressMode::Repeat,
        }
    }
}

/// The globe's color texture with its view and per-wrap-mode bind groups.
///
/// Dimensions are fixed at creation; the pixel contents are written once and
/// treated as immutable afterwards. No mipmaps are generated.
#[derive(Debug)]
pub struct GlobeTexture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    clamp_bind_group: wgpu::BindGroup,
    repeat_bind_group: wgpu::BindGroup,
    wrap: WrapMode,
}

impl GlobeTexture {
    /// Bind group layout shared by the texture and the render pipelines.
    pub fn layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("globe_texture_bind_group_layout"),
        })
    }

    /// Allocate the texture and upload all pixel rows in one write.
    ///
    /// `pixels` must be `width * height * 4` tightly packed bytes in the
    /// channel order named by `order`.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        pixels: &[u8],
        width: u32,
        height: u32,
        order: PixelOrder,
    ) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("globe texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: order.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = |wrap: WrapMode| {
            let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
                address_mode_u: wrap.address_mode(),
                address_mode_v: wrap.address_mode(),
                address_mode_w: wrap.address_mode(),
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::FilterMode::Nearest,
                ..Default::default()
            });
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
                label: Some("globe_texture_bind_group"),
            })
        };
        let clamp_bind_group = bind_group(WrapMode::ClampToEdge);
        let repeat_bind_group = bind_group(WrapMode::Repeat);

        Self {
            texture,
            view,
            clamp_bind_group,
            repeat_bind_group,
            wrap: WrapMode::ClampToEdge,
        }
    }

    /// Switch the wrap mode used by subsequent [`bind_group`](Self::bind_group) calls.
    pub fn set_wrap(&mut self, wrap: WrapMode) {
        self.wrap = wrap;
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        match self.wrap {
            WrapMode::ClampToEdge => &self.clamp_bind_group,
            WrapMode::Repeat => &self.repeat_bind_group,
        }
    }
}

/// Depth attachment for depth-testing the strip against itself.
#[derive(Debug)]
pub struct DepthTexture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a depth texture sized to the surface. Recreated on every
    /// resize so it always matches the color attachment.
    pub fn create(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[Self::DEPTH_FORMAT],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }
}
