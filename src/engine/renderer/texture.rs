// Texture upload and management system

use crate::engine::assets::{AssetHandle, AssetId, TextureHandle, TextureInfo};
use image::GenericImageView;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A loaded texture, ready to bind
///
/// The bind group keeps the underlying texture, view and sampler alive.
pub struct Texture {
    pub bind_group: wgpu::BindGroup,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Upload a decoded image
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        img: &image::DynamicImage,
        label: Option<&str>,
    ) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(device, queue, layout, &rgba, width, height, label)
    }

    /// Create a solid color texture
    pub fn from_color(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        color: [u8; 4],
        label: Option<&str>,
    ) -> Self {
        Self::from_rgba(device, queue, layout, &color, 1, 1, label)
    }

    fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        rgba: &[u8],
        width: u32,
        height: u32,
        label: Option<&str>,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Nearest filtering keeps pixel art crisp when scaled up
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label,
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
        });

        Self {
            bind_group,
            width,
            height,
        }
    }
}

/// Bind group layout shared by every sprite texture
pub fn texture_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Texture Bind Group Layout"),
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
    })
}

/// Manages uploaded textures and caches them by source path
pub struct TextureManager {
    layout: wgpu::BindGroupLayout,
    textures: HashMap<AssetId, Texture>,
    path_to_info: HashMap<PathBuf, TextureInfo>,
    white: TextureHandle,
}

impl TextureManager {
    /// Create a new texture manager with a built-in white texture for solid fills
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let layout = texture_bind_group_layout(device);

        let white_id = AssetId::builtin("white");
        let white = Texture::from_color(device, queue, &layout, [255; 4], Some("White Texture"));

        let mut textures = HashMap::new();
        textures.insert(white_id, white);

        Self {
            layout,
            textures,
            path_to_info: HashMap::new(),
            white: AssetHandle::new(white_id),
        }
    }

    /// Look up a texture already loaded from `path`
    pub fn cached(&self, path: &Path) -> Option<TextureInfo> {
        self.path_to_info.get(path).copied()
    }

    /// Upload a decoded image loaded from `path`
    pub fn insert_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        img: &image::DynamicImage,
    ) -> TextureInfo {
        let label = path.to_string_lossy();
        let texture = Texture::from_image(device, queue, &self.layout, img, Some(&label));

        let id = AssetId::from_path(path);
        let info = TextureInfo {
            handle: AssetHandle::new(id),
            width: texture.width,
            height: texture.height,
        };

        self.textures.insert(id, texture);
        self.path_to_info.insert(path.to_path_buf(), info);
        info
    }

    /// Get a texture by handle
    pub fn get(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(&handle.id())
    }

    /// Handle of the 1x1 white texture
    pub fn white(&self) -> TextureHandle {
        self.white
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Get the number of loaded textures, including the built-in one
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}
