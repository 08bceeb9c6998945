// Rendering system using wgpu

pub mod canvas;
mod sprite;
pub mod texture;
mod vertex;
mod viewport;

pub use canvas::{Canvas, SpriteDraw};
pub use sprite::{SpriteBatch, SpriteRenderer};
pub use texture::TextureManager;
pub use vertex::Vertex;
pub use viewport::{ViewUniform, Viewport};

use crate::engine::assets::{AssetType, LoadError, TextureInfo, TextureLoader};
use anyhow::Result;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;
use winit::window::Window;

/// Main renderer responsible for initializing wgpu and coordinating rendering
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sprite_renderer: SpriteRenderer,
    texture_manager: TextureManager,
    viewport: Viewport,
}

impl Renderer {
    /// Create a new renderer for the given window, drawing a fixed logical resolution
    pub async fn new(window: Arc<Window>, logical_width: u32, logical_height: u32) -> Result<Self> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface
        let surface = instance.create_surface(window.clone())?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        info!("Using GPU: {}", adapter.get_info().name);

        // Request device and queue
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let texture_manager = TextureManager::new(&device, &queue);
        let sprite_renderer =
            SpriteRenderer::new(&device, surface_format, texture_manager.layout());
        let viewport = Viewport::new(
            logical_width as f32,
            logical_height as f32,
            config.width as f32,
            config.height as f32,
        );

        info!(
            "Renderer initialized: {}x{} logical, {}x{} window",
            logical_width, logical_height, size.width, size.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sprite_renderer,
            texture_manager,
            viewport,
        })
    }

    /// Resize the renderer
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.viewport.resize(new_size.width as f32, new_size.height as f32);
            debug!("Renderer resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Start collecting draws for a new frame
    pub fn begin_frame(&mut self) {
        self.sprite_renderer.begin_frame();
    }

    /// Canvas for the current frame
    pub fn canvas(&mut self) -> &mut SpriteBatch {
        self.sprite_renderer.canvas()
    }

    /// Render the frame collected since `begin_frame`
    pub fn render(&mut self) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let view_uniform = ViewUniform::new(&self.viewport);
        self.queue.write_buffer(
            self.sprite_renderer.view_buffer(),
            0,
            bytemuck::cast_slice(&[view_uniform]),
        );
        self.sprite_renderer.prepare(&self.queue, &self.texture_manager);

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let (x, y, width, height) = self.viewport.presentation_rect();
            render_pass.set_viewport(x, y, width, height, 0.0, 1.0);

            self.sprite_renderer.render(&mut render_pass, &self.texture_manager);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl TextureLoader for Renderer {
    fn load_texture(&mut self, path: &Path) -> Result<TextureInfo, LoadError> {
        if let Some(info) = self.texture_manager.cached(path) {
            return Ok(info);
        }

        if !AssetType::Texture.accepts(path) {
            return Err(LoadError::UnsupportedFormat(path.to_path_buf()));
        }

        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let img = image::load_from_memory(&bytes).map_err(|e| LoadError::Image {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let info = self
            .texture_manager
            .insert_image(&self.device, &self.queue, path, &img);
        debug!(
            "Loaded texture {} ({}x{}, {} resident)",
            path.display(),
            info.width,
            info.height,
            self.texture_manager.texture_count()
        );

        Ok(info)
    }
}
