// Sprite batching and rendering

use super::canvas::{Canvas, SpriteDraw};
use super::texture::TextureManager;
use super::viewport::ViewUniform;
use super::Vertex;
use crate::core::Rect;
use crate::engine::assets::TextureHandle;
use glam::{Mat4, Vec2, Vec4};
use log::{trace, warn};
use std::ops::Range;
use wgpu::util::DeviceExt;

/// Quads that fit in one frame's vertex buffer
pub const MAX_QUADS: usize = 16_384;

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

#[derive(Debug, Clone, Copy, PartialEq)]
enum DrawCommand {
    Sprite(SpriteDraw),
    Fill(Rect, Vec4),
}

/// Run of consecutive quads sharing one texture
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub texture: TextureHandle,
    pub quads: Range<u32>,
}

/// CPU side of the sprite renderer: collects draw calls in submission order
#[derive(Debug, Default)]
pub struct SpriteBatch {
    commands: Vec<DrawCommand>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything queued for the previous frame
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of queued draw calls
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Turn queued draws into vertices and texture batches.
    ///
    /// `texture_size` reports the texel size of a handle, or `None` when the
    /// texture is unknown; such sprites are dropped. Fills sample `white`.
    pub fn build(
        &self,
        texture_size: impl Fn(TextureHandle) -> Option<Vec2>,
        white: TextureHandle,
    ) -> (Vec<Vertex>, Vec<Batch>) {
        let mut vertices = Vec::with_capacity(self.commands.len().min(MAX_QUADS) * 4);
        let mut batches: Vec<Batch> = Vec::new();

        if self.commands.len() > MAX_QUADS {
            warn!(
                "Sprite batch overflow: {} quads queued, drawing the first {}",
                self.commands.len(),
                MAX_QUADS
            );
        }

        for command in self.commands.iter().take(MAX_QUADS) {
            let (texture, corners) = match *command {
                DrawCommand::Sprite(sprite) => {
                    let Some(size) = texture_size(sprite.texture) else {
                        continue;
                    };
                    (sprite.texture, sprite_quad(&sprite, size))
                }
                DrawCommand::Fill(rect, color) => (white, fill_quad(rect, color)),
            };

            let index = (vertices.len() / 4) as u32;
            vertices.extend_from_slice(&corners);

            match batches.last_mut() {
                Some(batch) if batch.texture == texture => batch.quads.end = index + 1,
                _ => batches.push(Batch {
                    texture,
                    quads: index..index + 1,
                }),
            }
        }

        (vertices, batches)
    }
}

impl Canvas for SpriteBatch {
    fn draw_sprite(&mut self, sprite: SpriteDraw) {
        self.commands.push(DrawCommand::Sprite(sprite));
    }

    fn fill_rect(&mut self, rect: Rect, color: Vec4) {
        self.commands.push(DrawCommand::Fill(rect, color));
    }
}

/// Corners in the order top-left, top-right, bottom-right, bottom-left
fn quad(dest: Rect, uv: Rect, color: Vec4) -> [Vertex; 4] {
    [
        Vertex::new(dest.min, uv.min, color),
        Vertex::new(Vec2::new(dest.max.x, dest.min.y), Vec2::new(uv.max.x, uv.min.y), color),
        Vertex::new(dest.max, uv.max, color),
        Vertex::new(Vec2::new(dest.min.x, dest.max.y), Vec2::new(uv.min.x, uv.max.y), color),
    ]
}

fn sprite_quad(sprite: &SpriteDraw, texture_size: Vec2) -> [Vertex; 4] {
    let mut uv = Rect {
        min: sprite.source.min / texture_size,
        max: sprite.source.max / texture_size,
    };
    if sprite.flip_x {
        std::mem::swap(&mut uv.min.x, &mut uv.max.x);
    }

    let dest = Rect::from_origin_size(sprite.dest, sprite.size);
    quad(dest, uv, Vec4::ONE)
}

fn fill_quad(rect: Rect, color: Vec4) -> [Vertex; 4] {
    quad(rect, Rect::new(0.0, 0.0, 1.0, 1.0), color)
}

/// Sprite renderer: uploads a frame's batch and draws it with one pipeline
pub struct SpriteRenderer {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    view_buffer: wgpu::Buffer,
    view_bind_group: wgpu::BindGroup,
    batch: SpriteBatch,
    prepared: Vec<Batch>,
}

impl SpriteRenderer {
    /// Create a new sprite renderer
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let view_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("View Bind Group Layout"),
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
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[&view_bind_group_layout, texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The y-down projection reverses winding
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Vertex Buffer"),
            size: (MAX_QUADS * 4 * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let indices: Vec<u32> = (0..MAX_QUADS as u32)
            .flat_map(|quad| QUAD_INDICES.iter().map(move |i| quad * 4 + i))
            .collect();

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sprite Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let view_uniform = ViewUniform {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        };

        let view_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("View Buffer"),
            contents: bytemuck::cast_slice(&[view_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let view_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("View Bind Group"),
            layout: &view_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_buffer.as_entire_binding(),
            }],
        });

        Self {
            render_pipeline,
            vertex_buffer,
            index_buffer,
            view_buffer,
            view_bind_group,
            batch: SpriteBatch::new(),
            prepared: Vec::new(),
        }
    }

    /// Canvas that collects this frame's draws
    pub fn canvas(&mut self) -> &mut SpriteBatch {
        &mut self.batch
    }

    /// Clear draws queued for the previous frame
    pub fn begin_frame(&mut self) {
        self.batch.clear();
        self.prepared.clear();
    }

    /// Upload the queued draws; call once per frame before `render`
    pub fn prepare(&mut self, queue: &wgpu::Queue, textures: &TextureManager) {
        if self.batch.is_empty() {
            self.prepared.clear();
            return;
        }

        let (vertices, batches) = self.batch.build(
            |handle| {
                textures
                    .get(handle)
                    .map(|t| Vec2::new(t.width as f32, t.height as f32))
            },
            textures.white(),
        );

        if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        trace!(
            "Prepared {} draws in {} batches",
            self.batch.len(),
            batches.len()
        );
        self.prepared = batches;
    }

    /// Draw the prepared batches
    pub fn render<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        textures: &'a TextureManager,
    ) {
        if self.prepared.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.view_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        for batch in &self.prepared {
            let Some(texture) = textures.get(batch.texture) else {
                continue;
            };
            render_pass.set_bind_group(1, &texture.bind_group, &[]);
            render_pass.draw_indexed(batch.quads.start * 6..batch.quads.end * 6, 0, 0..1);
        }
    }

    /// Get a reference to the view uniform buffer
    pub fn view_buffer(&self) -> &wgpu::Buffer {
        &self.view_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::{AssetHandle, AssetId};
    use approx::assert_relative_eq;
    use std::path::Path;

    fn handle(name: &str) -> TextureHandle {
        AssetHandle::new(AssetId::from_path(Path::new(name)))
    }

    fn sprite(texture: TextureHandle, flip_x: bool) -> SpriteDraw {
        SpriteDraw {
            texture,
            source: Rect::new(32.0, 0.0, 64.0, 32.0),
            dest: Vec2::new(10.0, 20.0),
            size: Vec2::new(32.0, 32.0),
            flip_x,
        }
    }

    fn size_128(_: TextureHandle) -> Option<Vec2> {
        Some(Vec2::new(128.0, 32.0))
    }

    #[test]
    fn test_sprite_quad_positions_and_uvs() {
        let mut batch = SpriteBatch::new();
        batch.draw_sprite(sprite(handle("run.png"), false));

        let (vertices, batches) = batch.build(size_128, handle("white"));
        assert_eq!(vertices.len(), 4);
        assert_eq!(batches.len(), 1);

        assert_eq!(vertices[0].position, [10.0, 20.0]);
        assert_eq!(vertices[2].position, [42.0, 52.0]);
        assert_relative_eq!(vertices[0].tex_coords[0], 0.25);
        assert_relative_eq!(vertices[1].tex_coords[0], 0.5);
        assert_relative_eq!(vertices[2].tex_coords[1], 1.0);
    }

    #[test]
    fn test_flipped_sprite_swaps_u() {
        let mut batch = SpriteBatch::new();
        batch.draw_sprite(sprite(handle("run.png"), true));

        let (vertices, _) = batch.build(size_128, handle("white"));
        assert_relative_eq!(vertices[0].tex_coords[0], 0.5);
        assert_relative_eq!(vertices[1].tex_coords[0], 0.25);
    }

    #[test]
    fn test_consecutive_draws_share_batch() {
        let tiles = handle("tiles.png");
        let player = handle("idle.png");
        let mut batch = SpriteBatch::new();
        batch.draw_sprite(sprite(tiles, false));
        batch.draw_sprite(sprite(tiles, false));
        batch.draw_sprite(sprite(player, false));
        batch.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Vec4::ONE);

        let (vertices, batches) = batch.build(size_128, handle("white"));
        assert_eq!(vertices.len(), 16);
        assert_eq!(
            batches,
            vec![
                Batch { texture: tiles, quads: 0..2 },
                Batch { texture: player, quads: 2..3 },
                Batch { texture: handle("white"), quads: 3..4 },
            ]
        );
    }

    #[test]
    fn test_fill_uses_color_and_white_texture() {
        let mut batch = SpriteBatch::new();
        let red = Vec4::new(1.0, 0.0, 0.0, 0.5);
        batch.fill_rect(Rect::new(1.0, 2.0, 3.0, 4.0), red);

        let (vertices, batches) = batch.build(|_| None, handle("white"));
        assert_eq!(batches[0].texture, handle("white"));
        assert!(vertices.iter().all(|v| v.color == red.to_array()));
    }

    #[test]
    fn test_unknown_texture_is_skipped() {
        let mut batch = SpriteBatch::new();
        batch.draw_sprite(sprite(handle("missing.png"), false));

        let (vertices, batches) = batch.build(|_| None, handle("white"));
        assert!(vertices.is_empty());
        assert!(batches.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut batch = SpriteBatch::new();
        batch.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Vec4::ONE);
        assert_eq!(batch.len(), 1);
        batch.clear();
        assert!(batch.is_empty());
    }
}
