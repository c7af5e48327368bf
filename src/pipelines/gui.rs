//! Screen-space pipeline painting egui output on top of the scene.
//!
//! egui hands over texture deltas and tessellated meshes in points. The
//! painter keeps one GPU texture per egui texture id, uploads the meshes of a
//! frame before the pass starts and replays them clipped to their rectangles.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{model::Vertex, texture::Texture},
    pipelines::{
        basic::{
            MaterialPipeline, PipelineOptions, RenderTarget, mk_texture_bind_group,
            mk_texture_layout, mk_uniform_layout,
        },
        uniform::UniformResources,
    },
};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GuiVertex {
    /// Points, origin top-left.
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    /// Premultiplied sRGBA.
    pub color: [u8; 4],
}

impl From<&egui::epaint::Vertex> for GuiVertex {
    fn from(vertex: &egui::epaint::Vertex) -> Self {
        Self {
            position: [vertex.pos.x, vertex.pos.y],
            tex_coords: [vertex.uv.x, vertex.uv.y],
            color: vertex.color.to_array(),
        }
    }
}

impl Vertex for GuiVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<GuiVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Unorm8x4,
                },
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenUniform {
    pub size_in_points: [f32; 2],
    pub _padding: [f32; 2],
}

/// Size of the drawing area in egui points and in physical pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScreenGeometry {
    pub size_in_points: [f32; 2],
    pub size_in_pixels: [u32; 2],
}

impl ScreenGeometry {
    /// Pixels per point of the surface. Differs from the window's scale factor
    /// when the drawing buffer is smaller than the window.
    pub fn pixels_per_point(&self) -> f32 {
        if self.size_in_points[0] <= 0.0 {
            return 1.0;
        }
        self.size_in_pixels[0] as f32 / self.size_in_points[0]
    }
}

/// Scissor rectangle `[x, y, width, height]` in pixels of a clip rectangle in
/// points, clamped to the target. `None` when nothing of it is visible.
pub fn scissor_rect(clip: egui::Rect, pixels_per_point: f32, [width, height]: [u32; 2]) -> Option<[u32; 4]> {
    let to_pixels = |points: f32, max: u32| (points * pixels_per_point).round().clamp(0.0, max as f32);
    let min_x = to_pixels(clip.min.x, width);
    let min_y = to_pixels(clip.min.y, height);
    let max_x = to_pixels(clip.max.x, width);
    let max_y = to_pixels(clip.max.y, height);
    if !(max_x > min_x && max_y > min_y) {
        return None;
    }
    Some([
        min_x as u32,
        min_y as u32,
        (max_x - min_x) as u32,
        (max_y - min_y) as u32,
    ])
}

/// Premultiplied sRGBA bytes of an egui image.
#[allow(unreachable_patterns)]
fn rgba_bytes(image: &egui::ImageData) -> Option<Vec<u8>> {
    match image {
        egui::ImageData::Color(image) => {
            Some(image.pixels.iter().flat_map(|pixel| pixel.to_array()).collect())
        }
        _ => None,
    }
}

fn filter_mode(filter: egui::TextureFilter) -> wgpu::FilterMode {
    match filter {
        egui::TextureFilter::Nearest => wgpu::FilterMode::Nearest,
        egui::TextureFilter::Linear => wgpu::FilterMode::Linear,
    }
}

/// One tessellated egui mesh of the current frame.
struct GuiDraw {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    amount: u32,
    texture: egui::TextureId,
    scissor: [u32; 4],
}

pub struct GuiPainter {
    pipeline: wgpu::RenderPipeline,
    screen: UniformResources<ScreenUniform>,
    texture_layout: wgpu::BindGroupLayout,
    textures: HashMap<egui::TextureId, (Texture, wgpu::BindGroup)>,
    draws: Vec<GuiDraw>,
    target_size: [u32; 2],
}

impl GuiPainter {
    pub fn new(device: &wgpu::Device, target: RenderTarget) -> Self {
        let screen_layout = mk_uniform_layout(device, wgpu::ShaderStages::VERTEX, "gui_screen_bind_group_layout");
        let texture_layout = mk_texture_layout(device, "gui_texture_bind_group_layout");
        let pipeline = MaterialPipeline {
            name: "gui",
            wgsl: include_str!("gui.wgsl"),
            bind_group_layouts: &[&screen_layout, &texture_layout],
            vertex_layouts: &[GuiVertex::desc()],
            options: PipelineOptions::OVERLAY,
        }
        .build(device, target);
        let screen = UniformResources::new(
            device,
            &screen_layout,
            ScreenUniform {
                size_in_points: [1.0, 1.0],
                _padding: [0.0; 2],
            },
            "gui_screen",
        );
        Self {
            pipeline,
            screen,
            texture_layout,
            textures: HashMap::new(),
            draws: Vec::new(),
            target_size: [1, 1],
        }
    }

    /// Create or patch the textures egui asks for.
    pub fn update_textures(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        set: &[(egui::TextureId, egui::epaint::ImageDelta)],
    ) {
        for (id, delta) in set {
            let Some(rgba) = rgba_bytes(&delta.image) else {
                log::warn!("gui: unsupported image data for {id:?}");
                continue;
            };
            let [width, height] = delta.image.size().map(|side| side as u32);
            match delta.pos {
                Some([x, y]) => {
                    let Some((texture, _)) = self.textures.get(id) else {
                        log::warn!("gui: partial update of unknown texture {id:?}");
                        continue;
                    };
                    queue.write_texture(
                        wgpu::TexelCopyTextureInfo {
                            texture: &texture.texture,
                            mip_level: 0,
                            origin: wgpu::Origin3d {
                                x: x as u32,
                                y: y as u32,
                                z: 0,
                            },
                            aspect: wgpu::TextureAspect::All,
                        },
                        &rgba,
                        wgpu::TexelCopyBufferLayout {
                            offset: 0,
                            bytes_per_row: Some(4 * width),
                            rows_per_image: Some(height),
                        },
                        wgpu::Extent3d {
                            width,
                            height,
                            depth_or_array_layers: 1,
                        },
                    );
                }
                None => {
                    let mut texture =
                        Texture::from_rgba8(device, queue, &rgba, [width, height], "gui_texture", true);
                    texture.sampler = device.create_sampler(&wgpu::SamplerDescriptor {
                        label: Some("gui_sampler"),
                        mag_filter: filter_mode(delta.options.magnification),
                        min_filter: filter_mode(delta.options.minification),
                        ..Default::default()
                    });
                    let bind_group =
                        mk_texture_bind_group(device, &self.texture_layout, &texture, "gui_bind_group");
                    self.textures.insert(*id, (texture, bind_group));
                }
            }
        }
    }

    pub fn free_textures(&mut self, free: &[egui::TextureId]) {
        for id in free {
            self.textures.remove(id);
        }
    }

    /// Upload the meshes of this frame. Callbacks are not supported and skipped.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        primitives: &[egui::ClippedPrimitive],
        screen: ScreenGeometry,
    ) {
        self.screen.uniform.size_in_points = screen.size_in_points;
        self.screen.write(queue);
        self.target_size = screen.size_in_pixels;

        let pixels_per_point = screen.pixels_per_point();
        self.draws = primitives
            .iter()
            .filter_map(|clipped| {
                let egui::epaint::Primitive::Mesh(mesh) = &clipped.primitive else {
                    return None;
                };
                if mesh.indices.is_empty() {
                    return None;
                }
                let scissor = scissor_rect(clipped.clip_rect, pixels_per_point, screen.size_in_pixels)?;
                let vertices: Vec<GuiVertex> = mesh.vertices.iter().map(GuiVertex::from).collect();
                let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("gui_vertex_buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("gui_index_buffer"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                Some(GuiDraw {
                    vertex,
                    index,
                    amount: mesh.indices.len() as u32,
                    texture: mesh.texture_id,
                    scissor,
                })
            })
            .collect();
    }

    pub fn paint(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.draws.is_empty() {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.screen.bind_group, &[]);
        for draw in &self.draws {
            let Some((_, bind_group)) = self.textures.get(&draw.texture) else {
                continue;
            };
            let [x, y, width, height] = draw.scissor;
            pass.set_scissor_rect(x, y, width, height);
            pass.set_bind_group(1, bind_group, &[]);
            pass.set_vertex_buffer(0, draw.vertex.slice(..));
            pass.set_index_buffer(draw.index.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..draw.amount, 0, 0..1);
        }
        let [width, height] = self.target_size;
        pass.set_scissor_rect(0, 0, width, height);
    }
}
