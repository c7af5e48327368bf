//! GPU textures: the sampled colour textures of the scene and the depth buffer.

use anyhow::{Context as _, ensure};
use image::{DynamicImage, GenericImageView, ImageFormat};
use wgpu::util::DeviceExt;

/// A sampled colour texture.
#[derive(Clone, Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// How decoded image rows map to texture rows and which colour space they are in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureOptions {
    /// Flip the image vertically on upload. glTF UVs already have their origin
    /// at the top-left, so textures applied to glTF meshes keep this `false`.
    pub flip_y: bool,
    /// Treat the image as sRGB colour data (as opposed to linear data).
    pub srgb: bool,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            flip_y: false,
            srgb: true,
        }
    }
}

impl Texture {
    /// Decode an image file. The format is taken from the extension of
    /// `name` when it has one and sniffed from the bytes otherwise.
    pub fn decode(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        name: &str,
        options: TextureOptions,
    ) -> anyhow::Result<Self> {
        let image = match ImageFormat::from_path(name) {
            Ok(format) => image::load_from_memory_with_format(bytes, format),
            Err(_) => image::load_from_memory(bytes),
        }
        .with_context(|| format!("{name} is not a readable image"))?;
        Self::from_image(device, queue, &image, name, options)
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DynamicImage,
        label: &str,
        options: TextureOptions,
    ) -> anyhow::Result<Self> {
        let (width, height) = image.dimensions();
        ensure!(width > 0 && height > 0, "texture {label} has no pixels");
        let rgba = if options.flip_y {
            image.flipv().to_rgba8()
        } else {
            image.to_rgba8()
        };
        Ok(Self::from_rgba8(device, queue, &rgba, [width, height], label, options.srgb))
    }

    /// A 1x1 texture of a single colour, the stand-in for a missing image.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4], label: &str) -> Self {
        Self::from_rgba8(device, queue, &rgba, [1, 1], label, true)
    }

    pub(crate) fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        [width, height]: [u32; 2],
        label: &str,
        srgb: bool,
    ) -> Self {
        let format = if srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            rgba,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });
        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// Samples per pixel of the scene pass when the adapter supports it.
pub const SAMPLE_COUNT: u32 = 4;

/// [`SAMPLE_COUNT`] if both the colour and the depth format can be
/// multisampled that often, otherwise 1 (no antialiasing).
pub fn pick_sample_count(
    color: wgpu::TextureFormatFeatureFlags,
    depth: wgpu::TextureFormatFeatureFlags,
) -> u32 {
    if color.sample_count_supported(SAMPLE_COUNT) && depth.sample_count_supported(SAMPLE_COUNT) {
        SAMPLE_COUNT
    } else {
        1
    }
}

fn attachment(
    device: &wgpu::Device,
    label: &str,
    format: wgpu::TextureFormat,
    [width, height]: [u32; 2],
    sample_count: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Depth buffer sized after the surface. Recreated on every resize.
#[derive(Debug)]
pub struct DepthTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(device: &wgpu::Device, width: u32, height: u32, sample_count: u32) -> Self {
        let (texture, view) = attachment(device, "depth_texture", Self::FORMAT, [width, height], sample_count);
        Self { texture, view }
    }
}

/// Multisampled colour buffer the scene is drawn into and resolved from.
/// Sized and recreated like [`DepthTexture`].
#[derive(Debug)]
pub struct MultisampleTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl MultisampleTexture {
    /// `None` when `sample_count` is 1 and the frame can be drawn into directly.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Option<Self> {
        if sample_count <= 1 {
            return None;
        }
        let (texture, view) = attachment(device, "msaa_texture", format, [width, height], sample_count);
        Some(Self { texture, view })
    }

    /// View and resolve target of a colour attachment that ends up in `target`.
    pub fn attachment<'a>(
        msaa: Option<&'a Self>,
        target: &'a wgpu::TextureView,
    ) -> (&'a wgpu::TextureView, Option<&'a wgpu::TextureView>) {
        match msaa {
            Some(msaa) => (&msaa.view, Some(target)),
            None => (target, None),
        }
    }
}
