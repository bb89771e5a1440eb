use std::path::{Path, PathBuf};

use anyhow::Context;

/// Decoded RGBA8 image, rows flipped so that texture coordinate (0, 0)
/// addresses the bottom-left of the source image.
#[derive(Clone)]
pub struct TextureImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let decoded = image::open(path)
            .with_context(|| format!("failed to load texture {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        log::debug!(
            "decoded {} ({}x{}, {:?})",
            name,
            decoded.width(),
            decoded.height(),
            decoded.color()
        );

        Ok(Self::from_rgba(name, decoded.flipv().into_rgba8()))
    }

    pub fn from_rgba(name: impl Into<String>, image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            name: name.into(),
            width,
            height,
            pixels: image.into_raw(),
        }
    }

    /// Fails when either side exceeds the device's 2D texture limit.
    pub fn ensure_fits(&self, max_dimension: u32) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.width <= max_dimension && self.height <= max_dimension,
            "texture {} is {}x{}, larger than the device limit of {max_dimension}",
            self.name,
            self.width,
            self.height
        );
        Ok(())
    }

    /// 1x1 opaque white, used by objects without an image.
    pub fn white() -> Self {
        Self {
            name: "white".into(),
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        }
    }
}

/// Loads each named file from `dir`. The first failure aborts the batch.
pub fn load_all<'a>(
    dir: &Path,
    names: impl IntoIterator<Item = &'a str>,
) -> anyhow::Result<Vec<TextureImage>> {
    names
        .into_iter()
        .map(|name| {
            let path: PathBuf = dir.join(name);
            let mut image = TextureImage::load(&path)?;
            image.name = name.to_string();
            Ok(image)
        })
        .collect()
}

pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl GpuTexture {
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, image: &TextureImage) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&image.name),
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
            &image.pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    pub fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Texture Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_keeps_dimensions() {
        let image = image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 4]));
        let texture = TextureImage::from_rgba("tile", image);
        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(texture.pixels.len(), 3 * 2 * 4);
        assert_eq!(&texture.pixels[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn oversized_texture_is_rejected_by_name() {
        let image = image::RgbaImage::new(16, 4);
        let texture = TextureImage::from_rgba("Granite.jpg", image);
        assert!(texture.ensure_fits(16).is_ok());

        let err = texture.ensure_fits(8).unwrap_err().to_string();
        assert!(err.contains("Granite.jpg"));
        assert!(err.contains("16x4"));
    }

    #[test]
    fn load_flips_rows_and_expands_to_rgba() {
        let dir = std::env::temp_dir().join(format!("solids3d-texture-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("stripe.png");

        let mut rgb = image::RgbImage::new(1, 2);
        rgb.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        rgb.put_pixel(0, 1, image::Rgb([0, 0, 255]));
        rgb.save(&path).unwrap();

        let texture = TextureImage::load(&path).unwrap();
        assert_eq!(texture.name, "stripe.png");
        assert_eq!(texture.pixels, vec![0, 0, 255, 255, 255, 0, 0, 255]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_all(Path::new("does/not/exist"), ["nope.png"])
            .err()
            .expect("missing texture must fail");
        assert!(err.to_string().contains("nope.png"));
    }
}
