use glam::UVec2;

use super::Bindable;

/// A 2D texture plus the view needed to attach it to passes.
///
/// Atlas textures are created through [`Texture::new()`] and can be bound
/// readable (plain texture, for `textureLoad`) or writable (write-only
/// storage texture). Depth buffers go through [`Texture::depth()`] instead
/// and are only ever used as render attachments.
#[derive(Debug)]
pub struct Texture {
    tex_view: wgpu::TextureView,
    size: UVec2,
    format: wgpu::TextureFormat,
}

impl Texture {
    pub fn new(
        device: &wgpu::Device,
        label: impl AsRef<str>,
        size: UVec2,
        format: wgpu::TextureFormat,
    ) -> Self {
        Self::create(
            device,
            label,
            size,
            format,
            wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::STORAGE_BINDING,
        )
    }

    pub fn depth(
        device: &wgpu::Device,
        label: impl AsRef<str>,
        size: UVec2,
    ) -> Self {
        Self::create(
            device,
            label,
            size,
            wgpu::TextureFormat::Depth32Float,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        )
    }

    fn create(
        device: &wgpu::Device,
        label: impl AsRef<str>,
        size: UVec2,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let label = label.as_ref();

        log::debug!(
            "Allocating texture `{label}`; size={size:?}, format={format:?}"
        );

        assert!(size.x > 0);
        assert!(size.y > 0);

        let tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label}_tex")),
            size: wgpu::Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });

        let tex_view = tex.create_view(&Default::default());

        Self {
            tex_view,
            size,
            format,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.tex_view
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn bind_readable(&self) -> impl Bindable + '_ {
        ReadableTexture { parent: self }
    }

    pub fn bind_writable(&self) -> impl Bindable + '_ {
        WritableTexture { parent: self }
    }
}

struct ReadableTexture<'a> {
    parent: &'a Texture,
}

impl Bindable for ReadableTexture<'_> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT
                | wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float {
                    filterable: false,
                },
            },
            count: None,
        };

        let resource =
            wgpu::BindingResource::TextureView(&self.parent.tex_view);

        vec![(layout, resource)]
    }
}

struct WritableTexture<'a> {
    parent: &'a Texture,
}

impl Bindable for WritableTexture<'_> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::StorageTexture {
                access: wgpu::StorageTextureAccess::WriteOnly,
                format: self.parent.format,
                view_dimension: wgpu::TextureViewDimension::D2,
            },
            count: None,
        };

        let resource =
            wgpu::BindingResource::TextureView(&self.parent.tex_view);

        vec![(layout, resource)]
    }
}
