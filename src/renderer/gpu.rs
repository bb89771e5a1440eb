use std::sync::Arc;

use anyhow::{Context, anyhow};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::math::{Mesh, Vertex};
use crate::renderer::camera::{Camera, CameraUniform};
use crate::renderer::texture::{GpuTexture, TextureImage};
use crate::scene::{SceneDesc, SceneObject};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalsUniform {
    pub camera: CameraUniform,
    pub light_positions: [[f32; 4]; SceneDesc::MAX_LIGHTS],
    pub light_colors: [[f32; 4]; SceneDesc::MAX_LIGHTS],
    pub ambient: [f32; 4],
}

impl GlobalsUniform {
    pub fn new(camera: &Camera, scene: &SceneDesc) -> Self {
        let mut light_positions = [[0.0; 4]; SceneDesc::MAX_LIGHTS];
        let mut light_colors = [[0.0; 4]; SceneDesc::MAX_LIGHTS];
        let lights = &scene.lights[..scene.lights.len().min(SceneDesc::MAX_LIGHTS)];

        for (i, light) in lights.iter().enumerate() {
            light_positions[i] = light.position.extend(1.0).to_array();
            light_colors[i] = light.color.extend(1.0).to_array();
        }

        let ambient_color = lights
            .first()
            .map(|l| l.color)
            .unwrap_or(glam::Vec3::ONE)
            * scene.ambient_strength;

        Self {
            camera: CameraUniform::from_camera(camera),
            light_positions,
            light_colors,
            ambient: ambient_color.extend(lights.len() as f32).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub material: [f32; 4],
}

impl ObjectUniform {
    pub fn new(object: &SceneObject) -> Self {
        let normal_matrix = normal_matrix(object.transform);
        let material = object.material;
        Self {
            model: object.transform.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            color: object.color,
            material: [
                material.specular_strength,
                material.shininess,
                if material.lit { 1.0 } else { 0.0 },
                0.0,
            ],
        }
    }
}

pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

/// Vertex and index buffers for one uploaded mesh. Dropping it releases both.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: mesh.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as u32,
        }
    }
}

struct DrawObject {
    mesh: GpuMesh,
    _uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct GpuState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,

    pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    object_bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    objects: Vec<DrawObject>,

    pub depth_texture: wgpu::TextureView,
}

impl GpuState {
    pub async fn new(window: Arc<winit::window::Window>, vsync: bool) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible GPU adapter found")?;

        let info = adapter.get_info();
        log::info!(
            "GPU adapter: {} ({:?}, driver {})",
            info.name,
            info.backend,
            info.driver_info
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no supported formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders.wgsl").into()),
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Buffer"),
            size: std::mem::size_of::<GlobalsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Globals Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let object_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Object Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&globals_bind_group_layout, &object_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let sampler = GpuTexture::create_sampler(&device);
        let depth_texture = Self::create_depth_texture(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            pipeline,
            globals_buffer,
            globals_bind_group,
            object_bind_group_layout,
            sampler,
            objects: Vec::new(),
            depth_texture,
        })
    }

    /// Uploads pre-generated meshes and decoded textures for every object in
    /// `scene`. `meshes` is parallel to `scene.objects`.
    pub fn upload_scene(
        &mut self,
        scene: &SceneDesc,
        meshes: &[Mesh],
        textures: &[TextureImage],
    ) -> anyhow::Result<()> {
        anyhow::ensure!(
            meshes.len() == scene.objects.len(),
            "expected {} meshes, got {}",
            scene.objects.len(),
            meshes.len()
        );

        let max_dimension = self.device.limits().max_texture_dimension_2d;
        for image in textures {
            image.ensure_fits(max_dimension)?;
        }

        let white = GpuTexture::upload(&self.device, &self.queue, &TextureImage::white());
        let uploaded: Vec<(&str, GpuTexture)> = textures
            .iter()
            .map(|image| {
                (
                    image.name.as_str(),
                    GpuTexture::upload(&self.device, &self.queue, image),
                )
            })
            .collect();

        let mut objects = Vec::with_capacity(scene.objects.len());
        for (object, mesh) in scene.objects.iter().zip(meshes) {
            let texture = match object.texture {
                Some(name) => uploaded
                    .iter()
                    .find(|(n, _)| *n == name)
                    .map(|(_, t)| t)
                    .with_context(|| format!("texture {name} was not loaded"))?,
                None => &white,
            };

            let uniform_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Object Buffer", object.label)),
                    contents: bytemuck::cast_slice(&[ObjectUniform::new(object)]),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });

            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{} Bind Group", object.label)),
                layout: &self.object_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            });

            log::debug!(
                "uploaded {}: {} vertices, {} indices",
                object.label,
                mesh.vertex_count(),
                mesh.index_count()
            );

            objects.push(DrawObject {
                mesh: GpuMesh::upload(&self.device, object.label, mesh),
                _uniform_buffer: uniform_buffer,
                bind_group,
            });
        }

        self.objects = objects;
        Ok(())
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Self::create_depth_texture(&self.device, &self.config);
        }
    }

    /// Returns `Ok(None)` when the frame should be skipped.
    pub fn acquire_frame(&mut self) -> anyhow::Result<Option<wgpu::SurfaceTexture>> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.resize(self.size);
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface acquire timed out, skipping frame");
                Ok(None)
            }
            Err(e) => Err(anyhow!("unrecoverable surface error: {e}")),
        }
    }

    pub fn update_globals(&self, camera: &Camera, scene: &SceneDesc) {
        let uniform = GlobalsUniform::new(camera, scene);
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn render_scene(
        &self,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        clear_color: wgpu::Color,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.globals_bind_group, &[]);

        for object in &self.objects {
            render_pass.set_bind_group(1, &object.bind_group, &[]);
            render_pass.set_vertex_buffer(0, object.mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(
                object.mesh.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            render_pass.draw_indexed(0..object.mesh.index_count, 0, 0..1);
        }
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

/// Inverse transpose of `model`, keeping normals perpendicular under
/// non-uniform scale.
pub fn normal_matrix(model: Mat4) -> Mat4 {
    model.inverse().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ScenePreset;
    use glam::Vec3;

    #[test]
    fn uniform_sizes_match_shader_layout() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 144);
        assert_eq!(std::mem::size_of::<GlobalsUniform>(), 224);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 160);
    }

    #[test]
    fn globals_pack_lights_and_ambient() {
        let scene = SceneDesc::build(ScenePreset::Desk).unwrap();
        let globals = GlobalsUniform::new(&Camera::default(), &scene);
        assert_eq!(globals.light_positions[0], [1.5, 5.0, 3.0, 1.0]);
        assert_eq!(globals.light_positions[1], [-1.5, 5.0, -3.0, 1.0]);
        assert_eq!(globals.ambient[3], 2.0);
        assert!((globals.ambient[0] - 0.1).abs() < 1e-6);
        assert!((globals.ambient[2] - 0.08).abs() < 1e-6);
    }

    #[test]
    fn unlit_scene_has_no_active_lights() {
        let scene = SceneDesc::build(ScenePreset::Sketch).unwrap();
        let globals = GlobalsUniform::new(&Camera::default(), &scene);
        assert_eq!(globals.ambient, [1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn object_uniform_encodes_material() {
        let scene = SceneDesc::build(ScenePreset::Sketch).unwrap();
        let uniform = ObjectUniform::new(&scene.objects[0]);
        assert_eq!(uniform.material[2], 0.0);
        assert_eq!(uniform.color, [0.8, 0.8, 0.8, 1.0]);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let model = Mat4::from_scale(Vec3::new(0.2, 0.2, 0.5));
        let n = normal_matrix(model).transform_vector3(Vec3::new(0.0, 0.0, 1.0));
        assert!((n.normalize() - Vec3::Z).length() < 1e-6);
        let n = normal_matrix(model).transform_vector3(Vec3::new(1.0, 0.0, 1.0));
        assert!(n.x > n.z);
    }

    #[test]
    fn vertex_layout_matches_vertex_struct() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 32);
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
    }
}
