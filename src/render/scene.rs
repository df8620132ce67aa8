//! Scene pass resources: lit instanced meshes, textured photo planes and
//! additive snow billboards, all drawn into the HDR target.

use super::helpers::{self, linear_rgb, HDR_FORMAT};
use super::meshes::{MeshLibrary, MeshRange, MeshVertex, SNOW_CORNERS};
use crate::constants::*;
use crate::core::{
    Camera, Category, Particle, ParticleId, ParticleSystem, SnowField, COLOR_ACCENT_RED,
    COLOR_CHAMPAGNE_GOLD, COLOR_DEEP_GREEN, COLOR_FOG, PHOTO_FRAME_SIZE, PHOTO_PLANE_OFFSET_Z,
};
use fnv::FnvHashMap;
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct CameraUniforms {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    right: [f32; 4],
    up: [f32; 4],
    // rgb fog color, w density
    fog: [f32; 4],
    // x snow half-size, y snow opacity
    snow: [f32; 4],
}

/// Per-instance model matrix plus material parameters.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MeshInstance {
    model: [[f32; 4]; 4],
    // rgb base color, w shininess
    color: [f32; 4],
    // rgb emissive (stripe color for canes), w stripe flag
    emissive: [f32; 4],
}

impl MeshInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4,
        6 => Float32x4, 7 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }

    fn new(model: Mat4, material: &Material) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: material.color.extend(material.shine).to_array(),
            emissive: material.emissive.extend(material.stripes).to_array(),
        }
    }
}

struct Material {
    color: Vec3,
    shine: f32,
    emissive: Vec3,
    stripes: f32,
}

impl Material {
    fn lit(color: u32, shine: f32, emissive: u32, emissive_intensity: f32) -> Self {
        Self {
            color: linear_rgb(color),
            shine,
            emissive: linear_rgb(emissive) * emissive_intensity,
            stripes: 0.0,
        }
    }

    fn unlit(color: u32, opacity: f32) -> Self {
        Self {
            color: Vec3::ZERO,
            shine: 0.0,
            emissive: linear_rgb(color) * opacity,
            stripes: 0.0,
        }
    }

    fn striped(base: u32, stripe: u32) -> Self {
        Self {
            color: linear_rgb(base),
            shine: 0.4,
            emissive: linear_rgb(stripe),
            stripes: 1.0,
        }
    }
}

struct Palette {
    green: Material,
    gold: Material,
    red: Material,
    cane: Material,
    dust: Material,
    star: Material,
}

impl Palette {
    fn new() -> Self {
        Self {
            green: Material::lit(COLOR_DEEP_GREEN, 0.2, GREEN_EMISSIVE, 0.2),
            gold: Material::lit(COLOR_CHAMPAGNE_GOLD, 1.0, GOLD_EMISSIVE, 0.3),
            red: Material::lit(COLOR_ACCENT_RED, 0.6, RED_EMISSIVE, 1.0),
            cane: Material::striped(0xffffff, CANE_STRIPE),
            dust: Material::unlit(DUST_COLOR, 0.8),
            star: Material::lit(STAR_COLOR, 1.0, STAR_EMISSIVE, 1.0),
        }
    }
}

#[derive(Clone, Copy)]
enum MeshKind {
    Cube,
    Sphere,
    Tetra,
    Star,
}

const MESH_KINDS: [MeshKind; 4] = [MeshKind::Cube, MeshKind::Sphere, MeshKind::Tetra, MeshKind::Star];

/// Instances for one frame, bucketed by mesh so each bucket is one draw.
#[derive(Default)]
pub(crate) struct FrameInstances {
    buckets: [Vec<MeshInstance>; 4],
    photos: Vec<(ParticleId, MeshInstance)>,
}

impl FrameInstances {
    fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
        self.photos.clear();
    }

    #[inline]
    fn push(&mut self, kind: MeshKind, instance: MeshInstance) {
        self.buckets[kind as usize].push(instance);
    }

    fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum::<usize>() + self.photos.len()
    }
}

/// Photo texture ready to be attached to a particle.
pub struct PhotoTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

pub(crate) struct SceneResources {
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    photo_bgl: wgpu::BindGroupLayout,
    photo_sampler: wgpu::Sampler,
    mesh_pipeline: wgpu::RenderPipeline,
    photo_pipeline: wgpu::RenderPipeline,
    snow_pipeline: wgpu::RenderPipeline,
    meshes: MeshLibrary,
    mesh_vb: wgpu::Buffer,
    snow_corner_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    snow_vb: wgpu::Buffer,
    snow_capacity: usize,
    palette: Palette,
    frame: FrameInstances,
    snow_scratch: Vec<[f32; 3]>,
    photos: FnvHashMap<ParticleId, PhotoTexture>,
}

impl SceneResources {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::SCENE_WGSL.into()),
        });
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera_uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bg"),
            layout: &camera_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });
        let photo_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("photo_bgl"),
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
        });
        let photo_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("photo_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let mesh_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pl"),
            bind_group_layouts: &[&camera_bgl],
            push_constant_ranges: &[],
        });
        let photo_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("photo_pl"),
            bind_group_layouts: &[&camera_bgl, &photo_bgl],
            push_constant_ranges: &[],
        });

        let scene_pipeline = |label: &str,
                              layout: &wgpu::PipelineLayout,
                              vs: &str,
                              fs: &str,
                              buffers: &[wgpu::VertexBufferLayout],
                              blend: wgpu::BlendState,
                              depth_write: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(vs),
                    buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: Some(helpers::depth_state(depth_write)),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: HDR_FORMAT,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                cache: None,
                multiview: None,
            })
        };

        let mesh_buffers = [MeshVertex::layout(), MeshInstance::layout()];
        let mesh_pipeline = scene_pipeline(
            "mesh_pipeline",
            &mesh_pl,
            "vs_mesh",
            "fs_mesh",
            &mesh_buffers,
            wgpu::BlendState::REPLACE,
            true,
        );
        let photo_pipeline = scene_pipeline(
            "photo_pipeline",
            &photo_pl,
            "vs_mesh",
            "fs_photo",
            &mesh_buffers,
            wgpu::BlendState::REPLACE,
            true,
        );
        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        };
        let snow_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x2],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![1 => Float32x3],
            },
        ];
        let snow_pipeline = scene_pipeline(
            "snow_pipeline",
            &mesh_pl,
            "vs_snow",
            "fs_snow",
            &snow_buffers,
            additive,
            false,
        );

        let meshes = MeshLibrary::build();
        let mesh_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vb"),
            contents: bytemuck::cast_slice(&meshes.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let snow_corner_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("snow_corner_vb"),
            contents: bytemuck::cast_slice(&SNOW_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_capacity = 1024;
        let snow_capacity = 1024;

        Self {
            camera_buffer,
            camera_bind_group,
            photo_bgl,
            photo_sampler,
            mesh_pipeline,
            photo_pipeline,
            snow_pipeline,
            meshes,
            mesh_vb,
            snow_corner_vb,
            instance_vb: vertex_buffer::<MeshInstance>(device, "instance_vb", instance_capacity),
            instance_capacity,
            snow_vb: vertex_buffer::<[f32; 3]>(device, "snow_vb", snow_capacity),
            snow_capacity,
            palette: Palette::new(),
            frame: FrameInstances::default(),
            snow_scratch: Vec::new(),
            photos: FnvHashMap::default(),
        }
    }

    /// Upload a decoded image into a sampled texture.
    pub(crate) fn upload_photo(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &web_sys::HtmlImageElement,
    ) -> anyhow::Result<PhotoTexture> {
        let (width, height) = (image.natural_width(), image.natural_height());
        let max = device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            anyhow::bail!("photo size {}x{} outside 1..={}", width, height, max);
        }
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("photo_tex"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        queue.copy_external_image_to_texture(
            &wgpu::CopyExternalImageSourceInfo {
                source: wgpu::ExternalImageSource::HTMLImageElement(image.clone()),
                origin: wgpu::Origin2d::ZERO,
                flip_y: false,
            },
            wgpu::CopyExternalImageDestInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
                color_space: wgpu::PredefinedColorSpace::Srgb,
                premultiplied_alpha: false,
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("photo_bg"),
            layout: &self.photo_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.photo_sampler),
                },
            ],
        });
        Ok(PhotoTexture {
            _texture: texture,
            bind_group,
        })
    }

    #[inline]
    pub(crate) fn attach_photo(&mut self, id: ParticleId, texture: PhotoTexture) {
        self.photos.insert(id, texture);
    }

    pub(crate) fn write_camera(&self, queue: &wgpu::Queue, camera: &Camera) {
        let view = camera.view_matrix();
        // Rows of the view rotation are the camera axes in world space
        let right = view.row(0).truncate();
        let up = view.row(1).truncate();
        let fog = linear_rgb(COLOR_FOG);
        let u = CameraUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
            right: right.extend(0.0).to_array(),
            up: up.extend(0.0).to_array(),
            fog: fog.extend(FOG_DENSITY).to_array(),
            snow: [SNOW_POINT_SIZE, SNOW_OPACITY, 0.0, 0.0],
        };
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&u));
    }

    /// Rebuild this frame's instance data and upload it.
    pub(crate) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        system: &ParticleSystem,
        snow: &SnowField,
        group_world: Mat4,
    ) {
        self.frame.clear();
        for p in system.particles() {
            push_particle(&mut self.frame, &self.palette, group_world, p);
        }
        let star = group_world * Mat4::from_translation(system.star_position());
        self.frame
            .push(MeshKind::Star, MeshInstance::new(star, &self.palette.star));

        let needed = self.frame.total();
        if needed > self.instance_capacity {
            self.instance_capacity = needed.next_power_of_two();
            self.instance_vb =
                vertex_buffer::<MeshInstance>(device, "instance_vb", self.instance_capacity);
        }
        let mut offset = 0u64;
        let stride = std::mem::size_of::<MeshInstance>() as u64;
        for bucket in &self.frame.buckets {
            queue.write_buffer(&self.instance_vb, offset, bytemuck::cast_slice(bucket));
            offset += bucket.len() as u64 * stride;
        }
        let planes: Vec<MeshInstance> = self.frame.photos.iter().map(|(_, m)| *m).collect();
        queue.write_buffer(&self.instance_vb, offset, bytemuck::cast_slice(&planes));

        self.snow_scratch.clear();
        self.snow_scratch
            .extend(snow.flakes().iter().map(|f| f.position.to_array()));
        if self.snow_scratch.len() > self.snow_capacity {
            self.snow_capacity = self.snow_scratch.len().next_power_of_two();
            self.snow_vb = vertex_buffer::<[f32; 3]>(device, "snow_vb", self.snow_capacity);
        }
        queue.write_buffer(&self.snow_vb, 0, bytemuck::cast_slice(&self.snow_scratch));
    }

    /// Record the opaque meshes, the photo planes and then the snow.
    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_pipeline(&self.mesh_pipeline);
        pass.set_vertex_buffer(0, self.mesh_vb.slice(..));
        pass.set_vertex_buffer(1, self.instance_vb.slice(..));
        let mut first = 0u32;
        for kind in MESH_KINDS {
            let count = self.frame.buckets[kind as usize].len() as u32;
            if count > 0 {
                pass.draw(self.mesh_range(kind).vertices(), first..first + count);
            }
            first += count;
        }

        if !self.frame.photos.is_empty() {
            pass.set_pipeline(&self.photo_pipeline);
            for (i, (id, _)) in self.frame.photos.iter().enumerate() {
                // Frames without a texture yet keep only their gold backing
                let Some(photo) = self.photos.get(id) else {
                    continue;
                };
                let slot = first + i as u32;
                pass.set_bind_group(1, &photo.bind_group, &[]);
                pass.draw(self.meshes.quad.vertices(), slot..slot + 1);
            }
        }

        let flakes = self.snow_scratch.len() as u32;
        if flakes > 0 {
            pass.set_pipeline(&self.snow_pipeline);
            pass.set_vertex_buffer(0, self.snow_corner_vb.slice(..));
            pass.set_vertex_buffer(1, self.snow_vb.slice(..));
            pass.draw(0..SNOW_CORNERS.len() as u32, 0..flakes);
        }
    }

    fn mesh_range(&self, kind: MeshKind) -> MeshRange {
        match kind {
            MeshKind::Cube => self.meshes.cube,
            MeshKind::Sphere => self.meshes.sphere,
            MeshKind::Tetra => self.meshes.tetra,
            MeshKind::Star => self.meshes.star,
        }
    }
}

fn vertex_buffer<T>(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (std::mem::size_of::<T>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn push_particle(out: &mut FrameInstances, palette: &Palette, group_world: Mat4, p: &Particle) {
    let t = p.transform();
    if t.scale <= 1e-3 {
        return;
    }
    let model = group_world * t.matrix();
    let shaped = |size: Vec3| model * Mat4::from_scale(size);
    match p.category() {
        Category::GreenBox => out.push(
            MeshKind::Cube,
            MeshInstance::new(shaped(Vec3::splat(BOX_SIZE)), &palette.green),
        ),
        Category::GoldBox => out.push(
            MeshKind::Cube,
            MeshInstance::new(shaped(Vec3::splat(BOX_SIZE)), &palette.gold),
        ),
        Category::GoldSphere => out.push(
            MeshKind::Sphere,
            MeshInstance::new(shaped(Vec3::splat(SPHERE_RADIUS)), &palette.gold),
        ),
        Category::RedSphere => out.push(
            MeshKind::Sphere,
            MeshInstance::new(shaped(Vec3::splat(SPHERE_RADIUS)), &palette.red),
        ),
        Category::CandyCane => out.push(
            MeshKind::Cube,
            MeshInstance::new(
                shaped(Vec3::new(CANE_THICKNESS, CANE_LENGTH, CANE_THICKNESS)),
                &palette.cane,
            ),
        ),
        Category::Dust => out.push(
            MeshKind::Tetra,
            MeshInstance::new(shaped(Vec3::splat(DUST_SIZE)), &palette.dust),
        ),
        Category::Photo => {
            let Some(frame) = p.photo() else {
                return;
            };
            let [sx, sy] = frame.backing_scale();
            let backing = shaped(Vec3::new(
                PHOTO_FRAME_SIZE * sx,
                PHOTO_FRAME_SIZE * sy,
                PHOTO_FRAME_DEPTH,
            ));
            out.push(MeshKind::Cube, MeshInstance::new(backing, &palette.gold));
            let plane = model
                * Mat4::from_translation(Vec3::new(0.0, 0.0, PHOTO_PLANE_OFFSET_Z))
                * Mat4::from_scale(Vec3::new(frame.width, frame.height, 1.0));
            out.photos
                .push((p.id(), MeshInstance::new(plane, &palette.gold)));
        }
    }
}
