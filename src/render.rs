use crate::core::{Camera, ParticleId, ParticleSystem, SnowField, COLOR_BACKGROUND};
use glam::Mat4;
use web_sys as web;

mod helpers;
mod meshes;
mod post;
mod scene;
mod targets;

use scene::SceneResources;
use targets::RenderTargets;

pub use scene::PhotoTexture;

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    post: post::PostResources,
    bind_groups: post::PostBindGroups,
    scene: SceneResources,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits keep older WebGPU implementations happy
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let targets = RenderTargets::new(&device, width, height);
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::POST_WGSL.into()),
        });
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post = post::create_post_resources(&device, &post_shader, helpers::HDR_FORMAT, format);
        let bind_groups = post::create_bind_groups(&device, &post, &linear_sampler, &targets);
        let scene = SceneResources::new(&device);

        let bg = helpers::linear_rgb(COLOR_BACKGROUND);
        log::info!(
            "[gpu] surface {}x{} format={:?}",
            width,
            height,
            format
        );
        Ok(Self {
            surface,
            device,
            queue,
            config,
            targets,
            linear_sampler,
            post,
            bind_groups,
            scene,
            width,
            height,
            clear_color: wgpu::Color {
                r: bg.x as f64,
                g: bg.y as f64,
                b: bg.z as f64,
                a: 1.0,
            },
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);

            self.targets.recreate(&self.device, width, height);
            self.bind_groups = post::create_bind_groups(
                &self.device,
                &self.post,
                &self.linear_sampler,
                &self.targets,
            );
        }
    }

    /// Copy a decoded image into a GPU texture. Fails for images the
    /// device cannot hold.
    #[inline]
    pub fn upload_photo(&self, image: &web::HtmlImageElement) -> anyhow::Result<PhotoTexture> {
        self.scene.upload_photo(&self.device, &self.queue, image)
    }

    #[inline]
    pub fn attach_photo(&mut self, id: ParticleId, texture: PhotoTexture) {
        self.scene.attach_photo(id, texture);
    }

    pub fn render(
        &mut self,
        camera: &Camera,
        system: &ParticleSystem,
        snow: &SnowField,
        group_world: Mat4,
    ) -> Result<(), wgpu::SurfaceError> {
        self.scene.write_camera(&self.queue, camera);
        self.scene
            .prepare(&self.device, &self.queue, system, snow, group_world);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        // Pass 1: scene -> HDR
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.scene.draw(&mut rpass);
        }

        self.queue.submit(Some(encoder.finish()));

        // Uniform writes land at submit time, so each blit with its own
        // blur direction is submitted on its own.
        let (bw, bh) = targets::bloom_size(self.width, self.height);
        let res = [bw as f32, bh as f32];
        let t = &self.targets;
        let bg = &self.bind_groups;

        // Pass 2: bright pass -> bloom_a
        self.blit_submit(
            "bright_pass",
            [0.0, 0.0],
            res,
            &t.bloom_a_view,
            &self.post.bright_pipeline,
            &bg.from_hdr,
            None,
        );
        // Pass 3: blur horizontal bloom_a -> bloom_b
        self.blit_submit(
            "blur_h",
            [1.0, 0.0],
            res,
            &t.bloom_b_view,
            &self.post.blur_pipeline,
            &bg.from_bloom_a,
            None,
        );
        // Pass 4: blur vertical bloom_b -> bloom_a
        self.blit_submit(
            "blur_v",
            [0.0, 1.0],
            res,
            &t.bloom_a_view,
            &self.post.blur_pipeline,
            &bg.from_bloom_b,
            None,
        );
        // Pass 5: composite to swapchain
        self.blit_submit(
            "composite",
            [0.0, 0.0],
            [self.width as f32, self.height as f32],
            &view,
            &self.post.composite_pipeline,
            &bg.from_hdr,
            Some(&bg.bloom_a_only),
        );
        frame.present();
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn blit_submit(
        &self,
        label: &str,
        blur_dir: [f32; 2],
        resolution: [f32; 2],
        target: &wgpu::TextureView,
        pipeline: &wgpu::RenderPipeline,
        bg0: &wgpu::BindGroup,
        bg1: Option<&wgpu::BindGroup>,
    ) {
        post::write_post_uniforms(&self.queue, &self.post.uniform_buffer, resolution, blur_dir);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });
        post::blit(&mut encoder, label, target, pipeline, bg0, bg1);
        self.queue.submit(Some(encoder.finish()));
    }
}
