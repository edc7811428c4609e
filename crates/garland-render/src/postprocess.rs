//! HDR buffer, bloom chain, and composite tonemapping
//!
//! The scene draws emissive-heavy content (lights, the star, the heart
//! cloud) into an Rgba16Float buffer. Bright pixels above a threshold are
//! pulled into a half-resolution mip chain, blurred by progressive
//! downsample/upsample, and added back during the composite pass, which
//! applies exposure, ACES tonemapping, and gamma before writing the sRGB
//! surface.
//!
//! Bloom texel sizes are fixed per mip level, so every uniform buffer and
//! bind group in the chain is built once at (re)size time and the whole
//! chain records into the frame encoder. Only the threshold and composite
//! uniforms are rewritten per frame.

use bytemuck::{Pod, Zeroable};

/// Cap on bloom mip levels; the chain also stops before any mip would
/// shrink below 8 pixels.
pub const MAX_BLOOM_MIPS: usize = 6;

/// Intermediate format for the scene buffer and the bloom chain.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Runtime-adjustable tonemapping and bloom parameters.
#[derive(Debug, Clone)]
pub struct PostProcessConfig {
    pub exposure: f32,
    pub bloom_intensity: f32,
    pub bloom_threshold: f32,
    pub bloom_soft_threshold: f32,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            bloom_intensity: 0.8,
            bloom_threshold: 1.0,
            bloom_soft_threshold: 0.5,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct CompositeUniforms {
    exposure: f32,
    bloom_intensity: f32,
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct BloomUniforms {
    texel_size: [f32; 2],
    threshold: f32,
    soft_threshold: f32,
}

/// One level of the bloom chain with its prebuilt bindings.
struct BloomMip {
    view: wgpu::TextureView,
    /// Holds this mip's texel size; threshold fields are unused past mip 0
    uniform_bind_group: wgpu::BindGroup,
    /// This mip's texture as a sampling source for the adjacent level
    source_bind_group: wgpu::BindGroup,
}

/// Full post-processing stack. `resize` must be called whenever the
/// surface changes before the next frame is encoded.
pub struct PostProcess {
    bloom_threshold_pipeline: wgpu::RenderPipeline,
    bloom_downsample_pipeline: wgpu::RenderPipeline,
    bloom_upsample_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,

    bloom_uniform_bgl: wgpu::BindGroupLayout,
    bloom_source_bgl: wgpu::BindGroupLayout,
    composite_input_bgl: wgpu::BindGroupLayout,

    linear_sampler: wgpu::Sampler,

    /// Threshold pass uniforms, rewritten per frame from the config
    threshold_uniform_buffer: wgpu::Buffer,
    threshold_uniform_bind_group: wgpu::BindGroup,
    composite_uniform_buffer: wgpu::Buffer,
    composite_uniform_bind_group: wgpu::BindGroup,

    // Size-dependent resources
    hdr_view: wgpu::TextureView,
    hdr_source_bind_group: wgpu::BindGroup,
    composite_input_bind_group: wgpu::BindGroup,
    bloom_mips: Vec<BloomMip>,
    width: u32,
    height: u32,
}

impl PostProcess {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("PostProcess Linear Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        });

        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        let bloom_uniform_bgl =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Bloom Uniform BGL"),
                entries: &[uniform_entry(0)],
            });
        let bloom_source_bgl =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Bloom Source BGL"),
                entries: &[texture_entry(0), sampler_entry(1)],
            });
        let composite_uniform_bgl =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Composite Uniform BGL"),
                entries: &[uniform_entry(0)],
            });
        // Scene and bloom textures share one group and one sampler
        let composite_input_bgl =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Composite Input BGL"),
                entries: &[texture_entry(0), texture_entry(1), sampler_entry(2)],
            });

        let bloom_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Bloom Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("bloom_shader.wgsl").into()),
        });
        let composite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Composite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("composite_shader.wgsl").into()),
        });

        let bloom_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Bloom Pipeline Layout"),
            bind_group_layouts: &[&bloom_uniform_bgl, &bloom_source_bgl],
            push_constant_ranges: &[],
        });

        let fullscreen = |label: &str,
                          layout: &wgpu::PipelineLayout,
                          module: &wgpu::ShaderModule,
                          vs: &str,
                          fs: &str,
                          format: wgpu::TextureFormat,
                          blend: Option<wgpu::BlendState>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some(vs),
                    buffers: &[],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module,
                    entry_point: Some(fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let bloom_threshold_pipeline = fullscreen(
            "Bloom Threshold Pipeline",
            &bloom_layout,
            &bloom_shader,
            "vs_fullscreen",
            "fs_threshold",
            HDR_FORMAT,
            None,
        );
        let bloom_downsample_pipeline = fullscreen(
            "Bloom Downsample Pipeline",
            &bloom_layout,
            &bloom_shader,
            "vs_fullscreen",
            "fs_downsample",
            HDR_FORMAT,
            None,
        );
        // Upsample accumulates into the larger mip
        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };
        let bloom_upsample_pipeline = fullscreen(
            "Bloom Upsample Pipeline",
            &bloom_layout,
            &bloom_shader,
            "vs_fullscreen",
            "fs_upsample",
            HDR_FORMAT,
            Some(additive),
        );

        let composite_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Composite Pipeline Layout"),
                bind_group_layouts: &[&composite_uniform_bgl, &composite_input_bgl],
                push_constant_ranges: &[],
            });
        let composite_pipeline = fullscreen(
            "Composite Pipeline",
            &composite_layout,
            &composite_shader,
            "vs_fullscreen",
            "fs_composite",
            surface_format,
            None,
        );

        let threshold_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Bloom Threshold Uniform Buffer"),
            size: std::mem::size_of::<BloomUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let threshold_uniform_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Bloom Threshold Uniform BG"),
                layout: &bloom_uniform_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: threshold_uniform_buffer.as_entire_binding(),
                }],
            });

        let composite_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Composite Uniform Buffer"),
            size: std::mem::size_of::<CompositeUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let composite_uniform_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Composite Uniform BG"),
                layout: &composite_uniform_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: composite_uniform_buffer.as_entire_binding(),
                }],
            });

        let (hdr_view, hdr_source_bind_group, composite_input_bind_group, bloom_mips) =
            Self::build_targets(
                device,
                &bloom_uniform_bgl,
                &bloom_source_bgl,
                &composite_input_bgl,
                &linear_sampler,
                width,
                height,
            );

        Self {
            bloom_threshold_pipeline,
            bloom_downsample_pipeline,
            bloom_upsample_pipeline,
            composite_pipeline,
            bloom_uniform_bgl,
            bloom_source_bgl,
            composite_input_bgl,
            linear_sampler,
            threshold_uniform_buffer,
            threshold_uniform_bind_group,
            composite_uniform_buffer,
            composite_uniform_bind_group,
            hdr_view,
            hdr_source_bind_group,
            composite_input_bind_group,
            bloom_mips,
            width,
            height,
        }
    }

    /// The HDR attachment the scene passes render into
    pub fn hdr_view(&self) -> &wgpu::TextureView {
        &self.hdr_view
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        let (hdr_view, hdr_source_bind_group, composite_input_bind_group, bloom_mips) =
            Self::build_targets(
                device,
                &self.bloom_uniform_bgl,
                &self.bloom_source_bgl,
                &self.composite_input_bgl,
                &self.linear_sampler,
                width,
                height,
            );
        self.hdr_view = hdr_view;
        self.hdr_source_bind_group = hdr_source_bind_group;
        self.composite_input_bind_group = composite_input_bind_group;
        self.bloom_mips = bloom_mips;
        self.width = width;
        self.height = height;
    }

    /// Upload per-frame uniforms. Must run before `encode` for the frame.
    pub fn prepare(&self, queue: &wgpu::Queue, config: &PostProcessConfig) {
        let threshold = BloomUniforms {
            texel_size: [1.0 / self.width as f32, 1.0 / self.height as f32],
            threshold: config.bloom_threshold,
            soft_threshold: config.bloom_soft_threshold,
        };
        queue.write_buffer(
            &self.threshold_uniform_buffer,
            0,
            bytemuck::cast_slice(&[threshold]),
        );

        let composite = CompositeUniforms {
            exposure: config.exposure,
            bloom_intensity: if self.bloom_mips.is_empty() {
                0.0
            } else {
                config.bloom_intensity
            },
            _pad: [0.0; 2],
        };
        queue.write_buffer(
            &self.composite_uniform_buffer,
            0,
            bytemuck::cast_slice(&[composite]),
        );
    }

    /// Record the bloom chain and composite pass into the frame encoder.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, target_view: &wgpu::TextureView) {
        let fullscreen_pass = |encoder: &mut wgpu::CommandEncoder,
                               label: &str,
                               view: &wgpu::TextureView,
                               load: wgpu::LoadOp<wgpu::Color>,
                               pipeline: &wgpu::RenderPipeline,
                               uniforms: &wgpu::BindGroup,
                               source: &wgpu::BindGroup| {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, uniforms, &[]);
            pass.set_bind_group(1, source, &[]);
            pass.draw(0..3, 0..1);
        };

        if !self.bloom_mips.is_empty() {
            // Extract bright pixels into mip 0
            fullscreen_pass(
                encoder,
                "Bloom Threshold Pass",
                &self.bloom_mips[0].view,
                wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                &self.bloom_threshold_pipeline,
                &self.threshold_uniform_bind_group,
                &self.hdr_source_bind_group,
            );

            // Walk down the chain, halving each step
            for i in 1..self.bloom_mips.len() {
                fullscreen_pass(
                    encoder,
                    "Bloom Downsample Pass",
                    &self.bloom_mips[i].view,
                    wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    &self.bloom_downsample_pipeline,
                    &self.bloom_mips[i - 1].uniform_bind_group,
                    &self.bloom_mips[i - 1].source_bind_group,
                );
            }

            // Walk back up, accumulating additively
            for i in (0..self.bloom_mips.len() - 1).rev() {
                fullscreen_pass(
                    encoder,
                    "Bloom Upsample Pass",
                    &self.bloom_mips[i].view,
                    wgpu::LoadOp::Load,
                    &self.bloom_upsample_pipeline,
                    &self.bloom_mips[i + 1].uniform_bind_group,
                    &self.bloom_mips[i + 1].source_bind_group,
                );
            }
        }

        fullscreen_pass(
            encoder,
            "Composite Pass",
            target_view,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
            &self.composite_pipeline,
            &self.composite_uniform_bind_group,
            &self.composite_input_bind_group,
        );
    }

    fn build_targets(
        device: &wgpu::Device,
        bloom_uniform_bgl: &wgpu::BindGroupLayout,
        bloom_source_bgl: &wgpu::BindGroupLayout,
        composite_input_bgl: &wgpu::BindGroupLayout,
        linear_sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
    ) -> (
        wgpu::TextureView,
        wgpu::BindGroup,
        wgpu::BindGroup,
        Vec<BloomMip>,
    ) {
        let width = width.max(1);
        let height = height.max(1);

        let hdr_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("HDR Scene Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: HDR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let hdr_view = hdr_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let hdr_source_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("HDR Source BG"),
            layout: bloom_source_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&hdr_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(linear_sampler),
                },
            ],
        });

        let mip_count = bloom_mip_count(width, height);
        let mut bloom_mips = Vec::with_capacity(mip_count);
        let mut mip_w = (width / 2).max(1);
        let mut mip_h = (height / 2).max(1);

        for i in 0..mip_count {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some(&format!("Bloom Mip {}", i)),
                size: wgpu::Extent3d {
                    width: mip_w,
                    height: mip_h,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: HDR_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

            // Texel size never changes for this mip, written once here
            let uniforms = BloomUniforms {
                texel_size: [1.0 / mip_w as f32, 1.0 / mip_h as f32],
                threshold: 0.0,
                soft_threshold: 0.0,
            };
            let uniform_buffer = {
                use wgpu::util::DeviceExt;
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Bloom Mip {} Uniform Buffer", i)),
                    contents: bytemuck::cast_slice(&[uniforms]),
                    usage: wgpu::BufferUsages::UNIFORM,
                })
            };
            let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Bloom Mip {} Uniform BG", i)),
                layout: bloom_uniform_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });
            let source_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Bloom Mip {} Source BG", i)),
                layout: bloom_source_bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(linear_sampler),
                    },
                ],
            });

            bloom_mips.push(BloomMip {
                view,
                uniform_bind_group,
                source_bind_group,
            });

            mip_w = (mip_w / 2).max(1);
            mip_h = (mip_h / 2).max(1);
        }

        // Composite reads the HDR scene plus the blurred mip 0. With no
        // mips (tiny window) mip 0 is replaced by the scene itself and the
        // intensity is zeroed in `prepare`.
        let bloom_input = bloom_mips
            .first()
            .map(|m| &m.view)
            .unwrap_or(&hdr_view);
        let composite_input_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Composite Input BG"),
            layout: composite_input_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&hdr_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(bloom_input),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(linear_sampler),
                },
            ],
        });

        (hdr_view, hdr_source_bind_group, composite_input_bind_group, bloom_mips)
    }
}

/// Number of half-resolution levels, keeping the smallest at least 8 px.
fn bloom_mip_count(width: u32, height: u32) -> usize {
    let min_dim = width.min(height).max(1);
    let levels = (min_dim as f32).log2().floor() as usize;
    levels.saturating_sub(3).min(MAX_BLOOM_MIPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mip_count_scales_with_resolution() {
        assert_eq!(bloom_mip_count(1920, 1080), 6);
        assert_eq!(bloom_mip_count(640, 480), 5);
        assert_eq!(bloom_mip_count(16, 16), 1);
        assert_eq!(bloom_mip_count(8, 8), 0);
        assert_eq!(bloom_mip_count(1, 1), 0);
    }

    #[test]
    fn uniform_layouts() {
        assert_eq!(std::mem::size_of::<BloomUniforms>(), 16);
        assert_eq!(std::mem::size_of::<CompositeUniforms>(), 16);
    }
}
