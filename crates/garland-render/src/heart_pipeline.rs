//! Heart point cloud transition pipeline
//!
//! The 15,000-point cloud is animated entirely on the GPU: the host only
//! uploads three scalars per frame (time, progress, alpha, plus the sway
//! yaw). Each point carries its world target and a random seed as static
//! attributes; its flight from the scene center, stagger window, flight
//! jitter, growth and color blend are all evaluated in the vertex stage.
//!
//! wgpu has no point-size primitive, so points render as camera-facing
//! quads from a storage buffer, the same approach as the instanced
//! decorations, with additive blending and no depth write.

use crate::postprocess::HDR_FORMAT;
use bytemuck::{Pod, Zeroable};
use garland_layout::HeartPoint;
use wgpu::util::DeviceExt;

/// Static per-point attributes, matching the WGSL struct layout.
/// 16 bytes (vec3 target + seed).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct HeartPointGpu {
    pub target: [f32; 3],
    pub seed: f32,
}

impl From<&HeartPoint> for HeartPointGpu {
    fn from(p: &HeartPoint) -> Self {
        Self {
            target: p.target.to_array(),
            seed: p.seed,
        }
    }
}

/// Per-frame uniforms for the heart pass
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct HeartUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_right: [f32; 3],
    pub _pad0: f32,
    pub camera_up: [f32; 3],
    pub _pad1: f32,
    pub time: f32,
    /// 0 = collapsed at the center, 1 = fully formed heart
    pub progress: f32,
    /// Global opacity
    pub alpha: f32,
    /// Gentle whole-cloud sway around the vertical axis
    pub sway: f32,
}

/// The heart cloud pipeline with its static point buffer
pub struct HeartPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub point_buffer: wgpu::Buffer,
    pub point_count: u32,
    pub quad_index_buffer: wgpu::Buffer,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl HeartPipeline {
    pub fn new(device: &wgpu::Device, points: &[HeartPoint]) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Heart Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("heart_shader.wgsl").into()),
        });

        // Group 0: uniforms + the static point storage buffer
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: true },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
                label: Some("Heart Bind Group Layout"),
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Heart Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // Additive blend: overlapping soft discs sum into a glow the bloom
        // stage amplifies
        let additive_blend = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Heart Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_heart"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_heart"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: Some(additive_blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // Depth test against the decorations, but translucent: no write
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Static attributes, uploaded once
        let gpu_points: Vec<HeartPointGpu> = points.iter().map(HeartPointGpu::from).collect();
        let point_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Heart Point Buffer"),
            contents: bytemuck::cast_slice(&gpu_points),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let quad_indices: [u32; 6] = [0, 1, 2, 2, 1, 3];
        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Heart Quad Index Buffer"),
            contents: bytemuck::cast_slice(&quad_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Heart Uniform Buffer"),
            size: std::mem::size_of::<HeartUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: point_buffer.as_entire_binding(),
                },
            ],
            label: Some("Heart Bind Group"),
        });

        Self {
            pipeline,
            point_buffer,
            point_count: points.len() as u32,
            quad_index_buffer,
            uniform_buffer,
            bind_group,
        }
    }

    /// Encode the heart pass. Skipped entirely while fully faded out.
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..6, 0, 0..self.point_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_layout() {
        assert_eq!(std::mem::size_of::<HeartPointGpu>(), 16);
        assert_eq!(std::mem::align_of::<HeartPointGpu>(), 4);
    }

    #[test]
    fn uniforms_layout() {
        // mat4 + 2 padded vec3 + 4 scalars
        assert_eq!(std::mem::size_of::<HeartUniforms>(), 112);
    }

    #[test]
    fn shader_accents_match_palette() {
        // The WGSL hardcodes the blend endpoints; keep them in sync with
        // the palette's accent pair
        let source = include_str!("heart_shader.wgsl");
        for hex in garland_layout::HEART_ACCENTS {
            let c = garland_core::Color::from_hex(hex);
            for channel in [c.r, c.g, c.b] {
                assert!(
                    source.contains(&format!("{:.3}", channel)) || channel == 0.0 || channel == 1.0,
                    "accent channel {channel} of {hex:#x} missing from shader"
                );
            }
        }
    }

    #[test]
    fn gpu_point_conversion() {
        let p = HeartPoint {
            target: garland_core::Vec3::new(1.0, 2.0, 3.0),
            seed: 0.5,
        };
        let g = HeartPointGpu::from(&p);
        assert_eq!(g.target, [1.0, 2.0, 3.0]);
        assert_eq!(g.seed, 0.5);
    }
}
