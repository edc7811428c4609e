//! Frame assembly: instance packing, pass ordering, presentation
//!
//! Each frame reads the choreography's current transforms, groups the
//! decorations by archetype mesh, and rewrites one storage buffer per
//! archetype. The whole field's ambient yaw is folded into the model
//! matrices on the CPU so the shaders stay unaware of it.
//!
//! Pass order: decorations, the starfield, and the heart cloud into the
//! HDR buffer, then the bloom chain, then the tonemapped composite onto
//! the surface.

use crate::camera::OrbitCamera;
use crate::context::RenderContext;
use crate::heart_pipeline::{HeartPipeline, HeartUniforms};
use crate::ornament_pipeline::{OrnamentInstanceGpu, OrnamentPipeline, SceneUniforms};
use crate::postprocess::{PostProcess, PostProcessConfig};
use crate::primitives::{
    create_box_mesh, create_octahedron_mesh, create_plane_mesh, create_sphere_mesh,
    create_tetrahedron_mesh, Mesh,
};
use crate::starfield_pipeline::{StarfieldPipeline, StarfieldUniforms};
use garland_choreo::Choreography;
use garland_core::{mat4_mul, GarlandError, Result, Vec3};
use garland_layout::{star_color, HeartPoint, OrnamentShape};
use wgpu::util::DeviceExt;

/// Background of the HDR buffer, a deep night blue
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.004,
    g: 0.006,
    b: 0.016,
    a: 1.0,
};

/// Emissive multiplier for string lights
const LIGHT_EMISSIVE: f32 = 3.0;

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as u32,
        }
    }
}

/// One archetype mesh with its per-frame instance storage
struct ShapeBatch {
    mesh: GpuMesh,
    instance_buffer: wgpu::Buffer,
    instance_bind_group: wgpu::BindGroup,
    /// Staged on the CPU each frame, then written in one go
    staging: Vec<OrnamentInstanceGpu>,
}

impl ShapeBatch {
    fn new(
        device: &wgpu::Device,
        pipeline: &OrnamentPipeline,
        label: &str,
        mesh: &Mesh,
        capacity: usize,
    ) -> Self {
        let mesh = GpuMesh::upload(device, label, mesh);
        // At least one instance so the binding is never zero-sized
        let capacity = capacity.max(1);
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Instance Buffer", label)),
            size: (capacity * std::mem::size_of::<OrnamentInstanceGpu>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let instance_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Instance BG", label)),
            layout: &pipeline.instance_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: instance_buffer.as_entire_binding(),
            }],
        });
        Self {
            mesh,
            instance_buffer,
            instance_bind_group,
            staging: Vec::with_capacity(capacity),
        }
    }

    fn flush(&self, queue: &wgpu::Queue) {
        if !self.staging.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.staging));
        }
    }
}

/// Order matches `batch_index`
const BATCH_COUNT: usize = 6;

fn batch_index(shape: OrnamentShape) -> usize {
    match shape {
        OrnamentShape::Sphere => 0,
        OrnamentShape::Box => 1,
        OrnamentShape::Leaf => 2,
        OrnamentShape::Light => 3,
        OrnamentShape::Ribbon => 4,
        OrnamentShape::Star => 5,
    }
}

pub struct SceneRenderer {
    ornament_pipeline: OrnamentPipeline,
    heart_pipeline: HeartPipeline,
    starfield_pipeline: StarfieldPipeline,
    postprocess: PostProcess,
    batches: [ShapeBatch; BATCH_COUNT],
    pub post_config: PostProcessConfig,
}

impl SceneRenderer {
    pub fn new(
        context: &RenderContext,
        choreography: &Choreography,
        heart_points: &[HeartPoint],
        stars: &[Vec3],
    ) -> Self {
        let device = &context.device;
        let ornament_pipeline = OrnamentPipeline::new(device);
        let heart_pipeline = HeartPipeline::new(device, heart_points);
        let starfield_pipeline = StarfieldPipeline::new(device, stars);
        let postprocess = PostProcess::new(
            device,
            context.config.format,
            context.size.width,
            context.size.height,
        );

        // Batch capacity comes from the immutable field; the star batch
        // holds the single tree-topper.
        let mut counts = [0usize; BATCH_COUNT];
        for ornament in choreography.ornaments() {
            counts[batch_index(ornament.shape)] += 1;
        }
        counts[batch_index(OrnamentShape::Star)] += 1;

        let sphere = create_sphere_mesh(12, 8);
        let light = create_sphere_mesh(8, 6);
        let batches = [
            ShapeBatch::new(device, &ornament_pipeline, "Sphere", &sphere, counts[0]),
            ShapeBatch::new(device, &ornament_pipeline, "Box", &create_box_mesh(), counts[1]),
            ShapeBatch::new(
                device,
                &ornament_pipeline,
                "Leaf",
                &create_tetrahedron_mesh(),
                counts[2],
            ),
            ShapeBatch::new(device, &ornament_pipeline, "Light", &light, counts[3]),
            ShapeBatch::new(
                device,
                &ornament_pipeline,
                "Ribbon",
                &create_plane_mesh(),
                counts[4],
            ),
            ShapeBatch::new(
                device,
                &ornament_pipeline,
                "Star",
                &create_octahedron_mesh(),
                counts[5],
            ),
        ];

        println!(
            "[render] scene ready: {} decorations, {} heart points, {} stars",
            choreography.ornaments().len(),
            heart_points.len(),
            stars.len()
        );

        Self {
            ornament_pipeline,
            heart_pipeline,
            starfield_pipeline,
            postprocess,
            batches,
            post_config: PostProcessConfig::default(),
        }
    }

    pub fn resize(&mut self, context: &RenderContext) {
        self.postprocess
            .resize(&context.device, context.size.width, context.size.height);
    }

    /// Stage every decoration's current transform into its archetype batch.
    fn pack_instances(&mut self, choreography: &Choreography) {
        for batch in &mut self.batches {
            batch.staging.clear();
        }

        // The ambient field yaw, folded into every model matrix
        let yaw = choreography.field_yaw();
        let (s, c) = yaw.sin_cos();
        let spin = [
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];

        let zero = [0.0f32; 4];
        for (ornament, channels) in choreography
            .ornaments()
            .iter()
            .zip(choreography.transforms())
        {
            let model = mat4_mul(&spin, &channels.transform().to_matrix());
            let emissive = match ornament.shape {
                OrnamentShape::Light => ornament.color.scaled(LIGHT_EMISSIVE).to_array(),
                _ => zero,
            };
            self.batches[batch_index(ornament.shape)]
                .staging
                .push(OrnamentInstanceGpu {
                    model,
                    color: ornament.color.to_array(),
                    emissive,
                });
        }

        // Tree-topper, emissive driven by the choreography
        let star_color = star_color();
        self.batches[batch_index(OrnamentShape::Star)]
            .staging
            .push(OrnamentInstanceGpu {
                model: mat4_mul(&spin, &choreography.star_transform().to_matrix()),
                color: star_color.to_array(),
                emissive: star_color.scaled(choreography.star_intensity()).to_array(),
            });
    }

    pub fn render(
        &mut self,
        context: &mut RenderContext,
        camera: &OrbitCamera,
        choreography: &Choreography,
        time: f64,
    ) -> Result<()> {
        let frame = match context.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                context.resize(context.size);
                return Ok(());
            }
            Err(e) => return Err(GarlandError::Render(format!("surface acquire: {e}"))),
        };
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Per-frame uploads
        let scene_uniforms = SceneUniforms {
            view_proj: camera.view_proj(),
            camera_pos: camera.position().to_array(),
            _pad: 0.0,
        };
        context.queue.write_buffer(
            &self.ornament_pipeline.uniform_buffer,
            0,
            bytemuck::cast_slice(&[scene_uniforms]),
        );

        self.pack_instances(choreography);
        for batch in &self.batches {
            batch.flush(&context.queue);
        }

        let (drift_pitch, drift_yaw) = choreography.starfield_drift();
        let starfield_uniforms = StarfieldUniforms {
            view_proj: camera.view_proj(),
            camera_right: camera.right().to_array(),
            _pad0: 0.0,
            camera_up: camera.up().to_array(),
            _pad1: 0.0,
            pitch: drift_pitch,
            yaw: drift_yaw,
            _pad2: [0.0; 2],
        };
        context.queue.write_buffer(
            &self.starfield_pipeline.uniform_buffer,
            0,
            bytemuck::cast_slice(&[starfield_uniforms]),
        );

        let heart_alpha = choreography.heart_alpha();
        let heart_visible = heart_alpha > 0.001;
        if heart_visible {
            let heart_uniforms = HeartUniforms {
                view_proj: camera.view_proj(),
                camera_right: camera.right().to_array(),
                _pad0: 0.0,
                camera_up: camera.up().to_array(),
                _pad1: 0.0,
                time: time as f32,
                progress: choreography.heart_progress(),
                alpha: heart_alpha,
                sway: choreography.heart_sway(time),
            };
            context.queue.write_buffer(
                &self.heart_pipeline.uniform_buffer,
                0,
                bytemuck::cast_slice(&[heart_uniforms]),
            );
        }

        self.postprocess.prepare(&context.queue, &self.post_config);

        let mut encoder =
            context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Frame Encoder"),
                });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.postprocess.hdr_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &context.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.ornament_pipeline.pipeline);
            pass.set_bind_group(0, &self.ornament_pipeline.uniform_bind_group, &[]);
            for batch in &self.batches {
                if batch.staging.is_empty() {
                    continue;
                }
                pass.set_bind_group(1, &batch.instance_bind_group, &[]);
                pass.set_vertex_buffer(0, batch.mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(batch.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..batch.mesh.index_count, 0, 0..batch.staging.len() as u32);
            }

            // Translucent passes after the opaque field: the distant
            // starfield first, then the additive heart
            self.starfield_pipeline.draw(&mut pass);
            if heart_visible {
                self.heart_pipeline.draw(&mut pass);
            }
        }

        self.postprocess.encode(&mut encoder, &frame_view);

        context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_a_batch() {
        let shapes = [
            OrnamentShape::Sphere,
            OrnamentShape::Box,
            OrnamentShape::Leaf,
            OrnamentShape::Light,
            OrnamentShape::Ribbon,
            OrnamentShape::Star,
        ];
        let mut seen = [false; BATCH_COUNT];
        for shape in shapes {
            seen[batch_index(shape)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
