//! Garland Render - wgpu renderer for the decorated scene
//!
//! Draws the choreographed field as instanced meshes and the heart as a
//! GPU-animated point cloud over a drifting starfield backdrop, all into
//! an HDR buffer that feeds a bloom and tonemapping chain before
//! presentation.

mod camera;
mod context;
pub mod heart_pipeline;
pub mod ornament_pipeline;
pub mod postprocess;
mod primitives;
mod scene_renderer;
pub mod starfield_pipeline;

pub use camera::OrbitCamera;
pub use context::RenderContext;
pub use heart_pipeline::{HeartPipeline, HeartPointGpu, HeartUniforms};
pub use ornament_pipeline::{OrnamentInstanceGpu, OrnamentPipeline, SceneUniforms};
pub use postprocess::{PostProcess, PostProcessConfig, HDR_FORMAT, MAX_BLOOM_MIPS};
pub use primitives::{
    create_box_mesh, create_octahedron_mesh, create_plane_mesh, create_sphere_mesh,
    create_tetrahedron_mesh, Mesh, Vertex,
};
pub use scene_renderer::SceneRenderer;
pub use starfield_pipeline::{StarGpu, StarfieldPipeline, StarfieldUniforms};

#[cfg(test)]
mod tests {
    #[test]
    fn ornament_shader_wgsl_parses() {
        let source = include_str!("ornament_shader.wgsl");
        naga::front::wgsl::parse_str(source).expect("ornament_shader.wgsl failed to parse");
    }

    #[test]
    fn heart_shader_wgsl_parses() {
        let source = include_str!("heart_shader.wgsl");
        naga::front::wgsl::parse_str(source).expect("heart_shader.wgsl failed to parse");
    }

    #[test]
    fn bloom_shader_wgsl_parses() {
        let source = include_str!("bloom_shader.wgsl");
        naga::front::wgsl::parse_str(source).expect("bloom_shader.wgsl failed to parse");
    }

    #[test]
    fn starfield_shader_wgsl_parses() {
        let source = include_str!("starfield_shader.wgsl");
        naga::front::wgsl::parse_str(source).expect("starfield_shader.wgsl failed to parse");
    }

    #[test]
    fn composite_shader_wgsl_parses() {
        let source = include_str!("composite_shader.wgsl");
        naga::front::wgsl::parse_str(source).expect("composite_shader.wgsl failed to parse");
    }
}
