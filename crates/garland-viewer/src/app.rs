//! Viewer application implementing winit ApplicationHandler
//!
//! Owns the window, the render context, and the choreography. Space flips
//! the exploded toggle; the left mouse button drags the orbit camera.

use crate::tuning::ViewerTuning;
use anyhow::Context;
use garland_choreo::Choreography;
use garland_core::Rng;
use garland_layout::{generate_field, generate_starfield, heart};
use garland_render::{OrbitCamera, RenderContext, SceneRenderer};
use garland_runtime::FrameClock;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const ORBIT_SENSITIVITY: f32 = 0.005;
const ZOOM_SENSITIVITY: f32 = 1.2;

/// OS auto-repeat delivers extra Pressed events while a key is held;
/// only the first press counts.
fn fresh_press(state: ElementState, repeat: bool) -> bool {
    state == ElementState::Pressed && !repeat
}

pub struct ViewerApp {
    tuning: ViewerTuning,
    fullscreen: bool,

    clock: FrameClock,
    choreography: Option<Choreography>,

    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    scene_renderer: Option<SceneRenderer>,
    camera: OrbitCamera,

    dragging: bool,
    cursor_position: (f64, f64),
    last_cursor: Option<(f64, f64)>,
}

impl ViewerApp {
    pub fn new(tuning: ViewerTuning, fullscreen: bool) -> Self {
        Self {
            tuning,
            fullscreen,
            clock: FrameClock::new(),
            choreography: None,
            window: None,
            render_context: None,
            scene_renderer: None,
            camera: OrbitCamera::new(),
            dragging: false,
            cursor_position: (0.0, 0.0),
            last_cursor: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("Garland Viewer")
            .with_inner_size(PhysicalSize::new(
                self.tuning.window_width,
                self.tuning.window_height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("failed to create window")?,
        );

        if self.fullscreen {
            window.set_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
        }

        self.window = Some(window.clone());

        let render_context = pollster::block_on(RenderContext::new(window))?;
        self.camera.aspect = render_context.aspect_ratio();

        // Generate the immutable layouts, then hand the field to the driver
        let mut rng = Rng::from_time();
        let ornaments = generate_field(&mut rng);
        let heart_points = heart::sample(&mut rng, garland_layout::HEART_POINT_COUNT)?;
        let stars = generate_starfield(&mut rng, garland_layout::STARFIELD_COUNT);
        let choreography = Choreography::new(ornaments, rng);

        let mut scene_renderer =
            SceneRenderer::new(&render_context, &choreography, &heart_points, &stars);
        scene_renderer.post_config = self.tuning.post_config();

        self.render_context = Some(render_context);
        self.scene_renderer = Some(scene_renderer);
        self.choreography = Some(choreography);
        Ok(())
    }

    fn tick(&mut self) {
        self.clock.tick();
        if let Some(choreography) = &mut self.choreography {
            choreography.advance(self.clock.total_time, self.clock.delta_time);
        }
    }

    fn render(&mut self) {
        let Some(context) = &mut self.render_context else {
            return;
        };
        let (Some(renderer), Some(choreography)) =
            (&mut self.scene_renderer, &self.choreography)
        else {
            return;
        };

        if let Err(e) = renderer.render(context, &self.camera, choreography, self.clock.total_time)
        {
            eprintln!("Render error: {:?}", e);
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                eprintln!("Failed to initialize viewer: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(context) = &mut self.render_context {
                    context.resize(new_size);
                    self.camera.aspect = context.aspect_ratio();
                    if let Some(renderer) = &mut self.scene_renderer {
                        renderer.resize(context);
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if !fresh_press(event.state, event.repeat) {
                    return;
                }
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    match key_code {
                        KeyCode::Escape => event_loop.exit(),
                        // The sole scene stimulus: flip the toggle
                        KeyCode::Space => {
                            if let Some(choreography) = &mut self.choreography {
                                let exploded = !choreography.is_exploded();
                                choreography.set_exploded(exploded, self.clock.total_time);
                            }
                        }
                        _ => {}
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.dragging = state == ElementState::Pressed;
                    self.last_cursor = None;
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = (position.x, position.y);
                if self.dragging {
                    if let Some((lx, ly)) = self.last_cursor {
                        let dx = (position.x - lx) as f32;
                        let dy = (position.y - ly) as f32;
                        self.camera
                            .orbit(dx * ORBIT_SENSITIVITY, dy * ORBIT_SENSITIVITY);
                    }
                    self.last_cursor = Some(self.cursor_position);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                };
                self.camera.zoom(-scroll * ZOOM_SENSITIVITY);
            }

            WindowEvent::RedrawRequested => {
                self.tick();
                self.render();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_key_repeats_are_ignored() {
        assert!(fresh_press(ElementState::Pressed, false));
        assert!(!fresh_press(ElementState::Pressed, true));
        assert!(!fresh_press(ElementState::Released, false));
    }
}
