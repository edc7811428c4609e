//! Toggle-driven choreography over the decoration field

use garland_core::{Result, Rng, Transform, Vec3};
use garland_layout::{Ornament, OrnamentShape, TREE_HEIGHT};
use garland_runtime::{FrameClock, FrameSystem, ToggleCell};
use garland_tween::{Channel, Ease};

// Explosion feel: a fast punchy burst with per-particle spread
const EXPLODE_POS_DURATION: (f32, f32) = (1.2, 2.0);
const EXPLODE_ROT_DURATION: f32 = 2.5;
const EXPLODE_ROT_SPREAD: f32 = 5.0;
const RIBBON_VANISH_DURATION: f32 = 0.6;

// Gather feel: magnetic high-speed return, slight stagger
const GATHER_POS_DURATION: (f32, f32) = (2.2, 2.6);
const GATHER_POS_MAX_DELAY: f32 = 0.15;
const GATHER_ROT_DURATION: f32 = 2.0;
const RIBBON_RESTORE_DURATION: f32 = 2.0;

// Heart uniform ramps: slow graceful formation, fast collapse
const HEART_FORM_DURATION: f32 = 3.0;
const HEART_FADE_IN: (f32, f32) = (1.5, 0.1); // duration, delay
const HEART_COLLAPSE_DURATION: f32 = 1.2;
const HEART_FADE_OUT: f32 = 0.5;

// Ambient field rotation: alive as a tree, near-inert when scattered
const FIELD_SPIN_GATHERED: f32 = 0.15;
const FIELD_SPIN_EXPLODED: f32 = 0.01;

// Background starfield drift, rad/s, running in both states
const STARFIELD_YAW_RATE: f32 = -0.05;
const STARFIELD_PITCH_RATE: f32 = -0.02;

// Tree-topper emissive ramp
const STAR_INTENSITY_LIT: f32 = 4.0;
const STAR_DIM_DURATION: f32 = 1.0;

/// The mutable transform slot for one decoration: three independently
/// retargetable channels. Paired 1:1 by index with the immutable
/// `Ornament` array.
#[derive(Debug, Clone)]
pub struct TransformChannels {
    pub position: Channel<Vec3>,
    pub rotation: Channel<Vec3>,
    pub scale: Channel<Vec3>,
}

impl TransformChannels {
    fn at_rest(o: &Ornament) -> Self {
        Self {
            position: Channel::new(o.rest_position),
            rotation: Channel::new(o.rest_rotation),
            scale: Channel::new(o.rest_scale),
        }
    }

    fn tick(&mut self, now: f64) {
        self.position.tick(now);
        self.rotation.tick(now);
        self.scale.tick(now);
    }

    /// The current interpolated transform.
    pub fn transform(&self) -> Transform {
        Transform::new(
            self.position.value(),
            self.rotation.value(),
            self.scale.value(),
        )
    }
}

/// The animation driver: maps toggle edges to tweens and advances the
/// whole field once per frame.
pub struct Choreography {
    ornaments: Vec<Ornament>,
    channels: Vec<TransformChannels>,
    toggle: ToggleCell,
    rng: Rng,

    field_yaw: f32,
    starfield_pitch: f32,
    starfield_yaw: f32,
    heart_progress: Channel<f32>,
    heart_alpha: Channel<f32>,
    star_intensity: Channel<f32>,
}

impl Choreography {
    /// Build the driver over a generated field, everything at rest.
    pub fn new(ornaments: Vec<Ornament>, rng: Rng) -> Self {
        let channels = ornaments.iter().map(TransformChannels::at_rest).collect();
        Self {
            ornaments,
            channels,
            toggle: ToggleCell::new(false),
            rng,
            field_yaw: 0.0,
            starfield_pitch: 0.0,
            starfield_yaw: 0.0,
            heart_progress: Channel::new(0.0),
            heart_alpha: Channel::new(0.0),
            star_intensity: Channel::new(STAR_INTENSITY_LIT),
        }
    }

    pub fn is_exploded(&self) -> bool {
        self.toggle.get()
    }

    /// The immutable generation-time field.
    pub fn ornaments(&self) -> &[Ornament] {
        &self.ornaments
    }

    /// The current per-decoration transforms, index-paired with
    /// `ornaments()`.
    pub fn transforms(&self) -> &[TransformChannels] {
        &self.channels
    }

    /// Ambient rotation of the whole field around the vertical axis.
    pub fn field_yaw(&self) -> f32 {
        self.field_yaw
    }

    /// Accumulated drift of the background starfield as (pitch, yaw)
    /// radians. Unlike the field spin, this never pauses or slows.
    pub fn starfield_drift(&self) -> (f32, f32) {
        (self.starfield_pitch, self.starfield_yaw)
    }

    /// Shared progress uniform for the heart cloud: 0 collapsed, 1 formed.
    pub fn heart_progress(&self) -> f32 {
        self.heart_progress.value()
    }

    /// Global opacity uniform for the heart cloud.
    pub fn heart_alpha(&self) -> f32 {
        self.heart_alpha.value()
    }

    /// Gentle sway applied to the heart cloud while it is visible.
    pub fn heart_sway(&self, time: f64) -> f32 {
        if self.toggle.get() {
            ((time * 0.5).sin() * 0.1) as f32
        } else {
            0.0
        }
    }

    /// Emissive intensity of the tree-topper (dims while exploded).
    pub fn star_intensity(&self) -> f32 {
        self.star_intensity.value()
    }

    /// The tree-topper's fixed transform, just above the tip.
    pub fn star_transform(&self) -> Transform {
        Transform::new(
            Vec3::new(0.0, TREE_HEIGHT / 2.0 + 0.5, 0.0),
            Vec3::ZERO,
            Vec3::splat(0.7),
        )
    }

    /// Write the toggle level. Only an edge retargets; repeating the same
    /// level is a no-op.
    pub fn set_exploded(&mut self, exploded: bool, now: f64) {
        if self.toggle.set(exploded) {
            self.retarget(exploded, now);
        }
    }

    /// Redirect every channel toward the new state, starting from its
    /// live value. In-flight tweens are dropped, never rewound.
    fn retarget(&mut self, exploded: bool, now: f64) {
        for (o, ch) in self.ornaments.iter().zip(self.channels.iter_mut()) {
            if exploded {
                let duration = self
                    .rng
                    .range(EXPLODE_POS_DURATION.0, EXPLODE_POS_DURATION.1);
                ch.position
                    .go_to(o.scatter_position, duration, 0.0, Ease::ExpoOut, now);

                // Linear tumble: a few extra radians per axis, no easing,
                // so the spin reads as continuous drift
                let tumble = o.rest_rotation
                    + Vec3::new(
                        self.rng.range(0.0, EXPLODE_ROT_SPREAD),
                        self.rng.range(0.0, EXPLODE_ROT_SPREAD),
                        self.rng.range(0.0, EXPLODE_ROT_SPREAD),
                    );
                ch.rotation
                    .go_to(tumble, EXPLODE_ROT_DURATION, 0.0, Ease::Linear, now);

                // Flat planes tumbling alone look wrong; ribbons vanish
                if o.shape == OrnamentShape::Ribbon {
                    ch.scale.go_to(
                        Vec3::ZERO,
                        RIBBON_VANISH_DURATION,
                        0.0,
                        Ease::CubicOut,
                        now,
                    );
                }
            } else {
                let duration = self.rng.range(GATHER_POS_DURATION.0, GATHER_POS_DURATION.1);
                let delay = self.rng.range(0.0, GATHER_POS_MAX_DELAY);
                ch.position
                    .go_to(o.rest_position, duration, delay, Ease::ExpoOut, now);
                ch.rotation
                    .go_to(o.rest_rotation, GATHER_ROT_DURATION, 0.0, Ease::ExpoOut, now);
                if o.shape == OrnamentShape::Ribbon {
                    ch.scale.go_to(
                        o.rest_scale,
                        RIBBON_RESTORE_DURATION,
                        0.0,
                        Ease::ExpoOut,
                        now,
                    );
                }
            }
        }

        // Heart uniforms follow the same kill-and-redirect discipline
        if exploded {
            self.heart_progress
                .go_to(1.0, HEART_FORM_DURATION, 0.0, Ease::CubicOut, now);
            self.heart_alpha
                .go_to(1.0, HEART_FADE_IN.0, HEART_FADE_IN.1, Ease::QuadOut, now);
            self.star_intensity
                .go_to(0.0, STAR_DIM_DURATION, 0.0, Ease::QuadOut, now);
        } else {
            self.heart_progress
                .go_to(0.0, HEART_COLLAPSE_DURATION, 0.0, Ease::CubicIn, now);
            self.heart_alpha
                .go_to(0.0, HEART_FADE_OUT, 0.0, Ease::QuadOut, now);
            self.star_intensity
                .go_to(STAR_INTENSITY_LIT, STAR_DIM_DURATION, 0.0, Ease::QuadOut, now);
        }
    }

    /// Advance every channel to `now` and spin the field. All channels
    /// settle before the host renders, so a frame never mixes pre- and
    /// post-tick state.
    pub fn advance(&mut self, now: f64, dt: f64) {
        let spin = if self.toggle.get() {
            FIELD_SPIN_EXPLODED
        } else {
            FIELD_SPIN_GATHERED
        };
        self.field_yaw += dt as f32 * spin;
        self.starfield_pitch += dt as f32 * STARFIELD_PITCH_RATE;
        self.starfield_yaw += dt as f32 * STARFIELD_YAW_RATE;

        for ch in &mut self.channels {
            ch.tick(now);
        }
        self.heart_progress.tick(now);
        self.heart_alpha.tick(now);
        self.star_intensity.tick(now);
    }
}

impl FrameSystem for Choreography {
    fn update(&mut self, clock: &FrameClock) -> Result<()> {
        self.advance(clock.total_time, clock.delta_time);
        Ok(())
    }

    fn name(&self) -> &str {
        "choreo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garland_layout::{generate_main, generate_ribbons};

    fn small_scene() -> Choreography {
        let mut rng = Rng::new(42);
        let mut field = generate_main(&mut rng, 20);
        field.extend(generate_ribbons(&mut rng, 10));
        Choreography::new(field, rng)
    }

    /// Step the driver at 60Hz until `until` seconds, returning the final
    /// tick time (which may overshoot `until` by up to one frame).
    fn run_to(c: &mut Choreography, from: f64, until: f64) -> f64 {
        let mut now = from;
        while now < until {
            now += 1.0 / 60.0;
            c.advance(now, 1.0 / 60.0);
        }
        now
    }

    #[test]
    fn starts_gathered_at_rest() {
        let c = small_scene();
        assert!(!c.is_exploded());
        for (o, ch) in c.ornaments().iter().zip(c.transforms()) {
            assert_eq!(ch.transform().position, o.rest_position);
        }
        assert_eq!(c.heart_progress(), 0.0);
        assert_eq!(c.heart_alpha(), 0.0);
    }

    #[test]
    fn explode_reaches_scatter_positions() {
        let mut c = small_scene();
        c.set_exploded(true, 0.0);
        run_to(&mut c, 0.0, 3.5);

        for (o, ch) in c.ornaments().iter().zip(c.transforms()) {
            let d = (ch.transform().position - o.scatter_position).length();
            assert!(d < 1e-3, "decoration {d} from scatter target");
        }
        assert!((c.heart_progress() - 1.0).abs() < 1e-4);
        assert!((c.heart_alpha() - 1.0).abs() < 1e-4);
        assert!(c.star_intensity() < 1e-4);
    }

    #[test]
    fn ribbons_collapse_when_exploded() {
        let mut c = small_scene();
        c.set_exploded(true, 0.0);
        run_to(&mut c, 0.0, 1.0);

        for (o, ch) in c.ornaments().iter().zip(c.transforms()) {
            if o.shape == OrnamentShape::Ribbon {
                assert!(ch.transform().scale.length() < 1e-4);
            } else {
                assert!(ch.transform().scale.length() > 0.1);
            }
        }
    }

    #[test]
    fn round_trip_settles_back_to_rest() {
        let mut c = small_scene();
        c.set_exploded(true, 0.0);
        run_to(&mut c, 0.0, 4.0);
        c.set_exploded(false, 4.0);
        run_to(&mut c, 4.0, 10.0);

        for (o, ch) in c.ornaments().iter().zip(c.transforms()) {
            let t = ch.transform();
            assert!((t.position - o.rest_position).length() < 1e-3);
            assert!((t.rotation - o.rest_rotation).length() < 1e-3);
            assert!((t.scale - o.rest_scale).length() < 1e-3);
        }
        assert!(c.heart_progress() < 1e-4);
        assert!(c.heart_alpha() < 1e-4);
        assert!((c.star_intensity() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn rest_and_scatter_positions_never_mutate() {
        let mut c = small_scene();
        let rests: Vec<_> = c.ornaments().iter().map(|o| o.rest_position).collect();
        let scatters: Vec<_> = c.ornaments().iter().map(|o| o.scatter_position).collect();

        let mut now = 0.0;
        for cycle in 0..3 {
            c.set_exploded(cycle % 2 == 0, now);
            run_to(&mut c, now, now + 1.5);
            now += 1.5;
        }

        for (i, o) in c.ornaments().iter().enumerate() {
            assert_eq!(o.rest_position, rests[i]);
            assert_eq!(o.scatter_position, scatters[i]);
        }
    }

    #[test]
    fn repeated_level_does_not_retarget() {
        let mut c = small_scene();
        c.set_exploded(true, 0.0);
        let now = run_to(&mut c, 0.0, 0.5);
        let mid: Vec<_> = c.transforms().iter().map(|ch| ch.transform()).collect();

        // Same level again: must be a no-op, not a restart
        c.set_exploded(true, now);
        c.advance(now, 0.0);
        for (a, b) in mid.iter().zip(c.transforms()) {
            assert!((a.position - b.transform().position).length() < 1e-6);
        }
    }

    #[test]
    fn rapid_retoggle_is_continuous() {
        let mut c = small_scene();
        let dt = 1.0 / 60.0;
        let mut now = 0.0;
        let mut prev: Vec<_> = c.transforms().iter().map(|ch| ch.transform()).collect();

        c.set_exploded(true, now);
        for frame in 0..120 {
            // Interrupt mid-flight every 20 frames
            if frame == 20 || frame == 40 || frame == 60 {
                c.set_exploded(frame == 40, now);
            }
            now += dt;
            c.advance(now, dt);

            for (p, ch) in prev.iter().zip(c.transforms()) {
                let step = (ch.transform().position - p.position).length();
                // Scatter shells sit ~50 out; ExpoOut over >=1.2s moves at
                // most ~10 units in a 60Hz frame right after launch
                assert!(step < 12.0, "discontinuity of {step} at frame {frame}");
            }
            prev = c.transforms().iter().map(|ch| ch.transform()).collect();
        }
    }

    #[test]
    fn ambient_spin_slows_when_exploded() {
        let mut c = small_scene();
        run_to(&mut c, 0.0, 1.0);
        let gathered_spin = c.field_yaw();

        let mut c2 = small_scene();
        c2.set_exploded(true, 0.0);
        run_to(&mut c2, 0.0, 1.0);
        let exploded_spin = c2.field_yaw();

        assert!(gathered_spin > exploded_spin * 5.0);
    }

    #[test]
    fn starfield_drifts_at_fixed_rates_in_both_states() {
        let mut c = small_scene();
        run_to(&mut c, 0.0, 1.0);
        let (pitch, yaw) = c.starfield_drift();
        assert!((pitch - -0.02).abs() < 5e-3);
        assert!((yaw - -0.05).abs() < 5e-3);

        // The field spin slows when exploded; the starfield must not
        c.set_exploded(true, 1.0);
        run_to(&mut c, 1.0, 2.0);
        let (pitch2, yaw2) = c.starfield_drift();
        assert!((pitch2 - -0.04).abs() < 5e-3);
        assert!((yaw2 - -0.10).abs() < 5e-3);
    }

    #[test]
    fn heart_sway_only_while_exploded() {
        let mut c = small_scene();
        assert_eq!(c.heart_sway(10.0), 0.0);
        c.set_exploded(true, 0.0);
        assert!(c.heart_sway(1.0).abs() > 0.0);
    }

    #[test]
    fn frame_system_ticks_through_trait() {
        let mut c = small_scene();
        let mut clock = FrameClock::new();
        c.set_exploded(true, 0.0);
        for _ in 0..60 {
            clock.advance(1.0 / 60.0);
            c.update(&clock).unwrap();
        }
        assert!(c.heart_progress() > 0.1);
        assert_eq!(c.name(), "choreo");
    }
}
