//! Camera, zoom and render parameters, integrated once per frame.
//!
//! The update rule is the pure function [`step`]; [`ViewportController`]
//! wraps it with the viewport resolution and snapshot access.

use fractal_engine::render::shader::{UniformBlock, UniformSource, UniformValue};

pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 10000.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraState {
    pub position: [f32; 2],
    /// Always within `[ZOOM_MIN, ZOOM_MAX]`.
    pub zoom: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self { position: [-0.5, 0.0], zoom: 0.5 }
    }
}

/// Values the overlay edits; range enforcement is the overlay's job.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderParameters {
    pub iterations: i32,
    pub base_color: [f32; 3],
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self { iterations: 100, base_color: [0.0, 1.0, 1.0] }
    }
}

/// Shader time, as opposed to the engine's wall clock.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ClockState {
    pub elapsed_since_start: f32,
    pub last_frame_delta: f32,
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ViewState {
    pub camera: CameraState,
    pub parameters: RenderParameters,
    pub clock: ClockState,
}

/// Input sampled for one frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ControlInput {
    pub focused: bool,
    pub forward: bool,
    pub left: bool,
    pub back: bool,
    pub right: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
    pub exit: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ViewerControl {
    Continue,
    Exit,
}

/// Advances `state` by `dt` seconds under `input`.
///
/// Without focus nothing changes, not even the clock, so regaining focus
/// resumes exactly where the view was left.
pub fn step(state: ViewState, dt: f32, input: &ControlInput) -> (ViewState, ViewerControl) {
    if !input.focused {
        return (state, ViewerControl::Continue);
    }

    let mut next = state;
    next.clock.elapsed_since_start += dt;
    next.clock.last_frame_delta = dt;

    if input.exit {
        return (next, ViewerControl::Exit);
    }

    let camera = &mut next.camera;

    // Pan speed is inversely proportional to zoom.
    let pan = dt / camera.zoom;
    let dx = (input.right as i8 - input.left as i8) as f32;
    let dy = (input.forward as i8 - input.back as i8) as f32;
    camera.position[0] += dx * pan;
    camera.position[1] += dy * pan;

    // Clamped to the bound itself; the overshoot is dropped.
    if input.zoom_in && camera.zoom < ZOOM_MAX {
        camera.zoom = (camera.zoom + dt * camera.zoom).min(ZOOM_MAX);
    }
    if input.zoom_out && camera.zoom > ZOOM_MIN {
        camera.zoom = (camera.zoom - dt * camera.zoom).max(ZOOM_MIN);
    }

    (next, ViewerControl::Continue)
}

/// Per-frame values uploaded to the fractal program.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub resolution: [f32; 2],
    pub time: f32,
    pub zoom: f32,
    pub iterations: i32,
    pub position: [f32; 2],
    pub base_color: [f32; 3],
}

impl UniformSource for FrameSnapshot {
    fn write_uniforms(&self, block: &mut UniformBlock) {
        block.set("resolution", UniformValue::Vec2(self.resolution));
        block.set("time", UniformValue::F32(self.time));
        block.set("zoom", UniformValue::F32(self.zoom));
        block.set("iter", UniformValue::I32(self.iterations));
        block.set("cameraPosition", UniformValue::Vec2(self.position));
        block.set("color", UniformValue::Vec3(self.base_color));
    }
}

#[derive(Debug, Default)]
pub struct ViewportController {
    state: ViewState,
    resolution: [f32; 2],
}

impl ViewportController {
    pub fn new(state: ViewState, resolution: [f32; 2]) -> Self {
        Self { state, resolution }
    }

    pub fn advance(&mut self, dt: f32, input: &ControlInput) -> ViewerControl {
        let (next, control) = step(self.state, dt, input);
        self.state = next;
        control
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let ViewState { camera, parameters, clock } = self.state;
        FrameSnapshot {
            resolution: self.resolution,
            time: clock.elapsed_since_start,
            zoom: camera.zoom,
            iterations: parameters.iterations,
            position: camera.position,
            base_color: parameters.base_color,
        }
    }

    /// Drawable size in physical pixels, as the fragment shader sees it.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.resolution = [width as f32, height as f32];
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Exclusive access for the overlay, between `advance` and the next frame.
    pub fn parameters_mut(&mut self) -> &mut RenderParameters {
        &mut self.state.parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focused() -> ControlInput {
        ControlInput { focused: true, ..ControlInput::default() }
    }

    fn with_zoom(zoom: f32) -> ViewState {
        ViewState { camera: CameraState { position: [0.0, 0.0], zoom }, ..ViewState::default() }
    }

    // ── zoom ──────────────────────────────────────────────────────────────

    fn zoom_in_from(start: f32) {
        let input = ControlInput { zoom_in: true, ..focused() };
        let mut state = with_zoom(start);
        let mut prev = state.camera.zoom;

        for _ in 0..200 {
            state = step(state, 0.5, &input).0;
            if prev < ZOOM_MAX {
                assert!(state.camera.zoom > prev, "stalled at {prev} starting from {start}");
            }
            assert!(state.camera.zoom <= ZOOM_MAX);
            prev = state.camera.zoom;
        }
        assert_eq!(state.camera.zoom, ZOOM_MAX);

        let again = step(state, 0.5, &input).0;
        assert_eq!(again.camera.zoom, ZOOM_MAX);
    }

    #[test]
    fn zoom_in_grows_until_exactly_max_then_stays() {
        zoom_in_from(0.2);
    }

    #[test]
    fn zoom_in_from_just_above_min_reaches_max() {
        zoom_in_from(0.100_000_1);
    }

    #[test]
    fn zoom_in_just_below_max_lands_exactly_on_max() {
        let input = ControlInput { zoom_in: true, ..focused() };
        let near = ZOOM_MAX - 0.01;
        assert!(near < ZOOM_MAX);

        let state = step(with_zoom(near), 0.5, &input).0;
        assert_eq!(state.camera.zoom, ZOOM_MAX);

        zoom_in_from(near);
    }

    #[test]
    fn zoom_out_shrinks_until_exactly_min_then_stays() {
        let input = ControlInput { zoom_out: true, ..focused() };
        let mut state = with_zoom(50.0);
        let mut prev = state.camera.zoom;

        for _ in 0..200 {
            state = step(state, 0.3, &input).0;
            if prev > ZOOM_MIN {
                assert!(state.camera.zoom < prev);
            }
            assert!(state.camera.zoom >= ZOOM_MIN);
            prev = state.camera.zoom;
        }
        assert_eq!(state.camera.zoom, ZOOM_MIN);

        let again = step(state, 0.3, &input).0;
        assert_eq!(again.camera.zoom, ZOOM_MIN);
    }

    #[test]
    fn zoom_is_exponential_in_dt() {
        let input = ControlInput { zoom_in: true, ..focused() };
        let state = with_zoom(3.0);
        assert_eq!(step(state, 0.25, &input).0.camera.zoom, 3.75);
    }

    // ── pan ───────────────────────────────────────────────────────────────

    #[test]
    fn pan_displacement_scales_inversely_with_zoom() {
        let input = ControlInput { right: true, ..focused() };
        let near = step(with_zoom(1.0), 0.1, &input).0;
        let far = step(with_zoom(2.0), 0.1, &input).0;

        let d_near = near.camera.position[0];
        let d_far = far.camera.position[0];
        assert!(d_near > 0.0);
        assert!((d_far - d_near / 2.0).abs() < 1e-6);
    }

    #[test]
    fn wasd_map_to_axes() {
        let at = |input: ControlInput| step(with_zoom(1.0), 1.0, &input).0.camera.position;
        assert_eq!(at(ControlInput { forward: true, ..focused() }), [0.0, 1.0]);
        assert_eq!(at(ControlInput { back: true, ..focused() }), [0.0, -1.0]);
        assert_eq!(at(ControlInput { left: true, ..focused() }), [-1.0, 0.0]);
        assert_eq!(at(ControlInput { right: true, ..focused() }), [1.0, 0.0]);
        assert_eq!(at(ControlInput { left: true, right: true, ..focused() }), [0.0, 0.0]);
    }

    #[test]
    fn pan_uses_zoom_before_this_frames_zoom_change() {
        let input = ControlInput { right: true, zoom_in: true, ..focused() };
        let next = step(with_zoom(2.0), 1.0, &input).0;
        assert_eq!(next.camera.position[0], 0.5);
        assert_eq!(next.camera.zoom, 4.0);
    }

    // ── focus & clock ─────────────────────────────────────────────────────

    #[test]
    fn unfocused_step_freezes_everything() {
        let state = ViewState::default();
        let input = ControlInput { focused: false, forward: true, zoom_in: true, exit: true, ..ControlInput::default() };
        let (next, control) = step(state, 0.5, &input);
        assert_eq!(next, state);
        assert_eq!(control, ViewerControl::Continue);
    }

    #[test]
    fn refocus_resumes_from_frozen_values() {
        let mut ctl = ViewportController::default();
        let held = ControlInput { zoom_in: true, ..focused() };

        ctl.advance(0.5, &held);
        let frozen = *ctl.state();

        let unfocused = ControlInput { focused: false, ..held };
        for _ in 0..10 {
            ctl.advance(0.25, &unfocused);
        }
        assert_eq!(*ctl.state(), frozen);

        ctl.advance(0.5, &held);
        assert_eq!(ctl.state().clock.elapsed_since_start, 1.0);
        assert_eq!(ctl.state().camera.zoom, frozen.camera.zoom * 1.5);
    }

    #[test]
    fn clock_accumulates_focused_time() {
        let mut ctl = ViewportController::default();
        ctl.advance(0.25, &focused());
        ctl.advance(0.5, &focused());
        assert_eq!(ctl.state().clock, ClockState { elapsed_since_start: 0.75, last_frame_delta: 0.5 });
    }

    #[test]
    fn exit_key_signals_exit() {
        let input = ControlInput { exit: true, ..focused() };
        assert_eq!(step(ViewState::default(), 0.1, &input).1, ViewerControl::Exit);
    }

    // ── snapshot ──────────────────────────────────────────────────────────

    #[test]
    fn end_to_end_zoom_from_defaults() {
        let mut ctl = ViewportController::new(ViewState::default(), [1280.0, 720.0]);
        let snap = ctl.snapshot();
        assert_eq!((snap.zoom, snap.position, snap.iterations), (0.5, [-0.5, 0.0], 100));

        let input = ControlInput { zoom_in: true, ..focused() };
        ctl.advance(1.0, &input);
        assert_eq!(ctl.snapshot().zoom, 1.0);
        ctl.advance(1.0, &input);
        assert_eq!(ctl.snapshot().zoom, 2.0);
        assert_eq!(ctl.snapshot().time, 2.0);
    }

    #[test]
    fn snapshot_reflects_overlay_edits_and_resolution() {
        let mut ctl = ViewportController::default();
        ctl.set_resolution(800, 600);
        {
            let params = ctl.parameters_mut();
            params.iterations = 150;
            params.base_color = [1.0, 0.5, 0.0];
        }
        let snap = ctl.snapshot();
        assert_eq!(snap.resolution, [800.0, 600.0]);
        assert_eq!(snap.iterations, 150);
        assert_eq!(snap.base_color, [1.0, 0.5, 0.0]);
    }

    // ── uniform upload ────────────────────────────────────────────────────

    #[test]
    fn snapshot_writes_named_uniforms() {
        let linked = fractal_engine::render::shader::link(
            include_str!("../resources/fractal.vert.wgsl"),
            include_str!("../resources/fractal.frag.wgsl"),
        )
        .expect("shipped shaders link");
        let mut block = UniformBlock::new(linked.uniforms().cloned().expect("fractal has uniforms"));

        let snap = ViewportController::new(ViewState::default(), [640.0, 480.0]).snapshot();
        snap.write_uniforms(&mut block);

        let layout = block.layout().clone();
        let read = |name: &str| {
            let off = layout.field(name).expect("uniform present").offset as usize;
            f32::from_le_bytes(block.bytes()[off..off + 4].try_into().unwrap())
        };
        assert_eq!(read("resolution"), 640.0);
        assert_eq!(read("zoom"), 0.5);
        assert_eq!(read("cameraPosition"), -0.5);
        let iter_off = layout.field("iter").unwrap().offset as usize;
        assert_eq!(i32::from_le_bytes(block.bytes()[iter_off..iter_off + 4].try_into().unwrap()), 100);
    }

    #[test]
    fn program_without_color_uniform_accepts_snapshot() {
        let linked = fractal_engine::render::shader::link(
            include_str!("../resources/fractal.vert.wgsl"),
            r#"
                struct Params { zoom: f32 }
                @group(0) @binding(0) var<uniform> params: Params;
                @fragment
                fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(params.zoom); }
            "#,
        )
        .expect("links without color");
        let mut block = UniformBlock::new(linked.uniforms().cloned().unwrap());

        ViewportController::default().snapshot().write_uniforms(&mut block);
        assert_eq!(f32::from_le_bytes(block.bytes()[0..4].try_into().unwrap()), 0.5);
    }
}
