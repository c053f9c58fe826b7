//! Overlay panel: layout, interaction and the draw list it produces.
//!
//! Nothing here touches the GPU; `Overlay` turns a `PanelScene` into
//! instanced quads and glyphs.

use crate::coords::{Rect, Vec2};
use crate::input::{InputEvent, InputFrame, InputState, Key, KeyState, MouseButton};

pub const ITERATIONS_MIN: i32 = 10;
pub const ITERATIONS_MAX: i32 = 200;

const EDIT_MAX_LEN: usize = 8;

// ── controls ──────────────────────────────────────────────────────────────

/// Values the overlay edits in place for one frame, plus read-only readouts.
pub struct OverlayControls<'a> {
    /// Fractal iteration count, kept in [10, 200].
    pub iterations: &'a mut i32,
    /// RGB base color, each channel kept in [0, 1].
    pub base_color: &'a mut [f32; 3],
    pub zoom: f32,
    pub fps: f32,
}

impl OverlayControls<'_> {
    pub(crate) fn value(&self, id: ControlId) -> f32 {
        match id {
            ControlId::Iterations => *self.iterations as f32,
            ControlId::Channel(c) => self.base_color[c],
        }
    }

    /// Writes `v` clamped to the control's range; non-finite values are dropped.
    pub(crate) fn set(&mut self, id: ControlId, v: f32) {
        if !v.is_finite() {
            return;
        }
        let v = id.range().clamp(v);
        match id {
            ControlId::Iterations => *self.iterations = v.round() as i32,
            ControlId::Channel(c) => self.base_color[c] = v,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum ControlId {
    Iterations,
    /// Index into `base_color`.
    Channel(usize),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct ControlRange {
    pub min: f32,
    pub max: f32,
    /// Change per wheel line.
    pub step: f32,
}

impl ControlRange {
    pub fn clamp(self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }

    pub fn fraction(self, v: f32) -> f32 {
        ((v - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Value under horizontal position `x` of `track`.
    pub fn value_at(self, track: Rect, x: f32) -> f32 {
        let t = ((x - track.origin.x) / track.size.x.max(1.0)).clamp(0.0, 1.0);
        self.min + t * (self.max - self.min)
    }
}

impl ControlId {
    pub fn range(self) -> ControlRange {
        match self {
            ControlId::Iterations => ControlRange {
                min: ITERATIONS_MIN as f32,
                max: ITERATIONS_MAX as f32,
                step: 1.0,
            },
            ControlId::Channel(_) => ControlRange { min: 0.0, max: 1.0, step: 0.01 },
        }
    }

    fn label(self) -> &'static str {
        match self {
            ControlId::Iterations => "iter",
            ControlId::Channel(0) => "r",
            ControlId::Channel(1) => "g",
            ControlId::Channel(_) => "b",
        }
    }

    fn format(self, v: f32) -> String {
        match self {
            ControlId::Iterations => format!("{}", v.round() as i32),
            ControlId::Channel(_) => format!("{v:.2}"),
        }
    }

    fn fill_color(self) -> [f32; 4] {
        match self {
            ControlId::Iterations => [0.35, 0.55, 0.85, 1.0],
            ControlId::Channel(0) => [0.85, 0.30, 0.30, 1.0],
            ControlId::Channel(1) => [0.30, 0.75, 0.40, 1.0],
            ControlId::Channel(_) => [0.35, 0.50, 0.95, 1.0],
        }
    }
}

// ── layout ────────────────────────────────────────────────────────────────

/// Placement and sizing of the overlay panel, in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OverlayConfig {
    pub origin: Vec2,
    pub width: f32,
    pub row_height: f32,
    pub padding: f32,
    pub label_width: f32,
    pub font_size: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            origin: Vec2::new(16.0, 16.0),
            width: 256.0,
            row_height: 22.0,
            padding: 8.0,
            label_width: 40.0,
            font_size: 14.0,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum RowKind {
    Fps,
    Zoom,
    Control(ControlId),
    Swatch,
}

const ROWS: [RowKind; 7] = [
    RowKind::Fps,
    RowKind::Zoom,
    RowKind::Control(ControlId::Iterations),
    RowKind::Control(ControlId::Channel(0)),
    RowKind::Control(ControlId::Channel(1)),
    RowKind::Control(ControlId::Channel(2)),
    RowKind::Swatch,
];

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Row {
    pub kind: RowKind,
    pub rect: Rect,
    /// Left column holding the control name.
    pub label: Rect,
    /// Right column; the slider track for controls.
    pub value: Rect,
}

impl Row {
    /// Slim bar drawn inside the value column.
    fn bar(&self) -> Rect {
        let v = self.value;
        Rect::new(v.origin.x, v.origin.y + v.size.y * 0.15, v.size.x, v.size.y * 0.7)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Hit {
    Label,
    Value,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PanelLayout {
    pub panel: Rect,
    pub rows: Vec<Row>,
}

impl PanelLayout {
    pub fn new(config: &OverlayConfig) -> Self {
        let height = 2.0 * config.padding + ROWS.len() as f32 * config.row_height;
        let panel = Rect::new(config.origin.x, config.origin.y, config.width, height);
        let content = panel.inset(config.padding);

        let rows = ROWS
            .iter()
            .enumerate()
            .map(|(i, &kind)| {
                let rect = Rect::new(
                    content.origin.x,
                    content.origin.y + i as f32 * config.row_height,
                    content.size.x,
                    config.row_height,
                );
                let (label, value) = rect.split_left(config.label_width);
                Row { kind, rect, label, value }
            })
            .collect();

        Self { panel, rows }
    }

    pub fn control_row(&self, id: ControlId) -> Option<&Row> {
        self.rows.iter().find(|r| r.kind == RowKind::Control(id))
    }

    /// Control and part under `p`, if any.
    pub fn hit(&self, p: Vec2) -> Option<(ControlId, Hit)> {
        self.rows.iter().find_map(|row| {
            let RowKind::Control(id) = row.kind else { return None };
            if row.label.contains(p) {
                Some((id, Hit::Label))
            } else if row.value.contains(p) {
                Some((id, Hit::Value))
            } else {
                None
            }
        })
    }
}

// ── interaction ───────────────────────────────────────────────────────────

/// A typed value being entered into a control.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Edit {
    pub control: ControlId,
    pub buffer: String,
}

impl Edit {
    fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            let accepted = c.is_ascii_digit()
                || (c == '.'
                    && matches!(self.control, ControlId::Channel(_))
                    && !self.buffer.contains('.'));
            if accepted && self.buffer.len() < EDIT_MAX_LEN {
                self.buffer.push(c);
            }
        }
    }

    fn parsed(&self) -> Option<f32> {
        self.buffer.parse().ok()
    }
}

/// Interaction state carried between frames.
#[derive(Debug, Default)]
pub(crate) struct PanelState {
    drag: Option<ControlId>,
    edit: Option<Edit>,
}

impl PanelState {
    pub fn editing(&self) -> Option<&Edit> {
        self.edit.as_ref()
    }

    pub fn dragging(&self) -> Option<ControlId> {
        self.drag
    }

    /// Applies this frame's pointer, wheel and text input to `controls`.
    pub fn update(
        &mut self,
        layout: &PanelLayout,
        input: &InputState,
        frame: &InputFrame,
        controls: &mut OverlayControls<'_>,
    ) {
        let pointer = input.pointer_pos.map(Vec2::from_tuple);

        if frame.buttons_pressed.contains(&MouseButton::Left) {
            match pointer.and_then(|p| layout.hit(p)) {
                Some((id, Hit::Label)) => {
                    self.drag = None;
                    self.edit = Some(Edit { control: id, buffer: String::new() });
                }
                Some((id, Hit::Value)) => {
                    self.edit = None;
                    self.drag = Some(id);
                }
                None => self.edit = None,
            }
        }

        if let (Some(id), Some(p)) = (self.drag, pointer) {
            if let Some(row) = layout.control_row(id) {
                controls.set(id, id.range().value_at(row.value, p.x));
            }
        }
        if !input.button_down(MouseButton::Left) {
            self.drag = None;
        }

        if let Some((id, _)) = pointer.and_then(|p| layout.hit(p)) {
            let lines: f32 = frame.wheel_deltas().map(|d| d.lines_y()).sum();
            if lines != 0.0 {
                controls.set(id, controls.value(id) + lines * id.range().step);
            }
        }

        for ev in &frame.events {
            let Some(edit) = self.edit.as_mut() else { break };
            match ev {
                InputEvent::Text(t) => edit.push_text(&t.text),
                InputEvent::Key { key: Key::Backspace, state: KeyState::Pressed, .. } => {
                    edit.buffer.pop();
                }
                InputEvent::Key { key: Key::Enter, state: KeyState::Pressed, .. } => {
                    if let Some(v) = edit.parsed() {
                        controls.set(edit.control, v);
                    }
                    self.edit = None;
                }
                _ => {}
            }
        }
    }

    /// Builds the quads and labels for the current values.
    pub fn scene(
        &self,
        layout: &PanelLayout,
        config: &OverlayConfig,
        controls: &OverlayControls<'_>,
    ) -> PanelScene {
        let mut scene = PanelScene::default();
        scene.quad(layout.panel, PANEL_BG);

        let text_dy = ((config.row_height - config.font_size * 1.2) * 0.5).max(0.0);
        let text_at = |r: Rect, dx: f32| Vec2::new(r.origin.x + dx, r.origin.y + text_dy);

        for row in &layout.rows {
            match row.kind {
                RowKind::Fps => scene.label(format!("fps: {:.0}", controls.fps), text_at(row.rect, 0.0), TEXT),
                RowKind::Zoom => scene.label(format!("zoom: {:.1}", controls.zoom), text_at(row.rect, 0.0), TEXT),
                RowKind::Control(id) => {
                    let editing = self.edit.as_ref().filter(|e| e.control == id);
                    if editing.is_some() {
                        scene.quad(row.label, FOCUS);
                    }
                    scene.label(id.label().to_owned(), text_at(row.label, 0.0), TEXT);

                    let bar = row.bar();
                    let value = controls.value(id);
                    scene.quad(bar, TRACK_BG);
                    scene.quad(bar.with_width_fraction(id.range().fraction(value)), id.fill_color());

                    let text = match editing {
                        Some(e) => format!("{}_", e.buffer),
                        None => id.format(value),
                    };
                    scene.label(text, text_at(row.value, 4.0), TEXT);
                }
                RowKind::Swatch => {
                    scene.label("color".to_owned(), text_at(row.label, 0.0), TEXT);
                    let [r, g, b] = *controls.base_color;
                    scene.quad(row.bar(), [r, g, b, 1.0]);
                }
            }
        }

        scene
    }
}

// ── draw list ─────────────────────────────────────────────────────────────

const PANEL_BG: [f32; 4] = [0.06, 0.07, 0.09, 0.82];
const TRACK_BG: [f32; 4] = [0.20, 0.22, 0.26, 1.0];
const FOCUS: [f32; 4] = [0.95, 0.80, 0.30, 0.35];
const TEXT: [f32; 4] = [0.92, 0.92, 0.95, 1.0];

/// Solid rectangle, straight (non-premultiplied) RGBA.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Quad {
    pub rect: Rect,
    pub color: [f32; 4],
}

/// Single line of text; `origin` is the top-left of its line box.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Label {
    pub text: String,
    pub origin: Vec2,
    pub color: [f32; 4],
}

/// Everything the overlay draws this frame, in paint order (quads, then labels).
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct PanelScene {
    pub quads: Vec<Quad>,
    pub labels: Vec<Label>,
}

impl PanelScene {
    fn quad(&mut self, rect: Rect, color: [f32; 4]) {
        if !rect.is_empty() {
            self.quads.push(Quad { rect, color });
        }
    }

    fn label(&mut self, text: String, origin: Vec2, color: [f32; 4]) {
        self.labels.push(Label { text, origin, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{MouseWheelDelta, TextEvent};

    struct Harness {
        layout: PanelLayout,
        panel: PanelState,
        input: InputState,
        iterations: i32,
        color: [f32; 3],
    }

    impl Harness {
        fn new() -> Self {
            Self {
                layout: PanelLayout::new(&OverlayConfig::default()),
                panel: PanelState::default(),
                input: InputState::new(true),
                iterations: 100,
                color: [0.0, 1.0, 1.0],
            }
        }

        /// Feeds one frame of events through the panel.
        fn frame(&mut self, events: Vec<InputEvent>) {
            let mut frame = InputFrame::default();
            for ev in events {
                self.input.apply_event(&mut frame, ev);
            }
            let mut controls = OverlayControls {
                iterations: &mut self.iterations,
                base_color: &mut self.color,
                zoom: 0.5,
                fps: 60.0,
            };
            self.panel.update(&self.layout, &self.input, &frame, &mut controls);
        }

        fn row(&self, id: ControlId) -> Row {
            *self.layout.control_row(id).unwrap()
        }
    }

    fn move_to(p: Vec2) -> InputEvent {
        InputEvent::PointerMoved { x: p.x, y: p.y }
    }

    fn left(state: KeyState) -> InputEvent {
        InputEvent::PointerButton { button: MouseButton::Left, state }
    }

    fn key(key: Key) -> InputEvent {
        InputEvent::Key { key, state: KeyState::Pressed, repeat: false }
    }

    fn text(s: &str) -> InputEvent {
        InputEvent::Text(TextEvent { text: s.to_owned() })
    }

    fn at(r: Rect, tx: f32) -> Vec2 {
        Vec2::new(r.origin.x + r.size.x * tx, r.origin.y + r.size.y * 0.5)
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn panel_sits_at_configured_origin() {
        let layout = PanelLayout::new(&OverlayConfig::default());
        assert_eq!(layout.panel, Rect::new(16.0, 16.0, 256.0, 2.0 * 8.0 + 7.0 * 22.0));
        assert_eq!(layout.rows.len(), 7);
        for pair in layout.rows.windows(2) {
            assert_eq!(pair[0].rect.bottom(), pair[1].rect.origin.y);
        }
    }

    #[test]
    fn hit_distinguishes_label_and_track() {
        let layout = PanelLayout::new(&OverlayConfig::default());
        let row = *layout.control_row(ControlId::Iterations).unwrap();
        assert_eq!(layout.hit(at(row.label, 0.5)), Some((ControlId::Iterations, Hit::Label)));
        assert_eq!(layout.hit(at(row.value, 0.5)), Some((ControlId::Iterations, Hit::Value)));
        assert_eq!(layout.hit(Vec2::new(0.0, 0.0)), None);
    }

    #[test]
    fn value_at_maps_track_to_range() {
        let range = ControlId::Iterations.range();
        let track = Rect::new(100.0, 0.0, 190.0, 10.0);
        assert_eq!(range.value_at(track, 100.0), 10.0);
        assert_eq!(range.value_at(track, 290.0), 200.0);
        assert_eq!(range.value_at(track, 195.0), 105.0);
        assert_eq!(range.value_at(track, -50.0), 10.0);
        assert_eq!(range.value_at(track, 900.0), 200.0);
    }

    // ── drag ──────────────────────────────────────────────────────────────

    #[test]
    fn dragging_iterations_track_sets_rounded_clamped_value() {
        let mut h = Harness::new();
        let track = h.row(ControlId::Iterations).value;

        h.frame(vec![move_to(at(track, 1.0 - 1e-4)), left(KeyState::Pressed)]);
        assert_eq!(h.iterations, 200);
        assert_eq!(h.panel.dragging(), Some(ControlId::Iterations));

        // Pointer leaves the track while held; value follows and clamps.
        h.frame(vec![move_to(Vec2::new(0.0, 500.0))]);
        assert_eq!(h.iterations, 10);

        h.frame(vec![left(KeyState::Released)]);
        assert_eq!(h.panel.dragging(), None);

        h.frame(vec![move_to(at(track, 0.5))]);
        assert_eq!(h.iterations, 10);
    }

    #[test]
    fn dragging_channel_sets_fraction() {
        let mut h = Harness::new();
        let track = h.row(ControlId::Channel(0)).value;
        h.frame(vec![move_to(at(track, 0.25)), left(KeyState::Pressed), left(KeyState::Released)]);
        assert!((h.color[0] - 0.25).abs() < 1e-4);
        assert_eq!(h.color[1..], [1.0, 1.0]);
    }

    // ── wheel ─────────────────────────────────────────────────────────────

    #[test]
    fn wheel_over_control_nudges_by_step() {
        let mut h = Harness::new();
        let track = h.row(ControlId::Iterations).value;
        h.frame(vec![move_to(at(track, 0.5)), InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: 3.0 })]);
        assert_eq!(h.iterations, 103);

        let g = h.row(ControlId::Channel(1)).value;
        h.frame(vec![move_to(at(g, 0.5)), InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: 5.0 })]);
        assert_eq!(h.color[1], 1.0);
    }

    #[test]
    fn wheel_outside_panel_changes_nothing() {
        let mut h = Harness::new();
        h.frame(vec![
            move_to(Vec2::new(900.0, 600.0)),
            InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: 3.0 }),
        ]);
        assert_eq!(h.iterations, 100);
        assert_eq!(h.color, [0.0, 1.0, 1.0]);
    }

    // ── typed edits ───────────────────────────────────────────────────────

    #[test]
    fn typed_value_commits_on_enter() {
        let mut h = Harness::new();
        let label = h.row(ControlId::Iterations).label;
        h.frame(vec![move_to(at(label, 0.5)), left(KeyState::Pressed), left(KeyState::Released)]);
        assert_eq!(h.panel.editing().map(|e| e.control), Some(ControlId::Iterations));

        h.frame(vec![text("15"), text("x"), text("9"), key(Key::Backspace), text("0")]);
        assert_eq!(h.panel.editing().map(|e| e.buffer.as_str()), Some("150"));
        assert_eq!(h.iterations, 100);

        h.frame(vec![key(Key::Enter)]);
        assert_eq!(h.iterations, 150);
        assert!(h.panel.editing().is_none());
    }

    #[test]
    fn typed_value_is_clamped_to_range() {
        let mut h = Harness::new();
        let label = h.row(ControlId::Iterations).label;
        h.frame(vec![move_to(at(label, 0.5)), left(KeyState::Pressed), left(KeyState::Released)]);
        h.frame(vec![text("999"), key(Key::Enter)]);
        assert_eq!(h.iterations, 200);

        h.frame(vec![left(KeyState::Pressed), left(KeyState::Released)]);
        h.frame(vec![text("5"), key(Key::Enter)]);
        assert_eq!(h.iterations, 10);
    }

    #[test]
    fn channel_accepts_one_decimal_point() {
        let mut h = Harness::new();
        let label = h.row(ControlId::Channel(2)).label;
        h.frame(vec![move_to(at(label, 0.5)), left(KeyState::Pressed), left(KeyState::Released)]);
        h.frame(vec![text("0.4.2"), key(Key::Enter)]);
        assert!((h.color[2] - 0.42).abs() < 1e-6);
    }

    #[test]
    fn iterations_reject_decimal_point() {
        let mut h = Harness::new();
        let label = h.row(ControlId::Iterations).label;
        h.frame(vec![move_to(at(label, 0.5)), left(KeyState::Pressed), left(KeyState::Released)]);
        h.frame(vec![text("12.5")]);
        assert_eq!(h.panel.editing().map(|e| e.buffer.as_str()), Some("125"));
    }

    #[test]
    fn clicking_elsewhere_cancels_edit() {
        let mut h = Harness::new();
        let label = h.row(ControlId::Iterations).label;
        h.frame(vec![move_to(at(label, 0.5)), left(KeyState::Pressed), left(KeyState::Released)]);
        h.frame(vec![text("42")]);
        h.frame(vec![move_to(Vec2::new(900.0, 600.0)), left(KeyState::Pressed), left(KeyState::Released)]);
        assert!(h.panel.editing().is_none());
        assert_eq!(h.iterations, 100);
    }

    #[test]
    fn empty_edit_commits_nothing() {
        let mut h = Harness::new();
        let label = h.row(ControlId::Channel(0)).label;
        h.frame(vec![move_to(at(label, 0.5)), left(KeyState::Pressed), left(KeyState::Released)]);
        h.frame(vec![key(Key::Enter)]);
        assert_eq!(h.color[0], 0.0);
    }

    // ── scene ─────────────────────────────────────────────────────────────

    #[test]
    fn scene_shows_readouts_and_fills() {
        let mut h = Harness::new();
        h.iterations = 105;
        let config = OverlayConfig::default();
        let controls = OverlayControls {
            iterations: &mut h.iterations,
            base_color: &mut h.color,
            zoom: 0.5,
            fps: 59.7,
        };
        let scene = h.panel.scene(&h.layout, &config, &controls);

        let texts: Vec<&str> = scene.labels.iter().map(|l| l.text.as_str()).collect();
        assert!(texts.contains(&"fps: 60"));
        assert!(texts.contains(&"zoom: 0.5"));
        assert!(texts.contains(&"105"));
        assert!(texts.contains(&"1.00"));

        let iter_bar = h.layout.control_row(ControlId::Iterations).unwrap().bar();
        let fill = scene
            .quads
            .iter()
            .find(|q| q.color == ControlId::Iterations.fill_color())
            .unwrap();
        assert!((fill.rect.size.x - iter_bar.size.x * 0.5).abs() < 1e-3);

        // Red channel at zero draws no fill; swatch carries the color.
        assert!(!scene.quads.iter().any(|q| q.color == ControlId::Channel(0).fill_color()));
        assert!(scene.quads.iter().any(|q| q.color == [0.0, 1.0, 1.0, 1.0]));
    }
}
