//! Parameter panel.
//!
//! Every editable parameter is described by a [`ControlSpec`] in
//! [`CONTROLS`]. Most controls only regenerate their point cloud once the
//! user finishes editing (the slider is released or the text field loses
//! focus); [`CommitTracker`] detects that moment from per-frame samples.
//! The star color regenerates on every change.

use crate::params::{ranges, GalaxyParams, ParamRange};
use crate::scene::FieldId;
use glam::Vec3;

/// Default panel width in points.
pub const PANEL_WIDTH: f32 = 360.0;

/// When a control's edits reach the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeMode {
    /// Every intermediate value.
    OnChange,
    /// Once, after the interaction ends.
    OnCommit,
}

/// Collapsing group a control is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folder {
    Galaxy,
    Stars,
}

impl Folder {
    pub fn title(self) -> &'static str {
        match self {
            Folder::Galaxy => "Galaxy Parameters",
            Folder::Stars => "Background Stars Parameters",
        }
    }
}

/// Identifies one field of [`GalaxyParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Count,
    Size,
    Radius,
    Branches,
    Spin,
    Randomness,
    RandomnessPower,
    InsideColor,
    OutsideColor,
    GalaxyRotation,
    StarsRotation,
    Stars,
    StarColor,
}

/// Mutable view of one parameter together with its panel range.
#[derive(Debug)]
pub enum ParamValue<'a> {
    Int(&'a mut u32, ParamRange),
    Float(&'a mut f32, ParamRange),
    Color(&'a mut Vec3),
}

impl ParamKey {
    /// Numeric range, or `None` for colors.
    pub fn range(self) -> Option<ParamRange> {
        match self {
            ParamKey::Count => Some(ranges::COUNT),
            ParamKey::Size => Some(ranges::SIZE),
            ParamKey::Radius => Some(ranges::RADIUS),
            ParamKey::Branches => Some(ranges::BRANCHES),
            ParamKey::Spin => Some(ranges::SPIN),
            ParamKey::Randomness => Some(ranges::RANDOMNESS),
            ParamKey::RandomnessPower => Some(ranges::RANDOMNESS_POWER),
            ParamKey::GalaxyRotation => Some(ranges::GALAXY_ROTATION),
            ParamKey::StarsRotation => Some(ranges::STARS_ROTATION),
            ParamKey::Stars => Some(ranges::STARS),
            ParamKey::InsideColor | ParamKey::OutsideColor | ParamKey::StarColor => None,
        }
    }

    pub fn value_mut(self, params: &mut GalaxyParams) -> ParamValue<'_> {
        let range = self.range().unwrap_or(ParamRange::new(0.0, 1.0, 0.0));
        match self {
            ParamKey::Count => ParamValue::Int(&mut params.count, range),
            ParamKey::Branches => ParamValue::Int(&mut params.branches, range),
            ParamKey::Stars => ParamValue::Int(&mut params.stars, range),
            ParamKey::Size => ParamValue::Float(&mut params.size, range),
            ParamKey::Radius => ParamValue::Float(&mut params.radius, range),
            ParamKey::Spin => ParamValue::Float(&mut params.spin, range),
            ParamKey::Randomness => ParamValue::Float(&mut params.randomness, range),
            ParamKey::RandomnessPower => ParamValue::Float(&mut params.randomness_power, range),
            ParamKey::GalaxyRotation => ParamValue::Float(&mut params.galaxy_rotation, range),
            ParamKey::StarsRotation => ParamValue::Float(&mut params.stars_rotation, range),
            ParamKey::InsideColor => ParamValue::Color(&mut params.inside_color),
            ParamKey::OutsideColor => ParamValue::Color(&mut params.outside_color),
            ParamKey::StarColor => ParamValue::Color(&mut params.star_color),
        }
    }
}

/// One row of the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSpec {
    pub key: ParamKey,
    pub label: &'static str,
    pub mode: ChangeMode,
    /// The cloud regenerated by this control.
    pub target: FieldId,
    pub folder: Folder,
}

impl ControlSpec {
    const fn new(key: ParamKey, label: &'static str, mode: ChangeMode, target: FieldId, folder: Folder) -> Self {
        Self { key, label, mode, target, folder }
    }

    pub fn range(&self) -> Option<ParamRange> {
        self.key.range()
    }
}

use ChangeMode::{OnChange, OnCommit};

/// Panel rows in display order.
pub const CONTROLS: [ControlSpec; 13] = [
    ControlSpec::new(ParamKey::Count, "count", OnCommit, FieldId::Galaxy, Folder::Galaxy),
    ControlSpec::new(ParamKey::Size, "size", OnCommit, FieldId::Galaxy, Folder::Galaxy),
    ControlSpec::new(ParamKey::Radius, "radius", OnCommit, FieldId::Galaxy, Folder::Galaxy),
    ControlSpec::new(ParamKey::Branches, "branches", OnCommit, FieldId::Galaxy, Folder::Galaxy),
    ControlSpec::new(ParamKey::Spin, "spin", OnCommit, FieldId::Galaxy, Folder::Galaxy),
    ControlSpec::new(ParamKey::Randomness, "randomness", OnCommit, FieldId::Galaxy, Folder::Galaxy),
    ControlSpec::new(ParamKey::RandomnessPower, "randomnessPower", OnCommit, FieldId::Galaxy, Folder::Galaxy),
    ControlSpec::new(ParamKey::InsideColor, "insideColor", OnCommit, FieldId::Galaxy, Folder::Galaxy),
    ControlSpec::new(ParamKey::OutsideColor, "outsideColor", OnCommit, FieldId::Galaxy, Folder::Galaxy),
    ControlSpec::new(ParamKey::GalaxyRotation, "galaxyRotation", OnCommit, FieldId::Galaxy, Folder::Galaxy),
    ControlSpec::new(ParamKey::StarsRotation, "starsRotation", OnCommit, FieldId::Stars, Folder::Stars),
    ControlSpec::new(ParamKey::Stars, "stars", OnCommit, FieldId::Stars, Folder::Stars),
    ControlSpec::new(ParamKey::StarColor, "starColor", OnChange, FieldId::Stars, Folder::Stars),
];

/// Turns per-frame `(changed, interacting)` samples into commit events.
///
/// A commit fires on the first frame where an edit is pending and the user
/// is no longer interacting.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitTracker {
    pending: bool,
}

impl CommitTracker {
    /// Record one frame. Returns `true` when the edit should be committed.
    pub fn observe(&mut self, changed: bool, interacting: bool) -> bool {
        self.pending |= changed;
        if self.pending && !interacting {
            self.pending = false;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// What the panel asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    /// Rebuild a cloud from the current parameters.
    Regenerate(FieldId),
    /// Push the current point size to both live resources.
    Restyle,
}

/// Panel state that persists across frames.
#[derive(Debug, Default)]
pub struct ParameterPanel {
    trackers: [CommitTracker; CONTROLS.len()],
}

impl ParameterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's change flag for control `index`, appending any resulting events.
    pub fn observe(&mut self, index: usize, changed: bool, interacting: bool, events: &mut Vec<PanelEvent>) {
        let spec = &CONTROLS[index];
        if changed && spec.key == ParamKey::Size {
            push_unique(events, PanelEvent::Restyle);
        }
        let fire = match spec.mode {
            ChangeMode::OnChange => changed,
            ChangeMode::OnCommit => self.trackers[index].observe(changed, interacting),
        };
        if fire {
            push_unique(events, PanelEvent::Regenerate(spec.target));
        }
    }

    /// Whether any control has an edit waiting for the interaction to end.
    pub fn has_pending(&self) -> bool {
        self.trackers.iter().any(CommitTracker::is_pending)
    }

    /// Draw the panel and return the events raised this frame.
    pub fn show(&mut self, ctx: &egui::Context, params: &mut GalaxyParams, fps: f32) -> Vec<PanelEvent> {
        let interacting = ctx.input(|i| i.pointer.any_down()) || ctx.wants_keyboard_input();
        let mut changed = [false; CONTROLS.len()];

        egui::Window::new("Galaxy")
            .default_width(PANEL_WIDTH)
            .default_open(false)
            .resizable(false)
            .show(ctx, |ui| {
                for folder in [Folder::Galaxy, Folder::Stars] {
                    egui::CollapsingHeader::new(folder.title())
                        .default_open(true)
                        .show(ui, |ui| {
                            for (i, spec) in CONTROLS.iter().enumerate() {
                                if spec.folder == folder {
                                    changed[i] = control_row(ui, spec, params);
                                }
                            }
                        });
                }
                ui.separator();
                ui.label(format!("{:.0} FPS", fps));
            });

        if changed.contains(&true) {
            *params = params.clamped();
        }

        let mut events = Vec::new();
        for (i, &c) in changed.iter().enumerate() {
            self.observe(i, c, interacting, &mut events);
        }
        events
    }
}

fn push_unique(events: &mut Vec<PanelEvent>, event: PanelEvent) {
    if !events.contains(&event) {
        events.push(event);
    }
}

fn control_row(ui: &mut egui::Ui, spec: &ControlSpec, params: &mut GalaxyParams) -> bool {
    match spec.key.value_mut(params) {
        ParamValue::Int(value, range) => {
            let slider = egui::Slider::new(value, range.min as u32..=range.max as u32)
                .step_by(range.step as f64)
                .logarithmic(range.max >= 100_000.0)
                .text(spec.label);
            ui.add(slider).changed()
        }
        ParamValue::Float(value, range) => {
            let slider = egui::Slider::new(value, range.min..=range.max)
                .step_by(range.step as f64)
                .text(spec.label);
            ui.add(slider).changed()
        }
        ParamValue::Color(value) => {
            ui.horizontal(|ui| {
                let mut rgb = value.to_array();
                let changed = ui.color_edit_button_rgb(&mut rgb).changed();
                ui.label(spec.label);
                if changed {
                    *value = Vec3::from_array(rgb);
                }
                changed
            })
            .inner
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(key: ParamKey) -> usize {
        CONTROLS.iter().position(|c| c.key == key).unwrap()
    }

    #[test]
    fn test_commit_waits_for_interaction_to_end() {
        let mut tracker = CommitTracker::default();
        assert!(!tracker.observe(true, true));
        assert!(!tracker.observe(true, true));
        assert!(tracker.is_pending());
        assert!(tracker.observe(false, false));
        assert!(!tracker.is_pending());
        assert!(!tracker.observe(false, false));
    }

    #[test]
    fn test_commit_fires_immediately_without_interaction() {
        let mut tracker = CommitTracker::default();
        assert!(tracker.observe(true, false));
    }

    #[test]
    fn test_idle_never_commits() {
        let mut tracker = CommitTracker::default();
        for _ in 0..10 {
            assert!(!tracker.observe(false, true));
            assert!(!tracker.observe(false, false));
        }
    }

    #[test]
    fn test_only_star_color_is_live() {
        for spec in &CONTROLS {
            let expected = if spec.key == ParamKey::StarColor {
                ChangeMode::OnChange
            } else {
                ChangeMode::OnCommit
            };
            assert_eq!(spec.mode, expected, "{}", spec.label);
        }
    }

    #[test]
    fn test_control_targets_and_folders() {
        for spec in &CONTROLS {
            let expected = match spec.key {
                ParamKey::StarsRotation | ParamKey::Stars | ParamKey::StarColor => FieldId::Stars,
                _ => FieldId::Galaxy,
            };
            assert_eq!(spec.target, expected, "{}", spec.label);
            let folder = if expected == FieldId::Stars { Folder::Stars } else { Folder::Galaxy };
            assert_eq!(spec.folder, folder, "{}", spec.label);
        }
    }

    #[test]
    fn test_ranges() {
        assert_eq!(CONTROLS[index_of(ParamKey::Branches)].range(), Some(ranges::BRANCHES));
        assert_eq!(CONTROLS[index_of(ParamKey::InsideColor)].range(), None);
    }

    #[test]
    fn test_value_mut_writes_through() {
        let mut params = GalaxyParams::default();
        if let ParamValue::Float(spin, _) = ParamKey::Spin.value_mut(&mut params) {
            *spin = -2.0;
        }
        if let ParamValue::Int(stars, _) = ParamKey::Stars.value_mut(&mut params) {
            *stars = 10;
        }
        assert_eq!(params.spin, -2.0);
        assert_eq!(params.stars, 10);
    }

    #[test]
    fn test_star_color_regenerates_on_change() {
        let mut panel = ParameterPanel::new();
        let mut events = Vec::new();
        panel.observe(index_of(ParamKey::StarColor), true, true, &mut events);
        assert_eq!(events, vec![PanelEvent::Regenerate(FieldId::Stars)]);
    }

    #[test]
    fn test_size_restyles_live_and_regenerates_on_commit() {
        let mut panel = ParameterPanel::new();
        let size = index_of(ParamKey::Size);

        let mut events = Vec::new();
        panel.observe(size, true, true, &mut events);
        assert_eq!(events, vec![PanelEvent::Restyle]);
        assert!(panel.has_pending());

        let mut events = Vec::new();
        panel.observe(size, false, false, &mut events);
        assert_eq!(events, vec![PanelEvent::Regenerate(FieldId::Galaxy)]);
    }

    #[test]
    fn test_simultaneous_commits_regenerate_once() {
        let mut panel = ParameterPanel::new();
        let mut events = Vec::new();
        panel.observe(index_of(ParamKey::Count), true, false, &mut events);
        panel.observe(index_of(ParamKey::Spin), true, false, &mut events);
        assert_eq!(events, vec![PanelEvent::Regenerate(FieldId::Galaxy)]);
    }

    #[test]
    fn test_show_without_input_raises_nothing() {
        let ctx = egui::Context::default();
        let mut panel = ParameterPanel::new();
        let mut params = GalaxyParams::default();
        let mut events = Vec::new();

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            events = panel.show(ctx, &mut params, 60.0);
        });

        assert!(events.is_empty());
        assert_eq!(params, GalaxyParams::default());
    }
}
