use cgmath::{Vector3, vec3};

/// How the aim path should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathAppearance {
    Valid,
    Invalid,
}

/// Presentation hooks driven by the aiming mode. Calls only describe state
/// changes; nothing here feeds back into locomotion.
pub trait TeleportFeedback {
    fn set_marker_visible(&mut self, visible: bool);
    fn set_marker_position(&mut self, position: Vector3<f32>);
    fn set_path_visible(&mut self, visible: bool);
    fn set_path_appearance(&mut self, appearance: PathAppearance);
}

#[derive(Clone, Copy, Debug)]
pub struct TeleportVisualStyle {
    pub valid_path_color: Vector3<f32>,
    pub invalid_path_color: Vector3<f32>,
    pub valid_marker_color: Vector3<f32>,
    pub invalid_marker_color: Vector3<f32>,
}

impl Default for TeleportVisualStyle {
    fn default() -> Self {
        // Cyan for valid, orange-red for invalid
        Self {
            valid_path_color: vec3(0.0, 0.8, 1.0),
            invalid_path_color: vec3(1.0, 0.35, 0.1),
            valid_marker_color: vec3(0.1, 0.9, 1.0),
            invalid_marker_color: vec3(1.0, 0.4, 0.15),
        }
    }
}

impl TeleportVisualStyle {
    pub fn path_color(&self, appearance: PathAppearance) -> Vector3<f32> {
        match appearance {
            PathAppearance::Valid => self.valid_path_color,
            PathAppearance::Invalid => self.invalid_path_color,
        }
    }

    pub fn marker_color(&self, appearance: PathAppearance) -> Vector3<f32> {
        match appearance {
            PathAppearance::Valid => self.valid_marker_color,
            PathAppearance::Invalid => self.invalid_marker_color,
        }
    }
}

/// Remembers the last state pushed to it; used by headless runs and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingFeedback {
    pub marker_visible: bool,
    pub marker_position: Option<Vector3<f32>>,
    pub path_visible: bool,
    pub appearance: Option<PathAppearance>,
    pub appearance_changes: usize,
}

impl TeleportFeedback for RecordingFeedback {
    fn set_marker_visible(&mut self, visible: bool) {
        self.marker_visible = visible;
    }

    fn set_marker_position(&mut self, position: Vector3<f32>) {
        self.marker_position = Some(position);
    }

    fn set_path_visible(&mut self, visible: bool) {
        self.path_visible = visible;
    }

    fn set_path_appearance(&mut self, appearance: PathAppearance) {
        self.appearance = Some(appearance);
        self.appearance_changes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_colors_follow_appearance() {
        let style = TeleportVisualStyle::default();
        assert_eq!(style.path_color(PathAppearance::Valid), style.valid_path_color);
        assert_eq!(style.marker_color(PathAppearance::Invalid), style.invalid_marker_color);
    }
}
