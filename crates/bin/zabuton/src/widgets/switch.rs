use eframe::egui::{self, Sense};

use crate::theme::Theme;

/// on/off toggle; user flips are consumed once through `changed`
#[derive(Debug, Default)]
pub struct Switch {
    checked: bool,
    changed: bool,
}

impl Switch {
    pub fn new(checked: bool) -> Self {
        Self { checked, changed: false }
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// programmatic update, never reported by `changed`
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub(crate) fn toggle(&mut self) {
        self.checked = !self.checked;
        self.changed = true;
    }

    pub fn layout(&mut self, ui: &mut egui::Ui, theme: &Theme) -> egui::Response {
        let c = theme.color;
        let size = egui::vec2(36.0, 20.0);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());
        if response.clicked() {
            self.toggle();
        }

        if ui.is_rect_visible(rect) {
            let t = ui.ctx().animate_bool(response.id, self.checked);
            let radius = rect.height() / 2.0;
            let track = if self.checked { c.primary } else { c.border };
            ui.painter().rect_filled(rect, radius, track);
            let x = egui::lerp((rect.left() + radius)..=(rect.right() - radius), t);
            ui.painter()
                .circle_filled(egui::pos2(x, rect.center().y), radius - 3.0, c.surface);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_is_consumed_once() {
        let mut s = Switch::new(false);
        s.toggle();
        assert!(s.is_checked());
        assert!(s.changed());
        assert!(!s.changed());
    }

    #[test]
    fn test_set_checked_is_silent() {
        let mut s = Switch::default();
        s.set_checked(true);
        assert!(s.is_checked());
        assert!(!s.changed());
    }
}
