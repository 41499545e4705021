use eframe::egui::{self, RichText};
use std::time::{Duration, Instant};

use crate::theme::Theme;
use crate::values::TOAST_SECONDS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastMessage {
    pub text: String,
    pub is_error: bool,
    shown_at: Instant,
}

/// short lived message at the bottom of the window
#[derive(Debug, Default)]
pub struct Toast {
    current: Option<ToastMessage>,
}

impl Toast {
    pub fn notify(&mut self, text: impl Into<String>) {
        self.show(text.into(), false);
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.show(text.into(), true);
    }

    fn show(&mut self, text: String, is_error: bool) {
        self.current = Some(ToastMessage {
            text,
            is_error,
            shown_at: Instant::now(),
        });
    }

    pub fn current(&self) -> Option<&ToastMessage> {
        self.current.as_ref()
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        match &self.current {
            Some(msg) => now.saturating_duration_since(msg.shown_at) < lifetime(),
            None => false,
        }
    }

    pub fn layout(&mut self, ctx: &egui::Context, theme: &Theme) {
        if !self.is_visible_at(Instant::now()) {
            self.current = None;
            return;
        }
        let Some(msg) = &self.current else { return };
        let c = theme.color;
        let fill = if msg.is_error { c.danger } else { c.success };

        egui::Area::new(egui::Id::new("toast"))
            .order(egui::Order::Tooltip)
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -32.0])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(fill)
                    .rounding(8.0)
                    .inner_margin(egui::Margin::symmetric(16.0, 8.0))
                    .show(ui, |ui| {
                        ui.label(RichText::new(&msg.text).size(13.0).color(egui::Color32::WHITE));
                    });
            });

        let left = lifetime().saturating_sub(msg.shown_at.elapsed());
        ctx.request_repaint_after(left);
    }
}

fn lifetime() -> Duration {
    Duration::from_secs_f32(TOAST_SECONDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires() {
        let mut toast = Toast::default();
        assert!(!toast.is_visible_at(Instant::now()));
        toast.notify_error("Invalid password");
        let now = Instant::now();
        assert!(toast.is_visible_at(now));
        assert!(toast.current().map_or(false, |m| m.is_error));
        assert!(!toast.is_visible_at(now + lifetime() + Duration::from_millis(10)));
    }
}
