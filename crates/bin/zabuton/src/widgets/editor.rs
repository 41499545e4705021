//! bordered text input with floating title, error line and optional icon

use eframe::egui::{self, RichText, TextEdit};
use egui_phosphor::regular as icons;

use super::events::EventQueue;
use crate::theme::Theme;

pub const DEFAULT_REQUIRED_ERROR: &str = "Field is required";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    Changed,
    Submit,
    IconClicked,
}

pub struct Editor {
    id: egui::Id,
    text: String,
    hint: String,
    error: Option<String>,
    required: bool,
    required_error_text: String,
    password: bool,
    show_password: bool,
    icon: Option<&'static str>,
    icon_clickable: bool,
    single_line: bool,
    rows: usize,
    focused: bool,
    wants_focus: bool,
    events: EventQueue<EditorEvent>,
}

impl Editor {
    pub fn new(id_source: impl std::hash::Hash, hint: impl Into<String>) -> Self {
        Self {
            id: egui::Id::new(("editor", id_source)),
            text: String::new(),
            hint: hint.into(),
            error: None,
            required: false,
            required_error_text: DEFAULT_REQUIRED_ERROR.to_string(),
            password: false,
            show_password: false,
            icon: None,
            icon_clickable: false,
            single_line: true,
            rows: 1,
            focused: false,
            wants_focus: false,
            events: EventQueue::new(),
        }
    }

    pub fn password(id_source: impl std::hash::Hash, hint: impl Into<String>) -> Self {
        let mut e = Self::new(id_source, hint);
        e.password = true;
        e
    }

    pub fn with_icon(mut self, icon: &'static str, clickable: bool) -> Self {
        self.icon = Some(icon);
        self.icon_clickable = clickable;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn multiline(mut self, rows: usize) -> Self {
        self.single_line = false;
        self.rows = rows.max(2);
        self
    }

    pub fn set_required_error_text(&mut self, text: impl Into<String>) {
        self.required_error_text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// replace the contents without queueing `Changed`
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.error = Some(text.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// true while no explicit error is set
    pub fn is_dirty(&self) -> bool {
        self.error.is_none()
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.wants_focus = true;
    }

    pub fn is_password_visible(&self) -> bool {
        self.show_password
    }

    pub fn toggle_password_visibility(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn pop_event(&mut self) -> Option<EditorEvent> {
        self.events.pop()
    }

    pub fn events(&mut self) -> impl Iterator<Item = EditorEvent> + '_ {
        self.events.drain()
    }

    /// the error line as it would be drawn this frame
    pub fn visible_error(&self) -> Option<&str> {
        if let Some(e) = self.error.as_deref() {
            return Some(e);
        }
        if self.required && !self.focused && self.text.is_empty() {
            return Some(&self.required_error_text);
        }
        None
    }

    fn title_visible(&self) -> bool {
        self.focused || !self.text.is_empty()
    }

    pub fn layout(&mut self, ui: &mut egui::Ui, theme: &Theme) -> egui::Response {
        let c = theme.color;
        let error = self.visible_error().map(str::to_string);
        let line = if error.is_some() {
            c.danger
        } else if self.focused {
            c.primary
        } else {
            c.border
        };

        let inner = ui.vertical(|ui| {
            if self.title_visible() {
                let title_color = if error.is_some() {
                    c.danger
                } else if self.focused {
                    c.primary
                } else {
                    c.text_muted
                };
                ui.label(RichText::new(&self.hint).size(11.0).color(title_color));
            }

            let frame = egui::Frame::none()
                .fill(c.surface_alt)
                .rounding(8.0)
                .stroke(egui::Stroke::new(2.0, line))
                .inner_margin(egui::Margin::symmetric(12.0, 7.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let trailing = if self.password || self.icon.is_some() { 32.0 } else { 0.0 };
                        let width = (ui.available_width() - trailing).max(40.0);
                        let hint = if self.focused { String::new() } else { self.hint.clone() };

                        let edit = if self.single_line {
                            TextEdit::singleline(&mut self.text)
                        } else {
                            TextEdit::multiline(&mut self.text).desired_rows(self.rows)
                        };
                        let edit = edit
                            .id(self.id)
                            .frame(false)
                            .password(self.password && !self.show_password)
                            .desired_width(width)
                            .hint_text(hint);
                        let response = ui.add(edit);

                        if let Some(icon) = self.icon {
                            let label = RichText::new(icon).size(18.0).color(c.text_muted);
                            if self.icon_clickable {
                                if ui.add(egui::Button::new(label).frame(false)).clicked() {
                                    self.events.push(EditorEvent::IconClicked);
                                }
                            } else {
                                ui.label(label);
                            }
                        } else if self.password {
                            let eye = if self.show_password { icons::EYE_SLASH } else { icons::EYE };
                            let toggle = ui.add(
                                egui::Button::new(RichText::new(eye).size(18.0).color(c.text_muted)).frame(false),
                            );
                            if toggle.clicked() {
                                self.toggle_password_visibility();
                            }
                        }
                        response
                    })
                    .inner
                });
            frame.inner
        });

        let response = inner.inner;
        if self.wants_focus {
            response.request_focus();
            self.wants_focus = false;
        }
        if response.changed() {
            self.events.push(EditorEvent::Changed);
        }
        if self.single_line && response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.events.push(EditorEvent::Submit);
        }
        self.focused = response.has_focus();

        if let Some(error) = error {
            ui.label(RichText::new(error).size(11.0).color(c.danger));
        }

        response
    }
}

/// numbered single-word editor for seed restore
pub struct RestoreEditor {
    pub number: usize,
    pub edit: Editor,
}

impl RestoreEditor {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            edit: Editor::new(("restore", number), ""),
        }
    }

    pub fn word(&self) -> String {
        self.edit.text().trim().to_lowercase()
    }

    pub fn layout(&mut self, ui: &mut egui::Ui, theme: &Theme) -> egui::Response {
        let c = theme.color;
        let line = if self.edit.has_focus() { c.primary } else { c.border };
        egui::Frame::none()
            .fill(c.surface_alt)
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, line))
            .inner_margin(egui::Margin::symmetric(6.0, 4.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let title = if self.edit.has_focus() { c.primary } else { c.text_muted };
                    ui.add_sized(
                        [28.0, 20.0],
                        egui::Label::new(RichText::new(self.number.to_string()).size(12.0).color(title)),
                    );
                    ui.separator();
                    let response = ui.add(
                        TextEdit::singleline(&mut self.edit.text)
                            .id(self.edit.id)
                            .frame(false)
                            .desired_width(ui.available_width()),
                    );
                    if response.changed() {
                        self.edit.events.push(EditorEvent::Changed);
                    }
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        self.edit.events.push(EditorEvent::Submit);
                    }
                    self.edit.focused = response.has_focus();
                    response
                })
                .inner
            })
            .inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_error_when_empty_and_unfocused() {
        let mut e = Editor::new("req", "Address").required();
        assert_eq!(e.visible_error(), Some(DEFAULT_REQUIRED_ERROR));
        e.set_text("DsSomething");
        assert_eq!(e.visible_error(), None);
        e.set_text("");
        e.set_required_error_text("address is required");
        assert_eq!(e.visible_error(), Some("address is required"));
    }

    #[test]
    fn test_explicit_error_wins() {
        let mut e = Editor::new("err", "Message").required();
        e.set_text("hello");
        assert!(e.is_dirty());
        e.set_error("Invalid address");
        assert!(!e.is_dirty());
        assert_eq!(e.visible_error(), Some("Invalid address"));
        e.clear_error();
        assert!(e.is_dirty());
        assert_eq!(e.visible_error(), None);
    }

    #[test]
    fn test_set_text_queues_nothing() {
        let mut e = Editor::new("set", "x");
        e.set_text("abc");
        assert_eq!(e.text(), "abc");
        assert!(e.pop_event().is_none());
    }

    #[test]
    fn test_password_toggle() {
        let mut e = Editor::password("pw", "Password");
        assert!(!e.is_password_visible());
        e.toggle_password_visibility();
        assert!(e.is_password_visible());
    }

    #[test]
    fn test_restore_word_normalised() {
        let mut r = RestoreEditor::new(3);
        r.edit.set_text("  Abandon ");
        assert_eq!(r.word(), "abandon");
    }

    #[test]
    fn test_renders_headless() {
        let ctx = egui::Context::default();
        let theme = Theme::new(false);
        let mut e = Editor::password("headless", "Spending password").required();
        let mut r = RestoreEditor::new(1);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                e.layout(ui, &theme);
                r.layout(ui, &theme);
            });
        });
        assert!(!e.has_focus());
        assert!(e.pop_event().is_none());
    }
}
