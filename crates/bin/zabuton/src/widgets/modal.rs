//! modal dialogs. each `show` draws one frame and reports what the user did;
//! the owning page keeps the modal alive, flips it to loading while the
//! wallet works and feeds errors back in.

use eframe::egui::{self, Color32, RichText};
use egui_phosphor::regular as icons;

use super::editor::{Editor, EditorEvent};
use crate::theme::Theme;
use crate::values::{MIN_PASSWORD_LEN, STR_CANCEL, STR_CONFIRM, STR_GOT_IT, STR_SAVE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction<T> {
    None,
    Positive(T),
    Negative,
}

impl<T> ModalAction<T> {
    pub fn is_none(&self) -> bool {
        matches!(self, ModalAction::None)
    }
}

/// loading and error state shared by every modal
#[derive(Debug, Default, Clone)]
pub struct ModalState {
    loading: bool,
    error: Option<String>,
}

impl ModalState {
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        if loading {
            self.error = None;
        }
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.loading = false;
        self.error = Some(error.into());
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn layout_error(&self, ui: &mut egui::Ui, theme: &Theme) {
        if let Some(e) = &self.error {
            ui.label(RichText::new(e).size(12.0).color(theme.color.danger));
        }
    }
}

pub(crate) fn modal_window<R>(
    ctx: &egui::Context,
    id: &str,
    title: &str,
    theme: &Theme,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> Option<R> {
    let c = theme.color;
    // dim everything behind the dialog
    let screen = ctx.screen_rect();
    egui::Area::new(egui::Id::new(("modal_backdrop", id)))
        .order(egui::Order::Middle)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            let (rect, _) = ui.allocate_exact_size(screen.size(), egui::Sense::click());
            ui.painter().rect_filled(rect, 0.0, Color32::from_black_alpha(120));
        });

    egui::Window::new(title)
        .id(egui::Id::new(("modal", id)))
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(
            egui::Frame::window(&ctx.style())
                .fill(c.surface)
                .rounding(12.0)
                .inner_margin(egui::Margin::same(24.0)),
        )
        .show(ctx, |ui| {
            ui.set_width(360.0);
            ui.label(RichText::new(title).size(18.0).color(c.text));
            ui.add_space(12.0);
            add_contents(ui)
        })
        .and_then(|r| r.inner)
}

/// right aligned negative/positive buttons, spinner while loading
pub(crate) fn footer(
    ui: &mut egui::Ui,
    theme: &Theme,
    negative: Option<&str>,
    positive: &str,
    positive_enabled: bool,
    loading: bool,
) -> ModalAction<()> {
    let c = theme.color;
    let mut action = ModalAction::None;
    ui.add_space(16.0);
    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        if loading {
            ui.add(egui::Spinner::new());
            return;
        }
        let fill = if positive_enabled { c.primary } else { c.border };
        let pos = egui::Button::new(RichText::new(positive).size(13.0).color(Color32::WHITE)).fill(fill);
        if ui.add_enabled(positive_enabled, pos).clicked() {
            action = ModalAction::Positive(());
        }
        if let Some(neg) = negative {
            let btn = egui::Button::new(RichText::new(neg).size(13.0).color(c.primary)).frame(false);
            if ui.add(btn).clicked() {
                action = ModalAction::Negative;
            }
        }
    });
    action
}

pub(crate) fn submitted(editor: &mut Editor) -> bool {
    editor.events().fold(false, |acc, ev| acc || ev == EditorEvent::Submit)
}

pub struct PasswordModal {
    pub title: String,
    pub description: Option<String>,
    pub positive_label: String,
    pub negative_label: String,
    pub cancelable: bool,
    password: Editor,
    pub state: ModalState,
}

impl PasswordModal {
    pub fn new(title: impl Into<String>) -> Self {
        let mut password = Editor::password("modal_password", "Spending password");
        password.focus();
        Self {
            title: title.into(),
            description: None,
            positive_label: STR_CONFIRM.to_string(),
            negative_label: STR_CANCEL.to_string(),
            cancelable: true,
            password,
            state: ModalState::default(),
        }
    }

    pub fn hint(mut self, hint: &str) -> Self {
        let mut password = Editor::password("modal_password", hint);
        password.focus();
        self.password = password;
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn positive(mut self, label: impl Into<String>) -> Self {
        self.positive_label = label.into();
        self
    }

    pub fn negative(mut self, label: impl Into<String>) -> Self {
        self.negative_label = label.into();
        self
    }

    /// whether escape dismisses the modal
    pub fn cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    pub fn set_password(&mut self, text: &str) {
        self.password.set_text(text);
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) -> ModalAction<String> {
        let title = self.title.clone();
        let action = modal_window(ctx, "password", &title, theme, |ui| {
            if let Some(d) = &self.description {
                ui.label(RichText::new(d).size(13.0).color(theme.color.text_muted));
                ui.add_space(8.0);
            }
            self.password.layout(ui, theme);
            self.state.layout_error(ui, theme);
            let enabled = !self.password.text().is_empty();
            let clicked = footer(ui, theme, Some(&self.negative_label), &self.positive_label, enabled, self.state.loading);
            let submit = submitted(&mut self.password) && enabled && !self.state.loading;
            match clicked {
                ModalAction::Positive(()) => ModalAction::Positive(()),
                ModalAction::Negative => ModalAction::Negative,
                ModalAction::None if submit => ModalAction::Positive(()),
                ModalAction::None => ModalAction::None,
            }
        });

        let escape = self.cancelable && ctx.input(|i| i.key_pressed(egui::Key::Escape));
        match action {
            Some(ModalAction::Positive(())) => {
                self.state.set_loading(true);
                ModalAction::Positive(self.password.text().to_string())
            }
            Some(ModalAction::Negative) => ModalAction::Negative,
            _ if escape && !self.state.loading => ModalAction::Negative,
            _ => ModalAction::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassword {
    pub name: Option<String>,
    pub password: String,
}

pub struct CreatePasswordModal {
    pub title: String,
    pub positive_label: String,
    name: Option<Editor>,
    password: Editor,
    confirm: Editor,
    pub state: ModalState,
}

impl CreatePasswordModal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            positive_label: STR_CONFIRM.to_string(),
            name: None,
            password: Editor::password("create_password", "Spending password"),
            confirm: Editor::password("create_password_confirm", "Confirm spending password"),
            state: ModalState::default(),
        }
    }

    pub fn with_name(mut self, hint: &str) -> Self {
        self.name = Some(Editor::new("create_password_name", hint).required());
        self
    }

    pub fn password_hint(mut self, hint: &str, confirm_hint: &str) -> Self {
        self.password = Editor::password("create_password", hint);
        self.confirm = Editor::password("create_password_confirm", confirm_hint);
        self
    }

    pub fn positive(mut self, label: impl Into<String>) -> Self {
        self.positive_label = label.into();
        self
    }

    #[cfg(test)]
    fn fill(&mut self, name: Option<&str>, password: &str, confirm: &str) {
        if let (Some(editor), Some(name)) = (self.name.as_mut(), name) {
            editor.set_text(name);
        }
        self.password.set_text(password);
        self.confirm.set_text(confirm);
    }

    /// inline validation; None when the form can be submitted
    pub fn validation_error(&self) -> Option<&'static str> {
        if let Some(name) = &self.name {
            if name.text().trim().is_empty() {
                return Some("wallet name is required");
            }
        }
        let pass = self.password.text();
        if pass.len() < MIN_PASSWORD_LEN {
            return Some("password is too short");
        }
        if !self.confirm.text().is_empty() && self.confirm.text() != pass {
            return Some("passwords do not match");
        }
        if self.confirm.text().is_empty() {
            return Some("confirm your password");
        }
        None
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) -> ModalAction<NewPassword> {
        let title = self.title.clone();
        let action = modal_window(ctx, "create_password", &title, theme, |ui| {
            if let Some(name) = self.name.as_mut() {
                name.layout(ui, theme);
                ui.add_space(6.0);
            }
            self.password.layout(ui, theme);
            ui.add_space(6.0);
            self.confirm.layout(ui, theme);

            let mismatch = !self.confirm.text().is_empty() && self.confirm.text() != self.password.text();
            if mismatch {
                self.confirm.set_error("passwords do not match");
            } else {
                self.confirm.clear_error();
            }
            let short = !self.password.text().is_empty() && self.password.text().len() < MIN_PASSWORD_LEN;
            if short {
                ui.label(
                    RichText::new(format!("at least {} characters", MIN_PASSWORD_LEN))
                        .size(11.0)
                        .color(theme.color.text_faint),
                );
            }
            self.state.layout_error(ui, theme);

            let enabled = self.validation_error().is_none();
            let submit = submitted(&mut self.confirm) && enabled && !self.state.loading;
            match footer(ui, theme, Some(STR_CANCEL), &self.positive_label, enabled, self.state.loading) {
                ModalAction::None if submit => ModalAction::Positive(()),
                other => other,
            }
        });

        match action {
            Some(ModalAction::Positive(())) => {
                self.state.set_loading(true);
                ModalAction::Positive(NewPassword {
                    name: self.name.as_ref().map(|n| n.text().trim().to_string()),
                    password: self.password.text().to_string(),
                })
            }
            Some(ModalAction::Negative) => ModalAction::Negative,
            _ => ModalAction::None,
        }
    }
}

pub struct InfoModal {
    pub title: String,
    pub body: String,
    pub positive_label: String,
    pub negative_label: Option<String>,
    pub icon: Option<&'static str>,
    pub copy_text: Option<String>,
    copied: bool,
    pub state: ModalState,
}

impl InfoModal {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            positive_label: STR_GOT_IT.to_string(),
            negative_label: None,
            icon: None,
            copy_text: None,
            copied: false,
            state: ModalState::default(),
        }
    }

    pub fn positive(mut self, label: impl Into<String>) -> Self {
        self.positive_label = label.into();
        self
    }

    pub fn negative(mut self, label: impl Into<String>) -> Self {
        self.negative_label = Some(label.into());
        self
    }

    pub fn icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn copyable(mut self, text: impl Into<String>) -> Self {
        self.copy_text = Some(text.into());
        self
    }

    /// true once after the copy button was pressed
    pub fn take_copied(&mut self) -> bool {
        std::mem::take(&mut self.copied)
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) -> ModalAction<()> {
        let c = theme.color;
        let title = self.title.clone();
        let action = modal_window(ctx, "info", &title, theme, |ui| {
            if let Some(icon) = self.icon {
                ui.label(RichText::new(icon).size(32.0).color(c.primary));
                ui.add_space(8.0);
            }
            ui.label(RichText::new(&self.body).size(13.0).color(c.text_muted));

            if let Some(text) = &self.copy_text {
                ui.add_space(10.0);
                egui::Frame::none()
                    .fill(c.surface_alt)
                    .rounding(8.0)
                    .inner_margin(egui::Margin::symmetric(10.0, 8.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(text).size(12.0).color(c.text).monospace());
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                let btn = egui::Button::new(RichText::new(icons::COPY).size(16.0).color(c.primary)).frame(false);
                                if ui.add(btn).on_hover_text("copy").clicked() {
                                    ui.output_mut(|o| o.copied_text = text.clone());
                                    self.copied = true;
                                }
                            });
                        });
                    });
            }
            self.state.layout_error(ui, theme);
            footer(ui, theme, self.negative_label.as_deref(), &self.positive_label, true, self.state.loading)
        });
        action.unwrap_or(ModalAction::None)
    }
}

pub struct TextInputModal {
    pub title: String,
    pub positive_label: String,
    input: Editor,
    pub state: ModalState,
}

impl TextInputModal {
    pub fn new(title: impl Into<String>, hint: &str) -> Self {
        let mut input = Editor::new("text_input_modal", hint);
        input.focus();
        Self {
            title: title.into(),
            positive_label: STR_CONFIRM.to_string(),
            input,
            state: ModalState::default(),
        }
    }

    pub fn positive(mut self, label: impl Into<String>) -> Self {
        self.positive_label = label.into();
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.input.set_text(text);
        self
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) -> ModalAction<String> {
        let title = self.title.clone();
        let action = modal_window(ctx, "text_input", &title, theme, |ui| {
            self.input.layout(ui, theme);
            self.state.layout_error(ui, theme);
            let enabled = !self.input.text().trim().is_empty();
            let submit = submitted(&mut self.input) && enabled && !self.state.loading;
            match footer(ui, theme, Some(STR_CANCEL), &self.positive_label, enabled, self.state.loading) {
                ModalAction::None if submit => ModalAction::Positive(()),
                other => other,
            }
        });
        match action {
            Some(ModalAction::Positive(())) => ModalAction::Positive(self.input.text().trim().to_string()),
            Some(ModalAction::Negative) => ModalAction::Negative,
            _ => ModalAction::None,
        }
    }
}

/// radio list over (key, label) pairs
pub struct ListPreferenceModal {
    pub title: String,
    pub positive_label: String,
    options: Vec<(String, String)>,
    selected: String,
    pub state: ModalState,
}

impl ListPreferenceModal {
    pub fn new(title: impl Into<String>, options: &[(&str, &str)], selected: &str) -> Self {
        Self::from_owned(
            title,
            options.iter().map(|(k, l)| (k.to_string(), l.to_string())).collect(),
            selected,
        )
    }

    pub fn from_owned(title: impl Into<String>, options: Vec<(String, String)>, selected: &str) -> Self {
        let selected = if options.iter().any(|(k, _)| k == selected) {
            selected.to_string()
        } else {
            options.first().map(|(k, _)| k.clone()).unwrap_or_default()
        };
        Self {
            title: title.into(),
            positive_label: STR_SAVE.to_string(),
            options,
            selected,
            state: ModalState::default(),
        }
    }

    pub fn positive(mut self, label: impl Into<String>) -> Self {
        self.positive_label = label.into();
        self
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn select(&mut self, key: &str) {
        if self.options.iter().any(|(k, _)| k == key) {
            self.selected = key.to_string();
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) -> ModalAction<String> {
        let c = theme.color;
        let title = self.title.clone();
        let action = modal_window(ctx, "list_preference", &title, theme, |ui| {
            egui::ScrollArea::vertical().max_height(280.0).show(ui, |ui| {
                for (key, label) in &self.options {
                    let checked = *key == self.selected;
                    let text = RichText::new(label).size(13.0).color(if checked { c.primary } else { c.text });
                    if ui.radio(checked, text).clicked() {
                        self.selected = key.clone();
                    }
                }
            });
            self.state.layout_error(ui, theme);
            footer(ui, theme, Some(STR_CANCEL), &self.positive_label, !self.selected.is_empty(), self.state.loading)
        });
        match action {
            Some(ModalAction::Positive(())) => ModalAction::Positive(self.selected.clone()),
            Some(ModalAction::Negative) => ModalAction::Negative,
            _ => ModalAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(f: impl FnMut(&egui::Context)) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), f);
    }

    #[test]
    fn test_create_password_validation() {
        let mut m = CreatePasswordModal::new("Create spending password").with_name("Wallet name");
        m.fill(Some(""), "secret1", "secret1");
        assert_eq!(m.validation_error(), Some("wallet name is required"));
        m.fill(Some("savings"), "abc", "abc");
        assert_eq!(m.validation_error(), Some("password is too short"));
        m.fill(Some("savings"), "secret1", "secret2");
        assert_eq!(m.validation_error(), Some("passwords do not match"));
        m.fill(Some("savings"), "secret1", "secret1");
        assert_eq!(m.validation_error(), None);
    }

    #[test]
    fn test_modal_state() {
        let mut s = ModalState::default();
        s.set_loading(true);
        assert!(s.is_loading());
        s.set_error("invalid passphrase");
        assert!(!s.is_loading());
        assert_eq!(s.error(), Some("invalid passphrase"));
        s.set_loading(true);
        assert_eq!(s.error(), None);
    }

    #[test]
    fn test_list_preference_falls_back_to_first() {
        let mut m = ListPreferenceModal::new("Language", crate::values::LANGUAGES, "xx");
        assert_eq!(m.selected(), "en");
        m.select("fr");
        assert_eq!(m.selected(), "fr");
        m.select("nope");
        assert_eq!(m.selected(), "fr");
    }

    #[test]
    fn test_modals_render_without_action() {
        let theme = Theme::new(true);
        let mut pw = PasswordModal::new("Confirm to verify seed");
        let mut info = InfoModal::new("Voting dashboard", "copy this link").copyable("https://voting.decred.org");
        let mut text = TextInputModal::new("Change user agent", "User agent");
        let mut list = ListPreferenceModal::new("Currency conversion", crate::values::EXCHANGE_CURRENCIES, "none");
        let mut create = CreatePasswordModal::new("Create");
        frame(|ctx| {
            assert!(pw.show(ctx, &theme).is_none());
            assert!(info.show(ctx, &theme).is_none());
            assert!(text.show(ctx, &theme).is_none());
            assert!(list.show(ctx, &theme).is_none());
            assert!(create.show(ctx, &theme).is_none());
        });
        assert!(!info.take_copied());
    }
}
