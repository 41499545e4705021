use eframe::egui::{self, RichText};
use egui_phosphor::regular as icons;

use crate::load::Load;
use crate::page::components::primary_button;
use crate::page::Page;
use crate::widgets::EventQueue;

pub const BACKUP_SUCCESS_PAGE_ID: &str = "backup_success";

enum SuccessEvent {
    BackToWallets,
}

pub struct BackupSuccessPage {
    events: EventQueue<SuccessEvent>,
}

impl BackupSuccessPage {
    pub fn new() -> Self {
        Self { events: EventQueue::new() }
    }
}

impl Default for BackupSuccessPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for BackupSuccessPage {
    fn id(&self) -> &'static str {
        BACKUP_SUCCESS_PAGE_ID
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        while let Some(event) = self.events.pop() {
            match event {
                SuccessEvent::BackToWallets => load.pop_to_root(),
            }
        }
    }

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        let theme = load.theme;
        let c = theme.color;
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.25);
            ui.label(RichText::new(icons::CHECK_CIRCLE).size(64.0).color(c.success));
            ui.add_space(12.0);
            ui.label(RichText::new("Your seed phrase backup is verified").size(20.0).color(c.text));
            ui.label(
                RichText::new("Be sure to store your seed phrase backup in a secure location.")
                    .size(14.0)
                    .color(c.text_muted),
            );
            ui.add_space(32.0);
            if primary_button(ui, &theme, "Back to Wallets", true) {
                self.events.push(SuccessEvent::BackToWallets);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::testing::{load, render};
    use crate::load::NavRequest;

    #[test]
    fn test_returns_to_root() {
        let (mut load, _dir, _rt) = load();
        let mut page = BackupSuccessPage::new();
        page.events.push(SuccessEvent::BackToWallets);
        render(&mut page, &mut load);
        assert!(matches!(load.take_nav_requests().as_slice(), [NavRequest::PopToRoot]));
    }
}
