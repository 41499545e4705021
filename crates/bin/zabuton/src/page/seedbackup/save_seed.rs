use eframe::egui::{self, RichText};
use zabuton_core::{SeedPhrase, Wallet};

use super::exit_prompt;
use super::verify_seed::VerifySeedPage;
use crate::load::{Load, Pending};
use crate::page::components::{card, content, primary_button, sub_page_header, translate_err};
use crate::page::Page;
use crate::widgets::{EventQueue, InfoModal, ModalAction, PasswordModal};

pub const SAVE_SEED_PAGE_ID: &str = "save_seed";

const COLUMNS: usize = 3;

enum SaveSeedEvent {
    Back,
    Reveal(String),
    CancelReveal,
    Exit,
    StayOnPage,
    Continue,
}

/// backup step 1/2: unlock and show the seed words
pub struct SaveSeedPage {
    wallet: Wallet,
    seed: Option<SeedPhrase>,
    written_down: bool,
    password_modal: Option<PasswordModal>,
    exit_modal: Option<InfoModal>,
    loading: Option<Pending<zabuton_core::Result<SeedPhrase>>>,
    events: EventQueue<SaveSeedEvent>,
}

impl SaveSeedPage {
    pub fn new(wallet: Wallet) -> Self {
        Self {
            wallet,
            seed: None,
            written_down: false,
            password_modal: None,
            exit_modal: None,
            loading: None,
            events: EventQueue::new(),
        }
    }

    fn can_continue(&self) -> bool {
        self.seed.is_some() && self.written_down
    }
}

impl Page for SaveSeedPage {
    fn id(&self) -> &'static str {
        SAVE_SEED_PAGE_ID
    }

    fn on_navigated_to(&mut self, _load: &mut Load) {
        if self.seed.is_none() {
            self.password_modal = Some(PasswordModal::new("Confirm to show seed").negative("Back"));
        }
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        while let Some(event) = self.events.pop() {
            match event {
                SaveSeedEvent::Back => self.exit_modal = Some(exit_prompt()),
                SaveSeedEvent::Reveal(password) => {
                    let id = self.wallet.id;
                    self.loading = Some(load.spawn(move |mw| mw.wallet_seed(id, &password)));
                }
                SaveSeedEvent::CancelReveal => {
                    self.password_modal = None;
                    load.pop_fragment();
                }
                SaveSeedEvent::Exit => {
                    self.exit_modal = None;
                    load.pop_to_root();
                }
                SaveSeedEvent::StayOnPage => self.exit_modal = None,
                SaveSeedEvent::Continue => {
                    if let Some(seed) = self.seed.take() {
                        load.change_fragment(VerifySeedPage::new(self.wallet.clone(), seed));
                    }
                }
            }
        }

        if let Some(result) = self.loading.as_mut().and_then(Pending::poll) {
            self.loading = None;
            match result {
                Ok(seed) => {
                    self.password_modal = None;
                    self.seed = Some(seed);
                }
                Err(e) => {
                    if let Some(m) = self.password_modal.as_mut() {
                        m.state.set_error(translate_err(&e));
                    }
                }
            }
        }
    }

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        let theme = load.theme;
        let c = theme.color;
        content(ui, |ui| {
            ui.horizontal(|ui| {
                if sub_page_header(ui, &theme, "Write down seed phrase") {
                    self.events.push(SaveSeedEvent::Back);
                }
                ui.label(RichText::new("Step 1/2").size(12.0).color(c.text_faint));
                ui.label(RichText::new(&self.wallet.name).size(12.0).color(c.text_faint));
            });
            ui.label(
                RichText::new("Write down all 24 words in the correct order.")
                    .size(14.0)
                    .color(c.text_muted),
            );
            ui.add_space(8.0);

            if let Some(seed) = &self.seed {
                card(ui, &theme, |ui| {
                    egui::Grid::new("seed_words")
                        .num_columns(COLUMNS)
                        .spacing([24.0, 10.0])
                        .show(ui, |ui| {
                            for (i, word) in seed.words().into_iter().enumerate() {
                                ui.horizontal(|ui| {
                                    ui.label(RichText::new(format!("{}.", i + 1)).size(12.0).color(c.text_faint));
                                    ui.label(RichText::new(word).size(14.0).color(c.text));
                                });
                                if (i + 1) % COLUMNS == 0 {
                                    ui.end_row();
                                }
                            }
                        });
                });
                ui.add_space(12.0);
                ui.checkbox(&mut self.written_down, "I have written down all 24 words of my seed phrase.");
                ui.add_space(8.0);
            }

            if primary_button(ui, &theme, "I have written down all 24 words", self.can_continue()) {
                self.events.push(SaveSeedEvent::Continue);
            }
        });

        if let Some(modal) = self.password_modal.as_mut() {
            match modal.show(ui.ctx(), &theme) {
                ModalAction::Positive(password) => self.events.push(SaveSeedEvent::Reveal(password)),
                ModalAction::Negative => self.events.push(SaveSeedEvent::CancelReveal),
                ModalAction::None => {}
            }
        }
        if let Some(modal) = self.exit_modal.as_mut() {
            match modal.show(ui.ctx(), &theme) {
                ModalAction::Positive(()) => self.events.push(SaveSeedEvent::Exit),
                ModalAction::Negative => self.events.push(SaveSeedEvent::StayOnPage),
                ModalAction::None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::testing::{load, render, render_until};
    use crate::load::NavRequest;
    use crate::values::STR_INVALID_PASSWORD;

    #[test]
    fn test_reveal_then_continue() {
        let (mut load, _dir, _rt) = load();
        let wallet = load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let mut page = SaveSeedPage::new(wallet);
        page.on_navigated_to(&mut load);
        assert!(page.password_modal.is_some());

        page.events.push(SaveSeedEvent::Reveal("wrong".into()));
        render_until(&mut page, &mut load, |p, _| p.loading.is_none());
        let err = page.password_modal.as_ref().and_then(|m| m.state.error().map(str::to_string));
        assert_eq!(err.as_deref(), Some(STR_INVALID_PASSWORD));

        page.events.push(SaveSeedEvent::Reveal("secret1".into()));
        render_until(&mut page, &mut load, |p, _| p.seed.is_some());
        assert_eq!(page.seed.as_ref().unwrap().words().len(), 24);
        assert!(!page.can_continue());

        page.written_down = true;
        page.events.push(SaveSeedEvent::Continue);
        render(&mut page, &mut load);
        let nav = load.take_nav_requests();
        assert!(matches!(nav.as_slice(), [NavRequest::ChangeFragment(p)] if p.id() == "verify_seed"));
    }

    #[test]
    fn test_back_prompts_before_leaving() {
        let (mut load, _dir, _rt) = load();
        let wallet = load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let mut page = SaveSeedPage::new(wallet);
        page.events.push(SaveSeedEvent::Back);
        render(&mut page, &mut load);
        assert!(page.exit_modal.is_some());
        assert!(load.take_nav_requests().is_empty());

        page.events.push(SaveSeedEvent::Exit);
        render(&mut page, &mut load);
        assert!(matches!(load.take_nav_requests().as_slice(), [NavRequest::PopToRoot]));
    }
}
