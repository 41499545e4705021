use eframe::egui::{self, RichText, Sense, Stroke};
use tracing::{info, warn};
use zabuton_core::{wordlist, SeedPhrase, SeedQuiz, Wallet};

use super::exit_prompt;
use super::success::BackupSuccessPage;
use crate::load::{Load, Pending};
use crate::page::components::{card, content, primary_button, sub_page_header, translate_err};
use crate::page::Page;
use crate::theme::Theme;
use crate::values::{STR_CANCEL, STR_CONFIRM};
use crate::widgets::{EventQueue, InfoModal, ModalAction, PasswordModal};

pub const VERIFY_SEED_PAGE_ID: &str = "verify_seed";

const FAILED_TO_VERIFY: &str = "Failed to verify. Please go through every word and try again.";

enum VerifyEvent {
    Back,
    Select { position: usize, candidate: usize },
    Verify,
    Confirm(String),
    CloseModal,
    Exit,
    StayOnPage,
}

/// backup step 2/2: pick each word from four candidates
pub struct VerifySeedPage {
    wallet: Wallet,
    seed: SeedPhrase,
    quiz: Option<SeedQuiz>,
    password_modal: Option<PasswordModal>,
    exit_modal: Option<InfoModal>,
    verifying: Option<Pending<zabuton_core::Result<()>>>,
    events: EventQueue<VerifyEvent>,
}

impl VerifySeedPage {
    pub fn new(wallet: Wallet, seed: SeedPhrase) -> Self {
        Self {
            wallet,
            seed,
            quiz: None,
            password_modal: None,
            exit_modal: None,
            verifying: None,
            events: EventQueue::new(),
        }
    }

    fn all_selected(&self) -> bool {
        self.quiz.as_ref().is_some_and(SeedQuiz::is_complete)
    }
}

fn candidate_button(ui: &mut egui::Ui, theme: &Theme, word: &str, selected: bool) -> bool {
    let c = theme.color;
    let (border, text) = if selected { (c.primary, c.primary) } else { (c.border, c.text_muted) };
    egui::Frame::none()
        .fill(c.surface)
        .stroke(Stroke::new(2.0, border))
        .rounding(8.0)
        .inner_margin(egui::Margin::symmetric(10.0, 8.0))
        .show(ui, |ui| {
            ui.set_min_width(100.0);
            ui.vertical_centered(|ui| ui.label(RichText::new(word).size(15.0).color(text)));
        })
        .response
        .interact(Sense::click())
        .clicked()
}

impl Page for VerifySeedPage {
    fn id(&self) -> &'static str {
        VERIFY_SEED_PAGE_ID
    }

    fn on_navigated_to(&mut self, load: &mut Load) {
        if self.quiz.is_some() {
            return;
        }
        match SeedQuiz::generate(&self.seed.words(), wordlist(), &mut load.rng) {
            Ok(quiz) => self.quiz = Some(quiz),
            Err(e) => {
                warn!("building seed quiz: {}", e);
                load.toast.notify_error(e.to_string());
            }
        }
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        while let Some(event) = self.events.pop() {
            match event {
                VerifyEvent::Back => self.exit_modal = Some(exit_prompt()),
                VerifyEvent::Select { position, candidate } => {
                    if let Some(quiz) = self.quiz.as_mut() {
                        quiz.select(position, candidate);
                    }
                }
                VerifyEvent::Verify => {
                    if self.all_selected() {
                        self.password_modal = Some(
                            PasswordModal::new("Confirm to verify seed")
                                .positive(STR_CONFIRM)
                                .negative(STR_CANCEL),
                        );
                    }
                }
                VerifyEvent::Confirm(password) => {
                    let Some(quiz) = self.quiz.as_ref() else { continue };
                    let id = self.wallet.id;
                    let phrase = quiz.selected_phrase();
                    self.verifying = Some(load.spawn(move |mw| mw.verify_seed_for_wallet(id, &phrase, &password)));
                }
                VerifyEvent::CloseModal => self.password_modal = None,
                VerifyEvent::Exit => {
                    self.exit_modal = None;
                    load.pop_to_root();
                }
                VerifyEvent::StayOnPage => self.exit_modal = None,
            }
        }

        if let Some(result) = self.verifying.as_mut().and_then(Pending::poll) {
            self.verifying = None;
            match result {
                Ok(()) => {
                    info!("wallet {} seed backed up", self.wallet.id);
                    self.password_modal = None;
                    load.change_fragment(BackupSuccessPage::new());
                }
                Err(zabuton_core::Error::Invalid) => {
                    // picks stay as they are so the user can fix them
                    self.password_modal = None;
                    load.toast.notify_error(FAILED_TO_VERIFY);
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
        let complete = self.all_selected();
        content(ui, |ui| {
            ui.horizontal(|ui| {
                if sub_page_header(ui, &theme, "Verify seed word") {
                    self.events.push(VerifyEvent::Back);
                }
                ui.label(RichText::new("Step 2/2").size(12.0).color(c.text_faint));
                ui.label(RichText::new(&self.wallet.name).size(12.0).color(c.text_faint));
            });
            ui.label(RichText::new("Select the correct words to verify.").size(16.0).color(c.text_muted));
            ui.add_space(8.0);

            if let Some(quiz) = &self.quiz {
                for (position, set) in quiz.sets().iter().enumerate() {
                    card(ui, &theme, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(format!("{}", position + 1)).size(14.0).color(c.text_faint));
                            ui.label(RichText::new(set.selected_word().unwrap_or("-")).size(16.0).color(c.text));
                        });
                        ui.add_space(8.0);
                        ui.horizontal(|ui| {
                            for (candidate, word) in set.words().iter().enumerate() {
                                if candidate_button(ui, &theme, word, set.selected() == Some(candidate)) {
                                    self.events.push(VerifyEvent::Select { position, candidate });
                                }
                            }
                        });
                    });
                    ui.add_space(6.0);
                }
            }

            ui.add_space(12.0);
            if primary_button(ui, &theme, "Verify", complete) {
                self.events.push(VerifyEvent::Verify);
            }
        });

        if let Some(modal) = self.password_modal.as_mut() {
            match modal.show(ui.ctx(), &theme) {
                ModalAction::Positive(password) => self.events.push(VerifyEvent::Confirm(password)),
                ModalAction::Negative => self.events.push(VerifyEvent::CloseModal),
                ModalAction::None => {}
            }
        }
        if let Some(modal) = self.exit_modal.as_mut() {
            match modal.show(ui.ctx(), &theme) {
                ModalAction::Positive(()) => self.events.push(VerifyEvent::Exit),
                ModalAction::Negative => self.events.push(VerifyEvent::StayOnPage),
                ModalAction::None => {}
            }
        }
    }
}
