use base64::Engine;
use eframe::egui::{self, RichText};
use egui_phosphor::regular as icons;
use tracing::info;
use zabuton_core::Wallet;

use crate::load::{Load, Pending};
use crate::page::components::{card, content, primary_button, sub_page_header, text_button};
use crate::page::Page;
use crate::widgets::{Editor, EditorEvent, EventQueue, InfoModal, ModalAction, PasswordModal};

pub const SIGN_MESSAGE_PAGE_ID: &str = "sign_message";

const INFO_TEXT: &str = "Signing a message with an address' private key allows you to prove \
that you are the owner of a given address to a possible counterparty.";

enum SignEvent {
    Back,
    Info,
    CloseInfo,
    Clear,
    Sign,
    Confirm(String),
    CloseModal,
    CopySignature,
}

pub struct SignMessagePage {
    wallet: Wallet,
    address: Editor,
    message: Editor,
    address_valid: bool,
    message_valid: bool,
    signature: Option<String>,
    password_modal: Option<PasswordModal>,
    info_modal: Option<InfoModal>,
    signing: Option<Pending<zabuton_core::Result<Vec<u8>>>>,
    events: EventQueue<SignEvent>,
}

impl SignMessagePage {
    pub fn new(wallet: Wallet) -> Self {
        Self {
            wallet,
            address: Editor::new("sign_address", "Address"),
            message: Editor::new("sign_message", "Message"),
            address_valid: false,
            message_valid: false,
            signature: None,
            password_modal: None,
            info_modal: None,
            signing: None,
            events: EventQueue::new(),
        }
    }

    fn is_signing(&self) -> bool {
        self.signing.is_some()
    }

    fn can_clear(&self) -> bool {
        !self.address.text().trim().is_empty() || !self.message.text().trim().is_empty()
    }

    fn can_sign(&self) -> bool {
        !self.is_signing() && self.address_valid && self.message_valid
    }

    fn validate_address(&mut self, load: &Load) -> bool {
        let address = self.address.text().trim().to_string();
        self.address.clear_error();
        let error = if address.is_empty() {
            Some("Please enter a valid address")
        } else if !load.mw.is_address_valid(&address) {
            Some("Invalid address")
        } else if !load.mw.have_address(self.wallet.id, &address).unwrap_or(false) {
            Some("Address not owned by any wallet")
        } else {
            None
        };
        if let Some(e) = error {
            self.address.set_error(e);
        }
        self.address_valid = error.is_none();
        self.address_valid
    }

    fn validate_message(&mut self) -> bool {
        self.message.clear_error();
        self.message_valid = !self.message.text().trim().is_empty();
        if !self.message_valid {
            self.message.set_error("Please enter a valid message to sign");
        }
        self.message_valid
    }

    fn clear_form(&mut self) {
        self.address.set_text("");
        self.message.set_text("");
        self.address.clear_error();
        self.message.clear_error();
        self.address_valid = false;
        self.message_valid = false;
        self.signature = None;
    }

    fn editor_events(&mut self, load: &Load) -> bool {
        let mut submit = false;
        for ev in self.address.events().collect::<Vec<_>>() {
            match ev {
                EditorEvent::Changed => {
                    self.validate_address(load);
                }
                EditorEvent::Submit => submit = true,
                EditorEvent::IconClicked => {}
            }
        }
        for ev in self.message.events().collect::<Vec<_>>() {
            match ev {
                EditorEvent::Changed => {
                    self.validate_message();
                }
                EditorEvent::Submit => submit = true,
                EditorEvent::IconClicked => {}
            }
        }
        submit
    }
}

impl Page for SignMessagePage {
    fn id(&self) -> &'static str {
        SIGN_MESSAGE_PAGE_ID
    }

    fn on_navigated_to(&mut self, _load: &mut Load) {
        self.address.focus();
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        if self.editor_events(load) {
            self.events.push(SignEvent::Sign);
        }

        while let Some(event) = self.events.pop() {
            match event {
                SignEvent::Back => load.pop_fragment(),
                SignEvent::Info => self.info_modal = Some(InfoModal::new("Sign message", INFO_TEXT)),
                SignEvent::CloseInfo => self.info_modal = None,
                SignEvent::Clear => self.clear_form(),
                SignEvent::Sign => {
                    if self.can_sign() && self.validate_address(load) && self.validate_message() {
                        self.password_modal = Some(PasswordModal::new("Confirm to sign"));
                    }
                }
                SignEvent::Confirm(password) => {
                    let id = self.wallet.id;
                    let address = self.address.text().trim().to_string();
                    let message = self.message.text().to_string();
                    self.signing = Some(load.spawn(move |mw| mw.sign_message(id, &password, &address, &message)));
                }
                SignEvent::CloseModal => self.password_modal = None,
                SignEvent::CopySignature => load.toast.notify("Signature copied"),
            }
        }

        if let Some(result) = self.signing.as_mut().and_then(Pending::poll) {
            self.signing = None;
            match result {
                Ok(sig) => {
                    info!("message signed with wallet {}", self.wallet.id);
                    self.password_modal = None;
                    self.signature = Some(base64::engine::general_purpose::STANDARD.encode(sig));
                }
                Err(e) => {
                    if let Some(m) = self.password_modal.as_mut() {
                        m.state.set_error(e.to_string());
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
                if sub_page_header(ui, &theme, "Sign message") {
                    self.events.push(SignEvent::Back);
                }
                ui.label(RichText::new(&self.wallet.name).size(12.0).color(c.text_faint));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if text_button(ui, &theme, icons::INFO) {
                        self.events.push(SignEvent::Info);
                    }
                });
            });

            card(ui, &theme, |ui| {
                ui.label(RichText::new("Enter an address and message to sign:").size(12.0).color(c.text_muted));
                ui.add_space(8.0);
                self.address.layout(ui, &theme);
                ui.add_space(8.0);
                self.message.layout(ui, &theme);
                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    let clear = egui::Button::new(RichText::new("Clear all").size(14.0).color(c.primary))
                        .stroke(egui::Stroke::new(1.0, c.primary))
                        .min_size(egui::vec2(120.0, 36.0));
                    if ui.add_enabled(self.can_clear(), clear).clicked() {
                        self.events.push(SignEvent::Clear);
                    }
                    if primary_button(ui, &theme, "Sign message", self.can_sign()) {
                        self.events.push(SignEvent::Sign);
                    }
                });

                if let Some(sig) = &self.signature {
                    ui.add_space(16.0);
                    ui.label(RichText::new("Signature").size(12.0).color(c.text_muted));
                    egui::Frame::none()
                        .fill(c.surface_alt)
                        .rounding(10.0)
                        .inner_margin(egui::Margin::same(12.0))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.add(egui::Label::new(RichText::new(sig).size(12.0).color(c.text_muted).monospace()).wrap());
                                let copy = egui::Button::new(RichText::new(icons::COPY).size(18.0).color(c.primary)).frame(false);
                                if ui.add(copy).clicked() {
                                    ui.output_mut(|o| o.copied_text = sig.clone());
                                    self.events.push(SignEvent::CopySignature);
                                }
                            });
                        });
                }
            });
        });

        if let Some(modal) = self.password_modal.as_mut() {
            match modal.show(ui.ctx(), &theme) {
                ModalAction::Positive(password) => self.events.push(SignEvent::Confirm(password)),
                ModalAction::Negative => self.events.push(SignEvent::CloseModal),
                ModalAction::None => {}
            }
        }
        if let Some(modal) = self.info_modal.as_mut() {
            if !modal.show(ui.ctx(), &theme).is_none() {
                self.events.push(SignEvent::CloseInfo);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::testing::{load, render, render_until};

    fn page(load: &Load) -> SignMessagePage {
        let wallet = load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        SignMessagePage::new(wallet)
    }

    #[test]
    fn test_address_validation() {
        let (load, _dir, _rt) = load();
        let mut pg = page(&load);

        assert!(!pg.validate_address(&load));
        assert_eq!(pg.address.error(), Some("Please enter a valid address"));

        pg.address.set_text("not an address");
        assert!(!pg.validate_address(&load));
        assert_eq!(pg.address.error(), Some("Invalid address"));

        let other = load.mw.create_new_wallet("other", "secret1").unwrap();
        pg.address.set_text(other.receive_address().unwrap());
        assert!(!pg.validate_address(&load));
        assert_eq!(pg.address.error(), Some("Address not owned by any wallet"));

        let own = pg.wallet.receive_address().unwrap().to_string();
        pg.address.set_text(own);
        assert!(pg.validate_address(&load));
        assert_eq!(pg.address.error(), None);
    }

    #[test]
    fn test_buttons_enable() {
        let (load, _dir, _rt) = load();
        let mut pg = page(&load);
        assert!(!pg.can_clear());
        assert!(!pg.can_sign());

        pg.message.set_text("hello");
        assert!(pg.can_clear());
        assert!(pg.validate_message());
        assert!(!pg.can_sign());

        let own = pg.wallet.receive_address().unwrap().to_string();
        pg.address.set_text(own);
        pg.validate_address(&load);
        assert!(pg.can_sign());

        pg.clear_form();
        assert!(!pg.can_clear());
        assert!(!pg.can_sign());
    }

    #[test]
    fn test_sign_produces_verifiable_signature() {
        let (mut load, _dir, _rt) = load();
        let mut pg = page(&load);
        let own = pg.wallet.receive_address().unwrap().to_string();
        pg.address.set_text(own.clone());
        pg.message.set_text("i own this");
        pg.validate_address(&load);
        pg.validate_message();

        pg.events.push(SignEvent::Sign);
        render(&mut pg, &mut load);
        assert!(pg.password_modal.is_some());

        pg.events.push(SignEvent::Confirm("secret1".into()));
        render_until(&mut pg, &mut load, |p, _| p.signature.is_some());
        assert!(pg.password_modal.is_none());

        let sig = base64::engine::general_purpose::STANDARD
            .decode(pg.signature.as_deref().unwrap())
            .unwrap();
        assert!(load.mw.verify_message(&own, "i own this", &sig).unwrap());
    }

    #[test]
    fn test_wrong_password_stays_in_modal() {
        let (mut load, _dir, _rt) = load();
        let mut pg = page(&load);
        pg.address.set_text(pg.wallet.receive_address().unwrap().to_string());
        pg.message.set_text("m");
        pg.validate_address(&load);
        pg.validate_message();
        pg.events.push(SignEvent::Sign);
        render(&mut pg, &mut load);
        pg.events.push(SignEvent::Confirm("wrong".into()));
        render_until(&mut pg, &mut load, |p, _| !p.is_signing());
        let err = pg.password_modal.as_ref().and_then(|m| m.state.error().map(str::to_string));
        assert_eq!(err.as_deref(), Some("invalid passphrase"));
        assert!(pg.signature.is_none());
    }
}
