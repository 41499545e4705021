use eframe::egui::{self, RichText};
use egui_phosphor::regular as icons;
use tracing::{info, warn};
use zabuton_core::{NetType, Wallet};

use super::components::{primary_button, translate_err};
use super::main_page::MainPage;
use super::wallets::restore::RestorePage;
use super::Page;
use crate::load::{Load, Pending};
use crate::values::{APP_NAME, DEFAULT_WALLET_NAME};
use crate::widgets::{CreatePasswordModal, EventQueue, ModalAction, PasswordModal};

pub const START_PAGE_ID: &str = "start_page";

enum StartEvent {
    Create,
    Restore,
    CreateWallet(String),
    CloseCreate,
    Unlock(String),
    Exit,
}

/// first screen: create, restore or unlock
pub struct StartPage {
    loading: bool,
    create_modal: Option<CreatePasswordModal>,
    unlock_modal: Option<PasswordModal>,
    creating: Option<Pending<zabuton_core::Result<Wallet>>>,
    opening: Option<Pending<zabuton_core::Result<()>>>,
    events: EventQueue<StartEvent>,
}

impl StartPage {
    pub fn new() -> Self {
        Self {
            loading: true,
            create_modal: None,
            unlock_modal: None,
            creating: None,
            opening: None,
            events: EventQueue::new(),
        }
    }

    fn unlock_modal() -> PasswordModal {
        PasswordModal::new("Unlock with password")
            .hint("Startup password")
            .negative("Exit")
            .positive("Unlock")
            .cancelable(false)
    }

    fn open_wallets(&mut self, load: &Load, passphrase: Option<String>) {
        self.opening = Some(load.spawn(move |mw| mw.open_wallets(passphrase.as_deref())));
    }

    fn poll_work(&mut self, load: &mut Load) {
        if let Some(result) = self.creating.as_mut().and_then(Pending::poll) {
            self.creating = None;
            match result {
                Ok(wallet) => {
                    info!("created wallet {}", wallet.name);
                    self.create_modal = None;
                    load.change_window_page(MainPage::new());
                }
                Err(e) => {
                    if let Some(m) = self.create_modal.as_mut() {
                        m.state.set_error(e.to_string());
                    }
                }
            }
        }

        if let Some(result) = self.opening.as_mut().and_then(Pending::poll) {
            self.opening = None;
            match result {
                Ok(()) => {
                    self.unlock_modal = None;
                    load.change_window_page(MainPage::new());
                }
                Err(e) => {
                    warn!("error opening wallets: {}", e);
                    match self.unlock_modal.as_mut() {
                        Some(m) => m.state.set_error(translate_err(&e)),
                        None => load.toast.notify_error(translate_err(&e)),
                    }
                }
            }
        }
    }
}

impl Default for StartPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for StartPage {
    fn id(&self) -> &'static str {
        START_PAGE_ID
    }

    fn on_navigated_to(&mut self, load: &mut Load) {
        load.refresh_theme();
        if load.mw.loaded_wallets_count() > 0 {
            if load.mw.is_startup_security_set() {
                self.unlock_modal = Some(Self::unlock_modal());
            } else {
                self.open_wallets(load, None);
            }
        } else {
            self.loading = false;
        }
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        while let Some(event) = self.events.pop() {
            match event {
                StartEvent::Create => {
                    self.create_modal = Some(CreatePasswordModal::new("Create new wallet"));
                }
                StartEvent::Restore => load.change_fragment(RestorePage::new()),
                StartEvent::CreateWallet(password) => {
                    self.creating = Some(load.spawn(move |mw| mw.create_new_wallet(DEFAULT_WALLET_NAME, &password)));
                }
                StartEvent::CloseCreate => self.create_modal = None,
                StartEvent::Unlock(password) => self.open_wallets(load, Some(password)),
                StartEvent::Exit => load.exit(),
            }
        }
        self.poll_work(load);
    }

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        let c = load.theme.color;
        let net = match load.mw.net_type() {
            NetType::Mainnet => "",
            NetType::Testnet3 => "Testnet",
        };

        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.2);
            ui.label(RichText::new(icons::CUBE).size(96.0).color(c.primary));
            ui.label(RichText::new(APP_NAME).size(28.0).color(c.text));
            if !net.is_empty() {
                ui.label(RichText::new(net).size(20.0).color(c.text_muted));
            }
            ui.add_space(24.0);

            if self.loading {
                let status = if load.mw.loaded_wallets_count() > 0 { "Opening wallets" } else { "Loading" };
                ui.label(RichText::new(status).size(20.0).color(c.text_muted));
                ui.add(egui::Spinner::new());
            } else {
                ui.label(
                    RichText::new("Welcome to zabuton, a secure and open-source desktop wallet.")
                        .size(18.0)
                        .color(c.text_muted),
                );
                ui.add_space(48.0);
                if primary_button(ui, &load.theme, "Create a new wallet", true) {
                    self.events.push(StartEvent::Create);
                }
                ui.add_space(12.0);
                if primary_button(ui, &load.theme, "Restore an existing wallet", true) {
                    self.events.push(StartEvent::Restore);
                }
            }
        });

        if let Some(modal) = self.create_modal.as_mut() {
            match modal.show(ui.ctx(), &load.theme) {
                ModalAction::Positive(p) => self.events.push(StartEvent::CreateWallet(p.password)),
                ModalAction::Negative => self.events.push(StartEvent::CloseCreate),
                ModalAction::None => {}
            }
        }
        if let Some(modal) = self.unlock_modal.as_mut() {
            match modal.show(ui.ctx(), &load.theme) {
                ModalAction::Positive(password) => self.events.push(StartEvent::Unlock(password)),
                ModalAction::Negative => self.events.push(StartEvent::Exit),
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

    #[test]
    fn test_no_wallets_shows_buttons() {
        let (mut load, _dir, _rt) = load();
        let mut page = StartPage::new();
        page.on_navigated_to(&mut load);
        assert!(!page.loading);
        assert!(page.unlock_modal.is_none());
        render(&mut page, &mut load);
    }

    #[test]
    fn test_create_wallet_moves_to_main() {
        let (mut load, _dir, _rt) = load();
        let mut page = StartPage::new();
        page.on_navigated_to(&mut load);
        page.events.push(StartEvent::Create);
        render(&mut page, &mut load);
        assert!(page.create_modal.is_some());

        page.events.push(StartEvent::CreateWallet("secret1".into()));
        render_until(&mut page, &mut load, |p, _| p.creating.is_none());
        let nav = load.take_nav_requests();
        assert!(matches!(nav.as_slice(), [NavRequest::ChangeWindowPage(p)] if p.id() == "main_page"));
        assert_eq!(load.mw.sorted_wallet_list()[0].name, DEFAULT_WALLET_NAME);
    }

    #[test]
    fn test_unlock_with_startup_password() {
        let (mut load, _dir, _rt) = load();
        load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        load.mw.set_startup_passphrase("startup").unwrap();

        let mut page = StartPage::new();
        page.on_navigated_to(&mut load);
        assert!(page.unlock_modal.is_some());

        page.events.push(StartEvent::Unlock("wrong".into()));
        render_until(&mut page, &mut load, |p, _| p.opening.is_none());
        let err = page.unlock_modal.as_ref().and_then(|m| m.state.error().map(str::to_string));
        assert_eq!(err.as_deref(), Some("Invalid password"));

        page.events.push(StartEvent::Unlock("startup".into()));
        render_until(&mut page, &mut load, |p, _| p.opening.is_none());
        assert!(page.unlock_modal.is_none());
        assert!(load.mw.wallets_open());
    }

    #[test]
    fn test_exit_from_unlock() {
        let (mut load, _dir, _rt) = load();
        load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        load.mw.set_startup_passphrase("startup").unwrap();
        let mut page = StartPage::new();
        page.on_navigated_to(&mut load);
        page.events.push(StartEvent::Exit);
        render(&mut page, &mut load);
        assert!(matches!(load.take_nav_requests().as_slice(), [NavRequest::Exit]));
    }
}
