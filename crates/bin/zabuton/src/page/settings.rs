use eframe::egui::{self, RichText, Sense};
use egui_phosphor::regular as icons;
use tracing::{info, warn};
use zabuton_core::config;

use super::components::{card, content, section_title, sub_page_header, translate_err};
use super::Page;
use crate::load::{Load, Pending};
use crate::theme::Theme;
use crate::values::*;
use crate::widgets::{
    CreatePasswordModal, EventQueue, InfoModal, ListPreferenceModal, ModalAction, PasswordModal, Switch,
    TextInputModal,
};

pub const SETTINGS_PAGE_ID: &str = "settings";

enum Dialog {
    Language(ListPreferenceModal),
    Currency(ListPreferenceModal),
    DisableGovernance(InfoModal),
    StartupInfo(InfoModal),
    CreateStartupPass(CreatePasswordModal),
    RemoveStartupPass(PasswordModal),
    /// step one of changing: prove the current password
    VerifyStartupPass(PasswordModal),
    ChangeStartupPass { old: String, modal: CreatePasswordModal },
    Peer(TextInputModal),
    UserAgent(TextInputModal),
    ConfirmRemove { key: &'static str, modal: InfoModal },
}

enum Job {
    Create,
    Remove,
    Verify(String),
    Change,
}

enum SettingsEvent {
    Back,
    OpenLanguage,
    OpenCurrency,
    StartupInfo,
    ChangeStartupPass,
    EditPeer,
    EditUserAgent,
    Dialog(ModalAction<String>),
}

pub struct SettingsPage {
    dark_mode: Switch,
    spend_unconfirmed: Switch,
    governance: Switch,
    startup_password: Switch,
    beep_new_blocks: Switch,
    tx_notification: Switch,
    proposal_notification: Switch,
    connect_to_peer: Switch,
    user_agent: Switch,
    peer_addr: String,
    agent_value: String,
    language: String,
    currency: String,
    dialog: Option<Dialog>,
    work: Option<Pending<(Job, zabuton_core::Result<()>)>>,
    sync: Option<Pending<zabuton_core::Result<usize>>>,
    events: EventQueue<SettingsEvent>,
}

impl SettingsPage {
    pub fn new() -> Self {
        Self {
            dark_mode: Switch::default(),
            spend_unconfirmed: Switch::default(),
            governance: Switch::default(),
            startup_password: Switch::default(),
            beep_new_blocks: Switch::default(),
            tx_notification: Switch::default(),
            proposal_notification: Switch::default(),
            connect_to_peer: Switch::default(),
            user_agent: Switch::default(),
            peer_addr: String::new(),
            agent_value: String::new(),
            language: String::new(),
            currency: String::new(),
            dialog: None,
            work: None,
            sync: None,
            events: EventQueue::new(),
        }
    }

    /// re-read every option from the config store
    fn update_setting_options(&mut self, load: &Load) {
        let cfg = load.mw.config();
        self.startup_password.set_checked(load.mw.is_startup_security_set());
        self.dark_mode.set_checked(cfg.read_bool(config::DARK_MODE, false));
        self.spend_unconfirmed.set_checked(cfg.read_bool(config::SPEND_UNCONFIRMED, false));
        self.beep_new_blocks.set_checked(cfg.read_bool(config::BEEP_NEW_BLOCKS, false));
        self.governance.set_checked(cfg.read_bool(config::FETCH_PROPOSALS, false));
        self.proposal_notification.set_checked(cfg.read_bool(config::PROPOSAL_NOTIFICATION, false));
        self.tx_notification.set_checked(cfg.read_bool(config::TRANSACTION_NOTIFICATION, false));

        self.peer_addr = cfg.read_string(config::SPV_PERSISTENT_PEER);
        self.connect_to_peer.set_checked(!self.peer_addr.is_empty());
        self.agent_value = cfg.read_string(config::USER_AGENT);
        self.user_agent.set_checked(!self.agent_value.is_empty());

        self.language = or_default(cfg.read_string(config::LANGUAGE), DEFAULT_LANGUAGE);
        self.currency = or_default(cfg.read_string(config::CURRENCY_CONVERSION), DEFAULT_EXCHANGE_VALUE);
    }

    fn save_bool(load: &mut Load, key: &str, value: bool) {
        if let Err(e) = load.mw.config().save_bool(key, value) {
            warn!("saving {}: {}", key, e);
            load.toast.notify_error(e.to_string());
        }
    }

    fn save_string(load: &mut Load, key: &str, value: &str) {
        if let Err(e) = load.mw.config().save_string(key, value) {
            warn!("saving {}: {}", key, e);
            load.toast.notify_error(e.to_string());
        }
    }

    fn close_dialog(&mut self, load: &Load) {
        self.dialog = None;
        self.update_setting_options(load);
    }

    fn run(&mut self, load: &Load, job: Job, f: impl FnOnce(&zabuton_core::MultiWallet) -> zabuton_core::Result<()> + Send + 'static) {
        self.work = Some(load.spawn(move |mw| (job, f(mw))));
    }

    fn handle_switches(&mut self, load: &mut Load) {
        if self.dark_mode.changed() {
            Self::save_bool(load, config::DARK_MODE, self.dark_mode.is_checked());
            load.refresh_theme();
        }
        if self.spend_unconfirmed.changed() {
            Self::save_bool(load, config::SPEND_UNCONFIRMED, self.spend_unconfirmed.is_checked());
        }
        if self.governance.changed() {
            if self.governance.is_checked() {
                Self::save_bool(load, config::FETCH_PROPOSALS, true);
                self.sync = Some(load.spawn(|mw| mw.proposals().sync()));
                load.toast.notify("Proposals fetching enabled. Check Governance page");
            } else {
                let modal = InfoModal::new(
                    "Governance",
                    "Are you sure you want to disable governance? This will clear all available proposals",
                )
                .negative(STR_CANCEL)
                .positive("Disable");
                self.dialog = Some(Dialog::DisableGovernance(modal));
            }
        }
        if self.beep_new_blocks.changed() {
            Self::save_bool(load, config::BEEP_NEW_BLOCKS, self.beep_new_blocks.is_checked());
        }
        if self.proposal_notification.changed() {
            let on = self.proposal_notification.is_checked();
            Self::save_bool(load, config::PROPOSAL_NOTIFICATION, on);
            load.toast.notify(if on { "Proposal notification enabled" } else { "Proposal notification disabled" });
        }
        if self.tx_notification.changed() {
            let on = self.tx_notification.is_checked();
            Self::save_bool(load, config::TRANSACTION_NOTIFICATION, on);
            load.toast.notify(if on { "Transaction notification enabled" } else { "Transaction notification disabled" });
        }
        if self.startup_password.changed() {
            self.dialog = Some(if self.startup_password.is_checked() {
                Dialog::CreateStartupPass(
                    CreatePasswordModal::new(STR_CREATE_STARTUP_PASSWORD)
                        .password_hint("Startup password", "Confirm startup password"),
                )
            } else {
                Dialog::RemoveStartupPass(PasswordModal::new(STR_CONFIRM_REMOVE_STARTUP_PASS).hint("Startup password"))
            });
        }
        if self.connect_to_peer.changed() {
            if self.connect_to_peer.is_checked() {
                self.events.push(SettingsEvent::EditPeer);
            } else {
                self.dialog = Some(confirm_remove(
                    config::SPV_PERSISTENT_PEER,
                    "Remove specific peer",
                    "Are you sure you want to proceed with removing the specific peer?",
                ));
            }
        }
        if self.user_agent.changed() {
            if self.user_agent.is_checked() {
                self.events.push(SettingsEvent::EditUserAgent);
            } else {
                self.dialog = Some(confirm_remove(
                    config::USER_AGENT,
                    "Remove user agent",
                    "Are you sure you want to proceed with removing the user agent?",
                ));
            }
        }
    }

    fn handle_dialog_action(&mut self, load: &mut Load, action: ModalAction<String>) {
        let Some(dialog) = self.dialog.take() else { return };
        match (dialog, action) {
            (dialog, ModalAction::None) => self.dialog = Some(dialog),
            (_, ModalAction::Negative) => self.update_setting_options(load),

            (Dialog::Language(_), ModalAction::Positive(key)) => {
                Self::save_string(load, config::LANGUAGE, &key);
                self.update_setting_options(load);
            }
            (Dialog::Currency(_), ModalAction::Positive(key)) => {
                Self::save_string(load, config::CURRENCY_CONVERSION, &key);
                self.update_setting_options(load);
            }
            (Dialog::DisableGovernance(_), ModalAction::Positive(_)) => {
                if load.mw.proposals().is_syncing() {
                    load.mw.proposals().stop_sync();
                }
                Self::save_bool(load, config::FETCH_PROPOSALS, false);
                if let Err(e) = load.mw.proposals().clear_saved_proposals() {
                    warn!("clearing proposals: {}", e);
                }
                load.toast.notify("Proposals fetching Disabled.");
                self.update_setting_options(load);
            }
            (Dialog::StartupInfo(_), ModalAction::Positive(_)) => {}
            (Dialog::CreateStartupPass(modal), ModalAction::Positive(password)) => {
                self.dialog = Some(Dialog::CreateStartupPass(modal));
                self.run(load, Job::Create, move |mw| mw.set_startup_passphrase(&password));
            }
            (Dialog::RemoveStartupPass(modal), ModalAction::Positive(password)) => {
                self.dialog = Some(Dialog::RemoveStartupPass(modal));
                self.run(load, Job::Remove, move |mw| mw.remove_startup_passphrase(&password));
            }
            (Dialog::VerifyStartupPass(modal), ModalAction::Positive(password)) => {
                self.dialog = Some(Dialog::VerifyStartupPass(modal));
                let old = password.clone();
                self.run(load, Job::Verify(old), move |mw| mw.verify_startup_passphrase(&password));
            }
            (Dialog::ChangeStartupPass { old, modal }, ModalAction::Positive(new)) => {
                let current = old.clone();
                self.dialog = Some(Dialog::ChangeStartupPass { old, modal });
                self.run(load, Job::Change, move |mw| mw.change_startup_passphrase(&current, &new));
            }
            (Dialog::Peer(_), ModalAction::Positive(addr)) => {
                if !addr.is_empty() {
                    Self::save_string(load, config::SPV_PERSISTENT_PEER, &addr);
                }
                self.update_setting_options(load);
            }
            (Dialog::UserAgent(_), ModalAction::Positive(agent)) => {
                if !agent.is_empty() {
                    Self::save_string(load, config::USER_AGENT, &agent);
                }
                self.update_setting_options(load);
            }
            (Dialog::ConfirmRemove { key, .. }, ModalAction::Positive(_)) => {
                if let Err(e) = load.mw.config().delete(key) {
                    load.toast.notify_error(e.to_string());
                }
                self.update_setting_options(load);
            }
        }
    }

    fn poll_work(&mut self, load: &mut Load) {
        if let Some(result) = self.sync.as_mut().and_then(Pending::poll) {
            self.sync = None;
            match result {
                Ok(n) => info!("synced {} proposals", n),
                Err(e) => load.toast.notify_error(e.to_string()),
            }
        }

        let Some((job, result)) = self.work.as_mut().and_then(Pending::poll) else { return };
        self.work = None;
        if let Err(e) = result {
            let text = translate_err(&e);
            match self.dialog.as_mut() {
                Some(Dialog::CreateStartupPass(m)) | Some(Dialog::ChangeStartupPass { modal: m, .. }) => {
                    m.state.set_error(text)
                }
                Some(Dialog::RemoveStartupPass(m)) | Some(Dialog::VerifyStartupPass(m)) => m.state.set_error(text),
                _ => load.toast.notify_error(text),
            }
            return;
        }
        match job {
            Job::Create => {
                load.toast.notify("Startup password enabled");
                self.close_dialog(load);
            }
            Job::Remove => {
                load.toast.notify("Startup password disabled");
                self.close_dialog(load);
            }
            Job::Verify(old) => {
                let modal = CreatePasswordModal::new(STR_CREATE_STARTUP_PASSWORD)
                    .password_hint("New startup password", "Confirm new startup password");
                self.dialog = Some(Dialog::ChangeStartupPass { old, modal });
            }
            Job::Change => {
                load.toast.notify("Startup password changed");
                self.close_dialog(load);
            }
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context, theme: &Theme) -> ModalAction<String> {
        let Some(dialog) = self.dialog.as_mut() else {
            return ModalAction::None;
        };
        match dialog {
            Dialog::Language(m) | Dialog::Currency(m) => m.show(ctx, theme),
            Dialog::DisableGovernance(m) | Dialog::StartupInfo(m) | Dialog::ConfirmRemove { modal: m, .. } => {
                unit_action(m.show(ctx, theme))
            }
            Dialog::CreateStartupPass(m) | Dialog::ChangeStartupPass { modal: m, .. } => match m.show(ctx, theme) {
                ModalAction::Positive(p) => ModalAction::Positive(p.password),
                ModalAction::Negative => ModalAction::Negative,
                ModalAction::None => ModalAction::None,
            },
            Dialog::RemoveStartupPass(m) | Dialog::VerifyStartupPass(m) => m.show(ctx, theme),
            Dialog::Peer(m) | Dialog::UserAgent(m) => m.show(ctx, theme),
        }
    }
}

impl Default for SettingsPage {
    fn default() -> Self {
        Self::new()
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn unit_action(action: ModalAction<()>) -> ModalAction<String> {
    match action {
        ModalAction::Positive(()) => ModalAction::Positive(String::new()),
        ModalAction::Negative => ModalAction::Negative,
        ModalAction::None => ModalAction::None,
    }
}

fn confirm_remove(key: &'static str, title: &str, body: &str) -> Dialog {
    Dialog::ConfirmRemove {
        key,
        modal: InfoModal::new(title, body).negative(STR_CANCEL).positive(STR_REMOVE),
    }
}

fn switch_row(ui: &mut egui::Ui, theme: &Theme, label: &str, switch: &mut Switch) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(label).size(14.0).color(theme.color.text));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            switch.layout(ui, theme);
        });
    });
}

/// label on the left, current value and a chevron on the right
fn value_row(ui: &mut egui::Ui, theme: &Theme, label: &str, value: &str) -> bool {
    let c = theme.color;
    ui.horizontal(|ui| {
        ui.label(RichText::new(label).size(14.0).color(c.text));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new(icons::CARET_RIGHT).size(14.0).color(c.text_faint));
            ui.label(RichText::new(value).size(12.0).color(c.text_muted));
        });
    })
    .response
    .interact(Sense::click())
    .clicked()
}

impl Page for SettingsPage {
    fn id(&self) -> &'static str {
        SETTINGS_PAGE_ID
    }

    fn on_navigated_to(&mut self, load: &mut Load) {
        self.update_setting_options(load);
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        if self.dialog.is_none() {
            self.handle_switches(load);
        }

        while let Some(event) = self.events.pop() {
            match event {
                SettingsEvent::Back => load.pop_fragment(),
                SettingsEvent::OpenLanguage => {
                    let m = ListPreferenceModal::new(STR_LANGUAGE, LANGUAGES, &self.language);
                    self.dialog = Some(Dialog::Language(m));
                }
                SettingsEvent::OpenCurrency => {
                    let m = ListPreferenceModal::new(STR_CURRENCY_CONVERSION, EXCHANGE_CURRENCIES, &self.currency);
                    self.dialog = Some(Dialog::Currency(m));
                }
                SettingsEvent::StartupInfo => {
                    let m = InfoModal::new(
                        "Set up startup password",
                        "Startup password helps protect your wallet from unauthorized access.",
                    )
                    .positive(STR_GOT_IT);
                    self.dialog = Some(Dialog::StartupInfo(m));
                }
                SettingsEvent::ChangeStartupPass => {
                    let m = PasswordModal::new("Confirm current startup password").hint("Current startup password");
                    self.dialog = Some(Dialog::VerifyStartupPass(m));
                }
                SettingsEvent::EditPeer => {
                    let m = TextInputModal::new(STR_CONNECT_TO_SPECIFIC_PEER, "IP address").with_text(&self.peer_addr);
                    self.dialog = Some(Dialog::Peer(m));
                }
                SettingsEvent::EditUserAgent => {
                    let m = TextInputModal::new(STR_CHANGE_USER_AGENT, "User agent").with_text(&self.agent_value);
                    self.dialog = Some(Dialog::UserAgent(m));
                }
                SettingsEvent::Dialog(action) => self.handle_dialog_action(load, action),
            }
        }

        self.poll_work(load);
    }

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        let theme = load.theme;
        let c = theme.color;
        content(ui, |ui| {
            if sub_page_header(ui, &theme, STR_SETTINGS) {
                self.events.push(SettingsEvent::Back);
            }

            section_title(ui, &theme, STR_GENERAL);
            card(ui, &theme, |ui| {
                switch_row(ui, &theme, STR_DARK_MODE, &mut self.dark_mode);
                switch_row(ui, &theme, STR_UNCONFIRMED_FUNDS, &mut self.spend_unconfirmed);
                switch_row(ui, &theme, STR_GOVERNANCE, &mut self.governance);
                let currency = preference_label(EXCHANGE_CURRENCIES, &self.currency).to_string();
                if value_row(ui, &theme, STR_CURRENCY_CONVERSION, &currency) {
                    self.events.push(SettingsEvent::OpenCurrency);
                }
                let language = preference_label(LANGUAGES, &self.language).to_string();
                if value_row(ui, &theme, STR_LANGUAGE, &language) {
                    self.events.push(SettingsEvent::OpenLanguage);
                }
            });
            ui.add_space(12.0);

            section_title(ui, &theme, STR_SECURITY);
            card(ui, &theme, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(STR_STARTUP_PASSWORD).size(14.0).color(c.text));
                    let info = egui::Button::new(RichText::new(icons::INFO).size(14.0).color(c.text_muted)).frame(false);
                    if ui.add(info).clicked() {
                        self.events.push(SettingsEvent::StartupInfo);
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        self.startup_password.layout(ui, &theme);
                    });
                });
                if self.startup_password.is_checked() && value_row(ui, &theme, STR_CHANGE_STARTUP_PASSWORD, "") {
                    self.events.push(SettingsEvent::ChangeStartupPass);
                }
            });
            ui.add_space(12.0);

            section_title(ui, &theme, STR_NOTIFICATIONS);
            card(ui, &theme, |ui| {
                switch_row(ui, &theme, STR_BEEP_FOR_NEW_BLOCKS, &mut self.beep_new_blocks);
                switch_row(ui, &theme, STR_TX_NOTIFICATION, &mut self.tx_notification);
                switch_row(ui, &theme, STR_PROPOSAL_NOTIFICATION, &mut self.proposal_notification);
            });
            ui.add_space(12.0);

            section_title(ui, &theme, STR_CONNECTION);
            card(ui, &theme, |ui| {
                switch_row(ui, &theme, STR_CONNECT_TO_SPECIFIC_PEER, &mut self.connect_to_peer);
                if self.connect_to_peer.is_checked() && value_row(ui, &theme, STR_CHANGE_SPECIFIC_PEER, &self.peer_addr) {
                    self.events.push(SettingsEvent::EditPeer);
                }
                switch_row(ui, &theme, STR_CUSTOM_USER_AGENT, &mut self.user_agent);
                if self.user_agent.is_checked() && value_row(ui, &theme, STR_CHANGE_USER_AGENT, &self.agent_value) {
                    self.events.push(SettingsEvent::EditUserAgent);
                }
            });
        });

        let action = self.show_dialog(ui.ctx(), &theme);
        if !action.is_none() {
            self.events.push(SettingsEvent::Dialog(action));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::testing::{load, render, render_until};

    fn page(load: &mut Load) -> SettingsPage {
        let mut pg = SettingsPage::new();
        pg.on_navigated_to(load);
        pg
    }

    #[test]
    fn test_toggles_persist() {
        let (mut load, _dir, _rt) = load();
        let mut pg = page(&mut load);
        assert!(!pg.dark_mode.is_checked());

        pg.dark_mode.toggle();
        pg.spend_unconfirmed.toggle();
        pg.tx_notification.toggle();
        render(&mut pg, &mut load);

        let cfg = load.mw.config();
        assert!(cfg.read_bool(config::DARK_MODE, false));
        assert!(cfg.read_bool(config::SPEND_UNCONFIRMED, false));
        assert!(cfg.read_bool(config::TRANSACTION_NOTIFICATION, false));
        assert!(load.theme.dark_mode);
    }

    #[test]
    fn test_governance_enable_then_disable() {
        let (mut load, _dir, _rt) = load();
        let mut pg = page(&mut load);

        pg.governance.toggle();
        render_until(&mut pg, &mut load, |p, _| p.sync.is_none());
        assert!(load.mw.config().read_bool(config::FETCH_PROPOSALS, false));
        assert!(load.mw.proposals().count() > 0);

        pg.governance.toggle();
        render(&mut pg, &mut load);
        assert!(matches!(pg.dialog, Some(Dialog::DisableGovernance(_))));
        pg.events.push(SettingsEvent::Dialog(ModalAction::Positive(String::new())));
        render(&mut pg, &mut load);
        assert!(!load.mw.config().read_bool(config::FETCH_PROPOSALS, false));
        assert_eq!(load.mw.proposals().count(), 0);
        assert!(!pg.governance.is_checked());
    }

    #[test]
    fn test_cancel_restores_switch() {
        let (mut load, _dir, _rt) = load();
        let mut pg = page(&mut load);
        pg.startup_password.toggle();
        render(&mut pg, &mut load);
        assert!(matches!(pg.dialog, Some(Dialog::CreateStartupPass(_))));

        pg.events.push(SettingsEvent::Dialog(ModalAction::Negative));
        render(&mut pg, &mut load);
        assert!(pg.dialog.is_none());
        assert!(!pg.startup_password.is_checked());
    }

    #[test]
    fn test_startup_password_lifecycle() {
        let (mut load, _dir, _rt) = load();
        let mut pg = page(&mut load);

        pg.startup_password.toggle();
        render(&mut pg, &mut load);
        pg.events.push(SettingsEvent::Dialog(ModalAction::Positive("startup1".into())));
        render_until(&mut pg, &mut load, |p, _| p.work.is_none() && p.dialog.is_none());
        assert!(load.mw.is_startup_security_set());
        assert!(pg.startup_password.is_checked());

        // change: wrong current password stays in the modal
        pg.events.push(SettingsEvent::ChangeStartupPass);
        render(&mut pg, &mut load);
        pg.events.push(SettingsEvent::Dialog(ModalAction::Positive("nope".into())));
        render_until(&mut pg, &mut load, |p, _| p.work.is_none());
        match &pg.dialog {
            Some(Dialog::VerifyStartupPass(m)) => assert_eq!(m.state.error(), Some(STR_INVALID_PASSWORD)),
            _ => panic!("expected verify dialog"),
        }

        pg.events.push(SettingsEvent::Dialog(ModalAction::Positive("startup1".into())));
        render_until(&mut pg, &mut load, |p, _| matches!(p.dialog, Some(Dialog::ChangeStartupPass { .. })));
        pg.events.push(SettingsEvent::Dialog(ModalAction::Positive("startup2".into())));
        render_until(&mut pg, &mut load, |p, _| p.dialog.is_none());
        assert!(load.mw.verify_startup_passphrase("startup2").is_ok());

        pg.startup_password.toggle();
        render(&mut pg, &mut load);
        pg.events.push(SettingsEvent::Dialog(ModalAction::Positive("startup2".into())));
        render_until(&mut pg, &mut load, |p, _| p.dialog.is_none());
        assert!(!load.mw.is_startup_security_set());
    }

    #[test]
    fn test_peer_and_user_agent() {
        let (mut load, _dir, _rt) = load();
        let mut pg = page(&mut load);

        pg.connect_to_peer.toggle();
        render(&mut pg, &mut load);
        assert!(matches!(pg.dialog, Some(Dialog::Peer(_))));
        pg.events.push(SettingsEvent::Dialog(ModalAction::Positive("10.0.0.1:9108".into())));
        render(&mut pg, &mut load);
        assert_eq!(load.mw.config().read_string(config::SPV_PERSISTENT_PEER), "10.0.0.1:9108");
        assert!(pg.connect_to_peer.is_checked());

        pg.connect_to_peer.toggle();
        render(&mut pg, &mut load);
        assert!(matches!(pg.dialog, Some(Dialog::ConfirmRemove { .. })));
        pg.events.push(SettingsEvent::Dialog(ModalAction::Positive(String::new())));
        render(&mut pg, &mut load);
        assert!(!load.mw.config().is_set(config::SPV_PERSISTENT_PEER));
        assert!(!pg.connect_to_peer.is_checked());

        pg.events.push(SettingsEvent::EditUserAgent);
        render(&mut pg, &mut load);
        pg.events.push(SettingsEvent::Dialog(ModalAction::Positive("zabuton/0.1".into())));
        render(&mut pg, &mut load);
        assert_eq!(pg.agent_value, "zabuton/0.1");
    }

    #[test]
    fn test_language_preference() {
        let (mut load, _dir, _rt) = load();
        let mut pg = page(&mut load);
        assert_eq!(pg.language, DEFAULT_LANGUAGE);
        pg.events.push(SettingsEvent::OpenLanguage);
        render(&mut pg, &mut load);
        pg.events.push(SettingsEvent::Dialog(ModalAction::Positive("fr".into())));
        render(&mut pg, &mut load);
        assert_eq!(load.mw.config().read_string(config::LANGUAGE), "fr");
        assert_eq!(pg.language, "fr");
    }
}
