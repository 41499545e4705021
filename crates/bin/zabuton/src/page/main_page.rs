use eframe::egui::{self, RichText, Sense};
use egui_phosphor::regular as icons;
use tracing::warn;
use zabuton_core::{Balance, BlockInfo, Wallet};

use super::components::{card, content, format_timestamp, section_title, text_button, translate_err};
use super::debug::DebugPage;
use super::governance::GovernancePage;
use super::seedbackup::save_seed::SaveSeedPage;
use super::settings::SettingsPage;
use super::staking::overview::StakingOverviewPage;
use super::transaction::transactions::TransactionsPage;
use super::wallets::sign_message::SignMessagePage;
use super::Page;
use crate::load::{Load, Pending};
use crate::values::{APP_NAME, STR_NOT_CONNECTED};
use crate::widgets::{CreatePasswordModal, EventQueue, ModalAction};

pub const MAIN_PAGE_ID: &str = "main_page";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Transactions,
    Staking,
    Governance,
    Settings,
    Debug,
}

enum MainEvent {
    Open(Link),
    SignMessage(usize),
    BackupSeed(usize),
    AddWallet,
    CreateWallet { name: String, password: String },
    CloseModal,
}

struct WalletSummary {
    wallet: Wallet,
    balance: Balance,
}

/// navigation hub: wallets with balances and links to every section
pub struct MainPage {
    wallets: Vec<WalletSummary>,
    best_block: BlockInfo,
    connected: bool,
    loading: Option<Pending<Vec<WalletSummary>>>,
    creating: Option<Pending<zabuton_core::Result<Wallet>>>,
    create_modal: Option<CreatePasswordModal>,
    events: EventQueue<MainEvent>,
}

impl MainPage {
    pub fn new() -> Self {
        Self {
            wallets: Vec::new(),
            best_block: BlockInfo::default(),
            connected: false,
            loading: None,
            creating: None,
            create_modal: None,
            events: EventQueue::new(),
        }
    }

    fn reload(&mut self, load: &Load) {
        self.best_block = load.mw.best_block();
        self.connected = load.mw.is_connected_to_network();
        self.loading = Some(load.spawn(|mw| {
            mw.sorted_wallet_list()
                .into_iter()
                .map(|wallet| {
                    let balance = mw.balance(wallet.id).unwrap_or_else(|e| {
                        warn!("balance for wallet {}: {}", wallet.id, e);
                        Balance::default()
                    });
                    WalletSummary { wallet, balance }
                })
                .collect()
        }));
    }

    fn first_wallet(&self) -> Option<Wallet> {
        self.wallets.first().map(|w| w.wallet.clone())
    }
}

impl Default for MainPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for MainPage {
    fn id(&self) -> &'static str {
        MAIN_PAGE_ID
    }

    fn on_navigated_to(&mut self, load: &mut Load) {
        self.reload(load);
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        while let Some(event) = self.events.pop() {
            match event {
                MainEvent::Open(link) => match link {
                    Link::Transactions => load.change_fragment(TransactionsPage::new()),
                    Link::Staking => match self.first_wallet() {
                        Some(w) => load.change_fragment(StakingOverviewPage::new(w)),
                        None => load.toast.notify_error("no wallet to stake with"),
                    },
                    Link::Governance => load.change_fragment(GovernancePage::new()),
                    Link::Settings => load.change_fragment(SettingsPage::new()),
                    Link::Debug => load.change_fragment(DebugPage::new()),
                },
                MainEvent::SignMessage(i) => {
                    if let Some(s) = self.wallets.get(i) {
                        load.change_fragment(SignMessagePage::new(s.wallet.clone()));
                    }
                }
                MainEvent::BackupSeed(i) => {
                    if let Some(s) = self.wallets.get(i) {
                        load.change_fragment(SaveSeedPage::new(s.wallet.clone()));
                    }
                }
                MainEvent::AddWallet => {
                    self.create_modal = Some(CreatePasswordModal::new("Create new wallet").with_name("Wallet name"));
                }
                MainEvent::CreateWallet { name, password } => {
                    self.creating = Some(load.spawn(move |mw| mw.create_new_wallet(&name, &password)));
                }
                MainEvent::CloseModal => self.create_modal = None,
            }
        }

        if let Some(summaries) = self.loading.as_mut().and_then(Pending::poll) {
            self.loading = None;
            self.wallets = summaries;
        }
        if let Some(result) = self.creating.as_mut().and_then(Pending::poll) {
            self.creating = None;
            match result {
                Ok(wallet) => {
                    self.create_modal = None;
                    load.toast.notify(format!("Wallet {} created", wallet.name));
                    self.reload(load);
                }
                Err(e) => {
                    if let Some(m) = self.create_modal.as_mut() {
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
                ui.label(RichText::new(APP_NAME).size(22.0).color(c.text));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (icon, text, color) = if self.connected {
                        (icons::WIFI_HIGH, format!("block {}", self.best_block.height), c.success)
                    } else {
                        (icons::WIFI_SLASH, STR_NOT_CONNECTED.to_string(), c.text_faint)
                    };
                    ui.label(RichText::new(text).size(11.0).color(color));
                    ui.label(RichText::new(icon).size(14.0).color(color));
                });
            });
            if self.best_block.timestamp > 0 {
                ui.label(
                    RichText::new(format!("last block {}", format_timestamp(self.best_block.timestamp)))
                        .size(11.0)
                        .color(c.text_faint),
                );
            }
            ui.add_space(12.0);

            section_title(ui, &theme, "Wallets");
            if self.loading.is_some() && self.wallets.is_empty() {
                ui.add(egui::Spinner::new());
            }
            for (i, s) in self.wallets.iter().enumerate() {
                card(ui, &theme, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(icons::WALLET).size(20.0).color(c.primary));
                        ui.vertical(|ui| {
                            ui.label(RichText::new(&s.wallet.name).size(15.0).color(c.text));
                            ui.label(
                                RichText::new(format!("spendable {}", s.balance.spendable))
                                    .size(11.0)
                                    .color(c.text_muted),
                            );
                        });
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(RichText::new(s.balance.total.to_string()).size(16.0).color(c.text).monospace());
                        });
                    });
                    ui.horizontal(|ui| {
                        if text_button(ui, &theme, &format!("{} Sign message", icons::SIGNATURE)) {
                            self.events.push(MainEvent::SignMessage(i));
                        }
                        if !s.wallet.seed_backed_up {
                            let label = format!("{} Back up seed", icons::WARNING);
                            let btn = egui::Button::new(RichText::new(label).size(13.0).color(c.warning)).frame(false);
                            if ui.add(btn).clicked() {
                                self.events.push(MainEvent::BackupSeed(i));
                            }
                        }
                    });
                });
                ui.add_space(8.0);
            }
            if text_button(ui, &theme, &format!("{} Add wallet", icons::PLUS)) {
                self.events.push(MainEvent::AddWallet);
            }

            ui.add_space(16.0);
            let links = [
                (Link::Transactions, icons::LIST_BULLETS, "Transactions"),
                (Link::Staking, icons::TICKET, "Staking"),
                (Link::Governance, icons::BANK, "Governance"),
                (Link::Settings, icons::GEAR, "Settings"),
                (Link::Debug, icons::BUG, "Debug"),
            ];
            card(ui, &theme, |ui| {
                for (link, icon, label) in links {
                    let row = ui
                        .horizontal(|ui| {
                            ui.label(RichText::new(icon).size(18.0).color(c.primary));
                            ui.label(RichText::new(label).size(14.0).color(c.text));
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.label(RichText::new(icons::CARET_RIGHT).size(14.0).color(c.text_faint));
                            });
                        })
                        .response
                        .interact(Sense::click());
                    if row.clicked() {
                        self.events.push(MainEvent::Open(link));
                    }
                }
            });
        });

        if let Some(modal) = self.create_modal.as_mut() {
            match modal.show(ui.ctx(), &theme) {
                ModalAction::Positive(p) => self.events.push(MainEvent::CreateWallet {
                    name: p.name.unwrap_or_default(),
                    password: p.password,
                }),
                ModalAction::Negative => self.events.push(MainEvent::CloseModal),
                ModalAction::None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::testing::{load, render_until};
    use crate::load::NavRequest;

    #[test]
    fn test_lists_wallets_with_balances() {
        let (mut load, _dir, _rt) = load();
        load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let mut page = MainPage::new();
        page.on_navigated_to(&mut load);
        render_until(&mut page, &mut load, |p, _| p.loading.is_none());
        assert_eq!(page.wallets.len(), 1);
        assert_eq!(page.wallets[0].wallet.name, "mywallet");
    }

    #[test]
    fn test_links_navigate() {
        let (mut load, _dir, _rt) = load();
        load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let mut page = MainPage::new();
        page.on_navigated_to(&mut load);
        render_until(&mut page, &mut load, |p, _| p.loading.is_none());

        page.events.push(MainEvent::Open(Link::Settings));
        page.events.push(MainEvent::SignMessage(0));
        page.handle_user_interactions(&mut load);
        let ids: Vec<&str> = load
            .take_nav_requests()
            .iter()
            .filter_map(|r| match r {
                NavRequest::ChangeFragment(p) => Some(p.id()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["settings", "sign_message"]);
    }

    #[test]
    fn test_add_named_wallet() {
        let (mut load, _dir, _rt) = load();
        load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let mut page = MainPage::new();
        page.on_navigated_to(&mut load);
        page.events.push(MainEvent::CreateWallet { name: "savings".into(), password: "secret1".into() });
        render_until(&mut page, &mut load, |p, _| p.creating.is_none() && p.loading.is_none() && p.wallets.len() == 2);
        assert_eq!(page.wallets[1].wallet.name, "savings");
    }
}
