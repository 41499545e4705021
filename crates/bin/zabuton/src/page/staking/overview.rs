use eframe::egui::{self, RichText};
use egui_phosphor::regular as icons;
use tracing::{info, warn};
use zabuton_core::{Amount, Balance, Error, Notification, StakingOverview, TicketStatus, Transaction, Wallet};

use super::modals::{Purchase, PurchaseModal, TicketBuyerModal};
use super::ticket_list::TicketListPage;
use crate::load::{Listener, Load, Pending};
use crate::page::components::{card, content, primary_button, section_title, sub_page_header, text_button, translate_err, tx_row};
use crate::page::transaction::details::TransactionDetailsPage;
use crate::page::Page;
use crate::values::{APP_NAME, STR_CANCEL, STR_CONFIRM, STR_NOT_CONNECTED};
use crate::widgets::{EventQueue, InfoModal, ModalAction, PasswordModal, Switch};

pub const STAKING_PAGE_ID: &str = "staking";

const NO_PRICE: &str = "0 DCR";

enum StakingEvent {
    Back,
    Stake,
    Purchase(Purchase),
    ClosePurchase,
    CloseInfo,
    GoToOverview,
    AutoPurchaseSettings,
    SaveBuyerConfig(zabuton_core::TicketBuyerConfig),
    CancelBuyerConfig,
    StartBuyer(String),
    CancelStartBuyer,
    OpenTicket(usize),
    AllTickets,
}

#[derive(Default)]
struct StakingData {
    balance: Balance,
    overview: StakingOverview,
    total_rewards: Amount,
    live: Vec<(Transaction, Option<TicketStatus>)>,
    errors: Vec<String>,
}

fn load_staking_data(mw: &zabuton_core::MultiWallet, wallet_id: u32) -> StakingData {
    let mut data = StakingData::default();
    match mw.total_staking_rewards() {
        Ok(total) => data.total_rewards = total,
        Err(e) => data.errors.push(e.to_string()),
    }
    match mw.staking_overview() {
        Ok(overview) => data.overview = overview,
        Err(e) => data.errors.push(e.to_string()),
    }
    match mw.balance(wallet_id) {
        Ok(balance) => data.balance = balance,
        Err(e) => data.errors.push(e.to_string()),
    }
    match mw.live_tickets() {
        Ok(tickets) => {
            data.live = tickets
                .into_iter()
                .map(|t| {
                    let status = mw.ticket_status(&t).unwrap_or(None);
                    (t, status)
                })
                .collect()
        }
        Err(e) => data.errors.push(e.to_string()),
    }
    data
}

/// ticket price, live tickets, staking record and the ticket buyer
pub struct StakingOverviewPage {
    wallet: Wallet,
    ticket_price: Option<Amount>,
    data: StakingData,
    auto_purchase: Switch,
    purchase_modal: Option<PurchaseModal>,
    info_modal: Option<InfoModal>,
    price_modal: Option<InfoModal>,
    buyer_modal: Option<TicketBuyerModal>,
    /// start the buyer once the settings modal saves
    start_after_save: bool,
    start_modal: Option<PasswordModal>,
    loading: Option<Pending<StakingData>>,
    purchasing: Option<Pending<zabuton_core::Result<Vec<String>>>>,
    starting: Option<Pending<zabuton_core::Result<()>>>,
    listener: Option<Listener>,
    events: EventQueue<StakingEvent>,
}

impl StakingOverviewPage {
    pub fn new(wallet: Wallet) -> Self {
        Self {
            wallet,
            ticket_price: None,
            data: StakingData::default(),
            auto_purchase: Switch::default(),
            purchase_modal: None,
            info_modal: None,
            price_modal: None,
            buyer_modal: None,
            start_after_save: false,
            start_modal: None,
            loading: None,
            purchasing: None,
            starting: None,
            listener: None,
            events: EventQueue::new(),
        }
    }

    /// the last wallet with a buyer config wins, otherwise keep the one we were opened with
    fn set_tb_wallet(&mut self, load: &Load) {
        if let Some(w) = load
            .mw
            .sorted_wallet_list()
            .into_iter()
            .filter(|w| load.mw.ticket_buyer_config_is_set(w.id))
            .last()
        {
            self.wallet = w;
        }
    }

    fn load_price(&mut self, load: &mut Load) {
        match load.mw.ticket_price() {
            Ok(price) => self.ticket_price = Some(price.price),
            Err(e @ Error::TicketPriceUnavailable { .. }) => {
                warn!("{}", e);
                self.ticket_price = None;
                self.price_modal = Some(
                    InfoModal::new(
                        "Staking notification",
                        "Ticket prices are unavailable until DCP0001 activates. \
                         Wait for the wallet to sync past the activation height.",
                    )
                    .negative(STR_CANCEL)
                    .positive("Go to Overview"),
                );
            }
            Err(e) => {
                self.ticket_price = None;
                load.toast.notify_error(format!("Unable to fetch ticket price: {}", e));
            }
        }
    }

    fn load_page_data(&mut self, load: &Load) {
        let id = self.wallet.id;
        self.loading = Some(load.spawn(move |mw| load_staking_data(mw, id)));
    }

    fn price_label(&self) -> String {
        self.ticket_price.map(|p| p.to_string()).unwrap_or_else(|| NO_PRICE.to_string())
    }

    fn start_buyer_modal(&self, load: &Load) -> Option<PasswordModal> {
        let cfg = match load.mw.ticket_buyer_config(self.wallet.id) {
            Ok(Some(cfg)) => cfg,
            Ok(None) => return None,
            Err(e) => {
                warn!("ticket buyer config: {}", e);
                return None;
            }
        };
        let description = format!(
            "Wallet to purchase from: {}\nSelected account: default\nBalance to maintain: {}\nVSP: {}\n\n\
             {} must remain running, for tickets to be automatically purchased",
            self.wallet.name, cfg.balance_to_maintain, cfg.vsp_host, APP_NAME
        );
        Some(
            PasswordModal::new("Confirm Automatic Ticket Purchase")
                .description(description)
                .positive(STR_CONFIRM)
                .cancelable(false),
        )
    }

    fn handle_auto_purchase(&mut self, load: &mut Load) {
        if !self.auto_purchase.changed() {
            return;
        }
        if self.auto_purchase.is_checked() {
            if load.mw.ticket_buyer_config_is_set(self.wallet.id) {
                self.start_modal = self.start_buyer_modal(load);
                if self.start_modal.is_none() {
                    self.auto_purchase.set_checked(false);
                }
            } else {
                self.start_after_save = true;
                self.buyer_modal = Some(TicketBuyerModal::new(None));
            }
        } else {
            load.mw.stop_auto_tickets_purchase(self.wallet.id);
        }
    }

    fn poll_work(&mut self, load: &mut Load) {
        if let Some(data) = self.loading.as_mut().and_then(Pending::poll) {
            self.loading = None;
            for e in &data.errors {
                load.toast.notify_error(e.clone());
            }
            self.data = data;
        }

        if let Some(result) = self.purchasing.as_mut().and_then(Pending::poll) {
            self.purchasing = None;
            match result {
                Ok(hashes) => {
                    info!("purchased {} tickets", hashes.len());
                    self.purchase_modal = None;
                    self.info_modal = Some(
                        InfoModal::new("Ticket(s) Confirmed", "")
                            .icon(icons::CHECK_CIRCLE)
                            .positive("Back to staking"),
                    );
                    self.load_page_data(load);
                }
                Err(e) => {
                    if let Some(m) = self.purchase_modal.as_mut() {
                        m.state.set_error(translate_err(&e));
                    }
                }
            }
        }

        if let Some(result) = self.starting.as_mut().and_then(Pending::poll) {
            self.starting = None;
            if let Err(e) = result {
                load.toast.notify_error(translate_err(&e));
            }
            self.auto_purchase
                .set_checked(load.mw.is_auto_tickets_purchase_active(self.wallet.id));
        }

        let notes = self.listener.as_mut().map(Listener::poll).unwrap_or_default();
        let mut reload = false;
        for note in notes {
            match note {
                Notification::TicketBuyerStopped { wallet_id } if wallet_id == self.wallet.id => {
                    self.auto_purchase.set_checked(false);
                }
                Notification::NewTransaction { .. } | Notification::BlockConnected { .. } => reload = true,
                _ => {}
            }
        }
        if reload && self.loading.is_none() {
            self.load_page_data(load);
        }
    }
}

impl Page for StakingOverviewPage {
    fn id(&self) -> &'static str {
        STAKING_PAGE_ID
    }

    fn on_navigated_to(&mut self, load: &mut Load) {
        self.set_tb_wallet(load);
        self.load_price(load);
        self.load_page_data(load);
        self.auto_purchase
            .set_checked(load.mw.is_auto_tickets_purchase_active(self.wallet.id));
        self.listener = Some(load.listen());
    }

    fn on_navigated_from(&mut self, _load: &mut Load) {
        if let Some(l) = self.listener.take() {
            l.stop();
        }
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        self.handle_auto_purchase(load);

        while let Some(event) = self.events.pop() {
            match event {
                StakingEvent::Back => load.pop_fragment(),
                StakingEvent::Stake => match self.ticket_price {
                    Some(price) => self.purchase_modal = Some(PurchaseModal::new(self.wallet.name.clone(), price)),
                    None => load.toast.notify_error("Unable to fetch ticket price"),
                },
                StakingEvent::Purchase(p) => {
                    let id = self.wallet.id;
                    self.purchasing = Some(load.spawn(move |mw| mw.purchase_tickets(id, p.count, &p.password)));
                }
                StakingEvent::ClosePurchase => self.purchase_modal = None,
                StakingEvent::CloseInfo => {
                    self.info_modal = None;
                    self.price_modal = None;
                }
                StakingEvent::GoToOverview => {
                    self.price_modal = None;
                    load.pop_to_root();
                }
                StakingEvent::AutoPurchaseSettings => {
                    if load.mw.is_auto_tickets_purchase_active(self.wallet.id) {
                        load.toast.notify_error("Settings can not be modified when ticket buyer is running.");
                    } else {
                        let existing = load.mw.ticket_buyer_config(self.wallet.id).ok().flatten();
                        self.start_after_save = false;
                        self.buyer_modal = Some(TicketBuyerModal::new(existing.as_ref()));
                    }
                }
                StakingEvent::SaveBuyerConfig(cfg) => match load.mw.set_ticket_buyer_config(self.wallet.id, cfg) {
                    Ok(()) => {
                        self.buyer_modal = None;
                        load.toast.notify("Auto ticket purchase setting saved successfully.");
                        if self.start_after_save {
                            self.start_modal = self.start_buyer_modal(load);
                        } else {
                            self.set_tb_wallet(load);
                        }
                    }
                    Err(e) => {
                        if let Some(m) = self.buyer_modal.as_mut() {
                            m.state.set_error(translate_err(&e));
                        }
                    }
                },
                StakingEvent::CancelBuyerConfig => {
                    self.buyer_modal = None;
                    self.auto_purchase
                        .set_checked(load.mw.is_auto_tickets_purchase_active(self.wallet.id));
                }
                StakingEvent::StartBuyer(password) => {
                    self.start_modal = None;
                    if !load.mw.is_connected_to_network() {
                        load.toast.notify_error(STR_NOT_CONNECTED);
                        self.auto_purchase.set_checked(false);
                        continue;
                    }
                    let id = self.wallet.id;
                    self.starting = Some(load.spawn(move |mw| mw.start_ticket_buyer(id, &password)));
                }
                StakingEvent::CancelStartBuyer => {
                    self.start_modal = None;
                    self.auto_purchase.set_checked(false);
                }
                StakingEvent::OpenTicket(i) => {
                    if let Some((tx, _)) = self.data.live.get(i) {
                        load.change_fragment(TransactionDetailsPage::new(tx.clone()));
                    }
                }
                StakingEvent::AllTickets => load.change_fragment(TicketListPage::new()),
            }
        }

        self.poll_work(load);
    }

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        let theme = load.theme;
        let c = theme.color;
        let price = self.price_label();
        content(ui, |ui| {
            if sub_page_header(ui, &theme, "Staking") {
                self.events.push(StakingEvent::Back);
            }

            card(ui, &theme, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Ticket Price").size(14.0).color(c.text_muted));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        self.auto_purchase.layout(ui, &theme);
                        ui.label(RichText::new("Auto Purchase").size(14.0).color(c.text_muted));
                        let settings_color = if self.auto_purchase.is_checked() { c.text_faint } else { c.primary };
                        let settings = egui::Button::new(RichText::new(icons::GEAR).size(18.0).color(settings_color)).frame(false);
                        if ui.add(settings).clicked() {
                            self.events.push(StakingEvent::AutoPurchaseSettings);
                        }
                    });
                });
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(icons::TICKET).size(40.0).color(c.primary));
                    ui.label(RichText::new(&price).size(28.0).color(c.text));
                    ui.add_space(12.0);
                    if primary_button(ui, &theme, "Stake", true) {
                        self.events.push(StakingEvent::Stake);
                    }
                });
            });
            ui.add_space(8.0);

            card(ui, &theme, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&self.wallet.name).size(14.0).color(c.text));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(self.data.balance.total.to_string()).size(14.0).color(c.text).monospace());
                    });
                });
                ui.label(
                    RichText::new(format!("Spendable {}", self.data.balance.spendable))
                        .size(12.0)
                        .color(c.text_muted),
                );
                ui.label(
                    RichText::new(format!("Locked by tickets {}", self.data.balance.locked_by_tickets))
                        .size(12.0)
                        .color(c.text_muted),
                );
            });
            ui.add_space(8.0);

            card(ui, &theme, |ui| {
                ui.horizontal(|ui| {
                    section_title(ui, &theme, &format!("Live Tickets ({})", self.data.live.len()));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if text_button(ui, &theme, &format!("See all {}", icons::CARET_RIGHT)) {
                            self.events.push(StakingEvent::AllTickets);
                        }
                    });
                });
                if self.data.live.is_empty() {
                    ui.label(RichText::new("No active tickets").size(13.0).color(c.text_faint));
                }
                for (i, (tx, status)) in self.data.live.iter().enumerate() {
                    if tx_row(ui, &theme, tx, *status).clicked() {
                        self.events.push(StakingEvent::OpenTicket(i));
                    }
                }
            });
            ui.add_space(8.0);

            let overview = self.data.overview;
            let record = [
                ("Unmined", overview.unmined),
                ("Immature", overview.immature),
                ("Live", overview.live),
                ("Voted", overview.voted),
                ("Expired", overview.expired),
                ("Revoked", overview.revoked),
            ];
            card(ui, &theme, |ui| {
                section_title(ui, &theme, &format!("Ticket Record ({})", overview.all));
                egui::Grid::new("ticket_record").num_columns(3).spacing([32.0, 8.0]).show(ui, |ui| {
                    for (i, (label, count)) in record.iter().enumerate() {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(count.to_string()).size(16.0).color(c.text));
                            ui.label(RichText::new(*label).size(12.0).color(c.text_muted));
                        });
                        if i % 3 == 2 {
                            ui.end_row();
                        }
                    }
                });
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Rewards Earned").size(13.0).color(c.text_muted));
                    ui.label(RichText::new(self.data.total_rewards.to_string()).size(13.0).color(c.success));
                });
            });
        });

        let ctx = ui.ctx().clone();
        if let Some(modal) = self.purchase_modal.as_mut() {
            match modal.show(&ctx, &theme) {
                ModalAction::Positive(p) => self.events.push(StakingEvent::Purchase(p)),
                ModalAction::Negative => self.events.push(StakingEvent::ClosePurchase),
                ModalAction::None => {}
            }
        }
        if let Some(modal) = self.info_modal.as_mut() {
            if !modal.show(&ctx, &theme).is_none() {
                self.events.push(StakingEvent::CloseInfo);
            }
        }
        if let Some(modal) = self.price_modal.as_mut() {
            match modal.show(&ctx, &theme) {
                ModalAction::Positive(()) => self.events.push(StakingEvent::GoToOverview),
                ModalAction::Negative => self.events.push(StakingEvent::CloseInfo),
                ModalAction::None => {}
            }
        }
        if let Some(modal) = self.buyer_modal.as_mut() {
            match modal.show(&ctx, &theme) {
                ModalAction::Positive(cfg) => self.events.push(StakingEvent::SaveBuyerConfig(cfg)),
                ModalAction::Negative => self.events.push(StakingEvent::CancelBuyerConfig),
                ModalAction::None => {}
            }
        }
        if let Some(modal) = self.start_modal.as_mut() {
            match modal.show(&ctx, &theme) {
                ModalAction::Positive(password) => self.events.push(StakingEvent::StartBuyer(password)),
                ModalAction::Negative => self.events.push(StakingEvent::CancelStartBuyer),
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
    use zabuton_core::{Direction, TicketBuyerConfig, TxType};

    fn funded(load: &mut Load) -> Wallet {
        let wallet = load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let tx = Transaction::new(wallet.id, TxType::Regular, Direction::Received, Amount::from_coins(500.0), Amount(0), 1, 1)
            .mined_at(10);
        load.mw.record_transaction(tx).unwrap();
        load.mw.set_best_block(400_000, 1_600_000_000).unwrap();
        load.mw.set_connected(true);
        wallet
    }

    fn buyer_config() -> TicketBuyerConfig {
        TicketBuyerConfig {
            vsp_host: "vsp.example.org".into(),
            purchase_account: 0,
            balance_to_maintain: Amount(0),
        }
    }

    #[test]
    fn test_price_unavailable_before_activation() {
        let (mut load, _dir, _rt) = load();
        let wallet = load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let mut page = StakingOverviewPage::new(wallet);
        page.on_navigated_to(&mut load);
        assert_eq!(page.price_label(), NO_PRICE);
        assert!(page.price_modal.is_some());

        page.events.push(StakingEvent::GoToOverview);
        render(&mut page, &mut load);
        assert!(matches!(load.take_nav_requests().as_slice(), [NavRequest::PopToRoot]));
    }

    #[test]
    fn test_purchase_reloads_live_tickets() {
        let (mut load, _dir, _rt) = load();
        let wallet = funded(&mut load);
        let mut page = StakingOverviewPage::new(wallet);
        page.on_navigated_to(&mut load);
        assert!(page.ticket_price.is_some());
        render_until(&mut page, &mut load, |p, _| p.loading.is_none());
        assert!(page.data.live.is_empty());

        page.events.push(StakingEvent::Stake);
        render(&mut page, &mut load);
        assert!(page.purchase_modal.is_some());

        page.events.push(StakingEvent::Purchase(Purchase { count: 2, password: "secret1".into() }));
        render_until(&mut page, &mut load, |p, _| p.purchasing.is_none() && p.loading.is_none() && p.data.live.len() == 2);
        assert!(page.purchase_modal.is_none());
        assert!(page.info_modal.is_some());
        assert_eq!(page.data.overview.unmined, 2);
    }

    #[test]
    fn test_purchase_error_stays_in_modal() {
        let (mut load, _dir, _rt) = load();
        let wallet = funded(&mut load);
        let mut page = StakingOverviewPage::new(wallet);
        page.on_navigated_to(&mut load);
        page.events.push(StakingEvent::Stake);
        render(&mut page, &mut load);
        page.events.push(StakingEvent::Purchase(Purchase { count: 1, password: "bad".into() }));
        render_until(&mut page, &mut load, |p, _| p.purchasing.is_none());
        let err = page.purchase_modal.as_ref().and_then(|m| m.state.error().map(str::to_string));
        assert_eq!(err.as_deref(), Some("Invalid password"));
    }

    #[test]
    fn test_auto_purchase_without_config_asks_for_settings() {
        let (mut load, _dir, _rt) = load();
        let wallet = funded(&mut load);
        let mut page = StakingOverviewPage::new(wallet.clone());
        page.on_navigated_to(&mut load);

        page.auto_purchase.toggle();
        render(&mut page, &mut load);
        assert!(page.buyer_modal.is_some());

        page.events.push(StakingEvent::CancelBuyerConfig);
        render(&mut page, &mut load);
        assert!(!page.auto_purchase.is_checked());

        page.auto_purchase.toggle();
        render(&mut page, &mut load);
        page.events.push(StakingEvent::SaveBuyerConfig(buyer_config()));
        render(&mut page, &mut load);
        assert!(load.mw.ticket_buyer_config_is_set(wallet.id));
        assert!(page.start_modal.is_some());

        page.events.push(StakingEvent::StartBuyer("secret1".into()));
        render_until(&mut page, &mut load, |p, _| p.starting.is_none());
        assert!(load.mw.is_auto_tickets_purchase_active(wallet.id));
        assert!(page.auto_purchase.is_checked());
    }

    #[test]
    fn test_settings_locked_while_buyer_runs() {
        let (mut load, _dir, _rt) = load();
        let wallet = funded(&mut load);
        load.mw.set_ticket_buyer_config(wallet.id, buyer_config()).unwrap();
        load.mw.start_ticket_buyer(wallet.id, "secret1").unwrap();

        let mut page = StakingOverviewPage::new(wallet.clone());
        page.on_navigated_to(&mut load);
        assert!(page.auto_purchase.is_checked());

        page.events.push(StakingEvent::AutoPurchaseSettings);
        render(&mut page, &mut load);
        assert!(page.buyer_modal.is_none());
        assert!(load.toast.current().unwrap().is_error);

        page.auto_purchase.toggle();
        render(&mut page, &mut load);
        assert!(!load.mw.is_auto_tickets_purchase_active(wallet.id));
    }

    #[test]
    fn test_start_buyer_offline() {
        let (mut load, _dir, _rt) = load();
        let wallet = funded(&mut load);
        load.mw.set_ticket_buyer_config(wallet.id, buyer_config()).unwrap();
        load.mw.set_connected(false);
        let mut page = StakingOverviewPage::new(wallet);
        page.on_navigated_to(&mut load);

        page.auto_purchase.toggle();
        render(&mut page, &mut load);
        assert!(page.start_modal.is_some());
        page.events.push(StakingEvent::StartBuyer("secret1".into()));
        render(&mut page, &mut load);
        assert!(!page.auto_purchase.is_checked());
        assert_eq!(load.toast.current().map(|t| t.text.as_str()), Some(STR_NOT_CONNECTED));
    }
}
