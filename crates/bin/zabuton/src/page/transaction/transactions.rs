use eframe::egui::{self, RichText};
use tracing::debug;
use zabuton_core::{Notification, TicketStatus, Transaction, TxFilter, Wallet};

use super::details::TransactionDetailsPage;
use crate::load::{Listener, Load, Pending};
use crate::page::components::{card, content, newest_first, order_dropdown, sub_page_header, tx_row, wallet_dropdown, wallet_items};
use crate::page::Page;
use crate::values::{STR_NO_TRANSACTIONS, TX_DROPDOWN_GROUP};
use crate::widgets::{display_one_dropdown, DropDown, EventQueue};

pub const TRANSACTIONS_PAGE_ID: &str = "transactions";

const TX_TYPES: [(&str, TxFilter); 6] = [
    ("All", TxFilter::All),
    ("Sent", TxFilter::Sent),
    ("Received", TxFilter::Received),
    ("Yourself", TxFilter::Transferred),
    ("Mixed", TxFilter::Mixed),
    ("Staking", TxFilter::Staking),
];

type TxRows = Vec<(Transaction, Option<TicketStatus>)>;

enum TxEvent {
    Back,
    Open(usize),
}

pub struct TransactionsPage {
    wallets: Vec<Wallet>,
    wallet_dropdown: DropDown,
    order_dropdown: DropDown,
    type_dropdown: DropDown,
    transactions: TxRows,
    loading: Option<Pending<zabuton_core::Result<TxRows>>>,
    listener: Option<Listener>,
    events: EventQueue<TxEvent>,
}

impl TransactionsPage {
    pub fn new() -> Self {
        let labels: Vec<&str> = TX_TYPES.iter().map(|(l, _)| *l).collect();
        Self {
            wallets: Vec::new(),
            wallet_dropdown: wallet_dropdown("tx_wallet", &[], TX_DROPDOWN_GROUP),
            order_dropdown: order_dropdown("tx_order", TX_DROPDOWN_GROUP),
            type_dropdown: DropDown::from_labels("tx_type", &labels, TX_DROPDOWN_GROUP),
            transactions: Vec::new(),
            loading: None,
            listener: None,
            events: EventQueue::new(),
        }
    }

    fn selected_wallet(&self) -> Option<&Wallet> {
        self.wallets.get(self.wallet_dropdown.selected_index())
    }

    fn selected_filter(&self) -> TxFilter {
        TX_TYPES
            .get(self.type_dropdown.selected_index())
            .map(|(_, f)| *f)
            .unwrap_or_default()
    }

    fn load_transactions(&mut self, load: &Load) {
        let Some(wallet) = self.selected_wallet() else {
            self.transactions.clear();
            return;
        };
        let id = wallet.id;
        let filter = self.selected_filter();
        let newest = newest_first(&self.order_dropdown);
        self.loading = Some(load.spawn(move |mw| {
            let txs = mw.get_transactions(id, 0, 0, filter, newest)?;
            Ok(txs
                .into_iter()
                .map(|t| {
                    let status = if t.tx_type.is_staking() { mw.ticket_status(&t).unwrap_or(None) } else { None };
                    (t, status)
                })
                .collect())
        }));
    }
}

impl Default for TransactionsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for TransactionsPage {
    fn id(&self) -> &'static str {
        TRANSACTIONS_PAGE_ID
    }

    fn on_navigated_to(&mut self, load: &mut Load) {
        self.wallets = load.sorted_wallets();
        self.wallet_dropdown.set_items(wallet_items(&self.wallets));
        if self.listener.is_none() {
            self.listener = Some(load.listen());
        }
        self.load_transactions(load);
    }

    fn on_navigated_from(&mut self, _load: &mut Load) {
        if let Some(listener) = self.listener.take() {
            listener.stop();
        }
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        let mut reload = false;
        for dd in [&mut self.type_dropdown, &mut self.order_dropdown, &mut self.wallet_dropdown] {
            while dd.changed() {
                reload = true;
            }
        }

        let selected = self.selected_wallet().map(|w| w.id);
        let notes = self.listener.as_mut().map(Listener::poll).unwrap_or_default();
        for note in notes {
            if let Notification::NewTransaction { wallet_id, hash } = note {
                if Some(wallet_id) == selected {
                    debug!("new transaction {} for the shown wallet", hash);
                    reload = true;
                }
            }
        }
        if reload {
            self.load_transactions(load);
        }

        while let Some(event) = self.events.pop() {
            match event {
                TxEvent::Back => load.pop_fragment(),
                TxEvent::Open(i) => {
                    if let Some((tx, _)) = self.transactions.get(i) {
                        load.change_fragment(TransactionDetailsPage::new(tx.clone()));
                    }
                }
            }
        }

        if let Some(result) = self.loading.as_mut().and_then(Pending::poll) {
            self.loading = None;
            match result {
                Ok(rows) => self.transactions = rows,
                Err(e) => load.toast.notify_error(e.to_string()),
            }
        }

        display_one_dropdown(&mut [&mut self.wallet_dropdown, &mut self.type_dropdown, &mut self.order_dropdown]);
    }

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        let theme = load.theme;
        let c = theme.color;
        content(ui, |ui| {
            if sub_page_header(ui, &theme, "Transactions") {
                self.events.push(TxEvent::Back);
            }
            ui.horizontal(|ui| {
                self.wallet_dropdown.layout(ui, &theme);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.order_dropdown.layout(ui, &theme);
                    self.type_dropdown.layout(ui, &theme);
                });
            });
            ui.add_space(8.0);

            card(ui, &theme, |ui| {
                if self.transactions.is_empty() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(16.0);
                        ui.label(RichText::new(STR_NO_TRANSACTIONS).size(14.0).color(c.text_faint));
                        ui.add_space(16.0);
                    });
                    return;
                }
                let last = self.transactions.len() - 1;
                for (i, (tx, status)) in self.transactions.iter().enumerate() {
                    if tx_row(ui, &theme, tx, *status).clicked() {
                        self.events.push(TxEvent::Open(i));
                    }
                    if i != last {
                        ui.separator();
                    }
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::testing::{load, render, render_until};
    use crate::load::NavRequest;
    use zabuton_core::{Amount, Direction, TxType};

    fn record(load: &Load, wallet: u32, direction: Direction, ts: i64) -> Transaction {
        let tx = Transaction::new(wallet, TxType::Regular, direction, Amount(1_000), Amount(10), ts, ts as u64).mined_at(1);
        load.mw.record_transaction(tx.clone()).unwrap();
        tx
    }

    #[test]
    fn test_empty_wallet_shows_nothing() {
        let (mut load, _dir, _rt) = load();
        load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let mut page = TransactionsPage::new();
        page.on_navigated_to(&mut load);
        render_until(&mut page, &mut load, |p, _| p.loading.is_none());
        assert!(page.transactions.is_empty());
    }

    #[test]
    fn test_dropdowns_reload() {
        let (mut load, _dir, _rt) = load();
        let w = load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let old = record(&load, w.id, Direction::Received, 100);
        let new = record(&load, w.id, Direction::Sent, 200);

        let mut page = TransactionsPage::new();
        page.on_navigated_to(&mut load);
        render_until(&mut page, &mut load, |p, _| p.loading.is_none());
        let hashes: Vec<_> = page.transactions.iter().map(|(t, _)| t.hash.clone()).collect();
        assert_eq!(hashes, vec![new.hash.clone(), old.hash.clone()]);

        page.order_dropdown.click_item(1);
        render(&mut page, &mut load);
        render_until(&mut page, &mut load, |p, _| p.loading.is_none());
        assert_eq!(page.transactions[0].0.hash, old.hash);

        page.type_dropdown.click_item(1);
        render(&mut page, &mut load);
        render_until(&mut page, &mut load, |p, _| p.loading.is_none());
        assert_eq!(page.transactions.len(), 1);
        assert_eq!(page.transactions[0].0.hash, new.hash);
    }

    #[test]
    fn test_new_transaction_for_selected_wallet_reloads() {
        let (mut load, _dir, _rt) = load();
        let w = load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let other = load.mw.create_new_wallet("other", "secret1").unwrap();
        let mut page = TransactionsPage::new();
        page.on_navigated_to(&mut load);
        render_until(&mut page, &mut load, |p, _| p.loading.is_none());

        record(&load, other.id, Direction::Received, 50);
        record(&load, w.id, Direction::Received, 60);
        render_until(&mut page, &mut load, |p, _| p.transactions.len() == 1);
        assert_eq!(page.transactions[0].0.wallet_id, w.id);
    }

    #[test]
    fn test_row_opens_details_and_unsubscribes() {
        let (mut load, _dir, _rt) = load();
        let w = load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        record(&load, w.id, Direction::Received, 10);
        let mut page = TransactionsPage::new();
        page.on_navigated_to(&mut load);
        render_until(&mut page, &mut load, |p, _| !p.transactions.is_empty());

        page.events.push(TxEvent::Open(0));
        render(&mut page, &mut load);
        assert!(matches!(load.take_nav_requests().as_slice(), [NavRequest::ChangeFragment(p)] if p.id() == "transaction_details"));

        page.on_navigated_from(&mut load);
        assert!(page.listener.is_none());
    }
}
