use eframe::egui::{self, RichText};
use zabuton_core::{TicketStatus, Transaction, TxFilter};

use crate::load::{Load, Pending};
use crate::page::components::{card, content, sub_page_header, tx_row};
use crate::page::transaction::details::TransactionDetailsPage;
use crate::page::Page;
use crate::values::{STR_NO_TICKETS, TICKET_DROPDOWN_GROUP};
use crate::widgets::{DropDown, EventQueue};

pub const TICKET_LIST_PAGE_ID: &str = "ticket_list";

const TICKET_FILTERS: [(&str, TxFilter); 7] = [
    ("All", TxFilter::All),
    ("Unmined", TxFilter::Unmined),
    ("Immature", TxFilter::Immature),
    ("Live", TxFilter::Live),
    ("Voted", TxFilter::Voted),
    ("Expired", TxFilter::Expired),
    ("Revoked", TxFilter::Revoked),
];

enum TicketListEvent {
    Back,
    Open(usize),
}

/// every ticket across wallets, narrowed by status
pub struct TicketListPage {
    filter: DropDown,
    tickets: Vec<(Transaction, TicketStatus)>,
    loading: Option<Pending<zabuton_core::Result<Vec<(Transaction, TicketStatus)>>>>,
    events: EventQueue<TicketListEvent>,
}

impl TicketListPage {
    pub fn new() -> Self {
        let labels: Vec<&str> = TICKET_FILTERS.iter().map(|(l, _)| *l).collect();
        Self {
            filter: DropDown::from_labels("ticket_filter", &labels, TICKET_DROPDOWN_GROUP),
            tickets: Vec::new(),
            loading: None,
            events: EventQueue::new(),
        }
    }

    fn selected_filter(&self) -> TxFilter {
        TICKET_FILTERS
            .get(self.filter.selected_index())
            .map(|(_, f)| *f)
            .unwrap_or_default()
    }

    fn fetch(&mut self, load: &Load) {
        let filter = self.selected_filter();
        self.loading = Some(load.spawn(move |mw| mw.tickets(filter)));
    }
}

impl Default for TicketListPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for TicketListPage {
    fn id(&self) -> &'static str {
        TICKET_LIST_PAGE_ID
    }

    fn on_navigated_to(&mut self, load: &mut Load) {
        self.fetch(load);
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        if self.filter.changed() {
            self.fetch(load);
        }

        while let Some(event) = self.events.pop() {
            match event {
                TicketListEvent::Back => load.pop_fragment(),
                TicketListEvent::Open(i) => {
                    if let Some((tx, _)) = self.tickets.get(i) {
                        load.change_fragment(TransactionDetailsPage::new(tx.clone()));
                    }
                }
            }
        }

        if let Some(result) = self.loading.as_mut().and_then(Pending::poll) {
            self.loading = None;
            match result {
                Ok(tickets) => self.tickets = tickets,
                Err(e) => load.toast.notify_error(e.to_string()),
            }
        }
    }

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        let theme = load.theme;
        let c = theme.color;
        content(ui, |ui| {
            ui.horizontal(|ui| {
                if sub_page_header(ui, &theme, "All tickets") {
                    self.events.push(TicketListEvent::Back);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.filter.layout(ui, &theme);
                });
            });
            card(ui, &theme, |ui| {
                if self.tickets.is_empty() && self.loading.is_none() {
                    ui.label(RichText::new(STR_NO_TICKETS).size(14.0).color(c.text_faint));
                }
                for (i, (tx, status)) in self.tickets.iter().enumerate() {
                    if tx_row(ui, &theme, tx, Some(*status)).clicked() {
                        self.events.push(TicketListEvent::Open(i));
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

    #[test]
    fn test_filter_narrows_tickets() {
        let (mut load, _dir, _rt) = load();
        let wallet = load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        load.mw.set_best_block(1_000, 1_600_000_000).unwrap();
        let live = Transaction::new(wallet.id, TxType::Ticket, Direction::Transferred, Amount(100), Amount(1), 10, 1)
            .mined_at(900);
        let unmined = Transaction::new(wallet.id, TxType::Ticket, Direction::Transferred, Amount(100), Amount(1), 20, 2);
        load.mw.record_transaction(live).unwrap();
        load.mw.record_transaction(unmined).unwrap();

        let mut page = TicketListPage::new();
        page.on_navigated_to(&mut load);
        render_until(&mut page, &mut load, |p, _| p.loading.is_none());
        assert_eq!(page.tickets.len(), 2);

        page.filter.click_header();
        page.filter.click_item(3);
        render_until(&mut page, &mut load, |p, _| p.loading.is_none() && p.tickets.len() == 1);
        assert_eq!(page.tickets[0].1, TicketStatus::Live);

        page.events.push(TicketListEvent::Open(0));
        render(&mut page, &mut load);
        assert!(matches!(load.take_nav_requests().as_slice(), [NavRequest::ChangeFragment(p)] if p.id() == "transaction_details"));
    }
}
