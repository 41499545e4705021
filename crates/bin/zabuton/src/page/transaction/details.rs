use eframe::egui::{self, RichText};
use egui_phosphor::regular as icons;
use zabuton_core::{TicketStatus, Transaction, TxType};

use crate::load::{Load, Pending};
use crate::page::components::{card, content, format_timestamp, short_hash, status_color, sub_page_header, tx_title};
use crate::page::Page;
use crate::theme::Theme;
use crate::widgets::EventQueue;

pub const TRANSACTION_DETAILS_PAGE_ID: &str = "transaction_details";

/// values that need the wallet database
struct Context {
    wallet_name: String,
    best_height: u32,
    status: Option<TicketStatus>,
}

enum DetailsEvent {
    Back,
    CopyHash,
    OpenTicket,
}

pub struct TransactionDetailsPage {
    tx: Transaction,
    context: Option<Context>,
    loading: Option<Pending<zabuton_core::Result<Context>>>,
    ticket: Option<Pending<zabuton_core::Result<Option<Transaction>>>>,
    events: EventQueue<DetailsEvent>,
}

impl TransactionDetailsPage {
    pub fn new(tx: Transaction) -> Self {
        Self {
            tx,
            context: None,
            loading: None,
            ticket: None,
            events: EventQueue::new(),
        }
    }

    fn confirmations(&self) -> Option<u32> {
        self.context.as_ref().map(|ctx| self.tx.confirmations(ctx.best_height))
    }
}

fn row(ui: &mut egui::Ui, theme: &Theme, label: &str, value: impl Into<RichText>) {
    let c = theme.color;
    ui.horizontal(|ui| {
        ui.label(RichText::new(label).size(13.0).color(c.text_muted));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(value.into().size(13.0));
        });
    });
    ui.add_space(4.0);
}

impl Page for TransactionDetailsPage {
    fn id(&self) -> &'static str {
        TRANSACTION_DETAILS_PAGE_ID
    }

    fn on_navigated_to(&mut self, load: &mut Load) {
        let tx = self.tx.clone();
        self.loading = Some(load.spawn(move |mw| {
            let wallet = mw.wallet(tx.wallet_id)?;
            Ok(Context {
                wallet_name: wallet.name,
                best_height: mw.best_block().height,
                status: mw.ticket_status(&tx)?,
            })
        }));
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        while let Some(event) = self.events.pop() {
            match event {
                DetailsEvent::Back => load.pop_fragment(),
                DetailsEvent::CopyHash => {
                    let hash = self.tx.hash.clone();
                    load.ctx.output_mut(|o| o.copied_text = hash);
                    load.toast.notify("Transaction hash copied");
                }
                DetailsEvent::OpenTicket => {
                    if let Some(ticket_hash) = self.tx.ticket_hash.clone() {
                        let id = self.tx.wallet_id;
                        self.ticket = Some(load.spawn(move |mw| mw.get_transaction(id, &ticket_hash)));
                    }
                }
            }
        }

        if let Some(result) = self.loading.as_mut().and_then(Pending::poll) {
            self.loading = None;
            match result {
                Ok(ctx) => self.context = Some(ctx),
                Err(e) => load.toast.notify_error(e.to_string()),
            }
        }

        if let Some(result) = self.ticket.as_mut().and_then(Pending::poll) {
            self.ticket = None;
            match result {
                Ok(Some(ticket)) => load.change_fragment(TransactionDetailsPage::new(ticket)),
                Ok(None) => load.toast.notify_error("Ticket not found in this wallet"),
                Err(e) => load.toast.notify_error(e.to_string()),
            }
        }
    }

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        let theme = load.theme;
        let c = theme.color;
        content(ui, |ui| {
            if sub_page_header(ui, &theme, "Transaction details") {
                self.events.push(DetailsEvent::Back);
            }

            card(ui, &theme, |ui| {
                ui.label(RichText::new(tx_title(&self.tx)).size(16.0).color(c.text));
                ui.label(RichText::new(self.tx.amount.to_string()).size(22.0).color(c.text));
                ui.add_space(4.0);
                match self.confirmations() {
                    Some(0) => {
                        ui.label(RichText::new("Pending").size(13.0).color(c.warning));
                    }
                    Some(n) => {
                        ui.label(RichText::new(format!("Confirmed · {} confirmations", n)).size(13.0).color(c.success));
                    }
                    None => {
                        ui.spinner();
                    }
                }
            });
            ui.add_space(8.0);

            card(ui, &theme, |ui| {
                if let Some(ctx) = &self.context {
                    row(ui, &theme, "From", ctx.wallet_name.as_str());
                }
                row(ui, &theme, "Date", format_timestamp(self.tx.timestamp));
                row(ui, &theme, "Fee", self.tx.fee.to_string());
                let block = if self.tx.is_mined() { self.tx.block_height.to_string() } else { "-".to_string() };
                row(ui, &theme, "Included in block", block);
                if let Some(address) = &self.tx.address {
                    row(ui, &theme, "Address", short_hash(address));
                }
                if let Some(status) = self.context.as_ref().and_then(|ctx| ctx.status) {
                    row(ui, &theme, "Ticket status", RichText::new(status.to_string()).color(status_color(&theme, status)));
                }
                if let Some(ticket) = &self.tx.ticket_hash {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("Ticket").size(13.0).color(c.text_muted));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let link = egui::Button::new(RichText::new(short_hash(ticket)).size(13.0).color(c.primary))
                                .frame(false);
                            if ui.add(link).clicked() {
                                self.events.push(DetailsEvent::OpenTicket);
                            }
                        });
                    });
                }
            });
            ui.add_space(8.0);

            card(ui, &theme, |ui| {
                ui.label(RichText::new("Transaction ID").size(13.0).color(c.text_muted));
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&self.tx.hash).size(12.0).monospace().color(c.text));
                    if ui.button(icons::COPY).on_hover_text("Copy").clicked() {
                        self.events.push(DetailsEvent::CopyHash);
                    }
                });
            });

            if self.tx.tx_type == TxType::Ticket && self.tx.is_mined() {
                ui.add_space(8.0);
                ui.label(
                    RichText::new("Tickets vote on consensus changes while they are live.")
                        .size(12.0)
                        .color(c.text_faint),
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::testing::{load, render, render_until};
    use crate::load::NavRequest;
    use zabuton_core::{Amount, Direction};

    #[test]
    fn test_loads_confirmations_and_status() {
        let (mut load, _dir, _rt) = load();
        let w = load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        load.mw.set_best_block(1_000, 1_600_000_000).unwrap();
        let ticket = Transaction::new(w.id, TxType::Ticket, Direction::Transferred, Amount(100), Amount(1), 10, 1)
            .mined_at(900);
        load.mw.record_transaction(ticket.clone()).unwrap();

        let mut page = TransactionDetailsPage::new(ticket);
        page.on_navigated_to(&mut load);
        render_until(&mut page, &mut load, |p, _| p.context.is_some());
        assert_eq!(page.confirmations(), Some(101));
        let ctx = page.context.as_ref().unwrap();
        assert_eq!(ctx.wallet_name, "mywallet");
        assert_eq!(ctx.status, Some(TicketStatus::Live));
    }

    #[test]
    fn test_copy_hash_and_back() {
        let (mut load, _dir, _rt) = load();
        let w = load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let tx = Transaction::new(w.id, TxType::Regular, Direction::Received, Amount(5), Amount(0), 10, 1);
        let mut page = TransactionDetailsPage::new(tx);
        page.events.push(DetailsEvent::CopyHash);
        page.events.push(DetailsEvent::Back);
        render(&mut page, &mut load);
        assert_eq!(load.toast.current().map(|t| t.text.as_str()), Some("Transaction hash copied"));
        assert!(matches!(load.take_nav_requests().as_slice(), [NavRequest::PopFragment]));
    }

    #[test]
    fn test_vote_links_to_its_ticket() {
        let (mut load, _dir, _rt) = load();
        let w = load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let ticket = Transaction::new(w.id, TxType::Ticket, Direction::Transferred, Amount(100), Amount(1), 10, 1)
            .mined_at(10);
        let vote = Transaction::new(w.id, TxType::Vote, Direction::Received, Amount(101), Amount(0), 20, 2)
            .mined_at(50)
            .spending_ticket(ticket.hash.clone());
        load.mw.record_transaction(ticket).unwrap();
        load.mw.record_transaction(vote.clone()).unwrap();

        let mut page = TransactionDetailsPage::new(vote);
        page.events.push(DetailsEvent::OpenTicket);
        render(&mut page, &mut load);
        render_until(&mut page, &mut load, |p, _| p.ticket.is_none());
        assert!(matches!(load.take_nav_requests().as_slice(), [NavRequest::ChangeFragment(p)] if p.id() == TRANSACTION_DETAILS_PAGE_ID));
    }
}
