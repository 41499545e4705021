//! layout pieces shared between pages

use eframe::egui::{self, Color32, RichText, Sense};
use egui_phosphor::regular as icons;
use zabuton_core::{Direction, TicketStatus, Transaction, TxType, Wallet};

use crate::theme::Theme;
use crate::values::{MAX_CONTENT_WIDTH, STR_INVALID_PASSWORD};
use crate::widgets::{DropDown, DropDownItem};

/// user facing text for a wallet error
pub fn translate_err(e: &zabuton_core::Error) -> String {
    if e.is_invalid_passphrase() {
        STR_INVALID_PASSWORD.to_string()
    } else {
        e.to_string()
    }
}

/// scrollable centred column
pub fn content<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let width = ui.available_width().min(MAX_CONTENT_WIDTH);
            let margin = ((ui.available_width() - width) / 2.0).max(0.0);
            ui.horizontal(|ui| {
                ui.add_space(margin);
                ui.vertical(|ui| {
                    ui.set_width(width);
                    ui.add_space(16.0);
                    add_contents(ui)
                })
                .inner
            })
            .inner
        })
        .inner
}

pub fn card<R>(ui: &mut egui::Ui, theme: &Theme, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::none()
        .fill(theme.color.surface)
        .rounding(12.0)
        .inner_margin(egui::Margin::same(16.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

/// back arrow plus title; true when back was pressed
pub fn sub_page_header(ui: &mut egui::Ui, theme: &Theme, title: &str) -> bool {
    let c = theme.color;
    let mut back = false;
    ui.horizontal(|ui| {
        let btn = egui::Button::new(RichText::new(icons::ARROW_LEFT).size(18.0).color(c.text)).frame(false);
        if ui.add(btn).clicked() {
            back = true;
        }
        ui.label(RichText::new(title).size(20.0).color(c.text));
    });
    ui.add_space(8.0);
    back
}

pub fn section_title(ui: &mut egui::Ui, theme: &Theme, text: &str) {
    ui.label(RichText::new(text).size(12.0).color(theme.color.text_muted));
}

pub fn primary_button(ui: &mut egui::Ui, theme: &Theme, text: &str, enabled: bool) -> bool {
    let fill = if enabled { theme.color.primary } else { theme.color.border };
    let btn = egui::Button::new(RichText::new(text).size(14.0).color(Color32::WHITE))
        .fill(fill)
        .min_size(egui::vec2(120.0, 36.0));
    ui.add_enabled(enabled, btn).clicked()
}

pub fn text_button(ui: &mut egui::Ui, theme: &Theme, text: &str) -> bool {
    let btn = egui::Button::new(RichText::new(text).size(13.0).color(theme.color.primary)).frame(false);
    ui.add(btn).clicked()
}

pub fn wallet_dropdown(id: &str, wallets: &[Wallet], group: u32) -> DropDown {
    DropDown::new(id, wallet_items(wallets), group)
}

pub fn wallet_items(wallets: &[Wallet]) -> Vec<DropDownItem> {
    wallets
        .iter()
        .map(|w| DropDownItem::new(w.name.clone()).with_icon(icons::WALLET))
        .collect()
}

pub fn order_dropdown(id: &str, group: u32) -> DropDown {
    DropDown::from_labels(id, &["Newest", "Oldest"], group)
}

/// index 0 of the order dropdown is "Newest"
pub fn newest_first(order: &DropDown) -> bool {
    order.selected_index() == 0
}

pub fn format_timestamp(ts: i64) -> String {
    match chrono::DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.format("%b %d, %Y %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// abcdef12...9876abcd
pub fn short_hash(hash: &str) -> String {
    if hash.len() > 20 {
        format!("{}...{}", &hash[..8], &hash[hash.len() - 8..])
    } else {
        hash.to_string()
    }
}

pub fn tx_title(tx: &Transaction) -> &'static str {
    match (tx.tx_type, tx.direction) {
        (TxType::Regular, Direction::Sent) => "Sent",
        (TxType::Regular, Direction::Received) => "Received",
        (TxType::Regular, Direction::Transferred) => "Yourself",
        (TxType::Mixed, _) => "Mixed",
        (TxType::Ticket, _) => "Ticket",
        (TxType::Vote, _) => "Vote",
        (TxType::Revocation, _) => "Revocation",
    }
}

fn tx_icon(tx: &Transaction) -> &'static str {
    match (tx.tx_type, tx.direction) {
        (TxType::Regular, Direction::Sent) => icons::ARROW_UP_RIGHT,
        (TxType::Regular, Direction::Received) => icons::ARROW_DOWN_LEFT,
        (TxType::Regular, Direction::Transferred) => icons::ARROWS_LEFT_RIGHT,
        (TxType::Mixed, _) => icons::SHUFFLE,
        (TxType::Ticket, _) => icons::TICKET,
        (TxType::Vote, _) => icons::CHECK_CIRCLE,
        (TxType::Revocation, _) => icons::X_CIRCLE,
    }
}

pub fn status_color(theme: &Theme, status: TicketStatus) -> Color32 {
    let c = theme.color;
    match status {
        TicketStatus::Unmined | TicketStatus::Immature => c.warning,
        TicketStatus::Live => c.primary,
        TicketStatus::Voted => c.success,
        TicketStatus::Revoked | TicketStatus::Expired => c.danger,
    }
}

/// one clickable transaction line
pub fn tx_row(ui: &mut egui::Ui, theme: &Theme, tx: &Transaction, status: Option<TicketStatus>) -> egui::Response {
    let c = theme.color;
    let amount_color = match tx.direction {
        Direction::Received => c.success,
        Direction::Sent => c.text,
        Direction::Transferred => c.text_muted,
    };
    egui::Frame::none()
        .inner_margin(egui::Margin::symmetric(4.0, 6.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(tx_icon(tx)).size(18.0).color(c.primary));
                ui.vertical(|ui| {
                    ui.label(RichText::new(tx_title(tx)).size(13.0).color(c.text));
                    let when = if tx.is_mined() {
                        format_timestamp(tx.timestamp)
                    } else {
                        "Pending".to_string()
                    };
                    ui.label(RichText::new(when).size(11.0).color(c.text_faint));
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(status) = status {
                        ui.label(RichText::new(status.to_string()).size(11.0).color(status_color(theme, status)));
                    }
                    ui.label(RichText::new(tx.amount.to_string()).size(13.0).color(amount_color).monospace());
                });
            });
        })
        .response
        .interact(Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zabuton_core::Amount;

    #[test]
    fn test_translate_err() {
        assert_eq!(translate_err(&zabuton_core::Error::InvalidPassphrase), "Invalid password");
        assert_eq!(translate_err(&zabuton_core::Error::NotConnected), "not connected to the network");
    }

    #[test]
    fn test_short_hash() {
        assert_eq!(short_hash("abc"), "abc");
        let h = "0123456789abcdef0123456789abcdef";
        assert_eq!(short_hash(h), "01234567...89abcdef");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "Jan 01, 1970 00:00");
    }

    #[test]
    fn test_tx_titles() {
        let tx = Transaction::new(1, TxType::Regular, Direction::Transferred, Amount(1), Amount(0), 0, 0);
        assert_eq!(tx_title(&tx), "Yourself");
        let tx = Transaction::new(1, TxType::Vote, Direction::Received, Amount(1), Amount(0), 0, 0);
        assert_eq!(tx_title(&tx), "Vote");
    }
}
