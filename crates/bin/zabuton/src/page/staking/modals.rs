//! ticket purchase and ticket buyer settings dialogs

use eframe::egui::{self, RichText};
use zabuton_core::{Amount, TicketBuyerConfig};

use crate::theme::Theme;
use crate::values::{STR_CANCEL, STR_SAVE};
use crate::widgets::modal::{footer, modal_window, submitted, ModalState};
use crate::widgets::{Editor, ModalAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub count: u32,
    pub password: String,
}

/// how many tickets to buy, confirmed with the spending password
pub struct PurchaseModal {
    wallet_name: String,
    price: Amount,
    count: Editor,
    password: Editor,
    pub state: ModalState,
}

impl PurchaseModal {
    pub fn new(wallet_name: impl Into<String>, price: Amount) -> Self {
        let mut count = Editor::new("purchase_count", "Number of tickets");
        count.set_text("1");
        Self {
            wallet_name: wallet_name.into(),
            price,
            count,
            password: Editor::password("purchase_password", "Spending password"),
            state: ModalState::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn fill(&mut self, count: &str, password: &str) {
        self.count.set_text(count);
        self.password.set_text(password);
    }

    pub fn ticket_count(&self) -> Option<u32> {
        self.count.text().trim().parse().ok().filter(|n| *n > 0)
    }

    pub fn total_cost(&self) -> Option<Amount> {
        self.ticket_count()
            .and_then(|n| self.price.0.checked_mul(i64::from(n)))
            .map(Amount)
    }

    fn ready(&self) -> bool {
        self.total_cost().is_some() && !self.password.text().is_empty()
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) -> ModalAction<Purchase> {
        let c = theme.color;
        let action = modal_window(ctx, "purchase", "Purchase tickets", theme, |ui| {
            ui.label(RichText::new(format!("Wallet: {}", self.wallet_name)).size(13.0).color(c.text_muted));
            ui.label(RichText::new(format!("Ticket price: {}", self.price)).size(13.0).color(c.text_muted));
            ui.add_space(8.0);
            self.count.layout(ui, theme);
            match (self.ticket_count(), self.total_cost()) {
                (_, Some(total)) => ui.label(RichText::new(format!("Total: {}", total)).size(12.0).color(c.text_faint)),
                (Some(_), None) => ui.label(RichText::new("Too many tickets").size(12.0).color(c.danger)),
                (None, None) => ui.label(RichText::new("Enter a number of tickets").size(12.0).color(c.danger)),
            };
            ui.add_space(6.0);
            self.password.layout(ui, theme);
            self.state.layout_error(ui, theme);

            let ready = self.ready();
            let clicked = footer(ui, theme, Some(STR_CANCEL), "Purchase", ready, self.state.is_loading());
            let submit = submitted(&mut self.password) && ready && !self.state.is_loading();
            self.count.events().for_each(drop);
            if submit {
                ModalAction::Positive(())
            } else {
                clicked
            }
        });

        match action {
            Some(ModalAction::Positive(())) => match self.ticket_count().filter(|_| self.total_cost().is_some()) {
                Some(count) => {
                    self.state.set_loading(true);
                    ModalAction::Positive(Purchase {
                        count,
                        password: self.password.text().to_string(),
                    })
                }
                None => ModalAction::None,
            },
            Some(ModalAction::Negative) => ModalAction::Negative,
            _ => ModalAction::None,
        }
    }
}

/// vsp, purchase account and balance to maintain for the ticket buyer
pub struct TicketBuyerModal {
    vsp_host: Editor,
    balance: Editor,
    account: u32,
    pub state: ModalState,
}

impl TicketBuyerModal {
    pub fn new(existing: Option<&TicketBuyerConfig>) -> Self {
        let mut vsp_host = Editor::new("tb_vsp", "VSP host").required();
        let mut balance = Editor::new("tb_balance", "Balance to maintain (DCR)");
        let mut account = 0;
        if let Some(cfg) = existing {
            vsp_host.set_text(cfg.vsp_host.clone());
            balance.set_text(cfg.balance_to_maintain.to_coins().to_string());
            account = cfg.purchase_account;
        }
        Self {
            vsp_host,
            balance,
            account,
            state: ModalState::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn fill(&mut self, vsp: &str, balance: &str) {
        self.vsp_host.set_text(vsp);
        self.balance.set_text(balance);
    }

    /// an empty balance field means keep nothing back
    pub fn config(&self) -> Option<TicketBuyerConfig> {
        let host = self.vsp_host.text().trim();
        if host.is_empty() {
            return None;
        }
        let raw = self.balance.text().trim();
        let coins: f64 = if raw.is_empty() { 0.0 } else { raw.parse().ok()? };
        if !coins.is_finite() || coins < 0.0 {
            return None;
        }
        Some(TicketBuyerConfig {
            vsp_host: host.to_string(),
            purchase_account: self.account,
            balance_to_maintain: Amount::from_coins(coins),
        })
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) -> ModalAction<TicketBuyerConfig> {
        let c = theme.color;
        let action = modal_window(ctx, "ticket_buyer", "Auto ticket purchase", theme, |ui| {
            self.vsp_host.layout(ui, theme);
            ui.add_space(6.0);
            ui.label(RichText::new("Purchase account: default").size(13.0).color(c.text_muted));
            ui.add_space(6.0);
            self.balance.layout(ui, theme);
            self.state.layout_error(ui, theme);
            self.vsp_host.events().for_each(drop);
            self.balance.events().for_each(drop);
            footer(ui, theme, Some(STR_CANCEL), STR_SAVE, self.config().is_some(), self.state.is_loading())
        });

        match action {
            Some(ModalAction::Positive(())) => match self.config() {
                Some(cfg) => ModalAction::Positive(cfg),
                None => ModalAction::None,
            },
            Some(ModalAction::Negative) => ModalAction::Negative,
            _ => ModalAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_count_parsing() {
        let mut m = PurchaseModal::new("mywallet", Amount(100));
        assert_eq!(m.ticket_count(), Some(1));
        m.fill("3", "");
        assert_eq!(m.total_cost(), Some(Amount(300)));
        assert!(!m.ready());
        m.fill("0", "pass");
        assert_eq!(m.ticket_count(), None);
        m.fill("two", "pass");
        assert!(!m.ready());
        m.fill(" 2 ", "pass");
        assert!(m.ready());
    }

    #[test]
    fn test_purchase_total_overflow() {
        let mut m = PurchaseModal::new("mywallet", Amount::from_coins(100.0));
        m.fill(&u32::MAX.to_string(), "pass");
        assert_eq!(m.ticket_count(), Some(u32::MAX));
        assert_eq!(m.total_cost(), None);
        assert!(!m.ready());
    }

    #[test]
    fn test_ticket_buyer_config() {
        let mut m = TicketBuyerModal::new(None);
        assert_eq!(m.config(), None);
        m.fill("vsp.example.org", "");
        assert_eq!(m.config().unwrap().balance_to_maintain, Amount(0));
        m.fill("vsp.example.org", "-1");
        assert_eq!(m.config(), None);
        m.fill("vsp.example.org", "1.5");
        let cfg = m.config().unwrap();
        assert_eq!(cfg.balance_to_maintain, Amount::from_coins(1.5));

        let again = TicketBuyerModal::new(Some(&cfg));
        assert_eq!(again.config(), Some(cfg));
    }
}
