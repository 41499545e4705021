//! eframe glue: one navigator, one toast, app-wide notifications

use eframe::egui;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::{debug, info};
use zabuton_core::{config, MultiWallet, Notification};

use crate::load::{Listener, Load};
use crate::logbuf::LogBuffer;
use crate::page::start::StartPage;
use crate::page::Navigator;
use crate::theme::install_fonts;

pub struct ZabutonApp {
    load: Load,
    nav: Navigator,
    listener: Listener,
    closing: bool,
}

impl ZabutonApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        mw: Arc<MultiWallet>,
        runtime: tokio::runtime::Handle,
        logs: LogBuffer,
        rng: StdRng,
    ) -> Self {
        install_fonts(&cc.egui_ctx);
        let mut load = Load::new(mw, cc.egui_ctx.clone(), runtime, logs, rng);
        load.theme.apply(&cc.egui_ctx);
        let listener = load.listen();
        let nav = Navigator::new(Box::new(StartPage::new()), &mut load);
        Self {
            load,
            nav,
            listener,
            closing: false,
        }
    }
}

/// toast text for a notification the user opted into
fn notification_text(mw: &MultiWallet, note: &Notification) -> Option<String> {
    let cfg = mw.config();
    let wallet_name = |id: u32| mw.wallet(id).map(|w| w.name).unwrap_or_else(|_| format!("wallet {}", id));
    match note {
        Notification::NewTransaction { wallet_id, .. } if cfg.read_bool(config::TRANSACTION_NOTIFICATION, false) => {
            Some(format!("New transaction in {}", wallet_name(*wallet_id)))
        }
        Notification::BlockConnected { height } if cfg.read_bool(config::BEEP_NEW_BLOCKS, false) => {
            Some(format!("New block {}", height))
        }
        Notification::TicketBuyerStopped { wallet_id } => {
            Some(format!("Auto ticket purchase stopped for {}", wallet_name(*wallet_id)))
        }
        _ => None,
    }
}

impl eframe::App for ZabutonApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for note in self.listener.poll() {
            debug!("notification {:?}", note);
            if let Some(text) = notification_text(&self.load.mw, &note) {
                if matches!(note, Notification::BlockConnected { .. }) {
                    ctx.send_viewport_cmd(egui::ViewportCommand::RequestUserAttention(
                        egui::UserAttentionType::Informational,
                    ));
                }
                self.load.toast.notify(text);
            }
        }

        let theme = self.load.theme;
        let frame = egui::Frame::none().fill(theme.color.background).inner_margin(16.0);
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            self.nav.frame(ui, &mut self.load);
        });
        self.load.toast.layout(ctx, &self.load.theme);

        if self.nav.apply(&mut self.load) && !self.closing {
            self.closing = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("shutting down");
        self.load.mw.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::testing::load;

    #[test]
    fn test_notifications_follow_preferences() {
        let (load, _dir, _rt) = load();
        let mw = &load.mw;
        let w = mw.create_new_wallet("mywallet", "secret1").unwrap();
        let tx = Notification::NewTransaction {
            wallet_id: w.id,
            hash: "ab".into(),
        };
        let block = Notification::BlockConnected { height: 7 };

        assert_eq!(notification_text(mw, &tx), None);
        assert_eq!(notification_text(mw, &block), None);

        mw.config().save_bool(config::TRANSACTION_NOTIFICATION, true).unwrap();
        mw.config().save_bool(config::BEEP_NEW_BLOCKS, true).unwrap();
        assert_eq!(notification_text(mw, &tx).as_deref(), Some("New transaction in mywallet"));
        assert_eq!(notification_text(mw, &block).as_deref(), Some("New block 7"));

        let stopped = Notification::TicketBuyerStopped { wallet_id: w.id };
        assert_eq!(
            notification_text(mw, &stopped).as_deref(),
            Some("Auto ticket purchase stopped for mywallet")
        );
    }
}
