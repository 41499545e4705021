use eframe::egui::{self, RichText, Sense};
use egui_phosphor::regular as icons;
use std::time::Duration;
use zabuton_core::{BlockInfo, TxFilter};

use super::components::{card, content, format_timestamp, sub_page_header, text_button};
use super::Page;
use crate::load::{Load, Pending};
use crate::widgets::EventQueue;

pub const DEBUG_PAGE_ID: &str = "debug";
pub const LOG_PAGE_ID: &str = "log";
pub const STATISTICS_PAGE_ID: &str = "statistics";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebugItem {
    Logs,
    Statistics,
}

const DEBUG_ITEMS: [(DebugItem, &str); 2] = [
    (DebugItem::Logs, "Check wallet logs"),
    (DebugItem::Statistics, "Check statistics"),
];

enum DebugEvent {
    Back,
    Open(DebugItem),
}

pub struct DebugPage {
    events: EventQueue<DebugEvent>,
}

impl DebugPage {
    pub fn new() -> Self {
        Self { events: EventQueue::new() }
    }
}

impl Default for DebugPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for DebugPage {
    fn id(&self) -> &'static str {
        DEBUG_PAGE_ID
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        while let Some(event) = self.events.pop() {
            match event {
                DebugEvent::Back => load.pop_fragment(),
                DebugEvent::Open(DebugItem::Logs) => load.change_fragment(LogPage::new()),
                DebugEvent::Open(DebugItem::Statistics) => load.change_fragment(StatPage::new()),
            }
        }
    }

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        let theme = load.theme;
        let c = theme.color;
        content(ui, |ui| {
            if sub_page_header(ui, &theme, "Debug") {
                self.events.push(DebugEvent::Back);
            }
            card(ui, &theme, |ui| {
                for (i, (item, text)) in DEBUG_ITEMS.iter().enumerate() {
                    let row = ui
                        .horizontal(|ui| {
                            ui.add_space(4.0);
                            ui.label(RichText::new(*text).size(14.0).color(c.text));
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.label(RichText::new(icons::CARET_RIGHT).size(16.0).color(c.text_faint));
                            });
                        })
                        .response
                        .interact(Sense::click());
                    if row.clicked() {
                        self.events.push(DebugEvent::Open(*item));
                    }
                    if i + 1 < DEBUG_ITEMS.len() {
                        ui.separator();
                    }
                }
            });
        });
    }
}

enum LogEvent {
    Back,
    Copy,
}

/// tail of the in-memory log buffer
pub struct LogPage {
    lines: Vec<String>,
    events: EventQueue<LogEvent>,
}

impl LogPage {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            events: EventQueue::new(),
        }
    }
}

impl Default for LogPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for LogPage {
    fn id(&self) -> &'static str {
        LOG_PAGE_ID
    }

    fn on_navigated_to(&mut self, load: &mut Load) {
        self.lines = load.logs.snapshot();
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        while let Some(event) = self.events.pop() {
            match event {
                LogEvent::Back => load.pop_fragment(),
                LogEvent::Copy => {
                    let text = self.lines.join("\n");
                    load.ctx.output_mut(|o| o.copied_text = text);
                    load.toast.notify("Copied");
                }
            }
        }
        // follow new lines while the page is open
        if load.logs.len() != self.lines.len() {
            self.lines = load.logs.snapshot();
        }
    }

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        let theme = load.theme;
        let c = theme.color;
        content(ui, |ui| {
            ui.horizontal(|ui| {
                if sub_page_header(ui, &theme, "Wallet log") {
                    self.events.push(LogEvent::Back);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if text_button(ui, &theme, icons::COPY) {
                        self.events.push(LogEvent::Copy);
                    }
                });
            });
            card(ui, &theme, |ui| {
                egui::ScrollArea::vertical()
                    .id_source("log_lines")
                    .stick_to_bottom(true)
                    .max_height(ui.available_height().max(360.0))
                    .show(ui, |ui| {
                        for line in &self.lines {
                            ui.label(RichText::new(line).size(11.0).color(c.text_muted).monospace());
                        }
                    });
            });
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Stats {
    network: String,
    best_block: BlockInfo,
    connected: bool,
    wallets: usize,
    transactions: usize,
}

fn collect_stats(mw: &zabuton_core::MultiWallet) -> Stats {
    let wallets = mw.sorted_wallet_list();
    let transactions = wallets
        .iter()
        .filter_map(|w| mw.count_transactions(w.id, TxFilter::All).ok())
        .sum();
    Stats {
        network: mw.net_type().display_name().to_string(),
        best_block: mw.best_block(),
        connected: mw.is_connected_to_network(),
        wallets: wallets.len(),
        transactions,
    }
}

fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {}m {}s", h, m, s)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}

enum StatEvent {
    Back,
}

/// network and wallet statistics
pub struct StatPage {
    stats: Option<Stats>,
    loading: Option<Pending<Stats>>,
    events: EventQueue<StatEvent>,
}

impl StatPage {
    pub fn new() -> Self {
        Self {
            stats: None,
            loading: None,
            events: EventQueue::new(),
        }
    }
}

impl Default for StatPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for StatPage {
    fn id(&self) -> &'static str {
        STATISTICS_PAGE_ID
    }

    fn on_navigated_to(&mut self, load: &mut Load) {
        self.loading = Some(load.spawn(collect_stats));
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        while let Some(event) = self.events.pop() {
            match event {
                StatEvent::Back => load.pop_fragment(),
            }
        }
        if let Some(stats) = self.loading.as_mut().and_then(Pending::poll) {
            self.loading = None;
            self.stats = Some(stats);
        }
    }

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        let theme = load.theme;
        let c = theme.color;
        let uptime = format_uptime(load.started_at.elapsed());
        content(ui, |ui| {
            if sub_page_header(ui, &theme, "Statistics") {
                self.events.push(StatEvent::Back);
            }
            let Some(stats) = &self.stats else {
                ui.add(egui::Spinner::new());
                return;
            };
            let last_block = if stats.best_block.timestamp > 0 {
                format_timestamp(stats.best_block.timestamp)
            } else {
                "-".to_string()
            };
            let rows = [
                ("Network", stats.network.clone()),
                ("Connected", if stats.connected { "Yes" } else { "No" }.to_string()),
                ("Best block", stats.best_block.height.to_string()),
                ("Last block time", last_block),
                ("Wallets", stats.wallets.to_string()),
                ("Transactions", stats.transactions.to_string()),
                ("Uptime", uptime),
            ];
            card(ui, &theme, |ui| {
                egui::Grid::new("stats").num_columns(2).spacing([24.0, 10.0]).show(ui, |ui| {
                    for (label, value) in rows {
                        ui.label(RichText::new(label).size(13.0).color(c.text_muted));
                        ui.label(RichText::new(value).size(13.0).color(c.text));
                        ui.end_row();
                    }
                });
            });
        });
        // uptime ticks
        ui.ctx().request_repaint_after(Duration::from_secs(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::testing::{load, render, render_until};
    use crate::load::NavRequest;
    use zabuton_core::{Amount, Direction, Transaction, TxType};

    #[test]
    fn test_items_open_sub_pages() {
        let (mut load, _dir, _rt) = load();
        let mut page = DebugPage::new();
        page.events.push(DebugEvent::Open(DebugItem::Logs));
        page.events.push(DebugEvent::Open(DebugItem::Statistics));
        render(&mut page, &mut load);
        let ids: Vec<&str> = load
            .take_nav_requests()
            .iter()
            .filter_map(|r| match r {
                NavRequest::ChangeFragment(p) => Some(p.id()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![LOG_PAGE_ID, STATISTICS_PAGE_ID]);
    }

    #[test]
    fn test_log_page_shows_buffer() {
        let (mut load, _dir, _rt) = load();
        load.logs.push("first line");
        let mut page = LogPage::new();
        page.on_navigated_to(&mut load);
        assert_eq!(page.lines, vec!["first line".to_string()]);

        load.logs.push("second line");
        render(&mut page, &mut load);
        assert_eq!(page.lines.len(), 2);
    }

    #[test]
    fn test_stats_count_wallets_and_transactions() {
        let (mut load, _dir, _rt) = load();
        let wallet = load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let tx = Transaction::new(wallet.id, TxType::Regular, Direction::Received, Amount(500), Amount(0), 1, 1);
        load.mw.record_transaction(tx).unwrap();
        load.mw.set_best_block(42, 1_600_000_000).unwrap();

        let mut page = StatPage::new();
        page.on_navigated_to(&mut load);
        render_until(&mut page, &mut load, |p, _| p.stats.is_some());
        let stats = page.stats.unwrap();
        assert_eq!(stats.wallets, 1);
        assert_eq!(stats.transactions, 1);
        assert_eq!(stats.best_block.height, 42);
        assert_eq!(stats.network, "Testnet");
    }

    #[test]
    fn test_uptime_format() {
        assert_eq!(format_uptime(Duration::from_secs(5)), "5s");
        assert_eq!(format_uptime(Duration::from_secs(65)), "1m 5s");
        assert_eq!(format_uptime(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
