use eframe::egui::{self, RichText};
use tracing::info;
use zabuton_core::seed::{validate_seed, SEED_WORD_COUNT};
use zabuton_core::{wordlist, Wallet};

use crate::load::{Load, Pending};
use crate::page::components::{card, content, primary_button, sub_page_header, text_button};
use crate::page::main_page::MainPage;
use crate::page::Page;
use crate::values::{DEFAULT_WALLET_NAME, MIN_PASSWORD_LEN};
use crate::widgets::{Editor, EditorEvent, EventQueue, RestoreEditor};

pub const RESTORE_PAGE_ID: &str = "restore";

const COLUMNS: usize = 3;

enum RestoreEvent {
    Back,
    Clear,
    Restore,
}

/// restore a wallet from its 24 word seed
pub struct RestorePage {
    words: Vec<RestoreEditor>,
    name: Editor,
    password: Editor,
    confirm: Editor,
    error: Option<String>,
    restoring: Option<Pending<zabuton_core::Result<Wallet>>>,
    events: EventQueue<RestoreEvent>,
}

impl RestorePage {
    pub fn new() -> Self {
        let mut name = Editor::new("restore_name", "Wallet name").required();
        name.set_text(DEFAULT_WALLET_NAME);
        Self {
            words: (1..=SEED_WORD_COUNT).map(RestoreEditor::new).collect(),
            name,
            password: Editor::password("restore_password", "Spending password"),
            confirm: Editor::password("restore_confirm", "Confirm spending password"),
            error: None,
            restoring: None,
            events: EventQueue::new(),
        }
    }

    fn phrase(&self) -> String {
        self.words.iter().map(RestoreEditor::word).collect::<Vec<_>>().join(" ")
    }

    /// 1-based positions holding a word outside the wordlist
    fn unknown_words(&self) -> Vec<usize> {
        let list = wordlist();
        self.words
            .iter()
            .filter(|w| {
                let word = w.word();
                !word.is_empty() && !list.contains(&word.as_str())
            })
            .map(|w| w.number)
            .collect()
    }

    fn all_filled(&self) -> bool {
        self.words.iter().all(|w| !w.word().is_empty())
    }

    fn passwords_ok(&self) -> bool {
        let pass = self.password.text();
        pass.len() >= MIN_PASSWORD_LEN && pass == self.confirm.text()
    }

    fn can_restore(&self) -> bool {
        self.restoring.is_none()
            && self.all_filled()
            && self.unknown_words().is_empty()
            && self.passwords_ok()
            && !self.name.text().trim().is_empty()
    }

    /// a pasted phrase in any box spreads across the boxes from there on
    fn spread_pasted(&mut self) {
        let Some(start) = self.words.iter().position(|w| w.edit.text().split_whitespace().count() > 1) else {
            return;
        };
        let pasted: Vec<String> = self.words[start]
            .edit
            .text()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        for (editor, word) in self.words[start..].iter_mut().zip(pasted) {
            editor.edit.set_text(word);
        }
    }

    fn clear(&mut self) {
        for w in &mut self.words {
            w.edit.set_text("");
        }
        self.password.set_text("");
        self.confirm.set_text("");
        self.error = None;
    }
}

impl Default for RestorePage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for RestorePage {
    fn id(&self) -> &'static str {
        RESTORE_PAGE_ID
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        let mut changed = false;
        for w in &mut self.words {
            changed |= w.edit.events().any(|e| e == EditorEvent::Changed);
        }
        if changed {
            self.spread_pasted();
            self.error = None;
        }
        if self.confirm.events().any(|e| e == EditorEvent::Submit) && self.can_restore() {
            self.events.push(RestoreEvent::Restore);
        }
        self.password.events().for_each(drop);
        self.name.events().for_each(drop);

        while let Some(event) = self.events.pop() {
            match event {
                RestoreEvent::Back => load.pop_fragment(),
                RestoreEvent::Clear => self.clear(),
                RestoreEvent::Restore => {
                    let phrase = self.phrase();
                    if !validate_seed(&phrase) {
                        self.error = Some("Invalid seed phrase".into());
                        continue;
                    }
                    let name = self.name.text().trim().to_string();
                    let password = self.password.text().to_string();
                    self.restoring = Some(load.spawn(move |mw| mw.restore_wallet(&name, &phrase, &password)));
                }
            }
        }

        if let Some(result) = self.restoring.as_mut().and_then(Pending::poll) {
            self.restoring = None;
            match result {
                Ok(wallet) => {
                    info!("restored wallet {}", wallet.id);
                    load.toast.notify("Wallet restored");
                    load.change_window_page(MainPage::new());
                }
                Err(e) => self.error = Some(e.to_string()),
            }
        }
    }

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        let theme = load.theme;
        let c = theme.color;
        let unknown = self.unknown_words();
        content(ui, |ui| {
            if sub_page_header(ui, &theme, "Restore from seed phrase") {
                self.events.push(RestoreEvent::Back);
            }
            card(ui, &theme, |ui| {
                ui.label(RichText::new("Enter your seed phrase in the correct order").size(12.0).color(c.text_muted));
                ui.add_space(8.0);
                egui::Grid::new("restore_words")
                    .num_columns(COLUMNS)
                    .spacing([8.0, 8.0])
                    .show(ui, |ui| {
                        for (i, w) in self.words.iter_mut().enumerate() {
                            ui.vertical(|ui| {
                                ui.set_width(160.0);
                                w.layout(ui, &theme);
                            });
                            if (i + 1) % COLUMNS == 0 {
                                ui.end_row();
                            }
                        }
                    });
                if !unknown.is_empty() {
                    let list = unknown.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(", ");
                    ui.label(RichText::new(format!("Unknown word at {}", list)).size(11.0).color(c.danger));
                }
            });
            ui.add_space(12.0);
            card(ui, &theme, |ui| {
                self.name.layout(ui, &theme);
                ui.add_space(6.0);
                self.password.layout(ui, &theme);
                ui.add_space(6.0);
                self.confirm.layout(ui, &theme);
                if !self.confirm.text().is_empty() && self.confirm.text() != self.password.text() {
                    ui.label(RichText::new("passwords do not match").size(11.0).color(c.danger));
                }
                if let Some(e) = &self.error {
                    ui.label(RichText::new(e).size(12.0).color(c.danger));
                }
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if text_button(ui, &theme, "Clear all") {
                        self.events.push(RestoreEvent::Clear);
                    }
                    if self.restoring.is_some() {
                        ui.add(egui::Spinner::new());
                    } else if primary_button(ui, &theme, "Restore", self.can_restore()) {
                        self.events.push(RestoreEvent::Restore);
                    }
                });
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::testing::{load, render_until};
    use crate::load::NavRequest;
    use zabuton_core::SeedPhrase;

    fn fill(page: &mut RestorePage, phrase: &str) {
        for (editor, word) in page.words.iter_mut().zip(phrase.split_whitespace()) {
            editor.edit.set_text(word);
        }
    }

    #[test]
    fn test_paste_spreads_words() {
        let seed = SeedPhrase::generate().unwrap();
        let mut page = RestorePage::new();
        page.words[0].edit.set_text(seed.as_str());
        page.spread_pasted();
        assert_eq!(page.phrase(), seed.as_str());
    }

    #[test]
    fn test_unknown_words_flagged() {
        let mut page = RestorePage::new();
        page.words[2].edit.set_text("abandon");
        page.words[4].edit.set_text("notaword");
        assert_eq!(page.unknown_words(), vec![5]);
        assert!(!page.can_restore());
    }

    #[test]
    fn test_restore_flow() {
        let (mut load, _dir, _rt) = load();
        let seed = SeedPhrase::generate().unwrap();
        let mut page = RestorePage::new();
        fill(&mut page, seed.as_str());
        page.password.set_text("secret1");
        page.confirm.set_text("secret1");
        assert!(page.can_restore());

        page.events.push(RestoreEvent::Restore);
        render_until(&mut page, &mut load, |p, l| p.restoring.is_none() && l.mw.loaded_wallets_count() == 1);
        let nav = load.take_nav_requests();
        assert!(matches!(nav.as_slice(), [NavRequest::ChangeWindowPage(_)]));
        let wallets = load.mw.sorted_wallet_list();
        assert_eq!(wallets[0].name, DEFAULT_WALLET_NAME);
        assert!(wallets[0].seed_backed_up);
    }
}
