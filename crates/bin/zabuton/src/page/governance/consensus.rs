//! on-chain agenda voting for the selected wallet

use std::time::{Duration, Instant};

use eframe::egui::{self, RichText};
use egui_phosphor::regular as icons;
use tracing::info;
use zabuton_core::{Agenda, AgendaStatus, Wallet};

use crate::load::{Load, Pending};
use crate::page::components::{card, content, newest_first, order_dropdown, translate_err, wallet_dropdown, wallet_items};
use crate::page::Page;
use crate::theme::Theme;
use crate::values::{CONSENSUS_DROPDOWN_GROUP, STR_CANCEL, STR_GOT_IT};
use crate::widgets::modal::{footer, modal_window, ModalState};
use crate::widgets::{display_one_dropdown, DropDown, Editor, EventQueue, InfoModal, ModalAction, PasswordModal};

pub const CONSENSUS_PAGE_ID: &str = "consensus";

/// how long "Updated" stays after a fetch
const UPDATED_VISIBLE: Duration = Duration::from_secs(1);

/// pick one of an agenda's choices
pub struct VoteModal {
    agenda_id: String,
    choices: Vec<(String, String)>,
    selected: String,
    current: String,
    pub state: ModalState,
}

impl VoteModal {
    pub fn new(agenda: &Agenda) -> Self {
        Self {
            agenda_id: agenda.agenda_id.clone(),
            choices: agenda.choices.iter().map(|c| (c.id.clone(), c.description.clone())).collect(),
            selected: agenda.voting_preference.clone(),
            current: agenda.voting_preference.clone(),
            state: ModalState::default(),
        }
    }

    pub fn select(&mut self, choice: &str) {
        if self.choices.iter().any(|(id, _)| id == choice) {
            self.selected = choice.to_string();
        }
    }

    fn changed(&self) -> bool {
        self.selected != self.current
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) -> ModalAction<String> {
        let c = theme.color;
        let title = format!("Voting for {}", self.agenda_id);
        let action = modal_window(ctx, "agenda_vote", &title, theme, |ui| {
            ui.label(RichText::new("Select your preference").size(13.0).color(c.text_muted));
            ui.add_space(6.0);
            for (id, description) in &self.choices {
                ui.radio_value(&mut self.selected, id.clone(), RichText::new(id).size(14.0).color(c.text));
                ui.label(RichText::new(description).size(12.0).color(c.text_faint));
                ui.add_space(4.0);
            }
            self.state.layout_error(ui, theme);
            footer(ui, theme, Some(STR_CANCEL), "Update Preference", self.changed(), self.state.is_loading())
        });
        match action {
            Some(ModalAction::Positive(())) => ModalAction::Positive(self.selected.clone()),
            Some(ModalAction::Negative) => ModalAction::Negative,
            _ => ModalAction::None,
        }
    }
}

enum Dialog {
    Info(InfoModal),
    Dashboard(InfoModal),
    Vote(VoteModal),
    /// the choice is made, the spending password signs it
    Password { agenda: String, choice: String, modal: PasswordModal },
}

enum ConsensusEvent {
    Sync,
    Info,
    Dashboard,
    Vote(usize),
    Dialog(ModalAction<String>),
}

pub struct ConsensusPage {
    wallets: Vec<Wallet>,
    wallet_dropdown: DropDown,
    order_dropdown: DropDown,
    search: Editor,
    agendas: Vec<Agenda>,
    fetching: Option<Pending<zabuton_core::Result<Vec<Agenda>>>>,
    synced_at: Option<Instant>,
    voting: Option<Pending<zabuton_core::Result<()>>>,
    dialog: Option<Dialog>,
    events: EventQueue<ConsensusEvent>,
}

impl ConsensusPage {
    pub fn new() -> Self {
        Self {
            wallets: Vec::new(),
            wallet_dropdown: wallet_dropdown("consensus_wallet", &[], CONSENSUS_DROPDOWN_GROUP),
            order_dropdown: order_dropdown("consensus_order", CONSENSUS_DROPDOWN_GROUP),
            search: Editor::new("consensus_search", "Search").with_icon(icons::MAGNIFYING_GLASS, false),
            agendas: Vec::new(),
            fetching: None,
            synced_at: None,
            voting: None,
            dialog: None,
            events: EventQueue::new(),
        }
    }

    fn selected_wallet(&self) -> Option<&Wallet> {
        self.wallets.get(self.wallet_dropdown.selected_index())
    }

    pub fn is_syncing(&self) -> bool {
        self.fetching.is_some()
    }

    fn sync_completed(&self) -> bool {
        self.synced_at.is_some_and(|t| t.elapsed() < UPDATED_VISIBLE)
    }

    /// agendas passing the search box, in fetched order
    pub fn visible_agendas(&self) -> impl Iterator<Item = (usize, &Agenda)> + '_ {
        let query = self.search.text();
        self.agendas.iter().enumerate().filter(move |(_, a)| a.matches_search(query))
    }

    fn fetch_agendas(&mut self, load: &Load) {
        let Some(wallet) = self.selected_wallet() else { return };
        let id = wallet.id;
        let newest = newest_first(&self.order_dropdown);
        self.synced_at = None;
        self.fetching = Some(load.spawn(move |mw| mw.all_vote_agendas(id, newest)));
    }

    fn handle_dialog_action(&mut self, load: &mut Load, action: ModalAction<String>) {
        let Some(dialog) = self.dialog.take() else { return };
        match (dialog, action) {
            (dialog, ModalAction::None) => self.dialog = Some(dialog),
            (_, ModalAction::Negative) => {}
            (Dialog::Info(_) | Dialog::Dashboard(_), ModalAction::Positive(_)) => {}
            (Dialog::Vote(modal), ModalAction::Positive(choice)) => {
                let modal_title = format!("Confirm to vote {}", choice);
                self.dialog = Some(Dialog::Password {
                    agenda: modal.agenda_id,
                    choice,
                    modal: PasswordModal::new(modal_title),
                });
            }
            (Dialog::Password { agenda, choice, modal }, ModalAction::Positive(pass)) => {
                let Some(id) = self.selected_wallet().map(|w| w.id) else { return };
                let (a, ch) = (agenda.clone(), choice.clone());
                self.voting = Some(load.spawn(move |mw| mw.set_vote_choice(id, &a, &ch, &pass)));
                self.dialog = Some(Dialog::Password { agenda, choice, modal });
            }
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context, theme: &Theme) -> ModalAction<String> {
        let Some(dialog) = self.dialog.as_mut() else {
            return ModalAction::None;
        };
        match dialog {
            Dialog::Info(m) | Dialog::Dashboard(m) => unit_action(m.show(ctx, theme)),
            Dialog::Vote(m) => m.show(ctx, theme),
            Dialog::Password { modal, .. } => modal.show(ctx, theme),
        }
    }

    fn poll_work(&mut self, load: &mut Load) {
        if let Some(result) = self.fetching.as_mut().and_then(Pending::poll) {
            self.fetching = None;
            match result {
                Ok(agendas) => {
                    self.agendas = agendas;
                    self.synced_at = Some(Instant::now());
                    load.ctx.request_repaint_after(UPDATED_VISIBLE);
                }
                Err(e) => load.toast.notify_error(e.to_string()),
            }
        }

        if let Some(result) = self.voting.as_mut().and_then(Pending::poll) {
            self.voting = None;
            match result {
                Ok(()) => {
                    if let Some(Dialog::Password { agenda, choice, .. }) = self.dialog.take() {
                        info!("vote preference for {} set to {}", agenda, choice);
                    }
                    load.toast.notify("Vote updated successfully");
                    self.fetch_agendas(load);
                }
                Err(e) => {
                    if let Some(Dialog::Password { modal, .. }) = self.dialog.as_mut() {
                        modal.state.set_error(translate_err(&e));
                    }
                }
            }
        }
    }
}

fn unit_action(action: ModalAction<()>) -> ModalAction<String> {
    match action {
        ModalAction::Positive(()) => ModalAction::Positive(String::new()),
        ModalAction::Negative => ModalAction::Negative,
        ModalAction::None => ModalAction::None,
    }
}

fn can_vote(status: AgendaStatus) -> bool {
    matches!(status, AgendaStatus::Upcoming | AgendaStatus::InProgress)
}

impl Default for ConsensusPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for ConsensusPage {
    fn id(&self) -> &'static str {
        CONSENSUS_PAGE_ID
    }

    fn on_navigated_to(&mut self, load: &mut Load) {
        self.wallets = load.sorted_wallets();
        self.wallet_dropdown.set_items(wallet_items(&self.wallets));
        self.fetch_agendas(load);
    }

    fn on_navigated_from(&mut self, _load: &mut Load) {
        self.dialog = None;
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        let mut refetch = false;
        while self.wallet_dropdown.changed() {
            refetch = true;
        }
        while self.order_dropdown.changed() {
            refetch = true;
        }
        if refetch {
            self.fetch_agendas(load);
        }
        self.search.events().for_each(drop);
        if let Some(Dialog::Dashboard(m)) = self.dialog.as_mut() {
            if m.take_copied() {
                load.toast.notify("URL copied");
            }
        }

        while let Some(event) = self.events.pop() {
            match event {
                ConsensusEvent::Sync => {
                    if !self.is_syncing() {
                        self.fetch_agendas(load);
                    }
                }
                ConsensusEvent::Info => {
                    let modal = InfoModal::new(
                        "Consensus changes",
                        "On-chain voting for upgrading the Decred network consensus rules.",
                    )
                    .positive(STR_GOT_IT);
                    self.dialog = Some(Dialog::Info(modal));
                }
                ConsensusEvent::Dashboard => {
                    let url = load.mw.net_type().voting_dashboard_url();
                    let modal = InfoModal::new(
                        "Consensus Vote Dashboard",
                        "Copy and paste the link below in your browser, to view the consensus vote dashboard.",
                    )
                    .copyable(url);
                    self.dialog = Some(Dialog::Dashboard(modal));
                }
                ConsensusEvent::Vote(i) => {
                    if let Some(agenda) = self.agendas.get(i) {
                        self.dialog = Some(Dialog::Vote(VoteModal::new(agenda)));
                    }
                }
                ConsensusEvent::Dialog(action) => self.handle_dialog_action(load, action),
            }
        }

        self.poll_work(load);
        display_one_dropdown(&mut [&mut self.wallet_dropdown, &mut self.order_dropdown]);
    }

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        let theme = load.theme;
        let c = theme.color;

        ui.horizontal(|ui| {
            ui.label(RichText::new("Consensus Changes").size(20.0).color(c.text));
            let info = egui::Button::new(RichText::new(icons::INFO).size(18.0).color(c.text_muted)).frame(false);
            if ui.add(info).clicked() {
                self.events.push(ConsensusEvent::Info);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.vertical(|ui| {
                    let dash = egui::Button::new(
                        RichText::new(format!("{} Voting Dashboard", icons::ARROW_SQUARE_OUT)).size(14.0).color(c.primary),
                    )
                    .frame(false);
                    if ui.add(dash).clicked() {
                        self.events.push(ConsensusEvent::Dashboard);
                    }
                    if self.is_syncing() {
                        ui.label(RichText::new("Syncing...").size(10.0).color(c.text_faint));
                    } else if self.sync_completed() {
                        ui.label(RichText::new("Updated").size(10.0).color(c.success));
                    }
                });
            });
        });
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            ui.set_max_width(ui.available_width());
            ui.allocate_ui(egui::vec2(180.0, 32.0), |ui| {
                self.search.layout(ui, &theme);
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if self.is_syncing() {
                    ui.spinner();
                } else if self.sync_completed() {
                    ui.label(RichText::new(icons::CHECK).size(20.0).color(c.success));
                } else {
                    let sync = egui::Button::new(RichText::new(icons::ARROWS_CLOCKWISE).size(20.0).color(c.text_muted)).frame(false);
                    if ui.add(sync).on_hover_text("Sync").clicked() {
                        self.events.push(ConsensusEvent::Sync);
                    }
                }
                self.order_dropdown.layout(ui, &theme);
                self.wallet_dropdown.layout(ui, &theme);
            });
        });
        ui.add_space(8.0);

        let mut vote = None;
        content(ui, |ui| {
            let mut any = false;
            for (i, agenda) in self.visible_agendas() {
                any = true;
                card(ui, &theme, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&agenda.agenda_id).size(16.0).color(c.text));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let color = if agenda.status == AgendaStatus::Finished { c.success } else { c.text_muted };
                            ui.label(RichText::new(agenda.status.to_string()).size(12.0).color(color));
                        });
                    });
                    ui.label(RichText::new(&agenda.description).size(13.0).color(c.text_muted));
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("Voting preference:").size(12.0).color(c.text_faint));
                        ui.label(RichText::new(&agenda.voting_preference).size(12.0).color(c.text));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let enabled = can_vote(agenda.status);
                            if ui.add_enabled(enabled, egui::Button::new("Change vote")).clicked() {
                                vote = Some(i);
                            }
                        });
                    });
                });
                ui.add_space(6.0);
            }
            if !any {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    let text = if self.is_syncing() { "Fetching agendas..." } else { "No agendas found" };
                    ui.label(RichText::new(text).size(14.0).color(c.text_faint));
                });
            }
        });
        if let Some(i) = vote {
            self.events.push(ConsensusEvent::Vote(i));
        }

        let action = self.show_dialog(ui.ctx(), &theme);
        if !action.is_none() {
            self.events.push(ConsensusEvent::Dialog(action));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::testing::{load, render, render_until};

    fn page(load: &mut Load) -> ConsensusPage {
        load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let mut pg = ConsensusPage::new();
        pg.on_navigated_to(load);
        render_until(&mut pg, load, |p, _| !p.is_syncing());
        pg
    }

    #[test]
    fn test_fetch_and_order() {
        let (mut load, _dir, _rt) = load();
        let mut pg = page(&mut load);
        assert!(!pg.agendas.is_empty());
        assert!(pg.sync_completed());
        let first = pg.agendas[0].agenda_id.clone();

        pg.order_dropdown.click_item(1);
        render(&mut pg, &mut load);
        render_until(&mut pg, &mut load, |p, _| !p.is_syncing());
        assert_eq!(pg.agendas.last().map(|a| a.agenda_id.clone()), Some(first));
    }

    #[test]
    fn test_search_filters_agendas() {
        let (mut load, _dir, _rt) = load();
        let mut pg = page(&mut load);
        let total = pg.agendas.len();
        pg.search.set_text("HEADERCOMMIT");
        assert_eq!(pg.visible_agendas().count(), 1);
        pg.search.set_text("no agenda is called this");
        assert_eq!(pg.visible_agendas().count(), 0);
        pg.search.clear();
        assert_eq!(pg.visible_agendas().count(), total);
    }

    #[test]
    fn test_vote_flow() {
        let (mut load, _dir, _rt) = load();
        let mut pg = page(&mut load);
        let (i, agenda_id) = pg
            .agendas
            .iter()
            .enumerate()
            .find(|(_, a)| can_vote(a.status))
            .map(|(i, a)| (i, a.agenda_id.clone()))
            .expect("a votable agenda");

        pg.events.push(ConsensusEvent::Vote(i));
        render(&mut pg, &mut load);
        assert!(matches!(pg.dialog, Some(Dialog::Vote(_))));

        pg.events.push(ConsensusEvent::Dialog(ModalAction::Positive("yes".into())));
        render(&mut pg, &mut load);
        assert!(matches!(pg.dialog, Some(Dialog::Password { .. })));

        pg.events.push(ConsensusEvent::Dialog(ModalAction::Positive("wrong".into())));
        render(&mut pg, &mut load);
        render_until(&mut pg, &mut load, |p, _| p.voting.is_none());
        match &pg.dialog {
            Some(Dialog::Password { modal, .. }) => assert!(modal.state.error().is_some()),
            _ => panic!("password dialog should stay open"),
        }

        pg.events.push(ConsensusEvent::Dialog(ModalAction::Positive("secret1".into())));
        render(&mut pg, &mut load);
        render_until(&mut pg, &mut load, |p, _| p.voting.is_none() && !p.is_syncing());
        assert!(pg.dialog.is_none());
        let agenda = pg.agendas.iter().find(|a| a.agenda_id == agenda_id).unwrap();
        assert_eq!(agenda.voting_preference, "yes");
    }

    #[test]
    fn test_dashboard_uses_network_url() {
        let (mut load, _dir, _rt) = load();
        let mut pg = page(&mut load);
        pg.events.push(ConsensusEvent::Dashboard);
        render(&mut pg, &mut load);
        match &pg.dialog {
            Some(Dialog::Dashboard(m)) => {
                assert_eq!(m.copy_text.as_deref(), Some(load.mw.net_type().voting_dashboard_url()))
            }
            _ => panic!("dashboard dialog expected"),
        }
        pg.events.push(ConsensusEvent::Dialog(ModalAction::Positive(String::new())));
        render(&mut pg, &mut load);
        assert!(pg.dialog.is_none());
    }

    #[test]
    fn test_vote_modal_select() {
        let agenda = zabuton_core::consensus::builtin_agendas().remove(0);
        let mut m = VoteModal::new(&agenda);
        assert!(!m.changed());
        m.select("maybe");
        assert!(!m.changed());
        m.select("yes");
        assert!(m.changed());
    }
}
