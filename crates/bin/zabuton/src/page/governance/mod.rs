pub mod consensus;

use eframe::egui::{self, RichText};
use egui_phosphor::regular as icons;
use tracing::info;
use zabuton_core::config;

use self::consensus::ConsensusPage;
use super::components::{primary_button, sub_page_header};
use super::Page;
use crate::load::{Load, Pending};
use crate::values::{STR_GOT_IT, STR_GOVERNANCE};
use crate::widgets::{EventQueue, InfoModal, ModalAction};

pub const GOVERNANCE_PAGE_ID: &str = "governance";

const SPLASH_BODY: &str = "The Decred community can participate in proposal discussions for new initiatives and \
request funding for these initiatives. Decred stakeholders can vote if these proposals should be approved and paid \
for by the Decred Treasury.\n\nWould you like to fetch and view the proposals?";

enum GovernanceEvent {
    Back,
    Info,
    Enable,
    CloseInfo,
}

/// splash screen until proposal fetching is turned on, consensus voting after
pub struct GovernancePage {
    enabled: bool,
    consensus: ConsensusPage,
    info: Option<InfoModal>,
    sync: Option<Pending<zabuton_core::Result<usize>>>,
    events: EventQueue<GovernanceEvent>,
}

impl GovernancePage {
    pub fn new() -> Self {
        Self {
            enabled: false,
            consensus: ConsensusPage::new(),
            info: None,
            sync: None,
            events: EventQueue::new(),
        }
    }

    fn layout_splash(&mut self, ui: &mut egui::Ui, load: &Load) {
        let theme = load.theme;
        let c = theme.color;
        egui::Frame::none()
            .fill(c.surface)
            .rounding(14.0)
            .inner_margin(24.0)
            .show(ui, |ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    let info = egui::Button::new(RichText::new(icons::INFO).size(20.0).color(c.text_muted)).frame(false);
                    if ui.add(info).clicked() {
                        self.events.push(GovernanceEvent::Info);
                    }
                });
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(icons::BANK).size(96.0).color(c.primary));
                    ui.add_space(24.0);
                    ui.label(RichText::new("How does Governance Work?").size(24.0).strong().color(c.text));
                    ui.add_space(16.0);
                    ui.label(RichText::new(SPLASH_BODY).size(14.0).color(c.text_muted));
                    ui.add_space(24.0);
                    if primary_button(ui, &theme, "Fetch proposals", self.sync.is_none()) {
                        self.events.push(GovernanceEvent::Enable);
                    }
                });
            });
    }
}

impl Default for GovernancePage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for GovernancePage {
    fn id(&self) -> &'static str {
        GOVERNANCE_PAGE_ID
    }

    fn on_navigated_to(&mut self, load: &mut Load) {
        self.enabled = load.mw.config().read_bool(config::FETCH_PROPOSALS, false);
        if self.enabled {
            self.consensus.on_navigated_to(load);
        }
    }

    fn on_navigated_from(&mut self, load: &mut Load) {
        if self.enabled {
            self.consensus.on_navigated_from(load);
        }
    }

    fn handle_user_interactions(&mut self, load: &mut Load) {
        while let Some(event) = self.events.pop() {
            match event {
                GovernanceEvent::Back => load.pop_fragment(),
                GovernanceEvent::Info => {
                    let modal = InfoModal::new(
                        STR_GOVERNANCE,
                        "Proposals and politeia notifications can be enabled or disabled from the settings page.",
                    )
                    .positive(STR_GOT_IT);
                    self.info = Some(modal);
                }
                GovernanceEvent::CloseInfo => self.info = None,
                GovernanceEvent::Enable => {
                    if let Err(e) = load.mw.config().save_bool(config::FETCH_PROPOSALS, true) {
                        load.toast.notify_error(e.to_string());
                        continue;
                    }
                    self.sync = Some(load.spawn(|mw| mw.proposals().sync()));
                    self.enabled = true;
                    self.consensus.on_navigated_to(load);
                }
            }
        }

        if let Some(result) = self.sync.as_mut().and_then(Pending::poll) {
            self.sync = None;
            match result {
                Ok(n) => info!("fetched {} proposals", n),
                Err(e) => load.toast.notify_error(e.to_string()),
            }
        }

        if self.enabled {
            self.consensus.handle_user_interactions(load);
        }
    }

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        let theme = load.theme;
        if sub_page_header(ui, &theme, STR_GOVERNANCE) {
            self.events.push(GovernanceEvent::Back);
        }
        ui.add_space(8.0);

        if self.enabled {
            self.consensus.layout(ui, load);
            return;
        }
        self.layout_splash(ui, load);

        if let Some(modal) = self.info.as_mut() {
            if !matches!(modal.show(ui.ctx(), &theme), ModalAction::None) {
                self.events.push(GovernanceEvent::CloseInfo);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::testing::{load, render, render_until};
    use crate::load::NavRequest;

    #[test]
    fn test_splash_until_enabled() {
        let (mut load, _dir, _rt) = load();
        load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        let mut page = GovernancePage::new();
        page.on_navigated_to(&mut load);
        assert!(!page.enabled);

        page.events.push(GovernanceEvent::Info);
        render(&mut page, &mut load);
        assert!(page.info.is_some());
        page.events.push(GovernanceEvent::CloseInfo);

        page.events.push(GovernanceEvent::Enable);
        render(&mut page, &mut load);
        assert!(page.enabled);
        assert!(page.info.is_none());
        assert!(load.mw.config().read_bool(config::FETCH_PROPOSALS, false));

        render_until(&mut page, &mut load, |p, _| p.sync.is_none() && !p.consensus.is_syncing());
        assert!(load.mw.proposals().count() > 0);
        assert!(page.consensus.visible_agendas().count() > 0);
    }

    #[test]
    fn test_enabled_goes_straight_to_consensus() {
        let (mut load, _dir, _rt) = load();
        load.mw.create_new_wallet("mywallet", "secret1").unwrap();
        load.mw.config().save_bool(config::FETCH_PROPOSALS, true).unwrap();
        let mut page = GovernancePage::new();
        page.on_navigated_to(&mut load);
        assert!(page.enabled);
        assert!(page.consensus.is_syncing());

        page.events.push(GovernanceEvent::Back);
        render(&mut page, &mut load);
        assert!(matches!(load.take_nav_requests().as_slice(), [NavRequest::PopFragment]));
    }
}
