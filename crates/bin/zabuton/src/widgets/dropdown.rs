//! single choice dropdown with group-aware open state

use eframe::egui::{self, RichText, Sense};
use egui_phosphor::regular as icons;
use std::sync::atomic::{AtomicU64, Ordering};

use super::events::EventQueue;
use crate::theme::Theme;

/// characters shown on a closed dropdown before truncation
pub const MAX_CLOSED_LABEL: usize = 14;

static OPEN_SEQ: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropDownItem {
    pub text: String,
    pub icon: Option<&'static str>,
}

impl DropDownItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), icon: None }
    }

    pub fn with_icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }
}

pub struct DropDown {
    id: egui::Id,
    items: Vec<DropDownItem>,
    selected: usize,
    open: bool,
    group: u32,
    opened_seq: u64,
    backdrop_clicked: bool,
    width: f32,
    selections: EventQueue<usize>,
}

impl DropDown {
    pub fn new(id_source: impl std::hash::Hash, items: Vec<DropDownItem>, group: u32) -> Self {
        Self {
            id: egui::Id::new(("dropdown", id_source)),
            items,
            selected: 0,
            open: false,
            group,
            opened_seq: 0,
            backdrop_clicked: false,
            width: 0.0,
            selections: EventQueue::new(),
        }
    }

    pub fn from_labels(id_source: impl std::hash::Hash, labels: &[&str], group: u32) -> Self {
        Self::new(id_source, labels.iter().map(|l| DropDownItem::new(*l)).collect(), group)
    }

    pub fn selected(&self) -> &str {
        self.items.get(self.selected).map(|i| i.text.as_str()).unwrap_or("")
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn group(&self) -> u32 {
        self.group
    }

    /// width of the closed dropdown as last rendered
    pub fn width(&self) -> f32 {
        self.width
    }

    /// consume one pending selection
    pub fn changed(&mut self) -> bool {
        self.selections.pop().is_some()
    }

    /// replace items, keeping the selection when it is still in range
    pub fn set_items(&mut self, items: Vec<DropDownItem>) {
        self.items = items;
        if self.selected >= self.items.len() {
            self.selected = 0;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub(crate) fn click_header(&mut self) {
        if self.open {
            self.open = false;
        } else {
            self.open = true;
            self.opened_seq = OPEN_SEQ.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub(crate) fn click_item(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }
        self.selected = index;
        self.open = false;
        self.selections.push(index);
    }

    pub fn layout(&mut self, ui: &mut egui::Ui, theme: &Theme) -> egui::Response {
        let c = theme.color;
        let label = match self.items.get(self.selected) {
            Some(item) => truncate_label(&item.text),
            None => String::new(),
        };
        let icon = self.items.get(self.selected).and_then(|i| i.icon);

        let header = egui::Frame::none()
            .fill(c.surface_alt)
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, if self.open { c.primary } else { c.border }))
            .inner_margin(egui::Margin::symmetric(10.0, 6.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if let Some(icon) = icon {
                        ui.label(RichText::new(icon).size(14.0).color(c.text_muted));
                    }
                    ui.label(RichText::new(label).size(13.0).color(c.text));
                    let caret = if self.open { icons::CARET_UP } else { icons::CARET_DOWN };
                    ui.label(RichText::new(caret).size(12.0).color(c.text_muted));
                });
            })
            .response
            .interact(Sense::click());

        self.width = header.rect.width();
        if header.clicked() {
            self.click_header();
        }

        if self.open {
            let menu = egui::Area::new(self.id.with("menu"))
                .order(egui::Order::Foreground)
                .fixed_pos(header.rect.left_bottom() + egui::vec2(0.0, 4.0))
                .show(ui.ctx(), |ui| {
                    egui::Frame::popup(ui.style())
                        .fill(c.surface)
                        .rounding(8.0)
                        .show(ui, |ui| {
                            ui.set_min_width(header.rect.width().max(160.0));
                            let mut clicked = None;
                            for (i, item) in self.items.iter().enumerate() {
                                let text = match item.icon {
                                    Some(icon) => format!("{} {}", icon, item.text),
                                    None => item.text.clone(),
                                };
                                let color = if i == self.selected { c.primary } else { c.text };
                                let row = ui.horizontal(|ui| {
                                    ui.add(
                                        egui::SelectableLabel::new(i == self.selected, RichText::new(text).size(13.0).color(color)),
                                    )
                                });
                                if row.inner.clicked() {
                                    clicked = Some(i);
                                }
                            }
                            clicked
                        })
                        .inner
                });

            if let Some(i) = menu.inner {
                self.click_item(i);
            } else if !header.clicked() && ui.input(|i| i.pointer.any_click()) {
                let pos = ui.input(|i| i.pointer.interact_pos());
                let inside = pos.map_or(false, |p| menu.response.rect.contains(p) || header.rect.contains(p));
                if !inside {
                    self.backdrop_clicked = true;
                    self.open = false;
                }
            }
        }

        header
    }
}

fn truncate_label(text: &str) -> String {
    if text.chars().count() > MAX_CLOSED_LABEL {
        let head: String = text.chars().take(MAX_CLOSED_LABEL).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// keep only the most recently opened dropdown of each group open; a click
/// on the backdrop of any dropdown closes its whole group
pub fn display_one_dropdown(dropdowns: &mut [&mut DropDown]) {
    let backdrop_groups: Vec<u32> = dropdowns
        .iter_mut()
        .filter_map(|d| std::mem::take(&mut d.backdrop_clicked).then_some(d.group))
        .collect();

    let mut newest: Vec<(u32, u64)> = Vec::new();
    for d in dropdowns.iter().filter(|d| d.open) {
        match newest.iter_mut().find(|(g, _)| *g == d.group) {
            Some(entry) if entry.1 < d.opened_seq => entry.1 = d.opened_seq,
            Some(_) => {}
            None => newest.push((d.group, d.opened_seq)),
        }
    }

    for d in dropdowns.iter_mut() {
        if backdrop_groups.contains(&d.group) {
            d.open = false;
            continue;
        }
        if d.open {
            let keep = newest.iter().any(|(g, seq)| *g == d.group && *seq == d.opened_seq);
            if !keep {
                d.open = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dd(group: u32) -> DropDown {
        DropDown::from_labels(("t", group, OPEN_SEQ.load(Ordering::SeqCst)), &["All", "Sent", "Received"], group)
    }

    #[test]
    fn test_defaults() {
        let d = dd(1);
        assert_eq!(d.selected_index(), 0);
        assert_eq!(d.selected(), "All");
        assert_eq!(d.len(), 3);
        assert!(!d.is_open());
    }

    #[test]
    fn test_select_closes_and_queues_change() {
        let mut d = dd(1);
        d.click_header();
        assert!(d.is_open());
        d.click_item(2);
        assert!(!d.is_open());
        assert_eq!(d.selected(), "Received");
        assert!(d.changed());
        assert!(!d.changed());

        d.click_item(7);
        assert_eq!(d.selected_index(), 2);
        assert!(!d.changed());
    }

    #[test]
    fn test_only_newest_in_group_stays_open() {
        let mut a = dd(1);
        let mut b = dd(1);
        let mut other = dd(2);
        a.click_header();
        other.click_header();
        b.click_header();

        display_one_dropdown(&mut [&mut a, &mut b, &mut other]);
        assert!(!a.is_open());
        assert!(b.is_open());
        assert!(other.is_open());
    }

    #[test]
    fn test_backdrop_closes_group() {
        let mut a = dd(1);
        let mut b = dd(1);
        let mut other = dd(2);
        b.click_header();
        other.click_header();
        a.backdrop_clicked = true;

        display_one_dropdown(&mut [&mut a, &mut b, &mut other]);
        assert!(!b.is_open());
        assert!(other.is_open());
    }

    #[test]
    fn test_truncation() {
        assert_eq!(truncate_label("short"), "short");
        assert_eq!(truncate_label("a very long wallet name"), "a very long wa...");
    }

    #[test]
    fn test_renders_headless() {
        let ctx = egui::Context::default();
        let theme = Theme::new(true);
        let mut d = dd(3);
        d.click_header();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                d.layout(ui, &theme);
            });
        });
        assert!(d.width() > 0.0);
        assert!(d.is_open());
    }
}
