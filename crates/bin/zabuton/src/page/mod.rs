//! pages and the navigation stack
//!
//! ```text
//!   frame ─▶ layout(ui)            draws, widgets queue events
//!         ─▶ handle_user_interactions   drains events, polls pending work
//!         ─▶ Navigator::apply       push / pop / replace
//! ```

pub mod components;
pub mod debug;
pub mod governance;
pub mod main_page;
pub mod seedbackup;
pub mod settings;
pub mod staking;
pub mod start;
pub mod transaction;
pub mod wallets;

use eframe::egui;
use tracing::debug;

use crate::load::{Load, NavRequest};

pub trait Page {
    fn id(&self) -> &'static str;

    fn on_navigated_to(&mut self, _load: &mut Load) {}

    fn handle_user_interactions(&mut self, load: &mut Load);

    fn layout(&mut self, ui: &mut egui::Ui, load: &mut Load);

    fn on_navigated_from(&mut self, _load: &mut Load) {}
}

/// the root page is never popped
pub struct Navigator {
    stack: Vec<Box<dyn Page>>,
}

impl Navigator {
    pub fn new(mut root: Box<dyn Page>, load: &mut Load) -> Self {
        root.on_navigated_to(load);
        Self { stack: vec![root] }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current_id(&self) -> Option<&'static str> {
        self.stack.last().map(|p| p.id())
    }

    /// draw the top page and let it react to this frame's input
    pub fn frame(&mut self, ui: &mut egui::Ui, load: &mut Load) {
        if let Some(page) = self.stack.last_mut() {
            page.layout(ui, load);
            page.handle_user_interactions(load);
        }
    }

    /// apply queued navigation; true when the app should exit
    pub fn apply(&mut self, load: &mut Load) -> bool {
        // pages may queue more navigation from on_navigated_to
        for _ in 0..8 {
            let requests = load.take_nav_requests();
            if requests.is_empty() {
                return false;
            }
            for req in requests {
                match req {
                    NavRequest::ChangeFragment(mut page) => {
                        if let Some(top) = self.stack.last_mut() {
                            top.on_navigated_from(load);
                        }
                        debug!("navigate to {}", page.id());
                        page.on_navigated_to(load);
                        self.stack.push(page);
                    }
                    NavRequest::PopFragment => self.pop(load, 1),
                    NavRequest::PopToRoot => {
                        let n = self.stack.len().saturating_sub(1);
                        self.pop(load, n);
                    }
                    NavRequest::ChangeWindowPage(mut page) => {
                        while let Some(mut old) = self.stack.pop() {
                            old.on_navigated_from(load);
                        }
                        debug!("window page {}", page.id());
                        page.on_navigated_to(load);
                        self.stack.push(page);
                    }
                    NavRequest::Exit => return true,
                }
            }
        }
        false
    }

    fn pop(&mut self, load: &mut Load, n: usize) {
        if n == 0 || self.stack.len() <= 1 {
            return;
        }
        for _ in 0..n.min(self.stack.len() - 1) {
            if let Some(mut page) = self.stack.pop() {
                page.on_navigated_from(load);
            }
        }
        if let Some(top) = self.stack.last_mut() {
            debug!("back to {}", top.id());
            top.on_navigated_to(load);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::testing::load;
    use std::sync::{Arc, Mutex};

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Probe {
        id: &'static str,
        journal: Journal,
    }

    impl Page for Probe {
        fn id(&self) -> &'static str {
            self.id
        }
        fn on_navigated_to(&mut self, _load: &mut Load) {
            self.journal.lock().unwrap().push(format!("to {}", self.id));
        }
        fn handle_user_interactions(&mut self, _load: &mut Load) {}
        fn layout(&mut self, _ui: &mut egui::Ui, _load: &mut Load) {}
        fn on_navigated_from(&mut self, _load: &mut Load) {
            self.journal.lock().unwrap().push(format!("from {}", self.id));
        }
    }

    fn probe(id: &'static str, journal: &Journal) -> Probe {
        Probe { id, journal: journal.clone() }
    }

    #[test]
    fn test_push_pop_lifecycle() {
        let (mut load, _dir, _rt) = load();
        let journal: Journal = Default::default();
        let mut nav = Navigator::new(Box::new(probe("root", &journal)), &mut load);

        load.change_fragment(probe("a", &journal));
        load.change_fragment(probe("b", &journal));
        assert!(!nav.apply(&mut load));
        assert_eq!(nav.depth(), 3);
        assert_eq!(nav.current_id(), Some("b"));

        load.pop_fragment();
        nav.apply(&mut load);
        assert_eq!(nav.current_id(), Some("a"));

        load.pop_to_root();
        nav.apply(&mut load);
        assert_eq!(nav.depth(), 1);

        // popping the root does nothing
        load.pop_fragment();
        nav.apply(&mut load);
        assert_eq!(nav.current_id(), Some("root"));

        assert_eq!(
            *journal.lock().unwrap(),
            vec![
                "to root", "from root", "to a", "from a", "to b", "from b", "to a", "from a", "to root",
            ]
        );
    }

    #[test]
    fn test_window_page_replaces_stack() {
        let (mut load, _dir, _rt) = load();
        let journal: Journal = Default::default();
        let mut nav = Navigator::new(Box::new(probe("start", &journal)), &mut load);
        load.change_fragment(probe("restore", &journal));
        nav.apply(&mut load);

        load.change_window_page(probe("main", &journal));
        nav.apply(&mut load);
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.current_id(), Some("main"));

        load.exit();
        assert!(nav.apply(&mut load));
    }
}
