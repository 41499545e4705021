//! shared state handed to every page: the wallet, the runtime, theme,
//! toast and the navigation queue

use eframe::egui;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use zabuton_core::{config, MultiWallet, Notification, Wallet};

use crate::logbuf::LogBuffer;
use crate::page::Page;
use crate::theme::Theme;
use crate::widgets::Toast;

pub enum NavRequest {
    /// push a page on top of the current one
    ChangeFragment(Box<dyn Page>),
    PopFragment,
    PopToRoot,
    /// replace the whole stack
    ChangeWindowPage(Box<dyn Page>),
    Exit,
}

/// result of work running on the blocking pool
pub struct Pending<T> {
    rx: oneshot::Receiver<T>,
    dropped: bool,
}

impl<T> Pending<T> {
    pub fn poll(&mut self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(v) => Some(v),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                if !self.dropped {
                    warn!("background task ended without a result");
                    self.dropped = true;
                }
                None
            }
        }
    }
}

/// wallet notifications forwarded onto the ui thread
pub struct Listener {
    rx: mpsc::UnboundedReceiver<Notification>,
    task: JoinHandle<()>,
}

impl Listener {
    pub fn poll(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = self.rx.try_recv() {
            out.push(n);
        }
        out
    }

    pub fn stop(self) {}
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct Load {
    pub mw: Arc<MultiWallet>,
    pub ctx: egui::Context,
    pub runtime: tokio::runtime::Handle,
    pub theme: Theme,
    pub toast: Toast,
    pub rng: StdRng,
    pub logs: LogBuffer,
    pub started_at: Instant,
    nav: Vec<NavRequest>,
}

impl Load {
    pub fn new(
        mw: Arc<MultiWallet>,
        ctx: egui::Context,
        runtime: tokio::runtime::Handle,
        logs: LogBuffer,
        rng: StdRng,
    ) -> Self {
        let theme = Theme::new(mw.config().read_bool(config::DARK_MODE, false));
        Self {
            mw,
            ctx,
            runtime,
            theme,
            toast: Toast::default(),
            rng,
            logs,
            started_at: Instant::now(),
            nav: Vec::new(),
        }
    }

    /// run `f` on the blocking pool, repaint once it is done
    pub fn spawn<T, F>(&self, f: F) -> Pending<T>
    where
        F: FnOnce(&MultiWallet) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let mw = self.mw.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn_blocking(move || {
            let out = f(&mw);
            if tx.send(out).is_err() {
                debug!("result receiver gone");
            }
            ctx.request_repaint();
        });
        Pending { rx, dropped: false }
    }

    pub fn listen(&self) -> Listener {
        let mut sub = self.mw.subscribe();
        let (tx, rx) = mpsc::unbounded_channel();
        let ctx = self.ctx.clone();
        let task = self.runtime.spawn(async move {
            loop {
                match sub.recv().await {
                    Ok(n) => {
                        if tx.send(n).is_err() {
                            break;
                        }
                        ctx.request_repaint();
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("notification listener lagged by {}", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Listener { rx, task }
    }

    pub fn change_fragment(&mut self, page: impl Page + 'static) {
        self.nav.push(NavRequest::ChangeFragment(Box::new(page)));
    }

    pub fn pop_fragment(&mut self) {
        self.nav.push(NavRequest::PopFragment);
    }

    pub fn pop_to_root(&mut self) {
        self.nav.push(NavRequest::PopToRoot);
    }

    pub fn change_window_page(&mut self, page: impl Page + 'static) {
        self.nav.push(NavRequest::ChangeWindowPage(Box::new(page)));
    }

    pub fn exit(&mut self) {
        self.nav.push(NavRequest::Exit);
    }

    pub fn take_nav_requests(&mut self) -> Vec<NavRequest> {
        std::mem::take(&mut self.nav)
    }

    /// re-read the dark mode preference and restyle
    pub fn refresh_theme(&mut self) {
        self.theme = Theme::new(self.mw.config().read_bool(config::DARK_MODE, false));
        self.theme.apply(&self.ctx);
    }

    pub fn sorted_wallets(&self) -> Vec<Wallet> {
        self.mw.sorted_wallet_list()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use rand::SeedableRng;
    use zabuton_core::NetType;

    /// a load over a fresh wallet store; keep the tempdir and runtime alive
    pub(crate) fn load() -> (Load, tempfile::TempDir, tokio::runtime::Runtime) {
        let dir = tempfile::tempdir().unwrap();
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let mw = Arc::new(MultiWallet::open(dir.path(), NetType::Testnet3).unwrap());
        let load = Load::new(
            mw,
            egui::Context::default(),
            rt.handle().clone(),
            LogBuffer::new(16),
            StdRng::seed_from_u64(7),
        );
        (load, dir, rt)
    }

    /// one headless frame of `page`
    pub(crate) fn render(page: &mut dyn Page, load: &mut Load) {
        let ctx = load.ctx.clone();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                page.layout(ui, load);
                page.handle_user_interactions(load);
            });
        });
    }

    /// render until `done` holds, for pages waiting on background work
    pub(crate) fn render_until<P: Page>(page: &mut P, load: &mut Load, mut done: impl FnMut(&P, &Load) -> bool) {
        for _ in 0..300 {
            render(page, load);
            if done(page, load) {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        panic!("page never settled");
    }

    /// poll until the pending value arrives
    pub(crate) fn wait<T>(mut p: Pending<T>) -> T {
        for _ in 0..500 {
            if let Some(v) = p.poll() {
                return v;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        panic!("pending result never arrived");
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{load, wait};
    use super::*;

    #[test]
    fn test_spawn_delivers_result() {
        let (load, _dir, _rt) = load();
        let count = wait(load.spawn(|mw| mw.loaded_wallets_count()));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_listener_forwards_notifications() {
        let (load, _dir, _rt) = load();
        let mut listener = load.listen();
        load.mw.set_best_block(42, 1_700_000_000).unwrap();

        let mut got = Vec::new();
        for _ in 0..100 {
            got.extend(listener.poll());
            if !got.is_empty() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert_eq!(got, vec![Notification::BlockConnected { height: 42 }]);
        listener.stop();
    }

    #[test]
    fn test_nav_requests_drain() {
        let (mut load, _dir, _rt) = load();
        load.pop_fragment();
        load.exit();
        let reqs = load.take_nav_requests();
        assert!(matches!(reqs.as_slice(), [NavRequest::PopFragment, NavRequest::Exit]));
        assert!(load.take_nav_requests().is_empty());
    }
}
