//! Runtime - executes commands and feeds resulting messages back into update
//!
//! - `surface` - the host editing surfaces commands are rendered to

pub mod surface;

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

pub use surface::{HeadlessSurface, Surface};

use crate::assistant::{credential_from_env, AssistantError, CompletionProvider, RequestContext};
use crate::commands::Cmd;
use crate::config::EditorConfig;
use crate::messages::{AppMsg, AssistantMsg, Msg, ReplacementMsg};
use crate::model::AppModel;
use crate::storage::{Snapshot, SnapshotStore, StorageError};
use crate::update::{sync_surface, update};

pub type SharedProvider = Arc<dyn CompletionProvider + Send + Sync>;

pub struct Runtime<S: SnapshotStore, U: Surface> {
    model: AppModel,
    store: S,
    surface: U,
    provider: Option<SharedProvider>,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    /// Assistant requests whose response has not arrived yet
    outstanding: usize,
}

impl<S: SnapshotStore, U: Surface> Runtime<S, U> {
    pub fn new(model: AppModel, store: S, surface: U) -> Self {
        let (msg_tx, msg_rx) = channel();
        let mut runtime = Self {
            model,
            store,
            surface,
            provider: None,
            msg_tx,
            msg_rx,
            outstanding: 0,
        };
        let initial = sync_surface(&runtime.model);
        runtime.process_cmd(initial);
        runtime
    }

    /// Load persisted state from `store` and start on it
    pub fn load(config: EditorConfig, store: S, surface: U) -> Result<Self, StorageError> {
        let snapshot = Snapshot::load(&store)?;
        Ok(Self::new(AppModel::new(config, snapshot), store, surface))
    }

    pub fn with_provider(mut self, provider: SharedProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn surface(&self) -> &U {
        &self.surface
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one message through update and execute the resulting command.
    /// Deferred follow-ups are queued, see [`Runtime::process_async_messages`].
    pub fn dispatch(&mut self, msg: Msg) {
        if matches!(msg, Msg::Assistant(AssistantMsg::Response { .. })) {
            self.outstanding = self.outstanding.saturating_sub(1);
        }
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(cmd);
        }
    }

    /// Dispatch every queued message without blocking. Returns how many ran.
    pub fn process_async_messages(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
            processed += 1;
        }
        processed
    }

    /// Process queued messages, waiting for outstanding assistant responses
    pub fn run_until_idle(&mut self) {
        loop {
            self.process_async_messages();
            if self.outstanding == 0 {
                break;
            }
            match self.msg_rx.recv() {
                Ok(msg) => self.dispatch(msg),
                Err(_) => break,
            }
        }
    }

    fn send(&self, msg: Msg) {
        // The runtime owns the receiver, so this only fails during teardown
        let _ = self.msg_tx.send(msg);
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
            Cmd::SyncTextSurface { content, select } => self.surface.sync_text(&content, select),
            Cmd::SyncStructuredSurface { markdown } => self.surface.sync_structured(&markdown),
            Cmd::ReplayStructuredEdit { commands } => self.surface.replay_structured(&commands),
            Cmd::FlushReplacement => {
                self.send(Msg::Replacement(ReplacementMsg::Flush));
            }
            Cmd::PersistSnapshot(snapshot) => {
                if let Err(e) = snapshot.save(&mut self.store) {
                    self.send(Msg::App(AppMsg::Persisted(Err(e.to_string()))));
                }
            }
            Cmd::SendAssistantRequest { request_id, prompt } => {
                self.outstanding += 1;
                let Some(provider) = self.provider.clone() else {
                    self.send(Msg::Assistant(AssistantMsg::Response {
                        request_id,
                        result: Err(AssistantError::Unavailable),
                    }));
                    return;
                };
                let context = match credential_from_env(&self.model.config.api_key_env) {
                    Ok(api_key) => RequestContext {
                        api_key,
                        model: self.model.config.model.clone(),
                    },
                    Err(e) => {
                        tracing::warn!("assistant request {} not sent: {}", request_id, e);
                        self.send(Msg::Assistant(AssistantMsg::Response {
                            request_id,
                            result: Err(e),
                        }));
                        return;
                    }
                };

                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let result = provider.complete(&prompt, &context);
                    let _ = tx.send(Msg::Assistant(AssistantMsg::Response {
                        request_id,
                        result,
                    }));
                });
            }
            Cmd::CopyToClipboard(text) => self.surface.copy_to_clipboard(&text),
            Cmd::ShowMessage(message) => self.surface.show_message(&message),
        }
    }
}
