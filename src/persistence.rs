//! Save flow and its collaborators
//!
//! A save checks identity, snapshots the editor's document, sanitizes it and
//! hands it to the store. The editor is shared through a `RefCell`; no borrow
//! is held across an await, so edits may land while a save is in flight.

use std::cell::RefCell;
use std::future::Future;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::CatalogItem;
use crate::editor::EditorState;
use crate::sanitize::sanitize;
use crate::tree::Node;

/// An authenticated merchant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), email: None }
    }
}

/// Resolves who is signed in
pub trait IdentityProvider {
    fn current_user(&self) -> impl Future<Output = Result<Option<User>>>;
}

/// Durable home of theme documents. `persist` replaces the stored document
/// atomically.
pub trait ThemeStore {
    fn persist(
        &self,
        user_id: &str,
        document: &Node,
        display_name: Option<&str>,
    ) -> impl Future<Output = Result<()>>;

    /// Stored document for `user_id`, if one was ever saved
    fn load(&self, user_id: &str) -> impl Future<Output = Result<Option<Node>>>;
}

/// Read-only access to a merchant's catalog
pub trait CatalogSource {
    fn list_items(&self, user_id: &str) -> impl Future<Output = Result<Vec<CatalogItem>>>;
}

/// Why a save did not happen
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no signed-in user")]
    Unauthorized,

    #[error("a save is already in progress")]
    InFlight,

    #[error("failed to persist theme: {0:#}")]
    Persist(#[source] anyhow::Error),
}

/// What a completed save wrote
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReceipt {
    pub user_id: String,
    pub display_name: Option<String>,
    /// Editor version the persisted snapshot was taken at
    pub document_version: u64,
}

/// Save the editor's document for the signed-in user.
///
/// Rejected with [`SaveError::InFlight`] while another save runs. The held
/// document is never modified, whatever the outcome.
pub async fn save<I, S>(
    editor: &RefCell<EditorState>,
    identity: &I,
    store: &S,
) -> Result<SaveReceipt, SaveError>
where
    I: IdentityProvider,
    S: ThemeStore,
{
    if !editor.borrow_mut().begin_save() {
        warn!("Save requested while another is in flight, rejecting");
        return Err(SaveError::InFlight);
    }

    let _in_flight = InFlightGuard(editor);
    run_save(editor, identity, store).await
}

/// Clears the save flag when the save finishes or its future is dropped
struct InFlightGuard<'a>(&'a RefCell<EditorState>);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        match self.0.try_borrow_mut() {
            Ok(mut state) => state.end_save(),
            Err(_) => warn!("Editor borrowed while ending save, flag left set"),
        }
    }
}

async fn run_save<I, S>(
    editor: &RefCell<EditorState>,
    identity: &I,
    store: &S,
) -> Result<SaveReceipt, SaveError>
where
    I: IdentityProvider,
    S: ThemeStore,
{
    let user = match identity.current_user().await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("Save attempted without a signed-in user");
            return Err(SaveError::Unauthorized);
        }
        Err(e) => {
            warn!(error = %e, "Identity lookup failed, aborting save");
            return Err(SaveError::Unauthorized);
        }
    };

    let (snapshot, document_version) = {
        let state = editor.borrow();
        (state.document().clone(), state.version())
    };

    let sanitized = sanitize(&snapshot);
    store
        .persist(&user.id, &sanitized.document, sanitized.display_name.as_deref())
        .await
        .map_err(SaveError::Persist)?;

    info!(
        user = %user.id,
        version = document_version,
        display_name = ?sanitized.display_name,
        "Saved theme"
    );
    Ok(SaveReceipt {
        user_id: user.id,
        display_name: sanitized.display_name,
        document_version,
    })
}

/// Start an editing session for the signed-in user: stored document
/// hydrated over defaults, plus their catalog.
pub async fn open_session<I, S>(identity: &I, store: &S) -> Result<EditorState>
where
    I: IdentityProvider,
    S: ThemeStore + CatalogSource,
{
    let user = identity
        .current_user()
        .await
        .context("Failed to look up current user")?
        .context("No signed-in user")?;

    let stored = store
        .load(&user.id)
        .await
        .with_context(|| format!("Failed to load theme for '{}'", user.id))?;
    let items = store
        .list_items(&user.id)
        .await
        .with_context(|| format!("Failed to list catalog for '{}'", user.id))?;

    info!(user = %user.id, has_theme = stored.is_some(), items = items.len(), "Opening editor session");
    let mut editor = EditorState::from_stored(&stored.unwrap_or_else(Node::object));
    editor.set_catalog(items);
    Ok(editor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::get_at_path;
    use serde_json::json;
    use std::cell::Cell;
    use tokio::sync::Notify;

    struct Identity(Option<User>);

    impl IdentityProvider for Identity {
        async fn current_user(&self) -> Result<Option<User>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenIdentity;

    impl IdentityProvider for BrokenIdentity {
        async fn current_user(&self) -> Result<Option<User>> {
            anyhow::bail!("session expired")
        }
    }

    /// Records persisted documents; optionally fails or waits on a gate
    #[derive(Default)]
    struct MemoryStore {
        saved: RefCell<Vec<(String, Node, Option<String>)>>,
        fail: bool,
        gate: Option<Notify>,
        calls: Cell<usize>,
    }

    impl ThemeStore for MemoryStore {
        async fn persist(&self, user_id: &str, document: &Node, display_name: Option<&str>) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                anyhow::bail!("disk full");
            }
            self.saved.borrow_mut().push((
                user_id.to_string(),
                document.clone(),
                display_name.map(str::to_string),
            ));
            Ok(())
        }

        async fn load(&self, _user_id: &str) -> Result<Option<Node>> {
            Ok(self.saved.borrow().last().map(|(_, doc, _)| doc.clone()))
        }
    }

    impl CatalogSource for MemoryStore {
        async fn list_items(&self, _user_id: &str) -> Result<Vec<CatalogItem>> {
            Ok(vec![CatalogItem::default()])
        }
    }

    fn signed_in() -> Identity {
        Identity(Some(User::new("u1")))
    }

    #[tokio::test]
    async fn test_save_persists_sanitized_document_and_display_name() {
        let editor = RefCell::new(EditorState::default());
        editor.borrow_mut().update("profile.shopName", Node::from("Acme"));
        editor.borrow_mut().update("backgroundImage", Node::from("javascript:alert(1)"));
        let store = MemoryStore::default();

        let receipt = save(&editor, &signed_in(), &store).await.unwrap();

        assert_eq!(receipt.display_name.as_deref(), Some("Acme"));
        assert_eq!(receipt.document_version, 2);
        let saved = store.saved.borrow();
        let (user, doc, name) = &saved[0];
        assert_eq!(user, "u1");
        assert_eq!(name.as_deref(), Some("Acme"));
        assert!(doc.get("backgroundImage").is_none());
        // The editor keeps its own copy untouched
        assert!(editor.borrow().document().get("backgroundImage").is_some());
        assert!(!editor.borrow().is_saving());
    }

    #[tokio::test]
    async fn test_save_without_user_is_unauthorized() {
        let editor = RefCell::new(EditorState::default());
        let store = MemoryStore::default();

        let err = save(&editor, &Identity(None), &store).await.unwrap_err();
        assert!(matches!(err, SaveError::Unauthorized));

        let err = save(&editor, &BrokenIdentity, &store).await.unwrap_err();
        assert!(matches!(err, SaveError::Unauthorized));

        assert_eq!(store.calls.get(), 0);
        assert!(!editor.borrow().is_saving());
    }

    #[tokio::test]
    async fn test_persist_failure_leaves_document_intact() {
        let editor = RefCell::new(EditorState::new(Node::from(json!({ "cardStyle": { "borderRadius": true } }))));
        let before = editor.borrow().document().clone();
        let store = MemoryStore { fail: true, ..MemoryStore::default() };

        let err = save(&editor, &signed_in(), &store).await.unwrap_err();

        assert!(matches!(err, SaveError::Persist(_)));
        assert!(err.to_string().contains("disk full"));
        assert!(editor.borrow().document().same_ref(&before));
        assert!(!editor.borrow().is_saving());
    }

    #[tokio::test]
    async fn test_overlapping_save_is_rejected() {
        let editor = RefCell::new(EditorState::default());
        editor.borrow_mut().update("profile.shopName", Node::from("First"));
        let store = MemoryStore { gate: Some(Notify::new()), ..MemoryStore::default() };
        let identity = signed_in();

        let (first, second, ()) = tokio::join!(
            save(&editor, &identity, &store),
            save(&editor, &identity, &store),
            async {
                // Runs while the first save waits in persist
                editor.borrow_mut().update("profile.shopName", Node::from("Second"));
                if let Some(gate) = &store.gate {
                    gate.notify_one();
                }
            },
        );

        assert_eq!(first.unwrap().display_name.as_deref(), Some("First"));
        assert!(matches!(second, Err(SaveError::InFlight)));
        assert_eq!(store.calls.get(), 1);
        assert_eq!(
            get_at_path(editor.borrow().document(), "profile.shopName").and_then(Node::as_str),
            Some("Second")
        );
    }

    #[tokio::test]
    async fn test_dropped_save_clears_in_flight_flag() {
        let editor = RefCell::new(EditorState::default());
        let store = MemoryStore { gate: Some(Notify::new()), ..MemoryStore::default() };
        let identity = signed_in();

        // The save parks in persist; the ready branch wins and the save is dropped
        tokio::select! {
            biased;
            _ = save(&editor, &identity, &store) => panic!("save finished while gated"),
            _ = std::future::ready(()) => {}
        }

        assert!(!editor.borrow().is_saving());
        assert_eq!(store.calls.get(), 1);
        assert!(store.saved.borrow().is_empty());

        if let Some(gate) = &store.gate {
            gate.notify_one();
        }
        save(&editor, &identity, &store).await.unwrap();
        assert_eq!(store.saved.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_open_session_hydrates_stored_document() {
        let store = MemoryStore::default();
        store.saved.borrow_mut().push((
            "u1".to_string(),
            Node::from(json!({ "font": "Lobster" })),
            None,
        ));

        let editor = open_session(&signed_in(), &store).await.unwrap();

        assert_eq!(
            get_at_path(editor.document(), "fonts.body").and_then(Node::as_str),
            Some("Lobster")
        );
        assert_eq!(editor.catalog().len(), 1);
        assert_eq!(editor.catalog_version(), 1);
    }

    #[tokio::test]
    async fn test_open_session_requires_user() {
        let err = open_session(&Identity(None), &MemoryStore::default()).await.unwrap_err();
        assert!(err.to_string().contains("No signed-in user"));
    }
}
