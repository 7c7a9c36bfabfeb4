//! In-process implementation of the storage and identity contracts, for
//! local runs and tests.
//!
//! Rows are scoped to their owner the way row-level security scopes them in
//! the hosted store: a caller never sees another user's prompts or media.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use bytes::Bytes;
use playground_core::{
    error::{PlaygroundError, Result},
    store::{
        Caller, IdentityProvider, MediaCategory, MediaRecord, MediaStore, NewMediaRecord,
        PromptRecord,
    },
};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

#[derive(Debug, Default)]
struct State {
    sessions: HashMap<String, Caller>,
    prompts: HashMap<String, (String, PromptRecord)>,
    media: Vec<MediaRecord>,
    objects: HashMap<String, StoredObject>,
    next_id: u64,
}

/// Cheap to clone; clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    reject_inserts: Arc<AtomicBool>,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct MemoryStoreError(String);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accept `access_token` as a session for `caller`.
    pub fn add_session(&self, access_token: impl Into<String>, caller: Caller) {
        self.state().sessions.insert(access_token.into(), caller);
    }

    /// Store `prompt` as owned by `user_id`.
    pub fn add_prompt(&self, user_id: impl Into<String>, prompt: PromptRecord) {
        self.state()
            .prompts
            .insert(prompt.id.clone(), (user_id.into(), prompt));
    }

    /// Store an input (or output) media row together with its object.
    pub fn add_media(&self, record: NewMediaRecord, object: StoredObject) -> MediaRecord {
        let mut state = self.state();
        state.objects.insert(record.path.clone(), object);
        Self::push_media(&mut state, record)
    }

    /// Make every following `insert_media` fail.
    pub fn reject_inserts(&self, reject: bool) {
        self.reject_inserts.store(reject, Ordering::SeqCst);
    }

    pub fn media(&self) -> Vec<MediaRecord> {
        self.state().media.clone()
    }

    pub fn object(&self, path: &str) -> Option<StoredObject> {
        self.state().objects.get(path).cloned()
    }

    pub fn object_paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self.state().objects.keys().cloned().collect();
        paths.sort();
        paths
    }

    fn push_media(state: &mut State, record: NewMediaRecord) -> MediaRecord {
        state.next_id += 1;
        let row = MediaRecord {
            id: format!("media-{}", state.next_id),
            prompt_id: record.prompt_id,
            path: record.path,
            kind: record.kind,
            category: record.category,
            tag: record.tag,
            position: record.position,
            user_id: record.user_id,
        };
        state.media.push(row.clone());
        row
    }

    fn owns_path(caller: &Caller, path: &str) -> bool {
        path.split('/').next() == Some(caller.user_id.as_str())
    }
}

fn denied(what: impl Into<String>) -> PlaygroundError {
    PlaygroundError::storage(MemoryStoreError(what.into()))
}

impl IdentityProvider for MemoryStore {
    fn authenticate<'a>(&'a self, access_token: &'a str) -> BoxFuture<'a, Option<Caller>> {
        let caller = self.state().sessions.get(access_token).cloned();
        Box::pin(async move { Ok(caller) })
    }
}

impl MediaStore for MemoryStore {
    fn fetch_prompt<'a>(&'a self, caller: &'a Caller, prompt_id: &'a str) -> BoxFuture<'a, Option<PromptRecord>> {
        let prompt = self
            .state()
            .prompts
            .get(prompt_id)
            .filter(|(owner, _)| *owner == caller.user_id)
            .map(|(_, prompt)| prompt.clone());
        Box::pin(async move { Ok(prompt) })
    }

    fn fetch_media<'a>(
        &'a self,
        caller: &'a Caller,
        prompt_id: &'a str,
        category: MediaCategory,
    ) -> BoxFuture<'a, Vec<MediaRecord>> {
        let rows = self
            .state()
            .media
            .iter()
            .filter(|row| {
                row.user_id == caller.user_id && row.prompt_id == prompt_id && row.category == category
            })
            .cloned()
            .collect();
        Box::pin(async move { Ok(rows) })
    }

    fn insert_media<'a>(&'a self, caller: &'a Caller, record: NewMediaRecord) -> BoxFuture<'a, MediaRecord> {
        let result = if self.reject_inserts.load(Ordering::SeqCst) {
            Err(denied("media insert rejected"))
        } else if record.user_id != caller.user_id {
            Err(denied("row belongs to another user"))
        } else {
            Ok(Self::push_media(&mut self.state(), record))
        };
        Box::pin(async move { result })
    }

    fn delete_media<'a>(&'a self, caller: &'a Caller, media_id: &'a str) -> BoxFuture<'a, ()> {
        self.state()
            .media
            .retain(|row| !(row.id == media_id && row.user_id == caller.user_id));
        Box::pin(async move { Ok(()) })
    }

    fn upload_object<'a>(
        &'a self,
        caller: &'a Caller,
        path: &'a str,
        data: Bytes,
        content_type: &'a str,
    ) -> BoxFuture<'a, ()> {
        let result = if Self::owns_path(caller, path) {
            self.state().objects.insert(
                path.to_owned(),
                StoredObject {
                    data,
                    content_type: content_type.to_owned(),
                },
            );
            Ok(())
        } else {
            Err(denied(format!("cannot write `{path}`")))
        };
        Box::pin(async move { result })
    }

    fn remove_object<'a>(&'a self, caller: &'a Caller, path: &'a str) -> BoxFuture<'a, ()> {
        if Self::owns_path(caller, path) {
            self.state().objects.remove(path);
        }
        Box::pin(async move { Ok(()) })
    }

    fn sign_url<'a>(&'a self, caller: &'a Caller, path: &'a str, ttl: Duration) -> BoxFuture<'a, String> {
        let result = if !Self::owns_path(caller, path) {
            Err(denied(format!("cannot read `{path}`")))
        } else if !self.state().objects.contains_key(path) {
            Err(denied(format!("object `{path}` not found")))
        } else {
            Ok(format!("memory://{path}?expires_in={}", ttl.as_secs()))
        };
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use playground_core::model::MediaKind;

    use super::*;

    fn caller(user_id: &str) -> Caller {
        Caller {
            user_id: user_id.into(),
            access_token: format!("{user_id}-token"),
            runway_api_key: None,
        }
    }

    fn prompt(id: &str) -> PromptRecord {
        PromptRecord {
            id: id.into(),
            prompt_text: "a lighthouse".into(),
            model: None,
            generation_type: None,
            ratio: None,
        }
    }

    #[tokio::test]
    async fn prompts_are_scoped_to_their_owner() {
        let store = MemoryStore::new();
        store.add_prompt("alice", prompt("p1"));

        assert!(store.fetch_prompt(&caller("alice"), "p1").await.unwrap().is_some());
        assert!(store.fetch_prompt(&caller("bob"), "p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn objects_live_under_the_owner_prefix() {
        let store = MemoryStore::new();
        let alice = caller("alice");

        store
            .upload_object(&alice, "alice/p1.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();
        assert!(store
            .upload_object(&alice, "bob/p1.png", Bytes::from_static(b"png"), "image/png")
            .await
            .is_err());

        let url = store
            .sign_url(&alice, "alice/p1.png", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(url, "memory://alice/p1.png?expires_in=60");

        store.remove_object(&alice, "alice/p1.png").await.unwrap();
        assert!(store.object_paths().is_empty());
    }

    #[tokio::test]
    async fn rejected_inserts_leave_no_row() {
        let store = MemoryStore::new();
        let alice = caller("alice");
        store.reject_inserts(true);

        let record = NewMediaRecord {
            prompt_id: "p1".into(),
            path: "alice/p1.mp4".into(),
            kind: MediaKind::Video,
            category: MediaCategory::Output,
            tag: None,
            position: None,
            user_id: "alice".into(),
        };
        assert!(matches!(
            store.insert_media(&alice, record).await,
            Err(PlaygroundError::Storage(_))
        ));
        assert!(store.media().is_empty());
    }
}
