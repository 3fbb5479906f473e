//! In-process library host.
//!
//! [`MemoryLibrary`] keeps items, note bodies, and annotations in memory and
//! implements [`LibraryHost`] over them. It records every host call and can
//! be told to fail specific calls, which makes it the test double for the
//! summary engine as well as the host the CLI runs against.
//!
//! ## Usage
//!
//! ```rust
//! use hilite_core::{AttachmentKind, Item, LibraryHost};
//! use hilite_library::MemoryLibrary;
//!
//! # tokio_test_block_on(async {
//! let library = MemoryLibrary::new()
//!     .with_item(Item::regular(1, "ITEM0001", "A Book"))
//!     .with_item(Item::attachment(2, "ATT00002", Some(1), AttachmentKind::Pdf, None))
//!     .with_selected(1);
//!
//! assert_eq!(library.attachments(1).await.unwrap().len(), 1);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use tracing::debug;

use hilite_core::defaults::{URI_LIBRARY_PATH, URI_SCHEME};
use hilite_core::{
    Annotation, AnnotationPosition, CreateNoteRequest, Error, Item, ItemId, ItemKind,
    LibraryHost, Result,
};

use crate::snapshot::LibrarySnapshot;

/// Characters used in generated item keys.
const KEY_ALPHABET: &[u8] = b"23456789ABCDEFGHIJKLMNPQRSTUVWXYZ";
const KEY_LENGTH: usize = 8;

/// A host call, as recorded in the call log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    SelectedItem,
    Item(ItemId),
    Attachments(ItemId),
    Notes(ItemId),
    NoteBody(ItemId),
    Annotations(ItemId),
    Trash(Vec<ItemId>),
    SaveNote(ItemId),
    SelectItems(Vec<ItemId>),
}

impl HostCall {
    /// Whether the call mutates the library.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Trash(_) | Self::SaveNote(_))
    }
}

/// A call the library should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    /// Trashing this item fails.
    Trash(ItemId),
    /// Fetching annotations of this attachment fails.
    Annotations(ItemId),
    /// Reading this note's body fails.
    NoteBody(ItemId),
    /// Listing notes under this parent fails.
    Notes(ItemId),
    /// The n-th (zero-based) `save_note` call fails.
    SaveNumber(usize),
}

#[derive(Debug, Clone)]
struct State {
    editable: bool,
    selected: Option<ItemId>,
    items: BTreeMap<ItemId, Item>,
    notes: BTreeMap<ItemId, String>,
    annotations: BTreeMap<ItemId, Vec<Annotation>>,
    trashed: BTreeSet<ItemId>,
    pane_selection: Vec<ItemId>,
    save_count: usize,
}

impl State {
    fn empty() -> Self {
        Self {
            editable: true,
            selected: None,
            items: BTreeMap::new(),
            notes: BTreeMap::new(),
            annotations: BTreeMap::new(),
            trashed: BTreeSet::new(),
            pane_selection: Vec::new(),
            save_count: 0,
        }
    }

    fn live_item(&self, id: ItemId) -> Result<&Item> {
        match self.items.get(&id) {
            Some(item) if !self.trashed.contains(&id) => Ok(item),
            _ => Err(Error::ItemNotFound(id)),
        }
    }

    fn children(&self, parent: ItemId, kind: ItemKind) -> Vec<Item> {
        self.items
            .values()
            .filter(|item| {
                item.parent_id == Some(parent)
                    && item.kind == kind
                    && !self.trashed.contains(&item.id)
            })
            .cloned()
            .collect()
    }

    fn next_id(&self) -> ItemId {
        self.items.keys().next_back().map_or(1, |max| max + 1)
    }

    fn new_key(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let key: String = (0..KEY_LENGTH)
                .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
                .collect();
            if !self.items.values().any(|item| item.key == key) {
                return key;
            }
        }
    }
}

/// In-memory [`LibraryHost`].
#[derive(Clone)]
pub struct MemoryLibrary {
    state: Arc<Mutex<State>>,
    failures: Arc<Mutex<HashSet<FailurePoint>>>,
    call_log: Arc<Mutex<Vec<HostCall>>>,
}

impl Default for MemoryLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLibrary {
    /// Create an empty, editable library.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::empty())),
            failures: Arc::new(Mutex::new(HashSet::new())),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Build a library from a validated snapshot.
    pub fn from_snapshot(snapshot: LibrarySnapshot) -> Result<Self> {
        snapshot.validate()?;
        let library = Self::new();
        {
            let mut state = library.lock_state();
            state.editable = snapshot.editable;
            state.selected = snapshot.selected;
            state.items = snapshot
                .items
                .into_iter()
                .map(|item| (item.id, item))
                .collect();
            state.notes = snapshot.notes;
            state.annotations = snapshot.annotations;
            state.trashed = snapshot.trashed;
        }
        Ok(library)
    }

    /// Current state as a snapshot.
    pub fn snapshot(&self) -> LibrarySnapshot {
        let state = self.lock_state();
        LibrarySnapshot {
            editable: state.editable,
            selected: state.selected,
            items: state.items.values().cloned().collect(),
            notes: state.notes.clone(),
            annotations: state.annotations.clone(),
            trashed: state.trashed.clone(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: HostCall) {
        self.call_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }

    fn should_fail(&self, point: FailurePoint) -> bool {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(&point)
    }

    // ─── Builders ──────────────────────────────────────────────────────────

    /// Add an item.
    pub fn with_item(self, item: Item) -> Self {
        self.lock_state().items.insert(item.id, item);
        self
    }

    /// Add a child note with a body.
    pub fn with_note(self, id: ItemId, parent_id: ItemId, body: impl Into<String>) -> Self {
        {
            let mut state = self.lock_state();
            let key = state.new_key();
            state.items.insert(id, Item::note(id, key, Some(parent_id)));
            state.notes.insert(id, body.into());
        }
        self
    }

    /// Set the annotations of an attachment.
    pub fn with_annotations(self, attachment_id: ItemId, annotations: Vec<Annotation>) -> Self {
        self.lock_state()
            .annotations
            .insert(attachment_id, annotations);
        self
    }

    /// Select an item.
    pub fn with_selected(self, id: ItemId) -> Self {
        self.lock_state().selected = Some(id);
        self
    }

    /// Set pane editability.
    pub fn with_editable(self, editable: bool) -> Self {
        self.lock_state().editable = editable;
        self
    }

    /// Make a specific call fail.
    pub fn with_failure(self, point: FailurePoint) -> Self {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(point);
        self
    }

    // ─── Mutators ──────────────────────────────────────────────────────────

    /// Change the selected item.
    pub fn select(&self, id: Option<ItemId>) -> Result<()> {
        let mut state = self.lock_state();
        if let Some(id) = id {
            state.live_item(id)?;
        }
        state.selected = id;
        Ok(())
    }

    // ─── Inspection ────────────────────────────────────────────────────────

    /// All recorded host calls.
    pub fn calls(&self) -> Vec<HostCall> {
        self.call_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of recorded mutating calls.
    pub fn mutation_count(&self) -> usize {
        self.calls().iter().filter(|call| call.is_mutation()).count()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear()
    }

    /// Ids of live (non-trashed) child notes of `parent`.
    pub fn note_ids(&self, parent: ItemId) -> Vec<ItemId> {
        self.lock_state()
            .children(parent, ItemKind::Note)
            .into_iter()
            .map(|note| note.id)
            .collect()
    }

    /// Body of a note, trashed or not.
    pub fn body_of(&self, note: ItemId) -> Option<String> {
        self.lock_state().notes.get(&note).cloned()
    }

    /// Bodies of live child notes of `parent`, in id order.
    pub fn note_bodies(&self, parent: ItemId) -> Vec<String> {
        let state = self.lock_state();
        state
            .children(parent, ItemKind::Note)
            .iter()
            .filter_map(|note| state.notes.get(&note.id).cloned())
            .collect()
    }

    /// Whether an item is in the trash.
    pub fn is_trashed(&self, id: ItemId) -> bool {
        self.lock_state().trashed.contains(&id)
    }

    /// Items last selected through [`LibraryHost::select_items`].
    pub fn pane_selection(&self) -> Vec<ItemId> {
        self.lock_state().pane_selection.clone()
    }
}

#[async_trait]
impl LibraryHost for MemoryLibrary {
    async fn is_editable(&self) -> bool {
        self.lock_state().editable
    }

    async fn selected_item(&self) -> Result<Option<Item>> {
        self.record(HostCall::SelectedItem);
        let state = self.lock_state();
        match state.selected {
            Some(id) => state.live_item(id).map(|item| Some(item.clone())),
            None => Ok(None),
        }
    }

    async fn item(&self, id: ItemId) -> Result<Item> {
        self.record(HostCall::Item(id));
        self.lock_state().live_item(id).cloned()
    }

    async fn attachments(&self, parent: ItemId) -> Result<Vec<Item>> {
        self.record(HostCall::Attachments(parent));
        Ok(self.lock_state().children(parent, ItemKind::Attachment))
    }

    async fn notes(&self, parent: ItemId) -> Result<Vec<Item>> {
        self.record(HostCall::Notes(parent));
        if self.should_fail(FailurePoint::Notes(parent)) {
            return Err(Error::Host(format!("listing notes of {} failed", parent)));
        }
        Ok(self.lock_state().children(parent, ItemKind::Note))
    }

    async fn note_body(&self, note: ItemId) -> Result<Option<String>> {
        self.record(HostCall::NoteBody(note));
        if self.should_fail(FailurePoint::NoteBody(note)) {
            return Err(Error::Host(format!("reading note {} failed", note)));
        }
        let state = self.lock_state();
        let item = state.live_item(note)?;
        if !item.is_note() {
            return Err(Error::InvalidInput(format!("item {} is not a note", note)));
        }
        Ok(state.notes.get(&note).cloned())
    }

    async fn annotations(&self, attachment: ItemId) -> Result<Vec<Annotation>> {
        self.record(HostCall::Annotations(attachment));
        if self.should_fail(FailurePoint::Annotations(attachment)) {
            return Err(Error::Host(format!(
                "loading annotations of {} failed",
                attachment
            )));
        }
        let state = self.lock_state();
        state.live_item(attachment)?;
        Ok(state
            .annotations
            .get(&attachment)
            .cloned()
            .unwrap_or_default())
    }

    fn annotation_uri(&self, attachment: &Item, annotation: &Annotation) -> String {
        let route = attachment
            .attachment_kind
            .map_or("select", |kind| kind.reader_route());
        let page = AnnotationPosition::parse(&annotation.position)
            .ok()
            .and_then(|position| position.page_number());

        let mut uri = format!(
            "{}://{}/{}/{}?",
            URI_SCHEME, route, URI_LIBRARY_PATH, attachment.key
        );
        if let Some(page) = page {
            uri.push_str(&format!("page={}&", page));
        }
        uri.push_str(&format!("annotation={}", annotation.key));
        uri
    }

    async fn trash(&self, ids: &[ItemId]) -> Result<()> {
        self.record(HostCall::Trash(ids.to_vec()));
        if let Some(id) = ids
            .iter()
            .find(|id| self.should_fail(FailurePoint::Trash(**id)))
        {
            return Err(Error::Transaction(format!("trashing item {} failed", id)));
        }

        let mut state = self.lock_state();
        for id in ids {
            state.live_item(*id)?;
        }
        state.trashed.extend(ids.iter().copied());
        debug!(count = ids.len(), "Moved items to trash");
        Ok(())
    }

    async fn save_note(&self, req: CreateNoteRequest) -> Result<ItemId> {
        self.record(HostCall::SaveNote(req.parent_id));
        let mut state = self.lock_state();
        let attempt = state.save_count;
        state.save_count += 1;

        if self.should_fail(FailurePoint::SaveNumber(attempt)) {
            return Err(Error::Transaction(format!("save #{} rolled back", attempt)));
        }
        if !state.live_item(req.parent_id)?.is_regular() {
            return Err(Error::InvalidInput(format!(
                "notes can only be added to regular items, {} is not one",
                req.parent_id
            )));
        }

        let id = state.next_id();
        let key = state.new_key();
        let mut note = Item::note(id, key, Some(req.parent_id));
        note.date_added = Utc::now();
        state.items.insert(id, note);
        state.notes.insert(id, req.body);
        debug!(note_id = id, parent_id = req.parent_id, "Saved note");
        Ok(id)
    }

    async fn select_items(&self, ids: &[ItemId]) -> Result<()> {
        self.record(HostCall::SelectItems(ids.to_vec()));
        self.lock_state().pane_selection = ids.to_vec();
        Ok(())
    }
}
