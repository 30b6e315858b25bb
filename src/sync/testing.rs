//! In-memory stand-ins for the browser pieces the sync engine talks to.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::cache::KeyValueStore;
use super::channel::{Defer, SaveBroadcast, SaveChannel};
use super::engine::{ChipHandle, ChipSurface};
use crate::error::StorageError;
use crate::state::save::ChipState;

type StorageListener = Rc<dyn Fn(&str, Option<&str>)>;

/// Storage area shared by several simulated tabs of one origin.
///
/// Like the browser, a write notifies every tab except the writer, and only
/// when the value actually changes.
#[derive(Default)]
pub struct Origin {
    entries: RefCell<HashMap<String, String>>,
    listeners: RefCell<Vec<(usize, StorageListener)>>,
    next_tab: Cell<usize>,
    pub fail_writes: Cell<bool>,
}

impl Origin {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn open_tab(self: &Rc<Self>) -> TabStore {
        let tab = self.next_tab.get();
        self.next_tab.set(tab + 1);
        TabStore {
            origin: Rc::clone(self),
            tab,
        }
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn notify(&self, writer: usize, key: &str, new_value: Option<&str>) {
        let targets: Vec<StorageListener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(tab, _)| *tab != writer)
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in targets {
            listener(key, new_value);
        }
    }
}

/// One tab's handle on the shared [`Origin`].
#[derive(Clone)]
pub struct TabStore {
    origin: Rc<Origin>,
    tab: usize,
}

impl TabStore {
    /// Register this tab's `storage` event listener.
    pub fn on_storage(&self, listener: impl Fn(&str, Option<&str>) + 'static) {
        self.origin
            .listeners
            .borrow_mut()
            .push((self.tab, Rc::new(listener)));
    }

    pub fn seed(&self, key: &str, value: &str) {
        self.origin
            .entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
    }
}

impl KeyValueStore for TabStore {
    fn get(&self, key: &str) -> Option<String> {
        self.origin.raw(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.origin.fail_writes.get() {
            return Err(StorageError::Write("quota exceeded".to_owned()));
        }
        let previous = self
            .origin
            .entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        if previous.as_deref() != Some(value) {
            self.origin.notify(self.tab, key, Some(value));
        }
        Ok(())
    }

    fn remove(&self, key: &str) {
        let previous = self.origin.entries.borrow_mut().remove(key);
        if previous.is_some() {
            self.origin.notify(self.tab, key, None);
        }
    }
}

/// Tasks deferred to "the next turn", run explicitly by the test.
#[derive(Clone, Default)]
pub struct TaskQueue {
    tasks: Rc<RefCell<Vec<Box<dyn FnOnce()>>>>,
}

impl TaskQueue {
    pub fn defer(&self) -> Defer {
        let tasks = Rc::clone(&self.tasks);
        Box::new(move |task| tasks.borrow_mut().push(task))
    }

    pub fn run_all(&self) {
        let pending: Vec<_> = self.tasks.borrow_mut().drain(..).collect();
        for task in pending {
            task();
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }
}

/// Channel that only records what was published.
#[derive(Clone, Default)]
pub struct RecordingChannel {
    pub sent: Rc<RefCell<Vec<SaveBroadcast>>>,
}

impl SaveChannel for RecordingChannel {
    fn publish(&self, message: &SaveBroadcast) {
        self.sent.borrow_mut().push(*message);
    }
}

struct ChipInner {
    recipe_id: Option<u32>,
    markup_saved: bool,
    state: Cell<Option<ChipState>>,
    renders: Cell<usize>,
}

/// A save chip with no DOM behind it.
#[derive(Clone)]
pub struct FakeChip(Rc<ChipInner>);

impl FakeChip {
    pub fn new(recipe_id: Option<u32>, markup_saved: bool) -> Self {
        Self(Rc::new(ChipInner {
            recipe_id,
            markup_saved,
            state: Cell::new(None),
            renders: Cell::new(0),
        }))
    }

    pub fn shown(&self) -> Option<ChipState> {
        self.0.state.get()
    }

    pub fn label(&self) -> Option<&'static str> {
        self.shown().map(ChipState::label)
    }

    pub fn disabled(&self) -> bool {
        self.shown().is_some_and(ChipState::is_pending)
    }

    pub fn renders(&self) -> usize {
        self.0.renders.get()
    }
}

impl ChipHandle for FakeChip {
    fn recipe_id(&self) -> Option<u32> {
        self.0.recipe_id
    }

    fn state(&self) -> Option<ChipState> {
        self.0.state.get()
    }

    fn markup_saved(&self) -> bool {
        self.0.markup_saved
    }

    fn render(&self, state: ChipState) {
        self.0.state.set(Some(state));
        self.0.renders.set(self.0.renders.get() + 1);
    }

    fn same_control(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A page: a flat list of chips; a "subtree" is any slice of them.
#[derive(Clone, Default)]
pub struct FakePage {
    chips: Rc<RefCell<Vec<FakeChip>>>,
}

impl FakePage {
    pub fn add(&self, recipe_id: Option<u32>, markup_saved: bool) -> FakeChip {
        let chip = FakeChip::new(recipe_id, markup_saved);
        self.chips.borrow_mut().push(chip.clone());
        chip
    }

    pub fn all(&self) -> Vec<FakeChip> {
        self.chips.borrow().clone()
    }
}

impl ChipSurface for FakePage {
    type Root = Vec<FakeChip>;
    type Chip = FakeChip;

    fn chips_in(&self, root: &Self::Root) -> Vec<FakeChip> {
        root.clone()
    }

    fn chips_for(&self, recipe_id: u32) -> Vec<FakeChip> {
        self.chips
            .borrow()
            .iter()
            .filter(|chip| chip.recipe_id() == Some(recipe_id))
            .cloned()
            .collect()
    }

    fn all_chips(&self) -> Vec<FakeChip> {
        self.all()
    }
}
