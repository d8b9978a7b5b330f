#![forbid(unsafe_code)]

//! Persistence contracts for page stacks and the deck shape.
//!
//! The deck core does not own durable storage; it talks to two repository
//! contracts and a shared cache-cell type:
//!
//! - [`PageStackRepository`] - saves/loads individual page stacks, handing
//!   back [`StackCell`]s (shared mutable cache cells the deck reads and
//!   replaces wholesale, copy-on-write)
//! - [`DeckRepository`] - saves/loads the recursive [`DeckShape`], which
//!   references stacks by identity so the persisted deck reuses
//!   already-serialized pages
//! - [`MemoryStore`] - an in-process backend implementing both, used for
//!   tests and ephemeral sessions
//!
//! # Design Invariants
//!
//! 1. Storage failures never panic; operations return [`StorageResult`].
//! 2. Load failures are recovered *above* this crate: the session-restore
//!    boundary substitutes a default deck and wipes the bad store. Nothing
//!    here retries or repairs.
//! 3. A cell handed out by `save_stack`/`load_stack` for an id is the same
//!    cell every time, so all holders observe each other's writes.

pub mod memory;
pub mod shape;

pub use memory::MemoryStore;
pub use shape::DeckShape;

use std::fmt;
use std::sync::{Arc, RwLock};

use pagedeck_core::{PageStack, PageStackId};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O failure in a durable backend.
    Io(std::io::Error),
    /// Encode/decode failure for a persisted payload.
    Serialization(String),
    /// The store holds no saved deck or stack for the requested identity.
    NotFound(String),
    /// The persisted payload is present but structurally invalid.
    Corruption(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::NotFound(what) => write!(f, "not found: {what}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ---------------------------------------------------------------------------
// StackCell
// ---------------------------------------------------------------------------

/// A shared cache cell holding the current value of one page stack.
///
/// The persistence layer owns the cell; the deck holds clones of it. Reads
/// return the whole current value, writes replace it wholesale - per-page
/// edits happen by building a new [`PageStack`] and calling
/// [`StackCell::set`].
#[derive(Debug)]
pub struct StackCell<P> {
    inner: Arc<RwLock<PageStack<P>>>,
}

impl<P> Clone for StackCell<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Clone> StackCell<P> {
    /// Wrap a stack value in a fresh cell.
    pub fn new(stack: PageStack<P>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(stack)),
        }
    }

    /// Identity of the contained stack. Stable across `set` calls.
    pub fn id(&self) -> PageStackId {
        self.get().id()
    }

    /// Read the current stack value (cheap: stacks share page storage).
    pub fn get(&self) -> PageStack<P> {
        self.inner
            .read()
            .expect("page stack cell lock poisoned")
            .clone()
    }

    /// Replace the stack value.
    pub fn set(&self, stack: PageStack<P>) {
        *self
            .inner
            .write()
            .expect("page stack cell lock poisoned") = stack;
    }
}

// ---------------------------------------------------------------------------
// Repository contracts
// ---------------------------------------------------------------------------

/// Storage for individual page stacks.
pub trait PageStackRepository<P> {
    /// Persist a stack and return its shared cache cell.
    ///
    /// Saving a stack whose id is already stored updates the existing
    /// cell (and returns it) rather than allocating a second one.
    fn save_stack(&self, stack: &PageStack<P>) -> StorageResult<StackCell<P>>;

    /// Load the cache cell for a previously saved stack.
    fn load_stack(&self, id: PageStackId) -> StorageResult<StackCell<P>>;

    /// Remove every saved stack.
    fn delete_all_stacks(&self) -> StorageResult<()>;
}

/// Storage for the deck's tree shape.
///
/// The shape references page stacks by identity; resolving those
/// references goes through [`PageStackRepository`].
pub trait DeckRepository {
    /// Persist the deck shape, replacing any previous one.
    fn save_deck(&self, shape: &DeckShape) -> StorageResult<()>;

    /// Load the most recently saved deck shape.
    fn load_deck(&self) -> StorageResult<DeckShape>;

    /// Remove the saved deck shape.
    fn delete_deck(&self) -> StorageResult<()>;
}
