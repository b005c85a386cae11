//! Command enum: the closed protocol of the storage module.
//!
//! Each variant carries a typed payload, so a [`Command`] that exists is
//! already well formed. Untyped callers go through
//! [`Command::from_positional`], which validates a command name plus
//! positional [`Param`]s once, before anything touches the engine.

use stash_core::{BatchId, IteratorId, Key, Value};

use crate::{Error, Result};

/// A named operation accepted by the [`Executor`](crate::Executor)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write `value` under `key` immediately
    Put {
        /// Target key
        key: Key,
        /// Value to store
        value: Value,
    },

    /// Read `key`; an absent key reads as an empty value
    Get {
        /// Key to read
        key: Key,
    },

    /// Check whether `key` is stored
    Has {
        /// Key to check
        key: Key,
    },

    /// Remove `key`; removing an absent key succeeds
    Delete {
        /// Key to remove
        key: Key,
    },

    /// Discard any pending session and start a fresh, empty one
    NewBatch,

    /// Queue a put into the session
    BatchPut {
        /// Session to target; `None` means the active session
        batch: Option<BatchId>,
        /// Target key
        key: Key,
        /// Value to store
        value: Value,
    },

    /// Queue a delete into the session
    BatchDelete {
        /// Session to target; `None` means the active session
        batch: Option<BatchId>,
        /// Key to remove
        key: Key,
    },

    /// Atomically apply every queued operation
    BatchCommit {
        /// Session to commit; `None` means the active session
        batch: Option<BatchId>,
    },

    /// Release the engine
    Close,

    /// Open a cursor over every key starting with `prefix`
    NewIterator {
        /// Key prefix to match
        prefix: Key,
    },

    /// Advance a cursor
    IteratorNext {
        /// Cursor to advance
        iterator: IteratorId,
    },

    /// Release a cursor
    IteratorRelease {
        /// Cursor to release
        iterator: IteratorId,
    },
}

/// Every command name the protocol recognizes
pub const COMMAND_NAMES: [&str; 12] = [
    "Put",
    "Get",
    "Has",
    "Delete",
    "NewBatch",
    "BatchPut",
    "BatchDelete",
    "BatchCommit",
    "Close",
    "NewIterator",
    "IteratorNext",
    "IteratorRelease",
];

impl Command {
    /// Protocol name of this command
    pub fn name(&self) -> &'static str {
        match self {
            Command::Put { .. } => "Put",
            Command::Get { .. } => "Get",
            Command::Has { .. } => "Has",
            Command::Delete { .. } => "Delete",
            Command::NewBatch => "NewBatch",
            Command::BatchPut { .. } => "BatchPut",
            Command::BatchDelete { .. } => "BatchDelete",
            Command::BatchCommit { .. } => "BatchCommit",
            Command::Close => "Close",
            Command::NewIterator { .. } => "NewIterator",
            Command::IteratorNext { .. } => "IteratorNext",
            Command::IteratorRelease { .. } => "IteratorRelease",
        }
    }

    /// Check if this command changes stored data when it succeeds
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::Put { .. } | Command::Delete { .. } | Command::BatchCommit { .. }
        )
    }

    /// Build a command from its name and positional parameters
    ///
    /// Shapes:
    ///
    /// | Command | Params |
    /// |---------|--------|
    /// | Put | key, value |
    /// | Get, Has, Delete | key |
    /// | NewBatch, Close | (none) |
    /// | BatchPut | \[batch,\] key, value |
    /// | BatchDelete | \[batch,\] key |
    /// | BatchCommit | \[batch\] |
    /// | NewIterator | prefix |
    /// | IteratorNext, IteratorRelease | iterator |
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownCommand`] if `name` is not a protocol command
    /// - [`Error::InvalidArgument`] if a parameter is missing, surplus, or of
    ///   the wrong shape
    pub fn from_positional(name: &str, params: Vec<Param>) -> Result<Command> {
        let mut p = Params::new(name, params);

        let command = match name {
            "Put" => {
                p.expect_len(&[2])?;
                Command::Put {
                    key: p.bytes("key")?,
                    value: p.bytes("value")?,
                }
            }
            "Get" => {
                p.expect_len(&[1])?;
                Command::Get {
                    key: p.bytes("key")?,
                }
            }
            "Has" => {
                p.expect_len(&[1])?;
                Command::Has {
                    key: p.bytes("key")?,
                }
            }
            "Delete" => {
                p.expect_len(&[1])?;
                Command::Delete {
                    key: p.bytes("key")?,
                }
            }
            "NewBatch" => {
                p.expect_len(&[0])?;
                Command::NewBatch
            }
            "BatchPut" => {
                p.expect_len(&[2, 3])?;
                let batch = if p.len() == 3 {
                    Some(BatchId::new(p.handle("batch")?))
                } else {
                    None
                };
                Command::BatchPut {
                    batch,
                    key: p.bytes("key")?,
                    value: p.bytes("value")?,
                }
            }
            "BatchDelete" => {
                p.expect_len(&[1, 2])?;
                let batch = if p.len() == 2 {
                    Some(BatchId::new(p.handle("batch")?))
                } else {
                    None
                };
                Command::BatchDelete {
                    batch,
                    key: p.bytes("key")?,
                }
            }
            "BatchCommit" => {
                p.expect_len(&[0, 1])?;
                let batch = if p.len() == 1 {
                    Some(BatchId::new(p.handle("batch")?))
                } else {
                    None
                };
                Command::BatchCommit { batch }
            }
            "Close" => {
                p.expect_len(&[0])?;
                Command::Close
            }
            "NewIterator" => {
                p.expect_len(&[1])?;
                Command::NewIterator {
                    prefix: p.bytes("prefix")?,
                }
            }
            "IteratorNext" => {
                p.expect_len(&[1])?;
                Command::IteratorNext {
                    iterator: IteratorId::new(p.handle("iterator")?),
                }
            }
            "IteratorRelease" => {
                p.expect_len(&[1])?;
                Command::IteratorRelease {
                    iterator: IteratorId::new(p.handle("iterator")?),
                }
            }
            other => {
                return Err(Error::UnknownCommand {
                    command: other.to_string(),
                })
            }
        };

        Ok(command)
    }
}

/// Untyped positional parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Opaque bytes (keys, values, prefixes)
    Bytes(Vec<u8>),
    /// Numeric resource handle (batches, iterators)
    Handle(u64),
}

impl Param {
    fn kind(&self) -> &'static str {
        match self {
            Param::Bytes(_) => "bytes",
            Param::Handle(_) => "handle",
        }
    }
}

impl From<Vec<u8>> for Param {
    fn from(bytes: Vec<u8>) -> Self {
        Param::Bytes(bytes)
    }
}

impl From<&[u8]> for Param {
    fn from(bytes: &[u8]) -> Self {
        Param::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Param {
    fn from(bytes: &[u8; N]) -> Self {
        Param::Bytes(bytes.to_vec())
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Param::Bytes(s.as_bytes().to_vec())
    }
}

impl From<u64> for Param {
    fn from(handle: u64) -> Self {
        Param::Handle(handle)
    }
}

impl From<BatchId> for Param {
    fn from(id: BatchId) -> Self {
        Param::Handle(id.as_u64())
    }
}

impl From<IteratorId> for Param {
    fn from(id: IteratorId) -> Self {
        Param::Handle(id.as_u64())
    }
}

/// Cursor over positional params with shape checks
struct Params<'a> {
    command: &'a str,
    len: usize,
    position: usize,
    items: std::vec::IntoIter<Param>,
}

impl<'a> Params<'a> {
    fn new(command: &'a str, params: Vec<Param>) -> Self {
        Self {
            command,
            len: params.len(),
            position: 0,
            items: params.into_iter(),
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn expect_len(&self, allowed: &[usize]) -> Result<()> {
        if allowed.contains(&self.len) {
            return Ok(());
        }
        let expected = allowed
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" or ");
        Err(Error::invalid_argument(format!(
            "{} expects {} parameter(s), got {}",
            self.command, expected, self.len
        )))
    }

    fn next(&mut self, name: &str) -> Result<Param> {
        let position = self.position;
        self.position += 1;
        self.items.next().ok_or_else(|| {
            Error::invalid_argument(format!(
                "{}: missing parameter {} ({})",
                self.command, position, name
            ))
        })
    }

    fn bytes(&mut self, name: &str) -> Result<Vec<u8>> {
        match self.next(name)? {
            Param::Bytes(bytes) => Ok(bytes),
            other => Err(self.shape_error(name, "bytes", &other)),
        }
    }

    fn handle(&mut self, name: &str) -> Result<u64> {
        match self.next(name)? {
            Param::Handle(handle) => Ok(handle),
            other => Err(self.shape_error(name, "handle", &other)),
        }
    }

    fn shape_error(&self, name: &str, expected: &str, got: &Param) -> Error {
        Error::invalid_argument(format!(
            "{}: parameter {} ({}) must be {}, got {}",
            self.command,
            self.position - 1,
            name,
            expected,
            got.kind()
        ))
    }
}
