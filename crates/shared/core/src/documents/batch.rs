use super::{DocumentHandle, Fields};

/// One write inside an atomic batch
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create a new document; the store assigns its identity
    Create { collection: String, fields: Fields },
    /// Merge fields into an existing document, keeping fields not named here
    Merge {
        handle: DocumentHandle,
        fields: Fields,
    },
}

impl WriteOp {
    /// Collection the operation targets
    pub fn collection(&self) -> &str {
        match self {
            WriteOp::Create { collection, .. } => collection,
            WriteOp::Merge { handle, .. } => &handle.collection,
        }
    }
}

/// Ordered set of writes committed all-or-nothing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ops: Vec::with_capacity(capacity),
        }
    }

    /// Queue a create of a new document in `collection`
    pub fn create(&mut self, collection: impl Into<String>, fields: Fields) {
        self.ops.push(WriteOp::Create {
            collection: collection.into(),
            fields,
        });
    }

    /// Queue a field merge into an existing document
    pub fn merge(&mut self, handle: DocumentHandle, fields: Fields) {
        self.ops.push(WriteOp::Merge { handle, fields });
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}
