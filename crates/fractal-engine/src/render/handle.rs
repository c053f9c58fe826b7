use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity assigned to a GPU resource when it is created.
///
/// Identities are never reused within a process, so a stale copy of a handle
/// can be told apart from a live one in logs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ResourceId(u64);

impl ResourceId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque identity of a linked shader program. Owned by `ShaderProgram`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShaderHandle(pub(crate) ResourceId);

/// Opaque identity of the full-screen quad buffer. Owned by `GeometryBuffer`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct QuadHandle(pub(crate) ResourceId);

impl ShaderHandle {
    pub fn id(self) -> ResourceId {
        self.0
    }
}

impl QuadHandle {
    pub fn id(self) -> ResourceId {
        self.0
    }
}
