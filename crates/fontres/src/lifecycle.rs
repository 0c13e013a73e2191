// this_file: crates/fontres/src/lifecycle.rs

//! Reference-counted table of open fonts
//!
//! One [`FontObject`] exists per (entity, pixel size, frame). Opening the
//! same triple again bumps a count and hands out another handle to the
//! same object, so every holder sees the metrics captured at first open.
//! The backend is asked to release the font only when the count reaches
//! zero.

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use fontres_core::{EntityId, FontObject, Frame, FrameId};
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub entity: EntityId,
    pub pixel_size: u32,
    pub frame: FrameId,
}

impl ObjectKey {
    pub fn of(font: &FontObject) -> Self {
        Self {
            entity: font.entity().id(),
            pixel_size: font.pixel_size(),
            frame: font.frame(),
        }
    }
}

/// Shared handle to an open font
#[derive(Clone)]
pub struct FontHandle(Arc<FontObject>);

impl FontHandle {
    pub fn key(&self) -> ObjectKey {
        ObjectKey::of(&self.0)
    }

    pub fn same_object(&self, other: &FontHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn object(&self) -> &FontObject {
        &self.0
    }
}

impl Deref for FontHandle {
    type Target = FontObject;

    fn deref(&self) -> &FontObject {
        &self.0
    }
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FontHandle").field(&*self.0).finish()
    }
}

struct OpenEntry {
    handle: FontHandle,
    /// Frame of the first open, for closing at teardown
    frame: Frame,
    refcount: usize,
}

/// What [`ObjectTable::release`] did
pub enum Release {
    /// Other holders remain
    Shared(usize),
    /// Last holder gone; the backend must close this object
    Last(FontHandle),
    /// The handle was not open
    Unknown,
}

#[derive(Default)]
pub struct ObjectTable {
    open: Mutex<HashMap<ObjectKey, OpenEntry>>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumps and returns an existing object for `key`
    pub fn retain(&self, key: &ObjectKey) -> Option<FontHandle> {
        let mut open = self.open.lock();
        open.get_mut(key).map(|entry| {
            entry.refcount += 1;
            entry.handle.clone()
        })
    }

    /// Registers a freshly opened object with a count of one
    ///
    /// If another object for the same key slipped in meanwhile, that one
    /// wins and `font` is handed back for the caller to close.
    pub fn insert(&self, font: FontObject, frame: &Frame) -> (FontHandle, Option<FontObject>) {
        let key = ObjectKey::of(&font);
        let mut open = self.open.lock();
        if let Some(entry) = open.get_mut(&key) {
            entry.refcount += 1;
            return (entry.handle.clone(), Some(font));
        }
        let handle = FontHandle(Arc::new(font));
        open.insert(
            key,
            OpenEntry {
                handle: handle.clone(),
                frame: *frame,
                refcount: 1,
            },
        );
        (handle, None)
    }

    pub fn release(&self, handle: &FontHandle) -> Release {
        let key = handle.key();
        let mut open = self.open.lock();
        let Some(entry) = open.get_mut(&key) else {
            return Release::Unknown;
        };
        if !entry.handle.same_object(handle) {
            return Release::Unknown;
        }
        entry.refcount -= 1;
        if entry.refcount > 0 {
            return Release::Shared(entry.refcount);
        }
        match open.remove(&key) {
            Some(entry) => Release::Last(entry.handle),
            None => Release::Unknown,
        }
    }

    pub fn refcount(&self, key: &ObjectKey) -> usize {
        self.open.lock().get(key).map_or(0, |e| e.refcount)
    }

    pub fn len(&self) -> usize {
        self.open.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.lock().is_empty()
    }

    /// Removes every object with the frame it was opened for, for teardown
    pub fn drain(&self) -> Vec<(FontHandle, Frame)> {
        self.open
            .lock()
            .drain()
            .map(|(_, entry)| (entry.handle, entry.frame))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontres_core::{DisplayId, FontEntity, ObjectMetrics};

    fn object(entity: &Arc<FontEntity>, size: u32) -> FontObject {
        FontObject::new(entity.clone(), size, FrameId(0), ObjectMetrics::default(), ())
    }

    #[test]
    fn counts_up_and_down() {
        let table = ObjectTable::new();
        let entity = Arc::new(FontEntity::builder("mock", "A").build());
        let (first, dup) = table.insert(object(&entity, 12), &Frame::default());
        assert!(dup.is_none());
        let second = table.retain(&first.key()).expect("open");
        assert!(first.same_object(&second));
        assert_eq!(table.refcount(&first.key()), 2);

        assert!(matches!(table.release(&second), Release::Shared(1)));
        assert!(matches!(table.release(&first), Release::Last(_)));
        assert!(table.is_empty());
        assert!(matches!(table.release(&first), Release::Unknown));
    }

    #[test]
    fn sizes_are_distinct_objects() {
        let table = ObjectTable::new();
        let entity = Arc::new(FontEntity::builder("mock", "A").build());
        let (a, _) = table.insert(object(&entity, 12), &Frame::default());
        let (b, _) = table.insert(object(&entity, 14), &Frame::default());
        assert!(!a.same_object(&b));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn racing_insert_returns_duplicate() {
        let table = ObjectTable::new();
        let entity = Arc::new(FontEntity::builder("mock", "A").build());
        let (a, _) = table.insert(object(&entity, 12), &Frame::default());
        let (b, dup) = table.insert(object(&entity, 12), &Frame::default());
        assert!(a.same_object(&b));
        assert!(dup.is_some());
        assert_eq!(table.refcount(&a.key()), 2);
    }

    #[test]
    fn drain_returns_opening_frame() {
        let table = ObjectTable::new();
        let entity = Arc::new(FontEntity::builder("mock", "A").build());
        let frame = Frame::new(0, 3);
        table.insert(object(&entity, 12), &frame);
        let drained = table.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].1.display, DisplayId(3));
        assert!(table.is_empty());
    }
}
