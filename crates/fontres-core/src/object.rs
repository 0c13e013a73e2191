// this_file: crates/fontres-core/src/object.rs

//! Open fonts

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::entity::{FontEntity, FrameId};

/// Metrics captured when a font is opened, frozen for its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectMetrics {
    pub ascent: i32,
    pub descent: i32,
    pub height: i32,
    pub space_width: i32,
    pub average_width: i32,
    pub min_width: i32,
    pub baseline_offset: i32,
    pub relative_compose: i32,
    pub default_ascent: i32,
    pub underline_position: Option<i32>,
    pub underline_thickness: Option<i32>,
    pub scalable: bool,
}

/// A live font realized from an entity at one pixel size
///
/// Driver-private per-instance data travels in `driver_data` and is only
/// read back by the driver that opened it.
pub struct FontObject {
    entity: Arc<FontEntity>,
    pixel_size: u32,
    frame: FrameId,
    metrics: ObjectMetrics,
    driver_data: Box<dyn Any + Send + Sync>,
}

impl FontObject {
    pub fn new<T: Any + Send + Sync>(
        entity: Arc<FontEntity>,
        pixel_size: u32,
        frame: FrameId,
        metrics: ObjectMetrics,
        driver_data: T,
    ) -> Self {
        Self {
            entity,
            pixel_size,
            frame,
            metrics,
            driver_data: Box::new(driver_data),
        }
    }

    pub fn entity(&self) -> &Arc<FontEntity> {
        &self.entity
    }

    pub fn driver_type(&self) -> &str {
        self.entity.driver_type()
    }

    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    pub fn frame(&self) -> FrameId {
        self.frame
    }

    pub fn metrics(&self) -> &ObjectMetrics {
        &self.metrics
    }

    pub fn driver_data<T: Any>(&self) -> Option<&T> {
        self.driver_data.downcast_ref::<T>()
    }
}

impl fmt::Debug for FontObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontObject")
            .field("entity", &self.entity.to_string())
            .field("pixel_size", &self.pixel_size)
            .field("frame", &self.frame)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
