//! winit-backed cursor sink

use std::cell::RefCell;
use std::rc::Rc;

use winit::window::{CustomCursor, CustomCursorSource};

use crate::cursor::{CursorError, CursorSink, MouseCursor};

pub(crate) enum CursorChange {
    Custom { id: u64, source: CustomCursorSource },
    Default,
}

/// [`CursorSink`] for the demo window.
///
/// Changes are queued and applied by the window after the frame callback
/// returns, since creating a native cursor needs the event loop.
#[derive(Clone, Default)]
pub struct WindowCursor {
    pending: Rc<RefCell<Option<CursorChange>>>,
    released: Rc<RefCell<Vec<u64>>>,
}

impl WindowCursor {
    pub(crate) fn take(&self) -> Option<CursorChange> {
        self.pending.borrow_mut().take()
    }

    /// Ids whose native cursors the window should drop.
    pub(crate) fn take_released(&self) -> Vec<u64> {
        std::mem::take(&mut *self.released.borrow_mut())
    }
}

fn edge(value: u32, what: &str) -> Result<u16, CursorError> {
    u16::try_from(value).map_err(|_| CursorError::Platform(format!("{} {} exceeds u16", what, value)))
}

impl CursorSink for WindowCursor {
    fn set_cursor(&mut self, cursor: Option<&MouseCursor>) -> Result<(), CursorError> {
        let change = match cursor {
            Some(cursor) => {
                let (hotspot_x, hotspot_y) = cursor.hotspot();
                let source = CustomCursor::from_rgba(
                    cursor.rgba().to_vec(),
                    edge(cursor.width(), "width")?,
                    edge(cursor.height(), "height")?,
                    edge(hotspot_x, "hotspot x")?,
                    edge(hotspot_y, "hotspot y")?,
                )
                .map_err(|err| CursorError::Platform(err.to_string()))?;
                CursorChange::Custom {
                    id: cursor.id(),
                    source,
                }
            }
            None => CursorChange::Default,
        };
        *self.pending.borrow_mut() = Some(change);
        Ok(())
    }

    fn release(&mut self, id: u64) {
        self.released.borrow_mut().push(id);
    }
}
