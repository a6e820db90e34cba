//! Browser event adapters. The rest of the crate never touches DOM types.

use crate::model::PointerPosition;
use crate::shortcuts::KeyChord;

impl KeyChord {
    pub fn from_keyboard_event(ev: &web_sys::KeyboardEvent) -> Self {
        Self {
            key: ev.key(),
            alt: ev.alt_key(),
            ctrl: ev.ctrl_key(),
            shift: ev.shift_key(),
            meta: ev.meta_key(),
        }
    }
}

pub fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}
