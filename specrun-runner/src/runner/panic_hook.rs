// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Panic interception for running tasks.
//!
//! `catch_unwind` hands back the panic payload but not where it was raised. The location is only
//! visible to the process-wide panic hook, so a hook is installed once and told, through a
//! thread-local slot, whether the current thread is running a task and whether to record.

use crate::outcome::SourceLocation;
use std::{
    any::Any,
    cell::RefCell,
    panic::{self, AssertUnwindSafe},
    sync::Once,
};

/// What the panic hook does for a panic raised while a task is running.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum CaptureMode {
    /// Record the panic location and suppress the default panic message.
    Record,

    /// Suppress the default panic message without recording anything.
    Silent,
}

#[derive(Debug, Default)]
struct CaptureSlot {
    // None means no task is running on this thread: the previous hook handles the panic.
    mode: Option<CaptureMode>,
    location: Option<SourceLocation>,
}

thread_local! {
    static CAPTURE_SLOT: RefCell<CaptureSlot> = RefCell::new(CaptureSlot::default());
}

static INSTALL_HOOK: Once = Once::new();

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let handled = CAPTURE_SLOT
                .try_with(|slot| {
                    let mut slot = slot.borrow_mut();
                    match slot.mode {
                        Some(CaptureMode::Record) => {
                            slot.location = info.location().map(SourceLocation::from);
                            true
                        }
                        Some(CaptureMode::Silent) => true,
                        None => false,
                    }
                })
                .unwrap_or(false);
            if !handled {
                previous(info);
            }
        }));
    });
}

/// A panic caught while running a task.
pub(crate) struct CaughtPanic {
    pub(crate) payload: Box<dyn Any + Send>,
    pub(crate) location: Option<SourceLocation>,
}

/// Runs `f`, catching any panic it raises.
pub(crate) fn catch<R>(mode: CaptureMode, f: impl FnOnce() -> R) -> Result<R, CaughtPanic> {
    install_hook();

    let armed = CaptureSlot {
        mode: Some(mode),
        location: None,
    };
    let saved = CAPTURE_SLOT.with(|slot| std::mem::replace(&mut *slot.borrow_mut(), armed));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    let captured = CAPTURE_SLOT.with(|slot| std::mem::replace(&mut *slot.borrow_mut(), saved));

    result.map_err(|payload| CaughtPanic {
        payload,
        location: captured.location,
    })
}

/// Extracts a message from a panic payload raised by `panic!` or similar.
pub(crate) fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked with a non-string payload".to_owned()
    }
}
