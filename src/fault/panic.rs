//! Panic capture.
//!
//! While installed, the hook records the panic message, location and a
//! backtrace instead of printing them, but only for panics raised inside
//! [`catch`] on the current thread. Every other panic goes to the hook that
//! was active before installation.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe, PanicHookInfo};
use std::sync::Arc;

use super::{Fault, Frame, SourceLocation};

pub(super) type PanicHook = Arc<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

struct CapturedPanic {
    message: String,
    location: Option<SourceLocation>,
    backtrace: String,
}

thread_local! {
    static CAPTURED: RefCell<Option<CapturedPanic>> = const { RefCell::new(None) };
    /// Nesting depth of [`catch`] scopes on this thread.
    static CATCH_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Install the capturing hook, returning the hook it replaced.
pub(super) fn install_hook() -> PanicHook {
    let previous: PanicHook = Arc::from(panic::take_hook());
    let forward = Arc::clone(&previous);
    panic::set_hook(Box::new(move |info| {
        if CATCH_DEPTH.with(Cell::get) == 0 {
            forward(info);
            return;
        }
        let captured = CapturedPanic {
            message: payload_message(info.payload()),
            location: info.location().map(|l| {
                SourceLocation::new(l.file(), l.line() as usize, l.column() as usize)
            }),
            backtrace: Backtrace::force_capture().to_string(),
        };
        CAPTURED.with(|slot| *slot.borrow_mut() = Some(captured));
    }));
    previous
}

/// Put back a hook returned by [`install_hook`].
pub(super) fn restore_hook(previous: PanicHook) {
    drop(panic::take_hook());
    panic::set_hook(Box::new(move |info| previous(info)));
}

struct CatchScope;

impl CatchScope {
    fn enter() -> Self {
        CATCH_DEPTH.with(|d| d.set(d.get() + 1));
        Self
    }
}

impl Drop for CatchScope {
    fn drop(&mut self) {
        CATCH_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Run `f`, turning a panic raised inside it into a user fault.
pub fn catch<T>(f: impl FnOnce() -> Result<T, Fault>) -> Result<T, Fault> {
    let _scope = CatchScope::enter();
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| Err(fault_from_panic(payload)))
}

/// Serializes tests that replace the process-wide panic hook.
#[cfg(test)]
pub(crate) fn hook_lock() -> parking_lot::MutexGuard<'static, ()> {
    static HOOK_LOCK: parking_lot::Mutex<()> = parking_lot::Mutex::new(());
    HOOK_LOCK.lock()
}

/// Convert a caught unwind payload into a user fault.
pub fn fault_from_panic(payload: Box<dyn Any + Send>) -> Fault {
    let captured = CAPTURED.with(|slot| slot.borrow_mut().take());

    let Some(captured) = captured else {
        return Fault::user("Panic", payload_message(payload.as_ref()));
    };

    let mut fault = Fault::user("Panic", captured.message);
    for frame in parse_backtrace(&captured.backtrace) {
        fault = fault.with_frame(frame);
    }
    if let Some(location) = captured.location {
        fault = fault.with_frame(Frame::new("panic").at(location));
    }
    fault
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// Parse `std::backtrace` output into frames, outermost first.
///
/// Runtime and unwinding frames are dropped.
fn parse_backtrace(text: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();

    for line in text.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix("at ") {
            if let (Some(last), Some(location)) = (frames.last_mut(), parse_location(rest)) {
                last.location = Some(location);
            }
            continue;
        }
        if let Some((index, function)) = line.split_once(": ")
            && index.chars().all(|c| c.is_ascii_digit())
        {
            frames.push(Frame::new(function));
        }
    }

    frames.retain(|f| !is_runtime_frame(&f.function));
    frames.reverse();
    frames
}

fn parse_location(text: &str) -> Option<SourceLocation> {
    let mut parts = text.rsplitn(3, ':');
    let column = parts.next()?.parse().ok()?;
    let line = parts.next()?.parse().ok()?;
    let file = parts.next()?;
    Some(SourceLocation::new(file, line, column))
}

fn is_runtime_frame(function: &str) -> bool {
    const PREFIXES: &[&str] = &[
        "std::",
        "core::",
        "alloc::",
        "<alloc::",
        "<core::",
        "<std::",
        "rust_begin_unwind",
        "__rust",
        "_start",
        "__libc",
    ];
    PREFIXES.iter().any(|p| function.starts_with(p))
}
