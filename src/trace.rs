//! Optional `tracing` events.
//!
//! With the `tracing` feature enabled, [`trace_event!`] and [`debug_event!`]
//! forward to [`tracing::trace!`] and [`tracing::debug!`]. Without it they
//! expand to nothing, and their arguments are not evaluated.
//!
//! [`tracing::trace!`]: https://docs.rs/tracing/latest/tracing/macro.trace.html
//! [`tracing::debug!`]: https://docs.rs/tracing/latest/tracing/macro.debug.html

/// Emits a trace-level event when the `tracing` feature is enabled.
macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::trace!(target: "holdall", $($arg)*);
        }
    };
}

/// Emits a debug-level event when the `tracing` feature is enabled.
macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::debug!(target: "holdall", $($arg)*);
        }
    };
}

pub(crate) use {debug_event, trace_event};
