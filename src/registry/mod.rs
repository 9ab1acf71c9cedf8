//! Handler discovery sources and the resolution index.
//!
//! Courier replaces runtime reflection with an explicit registry: at
//! startup the host assembles [`HandlerModule`]s — named bundles of
//! [`HandlerContainer`]s whose entries bind a payload type to a handler
//! closure — and hands them to the locator middleware. The locator scans
//! the sources into a [`HandlerIndex`] once, and again whenever its search
//! method changes; dispatch only ever reads the index.

mod index;
mod source;

pub use index::{HandlerIndex, HandlerSearchMethod};
pub use source::{HandlerContainer, HandlerEntry, HandlerModule, HandlerSource, ScanError};

pub(crate) use source::HandlerInvoker;
