//! Binding-library adapters.
//!
//! An adapter describes one binding library's wiring conventions, most
//! importantly the idempotency marker the anchor resolver looks for. Only
//! the plain find-view adapter ships today, but the engine goes through the
//! factory so a missing library stays a representable state.

/// One binding library's wiring conventions.
pub trait BindingAdapter {
    /// Library name, for logs.
    fn name(&self) -> &'static str;

    /// The call text whose presence in a lifecycle method body marks the
    /// target as already wired.
    fn marker(&self) -> &'static str;
}

/// The bundled adapter: plain `findViewById` lookups wired through a
/// generated `findView` method.
pub struct FindViewAdapter;

impl BindingAdapter for FindViewAdapter {
    fn name(&self) -> &'static str {
        "findView"
    }

    fn marker(&self) -> &'static str {
        "findView("
    }
}

/// Locate the adapter available to the target. May find none.
pub fn find_adapter() -> Option<&'static dyn BindingAdapter> {
    static ADAPTER: FindViewAdapter = FindViewAdapter;
    Some(&ADAPTER)
}
