//! The bindable-element data model.
//!
//! Element lists arrive as JSON from a layout-extraction step outside this
//! repo; the serialized keys follow that producer's camelCase names.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Framework resource-reference prefix.
pub const ANDROID_ID_PREFIX: &str = "android.R.id.";
/// Application resource-reference prefix.
pub const APP_ID_PREFIX: &str = "R.id.";
/// Default package for short widget type names.
pub const WIDGET_PACKAGE: &str = "android.widget.";

/// One bindable UI element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Resource reference key, unique within its namespace.
    pub id: String,
    /// Whether `id` lives in the framework namespace.
    #[serde(rename = "isAndroidNS", default)]
    pub android_ns: bool,
    /// Short declared-type name.
    pub name: String,
    /// Optional fully-qualified override for `name`.
    #[serde(default)]
    pub name_full: Option<String>,
    /// Generated field identifier, unique across the batch.
    pub field_name: String,
    /// Whether the element needs a click-dispatch case.
    #[serde(rename = "isClick", default)]
    pub click: bool,
    /// Elements with `used = false` take no part in generated code.
    #[serde(default = "default_used")]
    pub used: bool,
}

fn default_used() -> bool {
    true
}

impl Element {
    /// The namespaced resource reference used in lookups and dispatch cases.
    pub fn full_id(&self) -> String {
        let prefix = if self.android_ns {
            ANDROID_ID_PREFIX
        } else {
            APP_ID_PREFIX
        };
        format!("{prefix}{}", self.id)
    }

    /// The declared type for generated fields and casts: the `nameFull`
    /// override first, then the known-widget table, then the default widget
    /// package prefix.
    pub fn resolved_type(&self) -> String {
        if let Some(full) = &self.name_full {
            if !full.is_empty() {
                return full.clone();
            }
        }
        if let Some(path) = widget_path(&self.name) {
            return path.to_string();
        }
        format!("{WIDGET_PACKAGE}{}", self.name)
    }
}

/// Number of elements that take part in generation at all.
pub fn used_count(elements: &[Element]) -> usize {
    elements.iter().filter(|e| e.used).count()
}

/// Number of elements that get a click-dispatch case.
pub fn click_count(elements: &[Element]) -> usize {
    elements.iter().filter(|e| e.used && e.click).count()
}

/// Fully-qualified path for framework view classes that live outside
/// `android.widget`.
pub fn widget_path(name: &str) -> Option<&'static str> {
    static PATHS: OnceLock<FxHashMap<&'static str, &'static str>> = OnceLock::new();
    let paths = PATHS.get_or_init(|| {
        let mut map = FxHashMap::default();
        map.insert("View", "android.view.View");
        map.insert("ViewStub", "android.view.ViewStub");
        map.insert("SurfaceView", "android.view.SurfaceView");
        map.insert("TextureView", "android.view.TextureView");
        map.insert("WebView", "android.webkit.WebView");
        map
    });
    paths.get(name).copied()
}
