//! Target-type classification.
//!
//! The ancestry walk runs against an explicit table of base-type identities
//! and known framework supertype chains instead of a live project index.
//! The table is data: deserializable from JSON and extensible without
//! touching the walk itself.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::debug;
use viewbind_ast::{ClassArena, ClassId};

/// Which generation strategy applies to the target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Activity,
    Fragment,
    /// Adapter view-holder generation, selected by the caller rather than
    /// by ancestry.
    Holder,
    /// Fields only, no lifecycle wiring.
    Other,
}

/// Classification rules: base-type identities and known supertype chains.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassTable {
    /// Fully-qualified identities classified as activity-like.
    pub activity_bases: Vec<String>,
    /// Fully-qualified identities classified as fragment-like.
    pub fragment_bases: Vec<String>,
    /// Known framework supertype chains, child to parent.
    pub supertypes: FxHashMap<String, String>,
}

impl Default for ClassTable {
    fn default() -> Self {
        let mut supertypes = FxHashMap::default();
        for (child, parent) in [
            (
                "android.support.v7.app.AppCompatActivity",
                "android.support.v4.app.FragmentActivity",
            ),
            (
                "androidx.appcompat.app.AppCompatActivity",
                "androidx.fragment.app.FragmentActivity",
            ),
            ("android.support.v4.app.FragmentActivity", "android.app.Activity"),
            ("androidx.fragment.app.FragmentActivity", "android.app.Activity"),
            ("android.app.ListActivity", "android.app.Activity"),
            ("android.app.DialogFragment", "android.app.Fragment"),
            (
                "android.support.v4.app.DialogFragment",
                "android.support.v4.app.Fragment",
            ),
            (
                "androidx.fragment.app.DialogFragment",
                "androidx.fragment.app.Fragment",
            ),
        ] {
            supertypes.insert(child.to_string(), parent.to_string());
        }
        Self {
            activity_bases: vec!["android.app.Activity".to_string()],
            fragment_bases: vec![
                "android.app.Fragment".to_string(),
                "android.support.v4.app.Fragment".to_string(),
                "androidx.fragment.app.Fragment".to_string(),
            ],
            supertypes,
        }
    }
}

impl ClassTable {
    /// Walk the declared ancestry of `class` against the identity sets.
    /// Proper ancestors only: a type is never its own inheritor.
    pub fn classify(&self, arena: &ClassArena, class: ClassId) -> Variant {
        let decl = arena.class(class);
        let Some(extends) = &decl.extends else {
            debug!(class = %decl.name, "no supertype, variant Other");
            return Variant::Other;
        };
        let mut current = self.qualify(arena, extends);
        // hop cap: user-supplied tables may contain cycles
        for _ in 0..16 {
            if self.activity_bases.iter().any(|base| base == &current) {
                debug!(class = %decl.name, base = %current, "variant Activity");
                return Variant::Activity;
            }
            if self.fragment_bases.iter().any(|base| base == &current) {
                debug!(class = %decl.name, base = %current, "variant Fragment");
                return Variant::Fragment;
            }
            match self.supertypes.get(&current) {
                Some(parent) => current = parent.clone(),
                None => break,
            }
        }
        debug!(class = %decl.name, "ancestry matched no identity, variant Other");
        Variant::Other
    }

    /// Resolve a possibly-short supertype reference to a fully-qualified
    /// identity through the file's imports, falling back to the name as
    /// written.
    fn qualify(&self, arena: &ClassArena, name: &str) -> String {
        let base = match name.find('<') {
            Some(i) => &name[..i],
            None => name,
        };
        if base.contains('.') {
            return base.to_string();
        }
        match arena.import_for(base) {
            Some(full) => full.to_string(),
            None => base.to_string(),
        }
    }
}
