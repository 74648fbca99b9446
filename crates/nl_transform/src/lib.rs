//! Namespace-member localizing pass.
//!
//! Rewrites fully qualified namespace reads into local bindings:
//! - `Ember.computed(...)` → `computed(...)`
//! - adds or extends `const { computed } = Ember;` after the last import

pub mod declaration;
pub mod error;
pub mod localize;
pub mod members;

pub use error::TransformError;
pub use localize::{localize, localize_source, Localized, Outcome};
