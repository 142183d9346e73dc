//! Core synthesis traits.

use crate::error::SpecimenError;
use crate::session::Session;

/// A type that can be synthesized into a randomized, fully-populated value.
///
/// Built-in impls cover scalars, temporal types, optional wrappers, tuples,
/// arrays, sequences and dictionaries. Data-holding structs and enums
/// normally get their impl from `#[derive(Specimen)]`; hand-written impls
/// compose through [`Session::synthesize`] so converter overrides and the
/// recursion guard keep applying.
pub trait Specimen: Sized + 'static {
    /// Produce one randomized value
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError>;
}

/// A type whose fillable fields can be re-assigned in place.
///
/// This is the property-filler pass exposed standalone: every field is given
/// a freshly synthesized value under the provider's failure policy. Field
/// order carries no semantic meaning. Normally derived with
/// `#[derive(Fill)]`.
pub trait Fill {
    /// Assign a fresh value to every fillable field
    fn fill(&mut self, session: &mut Session<'_>) -> Result<(), SpecimenError>;
}

/// A constructor function usable with [`Session::construct_with`].
///
/// Types with invariants that plain field synthesis would violate register
/// one or more of these; the session picks one uniformly at random.
pub type SpecimenBuilder<T> = fn(&mut Session<'_>) -> Result<T, SpecimenError>;

/// Implement [`Specimen`] for a boxed trait object by resolving through the
/// provider's type catalog.
///
/// ```ignore
/// trait Shape { fn area(&self) -> f64; }
/// specimen::dyn_specimen!(Shape);
/// ```
#[macro_export]
macro_rules! dyn_specimen {
    ($($trait_path:path),+ $(,)?) => {
        $(
            impl $crate::Specimen for ::std::boxed::Box<dyn $trait_path> {
                fn specimen(
                    session: &mut $crate::Session<'_>,
                ) -> ::std::result::Result<Self, $crate::SpecimenError> {
                    session.resolve_abstract()
                }
            }
        )+
    };
}
