//! Derive macros for the Specimen fixture synthesis library
//!
//! This crate provides procedural macros for automatically implementing traits
//! in the Specimen library.

use proc_macro::TokenStream;

mod derive;
mod fill;

/// Derive macro for automatically implementing the Specimen trait
///
/// This macro can be applied to structs and enums to automatically generate
/// implementations of the Specimen trait.
///
/// # Basic Usage
///
/// ```rust
/// use specimen::Specimen;
///
/// #[derive(Specimen)]
/// struct User {
///     id: u32,
///     name: String,
///     active: bool,
/// }
/// ```
///
/// # Customization
///
/// ```rust
/// use specimen::{Session, Specimen, SpecimenError};
///
/// #[derive(Specimen)]
/// struct Account {
///     #[specimen(with = "checksummed_code")]
///     code: String,
///     #[specimen(skip)]
///     cached_total: u64,
///     owner: String,
/// }
///
/// fn checksummed_code(session: &mut Session<'_>) -> Result<String, SpecimenError> {
///     let body: u32 = session.synthesize()?;
///     Ok(format!("AC-{body:08}"))
/// }
/// ```
///
/// # Supported Attributes
///
/// - `#[specimen(builder = "path")]` (container, repeatable): synthesize the
///   whole value through the named `fn(&mut Session<'_>) -> Result<Self, SpecimenError>`
///   constructors. When several are given one is picked uniformly at random.
/// - `#[specimen(with = "path")]` (field): synthesize this field through the
///   named function instead of its built-in production rule.
/// - `#[specimen(skip)]` (field): leave the field at `Default::default()`.
///
/// # Enums
///
/// A variant is picked uniformly at random; its fields are then synthesized
/// like struct fields. Empty enums are rejected at compile time.
#[proc_macro_derive(Specimen, attributes(specimen))]
pub fn derive_specimen(input: TokenStream) -> TokenStream {
    derive::derive_specimen_impl(input)
}

/// Derive macro for automatically implementing the Fill trait
///
/// Applies to structs with named fields only. Each field is re-assigned in
/// place through the session, which is the path where a lenient error policy
/// can skip individual fields instead of aborting:
///
/// ```rust
/// use specimen::{Fill, Provider};
///
/// #[derive(Default, Fill)]
/// struct Profile {
///     display_name: String,
///     age: u8,
/// }
///
/// let provider = Provider::builder().seed(11).build().unwrap();
/// let profile: Profile = provider.generate_filled().unwrap();
/// assert!(!profile.display_name.is_empty());
/// ```
///
/// The `#[specimen(with = "path")]` and `#[specimen(skip)]` field attributes
/// are honored the same way as for [`macro@Specimen`].
#[proc_macro_derive(Fill, attributes(specimen))]
pub fn derive_fill(input: TokenStream) -> TokenStream {
    fill::derive_fill_impl(input)
}
