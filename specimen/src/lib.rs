//! # Specimen - Randomized Test Fixture Synthesis for Rust
//!
//! Specimen builds fully populated instances of arbitrary types for use as
//! test fixtures: scalars get non-degenerate random values, strings get
//! readable alphanumeric content, collections get random sizes within
//! configurable bounds, and nested object graphs are filled recursively with
//! a depth bound that terminates self-referential types.
//!
//! ## Quick Start
//!
//! ```rust
//! use specimen::{Provider, Specimen};
//!
//! #[derive(Debug, Specimen)]
//! struct Order {
//!     id: u64,
//!     customer: String,
//!     lines: Vec<(String, u32)>,
//!     note: Option<String>,
//! }
//!
//! let provider = Provider::builder().seed(7).build().unwrap();
//! let order: Order = provider.generate().unwrap();
//! assert_ne!(order.id, 0);
//! assert!(!order.lines.is_empty());
//! ```
//!
//! ## Overriding synthesis
//!
//! Converter overrides replace the built-in rule for a type wholesale, and
//! the [`TypeCatalog`] maps trait objects to concrete implementations:
//!
//! ```rust
//! use specimen::Provider;
//!
//! let provider = Provider::builder()
//!     .seed(7)
//!     .converter(|| String::from("acme"))
//!     .build()
//!     .unwrap();
//! assert_eq!(provider.generate::<String>().unwrap(), "acme");
//! ```

// Public modules
pub mod catalog;
pub mod config;
pub mod convert;
pub mod depth;
pub mod error;
pub mod provider;
pub mod report;
pub mod session;
pub mod specimen;

// Built-in production rules
mod collections;
mod scalars;
mod temporal;

// Re-export the main public API
pub use catalog::TypeCatalog;
pub use config::{FillOptions, NamingMode, OptionalMode};
pub use convert::ConverterRegistry;
pub use depth::RecursionGuard;
pub use error::{SpecimenError, SpecimenResult};
pub use provider::{Provider, ProviderBuilder};
pub use report::{LogReporter, MemoryReporter, NullReporter, Reporter};
pub use session::{ErrorPolicy, Session};
pub use specimen::{Fill, Specimen, SpecimenBuilder};

#[cfg(feature = "derive")]
pub use specimen_derive::{Fill, Specimen};

#[cfg(test)]
pub(crate) mod testutil {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::catalog::TypeCatalog;
    use crate::config::FillOptions;
    use crate::convert::ConverterRegistry;
    use crate::report::NullReporter;
    use crate::session::{ErrorPolicy, Session};

    /// Runs `run` inside a strict session over default options and a
    /// deterministic RNG.
    pub(crate) fn with_session<T>(seed: u64, run: impl FnOnce(&mut Session<'_>) -> T) -> T {
        with_options(FillOptions::default(), seed, run)
    }

    /// Same as [`with_session`] but with explicit options.
    pub(crate) fn with_options<T>(
        options: FillOptions,
        seed: u64,
        run: impl FnOnce(&mut Session<'_>) -> T,
    ) -> T {
        let mut rng = StdRng::seed_from_u64(seed);
        let converters = ConverterRegistry::new();
        let catalog = TypeCatalog::new();
        let reporter = NullReporter;
        let mut session = Session::new(
            &mut rng,
            &options,
            &converters,
            &catalog,
            &reporter,
            ErrorPolicy::Strict,
        );
        run(&mut session)
    }
}
