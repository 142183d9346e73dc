//! The per-call dispatch state threaded through every recursive synthesis
//! step.

use rand::Rng;
use rand::RngCore;

use crate::catalog::TypeCatalog;
use crate::config::FillOptions;
use crate::convert::ConverterRegistry;
use crate::depth::RecursionGuard;
use crate::error::SpecimenError;
use crate::report::Reporter;
use crate::specimen::{Specimen, SpecimenBuilder};

/// Per-property failure policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// A per-property failure aborts the whole pass
    #[default]
    Strict,
    /// A per-property failure is reported and the pass continues
    Lenient,
}

/// Mutable state of one generation call.
///
/// A session borrows the provider's immutable configuration plus an
/// exclusive handle on its RNG, and carries the recursion guard. Every
/// recursive step funnels through [`synthesize`](Session::synthesize), which
/// is where converter overrides short-circuit the built-in rules.
pub struct Session<'a> {
    rng: &'a mut dyn RngCore,
    options: &'a FillOptions,
    converters: &'a ConverterRegistry,
    catalog: &'a TypeCatalog,
    reporter: &'a dyn Reporter,
    policy: ErrorPolicy,
    guard: RecursionGuard,
    current_property: Option<&'static str>,
}

impl<'a> Session<'a> {
    pub(crate) fn new(
        rng: &'a mut dyn RngCore,
        options: &'a FillOptions,
        converters: &'a ConverterRegistry,
        catalog: &'a TypeCatalog,
        reporter: &'a dyn Reporter,
        policy: ErrorPolicy,
    ) -> Self {
        Self {
            rng,
            options,
            converters,
            catalog,
            reporter,
            policy,
            guard: RecursionGuard::new(options.max_depth),
            current_property: None,
        }
    }

    /// Synthesize a value of `T`.
    ///
    /// Converter overrides are consulted first, in registration order; the
    /// first matching factory short-circuits everything else. Otherwise the
    /// type's own production rule runs.
    pub fn synthesize<T: Specimen>(&mut self) -> Result<T, SpecimenError> {
        if let Some(factory) = self.converters.lookup::<T>() {
            return Ok(factory());
        }
        T::specimen(self)
    }

    /// Synthesize one named field value during composite construction.
    ///
    /// Failures always propagate, wrapped with the property name: Rust
    /// initialization is total, so a missing field value cannot be skipped.
    pub fn property<T: Specimen>(&mut self, name: &'static str) -> Result<T, SpecimenError> {
        let previous = self.current_property.replace(name);
        let outcome = self.synthesize::<T>();
        self.current_property = previous;
        outcome.map_err(|cause| SpecimenError::property(name, cause))
    }

    /// Re-assign one named field of an existing instance, honoring the
    /// failure policy.
    ///
    /// Under [`ErrorPolicy::Lenient`] a failure is reported and the field
    /// keeps its prior value; under [`ErrorPolicy::Strict`] it aborts.
    pub fn fill_property<T: Specimen>(
        &mut self,
        name: &'static str,
        slot: &mut T,
    ) -> Result<(), SpecimenError> {
        let previous = self.current_property.replace(name);
        let outcome = self.synthesize::<T>();
        self.current_property = previous;
        match outcome {
            Ok(value) => {
                *slot = value;
                Ok(())
            }
            Err(cause) => {
                let error = SpecimenError::property(name, cause);
                match self.policy {
                    ErrorPolicy::Strict => Err(error),
                    ErrorPolicy::Lenient => {
                        self.reporter.error(&error);
                        Ok(())
                    }
                }
            }
        }
    }

    /// Run `build` one composite boundary deeper.
    ///
    /// The guard is restored afterwards, so sibling branches observe
    /// independent depth.
    pub fn composite<T>(
        &mut self,
        build: impl FnOnce(&mut Self) -> Result<T, SpecimenError>,
    ) -> Result<T, SpecimenError> {
        let saved = self.guard;
        self.guard = saved.descend();
        let result = build(self);
        self.guard = saved;
        result
    }

    /// Pick one of `builders` uniformly at random and run it.
    ///
    /// This is the constructor-selector rule: types with only invariant-
    /// preserving constructors register them and the dispatcher chooses.
    /// Fails with `UnsupportedType` when the type exposes no builder.
    pub fn construct_with<T: Specimen>(
        &mut self,
        builders: &[SpecimenBuilder<T>],
    ) -> Result<T, SpecimenError> {
        if builders.is_empty() {
            return Err(SpecimenError::unsupported::<T>("no constructor available"));
        }
        let index = self.rng.gen_range(0..builders.len());
        builders[index](self)
    }

    /// Resolve an abstract type through the catalog.
    ///
    /// Picks uniformly among the registered concrete bindings of `A` and
    /// synthesizes through the dispatcher, so converter overrides for the
    /// concrete type still apply. Fails with `UnsupportedType` when nothing
    /// is bound.
    pub fn resolve_abstract<A: 'static>(&mut self) -> Result<A, SpecimenError> {
        let catalog = self.catalog;
        let count = catalog.binding_count::<A>();
        if count == 0 {
            return Err(SpecimenError::unsupported::<A>(
                "no concrete implementation registered",
            ));
        }
        let index = self.rng.gen_range(0..count);
        catalog.resolve_at::<A>(index, self)
    }

    /// A uniform pick among `count` enum variants. Returns 0 for an empty
    /// count so callers never panic on a degenerate enum.
    pub fn variant_index(&mut self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        self.rng.gen_range(0..count)
    }

    /// The random source of this call
    pub fn rng(&mut self) -> &mut dyn RngCore {
        self.rng
    }

    /// The immutable option snapshot
    pub fn options(&self) -> &FillOptions {
        self.options
    }

    /// The recursion guard at the current node
    pub fn guard(&self) -> RecursionGuard {
        self.guard
    }

    /// The active failure policy
    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Name of the property currently being filled, if any
    pub fn current_property(&self) -> Option<&'static str> {
        self.current_property
    }

    /// A random element count within the configured `[min_count, max_count]`
    pub(crate) fn element_count(&mut self) -> usize {
        let options = self.options;
        self.rng.gen_range(options.min_count..=options.max_count)
    }

    /// A random soft dictionary target within `[1, max_count]`
    pub(crate) fn dictionary_target(&mut self) -> usize {
        let max = self.options.max_count;
        self.rng.gen_range(1..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NullReporter;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn with_session<T>(run: impl FnOnce(&mut Session<'_>) -> T) -> T {
        let mut rng = StdRng::seed_from_u64(7);
        let options = FillOptions::default();
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

    #[test]
    fn test_composite_restores_guard_for_siblings() {
        with_session(|session| {
            let root = session.guard().depth();
            session
                .composite(|inner| {
                    assert_eq!(inner.guard().depth(), root + 1);
                    Ok(())
                })
                .unwrap();
            assert_eq!(session.guard().depth(), root);
        });
    }

    #[test]
    fn test_construct_with_empty_builders_is_unsupported() {
        with_session(|session| {
            let result = session.construct_with::<u32>(&[]);
            assert!(matches!(
                result,
                Err(SpecimenError::UnsupportedType { .. })
            ));
        });
    }

    #[test]
    fn test_resolve_abstract_without_binding_is_unsupported() {
        with_session(|session| {
            let result = session.resolve_abstract::<u64>();
            assert!(matches!(
                result,
                Err(SpecimenError::UnsupportedType { .. })
            ));
        });
    }

    trait Ghost {}
    crate::dyn_specimen!(Ghost);

    #[test]
    fn test_property_wraps_failure_with_name() {
        with_session(|session| {
            // No binding for Ghost is registered, so synthesis must fail and
            // the error must carry the property name.
            let result = session.property::<Box<dyn Ghost>>("phantom");
            match result {
                Err(error) => assert_eq!(error.property_name(), Some("phantom")),
                Ok(_) => panic!("expected unsupported type"),
            }
        });
    }

    #[test]
    fn test_element_count_within_bounds() {
        with_session(|session| {
            for _ in 0..50 {
                let count = session.element_count();
                assert!(count >= session.options().min_count);
                assert!(count <= session.options().max_count);
            }
        });
    }
}
