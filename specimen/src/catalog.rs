//! Configuration-time registry of concrete implementations for abstract types.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::error::SpecimenError;
use crate::session::Session;

type AbstractFactory =
    Box<dyn Fn(&mut Session<'_>) -> Result<Box<dyn Any>, SpecimenError> + Send + Sync>;

struct AbstractEntry {
    abstract_name: &'static str,
    bindings: Vec<Binding>,
}

struct Binding {
    concrete_name: &'static str,
    factory: AbstractFactory,
}

/// Registry mapping an abstract type (typically a `Box<dyn Trait>`) to the
/// set of concrete, constructible types bound to it.
///
/// Rust has no runtime type scanning, so the catalog is populated explicitly
/// at configuration time. Resolution therefore depends on what the caller
/// registered: output for abstract types differs across environments even
/// with a fixed seed.
#[derive(Default)]
pub struct TypeCatalog {
    entries: HashMap<TypeId, AbstractEntry>,
}

impl TypeCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Bind a concrete type `C` to the abstract type `A`.
    ///
    /// `wrap` performs the concrete-to-abstract conversion, usually an
    /// unsizing coercion such as `|c| Box::new(c) as Box<dyn Trait>`.
    /// Synthesis of `C` goes back through the dispatcher, so converter
    /// overrides for `C` still apply.
    pub fn bind<A, C, F>(&mut self, wrap: F)
    where
        A: 'static,
        C: crate::Specimen,
        F: Fn(C) -> A + Send + Sync + 'static,
    {
        let entry = self
            .entries
            .entry(TypeId::of::<A>())
            .or_insert_with(|| AbstractEntry {
                abstract_name: std::any::type_name::<A>(),
                bindings: Vec::new(),
            });
        entry.bindings.push(Binding {
            concrete_name: std::any::type_name::<C>(),
            factory: Box::new(move |session| {
                let concrete = session.synthesize::<C>()?;
                Ok(Box::new(wrap(concrete)) as Box<dyn Any>)
            }),
        });
    }

    /// Names of the concrete types bound to `A`
    pub fn bindings_of<A: 'static>(&self) -> Vec<&'static str> {
        self.entries
            .get(&TypeId::of::<A>())
            .map(|entry| entry.bindings.iter().map(|b| b.concrete_name).collect())
            .unwrap_or_default()
    }

    /// Check whether any binding exists for `A`
    pub fn contains<A: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<A>())
    }

    /// Number of abstract types with at least one binding
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the binding at `index` for `A` and downcast its result.
    ///
    /// Returns `UnsupportedType` when no binding exists. Called by the
    /// session with a uniformly chosen index; kept index-based so the random
    /// pick stays with the session's RNG.
    pub(crate) fn resolve_at<A: 'static>(
        &self,
        index: usize,
        session: &mut Session<'_>,
    ) -> Result<A, SpecimenError> {
        let entry = self.entries.get(&TypeId::of::<A>()).ok_or_else(|| {
            SpecimenError::unsupported::<A>("no concrete implementation registered")
        })?;
        let binding = entry.bindings.get(index).ok_or_else(|| {
            SpecimenError::internal(format!(
                "binding index {} out of range for `{}`",
                index, entry.abstract_name
            ))
        })?;
        let boxed = (binding.factory)(session)?;
        boxed.downcast::<A>().map(|value| *value).map_err(|_| {
            SpecimenError::internal(format!(
                "binding `{}` produced a value of the wrong type for `{}`",
                binding.concrete_name, entry.abstract_name
            ))
        })
    }

    /// Number of bindings registered for `A`
    pub(crate) fn binding_count<A: 'static>(&self) -> usize {
        self.entries
            .get(&TypeId::of::<A>())
            .map(|entry| entry.bindings.len())
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for TypeCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for entry in self.entries.values() {
            map.entry(
                &entry.abstract_name,
                &entry
                    .bindings
                    .iter()
                    .map(|b| b.concrete_name)
                    .collect::<Vec<_>>(),
            );
        }
        map.finish()
    }
}
