//! Extension registry
//!
//! Modules are registered into a [`RegistryBuilder`] at startup. Each module's extensions are
//! flattened and validated as a unit: a module with one invalid extension is rejected as a
//! whole and leaves the builder untouched, other modules are unaffected. Sealing the builder
//! produces the immutable [`Registry`] every conversion reads from.
//!
//! Later registrations win. For adapters the key is (flavour, format), for matchers it is
//! (format, direction, name), for codecs the format. A replacement keeps the position of the
//! entry it replaces, so the order modules were registered in stays the lookup order.

use crate::adapter::AdapterFactory;
use crate::error::RegistrationError;
use crate::extension::{flatten, Capability, Extension, OpaqueCapability, OpaqueKind};
use crate::format::{FormatCodec, TargetFormat};
use crate::matchers::{Direction, Matcher};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug)]
struct Module {
    name: String,
    capabilities: Vec<Capability>,
}

/// Mutable registration surface, used once at startup.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    modules: Vec<Module>,
}

impl RegistryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module's extensions
    ///
    /// The extensions are flattened and validated first; on error nothing from this module is
    /// kept.
    pub fn add_module(
        &mut self,
        name: &str,
        extensions: Vec<Extension>,
    ) -> Result<(), RegistrationError> {
        if self.modules.iter().any(|module| module.name == name) {
            return Err(RegistrationError::DuplicateModule(name.to_string()));
        }
        let capabilities = flatten(extensions);
        validate(name, &capabilities)?;
        debug!(module = name, capabilities = capabilities.len(), "registered module");
        self.modules.push(Module {
            name: name.to_string(),
            capabilities,
        });
        Ok(())
    }

    /// Register several modules in order, continuing past rejected ones
    pub fn register_all<I, S>(&mut self, modules: I) -> Vec<RegistrationError>
    where
        I: IntoIterator<Item = (S, Vec<Extension>)>,
        S: AsRef<str>,
    {
        let mut errors = Vec::new();
        for (name, extensions) in modules {
            if let Err(error) = self.add_module(name.as_ref(), extensions) {
                warn!(module = name.as_ref(), %error, "module rejected");
                errors.push(error);
            }
        }
        errors
    }

    /// Append the modules committed to another builder
    pub fn merge(&mut self, other: RegistryBuilder) -> Vec<RegistrationError> {
        let mut errors = Vec::new();
        for module in other.modules {
            if self.modules.iter().any(|known| known.name == module.name) {
                errors.push(RegistrationError::DuplicateModule(module.name));
            } else {
                self.modules.push(module);
            }
        }
        errors
    }

    /// Names of the committed modules, in registration order
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|module| module.name.as_str()).collect()
    }

    /// Build the immutable registry
    pub fn seal(self) -> Registry {
        let mut registry = Registry {
            modules: Vec::new(),
            capabilities: Vec::new(),
            formats: BTreeMap::new(),
        };
        for module in self.modules {
            for capability in module.capabilities {
                registry.absorb(capability);
            }
            registry.modules.push(module.name);
        }
        registry
    }
}

fn invalid(module: &str, reason: impl Into<String>) -> RegistrationError {
    RegistrationError::InvalidExtension {
        module: module.to_string(),
        reason: reason.into(),
    }
}

fn validate(module: &str, capabilities: &[Capability]) -> Result<(), RegistrationError> {
    let mut codecs = HashSet::new();
    for capability in capabilities {
        match capability {
            Capability::Codec(codec) => {
                if !codecs.insert(codec.format()) {
                    return Err(invalid(
                        module,
                        format!("codec for {} declared twice", codec.format()),
                    ));
                }
            }
            Capability::AdapterFactory(factory) => {
                for adapter in factory.iter() {
                    if adapter.flavour().trim().is_empty() {
                        return Err(invalid(
                            module,
                            format!("{} adapter with an empty flavour", factory.format()),
                        ));
                    }
                    if adapter.format() != factory.format() {
                        return Err(invalid(
                            module,
                            format!(
                                "{} adapter for '{}' placed in the {} factory",
                                adapter.format(),
                                adapter.flavour(),
                                factory.format()
                            ),
                        ));
                    }
                }
            }
            Capability::Matcher(matcher) => {
                if matcher.name().trim().is_empty() {
                    return Err(invalid(
                        module,
                        format!("{} matcher with an empty name", matcher.format()),
                    ));
                }
            }
            Capability::Opaque(opaque) => {
                if opaque.name.trim().is_empty() {
                    return Err(invalid(module, format!("{} with an empty name", opaque.kind)));
                }
            }
        }
    }
    Ok(())
}

/// Everything registered for one format.
#[derive(Clone)]
pub struct FormatEntry {
    codec: Option<Arc<dyn FormatCodec>>,
    factory: AdapterFactory,
    to_markup: Vec<Matcher>,
    from_markup: Vec<Matcher>,
}

impl FormatEntry {
    fn new(format: TargetFormat) -> Self {
        Self {
            codec: None,
            factory: AdapterFactory::new(format),
            to_markup: Vec::new(),
            from_markup: Vec::new(),
        }
    }

    pub fn codec(&self) -> Option<&Arc<dyn FormatCodec>> {
        self.codec.as_ref()
    }

    pub fn factory(&self) -> &AdapterFactory {
        &self.factory
    }

    pub fn matchers(&self, direction: Direction) -> &[Matcher] {
        match direction {
            Direction::ToMarkup => &self.to_markup,
            Direction::FromMarkup => &self.from_markup,
        }
    }

    fn add_matcher(&mut self, matcher: Matcher) {
        let list = match matcher.direction() {
            Direction::ToMarkup => &mut self.to_markup,
            Direction::FromMarkup => &mut self.from_markup,
        };
        match list.iter().position(|known| known.name() == matcher.name()) {
            Some(position) => list[position] = matcher,
            None => list.push(matcher),
        }
    }
}

/// Immutable lookup surface shared by all conversions.
///
/// # Examples
///
/// ```ignore
/// let registry = Registry::standard();
/// let adapters = registry.adapters_for(TargetFormat::Html).unwrap();
/// assert!(adapters.get("paragraph").is_some());
/// ```
pub struct Registry {
    modules: Vec<String>,
    capabilities: Vec<Capability>,
    formats: BTreeMap<TargetFormat, FormatEntry>,
}

impl Registry {
    /// Registry with the built-in modules, in the editor's registration order
    pub fn standard() -> Self {
        let mut builder = RegistryBuilder::new();
        let errors = builder.register_all(crate::blocks::standard_modules());
        for error in errors {
            warn!(%error, "built-in module rejected");
        }
        builder.seal()
    }

    fn absorb(&mut self, capability: Capability) {
        match &capability {
            Capability::Codec(codec) => {
                let format = codec.format();
                self.entry(format).codec = Some(codec.clone());
            }
            Capability::AdapterFactory(factory) => {
                self.entry(factory.format()).factory.merge(factory);
            }
            Capability::Matcher(matcher) => {
                self.entry(matcher.format()).add_matcher(matcher.clone());
            }
            Capability::Opaque(opaque) => {
                if self.has_opaque(opaque) {
                    return;
                }
            }
        }
        self.capabilities.push(capability);
    }

    fn has_opaque(&self, opaque: &OpaqueCapability) -> bool {
        self.capabilities.iter().any(|capability| {
            matches!(capability, Capability::Opaque(known) if known == opaque)
        })
    }

    fn entry(&mut self, format: TargetFormat) -> &mut FormatEntry {
        self.formats
            .entry(format)
            .or_insert_with(|| FormatEntry::new(format))
    }

    /// Merged adapter factory for a format
    pub fn adapters_for(&self, format: TargetFormat) -> Option<&AdapterFactory> {
        self.formats.get(&format).map(FormatEntry::factory)
    }

    /// Ordered matcher list for a format and direction; empty when none were registered
    pub fn matchers_for(&self, format: TargetFormat, direction: Direction) -> &[Matcher] {
        self.formats
            .get(&format)
            .map(|entry| entry.matchers(direction))
            .unwrap_or(&[])
    }

    pub fn codec(&self, format: TargetFormat) -> Option<&Arc<dyn FormatCodec>> {
        self.formats.get(&format).and_then(FormatEntry::codec)
    }

    /// Formats with a registered codec
    pub fn formats(&self) -> Vec<TargetFormat> {
        self.formats
            .iter()
            .filter(|(_, entry)| entry.codec.is_some())
            .map(|(format, _)| *format)
            .collect()
    }

    /// Every registered capability, flattened in registration order
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Opaque capabilities of one kind
    pub fn opaque(&self, kind: OpaqueKind) -> impl Iterator<Item = &OpaqueCapability> {
        self.capabilities.iter().filter_map(move |capability| match capability {
            Capability::Opaque(opaque) if opaque.kind == kind => Some(opaque),
            _ => None,
        })
    }

    /// Names of the registered modules, in registration order
    pub fn modules(&self) -> &[String] {
        &self.modules
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
