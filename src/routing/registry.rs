//! Route registry built by setup code.
//!
//! # Responsibilities
//! - Normalize patterns and handlers to sequences
//! - Keep groups in registration order
//! - Expose a narrow registration handle to setup code
//!
//! # Design Decisions
//! - One registry per dispatch call, never shared between calls
//! - No deduplication and no syntax validation at registration time
//!   (patterns are compiled lazily when the executor reaches them)

/// Patterns and the handler chain they guard.
#[derive(Debug, Clone)]
pub struct HandlerGroup<H> {
    patterns: Vec<String>,
    handlers: Vec<H>,
}

impl<H> HandlerGroup<H> {
    /// Build a group from already-normalized parts.
    pub fn new(patterns: Vec<String>, handlers: Vec<H>) -> Self {
        Self { patterns, handlers }
    }

    /// Patterns in registration order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Handlers in execution order.
    pub fn handlers(&self) -> &[H] {
        &self.handlers
    }
}

/// Ordered list of handler groups.
#[derive(Debug, Clone)]
pub struct Registry<H> {
    groups: Vec<HandlerGroup<H>>,
}

impl<H> Registry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Append one group.
    pub fn register<P, F>(&mut self, patterns: P, handlers: F)
    where
        P: IntoPatterns,
        F: IntoHandlers<H>,
    {
        let patterns = patterns.into_patterns();
        let handlers = handlers.into_handlers();

        if patterns.is_empty() {
            tracing::warn!(
                group = self.groups.len(),
                "Registered a handler group without patterns; it will never match"
            );
        }

        tracing::trace!(
            group = self.groups.len(),
            patterns = ?patterns,
            handlers = handlers.len(),
            "Handler group registered"
        );

        self.groups.push(HandlerGroup::new(patterns, handlers));
    }

    /// Groups in registration order.
    pub fn groups(&self) -> &[HandlerGroup<H>] {
        &self.groups
    }

    /// Number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if no group has been registered.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Remove every group.
    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration handle handed to setup code.
///
/// Only allows appending; setup cannot inspect or clear the registry.
pub struct Trail<'a, H> {
    registry: &'a mut Registry<H>,
}

impl<'a, H> Trail<'a, H> {
    /// Wrap a registry for one setup pass.
    pub fn new(registry: &'a mut Registry<H>) -> Self {
        Self { registry }
    }

    /// Register `handlers` for every path matching any of `patterns`.
    ///
    /// Accepts a single pattern or a list, and a single handler or a list.
    pub fn register<P, F>(&mut self, patterns: P, handlers: F)
    where
        P: IntoPatterns,
        F: IntoHandlers<H>,
    {
        self.registry.register(patterns, handlers);
    }
}

/// Conversion into an ordered list of pattern strings.
pub trait IntoPatterns {
    fn into_patterns(self) -> Vec<String>;
}

impl IntoPatterns for &str {
    fn into_patterns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoPatterns for String {
    fn into_patterns(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoPatterns for &String {
    fn into_patterns(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl IntoPatterns for Vec<String> {
    fn into_patterns(self) -> Vec<String> {
        self
    }
}

impl IntoPatterns for Vec<&str> {
    fn into_patterns(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoPatterns for &[&str] {
    fn into_patterns(self) -> Vec<String> {
        self.iter().map(|p| p.to_string()).collect()
    }
}

impl IntoPatterns for &[String] {
    fn into_patterns(self) -> Vec<String> {
        self.to_vec()
    }
}

impl<const N: usize> IntoPatterns for [&str; N] {
    fn into_patterns(self) -> Vec<String> {
        self.iter().map(|p| p.to_string()).collect()
    }
}

/// Conversion into an ordered list of handlers.
///
/// Implemented per handler type in [`crate::chain::handler`].
pub trait IntoHandlers<H> {
    fn into_handlers(self) -> Vec<H>;
}
