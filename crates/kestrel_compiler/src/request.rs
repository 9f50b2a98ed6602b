//! What to compile.

use kestrel_common::Precision;
use kestrel_source::KernelParameters;

/// A request to compile one routine at one precision.
///
/// The base preamble is rendered from the routine's default kernel parameters
/// with the caller's overrides laid on top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutineRequest {
    name: String,
    precision: Precision,
    parameters: KernelParameters,
    overrides: KernelParameters,
    fragments: Vec<String>,
}

impl RoutineRequest {
    /// Creates a request with no parameters and no source fragments.
    pub fn new(name: impl Into<String>, precision: Precision) -> Self {
        Self {
            name: name.into(),
            precision,
            parameters: KernelParameters::new(),
            overrides: KernelParameters::new(),
            fragments: Vec::new(),
        }
    }

    /// Sets the routine's default kernel parameters.
    pub fn with_parameters(mut self, parameters: KernelParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Sets user overrides applied on top of the default parameters.
    pub fn with_overrides(mut self, overrides: KernelParameters) -> Self {
        self.overrides = overrides;
        self
    }

    /// Appends a routine source fragment.
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragments.push(fragment.into());
        self
    }

    /// Appends several routine source fragments, in order.
    pub fn with_fragments<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fragments.extend(fragments.into_iter().map(Into::into));
        self
    }

    /// Routine name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requested precision.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Routine source fragments, in order.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// The effective kernel parameters: defaults overlaid with overrides.
    pub fn effective_parameters(&self) -> KernelParameters {
        self.parameters.overlay(&self.overrides)
    }

    /// Renders the base preamble from the effective parameters.
    pub fn preamble(&self) -> String {
        self.effective_parameters().to_preamble()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_in_preamble() {
        let request = RoutineRequest::new("XAXPY", Precision::Single)
            .with_parameters(KernelParameters::new().with("WGS", 64).with("VW", 1))
            .with_overrides(KernelParameters::new().with("VW", 4));
        assert_eq!(request.preamble(), "#define VW 4\n#define WGS 64\n");
    }

    #[test]
    fn fragments_keep_order() {
        let request = RoutineRequest::new("XGEMM", Precision::Double)
            .with_fragment("a")
            .with_fragments(["b", "c"]);
        assert_eq!(request.fragments(), ["a", "b", "c"]);
    }
}
