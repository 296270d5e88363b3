//! Sources that enumerate the tools installed in the running program.

use std::fmt;
use std::sync::Arc;

use clitool_primitives::CliTool;

/// Enumerates the tool candidates currently available.
///
/// Every call should produce the full, current set; the dispatcher calls it
/// once per rebuild and keeps nothing from earlier calls.
pub trait Discoverer: Send + Sync {
    /// Returns every available tool candidate.
    fn discover(&self) -> Vec<Arc<dyn CliTool>>;
}

impl<F> Discoverer for F
where
    F: Fn() -> Vec<Arc<dyn CliTool>> + Send + Sync,
{
    fn discover(&self) -> Vec<Arc<dyn CliTool>> {
        (self)()
    }
}

/// Link-time registration of a tool type.
///
/// Usually emitted by the `#[cli_tool]` attribute; may also be submitted by
/// hand with [`inventory::submit!`].
pub struct ToolRegistration {
    factory: fn() -> Box<dyn CliTool>,
}

impl ToolRegistration {
    /// Creates a registration from a factory producing fresh tool instances.
    #[must_use]
    pub const fn new(factory: fn() -> Box<dyn CliTool>) -> Self {
        Self { factory }
    }

    /// Produces a new instance of the registered tool.
    #[must_use]
    pub fn instantiate(&self) -> Box<dyn CliTool> {
        (self.factory)()
    }
}

impl fmt::Debug for ToolRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistration").finish_non_exhaustive()
    }
}

inventory::collect!(ToolRegistration);

/// Discovers every tool registered at link time.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryDiscoverer;

impl Discoverer for InventoryDiscoverer {
    fn discover(&self) -> Vec<Arc<dyn CliTool>> {
        inventory::iter::<ToolRegistration>
            .into_iter()
            .map(|registration| Arc::from(registration.instantiate()))
            .collect()
    }
}

/// Discoverer over an explicit registration table.
///
/// Instances are shared across rebuilds; order of discovery is the order in
/// which tools were added.
#[derive(Clone, Default)]
pub struct StaticDiscoverer {
    tools: Vec<Arc<dyn CliTool>>,
}

impl StaticDiscoverer {
    /// Creates a discoverer over the supplied tools.
    #[must_use]
    pub fn new(tools: impl IntoIterator<Item = Arc<dyn CliTool>>) -> Self {
        Self {
            tools: tools.into_iter().collect(),
        }
    }

    /// Appends a tool to the table.
    #[must_use]
    pub fn with_tool<T>(mut self, tool: T) -> Self
    where
        T: CliTool + 'static,
    {
        self.tools.push(Arc::new(tool));
        self
    }
}

impl fmt::Debug for StaticDiscoverer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.tools.iter().map(|tool| tool.name()).collect();
        f.debug_struct("StaticDiscoverer")
            .field("tools", &names)
            .finish()
    }
}

impl Discoverer for StaticDiscoverer {
    fn discover(&self) -> Vec<Arc<dyn CliTool>> {
        self.tools.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clitool_primitives::ToolFault;

    struct Noop;

    impl CliTool for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn description(&self) -> &str {
            "Does nothing"
        }

        fn run_main(&self, _args: &[String]) -> Result<bool, ToolFault> {
            Ok(true)
        }
    }

    fn make_noop() -> Box<dyn CliTool> {
        Box::new(Noop)
    }

    inventory::submit! {
        ToolRegistration::new(make_noop)
    }

    #[test]
    fn inventory_discoverer_finds_submitted_tools() {
        let tools = InventoryDiscoverer.discover();
        assert!(tools.iter().any(|tool| tool.name() == "noop"));
    }

    #[test]
    fn static_discoverer_preserves_order() {
        let discoverer = StaticDiscoverer::default().with_tool(Noop).with_tool(Noop);
        let tools = discoverer.discover();
        assert_eq!(tools.len(), 2);
        assert!(tools.iter().all(|tool| tool.type_name().ends_with("Noop")));
    }

    #[test]
    fn closures_act_as_discoverers() {
        let discoverer = || -> Vec<Arc<dyn CliTool>> { vec![Arc::new(Noop)] };
        assert_eq!(discoverer.discover().len(), 1);
    }
}
