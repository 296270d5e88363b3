//! Tool dispatcher: filter chain, cached tool set, and name-based dispatch.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use clitool_config::{DEFAULT_SELECTION_KEY, DispatcherConfig, Environment};
use clitool_primitives::{CliTool, ToolFault, ToolInfo};
use thiserror::Error;
use tracing::{debug, warn};

use crate::action::FilterAction;
use crate::discovery::{Discoverer, InventoryDiscoverer};
use crate::filter::{FilterResult, PatternFilter, ToolFilter, UniversalFilter};
use crate::listing::write_listing;

/// Errors surfaced while dispatching to a tool.
///
/// Unknown or unselected tools are not errors; they are reported on the
/// diagnostics stream and yield `Ok(false)`.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Writing to the diagnostics stream failed.
    #[error("failed to write diagnostics: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: io::Error,
    },
    /// The selected tool raised a fault while running.
    #[error("tool `{name}` failed: {fault}")]
    Tool {
        /// Name the tool was selected by.
        name: String,
        /// Fault exactly as raised by the tool.
        fault: ToolFault,
    },
}

impl DispatchError {
    /// Returns the tool fault, if this error carries one.
    #[must_use]
    pub fn fault(&self) -> Option<&ToolFault> {
        match self {
            Self::Tool { fault, .. } => Some(fault),
            Self::Io { .. } => None,
        }
    }
}

/// Two discovered tools claimed the same name; the later one won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollision {
    name: String,
    shadowed: &'static str,
    shadowing: &'static str,
}

impl NameCollision {
    /// Returns the contested name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type of the tool that is no longer reachable by name.
    #[must_use]
    pub fn shadowed(&self) -> &'static str {
        self.shadowed
    }

    /// Returns the type of the tool now registered under the name.
    #[must_use]
    pub fn shadowing(&self) -> &'static str {
        self.shadowing
    }
}

#[derive(Default)]
struct Snapshot {
    tools: BTreeMap<String, Arc<dyn CliTool>>,
    collisions: Vec<NameCollision>,
}

enum ToolSet {
    Unbuilt,
    Built(Snapshot),
}

impl ToolSet {
    fn get_or_build(&mut self, build: impl FnOnce() -> Snapshot) -> &Snapshot {
        if let Self::Unbuilt = self {
            *self = Self::Built(build());
        }
        match self {
            Self::Built(snapshot) => snapshot,
            Self::Unbuilt => &EMPTY_SNAPSHOT,
        }
    }
}

static EMPTY_SNAPSHOT: Snapshot = Snapshot {
    tools: BTreeMap::new(),
    collisions: Vec::new(),
};

/// Selects a tool by name from the filtered set of discovered tools and runs
/// it.
///
/// The tool set is built lazily on first use and rebuilt from scratch after
/// any change to the filter chain or the discoverer. The dispatcher is not
/// internally synchronized; share it across threads only behind a lock.
pub struct ToolDispatcher {
    filters: Vec<Box<dyn ToolFilter>>,
    discoverer: Box<dyn Discoverer>,
    tools: ToolSet,
    selection_key: String,
    diagnostics: Box<dyn Write + Send>,
}

impl fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Option<Vec<_>> = match &self.tools {
            ToolSet::Unbuilt => None,
            ToolSet::Built(snapshot) => Some(snapshot.tools.keys().cloned().collect()),
        };
        f.debug_struct("ToolDispatcher")
            .field("filters", &self.filters.len())
            .field("selection_key", &self.selection_key)
            .field("registered", &registered)
            .finish_non_exhaustive()
    }
}

impl Default for ToolDispatcher {
    fn default() -> Self {
        Self::new(InventoryDiscoverer)
    }
}

impl ToolDispatcher {
    /// Creates a dispatcher with an empty filter chain over `discoverer`.
    #[must_use]
    pub fn new<D>(discoverer: D) -> Self
    where
        D: Discoverer + 'static,
    {
        Self {
            filters: Vec::new(),
            discoverer: Box::new(discoverer),
            tools: ToolSet::Unbuilt,
            selection_key: DEFAULT_SELECTION_KEY.to_owned(),
            diagnostics: Box::new(io::stderr()),
        }
    }

    /// Creates a link-time discovering dispatcher configured by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FilterError::InvalidPattern`] if a configured pattern
    /// does not compile.
    pub fn from_config(config: &DispatcherConfig) -> FilterResult<Self> {
        let mut dispatcher = Self::default();
        dispatcher.apply_config(config)?;
        Ok(dispatcher)
    }

    /// Redirects user-facing error reports, which go to stderr by default.
    #[must_use]
    pub fn with_diagnostics<W>(mut self, diagnostics: W) -> Self
    where
        W: Write + Send + 'static,
    {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    /// Overrides the environment key consulted by [`Self::run`].
    #[must_use]
    pub fn with_selection_key(mut self, key: impl Into<String>) -> Self {
        self.selection_key = key.into();
        self
    }

    /// Returns the environment key consulted by [`Self::run`].
    #[must_use]
    pub fn selection_key(&self) -> &str {
        &self.selection_key
    }

    /// Adopts the selection key and appends every filter rule of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FilterError::InvalidPattern`] for the first rule that
    /// does not compile; rules before it remain applied.
    pub fn apply_config(&mut self, config: &DispatcherConfig) -> FilterResult<()> {
        self.selection_key = config.selection_key().to_owned();
        for rule in config.filters() {
            self.add_regex_filter(rule.is_include(), rule.name(), rule.type_name())?;
        }
        Ok(())
    }

    /// Appends `rule` to the filter chain.
    ///
    /// The first rule added is preceded by a seed filter establishing the
    /// default verdict: exclude everything when `inclusive`, include
    /// everything otherwise.
    pub fn add_filter<F>(&mut self, rule: F, inclusive: bool)
    where
        F: ToolFilter + 'static,
    {
        if self.filters.is_empty() {
            let seed = FilterAction::on_match(!inclusive);
            self.filters.push(Box::new(UniversalFilter::new(seed)));
        }
        self.filters.push(Box::new(rule));
        self.invalidate();
        debug!(inclusive, filters = self.filters.len(), "added tool filter");
    }

    /// Returns the number of filters in the chain, seed included.
    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Keeps tools whose name matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FilterError::InvalidPattern`] if the pattern is invalid.
    pub fn add_name_regex_include(&mut self, pattern: &str) -> FilterResult<()> {
        self.add_name_regex_filter(true, pattern)
    }

    /// Drops tools whose name matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FilterError::InvalidPattern`] if the pattern is invalid.
    pub fn add_name_regex_exclude(&mut self, pattern: &str) -> FilterResult<()> {
        self.add_name_regex_filter(false, pattern)
    }

    /// Adds a name rule of the given inclusivity.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FilterError::InvalidPattern`] if the pattern is invalid.
    pub fn add_name_regex_filter(&mut self, include: bool, pattern: &str) -> FilterResult<()> {
        self.add_regex_filter(include, Some(pattern), None)
    }

    /// Keeps tools whose implementing type matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FilterError::InvalidPattern`] if the pattern is invalid.
    pub fn add_type_regex_include(&mut self, pattern: &str) -> FilterResult<()> {
        self.add_type_regex_filter(true, pattern)
    }

    /// Drops tools whose implementing type matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FilterError::InvalidPattern`] if the pattern is invalid.
    pub fn add_type_regex_exclude(&mut self, pattern: &str) -> FilterResult<()> {
        self.add_type_regex_filter(false, pattern)
    }

    /// Adds an implementing-type rule of the given inclusivity.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FilterError::InvalidPattern`] if the pattern is invalid.
    pub fn add_type_regex_filter(&mut self, include: bool, pattern: &str) -> FilterResult<()> {
        self.add_regex_filter(include, None, Some(pattern))
    }

    /// Keeps tools matching either pattern.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FilterError::InvalidPattern`] if a pattern is invalid.
    pub fn add_regex_include(
        &mut self,
        name: Option<&str>,
        type_name: Option<&str>,
    ) -> FilterResult<()> {
        self.add_regex_filter(true, name, type_name)
    }

    /// Drops tools matching either pattern.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FilterError::InvalidPattern`] if a pattern is invalid.
    pub fn add_regex_exclude(
        &mut self,
        name: Option<&str>,
        type_name: Option<&str>,
    ) -> FilterResult<()> {
        self.add_regex_filter(false, name, type_name)
    }

    /// Adds a pattern rule; the chain is left untouched if compilation fails.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FilterError::InvalidPattern`] if a pattern is invalid.
    pub fn add_regex_filter(
        &mut self,
        include: bool,
        name: Option<&str>,
        type_name: Option<&str>,
    ) -> FilterResult<()> {
        let rule = PatternFilter::new(name, type_name, include)?;
        self.add_filter(rule, include);
        Ok(())
    }

    /// Replaces the discoverer; the tool set is rebuilt on next use.
    pub fn set_discoverer<D>(&mut self, discoverer: D)
    where
        D: Discoverer + 'static,
    {
        self.discoverer = Box::new(discoverer);
        self.invalidate();
    }

    /// Replaces the discoverer and rebuilds the tool set immediately.
    pub fn refresh_with<D>(&mut self, discoverer: D)
    where
        D: Discoverer + 'static,
    {
        self.discoverer = Box::new(discoverer);
        self.refresh();
    }

    /// Rebuilds the tool set from a fresh discovery.
    pub fn refresh(&mut self) {
        self.tools = ToolSet::Built(build_snapshot(&self.filters, self.discoverer.as_ref()));
    }

    /// Returns `true` once the tool set has been built and not invalidated
    /// since.
    #[must_use]
    pub fn is_built(&self) -> bool {
        matches!(self.tools, ToolSet::Built(_))
    }

    /// Returns the tool registered under `name`.
    pub fn lookup(&mut self, name: &str) -> Option<Arc<dyn CliTool>> {
        self.snapshot().tools.get(name).cloned()
    }

    /// Lists the registered tools ordered by name.
    pub fn list(&mut self) -> Vec<ToolInfo> {
        self.snapshot()
            .tools
            .values()
            .map(|tool| ToolInfo::of(tool.as_ref()))
            .collect()
    }

    /// Returns the name collisions recorded while building the current set.
    pub fn collisions(&mut self) -> &[NameCollision] {
        &self.snapshot().collisions
    }

    /// Writes the tool listing to `out`.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `out`.
    pub fn show_tools(&mut self, out: &mut dyn Write) -> io::Result<()> {
        let snapshot = self.snapshot();
        write_listing(out, snapshot.tools.values().map(Arc::as_ref))
    }

    /// Runs the tool named by the selection key in `env`.
    ///
    /// Returns `Ok(false)` after reporting to the diagnostics stream when the
    /// key is unset.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run_tool`].
    pub fn run(&mut self, env: &dyn Environment, args: &[String]) -> Result<bool, DispatchError> {
        let Some(name) = env.var(&self.selection_key) else {
            debug!(key = %self.selection_key, "no tool selected");
            let hint = format!(
                "Please re-run with the '{}' variable set to a valid tool name",
                self.selection_key
            );
            self.report(&["Error: I don't know which tool to run.", hint.as_str()])?;
            return Ok(false);
        };
        self.run_tool(&name, args)
    }

    /// Runs the tool registered under `name` with `args` and returns its own
    /// verdict.
    ///
    /// Returns `Ok(false)` after reporting to the diagnostics stream when no
    /// such tool exists.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Tool`] when the tool faults and
    /// [`DispatchError::Io`] when the report cannot be written.
    pub fn run_tool(&mut self, name: &str, args: &[String]) -> Result<bool, DispatchError> {
        let Some(tool) = self.lookup(name) else {
            debug!(tool = name, "unknown tool requested");
            let message = format!("Error: I don't know how to run tool '{name}'.");
            self.report(&[message.as_str()])?;
            return Ok(false);
        };

        debug!(tool = name, type_name = tool.type_name(), args = args.len(), "dispatching");
        tool.run_main(args).map_err(|fault| DispatchError::Tool {
            name: name.to_owned(),
            fault,
        })
    }

    fn report(&mut self, lines: &[&str]) -> io::Result<()> {
        let snapshot = self
            .tools
            .get_or_build(|| build_snapshot(&self.filters, self.discoverer.as_ref()));
        let out = &mut self.diagnostics;
        for line in lines {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "This is a list of all available tools:")?;
        write_listing(out.as_mut(), snapshot.tools.values().map(Arc::as_ref))?;
        out.flush()
    }

    fn snapshot(&mut self) -> &Snapshot {
        self.tools
            .get_or_build(|| build_snapshot(&self.filters, self.discoverer.as_ref()))
    }

    fn invalidate(&mut self) {
        self.tools = ToolSet::Unbuilt;
    }
}

fn admits(filters: &[Box<dyn ToolFilter>], tool: &dyn CliTool) -> bool {
    filters
        .iter()
        .fold(true, |verdict, filter| filter.apply(tool).apply(verdict))
}

fn build_snapshot(filters: &[Box<dyn ToolFilter>], discoverer: &dyn Discoverer) -> Snapshot {
    let mut snapshot = Snapshot::default();
    let candidates = discoverer.discover();
    let discovered = candidates.len();

    for tool in candidates {
        if !admits(filters, tool.as_ref()) {
            debug!(tool = tool.name(), type_name = tool.type_name(), "tool filtered out");
            continue;
        }

        let name = tool.name().to_owned();
        let shadowing = tool.type_name();
        if let Some(previous) = snapshot.tools.insert(name.clone(), tool) {
            let shadowed = previous.type_name();
            warn!(
                name = %name,
                shadowed,
                shadowing,
                "name clash: tool {shadowed} is hidden by {shadowing}"
            );
            snapshot.collisions.push(NameCollision {
                name,
                shadowed,
                shadowing,
            });
        }
    }

    debug!(discovered, kept = snapshot.tools.len(), "rebuilt tool set");
    snapshot
}
