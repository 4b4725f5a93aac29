//! Treeline - a fixed-width tree-diagram renderer for schema trees.
//!
//! Renders hierarchical schema/data-model trees as the textual tree
//! diagrams used to document network-management data models: a module
//! forest plus augment, rpcs, notifications, grouping, and yang-data
//! sections, laid out under a caller-supplied maximum line length with
//! cross-sibling type alignment and recursive node splitting.

pub mod config;

mod adapter;
mod error;
mod layout;
mod sequence;
mod walker;

pub use treeline_core::{accessor, descriptor, schema, sink, wrapper};

pub use adapter::SketchCursor;
pub use error::TreelineError;
pub use layout::{FitOutcome, Gap, IndentPlan};
pub use walker::TreeWalker;

use log::{debug, info, trace};

use treeline_core::{
    accessor::SchemaCursor,
    schema::SchemaModule,
    sink::{Sink, StringSink},
};

use config::RenderConfig;

/// Renderer for schema tree diagrams.
///
/// Combines a [`RenderConfig`] with the parsing and rendering stages.
///
/// # Examples
///
/// ```rust
/// use treeline::{TreeRenderer, config::RenderConfig};
///
/// let source = "module demo\n  container system\n    leaf hostname type=string\n";
///
/// let renderer = TreeRenderer::new(RenderConfig::default());
/// let module = renderer.parse(source).expect("failed to parse");
/// let diagram = renderer.render_to_string(&module).expect("failed to render");
///
/// assert!(diagram.starts_with("module: demo\n"));
/// assert!(diagram.contains("+--rw system"));
/// ```
#[derive(Default)]
pub struct TreeRenderer {
    config: RenderConfig,
}

impl TreeRenderer {
    /// Create a new renderer with the given configuration.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Parse schema sketch source into a [`SchemaModule`].
    ///
    /// # Errors
    ///
    /// Returns [`TreelineError::Parse`] carrying one diagnostic per
    /// offending line, together with the source for span reporting.
    pub fn parse(&self, source: &str) -> Result<SchemaModule, TreelineError> {
        info!("Parsing schema sketch");

        let module = treeline_parser::parse(source)
            .map_err(|err| TreelineError::new_parse_error(err, source))?;

        debug!(module = module.name(); "Sketch parsed successfully");
        trace!(module:? = module; "Parsed schema module");

        Ok(module)
    }

    /// Render a schema module's tree diagram into the sink.
    ///
    /// # Errors
    ///
    /// Returns [`TreelineError::Io`] when the sink fails; layout overflow
    /// is never an error.
    pub fn render(&self, module: &SchemaModule, sink: &mut dyn Sink) -> Result<(), TreelineError> {
        let mut cursor = SketchCursor::new(module);
        self.render_with_cursor(&mut cursor, sink)
    }

    /// Render the tree behind any [`SchemaCursor`] implementation into the
    /// sink. This is the seam custom schema representations plug into.
    pub fn render_with_cursor(
        &self,
        cursor: &mut dyn SchemaCursor,
        sink: &mut dyn Sink,
    ) -> Result<(), TreelineError> {
        info!(
            max_line_length:? = self.config.max_line_length();
            "Rendering tree diagram"
        );
        sequence::render_sections(cursor, &self.config, sink)?;
        debug!("Diagram rendered successfully");
        Ok(())
    }

    /// Render a schema module's tree diagram to a `String`.
    pub fn render_to_string(&self, module: &SchemaModule) -> Result<String, TreelineError> {
        let mut sink = StringSink::new();
        self.render(module, &mut sink)?;
        Ok(sink.into_string())
    }
}
