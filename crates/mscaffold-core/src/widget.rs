//! Widget scaffolding.
//!
//! [`WidgetScaffolder`] drives one `widget create` run: it validates the
//! request, checks that the module and design theme exist, creates the missing
//! directories, creates or extends the module's widget descriptor and writes
//! the block and template artifacts. Nothing is rolled back when a step fails.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use mscaffold_core::templates::TemplateRenderer;
//! use mscaffold_core::widget::{WidgetRequest, WidgetScaffolder};
//!
//! # fn main() -> mscaffold_core::Result<()> {
//! let renderer = TemplateRenderer::builtin()?;
//! let request = WidgetRequest::new(
//!     "Acme", "Widgets", "local", "acme_widgets",
//!     "featured_items", "Featured Items", "base", "default",
//! )
//! .with_parameters(["id=title,label=Title,type=text"]);
//!
//! let mut scaffolder = WidgetScaffolder::new(&renderer, Path::new("/var/www/shop"));
//! for event in scaffolder.scaffold(&request)? {
//!     println!("{event}");
//! }
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::path::{Path, PathBuf};

use crate::{
    context::{widget_context, AuthorInfo, TemplateContext},
    descriptor::{CodePool, ScaffoldDescriptor, WidgetPaths},
    error::{Error, Result},
    parameters::normalize_parameters,
    scaffold::{ensure_directory, write_new_file},
    templates::{TemplateKind, TemplateRenderer},
    xml::{create_or_merge, DescriptorOutcome, ExtendMode},
};

/// Progress of a scaffolding run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaffoldState {
    Init,
    Normalized,
    DirsReady,
    DescriptorWritten,
    DescriptorMerged,
    ArtifactsWritten,
    Done,
    Aborted,
}

impl fmt::Display for ScaffoldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Normalized => "normalized",
            Self::DirsReady => "dirs-ready",
            Self::DescriptorWritten => "descriptor-written",
            Self::DescriptorMerged => "descriptor-merged",
            Self::ArtifactsWritten => "artifacts-written",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Something the scaffolder did on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldEvent {
    CreatedDirectory(PathBuf),
    CreatedFile(PathBuf),
    UpdatedFile(PathBuf),
    SkippedFile(PathBuf),
}

impl ScaffoldEvent {
    pub fn path(&self) -> &Path {
        match self {
            Self::CreatedDirectory(p)
            | Self::CreatedFile(p)
            | Self::UpdatedFile(p)
            | Self::SkippedFile(p) => p,
        }
    }
}

impl fmt::Display for ScaffoldEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreatedDirectory(p) => write!(f, "Created directory: {}", p.display()),
            Self::CreatedFile(p) => write!(f, "Created file: {}", p.display()),
            Self::UpdatedFile(p) => write!(f, "Updated file: {}", p.display()),
            Self::SkippedFile(p) => write!(f, "Skipped file: {}", p.display()),
        }
    }
}

/// Arguments of a `widget create` run, as given by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetRequest {
    pub vendor_namespace: String,
    pub module_name: String,
    /// Unvalidated; must be `local` or `community`
    pub code_pool: String,
    pub module_id: String,
    pub widget_id: String,
    pub widget_name: String,
    pub design_package: String,
    pub design_theme: String,
    /// Raw `field=value,...` parameter strings
    pub parameters: Vec<String>,
    pub author: AuthorInfo,
    pub extend_mode: ExtendMode,
    pub skip_existing: bool,
}

impl WidgetRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vendor_namespace: impl Into<String>,
        module_name: impl Into<String>,
        code_pool: impl Into<String>,
        module_id: impl Into<String>,
        widget_id: impl Into<String>,
        widget_name: impl Into<String>,
        design_package: impl Into<String>,
        design_theme: impl Into<String>,
    ) -> Self {
        Self {
            vendor_namespace: vendor_namespace.into(),
            module_name: module_name.into(),
            code_pool: code_pool.into(),
            module_id: module_id.into(),
            widget_id: widget_id.into(),
            widget_name: widget_name.into(),
            design_package: design_package.into(),
            design_theme: design_theme.into(),
            parameters: Vec::new(),
            author: AuthorInfo::default(),
            extend_mode: ExtendMode::default(),
            skip_existing: false,
        }
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_author(mut self, author: AuthorInfo) -> Self {
        self.author = author;
        self
    }

    pub fn with_extend_mode(mut self, mode: ExtendMode) -> Self {
        self.extend_mode = mode;
        self
    }

    pub fn with_skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing = skip;
        self
    }

    fn descriptor(&self) -> Result<ScaffoldDescriptor> {
        let code_pool: CodePool = self.code_pool.parse()?;
        Ok(ScaffoldDescriptor::new(
            &self.vendor_namespace,
            &self.module_name,
            code_pool,
            self.module_id.as_str(),
            self.widget_id.as_str(),
            self.widget_name.as_str(),
            self.design_package.as_str(),
            self.design_theme.as_str(),
        ))
    }
}

/// An artifact rendered ahead of the first write
struct PendingArtifact {
    path: PathBuf,
    /// `None` when the file exists and is skipped
    content: Option<String>,
}

/// Scaffolds widgets below an application root
#[derive(Debug)]
pub struct WidgetScaffolder<'a> {
    renderer: &'a TemplateRenderer,
    root: PathBuf,
    state: ScaffoldState,
    events: Vec<ScaffoldEvent>,
}

impl<'a> WidgetScaffolder<'a> {
    pub fn new(renderer: &'a TemplateRenderer, root: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            root: root.into(),
            state: ScaffoldState::Init,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> ScaffoldState {
        self.state
    }

    /// Events recorded so far, including those of an aborted run
    pub fn events(&self) -> &[ScaffoldEvent] {
        &self.events
    }

    /// Run the whole sequence and return the events in the order they happened
    pub fn scaffold(&mut self, request: &WidgetRequest) -> Result<Vec<ScaffoldEvent>> {
        self.state = ScaffoldState::Init;
        self.events.clear();

        match self.run(request) {
            Ok(()) => {
                self.transition(ScaffoldState::Done);
                Ok(self.events.clone())
            }
            Err(e) => {
                log::error!("Scaffolding of widget '{}' aborted: {}", request.widget_id, e);
                self.state = ScaffoldState::Aborted;
                Err(e)
            }
        }
    }

    fn transition(&mut self, next: ScaffoldState) {
        log::info!("Widget scaffolding: {} -> {}", self.state, next);
        self.state = next;
    }

    fn run(&mut self, request: &WidgetRequest) -> Result<()> {
        let descriptor = request.descriptor()?;
        let parameters = normalize_parameters(&request.parameters)?;
        self.transition(ScaffoldState::Normalized);

        let paths = descriptor.paths(&self.root);
        let template_filename = format!(
            "{}/widget/{}.phtml",
            descriptor.module_id(),
            descriptor.widget_id()
        );
        let context = widget_context(&descriptor, &parameters, &template_filename, &request.author)?;

        paths.check_prerequisites()?;
        let block = self.prepare(&paths.block_file, TemplateKind::BlockArtifact, &context, request)?;
        let template =
            self.prepare(&paths.template_file, TemplateKind::TemplateArtifact, &context, request)?;

        self.ensure_directories(&paths)?;
        self.transition(ScaffoldState::DirsReady);

        self.write_descriptor(&paths, &context, request.extend_mode)?;

        self.write_artifact(block)?;
        self.write_artifact(template)?;
        self.transition(ScaffoldState::ArtifactsWritten);
        Ok(())
    }

    /// Preflight one artifact: fail or skip when it exists, otherwise render it
    fn prepare(
        &self,
        path: &Path,
        kind: TemplateKind,
        context: &TemplateContext,
        request: &WidgetRequest,
    ) -> Result<PendingArtifact> {
        if path.exists() {
            if !request.skip_existing {
                return Err(Error::FileAlreadyExists(path.to_path_buf()));
            }
            log::debug!("{} exists, skipping {}", path.display(), kind);
            return Ok(PendingArtifact {
                path: path.to_path_buf(),
                content: None,
            });
        }
        Ok(PendingArtifact {
            path: path.to_path_buf(),
            content: Some(self.renderer.render(kind, context)?),
        })
    }

    fn ensure_directories(&mut self, paths: &WidgetPaths) -> Result<()> {
        for dir in [&paths.block_dir, &paths.template_dir, &paths.etc_dir()] {
            let created = ensure_directory(dir)?;
            self.events
                .extend(created.into_iter().map(ScaffoldEvent::CreatedDirectory));
        }
        Ok(())
    }

    fn write_descriptor(
        &mut self,
        paths: &WidgetPaths,
        context: &TemplateContext,
        mode: ExtendMode,
    ) -> Result<()> {
        let renderer = self.renderer;
        let outcome = create_or_merge(
            &paths.descriptor_file,
            mode,
            || renderer.render(TemplateKind::FullDescriptor, context),
            || renderer.render(TemplateKind::DescriptorFragment, context),
        )?;

        let path = paths.descriptor_file.clone();
        match outcome {
            DescriptorOutcome::Created => {
                self.events.push(ScaffoldEvent::CreatedFile(path));
                self.transition(ScaffoldState::DescriptorWritten);
            }
            DescriptorOutcome::Updated(report) => {
                log::debug!(
                    "Descriptor merge: {} appended, {} replaced",
                    report.appended,
                    report.replaced
                );
                self.events.push(ScaffoldEvent::UpdatedFile(path));
                self.transition(ScaffoldState::DescriptorMerged);
            }
        }
        Ok(())
    }

    fn write_artifact(&mut self, artifact: PendingArtifact) -> Result<()> {
        match artifact.content {
            Some(content) => {
                write_new_file(&artifact.path, &content)?;
                self.events.push(ScaffoldEvent::CreatedFile(artifact.path));
            }
            None => self.events.push(ScaffoldEvent::SkippedFile(artifact.path)),
        }
        Ok(())
    }
}
