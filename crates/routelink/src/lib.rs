//! routelink - strongly-typed URL helpers from a compiled program model
//!
//! Runs the two generation families (controller endpoints and pages) over a
//! read-only [`ProgramModel`] and its template files. Each family is isolated:
//! a failure inside one pass becomes a single error [`Diagnostic`] and that
//! family's source is omitted, while the other family still runs.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let model = routelink::load_program_model(Path::new("model.json"))?;
//! let templates = routelink::collect_template_files(Path::new("."), ".cshtml")?;
//! let output = routelink::generate(&model, &templates, &Default::default());
//! for source in &output.sources {
//!     println!("// {}\n{}", source.hint_name, source.text);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod file_utils;

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe, catch_unwind};
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

pub use file_utils::{collect_template_files, load_config, load_program_model};
pub use routelink_codegen::GeneratorConfig;
use routelink_codegen::{
    CodegenError, discover_controllers, discover_pages, emit_controllers, emit_pages,
};
pub use routelink_core::{ProgramModel, TemplateFile};

/// One of the two independent generation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Endpoints,
    Pages,
}

impl Family {
    pub const fn diagnostic_id(self) -> &'static str {
        match self {
            Self::Endpoints => "RL0001",
            Self::Pages => "RL0002",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Endpoints => "controller endpoints",
            Self::Pages => "pages",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub id: &'static str,
    pub severity: Severity,
    pub family: Family,
    pub message: String,
}

/// A generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    pub hint_name: String,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct GenerationOutput {
    /// Endpoint family first, then pages. A family with nothing to expose, or
    /// whose pass failed, contributes no source.
    pub sources: Vec<GeneratedSource>,
    pub diagnostics: Vec<Diagnostic>,
    /// Set when cancellation stopped the run before every family ran.
    pub cancelled: bool,
}

impl GenerationOutput {
    pub fn source(&self, hint_name: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|s| s.hint_name == hint_name)
            .map(|s| s.text.as_str())
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Run both families to completion.
pub fn generate(
    model: &ProgramModel,
    templates: &[TemplateFile],
    config: &GeneratorConfig,
) -> GenerationOutput {
    generate_with_cancel(model, templates, config, &AtomicBool::new(false))
}

/// Run both families, checking `cancel` before each one. A family that has
/// started always finishes, so no partial tree is ever emitted.
pub fn generate_with_cancel(
    model: &ProgramModel,
    templates: &[TemplateFile],
    config: &GeneratorConfig,
    cancel: &AtomicBool,
) -> GenerationOutput {
    let mut output = GenerationOutput::default();

    if cancel.load(Ordering::Relaxed) {
        output.cancelled = true;
        return output;
    }
    run_family(&mut output, Family::Endpoints, config, || {
        let report = discover_controllers(model, config);
        let source = (!report.areas.is_empty())
            .then(|| emit_controllers(&report.areas, &config.emitter));
        (source, report.warnings)
    });

    if cancel.load(Ordering::Relaxed) {
        tracing::info!("generation cancelled before the page family");
        output.cancelled = true;
        return output;
    }
    run_family(&mut output, Family::Pages, config, || {
        let report = discover_pages(model, templates, config);
        let source =
            (!report.areas.is_empty()).then(|| emit_pages(&report.areas, &config.emitter));
        (source, report.warnings)
    });

    output
}

fn hint_name(family: Family, config: &GeneratorConfig) -> &str {
    match family {
        Family::Endpoints => &config.emitter.controllers_file_name,
        Family::Pages => &config.emitter.pages_file_name,
    }
}

fn run_family<F>(output: &mut GenerationOutput, family: Family, config: &GeneratorConfig, pass: F)
where
    F: FnOnce() -> (Option<String>, Vec<CodegenError>),
{
    let _span = tracing::info_span!("family", %family).entered();
    match isolated(pass) {
        Ok((source, warnings)) => {
            for warning in warnings {
                output.diagnostics.push(Diagnostic {
                    id: family.diagnostic_id(),
                    severity: Severity::Warning,
                    family,
                    message: warning.to_string(),
                });
            }
            match source {
                Some(text) => {
                    tracing::debug!(bytes = text.len(), "family source generated");
                    output.sources.push(GeneratedSource {
                        hint_name: hint_name(family, config).to_string(),
                        text,
                    });
                }
                None => tracing::debug!("family produced nothing to emit"),
            }
        }
        Err((payload, backtrace)) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(error = %message, "generation failed; output omitted");
            output.diagnostics.push(Diagnostic {
                id: family.diagnostic_id(),
                severity: Severity::Error,
                family,
                message: format!(
                    "Generating URL helpers for {family} failed: {message}\n{backtrace}\nPlease report this issue at {}",
                    config.issue_url
                ),
            });
        }
    }
}

thread_local! {
    static ISOLATED: Cell<bool> = const { Cell::new(false) };
    static PANIC_BACKTRACE: RefCell<Option<Backtrace>> = const { RefCell::new(None) };
}

static INSTALL_HOOK: Once = Once::new();

/// Chain a panic hook that records the backtrace at the panic site while the
/// panicking thread is inside [`isolated`]. Other panics go to the previous hook.
fn install_panic_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if ISOLATED.get() {
                PANIC_BACKTRACE.set(Some(Backtrace::force_capture()));
            } else {
                previous(info);
            }
        }));
    });
}

type Panic = (Box<dyn Any + Send>, Backtrace);

/// Run `pass`, turning a panic into its payload and the backtrace captured
/// where it was raised.
fn isolated<T>(pass: impl FnOnce() -> T) -> Result<T, Panic> {
    install_panic_hook();
    PANIC_BACKTRACE.take();
    let outer = ISOLATED.replace(true);
    let result = catch_unwind(AssertUnwindSafe(pass));
    ISOLATED.set(outer);
    result.map_err(|payload| {
        let backtrace = PANIC_BACKTRACE
            .take()
            .unwrap_or_else(Backtrace::force_capture);
        (payload, backtrace)
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
