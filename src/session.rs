//! Loading many class files into one symbol table.
//!
//! A failure is confined to the class that caused it: the loader rolls back
//! that class's symbols and the session moves on to the next artifact, unless
//! `stop_on_error` is set.

use crate::config::ClsemConfig;
use clsem_binder::{SymbolError, SymbolKind};
use clsem_classfile::{
    ClassStructure, LoadError, LoadedClass, LoadedKind, LoaderOptions, PickleDecoder,
    load_class_file,
};
use clsem_common::SymbolId;
use clsem_solver::{Context, TypeError, all_overridden_symbols, linearization, signature_of};
use std::fmt::Write;
use tracing::{debug, info, instrument, warn};

pub struct Session {
    ctx: Context,
    options: LoaderOptions,
    stop_on_error: bool,
    pickle: Option<Box<dyn PickleDecoder>>,
}

/// What happened to one artifact.
#[derive(Debug)]
pub struct ClassReport {
    /// Where the bytes came from (usually a file path).
    pub source: String,
    pub outcome: Result<LoadedClass, LoadError>,
}

#[derive(Debug, Default)]
pub struct SessionReport {
    pub classes: Vec<ClassReport>,
    /// Artifacts left unread after a failure under `stop_on_error`.
    pub skipped: usize,
}

impl SessionReport {
    pub fn loaded(&self) -> impl Iterator<Item = &LoadedClass> {
        self.classes.iter().filter_map(|c| c.outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &LoadError)> {
        self.classes
            .iter()
            .filter_map(|c| c.outcome.as_ref().err().map(|e| (c.source.as_str(), e)))
    }

    pub fn is_success(&self) -> bool {
        self.skipped == 0 && self.failures().next().is_none()
    }
}

/// What the `clsem` binary prints for one report entry.
#[derive(Debug, Default)]
pub struct Description {
    pub lines: Vec<String>,
    /// Linearizations or member lists that could not be computed.
    pub errors: usize,
}

/// Artifacts of one `load_all` call; an item is taken once it is loaded.
struct Batch<B> {
    items: Vec<Option<(String, B)>>,
    /// Binary names, where the bytes scan.
    names: Vec<Option<String>>,
}

impl<B> Batch<B> {
    fn waiting(&self, binary_name: &str) -> Option<usize> {
        (0..self.items.len())
            .find(|&i| self.items[i].is_some() && self.names[i].as_deref() == Some(binary_name))
    }
}

/// Binary names of the classes enclosing `binary_name`, outermost first:
/// `a/Outer$Mid$Inner` gives `a/Outer` and `a/Outer$Mid`.
fn enclosing_names(binary_name: &str) -> impl Iterator<Item = &str> {
    let start = binary_name.rfind('/').map_or(0, |slash| slash + 1);
    binary_name[start..]
        .match_indices('$')
        .map(move |(offset, _)| &binary_name[..start + offset])
        .filter(move |outer| outer.len() > start && !outer.ends_with('$'))
}

impl Session {
    pub fn new(config: ClsemConfig) -> Result<Self, SymbolError> {
        Ok(Session {
            ctx: Context::new()?,
            options: config.loader,
            stop_on_error: config.stop_on_error,
            pickle: None,
        })
    }

    /// Hand Scala pickle payloads to `decoder`. Without one, pickled classes
    /// fail to load.
    pub fn with_pickle_decoder(mut self, decoder: Box<dyn PickleDecoder>) -> Self {
        self.pickle = Some(decoder);
        self
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn into_context(self) -> Context {
        self.ctx
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Load one class file into the package named by its binary name.
    pub fn load(&mut self, bytes: &[u8]) -> Result<LoadedClass, LoadError> {
        let pickle = self
            .pickle
            .as_mut()
            .map(|decoder| decoder.as_mut() as &mut dyn PickleDecoder);
        load_class_file(&mut self.ctx, bytes, &self.options, pickle)
    }

    /// Load every artifact in order, collecting one report per artifact.
    ///
    /// An inner class (`Outer$Inner`) whose enclosing class is still waiting
    /// later in the batch is loaded after it, so the enclosing class's type
    /// parameters are in scope.
    #[instrument(level = "debug", skip_all)]
    pub fn load_all<I, S, B>(&mut self, artifacts: I) -> SessionReport
    where
        I: IntoIterator<Item = (S, B)>,
        S: Into<String>,
        B: AsRef<[u8]>,
    {
        let items: Vec<Option<(String, B)>> = artifacts
            .into_iter()
            .map(|(source, bytes)| Some((source.into(), bytes)))
            .collect();
        let names = items
            .iter()
            .map(|item| {
                let (_, bytes) = item.as_ref()?;
                let structure = ClassStructure::scan(bytes.as_ref()).ok()?;
                Some(structure.this_class)
            })
            .collect();
        let mut batch = Batch { items, names };
        let mut report = SessionReport::default();
        for index in 0..batch.items.len() {
            if self.load_at(index, &mut batch, &mut report) && self.stop_on_error {
                report.skipped = batch.items.iter().filter(|item| item.is_some()).count();
                break;
            }
        }
        info!(
            loaded = report.loaded().count(),
            failed = report.failures().count(),
            skipped = report.skipped,
            "session finished"
        );
        report
    }

    /// Load artifact `index` unless it was already taken, enclosing classes
    /// waiting in the batch first. Returns whether a load failed.
    fn load_at<B: AsRef<[u8]>>(
        &mut self,
        index: usize,
        batch: &mut Batch<B>,
        report: &mut SessionReport,
    ) -> bool {
        let Some((source, bytes)) = batch.items[index].take() else {
            return false;
        };
        let outers: Vec<String> = batch.names[index]
            .as_deref()
            .map(|name| enclosing_names(name).map(str::to_owned).collect())
            .unwrap_or_default();
        for outer in &outers {
            let Some(outer_index) = batch.waiting(outer) else {
                continue;
            };
            debug!(%source, %outer, "loading enclosing class first");
            if self.load_at(outer_index, batch, report) && self.stop_on_error {
                batch.items[index] = Some((source, bytes));
                return true;
            }
        }

        let outcome = self.load(bytes.as_ref());
        let failed = match &outcome {
            Ok(loaded) => {
                debug!(%source, class = %loaded.binary_name, kind = ?loaded.kind, "loaded");
                false
            }
            Err(err) => {
                warn!(%source, %err, "class not loaded");
                true
            }
        };
        report.classes.push(ClassReport { source, outcome });
        failed
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// One line describing a report entry, e.g.
    /// `Foo.class: java app.Greeter (5 symbols)`.
    pub fn summary(&self, report: &ClassReport) -> String {
        match &report.outcome {
            Ok(loaded) => {
                let kind = match loaded.kind {
                    LoadedKind::ScalaPickle => "scala",
                    LoadedKind::Java => "java",
                    LoadedKind::PickleNative => "tasty (skipped)",
                    LoadedKind::Artifact => "artifact (skipped)",
                };
                let name = loaded
                    .class
                    .map(|class| self.ctx.full_name(class))
                    .unwrap_or_else(|| loaded.binary_name.replace('/', "."));
                format!(
                    "{}: {kind} {name} ({} symbols)",
                    report.source,
                    loaded.symbols.len()
                )
            }
            Err(err) => format!("{}: error: {err}", report.source),
        }
    }

    /// The summary of `entry`, then its linearization and declarations when
    /// asked for. A part that fails to compute becomes an error line and the
    /// rest is still described.
    pub fn describe(&self, entry: &ClassReport, linearize: bool, members: bool) -> Description {
        let mut out = Description {
            lines: vec![self.summary(entry)],
            errors: 0,
        };
        let Ok(loaded) = &entry.outcome else {
            return out;
        };
        let Some(class) = loaded.class else {
            return out;
        };
        if linearize {
            match self.linearization_line(class) {
                Ok(line) => out.lines.push(format!("  lin: {line}")),
                Err(err) => {
                    out.errors += 1;
                    out.lines.push(format!("  lin: error: {err}"));
                }
            }
        }
        if members {
            let owners = std::iter::once(("", class))
                .chain(loaded.module_class.map(|module_class| ("static ", module_class)));
            for (prefix, owner) in owners {
                match self.member_lines(owner) {
                    Ok(lines) => out
                        .lines
                        .extend(lines.into_iter().map(|line| format!("  {prefix}{line}"))),
                    Err(err) => {
                        out.errors += 1;
                        out.lines.push(format!("  {prefix}members: error: {err}"));
                    }
                }
            }
        }
        out
    }

    /// `lin(class)` as a comma-separated list of full names.
    pub fn linearization_line(&self, class: SymbolId) -> Result<String, TypeError> {
        let lin = linearization(&self.ctx, class)?;
        Ok(lin
            .iter()
            .map(|&c| self.ctx.full_name(c))
            .collect::<Vec<_>>()
            .join(", "))
    }

    /// One line per declaration of `owner`: kind, name, erased signature
    /// for terms, and the members it overrides.
    pub fn member_lines(&self, owner: SymbolId) -> Result<Vec<String>, TypeError> {
        let ctx = &self.ctx;
        let mut lines = Vec::new();
        for member in ctx.symbols.decls(owner) {
            let symbol = ctx.symbols.symbol(member)?;
            let mut line = format!(
                "{} {}",
                symbol.kind().describe(),
                ctx.symbol_name(member)
            );
            if symbol.kind() == SymbolKind::Term {
                let info = ctx.symbols.declared_type(member)?;
                line.push_str(&signature_of(ctx, info).display(&ctx.names));
                let overridden = all_overridden_symbols(ctx, member)?;
                if !overridden.is_empty() {
                    let owners: Vec<String> = overridden
                        .iter()
                        .filter_map(|&m| ctx.symbols.get(m)?.owner())
                        .map(|o| ctx.full_name(o))
                        .collect();
                    let _ = write!(line, " overrides {}", owners.join(", "));
                }
            }
            lines.push(line);
        }
        Ok(lines)
    }
}
