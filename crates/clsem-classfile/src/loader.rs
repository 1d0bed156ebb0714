//! Loading one class file into the symbol table.
//!
//! Every class is one decoding unit: a checkpoint is taken before its first
//! symbol is created, every symbol it produces is verified with
//! `check_completed` before `load_class` returns, and any failure rolls the
//! arena back so siblings never see a half-built class.
//!
//! A Java class `C` in package `p` enters:
//!
//! ```text
//! p
//! ├── type C        class, instance members, class type parameters
//! ├── type C$       module class, static members
//! └── term C        module value, typed C$
//! ```

use crate::access;
use crate::classify::{ClassKind, classify, dotted};
use crate::descriptors::{MemberShape, TypeDecoder, TypeScope, TypeVarBinding};
use crate::error::{LoadError, PickleError};
use crate::options::LoaderOptions;
use crate::pickle::PickleDecoder;
use crate::signatures::Grammar;
use crate::structure::{ClassStructure, MemberInfo};
use clsem_binder::{Completion, Flags, SymbolKind};
use clsem_common::{Atom, Name, SymbolId, TermName, TypeId, TypeName};
use clsem_solver::Context;
use tracing::{debug, instrument, trace};

const SIGNATURE: &str = "Signature";
const METHOD_PARAMETERS: &str = "MethodParameters";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadedKind {
    ScalaPickle,
    Java,
    PickleNative,
    Artifact,
}

impl From<&ClassKind> for LoadedKind {
    fn from(kind: &ClassKind) -> Self {
        match kind {
            ClassKind::ScalaPickle { .. } => LoadedKind::ScalaPickle,
            ClassKind::Java { .. } => LoadedKind::Java,
            ClassKind::PickleNative => LoadedKind::PickleNative,
            ClassKind::Artifact => LoadedKind::Artifact,
        }
    }
}

/// The outcome of loading one class file.
#[derive(Clone, Debug)]
pub struct LoadedClass {
    /// Binary name from the class file, e.g. `java/util/Map$Entry`.
    pub binary_name: String,
    pub kind: LoadedKind,
    pub class: Option<SymbolId>,
    pub module: Option<SymbolId>,
    pub module_class: Option<SymbolId>,
    /// Every symbol the class produced, all verified.
    pub symbols: Vec<SymbolId>,
}

impl LoadedClass {
    fn empty(binary_name: &str, kind: LoadedKind) -> Self {
        LoadedClass {
            binary_name: binary_name.to_owned(),
            kind,
            class: None,
            module: None,
            module_class: None,
            symbols: Vec::new(),
        }
    }
}

/// Load the class file `bytes` as `name` declared in `owner`.
#[instrument(level = "debug", skip_all, fields(class = name))]
pub fn load_class(
    ctx: &mut Context,
    bytes: &[u8],
    owner: SymbolId,
    name: &str,
    options: &LoaderOptions,
    pickle: Option<&mut dyn PickleDecoder>,
) -> Result<LoadedClass, LoadError> {
    let structure = ClassStructure::scan(bytes)?;
    load_scanned(ctx, &structure, owner, name, options, pickle)
}

/// Load a class file into the package named by its own binary name.
pub fn load_class_file(
    ctx: &mut Context,
    bytes: &[u8],
    options: &LoaderOptions,
    pickle: Option<&mut dyn PickleDecoder>,
) -> Result<LoadedClass, LoadError> {
    let structure = ClassStructure::scan(bytes)?;
    let (package, simple) = match structure.this_class.rsplit_once('/') {
        Some((package, simple)) => (dotted(package), simple.to_owned()),
        None => (String::new(), structure.this_class.clone()),
    };
    let checkpoint = ctx.symbols.checkpoint();
    let owner = ctx.enter().package_path(&package);
    let result = owner
        .map_err(LoadError::from)
        .and_then(|owner| load_scanned(ctx, &structure, owner, &simple, options, pickle));
    if result.is_err() {
        ctx.symbols.rollback(checkpoint);
    }
    result
}

fn load_scanned(
    ctx: &mut Context,
    structure: &ClassStructure<'_>,
    owner: SymbolId,
    name: &str,
    options: &LoaderOptions,
    pickle: Option<&mut dyn PickleDecoder>,
) -> Result<LoadedClass, LoadError> {
    let kind = classify(structure, options)?;
    let loaded_kind = LoadedKind::from(&kind);
    let checkpoint = ctx.symbols.checkpoint();
    let result = match kind {
        ClassKind::Artifact | ClassKind::PickleNative => {
            debug!(kind = loaded_kind_name(loaded_kind), "nothing to enter");
            return Ok(LoadedClass::empty(&structure.this_class, loaded_kind));
        }
        ClassKind::ScalaPickle { payload } => {
            enter_pickled(ctx, structure, owner, name, &payload, pickle)
        }
        ClassKind::Java { signature } => {
            enter_java(ctx, structure, owner, name, signature.as_deref(), options)
        }
    };
    let verified = result.and_then(|mut loaded| {
        let created: Vec<SymbolId> = ctx.symbols.created_since(checkpoint).collect();
        ctx.symbols.check_completed(created.iter().copied())?;
        loaded.symbols = created;
        Ok(loaded)
    });
    match verified {
        Ok(loaded) => {
            debug!(symbols = loaded.symbols.len(), "loaded");
            Ok(loaded)
        }
        Err(err) => {
            debug!(error = %err, "rolling back");
            ctx.symbols.rollback(checkpoint);
            Err(err)
        }
    }
}

fn loaded_kind_name(kind: LoadedKind) -> &'static str {
    match kind {
        LoadedKind::ScalaPickle => "scala-pickle",
        LoadedKind::Java => "java",
        LoadedKind::PickleNative => "pickle-native",
        LoadedKind::Artifact => "artifact",
    }
}

fn ensure_not_loaded(ctx: &Context, owner: SymbolId, name: &str) -> Result<(), LoadError> {
    let Some(atom) = ctx.names.get(name) else {
        return Ok(());
    };
    let exists = ctx
        .symbols
        .get_decls(owner, &Name::type_(atom))
        .iter()
        .any(|&id| ctx.symbols[id].is_class());
    if exists {
        let mut full = ctx.full_name(owner);
        if !full.is_empty() {
            full.push('.');
        }
        full.push_str(name);
        return Err(LoadError::AlreadyLoaded(full));
    }
    Ok(())
}

fn enter_pickled(
    ctx: &mut Context,
    structure: &ClassStructure<'_>,
    owner: SymbolId,
    name: &str,
    payload: &[u8],
    pickle: Option<&mut dyn PickleDecoder>,
) -> Result<LoadedClass, LoadError> {
    ensure_not_loaded(ctx, owner, name)?;
    let class = dotted(&structure.this_class);
    let Some(decoder) = pickle else {
        return Err(LoadError::Pickle {
            class,
            source: PickleError::NoDecoder,
        });
    };
    trace!(bytes = payload.len(), "handing payload to pickle decoder");
    decoder
        .decode(ctx, owner, name, payload)
        .map_err(|source| LoadError::Pickle { class, source })?;

    let mut loaded = LoadedClass::empty(&structure.this_class, LoadedKind::ScalaPickle);
    if let Some(atom) = ctx.names.get(name) {
        loaded.class = ctx
            .symbols
            .get_decls(owner, &Name::type_(atom))
            .iter()
            .copied()
            .find(|&id| ctx.symbols[id].is_class());
        loaded.module = ctx
            .symbols
            .get_decls(owner, &Name::term(atom))
            .iter()
            .copied()
            .find(|&id| ctx.symbols[id].is_term());
        loaded.module_class = ctx
            .symbols
            .get_decl(owner, &Name::Type(TypeName::object_class(atom)));
    }
    Ok(loaded)
}

// =============================================================================
// Java classes
// =============================================================================

fn enter_java(
    ctx: &mut Context,
    structure: &ClassStructure<'_>,
    owner: SymbolId,
    name: &str,
    signature: Option<&str>,
    options: &LoaderOptions,
) -> Result<LoadedClass, LoadError> {
    ensure_not_loaded(ctx, owner, name)?;
    let atom = ctx.intern(name);
    let (class, module_class, module) = {
        let mut enter = ctx.enter();
        let class = enter.class_stub(owner, TypeName::plain(atom))?;
        let module_class = enter.class_stub(owner, TypeName::object_class(atom))?;
        let module = enter
            .symbols
            .create(Name::term(atom), owner, SymbolKind::Term)?;
        (class, module_class, module)
    };

    let scope = outer_scope(ctx, owner, name);
    let mut decoder = TypeDecoder::with_scope(ctx, options, scope);

    // Type parameter stubs first, so parents and bounds may refer to them.
    let class_sig = signature
        .map(|raw| decoder.parse_class_signature(class, raw).map(|sig| (raw, sig)))
        .transpose()?;
    let mut type_params = Vec::new();
    if let Some((_, sig)) = &class_sig {
        let names: Vec<&str> = sig.type_params.iter().map(|p| p.name.as_str()).collect();
        type_params = decoder.ctx_mut().enter().type_param_stubs(class, &names)?;
        for (name, &param) in names.iter().zip(&type_params) {
            decoder
                .scope_mut()
                .bind(*name, TypeVarBinding::Class(param));
        }
    }

    let parents = match &class_sig {
        Some((raw, sig)) => {
            let mut parents = Vec::with_capacity(1 + sig.interfaces.len());
            for parent in std::iter::once(&sig.superclass).chain(&sig.interfaces) {
                parents.push(decoder.class_type(class, raw, parent)?);
            }
            parents
        }
        None => erased_parents(&mut decoder, structure, class)?,
    };

    if let Some((raw, sig)) = &class_sig {
        let nothing = decoder.ctx().defn.nothing_type;
        for (param_sig, &param) in sig.type_params.iter().zip(&type_params) {
            let high = decoder.upper_bound(param, raw, param_sig)?;
            decoder
                .ctx_mut()
                .enter()
                .complete_type_param(param, Flags::JAVA_DEFINED, Some(nothing), Some(high))?;
        }
    }

    let flags = access::class_flags(structure.access_flags);
    let object = decoder.ctx().defn.object_type;
    {
        let mut enter = decoder.ctx_mut().enter();
        enter.complete_class(class, flags, type_params, parents)?;
        enter.complete_class(
            module_class,
            Flags::MODULE | Flags::FINAL | Flags::JAVA_DEFINED,
            Vec::new(),
            vec![object],
        )?;
        let module_type = enter.class_type(module_class);
        enter.symbols.complete(
            module,
            Completion::Typed {
                flags: Flags::MODULE | Flags::JAVA_DEFINED | Flags::STABLE,
                declared_type: module_type,
            },
        )?;
    }

    for field in structure.fields()? {
        enter_field(&mut decoder, structure, &field, class, module_class, options)?;
    }
    for method in structure.methods()? {
        enter_method(&mut decoder, structure, &method, class, module_class, options)?;
    }

    Ok(LoadedClass {
        binary_name: structure.this_class.clone(),
        kind: LoadedKind::Java,
        class: Some(class),
        module: Some(module),
        module_class: Some(module_class),
        symbols: Vec::new(),
    })
}

/// Type parameters of already loaded enclosing classes (`Outer` for
/// `Outer$Inner`), outermost first.
fn outer_scope(ctx: &Context, owner: SymbolId, name: &str) -> TypeScope {
    let mut scope = TypeScope::new();
    let mut end = 0;
    let segments: Vec<&str> = name.split('$').collect();
    for segment in &segments[..segments.len().saturating_sub(1)] {
        end += segment.len() + usize::from(end > 0);
        let Some(atom) = ctx.names.get(&name[..end]) else {
            break;
        };
        let Some(outer) = ctx
            .symbols
            .get_decls(owner, &Name::type_(atom))
            .iter()
            .copied()
            .find(|&id| ctx.symbols[id].is_class())
        else {
            continue;
        };
        let Ok(params) = ctx.symbols.class_type_params(outer) else {
            continue;
        };
        for &param in params {
            let param_name = ctx.names.resolve(ctx.symbols[param].name().last_atom());
            scope.bind(&*param_name, TypeVarBinding::Class(param));
        }
    }
    scope
}

/// Parents from the erased super class and interfaces.
fn erased_parents(
    decoder: &mut TypeDecoder<'_>,
    structure: &ClassStructure<'_>,
    class: SymbolId,
) -> Result<Vec<TypeId>, LoadError> {
    let mut parents = Vec::new();
    match structure.super_class()? {
        Some(super_class) => parents.push(decoder.class_ref(class, super_class)?),
        None if access::is_interface(structure.access_flags) => {
            parents.push(decoder.ctx().defn.object_type);
        }
        None => {
            let defn = &decoder.ctx().defn;
            parents.extend([defn.any_type, defn.matchable_type]);
        }
    }
    for interface in structure.interfaces()? {
        parents.push(decoder.class_ref(class, interface)?);
    }
    Ok(parents)
}

fn enter_field(
    decoder: &mut TypeDecoder<'_>,
    structure: &ClassStructure<'_>,
    field: &MemberInfo<'_>,
    class: SymbolId,
    module_class: SymbolId,
    options: &LoaderOptions,
) -> Result<(), LoadError> {
    if options.skip_synthetic_members && access::is_compiler_generated(field.access_flags) {
        trace!(field = field.name, "skipping synthetic field");
        return Ok(());
    }
    let owner = if access::is_static(field.access_flags) {
        module_class
    } else {
        class
    };
    let name = Name::Term(TermName::from_str(&decoder.ctx().names, field.name));
    let symbol = decoder
        .ctx_mut()
        .symbols
        .create(name, owner, SymbolKind::Term)?;
    let declared_type = match field.attribute(SIGNATURE) {
        Some(attr) => {
            let raw = structure.signature_of(attr)?;
            decoder.decode(symbol, raw, Grammar::Signature, MemberShape::Field)?
        }
        None => decoder.decode(symbol, field.descriptor, Grammar::Descriptor, MemberShape::Field)?,
    };
    decoder.ctx_mut().symbols.complete(
        symbol,
        Completion::Typed {
            flags: access::field_flags(field.access_flags),
            declared_type,
        },
    )?;
    Ok(())
}

fn enter_method(
    decoder: &mut TypeDecoder<'_>,
    structure: &ClassStructure<'_>,
    method: &MemberInfo<'_>,
    class: SymbolId,
    module_class: SymbolId,
    options: &LoaderOptions,
) -> Result<(), LoadError> {
    let init = decoder.ctx().defn.names.init;
    let clinit = decoder.ctx().defn.names.clinit;
    let atom = decoder.ctx().intern(method.name);
    if atom == clinit {
        return Ok(());
    }
    if options.skip_synthetic_members && access::is_compiler_generated(method.access_flags) {
        trace!(method = method.name, "skipping synthetic method");
        return Ok(());
    }

    let is_constructor = atom == init;
    let owner = if access::is_static(method.access_flags) && !is_constructor {
        module_class
    } else {
        class
    };
    let symbol = decoder
        .ctx_mut()
        .symbols
        .create(Name::term(atom), owner, SymbolKind::Term)?;

    let param_names: Vec<Atom> = match method.attribute(METHOD_PARAMETERS) {
        Some(attr) => structure
            .parameter_names(attr)?
            .into_iter()
            .map(|name| name.map_or(Atom::NONE, |n| decoder.ctx().intern(n)))
            .collect(),
        None => Vec::new(),
    };
    let shape = MemberShape::Method {
        param_names: &param_names,
    };
    let declared_type = match method.attribute(SIGNATURE) {
        Some(attr) => {
            let raw = structure.signature_of(attr)?;
            decoder.decode(symbol, raw, Grammar::Signature, shape)?
        }
        None => decoder.decode(symbol, method.descriptor, Grammar::Descriptor, shape)?,
    };

    let mut flags = access::method_flags(method.access_flags);
    if is_constructor {
        flags |= Flags::CONSTRUCTOR;
    }
    decoder.ctx_mut().symbols.complete(
        symbol,
        Completion::Typed {
            flags,
            declared_type,
        },
    )?;
    Ok(())
}
