//! Names of symbols.
//!
//! A name is a pure value: equality is structural, and the namespace (term or
//! type) is part of its identity, so the term `Foo` (an object) and the type
//! `Foo` (a class) never collide in a declaration map.

use crate::interner::{Atom, Interner};
use std::fmt::Write;

/// A name in the term namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TermName {
    /// A flat identifier, e.g. `foo`.
    Simple(Atom),
    /// A dotted path, used for package full names: `prefix.selector`.
    Qualified {
        prefix: Box<TermName>,
        selector: Atom,
    },
    /// A term name disambiguated by an erased signature (overloads).
    Signed(Box<SignedName>),
}

/// A term name together with the signature of the overload it designates.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignedName {
    pub underlying: TermName,
    pub sig: Signature,
    /// The name the overload is known by in its own class (usually `underlying`).
    pub target: TermName,
}

/// A name in the type namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeName {
    /// A class, type member or type parameter name.
    Plain(TermName),
    /// The module class backing an object (`Foo$` on the JVM).
    ObjectClass(TermName),
}

/// Any name, tagged with its namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Name {
    Term(TermName),
    Type(TypeName),
}

/// Erased parameter-list shape of a method.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature {
    pub params: Vec<ParamSig>,
    pub result: ErasedTypeRef,
}

/// One element of a signature's parameter list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamSig {
    /// A type-parameter clause of the given length.
    TypeLen(u32),
    /// A term parameter, by its erased type.
    Term(ErasedTypeRef),
}

/// The erasure of a type: a class full name plus array dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErasedTypeRef {
    pub class: FullyQualifiedName,
    pub array_dims: u8,
}

/// A path of names from the root package.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FullyQualifiedName {
    pub path: Vec<Name>,
}

impl TermName {
    #[inline]
    pub fn simple(atom: Atom) -> Self {
        TermName::Simple(atom)
    }

    pub fn from_str(interner: &Interner, s: &str) -> Self {
        TermName::Simple(interner.intern(s))
    }

    /// Qualify `self` with a further selector (`a.b` + `c` = `a.b.c`).
    pub fn select(&self, selector: Atom) -> Self {
        TermName::Qualified {
            prefix: Box::new(self.clone()),
            selector,
        }
    }

    pub fn signed(self, sig: Signature) -> Self {
        TermName::Signed(Box::new(SignedName {
            target: self.clone(),
            underlying: self,
            sig,
        }))
    }

    /// The name with any signature stripped.
    pub fn unsigned(&self) -> &TermName {
        match self {
            TermName::Signed(signed) => signed.underlying.unsigned(),
            _ => self,
        }
    }

    pub fn signature(&self) -> Option<&Signature> {
        match self {
            TermName::Signed(signed) => Some(&signed.sig),
            _ => None,
        }
    }

    /// The last simple component of the name.
    pub fn last_atom(&self) -> Atom {
        match self {
            TermName::Simple(atom) => *atom,
            TermName::Qualified { selector, .. } => *selector,
            TermName::Signed(signed) => signed.underlying.last_atom(),
        }
    }

    pub fn is_simple(&self, atom: Atom) -> bool {
        matches!(self, TermName::Simple(a) if *a == atom)
    }

    pub fn to_type_name(&self) -> TypeName {
        TypeName::Plain(self.unsigned().clone())
    }

    pub fn display(&self, interner: &Interner) -> String {
        let mut out = String::new();
        self.write_to(&mut out, interner);
        out
    }

    fn write_to(&self, out: &mut String, interner: &Interner) {
        match self {
            TermName::Simple(atom) => out.push_str(&interner.resolve(*atom)),
            TermName::Qualified { prefix, selector } => {
                prefix.write_to(out, interner);
                out.push('.');
                out.push_str(&interner.resolve(*selector));
            }
            TermName::Signed(signed) => {
                signed.underlying.write_to(out, interner);
                out.push('[');
                signed.sig.write_to(out, interner);
                out.push(']');
            }
        }
    }
}

impl TypeName {
    pub fn plain(atom: Atom) -> Self {
        TypeName::Plain(TermName::Simple(atom))
    }

    pub fn object_class(atom: Atom) -> Self {
        TypeName::ObjectClass(TermName::Simple(atom))
    }

    pub fn to_term_name(&self) -> &TermName {
        match self {
            TypeName::Plain(name) | TypeName::ObjectClass(name) => name,
        }
    }

    pub fn is_object_class(&self) -> bool {
        matches!(self, TypeName::ObjectClass(_))
    }

    pub fn display(&self, interner: &Interner) -> String {
        match self {
            TypeName::Plain(name) => name.display(interner),
            TypeName::ObjectClass(name) => format!("{}$", name.display(interner)),
        }
    }
}

impl Name {
    pub fn term(atom: Atom) -> Self {
        Name::Term(TermName::Simple(atom))
    }

    pub fn type_(atom: Atom) -> Self {
        Name::Type(TypeName::plain(atom))
    }

    pub fn is_term(&self) -> bool {
        matches!(self, Name::Term(_))
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Name::Type(_))
    }

    pub fn as_term(&self) -> Option<&TermName> {
        match self {
            Name::Term(name) => Some(name),
            Name::Type(_) => None,
        }
    }

    pub fn as_type(&self) -> Option<&TypeName> {
        match self {
            Name::Type(name) => Some(name),
            Name::Term(_) => None,
        }
    }

    /// The key under which a declaration with this name is stored: signatures
    /// are stripped, so all overloads share one bucket.
    pub fn decl_key(&self) -> Name {
        match self {
            Name::Term(name) => Name::Term(name.unsigned().clone()),
            Name::Type(name) => Name::Type(name.clone()),
        }
    }

    pub fn last_atom(&self) -> Atom {
        match self {
            Name::Term(name) => name.last_atom(),
            Name::Type(name) => name.to_term_name().last_atom(),
        }
    }

    pub fn display(&self, interner: &Interner) -> String {
        match self {
            Name::Term(name) => name.display(interner),
            Name::Type(name) => name.display(interner),
        }
    }
}

impl From<TermName> for Name {
    fn from(name: TermName) -> Self {
        Name::Term(name)
    }
}

impl From<TypeName> for Name {
    fn from(name: TypeName) -> Self {
        Name::Type(name)
    }
}

impl Signature {
    pub fn term_param_count(&self) -> usize {
        self.params
            .iter()
            .filter(|p| matches!(p, ParamSig::Term(_)))
            .count()
    }

    pub fn type_param_count(&self) -> u32 {
        self.params
            .iter()
            .map(|p| match p {
                ParamSig::TypeLen(n) => *n,
                ParamSig::Term(_) => 0,
            })
            .sum()
    }

    pub fn display(&self, interner: &Interner) -> String {
        let mut out = String::new();
        self.write_to(&mut out, interner);
        out
    }

    fn write_to(&self, out: &mut String, interner: &Interner) {
        out.push('(');
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            match param {
                ParamSig::TypeLen(n) => {
                    let _ = write!(out, "{n}");
                }
                ParamSig::Term(erased) => out.push_str(&erased.display(interner)),
            }
        }
        out.push(')');
        out.push_str(&self.result.display(interner));
    }
}

impl ErasedTypeRef {
    pub fn class(class: FullyQualifiedName) -> Self {
        ErasedTypeRef {
            class,
            array_dims: 0,
        }
    }

    pub fn array_of(self) -> Self {
        ErasedTypeRef {
            class: self.class,
            array_dims: self.array_dims.saturating_add(1),
        }
    }

    pub fn display(&self, interner: &Interner) -> String {
        let mut out = self.class.display(interner);
        for _ in 0..self.array_dims {
            out.push_str("[]");
        }
        out
    }
}

impl FullyQualifiedName {
    pub fn new(path: Vec<Name>) -> Self {
        FullyQualifiedName { path }
    }

    pub fn root() -> Self {
        FullyQualifiedName { path: Vec::new() }
    }

    pub fn select(&self, name: Name) -> Self {
        let mut path = self.path.clone();
        path.push(name);
        FullyQualifiedName { path }
    }

    pub fn display(&self, interner: &Interner) -> String {
        let mut out = String::new();
        for (i, name) in self.path.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&name.display(interner));
        }
        out
    }
}

#[cfg(test)]
#[path = "tests/names_tests.rs"]
mod tests;
