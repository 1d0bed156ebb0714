//! Well-known packages, classes and members.
//!
//! Every session starts with the universal root chain in place:
//!
//! ```text
//! Any
//! ├── Matchable
//! │   ├── Object          (lin = [Object, Matchable, Any])
//! │   └── Null
//! ├── AnyVal
//! │   └── Unit, Boolean, Char, Byte, Short, Int, Long, Float, Double
//! └── Nothing
//! ```
//!
//! plus `java.lang.String` and `scala.Array[T]`, and the members of `Any`
//! that every class inherits.

use crate::enter::Enter;
use crate::types::Constant;
use clsem_binder::{Flags, SymbolError};
use clsem_common::{Atom, Interner, SymbolId, TypeId};
use tracing::debug;

/// Atoms for names the decoders and queries compare against.
#[derive(Clone, Debug)]
pub struct StdNames {
    pub init: Atom,
    pub clinit: Atom,
    pub to_string: Atom,
    pub equals: Atom,
    pub hash_code: Atom,
    pub array: Atom,
}

impl StdNames {
    fn new(names: &Interner) -> Self {
        StdNames {
            init: names.intern("<init>"),
            clinit: names.intern("<clinit>"),
            to_string: names.intern("toString"),
            equals: names.intern("equals"),
            hash_code: names.intern("hashCode"),
            array: names.intern("Array"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Definitions {
    pub names: StdNames,

    pub root_package: SymbolId,
    pub scala_package: SymbolId,
    pub java_package: SymbolId,
    pub java_lang_package: SymbolId,

    pub any_class: SymbolId,
    pub matchable_class: SymbolId,
    pub object_class: SymbolId,
    pub any_val_class: SymbolId,
    pub nothing_class: SymbolId,
    pub null_class: SymbolId,
    pub string_class: SymbolId,
    pub array_class: SymbolId,

    pub unit_class: SymbolId,
    pub boolean_class: SymbolId,
    pub char_class: SymbolId,
    pub byte_class: SymbolId,
    pub short_class: SymbolId,
    pub int_class: SymbolId,
    pub long_class: SymbolId,
    pub float_class: SymbolId,
    pub double_class: SymbolId,

    pub any_type: TypeId,
    pub matchable_type: TypeId,
    pub object_type: TypeId,
    pub any_val_type: TypeId,
    pub nothing_type: TypeId,
    pub null_type: TypeId,
    pub string_type: TypeId,
    /// The unapplied `Array` constructor.
    pub array_tycon: TypeId,

    pub unit_type: TypeId,
    pub boolean_type: TypeId,
    pub char_type: TypeId,
    pub byte_type: TypeId,
    pub short_type: TypeId,
    pub int_type: TypeId,
    pub long_type: TypeId,
    pub float_type: TypeId,
    pub double_type: TypeId,
}

impl Definitions {
    /// Enter, complete and verify the definitions.
    pub(crate) fn install(enter: &mut Enter<'_>) -> Result<Self, SymbolError> {
        let checkpoint = enter.symbols.checkpoint();
        let names = StdNames::new(enter.names);

        let root_package = enter.symbols.root();
        let scala_package = enter.package_path("scala")?;
        let java_package = enter.package_path("java")?;
        let java_lang_package = enter.package_path("java.lang")?;

        let any_class = enter.class(scala_package, "Any", Flags::ABSTRACT, Vec::new())?;
        let any_type = enter.class_type(any_class);
        let matchable_class =
            enter.class(scala_package, "Matchable", Flags::TRAIT, vec![any_type])?;
        let matchable_type = enter.class_type(matchable_class);
        let object_class = enter.class(
            java_lang_package,
            "Object",
            Flags::JAVA_DEFINED,
            vec![any_type, matchable_type],
        )?;
        let object_type = enter.class_type(object_class);
        let any_val_class = enter.class(
            scala_package,
            "AnyVal",
            Flags::ABSTRACT,
            vec![any_type, matchable_type],
        )?;
        let any_val_type = enter.class_type(any_val_class);
        let nothing_class = enter.class(
            scala_package,
            "Nothing",
            Flags::ABSTRACT | Flags::FINAL,
            vec![any_type],
        )?;
        let null_class = enter.class(
            scala_package,
            "Null",
            Flags::ABSTRACT | Flags::FINAL,
            vec![any_type, matchable_type],
        )?;
        let string_class = enter.class(
            java_lang_package,
            "String",
            Flags::JAVA_DEFINED | Flags::FINAL,
            vec![object_type],
        )?;

        let mut primitive = |name: &str| -> Result<SymbolId, SymbolError> {
            enter.class(
                scala_package,
                name,
                Flags::ABSTRACT | Flags::FINAL,
                vec![any_val_type],
            )
        };
        let unit_class = primitive("Unit")?;
        let boolean_class = primitive("Boolean")?;
        let char_class = primitive("Char")?;
        let byte_class = primitive("Byte")?;
        let short_class = primitive("Short")?;
        let int_class = primitive("Int")?;
        let long_class = primitive("Long")?;
        let float_class = primitive("Float")?;
        let double_class = primitive("Double")?;

        let (array_class, _) = enter.generic_class(
            scala_package,
            "Array",
            Flags::FINAL,
            &["T"],
            |_, _, _| vec![object_type],
        )?;

        let defn = Definitions {
            names,
            root_package,
            scala_package,
            java_package,
            java_lang_package,
            any_class,
            matchable_class,
            object_class,
            any_val_class,
            nothing_class,
            null_class,
            string_class,
            array_class,
            unit_class,
            boolean_class,
            char_class,
            byte_class,
            short_class,
            int_class,
            long_class,
            float_class,
            double_class,
            any_type,
            matchable_type,
            object_type,
            any_val_type,
            nothing_type: enter.class_type(nothing_class),
            null_type: enter.class_type(null_class),
            string_type: enter.class_type(string_class),
            array_tycon: enter.class_type(array_class),
            unit_type: enter.class_type(unit_class),
            boolean_type: enter.class_type(boolean_class),
            char_type: enter.class_type(char_class),
            byte_type: enter.class_type(byte_class),
            short_type: enter.class_type(short_class),
            int_type: enter.class_type(int_class),
            long_type: enter.class_type(long_class),
            float_type: enter.class_type(float_class),
            double_type: enter.class_type(double_class),
        };

        // Members of Any, inherited by every class.
        enter.method(any_class, "toString", Flags::empty(), &[], defn.string_type)?;
        enter.method(
            any_class,
            "equals",
            Flags::empty(),
            &[("that", any_type)],
            defn.boolean_type,
        )?;
        enter.method(any_class, "hashCode", Flags::empty(), &[], defn.int_type)?;
        enter.method(
            object_class,
            "<init>",
            Flags::CONSTRUCTOR | Flags::JAVA_DEFINED,
            &[],
            defn.unit_type,
        )?;

        let created: Vec<SymbolId> = enter.symbols.created_since(checkpoint).collect();
        debug!(symbols = created.len(), "installed definitions");
        enter.symbols.check_completed(created)?;
        Ok(defn)
    }

    /// `Object`, `Matchable`, `Any`: the chain every linearization of a
    /// reference class ends with.
    pub fn root_chain(&self) -> [SymbolId; 3] {
        [self.object_class, self.matchable_class, self.any_class]
    }

    pub fn is_root_class(&self, class: SymbolId) -> bool {
        class == self.any_class || class == self.matchable_class || class == self.object_class
    }

    /// Classes that erase to `java.lang.Object`.
    pub fn erases_to_object(&self, class: SymbolId) -> bool {
        class == self.any_class || class == self.matchable_class || class == self.any_val_class
    }

    pub fn primitive_classes(&self) -> [SymbolId; 9] {
        [
            self.unit_class,
            self.boolean_class,
            self.char_class,
            self.byte_class,
            self.short_class,
            self.int_class,
            self.long_class,
            self.float_class,
            self.double_class,
        ]
    }

    /// The class type a constant widens to.
    pub fn constant_class_type(&self, constant: &Constant) -> TypeId {
        match constant {
            Constant::Unit => self.unit_type,
            Constant::Boolean(_) => self.boolean_type,
            Constant::Char(_) => self.char_type,
            Constant::Byte(_) => self.byte_type,
            Constant::Short(_) => self.short_type,
            Constant::Int(_) => self.int_type,
            Constant::Long(_) => self.long_type,
            Constant::Float(_) => self.float_type,
            Constant::Double(_) => self.double_type,
            Constant::String(_) => self.string_type,
            Constant::Null => self.null_type,
        }
    }
}
