use super::*;

fn object_sig(interner: &Interner) -> Signature {
    let java = Name::term(interner.intern("java"));
    let lang = Name::term(interner.intern("lang"));
    let object = Name::type_(interner.intern("Object"));
    let fqn = FullyQualifiedName::new(vec![java, lang, object]);
    Signature {
        params: vec![ParamSig::Term(ErasedTypeRef::class(fqn.clone()))],
        result: ErasedTypeRef::class(fqn),
    }
}

#[test]
fn test_term_and_type_namespaces_are_distinct() {
    let interner = Interner::new();
    let foo = interner.intern("Foo");
    assert_ne!(Name::term(foo), Name::type_(foo));
    assert_eq!(Name::term(foo), Name::term(foo));
}

#[test]
fn test_signed_name_shares_decl_key_with_unsigned() {
    let interner = Interner::new();
    let foo = TermName::from_str(&interner, "foo");
    let signed = foo.clone().signed(object_sig(&interner));

    assert_ne!(Name::Term(signed.clone()), Name::Term(foo.clone()));
    assert_eq!(Name::Term(signed.clone()).decl_key(), Name::Term(foo.clone()));
    assert_eq!(signed.unsigned(), &foo);
    assert!(signed.signature().is_some());
    assert!(foo.signature().is_none());
}

#[test]
fn test_qualified_display() {
    let interner = Interner::new();
    let java = TermName::from_str(&interner, "java");
    let qualified = java.select(interner.intern("lang"));
    assert_eq!(qualified.display(&interner), "java.lang");
    assert_eq!(qualified.last_atom(), interner.intern("lang"));
}

#[test]
fn test_object_class_display() {
    let interner = Interner::new();
    let name = TypeName::object_class(interner.intern("Predef"));
    assert!(name.is_object_class());
    assert_eq!(name.display(&interner), "Predef$");
}

#[test]
fn test_signature_counts_and_display() {
    let interner = Interner::new();
    let mut sig = object_sig(&interner);
    sig.params.insert(0, ParamSig::TypeLen(2));

    assert_eq!(sig.term_param_count(), 1);
    assert_eq!(sig.type_param_count(), 2);
    assert_eq!(
        sig.display(&interner),
        "(2,java.lang.Object)java.lang.Object"
    );
}

#[test]
fn test_erased_array_display() {
    let interner = Interner::new();
    let int = FullyQualifiedName::new(vec![
        Name::term(interner.intern("scala")),
        Name::type_(interner.intern("Int")),
    ]);
    let erased = ErasedTypeRef::class(int).array_of().array_of();
    assert_eq!(erased.array_dims, 2);
    assert_eq!(erased.display(&interner), "scala.Int[][]");
}
