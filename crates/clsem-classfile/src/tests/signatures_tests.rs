use super::*;

fn field(raw: &str, grammar: Grammar) -> Result<SigType, SyntaxError> {
    SigCursor::new(raw, grammar).parse_field()
}

fn class_ref(name: &str) -> SigType {
    SigType::Class(ClassTypeSig {
        binary_name: name.to_owned(),
        args: Vec::new(),
        position: 0,
    })
}

#[test]
fn descriptor_base_and_array_types() {
    assert_eq!(
        field("I", Grammar::Descriptor),
        Ok(SigType::Base(BaseType::Int))
    );
    assert_eq!(
        field("[[J", Grammar::Descriptor),
        Ok(SigType::Array(Box::new(SigType::Array(Box::new(
            SigType::Base(BaseType::Long)
        )))))
    );
    assert_eq!(
        field("Ljava/lang/String;", Grammar::Descriptor),
        Ok(class_ref("java/lang/String"))
    );
}

#[test]
fn method_descriptor() {
    let sig = SigCursor::new("(I[Ljava/lang/String;)V", Grammar::Descriptor)
        .parse_method()
        .unwrap();
    assert!(sig.type_params.is_empty());
    assert_eq!(sig.params.len(), 2);
    assert_eq!(sig.params[0], SigType::Base(BaseType::Int));
    assert_eq!(sig.result, SigType::Base(BaseType::Void));
}

#[test]
fn descriptor_errors_carry_positions() {
    assert_eq!(
        field("Q", Grammar::Descriptor),
        Err(SyntaxError {
            position: 0,
            kind: DecodeErrorKind::UnknownCode('Q')
        })
    );
    assert_eq!(
        field("II", Grammar::Descriptor),
        Err(SyntaxError {
            position: 1,
            kind: DecodeErrorKind::TrailingInput
        })
    );
    assert_eq!(
        field("Ljava/lang/String", Grammar::Descriptor),
        Err(SyntaxError {
            position: 17,
            kind: DecodeErrorKind::UnexpectedEnd
        })
    );
    assert_eq!(
        field("V", Grammar::Descriptor).map_err(|e| e.kind),
        Err(DecodeErrorKind::UnknownCode('V'))
    );
    // Type variables belong to the signature grammar only.
    assert_eq!(
        field("TT;", Grammar::Descriptor).map_err(|e| e.kind),
        Err(DecodeErrorKind::UnknownCode('T'))
    );
    assert_eq!(
        SigCursor::new("(I", Grammar::Descriptor)
            .parse_method()
            .map_err(|e| e.kind),
        Err(DecodeErrorKind::UnexpectedEnd)
    );
}

#[test]
fn signature_type_arguments_and_wildcards() {
    let tp = field(
        "Ljava/util/Map<TK;+Ljava/lang/Number;>;",
        Grammar::Signature,
    )
    .unwrap();
    let SigType::Class(class) = tp else {
        panic!("expected a class type");
    };
    assert_eq!(class.binary_name, "java/util/Map");
    assert_eq!(class.args.len(), 2);
    assert!(matches!(&class.args[0], TypeArg::Exact(SigType::TypeVar { name, .. }) if name == "K"));
    assert!(matches!(
        &class.args[1],
        TypeArg::Extends(SigType::Class(c)) if c.binary_name == "java/lang/Number"
    ));

    let star = field("Ljava/util/List<*>;", Grammar::Signature).unwrap();
    assert!(matches!(star, SigType::Class(c) if c.args == vec![TypeArg::Star]));
}

#[test]
fn inner_class_suffix_joins_with_dollar() {
    let tp = field("Lp/Outer<TT;>.Inner<TU;>;", Grammar::Signature).unwrap();
    let SigType::Class(class) = tp else {
        panic!("expected a class type");
    };
    assert_eq!(class.binary_name, "p/Outer$Inner");
    assert!(matches!(
        &class.args[..],
        [TypeArg::Exact(SigType::TypeVar { name, .. })] if name == "U"
    ));
}

#[test]
fn class_signature_with_bounds() {
    let sig = SigCursor::new(
        concat!(
            "<T::Ljava/lang/Comparable<TT;>;U:Ljava/lang/Object;>",
            "Ljava/lang/Object;Ljava/lang/Iterable<TT;>;"
        ),
        Grammar::Signature,
    )
    .parse_class()
    .unwrap();
    assert_eq!(sig.type_params.len(), 2);
    assert_eq!(sig.type_params[0].name, "T");
    assert_eq!(sig.type_params[0].bounds.len(), 1);
    assert_eq!(sig.type_params[1].name, "U");
    assert_eq!(sig.superclass.binary_name, "java/lang/Object");
    assert_eq!(sig.interfaces.len(), 1);
    assert_eq!(sig.interfaces[0].binary_name, "java/lang/Iterable");
}

#[test]
fn generic_method_signature_with_throws() {
    let sig = SigCursor::new(
        "<X:Ljava/lang/Exception;>(TX;)TX;^TX;^Ljava/io/IOException;",
        Grammar::Signature,
    )
    .parse_method()
    .unwrap();
    assert_eq!(sig.type_params.len(), 1);
    assert_eq!(sig.params.len(), 1);
    assert!(matches!(sig.result, SigType::TypeVar { ref name, .. } if name == "X"));
    assert_eq!(sig.throws.len(), 2);
}

#[test]
fn empty_type_argument_list_is_rejected() {
    assert_eq!(
        field("Ljava/util/List<>;", Grammar::Signature).map_err(|e| e.kind),
        Err(DecodeErrorKind::UnknownCode('>'))
    );
}

#[test]
fn array_dimensions_are_limited() {
    let ok = format!("{}I", "[".repeat(255));
    assert!(field(&ok, Grammar::Descriptor).is_ok());
    let too_many = format!("{}I", "[".repeat(256));
    assert_eq!(
        field(&too_many, Grammar::Descriptor),
        Err(SyntaxError {
            position: 0,
            kind: DecodeErrorKind::TooManyDimensions
        })
    );
}

#[test]
fn deeply_nested_arguments_fail_instead_of_overflowing() {
    let depth = 1000;
    let raw = format!(
        "{}Ljava/lang/Object;{}",
        "Ljava/util/List<".repeat(depth),
        ">;".repeat(depth)
    );
    assert_eq!(
        field(&raw, Grammar::Signature).map_err(|e| e.kind),
        Err(DecodeErrorKind::NestingTooDeep)
    );
}
