use super::*;

#[path = "../../tests/common/mod.rs"]
mod common;

use common::{ACC_PUBLIC, ACC_SYNTHETIC, Attr, ClassFileBuilder, encode_scala_signature};

fn kind_of(builder: ClassFileBuilder, options: &LoaderOptions) -> Result<ClassKind, LoadError> {
    let bytes = builder.build();
    let structure = ClassStructure::scan(&bytes).unwrap();
    classify(&structure, options)
}

fn kind(builder: ClassFileBuilder) -> Result<ClassKind, LoadError> {
    kind_of(builder, &LoaderOptions::default())
}

#[test]
fn plain_classes_are_java() {
    assert_eq!(
        kind(ClassFileBuilder::new("p/A")),
        Ok(ClassKind::Java { signature: None })
    );
    assert_eq!(
        kind(ClassFileBuilder::new("p/A").signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")),
        Ok(ClassKind::Java {
            signature: Some("<T:Ljava/lang/Object;>Ljava/lang/Object;".to_owned())
        })
    );
}

#[test]
fn scala_signature_carries_the_payload() {
    let payload = vec![5, 0, 1, 0x7F, 0x80, 0xFF];
    let builder = ClassFileBuilder::new("p/S")
        .attribute(Attr::marker("ScalaSig"))
        .attribute(Attr::ScalaSignature(encode_scala_signature(&payload)));
    let Ok(ClassKind::ScalaPickle { payload: decoded }) = kind(builder) else {
        panic!("expected a Scala pickle");
    };
    assert_eq!(&decoded[..payload.len()], &payload[..]);
}

#[test]
fn long_signatures_are_concatenated() {
    let payload: Vec<u8> = (0..=255).collect();
    let encoded = encode_scala_signature(&payload);
    let (head, tail) = encoded.split_at(encoded.len() / 2);
    let builder = ClassFileBuilder::new("p/S")
        .attribute(Attr::ScalaLongSignature(vec![head.to_owned(), tail.to_owned()]))
        .attribute(Attr::marker("ScalaSig"));
    let Ok(ClassKind::ScalaPickle { payload: decoded }) = kind(builder) else {
        panic!("expected a Scala pickle");
    };
    assert_eq!(&decoded[..payload.len()], &payload[..]);
}

#[test]
fn pickle_marker_without_payload_is_malformed() {
    let builder = ClassFileBuilder::new("p/Broken").attribute(Attr::marker("ScalaSig"));
    assert_eq!(
        kind(builder),
        Err(LoadError::MalformedArtifact {
            class: "p.Broken".to_owned(),
            reason: "declares pickle but has no payload".to_owned(),
        })
    );
}

#[test]
fn native_pickle_marker_wins_over_signature() {
    let builder = ClassFileBuilder::new("p/T")
        .signature("Ljava/lang/Object;")
        .attribute(Attr::marker("TASTY"));
    assert_eq!(kind(builder), Ok(ClassKind::PickleNative));
}

#[test]
fn native_pickle_with_scala_payload_is_malformed() {
    let builder = ClassFileBuilder::new("p/T")
        .attribute(Attr::marker("TASTY"))
        .attribute(Attr::ScalaSignature(encode_scala_signature(&[1, 2, 3])));
    assert!(matches!(
        kind(builder),
        Err(LoadError::MalformedArtifact { .. })
    ));
}

#[test]
fn scala_attribute_alone_is_an_artifact() {
    let builder = ClassFileBuilder::new("p/S$").attribute(Attr::marker("Scala"));
    assert_eq!(kind(builder), Ok(ClassKind::Artifact));
}

#[test]
fn synthetic_classes_follow_the_option() {
    let builder = || ClassFileBuilder::new("p/Lambda$1").access(ACC_PUBLIC | ACC_SYNTHETIC);
    assert_eq!(kind(builder()), Ok(ClassKind::Artifact));
    let options = LoaderOptions {
        synthetic_classes_are_artifacts: false,
        ..LoaderOptions::default()
    };
    assert_eq!(
        kind_of(builder(), &options),
        Ok(ClassKind::Java { signature: None })
    );
}

#[test]
fn unrelated_annotations_are_skipped() {
    // The payload attribute is preceded by `@Deprecated` with enum, array,
    // int and nested annotation values.
    let builder = ClassFileBuilder::new("p/S")
        .attribute(Attr::ScalaSignature(encode_scala_signature(&[9])))
        .attribute(Attr::marker("ScalaSig"));
    assert!(matches!(kind(builder), Ok(ClassKind::ScalaPickle { .. })));
}
