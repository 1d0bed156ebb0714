//! Loading several class files through a `Session`.

#[path = "../crates/clsem-classfile/tests/common/mod.rs"]
mod common;

use clsem::binder::Flags;
use clsem::classfile::{DecodeErrorKind, PickleError};
use clsem::{ClsemConfig, Context, LoadError, LoadedKind, PickleDecoder, Session, SymbolId};
use common::{ACC_PUBLIC, ACC_STATIC, Attr, ClassFileBuilder, encode_scala_signature};

fn greeter() -> Vec<u8> {
    ClassFileBuilder::new("app/Greeter")
        .default_constructor()
        .method(ACC_PUBLIC, "greet", "(Ljava/lang/String;)Ljava/lang/String;")
        .method(ACC_PUBLIC, "toString", "()Ljava/lang/String;")
        .method(ACC_PUBLIC | ACC_STATIC, "create", "()Lapp/Greeter;")
        .build()
}

fn holder() -> Vec<u8> {
    ClassFileBuilder::new("app/Holder")
        .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
        .default_constructor()
        .build()
}

fn new_session(stop_on_error: bool) -> Session {
    Session::new(ClsemConfig {
        stop_on_error,
        ..ClsemConfig::default()
    })
    .unwrap()
}

#[test]
fn failures_do_not_affect_sibling_classes() {
    let mut session = new_session(false);
    let report = session.load_all([
        ("Greeter.class", greeter()),
        ("broken.class", vec![0xCA, 0xFE]),
        ("Holder.class", holder()),
    ]);

    assert_eq!(report.classes.len(), 3);
    assert_eq!(report.loaded().count(), 2);
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "broken.class");
    assert!(matches!(failures[0].1, LoadError::Structure(_)));
    assert!(!report.is_success());

    let ctx = session.context();
    assert!(ctx.find_class("app.Greeter").is_some());
    assert!(ctx.find_class("app.Holder").is_some());
}

#[test]
fn stop_on_error_skips_the_remaining_artifacts() {
    let mut session = new_session(true);
    let report = session.load_all([
        ("broken.class", vec![0u8; 3]),
        ("Greeter.class", greeter()),
        ("Holder.class", holder()),
    ]);
    assert_eq!(report.classes.len(), 1);
    assert_eq!(report.skipped, 2);
    assert!(session.context().find_class("app.Greeter").is_none());
}

#[test]
fn loading_the_same_class_twice_is_reported() {
    let mut session = new_session(false);
    let report = session.load_all([("a/Greeter.class", greeter()), ("b/Greeter.class", greeter())]);
    assert!(report.classes[0].outcome.is_ok());
    assert!(matches!(
        report.classes[1].outcome,
        Err(LoadError::AlreadyLoaded(_))
    ));
}

#[test]
fn summaries_name_the_kind_and_class() {
    let mut session = new_session(false);
    let report = session.load_all([("Greeter.class", greeter()), ("empty.class", Vec::new())]);
    let ok = session.summary(&report.classes[0]);
    assert!(ok.starts_with("Greeter.class: java app.Greeter ("), "{ok}");
    let err = session.summary(&report.classes[1]);
    assert!(err.starts_with("empty.class: error: "), "{err}");
}

#[test]
fn linearization_and_members_are_rendered() {
    let mut session = new_session(false);
    let loaded = session.load(&greeter()).unwrap();
    let class = loaded.class.unwrap();

    assert_eq!(
        session.linearization_line(class).unwrap(),
        "app.Greeter, java.lang.Object, scala.Matchable, scala.Any"
    );

    let lines = session.member_lines(class).unwrap();
    assert!(
        lines.contains(&"term greet(java.lang.String)java.lang.String".to_owned()),
        "{lines:?}"
    );
    assert!(
        lines.contains(&"term toString()java.lang.String overrides scala.Any".to_owned()),
        "{lines:?}"
    );
    // Statics live on the module class, not the class.
    assert!(!lines.iter().any(|line| line.contains("create")));
    let module_lines = session.member_lines(loaded.module_class.unwrap()).unwrap();
    assert!(module_lines.iter().any(|line| line.starts_with("term create(")));
}

#[test]
fn descriptions_report_errors_and_keep_going() {
    let mut session = new_session(false);
    let orphan = ClassFileBuilder::new("app/Orphan")
        .extends(Some("missing/Base"))
        .method(ACC_PUBLIC, "run", "()V")
        .build();
    let report = session.load_all([("Orphan.class", orphan), ("Greeter.class", greeter())]);
    assert!(report.is_success());

    let orphan = session.describe(&report.classes[0], true, true);
    assert_eq!(orphan.errors, 2, "{:?}", orphan.lines);
    assert!(orphan.lines[0].starts_with("Orphan.class: java app.Orphan"));
    assert!(orphan.lines.iter().any(|line| line.starts_with("  lin: error: ")));
    assert!(orphan.lines.iter().any(|line| line.starts_with("  members: error: ")));

    let greeter = session.describe(&report.classes[1], true, true);
    assert_eq!(greeter.errors, 0);
    assert!(greeter.lines.contains(
        &"  lin: app.Greeter, java.lang.Object, scala.Matchable, scala.Any".to_owned()
    ));
    assert!(greeter.lines.iter().any(|line| line.starts_with("  static term create(")));
}

#[test]
fn enclosing_classes_in_the_batch_load_first() {
    let outer = ClassFileBuilder::new("app/Outer")
        .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")
        .build();
    let node = ClassFileBuilder::new("app/Outer$Node")
        .method_with(
            ACC_PUBLIC,
            "element",
            "()Ljava/lang/Object;",
            vec![Attr::Signature("()TE;".to_owned())],
        )
        .build();

    let mut session = new_session(true);
    let report = session.load_all([
        ("Outer$Node.class", node.clone()),
        ("Greeter.class", greeter()),
        ("Outer.class", outer),
    ]);
    assert!(report.is_success(), "{:?}", report.failures().collect::<Vec<_>>());
    let sources: Vec<&str> = report.classes.iter().map(|c| c.source.as_str()).collect();
    assert_eq!(sources, ["Outer.class", "Outer$Node.class", "Greeter.class"]);

    // Without its enclosing class, `E` is not in scope.
    let err = new_session(false).load(&node).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Decode(ref e) if e.kind == DecodeErrorKind::UnknownTypeVariable("E".to_owned())
    ));
}

/// Enters an empty class for every payload it sees, or rejects all of them.
struct StubDecoder {
    reject: bool,
}

impl PickleDecoder for StubDecoder {
    fn decode(
        &mut self,
        ctx: &mut Context,
        owner: SymbolId,
        class_name: &str,
        _payload: &[u8],
    ) -> Result<Vec<SymbolId>, PickleError> {
        if self.reject {
            return Err(PickleError::Malformed("bad header".to_owned()));
        }
        let object = ctx.defn.object_type;
        let class = ctx.enter().class(owner, class_name, Flags::empty(), vec![object])?;
        Ok(vec![class])
    }
}

fn scala_service() -> Vec<u8> {
    ClassFileBuilder::new("s/Service")
        .attribute(Attr::marker("ScalaSig"))
        .attribute(Attr::ScalaSignature(encode_scala_signature(&[1, 2, 3])))
        .build()
}

#[test]
fn pickled_classes_need_a_decoder() {
    let mut session = new_session(false);
    let err = session.load(&scala_service()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Pickle {
            source: PickleError::NoDecoder,
            ..
        }
    ));
}

#[test]
fn configured_decoder_receives_pickles() {
    let mut session =
        new_session(false).with_pickle_decoder(Box::new(StubDecoder { reject: false }));
    let loaded = session.load(&scala_service()).unwrap();
    assert_eq!(loaded.kind, LoadedKind::ScalaPickle);
    assert_eq!(session.context().find_class("s.Service"), loaded.class);

    let mut rejecting =
        new_session(false).with_pickle_decoder(Box::new(StubDecoder { reject: true }));
    let err = rejecting.load(&scala_service()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Pickle {
            source: PickleError::Malformed(_),
            ..
        }
    ));
    assert!(rejecting.context().find_class("s.Service").is_none());
}
