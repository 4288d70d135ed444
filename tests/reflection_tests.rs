// tests/reflection_tests.rs
//! Integration tests for reflecting complete source files
//!
//! These tests load the fixtures under `test_scripts/` and check the
//! descriptors a session builds for them, including cross-class binding.

mod test_harness;

use static_reflection::prelude::*;
use static_reflection::{MethodOrigin, ParseErrorKind};
use test_harness::{TestHarness, method_names};

#[test]
fn test_class_hierarchy() {
    let harness = TestHarness::new();
    let parsed = harness.load_ok("shapes.php");

    let names: Vec<_> = parsed.classes().iter().map(|c| c.name()).collect();
    assert_eq!(names, ["Geometry\\Shape", "Geometry\\Polygon", "Geometry\\Square"]);

    let square = harness.class("geometry\\square");
    assert!(square.is_final());
    assert!(square.is_instantiable());
    assert_eq!(square.short_name(), "Square");
    assert_eq!(square.namespace_name(), "Geometry");
    assert_eq!((square.start_line(), square.end_line()), (41, 67));
    assert!(square.is_subclass_of("Geometry\\Polygon"));
    assert!(square.implements_interface("Geometry\\Shape"));
    assert!(!square.is_subclass_of("Geometry\\Square"));
    assert_eq!(square.parent_class().name(), "Geometry\\Polygon");
}

#[test]
fn test_unavailable_types_are_null() {
    let harness = TestHarness::new();
    harness.load_ok("shapes.php");

    let shape = harness.class("Geometry\\Shape");
    assert!(shape.is_interface());
    assert_eq!(
        shape.interface_names(),
        ["Geometry\\Support\\Measurable", "Geometry\\Support\\Named"]
    );
    let interfaces = shape.interfaces();
    assert!(interfaces.iter().all(|i| i.is_null()));
    assert!(!interfaces[0].has_method("anything"));
    assert!(interfaces[0].methods().is_empty());

    let parent = shape.parent_class();
    assert!(parent.is_null());
    assert!(parent.methods().is_empty());

    let polygon = harness.class("Geometry\\Polygon");
    assert!(polygon.implements_interface("Geometry\\Support\\Printable"));
}

#[test]
fn test_inherited_members() {
    let harness = TestHarness::new();
    harness.load_ok("shapes.php");
    let square = harness.class("Geometry\\Square");

    assert_eq!(
        method_names(&square),
        ["__construct", "area", "name", "perimeter", "unit"]
    );
    assert_eq!(square.method_origin("unit"), Some(MethodOrigin::Introduced));
    assert_eq!(square.method_origin("perimeter"), Some(MethodOrigin::Overridden));
    assert_eq!(square.method_origin("name"), Some(MethodOrigin::Inherited));

    let name = square.method("NAME").unwrap();
    assert!(name.is_inherited(&square));
    assert!(!name.is_overridden(&square));
    assert!(!name.is_introduced(&square));
    assert_eq!(name.declaring_class().name(), "Geometry\\Polygon");

    assert!(square.has_property("points"));
    assert!(square.has_property("side"));
    assert_eq!(square.constant("SIDES").map(|c| c.value), Some("4".to_string()));
}

#[test]
fn test_member_details() {
    let harness = TestHarness::new();
    harness.load_ok("shapes.php");

    let shape = harness.class("Geometry\\Shape");
    let area = shape.method("area").unwrap();
    assert!(area.is_abstract());
    assert_eq!(area.return_type(), Some(&TypeHint::Builtin("float".into())));
    assert_eq!(shape.doc_block().map(|d| d.summary.as_str()), Some("Anything with an area."));

    let polygon = harness.class("Geometry\\Polygon");
    assert!(polygon.is_abstract());
    assert!(!polygon.is_instantiable());
    let points = polygon.own_property("points").unwrap();
    assert_eq!(points.type_hint(), Some(&TypeHint::Array));
    assert_eq!(points.default_value(), Some("[]"));
    let count = polygon.own_property("count").unwrap();
    assert!(count.is_static() && count.is_protected());

    let ctor = polygon.own_method("__construct").unwrap();
    assert!(ctor.is_constructor());
    assert!(ctor.parameters()[0].is_array());
    assert!(ctor.parameters()[0].is_optional());

    let square = harness.class("Geometry\\Square");
    let unit = square.method("unit").unwrap();
    assert!(unit.is_static());
    assert_eq!(unit.return_type().and_then(TypeHint::class_name), Some("Geometry\\Square"));
    assert_eq!((unit.start_line(), unit.end_line()), (63, 66));
}

#[test]
fn test_legacy_source() {
    let harness = TestHarness::new();
    harness.load_ok("legacy.php");
    let record = harness.class("Legacy_Record");

    assert_eq!((record.start_line(), record.end_line()), (7, 28));
    assert!(record.doc_comment().is_some_and(|doc| doc.contains("Old-style record.")));

    let ctor = record.method("legacy_record").unwrap();
    assert!(ctor.is_constructor());
    assert_eq!(ctor.number_of_required_parameters(), 0);
    assert!(record.is_instantiable());

    let fields = record.own_property("fields").unwrap();
    assert!(fields.is_public());
    assert_eq!(fields.default_value(), Some("array('id' => null)"));
    assert!(record.method("fields").unwrap().returns_reference());

    let render = record.method("render").unwrap();
    assert_eq!((render.start_line(), render.end_line()), (22, 27));
}

#[test]
fn test_modern_syntax() {
    let harness = TestHarness::new();
    let parsed = harness.load_ok("modern.php");
    assert_eq!(parsed.classes().len(), 1);

    let controller = harness.class("App\\Http\\Controller");
    assert!(controller.is_final());
    assert_eq!(controller.interface_names(), ["App\\Contracts\\Handler"]);
    assert!(harness.session.get_class("NotReflected").is_null());

    let version = controller.constant("VERSION").unwrap();
    assert_eq!(version.value, "'2.0'");
    assert_eq!(version.type_hint, Some(TypeHint::Builtin("string".into())));

    let logger = controller.own_property("logger").unwrap();
    assert!(logger.is_private() && logger.is_readonly());
    assert_eq!(
        logger.type_hint().and_then(TypeHint::class_name),
        Some("Psr\\Log\\LoggerInterface")
    );
    assert!(controller.own_property("request").unwrap().is_protected());
    assert!(controller.own_property("secret").is_some());

    let ctor = controller.method("__construct").unwrap();
    assert_eq!(ctor.number_of_parameters(), 3);
    assert_eq!(ctor.number_of_required_parameters(), 1);

    let show = controller.method("show").unwrap();
    let params = show.parameters();
    assert_eq!(params[0].type_hint().map(ToString::to_string).as_deref(), Some("int|string"));
    assert_eq!(
        params[1].type_hint().map(ToString::to_string).as_deref(),
        Some("App\\Http\\Request&App\\Http\\Cacheable")
    );
    assert!(params[2].is_variadic());
    assert!(params[2].allows_null());
    assert_eq!(
        show.return_type().map(ToString::to_string).as_deref(),
        Some("?App\\Http\\Response")
    );

    assert_eq!(controller.method("list").unwrap().return_type(), Some(&TypeHint::Static));
}

#[test]
fn test_braced_namespaces() {
    let harness = TestHarness::new();
    harness.load_ok("namespaces.php");

    let global = harness.class("GlobalThing");
    assert_eq!(global.namespace_name(), "");
    assert_eq!(global.parent_name(), Some("Vendor\\App\\App"));
    assert!(global.is_subclass_of("Vendor\\Core\\Kernel"));
    assert_eq!(harness.class("Vendor\\App\\App").parent_name(), Some("Vendor\\Core\\Kernel"));
}

#[test]
fn test_embedded_text_inside_method() {
    let harness = TestHarness::new();
    harness.load_ok("embedded.php");
    let class = harness.class("c");
    let x = class.method("x").unwrap();
    assert_eq!(x.parameters()[0].class_name(), Some("c"));
}

#[test]
fn test_unbalanced_file_fails() {
    let harness = TestHarness::new();
    let error = harness.load_err("unbalanced.php");
    let errors = error.parse_errors().unwrap();
    assert!(errors.contains_kind(ParseErrorKind::LexerError));
    assert!(harness.session.get_class("Broken").is_null());
}

#[test]
fn test_fixture_parsed_once() {
    let harness = TestHarness::new();
    let first = harness.load_ok("shapes.php");
    let second = harness.load_ok("shapes.php");
    assert!(std::sync::Arc::ptr_eq(&first.classes()[2], &second.classes()[2]));
    assert_eq!(harness.session.stats().files_parsed, 1);
    assert_eq!(harness.session.stats().cache_hits, 1);
}
