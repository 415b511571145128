use nxquery_core::memory::{MemoryNode, attr, external_link, field, group, link, root};
use nxquery_core::{
    ContainerNode, Node, NodeError, NodeKind, Path, get_attribute, get_child, get_class, get_name,
    get_object, get_parent, get_path, get_root, is_attribute, is_class, is_field, is_group,
};
use rstest::{fixture, rstest};

fn p(text: &str) -> Path {
    text.parse().unwrap()
}

#[fixture]
fn scan() -> MemoryNode {
    root("scan.nxs")
        .child(
            group("scan_1", "NXentry")
                .child(group("beamline", "NXinstrument"))
                .child(field("date").value("2024-03-11T10:15:00"))
                .child(field("experiment_id"))
                .child(group("data", "NXdata").child(field("x").attr(attr("units", "mm"))))
                .child(group("control", "NXmonitor"))
                .child(link("alias", p("/scan_1/data")))
                .child(link("broken", p("/scan_1/missing")))
                .child(external_link("remote", "other.nxs", p("/entry/data"))),
        )
        .child(field("data"))
        .build()
}

fn entry(file: &MemoryNode) -> Node<MemoryNode> {
    get_child(&Node::new(file.clone()), "scan_1", "").unwrap()
}

fn object(file: &MemoryNode, path: &str) -> Node<MemoryNode> {
    get_object(&Node::new(file.clone()), &p(path)).unwrap()
}

#[rstest]
#[case::by_class("", "NXinstrument", "beamline")]
#[case::by_name("date", "", "date")]
#[case::by_name_and_class("data", "NXdata", "data")]
#[case::first_of_class("", "NXmonitor", "control")]
fn get_child_finds_match(
    scan: MemoryNode,
    #[case] name: &str,
    #[case] class: &str,
    #[case] expected: &str,
) {
    let child = get_child(&entry(&scan), name, class).unwrap();
    assert_eq!(child.name(), expected);
}

#[rstest]
#[case::unknown_name("nonexistent", "")]
#[case::unknown_class("", "NXsample")]
#[case::name_class_mismatch("data", "NXmonitor")]
#[case::dangling_internal_link("broken", "")]
#[case::dangling_external_link("remote", "")]
fn get_child_reports_missing_key(scan: MemoryNode, #[case] name: &str, #[case] class: &str) {
    let err = get_child(&entry(&scan), name, class).unwrap_err();
    assert!(matches!(err, NodeError::Key { ref parent, .. } if parent == "scan_1"), "{err:?}");
}

#[rstest]
fn get_child_requires_a_criterion(scan: MemoryNode) {
    let err = get_child(&entry(&scan), "", "").unwrap_err();
    assert!(matches!(err, NodeError::Value(_)));
}

#[rstest]
#[case::field("/scan_1/date")]
#[case::attribute("/scan_1/data/x@units")]
fn get_child_on_non_group_is_type_error(scan: MemoryNode, #[case] path: &str) {
    let node = object(&scan, path);
    assert!(matches!(get_child(&node, "", ""), Err(NodeError::Type { .. })));
    assert!(matches!(get_child(&node, "x", ""), Err(NodeError::Type { .. })));
}

#[rstest]
fn get_child_follows_links(scan: MemoryNode) {
    let entry = entry(&scan);
    let alias = get_child(&entry, "alias", "").unwrap();
    assert!(is_group(&alias));
    assert_eq!(alias.name(), "alias");
    assert!(is_class(&alias, "NXdata").unwrap());
    assert_eq!(get_parent(&alias).unwrap(), entry);
    assert_eq!(alias.handle().canonical(), *object(&scan, "/scan_1/data").handle());
    assert_eq!(get_child(&alias, "x", "").unwrap(), object(&scan, "/scan_1/data/x"));
}

#[rstest]
fn class_lookup_prefers_real_entry_over_link(scan: MemoryNode) {
    let data = get_child(&entry(&scan), "", "NXdata").unwrap();
    assert_eq!(data.name(), "data");
    assert_eq!(data.handle().link(), None);
}

#[rstest]
fn root_level_field_is_found(scan: MemoryNode) {
    let data = get_child(&Node::new(scan), "data", "").unwrap();
    assert!(is_field(&data));
}

#[rstest]
fn kind_tests_are_exclusive(scan: MemoryNode) {
    for path in ["/scan_1", "/scan_1/date", "/scan_1/data/x@units"] {
        let node = object(&scan, path);
        let hits = [is_group(&node), is_field(&node), is_attribute(&node)];
        assert_eq!(hits.iter().filter(|hit| **hit).count(), 1, "{path}");
    }
}

#[rstest]
#[case::group("/scan_1", "NXentry", true)]
#[case::other_class("/scan_1", "NXdata", false)]
#[case::field_without_class("/scan_1/date", "NXentry", false)]
fn is_class_reads_class_attribute(
    scan: MemoryNode,
    #[case] path: &str,
    #[case] class: &str,
    #[case] expected: bool,
) {
    assert_eq!(is_class(&object(&scan, path), class).unwrap(), expected);
}

#[rstest]
fn class_of_attribute_is_type_error(scan: MemoryNode) {
    let units = object(&scan, "/scan_1/data/x@units");
    assert_eq!(
        is_class(&units, "NXentry").unwrap_err(),
        NodeError::Type { operation: "class lookup", kind: NodeKind::Attribute }
    );
    assert!(get_class(&units).is_err());
}

#[rstest]
fn root_is_its_own_parent(scan: MemoryNode) {
    let file = Node::new(scan);
    assert_eq!(get_parent(&file).unwrap(), file);
    assert_eq!(get_parent(&entry(file.handle())).unwrap(), file);
}

#[rstest]
fn attribute_parent_is_host(scan: MemoryNode) {
    let units = object(&scan, "/scan_1/data/x@units");
    assert_eq!(get_parent(&units).unwrap(), object(&scan, "/scan_1/data/x"));
}

#[rstest]
fn get_root_walks_up(scan: MemoryNode) {
    let x = object(&scan, "/scan_1/data/x");
    assert_eq!(get_root(&x).unwrap(), Node::new(scan));
}

#[rstest]
fn removed_objects_are_invalid(scan: MemoryNode) {
    let control = object(&scan, "/scan_1/control");
    let x = object(&scan, "/scan_1/data/x");
    let units = object(&scan, "/scan_1/data/x@units");

    control.handle().remove();
    x.handle().remove();

    assert!(matches!(get_parent(&control), Err(NodeError::InvalidObject(_))));
    assert!(matches!(get_name(&control), Err(NodeError::InvalidObject(_))));
    assert!(matches!(get_parent(&units), Err(NodeError::InvalidObject(_))));
    assert!(matches!(get_child(&entry(&scan), "control", ""), Err(NodeError::Key { .. })));
}

#[rstest]
fn get_attribute_cases(scan: MemoryNode) {
    let x = object(&scan, "/scan_1/data/x");
    assert_eq!(get_attribute(&x, "units").unwrap().name(), "units");
    assert!(matches!(get_attribute(&x, "long_name"), Err(NodeError::Key { .. })));
    assert!(matches!(get_attribute(&x, ""), Err(NodeError::Value(_))));

    let units = get_attribute(&x, "units").unwrap();
    assert!(matches!(get_attribute(&units, "units"), Err(NodeError::Type { .. })));
}

#[rstest]
#[case::root("/", "scan.nxs:///")]
#[case::group("/scan_1", "scan.nxs:///scan_1:NXentry")]
#[case::field("/scan_1/data/x", "scan.nxs:///scan_1:NXentry/data:NXdata/x")]
#[case::attribute("/scan_1/data/x@units", "scan.nxs:///scan_1:NXentry/data:NXdata/x@units")]
#[case::through_link("/scan_1/alias", "scan.nxs:///scan_1:NXentry/alias:NXdata")]
fn get_path_is_absolute(scan: MemoryNode, #[case] path: &str, #[case] expected: &str) {
    assert_eq!(get_path(&object(&scan, path)).unwrap().to_string(), expected);
}

#[rstest]
fn get_path_resolves_back_to_node(scan: MemoryNode) {
    let paths =
        ["/scan_1/beamline", "/scan_1/data/x", "/scan_1/data/x@units", "/data", "/scan_1/alias"];
    for path in paths {
        let node = object(&scan, path);
        let absolute = get_path(&node).unwrap();
        assert_eq!(get_object(&Node::new(scan.clone()), &absolute).unwrap(), node, "{path}");
    }
}

#[rstest]
#[case::current("/scan_1/data", ".", "data")]
#[case::parent("/scan_1/data", "../beamline", "beamline")]
#[case::class_only("/scan_1", ":NXmonitor", "control")]
#[case::absolute_from_anywhere("/scan_1/data/x", "/scan_1/date", "date")]
#[case::parent_of_root("/", "../scan_1", "scan_1")]
fn get_object_walks_path(
    scan: MemoryNode,
    #[case] start: &str,
    #[case] path: &str,
    #[case] expected: &str,
) {
    let start = object(&scan, start);
    assert_eq!(get_object(&start, &p(path)).unwrap().name(), expected);
}

#[rstest]
fn get_object_checks_file_name(scan: MemoryNode) {
    let file = Node::new(scan);
    assert_eq!(get_object(&file, &p("scan.nxs:///scan_1")).unwrap().name(), "scan_1");
    assert!(matches!(get_object(&file, &p("other.nxs:///scan_1")), Err(NodeError::Value(_))));
}

#[rstest]
fn get_object_propagates_lookup_errors(scan: MemoryNode) {
    let file = Node::new(scan);
    assert!(matches!(get_object(&file, &p("/scan_1/missing")), Err(NodeError::Key { .. })));
    assert!(matches!(get_object(&file, &p("/scan_1/date/x")), Err(NodeError::Type { .. })));
}

#[rstest]
fn path_errors_convert() {
    fn lookup(file: &Node<MemoryNode>, text: &str) -> nxquery_core::Result<Node<MemoryNode>> {
        let path: Path = text.parse()?;
        get_object(file, &path)
    }
    let file = Node::new(root("scan.nxs").build());
    assert!(matches!(lookup(&file, "entry//data"), Err(NodeError::Path(_))));
    assert_eq!(lookup(&file, "/").unwrap().handle().filename(), "scan.nxs");
}
