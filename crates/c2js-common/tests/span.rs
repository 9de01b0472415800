use super::*;

#[test]
fn merge_covers_both_spans() {
    let a = Span::new(4, 10);
    let b = Span::new(2, 6);
    assert_eq!(a.merge(b), Span::new(2, 10));
}

#[test]
fn dummy_is_distinguishable() {
    assert!(Span::dummy().is_dummy());
    assert!(!Span::new(0, 0).is_dummy());
}

#[test]
fn line_map_resolves_plain_offsets() {
    let src = "int a;\nint b;\n";
    let map = LineMap::build(src, Vec::new());
    let file = Atom::from_raw(0);
    let loc = map.resolve(7, file);
    assert_eq!(loc.line, 2);
    assert_eq!(loc.column, 1);
}

#[test]
fn line_map_honors_markers() {
    let src = "a\nb\nc\n";
    let file_main = Atom::from_raw(0);
    let file_header = Atom::from_raw(1);
    let markers = vec![LineMarker {
        at_offset: 2,
        line: 100,
        file: file_header,
    }];
    let map = LineMap::build(src, markers);
    let before = map.resolve(0, file_main);
    assert_eq!(before.file, file_main);
    assert_eq!(before.line, 1);

    let after = map.resolve(2, file_main);
    assert_eq!(after.file, file_header);
    assert_eq!(after.line, 100);
}
