use super::*;

fn parser_for(src: &str) -> (Parser, CompilerSession) {
    let mut session = CompilerSession::new();
    let file = session.intern("test.c");
    let parser = Parser::new(&mut session, src, file);
    (parser, session)
}

#[test]
fn decl_specifiers_resolve_unsigned_long_long() {
    let (mut parser, mut session) = parser_for("unsigned long long x;");
    let spec = parser.parse_decl_specifiers(&mut session);
    assert!(matches!(parser.types.get(spec.ty).kind, TypeKind::LongLong));
    assert!(!parser.types.get(spec.ty).signed);
}

#[test]
fn struct_bitfields_pack_into_a_shared_storage_unit() {
    let src = "struct S { unsigned a : 3; unsigned b : 5; };";
    let (mut parser, mut session) = parser_for(src);
    let ty = parser.parse_struct_or_union(&mut session, false);
    match &parser.types.get(ty).kind {
        TypeKind::Struct(agg) => {
            assert_eq!(agg.members.len(), 2);
            assert_eq!(agg.members[0].bit_offset, 0);
            assert_eq!(agg.members[1].bit_offset, 3);
            assert_eq!(agg.members[0].offset, agg.members[1].offset, "both bitfields share one storage unit");
        }
        other => panic!("expected a struct type, got {other:?}"),
    }
}

#[test]
fn enum_constants_auto_increment_from_the_last_explicit_value() {
    let src = "enum Color { RED, GREEN, BLUE = 5, PURPLE };";
    let (mut parser, mut session) = parser_for(src);
    parser.parse_enum(&mut session);
    let values: Vec<i64> = ["RED", "GREEN", "BLUE", "PURPLE"]
        .iter()
        .map(|name| {
            let atom = session.intern(name);
            let id = parser.symtab.lookup(atom).expect("enumerator was declared");
            parser.symtab.get(id).enum_value.expect("an enumerator always has a value")
        })
        .collect();
    assert_eq!(values, vec![0, 1, 5, 6]);
}

#[test]
fn redeclaring_a_tag_in_the_same_scope_reuses_the_incomplete_type() {
    let src = "struct Point;";
    let (mut parser, mut session) = parser_for(src);
    let forward = parser.parse_struct_or_union(&mut session, false);
    assert!(!parser.types.get(forward).is_complete());

    let (mut parser2, mut session2) = parser_for("struct Point { int x; int y; };");
    let complete = parser2.parse_struct_or_union(&mut session2, false);
    assert!(parser2.types.get(complete).is_complete());
}
