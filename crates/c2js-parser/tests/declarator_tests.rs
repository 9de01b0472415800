use c2js_types::TypeKind;

use super::*;

#[test]
fn array_of_pointers_vs_pointer_to_array() {
    let mut reg = TypeRegistry::new();
    let int = reg.int(true);

    // `int *a[3]`: pointers wrap the base first, then the array suffix
    // wraps that — an array of 3 pointers to int.
    let array_of_pointers = Declarator {
        pointers: vec![Qualifiers::empty()],
        direct: DirectDeclarator {
            core: DeclaratorCore::Name(None, Span::dummy()),
            suffixes: vec![DeclaratorSuffix::Array { size: Some(3), vla_size: None }],
        },
    };
    let (ty, _, _) = resolve(&mut reg, int, &array_of_pointers);
    match &reg.get(ty).kind {
        TypeKind::Array(arr) => {
            assert_eq!(arr.count, 3);
            assert!(matches!(reg.get(arr.element).kind, TypeKind::Ptr(_)));
        }
        other => panic!("expected an array type, got {other:?}"),
    }

    // `int (*a)[3]`: the grouped declarator's own suffix applies to the
    // base *before* the inner pointer, then the inner pointer wraps that —
    // a pointer to an array of 3 ints.
    let pointer_to_array = Declarator {
        pointers: vec![],
        direct: DirectDeclarator {
            core: DeclaratorCore::Grouped(Box::new(Declarator {
                pointers: vec![Qualifiers::empty()],
                direct: DirectDeclarator {
                    core: DeclaratorCore::Name(None, Span::dummy()),
                    suffixes: vec![],
                },
            })),
            suffixes: vec![DeclaratorSuffix::Array { size: Some(3), vla_size: None }],
        },
    };
    let (ty, _, _) = resolve(&mut reg, int, &pointer_to_array);
    match &reg.get(ty).kind {
        TypeKind::Ptr(inner) => match &reg.get(*inner).kind {
            TypeKind::Array(arr) => assert_eq!(arr.count, 3),
            other => panic!("expected the pointee to be an array, got {other:?}"),
        },
        other => panic!("expected a pointer type, got {other:?}"),
    }
}

#[test]
fn outermost_params_finds_the_function_suffix_through_grouping() {
    let declarator = Declarator {
        pointers: vec![Qualifiers::empty()],
        direct: DirectDeclarator {
            core: DeclaratorCore::Grouped(Box::new(Declarator {
                pointers: vec![],
                direct: DirectDeclarator {
                    core: DeclaratorCore::Name(None, Span::dummy()),
                    suffixes: vec![],
                },
            })),
            suffixes: vec![DeclaratorSuffix::Function { params: vec![], variadic: false, old_style_kr: false }],
        },
    };
    // `int (*f)(void)`: a pointer to a function, not a function itself —
    // but the outermost suffix is still the function suffix.
    assert!(outermost_params(&declarator).is_some());
}
