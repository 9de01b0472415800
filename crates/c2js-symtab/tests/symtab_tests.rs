use crate::symbol::{LabelInfo, StorageClass, SymbolKind};
use crate::SymbolTable;
use c2js_common::interner::Atom;
use c2js_types::TypeRegistry;

fn atom(n: u32) -> Atom {
    Atom::from_raw(n)
}

#[test]
fn declares_and_looks_up_in_same_scope() {
    let mut types = TypeRegistry::new();
    let int = types.int(true);
    let mut table = SymbolTable::new();
    let x = atom(1);
    let id = table.declare(x, SymbolKind::Var, int, StorageClass::None).unwrap();
    assert_eq!(table.lookup(x), Some(id));
}

#[test]
fn redeclaration_in_same_scope_is_rejected() {
    let mut types = TypeRegistry::new();
    let int = types.int(true);
    let mut table = SymbolTable::new();
    let x = atom(1);
    table.declare(x, SymbolKind::Var, int, StorageClass::None).unwrap();
    let err = table.declare(x, SymbolKind::Var, int, StorageClass::None);
    assert!(err.is_err());
}

#[test]
fn inner_scope_shadows_outer() {
    let mut types = TypeRegistry::new();
    let int = types.int(true);
    let mut table = SymbolTable::new();
    let x = atom(1);
    let outer = table.declare(x, SymbolKind::Var, int, StorageClass::None).unwrap();
    table.push_scope(false);
    let inner = table.declare(x, SymbolKind::Var, int, StorageClass::None).unwrap();
    assert_ne!(outer, inner);
    assert_eq!(table.lookup(x), Some(inner));
    table.pop_scope();
    assert_eq!(table.lookup(x), Some(outer));
}

#[test]
#[should_panic(expected = "cannot pop file scope")]
fn cannot_pop_file_scope() {
    let mut table = SymbolTable::new();
    table.pop_scope();
}

#[test]
fn tag_namespace_is_independent_of_identifier_namespace() {
    let mut types = TypeRegistry::new();
    let struct_ty = types.new_struct(Some(atom(1)));
    let int = types.int(true);
    let mut table = SymbolTable::new();
    let name = atom(1); // same Atom used as both a tag and a variable name
    table.declare_tag(name, struct_ty);
    let var = table.declare(name, SymbolKind::Var, int, StorageClass::None).unwrap();
    assert_eq!(table.lookup_tag(name), Some(struct_ty));
    assert_eq!(table.lookup(name), Some(var));
}

#[test]
fn labels_resolve_through_nested_blocks_to_function_scope() {
    let mut table = SymbolTable::new();
    table.push_scope(true); // function scope
    table.push_scope(false); // nested block
    let label = atom(5);
    table
        .declare_label(label, LabelInfo { defined_at: None, referenced: false })
        .unwrap();
    assert!(table.lookup_label(label).is_some());
    table.pop_scope();
    // still visible one level up, inside the same function scope
    assert!(table.lookup_label(label).is_some());
}

#[test]
fn duplicate_label_in_same_function_is_rejected() {
    let mut table = SymbolTable::new();
    table.push_scope(true);
    let label = atom(5);
    table
        .declare_label(label, LabelInfo { defined_at: None, referenced: false })
        .unwrap();
    let err = table.declare_label(label, LabelInfo { defined_at: None, referenced: false });
    assert!(err.is_err());
}
