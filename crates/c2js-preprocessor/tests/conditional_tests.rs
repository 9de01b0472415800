use crate::conditional::ConditionalStack;

#[test]
fn simple_if_true_is_active() {
    let mut stack = ConditionalStack::new();
    stack.push_if(true);
    assert!(stack.is_active());
    stack.pop_endif().unwrap();
    assert!(stack.is_active());
}

#[test]
fn if_false_is_inactive() {
    let mut stack = ConditionalStack::new();
    stack.push_if(false);
    assert!(!stack.is_active());
}

#[test]
fn else_flips_when_if_was_false() {
    let mut stack = ConditionalStack::new();
    stack.push_if(false);
    assert!(!stack.is_active());
    stack.handle_else().unwrap();
    assert!(stack.is_active());
}

#[test]
fn elif_after_matching_if_stays_already_matched() {
    let mut stack = ConditionalStack::new();
    stack.push_if(true);
    assert!(stack.is_active());
    stack.handle_elif(true).unwrap();
    assert!(!stack.is_active(), "first branch already matched, elif is dormant");
    stack.handle_else().unwrap();
    assert!(!stack.is_active(), "else after a matched branch stays off");
}

#[test]
fn elif_activates_after_failed_if() {
    let mut stack = ConditionalStack::new();
    stack.push_if(false);
    stack.handle_elif(false).unwrap();
    assert!(!stack.is_active());
    stack.handle_elif(true).unwrap();
    assert!(stack.is_active());
}

#[test]
fn nested_inactive_parent_suppresses_child() {
    let mut stack = ConditionalStack::new();
    stack.push_if(false); // outer off
    stack.push_if(true); // inner condition true, but parent is off
    assert!(!stack.is_active());
    stack.pop_endif().unwrap();
    stack.pop_endif().unwrap();
}

#[test]
fn unmatched_endif_is_an_error() {
    let mut stack = ConditionalStack::new();
    assert!(stack.pop_endif().is_err());
}

#[test]
fn unterminated_detects_open_frames() {
    let mut stack = ConditionalStack::new();
    stack.push_if(true);
    assert!(stack.unterminated());
}
