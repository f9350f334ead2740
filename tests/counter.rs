//! End-to-end flow for a click-driven counter: render, dispatch a click,
//! re-render with the new state, and check the retained tree only absorbed
//! the minimal change.

use graft::{
    dispatch_event, DisplayTree, Element, EventHandler, HostAdapter, InstanceId, PrimitiveOp,
    Reconciler, RecordingTree, RootBinder, TargetTree,
};
use std::cell::RefCell;
use std::rc::Rc;

type Tree = Rc<RefCell<RecordingTree<DisplayTree>>>;
type Binder = RootBinder<Reconciler<HostAdapter<RecordingTree<DisplayTree>>>>;

fn setup() -> (Tree, InstanceId, Binder) {
    let tree = Rc::new(RefCell::new(RecordingTree::new(DisplayTree::new())));
    let root = tree.borrow_mut().create_element_node("root");
    let binder = RootBinder::new(Reconciler::new(HostAdapter::new(tree.clone())));
    (tree, root, binder)
}

/// Counter view: decrement button, value display, increment button. The
/// handlers are created once and reused across passes, the way a component
/// holds stable callbacks.
fn counter_view(count: i64, decrement: &EventHandler, increment: &EventHandler) -> Element {
    Element::new("div").class_name("counter").child(
        Element::new("div")
            .class_name("controls")
            .child(
                Element::new("button")
                    .class_name("dec")
                    .on_click(decrement.clone())
                    .content("-"),
            )
            .child(Element::new("div").class_name("value").content(count))
            .child(
                Element::new("button")
                    .class_name("inc")
                    .on_click(increment.clone())
                    .content("+"),
            ),
    )
}

struct CounterIds {
    dec: InstanceId,
    value: InstanceId,
    inc: InstanceId,
}

fn find_counter_ids(tree: &Tree, root: InstanceId) -> CounterIds {
    let tree = tree.borrow();
    let outer = tree.inner().children_of(root)[0];
    let controls = tree.inner().children_of(outer)[0];
    let children = tree.inner().children_of(controls);
    CounterIds {
        dec: children[0],
        value: children[1],
        inc: children[2],
    }
}

#[test]
fn test_counter_click_flow() {
    let (tree, root, mut binder) = setup();

    let count = Rc::new(RefCell::new(0i64));
    let decrement = EventHandler::new({
        let count = count.clone();
        move || *count.borrow_mut() -= 1
    });
    let increment = EventHandler::new({
        let count = count.clone();
        move || *count.borrow_mut() += 1
    });

    binder
        .render(counter_view(*count.borrow(), &decrement, &increment), root, None)
        .unwrap();
    let ids = find_counter_ids(&tree, root);
    assert_eq!(tree.borrow().inner().text_of(ids.value), Some("0"));

    // Click the increment button twice.
    assert!(dispatch_event(&tree, ids.inc, "click"));
    assert!(dispatch_event(&tree, ids.inc, "click"));
    assert_eq!(*count.borrow(), 2);

    tree.borrow_mut().clear_ops();
    binder
        .render(counter_view(*count.borrow(), &decrement, &increment), root, None)
        .unwrap();

    {
        let tree = tree.borrow();
        assert_eq!(tree.inner().text_of(ids.value), Some("2"));
        // Stable handlers and unchanged classes: the only mutation is the
        // value display's text content.
        assert_eq!(
            tree.ops(),
            &[PrimitiveOp::SetTextContent {
                instance: ids.value,
                value: "2".into(),
            }]
        );
    }

    // And back down.
    assert!(dispatch_event(&tree, ids.dec, "click"));
    binder
        .render(counter_view(*count.borrow(), &decrement, &increment), root, None)
        .unwrap();
    assert_eq!(tree.borrow().inner().text_of(ids.value), Some("1"));
}

#[test]
fn test_counter_instances_are_stable_across_renders() {
    let (tree, root, mut binder) = setup();

    let noop = EventHandler::new(|| {});
    binder
        .render(counter_view(0, &noop, &noop), root, None)
        .unwrap();
    let before = find_counter_ids(&tree, root);

    binder
        .render(counter_view(5, &noop, &noop), root, None)
        .unwrap();
    let after = find_counter_ids(&tree, root);

    // Updates mutate the retained nodes in place; nothing was recreated.
    assert_eq!(before.dec, after.dec);
    assert_eq!(before.value, after.value);
    assert_eq!(before.inc, after.inc);
}
