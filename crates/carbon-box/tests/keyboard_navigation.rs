//! Integration tests for keyboard navigation and type-ahead.

use std::sync::Arc;
use std::time::{Duration, Instant};

use carbon_box::{
    CarbonBox, CarbonBoxConfig, Direction, Key, KeyPressEvent, KeyboardModifiers, ListControl,
    ScrollRequest, SourceNode, SourceOption,
};
use parking_lot::Mutex;

fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("carbon_box=trace")
        .with_test_writer()
        .try_init();
}

fn press(select: &mut CarbonBox<ListControl>, key: Key) -> bool {
    select.handle_key_press(&KeyPressEvent::new(key))
}

fn mixed() -> ListControl {
    ListControl::new()
        .with_node(SourceNode::option("A"))
        .with_node(SourceNode::Option(SourceOption::new("B").disabled()))
        .with_node(SourceNode::option("C"))
        .with_node(SourceNode::option("D"))
        .with_node(SourceNode::Option(SourceOption::new("E").disabled()))
}

#[test]
fn down_from_a_skips_disabled_b() {
    setup();
    let source = ListControl::new()
        .with_node(SourceNode::option("A"))
        .with_node(SourceNode::Option(SourceOption::new("B").disabled()))
        .with_node(SourceNode::option("C"));
    let mut select = CarbonBox::new(source, CarbonBoxConfig::default()).unwrap();

    select.open();
    assert_eq!(select.move_focus(Direction::Down, 1), Some(0));
    assert_eq!(select.move_focus(Direction::Down, 1), Some(2));
    assert_eq!(select.focused_entry().unwrap().label, "C");
}

#[test]
fn repeated_down_clamps_at_last_enabled() {
    setup();
    let mut select = CarbonBox::new(mixed(), CarbonBoxConfig::default()).unwrap();
    select.open();

    let mut visited = Vec::new();
    for _ in 0..10 {
        press(&mut select, Key::ArrowDown);
        visited.push(select.focused().unwrap());
    }

    assert!(visited.iter().all(|&i| select.model().is_enabled(i)));
    assert_eq!(&visited[..4], &[0, 2, 3, 3]);
    assert_eq!(select.focused(), Some(3));
}

#[test]
fn boundaries_are_idempotent() {
    setup();
    let mut select = CarbonBox::new(mixed(), CarbonBoxConfig::default()).unwrap();
    select.open();

    press(&mut select, Key::End);
    assert_eq!(select.focused(), Some(3));
    assert_eq!(select.move_focus(Direction::Down, 1), Some(3));
    assert_eq!(select.move_page(Direction::Down), Some(3));

    press(&mut select, Key::Home);
    assert_eq!(select.focused(), Some(0));
    assert_eq!(select.move_focus(Direction::Up, 1), Some(0));
    assert_eq!(select.move_page(Direction::Up), Some(0));
}

#[test]
fn disabled_group_children_are_unreachable() {
    setup();
    let source = ListControl::new()
        .with_node(SourceNode::group(
            "Warm",
            vec![SourceNode::option("Red"), SourceNode::option("Orange")],
        ))
        .with_node(SourceNode::Group {
            label: "Cold".to_string(),
            disabled: true,
            children: vec![SourceNode::option("Blue")],
        })
        .with_node(SourceNode::option("Gray"));
    let mut select = CarbonBox::new(source, CarbonBoxConfig::default()).unwrap();

    assert_eq!(select.model().groups().len(), 2);
    assert_eq!(select.entry(0).unwrap().group.as_deref(), Some("Warm"));
    assert!(!select.model().is_enabled(2));

    select.open();
    press(&mut select, Key::ArrowDown);
    press(&mut select, Key::ArrowDown);
    assert_eq!(select.focused(), Some(1));
    press(&mut select, Key::ArrowDown);
    assert_eq!(select.focused(), Some(3));
    assert!(select.activate(2).is_none());
}

#[test]
fn focus_starts_from_active_entry() {
    setup();
    let source = ListControl::new()
        .with_node(SourceNode::option("A"))
        .with_node(SourceNode::Option(SourceOption::new("B").selected()))
        .with_node(SourceNode::option("C"));
    let mut select = CarbonBox::new(source, CarbonBoxConfig::default()).unwrap();

    select.open();
    assert_eq!(select.focused(), None);
    press(&mut select, Key::ArrowDown);
    assert_eq!(select.focused(), Some(2));
}

#[test]
fn navigation_requests_scrolling() {
    setup();
    let mut select = CarbonBox::new(mixed(), CarbonBoxConfig::default()).unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let r = requests.clone();
    select.scroll_requested.connect(move |request| {
        r.lock().push(*request);
    });

    select.open();
    press(&mut select, Key::ArrowDown);
    press(&mut select, Key::ArrowDown);
    press(&mut select, Key::ArrowUp);

    assert_eq!(
        *requests.lock(),
        vec![
            ScrollRequest { index: 0, direction: Direction::Down },
            ScrollRequest { index: 2, direction: Direction::Down },
            ScrollRequest { index: 0, direction: Direction::Up },
        ]
    );
}

#[test]
fn closed_dropdown_only_opens() {
    setup();
    let mut select = CarbonBox::new(mixed(), CarbonBoxConfig::default()).unwrap();

    assert!(!press(&mut select, Key::ArrowUp));
    assert!(!select.handle_key_press(&KeyPressEvent::character('c')));
    assert!(!select.is_open());
    assert_eq!(select.focused(), None);

    assert!(select.handle_key_press(&KeyPressEvent::character(' ')));
    assert!(select.is_open());
    assert_eq!(select.focused(), None);
}

#[test]
fn escape_closes() {
    setup();
    let mut select = CarbonBox::new(mixed(), CarbonBoxConfig::default()).unwrap();
    press(&mut select, Key::ArrowDown);
    assert!(select.is_open());

    assert!(press(&mut select, Key::Escape));
    assert!(!select.is_open());
    assert!(select.active().is_empty());
}

#[test]
fn type_ahead_accumulates_then_resets() {
    setup();
    let mut select =
        CarbonBox::new(ListControl::from(["Red", "Green", "Blue"]), CarbonBoxConfig::default())
            .unwrap();
    let t0 = Instant::now();
    select.open();

    select.handle_key_press_at(&KeyPressEvent::character('g'), t0);
    let t1 = t0 + Duration::from_millis(100);
    select.handle_key_press_at(&KeyPressEvent::character('r'), t1);
    assert_eq!(select.focused(), Some(1));
    assert_eq!(select.search_buffer(), "gr");

    let t2 = t1 + Duration::from_millis(400);
    select.handle_key_press_at(&KeyPressEvent::character('b'), t2);
    assert_eq!(select.focused(), Some(2));
    assert_eq!(select.search_buffer(), "b");
    assert!(select.active().is_empty());
}

#[test]
fn type_ahead_expires_through_timer_processing() {
    setup();
    let mut select = CarbonBox::new(
        ListControl::from(["Red", "Green", "Blue"]),
        CarbonBoxConfig::default().with_search_delay(Duration::from_millis(250)),
    )
    .unwrap();
    let t0 = Instant::now();
    select.open();

    select.type_character_at('b', t0);
    assert_eq!(
        select.time_until_next_timer(t0),
        Some(Duration::from_millis(250))
    );
    assert!(!select.process_timers(t0 + Duration::from_millis(100)));
    assert!(select.process_timers(t0 + Duration::from_millis(250)));
    assert_eq!(select.search_buffer(), "");
    assert_eq!(select.time_until_next_timer(t0), None);
}

#[test]
fn command_modifiers_bypass_type_ahead() {
    setup();
    let mut select =
        CarbonBox::new(ListControl::from(["Red", "Green"]), CarbonBoxConfig::default()).unwrap();
    select.open();

    let event = KeyPressEvent::character('g').with_modifiers(KeyboardModifiers {
        control: true,
        ..Default::default()
    });
    assert!(!select.handle_key_press(&event));
    assert_eq!(select.search_buffer(), "");
    assert_eq!(select.focused(), None);
}
