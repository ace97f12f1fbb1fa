//! Keyboard-driven end-to-end scenarios: key presses go through the
//! dispatch router and come out the far side as server requests.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;

use arbor::model::{
    ActorOption, Ack, ClientConfig, Intent, Item, Outline, Payload, StatusOption, VocabSnapshot,
};
use arbor::ops::outline_ops::find_item;
use arbor::remote::{OutlinePage, RemoteError, Transport};
use arbor::tui::app::App;
use arbor::tui::palette::PaletteMode;
use arbor::tui::router;

struct RecordingTransport {
    calls: Mutex<Vec<(String, Payload)>>,
    /// Scripted mutation results, popped from the back; empty means an
    /// empty ack.
    responses: Mutex<Vec<Result<Ack, RemoteError>>>,
    vocab: Mutex<VocabSnapshot>,
}

impl Transport for RecordingTransport {
    fn mutate(&self, resource_id: &str, payload: &Payload) -> Result<Ack, RemoteError> {
        self.calls
            .lock()
            .unwrap()
            .push((resource_id.to_string(), payload.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Ok(Ack::default()))
    }

    fn metadata(&self, _: &str) -> Result<VocabSnapshot, RemoteError> {
        Ok(self.vocab.lock().unwrap().clone())
    }

    fn load(&self, _: &str) -> Result<OutlinePage, RemoteError> {
        Err(RemoteError::Network("not used".into()))
    }
}

fn vocab() -> VocabSnapshot {
    VocabSnapshot {
        status_options: vec![
            StatusOption {
                id: "todo".into(),
                label: "Todo".into(),
                is_end_state: false,
                requires_note: false,
            },
            StatusOption {
                id: "done".into(),
                label: "Done".into(),
                is_end_state: true,
                requires_note: false,
            },
            StatusOption {
                id: "wontfix".into(),
                label: "Won't fix".into(),
                is_end_state: true,
                requires_note: true,
            },
        ],
        tag_options: vec!["deep".into(), "quick".into(), "waiting".into()],
        actor_options: vec![ActorOption {
            id: "u1".into(),
            label: "Ada".into(),
        }],
        destination_options: vec![],
        description: None,
    }
}

fn page() -> OutlinePage {
    let mut outline = Outline::new("out-1", "Launch");
    outline.items.push(Item::new("item-7", "Ship it", "todo"));
    let mut item8 = Item::new("item-8", "Write docs", "todo");
    item8.tags = vec!["deep".into(), "waiting".into()];
    outline.items.push(item8);
    outline.items.push(Item::new("item-9", "Tell people", "todo"));
    OutlinePage {
        outline,
        vocab: vocab(),
    }
}

fn app() -> (App, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport {
        calls: Mutex::new(Vec::new()),
        responses: Mutex::new(Vec::new()),
        vocab: Mutex::new(vocab()),
    });
    let app = App::new(
        page(),
        Arc::clone(&transport) as Arc<dyn Transport>,
        &ClientConfig::default(),
    );
    (app, transport)
}

fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    router::dispatch(app, KeyEvent::new(code, modifiers));
}

fn key(app: &mut App, c: char) {
    let modifiers = if c.is_ascii_uppercase() {
        KeyModifiers::SHIFT
    } else {
        KeyModifiers::NONE
    };
    press(app, KeyCode::Char(c), modifiers);
}

fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
        key(app, c);
    }
}

fn settle(app: &mut App) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while !app.coordinator.is_idle() {
        assert!(Instant::now() < deadline, "requests did not settle within 2s");
        app.tick(Instant::now());
        std::thread::sleep(Duration::from_millis(5));
    }
    app.tick(Instant::now());
}

#[test]
fn status_cycle_key_produces_exactly_one_toggle_call() {
    let (mut app, transport) = app();
    // item-7 focused and editable; todo cycles to done, an end state
    // without a note requirement.
    key(&mut app, 'x');
    settle(&mut app);

    let calls = transport.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "out-1");
    match &calls[0].1 {
        Payload::Single(Intent::Toggle { id, to, note }) => {
            assert_eq!(id, "item-7");
            assert_eq!(to, "done");
            assert!(note.is_none());
        }
        other => panic!("unexpected payload: {other:?}"),
    }

    // The wire detail carries no note key at all.
    let wire = serde_json::to_value(&calls[0].1).unwrap();
    assert_eq!(
        wire,
        serde_json::json!({"type": "outline:toggle", "detail": {"id": "item-7", "to": "done"}})
    );
}

#[test]
fn palette_opens_in_context_navigates_and_closes_back_to_origin() {
    let (mut app, _) = app();
    app.move_cursor(1); // item-8

    press(&mut app, KeyCode::Char(' '), KeyModifiers::NONE);
    {
        let palette = app.palette.as_ref().unwrap();
        assert_eq!(palette.top(), PaletteMode::Context);
        assert_eq!(palette.depth(), 1);
    }

    key(&mut app, 'g');
    {
        let palette = app.palette.as_ref().unwrap();
        assert_eq!(palette.top(), PaletteMode::Nav);
        assert_eq!(palette.depth(), 2);
    }

    press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
    {
        let palette = app.palette.as_ref().unwrap();
        assert_eq!(palette.top(), PaletteMode::Context);
        assert_eq!(palette.depth(), 1);
    }

    // Move the cursor away underneath the modal state, then close: focus
    // must return to the item focused before the palette opened.
    app.cursor = 0;
    press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
    assert!(app.palette.is_none());
    app.tick(Instant::now());
    assert_eq!(app.cursor, 1);
}

#[test]
fn tags_picker_cancel_restores_the_set_and_sends_one_correction() {
    let (mut app, transport) = app();
    app.move_cursor(1); // item-8, tags {deep, waiting}

    key(&mut app, 't');
    assert!(app.picker.is_some());

    // Toggle "deep" off and "quick" on; the item re-renders immediately.
    press(&mut app, KeyCode::Char(' '), KeyModifiers::NONE);
    key(&mut app, 'j');
    press(&mut app, KeyCode::Char(' '), KeyModifiers::NONE);
    {
        let tags = &find_item(&app.outline, "item-8").unwrap().tags;
        assert!(tags.contains(&"quick".to_string()));
        assert!(!tags.contains(&"deep".to_string()));
    }

    // Cancel before the debounced save fires.
    press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
    settle(&mut app);

    // The original set is back, order-independent.
    let mut tags = find_item(&app.outline, "item-8").unwrap().tags.clone();
    tags.sort();
    assert_eq!(tags, vec!["deep".to_string(), "waiting".to_string()]);

    // Exactly one corrective mutation carrying the original set.
    let calls = transport.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    match &calls[0].1 {
        Payload::Single(Intent::SetTags { id, tags }) => {
            assert_eq!(id, "item-8");
            let mut sent = tags.clone();
            sent.sort();
            assert_eq!(sent, vec!["deep".to_string(), "waiting".to_string()]);
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[test]
fn reorder_burst_plus_edit_yields_one_batched_request() {
    let (mut app, transport) = app();

    // Two reorder keystrokes, then a status cycle before the window fires.
    key(&mut app, 'J');
    app.tick(Instant::now());
    key(&mut app, 'J');
    app.tick(Instant::now());
    key(&mut app, 'x');
    settle(&mut app);

    let calls = transport.calls.lock().unwrap();
    assert_eq!(calls.len(), 1, "moves and the edit must share one request");
    match &calls[0].1 {
        Payload::Batch { ops } => {
            assert_eq!(ops.len(), 3);
            match (&ops[0], &ops[1], &ops[2]) {
                (
                    Intent::Move(first),
                    Intent::Move(second),
                    Intent::Toggle { id, to, .. },
                ) => {
                    assert_eq!(first.id, "item-7");
                    assert_eq!(first.index, 1);
                    assert_eq!(second.id, "item-7");
                    assert_eq!(second.index, 2);
                    assert_eq!(id, "item-7");
                    assert_eq!(to, "done");
                }
                other => panic!("unexpected op shapes: {other:?}"),
            }
        }
        other => panic!("unexpected payload: {other:?}"),
    }

    // The optimistic view already shows the final placement.
    let ids: Vec<String> = app.outline.items.iter().map(|i| i.id.clone()).collect();
    assert_eq!(ids, vec!["item-8", "item-9", "item-7"]);
}

#[test]
fn capture_through_palette_creates_an_item_under_a_temp_id() {
    let (mut app, transport) = app();

    press(&mut app, KeyCode::Char(' '), KeyModifiers::NONE);
    key(&mut app, 'c'); // capture mode
    key(&mut app, 't'); // capture to top → prompt
    assert!(app.palette.is_none());
    assert!(app.prompt.is_some());

    type_str(&mut app, "New task");
    press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
    settle(&mut app);

    assert!(app.prompt.is_none());
    assert_eq!(app.outline.items[0].title, "New task");
    assert_eq!(app.cursor, 0, "focus lands on the captured item");

    let calls = transport.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    match &calls[0].1 {
        Payload::Single(Intent::Create {
            parent,
            index,
            title,
            status,
            ..
        }) => {
            assert!(parent.is_none());
            assert_eq!(*index, 0);
            assert_eq!(title, "New task");
            assert_eq!(status, "todo");
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[test]
fn rejected_status_set_leaves_no_stale_vocabulary() {
    let (mut app, transport) = app();
    transport
        .responses
        .lock()
        .unwrap()
        .push(Err(RemoteError::Rejected("statuses are locked".into())));

    app.apply_now(Intent::SetStatuses {
        options: vec![StatusOption {
            id: "weird".into(),
            label: "Weird".into(),
            is_end_state: false,
            requires_note: false,
        }],
    });
    settle(&mut app);

    // The rejected vocabulary is gone again.
    assert_eq!(app.vocab.status_options, vocab().status_options);

    // Cycling afterwards still walks the confirmed set: todo → done.
    key(&mut app, 'x');
    settle(&mut app);
    let calls = transport.calls.lock().unwrap();
    match &calls.last().unwrap().1 {
        Payload::Single(Intent::Toggle { to, .. }) => assert_eq!(to, "done"),
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[test]
fn status_picker_open_adopts_the_server_vocabulary() {
    let (mut app, transport) = app();

    // The server's vocabulary grew behind this client's back.
    let mut fresh = vocab();
    fresh.status_options.push(StatusOption {
        id: "blocked".into(),
        label: "Blocked".into(),
        is_end_state: false,
        requires_note: false,
    });
    *transport.vocab.lock().unwrap() = fresh.clone();

    key(&mut app, 's');

    let picker = app.picker.as_ref().unwrap();
    assert_eq!(picker.options.len(), fresh.status_options.len());
    assert_eq!(app.vocab.status_options, fresh.status_options);
    assert_eq!(app.confirmed_vocab, fresh.status_options);
}

#[test]
fn empty_capture_title_keeps_the_prompt_open() {
    let (mut app, transport) = app();
    press(&mut app, KeyCode::Char(' '), KeyModifiers::NONE);
    key(&mut app, 'c');
    key(&mut app, 't');

    press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
    assert!(app.prompt.is_some(), "validation keeps the surface open");
    assert!(app.status_message.as_ref().unwrap().is_error);
    assert!(transport.calls.lock().unwrap().is_empty());
}
