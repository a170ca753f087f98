use std::sync::{Arc, Mutex};
use std::time::Duration;

use chat_widget_protocol::{ErrorKind, MessageEntry, Sender};
use chat_widget_test_endpoint::{PresetReply, ScriptedEndpoint};
use tokio::sync::watch;
use tokio::time::{Instant, timeout};

use crate::config::DEFAULT_GREETINGS;
use crate::{
    ExchangeState, MemoryStorage, SendOutcome, WidgetBuilder,
    WidgetConfigBuilder, failure_message,
};

fn texts(widget: &crate::Widget) -> Vec<String> {
    widget
        .history()
        .iter()
        .map(|entry| entry.text().to_owned())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_simple_message() {
    let endpoint = ScriptedEndpoint::with_replies([PresetReply::reply(
        "Hi, what can I do for you?",
    )]);
    let widget =
        WidgetBuilder::with_endpoint(endpoint.clone(), MemoryStorage::new())
            .build();

    let history = widget.history();
    assert_eq!(history.len(), 1);
    assert!(DEFAULT_GREETINGS.contains(&history.entries()[0].text()));

    let started = Instant::now();
    assert_eq!(widget.send_message("  Hello ").await, SendOutcome::Completed);
    assert!(started.elapsed() >= Duration::from_millis(500));

    let history = widget.history();
    let senders: Vec<_> = history.iter().map(MessageEntry::sender).collect();
    assert_eq!(senders, [Sender::Bot, Sender::User, Sender::Bot]);
    assert_eq!(history.entries()[1].text(), "Hello");
    assert_eq!(history.entries()[2].text(), "Hi, what can I do for you?");
    assert_eq!(widget.exchange_state(), ExchangeState::Idle);
    assert!(!widget.is_typing());

    let requests = endpoint.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].message, "Hello");
    assert_eq!(requests[0].history, history.entries()[..2]);
}

#[tokio::test(start_paused = true)]
async fn test_ignore_blank_messages() {
    let endpoint = ScriptedEndpoint::with_replies([PresetReply::reply("?")]);
    let widget =
        WidgetBuilder::with_endpoint(endpoint.clone(), MemoryStorage::new())
            .build();
    let before = widget.history();

    assert_eq!(widget.send_message("").await, SendOutcome::Ignored);
    assert_eq!(widget.send_message("   ").await, SendOutcome::Ignored);
    assert_eq!(widget.send_message("\n\t").await, SendOutcome::Ignored);

    assert_eq!(widget.history(), before);
    assert_eq!(endpoint.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_drop_concurrent_send() {
    let endpoint = ScriptedEndpoint::with_replies([
        PresetReply::reply("reply to a"),
        PresetReply::reply("reply to b"),
    ]);
    let (typing_tx, mut typing_rx) = watch::channel(false);
    let widget =
        WidgetBuilder::with_endpoint(endpoint.clone(), MemoryStorage::new())
            .on_typing(move |typing| {
                typing_tx.send(typing).unwrap();
            })
            .build();

    let first = tokio::spawn({
        let widget = widget.clone();
        async move { widget.send_message("a").await }
    });
    typing_rx.wait_for(|typing| *typing).await.unwrap();

    assert_eq!(widget.exchange_state(), ExchangeState::AwaitingResponse);
    assert_eq!(widget.send_message("b").await, SendOutcome::Ignored);
    assert_eq!(widget.exchange_state(), ExchangeState::AwaitingResponse);

    assert_eq!(first.await.unwrap(), SendOutcome::Completed);
    assert_eq!(widget.exchange_state(), ExchangeState::Idle);

    let messages: Vec<_> =
        endpoint.requests().into_iter().map(|req| req.message).collect();
    assert_eq!(messages, ["a"]);
    assert_eq!(texts(&widget)[1..], ["a", "reply to a"]);
}

#[tokio::test(start_paused = true)]
async fn test_reply_is_recorded_verbatim() {
    let endpoint = ScriptedEndpoint::with_replies([PresetReply::reply("hi")]);
    let widget =
        WidgetBuilder::with_endpoint(endpoint, MemoryStorage::new()).build();

    widget.send_message("Hello").await;
    let history = widget.history();
    let last = history.entries().last().unwrap();
    assert_eq!(last.text(), "hi");
    assert_eq!(last.sender(), Sender::Bot);
}

#[tokio::test(start_paused = true)]
async fn test_fallback_reply() {
    let endpoint = ScriptedEndpoint::with_replies([
        PresetReply::Empty,
        PresetReply::Empty,
    ]);
    let widget =
        WidgetBuilder::with_endpoint(endpoint.clone(), MemoryStorage::new())
            .build();
    widget.send_message("Hello").await;
    assert_eq!(
        texts(&widget).last().unwrap(),
        crate::config::DEFAULT_FALLBACK_REPLY
    );

    let config = WidgetConfigBuilder::new()
        .with_fallback_reply("Hmm, I have no answer to that.")
        .build();
    let widget = WidgetBuilder::with_endpoint(endpoint, MemoryStorage::new())
        .with_config(config)
        .build();
    widget.send_message("Hello").await;
    assert_eq!(
        texts(&widget).last().unwrap(),
        "Hmm, I have no answer to that."
    );
}

#[tokio::test(start_paused = true)]
async fn test_failures_become_entries() {
    let kinds = [
        ErrorKind::NotFound,
        ErrorKind::ServerError,
        ErrorKind::Connectivity,
        ErrorKind::Other,
    ];
    let endpoint = ScriptedEndpoint::with_replies(
        kinds.map(PresetReply::Failure).to_vec(),
    );
    let widget =
        WidgetBuilder::with_endpoint(endpoint, MemoryStorage::new()).build();

    for kind in kinds {
        assert_eq!(widget.send_message("Hello").await, SendOutcome::Completed);
        let history = widget.history();
        let last = history.entries().last().unwrap();
        assert_eq!(last.sender(), Sender::Bot);
        assert_eq!(last.text(), failure_message(kind));
        assert_eq!(widget.exchange_state(), ExchangeState::Idle);
    }

    let history = widget.history();
    assert_ne!(
        history.entries()[2].text(),
        failure_message(ErrorKind::Other)
    );
}

#[tokio::test(start_paused = true)]
async fn test_history_context() {
    let replies: Vec<_> = (0..4)
        .map(|i| PresetReply::reply(format!("reply {i}")))
        .collect();
    let endpoint = ScriptedEndpoint::with_replies(replies);
    let widget =
        WidgetBuilder::with_endpoint(endpoint.clone(), MemoryStorage::new())
            .build();

    for i in 0..4 {
        widget.send_message(&format!("message {i}")).await;
    }

    let requests = endpoint.requests();
    assert_eq!(requests[0].history.len(), 2);
    let last = &requests[3];
    let context: Vec<_> = last.history.iter().map(MessageEntry::text).collect();
    assert_eq!(
        context,
        ["message 1", "reply 1", "message 2", "reply 2", "message 3"]
    );
    assert!(last.history.last().unwrap().is_user());
}

#[tokio::test(start_paused = true)]
async fn test_restore_after_reload() {
    let storage = MemoryStorage::new();
    let endpoint =
        ScriptedEndpoint::with_replies([PresetReply::reply("Noted.")]);
    let widget =
        WidgetBuilder::with_endpoint(endpoint.clone(), storage.clone()).build();
    widget.send_message("Remember me").await;

    let reloaded =
        WidgetBuilder::with_endpoint(endpoint, storage.clone()).build();
    assert_eq!(reloaded.history(), widget.history());
    assert_eq!(reloaded.history().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_clear_history() {
    let storage = MemoryStorage::new();
    let reported = Arc::new(Mutex::new(Vec::new()));
    let endpoint = ScriptedEndpoint::with_replies([PresetReply::reply("ok")]);
    let widget = WidgetBuilder::with_endpoint(endpoint.clone(), storage.clone())
        .on_entry({
            let reported = Arc::clone(&reported);
            move |entry| {
                reported.lock().unwrap().push(entry.clone());
            }
        })
        .build();
    widget.send_message("Hello").await;

    let welcome = widget.clear_history();
    assert_eq!(widget.history().entries(), [welcome.clone()]);
    assert_eq!(reported.lock().unwrap().last(), Some(&welcome));
    assert_eq!(reported.lock().unwrap().len(), 3);

    let reloaded = WidgetBuilder::with_endpoint(endpoint, storage).build();
    assert_eq!(reloaded.history().entries(), [welcome]);
}

#[tokio::test(start_paused = true)]
async fn test_send_current_input() {
    let mut endpoint =
        ScriptedEndpoint::with_replies([PresetReply::reply("one")]);
    endpoint.set_delay(Duration::from_secs(1));
    let (typing_tx, mut typing_rx) = watch::channel(false);
    let widget =
        WidgetBuilder::with_endpoint(endpoint.clone(), MemoryStorage::new())
            .on_typing(move |typing| {
                typing_tx.send(typing).unwrap();
            })
            .build();

    widget.set_input("   ");
    assert_eq!(widget.send_current_input().await, SendOutcome::Ignored);
    assert_eq!(widget.input(), "   ");

    widget.set_input("  first ");
    let first = tokio::spawn({
        let widget = widget.clone();
        async move { widget.send_current_input().await }
    });
    typing_rx.wait_for(|typing| *typing).await.unwrap();
    assert_eq!(widget.input(), "");

    // Typed while the first answer is pending, so it stays in the box.
    widget.set_input("second");
    assert_eq!(widget.send_current_input().await, SendOutcome::Ignored);
    assert_eq!(widget.input(), "second");

    assert_eq!(first.await.unwrap(), SendOutcome::Completed);
    assert_eq!(texts(&widget)[1..], ["first", "one"]);
}

#[tokio::test(start_paused = true)]
async fn test_append_user_message() {
    let endpoint = ScriptedEndpoint::default();
    let widget =
        WidgetBuilder::with_endpoint(endpoint.clone(), MemoryStorage::new())
            .build();

    let entry = widget.append_user_message("Just saying");
    assert!(entry.is_user());
    assert_eq!(widget.history().entries().last(), Some(&entry));
    assert_eq!(endpoint.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_set_endpoint() {
    let first = ScriptedEndpoint::with_replies([PresetReply::reply("old")]);
    let second = ScriptedEndpoint::with_replies([PresetReply::reply("new")]);
    let widget =
        WidgetBuilder::with_endpoint(first.clone(), MemoryStorage::new())
            .build();

    widget.send_message("one").await;
    widget.set_endpoint(second.clone());
    widget.send_message("two").await;

    assert_eq!(first.request_count(), 1);
    assert_eq!(second.request_count(), 1);
    assert_eq!(texts(&widget)[1..], ["one", "old", "two", "new"]);
}

#[tokio::test(start_paused = true)]
async fn test_typing_signals() {
    let signals = Arc::new(Mutex::new(Vec::new()));
    let endpoint = ScriptedEndpoint::with_replies([
        PresetReply::reply("ok"),
        PresetReply::Failure(ErrorKind::ServerError),
    ]);
    let widget = WidgetBuilder::with_endpoint(endpoint, MemoryStorage::new())
        .on_typing({
            let signals = Arc::clone(&signals);
            move |typing| signals.lock().unwrap().push(typing)
        })
        .build();

    widget.send_message("Hello").await;
    widget.send_message("Again").await;
    widget.send_message(" ").await;
    assert_eq!(*signals.lock().unwrap(), [true, false, true, false]);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_send_runs_to_completion() {
    let mut endpoint =
        ScriptedEndpoint::with_replies([PresetReply::reply("late")]);
    endpoint.set_delay(Duration::from_secs(10));
    let widget =
        WidgetBuilder::with_endpoint(endpoint.clone(), MemoryStorage::new())
            .build();

    let result =
        timeout(Duration::from_millis(100), widget.send_message("Hello"))
            .await;
    assert!(result.is_err());
    assert_eq!(widget.exchange_state(), ExchangeState::AwaitingResponse);
    assert!(widget.is_typing());
    assert_eq!(widget.send_message("Again").await, SendOutcome::Ignored);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(widget.exchange_state(), ExchangeState::Idle);
    assert!(!widget.is_typing());
    assert_eq!(endpoint.request_count(), 1);
    assert_eq!(texts(&widget)[1..], ["Hello", "late"]);
}

#[test]
fn test_toggle() {
    let toggles = Arc::new(Mutex::new(Vec::new()));
    let endpoint = ScriptedEndpoint::default();
    let widget = WidgetBuilder::with_endpoint(endpoint, MemoryStorage::new())
        .on_toggle({
            let toggles = Arc::clone(&toggles);
            move |open| toggles.lock().unwrap().push(open)
        })
        .build();

    assert!(!widget.is_open());
    assert!(widget.toggle());
    widget.open();
    assert!(widget.is_open());
    assert!(!widget.toggle());
    widget.close();
    assert_eq!(*toggles.lock().unwrap(), [true, false]);
}
