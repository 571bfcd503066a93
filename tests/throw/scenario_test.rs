/*!
 * End-to-End Scenario Tests
 */

use super::common::{bus_with_sink, syntax, Parser};
use ai_os_throw::{throw_args, Throw, ThrowMode};
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn test_handled_hard_fault_records_kind_name() {
    let (bus, _) = bus_with_sink();
    let messages = Arc::new(Mutex::new(Vec::new()));

    let recorder = Arc::clone(&messages);
    let _sub = bus.subscribe(move |_, signal| {
        recorder.lock().push(signal.message().to_string());
        signal.set_handled(true);
    });

    let result = Parser::new().throw_hard(&bus, syntax, throw_args!());

    assert!(result.is_ok());
    assert_eq!(*messages.lock(), vec!["ParseError".to_string()]);
}

#[test]
fn test_subscriber_filters_by_sender() {
    let (bus, _) = bus_with_sink();
    let _sub = bus.subscribe(|sender, signal| {
        if let Some(parser) = sender.downcast_ref::<Parser>() {
            if parser.name == "lenient" {
                signal.set_handled(true);
            }
        }
    });

    let lenient = Parser { name: "lenient" };
    let strict = Parser::new();

    assert!(lenient.throw_hard(&bus, syntax, throw_args!()).is_ok());
    assert!(strict.throw_hard(&bus, syntax, throw_args!()).is_err());
}

#[test]
fn test_subscriber_sees_underlying_error() {
    let (bus, _) = bus_with_sink();
    let seen = Arc::new(Mutex::new(None));
    let seen_clone = Arc::clone(&seen);
    let _sub = bus.subscribe(move |_, signal| {
        let text = signal
            .error_as::<super::common::ParseError>()
            .map(|e| e.to_string());
        *seen_clone.lock() = text;
    });

    let _ = Parser::new().rethrow_framework(&bus, syntax("stack underflow"), throw_args!());
    assert_eq!(seen.lock().as_deref(), Some("stack underflow"));
}

#[test]
fn test_question_mark_interrupts_caller() {
    fn parse(bus: &ai_os_throw::ThrowBus, parser: &Parser) -> Result<u32, super::common::ParseError> {
        parser.throw_hard(bus, syntax, throw_args!("eof"))?;
        Ok(1)
    }

    let (bus, _) = bus_with_sink();
    assert!(parse(&bus, &Parser::new()).is_err());

    let _sub = bus.subscribe(|_, signal| {
        if signal.mode() == ThrowMode::Hard {
            signal.set_handled(true);
        }
    });
    assert_eq!(parse(&bus, &Parser::new()).unwrap(), 1);
}

#[test]
fn test_concurrent_raises_are_independent() {
    let (bus, _) = bus_with_sink();
    let _sub = bus.subscribe(|_, signal| {
        if signal.message().starts_with("ok") {
            signal.set_handled(true);
        }
    });

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let bus = bus.clone();
            std::thread::spawn(move || {
                let text = if i % 2 == 0 { "ok" } else { "fail" };
                Parser::new()
                    .throw_hard(&bus, syntax, throw_args!(format!("{} {}", text, i)))
                    .is_ok()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), i % 2 == 0);
    }
    assert_eq!(bus.stats().published, 8);
}
