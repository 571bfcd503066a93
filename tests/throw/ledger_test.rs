/*!
 * Ledger Tests
 */

use super::common::{bus_with_sink, syntax, Parser};
use ai_os_throw::{throw_args, Accumulates, Throw, ThrowLog, ThrowStatus};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

/// Worker that tracks its own throw history
struct Importer {
    log: ThrowLog,
}

impl Accumulates for Importer {
    fn throw_log(&self) -> &ThrowLog {
        &self.log
    }

    fn throw_log_mut(&mut self) -> &mut ThrowLog {
        &mut self.log
    }
}

#[test]
fn test_owner_records_its_throws() {
    let (bus, _) = bus_with_sink();
    let mut importer = Importer {
        log: ThrowLog::new(),
    };

    let parser = Parser::new();
    for row in ["row 1", "row 2"] {
        parser
            .throw_soft(&bus, syntax, throw_args!(row))
            .unwrap()
            .record_into(&mut importer);
    }

    let messages: Vec<&str> = importer
        .throw_log()
        .records()
        .iter()
        .map(|r| r.message())
        .collect();
    assert_eq!(messages, vec!["row 1", "row 2"]);
    assert_eq!(importer.throw_log().status(), ThrowStatus::HAS_THROWN);
}

#[test]
fn test_subscribe_log_collects_published_records() {
    let (bus, _) = bus_with_sink();
    let log = Arc::new(Mutex::new(ThrowLog::new()));
    let sub = bus.subscribe_log(log.clone());

    let parser = Parser::new();
    let _ = parser.throw_hard(&bus, syntax, throw_args!("a"));
    let _ = parser.throw_soft(&bus, syntax, throw_args!("b"));
    drop(sub);
    let _ = parser.throw_soft(&bus, syntax, throw_args!("c"));

    assert_eq!(log.lock().len(), 2);
    assert_eq!(log.lock().thrown_count(), 2);
}

proptest! {
    #[test]
    fn prop_append_then_clear(count in 0usize..32, cycles in 1u64..5) {
        let (bus, _) = bus_with_sink();
        let parser = Parser::new();
        let mut log = ThrowLog::new();

        for cycle in 0..cycles {
            for i in 0..count {
                parser
                    .throw_soft(&bus, syntax, throw_args!(format!("{}", i)))
                    .unwrap()
                    .record_into(&mut log);
            }

            prop_assert_eq!(log.records().len(), count);
            prop_assert_eq!(log.thrown_count(), count as u64);
            let in_order = log
                .records()
                .iter()
                .enumerate()
                .all(|(i, r)| r.message() == i.to_string());
            prop_assert!(in_order);

            log.clear();
            prop_assert_eq!(log.thrown_count(), 0);
            prop_assert_eq!(log.retry_count(), cycle + 1);
            prop_assert!(log.is_empty());
        }
    }
}
