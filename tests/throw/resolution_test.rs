/*!
 * Identifier and Message Resolution Tests
 */

use super::common::{bus_with_sink, syntax, Parser};
use ai_os_throw::{caller, throw_args, Caller, Throw, ThrowArgs};

fn parse_header(parser: &Parser, bus: &ai_os_throw::ThrowBus) -> ai_os_throw::ThrowRecord {
    parser
        .throw_soft(bus, syntax, throw_args!("header too short"))
        .unwrap()
        .record()
        .clone()
}

impl Parser {
    fn parse_body(&self, bus: &ai_os_throw::ThrowBus) -> ai_os_throw::ThrowRecord {
        self.throw_soft(bus, syntax, throw_args!("body.len", "body too long"))
            .unwrap()
            .record()
            .clone()
    }
}

#[test]
fn test_single_argument_uses_enclosing_name() {
    let (bus, _) = bus_with_sink();
    let record = parse_header(&Parser::new(), &bus);
    assert_eq!(record.identifier(), "parse_header");
    assert_eq!(record.message(), "header too short");
    assert_eq!(record.caller().member(), "parse_header");
}

#[test]
fn test_two_arguments_are_identifier_then_message() {
    let (bus, _) = bus_with_sink();
    let record = Parser::new().parse_body(&bus);
    assert_eq!(record.identifier(), "body.len");
    assert_eq!(record.message(), "body too long");
    assert_eq!(record.caller().member(), "parse_body");
}

#[test]
fn test_caller_macro_matches_function() {
    fn tokenize() -> Caller {
        caller!()
    }
    assert_eq!(tokenize().member(), "tokenize");
    assert!(tokenize().file().ends_with("resolution_test.rs"));
}

#[test]
fn test_explicit_caller_without_macro() {
    let (bus, _) = bus_with_sink();
    let args = ThrowArgs::new(Caller::explicit("ffi_entry")).message("null handle");
    let thrown = Parser::new().throw_soft(&bus, syntax, args).unwrap();
    assert_eq!(thrown.identifier(), "ffi_entry");
    assert_eq!(thrown.message(), "null handle");
}

#[test]
fn test_error_wraps_resolved_message() {
    let (bus, _) = bus_with_sink();
    let thrown = Parser::new()
        .throw_soft(&bus, syntax, throw_args!("lexer", "bad escape"))
        .unwrap();
    assert_eq!(thrown.error(), &syntax("bad escape"));
    assert_eq!(thrown.error_text(), "bad escape");
}

#[test]
fn test_constructor_panic_falls_back_to_generic() {
    let (bus, _) = bus_with_sink();
    let result = Parser::new().throw_hard(
        &bus,
        |message: &str| -> super::common::ParseError {
            panic!("constructor rejected {}", message)
        },
        throw_args!("unterminated string"),
    );
    match result {
        Err(super::common::ParseError::Generic(generic)) => {
            assert_eq!(generic.message(), "unterminated string");
            assert_eq!(generic.kind(), "ParseError");
        }
        Err(other) => panic!("expected generic fallback, got {:?}", other),
        Ok(_) => panic!("hard throw should propagate"),
    }
}
