/*!
 * Formatting Tests
 */

use super::common::{bus_with_sink, syntax, Parser};
use ai_os_throw::{throw_args, Throw, ThrowFields};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_default_rendering() {
    let (bus, _) = bus_with_sink();
    let thrown = Parser::new()
        .throw_soft(&bus, syntax, throw_args!("lexer", "bad escape"))
        .unwrap();
    assert_eq!(thrown.to_string(), "lexer | bad escape");
}

#[test]
fn test_test_preset_rendering() {
    let (bus, _) = bus_with_sink();
    let thrown = Parser::new()
        .throw_soft(&bus, syntax, throw_args!("lexer", "bad escape"))
        .unwrap();
    assert_eq!(
        thrown.render(ThrowFields::TEST),
        "Soft | ParseError | lexer | bad escape"
    );
}

#[test]
fn test_forensic_includes_location() {
    let (bus, _) = bus_with_sink();
    let thrown = Parser::new()
        .throw_soft(&bus, syntax, throw_args!("lexer", "bad escape"))
        .unwrap();
    let rendered = thrown.render(ThrowFields::FORENSIC);
    assert!(rendered.starts_with("Soft | ParseError | lexer | bad escape | at "));
    assert!(rendered.contains("format_test.rs"));
}

fn field_sets() -> impl Strategy<Value = ThrowFields> {
    any::<u8>().prop_map(ThrowFields::from_bits_truncate)
}

proptest! {
    #[test]
    fn prop_basic_rendering_round_trip(identifier in "[a-z.]{1,12}", message in "[ -~]{0,24}") {
        let (bus, _) = bus_with_sink();
        let thrown = Parser::new()
            .throw_soft(&bus, syntax, throw_args!(identifier.clone(), message.clone()))
            .unwrap();
        prop_assert_eq!(thrown.to_string(), format!("{} | {}", identifier, message));
    }

    #[test]
    fn prop_presets_are_monotonic(message in "[a-z ]{1,16}") {
        let (bus, _) = bus_with_sink();
        let thrown = Parser::new()
            .throw_soft(&bus, syntax, throw_args!(message))
            .unwrap();

        let fields = |set: ThrowFields| -> Vec<ThrowFields> {
            thrown.render_parts(set).into_iter().map(|(field, _)| field).collect()
        };
        let basic = fields(ThrowFields::BASIC);
        let test = fields(ThrowFields::TEST);
        let forensic = fields(ThrowFields::FORENSIC);

        prop_assert!(basic.iter().all(|f| test.contains(f)));
        prop_assert!(test.iter().all(|f| forensic.contains(f)));
    }

    #[test]
    fn prop_rendered_parts_respect_selection(set in field_sets()) {
        let (bus, _) = bus_with_sink();
        let thrown = Parser::new()
            .throw_soft(&bus, syntax, throw_args!("x"))
            .unwrap();
        for (field, _) in thrown.render_parts(set) {
            prop_assert!(set.contains(field));
        }
    }
}
