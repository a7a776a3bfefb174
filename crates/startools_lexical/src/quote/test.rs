use proptest::{prop_assert, prop_assert_eq, proptest};

use super::{quote, quote_with, Unquotable};
use crate::{
    token::Kind,
    tokenizer::{strategy::plain_value, Flags, Tokenizer},
};

#[test]
fn plain_values_are_kept() {
    assert_eq!(quote("DataValue1", false).unwrap(), "DataValue1");
    assert_eq!(quote("Data'Value'6", false).unwrap(), "Data'Value'6");
    assert_eq!(quote("DataValue8'", false).unwrap(), "DataValue8'");
    assert_eq!(quote("1.5(3)", false).unwrap(), "1.5(3)");
}

#[test]
fn double_quotes_are_preferred() {
    assert_eq!(quote("Data Value 2", false).unwrap(), "\"Data Value 2\"");
    assert_eq!(
        quote("  Data Value 3  ", false).unwrap(),
        "\"  Data Value 3  \""
    );
    assert_eq!(quote("_data_value_4", false).unwrap(), "\"_data_value_4\"");
    assert_eq!(
        quote("'Data Value 5'", false).unwrap(),
        "\"'Data Value 5'\""
    );
    assert_eq!(quote("Data' Value 7", false).unwrap(), "\"Data' Value 7\"");
    assert_eq!(quote(";DataValue11", false).unwrap(), "\";DataValue11\"");
    assert_eq!(quote("\"DataValue9", false).unwrap(), "\"\"DataValue9\"");
    assert_eq!(quote("", false).unwrap(), "\"\"");
    assert_eq!(quote("loop_", false).unwrap(), "\"loop_\"");
    assert_eq!(quote(".", false).unwrap(), "\".\"");
}

#[test]
fn single_quotes() {
    assert_eq!(quote("a\" b", false).unwrap(), "'a\" b'");
}

#[test]
fn text_fields() {
    let text = "a\" b' c";

    assert!(quote(text, false).is_err());
    assert_eq!(quote(text, true).unwrap(), ";a\" b' c\n;");
    assert_eq!(quote("two\nlines", true).unwrap(), ";two\nlines\n;");

    let text = "Data' Value\" 10";

    assert!(quote(text, false).is_err());
    assert_eq!(quote(text, true).unwrap(), ";Data' Value\" 10\n;");
}

#[test]
fn unquotable() {
    // the text field would close early
    let error = quote(";Data Value\n12\n;", true).unwrap_err();
    assert_eq!(error.excerpt(), ";Data Value\n12\n;");
    assert_eq!(
        error.to_string(),
        "input data cannot be turned into a valid STAR value: ;Data \
         Value\n12\n;"
    );

    assert!(quote("two\nlines", false).is_err());
}

#[test]
fn long_input_is_truncated() {
    let text = format!("{}\n\n;\n", "x".repeat(60));
    let error = quote(&text, true).unwrap_err();

    assert_eq!(error, Unquotable {
        excerpt: format!("{}....", "x".repeat(50))
    });
}

#[test]
fn flags_of_the_tokenizer_apply() {
    let mut tokenizer = Tokenizer::new(Flags::ALLOW_SQUARE_BRACKET);

    assert_eq!(quote("[x]", false).unwrap(), "\"[x]\"");
    assert_eq!(quote_with(&mut tokenizer, "[x]", false).unwrap(), "[x]");
}

#[test]
fn session_is_discarded() {
    let mut tokenizer = Tokenizer::default();
    tokenizer.start_matching("_a _b");

    quote_with(&mut tokenizer, "x", false).unwrap();

    assert!(!tokenizer.has_more_tokens());
}

fn tokenize(text: &str) -> Vec<(Kind, String)> {
    let mut tokenizer = Tokenizer::default();
    tokenizer.start_matching(text);

    tokenizer
        .map(|x| x.map(|x| (x.kind(), x.into_value())))
        .collect::<Result<_, _>>()
        .unwrap()
}

proptest! {
    #[test]
    #[allow(clippy::ignored_unit_patterns)]
    fn round_trip(
        text in "[a-z _;'\"#.?$\\[\\]\n\r\t-]{0,16}",
        allow_semicolon in proptest::bool::ANY,
    ) {
        if let Ok(quoted) = quote(&text, allow_semicolon) {
            let tokens = tokenize(&quoted);

            prop_assert_eq!(tokens.len(), 1);
            prop_assert!(tokens[0].0.is_data_value());
            prop_assert_eq!(&tokens[0].1, &text);
        }
    }

    #[test]
    #[allow(clippy::ignored_unit_patterns)]
    fn single_line_text_is_quotable(
        text in "[a-z _;'\"#.?$\\[\\]-]{0,16}",
    ) {
        let quoted = quote(&text, true);

        prop_assert!(quoted.is_ok(), "{text:?}");
    }

    #[test]
    #[allow(clippy::ignored_unit_patterns)]
    fn plain_values_are_idempotent(
        text in plain_value(),
    ) {
        prop_assert_eq!(quote(&text, false).unwrap(), text);
    }
}
