#![allow(missing_docs)]

use std::fmt::{Display, Write};

use proptest::{
    collection,
    prelude::Arbitrary,
    prop_assert_eq, prop_oneof,
    strategy::{BoxedStrategy, Just, Strategy},
    test_runner::TestCaseResult,
};
use startools_test_input::Input;

use crate::token::{Kind, Token};

const RESERVED_WORDS: [&str; 5] =
    ["data_", "loop_", "save_", "stop_", "global_"];

fn is_reserved(value: &str) -> bool {
    let lowercase = value.to_ascii_lowercase();

    RESERVED_WORDS.iter().any(|x| lowercase.starts_with(x))
}

/// Generates unquoted values that are matched as [`Kind::String`].
pub fn plain_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9(][A-Za-z0-9()+.,;'\"_#-]{0,10}"
        .prop_filter("reserved words are not plain values", |x| {
            !is_reserved(x)
        })
}

/// A token that is known to be matched as itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    DataBlock(String),
    Loop(&'static str),
    DataName(String),
    Plain(String),
    SingleQuoted(String),
    DoubleQuoted(String),
    TextField(Vec<String>),
    Comment(String),
    Null,
    Unknown,
}

impl Item {
    pub const fn kind(&self) -> Kind {
        match self {
            Self::DataBlock(_) => Kind::DataBlock,
            Self::Loop(_) => Kind::Loop,
            Self::DataName(_) => Kind::DataName,
            Self::Plain(_) => Kind::String,
            Self::SingleQuoted(_) => Kind::SquoteString,
            Self::DoubleQuoted(_) => Kind::DquoteString,
            Self::TextField(_) => Kind::Multiline,
            Self::Comment(_) => Kind::Comment,
            Self::Null => Kind::Null,
            Self::Unknown => Kind::Unknown,
        }
    }

    pub fn value(&self) -> String {
        match self {
            Self::DataBlock(string)
            | Self::DataName(string)
            | Self::Plain(string)
            | Self::SingleQuoted(string)
            | Self::DoubleQuoted(string) => string.clone(),
            Self::Loop(keyword) => (*keyword).to_owned(),
            Self::TextField(lines) => lines.join("\n"),
            Self::Comment(content) => format!("#{content}"),
            Self::Null => ".".to_owned(),
            Self::Unknown => "?".to_owned(),
        }
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleQuoted(content) => write!(f, "'{content}'"),
            Self::DoubleQuoted(content) => write!(f, "\"{content}\""),
            Self::TextField(lines) => write!(f, ";{}\n;", lines.join("\n")),
            item => f.write_str(&item.value()),
        }
    }
}

impl Arbitrary for Item {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
        prop_oneof![
            "[dD][aA][tT][aA]_[A-Za-z0-9_.-]{1,12}".prop_map(Self::DataBlock),
            prop_oneof![Just("loop_"), Just("LOOP_"), Just("Loop_")]
                .prop_map(Self::Loop),
            "_[A-Za-z0-9_.]{1,12}".prop_map(Self::DataName),
            plain_value().prop_map(Self::Plain),
            "[A-Za-z0-9 ,.;_\"#$-]{0,12}".prop_map(Self::SingleQuoted),
            "[A-Za-z0-9 ,.;_'#$-]{0,12}".prop_map(Self::DoubleQuoted),
            collection::vec("[A-Za-z0-9 ,.'\"_#-]{0,12}", 0..4)
                .prop_map(Self::TextField),
            "[A-Za-z0-9 '\";_]{0,12}".prop_map(Self::Comment),
            Just(Self::Null),
            Just(Self::Unknown),
        ]
        .boxed()
    }
}

impl Input<&Token> for &Item {
    fn assert(self, output: &Token) -> TestCaseResult {
        prop_assert_eq!(self.kind(), output.kind());
        prop_assert_eq!(&self.value(), output.value());

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Space,
    Tab,
    LineFeed,
    CarriageReturn,
    CarriageReturnLineFeed,
}

impl Display for Separator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Space => " ",
            Self::Tab => "\t",
            Self::LineFeed => "\n",
            Self::CarriageReturn => "\r",
            Self::CarriageReturnLineFeed => "\r\n",
        })
    }
}

impl Arbitrary for Separator {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(Self::Space),
            Just(Self::Tab),
            Just(Self::LineFeed),
            Just(Self::CarriageReturn),
            Just(Self::CarriageReturnLineFeed),
        ]
        .boxed()
    }
}

/// A sequence of tokens separated by whitespace.
///
/// Text fields always start on a new line and comments always end with one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub items: Vec<(Item, Separator)>,
}

impl Document {
    pub fn expected(&self) -> Vec<Item> {
        self.items.iter().map(|(item, _)| item.clone()).collect()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, (item, separator)) in self.items.iter().enumerate() {
            if index > 0 && matches!(item, Item::TextField(_)) {
                f.write_char('\n')?;
            }

            write!(f, "{item}")?;

            if matches!(item, Item::Comment(_)) {
                f.write_char('\n')?;
            }

            write!(f, "{separator}")?;
        }

        Ok(())
    }
}

impl Arbitrary for Document {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
        collection::vec((Item::arbitrary(), Separator::arbitrary()), 0..24)
            .prop_map(|items| Self { items })
            .boxed()
    }
}
