//! Closed vocabulary of PIDE decoration types and their presentation groups.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Prefix shared by every decoration highlight group.
pub const GROUP_PREFIX: &str = "IsaDecoration";

macro_rules! decoration_types {
    ($($variant:ident => $tag:literal, $link:literal;)+) => {
        /// Semantic highlight category pushed by the prover.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum DecorationType {
            $(
                #[doc = concat!("`", $tag, "`")]
                $variant,
            )+
        }

        impl DecorationType {
            /// Every decoration type in protocol order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Tag used on the wire.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)+
                }
            }

            /// Stock editor group the presentation group links to by default.
            #[must_use]
            pub const fn default_link(self) -> &'static str {
                match self {
                    $(Self::$variant => $link,)+
                }
            }
        }

        impl FromStr for DecorationType {
            type Err = DecorationTypeParseError;

            fn from_str(input: &str) -> Result<Self, Self::Err> {
                match input {
                    $($tag => Ok(Self::$variant),)+
                    other => Err(DecorationTypeParseError(other.to_owned())),
                }
            }
        }
    };
}

decoration_types! {
    BackgroundUnprocessed1 => "background_unprocessed1", "CursorLine";
    BackgroundRunning1 => "background_running1", "DiffChange";
    BackgroundBad => "background_bad", "DiffDelete";
    BackgroundIntensify => "background_intensify", "Search";
    BackgroundQuoted => "background_quoted", "CursorColumn";
    BackgroundAntiquoted => "background_antiquoted", "CursorColumn";
    BackgroundMarkdownBullet1 => "background_markdown_bullet1", "DiffAdd";
    BackgroundMarkdownBullet2 => "background_markdown_bullet2", "DiffChange";
    BackgroundMarkdownBullet3 => "background_markdown_bullet3", "DiffText";
    BackgroundMarkdownBullet4 => "background_markdown_bullet4", "DiffDelete";
    ForegroundQuoted => "foreground_quoted", "String";
    ForegroundAntiquoted => "foreground_antiquoted", "Special";
    DottedWriteln => "dotted_writeln", "DiagnosticUnderlineHint";
    DottedInformation => "dotted_information", "DiagnosticUnderlineInfo";
    DottedWarning => "dotted_warning", "DiagnosticUnderlineWarn";
    TextMain => "text_main", "Normal";
    TextKeyword1 => "text_keyword1", "Keyword";
    TextKeyword2 => "text_keyword2", "Statement";
    TextKeyword3 => "text_keyword3", "Type";
    TextQuasiKeyword => "text_quasi_keyword", "Conditional";
    TextImproper => "text_improper", "Exception";
    TextOperator => "text_operator", "Operator";
    TextTfree => "text_tfree", "Type";
    TextTvar => "text_tvar", "Type";
    TextFree => "text_free", "Identifier";
    TextSkolem => "text_skolem", "Constant";
    TextBound => "text_bound", "Identifier";
    TextVar => "text_var", "Identifier";
    TextInnerNumeral => "text_inner_numeral", "Number";
    TextInnerQuoted => "text_inner_quoted", "String";
    TextInnerCartouche => "text_inner_cartouche", "String";
    TextInnerComment => "text_inner_comment", "Comment";
    TextDynamic => "text_dynamic", "Function";
    TextClassParameter => "text_class_parameter", "Function";
    TextAntiquote => "text_antiquote", "Special";
    TextOverviewUnprocessed => "text_overview_unprocessed", "NonText";
    TextOverviewRunning => "text_overview_running", "DiffChange";
    TextOverviewError => "text_overview_error", "DiagnosticError";
    TextOverviewWarning => "text_overview_warning", "DiagnosticWarn";
    SpellChecker => "spell_checker", "SpellBad";
}

impl DecorationType {
    /// Highlight group used to draw this decoration.
    #[must_use]
    pub fn group_name(self) -> String {
        presentation_group(self.as_str())
    }
}

impl fmt::Display for DecorationType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Raised when the server pushes a decoration tag outside the vocabulary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown decoration type '{0}'")]
pub struct DecorationTypeParseError(String);

impl DecorationTypeParseError {
    /// Returns the tag that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        self.0.as_str()
    }
}

/// Maps a decoration tag to its presentation group name.
///
/// The first character and every character following an underscore are
/// upper-cased, underscores are dropped, and [`GROUP_PREFIX`] is prepended:
/// `background_unprocessed1` becomes `IsaDecorationBackgroundUnprocessed1`.
#[must_use]
pub fn presentation_group(tag: &str) -> String {
    let mut group = String::with_capacity(GROUP_PREFIX.len() + tag.len());
    group.push_str(GROUP_PREFIX);
    let mut capitalise = true;
    for character in tag.chars() {
        if character == '_' {
            capitalise = true;
        } else if capitalise {
            group.extend(character.to_uppercase());
            capitalise = false;
        } else {
            group.push(character);
        }
    }
    group
}
