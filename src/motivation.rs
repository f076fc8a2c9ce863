//! Annotation motivations
//!
//! The 13 W3C motivations plus the `research:` extensions, with display
//! metadata for each.
//!
//! Reference: <https://www.w3.org/TR/annotation-vocab/#named-individuals>

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix shared by all research extension motivations
pub const RESEARCH_PREFIX: &str = "research:";

/// Why an annotation was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Motivation {
    #[serde(rename = "assessing")]
    Assessing,
    #[serde(rename = "bookmarking")]
    Bookmarking,
    #[serde(rename = "classifying")]
    Classifying,
    #[serde(rename = "commenting")]
    Commenting,
    #[serde(rename = "describing")]
    Describing,
    #[serde(rename = "editing")]
    Editing,
    #[serde(rename = "highlighting")]
    Highlighting,
    #[serde(rename = "identifying")]
    Identifying,
    #[serde(rename = "linking")]
    Linking,
    #[serde(rename = "moderating")]
    Moderating,
    #[serde(rename = "questioning")]
    Questioning,
    #[serde(rename = "replying")]
    Replying,
    #[serde(rename = "tagging")]
    Tagging,
    #[serde(rename = "research:insight")]
    ResearchInsight,
    #[serde(rename = "research:evidence")]
    ResearchEvidence,
    #[serde(rename = "research:theme")]
    ResearchTheme,
    #[serde(rename = "research:quote")]
    ResearchQuote,
    #[serde(rename = "research:action")]
    ResearchAction,
    #[serde(rename = "research:synthesis")]
    ResearchSynthesis,
}

impl Motivation {
    /// W3C motivations in vocabulary order
    pub const STANDARD: [Motivation; 13] = [
        Motivation::Assessing,
        Motivation::Bookmarking,
        Motivation::Classifying,
        Motivation::Commenting,
        Motivation::Describing,
        Motivation::Editing,
        Motivation::Highlighting,
        Motivation::Identifying,
        Motivation::Linking,
        Motivation::Moderating,
        Motivation::Questioning,
        Motivation::Replying,
        Motivation::Tagging,
    ];

    /// Research extension motivations
    pub const RESEARCH: [Motivation; 6] = [
        Motivation::ResearchInsight,
        Motivation::ResearchEvidence,
        Motivation::ResearchTheme,
        Motivation::ResearchQuote,
        Motivation::ResearchAction,
        Motivation::ResearchSynthesis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assessing => "assessing",
            Self::Bookmarking => "bookmarking",
            Self::Classifying => "classifying",
            Self::Commenting => "commenting",
            Self::Describing => "describing",
            Self::Editing => "editing",
            Self::Highlighting => "highlighting",
            Self::Identifying => "identifying",
            Self::Linking => "linking",
            Self::Moderating => "moderating",
            Self::Questioning => "questioning",
            Self::Replying => "replying",
            Self::Tagging => "tagging",
            Self::ResearchInsight => "research:insight",
            Self::ResearchEvidence => "research:evidence",
            Self::ResearchTheme => "research:theme",
            Self::ResearchQuote => "research:quote",
            Self::ResearchAction => "research:action",
            Self::ResearchSynthesis => "research:synthesis",
        }
    }

    pub fn is_standard(&self) -> bool {
        !self.is_research()
    }

    pub fn is_research(&self) -> bool {
        self.as_str().starts_with(RESEARCH_PREFIX)
    }

    /// Every motivation, standard ones first
    pub fn all() -> impl Iterator<Item = Motivation> {
        Self::STANDARD.into_iter().chain(Self::RESEARCH)
    }
}

impl std::fmt::Display for Motivation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Motivation {
    type Err = MotivationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .find(|motivation| motivation.as_str() == s)
            .ok_or_else(|| MotivationError::Unknown(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotivationError {
    #[error("Unknown motivation: {0}")]
    Unknown(String),
}

/// Display metadata for a motivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotivationInfo {
    pub id: Motivation,
    pub label: &'static str,
    pub description: &'static str,
    /// Lucide icon name
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_extension: bool,
}

const fn standard(
    id: Motivation,
    label: &'static str,
    description: &'static str,
    icon: &'static str,
    color: Option<&'static str>,
) -> MotivationInfo {
    MotivationInfo {
        id,
        label,
        description,
        icon,
        color,
        is_extension: false,
    }
}

const fn research(
    id: Motivation,
    label: &'static str,
    description: &'static str,
    icon: &'static str,
    color: &'static str,
) -> MotivationInfo {
    MotivationInfo {
        id,
        label,
        description,
        icon,
        color: Some(color),
        is_extension: true,
    }
}

/// Metadata for the W3C motivations
pub static MOTIVATION_INFO: LazyLock<HashMap<Motivation, MotivationInfo>> = LazyLock::new(|| {
    use Motivation::*;
    [
        standard(Assessing, "Assessment", "An assessment or evaluation of the target", "check-circle", None),
        standard(Bookmarking, "Bookmark", "Saved for later reference", "bookmark", None),
        standard(Classifying, "Classification", "Categorization using a taxonomy", "folder", None),
        standard(Commenting, "Comment", "A comment or note about the target", "message-square", None),
        standard(Describing, "Description", "A description of the target", "file-text", None),
        standard(Editing, "Edit Suggestion", "A suggested edit or correction", "edit", None),
        standard(Highlighting, "Highlight", "Marking an important section", "highlighter", Some("#fef08a")),
        standard(Identifying, "Identification", "Identifying what the target represents", "tag", None),
        standard(Linking, "Link", "Creating a connection to another resource", "link", None),
        standard(Moderating, "Moderation", "Moderation-related annotation", "shield", None),
        standard(Questioning, "Question", "A question about the target", "help-circle", None),
        standard(Replying, "Reply", "A response to another annotation", "corner-up-left", None),
        standard(Tagging, "Tag", "Adding keywords or labels", "hash", None),
    ]
    .into_iter()
    .map(|info| (info.id, info))
    .collect()
});

/// Metadata for the research extensions
pub static RESEARCH_MOTIVATION_INFO: LazyLock<HashMap<Motivation, MotivationInfo>> =
    LazyLock::new(|| {
        use Motivation::*;
        [
            research(ResearchInsight, "Insight", "A key finding or insight", "lightbulb", "#fde047"),
            research(ResearchEvidence, "Evidence", "Supporting evidence for a claim", "check-square", "#86efac"),
            research(ResearchTheme, "Theme", "A recurring theme or pattern", "layers", "#c4b5fd"),
            research(ResearchQuote, "Quote", "A notable quote for reference", "quote", "#fca5a5"),
            research(ResearchAction, "Action Item", "A follow-up action or task", "play-circle", "#93c5fd"),
            research(ResearchSynthesis, "Synthesis", "A synthesis or summary", "git-merge", "#fdba74"),
        ]
        .into_iter()
        .map(|info| (info.id, info))
        .collect()
    });

/// Metadata for one motivation
pub fn motivation_info(motivation: Motivation) -> Option<&'static MotivationInfo> {
    if motivation.is_research() {
        RESEARCH_MOTIVATION_INFO.get(&motivation)
    } else {
        MOTIVATION_INFO.get(&motivation)
    }
}

/// Metadata for every motivation, standard ones first
pub fn all_motivation_info() -> Vec<&'static MotivationInfo> {
    Motivation::all().filter_map(motivation_info).collect()
}

/// The motivation to display for an annotation.
///
/// Standard motivations win over research extensions; an empty list falls
/// back to `commenting`.
pub fn primary_motivation(motivations: &[Motivation]) -> Motivation {
    motivations
        .iter()
        .find(|m| m.is_standard())
        .or_else(|| motivations.first())
        .copied()
        .unwrap_or(Motivation::Commenting)
}

/// Whether `value` names a W3C motivation
pub fn is_standard_motivation(value: &str) -> bool {
    value
        .parse::<Motivation>()
        .is_ok_and(|motivation| motivation.is_standard())
}

/// Whether `value` is in the research namespace
pub fn is_research_motivation(value: &str) -> bool {
    value.starts_with(RESEARCH_PREFIX)
}
