use serde::{Deserialize, Serialize};

/// The kind of argument an intent needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// An article title.
    Title,
    /// A number of pages.
    Count,
}

/// A command intent, from the closed set the game understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Follow a link to another article.
    Visit,
    /// Go back one or more pages.
    Back,
    /// Show the pages visited so far.
    History,
    /// Show the full article text.
    More,
    /// Show the article's web address.
    Web,
    /// List the current article's links.
    Links,
    /// Rank links by similarity to the endpoint.
    Similar,
    /// Highlight named entities in the summary.
    Entities,
    /// Continue the summary with generated text.
    Generate,
    /// End the game.
    Quit,
    /// Show the command reference.
    Help,
}

impl Intent {
    /// Every intent, in help-listing order.
    pub const ALL: [Intent; 11] = [
        Self::Visit,
        Self::Back,
        Self::History,
        Self::More,
        Self::Web,
        Self::Links,
        Self::Similar,
        Self::Entities,
        Self::Generate,
        Self::Quit,
        Self::Help,
    ];

    /// Look up an intent by its shorthand code (`v`, `b`, `hs`, ...).
    pub fn from_shorthand(code: &str) -> Option<Self> {
        match code {
            "v" => Some(Self::Visit),
            "b" => Some(Self::Back),
            "hs" => Some(Self::History),
            "m" => Some(Self::More),
            "w" => Some(Self::Web),
            "l" => Some(Self::Links),
            "s" => Some(Self::Similar),
            "e" => Some(Self::Entities),
            "g" => Some(Self::Generate),
            "q" => Some(Self::Quit),
            "h" => Some(Self::Help),
            _ => None,
        }
    }

    /// The shorthand code for this intent.
    pub fn shorthand(&self) -> &'static str {
        match self {
            Self::Visit => "v",
            Self::Back => "b",
            Self::History => "hs",
            Self::More => "m",
            Self::Web => "w",
            Self::Links => "l",
            Self::Similar => "s",
            Self::Entities => "e",
            Self::Generate => "g",
            Self::Quit => "q",
            Self::Help => "h",
        }
    }

    /// The label used for this intent in classifier training data.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Visit => "visit",
            Self::Back => "back",
            Self::History => "history",
            Self::More => "more",
            Self::Web => "web",
            Self::Links => "links",
            Self::Similar => "similar",
            Self::Entities => "entities",
            Self::Generate => "generate",
            Self::Quit => "quit",
            Self::Help => "help",
        }
    }

    /// Parse a classifier label back into an intent.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|intent| intent.label() == label)
    }

    /// The argument this intent requires, if any.
    pub fn argument_kind(&self) -> Option<ArgumentKind> {
        match self {
            Self::Visit => Some(ArgumentKind::Title),
            Self::Back => Some(ArgumentKind::Count),
            _ => None,
        }
    }

    /// One-line description for the help listing.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Visit => "visit <title> - follow a link from the current article",
            Self::Back => "back [n] - go back n pages (default 1)",
            Self::History => "history - show the pages visited so far",
            Self::More => "more - show the full article text",
            Self::Web => "web - show the article's web address",
            Self::Links => "links - list the links in the current article",
            Self::Similar => "similar - rank links by similarity to the end point",
            Self::Entities => "entities - highlight named entities in the summary",
            Self::Generate => "generate - continue the summary with generated text",
            Self::Quit => "quit - end the game",
            Self::Help => "help - show this reference",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
