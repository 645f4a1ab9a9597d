//! A playable game: command resolution, navigation and the display commands
//! wired together behind one `process` call per input line.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, info};
use wk_core::{Article, ArticleSource, Intent, normalize_title};
use wk_models::{
    CentroidClassifier, EntityHighlighter, EntitySpan, IntentClassifier, MarkovGenerator,
    PatternHighlighter, SimilarityModel, TextGenerator, segments,
};

use crate::config::{EngineConfig, GeneratorConfig};
use crate::error::{EngineError, EngineResult};
use crate::extract::{Argument, back_count};
use crate::fuzzy::FuzzyMatcher;
use crate::resolver::{CommandResolver, CommandSource};
use crate::session::{Confirmation, MoveOutcome, NavigationSession, PendingCorrection, Standing};

/// The model capabilities used by display commands.
pub struct Capabilities {
    /// Word-vector model for `similar`. Without one, `similar` is unavailable.
    pub similarity: Option<Box<dyn SimilarityModel>>,
    /// Entity tagger for `entities`.
    pub entities: Box<dyn EntityHighlighter>,
    /// Text generator for `generate`.
    pub generator: Box<dyn TextGenerator>,
}

impl Capabilities {
    /// Pattern-based entities and a Markov generator, no word vectors.
    pub fn defaults(generator: &GeneratorConfig) -> EngineResult<Self> {
        Ok(Self {
            similarity: None,
            entities: Box::new(PatternHighlighter::new()?),
            generator: Box::new(MarkovGenerator::new(generator.seed)),
        })
    }

    /// Use `model` for `similar`.
    pub fn with_similarity(mut self, model: Box<dyn SimilarityModel>) -> Self {
        self.similarity = Some(model);
        self
    }
}

/// Where the game stands after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Waiting for the next command.
    Playing,
    /// Waiting for a `y`/`n`/`c` answer.
    AwaitingConfirmation,
    /// The end point was reached.
    Won,
    /// A losing move was confirmed.
    Lost,
    /// The player quit.
    Quit,
}

impl GameStatus {
    /// Whether no further commands will be accepted.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Won | Self::Lost | Self::Quit)
    }
}

/// What a command produced, for a front end to render.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// An article summary panel.
    Page {
        /// One-based position in the history.
        position: usize,
        /// Article title.
        title: String,
        /// Summary text.
        summary: String,
        /// Standing of the history entry.
        standing: Standing,
        /// Set when this page wins the game, with the number of moves.
        won_in: Option<usize>,
    },
    /// A line of text.
    Message(String),
    /// A plain list, one item per line.
    List(Vec<String>),
    /// Links ranked by similarity to the end point.
    Ranked(Vec<(String, f32)>),
    /// The numbered history trail.
    Trail(Vec<(String, Standing)>),
    /// Text with entity spans marked.
    Annotated {
        /// The annotated text.
        text: String,
        /// Entity spans within `text`.
        spans: Vec<EntitySpan>,
    },
    /// Generated continuations of a prompt.
    Samples {
        /// The prompt shared by every sample.
        prompt: String,
        /// Generated text following the prompt.
        continuations: Vec<String>,
    },
    /// A correction waiting for `y`/`n`/`c`.
    Confirm(PendingCorrection),
    /// A move that was refused.
    Rejected {
        /// What the player asked for.
        candidate: String,
        /// Links to try instead.
        suggestions: Vec<String>,
    },
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page {
                position,
                title,
                summary,
                won_in,
                ..
            } => {
                write!(f, "({position}) {title}\n{summary}")?;
                if let Some(moves) = won_in {
                    write!(f, "\n\nYou've reached the end point in {moves} moves!")?;
                }
                Ok(())
            }
            Self::Message(text) => f.write_str(text),
            Self::List(items) => f.write_str(&items.join("\n")),
            Self::Ranked(items) => {
                let lines: Vec<String> = items
                    .iter()
                    .map(|(title, score)| format!("{title} : {score:.3}"))
                    .collect();
                f.write_str(&lines.join("\n"))
            }
            Self::Trail(entries) => {
                let items: Vec<String> = entries
                    .iter()
                    .enumerate()
                    .map(|(i, (title, _))| format!("({}) {title}", i + 1))
                    .collect();
                f.write_str(&items.join(" > "))
            }
            Self::Annotated { text, spans } => f.write_str(&annotate(text, spans)),
            Self::Samples {
                prompt,
                continuations,
            } => {
                let samples: Vec<String> = continuations
                    .iter()
                    .map(|c| format!("{prompt} {c}"))
                    .collect();
                f.write_str(&samples.join("\n\n"))
            }
            Self::Confirm(p) => write!(
                f,
                "\"{}\" is not a link here. Did you mean \"{}\"? [y] corrected / [n] original / [c] cancel",
                p.original, p.suggestion
            ),
            Self::Rejected {
                candidate,
                suggestions,
            } => {
                write!(f, "\"{candidate}\" is not a link on this page.")?;
                if !suggestions.is_empty() {
                    write!(f, " Try: {}", suggestions.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// The result of one processed line.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Main output.
    pub view: View,
    /// Status after the command.
    pub status: GameStatus,
    /// Side remarks, such as the classification of free text.
    pub notes: Vec<String>,
}

/// A single game from start page to win, loss or quit.
pub struct GameSession<S> {
    session: NavigationSession<S>,
    resolver: CommandResolver,
    capabilities: Capabilities,
    config: EngineConfig,
    similar_cache: HashMap<String, Vec<(String, f32)>>,
    primed: HashSet<String>,
    quit: bool,
}

impl<S: ArticleSource> GameSession<S> {
    /// Start a game from `start` to `endpoint`.
    pub fn new(
        source: S,
        start: &str,
        endpoint: &str,
        classifier: Box<dyn IntentClassifier>,
        capabilities: Capabilities,
        config: EngineConfig,
    ) -> EngineResult<Self> {
        let matcher = FuzzyMatcher::new(config.acceptance_threshold);
        let endpoint = source.fetch(endpoint)?.title;
        let session = NavigationSession::new(source, start, endpoint, matcher)?;
        let resolver = CommandResolver::new(classifier, &config)?;
        info!(
            start = %session.current().title,
            end = %session.endpoint(),
            "game started"
        );
        Ok(Self {
            session,
            resolver,
            capabilities,
            config,
            similar_cache: HashMap::new(),
            primed: HashSet::new(),
            quit: false,
        })
    }

    /// Start a game with the built-in classifier and default capabilities.
    pub fn with_defaults(
        source: S,
        start: &str,
        endpoint: &str,
        config: EngineConfig,
    ) -> EngineResult<Self> {
        let capabilities = Capabilities::defaults(&config.generator)?;
        Self::new(
            source,
            start,
            endpoint,
            Box::new(CentroidClassifier::with_default_corpus()),
            capabilities,
            config,
        )
    }

    /// The navigation state.
    pub fn session(&self) -> &NavigationSession<S> {
        &self.session
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        if self.quit {
            GameStatus::Quit
        } else if self.session.is_lost() {
            GameStatus::Lost
        } else if self.session.has_won() {
            GameStatus::Won
        } else if self.session.pending().is_some() {
            GameStatus::AwaitingConfirmation
        } else {
            GameStatus::Playing
        }
    }

    /// The start page panel.
    pub fn intro(&self) -> Response {
        self.respond(self.page_view(), Vec::new())
    }

    /// Process one line of input.
    pub fn process(&mut self, line: &str) -> EngineResult<Response> {
        if self.status().is_final() {
            return Err(EngineError::GameOver);
        }

        if self.session.pending().is_some() {
            return match Confirmation::parse(line) {
                Some(choice) => {
                    let outcome = self.session.confirm(choice)?;
                    Ok(self.outcome_response(outcome, Vec::new()))
                }
                None => Ok(self.respond(
                    View::Message("Please answer y (corrected), n (original) or c (cancel).".to_string()),
                    Vec::new(),
                )),
            };
        }

        let command = self.resolver.resolve(line, &self.session.current().links)?;
        let mut notes = Vec::new();
        if let CommandSource::FreeText(c) = command.source {
            notes.push(format!(
                "Classifying command as {} with {:.2}% confidence.",
                c.intent,
                c.confidence * 100.0
            ));
        }

        match (command.intent, command.argument) {
            (Intent::Visit, Some(Argument::Title(title))) => {
                if matches!(command.source, CommandSource::FreeText(_)) {
                    notes.push(format!("Detected title: {title}"));
                }
                let outcome = self.session.visit(&title)?;
                Ok(self.outcome_response(outcome, notes))
            }
            (Intent::Back, argument) => {
                if self.session.current_index() == 0 {
                    return Ok(self.respond(
                        View::Message("This is the starting page!".to_string()),
                        notes,
                    ));
                }
                let argument = argument.unwrap_or(Argument::Count(1));
                let n = back_count(
                    &argument,
                    self.session.current_index(),
                    self.config.back_count,
                )?;
                let outcome = self.session.back(n)?;
                Ok(self.outcome_response(outcome, notes))
            }
            (Intent::History, _) => Ok(self.respond(self.trail(), notes)),
            (Intent::More, _) => {
                let view = View::Message(self.session.current().body().trim().to_string());
                Ok(self.respond(view, notes))
            }
            (Intent::Web, _) => {
                let view = match &self.session.current().url {
                    Some(url) => View::Message(url.clone()),
                    None => View::Message("This article has no web address.".to_string()),
                };
                Ok(self.respond(view, notes))
            }
            (Intent::Links, _) => {
                let view = View::List(self.session.current().links.clone());
                Ok(self.respond(view, notes))
            }
            (Intent::Similar, _) => {
                let view = self.similar();
                Ok(self.respond(view, notes))
            }
            (Intent::Entities, _) => {
                let view = self.entities();
                Ok(self.respond(view, notes))
            }
            (Intent::Generate, _) => {
                let view = self.generate()?;
                Ok(self.respond(view, notes))
            }
            (Intent::Help, _) => Ok(self.respond(help(), notes)),
            (Intent::Quit, _) => {
                self.quit = true;
                info!(moves = self.session.moves(), "player quit");
                Ok(self.respond(View::Message("Bye!".to_string()), notes))
            }
            (Intent::Visit, _) => Err(EngineError::ExtractionFailure(
                "no title found".to_string(),
            )),
        }
    }

    fn respond(&self, view: View, notes: Vec<String>) -> Response {
        Response {
            view,
            status: self.status(),
            notes,
        }
    }

    fn outcome_response(&mut self, outcome: MoveOutcome, mut notes: Vec<String>) -> Response {
        let view = match outcome {
            MoveOutcome::Applied { title, losing } => {
                if losing {
                    notes.push(format!(
                        "\"{title}\" was not a link on the previous page. You lose!"
                    ));
                }
                self.page_view()
            }
            MoveOutcome::AppliedAfterCorrection {
                original,
                corrected,
            } => {
                debug!(original = %original, corrected = %corrected, "correction accepted");
                self.page_view()
            }
            MoveOutcome::WentBack { .. } => self.page_view(),
            MoveOutcome::NeedsConfirmation(pending) => View::Confirm(pending),
            MoveOutcome::Rejected {
                candidate,
                suggestions,
                ..
            } => View::Rejected {
                candidate,
                suggestions,
            },
            MoveOutcome::Cancelled => View::Message("Cancelled.".to_string()),
        };
        if self.session.has_won() {
            info!(moves = self.session.moves(), "end point reached");
        }
        self.respond(view, notes)
    }

    fn page_view(&self) -> View {
        let article = self.session.current();
        let standing = self
            .session
            .visits()
            .last()
            .map_or(Standing::OnPath, |v| v.standing);
        View::Page {
            position: self.session.current_index() + 1,
            title: article.title.clone(),
            summary: summary(article).trim().to_string(),
            standing,
            won_in: self.session.has_won().then(|| self.session.moves()),
        }
    }

    fn trail(&self) -> View {
        View::Trail(
            self.session
                .visits()
                .iter()
                .map(|v| (v.article.title.clone(), v.standing))
                .collect(),
        )
    }

    fn similar(&mut self) -> View {
        let Some(model) = &self.capabilities.similarity else {
            return View::Message(
                "No word vectors are loaded, so similarities cannot be computed.".to_string(),
            );
        };
        let endpoint = self.session.endpoint();
        if model.vector(endpoint).is_none() {
            return View::Message(
                "Unable to compute similarities: the end point is out of vocabulary.".to_string(),
            );
        }

        let article = self.session.current();
        let key = normalize_title(&article.title);
        if let Some(ranked) = self.similar_cache.get(&key) {
            return View::Ranked(ranked.clone());
        }

        let mut ranked: Vec<(String, f32)> = article
            .links
            .iter()
            .map(|link| {
                let score = model.similarity(endpoint, link).unwrap_or(0.0);
                (link.clone(), score)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        debug!(article = %article.title, links = ranked.len(), "similarities computed");
        self.similar_cache.insert(key, ranked.clone());
        View::Ranked(ranked)
    }

    fn entities(&self) -> View {
        let text = summary(self.session.current()).trim().to_string();
        let spans = self.capabilities.entities.entities(&text);
        if spans.is_empty() {
            View::Message("No entities found.".to_string())
        } else {
            View::Annotated { text, spans }
        }
    }

    fn generate(&mut self) -> EngineResult<View> {
        let settings = &self.config.generator;
        if !settings.enabled {
            return Ok(View::Message(
                "Generation is disabled. Set `enabled = true` under [generator] in the config file to use it."
                    .to_string(),
            ));
        }

        let article = self.session.current();
        let prompt = summary(article)
            .split_whitespace()
            .take(settings.prompt_words)
            .collect::<Vec<_>>()
            .join(" ");

        let key = normalize_title(&article.title);
        if !self.primed.contains(&key) {
            self.capabilities.generator.prime(article.body());
            self.primed.insert(key);
        }

        let mut continuations = Vec::with_capacity(settings.samples);
        for _ in 0..settings.samples {
            let text = self
                .capabilities
                .generator
                .complete(&prompt, settings.max_new_tokens)?;
            continuations.push(last_sentence(&text).to_string());
        }
        Ok(View::Samples {
            prompt,
            continuations,
        })
    }
}

fn summary(article: &Article) -> &str {
    if article.summary.trim().is_empty() {
        article.body()
    } else {
        &article.summary
    }
}

fn help() -> View {
    View::List(
        Intent::ALL
            .iter()
            .map(|i| format!("{:<3} {}", i.shorthand(), i.describe()))
            .collect(),
    )
}

/// Cut generated text after its last sentence end, if it has one.
fn last_sentence(text: &str) -> &str {
    match text.rfind(['.', '!', '?']) {
        Some(i) => &text[..=i],
        None => text,
    }
}

/// Render spans inline as `[text](LABEL)`.
pub fn annotate(text: &str, spans: &[EntitySpan]) -> String {
    segments(text, spans)
        .into_iter()
        .map(|(piece, span)| match span {
            Some(span) => format!("[{piece}]({})", span.label),
            None => piece.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use wk_core::LinkGraph;
    use wk_models::{StaticClassifier, WordVectors};

    use super::*;

    fn graph() -> LinkGraph {
        LinkGraph::new()
            .with_article(
                Article::new("Canada")
                    .with_summary("Canada is a country in North America. Its capital is Ottawa.")
                    .with_content("Canada is a country in North America. Its capital is Ottawa. Canada has ten provinces.")
                    .with_url("https://en.wikipedia.org/wiki/Canada")
                    .with_links(["Politics of Canada", "Ottawa", "Toronto"]),
            )
            .with_article(
                Article::new("Politics of Canada")
                    .with_summary("The politics of Canada function within a framework of parliamentary democracy.")
                    .with_links(["Canada", "Parliament of Canada"]),
            )
            .with_article(Article::new("Ottawa").with_summary("Ottawa is the capital city of Canada.").with_links(["Canada"]))
            .with_article(Article::new("Toronto").with_links(["Canada"]))
            .with_article(Article::new("Parliament of Canada").with_links(["Ottawa"]))
    }

    fn game(intent: Intent) -> GameSession<LinkGraph> {
        let config = EngineConfig::default();
        let capabilities = Capabilities::defaults(&config.generator).unwrap();
        GameSession::new(
            graph(),
            "Canada",
            "Parliament of Canada",
            Box::new(StaticClassifier::new(intent).with_confidence(0.9)),
            capabilities,
            config,
        )
        .unwrap()
    }

    #[test]
    fn intro_shows_start_page() {
        let g = game(Intent::Help);
        let r = g.intro();
        assert_eq!(r.status, GameStatus::Playing);
        assert!(r.view.to_string().starts_with("(1) Canada\n"));
    }

    #[test]
    fn shorthand_visit_moves() {
        let mut g = game(Intent::Help);
        let r = g.process("v Politics of Canada").unwrap();
        assert!(matches!(r.view, View::Page { position: 2, .. }));
        assert!(r.notes.is_empty());
        assert_eq!(g.session().history(), vec!["Canada", "Politics of Canada"]);
    }

    #[test]
    fn free_text_visit_notes_classification() {
        let mut g = game(Intent::Visit);
        let r = g.process("take me to the page about Ottawa").unwrap();
        assert_eq!(r.notes[0], "Classifying command as visit with 90.00% confidence.");
        assert_eq!(r.notes[1], "Detected title: Ottawa");
        assert_eq!(g.session().current().title, "Ottawa");
    }

    #[test]
    fn confirmation_round_trip() {
        let mut g = game(Intent::Help);
        let r = g.process("v Otawa").unwrap();
        assert!(matches!(r.view, View::Confirm(_)));
        assert_eq!(r.status, GameStatus::AwaitingConfirmation);

        let r = g.process("what?").unwrap();
        assert_eq!(r.status, GameStatus::AwaitingConfirmation);

        let r = g.process("y").unwrap();
        assert_eq!(r.status, GameStatus::Playing);
        assert_eq!(g.session().current().title, "Ottawa");
    }

    #[test]
    fn confirming_original_loses() {
        let graph = graph().with_article(Article::new("Toronta"));
        let config = EngineConfig::default();
        let mut g = GameSession::with_defaults(graph, "Canada", "Parliament of Canada", config).unwrap();
        g.process("v Toronta").unwrap();
        let r = g.process("n").unwrap();
        assert_eq!(r.status, GameStatus::Lost);
        assert!(r.notes[0].contains("You lose"));
        assert!(matches!(g.process("h"), Err(EngineError::GameOver)));
    }

    #[test]
    fn winning_reports_moves() {
        let mut g = game(Intent::Help);
        g.process("v Politics of Canada").unwrap();
        let r = g.process("v Parliament of Canada").unwrap();
        assert_eq!(r.status, GameStatus::Won);
        assert!(r.view.to_string().contains("You've reached the end point in 2 moves!"));
    }

    #[test]
    fn back_on_start_page() {
        let mut g = game(Intent::Back);
        let r = g.process("b").unwrap();
        assert_eq!(r.view, View::Message("This is the starting page!".to_string()));
        let r = g.process("go back two pages").unwrap();
        assert_eq!(r.view, View::Message("This is the starting page!".to_string()));
    }

    #[test]
    fn back_to_page_position() {
        let mut g = game(Intent::Back);
        g.process("v Ottawa").unwrap();
        g.process("v Canada").unwrap();
        g.process("v Toronto").unwrap();
        g.process("go back to page 2").unwrap();
        assert_eq!(g.session().history(), vec!["Canada", "Ottawa"]);
    }

    #[test]
    fn history_trail() {
        let mut g = game(Intent::Help);
        g.process("v Ottawa").unwrap();
        let r = g.process("hs").unwrap();
        assert_eq!(r.view.to_string(), "(1) Canada > (2) Ottawa");
    }

    #[test]
    fn display_commands() {
        let mut g = game(Intent::Help);
        assert!(g.process("m").unwrap().view.to_string().contains("ten provinces"));
        assert_eq!(
            g.process("w").unwrap().view,
            View::Message("https://en.wikipedia.org/wiki/Canada".to_string())
        );
        assert_eq!(
            g.process("l").unwrap().view.to_string(),
            "Politics of Canada\nOttawa\nToronto"
        );
        let help = g.process("h").unwrap().view.to_string();
        assert!(help.contains("hs "));
        assert!(help.contains("quit - end the game"));
    }

    #[test]
    fn similar_without_vectors() {
        let mut g = game(Intent::Help);
        let r = g.process("s").unwrap();
        assert!(r.view.to_string().contains("No word vectors"));
    }

    #[test]
    fn similar_ranks_links() {
        let vectors = WordVectors::parse(
            "parliament 1.0 0.0\nof 0.0 0.0\ncanada 0.6 0.4\npolitics 0.9 0.1\nottawa 0.2 0.8\ntoronto 0.0 1.0\n",
        )
        .unwrap();
        let config = EngineConfig::default();
        let capabilities = Capabilities::defaults(&config.generator)
            .unwrap()
            .with_similarity(Box::new(vectors));
        let mut g = GameSession::new(
            graph(),
            "Canada",
            "Parliament of Canada",
            Box::new(StaticClassifier::new(Intent::Help)),
            capabilities,
            config,
        )
        .unwrap();
        let View::Ranked(ranked) = g.process("s").unwrap().view else {
            panic!("expected ranked links");
        };
        assert_eq!(ranked[0].0, "Politics of Canada");
        assert_eq!(ranked[2].0, "Toronto");
        assert_eq!(g.process("s").unwrap().view, View::Ranked(ranked));
    }

    #[test]
    fn entities_are_annotated() {
        let mut g = game(Intent::Help);
        let text = g.process("e").unwrap().view.to_string();
        assert!(text.contains("[North America](NAME)"));
    }

    #[test]
    fn generate_samples() {
        let mut g = game(Intent::Help);
        let View::Samples {
            prompt,
            continuations,
        } = g.process("g").unwrap().view
        else {
            panic!("expected samples");
        };
        assert!(prompt.starts_with("Canada is a country"));
        assert_eq!(continuations.len(), 3);
    }

    #[test]
    fn generate_disabled() {
        let config = EngineConfig::default().with_generator(GeneratorConfig {
            enabled: false,
            ..GeneratorConfig::default()
        });
        let mut g = GameSession::with_defaults(graph(), "Canada", "Ottawa", config).unwrap();
        let r = g.process("g").unwrap();
        assert!(r.view.to_string().starts_with("Generation is disabled"));
    }

    #[test]
    fn quit_ends_game() {
        let mut g = game(Intent::Help);
        let r = g.process("q").unwrap();
        assert_eq!(r.status, GameStatus::Quit);
        assert!(matches!(g.process("l"), Err(EngineError::GameOver)));
    }

    #[test]
    fn errors_leave_state() {
        let mut g = game(Intent::Visit);
        assert!(matches!(
            g.process("go somewhere"),
            Err(EngineError::ExtractionFailure(_))
        ));
        assert_eq!(g.status(), GameStatus::Playing);
        assert_eq!(g.session().history(), vec!["Canada"]);
    }

    #[test]
    fn annotate_spans() {
        let spans = vec![EntitySpan {
            start: 0,
            end: 6,
            label: "NAME".to_string(),
        }];
        assert_eq!(annotate("Canada is big", &spans), "[Canada](NAME) is big");
    }

    #[test]
    fn last_sentence_cut() {
        assert_eq!(last_sentence("One. Two and"), "One.");
        assert_eq!(last_sentence("no end"), "no end");
    }
}
