//! Deterministic in-memory page used by the extraction and worker tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::match_url;
use crate::error::{AppError, Result};
use crate::extract::selectors::*;
use crate::session::{PageSession, SessionFactory};
use crate::types::{FormReading, Grouping, MatchId, Scope, Toggle, ToggleState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(String),
    Read(String),
    Click(String),
}

/// Content of one match page: plain texts, a form figure per toggle cell,
/// selectors that must not match anything, and selectors whose lookup breaks
/// the session.
#[derive(Debug, Clone)]
pub struct MatchFixture {
    texts: HashMap<String, String>,
    form: HashMap<ToggleState, FormReading>,
    missing: HashSet<String>,
    broken: HashSet<String>,
}

impl MatchFixture {
    /// A page where every section is present. Kickoff is 02-01-2024; team 1 last
    /// played at home 3 days earlier, team 2 away 7 days earlier.
    pub fn complete(first_team: &str, second_team: &str) -> Self {
        let texts = [
            (FIRST_TEAM_NAME, first_team),
            (SECOND_TEAM_NAME, second_team),
            (LEAGUE_NAME, "Liga Portugal"),
            (DATE_TIME, "02-01-2024 20:15"),
            (FIRST_TEAM_GOALS, "2"),
            (SECOND_TEAM_GOALS, "1"),
            (GAME_STATE, "Terminado"),
            (FIRST_TEAM_LAST_GAME_DATE, "30-12-2023"),
            (SECOND_TEAM_LAST_GAME_DATE, "26-12-2023"),
            (FIRST_TEAM_LAST_GAME_AT_HOME, "*"),
            (FIRST_TEAM_DAYS_UNTIL_NEXT_GAME, "4 dias"),
            (SECOND_TEAM_DAYS_UNTIL_NEXT_GAME, "5 dias"),
            (SECOND_TEAM_NEXT_GAME_AT_HOME, "*"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let form = [
            (Scope::All, Grouping::Combined, [1.5, 1.2, 0.8, 1.1]),
            (Scope::SameLeague, Grouping::Combined, [1.6, 1.3, 0.7, 1.0]),
            (Scope::All, Grouping::Split, [1.9, 0.9, 0.6, 1.4]),
            (Scope::SameLeague, Grouping::Split, [2.1, 0.8, 0.5, 1.5]),
        ]
        .into_iter()
        .map(|(scope, grouping, [a, b, c, d])| {
            (
                ToggleState::new(scope, grouping),
                FormReading {
                    first_team_scoring: a,
                    second_team_scoring: b,
                    first_team_conceding: c,
                    second_team_conceding: d,
                },
            )
        })
        .collect();

        Self {
            texts,
            form,
            missing: HashSet::new(),
            broken: HashSet::new(),
        }
    }

    pub fn without(mut self, selector: &str) -> Self {
        self.missing.insert(selector.to_string());
        self
    }

    /// Looking up `selector` fails as if the browser connection dropped.
    pub fn failing_on(mut self, selector: &str) -> Self {
        self.broken.insert(selector.to_string());
        self
    }

    fn lookup(&self, selector: &str) -> Result<()> {
        if self.broken.contains(selector) {
            return Err(AppError::Session(format!("lookup of `{selector}` failed")));
        }
        if self.missing.contains(selector) {
            return Err(AppError::ElementNotFound(selector.to_string()));
        }
        Ok(())
    }

    /// Override the text behind `selector`, including the form figure selectors.
    pub fn with(mut self, selector: &str, text: &str) -> Self {
        self.texts.insert(selector.to_string(), text.to_string());
        self
    }

    pub fn form_reading(&self, state: ToggleState) -> FormReading {
        self.form[&state]
    }

    fn form_text(&self, state: ToggleState, selector: &str) -> Option<String> {
        let r = self.form.get(&state)?;
        let value = match selector {
            FIRST_TEAM_SCORING_AVERAGE => r.first_team_scoring,
            SECOND_TEAM_SCORING_AVERAGE => r.second_team_scoring,
            FIRST_TEAM_CONCEDING_AVERAGE => r.first_team_conceding,
            SECOND_TEAM_CONCEDING_AVERAGE => r.second_team_conceding,
            _ => return None,
        };
        Some(value.to_string())
    }
}

pub struct FakePage {
    pages: Arc<HashMap<String, MatchFixture>>,
    current: Option<MatchFixture>,
    state: ToggleState,
    actions: Vec<Action>,
    closed: Arc<AtomicUsize>,
}

impl FakePage {
    /// A page that already shows `fixture`, as if navigation had happened.
    pub fn loaded(fixture: MatchFixture) -> Self {
        Self {
            pages: Arc::new(HashMap::new()),
            current: Some(fixture),
            state: ToggleState::INITIAL,
            actions: Vec::new(),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn reads(&self) -> Vec<String> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                Action::Read(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    fn page(&self) -> Result<&MatchFixture> {
        self.current
            .as_ref()
            .ok_or_else(|| AppError::Session("no page loaded".to_string()))
    }
}

impl PageSession for FakePage {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.actions.push(Action::Navigate(url.to_string()));
        let fixture = self
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::Session(format!("no page at {url}")))?;
        self.current = Some(fixture);
        self.state = ToggleState::INITIAL;
        Ok(())
    }

    async fn read_text(&mut self, selector: &str) -> Result<String> {
        self.actions.push(Action::Read(selector.to_string()));
        let state = self.state;
        let page = self.page()?;
        page.lookup(selector)?;
        page.texts
            .get(selector)
            .cloned()
            .or_else(|| page.form_text(state, selector))
            .ok_or_else(|| AppError::ElementNotFound(selector.to_string()))
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        self.actions.push(Action::Click(selector.to_string()));
        self.page()?.lookup(selector)?;
        let toggle = match selector {
            SAME_LEAGUE_TOGGLE => Toggle::SameLeague,
            HOME_AWAY_TOGGLE => Toggle::HomeAway,
            _ => return Err(AppError::ElementNotFound(selector.to_string())),
        };
        self.state = self.state.flip(toggle);
        Ok(())
    }

    async fn close(self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Serves one [`MatchFixture`] per match URL and counts session lifetimes.
#[derive(Clone)]
pub struct FakeSessionFactory {
    pages: Arc<HashMap<String, MatchFixture>>,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl FakeSessionFactory {
    pub fn new(base_url: &str, fixtures: impl IntoIterator<Item = (MatchId, MatchFixture)>) -> Self {
        let pages = fixtures
            .into_iter()
            .map(|(id, fixture)| (match_url(base_url, id), fixture))
            .collect();
        Self {
            pages: Arc::new(pages),
            opened: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl SessionFactory for FakeSessionFactory {
    type Session = FakePage;

    async fn open(&self) -> Result<FakePage> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(FakePage {
            pages: Arc::clone(&self.pages),
            current: None,
            state: ToggleState::INITIAL,
            actions: Vec::new(),
            closed: Arc::clone(&self.closed),
        })
    }
}
