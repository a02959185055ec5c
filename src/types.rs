use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Externally assigned identifier of one match page.
pub type MatchId = u64;

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Deliberately empty, e.g. the final score of a match still in play.
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixture location
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Home,
    Away,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Location::Home => "HOME",
            Location::Away => "AWAY",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Form-average toggles
// ---------------------------------------------------------------------------

/// League scope of the form figures. Flipped by the "same league" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    All,
    SameLeague,
}

/// Grouping of the form figures. Flipped by the "home/away" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grouping {
    Combined,
    /// Team 1 shows its home form, team 2 its away form.
    Split,
}

/// The page's two toggle controls. Clicking one flips its half of [`ToggleState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    SameLeague,
    HomeAway,
}

/// Which of the four form cells the page is currently showing.
/// The page never exposes this; it is tracked by counting clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToggleState {
    pub scope: Scope,
    pub grouping: Grouping,
}

impl ToggleState {
    /// State of a freshly loaded match page.
    pub const INITIAL: Self = Self::new(Scope::All, Grouping::Combined);

    pub const fn new(scope: Scope, grouping: Grouping) -> Self {
        Self { scope, grouping }
    }

    pub fn flip(self, toggle: Toggle) -> Self {
        match toggle {
            Toggle::SameLeague => Self {
                scope: match self.scope {
                    Scope::All => Scope::SameLeague,
                    Scope::SameLeague => Scope::All,
                },
                ..self
            },
            Toggle::HomeAway => Self {
                grouping: match self.grouping {
                    Grouping::Combined => Grouping::Split,
                    Grouping::Split => Grouping::Combined,
                },
                ..self
            },
        }
    }
}

impl std::fmt::Display for ToggleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scope = match self.scope {
            Scope::All => "all",
            Scope::SameLeague => "same_league",
        };
        let grouping = match self.grouping {
            Grouping::Combined => "combined",
            Grouping::Split => "split",
        };
        write!(f, "{scope}/{grouping}")
    }
}

// ---------------------------------------------------------------------------
// Stage outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FinalScore {
    pub first_team_goals: String,
    pub second_team_goals: String,
    pub game_state: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneralInfo {
    pub first_team_name: String,
    pub second_team_name: String,
    pub league_name: String,
    /// Kickoff, as printed on the page.
    pub date_time: String,
    /// None for today's matches, which may not have finished.
    pub final_score: Option<FinalScore>,
}

impl GeneralInfo {
    pub fn write_to(self, record: &mut MatchRecord) {
        record.push("first_team_name", FieldValue::Text(self.first_team_name));
        record.push("second_team_name", FieldValue::Text(self.second_team_name));
        record.push("league_name", FieldValue::Text(self.league_name));
        record.push("date_time", FieldValue::Text(self.date_time));
        match self.final_score {
            Some(score) => {
                record.push("first_team_goals_final_score", FieldValue::Text(score.first_team_goals));
                record.push("second_team_goals_final_score", FieldValue::Text(score.second_team_goals));
                record.push("game_state", FieldValue::Text(score.game_state));
            }
            None => {
                record.push("first_team_goals_final_score", FieldValue::Null);
                record.push("second_team_goals_final_score", FieldValue::Null);
                record.push("game_state", FieldValue::Null);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LastGameInfo {
    pub first_team_days_since: i64,
    pub second_team_days_since: i64,
    pub first_team_location: Location,
    pub second_team_location: Location,
}

impl LastGameInfo {
    pub fn write_to(self, record: &mut MatchRecord) {
        record.push("first_team_days_since_last_game", FieldValue::Int(self.first_team_days_since));
        record.push("second_team_days_since_last_game", FieldValue::Int(self.second_team_days_since));
        record.push(
            "first_team_last_game_location",
            FieldValue::Text(self.first_team_location.to_string()),
        );
        record.push(
            "second_team_last_game_location",
            FieldValue::Text(self.second_team_location.to_string()),
        );
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NextGameInfo {
    /// Whole days when the countdown carries a number, otherwise the raw text.
    pub first_team_days_until: FieldValue,
    pub second_team_days_until: FieldValue,
    pub first_team_location: Location,
    pub second_team_location: Location,
}

impl NextGameInfo {
    pub fn write_to(self, record: &mut MatchRecord) {
        record.push("first_team_days_until_next_game", self.first_team_days_until);
        record.push("second_team_days_until_next_game", self.second_team_days_until);
        record.push(
            "first_team_next_game_location",
            FieldValue::Text(self.first_team_location.to_string()),
        );
        record.push(
            "second_team_next_game_location",
            FieldValue::Text(self.second_team_location.to_string()),
        );
    }
}

/// The four figures visible for one form cell, read through the same four selectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormReading {
    pub first_team_scoring: f64,
    pub second_team_scoring: f64,
    pub first_team_conceding: f64,
    pub second_team_conceding: f64,
}

/// Column names for one form cell, in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormColumns {
    pub first_team_scoring: &'static str,
    pub second_team_scoring: &'static str,
    pub first_team_conceding: &'static str,
    pub second_team_conceding: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormCell {
    pub state: ToggleState,
    pub columns: FormColumns,
    pub reading: FormReading,
}

/// Form averages for all four (scope, grouping) cells, in visiting order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormAverages {
    pub cells: Vec<FormCell>,
}

impl FormAverages {
    #[cfg(test)]
    pub fn get(&self, scope: Scope, grouping: Grouping) -> Option<&FormReading> {
        let state = ToggleState::new(scope, grouping);
        self.cells.iter().find(|c| c.state == state).map(|c| &c.reading)
    }

    pub fn write_to(self, record: &mut MatchRecord) {
        for cell in self.cells {
            let FormCell { columns, reading, .. } = cell;
            record.push(columns.first_team_scoring, FieldValue::Float(reading.first_team_scoring));
            record.push(columns.second_team_scoring, FieldValue::Float(reading.second_team_scoring));
            record.push(columns.first_team_conceding, FieldValue::Float(reading.first_team_conceding));
            record.push(columns.second_team_conceding, FieldValue::Float(reading.second_team_conceding));
        }
    }
}

// ---------------------------------------------------------------------------
// MatchRecord
// ---------------------------------------------------------------------------

/// One complete row: every stage succeeded. Field order is column order; `id` comes last.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub id: MatchId,
    fields: Vec<(&'static str, FieldValue)>,
}

impl MatchRecord {
    pub fn new(id: MatchId) -> Self {
        Self { id, fields: Vec::new() }
    }

    pub fn push(&mut self, name: &'static str, value: FieldValue) {
        self.fields.push((name, value));
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Extracted fields, without the trailing `id`.
    pub fn fields(&self) -> &[(&'static str, FieldValue)] {
        &self.fields
    }

    /// `(column, cell)` pairs ready for the tabular store. Nulls become empty cells.
    pub fn to_row(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .chain(std::iter::once(("id".to_string(), self.id.to_string())))
            .collect()
    }
}

impl Serialize for MatchRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("id", &self.id)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_flip_independently() {
        let s = ToggleState::INITIAL;
        let s = s.flip(Toggle::SameLeague);
        assert_eq!(s, ToggleState::new(Scope::SameLeague, Grouping::Combined));
        let s = s.flip(Toggle::HomeAway);
        assert_eq!(s, ToggleState::new(Scope::SameLeague, Grouping::Split));
        let s = s.flip(Toggle::SameLeague).flip(Toggle::HomeAway);
        assert_eq!(s, ToggleState::INITIAL);
    }

    #[test]
    fn live_general_info_writes_explicit_nulls() {
        let mut record = MatchRecord::new(7);
        GeneralInfo {
            first_team_name: "Porto".to_string(),
            second_team_name: "Braga".to_string(),
            league_name: "Liga".to_string(),
            date_time: "05-10-2023 20:00".to_string(),
            final_score: None,
        }
        .write_to(&mut record);

        assert_eq!(record.fields().len(), 7);
        assert_eq!(record.get("game_state"), Some(&FieldValue::Null));
        assert_eq!(record.get("first_team_goals_final_score"), Some(&FieldValue::Null));
        assert_eq!(record.get("league_name"), Some(&FieldValue::Text("Liga".to_string())));
    }

    #[test]
    fn row_puts_id_last_and_blanks_nulls() {
        let mut record = MatchRecord::new(42);
        record.push("a", FieldValue::Float(1.5));
        record.push("b", FieldValue::Null);
        record.push("c", FieldValue::Int(3));

        let row = record.to_row();
        let expected: Vec<(String, String)> = [("a", "1.5"), ("b", ""), ("c", "3"), ("id", "42")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(row, expected);
    }

    #[test]
    fn record_serializes_as_flat_object() {
        let mut record = MatchRecord::new(9);
        record.push("league_name", FieldValue::Text("Liga".to_string()));
        record.push("game_state", FieldValue::Null);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"league_name":"Liga","game_state":null,"id":9}"#);
    }
}
