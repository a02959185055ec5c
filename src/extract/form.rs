//! Form averages behind the page's two toggle controls.
//!
//! The page shows one (scope, grouping) cell at a time and neither toggle can be
//! read back, only clicked. [`FORM_STEPS`] lists the clicks that lead from one cell
//! to the next together with the cell they must land on; walking it from
//! [`ToggleState::INITIAL`] visits all four cells. Every click is counted against
//! that table, so an extra or missing click can only come from editing it.

use tracing::debug;

use crate::derive::parse_average;
use crate::error::Result;
use crate::extract::selectors::*;
use crate::session::PageSession;
use crate::types::{
    FormAverages, FormCell, FormColumns, FormReading, Grouping, Scope, Toggle, ToggleState,
};

const SECTION: &str = "form averages";

pub struct FormStep {
    /// Clicked in order before reading.
    pub clicks: &'static [Toggle],
    /// Cell the page shows once the clicks are done.
    pub lands_on: ToggleState,
    pub columns: FormColumns,
}

pub static FORM_STEPS: [FormStep; 4] = [
    FormStep {
        clicks: &[],
        lands_on: ToggleState::new(Scope::All, Grouping::Combined),
        columns: FormColumns {
            first_team_scoring: "first_team_total_scoring_average",
            second_team_scoring: "second_team_total_scoring_average",
            first_team_conceding: "first_team_total_conceding_average",
            second_team_conceding: "second_team_total_conceding_average",
        },
    },
    FormStep {
        clicks: &[Toggle::SameLeague],
        lands_on: ToggleState::new(Scope::SameLeague, Grouping::Combined),
        columns: FormColumns {
            first_team_scoring: "first_team_same_league_scoring_average",
            second_team_scoring: "second_team_same_league_scoring_average",
            first_team_conceding: "first_team_same_league_conceding_average",
            second_team_conceding: "second_team_same_league_conceding_average",
        },
    },
    // Under split grouping team 1 is its home form and team 2 its away form.
    FormStep {
        clicks: &[Toggle::SameLeague, Toggle::HomeAway],
        lands_on: ToggleState::new(Scope::All, Grouping::Split),
        columns: FormColumns {
            first_team_scoring: "first_team_at_home_scoring_average",
            second_team_scoring: "second_team_away_scoring_average",
            first_team_conceding: "first_team_at_home_conceding_average",
            second_team_conceding: "second_team_away_conceding_average",
        },
    },
    FormStep {
        clicks: &[Toggle::SameLeague],
        lands_on: ToggleState::new(Scope::SameLeague, Grouping::Split),
        columns: FormColumns {
            first_team_scoring: "first_team_same_league_at_home_scoring_average",
            second_team_scoring: "second_team_same_league_away_scoring_average",
            first_team_conceding: "first_team_same_league_at_home_conceding_average",
            second_team_conceding: "second_team_same_league_away_conceding_average",
        },
    },
];

fn toggle_selector(toggle: Toggle) -> &'static str {
    match toggle {
        Toggle::SameLeague => SAME_LEAGUE_TOGGLE,
        Toggle::HomeAway => HOME_AWAY_TOGGLE,
    }
}

/// Visit all four cells and read each. A miss in any cell fails the whole stage.
pub async fn read_form_averages<S: PageSession>(session: &mut S) -> Result<FormAverages> {
    walk(session).await.map_err(|e| e.in_section(SECTION))
}

async fn walk<S: PageSession>(session: &mut S) -> Result<FormAverages> {
    let mut state = ToggleState::INITIAL;
    let mut averages = FormAverages::default();

    for step in &FORM_STEPS {
        for &toggle in step.clicks {
            session.click(toggle_selector(toggle)).await?;
            state = state.flip(toggle);
        }
        debug_assert_eq!(state, step.lands_on, "form step table out of sync");

        let reading = read_cell(session).await?;
        debug!(cell = %state, ?reading, "form cell read");
        averages.cells.push(FormCell {
            state,
            columns: step.columns,
            reading,
        });
    }

    Ok(averages)
}

async fn read_cell<S: PageSession>(session: &mut S) -> Result<FormReading> {
    Ok(FormReading {
        first_team_scoring: parse_average(&session.read_text(FIRST_TEAM_SCORING_AVERAGE).await?)?,
        second_team_scoring: parse_average(&session.read_text(SECOND_TEAM_SCORING_AVERAGE).await?)?,
        first_team_conceding: parse_average(&session.read_text(FIRST_TEAM_CONCEDING_AVERAGE).await?)?,
        second_team_conceding: parse_average(&session.read_text(SECOND_TEAM_CONCEDING_AVERAGE).await?)?,
    })
}
