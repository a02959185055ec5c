use crate::derive::{days_difference, infer_location, parse_countdown};
use crate::error::Result;
use crate::extract::selectors::*;
use crate::session::{is_present, PageSession};
use crate::types::{GeneralInfo, LastGameInfo, NextGameInfo};

const LAST_GAME_SECTION: &str = "last game";
const NEXT_GAME_SECTION: &str = "next game";

/// Days since each team's previous fixture, measured against this match's kickoff,
/// and where that fixture was played.
pub async fn read_last_game_info<S: PageSession>(
    session: &mut S,
    general: &GeneralInfo,
) -> Result<LastGameInfo> {
    read_last(session, general)
        .await
        .map_err(|e| e.in_section(LAST_GAME_SECTION))
}

async fn read_last<S: PageSession>(session: &mut S, general: &GeneralInfo) -> Result<LastGameInfo> {
    let first_date = session.read_text(FIRST_TEAM_LAST_GAME_DATE).await?;
    let second_date = session.read_text(SECOND_TEAM_LAST_GAME_DATE).await?;

    let first_team_days_since = days_difference(&first_date, &general.date_time)?;
    let second_team_days_since = days_difference(&second_date, &general.date_time)?;

    let first_at_home = is_present(session, FIRST_TEAM_LAST_GAME_AT_HOME).await?;
    let second_at_home = is_present(session, SECOND_TEAM_LAST_GAME_AT_HOME).await?;

    Ok(LastGameInfo {
        first_team_days_since,
        second_team_days_since,
        first_team_location: infer_location(first_at_home, &general.first_team_name),
        second_team_location: infer_location(second_at_home, &general.second_team_name),
    })
}

/// Countdown to each team's next fixture and where it will be played.
pub async fn read_next_game_info<S: PageSession>(
    session: &mut S,
    general: &GeneralInfo,
) -> Result<NextGameInfo> {
    read_next(session, general)
        .await
        .map_err(|e| e.in_section(NEXT_GAME_SECTION))
}

async fn read_next<S: PageSession>(session: &mut S, general: &GeneralInfo) -> Result<NextGameInfo> {
    let first_countdown = session.read_text(FIRST_TEAM_DAYS_UNTIL_NEXT_GAME).await?;
    let second_countdown = session.read_text(SECOND_TEAM_DAYS_UNTIL_NEXT_GAME).await?;

    let first_at_home = is_present(session, FIRST_TEAM_NEXT_GAME_AT_HOME).await?;
    let second_at_home = is_present(session, SECOND_TEAM_NEXT_GAME_AT_HOME).await?;

    Ok(NextGameInfo {
        first_team_days_until: parse_countdown(&first_countdown),
        second_team_days_until: parse_countdown(&second_countdown),
        first_team_location: infer_location(first_at_home, &general.first_team_name),
        second_team_location: infer_location(second_at_home, &general.second_team_name),
    })
}
