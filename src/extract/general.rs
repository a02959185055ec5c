use crate::error::Result;
use crate::extract::selectors::*;
use crate::session::PageSession;
use crate::types::{FinalScore, GeneralInfo};

const SECTION: &str = "general info";

/// Team names, league and kickoff always; final score and game state only for
/// finished matches. Any miss fails the whole stage.
pub async fn read_general_info<S: PageSession>(session: &mut S, is_live: bool) -> Result<GeneralInfo> {
    read(session, is_live).await.map_err(|e| e.in_section(SECTION))
}

async fn read<S: PageSession>(session: &mut S, is_live: bool) -> Result<GeneralInfo> {
    let first_team_name = session.read_text(FIRST_TEAM_NAME).await?;
    let second_team_name = session.read_text(SECOND_TEAM_NAME).await?;
    let league_name = session.read_text(LEAGUE_NAME).await?;
    let date_time = session.read_text(DATE_TIME).await?;

    let final_score = if is_live {
        None
    } else {
        Some(FinalScore {
            first_team_goals: session.read_text(FIRST_TEAM_GOALS).await?,
            second_team_goals: session.read_text(SECOND_TEAM_GOALS).await?,
            game_state: session.read_text(GAME_STATE).await?,
        })
    };

    Ok(GeneralInfo {
        first_team_name,
        second_team_name,
        league_name,
        date_time,
        final_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::session::fake::{FakePage, MatchFixture};

    #[tokio::test]
    async fn finished_match_reads_score() {
        let mut page = FakePage::loaded(MatchFixture::complete("Porto", "Braga"));
        let info = read_general_info(&mut page, false).await.unwrap();
        assert_eq!(info.first_team_name, "Porto");
        assert_eq!(info.second_team_name, "Braga");
        let score = info.final_score.expect("finished match has a score");
        assert_eq!(score.first_team_goals, "2");
        assert_eq!(score.game_state, "Terminado");
    }

    #[tokio::test]
    async fn live_match_skips_score_selectors() {
        let fixture = MatchFixture::complete("Porto", "Braga")
            .without(FIRST_TEAM_GOALS)
            .without(GAME_STATE);
        let mut page = FakePage::loaded(fixture);
        let info = read_general_info(&mut page, true).await.unwrap();
        assert!(info.final_score.is_none());
        assert!(!page.reads().contains(&FIRST_TEAM_GOALS.to_string()));
    }

    #[tokio::test]
    async fn missing_header_is_structure_missing() {
        let mut page = FakePage::loaded(MatchFixture::complete("Porto", "Braga").without(LEAGUE_NAME));
        let err = read_general_info(&mut page, false).await.unwrap_err();
        assert!(
            matches!(err, AppError::StructureMissing { section: SECTION, ref selector } if selector == LEAGUE_NAME),
            "got {err}"
        );
    }
}
