//! CSS selectors for the match page.

// General info
pub const FIRST_TEAM_NAME: &str = "#fbheader .home .name a";
pub const SECOND_TEAM_NAME: &str = "#fbheader .guest .name a";
pub const LEAGUE_NAME: &str = "#fbheader .league a";
pub const DATE_TIME: &str = "#fbheader .time span[name='timeData']";
pub const FIRST_TEAM_GOALS: &str = "#fbheader .score .home-score";
pub const SECOND_TEAM_GOALS: &str = "#fbheader .score .guest-score";
pub const GAME_STATE: &str = "#fbheader .score .status";

// Last game
pub const FIRST_TEAM_LAST_GAME_DATE: &str = "#porletP18 .home-side tr.last-game td.date";
pub const SECOND_TEAM_LAST_GAME_DATE: &str = "#porletP18 .guest-side tr.last-game td.date";
/// Present only when the last game was played at home.
pub const FIRST_TEAM_LAST_GAME_AT_HOME: &str = "#porletP18 .home-side tr.last-game td.home-team .is-self";
pub const SECOND_TEAM_LAST_GAME_AT_HOME: &str = "#porletP18 .guest-side tr.last-game td.home-team .is-self";

// Next game
pub const FIRST_TEAM_DAYS_UNTIL_NEXT_GAME: &str = "#porletP19 .home-side tr.next-game td.countdown";
pub const SECOND_TEAM_DAYS_UNTIL_NEXT_GAME: &str = "#porletP19 .guest-side tr.next-game td.countdown";
/// Present only when the next game is at home.
pub const FIRST_TEAM_NEXT_GAME_AT_HOME: &str = "#porletP19 .home-side tr.next-game td.home-team .is-self";
pub const SECOND_TEAM_NEXT_GAME_AT_HOME: &str = "#porletP19 .guest-side tr.next-game td.home-team .is-self";

// Form averages. The same four selectors serve every (scope, grouping) cell.
pub const FIRST_TEAM_SCORING_AVERAGE: &str = "#porletP20 tr.avg-scored td.home-val";
pub const SECOND_TEAM_SCORING_AVERAGE: &str = "#porletP20 tr.avg-scored td.guest-val";
pub const FIRST_TEAM_CONCEDING_AVERAGE: &str = "#porletP20 tr.avg-conceded td.home-val";
pub const SECOND_TEAM_CONCEDING_AVERAGE: &str = "#porletP20 tr.avg-conceded td.guest-val";

pub const SAME_LEAGUE_TOGGLE: &str = "#porletP20 label[for='checkboxleague']";
pub const HOME_AWAY_TOGGLE: &str = "#porletP20 label[for='checkboxHA']";
