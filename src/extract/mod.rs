pub mod fixtures;
pub mod form;
pub mod general;
pub mod selectors;

use tracing::debug;

use crate::error::Result;
use crate::session::PageSession;
use crate::types::{MatchId, MatchRecord};

pub use fixtures::{read_last_game_info, read_next_game_info};
pub use form::read_form_averages;
pub use general::read_general_info;

/// Run every stage against a page that is already on the match URL.
///
/// All stages must succeed; the first failure is returned and nothing is kept,
/// so a record either carries every field or does not exist.
pub async fn extract_record<S: PageSession>(
    session: &mut S,
    id: MatchId,
    is_live: bool,
) -> Result<MatchRecord> {
    let general = read_general_info(session, is_live).await?;
    let last_game = read_last_game_info(session, &general).await?;
    let next_game = read_next_game_info(session, &general).await?;
    let form = read_form_averages(session).await?;

    let mut record = MatchRecord::new(id);
    general.write_to(&mut record);
    last_game.write_to(&mut record);
    next_game.write_to(&mut record);
    form.write_to(&mut record);

    let nulls = record.fields().iter().filter(|(_, v)| v.is_null()).count();
    debug!(match_id = id, fields = record.fields().len(), nulls, "record assembled");
    Ok(record)
}
