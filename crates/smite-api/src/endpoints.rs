//! Endpoint wrappers.
//!
//! One method per service method. Each validates its arguments, then
//! hands the service method name and its path segments to the
//! [`CallGuard`](crate::CallGuard). Nothing here touches sessions or
//! signatures.
//!
//! Responses are returned as untyped JSON; the service's schemas drift
//! between patches. Use [`CallGuard::call_as`](crate::CallGuard::call_as)
//! for a typed view.

use chrono::NaiveDate;
use serde_json::Value;
use smite_protocol::Clock;
use smite_session::SessionStore;
use smite_transport::HttpTransport;

use crate::params::{Language, LeagueTier, MatchHour, Portal, RankedQueue, Split};
use crate::{ApiError, SmiteClient};

/// `getmatchidsbyqueue` date format.
const MATCH_DATE_FORMAT: &str = "%Y%m%d";

impl<S, T, C> SmiteClient<S, T, C>
where
    S: SessionStore,
    T: HttpTransport,
    C: Clock,
{
    // -----------------------------------------------------------------------
    // Diagnostics
    // -----------------------------------------------------------------------

    /// `testsession`: asks the service whether the current session is
    /// still good.
    pub async fn test_session(&self) -> Result<Value, ApiError> {
        self.guard().call("testsession", |_| {}).await
    }

    /// `getdataused`: daily request and session counts against limits.
    pub async fn data_used(&self) -> Result<Value, ApiError> {
        self.guard().call("getdataused", |_| {}).await
    }

    pub async fn hirez_server_status(&self) -> Result<Value, ApiError> {
        self.guard().call("gethirezserverstatus", |_| {}).await
    }

    pub async fn patch_info(&self) -> Result<Value, ApiError> {
        self.guard().call("getpatchinfo", |_| {}).await
    }

    // -----------------------------------------------------------------------
    // Gods & items
    // -----------------------------------------------------------------------

    pub async fn gods(&self, language: Language) -> Result<Value, ApiError> {
        self.guard()
            .call("getgods", |p| {
                p.segment(language);
            })
            .await
    }

    /// Top players of one god in a ranked queue.
    pub async fn god_leaderboard(
        &self,
        god_id: u32,
        queue: RankedQueue,
    ) -> Result<Value, ApiError> {
        non_zero(god_id.into(), "god id")?;
        self.guard()
            .call("getgodleaderboard", |p| {
                p.segment(god_id).segment(queue);
            })
            .await
    }

    pub async fn god_alt_abilities(&self) -> Result<Value, ApiError> {
        self.guard().call("getgodaltabilities", |_| {}).await
    }

    pub async fn god_skins(&self, god_id: u32, language: Language) -> Result<Value, ApiError> {
        non_zero(god_id.into(), "god id")?;
        self.guard()
            .call("getgodskins", |p| {
                p.segment(god_id).segment(language);
            })
            .await
    }

    pub async fn god_recommended_items(
        &self,
        god_id: u32,
        language: Language,
    ) -> Result<Value, ApiError> {
        non_zero(god_id.into(), "god id")?;
        self.guard()
            .call("getgodrecommendeditems", |p| {
                p.segment(god_id).segment(language);
            })
            .await
    }

    pub async fn items(&self, language: Language) -> Result<Value, ApiError> {
        self.guard()
            .call("getitems", |p| {
                p.segment(language);
            })
            .await
    }

    // -----------------------------------------------------------------------
    // Players
    // -----------------------------------------------------------------------

    /// `getplayer`: league and account data. `portal` narrows the lookup
    /// when the same name exists on several platforms.
    pub async fn player(&self, name: &str, portal: Option<Portal>) -> Result<Value, ApiError> {
        let name = non_empty(name, "player name")?;
        self.guard()
            .call("getplayer", |p| {
                p.segment(name);
                if let Some(portal) = portal {
                    p.segment(portal);
                }
            })
            .await
    }

    /// Hi-Rez player ids for a name. Private profiles come back too, with
    /// their privacy flag set.
    pub async fn player_id_by_name(&self, name: &str) -> Result<Value, ApiError> {
        let name = non_empty(name, "player name")?;
        self.guard()
            .call("getplayeridbyname", |p| {
                p.segment(name);
            })
            .await
    }

    /// Resolves a third-party id (a Steam id, a console gamertag) to Hi-Rez
    /// player ids.
    pub async fn player_id_by_portal_user_id(
        &self,
        portal: Portal,
        portal_user_id: &str,
    ) -> Result<Value, ApiError> {
        let user_id = non_empty(portal_user_id, "portal user id")?;
        self.guard()
            .call("getplayeridbyportaluserid", |p| {
                p.segment(portal).segment(user_id);
            })
            .await
    }

    pub async fn player_ids_by_gamertag(
        &self,
        portal: Portal,
        gamertag: &str,
    ) -> Result<Value, ApiError> {
        let gamertag = non_empty(gamertag, "gamertag")?;
        self.guard()
            .call("getplayeridsbygamertag", |p| {
                p.segment(portal).segment(gamertag);
            })
            .await
    }

    /// `player` is a name or a player id.
    pub async fn friends(&self, player: &str) -> Result<Value, ApiError> {
        let player = non_empty(player, "player")?;
        self.guard()
            .call("getfriends", |p| {
                p.segment(player);
            })
            .await
    }

    /// Worshipper rank per god. `player` is a name or a player id.
    pub async fn god_ranks(&self, player: &str) -> Result<Value, ApiError> {
        let player = non_empty(player, "player")?;
        self.guard()
            .call("getgodranks", |p| {
                p.segment(player);
            })
            .await
    }

    pub async fn player_achievements(&self, player_id: u64) -> Result<Value, ApiError> {
        non_zero(player_id, "player id")?;
        self.guard()
            .call("getplayerachievements", |p| {
                p.segment(player_id);
            })
            .await
    }

    /// Online status, and the live match id if the player is in one.
    pub async fn player_status(&self, player_id: u64) -> Result<Value, ApiError> {
        non_zero(player_id, "player id")?;
        self.guard()
            .call("getplayerstatus", |p| {
                p.segment(player_id);
            })
            .await
    }

    /// The last 50 matches.
    pub async fn match_history(&self, player_id: u64) -> Result<Value, ApiError> {
        non_zero(player_id, "player id")?;
        self.guard()
            .call("getmatchhistory", |p| {
                p.segment(player_id);
            })
            .await
    }

    /// Per-god stats for one queue. Any queue id, ranked or not.
    pub async fn queue_stats(&self, player_id: u64, queue: u16) -> Result<Value, ApiError> {
        non_zero(player_id, "player id")?;
        non_zero(queue.into(), "queue")?;
        self.guard()
            .call("getqueuestats", |p| {
                p.segment(player_id).segment(queue);
            })
            .await
    }

    pub async fn queue_stats_batch(
        &self,
        player_id: u64,
        queues: &[u16],
    ) -> Result<Value, ApiError> {
        non_zero(player_id, "player id")?;
        non_empty_list(queues, "queue list")?;
        self.guard()
            .call("getqueuestatsbatch", |p| {
                p.segment(player_id).list(queues);
            })
            .await
    }

    pub async fn search_players(&self, name: &str) -> Result<Value, ApiError> {
        let name = non_empty(name, "search term")?;
        self.guard()
            .call("searchplayers", |p| {
                p.segment(name);
            })
            .await
    }

    // -----------------------------------------------------------------------
    // Matches
    // -----------------------------------------------------------------------

    pub async fn demo_details(&self, match_id: u64) -> Result<Value, ApiError> {
        non_zero(match_id, "match id")?;
        self.guard()
            .call("getdemodetails", |p| {
                p.segment(match_id);
            })
            .await
    }

    /// Post-game stats for every player in the match.
    pub async fn match_details(&self, match_id: u64) -> Result<Value, ApiError> {
        non_zero(match_id, "match id")?;
        self.guard()
            .call("getmatchdetails", |p| {
                p.segment(match_id);
            })
            .await
    }

    pub async fn match_details_batch(&self, match_ids: &[u64]) -> Result<Value, ApiError> {
        non_empty_list(match_ids, "match id list")?;
        if match_ids.contains(&0) {
            return Err(ApiError::validation("match id must be non-zero"));
        }
        self.guard()
            .call("getmatchdetailsbatch", |p| {
                p.list(match_ids);
            })
            .await
    }

    /// Match ids played in `queue` on `date` (server time) during `hour`.
    pub async fn match_ids_by_queue(
        &self,
        queue: u16,
        date: NaiveDate,
        hour: MatchHour,
    ) -> Result<Value, ApiError> {
        non_zero(queue.into(), "queue")?;
        let date = date.format(MATCH_DATE_FORMAT).to_string();
        let hour = hour.to_string();
        self.guard()
            .call("getmatchidsbyqueue", |p| {
                p.segment(queue).segment(date).raw(&hour);
            })
            .await
    }

    /// Live match details: players, gods and ranks, before the match ends.
    pub async fn match_player_details(&self, match_id: u64) -> Result<Value, ApiError> {
        non_zero(match_id, "match id")?;
        self.guard()
            .call("getmatchplayerdetails", |p| {
                p.segment(match_id);
            })
            .await
    }

    pub async fn top_matches(&self) -> Result<Value, ApiError> {
        self.guard().call("gettopmatches", |_| {}).await
    }

    // -----------------------------------------------------------------------
    // Leagues
    // -----------------------------------------------------------------------

    pub async fn league_seasons(&self, queue: RankedQueue) -> Result<Value, ApiError> {
        self.guard()
            .call("getleagueseasons", |p| {
                p.segment(queue);
            })
            .await
    }

    pub async fn league_leaderboard(
        &self,
        queue: RankedQueue,
        tier: LeagueTier,
        split: Split,
    ) -> Result<Value, ApiError> {
        self.guard()
            .call("getleagueleaderboard", |p| {
                p.segment(queue).segment(tier).segment(split);
            })
            .await
    }

    pub async fn esports_pro_league_details(&self) -> Result<Value, ApiError> {
        self.guard().call("getesportsproleaguedetails", |_| {}).await
    }

    /// Match-of-the-day rotation.
    pub async fn motd(&self) -> Result<Value, ApiError> {
        self.guard().call("getmotd", |_| {}).await
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ApiError::validation(format!("{what} must not be empty")))
    } else {
        Ok(trimmed)
    }
}

fn non_zero(value: u64, what: &str) -> Result<(), ApiError> {
    if value == 0 {
        Err(ApiError::validation(format!("{what} must be non-zero")))
    } else {
        Ok(())
    }
}

fn non_empty_list<I>(items: &[I], what: &str) -> Result<(), ApiError> {
    if items.is_empty() {
        Err(ApiError::validation(format!("{what} must not be empty")))
    } else {
        Ok(())
    }
}
